//! Competition endpoints.

use super::ApiClient;
use crate::error::ApiError;
use crate::models::{Competition, NewCompetition};

pub struct CompetitionsApi<'a> {
    pub(crate) client: &'a ApiClient,
}

impl CompetitionsApi<'_> {
    pub async fn list(&self) -> Result<Vec<Competition>, ApiError> {
        self.client.get_json("/competitions").await
    }

    pub async fn get(&self, id: i64) -> Result<Competition, ApiError> {
        self.client.get_json(&format!("/competitions/{id}")).await
    }

    pub async fn create(&self, competition: &NewCompetition) -> Result<Competition, ApiError> {
        self.client.post_json("/competitions", competition).await
    }

    pub async fn join(&self, id: i64) -> Result<(), ApiError> {
        self.client.post_unit(&format!("/competitions/{id}/join")).await
    }

    pub async fn leave(&self, id: i64) -> Result<(), ApiError> {
        self.client.post_unit(&format!("/competitions/{id}/leave")).await
    }
}
