//! Profile endpoints.

use super::ApiClient;
use crate::error::ApiError;
use crate::models::{User, UserUpdate};

pub struct UsersApi<'a> {
    pub(crate) client: &'a ApiClient,
}

impl UsersApi<'_> {
    pub async fn profile(&self) -> Result<User, ApiError> {
        self.client.get_json("/users/profile").await
    }

    pub async fn update_profile(&self, update: &UserUpdate) -> Result<User, ApiError> {
        self.client.put_json("/users/profile", update).await
    }
}
