//! Friendship endpoints.

use super::ApiClient;
use crate::error::ApiError;
use crate::models::{Friendship, User};

pub struct FriendsApi<'a> {
    pub(crate) client: &'a ApiClient,
}

impl FriendsApi<'_> {
    /// Accepted friends, as bare user records.
    pub async fn list(&self) -> Result<Vec<User>, ApiError> {
        self.client.get_json("/friends").await
    }

    pub async fn pending(&self) -> Result<Vec<Friendship>, ApiError> {
        self.client.get_json("/friends/requests/pending").await
    }

    pub async fn sent(&self) -> Result<Vec<Friendship>, ApiError> {
        self.client.get_json("/friends/requests/sent").await
    }

    pub async fn request(&self, user_id: i64) -> Result<Friendship, ApiError> {
        self.client
            .post_empty_json(&format!("/friends/request/{user_id}"))
            .await
    }

    pub async fn accept(&self, friendship_id: i64) -> Result<Friendship, ApiError> {
        self.client
            .post_empty_json(&format!("/friends/accept/{friendship_id}"))
            .await
    }

    pub async fn decline(&self, friendship_id: i64) -> Result<Friendship, ApiError> {
        self.client
            .post_empty_json(&format!("/friends/decline/{friendship_id}"))
            .await
    }

    pub async fn remove(&self, friendship_id: i64) -> Result<(), ApiError> {
        self.client
            .delete_unit(&format!("/friends/{friendship_id}"))
            .await
    }
}
