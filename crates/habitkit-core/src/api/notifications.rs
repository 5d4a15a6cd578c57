//! Notification endpoints.

use super::ApiClient;
use crate::error::ApiError;
use crate::models::Notification;

pub struct NotificationsApi<'a> {
    pub(crate) client: &'a ApiClient,
}

impl NotificationsApi<'_> {
    pub async fn list(&self) -> Result<Vec<Notification>, ApiError> {
        self.client.get_json("/notifications").await
    }

    pub async fn unread(&self) -> Result<Vec<Notification>, ApiError> {
        self.client.get_json("/notifications/unread").await
    }

    pub async fn unread_count(&self) -> Result<u64, ApiError> {
        self.client.get_json("/notifications/count").await
    }

    pub async fn mark_read(&self, id: i64) -> Result<(), ApiError> {
        self.client.post_unit(&format!("/notifications/{id}/read")).await
    }

    pub async fn mark_all_read(&self) -> Result<(), ApiError> {
        self.client.post_unit("/notifications/read-all").await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.client.delete_unit(&format!("/notifications/{id}")).await
    }
}
