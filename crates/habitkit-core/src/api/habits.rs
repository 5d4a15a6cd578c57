//! Habit CRUD and completion endpoints.

use super::ApiClient;
use crate::error::ApiError;
use crate::models::{Habit, HabitCompletion, HabitUpdate, NewCompletion, NewHabit};

pub struct HabitsApi<'a> {
    pub(crate) client: &'a ApiClient,
}

impl HabitsApi<'_> {
    pub async fn list(&self) -> Result<Vec<Habit>, ApiError> {
        self.client.get_json("/habits").await
    }

    pub async fn get(&self, id: i64) -> Result<Habit, ApiError> {
        self.client.get_json(&format!("/habits/{id}")).await
    }

    pub async fn create(&self, habit: &NewHabit) -> Result<Habit, ApiError> {
        self.client.post_json("/habits", habit).await
    }

    pub async fn update(&self, id: i64, update: &HabitUpdate) -> Result<Habit, ApiError> {
        self.client.put_json(&format!("/habits/{id}"), update).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.client.delete_unit(&format!("/habits/{id}")).await
    }

    /// Record a completion for today; the server updates streaks.
    pub async fn complete(
        &self,
        id: i64,
        completion: &NewCompletion,
    ) -> Result<HabitCompletion, ApiError> {
        self.client
            .post_json(&format!("/habits/{id}/complete"), completion)
            .await
    }
}
