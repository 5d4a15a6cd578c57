//! Authentication endpoints.

use super::ApiClient;
use crate::error::ApiError;
use crate::models::{AuthResponse, LoginRequest, RegisterRequest, RegisterResponse};

pub struct AuthApi<'a> {
    pub(crate) client: &'a ApiClient,
}

impl AuthApi<'_> {
    /// Exchange credentials for a bearer token and identity fields.
    /// Rejected credentials surface the server's message verbatim.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.client.post_json("/auth/login", credentials).await
    }

    /// Create an account. Registration does not authenticate; the caller
    /// logs in separately afterwards.
    pub async fn register(&self, fields: &RegisterRequest) -> Result<RegisterResponse, ApiError> {
        self.client.post_json("/auth/register", fields).await
    }
}
