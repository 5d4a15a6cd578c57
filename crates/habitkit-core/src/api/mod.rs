//! HTTP gateway client for the habit-tracker API.
//!
//! One [`ApiClient`] is shared by the session store and every feature
//! surface. The bearer token is read from the credential store at each
//! request rather than cached, so a logout or re-login between calls is
//! always respected. A response with unauthorized status fires the
//! eviction callback (wired to the session store at startup) and is then
//! surfaced as [`ApiError::Unauthorized`].

mod auth;
mod competitions;
mod friends;
mod habits;
mod notifications;
mod users;

pub use auth::AuthApi;
pub use competitions::CompetitionsApi;
pub use friends::FriendsApi;
pub use habits::HabitsApi;
pub use notifications::NotificationsApi;
pub use users::UsersApi;

use std::sync::{Arc, OnceLock};

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::storage::{CredentialStore, TOKEN_KEY};

type UnauthorizedHandler = Box<dyn Fn() + Send + Sync>;

pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    store: Arc<dyn CredentialStore>,
    on_unauthorized: OnceLock<UnauthorizedHandler>,
}

impl ApiClient {
    /// Create a client for the gateway at `base_url` (e.g.
    /// `http://localhost:8080/api`), reading bearer tokens from `store`.
    pub fn new(base_url: &str, store: Arc<dyn CredentialStore>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
            store,
            on_unauthorized: OnceLock::new(),
        }
    }

    /// Install the unauthorized-response handler. The gateway never
    /// touches credential storage itself; eviction belongs to whoever
    /// registers here. Only the first registration takes effect.
    pub fn on_unauthorized<F>(&self, handler: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        let _ = self.on_unauthorized.set(Box::new(handler));
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi { client: self }
    }

    pub fn users(&self) -> UsersApi<'_> {
        UsersApi { client: self }
    }

    pub fn habits(&self) -> HabitsApi<'_> {
        HabitsApi { client: self }
    }

    pub fn notifications(&self) -> NotificationsApi<'_> {
        NotificationsApi { client: self }
    }

    pub fn friends(&self) -> FriendsApi<'_> {
        FriendsApi { client: self }
    }

    pub fn competitions(&self) -> CompetitionsApi<'_> {
        CompetitionsApi { client: self }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.http.request(method, url);
        // An unreadable store is treated like an absent token; the server
        // rejects the request and the normal 401 path takes over.
        if let Ok(Some(token)) = self.store.get(TOKEN_KEY) {
            req = req.bearer_auth(token);
        }
        req
    }

    async fn check(&self, resp: Response) -> Result<Response, ApiError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let message = error_message(resp, status).await;
        if status == StatusCode::UNAUTHORIZED {
            if let Some(handler) = self.on_unauthorized.get() {
                handler();
            }
            return Err(ApiError::Unauthorized { message });
        }
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let resp = self.request(Method::GET, path).send().await?;
        decode(self.check(resp).await?, path).await
    }

    pub(crate) async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let resp = self.request(Method::POST, path).json(body).send().await?;
        decode(self.check(resp).await?, path).await
    }

    /// POST with no request body, decoding the response.
    pub(crate) async fn post_empty_json<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, ApiError> {
        let resp = self.request(Method::POST, path).send().await?;
        decode(self.check(resp).await?, path).await
    }

    /// POST with no request body, ignoring the response body.
    pub(crate) async fn post_unit(&self, path: &str) -> Result<(), ApiError> {
        let resp = self.request(Method::POST, path).send().await?;
        self.check(resp).await?;
        Ok(())
    }

    pub(crate) async fn put_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let resp = self.request(Method::PUT, path).json(body).send().await?;
        decode(self.check(resp).await?, path).await
    }

    pub(crate) async fn delete_unit(&self, path: &str) -> Result<(), ApiError> {
        let resp = self.request(Method::DELETE, path).send().await?;
        self.check(resp).await?;
        Ok(())
    }
}

/// Extract the server's human-readable `message` field, falling back to
/// the HTTP status line when the body carries none.
async fn error_message(resp: Response, status: StatusCode) -> String {
    let fallback = || {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    };
    match resp.json::<serde_json::Value>().await {
        Ok(body) => body
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or_else(fallback),
        Err(_) => fallback(),
    }
}

async fn decode<T: DeserializeOwned>(resp: Response, endpoint: &str) -> Result<T, ApiError> {
    resp.json::<T>().await.map_err(|e| ApiError::Decode {
        endpoint: endpoint.to_string(),
        message: e.to_string(),
    })
}
