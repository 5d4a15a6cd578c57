pub mod auth;
pub mod compete;
pub mod config;
pub mod friend;
pub mod habit;
pub mod notify;
pub mod profile;

use std::sync::Arc;

use habitkit_core::storage;
use habitkit_core::{ApiClient, Config, SessionEvent, SessionPhase, SessionStore};

/// Everything a command needs: the gateway client and the bootstrapped
/// session store with its eviction hook installed.
pub struct AppContext {
    pub api: Arc<ApiClient>,
    pub session: Arc<SessionStore>,
}

pub fn app_context() -> Result<AppContext, Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let store = storage::select_store(&config.storage.credentials)?;
    let api = Arc::new(ApiClient::new(&config.api.base_url, store.clone()));
    let session = SessionStore::new(api.clone(), store);
    session.bootstrap();
    session.install_eviction_hook();
    Ok(AppContext { api, session })
}

/// Commands that talk to resource endpoints refuse to run signed out,
/// instead of sending a request the server will reject anyway.
pub fn require_auth(ctx: &AppContext) -> Result<(), Box<dyn std::error::Error>> {
    match ctx.session.phase() {
        SessionPhase::Authenticated => Ok(()),
        _ => Err(habitkit_core::SessionError::NotAuthenticated.into()),
    }
}

/// Surface an eviction to the user. This is the CLI's version of the
/// redirect-to-sign-in that a GUI performs on a rejected token.
pub fn report_eviction(ctx: &AppContext) {
    for event in ctx.session.drain_events() {
        if let SessionEvent::Evicted { .. } = event {
            eprintln!("Session expired; sign in again with 'habitkit auth login'.");
        }
    }
}
