//! Session store -- owns the authenticated user, the bearer token, and
//! their persistence.
//!
//! One store exists per running application. It is an owned, injected
//! value (shared as `Arc<SessionStore>`), never ambient global state:
//! everything that needs sign-in state receives the store and reads a
//! [`Session`] snapshot from it. Transitions:
//!
//! ```text
//! Uninitialized -> Loading -> { Authenticated | Anonymous }
//! Authenticated -> Anonymous      (logout, or gateway 401 eviction)
//! Anonymous     -> Authenticated  (successful login)
//! ```
//!
//! Registration performs no transition; the product requires an explicit
//! login afterwards.

mod events;

pub use events::SessionEvent;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;

use crate::api::ApiClient;
use crate::error::{Result, SessionError};
use crate::models::{LoginRequest, RegisterRequest, User};
use crate::storage::{CredentialStore, TOKEN_KEY, USER_KEY};

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Uninitialized,
    Loading,
    Authenticated,
    Anonymous,
}

/// Read-only snapshot of the current session.
///
/// `token` is present exactly when `user` is, once `is_loading` is false.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: Option<User>,
    pub token: Option<String>,
    pub is_loading: bool,
}

enum State {
    Uninitialized,
    Loading,
    Authenticated { user: User, token: String },
    Anonymous,
}

pub struct SessionStore {
    api: Arc<ApiClient>,
    store: Arc<dyn CredentialStore>,
    state: Mutex<State>,
    events: Mutex<VecDeque<SessionEvent>>,
    login_seq: AtomicU64,
}

impl SessionStore {
    /// Create the store in the Uninitialized phase. Call
    /// [`SessionStore::bootstrap`] once before reading state.
    pub fn new(api: Arc<ApiClient>, store: Arc<dyn CredentialStore>) -> Arc<Self> {
        Arc::new(Self {
            api,
            store,
            state: Mutex::new(State::Uninitialized),
            events: Mutex::new(VecDeque::new()),
            login_seq: AtomicU64::new(0),
        })
    }

    /// Wire this store to its gateway's unauthorized signal, so a 401 on
    /// any request evicts the session. The store is the only writer of
    /// credential storage; the gateway just signals.
    pub fn install_eviction_hook(self: &Arc<Self>) {
        let weak = Arc::downgrade(self);
        self.api.on_unauthorized(move || {
            if let Some(store) = weak.upgrade() {
                store.handle_unauthorized();
            }
        });
    }

    /// Restore a previously persisted session.
    ///
    /// Both keys present and the user JSON intact yields Authenticated;
    /// anything else -- absent keys, unreadable storage, corrupt JSON --
    /// yields Anonymous. Never fails: a broken stored session is "no
    /// session", not an error. Calling again after completion is a no-op.
    pub fn bootstrap(&self) -> SessionPhase {
        {
            let mut state = self.state.lock().unwrap();
            match *state {
                State::Uninitialized => *state = State::Loading,
                State::Loading => {}
                State::Authenticated { .. } => return SessionPhase::Authenticated,
                State::Anonymous => return SessionPhase::Anonymous,
            }
        }

        let restored = self.read_stored_session();
        let phase = if restored.is_some() {
            SessionPhase::Authenticated
        } else {
            SessionPhase::Anonymous
        };

        let mut state = self.state.lock().unwrap();
        *state = match restored {
            Some((user, token)) => State::Authenticated { user, token },
            None => State::Anonymous,
        };
        drop(state);

        self.push_event(SessionEvent::BootstrapCompleted {
            authenticated: phase == SessionPhase::Authenticated,
            at: Utc::now(),
        });
        phase
    }

    fn read_stored_session(&self) -> Option<(User, String)> {
        let token = self.store.get(TOKEN_KEY).ok().flatten()?;
        let user_json = self.store.get(USER_KEY).ok().flatten()?;
        let user: User = serde_json::from_str(&user_json).ok()?;
        Some((user, token))
    }

    /// Authenticate against the gateway.
    ///
    /// On success the store becomes Authenticated and both keys are
    /// persisted; on failure the state is untouched and the server's
    /// message propagates unchanged. Each call takes a generation number
    /// at issue time; a response whose generation is no longer the latest
    /// is discarded and reported as [`SessionError::Superseded`], so a
    /// slow first attempt can never overwrite a newer one.
    pub fn login(
        &self,
        username: &str,
        password: &str,
    ) -> impl std::future::Future<Output = Result<User>> + '_ {
        // Generation is taken when the login is issued, not when the
        // future is first polled.
        let seq = self.login_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let credentials = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };

        async move {
            let auth = self.api.auth().login(&credentials).await?;

            if self.login_seq.load(Ordering::SeqCst) != seq {
                return Err(SessionError::Superseded.into());
            }

            // The login response carries no timestamp; stamp the identity
            // with the client clock.
            let user = User {
                id: auth.id,
                username: auth.username,
                email: auth.email,
                first_name: None,
                last_name: None,
                role: auth.role,
                created_at: Utc::now().to_rfc3339(),
                last_login_at: None,
            };

            {
                let mut state = self.state.lock().unwrap();
                *state = State::Authenticated {
                    user: user.clone(),
                    token: auth.token.clone(),
                };
            }

            self.store.set(TOKEN_KEY, &auth.token)?;
            self.store
                .set(USER_KEY, &serde_json::to_string(&user)?)?;

            self.push_event(SessionEvent::LoggedIn {
                username: user.username.clone(),
                at: Utc::now(),
            });
            Ok(user)
        }
    }

    /// Create an account. Never touches session state; the server's
    /// acknowledgement message is returned for display.
    pub async fn register(&self, fields: &RegisterRequest) -> Result<String> {
        let resp = self.api.auth().register(fields).await?;
        Ok(resp.message)
    }

    /// Sign out. In-memory state is cleared before storage, so observers
    /// see Anonymous immediately; storage cleanup is best-effort and
    /// never surfaces an error.
    pub fn logout(&self) {
        let was_authenticated = {
            let mut state = self.state.lock().unwrap();
            let was = matches!(*state, State::Authenticated { .. });
            *state = State::Anonymous;
            was
        };

        let _ = self.store.remove(TOKEN_KEY);
        let _ = self.store.remove(USER_KEY);

        if was_authenticated {
            self.push_event(SessionEvent::LoggedOut { at: Utc::now() });
        }
    }

    /// Gateway 401 signal: the bearer token is no longer valid. Clears
    /// memory and storage like logout, but reports the transition as an
    /// eviction so the presentation layer can route to sign-in.
    pub fn handle_unauthorized(&self) {
        let was_authenticated = {
            let mut state = self.state.lock().unwrap();
            let was = matches!(*state, State::Authenticated { .. });
            if was {
                *state = State::Anonymous;
            }
            was
        };

        let _ = self.store.remove(TOKEN_KEY);
        let _ = self.store.remove(USER_KEY);

        if was_authenticated {
            self.push_event(SessionEvent::Evicted { at: Utc::now() });
        }
    }

    pub fn phase(&self) -> SessionPhase {
        match *self.state.lock().unwrap() {
            State::Uninitialized => SessionPhase::Uninitialized,
            State::Loading => SessionPhase::Loading,
            State::Authenticated { .. } => SessionPhase::Authenticated,
            State::Anonymous => SessionPhase::Anonymous,
        }
    }

    /// Snapshot of the current session.
    pub fn current(&self) -> Session {
        match &*self.state.lock().unwrap() {
            State::Uninitialized | State::Loading => Session {
                user: None,
                token: None,
                is_loading: true,
            },
            State::Authenticated { user, token } => Session {
                user: Some(user.clone()),
                token: Some(token.clone()),
                is_loading: false,
            },
            State::Anonymous => Session {
                user: None,
                token: None,
                is_loading: false,
            },
        }
    }

    /// Drain queued transition events, oldest first.
    pub fn drain_events(&self) -> Vec<SessionEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }

    fn push_event(&self, event: SessionEvent) {
        self.events.lock().unwrap().push_back(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn store_with(entries: &[(&str, &str)]) -> Arc<MemoryStore> {
        Arc::new(MemoryStore::with_entries(
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        ))
    }

    fn session_over(store: Arc<MemoryStore>) -> Arc<SessionStore> {
        let api = Arc::new(ApiClient::new("http://localhost:9", store.clone()));
        SessionStore::new(api, store)
    }

    const ALICE: &str = r#"{"id":1,"username":"alice","email":"a@x.com","role":"USER","createdAt":"2025-06-01T12:00:00Z"}"#;

    #[test]
    fn starts_uninitialized_and_loading() {
        let session = session_over(store_with(&[]));
        assert_eq!(session.phase(), SessionPhase::Uninitialized);
        assert!(session.current().is_loading);
    }

    #[test]
    fn bootstrap_empty_storage_is_anonymous() {
        let session = session_over(store_with(&[]));
        assert_eq!(session.bootstrap(), SessionPhase::Anonymous);

        let snapshot = session.current();
        assert!(!snapshot.is_loading);
        assert_eq!(snapshot.user, None);
        assert_eq!(snapshot.token, None);
    }

    #[test]
    fn bootstrap_restores_stored_pair() {
        let session = session_over(store_with(&[("token", "t1"), ("user", ALICE)]));
        assert_eq!(session.bootstrap(), SessionPhase::Authenticated);

        let snapshot = session.current();
        assert_eq!(snapshot.token.as_deref(), Some("t1"));
        assert_eq!(snapshot.user.unwrap().username, "alice");
    }

    #[test]
    fn bootstrap_token_without_user_is_anonymous() {
        let session = session_over(store_with(&[("token", "t1")]));
        assert_eq!(session.bootstrap(), SessionPhase::Anonymous);
    }

    #[test]
    fn bootstrap_user_without_token_is_anonymous() {
        let session = session_over(store_with(&[("user", ALICE)]));
        assert_eq!(session.bootstrap(), SessionPhase::Anonymous);
    }

    #[test]
    fn bootstrap_corrupt_user_json_is_anonymous() {
        let session = session_over(store_with(&[("token", "t1"), ("user", "{not json")]));
        assert_eq!(session.bootstrap(), SessionPhase::Anonymous);
    }

    #[test]
    fn bootstrap_is_idempotent() {
        let session = session_over(store_with(&[("token", "t1"), ("user", ALICE)]));
        assert_eq!(session.bootstrap(), SessionPhase::Authenticated);
        assert_eq!(session.bootstrap(), SessionPhase::Authenticated);
        // A second call reports the settled phase without re-reading or
        // queueing another event.
        assert_eq!(session.drain_events().len(), 1);
    }

    #[test]
    fn logout_clears_memory_and_storage() {
        let store = store_with(&[("token", "t1"), ("user", ALICE)]);
        let session = session_over(store.clone());
        session.bootstrap();

        session.logout();

        assert_eq!(session.phase(), SessionPhase::Anonymous);
        assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
        assert_eq!(store.get(USER_KEY).unwrap(), None);
    }

    #[test]
    fn logout_when_anonymous_emits_nothing() {
        let session = session_over(store_with(&[]));
        session.bootstrap();
        session.drain_events();

        session.logout();
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn eviction_transitions_and_emits() {
        let store = store_with(&[("token", "t1"), ("user", ALICE)]);
        let session = session_over(store.clone());
        session.bootstrap();

        session.handle_unauthorized();

        assert_eq!(session.phase(), SessionPhase::Anonymous);
        assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
        let events = session.drain_events();
        assert!(matches!(events.last(), Some(SessionEvent::Evicted { .. })));
    }

    #[test]
    fn events_drain_in_order() {
        let store = store_with(&[("token", "t1"), ("user", ALICE)]);
        let session = session_over(store);
        session.bootstrap();
        session.logout();

        let events = session.drain_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], SessionEvent::BootstrapCompleted { authenticated: true, .. }));
        assert!(matches!(events[1], SessionEvent::LoggedOut { .. }));
        assert!(session.drain_events().is_empty());
    }
}
