//! Session lifecycle tests against a mock gateway.

use std::sync::{Arc, Mutex};

use mockito::Matcher;
use serde_json::json;

use habitkit_core::error::StorageError;
use habitkit_core::models::{RegisterRequest, User};
use habitkit_core::storage::{CredentialStore, MemoryStore, TOKEN_KEY, USER_KEY};
use habitkit_core::{ApiClient, CoreError, SessionError, SessionPhase, SessionStore};

const ALICE_JSON: &str =
    r#"{"id":1,"username":"alice","email":"a@x.com","role":"USER","createdAt":"2025-06-01T12:00:00Z"}"#;

fn memory_store(entries: &[(&str, &str)]) -> Arc<MemoryStore> {
    Arc::new(MemoryStore::with_entries(
        entries.iter().map(|(k, v)| (k.to_string(), v.to_string())),
    ))
}

fn session_against(
    server: &mockito::Server,
    store: Arc<MemoryStore>,
) -> Arc<SessionStore> {
    let api = Arc::new(ApiClient::new(&server.url(), store.clone()));
    let session = SessionStore::new(api, store);
    session.bootstrap();
    session
}

#[tokio::test]
async fn successful_login_authenticates_and_persists() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/auth/login")
        .match_body(Matcher::Json(json!({
            "username": "alice",
            "password": "right"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "token": "t2",
                "id": 1,
                "username": "alice",
                "email": "a@x.com",
                "role": "USER"
            })
            .to_string(),
        )
        .create_async()
        .await;

    let store = memory_store(&[]);
    let session = session_against(&server, store.clone());

    let user = session.login("alice", "right").await.unwrap();
    mock.assert_async().await;

    assert_eq!(user.username, "alice");
    assert_eq!(session.phase(), SessionPhase::Authenticated);

    let snapshot = session.current();
    assert_eq!(snapshot.token.as_deref(), Some("t2"));

    // Storage mirrors memory: same token, same identity.
    assert_eq!(store.get(TOKEN_KEY).unwrap().as_deref(), Some("t2"));
    let stored: User =
        serde_json::from_str(&store.get(USER_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(stored, snapshot.user.unwrap());
}

#[tokio::test]
async fn rejected_login_propagates_message_and_leaves_state() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/auth/login")
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(json!({"message": "Invalid credentials"}).to_string())
        .create_async()
        .await;

    let store = memory_store(&[]);
    let session = session_against(&server, store.clone());

    let err = session.login("alice", "wrong").await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid credentials");

    assert_eq!(session.phase(), SessionPhase::Anonymous);
    assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
    assert_eq!(store.get(USER_KEY).unwrap(), None);
}

#[tokio::test]
async fn superseded_login_response_is_discarded() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/auth/login")
        .match_body(Matcher::PartialJson(json!({"password": "first"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"token": "t-old", "id": 1, "username": "alice", "email": "a@x.com", "role": "USER"})
                .to_string(),
        )
        .create_async()
        .await;
    server
        .mock("POST", "/auth/login")
        .match_body(Matcher::PartialJson(json!({"password": "second"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"token": "t-new", "id": 1, "username": "alice", "email": "a@x.com", "role": "USER"})
                .to_string(),
        )
        .create_async()
        .await;

    let store = memory_store(&[]);
    let session = session_against(&server, store.clone());

    // Issue a first login but let a second one complete before it.
    let stale = session.login("alice", "first");
    session.login("alice", "second").await.unwrap();

    let err = stale.await.unwrap_err();
    assert!(matches!(
        err,
        CoreError::Session(SessionError::Superseded)
    ));

    // The newer login's token is the one in memory and on disk.
    assert_eq!(session.current().token.as_deref(), Some("t-new"));
    assert_eq!(store.get(TOKEN_KEY).unwrap().as_deref(), Some("t-new"));
}

#[tokio::test]
async fn register_succeeds_without_touching_session() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/auth/register")
        .match_body(Matcher::PartialJson(json!({
            "username": "bob",
            "email": "b@x.com"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"message": "User registered successfully"}).to_string())
        .create_async()
        .await;

    let store = memory_store(&[]);
    let session = session_against(&server, store.clone());

    let fields = RegisterRequest {
        username: "bob".into(),
        email: "b@x.com".into(),
        password: "secret".into(),
        first_name: None,
        last_name: None,
    };
    let message = session.register(&fields).await.unwrap();
    mock.assert_async().await;

    assert_eq!(message, "User registered successfully");
    assert_eq!(session.phase(), SessionPhase::Anonymous);
    assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
}

#[tokio::test]
async fn rejected_register_propagates_message_without_touching_session() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/auth/register")
        .with_status(409)
        .with_header("content-type", "application/json")
        .with_body(json!({"message": "Username already taken"}).to_string())
        .create_async()
        .await;

    let store = memory_store(&[("token", "t1"), ("user", ALICE_JSON)]);
    let session = session_against(&server, store.clone());
    assert_eq!(session.phase(), SessionPhase::Authenticated);

    let fields = RegisterRequest {
        username: "alice".into(),
        email: "a@x.com".into(),
        password: "secret".into(),
        first_name: None,
        last_name: None,
    };
    let err = session.register(&fields).await.unwrap_err();
    assert_eq!(err.to_string(), "Username already taken");

    // Still signed in as before.
    assert_eq!(session.phase(), SessionPhase::Authenticated);
    assert_eq!(store.get(TOKEN_KEY).unwrap().as_deref(), Some("t1"));
}

/// Store whose reads work but whose writes and removals fail, to check
/// that logout stays silent about storage trouble.
struct BrokenStore {
    inner: Mutex<std::collections::HashMap<String, String>>,
}

impl BrokenStore {
    fn seeded() -> Self {
        let mut map = std::collections::HashMap::new();
        map.insert("token".to_string(), "t1".to_string());
        map.insert("user".to_string(), ALICE_JSON.to_string());
        Self {
            inner: Mutex::new(map),
        }
    }

    fn failure(key: &str) -> StorageError {
        StorageError::Keyring {
            key: key.to_string(),
            message: "backend unavailable".into(),
        }
    }
}

impl CredentialStore for BrokenStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.inner.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, _value: &str) -> Result<(), StorageError> {
        Err(Self::failure(key))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        Err(Self::failure(key))
    }
}

#[tokio::test]
async fn logout_swallows_storage_clear_errors() {
    let server = mockito::Server::new_async().await;
    let store = Arc::new(BrokenStore::seeded());
    let api = Arc::new(ApiClient::new(&server.url(), store.clone()));
    let session = SessionStore::new(api, store);

    assert_eq!(session.bootstrap(), SessionPhase::Authenticated);

    // The clear fails underneath; the caller never sees it.
    session.logout();
    assert_eq!(session.phase(), SessionPhase::Anonymous);
    assert_eq!(session.current().token, None);
}

/// Store that cannot even be read.
struct UnreadableStore;

impl CredentialStore for UnreadableStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Keyring {
            key: key.to_string(),
            message: "backend unavailable".into(),
        })
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Ok(())
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Ok(())
    }
}

#[tokio::test]
async fn unreadable_storage_bootstraps_anonymous() {
    let server = mockito::Server::new_async().await;
    let store = Arc::new(UnreadableStore);
    let api = Arc::new(ApiClient::new(&server.url(), store.clone()));
    let session = SessionStore::new(api, store);

    assert_eq!(session.bootstrap(), SessionPhase::Anonymous);
    assert!(!session.current().is_loading);
}

mod bootstrap_properties {
    use super::*;
    use proptest::prelude::*;

    fn bootstrap_with(token: Option<&str>, user: Option<&str>) -> SessionPhase {
        let mut entries = Vec::new();
        if let Some(t) = token {
            entries.push(("token", t));
        }
        if let Some(u) = user {
            entries.push(("user", u));
        }
        let store = memory_store(&entries);
        let api = Arc::new(ApiClient::new("http://localhost:9", store.clone()));
        let session = SessionStore::new(api, store);
        session.bootstrap()
    }

    proptest! {
        // Authenticated exactly when both keys are present and the user
        // record deserializes; every other storage state is Anonymous.
        #[test]
        fn bootstrap_matches_storage_contents(
            token in proptest::option::of("[A-Za-z0-9._-]{1,24}"),
            user in proptest::option::of(prop_oneof![
                Just(ALICE_JSON.to_string()),
                "[ -~]{0,40}",
            ]),
        ) {
            let expect_authenticated = token.is_some()
                && user
                    .as_deref()
                    .is_some_and(|u| serde_json::from_str::<User>(u).is_ok());

            let phase = bootstrap_with(token.as_deref(), user.as_deref());
            if expect_authenticated {
                prop_assert_eq!(phase, SessionPhase::Authenticated);
            } else {
                prop_assert_eq!(phase, SessionPhase::Anonymous);
            }
        }
    }
}
