//! # HabitKit Core Library
//!
//! Client-side core for the HabitKit habit tracker. All business logic
//! lives in the remote API; this library is the state-synchronization
//! layer the presentation surfaces (CLI today, GUI tomorrow) sit on.
//!
//! ## Architecture
//!
//! - **Session Store**: owns the authenticated identity and bearer token,
//!   restores them at startup, and persists every transition
//! - **Storage**: flat key-value credential stores (OS keyring, JSON file,
//!   in-memory) plus TOML-based configuration
//! - **API Gateway Client**: typed reqwest client that attaches the bearer
//!   token -- read fresh from storage on every call -- and signals the
//!   session store when the server rejects it
//! - **Models**: passive wire types for users, habits, friendships,
//!   notifications, and competitions
//!
//! ## Key Components
//!
//! - [`SessionStore`]: session lifecycle state machine
//! - [`ApiClient`]: gateway client and resource surfaces
//! - [`Config`]: application configuration management
//! - [`CredentialStore`]: persistence seam for token and identity

pub mod api;
pub mod error;
pub mod models;
pub mod session;
pub mod storage;

pub use api::ApiClient;
pub use error::{ApiError, ConfigError, CoreError, SessionError, StorageError};
pub use session::{Session, SessionEvent, SessionPhase, SessionStore};
pub use storage::{Config, CredentialStore, FileStore, KeyringStore, MemoryStore};
