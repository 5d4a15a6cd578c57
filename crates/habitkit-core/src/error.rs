//! Core error types for habitkit-core.
//!
//! This module defines the error hierarchy using thiserror: one umbrella
//! [`CoreError`] plus domain-specific enums for storage, configuration,
//! the API gateway, and the session store.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for habitkit-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Credential-storage errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// API gateway errors
    #[error("{0}")]
    Api(#[from] ApiError),

    /// Session lifecycle errors
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Credential-storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// OS keyring access failed
    #[error("Keyring access failed for '{key}': {message}")]
    Keyring { key: String, message: String },

    /// File-backed store could not be read
    #[error("Failed to read credential file {path}: {message}")]
    ReadFailed { path: PathBuf, message: String },

    /// File-backed store could not be written
    #[error("Failed to write credential file {path}: {message}")]
    WriteFailed { path: PathBuf, message: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// API gateway errors.
///
/// `Status` carries the server's `message` field verbatim so the caller can
/// surface it to the user unchanged.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport-level failure (DNS, connect, TLS, body read)
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response from the server
    #[error("{message}")]
    Status { status: u16, message: String },

    /// Bearer token rejected; the session has been evicted
    #[error("{message}")]
    Unauthorized { message: String },

    /// Response body did not match the expected shape
    #[error("Unexpected response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
}

/// Session lifecycle errors.
#[derive(Error, Debug)]
pub enum SessionError {
    /// A newer login was issued while this one was in flight; its
    /// response was discarded and no state was changed.
    #[error("Login superseded by a newer attempt")]
    Superseded,

    /// Operation requires an authenticated session
    #[error("Not signed in")]
    NotAuthenticated,
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
