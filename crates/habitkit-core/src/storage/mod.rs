mod config;
mod file;
mod keyring;
mod memory;

pub use config::{ApiConfig, Config, StorageConfig};
pub use file::FileStore;
pub use keyring::KeyringStore;
pub use memory::MemoryStore;

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{Result, StorageError};

/// Storage key holding the raw bearer token string.
pub const TOKEN_KEY: &str = "token";

/// Storage key holding the JSON-serialized user identity.
pub const USER_KEY: &str = "user";

/// Flat, string-keyed credential storage local to the device.
///
/// Reads of an absent key yield `Ok(None)` and removing an absent key
/// succeeds, so callers never need to special-case first use.
pub trait CredentialStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Returns `~/.config/habitkit[-dev]/` based on HABITKIT_ENV.
///
/// Set HABITKIT_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("HABITKIT_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("habitkit-dev")
    } else {
        base_dir.join("habitkit")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Pick a credential store backend.
///
/// `HABITKIT_CREDENTIALS=file` forces the file-backed store regardless of
/// `preference` (useful on headless machines without a keyring daemon);
/// otherwise `preference` is the configured backend name.
pub fn select_store(preference: &str) -> Result<Arc<dyn CredentialStore>> {
    let choice = std::env::var("HABITKIT_CREDENTIALS").unwrap_or_else(|_| preference.to_string());
    if choice == "file" {
        Ok(Arc::new(FileStore::new(data_dir()?)))
    } else {
        Ok(Arc::new(KeyringStore::new()))
    }
}
