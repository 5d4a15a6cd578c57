//! OS keyring credential store.

use crate::error::StorageError;
use crate::storage::CredentialStore;

const SERVICE: &str = "habitkit";

/// Credential store backed by the OS keyring (Keychain, Credential
/// Manager, Secret Service).
pub struct KeyringStore;

impl KeyringStore {
    pub fn new() -> Self {
        Self
    }

    fn entry(key: &str) -> Result<keyring::Entry, StorageError> {
        keyring::Entry::new(SERVICE, key).map_err(|e| StorageError::Keyring {
            key: key.to_string(),
            message: e.to_string(),
        })
    }
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for KeyringStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match Self::entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(StorageError::Keyring {
                key: key.to_string(),
                message: e.to_string(),
            }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::entry(key)?
            .set_password(value)
            .map_err(|e| StorageError::Keyring {
                key: key.to_string(),
                message: e.to_string(),
            })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match Self::entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(StorageError::Keyring {
                key: key.to_string(),
                message: e.to_string(),
            }),
        }
    }
}
