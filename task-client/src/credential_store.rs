// task-client/src/credential_store.rs
use common::models::credential::Credential;
use std::sync::Arc;

use crate::storage::LocalStorage;

// The whole credential lives under one key so it is written and removed as a unit
const SESSION_KEY: &str = "session";

/// Owner of the persisted session credential.
///
/// Only the session guard writes through this store; everyone else reads a
/// fresh copy when they need it and drops it before the next await.
pub struct CredentialStore {
    storage: Arc<LocalStorage>,
}

impl CredentialStore {
    pub fn new(storage: Arc<LocalStorage>) -> Self {
        Self { storage }
    }

    /// Current credential, or `None` when the slot is empty or unreadable
    pub fn get(&self) -> Option<Credential> {
        let raw = self.storage.get_item(SESSION_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(credential) => Some(credential),
            Err(e) => {
                tracing::warn!("Stored session is unreadable, treating as absent: {}", e);
                None
            }
        }
    }

    pub fn is_present(&self) -> bool {
        self.get().is_some()
    }

    pub(crate) fn set(&self, credential: &Credential) {
        match serde_json::to_string(credential) {
            Ok(raw) => self.storage.set_item(SESSION_KEY, raw),
            Err(e) => tracing::error!("Failed to serialize session credential: {}", e),
        }
    }

    /// Returns whether a credential was present
    pub(crate) fn clear(&self) -> bool {
        self.storage.remove_item(SESSION_KEY)
    }
}
