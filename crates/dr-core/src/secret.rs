//! Per-user stacking of secret roll results.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};

use crate::error::{RelayError, RelayResult};

/// One stacked batch of outbound fragments.
#[derive(Debug, Clone)]
pub struct SecretEntry {
    /// The fragments as they were delivered privately.
    pub fragments: Vec<String>,
    /// When the batch was stacked.
    pub saved_at: DateTime<Utc>,
}

/// Append-only store of secret results, keyed by user id.
///
/// Indices are 1-based and equal the length of the user's log right after
/// the save; they are never reused. Entries live as long as the store.
#[derive(Debug, Default)]
pub struct SecretStore {
    entries: Mutex<HashMap<String, Vec<SecretEntry>>>,
}

impl SecretStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stack `fragments` for `user` and return the new 1-based index.
    pub fn save(&self, user: &str, fragments: Vec<String>) -> usize {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let log = entries.entry(user.to_string()).or_default();
        log.push(SecretEntry {
            fragments,
            saved_at: Utc::now(),
        });
        log.len()
    }

    /// Fetch the batch stacked under `index` for `user`.
    pub fn load(&self, user: &str, index: usize) -> RelayResult<Vec<String>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        index
            .checked_sub(1)
            .and_then(|i| entries.get(user)?.get(i))
            .map(|entry| entry.fragments.clone())
            .ok_or_else(|| RelayError::NotFound(format!("Not found (index = {index})")))
    }

    /// Number of batches stacked for `user`.
    pub fn count(&self, user: &str) -> usize {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.get(user).map_or(0, Vec::len)
    }
}
