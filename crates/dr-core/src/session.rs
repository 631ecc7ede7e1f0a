//! State owned by one bot instance and shared by its message handlers.

use std::sync::{Arc, Mutex, PoisonError};

use crate::error::{RelayError, RelayResult};
use crate::evaluator::TableFetcher;
use crate::policy::SessionPolicy;
use crate::secret::SecretStore;
use crate::table::TableRegistry;

/// Suppression policy, secret results, custom tables and the admin password.
///
/// Each shared structure has its own lock; none is held across an await.
pub struct Session {
    policy: Mutex<SessionPolicy>,
    secrets: SecretStore,
    tables: TableRegistry,
    password: String,
}

impl Session {
    /// Create a session with the default policy and empty stores.
    pub fn new(password: impl Into<String>, fetcher: Arc<dyn TableFetcher>) -> Self {
        Self {
            policy: Mutex::new(SessionPolicy::default()),
            secrets: SecretStore::new(),
            tables: TableRegistry::new(fetcher),
            password: password.into(),
        }
    }

    /// Snapshot of the current policy.
    pub fn policy(&self) -> SessionPolicy {
        self.policy
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the policy.
    pub fn set_policy(&self, policy: SessionPolicy) {
        *self.policy.lock().unwrap_or_else(PoisonError::into_inner) = policy;
    }

    /// Secret result store.
    pub fn secrets(&self) -> &SecretStore {
        &self.secrets
    }

    /// Custom table registry.
    pub fn tables(&self) -> &TableRegistry {
        &self.tables
    }

    /// Compare `candidate` with the admin password.
    pub fn check_password(&self, candidate: &str) -> RelayResult<()> {
        if candidate == self.password {
            Ok(())
        } else {
            Err(RelayError::PasswordMismatch)
        }
    }
}
