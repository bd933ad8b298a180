//! Process-wide configuration snapshot store.
//!
//! The store holds the current [`ConfigurationSnapshot`] behind an `Arc` and
//! swaps it wholesale on reload. Callers take a snapshot handle with
//! [`SnapshotStore::current`] and resolve against it; a concurrent reload never
//! changes data under a running resolution.
//!
//! # Examples
//!
//! ```rust
//! use branch_protection::SnapshotStore;
//!
//! let store = SnapshotStore::from_toml(
//!     r#"
//!     [branch_protection.orgs.k8s]
//!     protect = true
//!     "#,
//! )?;
//!
//! let policy = store.get_branch_protection("k8s", "test-infra", "main")?;
//! assert_eq!(policy.and_then(|p| p.protect), Some(true));
//! # Ok::<(), branch_protection::ConfigurationError>(())
//! ```

use std::sync::{Arc, PoisonError, RwLock};

use tracing::{info, warn};

use crate::errors::{ConfigurationError, ConfigurationResult};
use crate::policy::Policy;
use crate::snapshot::ConfigurationSnapshot;

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;

/// Shared, atomically replaceable configuration snapshot.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    current: RwLock<Arc<ConfigurationSnapshot>>,
}

impl SnapshotStore {
    pub fn new(snapshot: ConfigurationSnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    /// Creates a store from a TOML document, validating it first.
    pub fn from_toml(input: &str) -> ConfigurationResult<Self> {
        Ok(Self::new(load_validated(input)?))
    }

    /// Returns a handle to the current snapshot.
    pub fn current(&self) -> Arc<ConfigurationSnapshot> {
        // The lock only guards an Arc swap, so a poisoned lock still holds a whole snapshot.
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the current snapshot.
    pub fn replace(&self, snapshot: ConfigurationSnapshot) {
        let mut current = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *current = Arc::new(snapshot);
    }

    /// Parses and validates a TOML document, then makes it the current snapshot.
    ///
    /// # Errors
    ///
    /// Returns the parse or validation error and keeps the previous snapshot.
    pub fn reload_from_toml(&self, input: &str) -> ConfigurationResult<()> {
        match load_validated(input) {
            Ok(snapshot) => {
                info!(
                    orgs = snapshot.branch_protection.orgs.len(),
                    "Reloaded branch protection configuration"
                );
                self.replace(snapshot);
                Ok(())
            }
            Err(e) => {
                warn!("Keeping previous branch protection configuration: {}", e);
                Err(e)
            }
        }
    }

    /// Resolves a branch against the current snapshot.
    pub fn get_branch_protection(
        &self,
        org: &str,
        repo: &str,
        branch: &str,
    ) -> ConfigurationResult<Option<Policy>> {
        self.current().get_branch_protection(org, repo, branch)
    }

    /// Returns the presubmit requirements of a branch from the current snapshot.
    pub fn branch_requirements(
        &self,
        org: &str,
        repo: &str,
        branch: &str,
    ) -> (Vec<String>, Vec<String>) {
        self.current().branch_requirements(org, repo, branch)
    }
}

fn load_validated(input: &str) -> ConfigurationResult<ConfigurationSnapshot> {
    let snapshot = ConfigurationSnapshot::from_toml(input)?;
    let result = snapshot.validate();
    for warning in &result.warnings {
        warn!("{}: {}", warning.field_path, warning.message);
    }
    if !result.is_valid() {
        return Err(ConfigurationError::ValidationFailed {
            error_count: result.errors.len(),
            errors: result.errors,
        });
    }
    Ok(snapshot)
}
