//! Configuration snapshot.
//!
//! A [`ConfigurationSnapshot`] is one immutable generation of the branch
//! protection hierarchy together with the presubmit job table. Resolution
//! always runs against a single snapshot.
//!
//! # TOML Format
//!
//! ```toml
//! [branch_protection]
//! protect = true
//! protect-tested-repos = true
//!
//! [branch_protection.orgs.k8s.repos.test-infra.branches.main]
//! protect = true
//!
//! [[presubmits."k8s/test-infra"]]
//! name = "pull-test-infra-unit"
//! always_run = true
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::branch_target::BranchTarget;
use crate::errors::{ConfigurationError, ConfigurationResult};
use crate::hierarchy::BranchProtectionConfig;
use crate::presubmit::Presubmit;
use crate::validator::{ValidationError, ValidationResult, ValidationWarning};

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;

/// Branch protection hierarchy plus presubmit job table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationSnapshot {
    #[serde(default)]
    pub branch_protection: BranchProtectionConfig,

    /// Presubmit jobs keyed by `org/repo`.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub presubmits: HashMap<String, Vec<Presubmit>>,
}

impl ConfigurationSnapshot {
    /// Parses a snapshot from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the document is malformed and
    /// `InvalidConfiguration` if the presubmit table holds unusable values.
    pub fn from_toml(input: &str) -> ConfigurationResult<Self> {
        let snapshot: ConfigurationSnapshot =
            toml::from_str(input).map_err(|e| ConfigurationError::ParseError {
                reason: e.to_string(),
            })?;
        snapshot.check_presubmits()?;
        debug!(
            orgs = snapshot.branch_protection.orgs.len(),
            repos_with_presubmits = snapshot.presubmits.len(),
            "Parsed configuration snapshot"
        );
        Ok(snapshot)
    }

    fn check_presubmits(&self) -> ConfigurationResult<()> {
        for (key, jobs) in &self.presubmits {
            match key.split_once('/') {
                Some((org, repo)) if !org.is_empty() && !repo.is_empty() && !repo.contains('/') => {}
                _ => {
                    return Err(ConfigurationError::InvalidConfiguration {
                        field: format!("presubmits.{key}"),
                        reason: "job table keys must have the form org/repo".to_string(),
                    })
                }
            }
            for job in jobs {
                job.validate()?;
            }
        }
        Ok(())
    }

    /// Lists every explicitly configured branch, in sorted order.
    pub fn configured_branches(&self) -> Vec<BranchTarget> {
        let mut targets = Vec::new();
        for (org_name, org) in &self.branch_protection.orgs {
            for (repo_name, repo) in &org.repos {
                for branch_name in repo.branches.keys() {
                    targets.push(BranchTarget::new(org_name, repo_name, branch_name));
                }
            }
        }
        targets
    }

    /// Resolves every explicitly configured branch and collects the failures.
    ///
    /// Presubmit entries for organizations outside protection management are
    /// reported as warnings since their contexts will never be enforced.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();

        for target in self.configured_branches() {
            if let Err(e) =
                self.get_branch_protection(target.org(), target.repo(), target.branch())
            {
                result.add_error(ValidationError {
                    field_path: format!(
                        "orgs.{}.repos.{}.branches.{}",
                        target.org(),
                        target.repo(),
                        target.branch()
                    ),
                    message: e.to_string(),
                });
            }
        }

        let mut keys: Vec<&String> = self.presubmits.keys().collect();
        keys.sort();
        for key in keys {
            let org = key.split('/').next().unwrap_or_default();
            if !self.branch_protection.is_managed(org) {
                result.add_warning(ValidationWarning {
                    field_path: format!("presubmits.{key}"),
                    message: format!(
                        "organization '{org}' is not under branch protection management"
                    ),
                });
            }
        }

        result
    }
}
