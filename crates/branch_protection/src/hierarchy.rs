//! The four-level branch protection hierarchy.
//!
//! Protection is configured at four fixed scopes, each holding a [`Policy`]:
//!
//! 1. **Global** ([`BranchProtectionConfig`]) - defaults for every managed org
//! 2. **Org** ([`OrgConfig`]) - overrides for one organization
//! 3. **Repo** ([`RepoConfig`]) - overrides for one repository
//! 4. **Branch** ([`BranchConfig`]) - overrides for one branch
//!
//! The `get_*` accessors return a copy of the child scope whose policy has the
//! parent policy merged in. A scope that is not listed inherits the parent
//! policy unchanged.
//!
//! # TOML Format
//!
//! ```toml
//! protect = true
//! protect-tested-repos = true
//!
//! [orgs.k8s]
//! enforce_admins = true
//!
//! [orgs.k8s.repos.test-infra.required_status_checks]
//! contexts = ["lint"]
//!
//! [orgs.k8s.repos.test-infra.branches.main]
//! protect = true
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{ConfigurationError, ConfigurationResult, ScopeLevel};
use crate::policy::Policy;

#[cfg(test)]
#[path = "hierarchy_tests.rs"]
mod tests;

/// Global branch protection configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchProtectionConfig {
    /// Policy applied to every managed organization.
    #[serde(flatten)]
    pub policy: Policy,

    /// Enable protection automatically on branches with required presubmit contexts.
    #[serde(default, rename = "protect-tested-repos")]
    pub protect_tested: bool,

    /// Organizations under protection management.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub orgs: BTreeMap<String, OrgConfig>,

    /// Accept `protect: false` alongside other settings, dropping the settings
    /// with a warning instead of rejecting the policy.
    #[serde(default)]
    pub allow_disabled_policies: bool,
}

impl BranchProtectionConfig {
    /// Returns `true` if the organization is explicitly listed.
    pub fn is_managed(&self, org: &str) -> bool {
        self.orgs.contains_key(org)
    }

    /// Returns the org configuration with the global policy merged in.
    ///
    /// An unlisted org yields the global policy with no repositories.
    pub fn get_org(&self, name: &str) -> OrgConfig {
        match self.orgs.get(name) {
            Some(org) => OrgConfig {
                policy: self.policy.apply(&org.policy),
                repos: org.repos.clone(),
            },
            None => OrgConfig {
                policy: self.policy.clone(),
                repos: BTreeMap::new(),
            },
        }
    }
}

/// Protection policy for an organization and its repository overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgConfig {
    #[serde(flatten)]
    pub policy: Policy,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub repos: BTreeMap<String, RepoConfig>,
}

impl OrgConfig {
    /// Returns the repo configuration with the org policy merged in.
    pub fn get_repo(&self, name: &str) -> RepoConfig {
        match self.repos.get(name) {
            Some(repo) => RepoConfig {
                policy: self.policy.apply(&repo.policy),
                branches: repo.branches.clone(),
            },
            None => RepoConfig {
                policy: self.policy.clone(),
                branches: BTreeMap::new(),
            },
        }
    }
}

/// Protection policy for a repository and its branch overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoConfig {
    #[serde(flatten)]
    pub policy: Policy,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub branches: BTreeMap<String, BranchConfig>,
}

impl RepoConfig {
    /// Returns the branch configuration with the repo policy merged in.
    ///
    /// # Errors
    ///
    /// An explicitly listed branch must end up with a `protect` value after
    /// merging; otherwise `ScopeResolutionFailed` is returned at branch level.
    pub fn get_branch(&self, name: &str) -> ConfigurationResult<BranchConfig> {
        match self.branches.get(name) {
            Some(branch) => {
                let policy = self.policy.apply(&branch.policy);
                if policy.protect.is_none() {
                    return Err(ConfigurationError::at_level(
                        ScopeLevel::Branch,
                        "defined branch policies must set protect",
                    ));
                }
                Ok(BranchConfig { policy })
            }
            None => Ok(BranchConfig {
                policy: self.policy.clone(),
            }),
        }
    }
}

/// Protection policy overrides for a single branch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchConfig {
    #[serde(flatten)]
    pub policy: Policy,
}
