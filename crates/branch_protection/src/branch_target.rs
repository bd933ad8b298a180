//! Resolution target.
//!
//! A [`BranchTarget`] names the `(org, repo, branch)` triple a policy is
//! resolved for. It is displayed as `org/repo=branch` in diagnostics.
//!
//! # Examples
//!
//! ```
//! use branch_protection::BranchTarget;
//!
//! let target = BranchTarget::new("k8s", "test-infra", "main");
//! assert_eq!(target.org(), "k8s");
//! assert_eq!(target.repo_key(), "k8s/test-infra");
//! assert_eq!(target.to_string(), "k8s/test-infra=main");
//! ```

use std::fmt;

#[cfg(test)]
#[path = "branch_target_tests.rs"]
mod tests;

/// The organization, repository and branch a policy is resolved for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BranchTarget {
    org: String,
    repo: String,
    branch: String,
}

impl BranchTarget {
    pub fn new(org: impl Into<String>, repo: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            org: org.into(),
            repo: repo.into(),
            branch: branch.into(),
        }
    }

    pub fn org(&self) -> &str {
        &self.org
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Returns the `org/repo` key used by the presubmit table.
    pub fn repo_key(&self) -> String {
        format!("{}/{}", self.org, self.repo)
    }
}

impl fmt::Display for BranchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}={}", self.org, self.repo, self.branch)
    }
}
