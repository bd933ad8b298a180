//! Effective branch protection resolution.
//!
//! Resolution walks global → org → repo → branch, merging the policy at each
//! step, then folds in the contexts of presubmit jobs that gate merging and
//! checks the result for contradictions.
//!
//! # Outcomes
//!
//! | Outcome                 | [`ConfigurationSnapshot::get_branch_protection`] |
//! |-------------------------|--------------------------------------------------|
//! | org not listed          | `Ok(None)`                                       |
//! | nothing configured      | `Ok(None)`                                       |
//! | effective policy        | `Ok(Some(policy))`                               |
//! | contradictory settings  | `Err(ConfigurationError)`                        |
//!
//! [`ConfigurationSnapshot::resolve`] reports the two `Ok(None)` cases
//! separately through [`ResolvedProtection`].
//!
//! # Finalizing
//!
//! 1. If presubmit jobs require contexts on the branch, `protect: false` is an
//!    error. Otherwise the contexts are added to the required status checks
//!    and, when `protect-tested-repos` is set, `protect` becomes `true`.
//! 2. If `protect` is `false` and anything else is set, the policy is rejected,
//!    unless `allow_disabled_policies` is set, in which case every other
//!    setting is dropped with a warning.
//! 3. A policy with no field set resolves to "no policy".

use tracing::{debug, instrument, warn};

use crate::branch_target::BranchTarget;
use crate::errors::{ConfigurationError, ConfigurationResult};
use crate::hierarchy::BranchProtectionConfig;
use crate::policy::{ContextPolicy, Policy};
use crate::presubmit::branch_requirements;
use crate::snapshot::ConfigurationSnapshot;

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;

/// Outcome of resolving the protection of one branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedProtection {
    /// The organization is not under protection management.
    NotManaged,
    /// The organization is managed but no setting applies to the branch.
    NoPolicy,
    /// The effective policy to apply.
    Policy(Policy),
}

impl ResolvedProtection {
    /// Returns the effective policy, if any.
    pub fn into_policy(self) -> Option<Policy> {
        match self {
            ResolvedProtection::Policy(policy) => Some(policy),
            ResolvedProtection::NotManaged | ResolvedProtection::NoPolicy => None,
        }
    }
}

impl BranchProtectionConfig {
    /// Folds derived required contexts into a cascaded branch policy and
    /// validates the result.
    ///
    /// Returns `Ok(None)` when no setting is defined.
    ///
    /// # Errors
    ///
    /// - `ProtectionRequiredByChecks` if contexts are required but `protect` is `false`
    /// - `DisabledPolicyDefined` if `protect` is `false` alongside other settings
    ///   and `allow_disabled_policies` is not set
    pub fn finalize(
        &self,
        target: &BranchTarget,
        policy: Policy,
        required_contexts: &[String],
    ) -> ConfigurationResult<Option<Policy>> {
        let mut policy = policy;

        if !required_contexts.is_empty() {
            if policy.protect == Some(false) {
                return Err(ConfigurationError::ProtectionRequiredByChecks {
                    org: target.org().to_string(),
                    repo: target.repo().to_string(),
                    branch: target.branch().to_string(),
                });
            }
            let derived = Policy {
                protect: self.protect_tested.then_some(true),
                required_status_checks: Some(ContextPolicy {
                    contexts: Some(required_contexts.iter().cloned().collect()),
                    strict: None,
                }),
                ..Default::default()
            };
            debug!(
                contexts = ?required_contexts,
                protect_tested = self.protect_tested,
                "Adding required presubmit contexts"
            );
            policy = policy.apply(&derived);
        }

        if policy.protect == Some(false) {
            let settings = Policy {
                protect: None,
                ..policy.clone()
            };
            if settings.is_defined() {
                if !self.allow_disabled_policies {
                    return Err(ConfigurationError::DisabledPolicyDefined {
                        org: target.org().to_string(),
                        repo: target.repo().to_string(),
                        branch: target.branch().to_string(),
                    });
                }
                warn!("{target} defines a policy but has protect: false");
                policy = Policy {
                    protect: Some(false),
                    ..Default::default()
                };
            }
        }

        if !policy.is_defined() {
            return Ok(None);
        }
        Ok(Some(policy))
    }
}

impl ConfigurationSnapshot {
    /// Returns the effective protection policy for a branch.
    ///
    /// `Ok(None)` means the organization is not managed or that nothing is
    /// configured for the branch; use [`Self::resolve`] to tell them apart.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` when the configured scopes contradict
    /// each other or the derived presubmit requirements.
    pub fn get_branch_protection(
        &self,
        org: &str,
        repo: &str,
        branch: &str,
    ) -> ConfigurationResult<Option<Policy>> {
        self.resolve(org, repo, branch)
            .map(ResolvedProtection::into_policy)
    }

    /// Resolves the protection of a branch, distinguishing every outcome.
    #[instrument(skip(self), level = "debug")]
    pub fn resolve(
        &self,
        org: &str,
        repo: &str,
        branch: &str,
    ) -> ConfigurationResult<ResolvedProtection> {
        if !self.branch_protection.is_managed(org) {
            debug!("Organization is not under branch protection management");
            return Ok(ResolvedProtection::NotManaged);
        }

        let branch_config = self
            .branch_protection
            .get_org(org)
            .get_repo(repo)
            .get_branch(branch)?;

        let target = BranchTarget::new(org, repo, branch);
        let resolved = self.get_policy(&target, branch_config.policy)?;
        Ok(match resolved {
            Some(policy) => ResolvedProtection::Policy(policy),
            None => ResolvedProtection::NoPolicy,
        })
    }

    /// Finalizes a cascaded branch policy against the presubmit job table.
    pub fn get_policy(
        &self,
        target: &BranchTarget,
        policy: Policy,
    ) -> ConfigurationResult<Option<Policy>> {
        let (required, _) = self.branch_requirements(target.org(), target.repo(), target.branch());
        self.branch_protection.finalize(target, policy, &required)
    }

    /// Returns the required and optional presubmit contexts for a branch.
    pub fn branch_requirements(
        &self,
        org: &str,
        repo: &str,
        branch: &str,
    ) -> (Vec<String>, Vec<String>) {
        branch_requirements(org, repo, branch, &self.presubmits)
    }
}
