//! Branch protection configuration error types.
//!
//! Domain-specific errors for loading a configuration snapshot, cascading
//! policies through the org/repo/branch hierarchy and finalizing the
//! effective policy of a branch.

use std::fmt;
use thiserror::Error;

use crate::validator::ValidationError;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// A level of the protection hierarchy.
///
/// Used to label resolution failures so that a message identifies which
/// scope's data was invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScopeLevel {
    Global,
    Org,
    Repo,
    Branch,
}

impl fmt::Display for ScopeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ScopeLevel::Global => "global",
            ScopeLevel::Org => "org",
            ScopeLevel::Repo => "repo",
            ScopeLevel::Branch => "branch",
        };
        f.write_str(label)
    }
}

/// Branch protection configuration errors.
///
/// "Org not managed" and "no policy configured" are not errors; they are
/// reported through [`crate::ResolvedProtection`] or `Ok(None)` instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("Failed to parse configuration: {reason}")]
    ParseError { reason: String },

    #[error("Invalid configuration: {field} - {reason}")]
    InvalidConfiguration { field: String, reason: String },

    /// An explicitly configured scope resolved to a contradictory state.
    #[error("{level}: {reason}")]
    ScopeResolutionFailed { level: ScopeLevel, reason: String },

    /// Required presubmit contexts exist for a branch whose protection is explicitly disabled.
    #[error("{org}/{repo}={branch}: required checks demand protection, cannot disable it")]
    ProtectionRequiredByChecks {
        org: String,
        repo: String,
        branch: String,
    },

    /// The policy sets `protect: false` together with other settings.
    #[error("{org}/{repo}={branch} defines a policy, which requires protect: true")]
    DisabledPolicyDefined {
        org: String,
        repo: String,
        branch: String,
    },

    #[error("Configuration validation failed with {error_count} error(s)")]
    ValidationFailed {
        error_count: usize,
        errors: Vec<ValidationError>,
    },
}

impl ConfigurationError {
    /// Creates a [`ConfigurationError::ScopeResolutionFailed`] for the given level.
    pub fn at_level(level: ScopeLevel, reason: impl Into<String>) -> Self {
        ConfigurationError::ScopeResolutionFailed {
            level,
            reason: reason.into(),
        }
    }
}

/// Result type alias for branch protection operations.
pub type ConfigurationResult<T> = Result<T, ConfigurationError>;
