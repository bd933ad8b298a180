//! Snapshot validation result types.
//!
//! Validation walks every explicitly configured branch of a snapshot and
//! records each failure instead of stopping at the first one.
//!
//! # Examples
//!
//! ```rust
//! use branch_protection::{ValidationError, ValidationResult};
//!
//! let mut result = ValidationResult::new();
//! assert!(result.is_valid());
//!
//! result.add_error(ValidationError {
//!     field_path: "orgs.k8s.repos.test-infra.branches.main".to_string(),
//!     message: "branch: defined branch policies must set protect".to_string(),
//! });
//!
//! assert!(!result.is_valid());
//! ```

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;

/// Result of validating a configuration snapshot.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    /// Blocking issues.
    pub errors: Vec<ValidationError>,
    /// Non-blocking issues.
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if validation passed (no errors).
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// A configuration entry that failed to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dot-separated path to the offending entry.
    pub field_path: String,
    pub message: String,
}

/// A configuration entry that resolves but is probably not what was intended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    pub field_path: String,
    pub message: String,
}
