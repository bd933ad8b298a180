//! Hierarchical branch protection policy resolution.
//!
//! Computes the effective branch protection of an `(org, repo, branch)`
//! triple by cascading policies through the global, org, repo and branch
//! scopes, then folding in the status contexts of presubmit jobs that gate
//! merging.
//!
//! # Examples
//!
//! ```rust
//! use branch_protection::ConfigurationSnapshot;
//!
//! let snapshot = ConfigurationSnapshot::from_toml(
//!     r#"
//!     [branch_protection]
//!     protect-tested-repos = true
//!
//!     [branch_protection.orgs.k8s.repos.test-infra.required_status_checks]
//!     contexts = ["lint"]
//!
//!     [[presubmits."k8s/test-infra"]]
//!     name = "unit"
//!     always_run = true
//!     "#,
//! )?;
//!
//! let policy = snapshot
//!     .get_branch_protection("k8s", "test-infra", "main")?
//!     .expect("k8s is managed");
//! assert_eq!(policy.protect, Some(true));
//! assert_eq!(
//!     policy.required_contexts().map(|c| c.to_vec()),
//!     Some(vec!["lint".to_string(), "unit".to_string()])
//! );
//! # Ok::<(), branch_protection::ConfigurationError>(())
//! ```

// Policy model and merge primitives
pub mod merger;
pub mod policy;

// Scope hierarchy
pub mod hierarchy;

// Presubmit job table
pub mod presubmit;

// Resolution
pub mod branch_target;
pub mod errors;
pub mod resolver;
pub mod snapshot;
pub mod store;
pub mod validator;


pub use branch_target::BranchTarget;
pub use errors::{ConfigurationError, ConfigurationResult, ScopeLevel};
pub use hierarchy::{BranchConfig, BranchProtectionConfig, OrgConfig, RepoConfig};
pub use merger::Inherit;
pub use policy::{ContextPolicy, Policy, Restrictions, ReviewPolicy, StringSet};
pub use presubmit::{branch_requirements, Brancher, Presubmit, PresubmitJob};
pub use resolver::ResolvedProtection;
pub use snapshot::ConfigurationSnapshot;
pub use store::SnapshotStore;
pub use validator::{ValidationError, ValidationResult, ValidationWarning};
