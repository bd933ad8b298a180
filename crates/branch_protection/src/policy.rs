//! Branch protection policy model.
//!
//! A [`Policy`] is the unit of configuration at every scope of the hierarchy
//! (global, org, repo and branch). Each field is optional and `None` means
//! "inherit from the parent scope". An explicit `false`, `0` or empty set is a
//! real setting and is never confused with absence.
//!
//! # TOML Format
//!
//! ```toml
//! protect = true
//! enforce_admins = false
//!
//! [required_status_checks]
//! contexts = ["lint", "unit"]
//! strict = true
//!
//! [restrictions]
//! users = ["octocat"]
//! teams = ["maintainers"]
//!
//! [required_pull_request_reviews]
//! dismiss_stale_reviews = true
//! require_code_owner_reviews = true
//! required_approving_review_count = 2
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::merger::{inherit, Inherit};

#[cfg(test)]
#[path = "policy_tests.rs"]
mod tests;

/// An ordered set of names (status contexts, users or teams).
///
/// Merging two sets produces their union. Iteration is always in sorted
/// order, so resolved policies are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StringSet(BTreeSet<String>);

impl StringSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    /// Iterates the names in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    /// Returns the names as a sorted vector.
    pub fn to_vec(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for StringSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        StringSet(iter.into_iter().map(Into::into).collect())
    }
}

impl IntoIterator for StringSet {
    type Item = String;
    type IntoIter = std::collections::btree_set::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Required status checks.
///
/// Contexts accumulate down the hierarchy, `strict` is overridden.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextPolicy {
    /// Contexts that must be green before a change can merge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contexts: Option<StringSet>,

    /// Whether new commits on the base branch require the pull request to be updated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,
}

impl Inherit for ContextPolicy {
    fn combine(parent: &Self, child: &Self) -> Self {
        ContextPolicy {
            contexts: inherit(&parent.contexts, &child.contexts),
            strict: inherit(&parent.strict, &child.strict),
        }
    }
}

/// Users and teams allowed to push to or bypass a protected branch.
///
/// Both lists accumulate down the hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restrictions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users: Option<StringSet>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teams: Option<StringSet>,
}

impl Inherit for Restrictions {
    fn combine(parent: &Self, child: &Self) -> Self {
        Restrictions {
            users: inherit(&parent.users, &child.users),
            teams: inherit(&parent.teams, &child.teams),
        }
    }
}

/// Pull request review requirements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewPolicy {
    /// Users and teams allowed to dismiss reviews.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dismissal_restrictions: Option<Restrictions>,

    /// Whether new commits automatically dismiss earlier approvals.
    #[serde(
        default,
        rename = "dismiss_stale_reviews",
        skip_serializing_if = "Option::is_none"
    )]
    pub dismiss_stale: Option<bool>,

    /// Whether code owners must approve.
    #[serde(
        default,
        rename = "require_code_owner_reviews",
        skip_serializing_if = "Option::is_none"
    )]
    pub require_owners: Option<bool>,

    /// Number of approvals required. Zero disables the requirement.
    #[serde(
        default,
        rename = "required_approving_review_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub approvals: Option<u32>,
}

impl Inherit for ReviewPolicy {
    fn combine(parent: &Self, child: &Self) -> Self {
        ReviewPolicy {
            dismissal_restrictions: inherit(
                &parent.dismissal_restrictions,
                &child.dismissal_restrictions,
            ),
            dismiss_stale: inherit(&parent.dismiss_stale, &child.dismiss_stale),
            require_owners: inherit(&parent.require_owners, &child.require_owners),
            approvals: inherit(&parent.approvals, &child.approvals),
        }
    }
}

/// Protection settings for one scope of the hierarchy.
///
/// # Examples
///
/// ```rust
/// use branch_protection::{ContextPolicy, Policy, StringSet};
///
/// let org = Policy {
///     protect: Some(true),
///     ..Default::default()
/// };
/// let repo = Policy {
///     required_status_checks: Some(ContextPolicy {
///         contexts: Some(StringSet::from_iter(["lint"])),
///         strict: None,
///     }),
///     ..Default::default()
/// };
///
/// let effective = org.apply(&repo);
/// assert_eq!(effective.protect, Some(true));
/// assert!(effective.required_status_checks.is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    /// Whether branch protection is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protect: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_status_checks: Option<ContextPolicy>,

    /// Whether the rules also bind repository administrators.
    #[serde(
        default,
        rename = "enforce_admins",
        skip_serializing_if = "Option::is_none"
    )]
    pub admins: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restrictions: Option<Restrictions>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_pull_request_reviews: Option<ReviewPolicy>,
}

impl Policy {
    /// Returns `true` if at least one field is specified.
    pub fn is_defined(&self) -> bool {
        self.protect.is_some()
            || self.required_status_checks.is_some()
            || self.admins.is_some()
            || self.restrictions.is_some()
            || self.required_pull_request_reviews.is_some()
    }

    /// Returns the policy obtained by merging `child` into `self`.
    ///
    /// Fields set by the child win, unset fields are inherited and name sets
    /// are unioned.
    pub fn apply(&self, child: &Policy) -> Policy {
        Policy {
            protect: inherit(&self.protect, &child.protect),
            required_status_checks: inherit(
                &self.required_status_checks,
                &child.required_status_checks,
            ),
            admins: inherit(&self.admins, &child.admins),
            restrictions: inherit(&self.restrictions, &child.restrictions),
            required_pull_request_reviews: inherit(
                &self.required_pull_request_reviews,
                &child.required_pull_request_reviews,
            ),
        }
    }

    /// Returns the required status contexts, if any are configured.
    pub fn required_contexts(&self) -> Option<&StringSet> {
        self.required_status_checks
            .as_ref()
            .and_then(|checks| checks.contexts.as_ref())
    }
}
