//! Field-level merge primitives for cascading protection policies.
//!
//! Every policy field is optional: `None` means "not specified at this scope,
//! inherit from the parent". How a value defined at *both* scopes combines is
//! decided by the field's type through the [`Inherit`] trait:
//!
//! - scalars (`bool`, `u32`): the child replaces the parent;
//! - name sets ([`StringSet`]) use [`union`]: parent and child accumulate;
//! - records (`ContextPolicy`, `Restrictions`, `ReviewPolicy`) merge field by field.
//!
//! A new policy field therefore picks up the right behaviour from its type
//! rather than from whoever writes the merge code.
//!
//! # Examples
//!
//! ```rust
//! use branch_protection::merger::inherit;
//! use branch_protection::StringSet;
//!
//! assert_eq!(inherit(&Some(true), &None), Some(true));
//! assert_eq!(inherit(&Some(true), &Some(false)), Some(false));
//!
//! let parent = Some(StringSet::from_iter(["lint"]));
//! let child = Some(StringSet::from_iter(["unit", "lint"]));
//! let merged = inherit(&parent, &child).unwrap();
//! assert_eq!(merged.to_vec(), vec!["lint", "unit"]);
//! ```
//!
//! All functions here are pure and total.

use crate::policy::StringSet;

#[cfg(test)]
#[path = "merger_tests.rs"]
mod tests;

/// A value that can be inherited from a parent scope.
pub trait Inherit: Clone {
    /// Combines a value specified at both the parent and the child scope.
    fn combine(parent: &Self, child: &Self) -> Self;
}

/// Merges an optional parent value with an optional child value.
///
/// Returns the other side whole when one side is absent, and defers to
/// [`Inherit::combine`] when both are present.
pub fn inherit<T: Inherit>(parent: &Option<T>, child: &Option<T>) -> Option<T> {
    match (parent, child) {
        (_, None) => parent.clone(),
        (None, Some(child)) => Some(child.clone()),
        (Some(parent), Some(child)) => Some(T::combine(parent, child)),
    }
}

/// Returns the deduplicated union of two name sets in canonical (sorted) order.
pub fn union(parent: &StringSet, child: &StringSet) -> StringSet {
    parent.iter().chain(child.iter()).cloned().collect()
}

macro_rules! child_wins {
    ($($ty:ty),*) => {
        $(
            impl Inherit for $ty {
                fn combine(_parent: &Self, child: &Self) -> Self {
                    *child
                }
            }
        )*
    };
}

child_wins!(bool, u32);

impl Inherit for StringSet {
    fn combine(parent: &Self, child: &Self) -> Self {
        union(parent, child)
    }
}
