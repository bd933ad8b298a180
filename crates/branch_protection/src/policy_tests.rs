//! Tests for the policy model.

use super::*;

fn contexts(names: &[&str]) -> Option<ContextPolicy> {
    Some(ContextPolicy {
        contexts: Some(names.iter().copied().collect()),
        strict: None,
    })
}

#[test]
fn default_policy_is_not_defined() {
    assert!(!Policy::default().is_defined());
}

#[test]
fn explicit_false_protect_is_defined() {
    let policy = Policy {
        protect: Some(false),
        ..Default::default()
    };
    assert!(policy.is_defined());
}

#[test]
fn any_single_field_makes_policy_defined() {
    let policies = [
        Policy {
            required_status_checks: Some(ContextPolicy::default()),
            ..Default::default()
        },
        Policy {
            admins: Some(false),
            ..Default::default()
        },
        Policy {
            restrictions: Some(Restrictions::default()),
            ..Default::default()
        },
        Policy {
            required_pull_request_reviews: Some(ReviewPolicy::default()),
            ..Default::default()
        },
    ];

    for policy in policies {
        assert!(policy.is_defined(), "{policy:?} should be defined");
    }
}

#[test]
fn apply_child_scalar_overrides_parent() {
    let parent = Policy {
        protect: Some(true),
        admins: Some(true),
        ..Default::default()
    };
    let child = Policy {
        admins: Some(false),
        ..Default::default()
    };

    let merged = parent.apply(&child);

    assert_eq!(merged.protect, Some(true));
    assert_eq!(merged.admins, Some(false));
}

#[test]
fn apply_unions_required_contexts() {
    let parent = Policy {
        required_status_checks: contexts(&["lint", "cla"]),
        ..Default::default()
    };
    let child = Policy {
        required_status_checks: contexts(&["unit", "lint"]),
        ..Default::default()
    };

    let merged = parent.apply(&child);

    assert_eq!(
        merged.required_contexts().map(StringSet::to_vec),
        Some(vec![
            "cla".to_string(),
            "lint".to_string(),
            "unit".to_string()
        ])
    );
}

#[test]
fn apply_keeps_parent_record_when_child_omits_it() {
    let parent = Policy {
        restrictions: Some(Restrictions {
            users: Some(StringSet::from_iter(["alice"])),
            teams: None,
        }),
        ..Default::default()
    };

    let merged = parent.apply(&Policy::default());

    assert_eq!(merged, parent);
}

#[test]
fn apply_merges_review_policy_field_by_field() {
    let parent = Policy {
        required_pull_request_reviews: Some(ReviewPolicy {
            dismissal_restrictions: Some(Restrictions {
                users: Some(StringSet::from_iter(["alice"])),
                teams: Some(StringSet::from_iter(["admins"])),
            }),
            dismiss_stale: Some(true),
            require_owners: Some(false),
            approvals: Some(2),
        }),
        ..Default::default()
    };
    let child = Policy {
        required_pull_request_reviews: Some(ReviewPolicy {
            dismissal_restrictions: Some(Restrictions {
                users: Some(StringSet::from_iter(["bob"])),
                teams: None,
            }),
            require_owners: Some(true),
            approvals: Some(0),
            ..Default::default()
        }),
        ..Default::default()
    };

    let reviews = parent
        .apply(&child)
        .required_pull_request_reviews
        .expect("reviews should be present");

    let dismissal = reviews
        .dismissal_restrictions
        .expect("dismissal restrictions should be present");
    assert_eq!(
        dismissal.users.map(|u| u.to_vec()),
        Some(vec!["alice".to_string(), "bob".to_string()])
    );
    assert_eq!(
        dismissal.teams.map(|t| t.to_vec()),
        Some(vec!["admins".to_string()])
    );
    assert_eq!(reviews.dismiss_stale, Some(true));
    assert_eq!(reviews.require_owners, Some(true));
    // zero is an explicit setting, not "inherit"
    assert_eq!(reviews.approvals, Some(0));
}

#[test]
fn explicit_empty_set_is_kept_distinct_from_absent() {
    let parent = Policy::default();
    let child = Policy {
        restrictions: Some(Restrictions {
            users: Some(StringSet::new()),
            teams: Some(StringSet::new()),
        }),
        ..Default::default()
    };

    let merged = parent.apply(&child);
    let restrictions = merged.restrictions.expect("restrictions should be set");
    assert_eq!(restrictions.users, Some(StringSet::new()));
    assert_eq!(restrictions.teams, Some(StringSet::new()));
}

#[test]
fn deserialize_uses_configuration_field_names() {
    let toml = r#"
        protect = true
        enforce_admins = false

        [required_status_checks]
        contexts = ["unit", "lint", "unit"]
        strict = true

        [restrictions]
        users = []
        teams = ["maintainers"]

        [required_pull_request_reviews]
        dismiss_stale_reviews = true
        require_code_owner_reviews = false
        required_approving_review_count = 1

        [required_pull_request_reviews.dismissal_restrictions]
        users = ["alice"]
    "#;

    let policy: Policy = toml::from_str(toml).expect("Failed to deserialize");

    assert_eq!(policy.protect, Some(true));
    assert_eq!(policy.admins, Some(false));
    let checks = policy.required_status_checks.expect("checks");
    assert_eq!(
        checks.contexts.map(|c| c.to_vec()),
        Some(vec!["lint".to_string(), "unit".to_string()])
    );
    assert_eq!(checks.strict, Some(true));
    let restrictions = policy.restrictions.expect("restrictions");
    assert_eq!(restrictions.users, Some(StringSet::new()));
    assert!(restrictions.teams.expect("teams").contains("maintainers"));
    let reviews = policy.required_pull_request_reviews.expect("reviews");
    assert_eq!(reviews.dismiss_stale, Some(true));
    assert_eq!(reviews.require_owners, Some(false));
    assert_eq!(reviews.approvals, Some(1));
    assert!(reviews.dismissal_restrictions.is_some());
}

#[test]
fn missing_fields_deserialize_as_absent() {
    let policy: Policy = toml::from_str("").expect("Failed to deserialize");
    assert_eq!(policy, Policy::default());
}

#[test]
fn serialize_omits_absent_fields() {
    let policy = Policy {
        protect: Some(true),
        required_status_checks: contexts(&["unit"]),
        ..Default::default()
    };

    let json = serde_json::to_value(&policy).expect("Failed to serialize");

    assert_eq!(
        json,
        serde_json::json!({
            "protect": true,
            "required_status_checks": { "contexts": ["unit"] }
        })
    );
}
