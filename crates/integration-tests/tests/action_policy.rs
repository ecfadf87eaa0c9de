//! Integration tests for the role/action policy.
//!
//! Every `(action, role)` pair of the built-in table is checked, then the
//! same table is loaded from YAML the way `NORTHWIND_POLICY_FILE` is.

use std::io::Write;

use northwind_admin::policy::{PolicyLoadError, load_policy, parse_policy};
use northwind_core::{ActionPolicy, GridAction, RoleId, RowActions};

const BUILT_IN_YAML: &str = "\
roles:
  1: admin
  2: sales
  3: viewer
actions:
  create: [1, 2]
  details: [1, 2, 3]
  editable: [1, 2]
  deletable: [1]
";

fn expected(action: GridAction, role: u8) -> bool {
    match action {
        GridAction::Create | GridAction::Editable => matches!(role, 1 | 2),
        GridAction::Details => matches!(role, 1..=3),
        GridAction::Deletable => role == 1,
    }
}

// =============================================================================
// Built-in Table
// =============================================================================

#[test]
fn test_built_in_table_every_pair() {
    let policy = ActionPolicy::default();

    for action in GridAction::ALL {
        for role in 0..=u8::MAX {
            assert_eq!(
                policy.allows(action, RoleId::new(role)),
                expected(action, role),
                "{action} for role {role}"
            );
        }
    }
}

#[test]
fn test_built_in_row_actions() {
    let policy = ActionPolicy::default();

    let viewer = RowActions::for_row(&policy, RoleId::new(3), Some("Owner"));
    assert_eq!(
        viewer,
        RowActions {
            details: true,
            editable: false,
            deletable: false,
        }
    );

    let unknown = RowActions::for_row(&policy, RoleId::new(9), None);
    assert_eq!(unknown, RowActions::default());
}

// =============================================================================
// YAML Configuration
// =============================================================================

#[test]
fn test_yaml_matches_built_in_table() {
    let parsed = parse_policy(BUILT_IN_YAML).expect("valid policy");
    assert_eq!(parsed, ActionPolicy::default());
}

#[test]
fn test_load_policy_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(
        file,
        "{BUILT_IN_YAML}row_titles:\n  deletable: [\"Owner\", \"Sales Manager\"]\n"
    )
    .expect("write policy");

    let policy = load_policy(Some(file.path())).expect("load policy");
    let admin = RoleId::new(1);

    assert!(policy.allows_row(GridAction::Deletable, admin, Some("Owner")));
    assert!(policy.allows_row(GridAction::Deletable, admin, Some("Sales Manager")));
    assert!(!policy.allows_row(GridAction::Deletable, admin, Some("owner")));
    assert!(!policy.allows_row(GridAction::Deletable, admin, None));
    // Other actions stay unrestricted
    assert!(policy.allows_row(GridAction::Editable, admin, None));
}

#[test]
fn test_load_policy_without_path_is_built_in() {
    let policy = load_policy(None).expect("built-in policy");
    assert_eq!(policy, ActionPolicy::default());
    assert_eq!(policy.role_name(RoleId::new(2)), Some("sales"));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let result = load_policy(Some(&dir.path().join("missing.yaml")));
    assert!(matches!(result, Err(PolicyLoadError::Io { .. })));
}

#[test]
fn test_unknown_action_is_rejected() {
    let result = parse_policy("actions:\n  archive: [1]\n");
    assert!(matches!(result, Err(PolicyLoadError::Policy(_))));
}

#[test]
fn test_action_missing_from_file_denies_everyone() {
    let policy = parse_policy("actions:\n  details: [1, 2, 3]\n").expect("valid policy");

    for role in 0..=u8::MAX {
        assert!(!policy.allows(GridAction::Create, RoleId::new(role)));
        assert!(!policy.allows(GridAction::Deletable, RoleId::new(role)));
    }
}
