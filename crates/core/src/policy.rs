//! Role-based visibility of grid actions.
//!
//! The policy is a fixed lookup table from [`GridAction`] to the set of roles
//! allowed to perform it. Checks are pure functions of `(action, role)` plus,
//! optionally, the `title` field of the row being rendered, so every
//! combination can be tested exhaustively.
//!
//! The table is plain configuration. [`PolicyFile`] is its serialized form:
//!
//! ```yaml
//! roles:
//!   1: admin
//!   2: sales
//!   3: viewer
//! actions:
//!   create: [1, 2]
//!   details: [1, 2, 3]
//!   editable: [1, 2]
//!   deletable: [1]
//! row_titles:
//!   deletable: ["Owner"]
//! ```

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::types::{GridAction, ParseActionError, RoleId};

/// Errors raised while building an [`ActionPolicy`] from configuration.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    /// An action key is not one of the four grid actions.
    #[error("unknown action in policy: {0}")]
    UnknownAction(#[from] ParseActionError),

    /// A title restriction references an action with no allowed roles.
    #[error("row titles configured for {0}, which no role may perform")]
    TitlesWithoutRoles(GridAction),
}

/// Serialized form of an [`ActionPolicy`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyFile {
    /// Human-readable names for role IDs, used only for display.
    #[serde(default)]
    pub roles: BTreeMap<u8, String>,
    /// Allowed role IDs per action name.
    #[serde(default)]
    pub actions: BTreeMap<String, Vec<u8>>,
    /// Optional per-action restriction on the row's `title` field.
    #[serde(default)]
    pub row_titles: BTreeMap<String, Vec<String>>,
}

/// Lookup table deciding which roles may perform which grid actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionPolicy {
    allowed: BTreeMap<GridAction, BTreeSet<RoleId>>,
    row_titles: BTreeMap<GridAction, BTreeSet<String>>,
    role_names: BTreeMap<RoleId, String>,
}

impl ActionPolicy {
    /// Build a policy from explicit role lists, without title restrictions.
    #[must_use]
    pub fn new<I, R>(table: I) -> Self
    where
        I: IntoIterator<Item = (GridAction, R)>,
        R: IntoIterator<Item = RoleId>,
    {
        let allowed = table
            .into_iter()
            .map(|(action, roles)| (action, roles.into_iter().collect()))
            .collect();

        Self {
            allowed,
            row_titles: BTreeMap::new(),
            role_names: BTreeMap::new(),
        }
    }

    /// Restrict a row action to rows whose `title` is one of `titles`.
    #[must_use]
    pub fn with_row_titles<T>(mut self, action: GridAction, titles: T) -> Self
    where
        T: IntoIterator,
        T::Item: Into<String>,
    {
        self.row_titles
            .insert(action, titles.into_iter().map(Into::into).collect());
        self
    }

    /// Attach a display name to a role.
    #[must_use]
    pub fn with_role_name(mut self, role: RoleId, name: impl Into<String>) -> Self {
        self.role_names.insert(role, name.into());
        self
    }

    /// Whether `role` may perform `action`.
    ///
    /// Roles not listed for the action, and actions with no entry at all,
    /// yield `false`.
    #[must_use]
    pub fn allows(&self, action: GridAction, role: RoleId) -> bool {
        self.allowed
            .get(&action)
            .is_some_and(|roles| roles.contains(&role))
    }

    /// Whether `role` may perform `action` on a row with the given `title`.
    ///
    /// When the action carries a title restriction, the row's title must match
    /// one of the configured titles exactly; a row without a title never does.
    #[must_use]
    pub fn allows_row(&self, action: GridAction, role: RoleId, title: Option<&str>) -> bool {
        if !self.allows(action, role) {
            return false;
        }

        match self.row_titles.get(&action) {
            None => true,
            Some(titles) => title.is_some_and(|t| titles.contains(t)),
        }
    }

    /// Every role that appears in the table or has a display name.
    #[must_use]
    pub fn roles(&self) -> BTreeSet<RoleId> {
        self.allowed
            .values()
            .flatten()
            .copied()
            .chain(self.role_names.keys().copied())
            .collect()
    }

    /// Display name of a role, if one is configured.
    #[must_use]
    pub fn role_name(&self, role: RoleId) -> Option<&str> {
        self.role_names.get(&role).map(String::as_str)
    }

    /// Title restriction for an action, if any.
    #[must_use]
    pub fn row_titles(&self, action: GridAction) -> Option<&BTreeSet<String>> {
        self.row_titles.get(&action)
    }
}

impl Default for ActionPolicy {
    /// The built-in table: admins (1) do everything, sales (2) everything
    /// but delete, viewers (3) only open details.
    fn default() -> Self {
        let admin = RoleId::new(1);
        let sales = RoleId::new(2);
        let viewer = RoleId::new(3);

        Self::new([
            (GridAction::Create, vec![admin, sales]),
            (GridAction::Details, vec![admin, sales, viewer]),
            (GridAction::Editable, vec![admin, sales]),
            (GridAction::Deletable, vec![admin]),
        ])
        .with_role_name(admin, "admin")
        .with_role_name(sales, "sales")
        .with_role_name(viewer, "viewer")
    }
}

impl TryFrom<PolicyFile> for ActionPolicy {
    type Error = PolicyError;

    fn try_from(file: PolicyFile) -> Result<Self, Self::Error> {
        let mut allowed = BTreeMap::new();
        for (name, roles) in file.actions {
            let action: GridAction = name.parse()?;
            allowed.insert(action, roles.into_iter().map(RoleId::new).collect());
        }

        let mut row_titles = BTreeMap::new();
        for (name, titles) in file.row_titles {
            let action: GridAction = name.parse()?;
            if !allowed.contains_key(&action) {
                return Err(PolicyError::TitlesWithoutRoles(action));
            }
            row_titles.insert(action, titles.into_iter().collect());
        }

        let role_names = file
            .roles
            .into_iter()
            .map(|(id, name)| (RoleId::new(id), name))
            .collect();

        Ok(Self {
            allowed,
            row_titles,
            role_names,
        })
    }
}

/// Per-row action flags for a grid row.
///
/// `create` is not here: it belongs to the grid, not to a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RowActions {
    /// Show the details button.
    pub details: bool,
    /// Show the edit button.
    pub editable: bool,
    /// Show the delete button.
    pub deletable: bool,
}

impl RowActions {
    /// Evaluate the row actions for one row.
    #[must_use]
    pub fn for_row(policy: &ActionPolicy, role: RoleId, title: Option<&str>) -> Self {
        Self {
            details: policy.allows_row(GridAction::Details, role, title),
            editable: policy.allows_row(GridAction::Editable, role, title),
            deletable: policy.allows_row(GridAction::Deletable, role, title),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const ALL_ROLES: [u8; 5] = [0, 1, 2, 3, 4];

    #[test]
    fn test_default_table_exhaustively() {
        let policy = ActionPolicy::default();
        let expected: [(GridAction, &[u8]); 4] = [
            (GridAction::Create, &[1, 2]),
            (GridAction::Details, &[1, 2, 3]),
            (GridAction::Editable, &[1, 2]),
            (GridAction::Deletable, &[1]),
        ];

        for (action, allowed) in expected {
            for role in ALL_ROLES {
                assert_eq!(
                    policy.allows(action, RoleId::new(role)),
                    allowed.contains(&role),
                    "{action} for role {role}"
                );
            }
        }
    }

    #[test]
    fn test_missing_action_denies_everyone() {
        let policy = ActionPolicy::new([(GridAction::Details, vec![RoleId::new(1)])]);
        for role in ALL_ROLES {
            assert!(!policy.allows(GridAction::Deletable, RoleId::new(role)));
        }
    }

    #[test]
    fn test_row_titles_restrict_only_their_action() {
        let policy = ActionPolicy::default().with_row_titles(GridAction::Deletable, ["Owner"]);
        let admin = RoleId::new(1);

        assert!(policy.allows_row(GridAction::Deletable, admin, Some("Owner")));
        assert!(!policy.allows_row(GridAction::Deletable, admin, Some("Sales Agent")));
        assert!(!policy.allows_row(GridAction::Deletable, admin, None));
        assert!(policy.allows_row(GridAction::Editable, admin, None));
    }

    #[test]
    fn test_row_titles_do_not_grant_roles() {
        let policy = ActionPolicy::default().with_row_titles(GridAction::Deletable, ["Owner"]);
        assert!(!policy.allows_row(GridAction::Deletable, RoleId::new(2), Some("Owner")));
    }

    #[test]
    fn test_row_actions_for_viewer() {
        let actions = RowActions::for_row(&ActionPolicy::default(), RoleId::new(3), None);
        assert_eq!(
            actions,
            RowActions {
                details: true,
                editable: false,
                deletable: false,
            }
        );
    }

    #[test]
    fn test_policy_file_conversion() {
        let file: PolicyFile = serde_json::from_str(
            r#"{
                "roles": {"1": "manager", "7": "auditor"},
                "actions": {"details": [1, 7], "deletable": [1]},
                "row_titles": {"deletable": ["Owner", "Sales Manager"]}
            }"#,
        )
        .unwrap();
        let policy = ActionPolicy::try_from(file).unwrap();

        assert!(policy.allows(GridAction::Details, RoleId::new(7)));
        assert!(!policy.allows(GridAction::Create, RoleId::new(1)));
        assert!(policy.allows_row(GridAction::Deletable, RoleId::new(1), Some("Sales Manager")));
        assert_eq!(policy.role_name(RoleId::new(7)), Some("auditor"));
        assert_eq!(
            policy.roles().into_iter().map(|r| r.as_u8()).collect::<Vec<_>>(),
            vec![1, 7]
        );
    }

    #[test]
    fn test_policy_file_unknown_action() {
        let file = PolicyFile {
            actions: BTreeMap::from([("remove".to_owned(), vec![1])]),
            ..PolicyFile::default()
        };
        assert!(matches!(
            ActionPolicy::try_from(file),
            Err(PolicyError::UnknownAction(_))
        ));
    }

    #[test]
    fn test_policy_file_titles_without_roles() {
        let file = PolicyFile {
            row_titles: BTreeMap::from([("deletable".to_owned(), vec!["Owner".to_owned()])]),
            ..PolicyFile::default()
        };
        assert!(matches!(
            ActionPolicy::try_from(file),
            Err(PolicyError::TitlesWithoutRoles(GridAction::Deletable))
        ));
    }
}
