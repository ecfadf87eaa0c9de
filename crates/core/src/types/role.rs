//! Roles and grid row actions.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// A role identifier.
///
/// Roles are small integers assigned by whoever manages accounts; this crate
/// only compares them against the configured [`crate::ActionPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(u8);

impl RoleId {
    /// Create a role ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the underlying integer.
    #[must_use]
    pub const fn as_u8(&self) -> u8 {
        self.0
    }
}

impl From<u8> for RoleId {
    fn from(id: u8) -> Self {
        Self(id)
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An action a grid can offer on its rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridAction {
    /// Add a new row (grid-level button).
    Create,
    /// Open the read-only details view of a row.
    Details,
    /// Edit a row.
    Editable,
    /// Delete a row.
    Deletable,
}

impl GridAction {
    /// Every action, in display order.
    pub const ALL: [Self; 4] = [Self::Create, Self::Details, Self::Editable, Self::Deletable];

    /// The configuration name of this action.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Details => "details",
            Self::Editable => "editable",
            Self::Deletable => "deletable",
        }
    }
}

impl fmt::Display for GridAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when an action name is not one of the four grid actions.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid grid action: {0} (expected create, details, editable or deletable)")]
pub struct ParseActionError(pub String);

impl FromStr for GridAction {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Self::Create),
            "details" => Ok(Self::Details),
            "editable" => Ok(Self::Editable),
            "deletable" => Ok(Self::Deletable),
            other => Err(ParseActionError(other.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_action_names_round_trip_through_from_str() {
        for action in GridAction::ALL {
            assert_eq!(action.as_str().parse::<GridAction>().unwrap(), action);
        }
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        let err = "delete".parse::<GridAction>().unwrap_err();
        assert_eq!(err, ParseActionError("delete".to_owned()));
    }

    #[test]
    fn test_action_serde_matches_config_names() {
        let json = serde_json::to_string(&GridAction::Deletable).unwrap();
        assert_eq!(json, "\"deletable\"");
    }
}
