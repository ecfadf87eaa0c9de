//! Loading the role/action table from configuration.
//!
//! Without a configured file the built-in table from
//! [`ActionPolicy::default`] applies.

use std::path::{Path, PathBuf};

use thiserror::Error;

use northwind_core::{ActionPolicy, PolicyError, PolicyFile};

/// Errors raised while loading a policy file.
#[derive(Debug, Error)]
pub enum PolicyLoadError {
    /// The file could not be read.
    #[error("failed to read policy file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid YAML for a policy.
    #[error("invalid policy YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The file parsed but describes an invalid table.
    #[error(transparent)]
    Policy(#[from] PolicyError),
}

/// Parse a policy from YAML text.
///
/// # Errors
///
/// Returns `PolicyLoadError::Yaml` for malformed YAML and
/// `PolicyLoadError::Policy` for unknown action names.
pub fn parse_policy(yaml: &str) -> Result<ActionPolicy, PolicyLoadError> {
    let file: PolicyFile = serde_yaml::from_str(yaml)?;
    Ok(ActionPolicy::try_from(file)?)
}

/// Load the policy from `path`, or the built-in table when `path` is `None`.
///
/// # Errors
///
/// Returns `PolicyLoadError` if the file cannot be read or parsed.
pub fn load_policy(path: Option<&Path>) -> Result<ActionPolicy, PolicyLoadError> {
    let Some(path) = path else {
        tracing::debug!("Using built-in action policy");
        return Ok(ActionPolicy::default());
    };

    let yaml = std::fs::read_to_string(path).map_err(|source| PolicyLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let policy = parse_policy(&yaml)?;

    tracing::info!(path = %path.display(), roles = policy.roles().len(), "Loaded action policy");
    Ok(policy)
}
