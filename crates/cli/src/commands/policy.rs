//! Role/action policy commands.
//!
//! # Environment Variables
//!
//! - `NORTHWIND_POLICY_FILE` - YAML role/action table (default: built-in table)

use tracing::info;

use northwind_admin::AppError;
use northwind_admin::config::policy_file_from_env;
use northwind_admin::policy::load_policy;
use northwind_core::{ActionPolicy, GridAction, RoleId, RowActions};

fn configured_policy() -> Result<ActionPolicy, AppError> {
    Ok(load_policy(policy_file_from_env().as_deref())?)
}

/// Log whether `role` may perform `action` on a row with the given title.
///
/// # Errors
///
/// Returns an error if the configured policy file cannot be loaded.
pub fn check(action: GridAction, role: u8, title: Option<&str>) -> Result<(), AppError> {
    let policy = configured_policy()?;
    let role = RoleId::new(role);

    info!(
        %action,
        %role,
        role_name = policy.role_name(role).unwrap_or("-"),
        title = title.unwrap_or("-"),
        allowed = policy.allows_row(action, role, title),
        "Policy check"
    );
    Ok(())
}

/// Log the role x action matrix for every configured role.
///
/// # Errors
///
/// Returns an error if the configured policy file cannot be loaded.
pub fn table() -> Result<(), AppError> {
    let policy = configured_policy()?;

    for role in policy.roles() {
        let row = RowActions::for_row(&policy, role, None);
        info!(
            %role,
            role_name = policy.role_name(role).unwrap_or("-"),
            create = policy.allows(GridAction::Create, role),
            details = policy.allows(GridAction::Details, role),
            editable = policy.allows(GridAction::Editable, role),
            deletable = policy.allows(GridAction::Deletable, role),
            untitled_row = ?row,
            "Role actions"
        );
    }

    for action in GridAction::ALL {
        if let Some(titles) = policy.row_titles(action) {
            info!(%action, ?titles, "Row title restriction");
        }
    }
    Ok(())
}
