//! Grid view configuration commands.

use tracing::info;

use northwind_admin::AppError;
use northwind_admin::components::{GridMode, GridTable, ViewConfig};

/// Log the readable and writable fields of `table` in `mode`.
///
/// # Errors
///
/// Returns `AppError::Grid` if the table or mode name is unknown.
pub fn view(table: &str, mode: &str) -> Result<(), AppError> {
    let table: GridTable = table.parse()?;
    let mode: GridMode = mode.parse()?;
    let config = ViewConfig::for_table(table, mode);

    info!(
        %table,
        %mode,
        readable = config.readable().count(),
        writable = config.writable().count(),
        "Grid view"
    );

    for field in &config.fields {
        info!(
            field = field.name,
            label = field.label,
            kind = ?field.kind,
            readable = field.readable,
            writable = field.writable,
            sortable = field.sortable,
            "Field"
        );
    }
    Ok(())
}
