//! Seed the database from a YAML file.
//!
//! The file is validated and every order's totals are computed before
//! anything is written. With `--dry-run` nothing is written at all.

use std::path::Path;

use tracing::info;

use northwind_admin::AppError;
use northwind_admin::config::AdminConfig;
use northwind_admin::db;
use northwind_admin::seed::{SeedFile, seed};

/// Seed from `file_path`, or only check it when `dry_run` is set.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is invalid, configuration
/// is missing, or a database write fails.
pub async fn run(file_path: &Path, dry_run: bool) -> Result<(), AppError> {
    info!(path = %file_path.display(), "Loading seed file");
    let file = SeedFile::from_path(file_path).await?;

    let previews = file.preview()?;
    for preview in &previews {
        info!(
            customer = %preview.customer,
            order_date = %preview.order_date,
            subtotal = %preview.totals.subtotal,
            total = %preview.totals.total,
            "Order preview"
        );
    }
    info!(orders = previews.len(), "Seed file validated");

    if dry_run {
        info!("Dry run, nothing written");
        return Ok(());
    }

    let config = AdminConfig::from_env()?;
    let pool = db::create_pool(&config.database_url, config.max_connections).await?;
    info!("Connected to database");

    let summary = seed(&pool, &file).await?;
    info!(
        districts = summary.districts,
        categories = summary.categories,
        shippers = summary.shippers,
        products = summary.products,
        customers = summary.customers,
        orders = summary.orders,
        order_details = summary.order_details,
        "Seeding complete"
    );
    Ok(())
}
