//! Order totals commands.
//!
//! # Environment Variables
//!
//! - `NORTHWIND_DATABASE_URL` - `PostgreSQL` connection string (or `DATABASE_URL`)

use tracing::info;

use northwind_admin::AppError;
use northwind_admin::config::AdminConfig;
use northwind_admin::db::{self, OrderRepository};
use northwind_admin::services::order_totals;
use northwind_core::{
    InMemoryLedger, OrderId, OrderInput, OrderRef, OrderTotalCalculator, OrderTotals,
    PartialOrderRow,
};

/// Log the subtotal and total of a stored order.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the order does not exist, or an error if
/// configuration is missing or the database is unreachable.
pub async fn totals(id: OrderId) -> Result<(), AppError> {
    let config = AdminConfig::from_env()?;
    let pool = db::create_pool(&config.database_url, config.max_connections).await?;
    let repo = OrderRepository::new(&pool);

    let order = repo
        .get_with_totals(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;

    log_totals(Some(id), &order.totals);
    Ok(())
}

/// Log totals for a partial row given as JSON.
///
/// Rows that reference no order are computed in memory; otherwise the
/// database is consulted for the order's lines and freight.
///
/// # Errors
///
/// Returns `AppError::BadRequest` for malformed JSON, or an error if the
/// database is needed and unreachable.
pub async fn preview(json: &str) -> Result<(), AppError> {
    let row: PartialOrderRow = serde_json::from_str(json)
        .map_err(|e| AppError::BadRequest(format!("invalid order row: {e}")))?;
    let input = OrderInput::from(row);

    let totals = match input.reference {
        OrderRef::Unresolved => {
            OrderTotalCalculator::new(&InMemoryLedger::default()).compute_totals(&input)
        }
        OrderRef::ById(_) | OrderRef::ByNestedOrder(_) => {
            let config = AdminConfig::from_env()?;
            let pool = db::create_pool(&config.database_url, config.max_connections).await?;
            order_totals(&pool, &input).await?
        }
    };

    log_totals(input.reference.order_id(), &totals);
    Ok(())
}

fn log_totals(order_id: Option<OrderId>, totals: &OrderTotals) {
    info!(
        order_id = ?order_id.map(|id| id.as_i32()),
        subtotal = %totals.subtotal,
        total = %totals.total,
        "Order totals"
    );
}
