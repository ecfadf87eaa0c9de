//! Integration tests for Northwind Admin.
//!
//! # Running Tests
//!
//! ```bash
//! # Tests that need no database
//! cargo test -p northwind-integration-tests
//!
//! # Repository tests against a scratch database (schema created on demand)
//! NORTHWIND_TEST_DATABASE_URL=postgres://localhost/northwind_test \
//!     cargo test -p northwind-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `order_totals` - Calculator over in-memory ledgers and partial rows
//! - `action_policy` - Built-in and YAML-configured role/action tables
//! - `grid_views` - Field flags per table and mode
//! - `seed_preview` - The bundled seed file and its derived totals
//! - `repositories` - `PostgreSQL` round trips and seed rollback (ignored by default)

use std::path::PathBuf;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use secrecy::SecretString;
use sqlx::PgPool;

use northwind_core::{InMemoryLedger, OrderId, OrderLine};

/// Order 10248 of the classic Northwind data set.
pub const ORDER_10248: OrderId = OrderId::new(10248);

/// Stored freight of order 10248.
pub const ORDER_10248_FREIGHT: Decimal = dec!(32.38);

/// A ledger holding order 10248 with its three lines (subtotal 440.00).
#[must_use]
pub fn northwind_ledger() -> InMemoryLedger {
    let mut ledger = InMemoryLedger::default();
    ledger.insert_order(ORDER_10248, Some(ORDER_10248_FREIGHT));
    ledger.add_line(ORDER_10248, OrderLine::new(dec!(14.00), 12));
    ledger.add_line(ORDER_10248, OrderLine::new(dec!(9.80), 10));
    ledger.add_line(ORDER_10248, OrderLine::new(dec!(34.80), 5));
    ledger
}

/// Path of the seed file shipped with the repository.
#[must_use]
pub fn sample_seed_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data/northwind.yaml")
}

/// Tables used by the repositories, created if missing.
const SCHEMA: &str = include_str!("../fixtures/schema.sql");

/// Connect to the scratch database named by `NORTHWIND_TEST_DATABASE_URL`
/// and make sure the schema exists.
///
/// # Panics
///
/// Panics if the variable is unset, the database is unreachable or the schema
/// cannot be applied.
pub async fn test_pool() -> PgPool {
    let url = std::env::var("NORTHWIND_TEST_DATABASE_URL")
        .expect("NORTHWIND_TEST_DATABASE_URL must be set for database tests");
    let pool = northwind_admin::db::create_pool(&SecretString::from(url), 2)
        .await
        .expect("Failed to connect to test database");
    sqlx::raw_sql(SCHEMA)
        .execute(&pool)
        .await
        .expect("Failed to apply test schema");
    pool
}
