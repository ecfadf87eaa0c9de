//! Database operations for the Northwind `PostgreSQL` schema.
//!
//! # Tables
//!
//! - `district` - Sales districts
//! - `customer` - Customers, optionally assigned to a district
//! - `customer_note` - Timestamped notes about a customer
//! - `shipper` - Shipping companies
//! - `category` - Product categories
//! - `product` - Products with their current list price
//! - `"order"` - Orders (freight stored, subtotal/total derived)
//! - `order_detail` - Order lines with a snapshotted unit price
//!
//! The schema itself is managed outside this crate.

pub mod catalog;
pub mod customers;
pub mod districts;
pub mod order_details;
pub mod orders;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use northwind_core::models::ValidationError;

pub use catalog::{CategoryRepository, ProductRepository, ShipperRepository};
pub use customers::{CustomerNoteRepository, CustomerRepository};
pub use districts::DistrictRepository;
pub use order_details::OrderDetailRepository;
pub use orders::OrderRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., a missing referenced row).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// Input rejected by its validator before reaching the database.
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),
}

impl RepositoryError {
    /// Map a write error, turning unique and foreign-key violations into
    /// `Conflict` with the given message.
    pub(crate) fn from_write(err: sqlx::Error, message: &str) -> Self {
        let conflict = match &err {
            sqlx::Error::Database(db_err)
                if db_err.is_unique_violation() || db_err.is_foreign_key_violation() =>
            {
                Some(format!("{message}: {}", db_err.message()))
            }
            _ => None,
        };
        conflict.map_or(Self::Database(err), Self::Conflict)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
/// * `max_connections` - Upper bound on pooled connections
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(
    database_url: &secrecy::SecretString,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(max_connections.min(2))
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_constraint_errors_stay_database_errors() {
        let err = RepositoryError::from_write(sqlx::Error::RowNotFound, "order");
        assert!(matches!(err, RepositoryError::Database(_)));
    }

    #[test]
    fn test_validation_error_converts() {
        let err = RepositoryError::from(ValidationError::Required { field: "name" });
        assert!(matches!(
            err,
            RepositoryError::Validation(ValidationError::Required { field: "name" })
        ));
        assert_eq!(err.to_string(), "invalid input: name cannot be empty");
    }

    #[test]
    fn test_repository_error_display() {
        assert_eq!(RepositoryError::NotFound.to_string(), "not found");
        assert_eq!(
            RepositoryError::Conflict("product 77 does not exist".to_string()).to_string(),
            "constraint violation: product 77 does not exist"
        );
    }
}
