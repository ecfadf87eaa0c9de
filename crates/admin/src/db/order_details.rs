//! Order detail repository for database operations.
//!
//! The stored `unit_price` of a line is never taken from the caller. Every
//! insert and update copies the referenced product's current price within the
//! same statement. A product that does not exist leaves the price unset and
//! the foreign key rejects the row.

use rust_decimal::Decimal;
use sqlx::{PgExecutor, PgPool};

use northwind_core::models::{NewOrderDetail, OrderDetail};
use northwind_core::{OrderDetailId, OrderId, ProductId};

use super::RepositoryError;

const DETAIL_COLUMNS: &str = "id, order_id, product_id, unit_price, quantity, discount";

/// Internal row type for `PostgreSQL` order detail queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderDetailRow {
    id: i32,
    order_id: Option<i32>,
    product_id: Option<i32>,
    unit_price: Option<Decimal>,
    quantity: Option<i32>,
    discount: Option<Decimal>,
}

impl TryFrom<OrderDetailRow> for OrderDetail {
    type Error = RepositoryError;

    fn try_from(row: OrderDetailRow) -> Result<Self, Self::Error> {
        let (Some(order_id), Some(product_id)) = (row.order_id, row.product_id) else {
            return Err(RepositoryError::DataCorruption(format!(
                "order detail {} is missing its order or product",
                row.id
            )));
        };

        Ok(Self {
            id: OrderDetailId::new(row.id),
            order_id: OrderId::new(order_id),
            product_id: ProductId::new(product_id),
            unit_price: row.unit_price,
            quantity: row.quantity,
            discount: row.discount.unwrap_or(Decimal::ZERO),
        })
    }
}

/// Repository for order detail database operations.
pub struct OrderDetailRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderDetailRepository<'a> {
    /// Create a new order detail repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List the lines of one order in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a line lost its references.
    pub async fn list_for_order(
        &self,
        order_id: OrderId,
    ) -> Result<Vec<OrderDetail>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderDetailRow>(&format!(
            "SELECT {DETAIL_COLUMNS} FROM order_detail WHERE order_id = $1 ORDER BY id"
        ))
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get a line by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the line lost its references.
    pub async fn get(&self, id: OrderDetailId) -> Result<Option<OrderDetail>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderDetailRow>(&format!(
            "SELECT {DETAIL_COLUMNS} FROM order_detail WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Create a line priced at the product's current unit price.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Validation` if the input is invalid.
    /// Returns `RepositoryError::Conflict` if the order or product does not exist.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, input: &NewOrderDetail) -> Result<OrderDetail, RepositoryError> {
        Self::create_in(self.pool, input).await
    }

    /// Like [`Self::create`], on any executor such as an open transaction.
    ///
    /// # Errors
    ///
    /// Same as [`Self::create`].
    pub async fn create_in<'e, E>(
        executor: E,
        input: &NewOrderDetail,
    ) -> Result<OrderDetail, RepositoryError>
    where
        E: PgExecutor<'e>,
    {
        input.validate()?;
        let row = sqlx::query_as::<_, OrderDetailRow>(&format!(
            "INSERT INTO order_detail (order_id, product_id, unit_price, quantity, discount) \
             VALUES ($1, $2, (SELECT unit_price FROM product WHERE id = $2), $3, $4) \
             RETURNING {DETAIL_COLUMNS}"
        ))
        .bind(input.order_id)
        .bind(input.product_id)
        .bind(input.quantity)
        .bind(input.discount)
        .fetch_one(executor)
        .await
        .map_err(|e| RepositoryError::from_write(e, "order detail"))?;

        tracing::debug!(
            order_id = %input.order_id,
            product_id = %input.product_id,
            unit_price = ?row.unit_price,
            "Created order detail"
        );

        row.try_into()
    }

    /// Replace a line, re-pricing it from the (possibly new) product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Validation` if the input is invalid.
    /// Returns `RepositoryError::NotFound` if the line does not exist.
    /// Returns `RepositoryError::Conflict` if the order or product does not exist.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update(
        &self,
        id: OrderDetailId,
        input: &NewOrderDetail,
    ) -> Result<OrderDetail, RepositoryError> {
        input.validate()?;
        let row = sqlx::query_as::<_, OrderDetailRow>(&format!(
            "UPDATE order_detail \
             SET order_id = $2, product_id = $3, \
                 unit_price = (SELECT unit_price FROM product WHERE id = $3), \
                 quantity = $4, discount = $5 \
             WHERE id = $1 \
             RETURNING {DETAIL_COLUMNS}"
        ))
        .bind(id)
        .bind(input.order_id)
        .bind(input.product_id)
        .bind(input.quantity)
        .bind(input.discount)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, "order detail"))?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }

    /// Delete a line.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the line does not exist.
    pub async fn delete(&self, id: OrderDetailId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM order_detail WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
