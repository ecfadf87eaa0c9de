//! Order repository for database operations.
//!
//! `subtotal` and `total` are not columns. [`OrderRepository::totals`] and
//! [`OrderRepository::get_with_totals`] derive them on read from a snapshot of
//! the order's detail lines.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{PgExecutor, PgPool};

use northwind_core::models::{NewOrder, Order, OrderWithTotals, ShipTo};
use northwind_core::{CustomerId, OrderId, OrderInput, OrderRef, OrderTotals, ShipperId};

use super::RepositoryError;
use crate::services::totals::{OrderSnapshot, order_totals};

const ORDER_COLUMNS: &str = "id, customer_id, order_date, required_date, shipped_date, \
     shipper_id, freight, ship_to_name, ship_to_address, ship_to_city, ship_to_state, \
     ship_to_region, ship_to_postal_code, ship_to_country";

/// Internal row type for `PostgreSQL` order queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    customer_id: Option<i32>,
    order_date: Option<NaiveDate>,
    required_date: Option<NaiveDate>,
    shipped_date: Option<NaiveDate>,
    shipper_id: Option<i32>,
    freight: Option<Decimal>,
    ship_to_name: Option<String>,
    ship_to_address: Option<String>,
    ship_to_city: Option<String>,
    ship_to_state: Option<String>,
    ship_to_region: Option<String>,
    ship_to_postal_code: Option<String>,
    ship_to_country: Option<String>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let customer_id = row.customer_id.ok_or_else(|| {
            RepositoryError::DataCorruption(format!("order {} has no customer", row.id))
        })?;

        Ok(Self {
            id: OrderId::new(row.id),
            customer_id: CustomerId::new(customer_id),
            order_date: row.order_date,
            required_date: row.required_date,
            shipped_date: row.shipped_date,
            shipper_id: row.shipper_id.map(ShipperId::new),
            freight: row.freight,
            ship_to: ShipTo {
                name: row.ship_to_name,
                address: row.ship_to_address,
                city: row.ship_to_city,
                state: row.ship_to_state,
                region: row.ship_to_region,
                postal_code: row.ship_to_postal_code,
                country: row.ship_to_country,
            },
        })
    }
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List orders, newest first, optionally only those of one customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if an order has no customer.
    pub async fn list(&self, customer: Option<CustomerId>) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            r#"SELECT {ORDER_COLUMNS} FROM "order"
               WHERE $1::int IS NULL OR customer_id = $1
               ORDER BY order_date DESC NULLS LAST, id DESC"#
        ))
        .bind(customer)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the order has no customer.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r#"SELECT {ORDER_COLUMNS} FROM "order" WHERE id = $1"#
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Get an order together with its derived subtotal and total.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if the order has no customer.
    pub async fn get_with_totals(
        &self,
        id: OrderId,
    ) -> Result<Option<OrderWithTotals>, RepositoryError> {
        let Some(order) = self.get(id).await? else {
            return Ok(None);
        };

        let input = OrderInput::from(OrderRef::ById(order.id));
        let totals = OrderSnapshot::load(self.pool, input.reference)
            .await?
            .totals(&input);

        Ok(Some(OrderWithTotals { order, totals }))
    }

    /// Derived subtotal and total for the order a row refers to.
    ///
    /// Never fails for a missing order or missing lines; those count as zero.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the snapshot cannot be read.
    pub async fn totals(&self, input: &OrderInput) -> Result<OrderTotals, RepositoryError> {
        order_totals(self.pool, input).await
    }

    /// Create an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Validation` if the input is invalid.
    /// Returns `RepositoryError::Conflict` if the customer or shipper does not exist.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, input: &NewOrder) -> Result<Order, RepositoryError> {
        Self::create_in(self.pool, input).await
    }

    /// Like [`Self::create`], on any executor such as an open transaction.
    ///
    /// # Errors
    ///
    /// Same as [`Self::create`].
    pub async fn create_in<'e, E>(executor: E, input: &NewOrder) -> Result<Order, RepositoryError>
    where
        E: PgExecutor<'e>,
    {
        input.validate()?;
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r#"INSERT INTO "order" (customer_id, order_date, required_date, shipped_date,
                                    shipper_id, freight, ship_to_name, ship_to_address,
                                    ship_to_city, ship_to_state, ship_to_region,
                                    ship_to_postal_code, ship_to_country)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
               RETURNING {ORDER_COLUMNS}"#
        ))
        .bind(input.customer_id)
        .bind(input.order_date)
        .bind(input.required_date)
        .bind(input.shipped_date)
        .bind(input.shipper_id)
        .bind(input.freight)
        .bind(&input.ship_to.name)
        .bind(&input.ship_to.address)
        .bind(&input.ship_to.city)
        .bind(&input.ship_to.state)
        .bind(&input.ship_to.region)
        .bind(&input.ship_to.postal_code)
        .bind(&input.ship_to.country)
        .fetch_one(executor)
        .await
        .map_err(|e| RepositoryError::from_write(e, "order"))?;

        row.try_into()
    }

    /// Replace every stored field of an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Validation` if the input is invalid.
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    /// Returns `RepositoryError::Conflict` if the customer or shipper does not exist.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update(&self, id: OrderId, input: &NewOrder) -> Result<Order, RepositoryError> {
        input.validate()?;
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r#"UPDATE "order"
               SET customer_id = $2, order_date = $3, required_date = $4, shipped_date = $5,
                   shipper_id = $6, freight = $7, ship_to_name = $8, ship_to_address = $9,
                   ship_to_city = $10, ship_to_state = $11, ship_to_region = $12,
                   ship_to_postal_code = $13, ship_to_country = $14
               WHERE id = $1
               RETURNING {ORDER_COLUMNS}"#
        ))
        .bind(id)
        .bind(input.customer_id)
        .bind(input.order_date)
        .bind(input.required_date)
        .bind(input.shipped_date)
        .bind(input.shipper_id)
        .bind(input.freight)
        .bind(&input.ship_to.name)
        .bind(&input.ship_to.address)
        .bind(&input.ship_to.city)
        .bind(&input.ship_to.state)
        .bind(&input.ship_to.region)
        .bind(&input.ship_to.postal_code)
        .bind(&input.ship_to.country)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, "order"))?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }

    /// Delete an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    /// Returns `RepositoryError::Conflict` if detail lines still reference it.
    pub async fn delete(&self, id: OrderId) -> Result<(), RepositoryError> {
        let result = sqlx::query(r#"DELETE FROM "order" WHERE id = $1"#)
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| RepositoryError::from_write(e, "order"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn row(customer_id: Option<i32>) -> OrderRow {
        OrderRow {
            id: 10248,
            customer_id,
            order_date: NaiveDate::from_ymd_opt(1996, 7, 4),
            required_date: NaiveDate::from_ymd_opt(1996, 8, 1),
            shipped_date: None,
            shipper_id: Some(3),
            freight: Some(dec!(32.38)),
            ship_to_name: Some("Vins et alcools Chevalier".to_string()),
            ship_to_address: None,
            ship_to_city: Some("Reims".to_string()),
            ship_to_state: None,
            ship_to_region: None,
            ship_to_postal_code: Some("51100".to_string()),
            ship_to_country: Some("France".to_string()),
        }
    }

    #[test]
    fn test_order_row_maps_ship_to_block() {
        let order = Order::try_from(row(Some(85))).unwrap();
        assert_eq!(order.customer_id, CustomerId::new(85));
        assert_eq!(order.shipper_id, Some(ShipperId::new(3)));
        assert_eq!(order.ship_to.city.as_deref(), Some("Reims"));
        assert_eq!(order.freight, Some(dec!(32.38)));
    }

    #[test]
    fn test_order_row_without_customer_is_corruption() {
        let result = Order::try_from(row(None));
        assert!(matches!(result, Err(RepositoryError::DataCorruption(_))));
    }
}
