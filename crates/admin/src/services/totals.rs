//! Order totals over a consistent database snapshot.
//!
//! The calculator in `northwind_core` is synchronous and reads through
//! [`OrderLedger`]. [`OrderSnapshot`] bridges it to `PostgreSQL`: the detail
//! lines and freight of one order are read inside a single `REPEATABLE READ`
//! read-only transaction, then the calculator runs on the loaded values with
//! no further I/O.

use rust_decimal::Decimal;
use sqlx::PgPool;

use northwind_core::{
    OrderId, OrderInput, OrderLedger, OrderLine, OrderRef, OrderTotalCalculator, OrderTotals,
};

use crate::db::RepositoryError;

/// Internal row type for detail lines read by the snapshot.
#[derive(Debug, sqlx::FromRow)]
struct OrderLineRow {
    unit_price: Option<Decimal>,
    quantity: Option<i32>,
}

impl From<OrderLineRow> for OrderLine {
    /// A line without a price or quantity contributes zero.
    fn from(row: OrderLineRow) -> Self {
        Self::new(
            row.unit_price.unwrap_or(Decimal::ZERO),
            row.quantity.unwrap_or(0),
        )
    }
}

/// Detail lines and stored freight of one order, read at a single point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderSnapshot {
    order_id: Option<OrderId>,
    lines: Vec<OrderLine>,
    freight: Option<Decimal>,
}

impl OrderSnapshot {
    /// Build a snapshot from values already in memory.
    #[must_use]
    pub const fn new(order_id: OrderId, lines: Vec<OrderLine>, freight: Option<Decimal>) -> Self {
        Self {
            order_id: Some(order_id),
            lines,
            freight,
        }
    }

    /// Load the snapshot for the order a row refers to.
    ///
    /// An unresolved reference yields an empty snapshot without touching the
    /// database.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the transaction or a query fails.
    pub async fn load(pool: &PgPool, reference: OrderRef) -> Result<Self, RepositoryError> {
        let Some(order_id) = reference.order_id() else {
            return Ok(Self::default());
        };

        let mut tx = pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;

        let rows = sqlx::query_as::<_, OrderLineRow>(
            r"
            SELECT unit_price, quantity
            FROM order_detail
            WHERE order_id = $1
            ORDER BY id
            ",
        )
        .bind(order_id)
        .fetch_all(&mut *tx)
        .await?;

        // Only a row that is the order itself falls back to stored freight.
        let freight = if matches!(reference, OrderRef::ById(_)) {
            sqlx::query_scalar::<_, Option<Decimal>>(r#"SELECT freight FROM "order" WHERE id = $1"#)
                .bind(order_id)
                .fetch_optional(&mut *tx)
                .await?
                .flatten()
        } else {
            None
        };

        tx.commit().await?;

        tracing::debug!(
            order_id = %order_id,
            lines = rows.len(),
            has_freight = freight.is_some(),
            "Loaded order snapshot"
        );

        Ok(Self::new(
            order_id,
            rows.into_iter().map(Into::into).collect(),
            freight,
        ))
    }

    /// The order this snapshot was taken of, if any.
    #[must_use]
    pub const fn order_id(&self) -> Option<OrderId> {
        self.order_id
    }

    /// Compute totals for `input` against this snapshot.
    #[must_use]
    pub fn totals(&self, input: &OrderInput) -> OrderTotals {
        OrderTotalCalculator::new(self).compute_totals(input)
    }
}

impl OrderLedger for OrderSnapshot {
    fn find_order_details(&self, order_id: OrderId) -> Vec<OrderLine> {
        if self.order_id == Some(order_id) {
            self.lines.clone()
        } else {
            Vec::new()
        }
    }

    fn find_order_freight(&self, order_id: OrderId) -> Option<Decimal> {
        self.freight.filter(|_| self.order_id == Some(order_id))
    }
}

/// Load a snapshot for `input` and compute its totals.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the snapshot cannot be read.
pub async fn order_totals(
    pool: &PgPool,
    input: &OrderInput,
) -> Result<OrderTotals, RepositoryError> {
    let snapshot = OrderSnapshot::load(pool, input.reference).await?;
    Ok(snapshot.totals(input))
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    const ORDER: OrderId = OrderId::new(10248);

    fn snapshot() -> OrderSnapshot {
        OrderSnapshot::new(
            ORDER,
            vec![
                OrderLine::new(dec!(14.00), 12),
                OrderLine::new(dec!(9.80), 10),
                OrderLine::new(dec!(34.80), 5),
            ],
            Some(dec!(32.38)),
        )
    }

    #[test]
    fn test_snapshot_totals_for_order_row() {
        let totals = snapshot().totals(&OrderRef::ById(ORDER).into());
        assert_eq!(totals.subtotal.to_string(), "440.00");
        assert_eq!(totals.total.to_string(), "472.38");
    }

    #[test]
    fn test_snapshot_ignores_other_orders() {
        let other = OrderId::new(10249);
        let totals = snapshot().totals(&OrderRef::ById(other).into());
        assert!(totals.subtotal.is_zero());
        assert!(totals.total.is_zero());
    }

    #[test]
    fn test_empty_snapshot_is_zero() {
        let empty = OrderSnapshot::default();
        assert_eq!(empty.order_id(), None);
        assert!(empty.totals(&OrderRef::Unresolved.into()).total.is_zero());
    }

    #[test]
    fn test_null_columns_contribute_zero() {
        let line = OrderLine::from(OrderLineRow {
            unit_price: None,
            quantity: Some(3),
        });
        assert!(line.amount().is_zero());

        let line = OrderLine::from(OrderLineRow {
            unit_price: Some(dec!(18.00)),
            quantity: None,
        });
        assert!(line.amount().is_zero());
    }
}
