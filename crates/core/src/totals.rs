//! Derived order subtotal and total.
//!
//! An order's `subtotal` is the sum of `unit_price * quantity` over its detail
//! lines; its `total` adds freight. Neither is stored. Both are computed on
//! read through an [`OrderLedger`], with every term rounded half-up to two
//! decimal places (see [`crate::types::money`]).
//!
//! The calculator must work on rows that are still being edited, so it never
//! fails: an order that cannot be identified, has no lines or cannot be found
//! simply contributes zero.
//!
//! ```
//! use northwind_core::{InMemoryLedger, OrderId, OrderInput, OrderLine, OrderRef, OrderTotalCalculator};
//! use rust_decimal::Decimal;
//!
//! let order = OrderId::new(10248);
//! let mut ledger = InMemoryLedger::default();
//! ledger.insert_order(order, Some(Decimal::new(5_005, 3)));
//! ledger.add_line(order, OrderLine::new(Decimal::new(10_005, 3), 2));
//! ledger.add_line(order, OrderLine::new(Decimal::new(3_333, 3), 1));
//!
//! let calculator = OrderTotalCalculator::new(&ledger);
//! let input = OrderInput::from(OrderRef::ById(order));
//! assert_eq!(calculator.compute_subtotal(&input).to_string(), "23.35");
//! assert_eq!(calculator.compute_total(&input).to_string(), "28.36");
//! ```

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::OrderDetail;
use crate::types::{Amount, OrderId};

/// How a row being rendered identifies its order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderRef {
    /// The row is the order itself.
    ById(OrderId),
    /// The row is a child (e.g. an order detail) that references the order.
    ByNestedOrder(OrderId),
    /// The row does not identify an order yet (e.g. an unsaved form).
    Unresolved,
}

impl OrderRef {
    /// Resolve a row's own ID and nested order ID into a reference.
    ///
    /// The row's own ID wins; the nested order's ID is used only when the row
    /// has none.
    #[must_use]
    pub const fn resolve(id: Option<OrderId>, nested_order_id: Option<OrderId>) -> Self {
        match (id, nested_order_id) {
            (Some(id), _) => Self::ById(id),
            (None, Some(id)) => Self::ByNestedOrder(id),
            (None, None) => Self::Unresolved,
        }
    }

    /// The referenced order, if any.
    #[must_use]
    pub const fn order_id(&self) -> Option<OrderId> {
        match self {
            Self::ById(id) | Self::ByNestedOrder(id) => Some(*id),
            Self::Unresolved => None,
        }
    }
}

/// Input to the calculator: an order reference plus freight the row may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderInput {
    /// Which order the row belongs to.
    pub reference: OrderRef,
    /// Freight present on the row itself. Takes precedence over the stored value.
    pub freight: Option<Decimal>,
}

impl OrderInput {
    /// Attach freight carried by the row.
    #[must_use]
    pub const fn with_freight(mut self, freight: Decimal) -> Self {
        self.freight = Some(freight);
        self
    }
}

impl From<OrderRef> for OrderInput {
    fn from(reference: OrderRef) -> Self {
        Self {
            reference,
            freight: None,
        }
    }
}

/// Nested `order` object of a partial row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct NestedOrder {
    /// The nested order's ID.
    #[serde(default)]
    pub id: Option<OrderId>,
}

/// A loosely shaped row as it arrives from a form or grid.
///
/// Every field is optional: `{"id": 10248}`, `{"order": {"id": 10248}}`,
/// `{"freight": "12.50"}` and `{}` are all valid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct PartialOrderRow {
    /// The order's own ID.
    #[serde(default)]
    pub id: Option<OrderId>,
    /// A nested order reference.
    #[serde(default)]
    pub order: Option<NestedOrder>,
    /// Freight entered on the row.
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub freight: Option<Decimal>,
}

impl From<PartialOrderRow> for OrderInput {
    fn from(row: PartialOrderRow) -> Self {
        Self {
            reference: OrderRef::resolve(row.id, row.order.and_then(|o| o.id)),
            freight: row.freight,
        }
    }
}

/// One detail line as seen by the calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Snapshotted unit price.
    pub unit_price: Decimal,
    /// Ordered quantity.
    pub quantity: i32,
}

impl OrderLine {
    /// Create a line.
    #[must_use]
    pub const fn new(unit_price: Decimal, quantity: i32) -> Self {
        Self {
            unit_price,
            quantity,
        }
    }

    /// The line's contribution to the subtotal.
    #[must_use]
    pub fn amount(&self) -> Amount {
        Amount::line(self.unit_price, self.quantity)
    }
}

impl From<&OrderDetail> for OrderLine {
    /// Unset price or quantity count as zero.
    fn from(detail: &OrderDetail) -> Self {
        Self::new(
            detail.unit_price.unwrap_or(Decimal::ZERO),
            detail.quantity.unwrap_or(0),
        )
    }
}

/// Read access to the data the calculator needs.
pub trait OrderLedger {
    /// Every detail line of the order, in any order.
    fn find_order_details(&self, order_id: OrderId) -> Vec<OrderLine>;

    /// The order's stored freight, `None` if the order or its freight is missing.
    fn find_order_freight(&self, order_id: OrderId) -> Option<Decimal>;
}

impl<T: OrderLedger + ?Sized> OrderLedger for &T {
    fn find_order_details(&self, order_id: OrderId) -> Vec<OrderLine> {
        (**self).find_order_details(order_id)
    }

    fn find_order_freight(&self, order_id: OrderId) -> Option<Decimal> {
        (**self).find_order_freight(order_id)
    }
}

/// Subtotal and total of one order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OrderTotals {
    /// Sum of the line amounts.
    pub subtotal: Amount,
    /// Subtotal plus freight.
    pub total: Amount,
}

/// Sum line amounts, each rounded to two places, into a subtotal.
#[must_use]
pub fn subtotal_of<'a, I>(lines: I) -> Amount
where
    I: IntoIterator<Item = &'a OrderLine>,
{
    lines.into_iter().map(OrderLine::amount).sum()
}

/// Add rounded freight to a rounded subtotal; missing freight counts as zero.
#[must_use]
pub fn total_of(subtotal: Amount, freight: Option<Decimal>) -> Amount {
    subtotal + freight.map_or(Amount::ZERO, Amount::new)
}

/// Computes derived order values from an [`OrderLedger`].
///
/// Holds no state besides the ledger; results are a pure function of the
/// ledger's contents.
#[derive(Debug, Clone, Copy)]
pub struct OrderTotalCalculator<L> {
    ledger: L,
}

impl<L: OrderLedger> OrderTotalCalculator<L> {
    /// Create a calculator reading from `ledger`.
    #[must_use]
    pub const fn new(ledger: L) -> Self {
        Self { ledger }
    }

    /// Sum of `round2(unit_price) * round2(quantity)` over the order's lines.
    ///
    /// An unresolved reference yields `0.00`. The line discount is not applied.
    #[must_use]
    pub fn compute_subtotal(&self, input: &OrderInput) -> Amount {
        input.reference.order_id().map_or(Amount::ZERO, |order_id| {
            subtotal_of(&self.ledger.find_order_details(order_id))
        })
    }

    /// Subtotal plus freight, each rounded before adding.
    ///
    /// Freight comes from the row when it carries one, otherwise from the
    /// stored order for a [`OrderRef::ById`] reference, otherwise zero.
    #[must_use]
    pub fn compute_total(&self, input: &OrderInput) -> Amount {
        total_of(self.compute_subtotal(input), self.freight(input))
    }

    /// Both values in one pass over the ledger.
    #[must_use]
    pub fn compute_totals(&self, input: &OrderInput) -> OrderTotals {
        let subtotal = self.compute_subtotal(input);
        OrderTotals {
            subtotal,
            total: total_of(subtotal, self.freight(input)),
        }
    }

    fn freight(&self, input: &OrderInput) -> Option<Decimal> {
        input.freight.or_else(|| match input.reference {
            OrderRef::ById(order_id) => self.ledger.find_order_freight(order_id),
            OrderRef::ByNestedOrder(_) | OrderRef::Unresolved => None,
        })
    }
}

/// A map-backed ledger for previews and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryLedger {
    lines: BTreeMap<OrderId, Vec<OrderLine>>,
    freight: BTreeMap<OrderId, Option<Decimal>>,
}

impl InMemoryLedger {
    /// Register an order with its stored freight.
    pub fn insert_order(&mut self, order_id: OrderId, freight: Option<Decimal>) {
        self.freight.insert(order_id, freight);
    }

    /// Append a detail line to an order.
    pub fn add_line(&mut self, order_id: OrderId, line: OrderLine) {
        self.lines.entry(order_id).or_default().push(line);
    }

    /// Whether the order has been registered.
    #[must_use]
    pub fn contains_order(&self, order_id: OrderId) -> bool {
        self.freight.contains_key(&order_id)
    }
}

impl OrderLedger for InMemoryLedger {
    fn find_order_details(&self, order_id: OrderId) -> Vec<OrderLine> {
        self.lines.get(&order_id).cloned().unwrap_or_default()
    }

    fn find_order_freight(&self, order_id: OrderId) -> Option<Decimal> {
        self.freight.get(&order_id).copied().flatten()
    }
}
