//! Orders and their detail lines.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::catalog::Product;
use super::validation::{ValidationError, max_length, non_negative};
use crate::totals::OrderTotals;
use crate::types::{CustomerId, OrderDetailId, OrderId, ProductId, ShipperId};

/// Date format used when rendering order dates.
const ORDER_DATE_FORMAT: &str = "%m/%d/%Y";

/// Render an order date as `MM/DD/YYYY`, or an empty string when unset.
#[must_use]
pub fn format_order_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(ORDER_DATE_FORMAT).to_string())
        .unwrap_or_default()
}

/// Ship-to address block shared by orders and their inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipTo {
    /// Recipient name.
    #[serde(default)]
    pub name: Option<String>,
    /// Street address.
    #[serde(default)]
    pub address: Option<String>,
    /// City.
    #[serde(default)]
    pub city: Option<String>,
    /// Two-letter state code.
    #[serde(default)]
    pub state: Option<String>,
    /// Region.
    #[serde(default)]
    pub region: Option<String>,
    /// Postal code.
    #[serde(default)]
    pub postal_code: Option<String>,
    /// Country.
    #[serde(default)]
    pub country: Option<String>,
}

impl ShipTo {
    fn validate(&self) -> Result<(), ValidationError> {
        max_length("ship_to_name", self.name.as_deref(), Some(40))?;
        max_length("ship_to_address", self.address.as_deref(), Some(60))?;
        max_length("ship_to_city", self.city.as_deref(), Some(15))?;
        max_length("ship_to_state", self.state.as_deref(), Some(2))?;
        max_length("ship_to_region", self.region.as_deref(), Some(15))?;
        max_length("ship_to_postal_code", self.postal_code.as_deref(), Some(10))?;
        max_length("ship_to_country", self.country.as_deref(), Some(15))
    }
}

/// A customer order as stored.
///
/// `subtotal` and `total` are not columns; pair the row with
/// [`OrderTotals`] through [`OrderWithTotals`] when they are needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Row ID.
    pub id: OrderId,
    /// Ordering customer.
    pub customer_id: CustomerId,
    /// Date the order was placed.
    pub order_date: Option<NaiveDate>,
    /// Date the customer needs the goods.
    pub required_date: Option<NaiveDate>,
    /// Date the order shipped, if it has.
    pub shipped_date: Option<NaiveDate>,
    /// Assigned shipper.
    pub shipper_id: Option<ShipperId>,
    /// Freight charge.
    pub freight: Option<Decimal>,
    /// Ship-to address.
    pub ship_to: ShipTo,
}

/// Input for creating or updating an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    /// Ordering customer.
    pub customer_id: CustomerId,
    /// Date the order was placed (required).
    pub order_date: NaiveDate,
    /// Date the customer needs the goods (required).
    pub required_date: NaiveDate,
    /// Date the order shipped.
    #[serde(default)]
    pub shipped_date: Option<NaiveDate>,
    /// Assigned shipper.
    #[serde(default)]
    pub shipper_id: Option<ShipperId>,
    /// Freight charge.
    #[serde(default)]
    pub freight: Option<Decimal>,
    /// Ship-to address.
    #[serde(default)]
    pub ship_to: ShipTo,
}

impl NewOrder {
    /// Validate the input.
    ///
    /// Dates are required by construction; this checks the ship-to widths.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::TooLong` for an over-long ship-to field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.ship_to.validate()
    }
}

/// An order paired with its derived subtotal and total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderWithTotals {
    /// The stored row.
    #[serde(flatten)]
    pub order: Order,
    /// Values computed from the detail lines and freight.
    #[serde(flatten)]
    pub totals: OrderTotals,
}

/// One line of an order as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDetail {
    /// Row ID.
    pub id: OrderDetailId,
    /// Order the line belongs to.
    pub order_id: OrderId,
    /// Ordered product.
    pub product_id: ProductId,
    /// Product price at the time the line was last written.
    pub unit_price: Option<Decimal>,
    /// Ordered quantity.
    pub quantity: Option<i32>,
    /// Discount fraction. Stored but not applied to order totals.
    pub discount: Decimal,
}

/// Input for creating or updating an order line.
///
/// Carries no price. The stored price is copied from the product by
/// [`NewOrderDetail::priced`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrderDetail {
    /// Order the line belongs to.
    pub order_id: OrderId,
    /// Ordered product.
    pub product_id: ProductId,
    /// Ordered quantity.
    pub quantity: i32,
    /// Discount fraction.
    #[serde(default)]
    pub discount: Decimal,
}

impl NewOrderDetail {
    /// Validate the input.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::Negative` for a negative quantity or discount.
    pub fn validate(&self) -> Result<(), ValidationError> {
        non_negative("quantity", Some(self.quantity))?;
        if self.discount < Decimal::ZERO {
            return Err(ValidationError::Negative { field: "discount" });
        }
        Ok(())
    }

    /// Snapshot the product's current price onto the line.
    ///
    /// `product` is the row referenced by `product_id`, looked up by the
    /// caller. A missing product leaves the price unset.
    #[must_use]
    pub fn priced(self, product: Option<&Product>) -> PricedOrderDetail {
        let unit_price = product
            .filter(|p| p.id == self.product_id)
            .and_then(|p| p.unit_price);

        PricedOrderDetail {
            order_id: self.order_id,
            product_id: self.product_id,
            unit_price,
            quantity: self.quantity,
            discount: self.discount,
        }
    }
}

/// An order line ready to be written, carrying the product's price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PricedOrderDetail {
    /// Order the line belongs to.
    pub order_id: OrderId,
    /// Ordered product.
    pub product_id: ProductId,
    /// Price copied from the product.
    pub unit_price: Option<Decimal>,
    /// Ordered quantity.
    pub quantity: i32,
    /// Discount fraction.
    pub discount: Decimal,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::types::CategoryId;

    fn chai(price: Decimal) -> Product {
        Product {
            id: ProductId::new(1),
            name: "Chai".to_owned(),
            category_id: Some(CategoryId::new(1)),
            quantity_per_unit: None,
            unit_price: Some(price),
            in_stock: None,
            on_order: None,
            reorder_level: None,
            discontinued: false,
        }
    }

    fn line(quantity: i32) -> NewOrderDetail {
        NewOrderDetail {
            order_id: OrderId::new(10248),
            product_id: ProductId::new(1),
            quantity,
            discount: Decimal::ZERO,
        }
    }

    #[test]
    fn test_format_order_date() {
        let date = NaiveDate::from_ymd_opt(1996, 7, 4).unwrap();
        assert_eq!(format_order_date(Some(date)), "07/04/1996");
        assert_eq!(format_order_date(None), "");
    }

    #[test]
    fn test_priced_takes_product_price() {
        let priced = line(3).priced(Some(&chai(dec!(18.00))));
        assert_eq!(priced.unit_price, Some(dec!(18.00)));
        assert_eq!(priced.quantity, 3);
    }

    #[test]
    fn test_priced_follows_current_product_price() {
        let before = line(1).priced(Some(&chai(dec!(18.00))));
        let after = line(1).priced(Some(&chai(dec!(19.50))));
        assert_eq!(before.unit_price, Some(dec!(18.00)));
        assert_eq!(after.unit_price, Some(dec!(19.50)));
    }

    #[test]
    fn test_priced_without_product_has_no_price() {
        assert_eq!(line(1).priced(None).unit_price, None);
    }

    #[test]
    fn test_priced_ignores_mismatched_product() {
        let other = Product {
            id: ProductId::new(2),
            ..chai(dec!(99.00))
        };
        assert_eq!(line(1).priced(Some(&other)).unit_price, None);
    }

    #[test]
    fn test_negative_quantity_rejected() {
        assert_eq!(
            line(-1).validate(),
            Err(ValidationError::Negative { field: "quantity" })
        );
        assert!(line(0).validate().is_ok());
    }

    #[test]
    fn test_ship_to_state_width() {
        let order = NewOrder {
            customer_id: CustomerId::new(1),
            order_date: NaiveDate::from_ymd_opt(1996, 7, 4).unwrap(),
            required_date: NaiveDate::from_ymd_opt(1996, 8, 1).unwrap(),
            shipped_date: None,
            shipper_id: None,
            freight: Some(dec!(32.38)),
            ship_to: ShipTo {
                state: Some("WAS".to_owned()),
                ..ShipTo::default()
            },
        };
        assert_eq!(
            order.validate(),
            Err(ValidationError::TooLong {
                field: "ship_to_state",
                max: 2
            })
        );
    }
}
