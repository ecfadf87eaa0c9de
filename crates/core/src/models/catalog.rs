//! Product catalog: categories, products and shippers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::validation::{ValidationError, max_length, required};
use crate::types::{Amount, CategoryId, ProductId, ShipperId};

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Row ID.
    pub id: CategoryId,
    /// Category name.
    pub name: String,
    /// Free-text description.
    pub description: Option<String>,
    /// Picture reference (path or URL).
    pub picture: Option<String>,
}

/// Input for creating or updating a category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    /// Category name (required).
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Picture reference.
    #[serde(default)]
    pub picture: Option<String>,
}

impl NewCategory {
    /// Validate the input.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` for a blank or over-long name.
    pub fn validate(&self) -> Result<(), ValidationError> {
        required("name", &self.name, Some(15))
    }
}

/// A product that can be ordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Row ID.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Category the product belongs to.
    pub category_id: Option<CategoryId>,
    /// Packaging description, e.g. "10 boxes x 20 bags".
    pub quantity_per_unit: Option<String>,
    /// Current list price. Order details snapshot this value.
    pub unit_price: Option<Decimal>,
    /// Units in stock.
    pub in_stock: Option<i32>,
    /// Units on order.
    pub on_order: Option<i32>,
    /// Stock level that triggers a reorder.
    pub reorder_level: Option<i32>,
    /// No longer sold.
    pub discontinued: bool,
}

impl Product {
    /// The list price as a rounded amount, zero when no price is set.
    #[must_use]
    pub fn price(&self) -> Amount {
        self.unit_price.map_or(Amount::ZERO, Amount::new)
    }
}

/// Input for creating or updating a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    /// Product name (required).
    pub name: String,
    /// Category the product belongs to.
    pub category_id: CategoryId,
    /// Packaging description.
    #[serde(default)]
    pub quantity_per_unit: Option<String>,
    /// List price.
    #[serde(default)]
    pub unit_price: Option<Decimal>,
    /// Units in stock.
    #[serde(default)]
    pub in_stock: Option<i32>,
    /// Units on order.
    #[serde(default)]
    pub on_order: Option<i32>,
    /// Stock level that triggers a reorder.
    #[serde(default)]
    pub reorder_level: Option<i32>,
    /// No longer sold.
    #[serde(default)]
    pub discontinued: bool,
}

impl NewProduct {
    /// Validate the input.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` for a blank or over-long name or packaging
    /// description.
    pub fn validate(&self) -> Result<(), ValidationError> {
        required("name", &self.name, Some(40))?;
        max_length("quantity_per_unit", self.quantity_per_unit.as_deref(), Some(20))
    }
}

/// A shipping company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shipper {
    /// Row ID.
    pub id: ShipperId,
    /// Company name.
    pub name: String,
    /// Phone number.
    pub phone: Option<String>,
}

impl Shipper {
    /// Display label for an order's shipper column; empty when unassigned.
    #[must_use]
    pub fn label(shipper: Option<&Self>) -> &str {
        shipper.map_or("", |s| s.name.as_str())
    }
}

/// Input for creating or updating a shipper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewShipper {
    /// Company name (required).
    pub name: String,
    /// Phone number.
    #[serde(default)]
    pub phone: Option<String>,
}

impl NewShipper {
    /// Validate the input.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` for a blank or over-long name or phone.
    pub fn validate(&self) -> Result<(), ValidationError> {
        required("name", &self.name, Some(40))?;
        max_length("phone", self.phone.as_deref(), Some(24))
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_category_name_width() {
        let category = NewCategory {
            name: "Beverages and Spirits".to_owned(),
            ..NewCategory::default()
        };
        assert_eq!(
            category.validate(),
            Err(ValidationError::TooLong {
                field: "name",
                max: 15
            })
        );
    }

    #[test]
    fn test_shipper_label() {
        let shipper = Shipper {
            id: ShipperId::new(1),
            name: "Speedy Express".to_owned(),
            phone: None,
        };
        assert_eq!(Shipper::label(Some(&shipper)), "Speedy Express");
        assert_eq!(Shipper::label(None), "");
    }

    #[test]
    fn test_product_price_rounds() {
        let product = Product {
            id: ProductId::new(1),
            name: "Chai".to_owned(),
            category_id: Some(CategoryId::new(1)),
            quantity_per_unit: Some("10 boxes x 20 bags".to_owned()),
            unit_price: Some(dec!(18.005)),
            in_stock: Some(39),
            on_order: Some(0),
            reorder_level: Some(10),
            discontinued: false,
        };
        assert_eq!(product.price(), Amount::from_cents(1801));

        let unpriced = Product {
            unit_price: None,
            ..product
        };
        assert!(unpriced.price().is_zero());
    }

    #[test]
    fn test_product_packaging_width() {
        let product = NewProduct {
            name: "Chang".to_owned(),
            category_id: CategoryId::new(1),
            quantity_per_unit: Some("24 - 12 oz bottles, boxed".to_owned()),
            unit_price: Some(dec!(19)),
            in_stock: None,
            on_order: None,
            reorder_level: None,
            discontinued: false,
        };
        assert!(matches!(
            product.validate(),
            Err(ValidationError::TooLong {
                field: "quantity_per_unit",
                ..
            })
        ));
    }
}
