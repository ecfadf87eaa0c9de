//! Entity rows and validated inputs for the Northwind schema.
//!
//! Each table has a row type (as read back from the store, carrying its ID)
//! and a `New*` input type whose `validate()` applies the field validators of
//! the schema: required names, column widths and email format.
//!
//! Derived order values (`subtotal`, `total`) are never part of a row; see
//! [`crate::totals`].

pub mod catalog;
pub mod customer;
pub mod district;
pub mod order;
pub mod validation;

pub use catalog::{Category, NewCategory, NewProduct, NewShipper, Product, Shipper};
pub use customer::{Customer, CustomerNote, NewCustomer, NewCustomerNote};
pub use district::{District, NewDistrict};
pub use order::{
    NewOrder, NewOrderDetail, Order, OrderDetail, OrderWithTotals, PricedOrderDetail, ShipTo,
    format_order_date,
};
pub use validation::ValidationError;
