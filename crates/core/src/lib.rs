//! Northwind Core - Shared types and pure computations.
//!
//! This crate provides the domain layer used by every Northwind Admin component:
//! - `admin` - Configuration, `PostgreSQL` repositories and grid view configuration
//! - `cli` - Command-line tools for order totals, policy inspection and seeding
//!
//! # Architecture
//!
//! The core crate contains only types, traits and pure functions - no I/O, no
//! database access. Persistence is reached through the [`totals::OrderLedger`]
//! trait, which the admin crate implements on top of `PostgreSQL`.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, money amounts, emails, roles and grid actions
//! - [`models`] - Entity rows and validated inputs for the Northwind schema
//! - [`totals`] - Derived order subtotal/total with half-up decimal rounding
//! - [`policy`] - Table-driven role/action visibility for grid rows

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod models;
pub mod policy;
pub mod totals;
pub mod types;

pub use policy::{ActionPolicy, PolicyError, PolicyFile, RowActions};
pub use totals::{
    InMemoryLedger, OrderInput, OrderLedger, OrderLine, OrderRef, OrderTotalCalculator,
    OrderTotals, PartialOrderRow,
};
pub use types::*;
