//! Business logic services for admin.
//!
//! # Services
//!
//! - `totals` - Derived order totals over a consistent database snapshot

pub mod totals;

pub use totals::{OrderSnapshot, order_totals};
