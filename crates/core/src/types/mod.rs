//! Core types for Northwind Admin.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod money;
pub mod role;

pub use email::{Email, EmailError};
pub use id::*;
pub use money::{Amount, MONEY_SCALE, round2};
pub use role::{GridAction, ParseActionError, RoleId};
