//! CLI command implementations.

pub mod grid;
pub mod order;
pub mod policy;
pub mod seed;
