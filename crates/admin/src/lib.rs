//! Northwind Admin data layer.
//!
//! This crate provides the I/O side of the admin application as a library,
//! allowing it to be tested and reused by the CLI:
//! - Configuration from environment variables
//! - `PostgreSQL` repositories for every table
//! - Derived order totals over a consistent snapshot
//! - The role/action policy loader
//! - Per-request grid view configuration
//! - Seeding from YAML
//!
//! Rendering, routing and authentication live outside this crate.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod components;
pub mod config;
pub mod db;
pub mod error;
pub mod policy;
pub mod seed;
pub mod services;

pub use config::AdminConfig;
pub use error::AppError;
