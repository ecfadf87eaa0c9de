//! Presentation-neutral grid components.
//!
//! - `grid` - Per-request field visibility for each table and grid mode

pub mod grid;

pub use grid::{
    FieldAccess, FieldKind, FieldSpec, FieldView, GridError, GridMode, GridTable, ViewConfig,
};
