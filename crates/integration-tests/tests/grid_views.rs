//! Integration tests for grid view configuration.

use northwind_admin::components::{FieldKind, GridMode, GridTable, ViewConfig};

// =============================================================================
// Derived Order Fields
// =============================================================================

#[test]
fn test_order_totals_visible_in_list_and_details() {
    for mode in [GridMode::List, GridMode::Details] {
        let view = ViewConfig::for_table(GridTable::Order, mode);
        for name in ["subtotal", "total"] {
            let field = view.field(name).expect("derived field present");
            assert!(field.readable, "{name} readable in {mode}");
            assert!(!field.writable, "{name} not writable in {mode}");
            assert_eq!(field.kind, FieldKind::Money);
        }
    }
}

#[test]
fn test_order_totals_hidden_from_forms() {
    for mode in [GridMode::Create, GridMode::Edit] {
        let view = ViewConfig::for_table(GridTable::Order, mode);
        for name in ["subtotal", "total"] {
            let hidden = view.field(name).is_none_or(|f| !f.readable && !f.writable);
            assert!(hidden, "{name} hidden in {mode}");
        }
    }
}

#[test]
fn test_freight_editable_in_forms() {
    let view = ViewConfig::for_table(GridTable::Order, GridMode::Edit);
    let freight = view.field("freight").expect("freight field");
    assert!(freight.writable);
}

// =============================================================================
// All Tables
// =============================================================================

#[test]
fn test_unit_price_is_never_writable() {
    for mode in GridMode::ALL {
        let view = ViewConfig::for_table(GridTable::OrderDetail, mode);
        if let Some(field) = view.field("unit_price") {
            assert!(!field.writable, "unit_price writable in {mode}");
        }
    }
}

#[test]
fn test_writable_fields_only_in_forms() {
    for table in GridTable::ALL {
        for mode in [GridMode::List, GridMode::Details] {
            let view = ViewConfig::for_table(table, mode);
            assert_eq!(view.writable().count(), 0, "{table} in {mode}");
        }
    }
}

#[test]
fn test_configs_for_different_modes_are_independent() {
    let list = ViewConfig::for_table(GridTable::Order, GridMode::List);
    let edit = ViewConfig::for_table(GridTable::Order, GridMode::Edit);
    let list_again = ViewConfig::for_table(GridTable::Order, GridMode::List);

    assert_ne!(list, edit);
    assert_eq!(list, list_again);
}

#[test]
fn test_table_and_mode_names_parse() {
    for table in GridTable::ALL {
        assert_eq!(table.as_str().parse::<GridTable>(), Ok(table));
    }
    for mode in GridMode::ALL {
        assert_eq!(mode.as_str().parse::<GridMode>(), Ok(mode));
    }
    assert!("invoice".parse::<GridTable>().is_err());
}
