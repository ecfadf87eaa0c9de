//! Grid view configuration.
//!
//! Each table has a static, immutable field catalog. A [`ViewConfig`] is a
//! fresh value built per request from that catalog and a [`GridMode`]; it
//! never mutates the catalog, so configs for different modes can coexist.
//!
//! Field visibility rules:
//! - `id` is read-only and hidden while creating.
//! - Derived fields (`order.subtotal`, `order.total`) are read-only and shown
//!   only in list and details views.
//! - Store-written fields (`order_detail.unit_price`) are read-only and hidden
//!   while creating.
//! - Every other field is readable everywhere and writable in create and edit.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors parsing grid names from user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// Not one of [`GridTable::ALL`].
    #[error("unknown table: {0}")]
    UnknownTable(String),
    /// Not one of [`GridMode::ALL`].
    #[error("unknown grid mode: {0}")]
    UnknownMode(String),
}

/// What the grid is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridMode {
    /// Table of rows.
    List,
    /// Read-only view of one row.
    Details,
    /// Form for a new row.
    Create,
    /// Form for an existing row.
    Edit,
}

impl GridMode {
    /// All modes.
    pub const ALL: [Self; 4] = [Self::List, Self::Details, Self::Create, Self::Edit];

    /// Lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Details => "details",
            Self::Create => "create",
            Self::Edit => "edit",
        }
    }

    const fn is_form(self) -> bool {
        matches!(self, Self::Create | Self::Edit)
    }
}

impl fmt::Display for GridMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GridMode {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s.trim())
            .ok_or_else(|| GridError::UnknownMode(s.to_string()))
    }
}

/// A table that can be shown in a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridTable {
    /// `district`
    District,
    /// `customer`
    Customer,
    /// `customer_note`
    CustomerNote,
    /// `shipper`
    Shipper,
    /// `category`
    Category,
    /// `product`
    Product,
    /// `order`
    Order,
    /// `order_detail`
    OrderDetail,
}

impl GridTable {
    /// All tables.
    pub const ALL: [Self; 8] = [
        Self::District,
        Self::Customer,
        Self::CustomerNote,
        Self::Shipper,
        Self::Category,
        Self::Product,
        Self::Order,
        Self::OrderDetail,
    ];

    /// Table name as stored.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::District => "district",
            Self::Customer => "customer",
            Self::CustomerNote => "customer_note",
            Self::Shipper => "shipper",
            Self::Category => "category",
            Self::Product => "product",
            Self::Order => "order",
            Self::OrderDetail => "order_detail",
        }
    }

    /// The table's field catalog.
    #[must_use]
    pub const fn fields(&self) -> &'static [FieldSpec] {
        match self {
            Self::District => DISTRICT_FIELDS,
            Self::Customer => CUSTOMER_FIELDS,
            Self::CustomerNote => CUSTOMER_NOTE_FIELDS,
            Self::Shipper => SHIPPER_FIELDS,
            Self::Category => CATEGORY_FIELDS,
            Self::Product => PRODUCT_FIELDS,
            Self::Order => ORDER_FIELDS,
            Self::OrderDetail => ORDER_DETAIL_FIELDS,
        }
    }
}

impl fmt::Display for GridTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GridTable {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|table| table.as_str() == s.trim())
            .ok_or_else(|| GridError::UnknownTable(s.to_string()))
    }
}

/// Value type of a field, used to pick an input widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Row ID.
    Id,
    /// Single-line text.
    Text,
    /// Multi-line text.
    LongText,
    /// Whole number.
    Integer,
    /// Decimal amount with two places.
    Money,
    /// Calendar date.
    Date,
    /// Timestamp in UTC.
    DateTime,
    /// Yes/no flag.
    Boolean,
    /// Foreign key to another table.
    Reference(GridTable),
}

/// Who writes a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldAccess {
    /// The user, through create and edit forms.
    Editable,
    /// The store (row IDs, snapshotted prices).
    Stored,
    /// Nobody; computed on read.
    Derived,
}

/// Catalog entry for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    /// Column name.
    pub name: &'static str,
    /// Display label.
    pub label: &'static str,
    /// Value type.
    pub kind: FieldKind,
    /// Who writes it.
    pub access: FieldAccess,
}

impl FieldSpec {
    const ID: Self = Self::stored("id", "ID", FieldKind::Id);

    const fn editable(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            access: FieldAccess::Editable,
        }
    }

    const fn stored(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            access: FieldAccess::Stored,
        }
    }

    const fn derived(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Money,
            access: FieldAccess::Derived,
        }
    }

    /// Whether the field is shown in `mode`.
    #[must_use]
    pub const fn readable_in(&self, mode: GridMode) -> bool {
        match self.access {
            FieldAccess::Editable => true,
            FieldAccess::Stored => !matches!(mode, GridMode::Create),
            FieldAccess::Derived => matches!(mode, GridMode::List | GridMode::Details),
        }
    }

    /// Whether the field accepts input in `mode`.
    #[must_use]
    pub const fn writable_in(&self, mode: GridMode) -> bool {
        matches!(self.access, FieldAccess::Editable) && mode.is_form()
    }
}

const DISTRICT_FIELDS: &[FieldSpec] = &[
    FieldSpec::ID,
    FieldSpec::editable("name", "Name", FieldKind::Text),
];

const CUSTOMER_FIELDS: &[FieldSpec] = &[
    FieldSpec::ID,
    FieldSpec::editable("name", "Name", FieldKind::Text),
    FieldSpec::editable("contact", "Contact", FieldKind::Text),
    FieldSpec::editable("title", "Title", FieldKind::Text),
    FieldSpec::editable("address", "Address", FieldKind::Text),
    FieldSpec::editable("city", "City", FieldKind::Text),
    FieldSpec::editable("region", "Region", FieldKind::Text),
    FieldSpec::editable("postal_code", "Postal Code", FieldKind::Text),
    FieldSpec::editable("country", "Country", FieldKind::Text),
    FieldSpec::editable("phone", "Phone", FieldKind::Text),
    FieldSpec::editable("email", "Email", FieldKind::Text),
    FieldSpec::editable(
        "district_id",
        "District",
        FieldKind::Reference(GridTable::District),
    ),
];

const CUSTOMER_NOTE_FIELDS: &[FieldSpec] = &[
    FieldSpec::ID,
    FieldSpec::editable(
        "customer_id",
        "Customer",
        FieldKind::Reference(GridTable::Customer),
    ),
    FieldSpec::editable("timestamp", "Timestamp", FieldKind::DateTime),
    FieldSpec::editable("note", "Note", FieldKind::LongText),
];

const SHIPPER_FIELDS: &[FieldSpec] = &[
    FieldSpec::ID,
    FieldSpec::editable("name", "Name", FieldKind::Text),
    FieldSpec::editable("phone", "Phone", FieldKind::Text),
];

const CATEGORY_FIELDS: &[FieldSpec] = &[
    FieldSpec::ID,
    FieldSpec::editable("name", "Name", FieldKind::Text),
    FieldSpec::editable("description", "Description", FieldKind::LongText),
    FieldSpec::editable("picture", "Picture", FieldKind::Text),
];

const PRODUCT_FIELDS: &[FieldSpec] = &[
    FieldSpec::ID,
    FieldSpec::editable("name", "Name", FieldKind::Text),
    FieldSpec::editable(
        "category_id",
        "Category",
        FieldKind::Reference(GridTable::Category),
    ),
    FieldSpec::editable("quantity_per_unit", "Quantity Per Unit", FieldKind::Text),
    FieldSpec::editable("unit_price", "Unit Price", FieldKind::Money),
    FieldSpec::editable("in_stock", "In Stock", FieldKind::Integer),
    FieldSpec::editable("on_order", "On Order", FieldKind::Integer),
    FieldSpec::editable("reorder_level", "Reorder Level", FieldKind::Integer),
    FieldSpec::editable("discontinued", "Discontinued", FieldKind::Boolean),
];

const ORDER_FIELDS: &[FieldSpec] = &[
    FieldSpec::ID,
    FieldSpec::editable(
        "customer_id",
        "Customer",
        FieldKind::Reference(GridTable::Customer),
    ),
    FieldSpec::editable("order_date", "Order Date", FieldKind::Date),
    FieldSpec::editable("required_date", "Required Date", FieldKind::Date),
    FieldSpec::editable("shipped_date", "Shipped Date", FieldKind::Date),
    FieldSpec::editable(
        "shipper_id",
        "Shipper",
        FieldKind::Reference(GridTable::Shipper),
    ),
    FieldSpec::editable("freight", "Freight", FieldKind::Money),
    FieldSpec::editable("ship_to_name", "Ship To Name", FieldKind::Text),
    FieldSpec::editable("ship_to_address", "Ship To Address", FieldKind::Text),
    FieldSpec::editable("ship_to_city", "Ship To City", FieldKind::Text),
    FieldSpec::editable("ship_to_state", "Ship To State", FieldKind::Text),
    FieldSpec::editable("ship_to_region", "Ship To Region", FieldKind::Text),
    FieldSpec::editable("ship_to_postal_code", "Ship To Postal Code", FieldKind::Text),
    FieldSpec::editable("ship_to_country", "Ship To Country", FieldKind::Text),
    FieldSpec::derived("subtotal", "Subtotal"),
    FieldSpec::derived("total", "Total"),
];

const ORDER_DETAIL_FIELDS: &[FieldSpec] = &[
    FieldSpec::ID,
    FieldSpec::editable("order_id", "Order", FieldKind::Reference(GridTable::Order)),
    FieldSpec::editable(
        "product_id",
        "Product",
        FieldKind::Reference(GridTable::Product),
    ),
    FieldSpec::stored("unit_price", "Unit Price", FieldKind::Money),
    FieldSpec::editable("quantity", "Quantity", FieldKind::Integer),
    FieldSpec::editable("discount", "Discount", FieldKind::Money),
];

/// One field as presented in a particular view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldView {
    /// Column name.
    pub name: &'static str,
    /// Display label.
    pub label: &'static str,
    /// Value type.
    pub kind: FieldKind,
    /// Shown in this view.
    pub readable: bool,
    /// Accepts input in this view.
    pub writable: bool,
    /// Offered as a sort key (list view only).
    pub sortable: bool,
}

/// Field flags for one table in one mode, built fresh per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewConfig {
    /// Table being shown.
    pub table: GridTable,
    /// Grid mode.
    pub mode: GridMode,
    /// Every catalog field, in catalog order.
    pub fields: Vec<FieldView>,
}

impl ViewConfig {
    /// Build the view for `table` in `mode`.
    #[must_use]
    pub fn for_table(table: GridTable, mode: GridMode) -> Self {
        let fields = table
            .fields()
            .iter()
            .map(|spec| FieldView {
                name: spec.name,
                label: spec.label,
                kind: spec.kind,
                readable: spec.readable_in(mode),
                writable: spec.writable_in(mode),
                sortable: mode == GridMode::List && spec.access != FieldAccess::Derived,
            })
            .collect();

        Self {
            table,
            mode,
            fields,
        }
    }

    /// Look up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldView> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields shown in this view.
    pub fn readable(&self) -> impl Iterator<Item = &FieldView> {
        self.fields.iter().filter(|f| f.readable)
    }

    /// Fields accepting input in this view.
    pub fn writable(&self) -> impl Iterator<Item = &FieldView> {
        self.fields.iter().filter(|f| f.writable)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_fields_never_writable() {
        for mode in GridMode::ALL {
            let view = ViewConfig::for_table(GridTable::Order, mode);
            for name in ["subtotal", "total"] {
                let field = view.field(name).unwrap();
                assert!(!field.writable, "{name} writable in {mode}");
                assert!(!field.sortable);
            }
        }
    }

    #[test]
    fn test_derived_fields_shown_in_list_and_details_only() {
        let readable = |mode| {
            ViewConfig::for_table(GridTable::Order, mode)
                .field("total")
                .unwrap()
                .readable
        };
        assert!(readable(GridMode::List));
        assert!(readable(GridMode::Details));
        assert!(!readable(GridMode::Create));
        assert!(!readable(GridMode::Edit));
    }

    #[test]
    fn test_id_hidden_on_create_and_never_writable() {
        for table in GridTable::ALL {
            for mode in GridMode::ALL {
                let id = ViewConfig::for_table(table, mode).field("id").cloned().unwrap();
                assert!(!id.writable);
                assert_eq!(id.readable, mode != GridMode::Create);
            }
        }
    }

    #[test]
    fn test_detail_unit_price_is_never_writable() {
        for mode in GridMode::ALL {
            let view = ViewConfig::for_table(GridTable::OrderDetail, mode);
            assert!(!view.field("unit_price").unwrap().writable);
        }
        let edit = ViewConfig::for_table(GridTable::OrderDetail, GridMode::Edit);
        assert!(edit.field("unit_price").unwrap().readable);
    }

    #[test]
    fn test_product_unit_price_is_editable() {
        let view = ViewConfig::for_table(GridTable::Product, GridMode::Edit);
        assert!(view.field("unit_price").unwrap().writable);
    }

    #[test]
    fn test_list_and_details_have_no_writable_fields() {
        for table in GridTable::ALL {
            for mode in [GridMode::List, GridMode::Details] {
                assert_eq!(ViewConfig::for_table(table, mode).writable().count(), 0);
            }
        }
    }

    #[test]
    fn test_modes_do_not_affect_each_other() {
        let list = ViewConfig::for_table(GridTable::Order, GridMode::List);
        let create = ViewConfig::for_table(GridTable::Order, GridMode::Create);
        let list_again = ViewConfig::for_table(GridTable::Order, GridMode::List);

        assert_eq!(list, list_again);
        assert!(list.field("total").unwrap().readable);
        assert!(!create.field("total").unwrap().readable);
        assert!(create.field("freight").unwrap().writable);
        assert!(!list.field("freight").unwrap().writable);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!(
            "order_detail".parse::<GridTable>().unwrap(),
            GridTable::OrderDetail
        );
        assert_eq!("edit".parse::<GridMode>().unwrap(), GridMode::Edit);
        assert_eq!(
            "orders".parse::<GridTable>(),
            Err(GridError::UnknownTable("orders".to_string()))
        );
        assert_eq!(
            "grid".parse::<GridMode>(),
            Err(GridError::UnknownMode("grid".to_string()))
        );
    }

    #[test]
    fn test_every_table_starts_with_id() {
        for table in GridTable::ALL {
            assert_eq!(table.fields().first().map(|f| f.name), Some("id"));
        }
    }
}
