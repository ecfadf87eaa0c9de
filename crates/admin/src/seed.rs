//! Seeding the database from a YAML file.
//!
//! Entries reference each other by name rather than by ID, since IDs are
//! assigned by the store:
//!
//! ```yaml
//! districts:
//!   - name: North
//! categories:
//!   - name: Beverages
//! shippers:
//!   - name: Speedy Express
//!     phone: "(503) 555-9831"
//! products:
//!   - name: Chai
//!     category: Beverages
//!     unit_price: "18.00"
//! customers:
//!   - name: Alfreds Futterkiste
//!     district: North
//!     email: maria@alfreds.de
//! orders:
//!   - customer: Alfreds Futterkiste
//!     order_date: 1996-07-04
//!     required_date: 1996-08-01
//!     shipper: Speedy Express
//!     freight: "32.38"
//!     lines:
//!       - product: Chai
//!         quantity: 12
//! ```
//!
//! Order lines carry no price; each line is priced from its product. Names
//! must be unique within each section.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use thiserror::Error;

use northwind_core::models::{
    NewCategory, NewCustomer, NewDistrict, NewOrder, NewOrderDetail, NewProduct, NewShipper,
    Product, ShipTo, ValidationError,
};
use northwind_core::{
    CategoryId, CustomerId, DistrictId, InMemoryLedger, OrderId, OrderLine, OrderRef,
    OrderTotalCalculator, OrderTotals, ProductId, ShipperId,
};

use crate::db::{
    CategoryRepository, CustomerRepository, DistrictRepository, OrderDetailRepository,
    OrderRepository, ProductRepository, RepositoryError, ShipperRepository,
};

/// Errors raised while reading, checking or applying a seed file.
#[derive(Debug, Error)]
pub enum SeedError {
    /// The file could not be read.
    #[error("failed to read seed file {path}: {source}")]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid seed YAML.
    #[error("invalid seed YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// An entry failed its validator.
    #[error("invalid {entity} '{name}': {source}")]
    Validation {
        /// Kind of entry, e.g. `"product"`.
        entity: &'static str,
        /// Name of the entry.
        name: String,
        /// The failed check.
        #[source]
        source: ValidationError,
    },

    /// A name reference with no matching entry.
    #[error("unknown {entity} '{name}'")]
    UnknownReference {
        /// Kind of entry referenced.
        entity: &'static str,
        /// The unmatched name.
        name: String,
    },

    /// Two entries of one kind share a name.
    #[error("duplicate {entity} '{name}'")]
    DuplicateName {
        /// Kind of entry.
        entity: &'static str,
        /// The repeated name.
        name: String,
    },

    /// Writing to the store failed; nothing from the file was kept.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// A product entry, referencing its category by name.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedProduct {
    /// Product name, unique within the file.
    pub name: String,
    /// Name of the product's category.
    pub category: String,
    /// Packaging description.
    #[serde(default)]
    pub quantity_per_unit: Option<String>,
    /// Current unit price; new order lines are priced from it.
    #[serde(default)]
    pub unit_price: Option<Decimal>,
    /// Units in stock.
    #[serde(default)]
    pub in_stock: Option<i32>,
    /// Units on order.
    #[serde(default)]
    pub on_order: Option<i32>,
    /// Reorder threshold.
    #[serde(default)]
    pub reorder_level: Option<i32>,
    /// Whether the product is discontinued.
    #[serde(default)]
    pub discontinued: bool,
}

impl SeedProduct {
    fn resolve(&self, category_id: CategoryId) -> NewProduct {
        NewProduct {
            name: self.name.clone(),
            category_id,
            quantity_per_unit: self.quantity_per_unit.clone(),
            unit_price: self.unit_price,
            in_stock: self.in_stock,
            on_order: self.on_order,
            reorder_level: self.reorder_level,
            discontinued: self.discontinued,
        }
    }
}

/// A customer entry, referencing its district by name.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedCustomer {
    /// Customer fields; `district_id` is filled in from `district`.
    #[serde(flatten)]
    pub customer: NewCustomer,
    /// Name of the customer's district.
    #[serde(default)]
    pub district: Option<String>,
}

/// An order line, referencing its product by name.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedLine {
    /// Product name.
    pub product: String,
    /// Units ordered.
    pub quantity: i32,
    /// Fractional discount, stored but not applied to totals.
    #[serde(default)]
    pub discount: Decimal,
}

/// An order entry, referencing its customer and shipper by name.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedOrder {
    /// Customer name.
    pub customer: String,
    /// Date the order was placed.
    pub order_date: NaiveDate,
    /// Date the order is due.
    pub required_date: NaiveDate,
    /// Date the order shipped, if it has.
    #[serde(default)]
    pub shipped_date: Option<NaiveDate>,
    /// Shipper name.
    #[serde(default)]
    pub shipper: Option<String>,
    /// Freight charge added to the subtotal.
    #[serde(default)]
    pub freight: Option<Decimal>,
    /// Shipping address.
    #[serde(default)]
    pub ship_to: ShipTo,
    /// Order lines, in insertion order.
    #[serde(default)]
    pub lines: Vec<SeedLine>,
}

impl SeedOrder {
    fn resolve(&self, customer_id: CustomerId, shipper_id: Option<ShipperId>) -> NewOrder {
        NewOrder {
            customer_id,
            order_date: self.order_date,
            required_date: self.required_date,
            shipped_date: self.shipped_date,
            shipper_id,
            freight: self.freight,
            ship_to: self.ship_to.clone(),
        }
    }
}

/// Contents of a seed file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedFile {
    /// Districts.
    #[serde(default)]
    pub districts: Vec<NewDistrict>,
    /// Product categories.
    #[serde(default)]
    pub categories: Vec<NewCategory>,
    /// Shipping companies.
    #[serde(default)]
    pub shippers: Vec<NewShipper>,
    /// Products, referencing categories.
    #[serde(default)]
    pub products: Vec<SeedProduct>,
    /// Customers, referencing districts.
    #[serde(default)]
    pub customers: Vec<SeedCustomer>,
    /// Orders, referencing customers, shippers and products.
    #[serde(default)]
    pub orders: Vec<SeedOrder>,
}

/// Row counts written by [`seed`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    /// Districts inserted.
    pub districts: usize,
    /// Categories inserted.
    pub categories: usize,
    /// Shippers inserted.
    pub shippers: usize,
    /// Products inserted.
    pub products: usize,
    /// Customers inserted.
    pub customers: usize,
    /// Orders inserted.
    pub orders: usize,
    /// Order lines inserted, across all orders.
    pub order_details: usize,
}

/// Totals an order would have once seeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderPreview {
    /// Customer name.
    pub customer: String,
    /// Order date.
    pub order_date: NaiveDate,
    /// Derived subtotal and total.
    pub totals: OrderTotals,
}

/// Name-to-ID lookup for one entity kind.
struct Names<Id> {
    entity: &'static str,
    ids: HashMap<String, Id>,
}

impl<Id: Copy> Names<Id> {
    fn new(entity: &'static str) -> Self {
        Self {
            entity,
            ids: HashMap::new(),
        }
    }

    fn insert(&mut self, name: &str, id: Id) -> Result<(), SeedError> {
        match self.ids.entry(name.to_string()) {
            Entry::Occupied(_) => Err(SeedError::DuplicateName {
                entity: self.entity,
                name: name.to_string(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(id);
                Ok(())
            }
        }
    }

    fn get(&self, name: &str) -> Result<Id, SeedError> {
        self.ids
            .get(name)
            .copied()
            .ok_or_else(|| SeedError::UnknownReference {
                entity: self.entity,
                name: name.to_string(),
            })
    }

    fn get_optional(&self, name: Option<&str>) -> Result<Option<Id>, SeedError> {
        name.map(|n| self.get(n)).transpose()
    }
}

fn invalid(entity: &'static str, name: &str) -> impl FnOnce(ValidationError) -> SeedError {
    let name = name.to_string();
    move |source| SeedError::Validation {
        entity,
        name,
        source,
    }
}

impl SeedFile {
    /// Read and parse a seed file.
    ///
    /// # Errors
    ///
    /// Returns `SeedError::Io` if the file cannot be read and
    /// `SeedError::Yaml` if it does not parse.
    pub async fn from_path(path: &Path) -> Result<Self, SeedError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| SeedError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_yaml(&content)
    }

    /// Parse seed YAML.
    ///
    /// # Errors
    ///
    /// Returns `SeedError::Yaml` if the text does not parse.
    pub fn from_yaml(yaml: &str) -> Result<Self, SeedError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Validate every entry and resolve every name reference, then compute the
    /// totals each order would have. Nothing is written.
    ///
    /// Lines are priced from their products exactly as the store prices them.
    ///
    /// # Errors
    ///
    /// Returns `SeedError::Validation` for the first invalid entry,
    /// `SeedError::DuplicateName` for a name defined twice in one section and
    /// `SeedError::UnknownReference` for a name that is not defined in the file.
    pub fn preview(&self) -> Result<Vec<OrderPreview>, SeedError> {
        let mut districts = Names::new("district");
        for (district, id) in self.districts.iter().zip(1..) {
            district
                .validate()
                .map_err(invalid("district", &district.name))?;
            districts.insert(&district.name, DistrictId::new(id))?;
        }

        let mut categories = Names::new("category");
        for (category, id) in self.categories.iter().zip(1..) {
            category
                .validate()
                .map_err(invalid("category", &category.name))?;
            categories.insert(&category.name, CategoryId::new(id))?;
        }

        let mut shippers = Names::new("shipper");
        for (shipper, id) in self.shippers.iter().zip(1..) {
            shipper.validate().map_err(invalid("shipper", &shipper.name))?;
            shippers.insert(&shipper.name, ShipperId::new(id))?;
        }

        let mut products = HashMap::new();
        for (entry, id) in self.products.iter().zip(1..) {
            let input = entry.resolve(categories.get(&entry.category)?);
            input.validate().map_err(invalid("product", &entry.name))?;
            if products.contains_key(&entry.name) {
                return Err(SeedError::DuplicateName {
                    entity: "product",
                    name: entry.name.clone(),
                });
            }
            products.insert(entry.name.clone(), preview_product(ProductId::new(id), input));
        }

        let mut customers = Names::new("customer");
        for (entry, id) in self.customers.iter().zip(1..) {
            districts.get_optional(entry.district.as_deref())?;
            entry
                .customer
                .validate()
                .map_err(invalid("customer", &entry.customer.name))?;
            customers.insert(&entry.customer.name, CustomerId::new(id))?;
        }

        let mut ledger = InMemoryLedger::default();
        let mut previews = Vec::with_capacity(self.orders.len());
        for (entry, id) in self.orders.iter().zip(1..) {
            let order_id = OrderId::new(id);
            let input = entry.resolve(
                customers.get(&entry.customer)?,
                shippers.get_optional(entry.shipper.as_deref())?,
            );
            input.validate().map_err(invalid("order", &entry.customer))?;
            ledger.insert_order(order_id, input.freight);

            for line in &entry.lines {
                let product = products.get(&line.product).ok_or_else(|| {
                    SeedError::UnknownReference {
                        entity: "product",
                        name: line.product.clone(),
                    }
                })?;
                let detail = NewOrderDetail {
                    order_id,
                    product_id: product.id,
                    quantity: line.quantity,
                    discount: line.discount,
                };
                detail.validate().map_err(invalid("order line", &line.product))?;

                let priced = detail.priced(Some(product));
                ledger.add_line(
                    order_id,
                    OrderLine::new(priced.unit_price.unwrap_or(Decimal::ZERO), priced.quantity),
                );
            }

            previews.push(OrderPreview {
                customer: entry.customer.clone(),
                order_date: entry.order_date,
                totals: OrderTotalCalculator::new(&ledger)
                    .compute_totals(&OrderRef::ById(order_id).into()),
            });
        }

        Ok(previews)
    }
}

fn preview_product(id: ProductId, input: NewProduct) -> Product {
    Product {
        id,
        name: input.name,
        category_id: Some(input.category_id),
        quantity_per_unit: input.quantity_per_unit,
        unit_price: input.unit_price,
        in_stock: input.in_stock,
        on_order: input.on_order,
        reorder_level: input.reorder_level,
        discontinued: input.discontinued,
    }
}

/// Insert every entry of `file`, in dependency order, in one transaction.
///
/// The file is checked with [`SeedFile::preview`] first, so a file with an
/// invalid entry writes nothing. A write that fails part way rolls back every
/// row inserted before it.
///
/// # Errors
///
/// Returns the first validation, reference or repository error.
pub async fn seed(pool: &PgPool, file: &SeedFile) -> Result<SeedSummary, SeedError> {
    file.preview()?;

    let mut tx = pool.begin().await.map_err(RepositoryError::from)?;
    let mut summary = SeedSummary::default();

    let mut districts = Names::new("district");
    for input in &file.districts {
        let district = DistrictRepository::create_in(&mut *tx, input).await?;
        districts.insert(&district.name, district.id)?;
        summary.districts += 1;
    }

    let mut categories = Names::new("category");
    for input in &file.categories {
        let category = CategoryRepository::create_in(&mut *tx, input).await?;
        categories.insert(&category.name, category.id)?;
        summary.categories += 1;
    }

    let mut shippers = Names::new("shipper");
    for input in &file.shippers {
        let shipper = ShipperRepository::create_in(&mut *tx, input).await?;
        shippers.insert(&shipper.name, shipper.id)?;
        summary.shippers += 1;
    }

    let mut products = Names::new("product");
    for entry in &file.products {
        let input = entry.resolve(categories.get(&entry.category)?);
        let product = ProductRepository::create_in(&mut *tx, &input).await?;
        products.insert(&product.name, product.id)?;
        summary.products += 1;
    }

    let mut customers = Names::new("customer");
    for entry in &file.customers {
        let input = NewCustomer {
            district_id: districts.get_optional(entry.district.as_deref())?,
            ..entry.customer.clone()
        };
        let customer = CustomerRepository::create_in(&mut *tx, &input).await?;
        customers.insert(&customer.name, customer.id)?;
        summary.customers += 1;
    }

    for entry in &file.orders {
        let input = entry.resolve(
            customers.get(&entry.customer)?,
            shippers.get_optional(entry.shipper.as_deref())?,
        );
        let order = OrderRepository::create_in(&mut *tx, &input).await?;
        summary.orders += 1;

        for line in &entry.lines {
            let detail = NewOrderDetail {
                order_id: order.id,
                product_id: products.get(&line.product)?,
                quantity: line.quantity,
                discount: line.discount,
            };
            OrderDetailRepository::create_in(&mut *tx, &detail).await?;
            summary.order_details += 1;
        }

        tracing::debug!(order_id = %order.id, lines = entry.lines.len(), "Seeded order");
    }

    tx.commit().await.map_err(RepositoryError::from)?;

    tracing::debug!(?summary, "Seed complete");
    Ok(summary)
}
