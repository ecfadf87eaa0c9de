//! Catalog repositories: categories, products and shippers.

use rust_decimal::Decimal;
use sqlx::{PgExecutor, PgPool};

use northwind_core::models::{
    Category, NewCategory, NewProduct, NewShipper, Product, Shipper,
};
use northwind_core::{CategoryId, ProductId, ShipperId};

use super::RepositoryError;

const PRODUCT_COLUMNS: &str = "id, name, category_id, quantity_per_unit, unit_price, \
     in_stock, on_order, reorder_level, discontinued";

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `PostgreSQL` category queries.
#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: i32,
    name: String,
    description: Option<String>,
    picture: Option<String>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: CategoryId::new(row.id),
            name: row.name,
            description: row.description,
            picture: row.picture,
        }
    }
}

/// Internal row type for `PostgreSQL` product queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    category_id: Option<i32>,
    quantity_per_unit: Option<String>,
    unit_price: Option<Decimal>,
    in_stock: Option<i32>,
    on_order: Option<i32>,
    reorder_level: Option<i32>,
    discontinued: Option<bool>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            category_id: row.category_id.map(CategoryId::new),
            quantity_per_unit: row.quantity_per_unit,
            unit_price: row.unit_price,
            in_stock: row.in_stock,
            on_order: row.on_order,
            reorder_level: row.reorder_level,
            discontinued: row.discontinued.unwrap_or(false),
        }
    }
}

/// Internal row type for `PostgreSQL` shipper queries.
#[derive(Debug, sqlx::FromRow)]
struct ShipperRow {
    id: i32,
    name: String,
    phone: Option<String>,
}

impl From<ShipperRow> for Shipper {
    fn from(row: ShipperRow) -> Self {
        Self {
            id: ShipperId::new(row.id),
            name: row.name,
            phone: row.phone,
        }
    }
}

// =============================================================================
// Category Repository
// =============================================================================

/// Repository for category database operations.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all categories by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, name, description, picture FROM category ORDER BY name, id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a category by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, name, description, picture FROM category WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Validation` if the input is invalid.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, input: &NewCategory) -> Result<Category, RepositoryError> {
        Self::create_in(self.pool, input).await
    }

    /// Like [`Self::create`], on any executor such as an open transaction.
    ///
    /// # Errors
    ///
    /// Same as [`Self::create`].
    pub async fn create_in<'e, E>(
        executor: E,
        input: &NewCategory,
    ) -> Result<Category, RepositoryError>
    where
        E: PgExecutor<'e>,
    {
        input.validate()?;
        let row = sqlx::query_as::<_, CategoryRow>(
            r"
            INSERT INTO category (name, description, picture)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, picture
            ",
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.picture)
        .fetch_one(executor)
        .await
        .map_err(|e| RepositoryError::from_write(e, "category"))?;

        Ok(row.into())
    }

    /// Replace every field of a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Validation` if the input is invalid.
    /// Returns `RepositoryError::NotFound` if the category does not exist.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update(
        &self,
        id: CategoryId,
        input: &NewCategory,
    ) -> Result<Category, RepositoryError> {
        input.validate()?;
        let row = sqlx::query_as::<_, CategoryRow>(
            r"
            UPDATE category SET name = $2, description = $3, picture = $4
            WHERE id = $1
            RETURNING id, name, description, picture
            ",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.picture)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, "category"))?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    /// Delete a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category does not exist.
    /// Returns `RepositoryError::Conflict` if products still reference it.
    pub async fn delete(&self, id: CategoryId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM category WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| RepositoryError::from_write(e, "category"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

// =============================================================================
// Product Repository
// =============================================================================

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products by name, optionally only those of one category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, category: Option<CategoryId>) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product \
             WHERE $1::int IS NULL OR category_id = $1 \
             ORDER BY name, id"
        ))
        .bind(category)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Validation` if the input is invalid.
    /// Returns `RepositoryError::Conflict` if the category does not exist.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, input: &NewProduct) -> Result<Product, RepositoryError> {
        Self::create_in(self.pool, input).await
    }

    /// Like [`Self::create`], on any executor such as an open transaction.
    ///
    /// # Errors
    ///
    /// Same as [`Self::create`].
    pub async fn create_in<'e, E>(
        executor: E,
        input: &NewProduct,
    ) -> Result<Product, RepositoryError>
    where
        E: PgExecutor<'e>,
    {
        input.validate()?;
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "INSERT INTO product (name, category_id, quantity_per_unit, unit_price, \
                                  in_stock, on_order, reorder_level, discontinued) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&input.name)
        .bind(input.category_id)
        .bind(&input.quantity_per_unit)
        .bind(input.unit_price)
        .bind(input.in_stock)
        .bind(input.on_order)
        .bind(input.reorder_level)
        .bind(input.discontinued)
        .fetch_one(executor)
        .await
        .map_err(|e| RepositoryError::from_write(e, "product"))?;

        Ok(row.into())
    }

    /// Replace every field of a product.
    ///
    /// Existing order details keep the price they were written with.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Validation` if the input is invalid.
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    /// Returns `RepositoryError::Conflict` if the category does not exist.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update(
        &self,
        id: ProductId,
        input: &NewProduct,
    ) -> Result<Product, RepositoryError> {
        input.validate()?;
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "UPDATE product SET name = $2, category_id = $3, quantity_per_unit = $4, \
                                unit_price = $5, in_stock = $6, on_order = $7, \
                                reorder_level = $8, discontinued = $9 \
             WHERE id = $1 \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .bind(&input.name)
        .bind(input.category_id)
        .bind(&input.quantity_per_unit)
        .bind(input.unit_price)
        .bind(input.in_stock)
        .bind(input.on_order)
        .bind(input.reorder_level)
        .bind(input.discontinued)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, "product"))?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    /// Returns `RepositoryError::Conflict` if order details still reference it.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM product WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| RepositoryError::from_write(e, "product"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

// =============================================================================
// Shipper Repository
// =============================================================================

/// Repository for shipper database operations.
pub struct ShipperRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ShipperRepository<'a> {
    /// Create a new shipper repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all shippers by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Shipper>, RepositoryError> {
        let rows =
            sqlx::query_as::<_, ShipperRow>("SELECT id, name, phone FROM shipper ORDER BY name, id")
                .fetch_all(self.pool)
                .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a shipper by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ShipperId) -> Result<Option<Shipper>, RepositoryError> {
        let row =
            sqlx::query_as::<_, ShipperRow>("SELECT id, name, phone FROM shipper WHERE id = $1")
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        Ok(row.map(Into::into))
    }

    /// Create a shipper.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Validation` if the input is invalid.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, input: &NewShipper) -> Result<Shipper, RepositoryError> {
        Self::create_in(self.pool, input).await
    }

    /// Like [`Self::create`], on any executor such as an open transaction.
    ///
    /// # Errors
    ///
    /// Same as [`Self::create`].
    pub async fn create_in<'e, E>(
        executor: E,
        input: &NewShipper,
    ) -> Result<Shipper, RepositoryError>
    where
        E: PgExecutor<'e>,
    {
        input.validate()?;
        let row = sqlx::query_as::<_, ShipperRow>(
            "INSERT INTO shipper (name, phone) VALUES ($1, $2) RETURNING id, name, phone",
        )
        .bind(&input.name)
        .bind(&input.phone)
        .fetch_one(executor)
        .await
        .map_err(|e| RepositoryError::from_write(e, "shipper"))?;

        Ok(row.into())
    }

    /// Replace every field of a shipper.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Validation` if the input is invalid.
    /// Returns `RepositoryError::NotFound` if the shipper does not exist.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update(
        &self,
        id: ShipperId,
        input: &NewShipper,
    ) -> Result<Shipper, RepositoryError> {
        input.validate()?;
        let row = sqlx::query_as::<_, ShipperRow>(
            "UPDATE shipper SET name = $2, phone = $3 WHERE id = $1 RETURNING id, name, phone",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.phone)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, "shipper"))?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    /// Delete a shipper.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the shipper does not exist.
    /// Returns `RepositoryError::Conflict` if orders still reference it.
    pub async fn delete(&self, id: ShipperId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM shipper WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| RepositoryError::from_write(e, "shipper"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
