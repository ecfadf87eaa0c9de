//! District repository for database operations.

use sqlx::{PgExecutor, PgPool};

use northwind_core::DistrictId;
use northwind_core::models::{District, NewDistrict};

use super::RepositoryError;

/// Internal row type for `PostgreSQL` district queries.
#[derive(Debug, sqlx::FromRow)]
struct DistrictRow {
    id: i32,
    name: String,
}

impl From<DistrictRow> for District {
    fn from(row: DistrictRow) -> Self {
        Self {
            id: DistrictId::new(row.id),
            name: row.name,
        }
    }
}

/// Repository for district database operations.
pub struct DistrictRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> DistrictRepository<'a> {
    /// Create a new district repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all districts by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<District>, RepositoryError> {
        let rows = sqlx::query_as::<_, DistrictRow>(
            "SELECT id, name FROM district ORDER BY name, id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a district by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: DistrictId) -> Result<Option<District>, RepositoryError> {
        let row = sqlx::query_as::<_, DistrictRow>("SELECT id, name FROM district WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    /// Create a district.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Validation` if the input is invalid.
    /// Returns `RepositoryError::Conflict` on a constraint violation.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, input: &NewDistrict) -> Result<District, RepositoryError> {
        Self::create_in(self.pool, input).await
    }

    /// Like [`Self::create`], on any executor such as an open transaction.
    ///
    /// # Errors
    ///
    /// Same as [`Self::create`].
    pub async fn create_in<'e, E>(
        executor: E,
        input: &NewDistrict,
    ) -> Result<District, RepositoryError>
    where
        E: PgExecutor<'e>,
    {
        input.validate()?;
        let row = sqlx::query_as::<_, DistrictRow>(
            "INSERT INTO district (name) VALUES ($1) RETURNING id, name",
        )
        .bind(&input.name)
        .fetch_one(executor)
        .await
        .map_err(|e| RepositoryError::from_write(e, "district"))?;

        Ok(row.into())
    }

    /// Rename a district.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Validation` if the input is invalid.
    /// Returns `RepositoryError::NotFound` if the district does not exist.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update(
        &self,
        id: DistrictId,
        input: &NewDistrict,
    ) -> Result<District, RepositoryError> {
        input.validate()?;
        let row = sqlx::query_as::<_, DistrictRow>(
            "UPDATE district SET name = $2 WHERE id = $1 RETURNING id, name",
        )
        .bind(id)
        .bind(&input.name)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, "district"))?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    /// Delete a district.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the district does not exist.
    /// Returns `RepositoryError::Conflict` if customers still reference it.
    pub async fn delete(&self, id: DistrictId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM district WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| RepositoryError::from_write(e, "district"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
