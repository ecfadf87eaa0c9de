//! Customer and customer note repositories for database operations.
//!
//! Every write runs `NewCustomer::validate` first, so a malformed email is
//! rejected as `RepositoryError::Validation`. Stored emails are re-parsed on
//! the way out; a value that no longer parses is reported as data corruption.

use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};

use northwind_core::models::{Customer, CustomerNote, NewCustomer, NewCustomerNote};
use northwind_core::{CustomerId, CustomerNoteId, DistrictId, Email};

use super::RepositoryError;

const CUSTOMER_COLUMNS: &str = "id, name, contact, title, address, city, region, \
     postal_code, country, phone, email, district_id";

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `PostgreSQL` customer queries.
#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: i32,
    name: String,
    contact: Option<String>,
    title: Option<String>,
    address: Option<String>,
    city: Option<String>,
    region: Option<String>,
    postal_code: Option<String>,
    country: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    district_id: Option<i32>,
}

impl TryFrom<CustomerRow> for Customer {
    type Error = RepositoryError;

    fn try_from(row: CustomerRow) -> Result<Self, Self::Error> {
        let email = Email::parse_optional(row.email.as_deref()).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: CustomerId::new(row.id),
            name: row.name,
            contact: row.contact,
            title: row.title,
            address: row.address,
            city: row.city,
            region: row.region,
            postal_code: row.postal_code,
            country: row.country,
            phone: row.phone,
            email,
            district_id: row.district_id.map(DistrictId::new),
        })
    }
}

/// Internal row type for `PostgreSQL` customer note queries.
#[derive(Debug, sqlx::FromRow)]
struct CustomerNoteRow {
    id: i32,
    customer_id: i32,
    timestamp: DateTime<Utc>,
    note: String,
}

impl From<CustomerNoteRow> for CustomerNote {
    fn from(row: CustomerNoteRow) -> Self {
        Self {
            id: CustomerNoteId::new(row.id),
            customer_id: CustomerId::new(row.customer_id),
            timestamp: row.timestamp,
            note: row.note,
        }
    }
}

// =============================================================================
// Customer Repository
// =============================================================================

/// Repository for customer database operations.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List customers by name, optionally only those of one district.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored email is invalid.
    pub async fn list(
        &self,
        district: Option<DistrictId>,
    ) -> Result<Vec<Customer>, RepositoryError> {
        let rows = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customer \
             WHERE $1::int IS NULL OR district_id = $1 \
             ORDER BY name, id"
        ))
        .bind(district)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get a customer by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored email is invalid.
    pub async fn get(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customer WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Create a customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Validation` if the input is invalid.
    /// Returns `RepositoryError::Conflict` if the district does not exist.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, input: &NewCustomer) -> Result<Customer, RepositoryError> {
        Self::create_in(self.pool, input).await
    }

    /// Like [`Self::create`], on any executor such as an open transaction.
    ///
    /// # Errors
    ///
    /// Same as [`Self::create`].
    pub async fn create_in<'e, E>(
        executor: E,
        input: &NewCustomer,
    ) -> Result<Customer, RepositoryError>
    where
        E: PgExecutor<'e>,
    {
        input.validate()?;
        let email = input.email()?;
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "INSERT INTO customer (name, contact, title, address, city, region, \
                                   postal_code, country, phone, email, district_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {CUSTOMER_COLUMNS}"
        ))
        .bind(&input.name)
        .bind(&input.contact)
        .bind(&input.title)
        .bind(&input.address)
        .bind(&input.city)
        .bind(&input.region)
        .bind(&input.postal_code)
        .bind(&input.country)
        .bind(&input.phone)
        .bind(email.as_ref().map(Email::as_str))
        .bind(input.district_id)
        .fetch_one(executor)
        .await
        .map_err(|e| RepositoryError::from_write(e, "customer"))?;

        row.try_into()
    }

    /// Replace every field of a customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Validation` if the input is invalid.
    /// Returns `RepositoryError::NotFound` if the customer does not exist.
    /// Returns `RepositoryError::Conflict` if the district does not exist.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update(
        &self,
        id: CustomerId,
        input: &NewCustomer,
    ) -> Result<Customer, RepositoryError> {
        input.validate()?;
        let email = input.email()?;
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "UPDATE customer SET name = $2, contact = $3, title = $4, address = $5, \
                                 city = $6, region = $7, postal_code = $8, country = $9, \
                                 phone = $10, email = $11, district_id = $12 \
             WHERE id = $1 \
             RETURNING {CUSTOMER_COLUMNS}"
        ))
        .bind(id)
        .bind(&input.name)
        .bind(&input.contact)
        .bind(&input.title)
        .bind(&input.address)
        .bind(&input.city)
        .bind(&input.region)
        .bind(&input.postal_code)
        .bind(&input.country)
        .bind(&input.phone)
        .bind(email.as_ref().map(Email::as_str))
        .bind(input.district_id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, "customer"))?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }

    /// Delete a customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the customer does not exist.
    /// Returns `RepositoryError::Conflict` if orders or notes still reference it.
    pub async fn delete(&self, id: CustomerId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM customer WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| RepositoryError::from_write(e, "customer"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

// =============================================================================
// Customer Note Repository
// =============================================================================

/// Repository for customer note database operations.
pub struct CustomerNoteRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerNoteRepository<'a> {
    /// Create a new customer note repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a customer's notes, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<CustomerNote>, RepositoryError> {
        let rows = sqlx::query_as::<_, CustomerNoteRow>(
            r"
            SELECT id, customer_id, timestamp, note
            FROM customer_note
            WHERE customer_id = $1
            ORDER BY timestamp DESC, id DESC
            ",
        )
        .bind(customer_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a note by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: CustomerNoteId) -> Result<Option<CustomerNote>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerNoteRow>(
            "SELECT id, customer_id, timestamp, note FROM customer_note WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Create a note, stamped with the current time unless the input has one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Validation` if the input is invalid.
    /// Returns `RepositoryError::Conflict` if the customer does not exist.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, input: &NewCustomerNote) -> Result<CustomerNote, RepositoryError> {
        Self::create_in(self.pool, input).await
    }

    /// Like [`Self::create`], on any executor such as an open transaction.
    ///
    /// # Errors
    ///
    /// Same as [`Self::create`].
    pub async fn create_in<'e, E>(
        executor: E,
        input: &NewCustomerNote,
    ) -> Result<CustomerNote, RepositoryError>
    where
        E: PgExecutor<'e>,
    {
        input.validate()?;
        let row = sqlx::query_as::<_, CustomerNoteRow>(
            r"
            INSERT INTO customer_note (customer_id, timestamp, note)
            VALUES ($1, $2, $3)
            RETURNING id, customer_id, timestamp, note
            ",
        )
        .bind(input.customer_id)
        .bind(input.timestamp_or(Utc::now()))
        .bind(&input.note)
        .fetch_one(executor)
        .await
        .map_err(|e| RepositoryError::from_write(e, "customer note"))?;

        Ok(row.into())
    }

    /// Replace a note's text and timestamp.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Validation` if the input is invalid.
    /// Returns `RepositoryError::NotFound` if the note does not exist.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update(
        &self,
        id: CustomerNoteId,
        input: &NewCustomerNote,
    ) -> Result<CustomerNote, RepositoryError> {
        input.validate()?;
        let row = sqlx::query_as::<_, CustomerNoteRow>(
            r"
            UPDATE customer_note
            SET customer_id = $2, timestamp = COALESCE($3, timestamp), note = $4
            WHERE id = $1
            RETURNING id, customer_id, timestamp, note
            ",
        )
        .bind(id)
        .bind(input.customer_id)
        .bind(input.timestamp)
        .bind(&input.note)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, "customer note"))?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    /// Delete a note.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the note does not exist.
    pub async fn delete(&self, id: CustomerNoteId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM customer_note WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
