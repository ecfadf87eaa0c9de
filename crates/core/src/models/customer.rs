//! Customers and the notes kept about them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{ValidationError, max_length, required};
use crate::types::{CustomerId, CustomerNoteId, DistrictId, Email};

/// A customer (domain type).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Row ID.
    pub id: CustomerId,
    /// Company name.
    pub name: String,
    /// Contact person.
    pub contact: Option<String>,
    /// Contact's job title. Row actions may be restricted by this value.
    pub title: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Region or state.
    pub region: Option<String>,
    /// Postal code.
    pub postal_code: Option<String>,
    /// Country.
    pub country: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Email address, if known.
    pub email: Option<Email>,
    /// Assigned sales district.
    pub district_id: Option<DistrictId>,
}

/// Input for creating or updating a customer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCustomer {
    /// Company name (required).
    pub name: String,
    /// Contact person.
    #[serde(default)]
    pub contact: Option<String>,
    /// Contact's job title.
    #[serde(default)]
    pub title: Option<String>,
    /// Street address.
    #[serde(default)]
    pub address: Option<String>,
    /// City.
    #[serde(default)]
    pub city: Option<String>,
    /// Region or state.
    #[serde(default)]
    pub region: Option<String>,
    /// Postal code.
    #[serde(default)]
    pub postal_code: Option<String>,
    /// Country.
    #[serde(default)]
    pub country: Option<String>,
    /// Phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Raw email input; blank means none.
    #[serde(default)]
    pub email: Option<String>,
    /// Assigned sales district.
    #[serde(default)]
    pub district_id: Option<DistrictId>,
}

impl NewCustomer {
    /// Validate the input.
    ///
    /// # Errors
    ///
    /// Returns the first failing field: blank name, a value wider than its
    /// column, or a malformed email.
    pub fn validate(&self) -> Result<(), ValidationError> {
        required("name", &self.name, Some(40))?;
        max_length("contact", self.contact.as_deref(), Some(30))?;
        max_length("title", self.title.as_deref(), Some(30))?;
        max_length("address", self.address.as_deref(), Some(60))?;
        max_length("city", self.city.as_deref(), Some(15))?;
        max_length("region", self.region.as_deref(), Some(15))?;
        max_length("postal_code", self.postal_code.as_deref(), Some(10))?;
        max_length("country", self.country.as_deref(), Some(15))?;
        max_length("phone", self.phone.as_deref(), Some(24))?;
        self.email()?;
        Ok(())
    }

    /// The parsed email, `None` when the input is blank.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::Email` if a non-blank value is malformed.
    pub fn email(&self) -> Result<Option<Email>, ValidationError> {
        Ok(Email::parse_optional(self.email.as_deref())?)
    }
}

/// A timestamped note about a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerNote {
    /// Row ID.
    pub id: CustomerNoteId,
    /// Customer the note belongs to.
    pub customer_id: CustomerId,
    /// When the note was written.
    pub timestamp: DateTime<Utc>,
    /// Note text.
    pub note: String,
}

/// Input for creating a customer note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCustomerNote {
    /// Customer the note belongs to.
    pub customer_id: CustomerId,
    /// Explicit timestamp; defaults to the creation time.
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    /// Note text (required).
    pub note: String,
}

impl NewCustomerNote {
    /// Validate the input.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::Required` if the note text is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        required("note", &self.note, None)
    }

    /// The timestamp to store, falling back to `now`.
    #[must_use]
    pub fn timestamp_or(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.timestamp.unwrap_or(now)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::types::EmailError;

    fn alfreds() -> NewCustomer {
        NewCustomer {
            name: "Alfreds Futterkiste".to_owned(),
            contact: Some("Maria Anders".to_owned()),
            title: Some("Sales Representative".to_owned()),
            city: Some("Berlin".to_owned()),
            country: Some("Germany".to_owned()),
            ..NewCustomer::default()
        }
    }

    #[test]
    fn test_valid_customer_without_email() {
        assert!(alfreds().validate().is_ok());
        assert_eq!(alfreds().email().unwrap(), None);
    }

    #[test]
    fn test_blank_email_is_allowed() {
        let customer = NewCustomer {
            email: Some(String::new()),
            ..alfreds()
        };
        assert!(customer.validate().is_ok());
    }

    #[test]
    fn test_malformed_email_rejected() {
        let customer = NewCustomer {
            email: Some("maria.anders".to_owned()),
            ..alfreds()
        };
        assert_eq!(
            customer.validate(),
            Err(ValidationError::Email(EmailError::AtSymbol))
        );
    }

    #[test]
    fn test_name_width() {
        let customer = NewCustomer {
            name: "x".repeat(41),
            ..alfreds()
        };
        assert_eq!(
            customer.validate(),
            Err(ValidationError::TooLong {
                field: "name",
                max: 40
            })
        );
    }

    #[test]
    fn test_postal_code_width() {
        let customer = NewCustomer {
            postal_code: Some("12209-00000".to_owned()),
            ..alfreds()
        };
        assert!(matches!(
            customer.validate(),
            Err(ValidationError::TooLong {
                field: "postal_code",
                ..
            })
        ));
    }

    #[test]
    fn test_note_timestamp_defaults_to_now() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let note = NewCustomerNote {
            customer_id: CustomerId::new(1),
            timestamp: None,
            note: "Prefers morning deliveries".to_owned(),
        };
        assert!(note.validate().is_ok());
        assert_eq!(note.timestamp_or(now), now);
    }

    #[test]
    fn test_blank_note_rejected() {
        let note = NewCustomerNote {
            customer_id: CustomerId::new(1),
            timestamp: None,
            note: "\n".to_owned(),
        };
        assert_eq!(
            note.validate(),
            Err(ValidationError::Required { field: "note" })
        );
    }
}
