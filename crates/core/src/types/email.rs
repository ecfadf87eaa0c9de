//! Customer email address.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// The input string is empty.
    #[error("email cannot be empty")]
    Empty,
    /// The input string is longer than the `customer.email` column.
    #[error("email must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains whitespace.
    #[error("email cannot contain whitespace")]
    Whitespace,
    /// The input does not contain exactly one @ symbol.
    #[error("email must contain exactly one @ symbol")]
    AtSymbol,
    /// The local part (before @) is empty.
    #[error("email local part cannot be empty")]
    EmptyLocalPart,
    /// The domain part (after @) is not a dotted host name.
    #[error("email domain must be a dotted host name")]
    InvalidDomain,
}

/// A customer email address.
///
/// ## Constraints
///
/// - Length: 1-256 characters (the width of `customer.email`)
/// - No whitespace
/// - Exactly one @ symbol with a non-empty local part
/// - A domain made of non-empty labels separated by dots, at least two labels
///
/// ## Examples
///
/// ```
/// use northwind_core::Email;
///
/// assert!(Email::parse("maria.anders@alfreds.de").is_ok());
///
/// assert!(Email::parse("").is_err());             // empty
/// assert!(Email::parse("maria@localhost").is_err()); // undotted domain
/// assert!(Email::parse("a@b@c.de").is_err());     // two @ symbols
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Maximum length of a stored email address.
    pub const MAX_LENGTH: usize = 256;

    /// Parse an `Email` from a string.
    ///
    /// # Errors
    ///
    /// Returns an [`EmailError`] describing the first violated constraint.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        if s.is_empty() {
            return Err(EmailError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if s.chars().any(char::is_whitespace) {
            return Err(EmailError::Whitespace);
        }

        let (local, domain) = s.split_once('@').ok_or(EmailError::AtSymbol)?;
        if domain.contains('@') {
            return Err(EmailError::AtSymbol);
        }

        if local.is_empty() {
            return Err(EmailError::EmptyLocalPart);
        }

        let mut labels = 0_usize;
        for label in domain.split('.') {
            if label.is_empty() {
                return Err(EmailError::InvalidDomain);
            }
            labels += 1;
        }
        if labels < 2 {
            return Err(EmailError::InvalidDomain);
        }

        Ok(Self(s.to_owned()))
    }

    /// Parse an optional email field.
    ///
    /// Blank input means "no email" and yields `Ok(None)`; anything else must
    /// be a valid address.
    ///
    /// # Errors
    ///
    /// Returns an [`EmailError`] if non-blank input is not a valid address.
    pub fn parse_optional(s: Option<&str>) -> Result<Option<Self>, EmailError> {
        match s.map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => Self::parse(value).map(Some),
        }
    }

    /// Returns the email address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Email` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Returns the domain part of the email (after the @).
    #[must_use]
    pub fn domain(&self) -> &str {
        self.0.split_once('@').map_or("", |(_, domain)| domain)
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Email {
    type Error = EmailError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_emails() {
        assert!(Email::parse("maria.anders@alfreds.de").is_ok());
        assert!(Email::parse("ana+orders@trujillo.com.mx").is_ok());
        assert!(Email::parse("x@y.io").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Email::parse(""), Err(EmailError::Empty));
    }

    #[test]
    fn test_parse_too_long() {
        let long = format!("{}@example.com", "a".repeat(250));
        assert!(matches!(
            Email::parse(&long),
            Err(EmailError::TooLong { max: 256 })
        ));
    }

    #[test]
    fn test_parse_whitespace() {
        assert_eq!(
            Email::parse("maria anders@alfreds.de"),
            Err(EmailError::Whitespace)
        );
    }

    #[test]
    fn test_parse_at_symbol_count() {
        assert_eq!(Email::parse("no-at-symbol"), Err(EmailError::AtSymbol));
        assert_eq!(Email::parse("a@b@c.de"), Err(EmailError::AtSymbol));
    }

    #[test]
    fn test_parse_empty_local_part() {
        assert_eq!(Email::parse("@alfreds.de"), Err(EmailError::EmptyLocalPart));
    }

    #[test]
    fn test_parse_bad_domains() {
        assert_eq!(Email::parse("maria@"), Err(EmailError::InvalidDomain));
        assert_eq!(Email::parse("maria@localhost"), Err(EmailError::InvalidDomain));
        assert_eq!(Email::parse("maria@alfreds..de"), Err(EmailError::InvalidDomain));
        assert_eq!(Email::parse("maria@.de"), Err(EmailError::InvalidDomain));
    }

    #[test]
    fn test_parse_optional_blank_is_none() {
        assert_eq!(Email::parse_optional(None), Ok(None));
        assert_eq!(Email::parse_optional(Some("   ")), Ok(None));
    }

    #[test]
    fn test_parse_optional_validates_present_value() {
        let email = Email::parse_optional(Some(" ana@trujillo.mx ")).unwrap();
        assert_eq!(email.unwrap().as_str(), "ana@trujillo.mx");
        assert!(Email::parse_optional(Some("nope")).is_err());
    }

    #[test]
    fn test_domain() {
        let email = Email::parse("ana@trujillo.mx").unwrap();
        assert_eq!(email.domain(), "trujillo.mx");
    }

    #[test]
    fn test_serde_rejects_invalid() {
        let parsed: Email = serde_json::from_str("\"ana@trujillo.mx\"").unwrap();
        assert_eq!(parsed.to_string(), "ana@trujillo.mx");
        assert!(serde_json::from_str::<Email>("\"ana\"").is_err());
    }
}
