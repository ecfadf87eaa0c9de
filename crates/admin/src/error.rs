//! Unified error handling for admin.

use thiserror::Error;

use northwind_core::models::ValidationError;

use crate::components::GridError;
use crate::config::ConfigError;
use crate::db::RepositoryError;
use crate::policy::PolicyLoadError;
use crate::seed::SeedError;

/// Application-level error type for the admin data layer.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(RepositoryError),

    /// Connecting to the database failed.
    #[error("Connection error: {0}")]
    Connection(#[from] sqlx::Error),

    /// Input failed a field validator.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The action policy could not be loaded.
    #[error("Policy error: {0}")]
    Policy(#[from] PolicyLoadError),

    /// Seeding failed.
    #[error("Seed error: {0}")]
    Seed(#[from] SeedError),

    /// Unknown table or grid mode.
    #[error("Grid error: {0}")]
    Grid(#[from] GridError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from the caller.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Validation(e) => Self::Validation(e),
            other => Self::Database(other),
        }
    }
}

impl AppError {
    /// Whether the caller can fix the error by changing its input.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::Grid(_)
                | Self::NotFound(_)
                | Self::BadRequest(_)
                | Self::Database(RepositoryError::NotFound | RepositoryError::Conflict(_))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("order 10248".to_string());
        assert_eq!(err.to_string(), "Not found: order 10248");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");

        let err = AppError::from(ValidationError::Required { field: "name" });
        assert!(err.to_string().starts_with("Validation error: "));
    }

    #[test]
    fn test_repository_validation_surfaces_as_validation() {
        let err = AppError::from(RepositoryError::Validation(ValidationError::Required {
            field: "name",
        }));
        assert!(matches!(
            err,
            AppError::Validation(ValidationError::Required { field: "name" })
        ));
        assert!(err.is_client_error());
    }

    #[test]
    fn test_app_error_classification() {
        assert!(AppError::from(ValidationError::Required { field: "name" }).is_client_error());
        assert!(AppError::from(RepositoryError::NotFound).is_client_error());
        assert!(AppError::from(RepositoryError::Conflict("fk".to_string())).is_client_error());
        assert!(AppError::from(GridError::UnknownMode("grid".to_string())).is_client_error());
        assert!(!AppError::from(RepositoryError::DataCorruption("x".to_string())).is_client_error());
        assert!(
            !AppError::from(ConfigError::MissingEnvVar("DATABASE_URL".to_string()))
                .is_client_error()
        );
    }
}
