//! Sales districts.

use serde::{Deserialize, Serialize};

use super::validation::{ValidationError, required};
use crate::types::DistrictId;

/// A sales district customers can be assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct District {
    /// Row ID.
    pub id: DistrictId,
    /// District name.
    pub name: String,
}

/// Input for creating or updating a district.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDistrict {
    /// District name (required).
    pub name: String,
}

impl NewDistrict {
    /// Validate the input.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::Required` if the name is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        required("name", &self.name, None)
    }
}
