// ⚠️ Error Types - Rental domain failures
// Every error is raised before any state change happens

use thiserror::Error;
use uuid::Uuid;

/// Errors raised by the rental domain model
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RentalError {
    /// Bad field value on construction or in a setter
    #[error("Validation failed for {field}: {message}")]
    Validation { field: String, message: String },

    /// Customer lacks the permission required for the action
    #[error("Permission '{permission}' is required for '{action}'")]
    PermissionDenied { permission: String, action: String },

    /// Accessory is not attached to the rental
    #[error("Accessory not found: {0}")]
    AccessoryNotFound(Uuid),

    /// Rental id is not in the directory
    #[error("Rental not found: {0}")]
    RentalNotFound(Uuid),

    /// Instrument is already rented out
    #[error("Instrument '{0}' is already rented")]
    AlreadyUnavailable(String),

    /// No constructor registered for the type tag
    #[error("Unknown instrument type: {0}")]
    UnknownType(String),

    /// Type tag registered twice
    #[error("Instrument type already registered: {0}")]
    DuplicateType(String),

    /// Rental starts after it ends
    #[error("Rental start date {start} is after end date {end}")]
    DateRange { start: String, end: String },
}

impl RentalError {
    /// Shorthand for a validation failure
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        RentalError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

pub type RentalResult<T> = Result<T, RentalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = RentalError::validation("name", "must not be empty");
        assert_eq!(err.to_string(), "Validation failed for name: must not be empty");

        let err = RentalError::UnknownType("kazoo".to_string());
        assert_eq!(err.to_string(), "Unknown instrument type: kazoo");

        let err = RentalError::PermissionDenied {
            permission: "can_rent".to_string(),
            action: "rent".to_string(),
        };
        assert!(err.to_string().contains("can_rent"));
    }
}
