// 👤 Customer Entity - identity + permission set
//
// Permissions are plain strings checked by an explicit guard at the start of
// every mutating rental action.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

use crate::error::{RentalError, RentalResult};

/// Permission required to rent an instrument
pub const CAN_RENT: &str = "can_rent";

/// Permission required to add or remove accessories
pub const CAN_MODIFY_RENTAL: &str = "can_modify_rental";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CustomerRecord")]
pub struct Customer {
    customer_id: Uuid,
    name: String,
    email: String,
    phone: Option<String>,
    permissions: BTreeSet<String>,
}

/// Unvalidated shape read from snapshots
#[derive(Deserialize)]
struct CustomerRecord {
    customer_id: Uuid,
    name: String,
    email: String,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    permissions: BTreeSet<String>,
}

impl TryFrom<CustomerRecord> for Customer {
    type Error = RentalError;

    fn try_from(record: CustomerRecord) -> Result<Self, Self::Error> {
        let mut customer = Customer::with_id(record.customer_id, record.name, record.email)?;
        customer.phone = record.phone;
        customer.permissions = record.permissions;
        Ok(customer)
    }
}

impl Customer {
    /// Create a customer with a fresh id and no permissions
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> RentalResult<Self> {
        Customer::with_id(Uuid::new_v4(), name, email)
    }

    pub fn with_id(
        customer_id: Uuid,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> RentalResult<Self> {
        let name = name.into();
        let email = email.into();

        if name.trim().is_empty() {
            return Err(RentalError::validation("name", "customer name must not be empty"));
        }
        if !email.contains('@') || !email.contains('.') {
            return Err(RentalError::validation(
                "email",
                format!("'{}' is not a valid email address", email),
            ));
        }

        Ok(Customer {
            customer_id,
            name,
            email,
            phone: None,
            permissions: BTreeSet::new(),
        })
    }

    /// Builder: set phone number
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Builder: grant a permission
    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        self.permissions.insert(permission.into());
        self
    }

    pub fn id(&self) -> Uuid {
        self.customer_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn permissions(&self) -> &BTreeSet<String> {
        &self.permissions
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }

    /// Guard: fail with PermissionDenied unless the permission is held
    pub fn require(&self, permission: &str, action: &str) -> RentalResult<()> {
        if self.has_permission(permission) {
            return Ok(());
        }

        tracing::warn!(
            customer = %self.customer_id,
            permission,
            action,
            "Permission denied"
        );
        Err(RentalError::PermissionDenied {
            permission: permission.to_string(),
            action: action.to_string(),
        })
    }
}

impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Customer: {}, email: {}, phone: {}",
            self.name,
            self.email,
            self.phone.as_deref().unwrap_or("not provided")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_creation() {
        let customer = Customer::new("Ivan Ivanov", "ivan@example.com")
            .unwrap()
            .with_phone("+79991234567")
            .with_permission(CAN_RENT)
            .with_permission(CAN_MODIFY_RENTAL);

        assert_eq!(customer.name(), "Ivan Ivanov");
        assert_eq!(customer.phone(), Some("+79991234567"));
        assert!(customer.has_permission(CAN_RENT));
        assert!(customer.has_permission(CAN_MODIFY_RENTAL));
        assert_eq!(customer.permissions().len(), 2);
    }

    #[test]
    fn test_customer_email_validation() {
        assert!(Customer::new("Petr", "petr.example.com").is_err());
        assert!(Customer::new("Petr", "petr@example").is_err());
        assert!(Customer::new("Petr", "petr@example.com").is_ok());
    }

    #[test]
    fn test_customer_name_validation() {
        assert!(matches!(
            Customer::new("", "a@b.c"),
            Err(RentalError::Validation { .. })
        ));
    }

    #[test]
    fn test_require_guard() {
        let customer = Customer::new("Petr", "petr@example.com").unwrap();
        let denied = customer.require(CAN_RENT, "rent");
        assert_eq!(
            denied,
            Err(RentalError::PermissionDenied {
                permission: CAN_RENT.to_string(),
                action: "rent".to_string(),
            })
        );

        let customer = customer.with_permission(CAN_RENT);
        assert!(customer.require(CAN_RENT, "rent").is_ok());
    }

    #[test]
    fn test_customer_display_without_phone() {
        let customer = Customer::new("Petr", "petr@example.com").unwrap();
        assert!(customer.to_string().contains("phone: not provided"));
    }

    #[test]
    fn test_customer_json_round_trip() {
        let customer = Customer::new("Ivan", "ivan@example.com")
            .unwrap()
            .with_permission(CAN_RENT);
        let json = serde_json::to_string(&customer).unwrap();
        let back: Customer = serde_json::from_str(&json).unwrap();
        assert_eq!(back, customer);
    }
}
