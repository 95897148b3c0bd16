// 🎒 Accessory Entity - priced add-on shared between rentals
//
// Accessories are immutable once validated; rentals hold them through Rc so
// the same case or stand can be attached to several rentals.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::{RentalError, RentalResult};

/// Accessory - identity plus a per-day cost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AccessoryRecord")]
pub struct Accessory {
    accessory_id: Uuid,
    name: String,
    cost: f64,
}

/// Unvalidated shape read from snapshots
#[derive(Deserialize)]
struct AccessoryRecord {
    accessory_id: Uuid,
    name: String,
    cost: f64,
}

impl TryFrom<AccessoryRecord> for Accessory {
    type Error = RentalError;

    fn try_from(record: AccessoryRecord) -> Result<Self, Self::Error> {
        Accessory::with_id(record.accessory_id, record.name, record.cost)
    }
}

impl Accessory {
    /// Create an accessory with a fresh id
    pub fn new(name: impl Into<String>, cost: f64) -> RentalResult<Self> {
        Accessory::with_id(Uuid::new_v4(), name, cost)
    }

    /// Create an accessory with a known id (restoring from storage)
    pub fn with_id(accessory_id: Uuid, name: impl Into<String>, cost: f64) -> RentalResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(RentalError::validation("name", "accessory name must not be empty"));
        }
        if !cost.is_finite() || cost < 0.0 {
            return Err(RentalError::validation(
                "cost",
                format!("accessory cost must not be negative, got {}", cost),
            ));
        }

        Ok(Accessory {
            accessory_id,
            name,
            cost,
        })
    }

    pub fn id(&self) -> Uuid {
        self.accessory_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cost per rental day
    pub fn cost(&self) -> f64 {
        self.cost
    }
}

impl fmt::Display for Accessory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Accessory: {}, cost: {:.2}", self.name, self.cost)
    }
}
