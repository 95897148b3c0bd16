// 🎼 Instrument Core - Shared state and the polymorphic Instrument trait
//
// Every variant (guitar, piano, violin) embeds an InstrumentCore and
// implements Instrument. Callers hold instruments through SharedInstrument
// so that rentals can flip availability on the same object.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::any::Any;
use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{RentalError, RentalResult};

/// Rentals longer than this many days get the long-rental discount
pub const LONG_RENTAL_DAYS: u32 = 7;

/// Multiplier applied to long rentals (20% off)
pub const LONG_RENTAL_FACTOR: f64 = 0.8;

/// Apply the long-rental discount to an already surcharged amount
pub fn apply_long_rental_discount(amount: f64, days: u32) -> f64 {
    if days > LONG_RENTAL_DAYS {
        amount * LONG_RENTAL_FACTOR
    } else {
        amount
    }
}

// ============================================================================
// CONDITION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    New,
    Used,
    Refurbished,
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::New => "new",
            Condition::Used => "used",
            Condition::Refurbished => "refurbished",
        }
    }

    /// Rank used when comparing instruments (higher is better)
    pub fn rank(&self) -> u8 {
        match self {
            Condition::Used => 1,
            Condition::Refurbished => 2,
            Condition::New => 3,
        }
    }
}

impl FromStr for Condition {
    type Err = RentalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "new" => Ok(Condition::New),
            "used" => Ok(Condition::Used),
            "refurbished" => Ok(Condition::Refurbished),
            other => Err(RentalError::validation(
                "condition",
                format!("'{}' is not one of new, used, refurbished", other),
            )),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// INSTRUMENT SPEC (constructor input)
// ============================================================================

/// Everything a registry constructor needs to build an instrument
///
/// Variant-specific values (`number_of_strings`, `key_count`, `bow_included`)
/// travel in `attributes` so one constructor signature fits every variant.
#[derive(Debug, Clone)]
pub struct InstrumentSpec {
    pub id: Option<Uuid>,
    pub name: String,
    pub condition: Condition,
    pub daily_rate: f64,
    pub available: bool,
    pub attributes: Map<String, Value>,
}

impl InstrumentSpec {
    pub fn new(name: impl Into<String>, condition: Condition, daily_rate: f64) -> Self {
        InstrumentSpec {
            id: None,
            name: name.into(),
            condition,
            daily_rate,
            available: true,
            attributes: Map::new(),
        }
    }

    /// Builder: add a variant-specific attribute
    pub fn with_attribute(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }

    /// Builder: keep an existing identity (used when restoring)
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    /// Builder: set the availability flag (used when restoring)
    pub fn with_availability(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    pub fn int_attribute(&self, key: &str) -> RentalResult<i64> {
        self.attributes
            .get(key)
            .and_then(Value::as_i64)
            .ok_or_else(|| RentalError::validation(key, "integer attribute is required"))
    }

    pub fn bool_attribute(&self, key: &str) -> RentalResult<bool> {
        self.attributes
            .get(key)
            .and_then(Value::as_bool)
            .ok_or_else(|| RentalError::validation(key, "boolean attribute is required"))
    }
}

// ============================================================================
// INSTRUMENT RECORD (persisted form)
// ============================================================================

/// Flat, tagged representation written to and read from JSON snapshots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub instrument_id: Uuid,
    pub name: String,
    pub condition: Condition,
    pub daily_rate: f64,
    pub is_available: bool,

    /// Variant fields, flattened next to the shared ones
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl InstrumentRecord {
    pub fn into_spec(self) -> InstrumentSpec {
        InstrumentSpec {
            id: Some(self.instrument_id),
            name: self.name,
            condition: self.condition,
            daily_rate: self.daily_rate,
            available: self.is_available,
            attributes: self.attributes,
        }
    }
}

// ============================================================================
// INSTRUMENT CORE
// ============================================================================

/// Fields shared by every instrument variant
#[derive(Debug, Clone)]
pub struct InstrumentCore {
    id: Uuid,
    name: String,
    condition: Condition,
    daily_rate: f64,
    available: bool,
}

impl InstrumentCore {
    /// Validate the shared part of a spec
    pub fn from_spec(spec: &InstrumentSpec) -> RentalResult<Self> {
        validate_name(&spec.name)?;
        validate_daily_rate(spec.daily_rate)?;

        Ok(InstrumentCore {
            id: spec.id.unwrap_or_else(Uuid::new_v4),
            name: spec.name.clone(),
            condition: spec.condition,
            daily_rate: spec.daily_rate,
            available: spec.available,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn condition(&self) -> Condition {
        self.condition
    }

    pub fn daily_rate(&self) -> f64 {
        self.daily_rate
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> RentalResult<()> {
        let name = name.into();
        validate_name(&name)?;
        self.name = name;
        Ok(())
    }

    pub fn set_condition(&mut self, condition: Condition) {
        self.condition = condition;
    }

    pub fn set_daily_rate(&mut self, daily_rate: f64) -> RentalResult<()> {
        validate_daily_rate(daily_rate)?;
        self.daily_rate = daily_rate;
        Ok(())
    }

    /// Flip availability to false; there is no way back
    fn mark_rented(&mut self) -> RentalResult<()> {
        if !self.available {
            return Err(RentalError::AlreadyUnavailable(self.name.clone()));
        }
        self.available = false;
        Ok(())
    }

    fn comparison_key(&self) -> (f64, u8) {
        (self.daily_rate, self.condition.rank())
    }
}

/// Instruments compare by price and condition only, never by identity
impl PartialEq for InstrumentCore {
    fn eq(&self, other: &Self) -> bool {
        self.comparison_key() == other.comparison_key()
    }
}

impl PartialOrd for InstrumentCore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.comparison_key().partial_cmp(&other.comparison_key())
    }
}

fn validate_name(name: &str) -> RentalResult<()> {
    if name.trim().is_empty() {
        return Err(RentalError::validation("name", "instrument name must not be empty"));
    }
    Ok(())
}

fn validate_daily_rate(daily_rate: f64) -> RentalResult<()> {
    if !daily_rate.is_finite() || daily_rate <= 0.0 {
        return Err(RentalError::validation(
            "daily_rate",
            format!("must be positive, got {}", daily_rate),
        ));
    }
    Ok(())
}

// ============================================================================
// INSTRUMENT TRAIT
// ============================================================================

/// Instrument - the rentable capability every variant provides
///
/// Adding a variant means implementing this trait and registering a
/// constructor in the InstrumentRegistry; nothing else has to change.
pub trait Instrument: fmt::Display {
    /// Lower-case type tag used by the registry and in snapshots
    fn kind(&self) -> &'static str;

    fn core(&self) -> &InstrumentCore;

    fn core_mut(&mut self) -> &mut InstrumentCore;

    /// Price for `days` days: surcharges first, then the long-rental discount
    fn calculate_rental_cost(&self, days: u32) -> f64;

    /// Variant-specific fields for the persisted record
    fn attributes(&self) -> Map<String, Value>;

    /// Short per-instrument report line
    fn generate_report(&self) -> String;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn id(&self) -> Uuid {
        self.core().id()
    }

    fn name(&self) -> &str {
        self.core().name()
    }

    fn condition(&self) -> Condition {
        self.core().condition()
    }

    fn daily_rate(&self) -> f64 {
        self.core().daily_rate()
    }

    fn is_available(&self) -> bool {
        self.core().is_available()
    }

    /// Mark the instrument as rented out
    fn rent(&mut self) -> RentalResult<()> {
        self.core_mut().mark_rented()?;
        tracing::info!(instrument = %self.id(), kind = self.kind(), "Instrument rented");
        Ok(())
    }

    fn to_record(&self) -> InstrumentRecord {
        let core = self.core();
        InstrumentRecord {
            kind: self.kind().to_string(),
            instrument_id: core.id(),
            name: core.name().to_string(),
            condition: core.condition(),
            daily_rate: core.daily_rate(),
            is_available: core.is_available(),
            attributes: self.attributes(),
        }
    }
}

impl PartialEq for dyn Instrument + '_ {
    fn eq(&self, other: &Self) -> bool {
        self.core() == other.core()
    }
}

impl PartialOrd for dyn Instrument + '_ {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.core().partial_cmp(other.core())
    }
}

/// Single-threaded shared handle; rentals reference, never own, instruments
pub type SharedInstrument = Rc<RefCell<dyn Instrument>>;

/// Wrap a concrete instrument into a shared handle
pub fn share<I: Instrument + 'static>(instrument: I) -> SharedInstrument {
    Rc::new(RefCell::new(instrument))
}

// ============================================================================
// TESTS
// ============================================================================
