// 🎹 Piano - premium tier for full keyboards

use serde_json::{Map, Value};
use std::any::Any;
use std::fmt;

use super::instrument::{
    apply_long_rental_discount, share, Instrument, InstrumentCore, InstrumentSpec, SharedInstrument,
};
use crate::error::{RentalError, RentalResult};

pub const PIANO_TAG: &str = "piano";

pub const MIN_KEYS: i64 = 61;
pub const MAX_KEYS: i64 = 88;

/// Pianos with more keys than this pay the premium rate
pub const PREMIUM_KEY_THRESHOLD: u8 = 76;
pub const PREMIUM_FACTOR: f64 = 1.2;

#[derive(Debug, Clone)]
pub struct Piano {
    core: InstrumentCore,
    key_count: u8,
}

impl Piano {
    pub fn new(spec: &InstrumentSpec, key_count: i64) -> RentalResult<Self> {
        let core = InstrumentCore::from_spec(spec)?;
        let key_count = validate_keys(key_count)?;
        tracing::debug!(instrument = %core.id(), name = core.name(), "Piano created");

        Ok(Piano { core, key_count })
    }

    /// Registry constructor: reads `key_count` from `InstrumentSpec::attributes`
    pub fn build(spec: &InstrumentSpec) -> RentalResult<SharedInstrument> {
        let keys = spec.int_attribute("key_count")?;
        Ok(share(Piano::new(spec, keys)?))
    }

    pub fn key_count(&self) -> u8 {
        self.key_count
    }

    pub fn set_key_count(&mut self, value: i64) -> RentalResult<()> {
        self.key_count = validate_keys(value)?;
        tracing::debug!(instrument = %self.core.id(), keys = value, "Piano key count changed");
        Ok(())
    }

    pub fn is_premium(&self) -> bool {
        self.key_count > PREMIUM_KEY_THRESHOLD
    }
}

fn validate_keys(value: i64) -> RentalResult<u8> {
    if !(MIN_KEYS..=MAX_KEYS).contains(&value) {
        return Err(RentalError::validation(
            "key_count",
            format!("must be between {} and {}, got {}", MIN_KEYS, MAX_KEYS, value),
        ));
    }
    Ok(value as u8)
}

impl Instrument for Piano {
    fn kind(&self) -> &'static str {
        PIANO_TAG
    }

    fn core(&self) -> &InstrumentCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut InstrumentCore {
        &mut self.core
    }

    fn calculate_rental_cost(&self, days: u32) -> f64 {
        let mut base = self.core.daily_rate() * f64::from(days);
        if self.is_premium() {
            base *= PREMIUM_FACTOR;
        }
        let cost = apply_long_rental_discount(base, days);
        tracing::debug!(instrument = %self.core.id(), days, cost, "Piano rental cost calculated");
        cost
    }

    fn attributes(&self) -> Map<String, Value> {
        let mut attributes = Map::new();
        attributes.insert("key_count".to_string(), Value::from(self.key_count));
        attributes
    }

    fn generate_report(&self) -> String {
        format!(
            "Report: piano {}, condition: {}, keys: {}",
            self.core.name(),
            self.core.condition(),
            self.key_count
        )
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl fmt::Display for Piano {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Piano: {}, condition: {}, keys: {}, available: {}",
            self.core.name(),
            self.core.condition(),
            self.key_count,
            self.core.is_available()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruments::Condition;

    fn piano(keys: i64) -> Piano {
        let spec = InstrumentSpec::new("Yamaha U1", Condition::Used, 100.0);
        Piano::new(&spec, keys).unwrap()
    }

    #[test]
    fn test_premium_piano_long_rental() {
        // 100 * 10 = 1000, premium x1.2, then 20% off
        let cost = piano(88).calculate_rental_cost(10);
        assert!((cost - 960.0).abs() < 1e-9);
    }

    #[test]
    fn test_standard_piano_has_no_premium() {
        let cost = piano(76).calculate_rental_cost(5);
        assert!((cost - 500.0).abs() < 1e-9);
        assert!(!piano(76).is_premium());
        assert!(piano(77).is_premium());
    }

    #[test]
    fn test_premium_piano_short_rental() {
        let cost = piano(88).calculate_rental_cost(5);
        assert!((cost - 600.0).abs() < 1e-9);
    }

    #[test]
    fn test_piano_key_bounds() {
        let spec = InstrumentSpec::new("Casio", Condition::New, 30.0);
        assert!(Piano::new(&spec, 60).is_err());
        assert!(Piano::new(&spec, 89).is_err());
        assert!(Piano::new(&spec, 61).is_ok());
    }

    #[test]
    fn test_piano_setter_rejects_out_of_range() {
        let mut piano = piano(88);
        assert!(piano.set_key_count(100).is_err());
        assert_eq!(piano.key_count(), 88);

        piano.set_key_count(61).unwrap();
        assert_eq!(piano.key_count(), 61);
    }

    #[test]
    fn test_piano_negative_rate_rejected() {
        let spec = InstrumentSpec::new("Yamaha", Condition::New, -10.0);
        assert!(matches!(
            Piano::new(&spec, 88),
            Err(RentalError::Validation { .. })
        ));
    }

    #[test]
    fn test_piano_keys_change_through_shared_handle() {
        let spec = InstrumentSpec::new("Yamaha U1", Condition::Used, 100.0).with_attribute("key_count", 88);
        let shared = Piano::build(&spec).unwrap();

        shared
            .borrow_mut()
            .as_any_mut()
            .downcast_mut::<Piano>()
            .unwrap()
            .set_key_count(76)
            .unwrap();

        let cost = shared.borrow().calculate_rental_cost(10);
        assert!((cost - 800.0).abs() < 1e-9);
    }
}
