// 🎸 Guitar - no surcharge, long-rental discount only

use serde_json::{Map, Value};
use std::any::Any;
use std::fmt;

use super::instrument::{
    apply_long_rental_discount, share, Instrument, InstrumentCore, InstrumentSpec, SharedInstrument,
};
use crate::error::{RentalError, RentalResult};

pub const GUITAR_TAG: &str = "guitar";

/// Valid string counts (inclusive)
pub const MIN_STRINGS: i64 = 4;
pub const MAX_STRINGS: i64 = 12;

#[derive(Debug, Clone)]
pub struct Guitar {
    core: InstrumentCore,
    number_of_strings: u8,
}

impl Guitar {
    pub fn new(spec: &InstrumentSpec, number_of_strings: i64) -> RentalResult<Self> {
        let core = InstrumentCore::from_spec(spec)?;
        let number_of_strings = validate_strings(number_of_strings)?;
        tracing::debug!(instrument = %core.id(), name = core.name(), "Guitar created");

        Ok(Guitar {
            core,
            number_of_strings,
        })
    }

    /// Registry constructor: reads `number_of_strings` from `InstrumentSpec::attributes`
    pub fn build(spec: &InstrumentSpec) -> RentalResult<SharedInstrument> {
        let strings = spec.int_attribute("number_of_strings")?;
        Ok(share(Guitar::new(spec, strings)?))
    }

    pub fn number_of_strings(&self) -> u8 {
        self.number_of_strings
    }

    pub fn set_number_of_strings(&mut self, value: i64) -> RentalResult<()> {
        self.number_of_strings = validate_strings(value)?;
        tracing::debug!(instrument = %self.core.id(), strings = value, "Guitar strings changed");
        Ok(())
    }
}

fn validate_strings(value: i64) -> RentalResult<u8> {
    if !(MIN_STRINGS..=MAX_STRINGS).contains(&value) {
        return Err(RentalError::validation(
            "number_of_strings",
            format!("must be between {} and {}, got {}", MIN_STRINGS, MAX_STRINGS, value),
        ));
    }
    Ok(value as u8)
}

impl Instrument for Guitar {
    fn kind(&self) -> &'static str {
        GUITAR_TAG
    }

    fn core(&self) -> &InstrumentCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut InstrumentCore {
        &mut self.core
    }

    fn calculate_rental_cost(&self, days: u32) -> f64 {
        let base = self.core.daily_rate() * f64::from(days);
        let cost = apply_long_rental_discount(base, days);
        tracing::debug!(instrument = %self.core.id(), days, cost, "Guitar rental cost calculated");
        cost
    }

    fn attributes(&self) -> Map<String, Value> {
        let mut attributes = Map::new();
        attributes.insert("number_of_strings".to_string(), Value::from(self.number_of_strings));
        attributes
    }

    fn generate_report(&self) -> String {
        format!(
            "Report: guitar {}, condition: {}, strings: {}",
            self.core.name(),
            self.core.condition(),
            self.number_of_strings
        )
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl fmt::Display for Guitar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Guitar: {}, condition: {}, strings: {}, available: {}",
            self.core.name(),
            self.core.condition(),
            self.number_of_strings,
            self.core.is_available()
        )
    }
}
