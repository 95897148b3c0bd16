// 🎻 Violin - per-day bow fee

use serde_json::{Map, Value};
use std::any::Any;
use std::fmt;

use super::instrument::{
    apply_long_rental_discount, share, Instrument, InstrumentCore, InstrumentSpec, SharedInstrument,
};
use crate::error::RentalResult;

pub const VIOLIN_TAG: &str = "violin";

/// Bow fee per rental day
pub const BOW_FEE_PER_DAY: f64 = 10.0;

#[derive(Debug, Clone)]
pub struct Violin {
    core: InstrumentCore,
    bow_included: bool,
}

impl Violin {
    pub fn new(spec: &InstrumentSpec, bow_included: bool) -> RentalResult<Self> {
        let core = InstrumentCore::from_spec(spec)?;
        tracing::debug!(instrument = %core.id(), name = core.name(), "Violin created");

        Ok(Violin { core, bow_included })
    }

    /// Registry constructor: reads `bow_included` from `InstrumentSpec::attributes`
    pub fn build(spec: &InstrumentSpec) -> RentalResult<SharedInstrument> {
        // A missing flag means no bow; a present flag must be a boolean
        let bow = match spec.attributes.get("bow_included") {
            None => false,
            Some(_) => spec.bool_attribute("bow_included")?,
        };
        Ok(share(Violin::new(spec, bow)?))
    }

    pub fn bow_included(&self) -> bool {
        self.bow_included
    }

    pub fn set_bow_included(&mut self, value: bool) {
        self.bow_included = value;
        tracing::debug!(instrument = %self.core.id(), bow_included = value, "Violin bow changed");
    }
}

impl Instrument for Violin {
    fn kind(&self) -> &'static str {
        VIOLIN_TAG
    }

    fn core(&self) -> &InstrumentCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut InstrumentCore {
        &mut self.core
    }

    /// The bow fee is added before the long-rental discount, so it is discounted too
    fn calculate_rental_cost(&self, days: u32) -> f64 {
        let mut base = self.core.daily_rate() * f64::from(days);
        if self.bow_included {
            base += BOW_FEE_PER_DAY * f64::from(days);
        }
        let cost = apply_long_rental_discount(base, days);
        tracing::debug!(instrument = %self.core.id(), days, cost, "Violin rental cost calculated");
        cost
    }

    fn attributes(&self) -> Map<String, Value> {
        let mut attributes = Map::new();
        attributes.insert("bow_included".to_string(), Value::from(self.bow_included));
        attributes
    }

    fn generate_report(&self) -> String {
        format!(
            "Report: violin {}, condition: {}, bow: {}",
            self.core.name(),
            self.core.condition(),
            bow_label(self.bow_included)
        )
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

fn bow_label(included: bool) -> &'static str {
    if included {
        "included"
    } else {
        "not included"
    }
}

impl fmt::Display for Violin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Violin: {}, condition: {}, bow: {}, available: {}",
            self.core.name(),
            self.core.condition(),
            bow_label(self.bow_included),
            self.core.is_available()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruments::Condition;

    fn violin(bow: bool) -> Violin {
        let spec = InstrumentSpec::new("Stradivarius Copy", Condition::Refurbished, 80.0);
        Violin::new(&spec, bow).unwrap()
    }

    #[test]
    fn test_violin_bow_fee_then_discount() {
        // (800 + 10 * 10) = 900, then 20% off
        let cost = violin(true).calculate_rental_cost(10);
        assert!((cost - 720.0).abs() < 1e-9);
    }

    #[test]
    fn test_violin_without_bow() {
        let cost = violin(false).calculate_rental_cost(10);
        assert!((cost - 640.0).abs() < 1e-9);
    }

    #[test]
    fn test_violin_short_rental_with_bow() {
        let cost = violin(true).calculate_rental_cost(3);
        assert!((cost - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_violin_build_defaults_to_no_bow() {
        let spec = InstrumentSpec::new("Amati Copy", Condition::Used, 70.0);
        let shared = Violin::build(&spec).unwrap();
        let instrument = shared.borrow();
        let violin = instrument.as_any().downcast_ref::<Violin>().unwrap();
        assert!(!violin.bow_included());
    }

    #[test]
    fn test_violin_build_rejects_non_boolean_bow() {
        let spec = InstrumentSpec::new("Amati Copy", Condition::Used, 70.0)
            .with_attribute("bow_included", "yes");
        assert!(Violin::build(&spec).is_err());
    }

    #[test]
    fn test_violin_report_mentions_bow() {
        assert!(violin(true).generate_report().contains("bow: included"));
        assert!(violin(false).to_string().contains("bow: not included"));
    }
}
