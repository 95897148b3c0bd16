// Instrument Models
//
// Each instrument has:
// - Stable identity (UUID)
// - Shared core (name, condition, daily rate, availability)
// - Variant-specific pricing rules
// - A constructor registered in the InstrumentRegistry

pub mod guitar;
pub mod instrument;
pub mod piano;
pub mod registry;
pub mod violin;

pub use guitar::Guitar;
pub use instrument::{
    share, Condition, Instrument, InstrumentCore, InstrumentRecord, InstrumentSpec,
    SharedInstrument,
};
pub use piano::Piano;
pub use registry::{InstrumentConstructor, InstrumentRegistry};
pub use violin::Violin;
