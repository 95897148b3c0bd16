// Instrument Rental - Core Library
// Exposes all modules for use in the demo CLI, the quiz CLI, and tests

pub mod error;
pub mod instruments;    // Instrument variants + type registry
pub mod entities;       // Customers and accessories
pub mod notify;
pub mod audit;          // Action log sinks
pub mod services;
pub mod rental;
pub mod directory;
pub mod process;        // Online / offline rental procedure
pub mod router;         // Request chain of responsibility
pub mod persistence;    // JSON snapshots
pub mod config;
pub mod logging;
pub mod quiz;

// Re-export commonly used types
pub use error::{RentalError, RentalResult};
pub use instruments::{
    share, Condition, Guitar, Instrument, InstrumentCore, InstrumentRecord,
    InstrumentRegistry, InstrumentSpec, Piano, SharedInstrument, Violin,
};
pub use entities::{Accessory, Customer, CAN_MODIFY_RENTAL, CAN_RENT};
pub use notify::{ConsoleNotifier, Notifier, RecordingNotifier};
pub use audit::{ActionEvent, ActionLog, MemoryActionLog, TracingActionLog};
#[cfg(feature = "sqlite")]
pub use audit::SqliteActionLog;
pub use services::RentalServices;
pub use rental::Rental;
pub use directory::{RentalDirectory, SharedRental};
pub use process::{OfflineRentalProcess, OnlineRentalProcess, RentalProcess};
pub use router::{
    standard_chain, Admin, Manager, Operator, RentalRequest, RequestHandler, RequestType,
};
pub use persistence::{
    load_from_json, load_from_str, save_to_json, snapshot_to_string,
    LoadedData, RentalRecord, Snapshot,
};
pub use config::AppConfig;
pub use logging::{init_logging, LogFormat};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
