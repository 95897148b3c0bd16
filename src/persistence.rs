// 💾 Persistence - JSON snapshots of instruments and rentals
//
// Format:
//   { "instruments": [InstrumentRecord...], "rentals": [RentalRecord...] }
//
// Loading rebuilds everything through the same validating constructors used
// at runtime, so a hand-edited file cannot smuggle in invalid state.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::rc::Rc;
use uuid::Uuid;

use crate::directory::RentalDirectory;
use crate::entities::{Accessory, Customer};
use crate::instruments::{InstrumentRecord, InstrumentRegistry, SharedInstrument};
use crate::rental::Rental;
use crate::services::RentalServices;

/// Tolerance when comparing a stored total against the recomputed one
const TOTAL_TOLERANCE: f64 = 1e-6;

// ============================================================================
// RECORDS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentalRecord {
    pub rental_id: Uuid,
    pub customer: Customer,
    pub instrument: InstrumentRecord,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub accessories: Vec<Accessory>,
    pub total_cost: f64,
}

impl RentalRecord {
    pub fn from_rental(rental: &Rental) -> Self {
        RentalRecord {
            rental_id: rental.id(),
            customer: Customer::clone(rental.customer()),
            instrument: rental.instrument().borrow().to_record(),
            start_date: rental.start_date(),
            end_date: rental.end_date(),
            accessories: rental
                .accessories()
                .iter()
                .map(|a| Accessory::clone(a))
                .collect(),
            total_cost: rental.total_cost(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub instruments: Vec<InstrumentRecord>,
    #[serde(default)]
    pub rentals: Vec<RentalRecord>,
}

impl Snapshot {
    /// Capture the current state of instruments and the directory
    pub fn capture(instruments: &[SharedInstrument], directory: &RentalDirectory) -> Self {
        Snapshot {
            instruments: instruments.iter().map(|i| i.borrow().to_record()).collect(),
            rentals: directory
                .iter()
                .map(|r| RentalRecord::from_rental(&r.borrow()))
                .collect(),
        }
    }
}

/// Everything rebuilt from a snapshot
#[derive(Default)]
pub struct LoadedData {
    pub instruments: Vec<SharedInstrument>,
    pub directory: RentalDirectory,
}

// ============================================================================
// SAVE
// ============================================================================

/// Serialize to pretty-printed JSON
pub fn snapshot_to_string(instruments: &[SharedInstrument], directory: &RentalDirectory) -> Result<String> {
    let snapshot = Snapshot::capture(instruments, directory);
    serde_json::to_string_pretty(&snapshot).context("Failed to serialize snapshot")
}

/// Write a snapshot file, creating parent directories as needed
pub fn save_to_json(path: &Path, instruments: &[SharedInstrument], directory: &RentalDirectory) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let json = snapshot_to_string(instruments, directory)?;
    fs::write(path, json).with_context(|| format!("Failed to write snapshot: {}", path.display()))?;

    tracing::info!(
        path = %path.display(),
        instruments = instruments.len(),
        rentals = directory.len(),
        "Snapshot saved"
    );
    Ok(())
}

// ============================================================================
// LOAD
// ============================================================================

/// Read a snapshot file; a missing file yields empty data
pub fn load_from_json(path: &Path, registry: &InstrumentRegistry, services: RentalServices) -> Result<LoadedData> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "No snapshot found, starting empty");
        return Ok(LoadedData {
            instruments: Vec::new(),
            directory: RentalDirectory::new(services),
        });
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot: {}", path.display()))?;
    let loaded = load_from_str(&content, registry, services)
        .with_context(|| format!("Failed to load snapshot: {}", path.display()))?;

    tracing::info!(
        path = %path.display(),
        instruments = loaded.instruments.len(),
        rentals = loaded.directory.len(),
        "Snapshot loaded"
    );
    Ok(loaded)
}

/// Parse snapshot JSON and rebuild instruments and rentals
pub fn load_from_str(content: &str, registry: &InstrumentRegistry, services: RentalServices) -> Result<LoadedData> {
    let snapshot: Snapshot = serde_json::from_str(content).context("Invalid snapshot JSON")?;
    restore_snapshot(snapshot, registry, services)
}

/// Rebuild runtime objects from a parsed snapshot
///
/// Instruments referenced by rentals are re-linked to the handle from the
/// instrument list when the ids match. Customers and accessories that share
/// an id come back as one shared value.
pub fn restore_snapshot(snapshot: Snapshot, registry: &InstrumentRegistry, services: RentalServices) -> Result<LoadedData> {
    let mut by_id: HashMap<Uuid, SharedInstrument> = HashMap::new();
    let mut instruments = Vec::with_capacity(snapshot.instruments.len());

    for record in snapshot.instruments {
        let id = record.instrument_id;
        let instrument = registry
            .restore(record)
            .with_context(|| format!("Invalid instrument record {}", id))?;
        by_id.insert(id, Rc::clone(&instrument));
        instruments.push(instrument);
    }

    let mut customers: HashMap<Uuid, Rc<Customer>> = HashMap::new();
    let mut accessories: HashMap<Uuid, Rc<Accessory>> = HashMap::new();
    let mut directory = RentalDirectory::new(services.clone());

    for record in snapshot.rentals {
        let rental_id = record.rental_id;

        let instrument = match by_id.get(&record.instrument.instrument_id) {
            Some(existing) => Rc::clone(existing),
            None => {
                let id = record.instrument.instrument_id;
                let restored = registry
                    .restore(record.instrument)
                    .with_context(|| format!("Invalid instrument in rental {}", rental_id))?;
                by_id.insert(id, Rc::clone(&restored));
                restored
            }
        };

        let customer = Rc::clone(
            customers
                .entry(record.customer.id())
                .or_insert_with(|| Rc::new(record.customer)),
        );

        let rental_accessories = record
            .accessories
            .into_iter()
            .map(|a| Rc::clone(accessories.entry(a.id()).or_insert_with(|| Rc::new(a))))
            .collect();

        let rental = Rental::restore(
            rental_id,
            customer,
            instrument,
            record.start_date,
            record.end_date,
            rental_accessories,
            services.clone(),
        )
        .with_context(|| format!("Invalid rental record {}", rental_id))?;

        let recomputed = rental.calculate_total();
        if (recomputed - record.total_cost).abs() > TOTAL_TOLERANCE {
            tracing::warn!(
                rental = %rental_id,
                stored = record.total_cost,
                recomputed,
                "Stored total does not match recomputed total"
            );
        }

        directory.register(rental);
    }

    Ok(LoadedData { instruments, directory })
}

// ============================================================================
// TESTS
// ============================================================================
