// 🗂️ Instrument Registry - type tag → constructor
//
// Adding a variant never touches existing code: implement Instrument and
// register a constructor under a new tag.

use std::collections::HashMap;
use std::sync::{OnceLock, PoisonError, RwLock};

use super::guitar::{Guitar, GUITAR_TAG};
use super::instrument::{InstrumentRecord, InstrumentSpec, SharedInstrument};
use super::piano::{Piano, PIANO_TAG};
use super::violin::{Violin, VIOLIN_TAG};
use crate::error::{RentalError, RentalResult};

/// Constructor signature shared by every instrument variant
pub type InstrumentConstructor = fn(&InstrumentSpec) -> RentalResult<SharedInstrument>;

/// Built-in variants, registered when a registry is created
const BUILTIN_CONSTRUCTORS: [(&str, InstrumentConstructor); 3] = [
    (GUITAR_TAG, Guitar::build),
    (PIANO_TAG, Piano::build),
    (VIOLIN_TAG, Violin::build),
];

static GLOBAL_REGISTRY: OnceLock<InstrumentRegistry> = OnceLock::new();

/// Registry of instrument constructors keyed by lower-cased type tag
///
/// The process-wide instance (`InstrumentRegistry::global()`) is filled with
/// the built-in variants on first reference and is read-mostly afterwards.
/// Standalone registries can be created for tests or injection.
pub struct InstrumentRegistry {
    constructors: RwLock<HashMap<String, InstrumentConstructor>>,
}

impl InstrumentRegistry {
    /// Create an empty registry
    pub fn empty() -> Self {
        InstrumentRegistry {
            constructors: RwLock::new(HashMap::new()),
        }
    }

    /// Create a registry holding guitar, piano and violin
    pub fn with_builtins() -> Self {
        let registry = InstrumentRegistry::empty();
        {
            let mut constructors = registry
                .constructors
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            for (tag, constructor) in BUILTIN_CONSTRUCTORS {
                constructors.insert(tag.to_string(), constructor);
            }
        }
        registry
    }

    /// The process-wide registry
    pub fn global() -> &'static InstrumentRegistry {
        GLOBAL_REGISTRY.get_or_init(|| {
            tracing::debug!("Registering built-in instrument types");
            InstrumentRegistry::with_builtins()
        })
    }

    /// Register a new variant; each tag can be registered only once
    pub fn register(&self, tag: &str, constructor: InstrumentConstructor) -> RentalResult<()> {
        let key = tag.trim().to_lowercase();
        if key.is_empty() {
            return Err(RentalError::validation("type", "type tag must not be empty"));
        }

        let mut constructors = self
            .constructors
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if constructors.contains_key(&key) {
            return Err(RentalError::DuplicateType(key));
        }

        tracing::info!(tag = %key, "Instrument type registered");
        constructors.insert(key, constructor);
        Ok(())
    }

    /// Look up a constructor (case-insensitive)
    pub fn constructor(&self, tag: &str) -> Option<InstrumentConstructor> {
        self.constructors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&tag.trim().to_lowercase())
            .copied()
    }

    pub fn is_registered(&self, tag: &str) -> bool {
        self.constructor(tag).is_some()
    }

    /// Create an instrument of the given type
    ///
    /// Fails with UnknownType for unregistered tags and propagates any
    /// validation error raised by the variant constructor.
    pub fn create(&self, tag: &str, spec: &InstrumentSpec) -> RentalResult<SharedInstrument> {
        let constructor = self
            .constructor(tag)
            .ok_or_else(|| RentalError::UnknownType(tag.to_string()))?;
        constructor(spec)
    }

    /// Rebuild an instrument from its persisted record (id and availability preserved)
    pub fn restore(&self, record: InstrumentRecord) -> RentalResult<SharedInstrument> {
        let tag = record.kind.clone();
        self.create(&tag, &record.into_spec())
    }

    /// All registered tags, sorted
    pub fn registered_types(&self) -> Vec<String> {
        let mut tags: Vec<String> = self
            .constructors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        tags.sort();
        tags
    }
}

impl Default for InstrumentRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

// ============================================================================
// TESTS
// ============================================================================
