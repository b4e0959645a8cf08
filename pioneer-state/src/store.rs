//! Shared storage for the latest snapshot and the lookup tables

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use pioneer_api::CodeTable;

use crate::model::DeviceState;

/// Holds the last published [`DeviceState`] plus the source catalog and
/// sound mode table used to resolve codes into names
///
/// Readers never touch the network. A refresh builds its snapshot off to the
/// side and swaps it in with [`publish`](StateStore::publish), so a reader
/// sees either the previous snapshot or the new one, never a mix.
#[derive(Debug)]
pub struct StateStore {
    snapshot: RwLock<DeviceState>,
    catalog: RwLock<CodeTable>,
    sound_modes: CodeTable,
    generation: AtomicU64,
}

impl StateStore {
    /// Create a store with an initial source catalog (possibly empty) and a
    /// validated sound mode table
    pub fn new(catalog: CodeTable, sound_modes: CodeTable) -> Self {
        Self {
            snapshot: RwLock::new(DeviceState::unknown()),
            catalog: RwLock::new(catalog),
            sound_modes,
            generation: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> DeviceState {
        self.snapshot.read().clone()
    }

    /// Number of snapshots published so far; 0 until the first successful refresh
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Replace the snapshot wholesale
    pub fn publish(&self, state: DeviceState) {
        let mut snapshot = self.snapshot.write();
        *snapshot = state;
        self.generation.fetch_add(1, Ordering::AcqRel);
    }

    // ========================================================================
    // Source catalog
    // ========================================================================

    pub fn catalog(&self) -> CodeTable {
        self.catalog.read().clone()
    }

    pub fn catalog_is_empty(&self) -> bool {
        self.catalog.read().is_empty()
    }

    /// Install a discovered catalog if none is populated yet
    ///
    /// Returns `false` (and keeps the current catalog) if one is already in
    /// place or `catalog` is empty.
    pub fn install_catalog(&self, catalog: CodeTable) -> bool {
        if catalog.is_empty() {
            return false;
        }
        let mut current = self.catalog.write();
        if !current.is_empty() {
            return false;
        }
        *current = catalog;
        true
    }

    pub fn source_names(&self) -> Vec<String> {
        self.catalog.read().names().map(str::to_string).collect()
    }

    pub fn source_code(&self, name: &str) -> Option<String> {
        self.catalog.read().code(name).map(str::to_string)
    }

    pub fn source_name(&self, code: &str) -> Option<String> {
        self.catalog.read().name(code).map(str::to_string)
    }

    // ========================================================================
    // Sound modes
    // ========================================================================

    pub fn sound_modes(&self) -> &CodeTable {
        &self.sound_modes
    }

    pub fn sound_mode_names(&self) -> Vec<String> {
        self.sound_modes.names().map(str::to_string).collect()
    }

    pub fn sound_mode_code(&self, name: &str) -> Option<&str> {
        self.sound_modes.code(name)
    }

    pub fn sound_mode_name(&self, code: &str) -> Option<&str> {
        self.sound_modes.name(code)
    }
}
