//! Authoritative record of every spawn decision.

use std::collections::BTreeMap;

use geocoin_core::{CacheSnapshot, CellEntry, CellId, CellRecord, WorldStateBlob};

use crate::registry::CellRegistry;

/// Mapping from cell identity to the cache it hosts, if any.
///
/// Once a decision is recorded for a cell it is never rolled again: a cell
/// either keeps a cache (possibly emptied) or stays barren.
#[derive(Clone, Debug, Default)]
pub struct WorldState {
    records: BTreeMap<CellId, CellRecord>,
}

impl WorldState {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cache stored for `cell`, or `None` when none was spawned.
    #[must_use]
    pub fn get(&self, cell: CellId) -> Option<&CacheSnapshot> {
        match self.records.get(&cell) {
            Some(CellRecord::Cache(snapshot)) => Some(snapshot),
            Some(CellRecord::Barren) | None => None,
        }
    }

    /// Overwrites the cache stored for `cell`.
    pub fn put(&mut self, cell: CellId, snapshot: CacheSnapshot) {
        let _ = self.records.insert(cell, CellRecord::Cache(snapshot));
    }

    /// Records that the spawn trial for `cell` failed.
    ///
    /// Cells that already hold a decision keep it.
    pub fn record_barren(&mut self, cell: CellId) {
        let _ = self.records.entry(cell).or_insert(CellRecord::Barren);
    }

    /// Reports whether a spawn decision was recorded for `cell`.
    #[must_use]
    pub fn has(&self, cell: CellId) -> bool {
        self.records.contains_key(&cell)
    }

    /// Number of decided cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Reports whether no decision was recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Forgets every recorded decision.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Exports every decision keyed by grid coordinates in ascending order.
    #[must_use]
    pub fn export_state(&self, registry: &CellRegistry) -> WorldStateBlob {
        let mut cells: Vec<CellEntry> = self
            .records
            .iter()
            .filter_map(|(id, record)| {
                registry.coord_of(*id).map(|cell| CellEntry {
                    cell,
                    record: record.clone(),
                })
            })
            .collect();
        cells.sort_by_key(|entry| entry.cell);
        WorldStateBlob { cells }
    }

    /// Replaces the store's contents with the provided export.
    ///
    /// Cells are interned into `registry`, which keeps identifiers stable for
    /// cells that were already known.
    pub fn import_state(&mut self, registry: &mut CellRegistry, blob: WorldStateBlob) {
        self.records.clear();
        for entry in blob.cells {
            let id = registry.intern(entry.cell);
            let _ = self.records.insert(id, entry.record);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geocoin_core::{Coin, GridCell, GridSpec};

    fn snapshot(cell: GridCell, count: u32) -> CacheSnapshot {
        CacheSnapshot::from_parts(
            (0..count).map(|serial| Coin::new(cell, serial)).collect(),
            count,
        )
    }

    #[test]
    fn undecided_cells_are_not_spawned() {
        let mut registry = CellRegistry::new(GridSpec::default());
        let store = WorldState::new();
        let id = registry.cell_at(0, 0);
        assert!(!store.has(id));
        assert!(store.get(id).is_none());
    }

    #[test]
    fn emptied_caches_still_count_as_decided() {
        let mut registry = CellRegistry::new(GridSpec::default());
        let mut store = WorldState::new();
        let id = registry.cell_at(1, 2);
        store.put(id, CacheSnapshot::from_parts(Vec::new(), 4));
        assert!(store.has(id));
        assert_eq!(store.get(id).map(CacheSnapshot::len), Some(0));
    }

    #[test]
    fn repeated_reads_return_the_same_snapshot() {
        let mut registry = CellRegistry::new(GridSpec::default());
        let mut store = WorldState::new();
        let cell = GridCell::new(5, 5);
        let id = registry.intern(cell);
        store.put(id, snapshot(cell, 3));
        let first = store.get(id).cloned();
        let second = store.get(id).cloned();
        assert_eq!(first, second);
        assert_eq!(first, Some(snapshot(cell, 3)));
    }

    #[test]
    fn barren_cells_are_decided_but_hold_nothing() {
        let mut registry = CellRegistry::new(GridSpec::default());
        let mut store = WorldState::new();
        let id = registry.cell_at(-1, 9);
        store.record_barren(id);
        assert!(store.has(id));
        assert!(store.get(id).is_none());
        assert_eq!(
            store.export_state(&registry).cells[0].record,
            CellRecord::Barren
        );
    }

    #[test]
    fn record_barren_keeps_existing_cache() {
        let mut registry = CellRegistry::new(GridSpec::default());
        let mut store = WorldState::new();
        let cell = GridCell::new(2, 2);
        let id = registry.intern(cell);
        store.put(id, snapshot(cell, 2));
        store.record_barren(id);
        assert_eq!(store.get(id), Some(&snapshot(cell, 2)));
    }

    #[test]
    fn export_then_import_restores_every_decision() {
        let mut registry = CellRegistry::new(GridSpec::default());
        let mut store = WorldState::new();
        let cached = GridCell::new(3, -1);
        let barren = GridCell::new(-2, 4);
        let cached_id = registry.intern(cached);
        let barren_id = registry.intern(barren);
        store.put(cached_id, snapshot(cached, 6));
        store.record_barren(barren_id);

        let blob = store.export_state(&registry);
        assert_eq!(blob.cells.len(), 2);
        assert_eq!(blob.cells[0].cell, barren);

        let mut fresh_registry = CellRegistry::new(GridSpec::default());
        let mut restored = WorldState::new();
        restored.import_state(&mut fresh_registry, blob.clone());
        assert_eq!(restored.len(), 2);
        assert_eq!(restored.export_state(&fresh_registry), blob);
        let id = fresh_registry.lookup(cached).expect("imported cell interned");
        assert_eq!(restored.get(id), Some(&snapshot(cached, 6)));
    }

    #[test]
    fn import_replaces_previous_contents() {
        let mut registry = CellRegistry::new(GridSpec::default());
        let mut store = WorldState::new();
        let id = registry.cell_at(0, 0);
        store.record_barren(id);
        store.import_state(&mut registry, WorldStateBlob::default());
        assert!(store.is_empty());
        assert!(!store.has(id));
    }
}
