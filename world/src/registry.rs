//! Canonical identities for grid cells.

use std::collections::HashMap;

use geocoin_core::{CellId, GeoBounds, GeoCoord, GridCell, GridSpec};

/// Arena that hands out one stable [`CellId`] per grid cell.
///
/// Identifiers are dense indices into the arena and are never reused or
/// released, so the registry only grows for the lifetime of a session.
#[derive(Clone, Debug)]
pub struct CellRegistry {
    grid: GridSpec,
    cells: Vec<GridCell>,
    index: HashMap<GridCell, CellId>,
}

impl CellRegistry {
    /// Creates an empty registry mapping cells through `grid`.
    #[must_use]
    pub fn new(grid: GridSpec) -> Self {
        Self {
            grid,
            cells: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Grid used for geographic conversions.
    #[must_use]
    pub const fn grid(&self) -> &GridSpec {
        &self.grid
    }

    /// Returns the canonical identifier for cell `(i, j)`, creating it on first use.
    pub fn cell_at(&mut self, i: i32, j: i32) -> CellId {
        self.intern(GridCell::new(i, j))
    }

    /// Returns the canonical identifier for `cell`, creating it on first use.
    pub fn intern(&mut self, cell: GridCell) -> CellId {
        if let Some(id) = self.index.get(&cell) {
            return *id;
        }

        let id = CellId::new(u32::try_from(self.cells.len()).unwrap_or(u32::MAX));
        self.cells.push(cell);
        let _ = self.index.insert(cell, id);
        id
    }

    /// Returns the identifier of `cell` if it was interned before.
    #[must_use]
    pub fn lookup(&self, cell: GridCell) -> Option<CellId> {
        self.index.get(&cell).copied()
    }

    /// Returns the identifier of the cell nearest to `position`.
    pub fn cell_from_geo(&mut self, position: GeoCoord) -> CellId {
        let cell = self.grid.cell_containing(position);
        self.intern(cell)
    }

    /// Grid coordinates behind `id`.
    #[must_use]
    pub fn coord_of(&self, id: CellId) -> Option<GridCell> {
        let index = usize::try_from(id.get()).ok()?;
        self.cells.get(index).copied()
    }

    /// Rectangle covered by the cell behind `id`.
    #[must_use]
    pub fn bounds_of(&self, id: CellId) -> Option<GeoBounds> {
        self.coord_of(id).map(|cell| self.grid.bounds_of(cell))
    }

    /// Anchor point of the cell behind `id`.
    ///
    /// This is the origin (southwest) corner of the cell's bounds rather than
    /// its midpoint, which keeps `cell_from_geo(center_of(id))` exact.
    #[must_use]
    pub fn center_of(&self, id: CellId) -> Option<GeoCoord> {
        self.coord_of(id).map(|cell| self.grid.corner_of(cell))
    }

    /// Number of cells interned so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether no cell was interned yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
