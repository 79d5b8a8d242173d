//! Hex grid: cells, layout generation, geography, and visual styles

pub mod cell;
pub mod generator;
pub mod geomath;
pub mod styles;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::HexId;
use cell::HexCell;

/// The battlefield grid: a flat cell store with an id index.
///
/// Cells are created once by the generator and live for the duration of the
/// battlefield; lookups by id are the hot path for every mutation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HexGrid {
    cells: Vec<HexCell>,
    #[serde(skip)]
    index: AHashMap<HexId, usize>,
}

impl HexGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cells(cells: Vec<HexCell>) -> Self {
        let index = cells
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id.clone(), i))
            .collect();
        Self { cells, index }
    }

    /// Insert a cell, replacing any existing cell with the same id.
    pub fn insert(&mut self, cell: HexCell) {
        match self.index.get(&cell.id) {
            Some(&i) => self.cells[i] = cell,
            None => {
                self.index.insert(cell.id.clone(), self.cells.len());
                self.cells.push(cell);
            }
        }
    }

    pub fn get(&self, id: &HexId) -> Option<&HexCell> {
        self.index.get(id).map(|&i| &self.cells[i])
    }

    pub fn get_mut(&mut self, id: &HexId) -> Option<&mut HexCell> {
        self.index.get(id).map(|&i| &mut self.cells[i])
    }

    pub fn contains(&self, id: &HexId) -> bool {
        self.index.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HexCell> {
        self.cells.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut HexCell> {
        self.cells.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// All cells within `radius` grid steps of `center`, the center included.
    /// Empty if the center id is unknown.
    pub fn cells_in_range(&self, center: &HexId, radius: u32) -> Vec<&HexCell> {
        let Some(origin) = self.get(center) else {
            return Vec::new();
        };
        let coord = origin.coord();
        self.cells
            .iter()
            .filter(|c| coord.distance(&c.coord()) <= radius)
            .collect()
    }

    /// Rebuild the id index after deserialization.
    pub fn rebuild_index(&mut self) {
        self.index = self
            .cells
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id.clone(), i))
            .collect();
    }
}
