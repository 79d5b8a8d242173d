//! Core type definitions used throughout the codebase

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Unique identifier for a hex cell.
///
/// Grid-generated ids follow the `H_{row}_{col}` shape; external providers may
/// supply any non-empty string. Empty ids are rejected by mutating operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub struct HexId(String);

impl HexId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id for a generated grid cell at the given offset coordinate.
    pub fn from_coord(coord: OffsetCoord) -> Self {
        Self(format!("H_{}_{}", coord.row, coord.col))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Unique identifier for a force (military unit group).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub struct ForceId(String);

impl ForceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Offset row/column coordinate on the staggered hex grid.
///
/// Odd rows are shifted half a cell to the east; distance goes through the
/// matching cube-coordinate conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct OffsetCoord {
    pub row: i32,
    pub col: i32,
}

impl OffsetCoord {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Hex-grid distance in whole steps.
    ///
    /// Converts the staggered offset coordinate to cube coordinates (odd
    /// rows shifted east, matching the generator's layout) and takes the
    /// cube distance. Exactly the six physical neighbors of a cell sit at
    /// distance 1.
    pub fn distance(&self, other: &OffsetCoord) -> u32 {
        let (q1, r1) = self.axial();
        let (q2, r2) = other.axial();
        let dq = q2 - q1;
        let dr = r2 - r1;
        let ds = -dq - dr;
        ((dq.abs() + dr.abs() + ds.abs()) / 2) as u32
    }

    /// Axial coordinate for the east-shifted odd-row layout.
    fn axial(&self) -> (i32, i32) {
        let q = self.col - (self.row - self.row.rem_euclid(2)) / 2;
        (q, self.row)
    }
}

/// Geographic point in degrees, with height in meters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
    pub height: f64,
}

impl GeoPoint {
    pub fn new(lon: f64, lat: f64, height: f64) -> Self {
        Self { lon, lat, height }
    }
}

/// A side in the conflict. Visibility and control are tracked per faction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Faction {
    Blue,
    Red,
}

impl Faction {
    pub const ALL: [Faction; 2] = [Faction::Blue, Faction::Red];

    pub fn opponent(&self) -> Faction {
        match self {
            Faction::Blue => Faction::Red,
            Faction::Red => Faction::Blue,
        }
    }
}

/// Terrain category of a hex cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerrainType {
    #[default]
    Plain,
    Hill,
    Mountain,
    Urban,
    Water,
    Forest,
    Desert,
}

/// Who currently holds a hex, derived from its occupants.
///
/// A hex occupied by forces of both factions at once is `Contested`, an
/// explicit state instead of whichever faction happens to be scanned first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ControlFaction {
    #[default]
    Neutral,
    Held(Faction),
    Contested,
}
