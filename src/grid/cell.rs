//! HexCell: per-cell terrain, visibility state, and the layered style stack

use serde::{Deserialize, Serialize};

use crate::core::config::{ElevationBands, SamplingWeights};
use crate::core::types::{ControlFaction, Faction, GeoPoint, HexId, OffsetCoord, TerrainType};
use crate::grid::styles::{StyleKind, StyleLayer, VisualStyle};

/// Passability flags per movement domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passability {
    pub land: bool,
    pub naval: bool,
    pub air: bool,
}

impl Default for Passability {
    fn default() -> Self {
        Self {
            land: true,
            naval: false,
            air: true,
        }
    }
}

/// Terrain attributes of a cell, set at generation time except for elevation,
/// which is recomputed from sampled geometry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TerrainAttributes {
    pub terrain_type: TerrainType,
    /// Elevation in meters (weighted smoothing of the sampled points).
    pub elevation: f64,
    pub passability: Passability,
}

/// Spatial placement of a cell: grid coordinate plus geographic geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HexPosition {
    pub coord: OffsetCoord,
    /// Cell center with sampled terrain height.
    pub center: GeoPoint,
    /// Six vertices (flat-top layout, 60-degree increments from east).
    pub vertices: [GeoPoint; 6],
}

/// Per-faction visibility flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionFlags {
    pub blue: bool,
    pub red: bool,
}

impl FactionFlags {
    pub fn get(&self, faction: Faction) -> bool {
        match faction {
            Faction::Blue => self.blue,
            Faction::Red => self.red,
        }
    }

    pub fn set(&mut self, faction: Faction, value: bool) {
        match faction {
            Faction::Blue => self.blue = value,
            Faction::Red => self.red = value,
        }
    }
}

/// Mutable visibility state: per-faction flags and the style stack.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CellVisibility {
    pub visible_to: FactionFlags,
    pub styles: Vec<VisualStyle>,
}

/// Derived battlefield state of a cell.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CellState {
    pub control: ControlFaction,
}

/// One tile of the battlefield grid.
///
/// Created once at grid-generation time and never destroyed while the grid is
/// live; visibility and control mutate continuously during play.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HexCell {
    pub id: HexId,
    pub position: HexPosition,
    pub terrain: TerrainAttributes,
    pub visibility: CellVisibility,
    pub state: CellState,
}

impl HexCell {
    pub fn new(coord: OffsetCoord, center: GeoPoint, vertices: [GeoPoint; 6]) -> Self {
        Self {
            id: HexId::from_coord(coord),
            position: HexPosition {
                coord,
                center,
                vertices,
            },
            terrain: TerrainAttributes::default(),
            visibility: CellVisibility::default(),
            state: CellState::default(),
        }
    }

    pub fn coord(&self) -> OffsetCoord {
        self.position.coord
    }

    pub fn center(&self) -> &GeoPoint {
        &self.position.center
    }

    /// Add a style entry, evicting any existing entry with the same
    /// `(layer, priority)` pair. Idempotent under repeated identical calls.
    pub fn add_visual_style(&mut self, style: VisualStyle) {
        self.visibility
            .styles
            .retain(|s| !(s.layer == style.layer && s.priority == style.priority));
        self.visibility.styles.push(style);
    }

    /// Remove all entries of the given kind. No-op if none match.
    pub fn remove_visual_style_by_kind(&mut self, kind: StyleKind) {
        self.visibility.styles.retain(|s| s.kind != kind);
    }

    /// Highest-priority entry for the layer, if any.
    ///
    /// Equal priorities cannot occur on one layer given the eviction rule in
    /// `add_visual_style`; if they did, whichever sorts first is returned.
    pub fn top_visual_style(&self, layer: StyleLayer) -> Option<&VisualStyle> {
        self.visibility
            .styles
            .iter()
            .filter(|s| s.layer == layer)
            .max_by_key(|s| s.priority)
    }

    /// Recompute elevation as a weighted smoothing of the center sample and
    /// the six vertex samples. Overwrites `terrain.elevation` and returns the
    /// new value.
    pub fn update_elevation(&mut self, weights: &SamplingWeights) -> f64 {
        let vertex_sum: f64 = self.position.vertices.iter().map(|v| v.height).sum();
        let elevation = weights.center * self.position.center.height + weights.vertex * vertex_sum;
        self.terrain.elevation = elevation;
        elevation
    }

    /// Classify the current elevation into a terrain band and apply the
    /// matching preset style. Also rewrites `terrain.terrain_type`.
    pub fn apply_elevation_style(&mut self, bands: &ElevationBands) {
        let (terrain, style) = if self.terrain.elevation < bands.plain_below {
            (TerrainType::Plain, VisualStyle::plain())
        } else if self.terrain.elevation < bands.hill_below {
            (TerrainType::Hill, VisualStyle::hill())
        } else {
            (TerrainType::Mountain, VisualStyle::mountain())
        };
        self.terrain.terrain_type = terrain;
        self.add_visual_style(style);
    }
}
