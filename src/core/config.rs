//! Battlefield configuration with documented constants
//!
//! All tunable values are collected here with explanations of their purpose.
//! The config is carried inside the `Battlefield` context rather than a
//! global; every component that needs a value receives it explicitly.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::Result;
use crate::core::types::TerrainType;

/// Geographic bounding box of the battlefield (degrees).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GeoBounds {
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

impl GeoBounds {
    /// Box of `half_extent` degrees around a center point.
    pub fn around(lon: f64, lat: f64, half_extent: f64) -> Self {
        Self {
            min_lon: lon - half_extent,
            max_lon: lon + half_extent,
            min_lat: lat - half_extent,
            max_lat: lat + half_extent,
        }
    }

    pub fn mid_lat(&self) -> f64 {
        (self.min_lat + self.max_lat) / 2.0
    }
}

/// Weights for the elevation smoothing filter applied to each cell.
///
/// Cell elevation is `center * center_weight + sum(vertices) * vertex_weight`.
/// The weights deliberately do not sum to 1: this is a smoothing filter over
/// seven samples, not a normalized average.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SamplingWeights {
    pub center: f64,
    pub vertex: f64,
}

/// Grid layout configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Hex radius in meters (center to vertex).
    pub hex_radius_m: f64,
    /// Battlefield bounding box.
    pub bounds: GeoBounds,
    /// Elevation sampling weights.
    pub sampling_weights: SamplingWeights,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            // 200m hexes over a ~0.2 degree box around Kilimanjaro yields a
            // grid in the hundreds-to-low-thousands of cells.
            hex_radius_m: 200.0,
            bounds: GeoBounds::around(37.3506, -3.0769, 0.1),
            sampling_weights: SamplingWeights {
                center: 0.4,
                vertex: 0.1,
            },
        }
    }
}

/// Elevation thresholds for terrain classification (meters).
///
/// Cells below `plain_below` are plains, below `hill_below` hills, everything
/// above is mountain.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ElevationBands {
    pub plain_below: f64,
    pub hill_below: f64,
}

impl Default for ElevationBands {
    fn default() -> Self {
        Self {
            plain_below: 100.0,
            hill_below: 200.0,
        }
    }
}

/// Line-of-sight configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionConfig {
    /// Terrain categories that can block detection of the target cell.
    pub blocking_terrain: Vec<TerrainType>,
    /// Chance that sight into a blocking cell succeeds, drawn independently
    /// per evaluation by the probabilistic policy. Repeated evaluation of the
    /// same pair can yield different answers; callers must not cache results.
    pub pass_chance: f64,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            blocking_terrain: vec![TerrainType::Mountain],
            pass_chance: 0.5,
        }
    }
}

impl VisionConfig {
    pub fn blocks(&self, terrain: TerrainType) -> bool {
        self.blocking_terrain.contains(&terrain)
    }
}

/// Top-level configuration for the battlefield core.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BattlefieldConfig {
    pub grid: GridConfig,
    pub elevation: ElevationBands,
    pub vision: VisionConfig,
}

impl BattlefieldConfig {
    /// Parse a config from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Validate configuration for internal consistency.
    pub fn validate(&self) -> Result<()> {
        use crate::core::error::BattlefieldError;

        if self.grid.hex_radius_m <= 0.0 {
            return Err(BattlefieldError::Config(format!(
                "hex_radius_m ({}) must be positive",
                self.grid.hex_radius_m
            )));
        }
        let b = &self.grid.bounds;
        if b.min_lon >= b.max_lon || b.min_lat >= b.max_lat {
            return Err(BattlefieldError::Config(
                "bounds must span a non-empty area".into(),
            ));
        }
        if self.grid.sampling_weights.center <= 0.0 || self.grid.sampling_weights.vertex < 0.0 {
            return Err(BattlefieldError::Config(
                "sampling weights must be positive".into(),
            ));
        }
        if self.elevation.plain_below >= self.elevation.hill_below {
            return Err(BattlefieldError::Config(format!(
                "plain_below ({}) must be < hill_below ({})",
                self.elevation.plain_below, self.elevation.hill_below
            )));
        }
        if !(0.0..=1.0).contains(&self.vision.pass_chance) {
            return Err(BattlefieldError::Config(format!(
                "pass_chance ({}) must be within [0, 1]",
                self.vision.pass_chance
            )));
        }
        Ok(())
    }
}
