//! Grid generation: tiling a geographic bounding box with flat-top hexes

use tracing::info;

use crate::core::config::BattlefieldConfig;
use crate::core::types::{GeoPoint, OffsetCoord};
use crate::grid::cell::HexCell;
use crate::grid::geomath;
use crate::grid::HexGrid;

/// Terrain height provider sampled at cell centers and vertices.
///
/// The production deployment queries a terrain tileset; tests and the demo
/// binary use synthetic surfaces.
pub trait ElevationSource {
    fn height_at(&self, lon: f64, lat: f64) -> f64;
}

/// Perfectly flat terrain at a fixed height.
pub struct FlatTerrain(pub f64);

impl ElevationSource for FlatTerrain {
    fn height_at(&self, _lon: f64, _lat: f64) -> f64 {
        self.0
    }
}

/// Lays out a staggered flat-top hex grid over the configured bounding box.
///
/// Row pitch is half the hex height with alternate rows shifted east by
/// three-quarters of the hex width, which interlocks the flat-top hexes.
pub struct HexGridGenerator<'a> {
    config: &'a BattlefieldConfig,
}

impl<'a> HexGridGenerator<'a> {
    pub fn new(config: &'a BattlefieldConfig) -> Self {
        Self { config }
    }

    pub fn generate(&self, terrain: &dyn ElevationSource) -> HexGrid {
        let grid_cfg = &self.config.grid;
        let bounds = &grid_cfg.bounds;
        let radius = grid_cfg.hex_radius_m;

        let hex_width = 2.0 * radius;
        let hex_height = 3.0_f64.sqrt() * radius;

        let mid_lat = bounds.mid_lat();
        // Horizontal pitch between columns of the same row is 1.5 widths; dx
        // is the half-pitch used for the alternate-row stagger.
        let dx = geomath::meters_to_degrees_lon(0.75 * hex_width, mid_lat);
        let dy = geomath::meters_to_degrees_lat(hex_height);

        let mut cells = Vec::new();
        let mut row = 0i32;
        let mut lat = bounds.min_lat;
        while lat <= bounds.max_lat {
            let stagger = if row.rem_euclid(2) == 1 { dx } else { 0.0 };
            let mut col = 0i32;
            let mut lon = bounds.min_lon + stagger;
            while lon <= bounds.max_lon {
                cells.push(self.make_cell(OffsetCoord::new(row, col), lon, lat, radius, terrain));
                lon += 2.0 * dx;
                col += 1;
            }
            lat += dy / 2.0;
            row += 1;
        }

        let mut grid = HexGrid::from_cells(cells);
        let weights = &grid_cfg.sampling_weights;
        for cell in grid.iter_mut() {
            cell.update_elevation(weights);
            cell.apply_elevation_style(&self.config.elevation);
        }

        info!(
            cells = grid.len(),
            rows = row,
            hex_radius_m = radius,
            "generated battlefield grid"
        );
        grid
    }

    fn make_cell(
        &self,
        coord: OffsetCoord,
        lon: f64,
        lat: f64,
        radius: f64,
        terrain: &dyn ElevationSource,
    ) -> HexCell {
        let center = GeoPoint::new(lon, lat, terrain.height_at(lon, lat));

        let mut vertices = [GeoPoint::default(); 6];
        for (i, vertex) in vertices.iter_mut().enumerate() {
            let angle = (60.0 * i as f64).to_radians();
            let east = radius * angle.cos();
            let north = radius * angle.sin();
            let mut point = geomath::meters_to_lat_lon(&center, east, north);
            point.height = terrain.height_at(point.lon, point.lat);
            *vertex = point;
        }

        HexCell::new(coord, center, vertices)
    }
}
