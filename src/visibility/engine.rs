//! Fog-of-war engine: full rebuild of per-faction visibility

use ahash::{AHashMap, AHashSet};
use tracing::{debug, warn};

use crate::core::config::VisionConfig;
use crate::core::types::{Faction, HexId};
use crate::force::Force;
use crate::grid::styles::{StyleKind, VisualStyle};
use crate::grid::HexGrid;
use crate::visibility::los::{self, LosPolicy, RandomBlocking};

/// Recomputes what each faction can see and shrouds the rest.
///
/// Every recompute is a full rebuild from the current force roster; there is
/// no incremental delta tracking. The scan is O(forces x cells), which is
/// fine at the grid sizes this runs at.
pub struct VisibilityEngine {
    vision: VisionConfig,
    policy: Box<dyn LosPolicy>,
    visible: AHashMap<Faction, AHashSet<HexId>>,
}

impl VisibilityEngine {
    /// Engine with the default probabilistic line-of-sight policy.
    pub fn new(vision: VisionConfig) -> Self {
        let policy = Box::new(RandomBlocking::new(vision.pass_chance));
        Self::with_policy(vision, policy)
    }

    pub fn with_policy(vision: VisionConfig, policy: Box<dyn LosPolicy>) -> Self {
        let visible = Faction::ALL
            .iter()
            .map(|&f| (f, AHashSet::new()))
            .collect();
        Self {
            vision,
            policy,
            visible,
        }
    }

    /// Rebuild visibility for all factions from the force roster, write the
    /// per-faction flags onto every cell, and restyle fog for the faction
    /// whose view is on screen.
    ///
    /// A force whose hex is missing from the grid contributes nothing and is
    /// logged; the rebuild carries on with the rest of the roster.
    pub fn recompute<'a>(
        &mut self,
        forces: impl IntoIterator<Item = &'a Force>,
        grid: &mut HexGrid,
        active: Faction,
    ) {
        for set in self.visible.values_mut() {
            set.clear();
        }

        for force in forces {
            let Some(origin) = grid.get(&force.hex_id) else {
                warn!(force = %force.id, hex = %force.hex_id, "force hex missing, skipping vision");
                continue;
            };
            let origin = origin.clone();
            let seen = self.visible.entry(force.faction).or_default();
            // A force always sees the ground it stands on.
            seen.insert(origin.id.clone());
            for cell in grid.iter() {
                if origin.coord().distance(&cell.coord()) > force.visibility_radius {
                    continue;
                }
                if los::has_line_of_sight(&origin, cell, &self.vision, self.policy.as_mut()) {
                    seen.insert(cell.id.clone());
                }
            }
        }

        for cell in grid.iter_mut() {
            for &faction in Faction::ALL.iter() {
                let seen = self.visible[&faction].contains(&cell.id);
                cell.visibility.visible_to.set(faction, seen);
            }
        }
        self.restyle(grid, active);

        debug!(
            blue = self.visible[&Faction::Blue].len(),
            red = self.visible[&Faction::Red].len(),
            "visibility rebuilt"
        );
    }

    /// Re-apply fog styling for the given faction's view without touching the
    /// computed visibility sets. Used when the viewer switches sides.
    pub fn restyle(&self, grid: &mut HexGrid, active: Faction) {
        let seen = &self.visible[&active];
        for cell in grid.iter_mut() {
            if seen.contains(&cell.id) {
                cell.remove_visual_style_by_kind(StyleKind::Invisible);
            } else {
                cell.add_visual_style(VisualStyle::invisible());
            }
        }
    }

    pub fn visible_hexes(&self, faction: Faction) -> &AHashSet<HexId> {
        &self.visible[&faction]
    }

    pub fn is_visible(&self, faction: Faction, hex_id: &HexId) -> bool {
        self.visible[&faction].contains(hex_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{ForceId, GeoPoint, OffsetCoord, TerrainType};
    use crate::grid::cell::HexCell;
    use crate::visibility::los::{AlwaysBlocks, NeverBlocks};

    fn grid_5x5() -> HexGrid {
        let mut cells = Vec::new();
        for row in 0..5 {
            for col in 0..5 {
                cells.push(HexCell::new(
                    OffsetCoord::new(row, col),
                    GeoPoint::default(),
                    [GeoPoint::default(); 6],
                ));
            }
        }
        HexGrid::from_cells(cells)
    }

    fn force(id: &str, faction: Faction, hex: &str, radius: u32) -> Force {
        Force::new(ForceId::new(id), id, faction, HexId::new(hex), radius)
    }

    fn engine(policy: Box<dyn LosPolicy>) -> VisibilityEngine {
        VisibilityEngine::with_policy(VisionConfig::default(), policy)
    }

    #[test]
    fn test_vision_limited_by_radius() {
        let mut grid = grid_5x5();
        let mut engine = engine(Box::new(NeverBlocks));
        let forces = [force("F1", Faction::Blue, "H_2_2", 1)];
        engine.recompute(&forces, &mut grid, Faction::Blue);

        assert!(engine.is_visible(Faction::Blue, &HexId::new("H_2_2")));
        assert!(engine.is_visible(Faction::Blue, &HexId::new("H_2_1")));
        assert!(!engine.is_visible(Faction::Blue, &HexId::new("H_2_4")));
        let origin = grid.get(&HexId::new("H_2_2")).unwrap().coord();
        for hex in engine.visible_hexes(Faction::Blue) {
            let coord = grid.get(hex).unwrap().coord();
            assert!(origin.distance(&coord) <= 1);
        }
    }

    #[test]
    fn test_visibility_is_union_over_forces() {
        let mut grid = grid_5x5();
        let mut engine = engine(Box::new(NeverBlocks));
        let forces = [
            force("F1", Faction::Blue, "H_0_0", 1),
            force("F2", Faction::Blue, "H_4_4", 1),
        ];
        engine.recompute(&forces, &mut grid, Faction::Blue);

        assert!(engine.is_visible(Faction::Blue, &HexId::new("H_0_0")));
        assert!(engine.is_visible(Faction::Blue, &HexId::new("H_4_4")));
        assert!(!engine.is_visible(Faction::Blue, &HexId::new("H_2_2")));
    }

    #[test]
    fn test_factions_see_independently() {
        let mut grid = grid_5x5();
        let mut engine = engine(Box::new(NeverBlocks));
        let forces = [
            force("F1", Faction::Blue, "H_0_0", 1),
            force("F2", Faction::Red, "H_4_4", 1),
        ];
        engine.recompute(&forces, &mut grid, Faction::Blue);

        assert!(engine.is_visible(Faction::Blue, &HexId::new("H_0_0")));
        assert!(!engine.is_visible(Faction::Red, &HexId::new("H_0_0")));
        let cell = grid.get(&HexId::new("H_0_0")).unwrap();
        assert!(cell.visibility.visible_to.get(Faction::Blue));
        assert!(!cell.visibility.visible_to.get(Faction::Red));
    }

    #[test]
    fn test_blocked_terrain_hidden_but_own_hex_seen() {
        let mut grid = grid_5x5();
        for cell in grid.iter_mut() {
            cell.terrain.terrain_type = TerrainType::Mountain;
        }
        let mut engine = engine(Box::new(AlwaysBlocks));
        let forces = [force("F1", Faction::Blue, "H_2_2", 2)];
        engine.recompute(&forces, &mut grid, Faction::Blue);

        // Everything blocks, so only the force's own hex is visible.
        assert_eq!(engine.visible_hexes(Faction::Blue).len(), 1);
        assert!(engine.is_visible(Faction::Blue, &HexId::new("H_2_2")));
    }

    #[test]
    fn test_fog_styles_follow_active_faction() {
        let mut grid = grid_5x5();
        let mut engine = engine(Box::new(NeverBlocks));
        let forces = [force("F1", Faction::Blue, "H_0_0", 1)];
        engine.recompute(&forces, &mut grid, Faction::Blue);

        let has_fog = |grid: &HexGrid, hex: &str| {
            grid.get(&HexId::new(hex))
                .unwrap()
                .visibility
                .styles
                .iter()
                .any(|s| s.kind == StyleKind::Invisible)
        };
        assert!(!has_fog(&grid, "H_0_0"));
        assert!(has_fog(&grid, "H_4_4"));

        // Switch the view to red: nothing is visible to red, all fogged.
        engine.restyle(&mut grid, Faction::Red);
        assert!(has_fog(&grid, "H_0_0"));
        assert!(has_fog(&grid, "H_4_4"));

        // And back again without a recompute.
        engine.restyle(&mut grid, Faction::Blue);
        assert!(!has_fog(&grid, "H_0_0"));
    }

    #[test]
    fn test_missing_force_hex_skipped() {
        let mut grid = grid_5x5();
        let mut engine = engine(Box::new(NeverBlocks));
        let forces = [
            force("F1", Faction::Blue, "H_9_9", 3),
            force("F2", Faction::Blue, "H_0_0", 1),
        ];
        engine.recompute(&forces, &mut grid, Faction::Blue);

        // The stranded force contributes nothing; the valid one still does.
        assert!(engine.is_visible(Faction::Blue, &HexId::new("H_0_0")));
        assert!(!engine.visible_hexes(Faction::Blue).is_empty());
    }

    #[test]
    fn test_recompute_resets_previous_state() {
        let mut grid = grid_5x5();
        let mut engine = engine(Box::new(NeverBlocks));
        engine.recompute(
            &[force("F1", Faction::Blue, "H_0_0", 2)],
            &mut grid,
            Faction::Blue,
        );
        assert!(engine.is_visible(Faction::Blue, &HexId::new("H_0_1")));

        // Force moved far away: old visibility must not linger.
        engine.recompute(
            &[force("F1", Faction::Blue, "H_4_4", 1)],
            &mut grid,
            Faction::Blue,
        );
        assert!(!engine.is_visible(Faction::Blue, &HexId::new("H_0_1")));
        assert!(!grid
            .get(&HexId::new("H_0_1"))
            .unwrap()
            .visibility
            .visible_to
            .get(Faction::Blue));
    }
}
