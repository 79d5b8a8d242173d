//! Bidirectional hex/force index and territorial control
//!
//! Invariant: a force id appears in a hex's occupant set exactly when the
//! reverse map points that force at that hex. Every mutation either applies
//! fully to both maps or not at all.

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::error::{BattlefieldError, Result};
use crate::core::types::{ControlFaction, Faction, ForceId, HexId};
use crate::force::Force;
use crate::grid::styles::{StyleKind, VisualStyle};
use crate::grid::HexGrid;

/// Who occupies which hex, in both directions, plus derived control.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HexForceIndex {
    hex_to_forces: AHashMap<HexId, AHashSet<ForceId>>,
    force_to_hex: AHashMap<ForceId, HexId>,
    force_faction: AHashMap<ForceId, Faction>,
}

impl HexForceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the index from an initial force roster. Replaces any previous
    /// contents and re-derives control for every grid cell, so markers left
    /// by an earlier roster are cleared as well.
    pub fn init_mapping(&mut self, grid: &mut HexGrid, forces: &[Force]) -> Result<()> {
        self.hex_to_forces.clear();
        self.force_to_hex.clear();
        self.force_faction.clear();
        for force in forces {
            self.add_force(grid, &force.id, force.faction, &force.hex_id)?;
        }
        let hex_ids: Vec<HexId> = grid.iter().map(|c| c.id.clone()).collect();
        for hex_id in &hex_ids {
            self.apply_control(grid, hex_id);
        }
        debug!(forces = forces.len(), "initialized hex/force index");
        Ok(())
    }

    /// Place a force on a hex. If the force is already placed it is detached
    /// from its old hex first, so a duplicate placement behaves as a move.
    pub fn add_force(
        &mut self,
        grid: &mut HexGrid,
        force_id: &ForceId,
        faction: Faction,
        hex_id: &HexId,
    ) -> Result<()> {
        self.check_ids(force_id, hex_id)?;
        if !grid.contains(hex_id) {
            warn!(force = %force_id, hex = %hex_id, "cannot place force on unknown hex");
            return Err(BattlefieldError::HexNotFound(hex_id.clone()));
        }

        if let Some(old_hex) = self.force_to_hex.get(force_id).cloned() {
            self.detach(force_id, &old_hex);
            self.apply_control(grid, &old_hex);
        }

        self.hex_to_forces
            .entry(hex_id.clone())
            .or_default()
            .insert(force_id.clone());
        self.force_to_hex.insert(force_id.clone(), hex_id.clone());
        self.force_faction.insert(force_id.clone(), faction);
        self.apply_control(grid, hex_id);
        Ok(())
    }

    /// Remove a force from the index and re-derive control of its hex.
    pub fn remove_force(&mut self, grid: &mut HexGrid, force_id: &ForceId) -> Result<()> {
        if force_id.is_empty() {
            warn!("rejected empty force id");
            return Err(BattlefieldError::EmptyIdentifier("force"));
        }
        let Some(hex_id) = self.force_to_hex.get(force_id).cloned() else {
            warn!(force = %force_id, "cannot remove unknown force");
            return Err(BattlefieldError::ForceNotFound(force_id.clone()));
        };
        self.detach(force_id, &hex_id);
        self.force_faction.remove(force_id);
        self.apply_control(grid, &hex_id);
        Ok(())
    }

    /// Relocate a placed force. Validates everything up front so a failed
    /// move leaves both maps untouched.
    pub fn move_force_to_hex(
        &mut self,
        grid: &mut HexGrid,
        force_id: &ForceId,
        new_hex: &HexId,
    ) -> Result<()> {
        self.check_ids(force_id, new_hex)?;
        if !grid.contains(new_hex) {
            warn!(force = %force_id, hex = %new_hex, "cannot move force to unknown hex");
            return Err(BattlefieldError::HexNotFound(new_hex.clone()));
        }
        let Some(old_hex) = self.force_to_hex.get(force_id).cloned() else {
            warn!(force = %force_id, "cannot move unknown force");
            return Err(BattlefieldError::ForceNotFound(force_id.clone()));
        };
        if old_hex == *new_hex {
            return Ok(());
        }

        self.detach(force_id, &old_hex);
        self.hex_to_forces
            .entry(new_hex.clone())
            .or_default()
            .insert(force_id.clone());
        self.force_to_hex.insert(force_id.clone(), new_hex.clone());

        self.apply_control(grid, &old_hex);
        self.apply_control(grid, new_hex);
        Ok(())
    }

    /// Occupants of a hex. Empty for unknown or vacant hexes.
    pub fn forces_in_hex(&self, hex_id: &HexId) -> Vec<ForceId> {
        self.hex_to_forces
            .get(hex_id)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn hex_of_force(&self, force_id: &ForceId) -> Option<&HexId> {
        self.force_to_hex.get(force_id)
    }

    /// Whether any force currently occupies this hex. The occupancy map is
    /// sparse: vacant hexes carry no entry at all.
    pub fn hex_occupied(&self, hex_id: &HexId) -> bool {
        self.hex_to_forces.contains_key(hex_id)
    }

    pub fn has_force(&self, force_id: &ForceId) -> bool {
        self.force_to_hex.contains_key(force_id)
    }

    pub fn force_count_in_hex(&self, hex_id: &HexId) -> usize {
        self.hex_to_forces.get(hex_id).map_or(0, |set| set.len())
    }

    /// Control of a hex derived from its occupants' factions.
    pub fn derive_control(&self, hex_id: &HexId) -> ControlFaction {
        let Some(occupants) = self.hex_to_forces.get(hex_id) else {
            return ControlFaction::Neutral;
        };
        let mut blue = false;
        let mut red = false;
        for force_id in occupants {
            match self.force_faction.get(force_id) {
                Some(Faction::Blue) => blue = true,
                Some(Faction::Red) => red = true,
                None => {}
            }
        }
        match (blue, red) {
            (false, false) => ControlFaction::Neutral,
            (true, false) => ControlFaction::Held(Faction::Blue),
            (false, true) => ControlFaction::Held(Faction::Red),
            (true, true) => ControlFaction::Contested,
        }
    }

    fn detach(&mut self, force_id: &ForceId, hex_id: &HexId) {
        if let Some(set) = self.hex_to_forces.get_mut(hex_id) {
            set.remove(force_id);
            if set.is_empty() {
                self.hex_to_forces.remove(hex_id);
            }
        }
        self.force_to_hex.remove(force_id);
    }

    fn check_ids(&self, force_id: &ForceId, hex_id: &HexId) -> Result<()> {
        if force_id.is_empty() {
            warn!("rejected empty force id");
            return Err(BattlefieldError::EmptyIdentifier("force"));
        }
        if hex_id.is_empty() {
            warn!(force = %force_id, "rejected empty hex id");
            return Err(BattlefieldError::EmptyIdentifier("hex"));
        }
        Ok(())
    }

    /// Write the derived control onto the cell and transition its marker
    /// style. No-op when control is unchanged; a missing cell is logged and
    /// skipped since the index may reference hexes the grid no longer holds.
    fn apply_control(&self, grid: &mut HexGrid, hex_id: &HexId) {
        let control = self.derive_control(hex_id);
        let Some(cell) = grid.get_mut(hex_id) else {
            warn!(hex = %hex_id, "control target hex missing from grid");
            return;
        };
        if cell.state.control == control {
            return;
        }
        cell.state.control = control;
        cell.remove_visual_style_by_kind(StyleKind::FactionBlue);
        cell.remove_visual_style_by_kind(StyleKind::FactionRed);
        if let ControlFaction::Held(faction) = control {
            cell.add_visual_style(VisualStyle::faction_marker(faction));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{GeoPoint, OffsetCoord};
    use crate::grid::cell::HexCell;

    fn grid() -> HexGrid {
        let mut cells = Vec::new();
        for row in 0..2 {
            for col in 0..3 {
                cells.push(HexCell::new(
                    OffsetCoord::new(row, col),
                    GeoPoint::default(),
                    [GeoPoint::default(); 6],
                ));
            }
        }
        HexGrid::from_cells(cells)
    }

    fn force(id: &str, faction: Faction, hex: &str) -> Force {
        Force::new(ForceId::new(id), id, faction, HexId::new(hex), 2)
    }

    fn marker_kinds(grid: &HexGrid, hex: &str) -> Vec<StyleKind> {
        grid.get(&HexId::new(hex))
            .unwrap()
            .visibility
            .styles
            .iter()
            .map(|s| s.kind)
            .filter(|k| matches!(k, StyleKind::FactionBlue | StyleKind::FactionRed))
            .collect()
    }

    #[test]
    fn test_init_mapping_consistency() {
        let mut grid = grid();
        let mut index = HexForceIndex::new();
        let forces = vec![
            force("F1", Faction::Blue, "H_0_0"),
            force("F2", Faction::Red, "H_1_1"),
        ];
        index.init_mapping(&mut grid, &forces).unwrap();

        for f in &forces {
            let hex = index.hex_of_force(&f.id).unwrap();
            assert_eq!(*hex, f.hex_id);
            assert!(index.forces_in_hex(hex).contains(&f.id));
        }
        assert_eq!(index.force_count_in_hex(&HexId::new("H_0_0")), 1);
    }

    #[test]
    fn test_move_updates_both_directions() {
        let mut grid = grid();
        let mut index = HexForceIndex::new();
        index
            .init_mapping(&mut grid, &[force("F1", Faction::Blue, "H_0_0")])
            .unwrap();

        let f1 = ForceId::new("F1");
        let dest = HexId::new("H_0_2");
        index.move_force_to_hex(&mut grid, &f1, &dest).unwrap();

        assert_eq!(index.hex_of_force(&f1), Some(&dest));
        assert!(index.forces_in_hex(&HexId::new("H_0_0")).is_empty());
        assert!(index.forces_in_hex(&dest).contains(&f1));
    }

    #[test]
    fn test_move_to_unknown_hex_leaves_state_untouched() {
        let mut grid = grid();
        let mut index = HexForceIndex::new();
        index
            .init_mapping(&mut grid, &[force("F1", Faction::Blue, "H_0_0")])
            .unwrap();

        let f1 = ForceId::new("F1");
        let err = index
            .move_force_to_hex(&mut grid, &f1, &HexId::new("H_9_9"))
            .unwrap_err();
        assert!(matches!(err, BattlefieldError::HexNotFound(_)));
        assert_eq!(index.hex_of_force(&f1), Some(&HexId::new("H_0_0")));
        assert_eq!(index.force_count_in_hex(&HexId::new("H_0_0")), 1);
    }

    #[test]
    fn test_empty_ids_rejected() {
        let mut grid = grid();
        let mut index = HexForceIndex::new();
        let err = index
            .add_force(&mut grid, &ForceId::new(""), Faction::Blue, &HexId::new("H_0_0"))
            .unwrap_err();
        assert!(matches!(err, BattlefieldError::EmptyIdentifier("force")));

        let err = index
            .move_force_to_hex(&mut grid, &ForceId::new("F1"), &HexId::new(""))
            .unwrap_err();
        assert!(matches!(err, BattlefieldError::EmptyIdentifier("hex")));
    }

    #[test]
    fn test_unknown_force_rejected() {
        let mut grid = grid();
        let mut index = HexForceIndex::new();
        let err = index
            .move_force_to_hex(&mut grid, &ForceId::new("ghost"), &HexId::new("H_0_0"))
            .unwrap_err();
        assert!(matches!(err, BattlefieldError::ForceNotFound(_)));
        let err = index
            .remove_force(&mut grid, &ForceId::new("ghost"))
            .unwrap_err();
        assert!(matches!(err, BattlefieldError::ForceNotFound(_)));
    }

    #[test]
    fn test_control_derivation() {
        let mut grid = grid();
        let mut index = HexForceIndex::new();
        let hex = HexId::new("H_0_1");
        assert_eq!(index.derive_control(&hex), ControlFaction::Neutral);

        index
            .add_force(&mut grid, &ForceId::new("F1"), Faction::Blue, &hex)
            .unwrap();
        assert_eq!(index.derive_control(&hex), ControlFaction::Held(Faction::Blue));

        index
            .add_force(&mut grid, &ForceId::new("F2"), Faction::Red, &hex)
            .unwrap();
        assert_eq!(index.derive_control(&hex), ControlFaction::Contested);

        index.remove_force(&mut grid, &ForceId::new("F1")).unwrap();
        assert_eq!(index.derive_control(&hex), ControlFaction::Held(Faction::Red));

        index.remove_force(&mut grid, &ForceId::new("F2")).unwrap();
        assert_eq!(index.derive_control(&hex), ControlFaction::Neutral);
    }

    #[test]
    fn test_control_marker_styles_transition() {
        let mut grid = grid();
        let mut index = HexForceIndex::new();
        let hex = HexId::new("H_0_1");

        index
            .add_force(&mut grid, &ForceId::new("F1"), Faction::Blue, &hex)
            .unwrap();
        assert_eq!(marker_kinds(&grid, "H_0_1"), vec![StyleKind::FactionBlue]);

        // Contested hexes carry no faction marker.
        index
            .add_force(&mut grid, &ForceId::new("F2"), Faction::Red, &hex)
            .unwrap();
        assert!(marker_kinds(&grid, "H_0_1").is_empty());
        assert_eq!(
            grid.get(&hex).unwrap().state.control,
            ControlFaction::Contested
        );

        index.remove_force(&mut grid, &ForceId::new("F1")).unwrap();
        assert_eq!(marker_kinds(&grid, "H_0_1"), vec![StyleKind::FactionRed]);
    }

    #[test]
    fn test_reinit_clears_previous_roster_control() {
        let mut grid = grid();
        let mut index = HexForceIndex::new();
        index
            .init_mapping(&mut grid, &[force("F1", Faction::Blue, "H_0_0")])
            .unwrap();
        assert_eq!(
            grid.get(&HexId::new("H_0_0")).unwrap().state.control,
            ControlFaction::Held(Faction::Blue)
        );

        // Seed again with a different roster: the abandoned hex must drop
        // both its control state and its marker style.
        index
            .init_mapping(&mut grid, &[force("F2", Faction::Red, "H_1_1")])
            .unwrap();
        assert_eq!(
            grid.get(&HexId::new("H_0_0")).unwrap().state.control,
            ControlFaction::Neutral
        );
        assert!(marker_kinds(&grid, "H_0_0").is_empty());
        assert_eq!(
            grid.get(&HexId::new("H_1_1")).unwrap().state.control,
            ControlFaction::Held(Faction::Red)
        );
        assert!(!index.has_force(&ForceId::new("F1")));
    }

    #[test]
    fn test_hex_occupied_tracks_occupancy() {
        let mut grid = grid();
        let mut index = HexForceIndex::new();
        let hex = HexId::new("H_0_0");
        assert!(!index.hex_occupied(&hex));
        index
            .add_force(&mut grid, &ForceId::new("F1"), Faction::Blue, &hex)
            .unwrap();
        assert!(index.hex_occupied(&hex));
        index.remove_force(&mut grid, &ForceId::new("F1")).unwrap();
        assert!(!index.hex_occupied(&hex));
    }

    #[test]
    fn test_duplicate_add_behaves_as_move() {
        let mut grid = grid();
        let mut index = HexForceIndex::new();
        let f1 = ForceId::new("F1");
        index
            .add_force(&mut grid, &f1, Faction::Blue, &HexId::new("H_0_0"))
            .unwrap();
        index
            .add_force(&mut grid, &f1, Faction::Blue, &HexId::new("H_1_1"))
            .unwrap();

        assert_eq!(index.hex_of_force(&f1), Some(&HexId::new("H_1_1")));
        assert!(index.forces_in_hex(&HexId::new("H_0_0")).is_empty());
        assert_eq!(
            grid.get(&HexId::new("H_0_0")).unwrap().state.control,
            ControlFaction::Neutral
        );
    }
}
