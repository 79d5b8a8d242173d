//! Battlefield context: the single owner of grid, forces, index, and fog
//!
//! Everything flows through this struct explicitly instead of a global store.
//! It is single-threaded by construction; callers that need it elsewhere can
//! move the whole context.

use ahash::{AHashMap, AHashSet};
use tracing::info;

use crate::core::config::BattlefieldConfig;
use crate::core::error::{BattlefieldError, Result};
use crate::core::types::{ControlFaction, Faction, ForceId, HexId};
use crate::force::Force;
use crate::grid::cell::HexCell;
use crate::grid::styles::{StyleLayer, VisualStyle};
use crate::grid::HexGrid;
use crate::index::HexForceIndex;
use crate::visibility::{LosPolicy, VisibilityEngine};

pub struct Battlefield {
    config: BattlefieldConfig,
    grid: HexGrid,
    index: HexForceIndex,
    engine: VisibilityEngine,
    forces: AHashMap<ForceId, Force>,
    active_faction: Faction,
    round: u32,
}

impl Battlefield {
    /// Battlefield with the default probabilistic line-of-sight policy.
    pub fn new(config: BattlefieldConfig, grid: HexGrid) -> Self {
        let engine = VisibilityEngine::new(config.vision.clone());
        Self::with_engine(config, grid, engine)
    }

    /// Battlefield with a custom line-of-sight policy, for deterministic
    /// replays and tests.
    pub fn with_policy(
        config: BattlefieldConfig,
        grid: HexGrid,
        policy: Box<dyn LosPolicy>,
    ) -> Self {
        let engine = VisibilityEngine::with_policy(config.vision.clone(), policy);
        Self::with_engine(config, grid, engine)
    }

    fn with_engine(config: BattlefieldConfig, grid: HexGrid, engine: VisibilityEngine) -> Self {
        Self {
            config,
            grid,
            index: HexForceIndex::new(),
            engine,
            forces: AHashMap::new(),
            active_faction: Faction::Blue,
            round: 0,
        }
    }

    /// Deploy the initial force roster. Validates the whole roster before
    /// touching any state, then builds the index and the first fog pass.
    pub fn init_forces(&mut self, forces: Vec<Force>) -> Result<()> {
        for force in &forces {
            self.validate_force(force)?;
        }
        self.index.init_mapping(&mut self.grid, &forces)?;
        self.forces = forces.into_iter().map(|f| (f.id.clone(), f)).collect();
        self.recompute_visibility();
        info!(forces = self.forces.len(), "battlefield initialized");
        Ok(())
    }

    /// Deploy a single new force mid-game.
    pub fn create_force(&mut self, force: Force) -> Result<()> {
        self.validate_force(&force)?;
        self.index
            .add_force(&mut self.grid, &force.id, force.faction, &force.hex_id)?;
        self.forces.insert(force.id.clone(), force);
        self.recompute_visibility();
        Ok(())
    }

    /// Withdraw a force from the battlefield.
    pub fn remove_force(&mut self, force_id: &ForceId) -> Result<()> {
        self.index.remove_force(&mut self.grid, force_id)?;
        self.forces.remove(force_id);
        self.recompute_visibility();
        Ok(())
    }

    /// Move a force to another hex, updating control and fog.
    pub fn move_force(&mut self, force_id: &ForceId, hex_id: &HexId) -> Result<()> {
        self.index
            .move_force_to_hex(&mut self.grid, force_id, hex_id)?;
        if let Some(force) = self.forces.get_mut(force_id) {
            force.hex_id = hex_id.clone();
        }
        self.recompute_visibility();
        Ok(())
    }

    /// Advance the round counter and rebuild fog. Probabilistic sight means a
    /// new round can reveal or hide mountain cells even when nothing moved.
    pub fn advance_round(&mut self) {
        self.round += 1;
        self.recompute_visibility();
        info!(round = self.round, "round advanced");
    }

    /// Change whose view is on screen. Restyles fog from the already-computed
    /// visibility sets; no recompute happens.
    pub fn switch_faction(&mut self, faction: Faction) {
        self.active_faction = faction;
        self.engine.restyle(&mut self.grid, faction);
    }

    /// Full fog-of-war rebuild for the current roster.
    pub fn recompute_visibility(&mut self) {
        self.engine
            .recompute(self.forces.values(), &mut self.grid, self.active_faction);
    }

    pub fn is_visible(&self, faction: Faction, hex_id: &HexId) -> bool {
        self.engine.is_visible(faction, hex_id)
    }

    pub fn visible_hexes(&self, faction: Faction) -> &AHashSet<HexId> {
        self.engine.visible_hexes(faction)
    }

    pub fn visible_hex_count(&self, faction: Faction) -> usize {
        self.engine.visible_hexes(faction).len()
    }

    pub fn control_faction(&self, hex_id: &HexId) -> ControlFaction {
        self.index.derive_control(hex_id)
    }

    pub fn forces_in_hex(&self, hex_id: &HexId) -> Vec<ForceId> {
        self.index.forces_in_hex(hex_id)
    }

    pub fn hex_of_force(&self, force_id: &ForceId) -> Option<&HexId> {
        self.index.hex_of_force(force_id)
    }

    pub fn top_visual_style(&self, hex_id: &HexId, layer: StyleLayer) -> Option<&VisualStyle> {
        self.grid.get(hex_id).and_then(|c| c.top_visual_style(layer))
    }

    pub fn cells_in_range(&self, center: &HexId, radius: u32) -> Vec<&HexCell> {
        self.grid.cells_in_range(center, radius)
    }

    pub fn force(&self, force_id: &ForceId) -> Option<&Force> {
        self.forces.get(force_id)
    }

    pub fn force_count(&self) -> usize {
        self.forces.len()
    }

    pub fn grid(&self) -> &HexGrid {
        &self.grid
    }

    pub fn config(&self) -> &BattlefieldConfig {
        &self.config
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn active_faction(&self) -> Faction {
        self.active_faction
    }

    fn validate_force(&self, force: &Force) -> Result<()> {
        if force.id.is_empty() {
            return Err(BattlefieldError::EmptyIdentifier("force"));
        }
        if force.hex_id.is_empty() {
            return Err(BattlefieldError::EmptyIdentifier("hex"));
        }
        if !self.grid.contains(&force.hex_id) {
            return Err(BattlefieldError::HexNotFound(force.hex_id.clone()));
        }
        Ok(())
    }
}
