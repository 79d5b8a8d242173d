//! Hexfield - Hex-Grid Battlefield Core
//!
//! Spatial model for a faction wargame: a staggered hex grid laid over real
//! geography, a bidirectional hex/force occupancy index with derived
//! territorial control, and a probabilistic fog-of-war engine.

pub mod battlefield;
pub mod core;
pub mod force;
pub mod grid;
pub mod index;
pub mod visibility;
