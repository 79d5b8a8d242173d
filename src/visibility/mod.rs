//! Fog of war: line-of-sight policies and the visibility engine

pub mod engine;
pub mod los;

pub use engine::VisibilityEngine;
pub use los::{has_line_of_sight, AlwaysBlocks, LosPolicy, NeverBlocks, RandomBlocking};
