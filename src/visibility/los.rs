//! Line-of-sight evaluation with pluggable blocking policies

use rand::rngs::ThreadRng;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::core::config::VisionConfig;
use crate::grid::cell::HexCell;

/// Decides whether blocking terrain actually hides the target on a given
/// evaluation. Stateful so probabilistic policies can own their rng; seeded
/// policies make visibility reproducible in tests and replays.
pub trait LosPolicy {
    fn blocks(&mut self, from: &HexCell, to: &HexCell) -> bool;
}

/// Concealment as a per-evaluation coin flip: sight into blocking terrain
/// succeeds with `pass_chance`. Two observers of the same mountain cell can
/// get different answers in the same pass.
pub struct RandomBlocking<R: Rng> {
    rng: R,
    pass_chance: f64,
}

impl RandomBlocking<ThreadRng> {
    pub fn new(pass_chance: f64) -> Self {
        Self {
            rng: rand::thread_rng(),
            pass_chance,
        }
    }
}

impl RandomBlocking<ChaCha8Rng> {
    pub fn seeded(seed: u64, pass_chance: f64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            pass_chance,
        }
    }
}

impl<R: Rng> LosPolicy for RandomBlocking<R> {
    fn blocks(&mut self, _from: &HexCell, _to: &HexCell) -> bool {
        !self.rng.gen_bool(self.pass_chance)
    }
}

/// Blocking terrain always hides the target.
pub struct AlwaysBlocks;

impl LosPolicy for AlwaysBlocks {
    fn blocks(&mut self, _from: &HexCell, _to: &HexCell) -> bool {
        true
    }
}

/// Terrain never hides anything; range alone decides visibility.
pub struct NeverBlocks;

impl LosPolicy for NeverBlocks {
    fn blocks(&mut self, _from: &HexCell, _to: &HexCell) -> bool {
        false
    }
}

/// Whether `from` can see `to`. A cell always sees itself; only the target
/// cell's terrain is tested against the blocking set, intermediate cells are
/// not traced.
pub fn has_line_of_sight(
    from: &HexCell,
    to: &HexCell,
    vision: &VisionConfig,
    policy: &mut dyn LosPolicy,
) -> bool {
    if from.id == to.id {
        return true;
    }
    if vision.blocks(to.terrain.terrain_type) {
        return !policy.blocks(from, to);
    }
    true
}
