//! 一様ランダムエンジン

use parking_lot::Mutex;
use rand::seq::IndexedRandom;
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::movegen::generate_legal;
use crate::position::Position;
use crate::types::Move;

use super::{Engine, EngineError, seeded_rng};

/// 合法手から一様に選ぶエンジン
pub struct RandomEngine {
    rng: Mutex<Xoshiro256PlusPlus>,
}

impl RandomEngine {
    pub fn new(seed: u64) -> Self {
        RandomEngine {
            rng: Mutex::new(seeded_rng(seed)),
        }
    }
}

impl Engine for RandomEngine {
    fn name(&self) -> &'static str {
        "random"
    }

    fn next_move(&self, pos: &Position) -> Result<Move, EngineError> {
        let moves = generate_legal(pos, pos.side_to_move());
        moves.choose(&mut *self.rng.lock()).copied().ok_or(EngineError::NoLegalMoves)
    }
}
