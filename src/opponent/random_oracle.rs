//! Uniformly random legal moves.
//!
//! Serves both as an in-process oracle for games without an engine and as
//! the coordinator's fallback when the real oracle fails.

use async_trait::async_trait;
use parking_lot::Mutex;
use rand::prelude::IndexedRandom;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::game_state::board::Board;
use crate::move_generation::legal_move_generator::legal_moves;
use crate::moves::chess_move::ChessMove;
use crate::opponent::move_oracle::{MoveOracle, OracleError};
use crate::utils::long_algebraic::move_to_coordinate;

/// A uniformly chosen legal move, `None` when the side to move has none.
pub fn pick_random_move(board: &Board, rng: &mut dyn RngCore) -> Option<ChessMove> {
    legal_moves(board).as_slice().choose(rng).copied()
}

pub struct RandomOracle {
    rng: Mutex<StdRng>,
}

impl RandomOracle {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomOracle {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MoveOracle for RandomOracle {
    async fn best_move(&self, position: &str, _strength: u8) -> Result<String, OracleError> {
        let board = Board::from_fen(position).map_err(|e| OracleError::Transport(e.to_string()))?;
        let mut rng = self.rng.lock();
        pick_random_move(&board, &mut *rng)
            .map(|mv| move_to_coordinate(&mv))
            .ok_or(OracleError::NoMove)
    }

    fn name(&self) -> &str {
        "random"
    }
}
