//! One applied ply of a game.

use serde::Serialize;

use crate::game_state::board::Board;
use crate::game_state::chess_types::Color;
use crate::moves::chess_move::ChessMove;

/// A move as it was played: the move itself, both notations, and the board
/// it was played on. Records are only ever appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveRecord {
    /// 1-based ply number within the session.
    pub ply: usize,
    pub mover: Color,
    pub chess_move: ChessMove,
    pub san: String,
    pub coordinate: String,
    #[serde(skip)]
    pub board_before: Board,
}

impl MoveRecord {
    /// Full-move number the ply belongs to, as printed in move lists.
    pub fn move_number(&self) -> u16 {
        self.board_before.fullmove_number
    }
}
