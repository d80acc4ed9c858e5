//! Game status classification.
//!
//! `evaluate_status` looks at a position plus the repetition history and
//! decides which [`GameStatus`] applies. Checkmate and stalemate win over
//! every draw rule; after that the fifty-move rule, threefold repetition and
//! insufficient material are checked in that order.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game_state::board::{Board, PositionKey};
use crate::game_state::chess_rules::{FIFTY_MOVE_HALFMOVE_LIMIT, REPETITION_LIMIT};
use crate::game_state::chess_types::{Color, PieceKind};
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::has_legal_move;
use crate::moves::attacks::squares_of;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    InProgress,
    /// Side to move is in check but has a reply. Not terminal.
    Check,
    Checkmate,
    Stalemate,
    DrawByRepetition,
    DrawByFiftyMove,
    DrawByInsufficientMaterial,
    Resigned,
}

impl GameStatus {
    pub const fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::InProgress | GameStatus::Check)
    }

    pub const fn is_draw(self) -> bool {
        matches!(
            self,
            GameStatus::Stalemate
                | GameStatus::DrawByRepetition
                | GameStatus::DrawByFiftyMove
                | GameStatus::DrawByInsufficientMaterial
        )
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            GameStatus::InProgress => "in progress",
            GameStatus::Check => "check",
            GameStatus::Checkmate => "checkmate",
            GameStatus::Stalemate => "stalemate",
            GameStatus::DrawByRepetition => "draw by threefold repetition",
            GameStatus::DrawByFiftyMove => "draw by fifty-move rule",
            GameStatus::DrawByInsufficientMaterial => "draw by insufficient material",
            GameStatus::Resigned => "resigned",
        };
        f.write_str(text)
    }
}

/// Occurrence counts of every position reached in a game.
#[derive(Debug, Clone, Default)]
pub struct RepetitionTable {
    seen: HashMap<PositionKey, usize>,
}

impl RepetitionTable {
    /// Records one more occurrence of `board` and returns the new count.
    pub fn record(&mut self, board: &Board) -> usize {
        let count = self.seen.entry(board.position_key()).or_insert(0);
        *count += 1;
        *count
    }

    pub fn occurrences(&self, board: &Board) -> usize {
        self.seen.get(&board.position_key()).copied().unwrap_or(0)
    }
}

pub fn evaluate_status(board: &Board, repetitions: &RepetitionTable) -> GameStatus {
    let in_check = is_king_in_check(board, board.side_to_move);

    if !has_legal_move(board) {
        return if in_check {
            GameStatus::Checkmate
        } else {
            GameStatus::Stalemate
        };
    }

    if board.halfmove_clock >= FIFTY_MOVE_HALFMOVE_LIMIT {
        return GameStatus::DrawByFiftyMove;
    }

    if repetitions.occurrences(board) >= REPETITION_LIMIT {
        return GameStatus::DrawByRepetition;
    }

    if insufficient_material(board) {
        return GameStatus::DrawByInsufficientMaterial;
    }

    if in_check {
        GameStatus::Check
    } else {
        GameStatus::InProgress
    }
}

/// Neither side can ever mate: bare kings, a single minor piece against a
/// bare king, or bishops only with every bishop on the same square shade.
pub fn insufficient_material(board: &Board) -> bool {
    let heavy_or_pawn = [PieceKind::Pawn, PieceKind::Rook, PieceKind::Queen];
    for color in [Color::White, Color::Black] {
        if heavy_or_pawn.iter().any(|&kind| board.count(color, kind) > 0) {
            return false;
        }
    }

    let knights = board.count(Color::White, PieceKind::Knight) + board.count(Color::Black, PieceKind::Knight);
    let bishops_bb =
        board.bitboard(Color::White, PieceKind::Bishop) | board.bitboard(Color::Black, PieceKind::Bishop);
    let bishops = bishops_bb.count_ones();

    match (knights, bishops) {
        (0, 0) | (1, 0) | (0, 1) => true,
        (0, _) => {
            let mut shades = squares_of(bishops_bb).map(|sq| sq.is_light()).peekable();
            match shades.peek().copied() {
                Some(first) => shades.all(|light| light == first),
                None => true,
            }
        }
        _ => false,
    }
}
