//! Attack and check detection.
//!
//! A square is attacked when any enemy piece could capture on it ignoring
//! the safety of the enemy's own king. Each piece kind is traced from the
//! target square outward, so no move list is built here.

use crate::game_state::board::Board;
use crate::game_state::chess_types::*;
use crate::moves::attacks::{bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks};

#[inline]
pub fn is_king_in_check(board: &Board, color: Color) -> bool {
    let Some(king_sq) = board.king_square(color) else {
        return false;
    };
    is_square_attacked(board, king_sq, color.opposite())
}

pub fn is_square_attacked(board: &Board, square: Square, attacker_color: Color) -> bool {
    let attacker = |kind: PieceKind| board.bitboard(attacker_color, kind);

    // A pawn of `attacker_color` hits `square` exactly when a defender pawn on
    // `square` would hit that pawn's square.
    if pawn_attacks(attacker_color.opposite(), square) & attacker(PieceKind::Pawn) != 0 {
        return true;
    }

    if knight_attacks(square) & attacker(PieceKind::Knight) != 0 {
        return true;
    }

    if king_attacks(square) & attacker(PieceKind::King) != 0 {
        return true;
    }

    let diagonal = attacker(PieceKind::Bishop) | attacker(PieceKind::Queen);
    if bishop_attacks(square, board.occupancy_all) & diagonal != 0 {
        return true;
    }

    let straight = attacker(PieceKind::Rook) | attacker(PieceKind::Queen);
    rook_attacks(square, board.occupancy_all) & straight != 0
}
