//! Board transition for a generated move.
//!
//! Works on a copy: the input board is never touched, so a rejected move
//! can't leave a half-updated position behind.

use crate::game_state::board::Board;
use crate::game_state::chess_types::*;
use crate::move_generation::legal_moves_king::castle_path;
use crate::moves::chess_move::ChessMove;

/// Board after `mv`. `mv` must come from the generator for `board`.
pub fn apply_move(board: &Board, mv: &ChessMove) -> Board {
    let moving_color = board.side_to_move;
    let mut next = board.clone();

    next.clear_square(mv.from);

    if let Some(victim) = mv.en_passant_victim() {
        next.clear_square(victim);
    } else if mv.flags.is_capture {
        next.clear_square(mv.to);
    }

    let placed_kind = mv.promotion.unwrap_or(mv.moved_piece);
    next.put_piece(mv.to, Piece::new(placed_kind, moving_color));

    if let Some(side) = mv.flags.castle {
        if let Some(path) = castle_path(moving_color, side) {
            next.clear_square(path.rook_from);
            next.put_piece(path.rook_to, Piece::new(PieceKind::Rook, moving_color));
        }
    }

    update_castling_rights(&mut next, moving_color, mv);

    next.en_passant_square = if mv.flags.is_double_step {
        Square::new(mv.from.file(), (mv.from.rank() + mv.to.rank()) / 2)
    } else {
        None
    };

    if mv.resets_halfmove_clock() {
        next.halfmove_clock = 0;
    } else {
        next.halfmove_clock = next.halfmove_clock.saturating_add(1);
    }
    if moving_color == Color::Black {
        next.fullmove_number = next.fullmove_number.saturating_add(1);
    }

    next.side_to_move = moving_color.opposite();
    next
}

fn update_castling_rights(board: &mut Board, moving_color: Color, mv: &ChessMove) {
    if mv.moved_piece == PieceKind::King {
        board.castling_rights.revoke_all(moving_color);
    }

    // A rook leaving its corner, or anything landing on a corner, ends that option.
    for square in [mv.from, mv.to] {
        for color in [Color::White, Color::Black] {
            for side in [CastleSide::KingSide, CastleSide::QueenSide] {
                if castle_path(color, side).is_some_and(|path| path.rook_from == square) {
                    board.castling_rights.revoke(color, side);
                }
            }
        }
    }
}
