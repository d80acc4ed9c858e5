//! Bishop, rook and queen move generation.
//!
//! All three share the same shape: trace rays against the full occupancy,
//! drop squares held by the mover, and emit quiet moves or captures.

use crate::game_state::board::Board;
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_shared::push_target_moves;
use crate::moves::attacks::{bishop_attacks, queen_attacks, rook_attacks, squares_of};
use crate::moves::chess_move::ChessMove;

pub fn generate_bishop_moves(board: &Board, out: &mut Vec<ChessMove>) {
    generate_slider_moves(board, PieceKind::Bishop, bishop_attacks, out);
}

pub fn generate_rook_moves(board: &Board, out: &mut Vec<ChessMove>) {
    generate_slider_moves(board, PieceKind::Rook, rook_attacks, out);
}

pub fn generate_queen_moves(board: &Board, out: &mut Vec<ChessMove>) {
    generate_slider_moves(board, PieceKind::Queen, queen_attacks, out);
}

fn generate_slider_moves(
    board: &Board,
    kind: PieceKind,
    attacks: fn(Square, u64) -> u64,
    out: &mut Vec<ChessMove>,
) {
    let side = board.side_to_move;
    let own_occ = board.occupancy_by_color[side.index()];

    for from in squares_of(board.bitboard(side, kind)) {
        let targets = attacks(from, board.occupancy_all) & !own_occ;
        push_target_moves(board, from, kind, targets, out);
    }
}
