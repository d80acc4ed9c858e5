use crate::game_state::board::Board;
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_shared::push_target_moves;
use crate::moves::attacks::{knight_attacks, squares_of};
use crate::moves::chess_move::ChessMove;

pub fn generate_knight_moves(board: &Board, out: &mut Vec<ChessMove>) {
    let side = board.side_to_move;
    let own_occ = board.occupancy_by_color[side.index()];

    for from in squares_of(board.bitboard(side, PieceKind::Knight)) {
        push_target_moves(board, from, PieceKind::Knight, knight_attacks(from) & !own_occ, out);
    }
}
