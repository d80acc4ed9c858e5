use crate::game_state::board::Board;
use crate::game_state::chess_types::*;
use crate::moves::attacks::squares_of;
use crate::moves::chess_move::{ChessMove, MoveFlags};

#[inline]
pub fn enemy_piece_on(board: &Board, square: Square) -> Option<PieceKind> {
    board
        .piece_at(square)
        .filter(|piece| piece.color != board.side_to_move)
        .map(|piece| piece.kind)
}

/// Emit one move per target square for a non-pawn piece. `targets` must
/// already exclude squares held by the mover.
pub fn push_target_moves(
    board: &Board,
    from: Square,
    moved_piece: PieceKind,
    targets: u64,
    out: &mut Vec<ChessMove>,
) {
    for to in squares_of(targets) {
        let captured = enemy_piece_on(board, to);
        let flags = if captured.is_some() {
            MoveFlags::CAPTURE
        } else {
            MoveFlags::QUIET
        };
        out.push(ChessMove::new(from, to, moved_piece, captured, None, flags));
    }
}
