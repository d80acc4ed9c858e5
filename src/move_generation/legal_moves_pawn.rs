use crate::game_state::board::Board;
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_shared::enemy_piece_on;
use crate::moves::attacks::{pawn_attacks, squares_of};
use crate::moves::chess_move::{ChessMove, MoveFlags};

pub fn generate_pawn_moves(board: &Board, out: &mut Vec<ChessMove>) {
    let side = board.side_to_move;
    let enemy_occ = board.occupancy_by_color[side.opposite().index()];
    let empty = !board.occupancy_all;
    let forward = side.pawn_direction();

    for from in squares_of(board.bitboard(side, PieceKind::Pawn)) {
        if let Some(to) = from.offset(0, forward) {
            if to.bit() & empty != 0 {
                push_pawn_move(side, from, to, None, MoveFlags::QUIET, out);

                if from.rank() == side.pawn_start_rank() {
                    if let Some(two_step) = to.offset(0, forward) {
                        if two_step.bit() & empty != 0 {
                            out.push(ChessMove::new(
                                from,
                                two_step,
                                PieceKind::Pawn,
                                None,
                                None,
                                MoveFlags::DOUBLE_STEP,
                            ));
                        }
                    }
                }
            }
        }

        for to in squares_of(pawn_attacks(side, from)) {
            if to.bit() & enemy_occ != 0 {
                let captured = enemy_piece_on(board, to);
                push_pawn_move(side, from, to, captured, MoveFlags::CAPTURE, out);
            } else if board.en_passant_square == Some(to) && has_en_passant_victim(board, from, to)
            {
                out.push(ChessMove::new(
                    from,
                    to,
                    PieceKind::Pawn,
                    Some(PieceKind::Pawn),
                    None,
                    MoveFlags::EN_PASSANT,
                ));
            }
        }
    }
}

/// Quiet pushes and captures that land on the back rank fan out into the
/// four promotion choices.
fn push_pawn_move(
    side: Color,
    from: Square,
    to: Square,
    captured: Option<PieceKind>,
    flags: MoveFlags,
    out: &mut Vec<ChessMove>,
) {
    if to.rank() == side.promotion_rank() {
        for promo in PieceKind::PROMOTIONS {
            out.push(ChessMove::new(from, to, PieceKind::Pawn, captured, Some(promo), flags));
        }
    } else {
        out.push(ChessMove::new(from, to, PieceKind::Pawn, captured, None, flags));
    }
}

// A FEN may carry an en-passant target with no pawn behind it.
fn has_en_passant_victim(board: &Board, from: Square, to: Square) -> bool {
    Square::new(to.file(), from.rank())
        .and_then(|sq| board.piece_at(sq))
        .is_some_and(|piece| {
            piece.kind == PieceKind::Pawn && piece.color == board.side_to_move.opposite()
        })
}
