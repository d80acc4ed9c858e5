use crate::game_state::board::Board;
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_checks::is_square_attacked;
use crate::move_generation::legal_move_shared::push_target_moves;
use crate::moves::attacks::king_attacks;
use crate::moves::chess_move::{ChessMove, MoveFlags};

/// Home squares for one castling option: king start and destination, rook
/// start, the squares that must be empty, and the squares the king crosses.
pub struct CastlePath {
    pub king_from: Square,
    pub king_to: Square,
    pub rook_from: Square,
    pub rook_to: Square,
    empty_files: &'static [u8],
    king_files: &'static [u8],
}

pub fn castle_path(color: Color, side: CastleSide) -> Option<CastlePath> {
    let rank = match color {
        Color::White => 0,
        Color::Black => 7,
    };
    let (king_to, rook_from, rook_to, empty_files, king_files): (u8, u8, u8, &'static [u8], &'static [u8]) =
        match side {
            CastleSide::KingSide => (6, 7, 5, &[5, 6], &[4, 5, 6]),
            CastleSide::QueenSide => (2, 0, 3, &[1, 2, 3], &[4, 3, 2]),
        };

    Some(CastlePath {
        king_from: Square::new(4, rank)?,
        king_to: Square::new(king_to, rank)?,
        rook_from: Square::new(rook_from, rank)?,
        rook_to: Square::new(rook_to, rank)?,
        empty_files,
        king_files,
    })
}

pub fn generate_king_moves(board: &Board, out: &mut Vec<ChessMove>) {
    let side = board.side_to_move;
    let own_occ = board.occupancy_by_color[side.index()];
    let Some(from) = board.king_square(side) else {
        return;
    };

    push_target_moves(board, from, PieceKind::King, king_attacks(from) & !own_occ, out);

    for castle_side in [CastleSide::KingSide, CastleSide::QueenSide] {
        if let Some(mv) = castling_move(board, side, castle_side) {
            out.push(mv);
        }
    }
}

fn castling_move(board: &Board, color: Color, side: CastleSide) -> Option<ChessMove> {
    if !board.castling_rights.allows(color, side) {
        return None;
    }

    let path = castle_path(color, side)?;
    let king = Piece::new(PieceKind::King, color);
    let rook = Piece::new(PieceKind::Rook, color);
    if board.piece_at(path.king_from) != Some(king) || board.piece_at(path.rook_from) != Some(rook)
    {
        return None;
    }

    let rank = path.king_from.rank();
    let must_be_empty = path
        .empty_files
        .iter()
        .filter_map(|&file| Square::new(file, rank))
        .fold(0u64, |acc, sq| acc | sq.bit());
    if board.occupancy_all & must_be_empty != 0 {
        return None;
    }

    // Start, transit and destination squares must all be safe.
    let enemy = color.opposite();
    let crosses_attack = path
        .king_files
        .iter()
        .filter_map(|&file| Square::new(file, rank))
        .any(|sq| is_square_attacked(board, sq, enemy));
    if crosses_attack {
        return None;
    }

    Some(ChessMove::new(
        path.king_from,
        path.king_to,
        PieceKind::King,
        None,
        None,
        MoveFlags::castle(side),
    ))
}
