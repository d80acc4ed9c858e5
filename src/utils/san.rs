//! Standard algebraic notation for generated moves.

use crate::game_state::board::Board;
use crate::game_state::chess_types::{CastleSide, PieceKind};
use crate::move_generation::legal_move_apply::apply_move;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::{has_legal_move, legal_moves};
use crate::moves::chess_move::ChessMove;
use crate::utils::algebraic::{file_char, rank_char, square_to_algebraic};

/// SAN for `mv`, which must be legal on `board`.
pub fn move_to_san(board: &Board, mv: &ChessMove) -> String {
    let mut san = match mv.flags.castle {
        Some(CastleSide::KingSide) => "O-O".to_owned(),
        Some(CastleSide::QueenSide) => "O-O-O".to_owned(),
        None => body(board, mv),
    };

    let after = apply_move(board, mv);
    if is_king_in_check(&after, after.side_to_move) {
        san.push(if has_legal_move(&after) { '+' } else { '#' });
    }
    san
}

fn body(board: &Board, mv: &ChessMove) -> String {
    let mut out = String::with_capacity(8);

    if mv.moved_piece == PieceKind::Pawn {
        if mv.is_capture() {
            out.push(file_char(mv.from));
            out.push('x');
        }
        out.push_str(&square_to_algebraic(mv.to));
        if let Some(promotion) = mv.promotion {
            out.push('=');
            out.push(promotion.letter().to_ascii_uppercase());
        }
        return out;
    }

    out.push(mv.moved_piece.letter().to_ascii_uppercase());
    out.push_str(&disambiguation(board, mv));
    if mv.is_capture() {
        out.push('x');
    }
    out.push_str(&square_to_algebraic(mv.to));
    out
}

/// File, rank, or both of the origin when another piece of the same kind
/// could also reach the destination.
fn disambiguation(board: &Board, mv: &ChessMove) -> String {
    if mv.moved_piece == PieceKind::King {
        return String::new();
    }

    let rivals: Vec<ChessMove> = legal_moves(board)
        .into_iter()
        .filter(|other| {
            other.moved_piece == mv.moved_piece && other.to == mv.to && other.from != mv.from
        })
        .collect();

    if rivals.is_empty() {
        return String::new();
    }
    if rivals.iter().all(|other| other.from.file() != mv.from.file()) {
        return file_char(mv.from).to_string();
    }
    if rivals.iter().all(|other| other.from.rank() != mv.from.rank()) {
        return rank_char(mv.from).to_string();
    }
    square_to_algebraic(mv.from)
}

#[cfg(test)]
mod tests {
    use super::move_to_san;
    use crate::game_state::board::Board;
    use crate::game_state::chess_types::{PieceKind, Square};
    use crate::utils::long_algebraic::match_legal_move;

    fn san(fen: &str, from: &str, to: &str, promotion: Option<PieceKind>) -> String {
        let board = Board::from_fen(fen).expect("test FEN should parse");
        let from: Square = from.parse().expect("from square should parse");
        let to: Square = to.parse().expect("to square should parse");
        let mv = match_legal_move(&board, from, to, promotion).expect("test move should be legal");
        move_to_san(&board, &mv)
    }

    const START: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    #[test]
    fn pawn_and_piece_moves() {
        assert_eq!(san(START, "e2", "e4", None), "e4");
        assert_eq!(san(START, "g1", "f3", None), "Nf3");
        assert_eq!(
            san("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1", "e4", "d5", None),
            "exd5"
        );
        assert_eq!(
            san("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1", "e5", "d6", None),
            "exd6"
        );
    }

    #[test]
    fn castling_and_promotion() {
        let fen = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1";
        assert_eq!(san(fen, "e1", "g1", None), "O-O");
        assert_eq!(san(fen, "e1", "c1", None), "O-O-O");
        assert_eq!(
            san("8/P6k/8/8/8/8/8/K7 w - - 0 1", "a7", "a8", Some(PieceKind::Knight)),
            "a8=N"
        );
        assert_eq!(san("1r5k/P7/8/8/8/8/8/K7 w - - 0 1", "a7", "b8", None), "axb8=Q+");
    }

    #[test]
    fn disambiguates_by_file_then_rank_then_square() {
        // Knights on b1 and f1 both reach d2.
        assert_eq!(san("4k3/8/8/8/8/8/8/1N2KN2 w - - 0 1", "b1", "d2", None), "Nbd2");
        // Rooks on a1 and a5 share the file.
        assert_eq!(san("4k3/8/8/R7/8/8/8/R3K3 w - - 0 1", "a1", "a3", None), "R1a3");
        // Queens on a1, c1 and a3 all reach b2.
        assert_eq!(san("4k3/8/8/8/8/Q7/8/Q1Q1K3 w - - 0 1", "a1", "b2", None), "Qa1b2");
    }

    #[test]
    fn check_and_mate_suffixes() {
        assert_eq!(san("4k3/8/8/8/8/8/8/R3K3 w - - 0 1", "a1", "a8", None), "Ra8+");
        assert_eq!(
            san("rnbqkbnr/pppp1ppp/8/4p3/6P1/5P2/PPPPP2P/RNBQKBNR b KQkq - 0 2", "d8", "h4", None),
            "Qh4#"
        );
    }
}
