//! Full legal move generation pipeline.
//!
//! Collects pseudo-legal moves piece by piece, applies each candidate to a
//! copy of the board, and drops every candidate that leaves the mover's own
//! king attacked. That single filter is the legality rule for all pieces,
//! castling and en passant included.

use crate::game_state::board::Board;
use crate::game_state::chess_types::Square;
use crate::move_generation::legal_move_apply::apply_move;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_moves_king::generate_king_moves;
use crate::move_generation::legal_moves_knight::generate_knight_moves;
use crate::move_generation::legal_moves_pawn::generate_pawn_moves;
use crate::move_generation::legal_moves_sliders::{
    generate_bishop_moves, generate_queen_moves, generate_rook_moves,
};
use crate::moves::chess_move::ChessMove;

/// A legal move together with the position it produces.
#[derive(Debug, Clone)]
pub struct GeneratedMove {
    pub chess_move: ChessMove,
    pub board_after: Board,
}

pub fn pseudo_legal_moves(board: &Board) -> Vec<ChessMove> {
    let mut pseudo = Vec::<ChessMove>::with_capacity(64);

    generate_pawn_moves(board, &mut pseudo);
    generate_knight_moves(board, &mut pseudo);
    generate_bishop_moves(board, &mut pseudo);
    generate_rook_moves(board, &mut pseudo);
    generate_queen_moves(board, &mut pseudo);
    generate_king_moves(board, &mut pseudo);

    pseudo
}

pub fn generate_legal_moves(board: &Board) -> Vec<GeneratedMove> {
    let mover = board.side_to_move;
    pseudo_legal_moves(board)
        .into_iter()
        .filter_map(|chess_move| {
            let board_after = apply_move(board, &chess_move);
            (!is_king_in_check(&board_after, mover)).then_some(GeneratedMove {
                chess_move,
                board_after,
            })
        })
        .collect()
}

pub fn legal_moves(board: &Board) -> Vec<ChessMove> {
    generate_legal_moves(board)
        .into_iter()
        .map(|generated| generated.chess_move)
        .collect()
}

/// Legal moves starting on `square`. Empty for an empty square, an enemy
/// piece, or a piece with nowhere to go.
pub fn legal_moves_from(board: &Board, square: Square) -> Vec<ChessMove> {
    let owns_square = board
        .piece_at(square)
        .is_some_and(|piece| piece.color == board.side_to_move);
    if !owns_square {
        return Vec::new();
    }

    legal_moves(board)
        .into_iter()
        .filter(|mv| mv.from == square)
        .collect()
}

pub fn has_legal_move(board: &Board) -> bool {
    let mover = board.side_to_move;
    pseudo_legal_moves(board)
        .iter()
        .any(|mv| !is_king_in_check(&apply_move(board, mv), mover))
}

#[cfg(test)]
mod tests {
    use super::{generate_legal_moves, has_legal_move, legal_moves, legal_moves_from};
    use crate::game_state::board::Board;
    use crate::game_state::chess_types::{CastleSide, PieceKind, Square};
    use crate::move_generation::legal_move_checks::is_king_in_check;

    fn sq(name: &str) -> Square {
        name.parse().expect("test square should parse")
    }

    fn board(fen: &str) -> Board {
        Board::from_fen(fen).expect("test FEN should parse")
    }

    #[test]
    fn twenty_moves_from_the_start() {
        let start = Board::starting_position();
        assert_eq!(legal_moves(&start).len(), 20);
        assert_eq!(legal_moves_from(&start, sq("g1")).len(), 2);
        assert_eq!(legal_moves_from(&start, sq("e2")).len(), 2);
    }

    #[test]
    fn empty_enemy_and_blocked_squares_have_no_moves() {
        let start = Board::starting_position();
        assert!(legal_moves_from(&start, sq("e4")).is_empty());
        assert!(legal_moves_from(&start, sq("e7")).is_empty());
        assert!(legal_moves_from(&start, sq("a1")).is_empty());
    }

    #[test]
    fn no_generated_move_leaves_own_king_attacked() {
        let fens = [
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1",
        ];
        for fen in fens {
            let position = board(fen);
            for generated in generate_legal_moves(&position) {
                assert!(
                    !is_king_in_check(&generated.board_after, position.side_to_move),
                    "{fen}: {:?} leaves the king attacked",
                    generated.chess_move
                );
            }
        }
    }

    #[test]
    fn pinned_piece_cannot_leave_the_pin_line() {
        let position = board("4k3/4r3/8/8/8/8/4N3/4K3 w - - 0 1");
        assert!(legal_moves_from(&position, sq("e2")).is_empty());
    }

    #[test]
    fn promotion_exposes_all_four_choices() {
        let position = board("8/P6k/8/8/8/8/8/K7 w - - 0 1");
        let mut promotions: Vec<PieceKind> = legal_moves_from(&position, sq("a7"))
            .into_iter()
            .filter_map(|mv| mv.promotion)
            .collect();
        promotions.sort_by_key(|kind| kind.index());
        assert_eq!(
            promotions,
            vec![PieceKind::Knight, PieceKind::Bishop, PieceKind::Rook, PieceKind::Queen]
        );
    }

    #[test]
    fn castling_requires_rights_empty_path_and_safe_squares() {
        let open = board("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let castles = |position: &Board| -> Vec<CastleSide> {
            legal_moves_from(position, sq("e1"))
                .into_iter()
                .filter_map(|mv| mv.flags.castle)
                .collect()
        };
        assert_eq!(castles(&open).len(), 2);

        let no_rights = board("r3k2r/8/8/8/8/8/8/R3K2R w kq - 0 1");
        assert!(castles(&no_rights).is_empty());

        let blocked = board("r3k2r/8/8/8/8/8/8/RN2K1NR w KQkq - 0 1");
        assert!(castles(&blocked).is_empty());

        let transit_attacked = board("r3k2r/8/8/8/8/8/5r2/R3K2R w KQkq - 0 1");
        assert_eq!(castles(&transit_attacked), vec![CastleSide::QueenSide]);

        let destination_attacked = board("r3k2r/8/8/8/8/8/2r5/R3K2R w KQkq - 0 1");
        assert_eq!(castles(&destination_attacked), vec![CastleSide::KingSide]);

        let in_check = board("r3k2r/8/8/8/8/8/4r3/R3K2R w KQkq - 0 1");
        assert!(castles(&in_check).is_empty());
    }

    #[test]
    fn queen_side_castle_ignores_attack_on_b_file() {
        let position = board("r3k2r/8/8/8/8/8/1r6/R3K2R w KQkq - 0 1");
        let has_long_castle = legal_moves_from(&position, sq("e1"))
            .into_iter()
            .any(|mv| mv.flags.castle == Some(CastleSide::QueenSide));
        assert!(has_long_castle);
    }

    #[test]
    fn en_passant_that_exposes_the_king_is_illegal() {
        let position = board("8/8/8/KPp4r/8/8/8/7k w - c6 0 1");
        let ep = legal_moves_from(&position, sq("b5"))
            .into_iter()
            .find(|mv| mv.flags.is_en_passant);
        assert!(ep.is_none());
    }

    #[test]
    fn mated_side_has_no_legal_move() {
        let mated = board("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3");
        assert!(!has_legal_move(&mated));
        assert!(has_legal_move(&Board::starting_position()));
    }
}
