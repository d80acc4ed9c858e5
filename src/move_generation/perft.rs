//! Perft node counting.
//!
//! Walks the legal move tree to a fixed depth and tallies leaf statistics.
//! The counts for well-known positions pin down generator correctness.

use crate::game_state::board::Board;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::{generate_legal_moves, has_legal_move};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: usize,
    pub captures: usize,
    pub en_passant: usize,
    pub castles: usize,
    pub promotions: usize,
    pub checks: usize,
    pub checkmates: usize,
}

impl PerftCounts {
    fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.en_passant += rhs.en_passant;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
        self.checks += rhs.checks;
        self.checkmates += rhs.checkmates;
    }
}

pub fn perft(board: &Board, depth: u8) -> PerftCounts {
    if depth == 0 {
        return PerftCounts {
            nodes: 1,
            ..PerftCounts::default()
        };
    }

    let mut total = PerftCounts::default();
    for generated in generate_legal_moves(board) {
        if depth == 1 {
            let mv = &generated.chess_move;
            let next = &generated.board_after;
            let gives_check = is_king_in_check(next, next.side_to_move);
            total.merge(PerftCounts {
                nodes: 1,
                captures: usize::from(mv.flags.is_capture),
                en_passant: usize::from(mv.flags.is_en_passant),
                castles: usize::from(mv.flags.castle.is_some()),
                promotions: usize::from(mv.promotion.is_some()),
                checks: usize::from(gives_check),
                checkmates: usize::from(gives_check && !has_legal_move(next)),
            });
        } else {
            total.merge(perft(&generated.board_after, depth - 1));
        }
    }
    total
}

/// Node count per root move, sorted by coordinate text; handy when comparing
/// against another engine's `divide` output.
pub fn perft_divide(board: &Board, depth: u8) -> Vec<(String, usize)> {
    let mut out: Vec<(String, usize)> = generate_legal_moves(board)
        .into_iter()
        .map(|generated| {
            let nodes = perft(&generated.board_after, depth.saturating_sub(1)).nodes;
            (
                crate::utils::long_algebraic::move_to_coordinate(&generated.chess_move),
                nodes,
            )
        })
        .collect();
    out.sort();
    out
}

#[cfg(test)]
mod tests {
    use super::{perft, perft_divide};
    use crate::game_state::board::Board;

    fn board(fen: &str) -> Board {
        Board::from_fen(fen).expect("perft FEN should parse")
    }

    #[test]
    fn start_position_counts() {
        let start = Board::starting_position();
        assert_eq!(perft(&start, 1).nodes, 20);
        assert_eq!(perft(&start, 2).nodes, 400);
        let depth3 = perft(&start, 3);
        assert_eq!(depth3.nodes, 8902);
        assert_eq!(depth3.captures, 34);
        assert_eq!(depth3.checks, 12);
    }

    #[test]
    fn kiwipete_counts() {
        let position = board("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
        let depth1 = perft(&position, 1);
        assert_eq!(depth1.nodes, 48);
        assert_eq!(depth1.captures, 8);
        assert_eq!(depth1.castles, 2);

        let depth2 = perft(&position, 2);
        assert_eq!(depth2.nodes, 2039);
        assert_eq!(depth2.captures, 351);
        assert_eq!(depth2.en_passant, 1);
        assert_eq!(depth2.castles, 91);
        assert_eq!(depth2.checks, 3);
    }

    #[test]
    fn endgame_position_counts() {
        let position = board("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1");
        assert_eq!(perft(&position, 1).nodes, 14);
        assert_eq!(perft(&position, 2).nodes, 191);
        assert_eq!(perft(&position, 3).nodes, 2812);
    }

    #[test]
    fn promotion_heavy_positions() {
        let position4 = board("r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1");
        assert_eq!(perft(&position4, 1).nodes, 6);
        assert_eq!(perft(&position4, 2).nodes, 264);

        let position5 = board("rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8");
        assert_eq!(perft(&position5, 1).nodes, 44);
        assert_eq!(perft(&position5, 2).nodes, 1486);
    }

    #[test]
    fn divide_sums_to_perft() {
        let start = Board::starting_position();
        let divide = perft_divide(&start, 2);
        assert_eq!(divide.len(), 20);
        assert_eq!(divide.iter().map(|(_, n)| n).sum::<usize>(), 400);
        assert!(divide.contains(&("e2e4".to_owned(), 20)));
    }
}
