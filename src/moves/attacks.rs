//! Attack bitboards for every piece kind.
//!
//! Leaper tables (knight, king, pawn captures) are computed at compile time;
//! slider attacks trace rays against the current occupancy and stop on the
//! first blocker, which is included in the result.

use crate::game_state::chess_types::{Color, Square};

const KNIGHT_DELTAS: [(i32, i32); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_DELTAS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

pub const BISHOP_DIRECTIONS: [(i32, i32); 4] = [(1, 1), (-1, 1), (1, -1), (-1, -1)];
pub const ROOK_DIRECTIONS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

pub const KNIGHT_ATTACKS: [u64; 64] = leaper_table(&KNIGHT_DELTAS);
pub const KING_ATTACKS: [u64; 64] = leaper_table(&KING_DELTAS);
pub const WHITE_PAWN_ATTACKS: [u64; 64] = leaper_table(&[(-1, 1), (1, 1)]);
pub const BLACK_PAWN_ATTACKS: [u64; 64] = leaper_table(&[(-1, -1), (1, -1)]);

#[inline]
pub const fn knight_attacks(square: Square) -> u64 {
    KNIGHT_ATTACKS[square.index()]
}

#[inline]
pub const fn king_attacks(square: Square) -> u64 {
    KING_ATTACKS[square.index()]
}

/// Squares a pawn of `color` standing on `square` captures on.
#[inline]
pub const fn pawn_attacks(color: Color, square: Square) -> u64 {
    match color {
        Color::White => WHITE_PAWN_ATTACKS[square.index()],
        Color::Black => BLACK_PAWN_ATTACKS[square.index()],
    }
}

#[inline]
pub fn bishop_attacks(square: Square, occupancy: u64) -> u64 {
    slider_attacks(square, occupancy, &BISHOP_DIRECTIONS)
}

#[inline]
pub fn rook_attacks(square: Square, occupancy: u64) -> u64 {
    slider_attacks(square, occupancy, &ROOK_DIRECTIONS)
}

#[inline]
pub fn queen_attacks(square: Square, occupancy: u64) -> u64 {
    bishop_attacks(square, occupancy) | rook_attacks(square, occupancy)
}

fn slider_attacks(square: Square, occupancy: u64, directions: &[(i32, i32)]) -> u64 {
    let mut attacks = 0u64;
    for &(file_step, rank_step) in directions {
        let mut file = square.file() as i32 + file_step;
        let mut rank = square.rank() as i32 + rank_step;

        while (0..8).contains(&file) && (0..8).contains(&rank) {
            let bit = 1u64 << (rank * 8 + file);
            attacks |= bit;
            if occupancy & bit != 0 {
                break;
            }
            file += file_step;
            rank += rank_step;
        }
    }
    attacks
}

const fn leaper_table(deltas: &[(i32, i32)]) -> [u64; 64] {
    let mut table = [0u64; 64];
    let mut sq = 0usize;

    while sq < 64 {
        let file = (sq % 8) as i32;
        let rank = (sq / 8) as i32;
        let mut attacks = 0u64;
        let mut i = 0usize;

        while i < deltas.len() {
            let (df, dr) = deltas[i];
            attacks |= set_if_valid(file + df, rank + dr);
            i += 1;
        }

        table[sq] = attacks;
        sq += 1;
    }

    table
}

const fn set_if_valid(file: i32, rank: i32) -> u64 {
    if file < 0 || file > 7 || rank < 0 || rank > 7 {
        return 0;
    }
    1u64 << (rank as usize * 8 + file as usize)
}

/// Iterates the squares set in a bitboard, lowest index first.
pub struct SquareIter(u64);

impl Iterator for SquareIter {
    type Item = Square;

    fn next(&mut self) -> Option<Square> {
        if self.0 == 0 {
            return None;
        }
        let square = Square::from_bit(self.0.trailing_zeros());
        self.0 &= self.0 - 1;
        Some(square)
    }
}

#[inline]
pub fn squares_of(bitboard: u64) -> SquareIter {
    SquareIter(bitboard)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        name.parse().expect("test square should parse")
    }

    #[test]
    fn leaper_counts() {
        assert_eq!(knight_attacks(sq("d4")).count_ones(), 8);
        assert_eq!(knight_attacks(sq("a1")).count_ones(), 2);
        assert_eq!(king_attacks(sq("a1")).count_ones(), 3);
        assert_eq!(king_attacks(sq("e4")).count_ones(), 8);
    }

    #[test]
    fn pawn_attacks_point_forward() {
        assert_eq!(pawn_attacks(Color::White, sq("e2")), sq("d3").bit() | sq("f3").bit());
        assert_eq!(pawn_attacks(Color::Black, sq("e7")), sq("d6").bit() | sq("f6").bit());
        assert_eq!(pawn_attacks(Color::White, sq("a2")), sq("b3").bit());
    }

    #[test]
    fn bishop_blocker_stops_ray() {
        let attacks = bishop_attacks(sq("c1"), sq("e3").bit());
        assert_ne!(attacks & sq("e3").bit(), 0);
        assert_eq!(attacks & sq("f4").bit(), 0);
        assert_eq!(bishop_attacks(sq("d4"), 0).count_ones(), 13);
    }

    #[test]
    fn rook_and_queen_rays() {
        assert_eq!(rook_attacks(sq("a1"), 0).count_ones(), 14);
        assert_eq!(queen_attacks(sq("d4"), 0).count_ones(), 27);
    }

    #[test]
    fn square_iter_visits_each_bit() {
        let squares: Vec<String> = squares_of(sq("a1").bit() | sq("h8").bit())
            .map(|s| s.to_string())
            .collect();
        assert_eq!(squares, vec!["a1", "h8"]);
    }
}
