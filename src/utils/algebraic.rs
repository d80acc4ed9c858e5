//! Square conversions for algebraic coordinates.
//!
//! Converts between human-readable coordinates (e.g., `e4`) and [`Square`]
//! values reused by FEN, coordinate-move, SAN and PGN components.

use crate::game_state::chess_types::Square;

/// Convert algebraic notation (for example: "e4") to a square.
#[inline]
pub fn algebraic_to_square(square: &str) -> Result<Square, String> {
    let bytes = square.as_bytes();
    if bytes.len() != 2 {
        return Err(format!("Invalid algebraic square: {square}"));
    }

    let file = bytes[0];
    let rank = bytes[1];

    if !(b'a'..=b'h').contains(&file) {
        return Err(format!("Invalid algebraic file: {}", file as char));
    }
    if !(b'1'..=b'8').contains(&rank) {
        return Err(format!("Invalid algebraic rank: {}", rank as char));
    }

    Square::new(file - b'a', rank - b'1')
        .ok_or_else(|| format!("Invalid algebraic square: {square}"))
}

/// Convert a square to algebraic notation (for example: "e4").
#[inline]
pub fn square_to_algebraic(square: Square) -> String {
    let mut out = String::with_capacity(2);
    out.push(file_char(square));
    out.push(char::from(b'1' + square.rank()));
    out
}

#[inline]
pub fn file_char(square: Square) -> char {
    char::from(b'a' + square.file())
}

#[inline]
pub fn rank_char(square: Square) -> char {
    char::from(b'1' + square.rank())
}
