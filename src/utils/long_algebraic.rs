//! Coordinate move notation (`e2e4`, `e7e8q`).
//!
//! This is the form oracles answer in and the form the terminal binary
//! reads. Parsing only checks the text; [`match_legal_move`] ties a parsed
//! move to the legal move it names on a given board.

use std::fmt;
use std::str::FromStr;

use crate::game_state::board::Board;
use crate::game_state::chess_types::{PieceKind, Square};
use crate::move_generation::legal_move_generator::legal_moves_from;
use crate::moves::chess_move::ChessMove;
use crate::utils::algebraic::{algebraic_to_square, square_to_algebraic};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoordinateMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
}

pub fn parse_coordinate_move(text: &str) -> Result<CoordinateMove, String> {
    let text = text.trim();
    if !text.is_ascii() || (text.len() != 4 && text.len() != 5) {
        return Err(format!("Invalid coordinate move: {text}"));
    }

    let from = algebraic_to_square(&text[0..2])?;
    let to = algebraic_to_square(&text[2..4])?;
    let promotion = match text[4..].chars().next() {
        Some(ch) => Some(char_to_promotion(ch)?),
        None => None,
    };

    Ok(CoordinateMove {
        from,
        to,
        promotion,
    })
}

pub fn move_to_coordinate(mv: &ChessMove) -> String {
    let mut out = String::with_capacity(5);
    out.push_str(&square_to_algebraic(mv.from));
    out.push_str(&square_to_algebraic(mv.to));
    if let Some(promotion) = mv.promotion {
        out.push(promotion.letter());
    }
    out
}

/// The legal move on `board` going `from` -> `to`.
///
/// Promotions default to a queen when `promotion` is `None`. A promotion
/// letter on a move that does not promote is ignored.
pub fn match_legal_move(
    board: &Board,
    from: Square,
    to: Square,
    promotion: Option<PieceKind>,
) -> Option<ChessMove> {
    let candidates: Vec<ChessMove> = legal_moves_from(board, from)
        .into_iter()
        .filter(|mv| mv.to == to)
        .collect();

    if candidates.iter().all(|mv| mv.promotion.is_none()) {
        return candidates.into_iter().next();
    }

    let wanted = promotion.unwrap_or(PieceKind::Queen);
    candidates.into_iter().find(|mv| mv.promotion == Some(wanted))
}

fn char_to_promotion(ch: char) -> Result<PieceKind, String> {
    PieceKind::from_letter(ch)
        .filter(|kind| kind.is_promotion_target())
        .ok_or_else(|| format!("Invalid promotion piece character: {ch}"))
}

impl fmt::Display for CoordinateMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            write!(f, "{}", promotion.letter())?;
        }
        Ok(())
    }
}

impl FromStr for CoordinateMove {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_coordinate_move(s)
    }
}

impl From<&ChessMove> for CoordinateMove {
    fn from(mv: &ChessMove) -> Self {
        Self {
            from: mv.from,
            to: mv.to,
            promotion: mv.promotion,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{match_legal_move, move_to_coordinate, parse_coordinate_move, CoordinateMove};
    use crate::game_state::board::Board;
    use crate::game_state::chess_types::{CastleSide, PieceKind, Square};

    fn sq(name: &str) -> Square {
        name.parse().expect("test square should parse")
    }

    #[test]
    fn parses_plain_and_promotion_moves() {
        let plain = parse_coordinate_move("e2e4").expect("plain move should parse");
        assert_eq!(plain.from, sq("e2"));
        assert_eq!(plain.to, sq("e4"));
        assert_eq!(plain.promotion, None);

        let promo = parse_coordinate_move(" a7a8N ").expect("promotion should parse");
        assert_eq!(promo.promotion, Some(PieceKind::Knight));
        assert_eq!(promo.to_string(), "a7a8n");
    }

    #[test]
    fn rejects_malformed_text() {
        for bad in ["", "e2", "e2e", "e2e4e5", "i2e4", "e9e4", "e7e8k", "e7e8x", "é2e4"] {
            assert!(parse_coordinate_move(bad).is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn matching_detects_castling_and_en_passant() {
        let castle_board =
            Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("FEN should parse");
        let castle = match_legal_move(&castle_board, sq("e1"), sq("g1"), None)
            .expect("castle should be legal");
        assert_eq!(castle.flags.castle, Some(CastleSide::KingSide));
        assert_eq!(move_to_coordinate(&castle), "e1g1");

        let ep_board = Board::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").expect("FEN should parse");
        let ep = match_legal_move(&ep_board, sq("e5"), sq("d6"), None).expect("en passant should be legal");
        assert!(ep.flags.is_en_passant);
    }

    #[test]
    fn promotion_defaults_to_queen_and_letter_is_ignored_otherwise() {
        let board = Board::from_fen("8/P6k/8/8/8/8/8/K7 w - - 0 1").expect("FEN should parse");
        let default = match_legal_move(&board, sq("a7"), sq("a8"), None).expect("promotion should be legal");
        assert_eq!(default.promotion, Some(PieceKind::Queen));
        assert_eq!(move_to_coordinate(&default), "a7a8q");

        let rook = match_legal_move(&board, sq("a7"), sq("a8"), Some(PieceKind::Rook))
            .expect("under-promotion should be legal");
        assert_eq!(CoordinateMove::from(&rook).to_string(), "a7a8r");

        let king_step = match_legal_move(&board, sq("a1"), sq("a2"), Some(PieceKind::Queen))
            .expect("king step should be legal");
        assert_eq!(king_step.promotion, None);
    }

    #[test]
    fn unknown_moves_do_not_match() {
        let start = Board::starting_position();
        assert!(match_legal_move(&start, sq("e2"), sq("e5"), None).is_none());
        assert!(match_legal_move(&start, sq("e7"), sq("e5"), None).is_none());
    }
}
