//! Board value: piece placement plus the state needed to resume play.
//!
//! `Board` stores one bitboard per (color, piece kind), occupancy caches,
//! side to move, castling rights, the en-passant target and both move
//! counters. It is a plain value; construction never checks chess legality.

use crate::errors::SessionResult;
use crate::game_state::chess_rules::STARTING_POSITION_FEN;
use crate::game_state::chess_types::*;
use crate::utils::fen_generator::generate_fen;
use crate::utils::fen_parser::parse_fen;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    // [color][piece_kind]
    pub pieces: [[u64; 6]; 2],

    // Occupancy caches, rebuilt by `recalc_occupancy`.
    pub occupancy_by_color: [u64; 2],
    pub occupancy_all: u64,

    pub side_to_move: Color,
    pub castling_rights: CastlingRights,
    pub en_passant_square: Option<Square>,

    pub halfmove_clock: u16,
    pub fullmove_number: u16,
}

/// Everything that makes two positions "the same" for repetition counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PositionKey {
    pieces: [[u64; 6]; 2],
    side_to_move: Color,
    castling_rights: CastlingRights,
    en_passant_square: Option<Square>,
}

impl Default for Board {
    fn default() -> Self {
        Self {
            pieces: [[0; 6]; 2],
            occupancy_by_color: [0; 2],
            occupancy_all: 0,
            side_to_move: Color::White,
            castling_rights: CastlingRights::NONE,
            en_passant_square: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }
}

impl Board {
    #[inline]
    pub fn new_empty() -> Self {
        Self::default()
    }

    pub fn starting_position() -> Self {
        let mut board = Self::new_empty();
        let back_rank = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for (file, kind) in (0u8..).zip(back_rank) {
            for (color, piece_rank, pawn_rank) in [(Color::White, 0, 1), (Color::Black, 7, 6)] {
                if let (Some(piece_sq), Some(pawn_sq)) =
                    (Square::new(file, piece_rank), Square::new(file, pawn_rank))
                {
                    board.put_piece(piece_sq, Piece::new(kind, color));
                    board.put_piece(pawn_sq, Piece::new(PieceKind::Pawn, color));
                }
            }
        }
        board.castling_rights = CastlingRights::ALL;
        board
    }

    #[inline]
    pub fn from_fen(fen: &str) -> SessionResult<Self> {
        parse_fen(fen)
    }

    #[inline]
    pub fn to_fen(&self) -> String {
        generate_fen(self)
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        let mask = square.bit();
        if self.occupancy_all & mask == 0 {
            return None;
        }
        for color in [Color::White, Color::Black] {
            for kind in PieceKind::ALL {
                if self.pieces[color.index()][kind.index()] & mask != 0 {
                    return Some(Piece::new(kind, color));
                }
            }
        }
        None
    }

    #[inline]
    pub fn bitboard(&self, color: Color, kind: PieceKind) -> u64 {
        self.pieces[color.index()][kind.index()]
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        let kings = self.bitboard(color, PieceKind::King);
        (kings != 0).then(|| Square::from_bit(kings.trailing_zeros()))
    }

    pub fn count(&self, color: Color, kind: PieceKind) -> u32 {
        self.bitboard(color, kind).count_ones()
    }

    /// Place `piece` on an empty square.
    pub(crate) fn put_piece(&mut self, square: Square, piece: Piece) {
        self.pieces[piece.color.index()][piece.kind.index()] |= square.bit();
        self.occupancy_by_color[piece.color.index()] |= square.bit();
        self.occupancy_all |= square.bit();
    }

    /// Clear whatever stands on `square`.
    pub(crate) fn clear_square(&mut self, square: Square) {
        let keep = !square.bit();
        for color_boards in self.pieces.iter_mut() {
            for bb in color_boards.iter_mut() {
                *bb &= keep;
            }
        }
        self.recalc_occupancy();
    }

    pub(crate) fn recalc_occupancy(&mut self) {
        for color in [Color::White, Color::Black] {
            self.occupancy_by_color[color.index()] = self.pieces[color.index()]
                .iter()
                .copied()
                .fold(0u64, |acc, bb| acc | bb);
        }
        self.occupancy_all = self.occupancy_by_color[0] | self.occupancy_by_color[1];
    }

    pub fn position_key(&self) -> PositionKey {
        PositionKey {
            pieces: self.pieces,
            side_to_move: self.side_to_move,
            castling_rights: self.castling_rights,
            en_passant_square: self.en_passant_square,
        }
    }
}

impl std::str::FromStr for Board {
    type Err = crate::errors::SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Board::from_fen(s)
    }
}

/// Parses [`STARTING_POSITION_FEN`]; kept next to the hand-built layout so the
/// two can be compared in tests.
pub fn starting_board_from_fen() -> SessionResult<Board> {
    parse_fen(STARTING_POSITION_FEN)
}

#[cfg(test)]
mod tests {
    use super::{starting_board_from_fen, Board};
    use crate::game_state::chess_types::{Color, Piece, PieceKind, Square};

    #[test]
    fn hand_built_start_matches_fen_start() {
        let built = Board::starting_position();
        let parsed = starting_board_from_fen().expect("starting FEN should parse");
        assert_eq!(built, parsed);
    }

    #[test]
    fn piece_lookup_and_kings() {
        let board = Board::starting_position();
        let e1 = Square::new(4, 0).expect("e1");
        let d8 = Square::new(3, 7).expect("d8");
        assert_eq!(board.piece_at(e1), Some(Piece::new(PieceKind::King, Color::White)));
        assert_eq!(board.piece_at(d8), Some(Piece::new(PieceKind::Queen, Color::Black)));
        assert_eq!(board.piece_at(Square::new(4, 3).expect("e4")), None);
        assert_eq!(board.king_square(Color::Black), Square::new(4, 7));
        assert_eq!(board.count(Color::White, PieceKind::Pawn), 8);
    }

    #[test]
    fn clear_square_updates_occupancy() {
        let mut board = Board::starting_position();
        let e2 = Square::new(4, 1).expect("e2");
        board.clear_square(e2);
        assert_eq!(board.piece_at(e2), None);
        assert_eq!(board.occupancy_all.count_ones(), 31);
    }
}
