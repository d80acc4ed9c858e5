//! Move value produced by the generator.
//!
//! A `ChessMove` only has meaning relative to the board it was generated
//! from: it records the moving piece and the captured piece (if any) so that
//! applying it and describing it never need to look the board up again.

use serde::{Deserialize, Serialize};

use crate::game_state::chess_types::{CastleSide, PieceKind, Square};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveFlags {
    pub is_capture: bool,
    pub castle: Option<CastleSide>,
    pub is_en_passant: bool,
    pub is_double_step: bool,
}

impl MoveFlags {
    pub const QUIET: MoveFlags = MoveFlags {
        is_capture: false,
        castle: None,
        is_en_passant: false,
        is_double_step: false,
    };

    pub const CAPTURE: MoveFlags = MoveFlags {
        is_capture: true,
        ..MoveFlags::QUIET
    };

    pub const DOUBLE_STEP: MoveFlags = MoveFlags {
        is_double_step: true,
        ..MoveFlags::QUIET
    };

    pub const EN_PASSANT: MoveFlags = MoveFlags {
        is_capture: true,
        is_en_passant: true,
        ..MoveFlags::QUIET
    };

    pub const fn castle(side: CastleSide) -> MoveFlags {
        MoveFlags {
            castle: Some(side),
            ..MoveFlags::QUIET
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChessMove {
    pub from: Square,
    pub to: Square,
    pub moved_piece: PieceKind,
    pub captured_piece: Option<PieceKind>,
    pub promotion: Option<PieceKind>,
    pub flags: MoveFlags,
}

impl ChessMove {
    #[inline]
    pub fn new(
        from: Square,
        to: Square,
        moved_piece: PieceKind,
        captured_piece: Option<PieceKind>,
        promotion: Option<PieceKind>,
        flags: MoveFlags,
    ) -> Self {
        Self {
            from,
            to,
            moved_piece,
            captured_piece,
            promotion,
            flags,
        }
    }

    #[inline]
    pub fn is_capture(&self) -> bool {
        self.flags.is_capture
    }

    #[inline]
    pub fn is_castle(&self) -> bool {
        self.flags.castle.is_some()
    }

    /// Pawn moves and captures reset the fifty-move clock.
    #[inline]
    pub fn resets_halfmove_clock(&self) -> bool {
        self.moved_piece == PieceKind::Pawn || self.flags.is_capture
    }

    /// Square of the pawn removed by an en-passant capture: behind `to`
    /// from the mover's point of view, on the origin rank.
    pub fn en_passant_victim(&self) -> Option<Square> {
        if !self.flags.is_en_passant {
            return None;
        }
        Square::new(self.to.file(), self.from.rank())
    }
}
