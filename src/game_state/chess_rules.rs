//! Canonical chess-rule constants.
//!
//! Static rule literals: the standard starting position and the thresholds
//! used when classifying draws.

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Half-moves without a capture or pawn move that end the game (fifty full moves).
pub const FIFTY_MOVE_HALFMOVE_LIMIT: u16 = 100;

/// Occurrences of the same position that end the game.
pub const REPETITION_LIMIT: usize = 3;
