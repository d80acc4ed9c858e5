//! Errors returned by the session engine.
//!
//! `SessionError` is the single error type surfaced by board loading, move
//! application and the opponent coordinator. Every variant is recoverable:
//! a failed call leaves the session exactly as it was.
//!
//! - `InvalidPositionFormat` is fatal to that load only.
//! - `IllegalMove`, `AwaitingOracle` and `NotHumanTurn` are soft rejections;
//!   the caller may retry with another move.
//! - `OracleUnavailable` is only ever reported as a warning next to a
//!   fallback move, never as the `Err` of a turn.

use thiserror::Error;

use crate::game_state::chess_types::{PieceKind, Square};
use crate::opponent::move_oracle::OracleError;
use crate::session::game_status::GameStatus;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Malformed or unplayable serialized position.
    #[error("invalid position: {0}")]
    InvalidPositionFormat(String),

    /// The requested move is not legal in the current position.
    #[error("illegal move: {from}{to}{}", promotion_suffix(.promotion))]
    IllegalMove {
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    },

    /// Coordinate text that does not name two squares.
    #[error("unreadable move '{0}'")]
    UnreadableMove(String),

    /// The game already reached a terminal status.
    #[error("game is already over ({0})")]
    GameAlreadyOver(GameStatus),

    /// The oracle failed or answered nonsense; a fallback move was played.
    #[error("move oracle unavailable: {0}")]
    OracleUnavailable(#[from] OracleError),

    /// A human move arrived while the oracle is still thinking.
    #[error("waiting for the opponent's move")]
    AwaitingOracle,

    /// A human move arrived while the oracle side is to move.
    #[error("it is not the human player's turn")]
    NotHumanTurn,

    /// `summary()` was called before the game finished.
    #[error("the game has not finished yet")]
    SummaryUnavailable,
}

fn promotion_suffix(promotion: &Option<PieceKind>) -> String {
    promotion.map(|p| p.letter().to_string()).unwrap_or_default()
}

/// Result type alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
