//! The contract for anything that suggests moves: a UCI engine process, a
//! remote service, or the in-process random picker.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    #[error("no answer within {0:?}")]
    Timeout(Duration),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("malformed move '{0}'")]
    MalformedMove(String),

    #[error("suggested move '{0}' is not legal")]
    IllegalMove(String),

    #[error("no move available")]
    NoMove,
}

/// Suggests a move for a position.
///
/// `position` is a FEN string and `strength` a search-depth-like knob. The
/// answer is coordinate text (`e2e4`, `e7e8q`). Callers must validate it:
/// implementations may be slow, may fail, and may answer with nonsense.
#[async_trait]
pub trait MoveOracle: Send + Sync {
    async fn best_move(&self, position: &str, strength: u8) -> Result<String, OracleError>;

    /// Name used in logs.
    fn name(&self) -> &str {
        "oracle"
    }
}
