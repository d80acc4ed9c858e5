//! Session and opponent configuration.
//!
//! Everything here deserializes from JSON with sensible defaults, so a
//! config file only needs the fields it wants to change:
//!
//! ```json
//! { "opponent": { "kind": "oracle", "color": "black", "difficulty": "HARD" },
//!   "coordinator": { "oracle_timeout_ms": 5000 } }
//! ```

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::game_state::chess_types::Color;
use crate::session::summary::OpponentKind;

/// Oracle search depth requested for a hint.
pub const DEFAULT_HINT_DEPTH: u8 = 8;

/// How long an oracle gets before the coordinator falls back to a random move.
pub const DEFAULT_ORACLE_TIMEOUT_MS: u64 = 10_000;

/// Bot strength, sent to the oracle as a search depth.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
    Easy,
    #[default]
    Classic,
    Hard,
    Unbeatable,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Classic,
        Difficulty::Hard,
        Difficulty::Unbeatable,
    ];

    pub const fn depth(self) -> u8 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Classic => 5,
            Difficulty::Hard => 12,
            Difficulty::Unbeatable => 20,
        }
    }

    /// Name used for the `game_mode` field of finished-game summaries.
    pub const fn mode_name(self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Classic => "CLASSIC",
            Difficulty::Hard => "HARD",
            Difficulty::Unbeatable => "UNBEATABLE",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mode_name())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.mode_name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown difficulty '{s}'"))
    }
}

/// Who plays against the human.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OpponentConfig {
    /// Pass-and-play: both sides are entered locally.
    #[default]
    Human,
    /// `color` is played by a move oracle at the given difficulty.
    Oracle { color: Color, difficulty: Difficulty },
}

impl OpponentConfig {
    pub fn oracle_color(self) -> Option<Color> {
        match self {
            OpponentConfig::Human => None,
            OpponentConfig::Oracle { color, .. } => Some(color),
        }
    }

    /// Search depth handed to the oracle, `None` in pass-and-play.
    pub fn strength(self) -> Option<u8> {
        match self {
            OpponentConfig::Human => None,
            OpponentConfig::Oracle { difficulty, .. } => Some(difficulty.depth()),
        }
    }

    pub fn game_mode(self) -> &'static str {
        match self {
            OpponentConfig::Human => "MANUAL",
            OpponentConfig::Oracle { difficulty, .. } => difficulty.mode_name(),
        }
    }

    pub fn opponent_kind(self) -> OpponentKind {
        match self {
            OpponentConfig::Human => OpponentKind::Human,
            OpponentConfig::Oracle { .. } => OpponentKind::Bot,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    pub oracle_timeout_ms: u64,
    pub hint_depth: u8,
    /// Seed for the random fallback move; fresh entropy when absent.
    pub fallback_seed: Option<u64>,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            oracle_timeout_ms: DEFAULT_ORACLE_TIMEOUT_MS,
            hint_depth: DEFAULT_HINT_DEPTH,
            fallback_seed: None,
        }
    }
}

impl CoordinatorConfig {
    pub fn oracle_timeout(&self) -> Duration {
        Duration::from_millis(self.oracle_timeout_ms)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub opponent: OpponentConfig,
    pub coordinator: CoordinatorConfig,
    /// Custom start (a puzzle, say); the standard position when absent.
    pub starting_fen: Option<String>,
}

impl SessionConfig {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
