//! Finished-game summary handed to a [`GameRecorder`](crate::opponent::game_recorder::GameRecorder).

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::game_state::chess_types::Color;
use crate::session::game_status::GameStatus;

/// Outcome from the human player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameResult {
    Win,
    Loss,
    Draw,
}

impl GameResult {
    /// Result for `perspective` given the winner (`None` for a draw).
    pub fn for_player(perspective: Color, winner: Option<Color>) -> Self {
        match winner {
            None => GameResult::Draw,
            Some(color) if color == perspective => GameResult::Win,
            Some(_) => GameResult::Loss,
        }
    }

    /// PGN result token for a game won by `winner`.
    pub fn pgn_token(winner: Option<Color>, terminal: bool) -> &'static str {
        match (winner, terminal) {
            (_, false) => "*",
            (Some(Color::White), true) => "1-0",
            (Some(Color::Black), true) => "0-1",
            (None, true) => "1/2-1/2",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OpponentKind {
    Human,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSummary {
    pub result: GameResult,
    pub total_plies: usize,
    #[serde(rename = "duration_seconds", serialize_with = "serialize_seconds")]
    pub elapsed: Duration,
    pub moves: Vec<String>,
    pub san_moves: Vec<String>,
    pub pgn: String,
    pub initial_fen: String,
    pub final_fen: String,
    pub termination: GameStatus,
    pub winner: Option<Color>,
    pub game_mode: String,
    pub opponent_kind: OpponentKind,
    pub finished_at: DateTime<Utc>,
}

fn serialize_seconds<S>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_u64(elapsed.as_secs())
}

#[cfg(test)]
mod tests {
    use super::{GameResult, GameSummary, OpponentKind};
    use crate::game_state::chess_types::Color;
    use crate::session::game_status::GameStatus;
    use std::time::Duration;

    #[test]
    fn result_from_each_perspective() {
        assert_eq!(GameResult::for_player(Color::White, Some(Color::White)), GameResult::Win);
        assert_eq!(GameResult::for_player(Color::Black, Some(Color::White)), GameResult::Loss);
        assert_eq!(GameResult::for_player(Color::Black, None), GameResult::Draw);
        assert_eq!(GameResult::pgn_token(Some(Color::Black), true), "0-1");
        assert_eq!(GameResult::pgn_token(None, true), "1/2-1/2");
        assert_eq!(GameResult::pgn_token(Some(Color::White), false), "*");
    }

    #[test]
    fn summary_serializes_like_the_save_game_payload() {
        let summary = GameSummary {
            result: GameResult::Loss,
            total_plies: 4,
            elapsed: Duration::from_millis(12_900),
            moves: vec!["f2f3".into(), "e7e5".into(), "g2g4".into(), "d8h4".into()],
            san_moves: vec!["f3".into(), "e5".into(), "g4".into(), "Qh4#".into()],
            pgn: "1. f3 e5 2. g4 Qh4# 0-1".into(),
            initial_fen: "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1".into(),
            final_fen: "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3".into(),
            termination: GameStatus::Checkmate,
            winner: Some(Color::Black),
            game_mode: "EASY".into(),
            opponent_kind: OpponentKind::Bot,
            finished_at: chrono::Utc::now(),
        };

        let json = serde_json::to_value(&summary).expect("summary should serialize");
        assert_eq!(json["result"], "LOSS");
        assert_eq!(json["duration_seconds"], 12);
        assert_eq!(json["opponent_kind"], "BOT");
        assert_eq!(json["termination"], "checkmate");
        assert_eq!(json["winner"], "black");
        assert_eq!(json["total_plies"], 4);
    }
}
