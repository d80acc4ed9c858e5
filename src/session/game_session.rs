//! One game: current board, append-only history and status.
//!
//! Every mutation goes through [`GameSession::apply_move`] or
//! [`GameSession::resign`]. Both validate completely before touching any
//! state, so a rejected call leaves the session as it was. Once a terminal
//! status is reached the session no longer changes.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::config::{OpponentConfig, SessionConfig};
use crate::errors::{SessionError, SessionResult};
use crate::game_state::board::Board;
use crate::game_state::chess_types::{Color, PieceKind, Square};
use crate::move_generation::legal_move_apply::apply_move;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator;
use crate::moves::chess_move::ChessMove;
use crate::opponent::game_recorder::{hand_off, GameRecorder};
use crate::session::game_status::{evaluate_status, GameStatus, RepetitionTable};
use crate::session::move_record::MoveRecord;
use crate::session::summary::{GameResult, GameSummary};
use crate::utils::long_algebraic::{match_legal_move, move_to_coordinate, parse_coordinate_move};
use crate::utils::pgn::write_pgn;
use crate::utils::san::move_to_san;

pub struct GameSession {
    initial_board: Board,
    board: Board,
    history: Vec<MoveRecord>,
    status: GameStatus,
    winner: Option<Color>,
    repetitions: RepetitionTable,
    opponent: OpponentConfig,
    started_at: Instant,
    finished: Option<(Duration, DateTime<Utc>)>,
    recorder: Option<Arc<dyn GameRecorder>>,
}

impl GameSession {
    /// Session from a config: its starting FEN if any, else the standard
    /// initial position.
    pub fn new(config: &SessionConfig) -> SessionResult<Self> {
        match &config.starting_fen {
            Some(fen) => Self::from_fen(fen, config.opponent),
            None => Ok(Self::standard(config.opponent)),
        }
    }

    pub fn standard(opponent: OpponentConfig) -> Self {
        Self::from_board(Board::starting_position(), opponent)
    }

    /// Session from an external position. Beyond FEN syntax, the position
    /// must be playable: one king per side, no pawn on a back rank, and the
    /// side that just moved not left in check.
    pub fn from_fen(fen: &str, opponent: OpponentConfig) -> SessionResult<Self> {
        let board = Board::from_fen(fen)?;
        validate_playable(&board)?;
        Ok(Self::from_board(board, opponent))
    }

    fn from_board(board: Board, opponent: OpponentConfig) -> Self {
        let mut repetitions = RepetitionTable::default();
        repetitions.record(&board);
        let status = evaluate_status(&board, &repetitions);
        let winner = match status {
            GameStatus::Checkmate => Some(board.side_to_move.opposite()),
            _ => None,
        };
        let finished = status.is_terminal().then(|| (Duration::ZERO, Utc::now()));

        debug!(fen = %board.to_fen(), mode = opponent.game_mode(), %status, "session created");

        Self {
            initial_board: board.clone(),
            board,
            history: Vec::new(),
            status,
            winner,
            repetitions,
            opponent,
            started_at: Instant::now(),
            finished,
            recorder: None,
        }
    }

    /// Hand the finished-game summary to `recorder` when the game ends. The
    /// recorder runs detached; the move that ended the game does not wait.
    pub fn with_recorder(mut self, recorder: Arc<dyn GameRecorder>) -> Self {
        self.recorder = Some(recorder);
        self
    }

    pub fn apply_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> SessionResult<MoveRecord> {
        self.ensure_in_progress()?;

        let mv = match_legal_move(&self.board, from, to, promotion).ok_or(
            SessionError::IllegalMove {
                from,
                to,
                promotion,
            },
        )?;

        Ok(self.commit(mv))
    }

    /// Apply a move written as `e2e4` / `e7e8q`.
    pub fn apply_coordinate_move(&mut self, text: &str) -> SessionResult<MoveRecord> {
        let coordinate = parse_coordinate_move(text)
            .map_err(|_| SessionError::UnreadableMove(text.trim().to_owned()))?;
        self.apply_move(coordinate.from, coordinate.to, coordinate.promotion)
    }

    fn commit(&mut self, mv: ChessMove) -> MoveRecord {
        let mover = self.board.side_to_move;
        let record = MoveRecord {
            ply: self.history.len() + 1,
            mover,
            chess_move: mv,
            san: move_to_san(&self.board, &mv),
            coordinate: move_to_coordinate(&mv),
            board_before: self.board.clone(),
        };

        self.board = apply_move(&self.board, &mv);
        self.repetitions.record(&self.board);
        self.history.push(record.clone());
        self.status = evaluate_status(&self.board, &self.repetitions);

        debug!(
            ply = record.ply,
            mover = %mover,
            san = %record.san,
            status = %self.status,
            "move applied"
        );

        if self.status.is_terminal() {
            let winner = (self.status == GameStatus::Checkmate).then_some(mover);
            self.finish(winner);
        }
        record
    }

    /// `side` gives up; the other side wins.
    pub fn resign(&mut self, side: Color) -> SessionResult<()> {
        self.ensure_in_progress()?;
        self.status = GameStatus::Resigned;
        self.finish(Some(side.opposite()));
        Ok(())
    }

    fn ensure_in_progress(&self) -> SessionResult<()> {
        if self.status.is_terminal() {
            return Err(SessionError::GameAlreadyOver(self.status));
        }
        Ok(())
    }

    fn finish(&mut self, winner: Option<Color>) {
        self.winner = winner;
        self.finished = Some((self.started_at.elapsed(), Utc::now()));

        info!(
            status = %self.status,
            winner = winner.map(Color::name).unwrap_or("none"),
            plies = self.history.len(),
            "game over"
        );

        if let Some(recorder) = &self.recorder {
            if let Ok(summary) = self.summary() {
                info!(result = ?summary.result, "handing summary to recorder");
                hand_off(Arc::clone(recorder), summary);
            }
        }
    }

    pub fn summary(&self) -> SessionResult<GameSummary> {
        let Some((elapsed, finished_at)) = self.finished else {
            return Err(SessionError::SummaryUnavailable);
        };

        Ok(GameSummary {
            result: GameResult::for_player(self.human_color(), self.winner),
            total_plies: self.history.len(),
            elapsed,
            moves: self.history.iter().map(|r| r.coordinate.clone()).collect(),
            san_moves: self.history.iter().map(|r| r.san.clone()).collect(),
            pgn: self.pgn(),
            initial_fen: self.initial_board.to_fen(),
            final_fen: self.board.to_fen(),
            termination: self.status,
            winner: self.winner,
            game_mode: self.opponent.game_mode().to_owned(),
            opponent_kind: self.opponent.opponent_kind(),
            finished_at,
        })
    }

    pub fn pgn(&self) -> String {
        let token = GameResult::pgn_token(self.winner, self.status.is_terminal());
        write_pgn(&self.initial_board, &self.history, token)
    }

    #[inline]
    pub fn current_status(&self) -> GameStatus {
        self.status
    }

    #[inline]
    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    #[inline]
    pub fn current_board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn initial_board(&self) -> &Board {
        &self.initial_board
    }

    pub fn current_fen(&self) -> String {
        self.board.to_fen()
    }

    pub fn side_to_move(&self) -> Color {
        self.board.side_to_move
    }

    pub fn legal_moves(&self) -> Vec<ChessMove> {
        if self.status.is_terminal() {
            return Vec::new();
        }
        legal_move_generator::legal_moves(&self.board)
    }

    pub fn legal_moves_from(&self, square: Square) -> Vec<ChessMove> {
        if self.status.is_terminal() {
            return Vec::new();
        }
        legal_move_generator::legal_moves_from(&self.board, square)
    }

    pub fn winner(&self) -> Option<Color> {
        self.winner
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn opponent(&self) -> OpponentConfig {
        self.opponent
    }

    /// The side whose result a summary reports: opposite the oracle, or
    /// White in pass-and-play.
    pub fn human_color(&self) -> Color {
        self.opponent
            .oracle_color()
            .map(Color::opposite)
            .unwrap_or(Color::White)
    }

    pub fn is_oracle_turn(&self) -> bool {
        !self.is_terminal() && self.opponent.oracle_color() == Some(self.board.side_to_move)
    }

    pub fn oracle_strength(&self) -> Option<u8> {
        self.opponent.strength()
    }
}

impl fmt::Debug for GameSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameSession")
            .field("fen", &self.board.to_fen())
            .field("status", &self.status)
            .field("plies", &self.history.len())
            .field("opponent", &self.opponent)
            .finish_non_exhaustive()
    }
}

fn validate_playable(board: &Board) -> SessionResult<()> {
    for color in [Color::White, Color::Black] {
        let kings = board.count(color, PieceKind::King);
        if kings != 1 {
            return Err(SessionError::InvalidPositionFormat(format!(
                "{color} has {kings} kings"
            )));
        }
    }

    let back_ranks = 0xFF00_0000_0000_00FFu64;
    let pawns = board.bitboard(Color::White, PieceKind::Pawn) | board.bitboard(Color::Black, PieceKind::Pawn);
    if pawns & back_ranks != 0 {
        return Err(SessionError::InvalidPositionFormat(
            "pawn on the first or last rank".to_owned(),
        ));
    }

    let waiting = board.side_to_move.opposite();
    if is_king_in_check(board, waiting) {
        return Err(SessionError::InvalidPositionFormat(format!(
            "{waiting} is in check but it is not {waiting}'s move"
        )));
    }
    Ok(())
}
