//! Turn orchestration between a human and a [`MoveOracle`].
//!
//! The coordinator owns the session behind a mutex and an in-flight flag.
//! The flag is the lock for oracle requests: at most one is outstanding,
//! and human moves are refused while it is set. Callers only ever get
//! read access to the session; every move goes through the coordinator.
//! The session mutex is never held across an `.await`; an oracle turn
//! snapshots the position, waits for the answer unlocked, then re-checks
//! that the game did not move on before applying anything.
//!
//! [`OpponentCoordinator::play_human_move`] and
//! [`OpponentCoordinator::start_oracle_if_due`] start the oracle's reply
//! on their own as soon as the turn passes to it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::CoordinatorConfig;
use crate::errors::{SessionError, SessionResult};
use crate::game_state::board::Board;
use crate::game_state::chess_types::{Color, PieceKind, Square};
use crate::moves::chess_move::ChessMove;
use crate::opponent::move_oracle::{MoveOracle, OracleError};
use crate::opponent::random_oracle::pick_random_move;
use crate::session::game_session::GameSession;
use crate::session::game_status::GameStatus;
use crate::session::move_record::MoveRecord;
use crate::utils::long_algebraic::{match_legal_move, parse_coordinate_move};
use crate::view::session_view::{project_session_view, SessionView};

/// A move the oracle side played.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleTurn {
    pub record: MoveRecord,
    /// Set when the oracle failed and a random legal move was played instead.
    pub warning: Option<SessionError>,
    pub status: GameStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OracleTurnOutcome {
    Played(OracleTurn),
    /// The game ended or changed while the oracle was thinking; its answer
    /// was dropped.
    Discarded,
    /// It is not the oracle's move.
    NotOracleTurn,
}

/// An accepted human move, plus the oracle's reply when the move handed
/// the turn to the oracle.
#[derive(Debug)]
pub struct HumanTurn {
    pub record: MoveRecord,
    pub oracle_reply: Option<OracleReply>,
}

pub type OracleReply = JoinHandle<SessionResult<OracleTurnOutcome>>;

pub struct OpponentCoordinator {
    session: Arc<Mutex<GameSession>>,
    oracle: Arc<dyn MoveOracle>,
    config: CoordinatorConfig,
    in_flight: Arc<AtomicBool>,
    rng: Mutex<Box<dyn RngCore + Send>>,
}

/// Holds the in-flight flag for the lifetime of one oracle request. Owned,
/// so a spawned turn releases the flag even if its task is dropped unpolled.
struct InFlightGuard(Arc<AtomicBool>);

impl InFlightGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(Arc::clone(flag)))
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Position captured before an oracle request.
struct Snapshot {
    fen: String,
    board: Board,
    plies: usize,
}

impl OpponentCoordinator {
    pub fn new(session: GameSession, oracle: Arc<dyn MoveOracle>, config: CoordinatorConfig) -> Self {
        let rng: Box<dyn RngCore + Send> = match config.fallback_seed {
            Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
            None => Box::new(StdRng::from_os_rng()),
        };
        Self {
            session: Arc::new(Mutex::new(session)),
            oracle,
            config,
            in_flight: Arc::new(AtomicBool::new(false)),
            rng: Mutex::new(rng),
        }
    }

    /// Replace the random source used for fallback moves.
    pub fn with_rng(self, rng: impl RngCore + Send + 'static) -> Self {
        *self.rng.lock() = Box::new(rng);
        self
    }

    /// Read access to the session. The lock is held while `read` runs.
    pub fn with_session<R>(&self, read: impl FnOnce(&GameSession) -> R) -> R {
        let session = self.session.lock();
        read(&*session)
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    pub fn is_awaiting_oracle(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn submit_human_move(
        &self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> SessionResult<MoveRecord> {
        if self.is_awaiting_oracle() {
            return Err(SessionError::AwaitingOracle);
        }

        let mut session = self.session.lock();
        if session.is_terminal() {
            return Err(SessionError::GameAlreadyOver(session.current_status()));
        }
        if session.is_oracle_turn() {
            return Err(SessionError::NotHumanTurn);
        }
        session.apply_move(from, to, promotion)
    }

    pub fn submit_coordinate_move(&self, text: &str) -> SessionResult<MoveRecord> {
        let coordinate = parse_coordinate_move(text)
            .map_err(|_| SessionError::UnreadableMove(text.trim().to_owned()))?;
        self.submit_human_move(coordinate.from, coordinate.to, coordinate.promotion)
    }

    /// Apply a human move, then start the oracle's reply if it is now the
    /// oracle's turn. Must be called inside a tokio runtime.
    pub fn play_human_move(
        self: &Arc<Self>,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> SessionResult<HumanTurn> {
        let record = self.submit_human_move(from, to, promotion)?;
        Ok(HumanTurn {
            record,
            oracle_reply: self.start_oracle_if_due(),
        })
    }

    pub fn play_human_coordinate_move(self: &Arc<Self>, text: &str) -> SessionResult<HumanTurn> {
        let coordinate = parse_coordinate_move(text)
            .map_err(|_| SessionError::UnreadableMove(text.trim().to_owned()))?;
        self.play_human_move(coordinate.from, coordinate.to, coordinate.promotion)
    }

    /// Spawn the oracle's turn when the game is live, the oracle is to move
    /// and no request is out. Call once after construction for sessions
    /// where the oracle moves first.
    pub fn start_oracle_if_due(self: &Arc<Self>) -> Option<OracleReply> {
        let due = self.with_session(|session| !session.is_terminal() && session.is_oracle_turn());
        if !due {
            return None;
        }
        let guard = InFlightGuard::acquire(&self.in_flight)?;
        Some(self.spawn_with_guard(guard))
    }

    pub fn resign(&self, side: Color) -> SessionResult<()> {
        self.session.lock().resign(side)
    }

    /// Ask the oracle for the side to move and play its answer.
    ///
    /// Oracle failures never surface as `Err`: a random legal move is played
    /// and the failure comes back in [`OracleTurn::warning`].
    pub async fn play_oracle_turn(&self) -> SessionResult<OracleTurnOutcome> {
        let guard = InFlightGuard::acquire(&self.in_flight).ok_or(SessionError::AwaitingOracle)?;
        self.oracle_turn(guard).await
    }

    async fn oracle_turn(&self, _guard: InFlightGuard) -> SessionResult<OracleTurnOutcome> {
        let (snapshot, strength) = {
            let session = self.session.lock();
            if session.is_terminal() {
                return Err(SessionError::GameAlreadyOver(session.current_status()));
            }
            match (session.is_oracle_turn(), session.oracle_strength()) {
                (true, Some(strength)) => (snapshot_of(&session), strength),
                _ => return Ok(OracleTurnOutcome::NotOracleTurn),
            }
        };

        let answer = self.ask_oracle(&snapshot.fen, strength).await;

        let mut session = self.session.lock();
        if session.is_terminal() || session.history().len() != snapshot.plies {
            info!(status = %session.current_status(), "game moved on while the oracle was thinking; answer discarded");
            return Ok(OracleTurnOutcome::Discarded);
        }

        let (chosen, warning) = match answer.and_then(|text| validate_answer(&snapshot.board, &text)) {
            Ok(mv) => (mv, None),
            Err(err) => {
                warn!(oracle = self.oracle.name(), error = %err, "oracle unavailable; playing a random legal move");
                let fallback = {
                    let mut rng = self.rng.lock();
                    pick_random_move(&snapshot.board, &mut **rng)
                };
                match fallback {
                    Some(mv) => (mv, Some(SessionError::OracleUnavailable(err))),
                    // A non-terminal position always has a legal move.
                    None => return Err(SessionError::OracleUnavailable(err)),
                }
            }
        };

        let record = session.apply_move(chosen.from, chosen.to, chosen.promotion)?;
        Ok(OracleTurnOutcome::Played(OracleTurn {
            record,
            warning,
            status: session.current_status(),
        }))
    }

    /// Run [`Self::play_oracle_turn`] on the tokio runtime. The in-flight
    /// flag is taken before this returns; if it is already taken the task
    /// resolves to [`SessionError::AwaitingOracle`].
    pub fn spawn_oracle_turn(self: &Arc<Self>) -> OracleReply {
        match InFlightGuard::acquire(&self.in_flight) {
            Some(guard) => self.spawn_with_guard(guard),
            None => tokio::spawn(async { Err(SessionError::AwaitingOracle) }),
        }
    }

    fn spawn_with_guard(self: &Arc<Self>, guard: InFlightGuard) -> OracleReply {
        let this = Arc::clone(self);
        tokio::spawn(async move { this.oracle_turn(guard).await })
    }

    /// A suggested move for the side to move, at the configured hint depth.
    /// Never applied. `Ok(None)` when the oracle fails or the game moves on.
    pub async fn request_hint(&self) -> SessionResult<Option<ChessMove>> {
        let _guard = InFlightGuard::acquire(&self.in_flight).ok_or(SessionError::AwaitingOracle)?;

        let snapshot = {
            let session = self.session.lock();
            if session.is_terminal() {
                return Err(SessionError::GameAlreadyOver(session.current_status()));
            }
            snapshot_of(&session)
        };

        let hint = self
            .ask_oracle(&snapshot.fen, self.config.hint_depth)
            .await
            .and_then(|text| validate_answer(&snapshot.board, &text));

        if self.session.lock().history().len() != snapshot.plies {
            return Ok(None);
        }
        match hint {
            Ok(mv) => Ok(Some(mv)),
            Err(err) => {
                warn!(oracle = self.oracle.name(), error = %err, "hint unavailable");
                Ok(None)
            }
        }
    }

    pub fn view(&self, selection: Option<Square>) -> SessionView {
        let session = self.session.lock();
        project_session_view(&session, selection, self.is_awaiting_oracle())
    }

    async fn ask_oracle(&self, fen: &str, strength: u8) -> Result<String, OracleError> {
        let timeout = self.config.oracle_timeout();
        let started = Instant::now();
        debug!(oracle = self.oracle.name(), strength, %fen, "oracle request");

        let answer = match tokio::time::timeout(timeout, self.oracle.best_move(fen, strength)).await {
            Ok(answer) => answer,
            Err(_) => Err(OracleError::Timeout(timeout)),
        };

        debug!(
            oracle = self.oracle.name(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            ok = answer.is_ok(),
            "oracle replied"
        );
        answer
    }
}

fn snapshot_of(session: &GameSession) -> Snapshot {
    Snapshot {
        fen: session.current_fen(),
        board: session.current_board().clone(),
        plies: session.history().len(),
    }
}

fn validate_answer(board: &Board, text: &str) -> Result<ChessMove, OracleError> {
    let coordinate =
        parse_coordinate_move(text).map_err(|_| OracleError::MalformedMove(text.trim().to_owned()))?;
    match_legal_move(board, coordinate.from, coordinate.to, coordinate.promotion)
        .ok_or_else(|| OracleError::IllegalMove(text.trim().to_owned()))
}
