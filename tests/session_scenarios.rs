use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, Notify};

use chess_session::config::{CoordinatorConfig, Difficulty, OpponentConfig};
use chess_session::errors::SessionError;
use chess_session::game_state::board::Board;
use chess_session::game_state::chess_types::{Color, PieceKind};
use chess_session::opponent::coordinator::{OpponentCoordinator, OracleTurnOutcome};
use chess_session::opponent::game_recorder::MemoryRecorder;
use chess_session::opponent::move_oracle::{MoveOracle, OracleError};
use chess_session::session::game_session::GameSession;
use chess_session::session::game_status::GameStatus;
use chess_session::session::summary::GameResult;

fn play(session: &mut GameSession, moves: &[&str]) {
    for mv in moves {
        session
            .apply_coordinate_move(mv)
            .unwrap_or_else(|err| panic!("{mv} should be legal: {err}"));
    }
}

fn black_bot() -> OpponentConfig {
    OpponentConfig::Oracle {
        color: Color::Black,
        difficulty: Difficulty::Classic,
    }
}

#[test]
fn twenty_moves_from_the_start() {
    let session = GameSession::standard(OpponentConfig::Human);
    assert_eq!(session.legal_moves().len(), 20);
    assert_eq!(session.current_status(), GameStatus::InProgress);
    assert_eq!(session.side_to_move(), Color::White);
}

#[test]
fn open_game_counters() {
    let mut session = GameSession::standard(OpponentConfig::Human);
    play(&mut session, &["e2e4", "e7e5", "g1f3"]);
    assert_eq!(session.current_board().halfmove_clock, 1);

    play(&mut session, &["b8c6"]);
    let board = session.current_board();
    assert_eq!(board.halfmove_clock, 2);
    assert_eq!(board.fullmove_number, 3);
    assert_eq!(session.side_to_move(), Color::White);
    assert_eq!(session.current_status(), GameStatus::InProgress);
    let san: Vec<&str> = session.history().iter().map(|r| r.san.as_str()).collect();
    assert_eq!(san, vec!["e4", "e5", "Nf3", "Nc6"]);
}

#[tokio::test]
async fn fools_mate_is_recorded_once() {
    let recorder = Arc::new(MemoryRecorder::new());
    let mut session = GameSession::standard(OpponentConfig::Human).with_recorder(recorder.clone());
    play(&mut session, &["f2f3", "e7e5", "g2g4", "d8h4"]);

    assert_eq!(session.current_status(), GameStatus::Checkmate);
    assert_eq!(session.winner(), Some(Color::Black));
    assert!(session.legal_moves().is_empty());
    assert!(matches!(
        session.apply_coordinate_move("a2a3"),
        Err(SessionError::GameAlreadyOver(GameStatus::Checkmate))
    ));

    let games = recorder.wait_for_games(1).await;
    assert_eq!(games.len(), 1);
    assert_eq!(games[0].result, GameResult::Loss);
    assert_eq!(games[0].total_plies, 4);
    assert!(games[0].pgn.trim_end().ends_with("2. g4 Qh4# 0-1"), "{}", games[0].pgn);
}

#[test]
fn knights_shuffle_to_threefold_repetition() {
    let mut session = GameSession::standard(OpponentConfig::Human);
    let shuffle = ["g1f3", "g8f6", "f3g1", "f6g8"];
    play(&mut session, &shuffle);
    assert_eq!(session.current_status(), GameStatus::InProgress);

    play(&mut session, &shuffle[..3]);
    assert_eq!(session.current_status(), GameStatus::InProgress);
    play(&mut session, &shuffle[3..]);
    assert_eq!(session.current_status(), GameStatus::DrawByRepetition);

    let summary = session.summary().expect("finished game has a summary");
    assert_eq!(summary.result, GameResult::Draw);
    assert_eq!(summary.winner, None);
}

#[test]
fn hundredth_quiet_ply_draws() {
    let mut session =
        GameSession::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 99 80", OpponentConfig::Human)
            .expect("position should be playable");
    assert_eq!(session.current_status(), GameStatus::InProgress);

    play(&mut session, &["a1a2"]);
    assert_eq!(session.current_board().halfmove_clock, 100);
    assert_eq!(session.current_status(), GameStatus::DrawByFiftyMove);
}

#[test]
fn promotion_without_a_letter_makes_a_queen() {
    let mut session = GameSession::from_fen("8/P6k/8/8/8/8/8/K7 w - - 0 1", OpponentConfig::Human)
        .expect("position should be playable");
    let record = session
        .apply_move(
            "a7".parse().expect("square"),
            "a8".parse().expect("square"),
            None,
        )
        .expect("promotion should be legal");
    assert_eq!(record.chess_move.promotion, Some(PieceKind::Queen));
    assert_eq!(record.san, "a8=Q");
}

const CASTLING_FEN: &str = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1";

#[test]
fn king_that_walked_away_and_back_cannot_castle() {
    let mut session =
        GameSession::from_fen(CASTLING_FEN, OpponentConfig::Human).expect("position should be playable");
    play(&mut session, &["e1f1", "a8b8", "f1e1", "b8a8"]);
    assert_eq!(session.current_board().to_fen().split(' ').nth(2), Some("k"));

    assert!(matches!(
        session.apply_coordinate_move("e1g1"),
        Err(SessionError::IllegalMove { .. })
    ));
    assert!(matches!(
        session.apply_coordinate_move("e1c1"),
        Err(SessionError::IllegalMove { .. })
    ));
    assert_eq!(session.history().len(), 4);
    assert_eq!(session.side_to_move(), Color::White);
}

#[test]
fn rook_that_walked_away_and_back_loses_only_its_side() {
    let mut session =
        GameSession::from_fen(CASTLING_FEN, OpponentConfig::Human).expect("position should be playable");
    play(&mut session, &["h1h2", "a8b8", "h2h1", "b8a8"]);
    assert_eq!(session.current_board().to_fen().split(' ').nth(2), Some("Qk"));

    assert!(matches!(
        session.apply_coordinate_move("e1g1"),
        Err(SessionError::IllegalMove { .. })
    ));
    let record = session
        .apply_coordinate_move("e1c1")
        .expect("queenside castling is still available");
    assert_eq!(record.san, "O-O-O");
}

#[test]
fn fen_round_trips_through_a_session() {
    for fen in [
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
    ] {
        let session = GameSession::from_fen(fen, OpponentConfig::Human).expect("FEN should load");
        assert_eq!(session.current_fen(), fen);
        assert_eq!(Board::from_fen(fen).expect("FEN should parse").to_fen(), fen);
    }
}

struct SlowOracle;

#[async_trait]
impl MoveOracle for SlowOracle {
    async fn best_move(&self, _position: &str, _strength: u8) -> Result<String, OracleError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok("e7e5".to_owned())
    }
}

#[tokio::test(start_paused = true)]
async fn slow_oracle_falls_back_to_a_legal_move() {
    let mut session = GameSession::standard(black_bot());
    play(&mut session, &["d2d4"]);
    let config = CoordinatorConfig {
        oracle_timeout_ms: 2_000,
        fallback_seed: Some(1),
        ..CoordinatorConfig::default()
    };
    let coordinator = OpponentCoordinator::new(session, Arc::new(SlowOracle), config);

    let outcome = coordinator.play_oracle_turn().await.expect("oracle turn should run");
    let OracleTurnOutcome::Played(turn) = outcome else {
        panic!("expected a fallback move, got {outcome:?}");
    };
    assert_eq!(
        turn.warning,
        Some(SessionError::OracleUnavailable(OracleError::Timeout(Duration::from_secs(2))))
    );
    assert_eq!(turn.record.mover, Color::Black);
    assert!(!coordinator.is_awaiting_oracle());
    assert_eq!(coordinator.with_session(|s| s.side_to_move()), Color::White);
}

struct GatedOracle {
    started: mpsc::UnboundedSender<()>,
    release: Arc<Notify>,
}

#[async_trait]
impl MoveOracle for GatedOracle {
    async fn best_move(&self, _position: &str, _strength: u8) -> Result<String, OracleError> {
        let _ = self.started.send(());
        self.release.notified().await;
        Ok("e7e5".to_owned())
    }
}

#[tokio::test]
async fn resigning_while_the_oracle_thinks_discards_its_answer() {
    let (started_tx, mut started_rx) = mpsc::unbounded_channel();
    let release = Arc::new(Notify::new());
    let oracle = GatedOracle {
        started: started_tx,
        release: Arc::clone(&release),
    };

    let recorder = Arc::new(MemoryRecorder::new());
    let mut session = GameSession::standard(black_bot()).with_recorder(recorder.clone());
    play(&mut session, &["e2e4"]);
    let coordinator = Arc::new(OpponentCoordinator::new(
        session,
        Arc::new(oracle),
        CoordinatorConfig::default(),
    ));

    let pending = coordinator.spawn_oracle_turn();
    started_rx.recv().await.expect("oracle should be asked");
    assert!(coordinator.is_awaiting_oracle());

    coordinator.resign(Color::White).expect("resignation is always allowed");
    release.notify_one();

    let outcome = pending
        .await
        .expect("oracle task should not panic")
        .expect("oracle turn should complete");
    assert_eq!(outcome, OracleTurnOutcome::Discarded);

    coordinator.with_session(|session| {
        assert_eq!(session.current_status(), GameStatus::Resigned);
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.winner(), Some(Color::Black));
    });

    let games = recorder.wait_for_games(1).await;
    assert_eq!(games.len(), 1);
    assert_eq!(games[0].result, GameResult::Loss);
    assert_eq!(games[0].game_mode, "CLASSIC");
}

struct ScriptedOracle(&'static str);

#[async_trait]
impl MoveOracle for ScriptedOracle {
    async fn best_move(&self, _position: &str, _strength: u8) -> Result<String, OracleError> {
        Ok(self.0.to_owned())
    }
}

#[tokio::test]
async fn human_move_alone_brings_the_bot_reply() {
    let coordinator = Arc::new(OpponentCoordinator::new(
        GameSession::standard(black_bot()),
        Arc::new(ScriptedOracle("c7c5")),
        CoordinatorConfig::default(),
    ));

    let turn = coordinator
        .play_human_coordinate_move("e2e4")
        .expect("opening move should be legal");
    assert_eq!(turn.record.san, "e4");
    let reply = turn.oracle_reply.expect("the bot should be asked to reply");

    let outcome = reply
        .await
        .expect("oracle task should not panic")
        .expect("oracle turn should complete");
    let OracleTurnOutcome::Played(bot) = outcome else {
        panic!("expected the bot to move, got {outcome:?}");
    };
    assert_eq!(bot.record.san, "c5");
    assert_eq!(bot.warning, None);
    coordinator.with_session(|session| {
        let san: Vec<&str> = session.history().iter().map(|r| r.san.as_str()).collect();
        assert_eq!(san, vec!["e4", "c5"]);
        assert_eq!(session.side_to_move(), Color::White);
    });
}
