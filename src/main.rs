//! Terminal front end: play a game against a UCI engine, the built-in
//! random mover, or a second person at the same keyboard.
//!
//! Commands are read one per line from stdin:
//! a coordinate move (`e2e4`, `e7e8n`), `show <square>`, `hint`, `moves`,
//! `fen`, `pgn`, `resign` or `quit`.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chess_session::config::{Difficulty, OpponentConfig, SessionConfig};
use chess_session::errors::SessionError;
use chess_session::game_state::chess_types::{Color, Square};
use chess_session::opponent::coordinator::{OpponentCoordinator, OracleTurnOutcome};
use chess_session::opponent::game_recorder::TracingRecorder;
use chess_session::opponent::move_oracle::MoveOracle;
use chess_session::opponent::random_oracle::RandomOracle;
use chess_session::opponent::uci_oracle::UciOracle;
use chess_session::session::game_session::GameSession;
use chess_session::utils::long_algebraic::move_to_coordinate;
use chess_session::utils::render_game_state::render_session_view;
use clap::{Parser, ValueEnum};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about = "Play chess in the terminal")]
struct Args {
    /// JSON session config; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// `manual` for pass-and-play, otherwise a bot difficulty.
    #[arg(long, value_parser = parse_mode)]
    mode: Option<Mode>,

    #[arg(long, value_enum, default_value_t = Side::White)]
    human_color: Side,

    /// Start from this position instead of the standard one.
    #[arg(long)]
    fen: Option<String>,

    /// UCI engine binary; the random mover plays when absent.
    #[arg(long)]
    engine: Option<PathBuf>,

    /// Seed for the random mover and the fallback move.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Copy)]
enum Mode {
    Manual,
    Bot(Difficulty),
}

fn parse_mode(text: &str) -> Result<Mode, String> {
    if text.eq_ignore_ascii_case("manual") {
        Ok(Mode::Manual)
    } else {
        text.parse().map(Mode::Bot)
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Side {
    White,
    Black,
}

impl From<Side> for Color {
    fn from(side: Side) -> Self {
        match side {
            Side::White => Color::White,
            Side::Black => Color::Black,
        }
    }
}

fn session_config(args: &Args) -> Result<SessionConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            SessionConfig::from_json_str(&text)
                .with_context(|| format!("parsing {}", path.display()))?
        }
        None => SessionConfig::default(),
    };

    let human = Color::from(args.human_color);
    match args.mode {
        Some(Mode::Manual) => config.opponent = OpponentConfig::Human,
        Some(Mode::Bot(difficulty)) => {
            config.opponent = OpponentConfig::Oracle {
                color: human.opposite(),
                difficulty,
            }
        }
        None => {}
    }
    if let Some(fen) = &args.fen {
        config.starting_fen = Some(fen.clone());
    }
    if let Some(seed) = args.seed {
        config.coordinator.fallback_seed = Some(seed);
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config.coordinator.oracle_timeout_ms = timeout_ms;
    }
    Ok(config)
}

fn build_oracle(args: &Args, config: &SessionConfig) -> Arc<dyn MoveOracle> {
    match (&args.engine, config.coordinator.fallback_seed) {
        (Some(path), _) => Arc::new(UciOracle::new(path)),
        (None, Some(seed)) => Arc::new(RandomOracle::seeded(seed)),
        (None, None) => Arc::new(RandomOracle::new()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = session_config(&args)?;
    let oracle = build_oracle(&args, &config);
    info!(oracle = oracle.name(), mode = config.opponent.game_mode(), "starting game");

    let session = GameSession::new(&config)?.with_recorder(Arc::new(TracingRecorder));
    let coordinator = Arc::new(OpponentCoordinator::new(session, oracle, config.coordinator));

    play(&coordinator).await?;
    // Give the detached recorder a turn before the runtime shuts down.
    tokio::task::yield_now().await;

    let (pgn, summary) = coordinator.with_session(|s| (s.pgn(), s.summary()));
    println!("{pgn}");
    if let Ok(summary) = summary {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    Ok(())
}

async fn play(coordinator: &Arc<OpponentCoordinator>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut selection: Option<Square> = None;

    if let Some(reply) = coordinator.start_oracle_if_due() {
        report_oracle_turn(reply.await??);
    }

    loop {
        println!("{}", render_session_view(&coordinator.view(selection)));
        selection = None;
        if coordinator.with_session(|s| s.is_terminal()) {
            return Ok(());
        }

        let Some(line) = lines.next_line().await? else {
            return Ok(());
        };
        let line = line.trim();
        let mut words = line.split_whitespace();
        match (words.next(), words.next()) {
            (None, _) => {}
            (Some("quit"), _) => return Ok(()),
            (Some("resign"), _) => {
                let side = coordinator.with_session(|s| s.side_to_move());
                coordinator.resign(side)?;
            }
            (Some("hint"), _) => match coordinator.request_hint().await? {
                Some(mv) => println!("hint: {}", move_to_coordinate(&mv)),
                None => println!("no hint available"),
            },
            (Some("moves"), _) => {
                let texts: Vec<String> =
                    coordinator.with_session(|s| s.legal_moves().iter().map(move_to_coordinate).collect());
                println!("{}", texts.join(" "));
            }
            (Some("fen"), _) => println!("{}", coordinator.with_session(|s| s.current_fen())),
            (Some("pgn"), _) => println!("{}", coordinator.with_session(|s| s.pgn())),
            (Some("show"), Some(square)) => match square.parse::<Square>() {
                Ok(square) => selection = Some(square),
                Err(err) => println!("{err}"),
            },
            (Some("show"), None) => println!("usage: show <square>"),
            (Some(text), _) => match coordinator.play_human_coordinate_move(text) {
                Ok(turn) => {
                    info!(san = %turn.record.san, "move played");
                    if let Some(reply) = turn.oracle_reply {
                        report_oracle_turn(reply.await??);
                    }
                }
                Err(
                    err @ (SessionError::IllegalMove { .. }
                    | SessionError::UnreadableMove(_)
                    | SessionError::NotHumanTurn),
                ) => println!("{err}"),
                Err(err) => return Err(err.into()),
            },
        }
    }
}

fn report_oracle_turn(outcome: OracleTurnOutcome) {
    match outcome {
        OracleTurnOutcome::Played(turn) => {
            if let Some(warning) = turn.warning {
                println!("warning: {warning}");
            }
            println!("Bot plays {}", turn.record.san);
        }
        OracleTurnOutcome::Discarded | OracleTurnOutcome::NotOracleTurn => {}
    }
}
