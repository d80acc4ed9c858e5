//! Move oracle backed by an external UCI engine process.
//!
//! The engine is started lazily on the first request and kept for later
//! ones. A request that fails or is abandoned mid-conversation (a timeout
//! drops the future) takes the process down with it; the next request
//! starts a fresh one.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;
use tracing::debug;

use crate::opponent::move_oracle::{MoveOracle, OracleError};

pub struct UciOracle {
    path: PathBuf,
    engine: Mutex<Option<UciProcess>>,
}

impl UciOracle {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            engine: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl MoveOracle for UciOracle {
    async fn best_move(&self, position: &str, strength: u8) -> Result<String, OracleError> {
        let mut slot = self.engine.lock().await;
        // Taken out for the duration of the exchange; only a clean exchange
        // puts it back.
        let mut engine = match slot.take() {
            Some(engine) => engine,
            None => UciProcess::start(&self.path).await?,
        };

        let answer = engine.best_move(position, strength).await?;
        *slot = Some(engine);
        Ok(answer)
    }

    fn name(&self) -> &str {
        "uci"
    }
}

struct UciProcess {
    _child: Child,
    stdin: ChildStdin,
    stdout: Lines<BufReader<ChildStdout>>,
}

impl UciProcess {
    async fn start(path: &Path) -> Result<Self, OracleError> {
        debug!(engine = %path.display(), "starting UCI engine");
        let mut child = Command::new(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| OracleError::Transport(format!("cannot start {}: {e}", path.display())))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| OracleError::Transport("engine stdin unavailable".to_owned()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| OracleError::Transport("engine stdout unavailable".to_owned()))?;

        let mut this = Self {
            _child: child,
            stdin,
            stdout: BufReader::new(stdout).lines(),
        };
        this.send("uci").await?;
        this.read_until("uciok").await?;
        this.send("isready").await?;
        this.read_until("readyok").await?;
        Ok(this)
    }

    async fn best_move(&mut self, fen: &str, depth: u8) -> Result<String, OracleError> {
        self.send(&format!("position fen {fen}")).await?;
        self.send(&format!("go depth {depth}")).await?;
        let line = self.read_until("bestmove").await?;
        parse_bestmove(&line)
    }

    async fn send(&mut self, command: &str) -> Result<(), OracleError> {
        self.stdin
            .write_all(format!("{command}\n").as_bytes())
            .await
            .map_err(transport)?;
        self.stdin.flush().await.map_err(transport)
    }

    /// Reads lines until one starts with `prefix` and returns it.
    async fn read_until(&mut self, prefix: &str) -> Result<String, OracleError> {
        loop {
            match self.stdout.next_line().await.map_err(transport)? {
                Some(line) if line.trim_start().starts_with(prefix) => return Ok(line),
                Some(_) => continue,
                None => {
                    return Err(OracleError::Transport(
                        "engine closed its output".to_owned(),
                    ))
                }
            }
        }
    }
}

fn transport(err: std::io::Error) -> OracleError {
    OracleError::Transport(err.to_string())
}

/// Move text out of a `bestmove <move> [ponder <move>]` line.
pub fn parse_bestmove(line: &str) -> Result<String, OracleError> {
    let mut tokens = line.split_whitespace();
    if tokens.next() != Some("bestmove") {
        return Err(OracleError::MalformedMove(line.trim().to_owned()));
    }
    match tokens.next() {
        Some("(none)") | Some("0000") => Err(OracleError::NoMove),
        Some(mv) => Ok(mv.to_owned()),
        None => Err(OracleError::MalformedMove(line.trim().to_owned())),
    }
}
