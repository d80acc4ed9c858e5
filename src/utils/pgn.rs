//! PGN export for finished or in-progress games.
//!
//! Movetext is built from the SAN already stored in each [`MoveRecord`], so
//! writing a PGN never replays the game.

use std::collections::BTreeMap;

use crate::game_state::board::Board;
use crate::game_state::chess_rules::STARTING_POSITION_FEN;
use crate::game_state::chess_types::Color;
use crate::session::move_record::MoveRecord;

pub fn write_pgn(initial_board: &Board, history: &[MoveRecord], result: &str) -> String {
    let mut headers = BTreeMap::<String, String>::new();
    headers.insert("Event".to_owned(), "Casual Game".to_owned());
    headers.insert("Site".to_owned(), "Local".to_owned());
    headers.insert(
        "Date".to_owned(),
        chrono::Utc::now().format("%Y.%m.%d").to_string(),
    );
    headers.insert("Round".to_owned(), "-".to_owned());
    headers.insert("White".to_owned(), "White".to_owned());
    headers.insert("Black".to_owned(), "Black".to_owned());
    headers.insert("Result".to_owned(), normalize_result(result).to_owned());

    let initial_fen = initial_board.to_fen();
    if initial_fen != STARTING_POSITION_FEN {
        headers.insert("SetUp".to_owned(), "1".to_owned());
        headers.insert("FEN".to_owned(), initial_fen);
    }

    write_pgn_with_headers(history, &headers)
}

pub fn write_pgn_with_headers(history: &[MoveRecord], headers: &BTreeMap<String, String>) -> String {
    let mut out = String::new();

    for (key, value) in headers {
        out.push_str(&format!("[{} \"{}\"]\n", key, escape_pgn_value(value)));
    }
    out.push('\n');

    out.push_str(&movetext(history));
    if !history.is_empty() {
        out.push(' ');
    }
    let result = headers
        .get("Result")
        .map(|x| normalize_result(x))
        .unwrap_or("*");
    out.push_str(result);
    out.push('\n');

    out
}

/// Numbered SAN movetext, e.g. `1. e4 e5 2. Nf3`. A game whose first
/// recorded move is Black's opens with `N...`.
pub fn movetext(history: &[MoveRecord]) -> String {
    let mut parts = Vec::<String>::with_capacity(history.len() + history.len() / 2);
    for (idx, record) in history.iter().enumerate() {
        match record.mover {
            Color::White => parts.push(format!("{}. {}", record.move_number(), record.san)),
            Color::Black if idx == 0 => {
                parts.push(format!("{}... {}", record.move_number(), record.san))
            }
            Color::Black => parts.push(record.san.clone()),
        }
    }
    parts.join(" ")
}

fn is_result_token(token: &str) -> bool {
    matches!(token, "1-0" | "0-1" | "1/2-1/2" | "*")
}

fn normalize_result(result: &str) -> &str {
    if is_result_token(result) {
        result
    } else {
        "*"
    }
}

fn escape_pgn_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
