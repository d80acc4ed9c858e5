//! Read-only snapshot of a session for presentation layers.
//!
//! [`project_session_view`] never mutates the session. A caller re-projects
//! after every change (a move, a selection, the oracle starting or
//! finishing).

use serde::Serialize;

use crate::game_state::chess_types::{Color, Piece, PieceKind, Square};
use crate::session::game_session::GameSession;
use crate::session::game_status::GameStatus;
use crate::session::move_record::MoveRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PieceView {
    pub color: Color,
    pub kind: PieceKind,
    pub glyph: char,
}

impl From<Piece> for PieceView {
    fn from(piece: Piece) -> Self {
        Self {
            color: piece.color,
            kind: piece.kind,
            glyph: piece.unicode(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SquareView {
    pub square: Square,
    pub piece: Option<PieceView>,
    pub is_light: bool,
    pub selected: bool,
    pub legal_destination: bool,
    /// A legal destination that captures.
    pub capture_target: bool,
    /// The king of the side to move, while in check.
    pub in_check: bool,
}

/// One numbered row of the move list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveListEntry {
    pub number: u16,
    pub white: Option<String>,
    pub black: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionView {
    /// Display order: rank 8 down to rank 1, files a to h within a rank.
    pub squares: Vec<SquareView>,
    pub side_to_move: Color,
    pub status: GameStatus,
    pub status_text: String,
    pub opponent_thinking: bool,
    /// Only set when the selection holds a piece of the side to move.
    pub selected: Option<Square>,
    pub moves: Vec<MoveListEntry>,
    pub fen: String,
}

pub fn project_session_view(
    session: &GameSession,
    selection: Option<Square>,
    opponent_thinking: bool,
) -> SessionView {
    let board = session.current_board();
    let status = session.current_status();

    let selected = selection.filter(|&square| {
        board
            .piece_at(square)
            .is_some_and(|piece| piece.color == board.side_to_move)
    });
    let destinations = selected
        .map(|square| session.legal_moves_from(square))
        .unwrap_or_default();

    let checked_king = matches!(status, GameStatus::Check | GameStatus::Checkmate)
        .then(|| board.king_square(board.side_to_move))
        .flatten();

    let squares = (0u8..8)
        .rev()
        .flat_map(|rank| (0u8..8).filter_map(move |file| Square::new(file, rank)))
        .map(|square| {
            let to_here = destinations.iter().filter(|mv| mv.to == square);
            let mut legal_destination = false;
            let mut capture_target = false;
            for mv in to_here {
                legal_destination = true;
                capture_target |= mv.is_capture();
            }
            SquareView {
                square,
                piece: board.piece_at(square).map(PieceView::from),
                is_light: square.is_light(),
                selected: selected == Some(square),
                legal_destination,
                capture_target,
                in_check: checked_king == Some(square),
            }
        })
        .collect();

    SessionView {
        squares,
        side_to_move: board.side_to_move,
        status,
        status_text: status_text(session),
        opponent_thinking,
        selected,
        moves: move_list(session.history()),
        fen: board.to_fen(),
    }
}

pub fn status_text(session: &GameSession) -> String {
    let to_move = session.side_to_move();
    match session.current_status() {
        GameStatus::InProgress => format!("{to_move} to move"),
        GameStatus::Check => format!("{to_move} to move. Check!"),
        GameStatus::Checkmate => match session.winner() {
            Some(winner) => format!("Checkmate! {winner} wins!"),
            None => "Checkmate!".to_owned(),
        },
        GameStatus::Stalemate => "Stalemate!".to_owned(),
        GameStatus::DrawByRepetition => "Game drawn by threefold repetition!".to_owned(),
        GameStatus::DrawByFiftyMove => "Game drawn by the fifty-move rule!".to_owned(),
        GameStatus::DrawByInsufficientMaterial => "Game drawn by insufficient material!".to_owned(),
        GameStatus::Resigned => match session.winner() {
            Some(winner) => format!("{} resigned. {winner} wins!", winner.opposite()),
            None => "Resigned.".to_owned(),
        },
    }
}

fn move_list(history: &[MoveRecord]) -> Vec<MoveListEntry> {
    let mut entries = Vec::<MoveListEntry>::with_capacity(history.len() / 2 + 1);
    for record in history {
        match record.mover {
            Color::White => entries.push(MoveListEntry {
                number: record.move_number(),
                white: Some(record.san.clone()),
                black: None,
            }),
            Color::Black => match entries.last_mut() {
                Some(last) if last.black.is_none() && last.number == record.move_number() => {
                    last.black = Some(record.san.clone());
                }
                _ => entries.push(MoveListEntry {
                    number: record.move_number(),
                    white: None,
                    black: Some(record.san.clone()),
                }),
            },
        }
    }
    entries
}
