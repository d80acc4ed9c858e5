//! Terminal-oriented Unicode board renderer.
//!
//! Used by the command-line front end and by tests that want a readable
//! board in their output.

use crate::game_state::board::Board;
use crate::game_state::chess_types::Square;
use crate::view::session_view::SessionView;

/// Render the board to a Unicode string for terminal output, rank 8 on top.
pub fn render_game_state(board: &Board) -> String {
    render_with(|square| board.piece_at(square).map(|piece| piece.unicode()), |_| None)
}

/// Render a projected view. Legal destinations of the selected piece are
/// drawn as `*` on empty squares and `x` on captures.
pub fn render_session_view(view: &SessionView) -> String {
    let cell = |square: Square| {
        view.squares
            .iter()
            .find(|cell| cell.square == square)
    };
    let mut out = render_with(
        |square| cell(square).and_then(|c| c.piece.as_ref().map(|p| p.glyph)),
        |square| {
            let c = cell(square)?;
            if c.capture_target {
                Some('x')
            } else if c.legal_destination {
                Some('*')
            } else {
                None
            }
        },
    );
    out.push('\n');
    out.push_str(&view.status_text);
    out
}

fn render_with(
    glyph: impl Fn(Square) -> Option<char>,
    marker: impl Fn(Square) -> Option<char>,
) -> String {
    let mut out = String::new();
    out.push_str("  a b c d e f g h\n");

    for rank in (0u8..8).rev() {
        let label = char::from(b'1' + rank);
        out.push(label);
        out.push(' ');

        for file in 0u8..8 {
            let ch = Square::new(file, rank)
                .and_then(|square| marker(square).or_else(|| glyph(square)))
                .unwrap_or('·');
            out.push(ch);
            if file < 7 {
                out.push(' ');
            }
        }

        out.push(' ');
        out.push(label);
        out.push('\n');
    }

    out.push_str("  a b c d e f g h");
    out
}

#[cfg(test)]
mod tests {
    use super::{render_game_state, render_session_view};
    use crate::config::OpponentConfig;
    use crate::game_state::board::Board;
    use crate::session::game_session::GameSession;
    use crate::view::session_view::project_session_view;

    #[test]
    fn starting_position_rows() {
        let text = render_game_state(&Board::starting_position());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[1], "8 ♜ ♞ ♝ ♛ ♚ ♝ ♞ ♜ 8");
        assert_eq!(lines[5], "4 · · · · · · · · 4");
        assert_eq!(lines[8], "1 ♖ ♘ ♗ ♕ ♔ ♗ ♘ ♖ 1");
    }

    #[test]
    fn view_marks_destinations() {
        let session = GameSession::standard(OpponentConfig::Human);
        let view = project_session_view(&session, "e2".parse().ok(), false);
        let text = render_session_view(&view);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[5], "4 · · · · * · · · 4");
        assert_eq!(lines[6], "3 · · · · * · · · 3");
        assert_eq!(lines.last().copied(), Some("White to move"));
    }
}
