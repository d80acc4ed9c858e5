use crate::game_state::board::Board;
use crate::game_state::chess_types::*;
use crate::utils::algebraic::square_to_algebraic;

pub fn generate_fen(board: &Board) -> String {
    let side_to_move = match board.side_to_move {
        Color::White => "w",
        Color::Black => "b",
    };

    format!(
        "{} {} {} {} {} {}",
        generate_placement_field(board),
        side_to_move,
        generate_castling_field(board.castling_rights),
        generate_en_passant_field(board.en_passant_square),
        board.halfmove_clock,
        board.fullmove_number
    )
}

fn generate_placement_field(board: &Board) -> String {
    let mut out = String::new();

    for rank in (0..8u8).rev() {
        let mut empty_count = 0u8;

        for file in 0..8u8 {
            let piece = Square::new(file, rank).and_then(|sq| board.piece_at(sq));
            if let Some(piece) = piece {
                if empty_count > 0 {
                    out.push(char::from(b'0' + empty_count));
                    empty_count = 0;
                }
                out.push(piece.fen_char());
            } else {
                empty_count += 1;
            }
        }

        if empty_count > 0 {
            out.push(char::from(b'0' + empty_count));
        }

        if rank > 0 {
            out.push('/');
        }
    }

    out
}

fn generate_castling_field(rights: CastlingRights) -> String {
    let mut out = String::new();

    if rights.white_kingside {
        out.push('K');
    }
    if rights.white_queenside {
        out.push('Q');
    }
    if rights.black_kingside {
        out.push('k');
    }
    if rights.black_queenside {
        out.push('q');
    }

    if out.is_empty() {
        out.push('-');
    }

    out
}

fn generate_en_passant_field(square: Option<Square>) -> String {
    square.map_or_else(|| "-".to_owned(), square_to_algebraic)
}
