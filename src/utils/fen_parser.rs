//! FEN-to-Board parser.
//!
//! Builds a fully-populated [`Board`] from a Forsyth-Edwards Notation string,
//! including piece bitboards, rights, clocks and occupancies. Only the text
//! format is checked here; king counts and similar legality concerns belong
//! to the session that accepts the position.

use crate::errors::{SessionError, SessionResult};
use crate::game_state::board::Board;
use crate::game_state::chess_types::*;
use crate::utils::algebraic::algebraic_to_square;

pub fn parse_fen(fen: &str) -> SessionResult<Board> {
    parse_fen_fields(fen).map_err(SessionError::InvalidPositionFormat)
}

fn parse_fen_fields(fen: &str) -> Result<Board, String> {
    let mut parts = fen.split_whitespace();

    let board_part = parts.next().ok_or("Missing board layout in FEN")?;
    let side_part = parts.next().ok_or("Missing side-to-move in FEN")?;
    let castling_part = parts.next().ok_or("Missing castling rights in FEN")?;
    let en_passant_part = parts.next().ok_or("Missing en-passant square in FEN")?;
    let halfmove_part = parts.next().ok_or("Missing halfmove clock in FEN")?;
    let fullmove_part = parts.next().ok_or("Missing fullmove number in FEN")?;

    if parts.next().is_some() {
        return Err("FEN has extra trailing fields".to_owned());
    }

    let mut board = Board::new_empty();

    parse_placement(board_part, &mut board)?;
    board.side_to_move = parse_side_to_move(side_part)?;
    board.castling_rights = parse_castling_rights(castling_part)?;
    board.en_passant_square = parse_en_passant_square(en_passant_part)?;
    board.halfmove_clock = halfmove_part
        .parse::<u16>()
        .map_err(|_| format!("Invalid halfmove clock: {halfmove_part}"))?;
    board.fullmove_number = fullmove_part
        .parse::<u16>()
        .map_err(|_| format!("Invalid fullmove number: {fullmove_part}"))?;
    if board.fullmove_number == 0 {
        return Err("Fullmove number must start at 1".to_owned());
    }

    Ok(board)
}

fn parse_placement(board_part: &str, board: &mut Board) -> Result<(), String> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err("Board layout must contain 8 ranks".to_owned());
    }

    for (fen_rank_idx, rank_str) in ranks.iter().enumerate() {
        let rank = 7u8.saturating_sub(fen_rank_idx as u8);
        let mut file = 0u8;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(format!("Invalid empty-square count '{ch}'"));
                }
                file = file.saturating_add(empty_count as u8);
                if file > 8 {
                    return Err("Board rank has too many files".to_owned());
                }
                continue;
            }

            let piece = Piece::from_fen_char(ch)
                .ok_or_else(|| format!("Invalid piece character '{ch}' in board layout"))?;
            let square = Square::new(file, rank).ok_or("Board rank has too many files")?;

            board.put_piece(square, piece);
            file += 1;
        }

        if file != 8 {
            return Err("Board rank does not sum to 8 files".to_owned());
        }
    }

    Ok(())
}

fn parse_side_to_move(side_part: &str) -> Result<Color, String> {
    match side_part {
        "w" => Ok(Color::White),
        "b" => Ok(Color::Black),
        _ => Err(format!("Invalid side-to-move field: {side_part}")),
    }
}

fn parse_castling_rights(castling_part: &str) -> Result<CastlingRights, String> {
    if castling_part == "-" {
        return Ok(CastlingRights::NONE);
    }

    let mut rights = CastlingRights::NONE;

    for ch in castling_part.chars() {
        match ch {
            'K' => rights.white_kingside = true,
            'Q' => rights.white_queenside = true,
            'k' => rights.black_kingside = true,
            'q' => rights.black_queenside = true,
            _ => return Err(format!("Invalid castling rights character: {ch}")),
        }
    }

    Ok(rights)
}

fn parse_en_passant_square(en_passant_part: &str) -> Result<Option<Square>, String> {
    if en_passant_part == "-" {
        return Ok(None);
    }

    let square = algebraic_to_square(en_passant_part)?;
    if square.rank() != 2 && square.rank() != 5 {
        return Err(format!("En-passant square must be on rank 3 or 6: {en_passant_part}"));
    }
    Ok(Some(square))
}
