//! Crate root module declarations for the chess session engine.
//!
//! This file exposes every subsystem (board state, move generation, the game
//! session, opponent coordination, views and notation helpers) so the binary,
//! benches and integration tests can import stable module paths.

pub mod config;
pub mod errors;

pub mod game_state {
    pub mod board;
    pub mod chess_rules;
    pub mod chess_types;
}

pub mod moves {
    pub mod attacks;
    pub mod chess_move;
}

pub mod move_generation {
    pub mod legal_move_apply;
    pub mod legal_move_checks;
    pub mod legal_move_generator;
    pub mod legal_move_shared;
    pub mod legal_moves_king;
    pub mod legal_moves_knight;
    pub mod legal_moves_pawn;
    pub mod legal_moves_sliders;
    pub mod perft;
}

pub mod session {
    pub mod game_session;
    pub mod game_status;
    pub mod move_record;
    pub mod summary;
}

pub mod opponent {
    pub mod coordinator;
    pub mod game_recorder;
    pub mod move_oracle;
    pub mod random_oracle;
    pub mod uci_oracle;
}

pub mod view {
    pub mod session_view;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_generator;
    pub mod fen_parser;
    pub mod long_algebraic;
    pub mod pgn;
    pub mod render_game_state;
    pub mod san;
}
