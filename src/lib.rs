//! A bitboard chess engine library.
//!
//! The crate is organized around three pieces: the [`board`] module holds the
//! bitboard position, move generation, and the search/evaluation pipeline;
//! [`tt`] is the fixed-size transposition table; [`zobrist`] provides the
//! random key material for incremental position hashing.
//!
//! Typical usage:
//!
//! ```
//! use garnet_chess::{find_best_move, Board, SearchState};
//!
//! let mut board = Board::new();
//! let mut state = SearchState::new();
//! let best = find_best_move(&mut board, &mut state, 4, 0);
//! assert!(best.is_some());
//! ```

pub mod board;
pub mod tt;
pub mod zobrist;

pub use board::{
    find_best_move, find_best_move_with, Board, Color, FenError, Gamestate, Move,
    MoveParseError, Piece, SearchIterationInfo, SearchParams, SearchState, SearchStats, Square,
    MATE_SCORE, MATE_THRESHOLD,
};
pub use tt::{BoundType, TranspositionTable, DEFAULT_TT_MB};
