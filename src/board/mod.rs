//! Board representation and the engine pipeline built on top of it.
//!
//! The submodules are layered leaf-first:
//! - [`types`]: squares, colors, pieces, and the [`Move`] value type.
//! - [`attack_tables`]: precomputed leaper masks and magic-bitboard slider
//!   lookups.
//! - [`state`] / [`make_unmake`]: the mutable [`Board`] with incremental
//!   Zobrist hashing and exact make/unmake inversion.
//! - [`movegen`]: pseudo-legal move generation, attack detection, perft.
//! - [`eval`] / [`pst`]: tapered static evaluation.
//! - [`search`]: iterative-deepening negamax with a transposition table.
//! - [`fen`] / [`san`] / [`error`]: the text interface surface.

pub(crate) mod attack_tables;
mod error;
mod eval;
mod fen;
mod make_unmake;
mod movegen;
pub(crate) mod pst;
mod san;
mod search;
mod state;
mod types;

#[cfg(test)]
mod tests;

pub use error::{FenError, MoveParseError};
pub use search::{
    find_best_move, find_best_move_with, SearchIterationInfo, SearchParams, SearchState,
    SearchStats, MATE_SCORE, MATE_THRESHOLD,
};
pub use state::{Board, Gamestate};
pub use types::{Color, Move, MoveList, Piece, Square};

pub(crate) use types::{bit, pop_lsb, Bitboard, ScoredMoveList};

/// Maximum supported search depth in plies.
pub const MAX_PLY: usize = 128;
