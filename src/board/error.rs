//! Error types for the text interface surface.
//!
//! These are the only error types in the crate: everything inside the search
//! and make/unmake hot path treats "failure" (illegal move, table collision,
//! budget overrun) as a normal outcome, not an error.

use std::error::Error;
use std::fmt;

/// A FEN string was rejected. The board is left untouched on failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FenError {
    /// Fewer than the four mandatory fields were present.
    MissingFields { found: usize },
    /// An unrecognized character in the piece-placement field.
    InvalidPiece { ch: char },
    /// A rank described more or fewer than eight squares, or there were not
    /// exactly eight ranks.
    BadRankShape { rank: String },
    InvalidSideToMove { found: String },
    InvalidCastlingRights { ch: char },
    InvalidEnPassant { found: String },
    /// Each side must have exactly one king.
    WrongKingCount { color: &'static str, count: u32 },
    /// Pawns cannot stand on the first or eighth rank; several internal
    /// routines assume every pawn has a square ahead of it.
    PawnOnBackRank { square: String },
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenError::MissingFields { found } => {
                write!(f, "FEN needs at least 4 fields, found {found}")
            }
            FenError::InvalidPiece { ch } => {
                write!(f, "invalid piece character '{ch}' in FEN placement")
            }
            FenError::BadRankShape { rank } => {
                write!(f, "FEN rank '{rank}' does not describe 8 squares")
            }
            FenError::InvalidSideToMove { found } => {
                write!(f, "invalid side to move '{found}', expected 'w' or 'b'")
            }
            FenError::InvalidCastlingRights { ch } => {
                write!(f, "invalid castling rights character '{ch}'")
            }
            FenError::InvalidEnPassant { found } => {
                write!(f, "invalid en passant square '{found}'")
            }
            FenError::WrongKingCount { color, count } => {
                write!(f, "expected exactly one {color} king, found {count}")
            }
            FenError::PawnOnBackRank { square } => {
                write!(f, "pawn on back rank square {square}")
            }
        }
    }
}

impl Error for FenError {}

/// A UCI move string could not be matched against the current legal moves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MoveParseError {
    /// UCI moves are 4 characters, 5 with a promotion suffix.
    WrongLength { found: usize },
    InvalidSquare { found: String },
    InvalidPromotion { ch: char },
    /// Syntactically valid but not a legal move in this position.
    IllegalMove { notation: String },
}

impl fmt::Display for MoveParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveParseError::WrongLength { found } => {
                write!(f, "UCI move must be 4 or 5 characters, found {found}")
            }
            MoveParseError::InvalidSquare { found } => {
                write!(f, "invalid square '{found}' in UCI move")
            }
            MoveParseError::InvalidPromotion { ch } => {
                write!(f, "invalid promotion piece '{ch}'")
            }
            MoveParseError::IllegalMove { notation } => {
                write!(f, "move '{notation}' is not legal in this position")
            }
        }
    }
}

impl Error for MoveParseError {}
