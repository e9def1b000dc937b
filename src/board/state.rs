//! The mutable board state and its scalar snapshot.

use std::collections::HashMap;

use crate::zobrist::ZOBRIST;

use super::types::{bit, Bitboard, Color, Piece, Square};

pub(crate) const CASTLE_WHITE_K: u8 = 0b0001;
pub(crate) const CASTLE_WHITE_Q: u8 = 0b0010;
pub(crate) const CASTLE_BLACK_K: u8 = 0b0100;
pub(crate) const CASTLE_BLACK_Q: u8 = 0b1000;

#[inline]
pub(crate) const fn castle_bit(color: Color, kingside: bool) -> u8 {
    match (color, kingside) {
        (Color::White, true) => CASTLE_WHITE_K,
        (Color::White, false) => CASTLE_WHITE_Q,
        (Color::Black, true) => CASTLE_BLACK_K,
        (Color::Black, false) => CASTLE_BLACK_Q,
    }
}

/// Occurrence counts per position key.
///
/// Incremented on make and decremented on unmake, so at any node it holds the
/// counts for the real game history plus the current search line and nothing
/// else. Search reads it for threefold draws, evaluation for the
/// steer-away-from-repetition nudge.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct RepetitionTable {
    counts: HashMap<u64, u32>,
}

impl RepetitionTable {
    #[inline]
    pub(crate) fn count(&self, key: u64) -> u32 {
        self.counts.get(&key).copied().unwrap_or(0)
    }

    #[inline]
    pub(crate) fn increment(&mut self, key: u64) {
        *self.counts.entry(key).or_insert(0) += 1;
    }

    #[inline]
    pub(crate) fn decrement(&mut self, key: u64) {
        if let Some(count) = self.counts.get_mut(&key) {
            if *count <= 1 {
                self.counts.remove(&key);
            } else {
                *count -= 1;
            }
        }
    }

    pub(crate) fn clear(&mut self) {
        self.counts.clear();
    }
}

/// Scalar snapshot of everything `make_move` mutates besides piece placement.
///
/// Captured before mutation; together with the `Move` it is the sole input to
/// `unmake_move`. The piece bitboards are not snapshotted because placement
/// changes are cheaply invertible from the move itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Gamestate {
    pub(crate) side_to_move: Color,
    pub(crate) en_passant_square: Option<Square>,
    pub(crate) castling_rights: u8,
    pub(crate) king_squares: [Square; 2],
    pub(crate) halfmove_clock: u16,
    pub(crate) fullmove_number: u16,
    pub(crate) hash: u64,
}

/// Bitboard position: one board per (color, piece type), cached occupancy
/// unions, cached king squares, and an incrementally maintained Zobrist key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    /// Indexed by `[color][piece]`.
    pub(crate) pieces: [[Bitboard; 6]; 2],
    pub(crate) occupied: [Bitboard; 2],
    pub(crate) all_occupied: Bitboard,
    pub(crate) side_to_move: Color,
    pub(crate) en_passant_square: Option<Square>,
    pub(crate) castling_rights: u8,
    pub(crate) king_squares: [Square; 2],
    pub(crate) hash: u64,
    pub(crate) halfmove_clock: u16,
    pub(crate) fullmove_number: u16,
    pub(crate) repetition_counts: RepetitionTable,
}

/// State saved across a null move.
pub(crate) struct NullState {
    pub(crate) en_passant_square: Option<Square>,
    pub(crate) hash: u64,
}

impl Board {
    /// The standard starting position.
    pub fn new() -> Board {
        let mut board = Board::empty();

        let back_rank = [
            Piece::Rook,
            Piece::Knight,
            Piece::Bishop,
            Piece::Queen,
            Piece::King,
            Piece::Bishop,
            Piece::Knight,
            Piece::Rook,
        ];
        for (file, &piece) in back_rank.iter().enumerate() {
            board.put_piece(Color::White, piece, Square::new(0, file as u8));
            board.put_piece(Color::White, Piece::Pawn, Square::new(1, file as u8));
            board.put_piece(Color::Black, Piece::Pawn, Square::new(6, file as u8));
            board.put_piece(Color::Black, piece, Square::new(7, file as u8));
        }

        board.castling_rights =
            CASTLE_WHITE_K | CASTLE_WHITE_Q | CASTLE_BLACK_K | CASTLE_BLACK_Q;
        board.king_squares = [Square::new(0, 4), Square::new(7, 4)];
        board.fullmove_number = 1;
        board.hash = board.calculate_initial_hash();
        board.repetition_counts.increment(board.hash);
        board
    }

    /// A board with no pieces; used by the FEN loader before placement.
    pub(crate) fn empty() -> Board {
        Board {
            pieces: [[0; 6]; 2],
            occupied: [0; 2],
            all_occupied: 0,
            side_to_move: Color::White,
            en_passant_square: None,
            castling_rights: 0,
            king_squares: [Square(0), Square(0)],
            hash: 0,
            halfmove_clock: 0,
            fullmove_number: 1,
            repetition_counts: RepetitionTable::default(),
        }
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    #[inline]
    pub fn en_passant_square(&self) -> Option<Square> {
        self.en_passant_square
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        self.king_squares[color.index()]
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    #[inline]
    pub(crate) fn colored(&self, color: Color, piece: Piece) -> Bitboard {
        self.pieces[color.index()][piece.index()]
    }

    /// Looks up the occupant of a square.
    pub fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        let mask = bit(sq);
        if self.all_occupied & mask == 0 {
            return None;
        }
        let color = if self.occupied[Color::White.index()] & mask != 0 {
            Color::White
        } else {
            Color::Black
        };
        for piece in Piece::ALL {
            if self.pieces[color.index()][piece.index()] & mask != 0 {
                return Some((color, piece));
            }
        }
        None
    }

    /// Finds the enemy piece type on a square, for capture-move construction.
    #[inline]
    pub(crate) fn piece_of_on(&self, color: Color, sq: Square) -> Option<Piece> {
        let mask = bit(sq);
        if self.occupied[color.index()] & mask == 0 {
            return None;
        }
        Piece::ALL
            .into_iter()
            .find(|p| self.pieces[color.index()][p.index()] & mask != 0)
    }

    /// Adds a piece, keeping the occupancy unions and hash in step.
    #[inline]
    pub(crate) fn put_piece(&mut self, color: Color, piece: Piece, sq: Square) {
        let mask = bit(sq);
        self.pieces[color.index()][piece.index()] |= mask;
        self.occupied[color.index()] |= mask;
        self.all_occupied |= mask;
        self.hash ^= ZOBRIST.piece_keys[piece.index()][color.index()][sq.index()];
    }

    #[inline]
    pub(crate) fn remove_piece(&mut self, color: Color, piece: Piece, sq: Square) {
        let mask = bit(sq);
        self.pieces[color.index()][piece.index()] &= !mask;
        self.occupied[color.index()] &= !mask;
        self.all_occupied &= !mask;
        self.hash ^= ZOBRIST.piece_keys[piece.index()][color.index()][sq.index()];
    }

    #[inline]
    pub(crate) fn move_piece(&mut self, color: Color, piece: Piece, from: Square, to: Square) {
        self.remove_piece(color, piece, from);
        self.put_piece(color, piece, to);
    }

    pub(crate) fn snapshot(&self) -> Gamestate {
        Gamestate {
            side_to_move: self.side_to_move,
            en_passant_square: self.en_passant_square,
            castling_rights: self.castling_rights,
            king_squares: self.king_squares,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            hash: self.hash,
        }
    }

    /// Computes the Zobrist key from scratch. The incremental key must agree
    /// with this at every point a move is not in progress.
    pub(crate) fn calculate_initial_hash(&self) -> u64 {
        let mut hash = 0u64;
        for color in [Color::White, Color::Black] {
            for piece in Piece::ALL {
                let mut bb = self.pieces[color.index()][piece.index()];
                while bb != 0 {
                    let sq = super::pop_lsb(&mut bb);
                    hash ^= ZOBRIST.piece_keys[piece.index()][color.index()][sq];
                }
            }
        }
        if self.side_to_move == Color::Black {
            hash ^= ZOBRIST.black_to_move_key;
        }
        for flag in 0..4 {
            if self.castling_rights & (1 << flag) != 0 {
                hash ^= ZOBRIST.castling_keys[flag];
            }
        }
        if let Some(ep) = self.en_passant_square {
            hash ^= ZOBRIST.en_passant_keys[ep.file() as usize];
        }
        hash
    }

    /// True when the side still has anything besides pawns and the king.
    /// Gates null-move pruning against zugzwang-heavy endings.
    #[inline]
    pub(crate) fn has_non_pawn_material(&self, color: Color) -> bool {
        let c = color.index();
        self.pieces[c][Piece::Knight.index()]
            | self.pieces[c][Piece::Bishop.index()]
            | self.pieces[c][Piece::Rook.index()]
            | self.pieces[c][Piece::Queen.index()]
            != 0
    }

    /// How often the current position has occurred on the game-plus-line path.
    pub fn repetition_count(&self) -> u32 {
        self.repetition_counts.count(self.hash)
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_has_consistent_caches() {
        let board = Board::new();
        assert_eq!(board.all_occupied.count_ones(), 32);
        assert_eq!(board.king_square(Color::White), Square::new(0, 4));
        assert_eq!(board.king_square(Color::Black), Square::new(7, 4));
        assert_eq!(board.hash, board.calculate_initial_hash());
        assert_eq!(board.repetition_count(), 1);
        assert_eq!(
            board.piece_at(Square::new(0, 3)),
            Some((Color::White, Piece::Queen))
        );
        assert_eq!(board.piece_at(Square::new(4, 4)), None);
    }

    #[test]
    fn repetition_table_counts_up_and_down() {
        let mut table = RepetitionTable::default();
        table.increment(42);
        table.increment(42);
        assert_eq!(table.count(42), 2);
        table.decrement(42);
        assert_eq!(table.count(42), 1);
        table.decrement(42);
        assert_eq!(table.count(42), 0);
        // Decrementing an absent key is a no-op, not a panic.
        table.decrement(42);
        assert_eq!(table.count(42), 0);
    }

    #[test]
    fn put_and_remove_piece_toggle_the_hash() {
        let mut board = Board::new();
        let before = board.hash;
        board.put_piece(Color::White, Piece::Knight, Square::new(4, 4));
        assert_ne!(board.hash, before);
        board.remove_piece(Color::White, Piece::Knight, Square::new(4, 4));
        assert_eq!(board.hash, before);
    }
}
