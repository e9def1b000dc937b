//! Core value types: squares, colors, pieces, moves, and move lists.

use std::fmt;

/// One bit per square, little-endian rank-file mapping (a1 = bit 0, h8 = bit 63).
pub(crate) type Bitboard = u64;

/// Returns the single-bit mask for a square.
#[inline]
pub(crate) fn bit(sq: Square) -> Bitboard {
    1u64 << sq.0
}

/// Clears and returns the index of the lowest set bit.
#[inline]
pub(crate) fn pop_lsb(bb: &mut Bitboard) -> usize {
    let idx = bb.trailing_zeros() as usize;
    *bb &= *bb - 1;
    idx
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Color {
    White,
    Black,
}

impl Color {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    #[inline]
    pub const fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Piece {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl Piece {
    pub const ALL: [Piece; 6] = [
        Piece::Pawn,
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
        Piece::King,
    ];

    /// Promotion targets in the order they are emitted by move generation.
    pub const PROMOTIONS: [Piece; 4] = [Piece::Queen, Piece::Rook, Piece::Bishop, Piece::Knight];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Piece::Pawn => 0,
            Piece::Knight => 1,
            Piece::Bishop => 2,
            Piece::Rook => 3,
            Piece::Queen => 4,
            Piece::King => 5,
        }
    }

    /// Lowercase piece letter as used in FEN and UCI promotion suffixes.
    pub const fn to_char(self) -> char {
        match self {
            Piece::Pawn => 'p',
            Piece::Knight => 'n',
            Piece::Bishop => 'b',
            Piece::Rook => 'r',
            Piece::Queen => 'q',
            Piece::King => 'k',
        }
    }

    pub const fn from_char(ch: char) -> Option<Piece> {
        match ch {
            'p' => Some(Piece::Pawn),
            'n' => Some(Piece::Knight),
            'b' => Some(Piece::Bishop),
            'r' => Some(Piece::Rook),
            'q' => Some(Piece::Queen),
            'k' => Some(Piece::King),
            _ => None,
        }
    }
}

/// A board square as an index 0..64, rank-major from White's side.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Square(pub u8);

impl Square {
    #[inline]
    pub const fn new(rank: u8, file: u8) -> Square {
        Square(rank * 8 + file)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Rank 0..8, where 0 is rank 1.
    #[inline]
    pub const fn rank(self) -> u8 {
        self.0 / 8
    }

    /// File 0..8, where 0 is the a-file.
    #[inline]
    pub const fn file(self) -> u8 {
        self.0 % 8
    }

    /// Parses an algebraic square name such as `e4`.
    pub fn from_uci(s: &str) -> Option<Square> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let file = bytes[0].checked_sub(b'a')?;
        let rank = bytes[1].checked_sub(b'1')?;
        if file > 7 || rank > 7 {
            return None;
        }
        Some(Square::new(rank, file))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            (b'a' + self.file()) as char,
            (b'1' + self.rank()) as char
        )
    }
}

/// An immutable single-ply transition.
///
/// The captured piece is carried on the move itself so that unmake can restore
/// it without consulting any other state, and so that MVV-LVA ordering never
/// needs a board lookup. Ordering scores are deliberately *not* part of this
/// type; they live in [`ScoredMoveList`] and never affect move identity.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Move {
    /// The moving piece, before any promotion.
    pub piece: Piece,
    pub from: Square,
    pub to: Square,
    pub promotion: Option<Piece>,
    /// The captured piece type; for en-passant this is the pawn removed from
    /// behind the destination square.
    pub captured: Option<Piece>,
    pub castle_kingside: bool,
    pub castle_queenside: bool,
    pub en_passant: bool,
}

impl Move {
    pub const fn new(piece: Piece, from: Square, to: Square) -> Move {
        Move {
            piece,
            from,
            to,
            promotion: None,
            captured: None,
            castle_kingside: false,
            castle_queenside: false,
            en_passant: false,
        }
    }

    pub const fn capture(piece: Piece, from: Square, to: Square, captured: Piece) -> Move {
        Move {
            captured: Some(captured),
            ..Move::new(piece, from, to)
        }
    }

    #[inline]
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    #[inline]
    pub fn is_castle(&self) -> bool {
        self.castle_kingside || self.castle_queenside
    }

    /// Quiet moves are eligible for killer/history bookkeeping and LMR.
    #[inline]
    pub fn is_quiet(&self) -> bool {
        self.captured.is_none() && self.promotion.is_none()
    }

    /// UCI move notation: `e2e4`, `e7e8q`.
    pub fn to_uci(&self) -> String {
        match self.promotion {
            Some(p) => format!("{}{}{}", self.from, self.to, p.to_char()),
            None => format!("{}{}", self.from, self.to),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

pub(crate) const MAX_MOVES: usize = 256;

const FILLER_MOVE: Move = Move::new(Piece::Pawn, Square(0), Square(0));

/// Fixed-capacity move buffer; 256 covers any reachable position.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; MAX_MOVES],
    len: usize,
}

impl MoveList {
    pub fn new() -> MoveList {
        MoveList {
            moves: [FILLER_MOVE; MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, m: Move) {
        debug_assert!(self.len < MAX_MOVES);
        self.moves[self.len] = m;
        self.len += 1;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }
}

impl Default for MoveList {
    fn default() -> Self {
        MoveList::new()
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Moves paired with transient ordering scores, sortable in place.
pub(crate) struct ScoredMoveList {
    items: [(i32, Move); MAX_MOVES],
    len: usize,
}

impl ScoredMoveList {
    pub(crate) fn new(moves: &MoveList, mut scorer: impl FnMut(&Move) -> i32) -> ScoredMoveList {
        let mut items = [(0, FILLER_MOVE); MAX_MOVES];
        for (slot, m) in items.iter_mut().zip(moves.iter()) {
            *slot = (scorer(m), *m);
        }
        ScoredMoveList {
            items,
            len: moves.len(),
        }
    }

    pub(crate) fn sort_desc(&mut self) {
        self.items[..self.len].sort_unstable_by(|a, b| b.0.cmp(&a.0));
    }

    pub(crate) fn moves(&self) -> impl Iterator<Item = Move> + '_ {
        self.items[..self.len].iter().map(|(_, m)| *m)
    }
}
