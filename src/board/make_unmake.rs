//! Make/unmake: the core state transition and its exact inverse.

use crate::zobrist::ZOBRIST;

use super::state::{castle_bit, Gamestate, NullState};
use super::types::{Color, Move, Piece, Square};
use super::Board;

impl Board {
    /// Applies a pseudo-legal move.
    ///
    /// Returns the pre-move snapshot on success. If the move would leave the
    /// mover's own king attacked it is illegal: the board is already restored
    /// and `None` is returned. Callers in the search simply skip such moves.
    pub fn make_move(&mut self, m: &Move) -> Option<Gamestate> {
        let prev = self.snapshot();
        self.apply(m, &prev);

        let mover = prev.side_to_move;
        if self.is_square_attacked(self.king_squares[mover.index()], mover.opponent()) {
            self.unmake_move(m, &prev);
            return None;
        }
        Some(prev)
    }

    /// Restores the exact pre-move state: scalars verbatim from the snapshot
    /// (the hash included; it is never recomputed on undo), piece placement by
    /// inverting the move, and the repetition count of the key being left.
    pub fn unmake_move(&mut self, m: &Move, prev: &Gamestate) {
        self.repetition_counts.decrement(self.hash);

        let mover = prev.side_to_move;
        let enemy = mover.opponent();

        if m.is_castle() {
            let back = if mover == Color::White { 0 } else { 56 };
            let (rook_from, rook_to) = if m.castle_kingside {
                (Square(back + 7), Square(back + 5))
            } else {
                (Square(back), Square(back + 3))
            };
            self.move_piece(mover, Piece::King, m.to, m.from);
            self.move_piece(mover, Piece::Rook, rook_to, rook_from);
        } else if m.en_passant {
            self.move_piece(mover, Piece::Pawn, m.to, m.from);
            self.put_piece(enemy, Piece::Pawn, ep_captured_square(mover, m.to));
        } else {
            let placed = m.promotion.unwrap_or(m.piece);
            self.remove_piece(mover, placed, m.to);
            self.put_piece(mover, m.piece, m.from);
            if let Some(captured) = m.captured {
                self.put_piece(enemy, captured, m.to);
            }
        }

        self.side_to_move = prev.side_to_move;
        self.en_passant_square = prev.en_passant_square;
        self.castling_rights = prev.castling_rights;
        self.king_squares = prev.king_squares;
        self.halfmove_clock = prev.halfmove_clock;
        self.fullmove_number = prev.fullmove_number;
        self.hash = prev.hash;
    }

    /// Tests legality without keeping the move made.
    pub fn try_move(&mut self, m: &Move) -> bool {
        match self.make_move(m) {
            Some(prev) => {
                self.unmake_move(m, &prev);
                true
            }
            None => false,
        }
    }

    fn apply(&mut self, m: &Move, prev: &Gamestate) {
        let mover = self.side_to_move;
        let enemy = mover.opponent();

        self.hash ^= ZOBRIST.black_to_move_key;
        if let Some(ep) = self.en_passant_square.take() {
            self.hash ^= ZOBRIST.en_passant_keys[ep.file() as usize];
        }

        if m.is_castle() {
            // King and rook relocate in one step; both rights go away.
            let back = if mover == Color::White { 0 } else { 56 };
            let (rook_from, rook_to) = if m.castle_kingside {
                (Square(back + 7), Square(back + 5))
            } else {
                (Square(back), Square(back + 3))
            };
            self.move_piece(mover, Piece::King, m.from, m.to);
            self.move_piece(mover, Piece::Rook, rook_from, rook_to);
            self.king_squares[mover.index()] = m.to;
            self.castling_rights &= !(castle_bit(mover, true) | castle_bit(mover, false));
        } else if m.en_passant {
            // The captured pawn sits behind the destination, not on it.
            self.remove_piece(enemy, Piece::Pawn, ep_captured_square(mover, m.to));
            self.move_piece(mover, Piece::Pawn, m.from, m.to);
        } else {
            if let Some(captured) = m.captured {
                self.remove_piece(enemy, captured, m.to);
                // Capturing a rook on its home corner kills that right even if
                // the rook never moved.
                self.revoke_corner_right(enemy, m.to);
            }
            self.remove_piece(mover, m.piece, m.from);
            self.put_piece(mover, m.promotion.unwrap_or(m.piece), m.to);

            match m.piece {
                Piece::King => {
                    self.king_squares[mover.index()] = m.to;
                    self.castling_rights &=
                        !(castle_bit(mover, true) | castle_bit(mover, false));
                }
                Piece::Rook => self.revoke_corner_right(mover, m.from),
                Piece::Pawn => {
                    if m.from.rank().abs_diff(m.to.rank()) == 2 {
                        let target = Square((m.from.0 + m.to.0) / 2);
                        self.en_passant_square = Some(target);
                        self.hash ^= ZOBRIST.en_passant_keys[target.file() as usize];
                    }
                }
                _ => {}
            }
        }

        // Rights are hashed as boolean toggles: XOR only the flags that
        // actually changed this move.
        let changed = self.castling_rights ^ prev.castling_rights;
        for flag in 0..4 {
            if changed & (1 << flag) != 0 {
                self.hash ^= ZOBRIST.castling_keys[flag];
            }
        }

        if m.piece == Piece::Pawn || m.captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        if mover == Color::Black {
            self.fullmove_number += 1;
        }

        self.side_to_move = enemy;
        self.repetition_counts.increment(self.hash);
    }

    /// Passes the turn: flips the side, drops any en-passant right, and keeps
    /// the hash in step. Used by null-move pruning only.
    pub(crate) fn make_null_move(&mut self) -> NullState {
        let saved = NullState {
            en_passant_square: self.en_passant_square,
            hash: self.hash,
        };
        self.hash ^= ZOBRIST.black_to_move_key;
        if let Some(ep) = self.en_passant_square.take() {
            self.hash ^= ZOBRIST.en_passant_keys[ep.file() as usize];
        }
        self.side_to_move = self.side_to_move.opponent();
        saved
    }

    pub(crate) fn unmake_null_move(&mut self, saved: NullState) {
        self.side_to_move = self.side_to_move.opponent();
        self.en_passant_square = saved.en_passant_square;
        self.hash = saved.hash;
    }

    fn revoke_corner_right(&mut self, color: Color, sq: Square) {
        let back = if color == Color::White { 0 } else { 56 };
        if sq.0 == back {
            self.castling_rights &= !castle_bit(color, false);
        } else if sq.0 == back + 7 {
            self.castling_rights &= !castle_bit(color, true);
        }
    }
}

/// Square of the pawn removed by an en-passant capture landing on `to`.
#[inline]
fn ep_captured_square(mover: Color, to: Square) -> Square {
    match mover {
        Color::White => Square(to.0 - 8),
        Color::Black => Square(to.0 + 8),
    }
}
