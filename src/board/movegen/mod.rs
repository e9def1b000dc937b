//! Pseudo-legal move generation, attack detection, and perft.
//!
//! Generation is pseudo-legal: moves obey piece rules and occupancy but may
//! leave the mover's own king attacked. Legality is decided inside
//! `make_move`, which reverts and reports illegal moves; `generate_moves`
//! wraps the two for callers that want the fully legal list. Castling is the
//! one exception where attack checks happen at generation time, because the
//! transit squares are not covered by the king-safety check afterwards.

mod pawns;

use super::attack_tables::{
    bishop_attacks, queen_attacks, rook_attacks, KING_ATTACKS, KNIGHT_ATTACKS, PAWN_ATTACKS,
};
use super::state::castle_bit;
use super::types::{bit, pop_lsb, Bitboard, Color, Move, MoveList, Piece, Square};
use super::Board;

impl Board {
    /// All pseudo-legal moves for the side to move.
    pub fn generate_pseudo_moves(&self) -> MoveList {
        let mut moves = MoveList::new();
        self.generate_pawn_moves(&mut moves);
        self.generate_leaper_moves(Piece::Knight, &mut moves);
        self.generate_slider_moves(&mut moves);
        self.generate_leaper_moves(Piece::King, &mut moves);
        self.generate_castles(&mut moves);
        moves
    }

    /// The tactical subset used by quiescence search: captures (en passant
    /// included), capture-promotions, and quiet queen promotions. Behaviorally
    /// a subset of `generate_pseudo_moves` plus nothing else.
    pub fn generate_captures(&self) -> MoveList {
        let mut moves = MoveList::new();
        let us = self.side_to_move;
        let enemy_occ = self.occupied[us.opponent().index()];

        self.generate_pawn_captures(&mut moves);

        let mut knights = self.colored(us, Piece::Knight);
        while knights != 0 {
            let from = pop_lsb(&mut knights);
            let targets = KNIGHT_ATTACKS[from] & enemy_occ;
            self.push_targets(Piece::Knight, from, targets, &mut moves);
        }
        for (piece, attacks) in [
            (Piece::Bishop, bishop_attacks as fn(usize, Bitboard) -> Bitboard),
            (Piece::Rook, rook_attacks),
            (Piece::Queen, queen_attacks),
        ] {
            let mut bb = self.colored(us, piece);
            while bb != 0 {
                let from = pop_lsb(&mut bb);
                let targets = attacks(from, self.all_occupied) & enemy_occ;
                self.push_targets(piece, from, targets, &mut moves);
            }
        }
        let king = self.king_square(us).index();
        self.push_targets(Piece::King, king, KING_ATTACKS[king] & enemy_occ, &mut moves);

        moves
    }

    /// Fully legal moves, filtered through make/unmake.
    pub fn generate_moves(&mut self) -> Vec<Move> {
        let pseudo = self.generate_pseudo_moves();
        let mut legal = Vec::with_capacity(pseudo.len());
        for m in &pseudo {
            if self.try_move(m) {
                legal.push(*m);
            }
        }
        legal
    }

    fn generate_leaper_moves(&self, piece: Piece, moves: &mut MoveList) {
        let us = self.side_to_move;
        let own_occ = self.occupied[us.index()];
        let table: &[Bitboard; 64] = match piece {
            Piece::Knight => &KNIGHT_ATTACKS,
            Piece::King => &KING_ATTACKS,
            _ => unreachable!("not a leaper"),
        };
        let mut bb = self.colored(us, piece);
        while bb != 0 {
            let from = pop_lsb(&mut bb);
            self.push_targets(piece, from, table[from] & !own_occ, moves);
        }
    }

    fn generate_slider_moves(&self, moves: &mut MoveList) {
        let us = self.side_to_move;
        let own_occ = self.occupied[us.index()];
        for (piece, attacks) in [
            (Piece::Bishop, bishop_attacks as fn(usize, Bitboard) -> Bitboard),
            (Piece::Rook, rook_attacks),
            (Piece::Queen, queen_attacks),
        ] {
            let mut bb = self.colored(us, piece);
            while bb != 0 {
                let from = pop_lsb(&mut bb);
                let targets = attacks(from, self.all_occupied) & !own_occ;
                self.push_targets(piece, from, targets, moves);
            }
        }
    }

    /// Emits a move per target bit, deriving any captured piece from the board.
    fn push_targets(&self, piece: Piece, from: usize, mut targets: Bitboard, moves: &mut MoveList) {
        let enemy = self.side_to_move.opponent();
        let from = Square(from as u8);
        while targets != 0 {
            let to = Square(pop_lsb(&mut targets) as u8);
            match self.piece_of_on(enemy, to) {
                Some(captured) => moves.push(Move::capture(piece, from, to, captured)),
                None => moves.push(Move::new(piece, from, to)),
            }
        }
    }

    /// Castling: gated on the right, the rook still sitting on its corner, an
    /// empty path, and none of the king's current/transit/destination squares
    /// being attacked. Castling out of check is therefore never emitted.
    fn generate_castles(&self, moves: &mut MoveList) {
        let us = self.side_to_move;
        let them = us.opponent();
        let back = if us == Color::White { 0u8 } else { 56u8 };
        if self.king_square(us) != Square(back + 4) {
            return;
        }

        if self.castling_rights & castle_bit(us, true) != 0
            && self.colored(us, Piece::Rook) & bit(Square(back + 7)) != 0
            && self.all_occupied & (bit(Square(back + 5)) | bit(Square(back + 6))) == 0
            && !self.is_square_attacked(Square(back + 4), them)
            && !self.is_square_attacked(Square(back + 5), them)
            && !self.is_square_attacked(Square(back + 6), them)
        {
            moves.push(Move {
                castle_kingside: true,
                ..Move::new(Piece::King, Square(back + 4), Square(back + 6))
            });
        }

        if self.castling_rights & castle_bit(us, false) != 0
            && self.colored(us, Piece::Rook) & bit(Square(back)) != 0
            && self.all_occupied
                & (bit(Square(back + 1)) | bit(Square(back + 2)) | bit(Square(back + 3)))
                == 0
            && !self.is_square_attacked(Square(back + 4), them)
            && !self.is_square_attacked(Square(back + 3), them)
            && !self.is_square_attacked(Square(back + 2), them)
        {
            moves.push(Move {
                castle_queenside: true,
                ..Move::new(Piece::King, Square(back + 4), Square(back + 2))
            });
        }
    }

    /// True if any piece of `by` pseudo-attacks `sq`. Correct for empty
    /// squares too; castling-path and king-safety checks rely on that.
    pub fn is_square_attacked(&self, sq: Square, by: Color) -> bool {
        let idx = sq.index();
        let b = by.index();

        // A pawn of `by` attacks sq iff a pawn of the other color standing on
        // sq would attack the pawn's square.
        if PAWN_ATTACKS[by.opponent().index()][idx] & self.pieces[b][Piece::Pawn.index()] != 0 {
            return true;
        }
        if KNIGHT_ATTACKS[idx] & self.pieces[b][Piece::Knight.index()] != 0 {
            return true;
        }
        let bishop_like =
            self.pieces[b][Piece::Bishop.index()] | self.pieces[b][Piece::Queen.index()];
        if bishop_like != 0 && bishop_attacks(idx, self.all_occupied) & bishop_like != 0 {
            return true;
        }
        let rook_like =
            self.pieces[b][Piece::Rook.index()] | self.pieces[b][Piece::Queen.index()];
        if rook_like != 0 && rook_attacks(idx, self.all_occupied) & rook_like != 0 {
            return true;
        }
        KING_ATTACKS[idx] & self.pieces[b][Piece::King.index()] != 0
    }

    #[inline]
    pub fn is_in_check(&self, color: Color) -> bool {
        self.is_square_attacked(self.king_square(color), color.opponent())
    }

    /// Counts leaf positions reachable in exactly `depth` plies, legal lines
    /// only. The primary correctness oracle for move generation.
    pub fn perft(&mut self, depth: u32) -> u64 {
        if depth == 0 {
            return 1;
        }
        let moves = self.generate_pseudo_moves();
        let mut nodes = 0;
        for m in &moves {
            if let Some(prev) = self.make_move(m) {
                nodes += if depth == 1 { 1 } else { self.perft(depth - 1) };
                self.unmake_move(m, &prev);
            }
        }
        nodes
    }

    /// Per-root-move perft breakdown, the usual movegen debugging aid.
    pub fn perft_divide(&mut self, depth: u32) -> Vec<(Move, u64)> {
        assert!(depth > 0);
        let moves = self.generate_pseudo_moves();
        let mut counts = Vec::new();
        for m in &moves {
            if let Some(prev) = self.make_move(m) {
                counts.push((*m, self.perft(depth - 1)));
                self.unmake_move(m, &prev);
            }
        }
        counts
    }
}
