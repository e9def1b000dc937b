//! Pawn move generation: pushes, double pushes, captures, promotions, and
//! en passant.

use super::super::attack_tables::PAWN_ATTACKS;
use super::super::types::{bit, pop_lsb, Color, Move, MoveList, Piece, Square};
use super::super::Board;

impl Board {
    pub(super) fn generate_pawn_moves(&self, moves: &mut MoveList) {
        let us = self.side_to_move;
        let (forward, start_rank, promo_rank) = pawn_geometry(us);

        let mut pawns = self.colored(us, Piece::Pawn);
        while pawns != 0 {
            let from = Square(pop_lsb(&mut pawns) as u8);
            let push = Square((from.0 as i8 + forward) as u8);

            if self.all_occupied & bit(push) == 0 {
                if push.rank() == promo_rank {
                    push_promotions(Move::new(Piece::Pawn, from, push), moves);
                } else {
                    moves.push(Move::new(Piece::Pawn, from, push));
                    if from.rank() == start_rank {
                        let double = Square((push.0 as i8 + forward) as u8);
                        if self.all_occupied & bit(double) == 0 {
                            moves.push(Move::new(Piece::Pawn, from, double));
                        }
                    }
                }
            }

            self.pawn_captures_from(from, promo_rank, moves);
        }
    }

    /// Capture-only pawn moves plus quiet queen promotions, for quiescence.
    pub(super) fn generate_pawn_captures(&self, moves: &mut MoveList) {
        let us = self.side_to_move;
        let (forward, _, promo_rank) = pawn_geometry(us);

        let mut pawns = self.colored(us, Piece::Pawn);
        while pawns != 0 {
            let from = Square(pop_lsb(&mut pawns) as u8);

            self.pawn_captures_from(from, promo_rank, moves);

            // A quiet promotion is tactical enough to belong in quiescence;
            // only the queen is worth looking at there.
            let push = Square((from.0 as i8 + forward) as u8);
            if push.rank() == promo_rank && self.all_occupied & bit(push) == 0 {
                moves.push(Move {
                    promotion: Some(Piece::Queen),
                    ..Move::new(Piece::Pawn, from, push)
                });
            }
        }
    }

    fn pawn_captures_from(&self, from: Square, promo_rank: u8, moves: &mut MoveList) {
        let us = self.side_to_move;
        let enemy = us.opponent();
        let attacks = PAWN_ATTACKS[us.index()][from.index()];

        let mut targets = attacks & self.occupied[enemy.index()];
        while targets != 0 {
            let to = Square(pop_lsb(&mut targets) as u8);
            // The generator only aims at enemy-occupied squares, so the
            // occupant lookup cannot miss.
            if let Some(captured) = self.piece_of_on(enemy, to) {
                let m = Move::capture(Piece::Pawn, from, to, captured);
                if to.rank() == promo_rank {
                    push_promotions(m, moves);
                } else {
                    moves.push(m);
                }
            }
        }

        if let Some(ep) = self.en_passant_square {
            if attacks & bit(ep) != 0 {
                moves.push(Move {
                    captured: Some(Piece::Pawn),
                    en_passant: true,
                    ..Move::new(Piece::Pawn, from, ep)
                });
            }
        }
    }
}

/// (push direction, double-push source rank, promotion rank) per color.
const fn pawn_geometry(color: Color) -> (i8, u8, u8) {
    match color {
        Color::White => (8, 1, 7),
        Color::Black => (-8, 6, 0),
    }
}

/// Expands a last-rank move into the four promotion choices.
fn push_promotions(base: Move, moves: &mut MoveList) {
    for piece in Piece::PROMOTIONS {
        moves.push(Move {
            promotion: Some(piece),
            ..base
        });
    }
}
