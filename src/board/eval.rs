//! Static evaluation.
//!
//! Every term is computed as an explicit `(midgame, endgame)` pair per color;
//! the pairs are combined White-minus-Black, tapered by a 0..24 phase counter,
//! and finally flipped to the side to move's perspective as negamax requires.
//! The function is pure over the board state and the read-only tables in
//! [`super::pst`].

use super::attack_tables::{
    bishop_attacks, queen_attacks, rook_attacks, KING_ATTACKS, KNIGHT_ATTACKS, PAWN_ATTACKS,
};
use super::pst::{MATERIAL_EG, MATERIAL_MG, MAX_PHASE, PHASE_WEIGHTS, PST_EG, PST_MG};
use super::types::{bit, pop_lsb, Bitboard, Color, Piece, Square};
use super::Board;

const BISHOP_PAIR_BONUS: i32 = 30;
const ROOK_OPEN_FILE_BONUS: i32 = 15;
const ROOK_SEMI_OPEN_FILE_BONUS: i32 = 7;
const ROOK_SEVENTH_RANK_BONUS: i32 = 12;
const KNIGHT_OUTPOST_BONUS: i32 = 18;
const QUEEN_MOBILITY_WEIGHT: i32 = 2;
const ISOLATED_PAWN_PENALTY: i32 = 12;
const DOUBLED_PAWN_PENALTY: i32 = 12;
const PASSED_PAWN_BASE: i32 = 10;
const PASSED_PAWN_RANK_BONUS: i32 = 7;
const KING_SHIELD_PENALTY: i32 = 12;
const KING_OPEN_FILE_PENALTY: i32 = 15;
const KING_ZONE_ATTACK_WEIGHT: i32 = 4;
const REPETITION_NUDGE: i32 = 12;

const FILE_A: Bitboard = 0x0101_0101_0101_0101;

#[inline]
fn file_mask(file: u8) -> Bitboard {
    FILE_A << file
}

/// Files adjacent to `file`, the file itself excluded.
#[inline]
fn neighbor_files(file: u8) -> Bitboard {
    let mut mask = 0;
    if file > 0 {
        mask |= file_mask(file - 1);
    }
    if file < 7 {
        mask |= file_mask(file + 1);
    }
    mask
}

/// All squares strictly ahead of `sq` from `color`'s point of view.
#[inline]
fn ahead_mask(color: Color, sq: Square) -> Bitboard {
    match color {
        Color::White => !0u64 << (8 * (sq.rank() as u32 + 1)),
        Color::Black => (1u64 << (8 * sq.rank() as u32)) - 1,
    }
}

/// Rank 0..8 counted from `color`'s own back rank.
#[inline]
fn relative_rank(color: Color, sq: Square) -> u8 {
    match color {
        Color::White => sq.rank(),
        Color::Black => 7 - sq.rank(),
    }
}

impl Board {
    /// Static score in centipawns from the side to move's perspective.
    pub fn evaluate(&self) -> i32 {
        let (white_mg, white_eg) = self.color_terms(Color::White);
        let (black_mg, black_eg) = self.color_terms(Color::Black);

        let mg = white_mg - black_mg;
        let eg = white_eg - black_eg;
        let phase = self.game_phase();
        let mut score = (mg * phase + eg * (MAX_PHASE - phase)) / MAX_PHASE;

        if self.side_to_move == Color::Black {
            score = -score;
        }

        // The third occurrence is an exact draw handled by search; at two the
        // score is only nudged so the engine steers away from repeating.
        if self.repetition_counts.count(self.hash) >= 2 {
            score -= REPETITION_NUDGE;
        }

        score
    }

    /// Remaining-material phase counter, 24 = full board, 0 = bare endgame.
    fn game_phase(&self) -> i32 {
        let mut phase = 0;
        for color in [Color::White, Color::Black] {
            for piece in Piece::ALL {
                let count = self.colored(color, piece).count_ones() as i32;
                phase += count * PHASE_WEIGHTS[piece.index()];
            }
        }
        phase.min(MAX_PHASE)
    }

    fn color_terms(&self, color: Color) -> (i32, i32) {
        let (mut mg, mut eg) = self.material_and_pst(color);

        if self.colored(color, Piece::Bishop).count_ones() >= 2 {
            mg += BISHOP_PAIR_BONUS;
            eg += BISHOP_PAIR_BONUS;
        }

        let (rook_mg, rook_eg) = self.rook_terms(color);
        mg += rook_mg;
        eg += rook_eg;

        let (knight_mg, knight_eg) = self.knight_terms(color);
        mg += knight_mg;
        eg += knight_eg;

        let (queen_mg, queen_eg) = self.queen_terms(color);
        mg += queen_mg;
        eg += queen_eg;

        let (pawn_mg, pawn_eg) = self.pawn_terms(color);
        mg += pawn_mg;
        eg += pawn_eg;

        let (king_mg, king_eg) = self.king_safety(color);
        mg += king_mg;
        eg += king_eg;

        (mg, eg)
    }

    fn material_and_pst(&self, color: Color) -> (i32, i32) {
        let mut mg = 0;
        let mut eg = 0;
        for piece in Piece::ALL {
            let idx = piece.index();
            let mut bb = self.colored(color, piece);
            while bb != 0 {
                let sq = pop_lsb(&mut bb);
                let pst_sq = if color == Color::White { sq } else { sq ^ 56 };
                mg += MATERIAL_MG[idx] + PST_MG[idx][pst_sq];
                eg += MATERIAL_EG[idx] + PST_EG[idx][pst_sq];
            }
        }
        (mg, eg)
    }

    fn rook_terms(&self, color: Color) -> (i32, i32) {
        let own_pawns = self.colored(color, Piece::Pawn);
        let enemy_pawns = self.colored(color.opponent(), Piece::Pawn);
        let mut mg = 0;
        let mut eg = 0;

        let mut rooks = self.colored(color, Piece::Rook);
        while rooks != 0 {
            let sq = Square(pop_lsb(&mut rooks) as u8);
            let file = file_mask(sq.file());
            if file & (own_pawns | enemy_pawns) == 0 {
                mg += ROOK_OPEN_FILE_BONUS;
                eg += ROOK_OPEN_FILE_BONUS;
            } else if file & own_pawns == 0 {
                mg += ROOK_SEMI_OPEN_FILE_BONUS;
                eg += ROOK_SEMI_OPEN_FILE_BONUS;
            }
            if relative_rank(color, sq) == 6 {
                mg += ROOK_SEVENTH_RANK_BONUS;
                eg += ROOK_SEVENTH_RANK_BONUS;
            }
        }
        (mg, eg)
    }

    /// Outpost knights: pawn-protected, on ranks 4..6 relative to the owner,
    /// and not evictable by an enemy pawn advance.
    fn knight_terms(&self, color: Color) -> (i32, i32) {
        let enemy = color.opponent();
        let own_pawns = self.colored(color, Piece::Pawn);
        let enemy_pawns = self.colored(enemy, Piece::Pawn);
        let mut mg = 0;

        let mut knights = self.colored(color, Piece::Knight);
        while knights != 0 {
            let sq = Square(pop_lsb(&mut knights) as u8);
            if !(3..=5).contains(&relative_rank(color, sq)) {
                continue;
            }
            let defended = PAWN_ATTACKS[enemy.index()][sq.index()] & own_pawns != 0;
            let attackable =
                enemy_pawns & ahead_mask(color, sq) & neighbor_files(sq.file()) != 0;
            if defended && !attackable {
                mg += KNIGHT_OUTPOST_BONUS;
            }
        }
        (mg, mg / 2)
    }

    fn queen_terms(&self, color: Color) -> (i32, i32) {
        let own_occ = self.occupied[color.index()];
        let mut mg = 0;

        let mut queens = self.colored(color, Piece::Queen);
        while queens != 0 {
            let sq = pop_lsb(&mut queens);
            let reach = queen_attacks(sq, self.all_occupied) & !own_occ;
            mg += reach.count_ones() as i32 * QUEEN_MOBILITY_WEIGHT;
        }
        (mg, mg)
    }

    fn pawn_terms(&self, color: Color) -> (i32, i32) {
        let own_pawns = self.colored(color, Piece::Pawn);
        let enemy_pawns = self.colored(color.opponent(), Piece::Pawn);
        let mut mg = 0;
        let mut eg = 0;

        for file in 0..8u8 {
            let on_file = (own_pawns & file_mask(file)).count_ones() as i32;
            if on_file == 0 {
                continue;
            }
            if own_pawns & neighbor_files(file) == 0 {
                mg -= ISOLATED_PAWN_PENALTY;
                eg -= ISOLATED_PAWN_PENALTY;
            }
            if on_file > 1 {
                mg -= DOUBLED_PAWN_PENALTY * (on_file - 1);
                eg -= DOUBLED_PAWN_PENALTY * (on_file - 1);
            }
        }

        let mut pawns = own_pawns;
        while pawns != 0 {
            let sq = Square(pop_lsb(&mut pawns) as u8);
            let front = ahead_mask(color, sq) & (file_mask(sq.file()) | neighbor_files(sq.file()));
            if enemy_pawns & front == 0 {
                let bonus =
                    PASSED_PAWN_BASE + relative_rank(color, sq) as i32 * PASSED_PAWN_RANK_BONUS;
                mg += bonus;
                // A passer is worth more once the pieces come off.
                eg += bonus * 2;
            }
        }

        (mg, eg)
    }

    /// Pawn shield, open files next to the king, and enemy pressure on the
    /// king zone. Midgame-weighted; the endgame king wants activity instead,
    /// which the king PST already encodes.
    fn king_safety(&self, color: Color) -> (i32, i32) {
        let king = self.king_square(color);
        let own_pawns = self.colored(color, Piece::Pawn);
        let mut mg = 0;

        if relative_rank(color, king) <= 1 {
            // The shield is the two ranks directly ahead of the king.
            let shield_zone = ahead_mask(color, king)
                & !ahead_mask(
                    color,
                    Square(match color {
                        Color::White => king.0 + 16,
                        Color::Black => king.0 - 16,
                    }),
                );
            let low = king.file().saturating_sub(1);
            let high = (king.file() + 1).min(7);
            for file in low..=high {
                if own_pawns & file_mask(file) & shield_zone == 0 {
                    mg -= KING_SHIELD_PENALTY;
                }
                if own_pawns & file_mask(file) == 0 {
                    mg -= KING_OPEN_FILE_PENALTY;
                }
            }
        }

        mg -= self.king_zone_pressure(color) * KING_ZONE_ATTACK_WEIGHT;
        (mg, 0)
    }

    /// Weighted count of enemy attacks landing in the king's neighborhood.
    fn king_zone_pressure(&self, color: Color) -> i32 {
        let enemy = color.opponent();
        let king = self.king_square(color).index();
        let zone = KING_ATTACKS[king] | bit(Square(king as u8));
        let occ = self.all_occupied;
        let mut units = 0;

        let mut pawns = self.colored(enemy, Piece::Pawn);
        while pawns != 0 {
            let sq = pop_lsb(&mut pawns);
            units += (PAWN_ATTACKS[enemy.index()][sq] & zone).count_ones() as i32;
        }
        let mut knights = self.colored(enemy, Piece::Knight);
        while knights != 0 {
            let sq = pop_lsb(&mut knights);
            units += 2 * (KNIGHT_ATTACKS[sq] & zone).count_ones() as i32;
        }
        let mut bishops = self.colored(enemy, Piece::Bishop);
        while bishops != 0 {
            let sq = pop_lsb(&mut bishops);
            units += 2 * (bishop_attacks(sq, occ) & zone).count_ones() as i32;
        }
        let mut rooks = self.colored(enemy, Piece::Rook);
        while rooks != 0 {
            let sq = pop_lsb(&mut rooks);
            units += 3 * (rook_attacks(sq, occ) & zone).count_ones() as i32;
        }
        let mut queens = self.colored(enemy, Piece::Queen);
        while queens != 0 {
            let sq = pop_lsb(&mut queens);
            units += 4 * (queen_attacks(sq, occ) & zone).count_ones() as i32;
        }
        units
    }
}
