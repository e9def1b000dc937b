//! Move-ordering heuristics: MVV-LVA for captures, killer and history
//! bookkeeping for quiets.

use crate::board::pst::PIECE_VALUES;
use crate::board::search::constants::{
    CAPTURE_SCORE_BASE, HISTORY_MAX, KILLER_FIRST_SCORE, KILLER_SECOND_SCORE, TT_MOVE_SCORE,
};
use crate::board::{Move, Piece, MAX_PLY};

#[inline]
pub(crate) fn piece_value(piece: Piece) -> i32 {
    PIECE_VALUES[piece.index()]
}

/// Most-valuable-victim, least-valuable-attacker. Promotions score their
/// promoted piece as the attacker stand-in so queen promotions sort first
/// among equal victims.
#[inline]
pub(crate) fn mvv_lva(m: &Move) -> i32 {
    let victim = m.captured.map_or(0, piece_value);
    let attacker = piece_value(m.promotion.unwrap_or(m.piece));
    10 * victim - attacker
}

/// Two killer slots per ply, most recent first.
pub(crate) struct KillerTable {
    slots: [[Option<Move>; 2]; MAX_PLY],
}

impl KillerTable {
    pub(crate) fn new() -> KillerTable {
        KillerTable {
            slots: [[None; 2]; MAX_PLY],
        }
    }

    pub(crate) fn clear(&mut self) {
        self.slots = [[None; 2]; MAX_PLY];
    }

    #[inline]
    pub(crate) fn first(&self, ply: usize) -> Option<Move> {
        self.slots[ply][0]
    }

    #[inline]
    pub(crate) fn second(&self, ply: usize) -> Option<Move> {
        self.slots[ply][1]
    }

    pub(crate) fn is_killer(&self, ply: usize, m: &Move) -> bool {
        self.slots[ply][0] == Some(*m) || self.slots[ply][1] == Some(*m)
    }

    /// Records a quiet move that caused a beta cutoff.
    pub(crate) fn update(&mut self, ply: usize, m: Move) {
        if self.slots[ply][0] != Some(m) {
            self.slots[ply][1] = self.slots[ply][0];
            self.slots[ply][0] = Some(m);
        }
    }
}

/// From-to indexed butterfly table for quiet-move history.
pub(crate) struct HistoryTable {
    scores: [i32; 64 * 64],
}

impl HistoryTable {
    pub(crate) fn new() -> HistoryTable {
        HistoryTable {
            scores: [0; 64 * 64],
        }
    }

    pub(crate) fn clear(&mut self) {
        self.scores = [0; 64 * 64];
    }

    #[inline]
    fn slot(m: &Move) -> usize {
        m.from.index() * 64 + m.to.index()
    }

    #[inline]
    pub(crate) fn get(&self, m: &Move) -> i32 {
        self.scores[Self::slot(m)]
    }

    /// Depth-squared bonus. When any counter hits the cap the whole table is
    /// halved, preserving relative order while making room.
    pub(crate) fn update(&mut self, m: &Move, depth: i32) {
        let slot = Self::slot(m);
        self.scores[slot] += depth * depth;
        if self.scores[slot] >= HISTORY_MAX {
            for score in self.scores.iter_mut() {
                *score >>= 1;
            }
        }
    }

    /// Halves every counter so stale lines fade between searches.
    pub(crate) fn decay(&mut self) {
        for score in self.scores.iter_mut() {
            *score >>= 1;
        }
    }
}

/// Ordering score for a full-width node.
pub(crate) fn score_move(
    m: &Move,
    tt_move: Option<Move>,
    killers: &KillerTable,
    history: &HistoryTable,
    ply: usize,
) -> i32 {
    if tt_move == Some(*m) {
        return TT_MOVE_SCORE;
    }
    if m.is_capture() || m.promotion.is_some() {
        return CAPTURE_SCORE_BASE + mvv_lva(m);
    }
    if killers.first(ply) == Some(*m) {
        return KILLER_FIRST_SCORE;
    }
    if killers.second(ply) == Some(*m) {
        return KILLER_SECOND_SCORE;
    }
    history.get(m)
}
