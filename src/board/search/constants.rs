use crate::board::MAX_PLY;

/// Window bound; strictly larger than any score the search can produce.
pub(crate) const INFINITY: i32 = 32_000;

/// Score of delivering checkmate at the root. Mates found deeper in the tree
/// score `MATE_SCORE - ply`, so shorter mates always compare higher.
pub const MATE_SCORE: i32 = 30_000;

/// Scores at or beyond this magnitude are forced mates.
pub const MATE_THRESHOLD: i32 = MATE_SCORE - MAX_PLY as i32;

// Move-ordering tiers. Each tier dominates everything below it; history
// scores are capped so they can never reach the killer tier.
pub(crate) const TT_MOVE_SCORE: i32 = 2_000_000;
pub(crate) const CAPTURE_SCORE_BASE: i32 = 1_000_000;
pub(crate) const KILLER_FIRST_SCORE: i32 = 900_000;
pub(crate) const KILLER_SECOND_SCORE: i32 = 800_000;
pub(crate) const HISTORY_MAX: i32 = 700_000;

/// Quiescence explores at most this many plies beyond the nominal horizon.
pub(crate) const MAX_QSEARCH_PLY: i32 = 4;

/// Stand-pat margin: captures that cannot lift eval within this many
/// centipawns of alpha are pruned in quiescence.
pub(crate) const DELTA_PRUNING_MARGIN: i32 = 200;

/// Captures of a cheaper piece by a more expensive one are skipped in
/// quiescence when eval trails alpha by more than this.
pub(crate) const LOSING_CAPTURE_MARGIN: i32 = 100;
