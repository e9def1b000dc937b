//! Iterative-deepening search driver.
//!
//! [`find_best_move`] runs deepening iterations of fail-hard negamax
//! ([`alphabeta`]) until the depth or time budget is exhausted, keeping the
//! best move of the last *completed* iteration. All search-lifetime state
//! (transposition table, killers, history) lives in [`SearchState`] so a
//! caller can reuse it across moves of a game.

mod alphabeta;
mod constants;
mod move_order;
mod quiescence;

use std::time::{Duration, Instant};

use crate::board::{Board, Move};
use crate::tt::{TranspositionTable, DEFAULT_TT_MB};

use alphabeta::{search_root, RootOutcome};
use move_order::{HistoryTable, KillerTable};

pub use constants::{MATE_SCORE, MATE_THRESHOLD};

/// Node counters for one call to [`find_best_move`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SearchStats {
    /// Full-width interior nodes.
    pub nodes: u64,
    /// Quiescence nodes.
    pub qnodes: u64,
    /// Deepest ply reached, quiescence included.
    pub seldepth: u32,
}

/// Feature toggles, primarily for testing pruning against a reference
/// search. The default enables everything.
#[derive(Clone, Copy, Debug)]
pub struct SearchParams {
    pub use_tt: bool,
    pub use_null_move: bool,
    pub use_lmr: bool,
    /// Gates delta pruning and the losing-capture skip in quiescence. With
    /// every toggle off the search is plain alpha-beta, which visits fewer
    /// nodes than minimax but returns the identical value.
    pub use_quiescence_pruning: bool,
}

impl Default for SearchParams {
    fn default() -> Self {
        SearchParams {
            use_tt: true,
            use_null_move: true,
            use_lmr: true,
            use_quiescence_pruning: true,
        }
    }
}

impl SearchParams {
    pub fn all_disabled() -> Self {
        SearchParams {
            use_tt: false,
            use_null_move: false,
            use_lmr: false,
            use_quiescence_pruning: false,
        }
    }
}

/// Reusable search memory. Keep one per game: the transposition table and
/// history heuristic carry useful information from move to move.
pub struct SearchState {
    pub(crate) tt: TranspositionTable,
    pub(crate) killers: KillerTable,
    pub(crate) history: HistoryTable,
    pub(crate) stats: SearchStats,
}

impl SearchState {
    pub fn new() -> SearchState {
        SearchState::with_tt_size(DEFAULT_TT_MB)
    }

    pub fn with_tt_size(size_mb: usize) -> SearchState {
        SearchState {
            tt: TranspositionTable::new(size_mb),
            killers: KillerTable::new(),
            history: HistoryTable::new(),
            stats: SearchStats::default(),
        }
    }

    /// Counters from the most recent [`find_best_move`] call.
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Forgets everything, as for a new game.
    pub fn reset(&mut self) {
        self.tt.clear();
        self.killers.clear();
        self.history.clear();
        self.stats = SearchStats::default();
    }

    fn new_search(&mut self) {
        self.tt.new_search();
        self.killers.clear();
        self.history.decay();
        self.stats = SearchStats::default();
    }
}

impl Default for SearchState {
    fn default() -> Self {
        SearchState::new()
    }
}

pub(crate) struct SearchContext<'a> {
    pub(crate) board: &'a mut Board,
    pub(crate) state: &'a mut SearchState,
    pub(crate) params: SearchParams,
}

/// Per-iteration progress report passed to the [`find_best_move_with`]
/// callback, one per completed depth.
#[derive(Clone, Debug)]
pub struct SearchIterationInfo {
    pub depth: u32,
    /// Score in centipawns from the side to move's perspective.
    pub score: i32,
    /// Moves until mate when the score is a forced mate. Positive means the
    /// side to move mates, negative means it is mated.
    pub mate_in: Option<i32>,
    pub nodes: u64,
    pub nps: u64,
    pub time_ms: u64,
    /// Transposition table fill ratio in thousandths.
    pub hashfull: u32,
    pub pv: Vec<Move>,
    pub best_move: Move,
}

/// Searches with default parameters. `time_limit_ms` of 0 means no time
/// limit; the search runs to `max_depth`.
///
/// Returns `None` when the side to move has no legal moves.
pub fn find_best_move(
    board: &mut Board,
    state: &mut SearchState,
    max_depth: u32,
    time_limit_ms: u64,
) -> Option<Move> {
    find_best_move_with(
        board,
        state,
        SearchParams::default(),
        max_depth,
        time_limit_ms,
        None,
    )
}

pub fn find_best_move_with(
    board: &mut Board,
    state: &mut SearchState,
    params: SearchParams,
    max_depth: u32,
    time_limit_ms: u64,
    mut on_iteration: Option<&mut dyn FnMut(&SearchIterationInfo)>,
) -> Option<Move> {
    state.new_search();
    let start = Instant::now();
    let budget = match time_limit_ms {
        0 => None,
        ms => Some(Duration::from_millis(ms)),
    };
    let deadline = budget.map(|b| start + b);

    let mut best: Option<(Move, i32)> = None;
    for depth in 1..=max_depth.max(1) {
        // Starting an iteration that cannot finish wastes the remaining
        // budget; deeper iterations blow up faster, hence the growing factor.
        // Depth 1 is exempt: it always runs, so a legal move always comes
        // back no matter how small the budget.
        if depth > 1 {
            if let Some(budget) = budget {
                if start.elapsed() * (2 + depth / 4) > budget {
                    break;
                }
            }
        }

        let mut ctx = SearchContext {
            board: &mut *board,
            state: &mut *state,
            params,
        };
        // Depth 1 always runs to completion so the caller gets a legal move
        // even under an absurdly small budget.
        let iteration_deadline = if depth == 1 { None } else { deadline };
        let (m, score) = match search_root(&mut ctx, depth as i32, iteration_deadline) {
            RootOutcome::Aborted => break,
            RootOutcome::Complete(None) => return None,
            RootOutcome::Complete(Some(result)) => result,
        };
        best = Some((m, score));

        let elapsed = start.elapsed();
        let time_ms = elapsed.as_millis() as u64;
        let nodes = state.stats.nodes + state.stats.qnodes;
        let info = SearchIterationInfo {
            depth,
            score,
            mate_in: mate_distance(score),
            nodes,
            nps: nodes * 1000 / time_ms.max(1),
            time_ms,
            hashfull: state.tt.hashfull_per_mille(),
            pv: principal_variation(board, state, params, m, depth),
            best_move: m,
        };
        log::debug!(
            "depth {} score {} best {} nodes {} time {}ms pv {}",
            info.depth,
            info.score,
            info.best_move,
            info.nodes,
            info.time_ms,
            info.pv
                .iter()
                .map(|m| m.to_uci())
                .collect::<Vec<_>>()
                .join(" ")
        );
        if let Some(callback) = on_iteration.as_mut() {
            callback(&info);
        }

        // A forced mate cannot be improved by looking deeper.
        if score.abs() >= MATE_THRESHOLD {
            break;
        }
    }
    best.map(|(m, _)| m)
}

/// Converts a mate-distance score into full moves until mate.
fn mate_distance(score: i32) -> Option<i32> {
    if score >= MATE_THRESHOLD {
        Some((MATE_SCORE - score + 1) / 2)
    } else if score <= -MATE_THRESHOLD {
        Some(-((MATE_SCORE + score + 1) / 2))
    } else {
        None
    }
}

/// Walks the transposition table from the root, keeping only moves that are
/// legal in the position reached so far. Falls back to just the root move
/// when the table is disabled or the chain breaks immediately.
fn principal_variation(
    board: &mut Board,
    state: &SearchState,
    params: SearchParams,
    root_move: Move,
    max_len: u32,
) -> Vec<Move> {
    if !params.use_tt {
        return vec![root_move];
    }
    let mut pv = Vec::new();
    let mut undo = Vec::new();
    for _ in 0..max_len {
        let candidate = match state.tt.probe_move(board.hash()) {
            Some(m) => m,
            None => break,
        };
        if !board.generate_moves().contains(&candidate) {
            break;
        }
        match board.make_move(&candidate) {
            Some(prev) => {
                undo.push((candidate, prev));
                pv.push(candidate);
            }
            None => break,
        }
    }
    while let Some((m, prev)) = undo.pop() {
        board.unmake_move(&m, &prev);
    }
    if pv.is_empty() {
        pv.push(root_move);
    }
    pv
}
