//! Fail-hard negamax with alpha-beta pruning.

use std::time::Instant;

use crate::board::search::constants::{INFINITY, MATE_SCORE, MATE_THRESHOLD};
use crate::board::search::move_order::score_move;
use crate::board::search::quiescence::quiescence;
use crate::board::search::SearchContext;
use crate::board::{Move, ScoredMoveList, MAX_PLY};
use crate::tt::BoundType;

pub(crate) enum RootOutcome {
    /// The iteration finished; `None` means the side to move has no legal
    /// moves (checkmate or stalemate).
    Complete(Option<(Move, i32)>),
    /// The hard time limit fired mid-iteration; partial results are unsafe
    /// because unsearched moves may be better.
    Aborted,
}

/// One full-width iteration from the root. The deadline is polled between
/// root moves only; subtree cost is bounded well enough by the iterative
/// deepening schedule that finer-grained polling is not worth the overhead.
pub(crate) fn search_root(
    ctx: &mut SearchContext,
    depth: i32,
    deadline: Option<Instant>,
) -> RootOutcome {
    let mut alpha = -INFINITY;
    let beta = INFINITY;

    let tt_move = if ctx.params.use_tt {
        ctx.state.tt.probe_move(ctx.board.hash())
    } else {
        None
    };

    let pseudo = ctx.board.generate_pseudo_moves();
    let mut scored = ScoredMoveList::new(&pseudo, |m| {
        score_move(m, tt_move, &ctx.state.killers, &ctx.state.history, 0)
    });
    scored.sort_desc();

    let mut best: Option<(Move, i32)> = None;
    for m in scored.moves() {
        let prev = match ctx.board.make_move(&m) {
            Some(prev) => prev,
            None => continue,
        };
        let score = -alphabeta(ctx, depth - 1, -beta, -alpha, 1);
        ctx.board.unmake_move(&m, &prev);

        if let Some(deadline) = deadline {
            if Instant::now() >= deadline {
                return RootOutcome::Aborted;
            }
        }

        if best.map_or(true, |(_, s)| score > s) {
            best = Some((m, score));
            if score > alpha {
                alpha = score;
            }
        }
    }

    if let (true, Some((m, score))) = (ctx.params.use_tt, best) {
        ctx.state
            .tt
            .store(ctx.board.hash(), depth, score, BoundType::Exact, Some(m));
    }
    RootOutcome::Complete(best)
}

pub(crate) fn alphabeta(
    ctx: &mut SearchContext,
    depth: i32,
    mut alpha: i32,
    beta: i32,
    ply: usize,
) -> i32 {
    // The position on the board has already occurred twice before; a third
    // visit is a draw by repetition. Scored from the node's own perspective,
    // never from the root's.
    if ctx.board.repetition_count() >= 3 {
        return 0;
    }
    if depth <= 0 {
        return quiescence(ctx, alpha, beta, ply, 0);
    }
    if ply >= MAX_PLY {
        return ctx.board.evaluate();
    }
    ctx.state.stats.nodes += 1;

    let mut tt_move = None;
    if ctx.params.use_tt {
        let probe = ctx.state.tt.probe(ctx.board.hash(), depth, alpha, beta);
        if let Some(score) = probe.score {
            return score;
        }
        tt_move = probe.best_move;
    }

    let side = ctx.board.side_to_move();
    let in_check = ctx.board.is_in_check(side);

    // Null-move pruning: if passing still beats beta at reduced depth, the
    // real position almost certainly does too. Unsound in zugzwang, so it is
    // gated on non-pawn material, and never trusted near mate scores.
    if ctx.params.use_null_move
        && !in_check
        && depth >= 3
        && alpha.abs() < MATE_THRESHOLD
        && beta.abs() < MATE_THRESHOLD
        && ctx.board.has_non_pawn_material(side)
    {
        let r = if depth > 6 { 3 } else { 2 };
        let saved = ctx.board.make_null_move();
        let score = -alphabeta(ctx, depth - 1 - r, -beta, -beta + 1, ply + 1);
        ctx.board.unmake_null_move(saved);
        if score >= beta {
            return beta;
        }
    }

    let pseudo = ctx.board.generate_pseudo_moves();
    let mut scored = ScoredMoveList::new(&pseudo, |m| {
        score_move(m, tt_move, &ctx.state.killers, &ctx.state.history, ply)
    });
    scored.sort_desc();

    let mut legal_moves = 0;
    let mut best_move = None;
    for m in scored.moves() {
        let prev = match ctx.board.make_move(&m) {
            Some(prev) => prev,
            None => continue,
        };
        legal_moves += 1;

        // Late move reductions: quiet moves sorted far down the list rarely
        // raise alpha, so try them shallower first and re-search on surprise.
        let reduce = ctx.params.use_lmr
            && depth >= 3
            && legal_moves > 4
            && !in_check
            && m.is_quiet()
            && !ctx.state.killers.is_killer(ply, &m);
        let score = if reduce {
            let r = if legal_moves > 12 && depth >= 5 { 2 } else { 1 };
            let reduced = -alphabeta(ctx, depth - 1 - r, -alpha - 1, -alpha, ply + 1);
            if reduced > alpha {
                -alphabeta(ctx, depth - 1, -beta, -alpha, ply + 1)
            } else {
                reduced
            }
        } else {
            -alphabeta(ctx, depth - 1, -beta, -alpha, ply + 1)
        };
        ctx.board.unmake_move(&m, &prev);

        if score >= beta {
            if m.is_quiet() {
                ctx.state.killers.update(ply, m);
                ctx.state.history.update(&m, depth);
            }
            if ctx.params.use_tt {
                ctx.state
                    .tt
                    .store(ctx.board.hash(), depth, beta, BoundType::LowerBound, Some(m));
            }
            return beta;
        }
        if score > alpha {
            alpha = score;
            best_move = Some(m);
        }
    }

    if legal_moves == 0 {
        return if in_check {
            // Mate distance is measured from the root so shorter mates score
            // higher regardless of how much nominal depth remains.
            -MATE_SCORE + ply as i32
        } else {
            0
        };
    }

    if ctx.params.use_tt {
        let bound = if best_move.is_some() {
            BoundType::Exact
        } else {
            BoundType::UpperBound
        };
        ctx.state
            .tt
            .store(ctx.board.hash(), depth, alpha, bound, best_move);
    }
    alpha
}
