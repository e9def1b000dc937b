//! Capture-only search below the nominal horizon.
//!
//! Resolves hanging tactics before the leaf is scored so that a depth-limited
//! search never stops in the middle of a capture sequence. The side to move
//! may always "stand pat" on the static evaluation, which models declining
//! every capture.

use crate::board::search::constants::{
    DELTA_PRUNING_MARGIN, LOSING_CAPTURE_MARGIN, MAX_QSEARCH_PLY, TT_MOVE_SCORE,
};
use crate::board::search::move_order::{mvv_lva, piece_value};
use crate::board::search::SearchContext;
use crate::board::ScoredMoveList;
use crate::tt::BoundType;

pub(crate) fn quiescence(
    ctx: &mut SearchContext,
    mut alpha: i32,
    beta: i32,
    ply: usize,
    qply: i32,
) -> i32 {
    ctx.state.stats.qnodes += 1;
    ctx.state.stats.seldepth = ctx.state.stats.seldepth.max(ply as u32);

    // Quiescence results are cached at negative depth so they can never
    // displace full-width data for a different position.
    let tt_depth = -1 - qply;
    let mut tt_move = None;
    if ctx.params.use_tt {
        let probe = ctx.state.tt.probe(ctx.board.hash(), tt_depth, alpha, beta);
        if let Some(score) = probe.score {
            return score;
        }
        tt_move = probe.best_move;
    }

    let stand_pat = ctx.board.evaluate();
    if qply >= MAX_QSEARCH_PLY {
        if ctx.params.use_tt {
            ctx.state
                .tt
                .store(ctx.board.hash(), tt_depth, stand_pat, BoundType::Exact, None);
        }
        return stand_pat;
    }
    if stand_pat >= beta {
        return beta;
    }
    if stand_pat > alpha {
        alpha = stand_pat;
    }

    let captures = ctx.board.generate_captures();
    let mut scored = ScoredMoveList::new(&captures, |m| {
        if tt_move == Some(*m) {
            TT_MOVE_SCORE
        } else {
            mvv_lva(m)
        }
    });
    scored.sort_desc();

    let mut best_move = None;
    for m in scored.moves() {
        if ctx.params.use_quiescence_pruning && m.promotion.is_none() {
            if let Some(victim) = m.captured {
                // Delta pruning: even winning the victim outright cannot
                // bring this line back to alpha.
                if stand_pat + piece_value(victim) + DELTA_PRUNING_MARGIN <= alpha {
                    continue;
                }
                // Apparently losing captures are not worth resolving when
                // the position is already behind.
                if piece_value(victim) < piece_value(m.piece)
                    && stand_pat + LOSING_CAPTURE_MARGIN <= alpha
                {
                    continue;
                }
            }
        }

        let prev = match ctx.board.make_move(&m) {
            Some(prev) => prev,
            None => continue,
        };
        let score = -quiescence(ctx, -beta, -alpha, ply + 1, qply + 1);
        ctx.board.unmake_move(&m, &prev);

        if score >= beta {
            if ctx.params.use_tt {
                ctx.state
                    .tt
                    .store(ctx.board.hash(), tt_depth, beta, BoundType::LowerBound, Some(m));
            }
            return beta;
        }
        if score > alpha {
            alpha = score;
            best_move = Some(m);
        }
    }

    if ctx.params.use_tt {
        if let Some(m) = best_move {
            ctx.state
                .tt
                .store(ctx.board.hash(), tt_depth, alpha, BoundType::Exact, Some(m));
        }
    }
    alpha
}

#[cfg(test)]
mod tests {
    use crate::board::search::{SearchContext, SearchParams, SearchState};
    use crate::board::Board;

    fn qsearch(fen: &str) -> i32 {
        let mut board = Board::from_fen(fen);
        let mut state = SearchState::with_tt_size(1);
        let mut ctx = SearchContext {
            board: &mut board,
            state: &mut state,
            params: SearchParams::default(),
        };
        super::quiescence(&mut ctx, -30_000, 30_000, 0, 0)
    }

    #[test]
    fn hanging_queen_is_not_scored_as_won_material() {
        // White queen on d4 en prise to the c6 knight, Black to move. Static
        // eval says Black is a queen down; quiescence plays Nxd4 with no
        // recapture and ends a knight up instead.
        let score = qsearch("4k3/8/2n5/8/3Q4/8/4K3/8 b - - 0 1");
        assert!(score > 100, "expected Black to win the queen, got {score}");
    }

    #[test]
    fn cached_scores_short_circuit_the_stand_pat() {
        use crate::tt::BoundType;

        let mut board = Board::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1");
        let mut state = SearchState::with_tt_size(1);
        state.tt.store(board.hash(), -1, 777, BoundType::Exact, None);
        let mut ctx = SearchContext {
            board: &mut board,
            state: &mut state,
            params: SearchParams::default(),
        };
        // The probe runs before any evaluation, so the cached score wins.
        assert_eq!(super::quiescence(&mut ctx, -30_000, 30_000, 0, 0), 777);
    }

    #[test]
    fn depth_capped_evals_land_in_the_table() {
        let mut board = Board::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1");
        let expected = board.evaluate();
        let mut state = SearchState::with_tt_size(1);
        let mut ctx = SearchContext {
            board: &mut board,
            state: &mut state,
            params: SearchParams::default(),
        };
        let score = super::quiescence(&mut ctx, -30_000, 30_000, 4, 4);
        assert_eq!(score, expected);
        let probe = state.tt.probe(board.hash(), -5, -30_000, 30_000);
        assert_eq!(probe.score, Some(expected));
    }

    #[test]
    fn stand_pat_floors_the_score() {
        // White to move is a rook up with no captures available; the score
        // must be at least the static advantage.
        let score = qsearch("4k3/8/8/8/8/8/8/R3K3 w - - 0 1");
        assert!(score > 300);
    }
}
