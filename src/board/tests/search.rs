//! Search behavior tests. The centerpiece compares pruned alpha-beta
//! against a straightforward full-width negamax: with every speedup toggle
//! off the two must agree exactly, because fail-hard alpha-beta with a full
//! root window returns the minimax value.

use crate::board::search::{
    find_best_move, find_best_move_with, SearchParams, SearchState, MATE_SCORE, MATE_THRESHOLD,
};
use crate::board::{Board, Move};

fn search(fen: &str, depth: u32) -> Option<Move> {
    let mut board = Board::from_fen(fen);
    let mut state = SearchState::with_tt_size(1);
    find_best_move(&mut board, &mut state, depth, 0)
}

#[test]
fn finds_back_rank_mate_in_one() {
    let mut board = Board::from_fen("6k1/5ppp/8/8/8/8/8/R6K w - - 0 1");
    let mut state = SearchState::with_tt_size(1);
    let mut last_info = None;
    let best = find_best_move_with(
        &mut board,
        &mut state,
        SearchParams::default(),
        4,
        0,
        Some(&mut |info| last_info = Some(info.clone())),
    )
    .expect("White has moves");
    assert_eq!(best.to_uci(), "a1a8");
    let info = last_info.expect("at least one iteration completed");
    assert!(info.score >= MATE_THRESHOLD, "score was {}", info.score);
    assert_eq!(info.mate_in, Some(1));
    assert_eq!(info.score, MATE_SCORE - 1);
}

#[test]
fn prefers_the_faster_mate() {
    // Ladder position: Rb8 mates at once, and plenty of slower mates exist.
    // Depth 5 must still pick the immediate one.
    let fen = "7k/R7/1R6/8/8/8/8/7K w - - 0 1";
    let best = search(fen, 5).expect("White has moves");
    let mut board = Board::from_fen(fen);
    board.make_move(&best).expect("engine move must be legal");
    let replies = board.generate_moves();
    assert!(
        replies.is_empty() && board.is_in_check(board.side_to_move()),
        "{} is not an immediate mate",
        best.to_uci()
    );
}

#[test]
fn null_move_keeps_mate_distances_exact() {
    // Rook ladder, mate in two. The score must be the precise mate distance
    // even with null-move pruning active, which is skipped whenever either
    // window bound already carries a mate score.
    let mut board = Board::from_fen("7k/8/8/8/8/8/R7/1R5K w - - 0 1");
    let mut state = SearchState::with_tt_size(1);
    let mut last_info = None;
    find_best_move_with(
        &mut board,
        &mut state,
        SearchParams::default(),
        6,
        0,
        Some(&mut |info| last_info = Some(info.clone())),
    )
    .expect("White has moves");
    let info = last_info.expect("at least one iteration completed");
    assert_eq!(info.score, MATE_SCORE - 3, "score was {}", info.score);
    assert_eq!(info.mate_in, Some(2));
}

#[test]
fn stalemate_returns_no_move() {
    // Black to move: king in the corner, no legal moves, not in check.
    assert_eq!(search("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1", 4), None);
}

#[test]
fn checkmated_side_returns_no_move() {
    // Fool's mate delivered; White has no legal moves.
    assert_eq!(
        search(
            "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 2 3",
            4
        ),
        None
    );
}

#[test]
fn hanging_queen_is_captured() {
    // Black queen sits undefended on d5 with White to move.
    let best = search("4k3/8/8/3q4/8/8/3R4/4K3 w - - 0 1", 4).expect("White has moves");
    assert_eq!(best.to_uci(), "d2d5");
}

#[test]
fn search_leaves_the_board_unchanged() {
    let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    let mut board = Board::from_fen(fen);
    let before = board.clone();
    let mut state = SearchState::with_tt_size(1);
    find_best_move(&mut board, &mut state, 4, 0).expect("position has moves");
    assert_eq!(board, before);
    assert_eq!(board.hash(), board.calculate_initial_hash());
}

#[test]
fn iteration_callback_reports_each_depth() {
    let mut board = Board::new();
    let mut state = SearchState::with_tt_size(1);
    let mut depths = Vec::new();
    let best = find_best_move_with(
        &mut board,
        &mut state,
        SearchParams::default(),
        4,
        0,
        Some(&mut |info| {
            depths.push(info.depth);
            assert_eq!(info.pv.first(), Some(&info.best_move));
            assert!(info.nodes > 0);
        }),
    );
    assert!(best.is_some());
    assert_eq!(depths, vec![1, 2, 3, 4]);
}

#[test]
fn hard_time_limit_still_produces_a_move() {
    let mut board = Board::from_fen(
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    );
    let mut state = SearchState::with_tt_size(1);
    // One millisecond cannot cover a deep search, but depth 1 is exempt
    // from the deadline, so a move must still come back.
    let best = find_best_move(&mut board, &mut state, 64, 1);
    assert!(best.is_some());
}

// Reference implementations, deliberately naive.

fn reference_quiescence(board: &mut Board, qply: i32) -> i32 {
    let stand_pat = board.evaluate();
    if qply >= 4 {
        return stand_pat;
    }
    let mut best = stand_pat;
    let captures = board.generate_captures();
    for m in captures.iter() {
        let Some(prev) = board.make_move(m) else {
            continue;
        };
        best = best.max(-reference_quiescence(board, qply + 1));
        board.unmake_move(m, &prev);
    }
    best
}

fn reference_negamax(board: &mut Board, depth: i32, ply: i32) -> i32 {
    if board.repetition_count() >= 3 {
        return 0;
    }
    if depth <= 0 {
        return reference_quiescence(board, 0);
    }
    let mut best = None;
    let pseudo = board.generate_pseudo_moves();
    for m in pseudo.iter() {
        let Some(prev) = board.make_move(m) else {
            continue;
        };
        let score = -reference_negamax(board, depth - 1, ply + 1);
        board.unmake_move(m, &prev);
        best = Some(best.map_or(score, |b: i32| b.max(score)));
    }
    match best {
        Some(score) => score,
        None if board.is_in_check(board.side_to_move()) => -MATE_SCORE + ply,
        None => 0,
    }
}

#[test]
fn plain_alpha_beta_equals_full_width_negamax() {
    // Depth is capped on the capture-heavy positions to keep the unpruned
    // reference search affordable.
    let cases = [
        ("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", 3),
        (
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            2,
        ),
        ("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", 3),
        (
            "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
            2,
        ),
        ("4k3/8/8/3q4/8/8/3R4/4K3 b - - 0 1", 3),
    ];
    for (fen, depth) in cases {
        let mut board = Board::from_fen(fen);
        let expected = reference_negamax(&mut board, depth, 0);

        let mut state = SearchState::with_tt_size(1);
        let mut score = None;
        find_best_move_with(
            &mut board,
            &mut state,
            SearchParams::all_disabled(),
            depth as u32,
            0,
            Some(&mut |info| {
                if info.depth == depth as u32 {
                    score = Some(info.score);
                }
            }),
        );
        assert_eq!(score, Some(expected), "divergence on {fen}");
    }
}

#[test]
fn pruning_toggles_do_not_change_the_chosen_move() {
    // Positions with one clearly best move, so ordering noise between
    // configurations cannot flip the answer.
    let cases = [
        ("4k3/8/8/3q4/8/8/3R4/4K3 w - - 0 1", "d2d5"),
        ("6k1/5ppp/8/8/8/8/8/R6K w - - 0 1", "a1a8"),
    ];
    for (fen, expected) in cases {
        for params in [SearchParams::default(), SearchParams::all_disabled()] {
            let mut board = Board::from_fen(fen);
            let mut state = SearchState::with_tt_size(1);
            let best =
                find_best_move_with(&mut board, &mut state, params, 4, 0, None).expect("has moves");
            assert_eq!(best.to_uci(), expected, "params {params:?} on {fen}");
        }
    }
}

#[test]
fn tt_reuse_across_searches_is_consistent() {
    let mut board = Board::from_fen("4k3/8/8/3q4/8/8/3R4/4K3 w - - 0 1");
    let mut state = SearchState::with_tt_size(1);
    let first = find_best_move(&mut board, &mut state, 4, 0).expect("has moves");
    // Same state, same position: the warmed table must not change the answer.
    let second = find_best_move(&mut board, &mut state, 4, 0).expect("has moves");
    assert_eq!(first, second);
}
