//! End-to-end exercises of the public crate surface: parse a position, play
//! moves in UCI notation, search it, and count nodes.

use garnet_chess::{find_best_move, find_best_move_with, Board, SearchParams, SearchState};

#[test]
fn play_a_few_opening_moves_and_search() {
    let mut board = Board::new();
    for uci in ["e2e4", "e7e5", "g1f3", "b8c6"] {
        board.make_move_uci(uci).expect("book move is legal");
    }

    let mut state = SearchState::new();
    let best = find_best_move(&mut board, &mut state, 4, 0).expect("position has moves");
    assert!(
        board.generate_moves().contains(&best),
        "engine suggested the illegal move {best}"
    );
    assert!(state.stats().nodes > 0);
}

#[test]
fn fen_positions_round_trip_through_the_api() {
    let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    let board = Board::try_from_fen(fen).expect("valid FEN");
    assert_eq!(board.to_fen(), fen);

    let parsed: Board = fen.parse().expect("FromStr agrees with try_from_fen");
    assert_eq!(parsed, board);
}

#[test]
fn bad_fen_is_rejected_not_panicked_on() {
    assert!(Board::try_from_fen("not a position").is_err());
    assert!(Board::try_from_fen("8/8/8/8/8/8/8/8 w - - 0 1").is_err());
}

#[test]
fn perft_from_the_initial_position() {
    let mut board = Board::new();
    assert_eq!(board.perft(3), 8_902);
}

#[test]
fn search_progress_is_reported_per_depth() {
    let mut board = Board::new();
    let mut state = SearchState::new();
    let mut reports = Vec::new();
    find_best_move_with(
        &mut board,
        &mut state,
        SearchParams::default(),
        3,
        0,
        Some(&mut |info| reports.push((info.depth, info.best_move))),
    )
    .expect("startpos has moves");
    assert_eq!(
        reports.iter().map(|(d, _)| *d).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
}

#[test]
fn scholars_mate_is_punished() {
    // After 1.e4 e5 2.Qh5 Nc6 3.Bc4, Black must cover f7 or lose on the
    // spot; at depth 4 the engine must not play a move that allows Qxf7#.
    let mut board = Board::try_from_fen(
        "r1bqkbnr/pppp1ppp/2n5/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 4 3",
    )
    .expect("valid FEN");
    let mut state = SearchState::new();
    let best = find_best_move(&mut board, &mut state, 4, 0).expect("Black has moves");

    let prev = board.make_move(&best).expect("engine move is legal");
    let refutation = board.parse_move("h5f7");
    let mated = match refutation {
        Ok(m) => {
            let inner = board.make_move(&m).expect("parse_move only returns legal moves");
            let mate = board.generate_moves().is_empty();
            board.unmake_move(&m, &inner);
            mate
        }
        Err(_) => false,
    };
    board.unmake_move(&best, &prev);
    assert!(!mated, "{best} allows Qxf7 mate");
}
