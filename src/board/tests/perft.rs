//! Perft node counts against published reference values. These exercise
//! every movegen and make/unmake path: castling through attacked squares,
//! en passant (including pins revealed by the double removal), promotions
//! with and without capture, and all check evasion shapes.

use crate::board::Board;

struct PerftPosition {
    name: &'static str,
    fen: &'static str,
    expected: &'static [u64],
}

const POSITIONS: &[PerftPosition] = &[
    PerftPosition {
        name: "startpos",
        fen: "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        expected: &[20, 400, 8_902, 197_281],
    },
    PerftPosition {
        name: "kiwipete",
        fen: "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        expected: &[48, 2_039, 97_862],
    },
    PerftPosition {
        name: "endgame pins",
        fen: "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        expected: &[14, 191, 2_812, 43_238],
    },
    PerftPosition {
        name: "promotion heavy",
        fen: "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
        expected: &[6, 264, 9_467],
    },
    PerftPosition {
        name: "talkchess bug catcher",
        fen: "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
        expected: &[44, 1_486, 62_379],
    },
];

#[test]
fn perft_matches_reference_counts() {
    for position in POSITIONS {
        let mut board = Board::from_fen(position.fen);
        for (depth, &expected) in position.expected.iter().enumerate() {
            let depth = depth as u32 + 1;
            let nodes = board.perft(depth);
            assert_eq!(
                nodes, expected,
                "{} perft({}) = {}, expected {}",
                position.name, depth, nodes, expected
            );
        }
    }
}

#[test]
fn perft_leaves_the_board_untouched() {
    let mut board = Board::from_fen(POSITIONS[1].fen);
    let before = board.clone();
    board.perft(3);
    assert_eq!(board, before);
    assert_eq!(board.hash(), board.calculate_initial_hash());
}

#[test]
fn perft_divide_sums_to_perft() {
    let mut board = Board::new();
    let divided = board.perft_divide(3);
    assert_eq!(divided.len(), 20);
    let total: u64 = divided.iter().map(|(_, nodes)| nodes).sum();
    assert_eq!(total, 8_902);
}
