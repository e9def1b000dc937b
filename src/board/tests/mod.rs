//! Cross-module board tests: perft oracles, make/unmake inversion, search
//! behavior, and property-based checks. Single-module concerns are tested
//! next to their code.

mod perft;
mod search;

use crate::board::Board;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Plays `plies` random legal moves, stopping early if the game ends.
/// Returns the moves made with their undo snapshots.
pub(super) fn random_playout(
    board: &mut Board,
    plies: usize,
    seed: u64,
) -> Vec<(crate::board::Move, crate::board::Gamestate)> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut history = Vec::new();
    for _ in 0..plies {
        let moves = board.generate_moves();
        let Some(&m) = moves.choose(&mut rng) else {
            break;
        };
        let prev = board.make_move(&m).expect("generated move must be legal");
        history.push((m, prev));
    }
    history
}
