//! Fixed leaper attack masks, built once on first use.

use once_cell::sync::Lazy;

use super::super::types::Bitboard;

fn leaper_table(deltas: &[(i32, i32)]) -> [Bitboard; 64] {
    let mut table = [0u64; 64];
    for (sq, entry) in table.iter_mut().enumerate() {
        let rank = (sq / 8) as i32;
        let file = (sq % 8) as i32;
        let mut mask = 0u64;
        for &(dr, df) in deltas {
            let r = rank + dr;
            let f = file + df;
            if (0..8).contains(&r) && (0..8).contains(&f) {
                mask |= 1u64 << (r * 8 + f);
            }
        }
        *entry = mask;
    }
    table
}

pub(crate) static KNIGHT_ATTACKS: Lazy<[Bitboard; 64]> = Lazy::new(|| {
    leaper_table(&[
        (2, 1),
        (1, 2),
        (-1, 2),
        (-2, 1),
        (-2, -1),
        (-1, -2),
        (1, -2),
        (2, -1),
    ])
});

pub(crate) static KING_ATTACKS: Lazy<[Bitboard; 64]> = Lazy::new(|| {
    leaper_table(&[
        (1, 0),
        (-1, 0),
        (0, 1),
        (0, -1),
        (1, 1),
        (1, -1),
        (-1, 1),
        (-1, -1),
    ])
});

/// Capture masks per (color, square): the squares a pawn of that color on that
/// square attacks.
pub(crate) static PAWN_ATTACKS: Lazy<[[Bitboard; 64]; 2]> = Lazy::new(|| {
    [
        leaper_table(&[(1, -1), (1, 1)]),
        leaper_table(&[(-1, -1), (-1, 1)]),
    ]
});
