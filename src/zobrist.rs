//! Zobrist hashing key material.
//!
//! Keys are generated once from a fixed seed so that hashes are reproducible
//! across runs. The position hash is the XOR of one key per (piece, color,
//! square), one key per castling-right flag, one key per en-passant file, and
//! a single side-to-move key.

use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const ZOBRIST_SEED: u64 = 0x00C0_FFEE_5EED_1234;

pub struct ZobristKeys {
    /// Indexed by `[piece][color][square]`.
    pub piece_keys: [[[u64; 64]; 2]; 6],
    pub black_to_move_key: u64,
    /// One key per castling-right bit, in `castling_rights` bit order.
    pub castling_keys: [u64; 4],
    /// Indexed by the en-passant target file.
    pub en_passant_keys: [u64; 8],
}

impl ZobristKeys {
    fn new() -> Self {
        let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED);

        let mut piece_keys = [[[0u64; 64]; 2]; 6];
        for piece in piece_keys.iter_mut() {
            for color in piece.iter_mut() {
                for square in color.iter_mut() {
                    *square = rng.gen();
                }
            }
        }

        let black_to_move_key = rng.gen();

        let mut castling_keys = [0u64; 4];
        for key in castling_keys.iter_mut() {
            *key = rng.gen();
        }

        let mut en_passant_keys = [0u64; 8];
        for key in en_passant_keys.iter_mut() {
            *key = rng.gen();
        }

        ZobristKeys {
            piece_keys,
            black_to_move_key,
            castling_keys,
            en_passant_keys,
        }
    }
}

pub static ZOBRIST: Lazy<ZobristKeys> = Lazy::new(ZobristKeys::new);
