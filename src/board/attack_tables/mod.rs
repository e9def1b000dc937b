//! Precomputed attack tables.
//!
//! Leaper (knight/king/pawn) attacks are plain per-square masks. Sliding
//! attacks use magic bitboards: for each square, the relevant blocker bits are
//! hashed with a fixed 64-bit multiplier into a dense per-square region of one
//! shared table, giving branch-free O(1) lookups. The magic multipliers and
//! relevant-bit counts below are data; the tables themselves are filled
//! deterministically on first use behind a `Lazy`, so re-initialization cannot
//! happen.

mod tables;

pub(crate) use tables::{KING_ATTACKS, KNIGHT_ATTACKS, PAWN_ATTACKS};

use once_cell::sync::Lazy;

use super::types::{pop_lsb, Bitboard};

struct Magic {
    mask: Bitboard,
    magic: u64,
    shift: u32,
    offset: usize,
}

struct SliderTables {
    bishop_table: Vec<Bitboard>,
    rook_table: Vec<Bitboard>,
    bishop_magics: [Magic; 64],
    rook_magics: [Magic; 64],
}

static SLIDERS: Lazy<SliderTables> = Lazy::new(SliderTables::build);

/// Bishop attacks from `sq` given full-board occupancy.
#[inline]
pub(crate) fn bishop_attacks(sq: usize, occupied: Bitboard) -> Bitboard {
    let m = &SLIDERS.bishop_magics[sq];
    SLIDERS.bishop_table[m.offset + magic_index(m, occupied)]
}

/// Rook attacks from `sq` given full-board occupancy.
#[inline]
pub(crate) fn rook_attacks(sq: usize, occupied: Bitboard) -> Bitboard {
    let m = &SLIDERS.rook_magics[sq];
    SLIDERS.rook_table[m.offset + magic_index(m, occupied)]
}

#[inline]
pub(crate) fn queen_attacks(sq: usize, occupied: Bitboard) -> Bitboard {
    bishop_attacks(sq, occupied) | rook_attacks(sq, occupied)
}

#[inline]
fn magic_index(m: &Magic, occupied: Bitboard) -> usize {
    (((occupied & m.mask).wrapping_mul(m.magic)) >> m.shift) as usize
}

impl SliderTables {
    fn build() -> SliderTables {
        let (bishop_table, bishop_magics) =
            build_slider(&BISHOP_MAGICS, &BISHOP_BITS, bishop_mask, bishop_attacks_slow);
        let (rook_table, rook_magics) =
            build_slider(&ROOK_MAGICS, &ROOK_BITS, rook_mask, rook_attacks_slow);
        SliderTables {
            bishop_table,
            rook_table,
            bishop_magics,
            rook_magics,
        }
    }
}

fn build_slider(
    magics: &[u64; 64],
    bits: &[u32; 64],
    mask_fn: fn(usize) -> Bitboard,
    slow_fn: fn(usize, Bitboard) -> Bitboard,
) -> (Vec<Bitboard>, [Magic; 64]) {
    let mut table = Vec::new();
    let mut entries: [Magic; 64] = std::array::from_fn(|_| Magic {
        mask: 0,
        magic: 0,
        shift: 0,
        offset: 0,
    });

    for sq in 0..64 {
        let mask = mask_fn(sq);
        debug_assert_eq!(mask.count_ones(), bits[sq]);
        let offset = table.len();
        let entry = Magic {
            mask,
            magic: magics[sq],
            shift: 64 - bits[sq],
            offset,
        };
        table.resize(offset + (1usize << bits[sq]), 0);

        // Every blocker subset of the mask, enumerated by index.
        for index in 0u64..(1u64 << bits[sq]) {
            let blockers = nth_blocker_subset(index, mask);
            let slot = magic_index(&entry, blockers);
            table[offset + slot] = slow_fn(sq, blockers);
        }
        entries[sq] = entry;
    }

    (table, entries)
}

/// Spreads the bits of `index` over the set bits of `mask`, yielding the
/// index-th blocker configuration.
fn nth_blocker_subset(index: u64, mask: Bitboard) -> Bitboard {
    let mut subset = 0u64;
    let mut rest = mask;
    let mut bit = 0u32;
    while rest != 0 {
        let sq = pop_lsb(&mut rest);
        if index & (1u64 << bit) != 0 {
            subset |= 1u64 << sq;
        }
        bit += 1;
    }
    subset
}

/// Relevant blocker squares for a bishop: the diagonals, edges excluded.
fn bishop_mask(sq: usize) -> Bitboard {
    let rank = (sq / 8) as i32;
    let file = (sq % 8) as i32;
    let mut mask = 0u64;
    for (dr, df) in [(1, 1), (1, -1), (-1, 1), (-1, -1)] {
        let mut r = rank + dr;
        let mut f = file + df;
        while (1..7).contains(&r) && (1..7).contains(&f) {
            mask |= 1u64 << (r * 8 + f);
            r += dr;
            f += df;
        }
    }
    mask
}

/// Relevant blocker squares for a rook: its rank and file, edges excluded.
fn rook_mask(sq: usize) -> Bitboard {
    let rank = (sq / 8) as i32;
    let file = (sq % 8) as i32;
    let mut mask = 0u64;
    for f in 1..7 {
        if f != file {
            mask |= 1u64 << (rank * 8 + f);
        }
    }
    for r in 1..7 {
        if r != rank {
            mask |= 1u64 << (r * 8 + file);
        }
    }
    mask
}

/// Ray-walk bishop attacks, inclusive of the first blocker (it may be a
/// capture). Only used while filling the tables and as a test oracle.
fn bishop_attacks_slow(sq: usize, blockers: Bitboard) -> Bitboard {
    slow_rays(sq, blockers, &[(1, 1), (1, -1), (-1, 1), (-1, -1)])
}

fn rook_attacks_slow(sq: usize, blockers: Bitboard) -> Bitboard {
    slow_rays(sq, blockers, &[(1, 0), (-1, 0), (0, 1), (0, -1)])
}

fn slow_rays(sq: usize, blockers: Bitboard, dirs: &[(i32, i32)]) -> Bitboard {
    let rank = (sq / 8) as i32;
    let file = (sq % 8) as i32;
    let mut attacks = 0u64;
    for &(dr, df) in dirs {
        let mut r = rank + dr;
        let mut f = file + df;
        while (0..8).contains(&r) && (0..8).contains(&f) {
            let mask = 1u64 << (r * 8 + f);
            attacks |= mask;
            if blockers & mask != 0 {
                break;
            }
            r += dr;
            f += df;
        }
    }
    attacks
}

const BISHOP_MAGICS: [u64; 64] = [
    0x89a1121896040240,
    0x2004844802002010,
    0x2068080051921000,
    0x62880a0220200808,
    0x0004042004000000,
    0x0100822020200011,
    0xc00444222012000a,
    0x0028808801216001,
    0x0400492088408100,
    0x0201c401040c0084,
    0x00840800910a0010,
    0x0000082080240060,
    0x2000840504006000,
    0x30010c4108405004,
    0x1008005410080802,
    0x8144042209100900,
    0x0208081020014400,
    0x004800201208ca00,
    0x0f18140408012008,
    0x1004002802102001,
    0x0841000820080811,
    0x0040200200a42008,
    0x0000800054042000,
    0x88010400410c9000,
    0x0520040470104290,
    0x1004040051500081,
    0x2002081833080021,
    0x000400c00c010142,
    0x941408200c002000,
    0x0658810000806011,
    0x0188071040440a00,
    0x4800404002011c00,
    0x0104442040404200,
    0x0511080200222104,
    0x0004022401120400,
    0x80c0040400080120,
    0x8040010040820802,
    0x0480810700020090,
    0x0102008e00040242,
    0x0809005202050100,
    0x8002024220104080,
    0x0431008804142000,
    0x0019001802081400,
    0x0200014208040080,
    0x3308082008200100,
    0x041010500040c020,
    0x4012020c04210308,
    0x208220a202004080,
    0x0111040120082000,
    0x6803040141280a00,
    0x2101004202410000,
    0x8200000041108022,
    0x0000021082088000,
    0x0002410204010040,
    0x0040100400809000,
    0x0822088220820214,
    0x0040808090012004,
    0x00910224040218c9,
    0x0402814422015008,
    0x0090014004842410,
    0x0001000042304105,
    0x0010008830412a00,
    0x2520081090008908,
    0x40102000a0a60140,
];

const ROOK_MAGICS: [u64; 64] = [
    0x0a8002c000108020,
    0x06c00049b0002001,
    0x0100200010090040,
    0x2480041000800801,
    0x0280028004000800,
    0x0900410008040022,
    0x0280020001001080,
    0x2880002041000080,
    0xa000800080400034,
    0x0004808020004000,
    0x2290802004801000,
    0x0411000d00100020,
    0x0402800800040080,
    0x000b000401004208,
    0x2409000100040200,
    0x0001002100004082,
    0x0022878001e24000,
    0x1090810021004010,
    0x0801030040200012,
    0x0500808008001000,
    0x0a08018014000880,
    0x8000808004000200,
    0x0201008080010200,
    0x0801020000441091,
    0x0000800080204005,
    0x1040200040100048,
    0x0000120200402082,
    0x0d14880480100080,
    0x0012040280080080,
    0x0100040080020080,
    0x9020010080800200,
    0x0813241200148449,
    0x0491604001800080,
    0x0100401000402001,
    0x4820010021001040,
    0x0400402202000812,
    0x0209009005000802,
    0x0810800601800400,
    0x4301083214000150,
    0x204026458e001401,
    0x0040204000808000,
    0x8001008040010020,
    0x8410820820420010,
    0x1003001000090020,
    0x0804040008008080,
    0x0012000810020004,
    0x1000100200040208,
    0x430000a044020001,
    0x0280009023410300,
    0x00e0100040002240,
    0x0000200100401700,
    0x2244100408008080,
    0x0008000400801980,
    0x0002000810040200,
    0x8010100228810400,
    0x2000009044210200,
    0x4080008040102101,
    0x0040002080411d01,
    0x2005524060000901,
    0x0502001008400422,
    0x489a000810200402,
    0x0001004400080a13,
    0x4000011008020084,
    0x0026002114058042,
];

#[rustfmt::skip]
const BISHOP_BITS: [u32; 64] = [
    6, 5, 5, 5, 5, 5, 5, 6,
    5, 5, 5, 5, 5, 5, 5, 5,
    5, 5, 7, 7, 7, 7, 5, 5,
    5, 5, 7, 9, 9, 7, 5, 5,
    5, 5, 7, 9, 9, 7, 5, 5,
    5, 5, 7, 7, 7, 7, 5, 5,
    5, 5, 5, 5, 5, 5, 5, 5,
    6, 5, 5, 5, 5, 5, 5, 6,
];

#[rustfmt::skip]
const ROOK_BITS: [u32; 64] = [
    12, 11, 11, 11, 11, 11, 11, 12,
    11, 10, 10, 10, 10, 10, 10, 11,
    11, 10, 10, 10, 10, 10, 10, 11,
    11, 10, 10, 10, 10, 10, 10, 11,
    11, 10, 10, 10, 10, 10, 10, 11,
    11, 10, 10, 10, 10, 10, 10, 11,
    11, 10, 10, 10, 10, 10, 10, 11,
    12, 11, 11, 11, 11, 11, 11, 12,
];
