//! Display-only algebraic notation.
//!
//! Good enough for logs and PV strings: no disambiguation between identical
//! pieces reaching the same square and no check/mate suffixes. Wire formats
//! use [`Move::to_uci`] instead.

use super::types::{Move, Piece};
use super::Board;

impl Board {
    pub fn move_to_algebraic(&self, m: &Move) -> String {
        if m.castle_kingside {
            return "O-O".to_string();
        }
        if m.castle_queenside {
            return "O-O-O".to_string();
        }

        let mut out = String::new();
        match m.piece {
            Piece::Pawn => {
                if m.is_capture() {
                    out.push((b'a' + m.from.file()) as char);
                }
            }
            piece => out.push(piece.to_char().to_ascii_uppercase()),
        }
        if m.is_capture() {
            out.push('x');
        }
        out.push_str(&m.to.to_string());
        if let Some(promo) = m.promotion {
            out.push('=');
            out.push(promo.to_char().to_ascii_uppercase());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_the_common_shapes() {
        let mut board = Board::new();
        let quiet = board.parse_move("g1f3").unwrap();
        assert_eq!(board.move_to_algebraic(&quiet), "Nf3");
        let push = board.parse_move("e2e4").unwrap();
        assert_eq!(board.move_to_algebraic(&push), "e4");

        let mut tactical =
            Board::from_fen("rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2");
        let capture = tactical.parse_move("e4d5").unwrap();
        assert_eq!(tactical.move_to_algebraic(&capture), "exd5");

        let mut castler = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let short = castler.parse_move("e1g1").unwrap();
        assert_eq!(castler.move_to_algebraic(&short), "O-O");
        let long = castler.parse_move("e1c1").unwrap();
        assert_eq!(castler.move_to_algebraic(&long), "O-O-O");

        let mut promoting = Board::from_fen("8/4P2k/8/8/8/8/8/4K3 w - - 0 1");
        let promo = promoting.parse_move("e7e8q").unwrap();
        assert_eq!(promoting.move_to_algebraic(&promo), "e8=Q");
    }
}
