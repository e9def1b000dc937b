//! FEN loading/serialization and UCI move-notation parsing.

use std::str::FromStr;

use super::error::{FenError, MoveParseError};
use super::state::castle_bit;
use super::types::{Color, Move, Piece, Square};
use super::Board;

pub const STARTPOS_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl Board {
    /// Parses a FEN string. Fields five and six (halfmove clock, fullmove
    /// number) are optional and default to 0 and 1.
    pub fn try_from_fen(fen: &str) -> Result<Board, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(FenError::MissingFields { found: parts.len() });
        }

        let mut board = Board::empty();

        let ranks: Vec<&str> = parts[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::BadRankShape {
                rank: parts[0].to_string(),
            });
        }
        for (i, rank_str) in ranks.iter().enumerate() {
            // FEN lists rank 8 first.
            let rank = 7 - i as u8;
            let mut file = 0u8;
            for ch in rank_str.chars() {
                if let Some(skip) = ch.to_digit(10) {
                    // Bounded before adding: a run of digits must never walk
                    // off the rank, let alone overflow the counter.
                    file += skip as u8;
                    if file > 8 {
                        return Err(FenError::BadRankShape {
                            rank: rank_str.to_string(),
                        });
                    }
                    continue;
                }
                let piece = Piece::from_char(ch.to_ascii_lowercase())
                    .ok_or(FenError::InvalidPiece { ch })?;
                if file > 7 {
                    return Err(FenError::BadRankShape {
                        rank: rank_str.to_string(),
                    });
                }
                let color = if ch.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };
                board.put_piece(color, piece, Square::new(rank, file));
                file += 1;
            }
            if file != 8 {
                return Err(FenError::BadRankShape {
                    rank: rank_str.to_string(),
                });
            }
        }

        let pawns = board.colored(Color::White, Piece::Pawn)
            | board.colored(Color::Black, Piece::Pawn);
        let back_ranks = 0xFF00_0000_0000_00FFu64;
        if pawns & back_ranks != 0 {
            let sq = Square((pawns & back_ranks).trailing_zeros() as u8);
            return Err(FenError::PawnOnBackRank {
                square: sq.to_string(),
            });
        }

        for (color, name) in [(Color::White, "white"), (Color::Black, "black")] {
            let kings = board.colored(color, Piece::King);
            if kings.count_ones() != 1 {
                return Err(FenError::WrongKingCount {
                    color: name,
                    count: kings.count_ones(),
                });
            }
            board.king_squares[color.index()] = Square(kings.trailing_zeros() as u8);
        }

        board.side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        };

        if parts[2] != "-" {
            for ch in parts[2].chars() {
                board.castling_rights |= match ch {
                    'K' => castle_bit(Color::White, true),
                    'Q' => castle_bit(Color::White, false),
                    'k' => castle_bit(Color::Black, true),
                    'q' => castle_bit(Color::Black, false),
                    _ => return Err(FenError::InvalidCastlingRights { ch }),
                };
            }
        }

        board.en_passant_square = match parts[3] {
            "-" => None,
            s => Some(Square::from_uci(s).ok_or_else(|| FenError::InvalidEnPassant {
                found: s.to_string(),
            })?),
        };

        board.halfmove_clock = parts.get(4).and_then(|s| s.parse().ok()).unwrap_or(0);
        board.fullmove_number = parts.get(5).and_then(|s| s.parse().ok()).unwrap_or(1);

        board.hash = board.calculate_initial_hash();
        board.repetition_counts.clear();
        board.repetition_counts.increment(board.hash);
        Ok(board)
    }

    /// Panicking convenience for statically known-good FEN strings.
    pub fn from_fen(fen: &str) -> Board {
        match Board::try_from_fen(fen) {
            Ok(board) => board,
            Err(err) => panic!("bad FEN '{fen}': {err}"),
        }
    }

    /// Serializes the position; round-trips through `try_from_fen`.
    pub fn to_fen(&self) -> String {
        let mut placement = String::new();
        for rank in (0..8u8).rev() {
            let mut empty = 0;
            for file in 0..8u8 {
                match self.piece_at(Square::new(rank, file)) {
                    Some((color, piece)) => {
                        if empty > 0 {
                            placement.push(char::from_digit(empty, 10).unwrap());
                            empty = 0;
                        }
                        let ch = piece.to_char();
                        placement.push(if color == Color::White {
                            ch.to_ascii_uppercase()
                        } else {
                            ch
                        });
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                placement.push(char::from_digit(empty, 10).unwrap());
            }
            if rank > 0 {
                placement.push('/');
            }
        }

        let side = match self.side_to_move {
            Color::White => "w",
            Color::Black => "b",
        };

        let mut castling = String::new();
        for (right, ch) in [
            (castle_bit(Color::White, true), 'K'),
            (castle_bit(Color::White, false), 'Q'),
            (castle_bit(Color::Black, true), 'k'),
            (castle_bit(Color::Black, false), 'q'),
        ] {
            if self.castling_rights & right != 0 {
                castling.push(ch);
            }
        }
        if castling.is_empty() {
            castling.push('-');
        }

        let en_passant = match self.en_passant_square {
            Some(sq) => sq.to_string(),
            None => "-".to_string(),
        };

        format!(
            "{placement} {side} {castling} {en_passant} {} {}",
            self.halfmove_clock, self.fullmove_number
        )
    }

    /// Parses UCI move notation (`e2e4`, `e7e8q`) against the current legal
    /// moves. The promotion suffix disambiguates; otherwise (from, to) must
    /// match uniquely.
    pub fn parse_move(&mut self, notation: &str) -> Result<Move, MoveParseError> {
        if notation.len() != 4 && notation.len() != 5 {
            return Err(MoveParseError::WrongLength {
                found: notation.len(),
            });
        }
        let from = Square::from_uci(&notation[0..2]).ok_or_else(|| {
            MoveParseError::InvalidSquare {
                found: notation[0..2].to_string(),
            }
        })?;
        let to = Square::from_uci(&notation[2..4]).ok_or_else(|| {
            MoveParseError::InvalidSquare {
                found: notation[2..4].to_string(),
            }
        })?;
        let promotion = match notation.chars().nth(4) {
            None => None,
            Some(ch) => match Piece::from_char(ch) {
                Some(p) if Piece::PROMOTIONS.contains(&p) => Some(p),
                _ => return Err(MoveParseError::InvalidPromotion { ch }),
            },
        };

        self.generate_moves()
            .into_iter()
            .find(|m| m.from == from && m.to == to && m.promotion == promotion)
            .ok_or_else(|| MoveParseError::IllegalMove {
                notation: notation.to_string(),
            })
    }

    /// Parses and applies a UCI move in one step.
    pub fn make_move_uci(&mut self, notation: &str) -> Result<(), MoveParseError> {
        let m = self.parse_move(notation)?;
        // parse_move only returns legal moves, so this cannot fail.
        let _ = self.make_move(&m);
        Ok(())
    }
}

impl FromStr for Board {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Board::try_from_fen(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_fen_matches_default_board() {
        let from_fen = Board::from_fen(STARTPOS_FEN);
        let fresh = Board::new();
        assert_eq!(from_fen, fresh);
        assert_eq!(fresh.to_fen(), STARTPOS_FEN);
    }

    #[test]
    fn fen_round_trips_a_middlegame_position() {
        let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
        let board = Board::from_fen(fen);
        assert_eq!(board.to_fen(), fen);
        assert_eq!(board.hash, board.calculate_initial_hash());
    }

    #[test]
    fn fen_with_en_passant_square() {
        let board = Board::from_fen("rnbqkbnr/ppp1pppp/8/8/3pP3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 2");
        assert_eq!(board.en_passant_square(), Square::from_uci("e3"));
    }

    #[test]
    fn rejects_malformed_fens() {
        assert_eq!(
            Board::try_from_fen("8/8/8/8 w"),
            Err(FenError::MissingFields { found: 2 })
        );
        assert!(matches!(
            Board::try_from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNX w KQkq - 0 1"),
            Err(FenError::InvalidPiece { ch: 'X' })
        ));
        assert!(matches!(
            Board::try_from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1"),
            Err(FenError::InvalidSideToMove { .. })
        ));
        assert!(matches!(
            Board::try_from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KZkq - 0 1"),
            Err(FenError::InvalidCastlingRights { ch: 'Z' })
        ));
        assert!(matches!(
            Board::try_from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e9 0 1"),
            Err(FenError::InvalidEnPassant { .. })
        ));
        assert!(matches!(
            Board::try_from_fen("8/8/8/8/8/8/8/K7 w - - 0 1"),
            Err(FenError::WrongKingCount {
                color: "black",
                count: 0
            })
        ));
        assert!(matches!(
            Board::try_from_fen("rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            Err(FenError::BadRankShape { .. })
        ));
    }

    #[test]
    fn digit_runs_cannot_overflow_the_file_counter() {
        // An arbitrarily long run of digits must come back as a shape error,
        // not wrap the per-rank square counter.
        let long_rank = "9".repeat(40);
        let fen = format!("{long_rank}/8/8/8/8/8/8/4K2k w - - 0 1");
        assert!(matches!(
            Board::try_from_fen(&fen),
            Err(FenError::BadRankShape { .. })
        ));
    }

    #[test]
    fn pawns_on_the_back_ranks_are_rejected() {
        assert!(matches!(
            Board::try_from_fen("P3k3/8/8/8/8/8/8/4K3 w - - 0 1"),
            Err(FenError::PawnOnBackRank { .. })
        ));
        assert!(matches!(
            Board::try_from_fen("4k3/8/8/8/8/8/8/2p1K3 b - - 0 1"),
            Err(FenError::PawnOnBackRank { .. })
        ));
        // Seventh-rank pawns are one step away and stay legal.
        assert!(Board::try_from_fen("4k3/P7/8/8/8/8/7p/4K3 w - - 0 1").is_ok());
    }

    #[test]
    fn parse_move_accepts_legal_and_rejects_illegal() {
        let mut board = Board::new();
        let m = board.parse_move("e2e4").unwrap();
        assert_eq!(m.piece, Piece::Pawn);
        assert_eq!(m.to, Square::from_uci("e4").unwrap());

        assert!(matches!(
            board.parse_move("e2e5"),
            Err(MoveParseError::IllegalMove { .. })
        ));
        assert!(matches!(
            board.parse_move("e2"),
            Err(MoveParseError::WrongLength { found: 2 })
        ));
        assert!(matches!(
            board.parse_move("z2e4"),
            Err(MoveParseError::InvalidSquare { .. })
        ));
    }

    #[test]
    fn parse_move_disambiguates_promotions() {
        let mut board = Board::from_fen("8/4P2k/8/8/8/8/8/4K3 w - - 0 1");
        let queen = board.parse_move("e7e8q").unwrap();
        assert_eq!(queen.promotion, Some(Piece::Queen));
        let knight = board.parse_move("e7e8n").unwrap();
        assert_eq!(knight.promotion, Some(Piece::Knight));
        // Bare e7e8 is not a move; the promotion letter is mandatory.
        assert!(matches!(
            board.parse_move("e7e8"),
            Err(MoveParseError::IllegalMove { .. })
        ));
        assert!(matches!(
            board.parse_move("e7e8k"),
            Err(MoveParseError::InvalidPromotion { ch: 'k' })
        ));
    }

    #[test]
    fn make_move_uci_advances_the_game() {
        let mut board = Board::new();
        board.make_move_uci("e2e4").unwrap();
        board.make_move_uci("c7c5").unwrap();
        assert_eq!(
            board.to_fen(),
            "rnbqkbnr/pp1ppppp/8/2p5/4P3/8/PPPP1PPP/RNBQKBNR w KQkq c6 0 2"
        );
    }
}
