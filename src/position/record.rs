use crate::chess::{Color, Piece, Square};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::codec;
use crate::error::GameError;

/// Placement field of the standard initial position
pub const STARTING_PLACEMENT: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

/// The standard initial position record
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Castling rights for both players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CastlingRights {
    pub white_kingside: bool,
    pub white_queenside: bool,
    pub black_kingside: bool,
    pub black_queenside: bool,
}

impl CastlingRights {
    /// All four rights available
    pub fn new() -> Self {
        Self {
            white_kingside: true,
            white_queenside: true,
            black_kingside: true,
            black_queenside: true,
        }
    }

    pub fn none() -> Self {
        Self {
            white_kingside: false,
            white_queenside: false,
            black_kingside: false,
            black_queenside: false,
        }
    }

    /// Build from an already validated castling field ("KQkq", "Kq", "-")
    pub(crate) fn from_fen(field: &str) -> Self {
        let mut rights = Self::none();
        for c in field.chars() {
            match c {
                'K' => rights.white_kingside = true,
                'Q' => rights.white_queenside = true,
                'k' => rights.black_kingside = true,
                'q' => rights.black_queenside = true,
                _ => {}
            }
        }
        rights
    }

    /// Convert to the canonical castling field
    pub fn to_fen(&self) -> String {
        let mut result = String::new();

        if self.white_kingside {
            result.push('K');
        }
        if self.white_queenside {
            result.push('Q');
        }
        if self.black_kingside {
            result.push('k');
        }
        if self.black_queenside {
            result.push('q');
        }

        if result.is_empty() {
            "-".to_string()
        } else {
            result
        }
    }

    pub fn has(&self, color: Color, kingside: bool) -> bool {
        match (color, kingside) {
            (Color::White, true) => self.white_kingside,
            (Color::White, false) => self.white_queenside,
            (Color::Black, true) => self.black_kingside,
            (Color::Black, false) => self.black_queenside,
        }
    }
}

impl Default for CastlingRights {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable snapshot of a chess position in the six-field record format.
///
/// The placement field is kept exactly as parsed so that serializing a parsed
/// record reproduces the input text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct PositionRecord {
    pub(super) placement: String,
    pub(super) side_to_move: Color,
    pub(super) castling: CastlingRights,
    pub(super) en_passant: Option<Square>,
    pub(super) halfmove_clock: u64,
    pub(super) fullmove_number: u64,
}

impl PositionRecord {
    /// The standard initial position
    pub fn starting() -> Self {
        Self {
            placement: STARTING_PLACEMENT.to_string(),
            side_to_move: Color::White,
            castling: CastlingRights::new(),
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    pub fn placement(&self) -> &str {
        &self.placement
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn castling_rights(&self) -> CastlingRights {
        self.castling
    }

    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    pub fn halfmove_clock(&self) -> u64 {
        self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u64 {
        self.fullmove_number
    }

    /// Expand the placement field into an 8x8 grid.
    /// board[rank][file] where rank 0 = rank 1, file 0 = file a
    pub fn board(&self) -> [[Option<Piece>; 8]; 8] {
        let mut squares = [[None; 8]; 8];

        for (rank_idx, group) in self.placement.split('/').enumerate().take(8) {
            let board_rank = 7 - rank_idx;
            let mut file = 0usize;
            for c in group.chars() {
                if let Some(empty) = c.to_digit(10) {
                    file += empty as usize;
                } else if let Some(piece) = Piece::from_fen_char(c) {
                    if file < 8 {
                        squares[board_rank][file] = Some(piece);
                    }
                    file += 1;
                }
            }
        }

        squares
    }

    /// Get the piece at the specified square, if any
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        if square.file > 7 || square.rank > 7 {
            return None;
        }
        self.board()[square.rank as usize][square.file as usize]
    }

    /// Display the board as ASCII art from White's perspective
    pub fn to_ascii(&self) -> String {
        let board = self.board();
        let mut result = String::new();

        result.push_str("  a b c d e f g h\n");

        for display_rank in (0..8).rev() {
            let rank_number = display_rank + 1;
            result.push_str(&format!("{rank_number} "));

            let row: Vec<String> = board[display_rank]
                .iter()
                .map(|square| match square {
                    Some(piece) => piece.to_string(),
                    None => ".".to_string(),
                })
                .collect();
            result.push_str(&row.join(" "));

            result.push_str(&format!(" {rank_number}\n"));
        }

        result.push_str("  a b c d e f g h");
        result
    }
}

impl Default for PositionRecord {
    fn default() -> Self {
        Self::starting()
    }
}

impl fmt::Display for PositionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", codec::serialize(self))
    }
}

impl FromStr for PositionRecord {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        codec::parse(s)
    }
}

impl From<PositionRecord> for String {
    fn from(record: PositionRecord) -> Self {
        codec::serialize(&record)
    }
}

impl TryFrom<String> for PositionRecord {
    type Error = GameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        codec::parse(&value)
    }
}
