use super::error::ChessError;
use super::piece::{Color, PieceType};
use super::square::Square;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A move in coordinate form: origin, destination and optional promotion.
/// Displays as UCI text ("e2e4", "e7e8q").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CoordinateMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceType>,
}

impl CoordinateMove {
    /// Create a new move with validation
    pub fn new(from: Square, to: Square, promotion: Option<PieceType>) -> Result<Self, ChessError> {
        if from == to {
            return Err(ChessError::InvalidMove(
                "Source and destination squares cannot be the same".to_string(),
            ));
        }

        if let Some(piece_type) = promotion {
            if !piece_type.is_promotion_target() {
                return Err(ChessError::InvalidMove(
                    "Cannot promote to King or Pawn".to_string(),
                ));
            }
        }

        Ok(Self {
            from,
            to,
            promotion,
        })
    }

    /// Create a new move without validation (for internal use when validity is guaranteed)
    pub const fn new_unchecked(from: Square, to: Square, promotion: Option<PieceType>) -> Self {
        Self {
            from,
            to,
            promotion,
        }
    }

    /// Castling glyphs resolve to the king's two-square step on the mover's back rank
    pub fn castling(color: Color, kingside: bool) -> Self {
        let rank = match color {
            Color::White => 0,
            Color::Black => 7,
        };
        let to_file = if kingside { 6 } else { 2 };
        Self::new_unchecked(
            Square::new_unchecked(4, rank),
            Square::new_unchecked(to_file, rank),
            None,
        )
    }
}

impl fmt::Display for CoordinateMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            write!(f, "{}", promotion.letter().to_ascii_lowercase())?;
        }
        Ok(())
    }
}

impl FromStr for CoordinateMove {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if !s.is_ascii() || (s.len() != 4 && s.len() != 5) {
            return Err(ChessError::InvalidMove(format!(
                "Invalid move format '{s}'. Expected 'e2e4' or 'e7e8q' for promotion."
            )));
        }

        let from = s[0..2].parse::<Square>()?;
        let to = s[2..4].parse::<Square>()?;
        let promotion = match s.get(4..5) {
            Some(letter) => Some(letter.parse::<PieceType>()?),
            None => None,
        };

        Self::new(from, to, promotion)
    }
}

/// Special-move markers reported by the oracle for a resolved move
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveFlags {
    pub capture: bool,
    pub kingside_castle: bool,
    pub queenside_castle: bool,
    pub en_passant: bool,
    pub promotion: bool,
}

impl MoveFlags {
    pub fn is_castle(&self) -> bool {
        self.kingside_castle || self.queenside_castle
    }
}

/// A legal move as described by the oracle. Castling moves use the king's
/// destination square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceType>,
    pub piece: PieceType,
    pub color: Color,
    pub captured: Option<PieceType>,
    pub flags: MoveFlags,
}

impl ResolvedMove {
    pub fn coordinate(&self) -> CoordinateMove {
        CoordinateMove::new_unchecked(self.from, self.to, self.promotion)
    }

    /// Coordinate (UCI) text of this move
    pub fn uci(&self) -> String {
        self.coordinate().to_string()
    }
}
