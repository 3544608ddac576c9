//! The rules authority consumed by the codecs, the timeline and the
//! controller. Nothing in this crate derives chess rules itself; it asks a
//! [`LegalityOracle`] whether a move is legal, what position it leads to and
//! what the resulting position's status is.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chess::{CoordinateMove, PieceType, ResolvedMove, Square};
use crate::position::PositionRecord;

mod shakmaty_oracle;

pub use shakmaty_oracle::ShakmatyOracle;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    /// The move is not legal in the given position
    #[error("Move rejected: {0}")]
    Rejected(String),

    /// The position is well-formed text but the rules engine cannot play it
    #[error("Unsupported position: {0}")]
    UnsupportedPosition(String),

    #[error("Oracle failure: {0}")]
    Internal(String),
}

/// Result of applying a legal move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedMove {
    pub position: PositionRecord,
    pub resolved: ResolvedMove,
}

/// Check/mate/stalemate/draw flags of a position
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionStatus {
    pub check: bool,
    pub checkmate: bool,
    pub stalemate: bool,
    pub draw: bool,
}

impl PositionStatus {
    pub fn is_game_over(&self) -> bool {
        self.checkmate || self.stalemate || self.draw
    }
}

/// Narrows a legal-move query. Unset fields match anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveFilter {
    pub piece: Option<PieceType>,
    pub from: Option<Square>,
    pub to: Option<Square>,
}

impl MoveFilter {
    pub fn piece_to(piece: PieceType, to: Square) -> Self {
        Self {
            piece: Some(piece),
            from: None,
            to: Some(to),
        }
    }

    pub fn matches(&self, mv: &ResolvedMove) -> bool {
        self.piece.map_or(true, |piece| piece == mv.piece)
            && self.from.map_or(true, |from| from == mv.from)
            && self.to.map_or(true, |to| to == mv.to)
    }
}

pub trait LegalityOracle {
    /// Apply `mv` to `position`, returning the resulting position and the
    /// oracle's description of the move. Illegal moves are `Rejected`.
    fn apply_move(
        &self,
        position: &PositionRecord,
        mv: &CoordinateMove,
    ) -> Result<AppliedMove, OracleError>;

    /// All legal moves in `position`, optionally narrowed by `filter`
    fn legal_moves(
        &self,
        position: &PositionRecord,
        filter: Option<&MoveFilter>,
    ) -> Result<Vec<ResolvedMove>, OracleError>;

    fn is_check(&self, position: &PositionRecord) -> Result<bool, OracleError>;

    fn is_checkmate(&self, position: &PositionRecord) -> Result<bool, OracleError>;

    fn is_stalemate(&self, position: &PositionRecord) -> Result<bool, OracleError>;

    fn is_draw(&self, position: &PositionRecord) -> Result<bool, OracleError>;

    fn status(&self, position: &PositionRecord) -> Result<PositionStatus, OracleError> {
        Ok(PositionStatus {
            check: self.is_check(position)?,
            checkmate: self.is_checkmate(position)?,
            stalemate: self.is_stalemate(position)?,
            draw: self.is_draw(position)?,
        })
    }
}
