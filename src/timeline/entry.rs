use serde::{Deserialize, Serialize};

use super::current_timestamp;
use crate::chess::ResolvedMove;
use crate::error::Result;
use crate::notation;
use crate::oracle::{AppliedMove, LegalityOracle};
use crate::position::PositionRecord;

/// One applied move and the position it produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEntry {
    resolved: ResolvedMove,
    algebraic: String,
    coordinate: String,
    position: PositionRecord,
    #[serde(skip, default = "current_timestamp")]
    created_at: i64,
    check: bool,
    checkmate: bool,
    stalemate: bool,
}

impl TimelineEntry {
    /// Build the entry for `applied`, which was played from `before`.
    /// The oracle supplies the status flags and the disambiguation context
    /// for the algebraic form.
    pub fn from_applied(
        oracle: &dyn LegalityOracle,
        before: &PositionRecord,
        applied: AppliedMove,
    ) -> Result<Self> {
        let status = oracle.status(&applied.position)?;
        let algebraic = notation::to_algebraic(oracle, before, &applied.resolved, &status)?;

        Ok(Self {
            coordinate: applied.resolved.uci(),
            resolved: applied.resolved,
            algebraic,
            position: applied.position,
            created_at: current_timestamp(),
            check: status.check,
            checkmate: status.checkmate,
            stalemate: status.stalemate,
        })
    }

    pub fn resolved(&self) -> &ResolvedMove {
        &self.resolved
    }

    pub fn algebraic(&self) -> &str {
        &self.algebraic
    }

    pub fn coordinate(&self) -> &str {
        &self.coordinate
    }

    /// Position after the move
    pub fn position(&self) -> &PositionRecord {
        &self.position
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn is_check(&self) -> bool {
        self.check
    }

    pub fn is_checkmate(&self) -> bool {
        self.checkmate
    }

    pub fn is_stalemate(&self) -> bool {
        self.stalemate
    }

    pub(super) fn touch(&mut self) {
        self.created_at = current_timestamp();
    }
}

impl PartialEq for TimelineEntry {
    fn eq(&self, other: &Self) -> bool {
        self.resolved == other.resolved
            && self.algebraic == other.algebraic
            && self.coordinate == other.coordinate
            && self.position == other.position
            && self.check == other.check
            && self.checkmate == other.checkmate
            && self.stalemate == other.stalemate
    }
}

impl Eq for TimelineEntry {}
