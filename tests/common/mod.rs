//! Shared helpers for the integration tests: position shortcuts and an
//! oracle whose rules can be changed mid-test.

#![allow(dead_code)]

use std::cell::Cell;

use ply::chess::{CoordinateMove, ResolvedMove};
use ply::oracle::{AppliedMove, LegalityOracle, MoveFilter, OracleError, ShakmatyOracle};
use ply::{GameConfig, GameController, PositionRecord};

/// How a [`SwitchableOracle`] answers `apply_move`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OracleMode {
    Normal,
    RejectMoves,
    Panic,
}

/// Wraps the real oracle and can start refusing (or panicking on) every
/// move, which looks to the timeline like the rules changed under it.
#[derive(Debug)]
pub struct SwitchableOracle {
    inner: ShakmatyOracle,
    mode: Cell<OracleMode>,
}

impl SwitchableOracle {
    pub fn new() -> Self {
        Self {
            inner: ShakmatyOracle::new(),
            mode: Cell::new(OracleMode::Normal),
        }
    }

    pub fn set_mode(&self, mode: OracleMode) {
        self.mode.set(mode);
    }
}

impl LegalityOracle for SwitchableOracle {
    fn apply_move(
        &self,
        position: &PositionRecord,
        mv: &CoordinateMove,
    ) -> Result<AppliedMove, OracleError> {
        match self.mode.get() {
            OracleMode::Normal => self.inner.apply_move(position, mv),
            OracleMode::RejectMoves => Err(OracleError::Rejected(format!(
                "{} is no longer allowed",
                mv
            ))),
            OracleMode::Panic => panic!("oracle blew up on {}", mv),
        }
    }

    fn legal_moves(
        &self,
        position: &PositionRecord,
        filter: Option<&MoveFilter>,
    ) -> Result<Vec<ResolvedMove>, OracleError> {
        self.inner.legal_moves(position, filter)
    }

    fn is_check(&self, position: &PositionRecord) -> Result<bool, OracleError> {
        self.inner.is_check(position)
    }

    fn is_checkmate(&self, position: &PositionRecord) -> Result<bool, OracleError> {
        self.inner.is_checkmate(position)
    }

    fn is_stalemate(&self, position: &PositionRecord) -> Result<bool, OracleError> {
        self.inner.is_stalemate(position)
    }

    fn is_draw(&self, position: &PositionRecord) -> Result<bool, OracleError> {
        self.inner.is_draw(position)
    }
}

pub fn record(text: &str) -> PositionRecord {
    text.parse()
        .unwrap_or_else(|e| panic!("Failed to parse test position '{}': {}", text, e))
}

/// Position reached by playing `tokens` from the standard start
pub fn position_after(tokens: &[&str]) -> PositionRecord {
    let mut game = GameController::new();
    play_all(&mut game, tokens);
    game.position().clone()
}

pub fn play_all<O: LegalityOracle>(game: &mut GameController<O>, tokens: &[&str]) {
    for token in tokens {
        let result = game.play(token);
        assert!(
            result.is_success(),
            "Failed to play '{}': {:?}",
            token,
            result.error
        );
    }
}

pub fn switchable_game(config: GameConfig) -> GameController<SwitchableOracle> {
    GameController::with_oracle(SwitchableOracle::new(), config)
}
