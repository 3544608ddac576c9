use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, info};

use super::action::ActionResult;
use super::config::GameConfig;
use super::diagnostics::{Diagnostics, Severity};
use crate::chess::CoordinateMove;
use crate::error::{GameError, Result};
use crate::notation;
use crate::oracle::{LegalityOracle, OracleError, PositionStatus, ShakmatyOracle};
use crate::position::{self, PositionRecord};
use crate::timeline::{Timeline, TimelineEntry, TimelineSnapshot, TimelineStatistics};
use crate::transcript;

/// Owns the live position and its timeline, and routes every move through
/// the oracle.
///
/// Operations never panic or return bare errors: each reports an
/// [`ActionResult`]. Operations that replace state validate their input
/// completely first and leave the controller untouched on failure.
#[derive(Debug)]
pub struct GameController<O: LegalityOracle = ShakmatyOracle> {
    oracle: O,
    position: PositionRecord,
    timeline: Option<Timeline>,
    config: GameConfig,
    diagnostics: Diagnostics,
}

impl GameController<ShakmatyOracle> {
    pub fn new() -> Self {
        Self::with_config(GameConfig::default())
    }

    pub fn with_config(config: GameConfig) -> Self {
        Self::with_oracle(ShakmatyOracle::new(), config)
    }
}

impl Default for GameController<ShakmatyOracle> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: LegalityOracle> GameController<O> {
    pub fn with_oracle(oracle: O, config: GameConfig) -> Self {
        let position = PositionRecord::starting();
        let timeline = config
            .history_enabled
            .then(|| Timeline::new(position.clone(), config.max_history_length));
        let diagnostics = Diagnostics::new(config.logging_enabled);

        Self {
            oracle,
            position,
            timeline,
            config,
            diagnostics,
        }
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn timeline(&self) -> Option<&Timeline> {
        self.timeline.as_ref()
    }

    /// The live position
    pub fn position(&self) -> &PositionRecord {
        &self.position
    }

    pub fn fen(&self) -> String {
        position::serialize(&self.position)
    }

    /// Resolve and play a move token (algebraic or coordinate)
    pub fn play(&mut self, token: &str) -> ActionResult<TimelineEntry> {
        self.run("play", |game| {
            game.ensure_not_over()?;
            let resolved = notation::resolve(
                &game.oracle,
                &game.position,
                token,
                game.config.strict_mode,
            )?;
            game.commit(&resolved.coordinate())
        })
    }

    pub fn play_move(&mut self, mv: &CoordinateMove) -> ActionResult<TimelineEntry> {
        self.run("play_move", |game| {
            game.ensure_not_over()?;
            game.commit(mv)
        })
    }

    /// `true` when the cursor moved, `false` when there was nothing to undo
    pub fn undo(&mut self) -> ActionResult<bool> {
        self.run("undo", |game| {
            let timeline = game.timeline.as_mut().ok_or(GameError::HistoryDisabled)?;
            match timeline.undo(&game.oracle)? {
                Some(position) => {
                    game.position = position;
                    Ok(true)
                }
                None => Ok(false),
            }
        })
    }

    /// `true` when the cursor moved, `false` when there was nothing to redo
    pub fn redo(&mut self) -> ActionResult<bool> {
        self.run("redo", |game| {
            let timeline = game.timeline.as_mut().ok_or(GameError::HistoryDisabled)?;
            match timeline.redo(&game.oracle)? {
                Some(position) => {
                    game.position = position;
                    Ok(true)
                }
                None => Ok(false),
            }
        })
    }

    /// Jump to timeline index `index`; -1 is the starting position
    pub fn seek(&mut self, index: isize) -> ActionResult<bool> {
        self.run("seek", |game| {
            let timeline = game.timeline.as_mut().ok_or(GameError::HistoryDisabled)?;
            match timeline.seek(&game.oracle, index)? {
                Some(position) => {
                    game.position = position;
                    Ok(true)
                }
                None => Ok(false),
            }
        })
    }

    pub fn clear_history(&mut self) -> ActionResult<()> {
        self.run("clear_history", |game| {
            let timeline = game.timeline.as_mut().ok_or(GameError::HistoryDisabled)?;
            game.position = timeline.clear();
            Ok(())
        })
    }

    /// Replace the live position and start a fresh timeline there
    pub fn load_position(&mut self, text: &str) -> ActionResult<PositionRecord> {
        self.run("load_position", |game| {
            let record = position::parse(text)?;
            game.oracle
                .legal_moves(&record, None)
                .map_err(|e| match e {
                    OracleError::UnsupportedPosition(reason) => GameError::MalformedRecord(reason),
                    other => other.into(),
                })?;

            game.install(record.clone(), None);
            info!("Loaded position {}", record);
            Ok(record)
        })
    }

    /// Replace the game with the moves of `text`, played from `start` (or the
    /// standard starting position). Returns the number of moves loaded.
    pub fn load_transcript(&mut self, text: &str, start: Option<&str>) -> ActionResult<usize> {
        self.run("load_transcript", |game| {
            let start = match start {
                Some(fen) => position::parse(fen)?,
                None => PositionRecord::starting(),
            };
            let entries = transcript::parse(text, &start, &game.oracle, game.config.strict_mode)?;
            let count = entries.len();

            let position = entries
                .last()
                .map_or_else(|| start.clone(), |entry| entry.position().clone());
            let timeline = game.config.history_enabled.then(|| {
                Timeline::from_entries(start, entries, game.config.max_history_length)
            });

            game.position = position;
            game.timeline = timeline;
            info!("Loaded transcript with {} moves", count);
            Ok(count)
        })
    }

    pub fn transcript(&self) -> ActionResult<String> {
        self.query("transcript", |game| {
            let timeline = game.timeline.as_ref().ok_or(GameError::HistoryDisabled)?;
            Ok(transcript::build(timeline, &game.oracle))
        })
    }

    /// Algebraic tokens of the applied moves
    pub fn history(&self) -> ActionResult<Vec<String>> {
        self.query("history", |game| {
            let timeline = game.timeline.as_ref().ok_or(GameError::HistoryDisabled)?;
            Ok(timeline.history())
        })
    }

    pub fn statistics(&self) -> ActionResult<TimelineStatistics> {
        self.query("statistics", |game| {
            let timeline = game.timeline.as_ref().ok_or(GameError::HistoryDisabled)?;
            Ok(timeline.statistics())
        })
    }

    /// Timeline as JSON text
    pub fn export_timeline(&self) -> ActionResult<String> {
        self.query("export_timeline", |game| {
            let timeline = game.timeline.as_ref().ok_or(GameError::HistoryDisabled)?;
            serde_json::to_string_pretty(&timeline.serialize())
                .map_err(|e| GameError::UnknownError(format!("Failed to serialize timeline: {}", e)))
        })
    }

    /// Replace the timeline with one exported earlier. The snapshot is
    /// replayed before anything is installed, then cut down to the
    /// configured maximum length.
    pub fn import_timeline(&mut self, json: &str) -> ActionResult<PositionRecord> {
        self.run("import_timeline", |game| {
            if !game.config.history_enabled {
                return Err(GameError::HistoryDisabled);
            }
            let snapshot: TimelineSnapshot = serde_json::from_str(json)
                .map_err(|e| GameError::MalformedRecord(format!("timeline JSON: {}", e)))?;
            let (mut timeline, position) = Timeline::restore(snapshot, &game.oracle)?;
            timeline.set_max_length(game.config.max_history_length);

            game.position = position.clone();
            game.timeline = Some(timeline);
            Ok(position)
        })
    }

    pub fn status(&self) -> ActionResult<PositionStatus> {
        self.query("status", |game| Ok(game.oracle.status(&game.position)?))
    }

    pub fn is_checkmate(&self) -> ActionResult<bool> {
        self.query("is_checkmate", |game| {
            Ok(game.oracle.is_checkmate(&game.position)?)
        })
    }

    pub fn is_game_over(&self) -> ActionResult<bool> {
        self.query("is_game_over", |game| {
            Ok(game.oracle.status(&game.position)?.is_game_over())
        })
    }

    /// Legal moves of the live position in algebraic notation
    pub fn legal_moves(&self) -> ActionResult<Vec<String>> {
        self.query("legal_moves", |game| {
            let oracle: &dyn LegalityOracle = &game.oracle;
            let mut moves = Vec::new();
            for mv in oracle.legal_moves(&game.position, None)? {
                let applied = oracle.apply_move(&game.position, &mv.coordinate())?;
                let status = oracle.status(&applied.position)?;
                moves.push(notation::to_algebraic(
                    oracle,
                    &game.position,
                    &applied.resolved,
                    &status,
                )?);
            }
            Ok(moves)
        })
    }

    /// Back to the standard starting position with an empty timeline
    pub fn reset(&mut self) -> ActionResult<()> {
        self.run("reset", |game| {
            game.install(PositionRecord::starting(), None);
            Ok(())
        })
    }

    /// Turning history on starts an empty timeline at the live position;
    /// moves played while it was off are not reconstructed.
    pub fn set_history_enabled(&mut self, enabled: bool) {
        self.config.history_enabled = enabled;
        match (enabled, self.timeline.is_some()) {
            (true, false) => {
                self.timeline = Some(Timeline::new(
                    self.position.clone(),
                    self.config.max_history_length,
                ));
            }
            (false, true) => self.timeline = None,
            _ => {}
        }
        debug!("History enabled: {}", enabled);
    }

    pub fn set_strict_mode(&mut self, strict: bool) {
        self.config.strict_mode = strict;
    }

    pub fn set_logging_enabled(&mut self, enabled: bool) {
        self.config.logging_enabled = enabled;
        self.diagnostics.set_enabled(enabled);
    }

    pub fn set_diagnostic_sink<F>(&mut self, sink: F)
    where
        F: Fn(Severity, &str) + 'static,
    {
        self.diagnostics.set_sink(Some(std::sync::Arc::new(sink)));
    }

    pub fn clear_diagnostic_sink(&mut self) {
        self.diagnostics.set_sink(None);
    }

    fn ensure_not_over(&self) -> Result<()> {
        let status = self.oracle.status(&self.position)?;
        if status.checkmate {
            Err(GameError::GameOver("checkmate".to_string()))
        } else if status.stalemate {
            Err(GameError::GameOver("stalemate".to_string()))
        } else if status.draw {
            Err(GameError::GameOver("draw".to_string()))
        } else {
            Ok(())
        }
    }

    fn commit(&mut self, mv: &CoordinateMove) -> Result<TimelineEntry> {
        let applied = self.oracle.apply_move(&self.position, mv)?;
        let entry = TimelineEntry::from_applied(&self.oracle, &self.position, applied)?;

        self.position = entry.position().clone();
        if let Some(timeline) = self.timeline.as_mut() {
            timeline.record(entry.clone());
        }
        self.diagnostics
            .emit(Severity::Info, &format!("Played {}", entry.algebraic()));
        Ok(entry)
    }

    fn install(&mut self, position: PositionRecord, timeline: Option<Timeline>) {
        self.timeline = timeline.or_else(|| {
            self.config
                .history_enabled
                .then(|| Timeline::new(position.clone(), self.config.max_history_length))
        });
        self.position = position;
    }

    fn run<T>(&mut self, action: &str, f: impl FnOnce(&mut Self) -> Result<T>) -> ActionResult<T> {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| f(self)));
        self.finish(action, outcome)
    }

    fn query<T>(&self, action: &str, f: impl FnOnce(&Self) -> Result<T>) -> ActionResult<T> {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| f(self)));
        self.finish(action, outcome)
    }

    fn finish<T>(
        &self,
        action: &str,
        outcome: std::thread::Result<Result<T>>,
    ) -> ActionResult<T> {
        let result = outcome.unwrap_or_else(|panic| {
            Err(GameError::UnknownError(format!(
                "{} panicked: {}",
                action,
                panic_message(&*panic)
            )))
        });

        if let Err(e) = &result {
            self.diagnostics
                .emit(Severity::Warning, &format!("{} failed: {}", action, e));
        }
        result.into()
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
