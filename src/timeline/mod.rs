//! Linear move history with a cursor.
//!
//! The timeline stores every applied move together with the position it
//! produced. `cursor` is the index of the last applied entry, or -1 when
//! nothing is applied; entries past the cursor are available to redo until a
//! new move is recorded, which cuts them off.

use std::num::NonZeroUsize;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{GameError, Result};
use crate::oracle::LegalityOracle;
use crate::position::{compare_positions, PositionRecord};

mod entry;

pub use entry::TimelineEntry;

pub const DEFAULT_MAX_LENGTH: usize = 1000;

pub(crate) fn current_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Counts over the retained entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineStatistics {
    pub total_moves: usize,
    pub captures: usize,
    pub checks: usize,
    pub checkmates: usize,
    pub castles: usize,
    pub promotions: usize,
    pub en_passants: usize,
}

/// Serializable form of a [`Timeline`]. Entry timestamps are not carried.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineSnapshot {
    pub starting_position: PositionRecord,
    pub entries: Vec<TimelineEntry>,
    pub cursor: isize,
    pub max_length: NonZeroUsize,
    pub created_at: i64,
    pub updated_at: i64,
}

impl PartialEq for TimelineSnapshot {
    fn eq(&self, other: &Self) -> bool {
        self.starting_position == other.starting_position
            && self.entries == other.entries
            && self.cursor == other.cursor
            && self.max_length == other.max_length
    }
}

#[derive(Debug, Clone)]
pub struct Timeline {
    starting: PositionRecord,
    entries: Vec<TimelineEntry>,
    /// Number of applied entries; the cursor is `applied - 1`
    applied: usize,
    max_length: NonZeroUsize,
    created_at: i64,
    updated_at: i64,
}

impl Timeline {
    pub fn new(starting: PositionRecord, max_length: NonZeroUsize) -> Self {
        let now = current_timestamp();
        Self {
            starting,
            entries: Vec::new(),
            applied: 0,
            max_length,
            created_at: now,
            updated_at: now,
        }
    }

    /// Timeline whose cursor sits on the last of `entries`. The entries are
    /// trusted to form a replay from `starting`; overflow is evicted as if
    /// each had been recorded in turn.
    pub fn from_entries(
        starting: PositionRecord,
        entries: Vec<TimelineEntry>,
        max_length: NonZeroUsize,
    ) -> Self {
        let mut timeline = Self::new(starting, max_length);
        for entry in entries {
            timeline.record(entry);
        }
        timeline
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> isize {
        self.applied as isize - 1
    }

    pub fn can_undo(&self) -> bool {
        self.applied > 0
    }

    pub fn can_redo(&self) -> bool {
        self.applied < self.entries.len()
    }

    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    pub fn applied_entries(&self) -> &[TimelineEntry] {
        &self.entries[..self.applied]
    }

    pub fn current_entry(&self) -> Option<&TimelineEntry> {
        self.applied_entries().last()
    }

    /// Algebraic tokens up to the cursor
    pub fn history(&self) -> Vec<String> {
        self.applied_entries()
            .iter()
            .map(|e| e.algebraic().to_string())
            .collect()
    }

    pub fn starting_position(&self) -> &PositionRecord {
        &self.starting
    }

    /// Stored position at the cursor
    pub fn current_position(&self) -> &PositionRecord {
        match self.current_entry() {
            Some(entry) => entry.position(),
            None => &self.starting,
        }
    }

    pub fn max_length(&self) -> NonZeroUsize {
        self.max_length
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn updated_at(&self) -> i64 {
        self.updated_at
    }

    /// Append `entry` after the cursor, discarding any redo branch, then
    /// evict from the front if the timeline is over its maximum length.
    pub fn record(&mut self, entry: TimelineEntry) {
        if self.applied < self.entries.len() {
            debug!(
                "Discarding {} redo entries",
                self.entries.len() - self.applied
            );
            self.entries.truncate(self.applied);
        }

        self.entries.push(entry);
        self.applied += 1;

        let overflow = self.entries.len().saturating_sub(self.max_length.get());
        self.evict_front(overflow);
        self.touch();
    }

    /// Change the maximum length, shrinking the timeline to fit. Applied
    /// entries are evicted oldest first, but never past the cursor; any
    /// remaining excess comes off the redo end. The position at the cursor
    /// is unchanged.
    pub fn set_max_length(&mut self, max_length: NonZeroUsize) {
        self.max_length = max_length;
        let max = max_length.get();
        if self.entries.len() <= max {
            return;
        }

        let overflow = self.entries.len() - max;
        self.evict_front(overflow.min(self.applied));
        if self.entries.len() > max {
            debug!("Dropping {} redo entries", self.entries.len() - max);
            self.entries.truncate(max);
        }
        self.touch();
    }

    /// Drop the `count` oldest entries, which must all be applied
    fn evict_front(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        // Replay must still work from the new first entry
        self.starting = self.entries[count - 1].position().clone();
        self.entries.drain(..count);
        self.applied -= count;
        debug!("Evicted {} oldest entries", count);
    }

    /// Step the cursor back one entry and replay. `Ok(None)` when nothing is
    /// applied.
    pub fn undo(&mut self, oracle: &dyn LegalityOracle) -> Result<Option<PositionRecord>> {
        if self.applied == 0 {
            return Ok(None);
        }
        self.move_cursor(oracle, self.applied - 1).map(Some)
    }

    /// Re-apply the entry after the cursor. `Ok(None)` when there is nothing
    /// to redo. The cursor does not move if the oracle refuses the move or
    /// lands somewhere other than the stored position.
    pub fn redo(&mut self, oracle: &dyn LegalityOracle) -> Result<Option<PositionRecord>> {
        let Some(entry) = self.entries.get(self.applied) else {
            return Ok(None);
        };
        let ply = self.applied + 1;

        let applied = oracle
            .apply_move(self.current_position(), &entry.resolved().coordinate())
            .map_err(|e| {
                warn!("Redo of ply {} rejected: {}", ply, e);
                GameError::ReplayDesync {
                    ply,
                    reason: e.to_string(),
                }
            })?;

        if !compare_positions(&applied.position, entry.position()) {
            warn!("Redo of ply {} reached a different position", ply);
            return Err(GameError::ReplayDesync {
                ply,
                reason: format!(
                    "{} produced {} instead of {}",
                    entry.coordinate(),
                    applied.position,
                    entry.position()
                ),
            });
        }

        self.applied += 1;
        self.touch();
        Ok(Some(applied.position))
    }

    /// Put the cursor at `index` (-1 for the starting position) and replay.
    /// `Ok(None)` when `index` is out of range.
    pub fn seek(
        &mut self,
        oracle: &dyn LegalityOracle,
        index: isize,
    ) -> Result<Option<PositionRecord>> {
        if index < -1 || index >= self.entries.len() as isize {
            return Ok(None);
        }
        self.move_cursor(oracle, (index + 1) as usize).map(Some)
    }

    /// The cursor is committed only after the replay to `applied` succeeds.
    fn move_cursor(&mut self, oracle: &dyn LegalityOracle, applied: usize) -> Result<PositionRecord> {
        let position = self.replay_to(oracle, applied)?;
        self.applied = applied;
        self.touch();
        Ok(position)
    }

    /// Replay every applied entry from the starting position.
    pub fn restore_position(&self, oracle: &dyn LegalityOracle) -> Result<PositionRecord> {
        self.replay_to(oracle, self.applied)
    }

    fn replay_to(&self, oracle: &dyn LegalityOracle, applied: usize) -> Result<PositionRecord> {
        let mut position = self.starting.clone();

        for (idx, entry) in self.entries[..applied].iter().enumerate() {
            let ply = idx + 1;
            let step = oracle
                .apply_move(&position, &entry.resolved().coordinate())
                .map_err(|e| {
                    warn!("Replay stopped at ply {}: {}", ply, e);
                    GameError::ReplayDesync {
                        ply,
                        reason: e.to_string(),
                    }
                })?;

            if !compare_positions(&step.position, entry.position()) {
                warn!("Replay diverged at ply {}", ply);
                return Err(GameError::ReplayDesync {
                    ply,
                    reason: format!(
                        "{} produced {} instead of {}",
                        entry.coordinate(),
                        step.position,
                        entry.position()
                    ),
                });
            }
            position = step.position;
        }

        Ok(position)
    }

    /// Drop every entry and return the starting position
    pub fn clear(&mut self) -> PositionRecord {
        info!("Clearing {} timeline entries", self.entries.len());
        self.entries.clear();
        self.applied = 0;
        self.touch();
        self.starting.clone()
    }

    pub fn serialize(&self) -> TimelineSnapshot {
        TimelineSnapshot {
            starting_position: self.starting.clone(),
            entries: self.entries.clone(),
            cursor: self.cursor(),
            max_length: self.max_length,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Rebuild a timeline from a snapshot, replaying up to its cursor.
    /// Returns the timeline and the live position at the cursor.
    pub fn restore(
        snapshot: TimelineSnapshot,
        oracle: &dyn LegalityOracle,
    ) -> Result<(Timeline, PositionRecord)> {
        let len = snapshot.entries.len();
        if snapshot.cursor < -1 || snapshot.cursor >= len as isize {
            return Err(GameError::ReplayDesync {
                ply: 0,
                reason: format!(
                    "cursor {} is outside -1..={} for {} entries",
                    snapshot.cursor,
                    len as isize - 1,
                    len
                ),
            });
        }
        if len > snapshot.max_length.get() {
            return Err(GameError::ReplayDesync {
                ply: 0,
                reason: format!(
                    "{} entries exceed the maximum length {}",
                    len, snapshot.max_length
                ),
            });
        }

        let mut entries = snapshot.entries;
        for entry in &mut entries {
            entry.touch();
        }

        let timeline = Timeline {
            starting: snapshot.starting_position,
            entries,
            applied: (snapshot.cursor + 1) as usize,
            max_length: snapshot.max_length,
            created_at: snapshot.created_at,
            updated_at: snapshot.updated_at,
        };
        let position = timeline.restore_position(oracle)?;
        info!(
            "Restored timeline with {} entries at cursor {}",
            timeline.len(),
            timeline.cursor()
        );
        Ok((timeline, position))
    }

    pub fn statistics(&self) -> TimelineStatistics {
        let mut stats = TimelineStatistics {
            total_moves: self.entries.len(),
            ..TimelineStatistics::default()
        };

        for entry in &self.entries {
            let flags = entry.resolved().flags;
            stats.captures += usize::from(flags.capture);
            stats.castles += usize::from(flags.is_castle());
            stats.promotions += usize::from(flags.promotion);
            stats.en_passants += usize::from(flags.en_passant);
            stats.checks += usize::from(entry.is_check());
            stats.checkmates += usize::from(entry.is_checkmate());
        }

        stats
    }

    fn touch(&mut self) {
        self.updated_at = current_timestamp();
    }
}
