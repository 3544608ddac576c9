//! Movetext in the form `1. e4 e5 2. Nf3`, optionally opening with `N...`
//! when black moves first.

use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::chess::Color;
use crate::error::{GameError, Result};
use crate::notation;
use crate::oracle::LegalityOracle;
use crate::patterns::compiled as pattern;
use crate::position::PositionRecord;
use crate::timeline::{Timeline, TimelineEntry};

static TAG_PAIR: OnceLock<Regex> = OnceLock::new();
static BRACE_COMMENT: OnceLock<Regex> = OnceLock::new();
static LINE_COMMENT: OnceLock<Regex> = OnceLock::new();
static VARIATION: OnceLock<Regex> = OnceLock::new();
static MOVE_NUMBER: OnceLock<Regex> = OnceLock::new();
static NAG: OnceLock<Regex> = OnceLock::new();

/// Regenerate movetext for the applied part of `timeline` by replaying it
/// from its starting position. Stops at the first move the oracle refuses
/// and returns what was built up to there.
pub fn build(timeline: &Timeline, oracle: &dyn LegalityOracle) -> String {
    let mut position = timeline.starting_position().clone();
    let mut parts: Vec<String> = Vec::new();

    for (idx, entry) in timeline.applied_entries().iter().enumerate() {
        let ply = idx + 1;
        let before = position.clone();
        let step = oracle
            .apply_move(&before, &entry.resolved().coordinate())
            .map_err(GameError::from)
            .and_then(|applied| {
                let status = oracle.status(&applied.position)?;
                let san = notation::to_algebraic(oracle, &before, &applied.resolved, &status)?;
                Ok((applied.position, san))
            });

        let (next, san) = match step {
            Ok(step) => step,
            Err(e) => {
                warn!("Transcript stopped at ply {}: {}", ply, e);
                break;
            }
        };

        match before.side_to_move() {
            Color::White => parts.push(format!("{}.", before.fullmove_number())),
            Color::Black if idx == 0 => parts.push(format!("{}...", before.fullmove_number())),
            Color::Black => {}
        }
        parts.push(san);
        position = next;
    }

    parts.join(" ")
}

/// Parse movetext played from `start` into timeline entries.
///
/// Tag pairs, comments, variations, move numbers, NAGs and result markers
/// are skipped. The first token that does not resolve to a legal move aborts
/// the parse.
pub fn parse(
    text: &str,
    start: &PositionRecord,
    oracle: &dyn LegalityOracle,
    strict: bool,
) -> Result<Vec<TimelineEntry>> {
    let tokens = tokenize(text);
    debug!("Parsing transcript with {} move tokens", tokens.len());

    let mut position = start.clone();
    let mut entries = Vec::with_capacity(tokens.len());

    for (idx, token) in tokens.iter().enumerate() {
        let ply = idx + 1;
        let fail = |e: GameError| GameError::TranscriptError {
            ply,
            token: token.clone(),
            reason: e.to_string(),
        };

        let resolved = notation::resolve(oracle, &position, token, strict).map_err(fail)?;
        let applied = oracle
            .apply_move(&position, &resolved.coordinate())
            .map_err(|e| fail(e.into()))?;
        let entry = TimelineEntry::from_applied(oracle, &position, applied).map_err(fail)?;

        position = entry.position().clone();
        entries.push(entry);
    }

    Ok(entries)
}

/// Move tokens of a movetext, in order
pub fn tokenize(text: &str) -> Vec<String> {
    let without_tags = pattern(&TAG_PAIR, r"\[[^\]]*\]").replace_all(text, " ");
    let without_comments =
        pattern(&BRACE_COMMENT, r"\{[^}]*\}").replace_all(&without_tags, " ");
    let without_line_comments =
        pattern(&LINE_COMMENT, r";[^\n]*").replace_all(&without_comments, " ");

    // Variations nest, so peel the innermost ones until none are left
    let variation = pattern(&VARIATION, r"\([^()]*\)");
    let mut body = without_line_comments.into_owned();
    while variation.is_match(&body) {
        body = variation.replace_all(&body, " ").into_owned();
    }

    let body = pattern(&MOVE_NUMBER, r"\b[0-9]+\.+").replace_all(&body, " ");
    let nag = pattern(&NAG, r"^\$[0-9]+$");

    body.split_whitespace()
        .filter(|token| !nag.is_match(token) && !notation::is_result(token))
        .map(str::to_string)
        .collect()
}
