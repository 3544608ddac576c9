//! Validation, parsing and serialization of six-field position records.
//!
//! Validation never fails outright: it returns a [`ValidationReport`] that
//! carries the raw fields, the parsed record when valid, and the first error
//! found otherwise. Fields are checked in record order, so the reported error
//! is always the one for the left-most bad field.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::record::{CastlingRights, PositionRecord};
use crate::chess::{Color, Piece, Square};
use crate::error::{GameError, Result};
use crate::patterns::compiled as pattern;

const FIELD_COUNT: usize = 6;
const RANK_COUNT: usize = 8;

static CASTLING_PATTERN: OnceLock<Regex> = OnceLock::new();
static EN_PASSANT_PATTERN: OnceLock<Regex> = OnceLock::new();
static HALFMOVE_PATTERN: OnceLock<Regex> = OnceLock::new();
static FULLMOVE_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Outcome of [`validate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub valid: bool,
    /// Whitespace-separated fields as found in the input
    pub fields: Vec<String>,
    /// Parsed record, present exactly when `valid`
    pub record: Option<PositionRecord>,
    /// First validation failure, present exactly when not `valid`
    pub error: Option<GameError>,
}

impl ValidationReport {
    fn valid(fields: Vec<String>, record: PositionRecord) -> Self {
        Self {
            valid: true,
            fields,
            record: Some(record),
            error: None,
        }
    }

    fn invalid(fields: Vec<String>, error: GameError) -> Self {
        Self {
            valid: false,
            fields,
            record: None,
            error: Some(error),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn into_result(self) -> Result<PositionRecord> {
        match (self.record, self.error) {
            (Some(record), _) => Ok(record),
            (None, Some(error)) => Err(error),
            (None, None) => Err(GameError::MalformedRecord(
                "validation produced no record".to_string(),
            )),
        }
    }
}

/// Structured view of a record's non-placement fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionInfo {
    pub side_to_move: Color,
    pub white_kingside: bool,
    pub white_queenside: bool,
    pub black_kingside: bool,
    pub black_queenside: bool,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u64,
    pub fullmove_number: u64,
}

/// Validate position text, reporting the parsed fields and validity
pub fn validate(text: &str) -> ValidationReport {
    let fields: Vec<String> = text.split_whitespace().map(str::to_string).collect();

    if fields.len() != FIELD_COUNT {
        let found = fields.len();
        return ValidationReport::invalid(
            fields,
            GameError::MalformedRecord(format!(
                "expected exactly {FIELD_COUNT} fields (placement side castling en-passant halfmove fullmove), found {found}"
            )),
        );
    }

    match parse_fields(&fields) {
        Ok(record) => ValidationReport::valid(fields, record),
        Err(error) => ValidationReport::invalid(fields, error),
    }
}

/// Parse position text into a record
pub fn parse(text: &str) -> Result<PositionRecord> {
    validate(text).into_result()
}

/// Render a record as six space-separated fields
pub fn serialize(record: &PositionRecord) -> String {
    let en_passant = match record.en_passant {
        Some(square) => square.to_string(),
        None => "-".to_string(),
    };

    format!(
        "{} {} {} {} {} {}",
        record.placement,
        record.side_to_move.fen_char(),
        record.castling.to_fen(),
        en_passant,
        record.halfmove_clock,
        record.fullmove_number
    )
}

/// Identity on placement, side to move, castling rights and en passant;
/// the move clocks are ignored.
pub fn compare_positions(a: &PositionRecord, b: &PositionRecord) -> bool {
    a.side_to_move == b.side_to_move
        && a.castling == b.castling
        && a.en_passant == b.en_passant
        && (a.placement == b.placement || a.board() == b.board())
}

pub fn derive_info(record: &PositionRecord) -> PositionInfo {
    let castling = record.castling;
    PositionInfo {
        side_to_move: record.side_to_move,
        white_kingside: castling.white_kingside,
        white_queenside: castling.white_queenside,
        black_kingside: castling.black_kingside,
        black_queenside: castling.black_queenside,
        en_passant: record.en_passant,
        halfmove_clock: record.halfmove_clock,
        fullmove_number: record.fullmove_number,
    }
}

fn parse_fields(fields: &[String]) -> Result<PositionRecord> {
    let [placement, side, castling, en_passant, halfmove, fullmove] = fields else {
        return Err(GameError::MalformedRecord(format!(
            "expected exactly {FIELD_COUNT} fields, found {}",
            fields.len()
        )));
    };

    validate_placement(placement)?;
    let side_to_move = parse_side_to_move(side)?;
    let castling = parse_castling(castling)?;
    let en_passant = parse_en_passant(en_passant, side_to_move)?;
    let halfmove_clock = parse_halfmove(halfmove)?;
    let fullmove_number = parse_fullmove(fullmove)?;

    Ok(PositionRecord {
        placement: placement.clone(),
        side_to_move,
        castling,
        en_passant,
        halfmove_clock,
        fullmove_number,
    })
}

fn validate_placement(placement: &str) -> Result<()> {
    let groups: Vec<&str> = placement.split('/').collect();
    if groups.len() != RANK_COUNT {
        let rank = if groups.len() > RANK_COUNT {
            RANK_COUNT + 1
        } else {
            groups.len() + 1
        };
        return Err(GameError::InvalidPlacement {
            rank,
            reason: format!(
                "expected {RANK_COUNT} rank groups separated by '/', found {}",
                groups.len()
            ),
        });
    }

    for (idx, group) in groups.iter().enumerate() {
        let rank = idx + 1;
        let invalid = |reason: String| GameError::InvalidPlacement { rank, reason };

        if group.is_empty() {
            return Err(invalid("rank group is empty".to_string()));
        }

        let mut squares = 0usize;
        for c in group.chars() {
            if let Some(empty) = c.to_digit(10) {
                if !(1..=8).contains(&empty) {
                    return Err(invalid(format!(
                        "empty-square count '{c}' must be 1-8"
                    )));
                }
                squares += empty as usize;
            } else if Piece::from_fen_char(c).is_some() {
                squares += 1;
            } else {
                return Err(invalid(format!(
                    "unrecognized character '{c}' (valid pieces: KQRBNPkqrbnp)"
                )));
            }
        }

        if squares != 8 {
            return Err(invalid(format!(
                "'{group}' expands to {squares} squares, expected 8"
            )));
        }
    }

    Ok(())
}

fn parse_side_to_move(field: &str) -> Result<Color> {
    match field {
        "w" => Ok(Color::White),
        "b" => Ok(Color::Black),
        _ => Err(GameError::InvalidSideToMove(format!(
            "'{field}' (must be 'w' or 'b')"
        ))),
    }
}

fn parse_castling(field: &str) -> Result<CastlingRights> {
    let castling_pattern = pattern(&CASTLING_PATTERN, r"^(-|K?Q?k?q?)$");
    if field.is_empty() || !castling_pattern.is_match(field) {
        return Err(GameError::InvalidCastlingRights(format!(
            "'{field}' (expected a subset of KQkq in that order, or '-')"
        )));
    }
    Ok(CastlingRights::from_fen(field))
}

fn parse_en_passant(field: &str, side_to_move: Color) -> Result<Option<Square>> {
    if field == "-" {
        return Ok(None);
    }

    let en_passant_pattern = pattern(&EN_PASSANT_PATTERN, r"^[a-h][36]$");
    if !en_passant_pattern.is_match(field) {
        return Err(GameError::InvalidEnPassant(format!(
            "'{field}' (must be '-' or a square on rank 3 or 6)"
        )));
    }

    let square = field
        .parse::<Square>()
        .map_err(|e| GameError::InvalidEnPassant(e.to_string()))?;

    // The target sits behind the pawn that just moved, i.e. on the side
    // not to move's third rank.
    let expected_rank = match side_to_move {
        Color::White => 5,
        Color::Black => 2,
    };
    if square.rank != expected_rank {
        return Err(GameError::InvalidEnPassant(format!(
            "'{field}' does not match side to move {side_to_move}"
        )));
    }

    Ok(Some(square))
}

fn parse_halfmove(field: &str) -> Result<u64> {
    let halfmove_pattern = pattern(&HALFMOVE_PATTERN, r"^(0|[1-9][0-9]*)$");
    if !halfmove_pattern.is_match(field) {
        return Err(GameError::InvalidHalfmove(format!(
            "'{field}' (must be a non-negative integer)"
        )));
    }
    field
        .parse::<u64>()
        .map_err(|e| GameError::InvalidHalfmove(format!("'{field}': {e}")))
}

fn parse_fullmove(field: &str) -> Result<u64> {
    let fullmove_pattern = pattern(&FULLMOVE_PATTERN, r"^[1-9][0-9]*$");
    if !fullmove_pattern.is_match(field) {
        return Err(GameError::InvalidFullmove(format!(
            "'{field}' (must be a positive integer)"
        )));
    }
    field
        .parse::<u64>()
        .map_err(|e| GameError::InvalidFullmove(format!("'{field}': {e}")))
}
