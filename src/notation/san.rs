use tracing::debug;

use super::token::{is_coordinate, normalize, parse_algebraic, AlgebraicParts};
use crate::chess::{CoordinateMove, PieceType, ResolvedMove, Square};
use crate::error::{GameError, Result};
use crate::oracle::{AppliedMove, LegalityOracle, MoveFilter, PositionStatus};
use crate::position::PositionRecord;

/// Coordinate text of a move: origin, destination, lowercase promotion
pub fn to_uci(mv: &CoordinateMove) -> String {
    mv.to_string()
}

/// Parse a coordinate token and have the oracle play it
pub fn from_uci(
    oracle: &dyn LegalityOracle,
    position: &PositionRecord,
    token: &str,
) -> Result<AppliedMove> {
    let token = token.trim();
    if token.len() < 4 {
        return Err(GameError::InvalidNotation(format!(
            "'{}' is too short for a coordinate move",
            token
        )));
    }

    let mv: CoordinateMove = token.parse()?;
    Ok(oracle.apply_move(position, &mv)?)
}

/// Minimal origin hint that separates `mv` from other legal moves of the
/// same piece type to the same square: file, then rank, then full square.
pub fn disambiguate(
    oracle: &dyn LegalityOracle,
    position: &PositionRecord,
    mv: &ResolvedMove,
) -> Result<String> {
    if mv.piece == PieceType::Pawn {
        return Ok(String::new());
    }

    let filter = MoveFilter::piece_to(mv.piece, mv.to);
    let competitors: Vec<Square> = oracle
        .legal_moves(position, Some(&filter))?
        .into_iter()
        .map(|other| other.from)
        .filter(|from| *from != mv.from)
        .collect();

    if competitors.is_empty() {
        Ok(String::new())
    } else if !competitors.iter().any(|sq| sq.same_file(&mv.from)) {
        Ok(mv.from.file_char().to_string())
    } else if !competitors.iter().any(|sq| sq.same_rank(&mv.from)) {
        Ok(mv.from.rank_char().to_string())
    } else {
        Ok(mv.from.to_string())
    }
}

/// Render `mv`, played from `before`, in algebraic notation. `after` is the
/// status of the resulting position and decides the `+`/`#` suffix.
pub fn to_algebraic(
    oracle: &dyn LegalityOracle,
    before: &PositionRecord,
    mv: &ResolvedMove,
    after: &PositionStatus,
) -> Result<String> {
    let mut san = String::new();

    if mv.flags.kingside_castle {
        san.push_str("O-O");
    } else if mv.flags.queenside_castle {
        san.push_str("O-O-O");
    } else {
        if mv.piece == PieceType::Pawn {
            if mv.flags.capture {
                san.push(mv.from.file_char());
            }
        } else {
            san.push(mv.piece.letter());
            san.push_str(&disambiguate(oracle, before, mv)?);
        }
        if mv.flags.capture {
            san.push('x');
        }
        san.push_str(&mv.to.to_string());
        if let Some(promotion) = mv.promotion {
            san.push('=');
            san.push(promotion.letter());
        }
    }

    if after.checkmate {
        san.push('#');
    } else if after.check {
        san.push('+');
    }

    Ok(san)
}

/// Resolve a castling, coordinate or algebraic token to exactly one legal
/// move in `position`.
///
/// Lenient mode fills in a missing promotion piece with a queen and ignores a
/// capture marker that disagrees with the board; strict mode rejects both.
pub fn resolve(
    oracle: &dyn LegalityOracle,
    position: &PositionRecord,
    token: &str,
    strict: bool,
) -> Result<ResolvedMove> {
    let normalized = normalize(token);
    if normalized.is_empty() {
        return Err(GameError::InvalidNotation(format!(
            "'{}' is not a recognizable move",
            token.trim()
        )));
    }

    let legal = oracle.legal_moves(position, None)?;
    debug!(
        "Resolving '{}' against {} legal moves",
        normalized,
        legal.len()
    );

    match normalized.as_str() {
        "O-O" | "O-O-O" => {
            let kingside = normalized == "O-O";
            legal
                .into_iter()
                .find(|m| {
                    if kingside {
                        m.flags.kingside_castle
                    } else {
                        m.flags.queenside_castle
                    }
                })
                .ok_or_else(|| {
                    GameError::IllegalMove(format!("{} is not available in {}", normalized, position))
                })
        }
        text if is_coordinate(text) => resolve_coordinate(legal, position, text, strict),
        text => {
            let parts = parse_algebraic(text).ok_or_else(|| {
                GameError::InvalidNotation(format!("'{}' is not a recognizable move", text))
            })?;
            resolve_algebraic(legal, position, text, &parts, strict)
        }
    }
}

fn resolve_coordinate(
    legal: Vec<ResolvedMove>,
    position: &PositionRecord,
    text: &str,
    strict: bool,
) -> Result<ResolvedMove> {
    let requested: CoordinateMove = text.parse()?;
    let candidates: Vec<ResolvedMove> = legal
        .into_iter()
        .filter(|m| m.from == requested.from && m.to == requested.to)
        .collect();

    pick_promotion(candidates, requested.promotion, position, text, strict)
}

fn resolve_algebraic(
    legal: Vec<ResolvedMove>,
    position: &PositionRecord,
    text: &str,
    parts: &AlgebraicParts,
    strict: bool,
) -> Result<ResolvedMove> {
    let candidates: Vec<ResolvedMove> = legal
        .into_iter()
        .filter(|m| {
            !m.flags.is_castle()
                && m.piece == parts.piece
                && m.to == parts.to
                && parts.from_file.map_or(true, |file| m.from.file == file)
                && parts.from_rank.map_or(true, |rank| m.from.rank == rank)
        })
        .collect();

    let chosen = pick_promotion(candidates, parts.promotion, position, text, strict)?;

    if strict && chosen.flags.capture != parts.capture {
        let reason = if parts.capture {
            "marks a capture but the destination is empty"
        } else {
            "captures without the 'x' marker"
        };
        return Err(GameError::InvalidNotation(format!("'{}' {}", text, reason)));
    }

    Ok(chosen)
}

/// Narrow same-square candidates by promotion piece and insist on exactly
/// one survivor.
fn pick_promotion(
    candidates: Vec<ResolvedMove>,
    promotion: Option<PieceType>,
    position: &PositionRecord,
    text: &str,
    strict: bool,
) -> Result<ResolvedMove> {
    if candidates.is_empty() {
        return Err(GameError::IllegalMove(format!(
            "{} is not legal in {}",
            text, position
        )));
    }

    let wanted = match promotion {
        Some(piece) => Some(piece),
        None if candidates.iter().any(|m| m.promotion.is_some()) => {
            if strict {
                return Err(GameError::InvalidNotation(format!(
                    "'{}' reaches the last rank without naming a promotion piece",
                    text
                )));
            }
            Some(PieceType::Queen)
        }
        None => None,
    };

    let mut matching = candidates.into_iter().filter(|m| m.promotion == wanted);
    let first = matching.next().ok_or_else(|| {
        GameError::IllegalMove(format!("{} is not legal in {}", text, position))
    })?;

    let rest: Vec<String> = matching.map(|m| m.uci()).collect();
    if !rest.is_empty() {
        return Err(GameError::InvalidNotation(format!(
            "'{}' is ambiguous: {} or {}",
            text,
            first.uci(),
            rest.join(", ")
        )));
    }

    Ok(first)
}

/// Algebraic token to coordinate text
pub fn algebraic_to_uci(
    oracle: &dyn LegalityOracle,
    position: &PositionRecord,
    token: &str,
    strict: bool,
) -> Result<String> {
    Ok(resolve(oracle, position, token, strict)?.uci())
}

/// Coordinate token to algebraic text, with check/mate suffix
pub fn uci_to_algebraic(
    oracle: &dyn LegalityOracle,
    position: &PositionRecord,
    token: &str,
) -> Result<String> {
    let applied = from_uci(oracle, position, token)?;
    let status = oracle.status(&applied.position)?;
    to_algebraic(oracle, position, &applied.resolved, &status)
}
