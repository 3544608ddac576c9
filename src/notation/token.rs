use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::chess::{PieceType, Square};
use crate::patterns::compiled as pattern;

static MOVE_NUMBER_PREFIX: OnceLock<Regex> = OnceLock::new();
static EN_PASSANT_SUFFIX: OnceLock<Regex> = OnceLock::new();
static CASTLING_TOKEN: OnceLock<Regex> = OnceLock::new();
static COORDINATE_TOKEN: OnceLock<Regex> = OnceLock::new();
static ALGEBRAIC_TOKEN: OnceLock<Regex> = OnceLock::new();
static PROMOTION_MARKER: OnceLock<Regex> = OnceLock::new();

const RESULT_TOKENS: [&str; 5] = ["1-0", "0-1", "1/2-1/2", "\u{bd}-\u{bd}", "*"];
const ANNOTATION_GLYPHS: &[char] = &['+', '#', '!', '?'];

fn move_number_prefix() -> &'static Regex {
    pattern(&MOVE_NUMBER_PREFIX, r"^[0-9]+\s*\.+\s*")
}

fn coordinate_token() -> &'static Regex {
    pattern(&COORDINATE_TOKEN, r"^[a-h][1-8][a-h][1-8][qrbnQRBN]?$")
}

fn algebraic_token() -> &'static Regex {
    pattern(
        &ALGEBRAIC_TOKEN,
        r"^([KQRBN])?([a-h])?([1-8])?(x)?([a-h][1-8])(?:=?([QRBNqrbn]))?$",
    )
}

/// Structural flags read off a move token's text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClass {
    pub is_castling: bool,
    pub is_capture: bool,
    pub is_check: bool,
    pub is_checkmate: bool,
    pub promotion: Option<PieceType>,
}

/// Components of a canonical algebraic token such as `Nbxd2` or `exd8=Q`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlgebraicParts {
    pub piece: PieceType,
    pub from_file: Option<u8>,
    pub from_rank: Option<u8>,
    pub capture: bool,
    pub to: Square,
    pub promotion: Option<PieceType>,
}

/// Canonicalize a move token.
///
/// Total and idempotent. Anything that is not a castling, coordinate or
/// algebraic move (result markers included) comes back empty.
pub fn normalize(token: &str) -> String {
    let collapsed = token.split_whitespace().collect::<Vec<_>>().join(" ");
    if is_result(&collapsed) {
        return String::new();
    }

    let without_number = move_number_prefix().replace(&collapsed, "");
    let without_ep = pattern(&EN_PASSANT_SUFFIX, r"\s*e\.?p\.?$").replace(&without_number, "");
    let core = without_ep.trim_end_matches(ANNOTATION_GLYPHS);

    if is_result(core) {
        return String::new();
    }

    if let Some(castle) = canonical_castling(core) {
        return castle.to_string();
    }

    if coordinate_token().is_match(core) {
        return core.to_ascii_lowercase();
    }

    match parse_algebraic(core) {
        Some(parts) => render_parts(&parts),
        None => String::new(),
    }
}

/// Game termination markers, which are never moves
pub(crate) fn is_result(token: &str) -> bool {
    RESULT_TOKENS.contains(&token)
}

/// Read castling/capture/check/mate/promotion markers off a raw token
pub fn classify(token: &str) -> TokenClass {
    let trimmed = token.trim();
    let without_number = move_number_prefix().replace(trimmed, "");
    let core = without_number.trim_end_matches(&['!', '?'][..]);

    let is_checkmate = core.ends_with('#');
    let is_check = !is_checkmate && core.ends_with('+');
    let body = core.trim_end_matches(ANNOTATION_GLYPHS);

    let promotion = pattern(&PROMOTION_MARKER, r"=([QRBNqrbn])")
        .captures(body)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().chars().next())
        .and_then(PieceType::from_letter);

    TokenClass {
        is_castling: canonical_castling(body).is_some(),
        is_capture: body.contains('x'),
        is_check,
        is_checkmate,
        promotion,
    }
}

/// Split an algebraic token into its components. Accepts the lenient
/// promotion forms (`e8Q`, `e8=q`); returns `None` for anything else.
pub fn parse_algebraic(token: &str) -> Option<AlgebraicParts> {
    let caps = algebraic_token().captures(token)?;

    let piece = match caps.get(1) {
        Some(m) => PieceType::from_letter(m.as_str().chars().next()?)?,
        None => PieceType::Pawn,
    };
    let from_file = caps
        .get(2)
        .and_then(|m| m.as_str().bytes().next())
        .map(|b| b - b'a');
    let from_rank = caps
        .get(3)
        .and_then(|m| m.as_str().bytes().next())
        .map(|b| b - b'1');
    let to = caps.get(5)?.as_str().parse::<Square>().ok()?;
    let promotion = match caps.get(6) {
        Some(m) => Some(PieceType::from_letter(m.as_str().chars().next()?)?),
        None => None,
    };

    // Only pawns promote, and a promotion letter on anything else is noise
    // this grammar should not accept.
    if promotion.is_some() && piece != PieceType::Pawn {
        return None;
    }

    Some(AlgebraicParts {
        piece,
        from_file,
        from_rank,
        capture: caps.get(4).is_some(),
        to,
        promotion,
    })
}

/// True for coordinate text such as `e2e4` or `e7e8q`
pub fn is_coordinate(token: &str) -> bool {
    coordinate_token().is_match(token)
}

fn canonical_castling(token: &str) -> Option<&'static str> {
    let castling = pattern(&CASTLING_TOKEN, r"^[0Oo]-[0Oo](-[0Oo])?$");
    let caps = castling.captures(token)?;
    if caps.get(1).is_some() {
        Some("O-O-O")
    } else {
        Some("O-O")
    }
}

fn render_parts(parts: &AlgebraicParts) -> String {
    let mut text = String::new();
    if parts.piece != PieceType::Pawn {
        text.push(parts.piece.letter());
    }
    if let Some(file) = parts.from_file {
        text.push((b'a' + file) as char);
    }
    if let Some(rank) = parts.from_rank {
        text.push((b'1' + rank) as char);
    }
    if parts.capture {
        text.push('x');
    }
    text.push_str(&parts.to.to_string());
    if let Some(promotion) = parts.promotion {
        text.push('=');
        text.push(promotion.letter());
    }
    text
}
