use shakmaty::fen::Fen;
use shakmaty::{CastlingMode, Chess, EnPassantMode, Move, Position, Role};

use super::{AppliedMove, LegalityOracle, MoveFilter, OracleError};
use crate::chess::{Color, CoordinateMove, MoveFlags, PieceType, ResolvedMove, Square};
use crate::position::PositionRecord;

/// Standard-chess oracle backed by the `shakmaty` rules crate.
///
/// Stateless: every call rebuilds the rules position from the record text, so
/// one instance can serve any number of controllers.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShakmatyOracle;

impl ShakmatyOracle {
    pub fn new() -> Self {
        Self
    }

    fn load(&self, position: &PositionRecord) -> Result<Chess, OracleError> {
        let fen: Fen = position
            .to_string()
            .parse()
            .map_err(|e| OracleError::UnsupportedPosition(format!("{}", e)))?;
        fen.into_position::<Chess>(CastlingMode::Standard)
            .map_err(|e| OracleError::UnsupportedPosition(e.to_string()))
    }

    fn export(&self, pos: Chess) -> Result<PositionRecord, OracleError> {
        let text = Fen::from_position(pos, EnPassantMode::Legal).to_string();
        text.parse::<PositionRecord>().map_err(|e| {
            OracleError::Internal(format!("rules engine produced unreadable record '{}': {}", text, e))
        })
    }

    fn resolve(pos: &Chess, m: &Move) -> Result<Option<ResolvedMove>, OracleError> {
        let color = color(pos.turn());

        let resolved = match m {
            Move::Normal {
                role,
                from,
                capture,
                to,
                promotion,
            } => ResolvedMove {
                from: square(*from)?,
                to: square(*to)?,
                promotion: promotion.map(piece_type),
                piece: piece_type(*role),
                color,
                captured: capture.map(piece_type),
                flags: MoveFlags {
                    capture: capture.is_some(),
                    promotion: promotion.is_some(),
                    ..MoveFlags::default()
                },
            },
            Move::EnPassant { from, to } => ResolvedMove {
                from: square(*from)?,
                to: square(*to)?,
                promotion: None,
                piece: PieceType::Pawn,
                color,
                captured: Some(PieceType::Pawn),
                flags: MoveFlags {
                    capture: true,
                    en_passant: true,
                    ..MoveFlags::default()
                },
            },
            Move::Castle { king, rook } => {
                let king = square(*king)?;
                let rook = square(*rook)?;
                let kingside = rook.file > king.file;
                let to_file = if kingside { 6 } else { 2 };
                ResolvedMove {
                    from: king,
                    to: Square::new_unchecked(to_file, king.rank),
                    promotion: None,
                    piece: PieceType::King,
                    color,
                    captured: None,
                    flags: MoveFlags {
                        kingside_castle: kingside,
                        queenside_castle: !kingside,
                        ..MoveFlags::default()
                    },
                }
            }
            // Drops only exist in variants
            Move::Put { .. } => return Ok(None),
        };

        Ok(Some(resolved))
    }
}

impl LegalityOracle for ShakmatyOracle {
    fn apply_move(
        &self,
        position: &PositionRecord,
        mv: &CoordinateMove,
    ) -> Result<AppliedMove, OracleError> {
        let mut pos = self.load(position)?;

        let mut chosen = None;
        for m in pos.legal_moves() {
            if let Some(resolved) = Self::resolve(&pos, &m)? {
                if resolved.coordinate() == *mv {
                    chosen = Some((m, resolved));
                    break;
                }
            }
        }

        let (m, resolved) = chosen.ok_or_else(|| {
            OracleError::Rejected(format!("{} is not legal in {}", mv, position))
        })?;

        pos.play_unchecked(&m);
        Ok(AppliedMove {
            position: self.export(pos)?,
            resolved,
        })
    }

    fn legal_moves(
        &self,
        position: &PositionRecord,
        filter: Option<&MoveFilter>,
    ) -> Result<Vec<ResolvedMove>, OracleError> {
        let pos = self.load(position)?;

        let mut moves = Vec::new();
        for m in pos.legal_moves() {
            if let Some(resolved) = Self::resolve(&pos, &m)? {
                if filter.map_or(true, |f| f.matches(&resolved)) {
                    moves.push(resolved);
                }
            }
        }
        Ok(moves)
    }

    fn is_check(&self, position: &PositionRecord) -> Result<bool, OracleError> {
        Ok(self.load(position)?.is_check())
    }

    fn is_checkmate(&self, position: &PositionRecord) -> Result<bool, OracleError> {
        Ok(self.load(position)?.is_checkmate())
    }

    fn is_stalemate(&self, position: &PositionRecord) -> Result<bool, OracleError> {
        Ok(self.load(position)?.is_stalemate())
    }

    /// Stalemate, insufficient material or the fifty-move rule. Repetition
    /// needs game history and is not visible from a single position.
    fn is_draw(&self, position: &PositionRecord) -> Result<bool, OracleError> {
        let pos = self.load(position)?;
        Ok(pos.is_stalemate() || pos.is_insufficient_material() || pos.halfmoves() >= 100)
    }
}

fn square(sq: shakmaty::Square) -> Result<Square, OracleError> {
    sq.to_string()
        .parse::<Square>()
        .map_err(|e| OracleError::Internal(e.to_string()))
}

fn piece_type(role: Role) -> PieceType {
    match role {
        Role::Pawn => PieceType::Pawn,
        Role::Knight => PieceType::Knight,
        Role::Bishop => PieceType::Bishop,
        Role::Rook => PieceType::Rook,
        Role::Queen => PieceType::Queen,
        Role::King => PieceType::King,
    }
}

fn color(color: shakmaty::Color) -> Color {
    match color {
        shakmaty::Color::White => Color::White,
        shakmaty::Color::Black => Color::Black,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_castling_resolves_to_king_destination() {
        let oracle = ShakmatyOracle::new();
        let position: PositionRecord = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1".parse().unwrap();
        let castles: Vec<ResolvedMove> = oracle
            .legal_moves(&position, None)
            .unwrap()
            .into_iter()
            .filter(|m| m.flags.is_castle())
            .collect();

        assert_eq!(castles.len(), 2);
        assert!(castles
            .iter()
            .any(|m| m.uci() == "e1g1" && m.flags.kingside_castle));
        assert!(castles
            .iter()
            .any(|m| m.uci() == "e1c1" && m.flags.queenside_castle));
    }

    #[test]
    fn test_apply_move_rejects_illegal_move() {
        let oracle = ShakmatyOracle::new();
        let mv: CoordinateMove = "e2e5".parse().unwrap();
        let result = oracle.apply_move(&PositionRecord::starting(), &mv);
        assert!(matches!(result, Err(OracleError::Rejected(_))));
    }
}
