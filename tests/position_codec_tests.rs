use ply::chess::{Color, Piece, PieceType, Square};
use ply::position::{self, compare_positions, derive_info, PositionRecord, STARTING_FEN};
use ply::{ErrorKind, GameError};

mod common;
use common::record;

#[cfg(test)]
mod parsing_tests {
    use super::*;

    #[test]
    fn test_round_trip_preserves_text() {
        let cases = [
            STARTING_FEN,
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
            "rnbqkbnr/pp1ppppp/8/2p5/4P3/8/PPPP1PPP/RNBQKBNR w KQkq c6 0 2",
            "r3k2r/8/8/8/8/8/8/R3K2R w Kq - 12 40",
            "8/8/8/8/8/8/8/8 b - - 50 100",
            "4k3/8/8/8/8/8/8/4K3 w - - 0 1",
        ];

        for text in cases {
            let parsed = position::parse(text)
                .unwrap_or_else(|e| panic!("Failed to parse '{}': {}", text, e));
            assert_eq!(position::serialize(&parsed), text, "Round trip of '{}'", text);
            assert_eq!(parsed.to_string(), text);
        }
    }

    #[test]
    fn test_parsed_fields() {
        let parsed = record("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1");
        assert_eq!(parsed.side_to_move(), Color::Black);
        assert_eq!(parsed.en_passant(), Some("e3".parse::<Square>().unwrap()));
        assert_eq!(parsed.halfmove_clock(), 0);
        assert_eq!(parsed.fullmove_number(), 1);
        assert_eq!(
            parsed.piece_at("e4".parse().unwrap()),
            Some(Piece::new(PieceType::Pawn, Color::White))
        );
        assert_eq!(parsed.piece_at("e2".parse().unwrap()), None);
    }

    #[test]
    fn test_surrounding_whitespace_is_accepted() {
        let parsed = position::parse(&format!("  {}\n", STARTING_FEN)).unwrap();
        assert_eq!(parsed, PositionRecord::starting());
    }
}

#[cfg(test)]
mod validation_tests {
    use super::*;

    fn error_kind(text: &str) -> ErrorKind {
        let report = position::validate(text);
        assert!(!report.is_valid(), "Expected '{}' to be rejected", text);
        let error = report.error.expect("invalid report carries an error");
        assert!(error.is_record_error(), "{:?}", error);
        error.kind()
    }

    #[test]
    fn test_large_clocks_are_accepted() {
        let text = "4k3/8/8/8/8/8/8/4K3 w - - 4294967296 99999999999";
        let parsed = position::parse(text).unwrap();
        assert_eq!(parsed.halfmove_clock(), 4_294_967_296);
        assert_eq!(parsed.fullmove_number(), 99_999_999_999);
        assert_eq!(position::serialize(&parsed), text);
    }

    #[test]
    fn test_record_errors_are_told_apart() {
        assert!(GameError::InvalidEnPassant("x".into()).is_record_error());
        assert!(!GameError::IllegalMove("x".into()).is_record_error());
        assert!(!GameError::HistoryDisabled.is_record_error());
    }

    #[test]
    fn test_field_count() {
        for text in [
            "",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1 extra",
        ] {
            assert_eq!(error_kind(text), ErrorKind::MalformedRecord, "'{}'", text);
        }
    }

    #[test]
    fn test_each_field_reports_its_own_kind() {
        let cases = [
            (
                "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNX w KQkq - 0 1",
                ErrorKind::InvalidPlacement,
            ),
            (
                "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1",
                ErrorKind::InvalidSideToMove,
            ),
            (
                "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQxq - 0 1",
                ErrorKind::InvalidCastlingRights,
            ),
            (
                "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w QK - 0 1",
                ErrorKind::InvalidCastlingRights,
            ),
            (
                "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e4 0 1",
                ErrorKind::InvalidEnPassant,
            ),
            (
                "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e3 0 1",
                ErrorKind::InvalidEnPassant,
            ),
            (
                "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - -1 1",
                ErrorKind::InvalidHalfmove,
            ),
            (
                "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 07 1",
                ErrorKind::InvalidHalfmove,
            ),
            (
                "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 0",
                ErrorKind::InvalidFullmove,
            ),
        ];

        for (text, expected) in cases {
            assert_eq!(error_kind(text), expected, "'{}'", text);
        }
    }

    #[test]
    fn test_first_bad_field_wins() {
        // Bad side to move and bad fullmove: side to move comes first
        let kind = error_kind("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR z KQkq - 0 0");
        assert_eq!(kind, ErrorKind::InvalidSideToMove);
    }

    #[test]
    fn test_placement_errors_name_the_rank_group() {
        let cases = [
            ("rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", 3),
            ("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBN w KQkq - 0 1", 8),
            ("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP w KQkq - 0 1", 8),
            ("rnbqkbnr/pppppppp/8/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", 9),
            ("rnbqkbnr//8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", 2),
        ];

        for (text, expected_rank) in cases {
            match position::validate(text).error {
                Some(GameError::InvalidPlacement { rank, .. }) => {
                    assert_eq!(rank, expected_rank, "Rank for '{}'", text)
                }
                other => panic!("Expected InvalidPlacement for '{}', got {:?}", text, other),
            }
        }
    }

    #[test]
    fn test_valid_report_carries_record() {
        let report = position::validate(STARTING_FEN);
        assert!(report.is_valid());
        assert!(report.error.is_none());
        assert_eq!(report.fields.len(), 6);
        assert_eq!(report.record, Some(PositionRecord::starting()));
    }
}

#[cfg(test)]
mod comparison_tests {
    use super::*;

    #[test]
    fn test_compare_ignores_clocks() {
        let a = record("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let b = record("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 37 58");
        assert!(compare_positions(&a, &b));
        assert_ne!(a, b);
    }

    #[test]
    fn test_compare_sees_other_fields() {
        let base = record("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        for other in [
            "r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1",
            "r3k2r/8/8/8/8/8/8/R3K2R w Kkq - 0 1",
            "r3k2r/8/8/8/8/8/8/R4K1R w KQkq - 0 1",
        ] {
            assert!(!compare_positions(&base, &record(other)), "'{}'", other);
        }
    }

    #[test]
    fn test_derive_info() {
        let info = derive_info(&record(
            "rnbqkbnr/pp1ppppp/8/2p5/4P3/8/PPPP1PPP/RNBQKBNR w Kq c6 3 2",
        ));
        assert_eq!(info.side_to_move, Color::White);
        assert!(info.white_kingside);
        assert!(!info.white_queenside);
        assert!(!info.black_kingside);
        assert!(info.black_queenside);

        let rights = record("rnbqkbnr/pp1ppppp/8/2p5/4P3/8/PPPP1PPP/RNBQKBNR w Kq c6 3 2")
            .castling_rights();
        assert!(rights.has(Color::White, true));
        assert!(!rights.has(Color::Black, true));
        assert_eq!(rights.to_fen(), "Kq");
        assert_eq!(info.en_passant.map(|sq| sq.to_string()), Some("c6".to_string()));
        assert_eq!(info.halfmove_clock, 3);
        assert_eq!(info.fullmove_number, 2);
    }

    #[test]
    fn test_record_serde_uses_text() {
        let parsed = PositionRecord::starting();
        let json = serde_json::to_string(&parsed).unwrap();
        assert_eq!(json, format!("\"{}\"", STARTING_FEN));
        let back: PositionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, parsed);
        assert!(serde_json::from_str::<PositionRecord>("\"not a position\"").is_err());
    }
}
