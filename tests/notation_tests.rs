use ply::chess::{CoordinateMove, PieceType};
use ply::notation::{self, classify, normalize};
use ply::oracle::ShakmatyOracle;
use ply::{ErrorKind, PositionRecord};

mod common;
use common::{position_after, record};

const TWO_KNIGHTS_FILES: &str = "4k3/8/8/8/8/5N2/8/1N2K3 w - - 0 1";
const TWO_KNIGHTS_RANKS: &str = "4k3/8/8/6N1/8/8/8/4K1N1 w - - 0 1";
const THREE_QUEENS: &str = "7K/8/8/7k/8/Q7/8/Q1Q5 w - - 0 1";
const PROMOTION: &str = "8/P7/8/8/8/8/8/4K2k w - - 0 1";
const CASTLING: &str = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1";

#[cfg(test)]
mod token_tests {
    use super::*;

    #[test]
    fn test_normalize_is_idempotent() {
        let tokens = [
            "e4", "1. e4", "12...Nf6", "Nbd2", "R1a3", "Qa1b2", "exd5", "exd6 e.p.", "e8Q",
            "e8=q", "exd8=N+", "e7e8q", "E2E4", "0-0", "o-o-o", "O-O-O#", "Qxf7#", "Nf3!?",
            "1-0", "1/2-1/2", "*", "", "   ", "garbage", "Kd8=Q", "z9", "a", "12.",
        ];

        for token in tokens {
            let once = normalize(token);
            assert_eq!(normalize(&once), once, "normalize is not idempotent on {:?}", token);
        }
    }

    #[test]
    fn test_classify() {
        let cases = [
            ("O-O", true, false, false, false, None),
            ("0-0-0+", true, false, true, false, None),
            ("Nxe5", false, true, false, false, None),
            ("Qh5+", false, false, true, false, None),
            ("Qxf7#", false, true, false, true, None),
            ("exd8=n+", false, true, true, false, Some(PieceType::Knight)),
            ("e8=Q", false, false, false, false, Some(PieceType::Queen)),
        ];

        for (token, castling, capture, check, mate, promotion) in cases {
            let class = classify(token);
            assert_eq!(class.is_castling, castling, "castling flag of {}", token);
            assert_eq!(class.is_capture, capture, "capture flag of {}", token);
            assert_eq!(class.is_check, check, "check flag of {}", token);
            assert_eq!(class.is_checkmate, mate, "mate flag of {}", token);
            assert_eq!(class.promotion, promotion, "promotion of {}", token);
        }
    }

    #[test]
    fn test_to_uci() {
        let mv: CoordinateMove = "e7e8q".parse().unwrap();
        assert_eq!(notation::to_uci(&mv), "e7e8q");
        let mv = CoordinateMove::castling(ply::chess::Color::Black, true);
        assert_eq!(notation::to_uci(&mv), "e8g8");
    }
}

#[cfg(test)]
mod coordinate_tests {
    use super::*;

    #[test]
    fn test_from_uci_applies_move() {
        let oracle = ShakmatyOracle::new();
        let applied = notation::from_uci(&oracle, &PositionRecord::starting(), "e2e4").unwrap();
        assert_eq!(applied.resolved.piece, PieceType::Pawn);
        assert_eq!(applied.position.placement(), "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR");
    }

    #[test]
    fn test_from_uci_errors() {
        let oracle = ShakmatyOracle::new();
        let start = PositionRecord::starting();

        let cases = [
            ("e2", ErrorKind::InvalidNotation),
            ("", ErrorKind::InvalidNotation),
            ("e2e9", ErrorKind::InvalidNotation),
            ("e2e5", ErrorKind::IllegalMove),
            ("e1e2", ErrorKind::IllegalMove),
        ];
        for (token, expected) in cases {
            let err = notation::from_uci(&oracle, &start, token).unwrap_err();
            assert_eq!(err.kind(), expected, "from_uci({:?}) gave {}", token, err);
        }
    }
}

#[cfg(test)]
mod disambiguation_tests {
    use super::*;

    fn disambiguator(position: &str, uci: &str) -> String {
        let oracle = ShakmatyOracle::new();
        let position = record(position);
        let mv = notation::resolve(&oracle, &position, uci, true).unwrap();
        notation::disambiguate(&oracle, &position, &mv).unwrap()
    }

    #[test]
    fn test_file_disambiguator_when_files_differ() {
        assert_eq!(disambiguator(TWO_KNIGHTS_FILES, "b1d2"), "b");
        assert_eq!(disambiguator(TWO_KNIGHTS_FILES, "f3d2"), "f");
    }

    #[test]
    fn test_rank_disambiguator_when_files_match() {
        assert_eq!(disambiguator(TWO_KNIGHTS_RANKS, "g1f3"), "1");
        assert_eq!(disambiguator(TWO_KNIGHTS_RANKS, "g5f3"), "5");
    }

    #[test]
    fn test_full_square_when_file_and_rank_are_shared() {
        assert_eq!(disambiguator(THREE_QUEENS, "a1b2"), "a1");
        assert_eq!(disambiguator(THREE_QUEENS, "a3b2"), "3");
        assert_eq!(disambiguator(THREE_QUEENS, "c1b2"), "c");
    }

    #[test]
    fn test_no_disambiguator_for_unique_moves_and_pawns() {
        assert_eq!(disambiguator(TWO_KNIGHTS_FILES, "f3h4"), "");
        assert_eq!(disambiguator(ply::position::STARTING_FEN, "e2e4"), "");
    }

    #[test]
    fn test_algebraic_rendering_includes_disambiguator() {
        let oracle = ShakmatyOracle::new();
        let position = record(TWO_KNIGHTS_FILES);
        assert_eq!(notation::uci_to_algebraic(&oracle, &position, "b1d2").unwrap(), "Nbd2");

        let position = record(THREE_QUEENS);
        assert_eq!(notation::uci_to_algebraic(&oracle, &position, "a1b2").unwrap(), "Qa1b2");
    }
}

#[cfg(test)]
mod resolution_tests {
    use super::*;

    #[test]
    fn test_resolve_algebraic_and_coordinate_agree() {
        let oracle = ShakmatyOracle::new();
        let start = PositionRecord::starting();
        for (san, uci) in [("e4", "e2e4"), ("Nf3", "g1f3"), ("1. Nc3", "b1c3"), ("a3", "a2a3")] {
            let from_san = notation::resolve(&oracle, &start, san, true).unwrap();
            let from_uci = notation::resolve(&oracle, &start, uci, true).unwrap();
            assert_eq!(from_san, from_uci, "{} vs {}", san, uci);
            assert_eq!(from_san.uci(), uci);
        }
    }

    #[test]
    fn test_ambiguous_token_is_rejected() {
        let oracle = ShakmatyOracle::new();
        let err = notation::resolve(&oracle, &record(TWO_KNIGHTS_FILES), "Nd2", false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidNotation);
        assert!(err.to_string().contains("ambiguous"), "{}", err);
    }

    #[test]
    fn test_unrecognizable_and_illegal_tokens() {
        let oracle = ShakmatyOracle::new();
        let start = PositionRecord::starting();

        let err = notation::resolve(&oracle, &start, "hello", false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidNotation);

        let err = notation::resolve(&oracle, &start, "Nf6", false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IllegalMove);

        let err = notation::resolve(&oracle, &start, "O-O", false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IllegalMove);
    }

    #[test]
    fn test_castling_tokens() {
        let oracle = ShakmatyOracle::new();
        let position = record(CASTLING);

        let kingside = notation::resolve(&oracle, &position, "0-0", true).unwrap();
        assert_eq!(kingside.uci(), "e1g1");
        assert!(kingside.flags.kingside_castle);

        let queenside = notation::resolve(&oracle, &position, "O-O-O", true).unwrap();
        assert_eq!(queenside.uci(), "e1c1");

        assert_eq!(notation::uci_to_algebraic(&oracle, &position, "e1g1").unwrap(), "O-O");
        assert_eq!(notation::uci_to_algebraic(&oracle, &position, "e1c1").unwrap(), "O-O-O");
    }

    #[test]
    fn test_missing_promotion_piece() {
        let oracle = ShakmatyOracle::new();
        let position = record(PROMOTION);

        let lenient = notation::resolve(&oracle, &position, "a8", false).unwrap();
        assert_eq!(lenient.promotion, Some(PieceType::Queen));
        let lenient = notation::resolve(&oracle, &position, "a7a8", false).unwrap();
        assert_eq!(lenient.uci(), "a7a8q");

        for token in ["a8", "a7a8"] {
            let err = notation::resolve(&oracle, &position, token, true).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidNotation, "strict {}", token);
        }

        let knight = notation::resolve(&oracle, &position, "a8=N", true).unwrap();
        assert_eq!(knight.uci(), "a7a8n");
        assert_eq!(notation::uci_to_algebraic(&oracle, &position, "a7a8q").unwrap(), "a8=Q+");
    }

    #[test]
    fn test_capture_marker_mismatch() {
        let oracle = ShakmatyOracle::new();
        let start = PositionRecord::starting();

        let lenient = notation::resolve(&oracle, &start, "Nxf3", false).unwrap();
        assert_eq!(lenient.uci(), "g1f3");

        let err = notation::resolve(&oracle, &start, "Nxf3", true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidNotation);

        let position = position_after(&["e4", "d5"]);
        let err = notation::resolve(&oracle, &position, "ed5", true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidNotation);
        assert_eq!(notation::resolve(&oracle, &position, "exd5", true).unwrap().uci(), "e4d5");
    }

    #[test]
    fn test_mate_suffix() {
        let oracle = ShakmatyOracle::new();
        let position = position_after(&["e4", "e5", "Bc4", "Nc6", "Qh5", "Nf6"]);
        assert_eq!(notation::uci_to_algebraic(&oracle, &position, "h5f7").unwrap(), "Qxf7#");
        assert_eq!(
            notation::algebraic_to_uci(&oracle, &position, "Qxf7#", true).unwrap(),
            "h5f7"
        );
    }
}
