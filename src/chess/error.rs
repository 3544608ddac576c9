use thiserror::Error;

/// Errors raised while parsing chess primitives (squares, pieces, moves)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChessError {
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Invalid piece type: {0}")]
    InvalidPieceType(String),

    #[error("Invalid square: {0}")]
    InvalidSquare(String),

    #[error("Invalid move: {0}")]
    InvalidMove(String),
}
