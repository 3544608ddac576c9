use crate::chess::ChessError;
use crate::oracle::OracleError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Every failure the codecs, the timeline and the controller can report
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("Malformed position record: {0}")]
    MalformedRecord(String),

    #[error("Invalid piece placement in rank {rank}: {reason}")]
    InvalidPlacement { rank: usize, reason: String },

    #[error("Invalid side to move: {0}")]
    InvalidSideToMove(String),

    #[error("Invalid castling rights: {0}")]
    InvalidCastlingRights(String),

    #[error("Invalid en passant target: {0}")]
    InvalidEnPassant(String),

    #[error("Invalid halfmove clock: {0}")]
    InvalidHalfmove(String),

    #[error("Invalid fullmove number: {0}")]
    InvalidFullmove(String),

    #[error("Invalid notation: {0}")]
    InvalidNotation(String),

    #[error("Illegal move: {0}")]
    IllegalMove(String),

    #[error("Move history is disabled")]
    HistoryDisabled,

    #[error("Replay desynchronized at ply {ply}: {reason}")]
    ReplayDesync { ply: usize, reason: String },

    #[error("Transcript error at ply {ply} ('{token}'): {reason}")]
    TranscriptError {
        ply: usize,
        token: String,
        reason: String,
    },

    #[error("Game is over: {0}")]
    GameOver(String),

    #[error("Unexpected internal failure: {0}")]
    UnknownError(String),
}

/// Coarse error category, convenient for matching without payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    MalformedRecord,
    InvalidPlacement,
    InvalidSideToMove,
    InvalidCastlingRights,
    InvalidEnPassant,
    InvalidHalfmove,
    InvalidFullmove,
    InvalidNotation,
    IllegalMove,
    HistoryDisabled,
    ReplayDesync,
    TranscriptError,
    GameOver,
    UnknownError,
}

impl GameError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::MalformedRecord(_) => ErrorKind::MalformedRecord,
            GameError::InvalidPlacement { .. } => ErrorKind::InvalidPlacement,
            GameError::InvalidSideToMove(_) => ErrorKind::InvalidSideToMove,
            GameError::InvalidCastlingRights(_) => ErrorKind::InvalidCastlingRights,
            GameError::InvalidEnPassant(_) => ErrorKind::InvalidEnPassant,
            GameError::InvalidHalfmove(_) => ErrorKind::InvalidHalfmove,
            GameError::InvalidFullmove(_) => ErrorKind::InvalidFullmove,
            GameError::InvalidNotation(_) => ErrorKind::InvalidNotation,
            GameError::IllegalMove(_) => ErrorKind::IllegalMove,
            GameError::HistoryDisabled => ErrorKind::HistoryDisabled,
            GameError::ReplayDesync { .. } => ErrorKind::ReplayDesync,
            GameError::TranscriptError { .. } => ErrorKind::TranscriptError,
            GameError::GameOver(_) => ErrorKind::GameOver,
            GameError::UnknownError(_) => ErrorKind::UnknownError,
        }
    }

    /// True for the position-record validation kinds
    pub fn is_record_error(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::MalformedRecord
                | ErrorKind::InvalidPlacement
                | ErrorKind::InvalidSideToMove
                | ErrorKind::InvalidCastlingRights
                | ErrorKind::InvalidEnPassant
                | ErrorKind::InvalidHalfmove
                | ErrorKind::InvalidFullmove
        )
    }
}

impl From<ChessError> for GameError {
    fn from(err: ChessError) -> Self {
        GameError::InvalidNotation(err.to_string())
    }
}

impl From<OracleError> for GameError {
    fn from(err: OracleError) -> Self {
        match err {
            OracleError::Rejected(reason) => GameError::IllegalMove(reason),
            OracleError::UnsupportedPosition(reason) => {
                GameError::UnknownError(format!("oracle cannot use position: {}", reason))
            }
            OracleError::Internal(reason) => GameError::UnknownError(reason),
        }
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
