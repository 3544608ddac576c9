pub mod chess;
pub mod error;
pub mod game;
pub mod notation;
pub mod oracle;
pub mod position;
pub mod timeline;
pub mod transcript;

mod patterns;

// Re-export key types for easy testing
pub use error::{ErrorKind, GameError};
pub use game::{ActionResult, GameConfig, GameController, Severity};
pub use oracle::{LegalityOracle, ShakmatyOracle};
pub use position::PositionRecord;
pub use timeline::{Timeline, TimelineEntry};
