// Re-export all public items
pub use self::error::ChessError;
pub use self::moves::{CoordinateMove, MoveFlags, ResolvedMove};
pub use self::piece::{Color, Piece, PieceType};
pub use self::square::Square;

mod error;
mod moves;
mod piece;
mod square;
