pub mod codec;
mod record;

pub use codec::{
    compare_positions, derive_info, parse, serialize, validate, PositionInfo, ValidationReport,
};
pub use record::{CastlingRights, PositionRecord, STARTING_FEN, STARTING_PLACEMENT};
