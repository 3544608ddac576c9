//! Move-token handling in algebraic (SAN) and coordinate (UCI) notation.
//!
//! The text-only half (`normalize`, `classify`) needs no rules knowledge.
//! Everything that has to know which moves exist asks the oracle.

mod san;
mod token;

pub use san::{
    algebraic_to_uci, disambiguate, from_uci, resolve, to_algebraic, to_uci, uci_to_algebraic,
};
pub(crate) use token::is_result;
pub use token::{classify, is_coordinate, normalize, parse_algebraic, AlgebraicParts, TokenClass};
