//! Zettel data model and parsing.

mod parser;
mod types;

pub use parser::{ParseError, parse};
pub use types::{ReservedPage, Zettel, ZettelId};
