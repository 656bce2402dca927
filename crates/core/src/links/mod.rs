//! Internal link handling: scanning references out of zettel bodies and
//! resolving them against the corpus.

mod resolver;
mod scanner;

pub use resolver::{Resolved, resolve_body};
pub use scanner::{LinkRef, RefStyle, scan};
