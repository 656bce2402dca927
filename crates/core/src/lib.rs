//! Core library for zettelsite: turns a folder of tagged markdown notes
//! into a static HTML site without ever touching the source notes.

pub mod attachments;
pub mod config;
pub mod corpus;
pub mod diagnostics;
pub mod indexes;
pub mod links;
pub mod pipeline;
pub mod render;
pub mod site;
pub mod text;
pub mod zettel;

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
