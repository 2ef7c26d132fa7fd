//! Fetch CC-CEDICT and ranked frequency pages, then build the JSON dictionary.
//!
//! The binary in `main.rs` wires [`config::Cli`] to [`pipeline::run`] with an
//! [`HttpFetcher`]. Tests drive the same pipeline with local files.

pub mod config;
pub mod fetch;
pub mod pipeline;

pub use config::{Cli, Config};
pub use fetch::{Fetch, HttpFetcher, Location, SourceError};
pub use pipeline::{Summary, run};
