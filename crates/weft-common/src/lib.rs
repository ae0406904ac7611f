//! Common utilities for the Weft HTML parser.
//!
//! This crate provides shared infrastructure used by the parser crates:
//! - **Warning System** - colored, deduplicated diagnostics on stderr

pub mod warning;
