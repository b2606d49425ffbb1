//! Common utilities for the Sparkdown converter.
//!
//! This crate provides shared infrastructure used by the parser and the CLI:
//! - **Warning System** - colored terminal output for recovered markup problems

pub mod warning;
