//! Sparkdown tree construction and the parse loop.

/// Token-to-tree resolution.
pub mod builder;
/// The source → window → tokenizer → builder loop.
pub mod core;

pub use builder::{Action, TreeBuilder};
pub use self::core::{ParseOutput, ParseState, Parser, parse_str, parse_str_with};
