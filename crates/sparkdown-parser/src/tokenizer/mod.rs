//! Sparkdown tokenizer module.
//!
//! Turns characters into markup tokens and literal characters by accumulating
//! runs of trigger characters and resolving them against the rule table.

/// Helper methods for tokenizer state transitions and emission.
pub mod helpers;
/// Token types produced by the tokenizer.
pub mod token;
/// Tokenizer state machine implementation.
pub mod core;

pub use self::core::{Tokenizer, TokenizerState, tokenize};
pub use token::{Markup, Token, TokenKind};
