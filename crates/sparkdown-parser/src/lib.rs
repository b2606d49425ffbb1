//! Streaming Sparkdown to HTML conversion.
//!
//! # Pipeline
//!
//! Characters are pulled one at a time from a [`CharacterSource`], delayed
//! through a [`LookaheadWindow`], grouped into markup runs by the
//! [`Tokenizer`] against an immutable [`TokenRules`] table, and assembled into
//! a [`DomTree`](sparkdown_dom::DomTree) by the [`TreeBuilder`]. The
//! [`Parser`] drives the loop through its `Scanning`, `Draining` and `Done`
//! phases.
//!
//! Malformed markup never stops a conversion. It degrades to literal text or
//! leaves elements open, and each recovery is reported as a [`ParseIssue`].
//!
//! ```
//! use sparkdown_parser::{parse_str, serialize::to_html};
//!
//! let output = parse_str("# Title\n\nSome **bold** text.");
//! assert_eq!(
//!     to_html(&output.tree),
//!     "<h1>Title</h1><p>Some <strong>bold</strong> text.</p>"
//! );
//! ```

/// Parser configuration.
pub mod config;
/// Fatal errors.
pub mod error;
/// Recoverable parse issues.
pub mod issue;
/// Tree construction and the parse loop.
pub mod parser;
/// The grammar table.
pub mod rules;
/// HTML, JSON and debug output.
pub mod serialize;
/// Character sources.
pub mod source;
/// Markup tokenizer.
pub mod tokenizer;
/// Bounded lookahead.
pub mod window;

pub use config::ParserConfig;
pub use error::SparkdownError;
pub use issue::{IssueKind, ParseIssue};
pub use parser::{
    Action, ParseOutput, ParseState, Parser, TreeBuilder, parse_str, parse_str_with,
};
pub use rules::{RuleEntry, Terminating, TokenRules, TokenRulesBuilder};
pub use serialize::{print_tree, to_html, to_html_page};
pub use source::{CharacterSource, ReaderSource, StrSource};
pub use tokenizer::{Markup, Token, TokenKind, Tokenizer, TokenizerState, tokenize};
pub use window::{DEFAULT_WINDOW_CAPACITY, END_OF_INPUT_SENTINEL, LookaheadWindow};
