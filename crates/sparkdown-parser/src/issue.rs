//! Recoverable problems found while converting.

use core::fmt;

use strum_macros::Display;

/// The kind of markup problem that was recovered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum IssueKind {
    /// A trigger run had no rule for its length and terminator, and was kept
    /// as literal text.
    UnrecognizedTrigger,
    /// A run grew past the lookahead window and was flushed as literal text.
    RunawayRun,
    /// Markup appeared where it cannot apply (a heading mid-line, an opening
    /// emphasis followed by whitespace) and was kept as literal text.
    MisplacedMarkup,
    /// Input ended while elements were still open. They stay open in the tree.
    PrematureEndOfInput,
}

/// A recovered problem and where it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// What went wrong.
    pub kind: IssueKind,
    /// Human-readable description.
    pub message: String,
    /// Character offset into the input.
    pub offset: usize,
}

impl ParseIssue {
    /// Create an issue.
    #[must_use]
    pub fn new(kind: IssueKind, message: impl Into<String>, offset: usize) -> Self {
        Self {
            kind,
            message: message.into(),
            offset,
        }
    }
}

impl fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}: {}", self.kind, self.offset, self.message)
    }
}
