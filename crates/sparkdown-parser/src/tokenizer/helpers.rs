//! Helper functions for the tokenizer.
//!
//! State transitions ("switch to", "reconsume in"), token emission and issue
//! recording shared by the state handlers in [`super::core`].

use crate::issue::{IssueKind, ParseIssue};

use super::core::{Tokenizer, TokenizerState};
use super::token::{Markup, Token, TokenKind};

// =============================================================================
// State Transition Helpers
// =============================================================================

impl Tokenizer<'_> {
    /// Transition to a new state. The next character is consumed in it.
    pub(super) const fn switch_to(&mut self, new_state: TokenizerState) {
        self.state = new_state;
    }

    /// Transition to a new state without consuming the current character.
    /// The same character will be processed again in the new state.
    pub(super) const fn reconsume_in(&mut self, new_state: TokenizerState) {
        self.reconsume = true;
        self.state = new_state;
    }
}

// =============================================================================
// Emit Helpers
// =============================================================================

impl Tokenizer<'_> {
    /// Emit a literal character.
    pub(super) fn emit_character_token(&mut self, c: char) {
        self.line_start = c == '\n';
        self.token_stream.push(Token::new_character(c));
    }

    /// Emit the pending run as a markup token.
    pub(super) fn emit_markup(
        &mut self,
        trigger: char,
        count: usize,
        kind: TokenKind,
        follow: char,
        consumed_follow: bool,
    ) {
        let markup = Markup {
            kind,
            lexeme: trigger.to_string().repeat(count),
            follow,
            consumed_follow,
            line_start: self.run_line_start,
            offset: self.run_start,
        };
        self.line_start = kind.is_line_structure() || (consumed_follow && follow == '\n');
        let token = Token::Markup(markup);
        log::trace!("emit {token} at {}", self.run_start);
        self.token_stream.push(token);
    }

    /// Emit every character of the pending run as literal text.
    pub(super) fn flush_run_as_text(&mut self, trigger: char, count: usize) {
        for _ in 0..count {
            self.emit_character_token(trigger);
        }
    }

    /// Emit an end-of-file token.
    pub(super) fn emit_eof_token(&mut self) {
        self.token_stream.push(Token::EndOfFile);
    }
}

// =============================================================================
// Issue Helpers
// =============================================================================

impl Tokenizer<'_> {
    pub(super) fn unrecognized_run(&mut self, trigger: char, count: usize, follow: char) {
        let message = format!(
            "no rule for {count} x {trigger:?} followed by {follow:?}; kept as text"
        );
        log::trace!("{message}");
        self.issues.push(ParseIssue::new(
            IssueKind::UnrecognizedTrigger,
            message,
            self.run_start,
        ));
    }

    pub(super) fn runaway_run(&mut self, trigger: char, count: usize) {
        let message = format!(
            "run of {count} x {trigger:?} exceeds the lookahead window of {}; kept as text",
            self.capacity
        );
        log::debug!("{message}");
        self.issues
            .push(ParseIssue::new(IssueKind::RunawayRun, message, self.run_start));
        self.flush_run_as_text(trigger, count);
    }
}
