use strum_macros::Display;

use super::token::Token;
use crate::config::ParserConfig;
use crate::issue::ParseIssue;
use crate::rules::TokenRules;
use crate::source::{CharacterSource, StrSource};
use crate::window::END_OF_INPUT_SENTINEL;

/// Tokenizer states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TokenizerState {
    /// Between runs. Non-trigger characters pass straight through.
    Idle,
    /// Collecting a run of identical trigger characters.
    Accumulating {
        /// The repeated character.
        trigger: char,
        /// How many have been seen so far.
        count: usize,
    },
}

/// Run-accumulating tokenizer.
///
/// Characters are pushed in one at a time with [`Tokenizer::step`]; resolved
/// tokens collect in an internal stream that the caller drains after each
/// step. Markup runs are resolved against a borrowed [`TokenRules`] table.
#[derive(Debug)]
pub struct Tokenizer<'r> {
    pub(super) rules: &'r TokenRules,
    pub(super) capacity: usize,
    pub(super) state: TokenizerState,
    // When true, the current character is offered again in the new state.
    // "reconsume_in" sets this flag.
    pub(super) reconsume: bool,
    /// Characters consumed so far.
    pub(super) position: usize,
    /// Offset of the first character of the pending run.
    pub(super) run_start: usize,
    /// Whether the pending run began at the start of a line.
    pub(super) run_line_start: bool,
    /// Whether the next emitted token starts a line.
    pub(super) line_start: bool,
    pub(super) at_eof: bool,
    pub(super) token_stream: Vec<Token>,
    pub(super) issues: Vec<ParseIssue>,
}

impl<'r> Tokenizer<'r> {
    /// Create a tokenizer in the `Idle` state.
    ///
    /// `capacity` is the lookahead window size; runs longer than that are
    /// flushed as literal text.
    #[must_use]
    pub const fn new(rules: &'r TokenRules, capacity: usize) -> Self {
        Tokenizer {
            rules,
            capacity,
            state: TokenizerState::Idle,
            reconsume: false,
            position: 0,
            run_start: 0,
            run_line_start: true,
            line_start: true,
            at_eof: false,
            token_stream: Vec::new(),
            issues: Vec::new(),
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> TokenizerState {
        self.state
    }

    /// Number of characters consumed.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Whether [`Tokenizer::finish`] has run.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.at_eof
    }

    /// Consume one character.
    pub fn step(&mut self, c: char) {
        debug_assert!(!self.at_eof, "character after end of input");
        self.position += 1;
        loop {
            match self.state {
                TokenizerState::Idle => self.handle_idle_state(c),
                TokenizerState::Accumulating { trigger, count } => {
                    self.handle_accumulating_state(trigger, count, c);
                }
            }
            if !self.reconsume {
                break;
            }
            self.reconsume = false;
        }
    }

    /// Resolve any pending run against `sentinel` and emit `EndOfFile`.
    ///
    /// The sentinel only decides which rule applies; it is never emitted.
    pub fn finish(&mut self, sentinel: char) {
        if self.at_eof {
            return;
        }
        if let TokenizerState::Accumulating { trigger, count } = self.state {
            match self.rules.lookup(trigger, sentinel, count) {
                Some(entry) => self.emit_markup(trigger, count, entry.kind, sentinel, false),
                None => {
                    self.unrecognized_run(trigger, count, sentinel);
                    self.flush_run_as_text(trigger, count);
                }
            }
            self.switch_to(TokenizerState::Idle);
        }
        self.emit_eof_token();
        self.at_eof = true;
    }

    /// Take every token emitted since the last drain.
    pub fn drain_tokens(&mut self) -> std::vec::Drain<'_, Token> {
        self.token_stream.drain(..)
    }

    /// Take the issues recorded so far.
    pub fn take_issues(&mut self) -> Vec<ParseIssue> {
        std::mem::take(&mut self.issues)
    }

    /// Consume the tokenizer and return the undrained token stream.
    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        self.token_stream
    }

    fn handle_idle_state(&mut self, c: char) {
        if self.rules.is_trigger(c) {
            self.run_start = self.position - 1;
            self.run_line_start = self.line_start;
            self.switch_to(TokenizerState::Accumulating { trigger: c, count: 1 });
        } else {
            self.emit_character_token(c);
        }
    }

    fn handle_accumulating_state(&mut self, trigger: char, count: usize, c: char) {
        if c == trigger {
            let count = count + 1;
            if count > self.capacity && !self.rules.is_open_ended(trigger) {
                self.runaway_run(trigger, count);
                self.switch_to(TokenizerState::Idle);
            } else {
                self.switch_to(TokenizerState::Accumulating { trigger, count });
            }
            return;
        }

        match self.rules.lookup(trigger, c, count) {
            Some(entry) => {
                self.emit_markup(trigger, count, entry.kind, c, entry.consumes_terminator);
                if entry.consumes_terminator {
                    self.switch_to(TokenizerState::Idle);
                } else {
                    self.reconsume_in(TokenizerState::Idle);
                }
            }
            None => {
                self.unrecognized_run(trigger, count, c);
                self.flush_run_as_text(trigger, count);
                self.reconsume_in(TokenizerState::Idle);
            }
        }
    }
}

/// Tokenize a whole string, resolving the final run against the end-of-input
/// sentinel. Used for token dumps; the parser feeds characters itself.
#[must_use]
pub fn tokenize(input: &str, config: &ParserConfig) -> Vec<Token> {
    let mut tokenizer = Tokenizer::new(config.rules(), config.window_capacity());
    let mut source = StrSource::new(input);
    while let Ok(Some(c)) = source.next_char() {
        tokenizer.step(c);
    }
    tokenizer.finish(END_OF_INPUT_SENTINEL);
    tokenizer.into_tokens()
}
