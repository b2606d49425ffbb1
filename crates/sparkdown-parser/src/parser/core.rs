use strum_macros::Display;

use sparkdown_dom::{DomTree, NodeId};

use super::builder::TreeBuilder;
use crate::config::ParserConfig;
use crate::issue::ParseIssue;
use crate::source::{CharacterSource, StrSource};
use crate::tokenizer::Tokenizer;
use crate::window::{END_OF_INPUT_SENTINEL, LookaheadWindow};

/// Phases of a parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ParseState {
    /// Pulling characters from the source.
    Scanning,
    /// The source is exhausted; flushing the lookahead window.
    Draining,
    /// Every character has been tokenized and built into the tree.
    Done,
}

/// The result of a parse.
#[derive(Debug, Clone)]
pub struct ParseOutput {
    /// The element tree. The Document is sealed; elements open at end of
    /// input are not.
    pub tree: DomTree,
    /// Recovered problems, in input order.
    pub issues: Vec<ParseIssue>,
    /// Elements left open at end of input, outermost first.
    pub unclosed: Vec<NodeId>,
}

/// Pull-driven conversion of one document.
///
/// Characters flow source → window → tokenizer → tree builder, one at a time.
/// Each parser owns fresh tokenizer and builder state; only the rule table
/// is shared, and it is read-only.
pub struct Parser<'c, S: CharacterSource> {
    /// Dropped as soon as it reports end of input.
    source: Option<S>,
    window: LookaheadWindow,
    tokenizer: Tokenizer<'c>,
    builder: TreeBuilder,
    state: ParseState,
}

impl<'c, S: CharacterSource> Parser<'c, S> {
    /// Prepare a parse of `source`.
    #[must_use]
    pub fn new(source: S, config: &'c ParserConfig) -> Self {
        Self {
            source: Some(source),
            window: LookaheadWindow::new(config.window_capacity()),
            tokenizer: Tokenizer::new(config.rules(), config.window_capacity()),
            builder: TreeBuilder::new(),
            state: ParseState::Scanning,
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn state(&self) -> ParseState {
        self.state
    }

    /// The tree built so far.
    #[must_use]
    pub const fn tree(&self) -> &DomTree {
        self.builder.tree()
    }

    /// Run to completion.
    ///
    /// # Errors
    ///
    /// Returns the source's error if reading fails. Malformed markup is never
    /// an error; see [`ParseOutput::issues`].
    pub fn run(mut self) -> Result<ParseOutput, S::Error> {
        while self.state != ParseState::Done {
            let _ = self.step()?;
        }
        Ok(self.finish())
    }

    /// Advance by one source character, or flush the window once the source
    /// is exhausted. Returns the phase reached.
    ///
    /// # Errors
    ///
    /// Returns the source's error if reading fails.
    pub fn step(&mut self) -> Result<ParseState, S::Error> {
        match self.state {
            ParseState::Scanning => {
                let next = match self.source.as_mut() {
                    Some(source) => source.next_char()?,
                    None => None,
                };
                match next {
                    Some(c) => {
                        if let Some(evicted) = self.window.push(c) {
                            self.feed(evicted);
                        }
                    }
                    None => {
                        self.source = None;
                        self.window.begin_drain();
                        self.switch_to(ParseState::Draining);
                    }
                }
            }
            ParseState::Draining => {
                while let Some(c) = self.window.pop_front() {
                    self.feed(c);
                }
                let sentinel = self.window.peek_front().unwrap_or(END_OF_INPUT_SENTINEL);
                self.tokenizer.finish(sentinel);
                self.forward_tokens();
                self.switch_to(ParseState::Done);
            }
            ParseState::Done => {}
        }
        Ok(self.state)
    }

    fn switch_to(&mut self, state: ParseState) {
        log::trace!("parser {} -> {state}", self.state);
        self.state = state;
    }

    fn feed(&mut self, c: char) {
        self.tokenizer.step(c);
        self.forward_tokens();
    }

    fn forward_tokens(&mut self) {
        for token in self.tokenizer.drain_tokens() {
            self.builder.accept(&token);
        }
    }

    fn finish(mut self) -> ParseOutput {
        let mut issues = self.tokenizer.take_issues();
        let mut output = self.builder.finish(self.tokenizer.position());
        issues.append(&mut output.issues);
        issues.sort_by_key(|issue| issue.offset);
        output.issues = issues;
        output
    }
}

/// Convert an in-memory document with the standard grammar.
#[must_use]
pub fn parse_str(input: &str) -> ParseOutput {
    parse_str_with(input, &ParserConfig::default())
}

/// Convert an in-memory document with a custom configuration.
#[must_use]
pub fn parse_str_with(input: &str, config: &ParserConfig) -> ParseOutput {
    match Parser::new(StrSource::new(input), config).run() {
        Ok(output) => output,
        Err(never) => match never {},
    }
}
