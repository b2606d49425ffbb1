//! The Sparkdown grammar as a lookup table.
//!
//! trigger character → terminating class → run length → token. The table is
//! built once and only ever read while scanning; adding a construct is one
//! more [`TokenRulesBuilder::rule`] call. Open-ended rules match any run from
//! a minimum length up and are exempt from the runaway guard.

use std::collections::HashMap;

use sparkdown_dom::ElementKind;

use crate::tokenizer::TokenKind;

/// Punctuation that may follow an emphasis or strong run as readable text.
const READABLE_PUNCTUATION: &[char] = &['.', ',', ';', ':', '"', '\''];

/// The class of character that ends a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Terminating {
    /// Exactly this character.
    Exact(char),
    /// Letters, digits and `.,;:"'`.
    AlnumPunct,
    /// Anything; consulted after the more specific classes.
    Any,
}

impl Terminating {
    /// `AlnumPunct` for readable characters, `Exact(c)` otherwise.
    #[must_use]
    pub fn classify(c: char) -> Self {
        if c.is_alphanumeric() || READABLE_PUNCTUATION.contains(&c) {
            Self::AlnumPunct
        } else {
            Self::Exact(c)
        }
    }
}

/// What a matching run resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleEntry {
    /// Token emitted for the run.
    pub kind: TokenKind,
    /// Whether the terminating character is swallowed. When false it is
    /// re-offered to the tokenizer as the start of what follows.
    pub consumes_terminator: bool,
}

type RuleTable = HashMap<char, HashMap<Terminating, HashMap<usize, RuleEntry>>>;
type OpenEndedTable = HashMap<char, HashMap<Terminating, (usize, RuleEntry)>>;

/// Immutable rule table consulted by the tokenizer.
#[derive(Debug, Clone, Default)]
pub struct TokenRules {
    table: RuleTable,
    /// Minimum run length and entry, per trigger and terminating class.
    open_ended: OpenEndedTable,
}

impl TokenRules {
    /// Start an empty table.
    #[must_use]
    pub fn builder() -> TokenRulesBuilder {
        TokenRulesBuilder::default()
    }

    /// The standard Sparkdown grammar.
    #[must_use]
    pub fn sparkdown() -> Self {
        let mut builder = Self::builder();

        for level in 1..=ElementKind::MAX_HEADING_LEVEL {
            builder = builder.consuming('#', Terminating::Exact(' '), level, TokenKind::Heading(level));
        }

        // Opening runs must be followed by readable text; closing runs may be
        // followed by whitespace too. The tree builder tells the two apart.
        for trigger in ['*', '_'] {
            for follow in [
                Terminating::AlnumPunct,
                Terminating::Exact(' '),
                Terminating::Exact('\t'),
                Terminating::Exact('\n'),
            ] {
                builder = builder
                    .rule(trigger, follow, 1, TokenKind::Emphasis)
                    .rule(trigger, follow, 2, TokenKind::Strong);
            }
        }

        for trigger in ['-', '=', '*'] {
            for count in 3..=6 {
                builder = builder.consuming(trigger, Terminating::Exact('\n'), count, TokenKind::Rule);
            }
        }

        // The line break leaves its newline to end the line as usual.
        builder
            .rule('\\', Terminating::Exact('\n'), 1, TokenKind::LineBreak)
            .rule('\n', Terminating::Any, 1, TokenKind::LineEnd)
            .at_least('\n', Terminating::Any, 2, TokenKind::ParagraphBreak)
            .build()
    }

    /// Whether `c` can start a run.
    #[must_use]
    pub fn is_trigger(&self, c: char) -> bool {
        self.table.contains_key(&c) || self.open_ended.contains_key(&c)
    }

    /// Whether runs of `trigger` may grow past the lookahead window.
    #[must_use]
    pub fn is_open_ended(&self, trigger: char) -> bool {
        self.open_ended.contains_key(&trigger)
    }

    /// Resolve a run of `count` × `trigger` ended by `follow`.
    ///
    /// The exact character is tried first, then its class, then the wildcard.
    /// Within one class a fixed-length rule beats an open-ended one. `None`
    /// means the run is literal text.
    #[must_use]
    pub fn lookup(&self, trigger: char, follow: char, count: usize) -> Option<RuleEntry> {
        let class = Terminating::classify(follow);
        [Terminating::Exact(follow), class, Terminating::Any]
            .iter()
            .find_map(|terminating| {
                self.fixed_entry(trigger, *terminating, count)
                    .or_else(|| self.open_ended_entry(trigger, *terminating, count))
            })
    }

    fn fixed_entry(&self, trigger: char, follow: Terminating, count: usize) -> Option<RuleEntry> {
        self.table.get(&trigger)?.get(&follow)?.get(&count).copied()
    }

    fn open_ended_entry(
        &self,
        trigger: char,
        follow: Terminating,
        count: usize,
    ) -> Option<RuleEntry> {
        let &(min, entry) = self.open_ended.get(&trigger)?.get(&follow)?;
        (count >= min).then_some(entry)
    }

    /// Longest run any fixed-length rule matches.
    #[must_use]
    pub fn longest_run(&self) -> usize {
        self.table
            .values()
            .flat_map(HashMap::values)
            .flat_map(HashMap::keys)
            .copied()
            .max()
            .unwrap_or(0)
    }
}

/// Collects rules before freezing them into a [`TokenRules`].
#[derive(Debug, Default)]
pub struct TokenRulesBuilder {
    table: RuleTable,
    open_ended: OpenEndedTable,
}

impl TokenRulesBuilder {
    /// Add a rule whose terminating character is re-offered to the tokenizer.
    #[must_use]
    pub fn rule(self, trigger: char, follow: Terminating, count: usize, kind: TokenKind) -> Self {
        self.insert(
            trigger,
            follow,
            count,
            RuleEntry {
                kind,
                consumes_terminator: false,
            },
        )
    }

    /// Add a rule that swallows its terminating character.
    #[must_use]
    pub fn consuming(
        self,
        trigger: char,
        follow: Terminating,
        count: usize,
        kind: TokenKind,
    ) -> Self {
        self.insert(
            trigger,
            follow,
            count,
            RuleEntry {
                kind,
                consumes_terminator: true,
            },
        )
    }

    /// Add a rule matching any run of at least `min` characters. The
    /// terminating character is re-offered to the tokenizer.
    #[must_use]
    pub fn at_least(
        mut self,
        trigger: char,
        follow: Terminating,
        min: usize,
        kind: TokenKind,
    ) -> Self {
        let entry = RuleEntry {
            kind,
            consumes_terminator: false,
        };
        let _ = self
            .open_ended
            .entry(trigger)
            .or_default()
            .insert(follow, (min, entry));
        self
    }

    fn insert(mut self, trigger: char, follow: Terminating, count: usize, entry: RuleEntry) -> Self {
        let _ = self
            .table
            .entry(trigger)
            .or_default()
            .entry(follow)
            .or_default()
            .insert(count, entry);
        self
    }

    /// Freeze the table.
    #[must_use]
    pub fn build(self) -> TokenRules {
        TokenRules {
            table: self.table,
            open_ended: self.open_ended,
        }
    }
}
