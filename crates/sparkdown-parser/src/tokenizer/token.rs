use core::fmt;

use sparkdown_dom::ElementKind;
use strum_macros::Display;

/// What a recognized run of trigger characters means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum TokenKind {
    /// `#` through `#####` followed by a space.
    Heading(usize),
    /// `**` or `__`.
    Strong,
    /// `*` or `_`.
    Emphasis,
    /// `---`, `===` or `***` on a line of its own.
    Rule,
    /// A backslash immediately before a line end.
    LineBreak,
    /// A single newline.
    LineEnd,
    /// Two or more newlines: a blank line.
    ParagraphBreak,
}

impl TokenKind {
    /// The element this token opens, if it opens one. Line ends and paragraph
    /// breaks only ever close things.
    #[must_use]
    pub const fn element_kind(self) -> Option<ElementKind> {
        match self {
            Self::Heading(level) => ElementKind::heading(level),
            Self::Strong => Some(ElementKind::Strong),
            Self::Emphasis => Some(ElementKind::Emphasis),
            Self::Rule => Some(ElementKind::Rule),
            Self::LineBreak => Some(ElementKind::LineBreak),
            Self::LineEnd | Self::ParagraphBreak => None,
        }
    }

    /// Block tokens are only meaningful at the start of a line.
    #[must_use]
    pub const fn is_block(self) -> bool {
        matches!(self, Self::Heading(_) | Self::Rule)
    }

    /// Newline runs.
    #[must_use]
    pub const fn is_line_structure(self) -> bool {
        matches!(self, Self::LineEnd | Self::ParagraphBreak)
    }
}

/// A resolved markup token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markup {
    /// What the run was recognized as.
    pub kind: TokenKind,
    /// The run itself, e.g. `"**"` or `"\n\n"`.
    pub lexeme: String,
    /// The character that ended the run.
    pub follow: char,
    /// Whether `follow` was swallowed by the token rather than re-offered.
    pub consumed_follow: bool,
    /// The run began at the start of a line.
    pub line_start: bool,
    /// Character offset of the run's first character.
    pub offset: usize,
}

impl Markup {
    /// The input this token was recognized from, for when the tree builder
    /// has to treat it as plain text after all.
    #[must_use]
    pub fn literal(&self) -> String {
        let mut text = self.lexeme.clone();
        if self.consumed_follow {
            text.push(self.follow);
        }
        text
    }
}

/// Output of the tokenizer: markup, literal characters, and end of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A recognized markup run.
    Markup(Markup),
    /// A literal character.
    Character {
        /// The character.
        data: char,
    },
    /// End of input; every pending run has been resolved.
    EndOfFile,
}

impl Token {
    /// Create a character token with the given character.
    #[must_use]
    pub const fn new_character(c: char) -> Self {
        Self::Character { data: c }
    }

    /// The markup payload, if this is a markup token.
    #[must_use]
    pub const fn as_markup(&self) -> Option<&Markup> {
        match self {
            Self::Markup(markup) => Some(markup),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Markup(markup) => {
                write!(f, "{}({:?})", markup.kind, markup.lexeme)?;
                if markup.line_start {
                    write!(f, " @line-start")?;
                }
                Ok(())
            }
            Self::Character { data } => {
                // Show whitespace characters explicitly
                match data {
                    '\n' => write!(f, "Character(\\n)"),
                    '\t' => write!(f, "Character(\\t)"),
                    ' ' => write!(f, "Character(SPACE)"),
                    c => write!(f, "Character({c})"),
                }
            }
            Self::EndOfFile => write!(f, "EOF"),
        }
    }
}
