//! Tree construction.
//!
//! The builder keeps a stack of open elements, the innermost being "current".
//! Every token is first resolved to an [`Action`] against that stack and then
//! applied. Actions that change the current element (`ImplyParagraph`,
//! `AscendAndRetry`) re-offer the same token, so one token may close several
//! nested elements before it lands.

use sparkdown_common::warning::warn_once;
use sparkdown_dom::{DomTree, ElementData, ElementKind, NodeId, NodeType, Propagation};
use strum_macros::Display;

use super::core::ParseOutput;
use crate::issue::{IssueKind, ParseIssue};
use crate::rules::Terminating;
use crate::tokenizer::{Markup, Token, TokenKind};

/// What accepting a token does to the tree.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum Action {
    /// Append literal text to the current element.
    AppendText(String),
    /// Open a new element under the current one and make it current.
    DescendInto(ElementData),
    /// Insert a self-closing element; the current element does not change.
    InsertVoid(ElementKind),
    /// Open a paragraph for inline content at document level, then retry.
    ImplyParagraph,
    /// Close the current element, hand the propagation to its parent, then
    /// retry the token there.
    AscendAndRetry(Propagation),
    /// The current element swallows the token and decrements its skip count.
    Absorb,
    /// The token has no effect here.
    Ignore,
}

#[derive(Debug, Clone, Copy)]
struct OpenElement {
    id: NodeId,
    /// Tokens still to absorb, set by a closing child.
    skip: usize,
}

/// Builds a [`DomTree`] from tokens.
#[derive(Debug)]
pub struct TreeBuilder {
    tree: DomTree,
    /// The Document is always at the bottom and never popped.
    stack_of_open_elements: Vec<OpenElement>,
    issues: Vec<ParseIssue>,
}

impl TreeBuilder {
    /// Create a builder holding only the Document.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: DomTree::new(),
            stack_of_open_elements: vec![OpenElement {
                id: NodeId::ROOT,
                skip: 0,
            }],
            issues: Vec::new(),
        }
    }

    /// The tree built so far.
    #[must_use]
    pub const fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// The innermost open element.
    #[must_use]
    pub fn current_node(&self) -> NodeId {
        self.stack_of_open_elements
            .last()
            .map_or(NodeId::ROOT, |open| open.id)
    }

    /// Open elements, outermost first, excluding the Document.
    pub fn open_elements(&self) -> impl Iterator<Item = NodeId> {
        self.stack_of_open_elements.iter().skip(1).map(|open| open.id)
    }

    fn current_kind(&self) -> ElementKind {
        self.tree
            .kind(self.current_node())
            .unwrap_or(ElementKind::Document)
    }

    /// Accept one token, retrying it up the stack until it lands.
    pub fn accept(&mut self, token: &Token) {
        loop {
            let action = self.resolve(token);
            log::trace!("{token} in <{}>: {action}", self.current_kind());
            match action {
                Action::AppendText(text) => {
                    let _ = self.tree.append_text(self.current_node(), &text);
                }
                Action::DescendInto(data) => self.descend_into(data),
                Action::InsertVoid(kind) => self.insert_void(kind),
                Action::ImplyParagraph => {
                    self.descend_into(ElementData::new(ElementKind::Paragraph, ""));
                    continue;
                }
                Action::AscendAndRetry(propagation) => {
                    self.ascend(propagation);
                    continue;
                }
                Action::Absorb => {
                    if let Some(current) = self.stack_of_open_elements.last_mut() {
                        current.skip = current.skip.saturating_sub(1);
                    }
                }
                Action::Ignore => {}
            }
            break;
        }
    }

    /// Report anything still open, seal the Document and hand back the tree.
    ///
    /// Elements open at end of input stay open in the tree.
    #[must_use]
    pub fn finish(mut self, end_offset: usize) -> ParseOutput {
        let unclosed: Vec<NodeId> = self.open_elements().collect();
        for &id in unclosed.iter().rev() {
            let kind = self.tree.kind(id).unwrap_or(ElementKind::Document);
            self.parse_warning(
                IssueKind::PrematureEndOfInput,
                format!("input ended inside <{}>", kind.tag_name().unwrap_or("?")),
                end_offset,
            );
        }
        self.tree.seal(NodeId::ROOT);
        ParseOutput {
            tree: self.tree,
            issues: self.issues,
            unclosed,
        }
    }

    fn resolve(&mut self, token: &Token) -> Action {
        let Some(&OpenElement { id, skip }) = self.stack_of_open_elements.last() else {
            return Action::Ignore;
        };
        match token {
            Token::EndOfFile => Action::Ignore,
            _ if skip > 0 => Action::Absorb,
            Token::Character { data } => {
                let mut buf = [0; 4];
                self.text_action(data.encode_utf8(&mut buf))
            }
            Token::Markup(markup) => self.resolve_markup(id, markup),
        }
    }

    fn resolve_markup(&mut self, current: NodeId, markup: &Markup) -> Action {
        if let Some(data) = self.tree.as_element(current)
            && data.terminator().is_satisfied_by(&markup.lexeme)
        {
            return Action::AscendAndRetry(data.propagation());
        }
        if self.ancestor_terminated_by(&markup.lexeme) {
            return Action::AscendAndRetry(Propagation::NONE);
        }

        let at_document = self.current_kind() == ElementKind::Document;
        match markup.kind {
            kind if kind.is_block() && !markup.line_start => {
                self.degrade(markup, "does not start a line")
            }
            kind if kind.is_block() && !at_document && kind.element_kind().is_some() => {
                Action::AscendAndRetry(Propagation::NONE)
            }
            TokenKind::Heading(_) => self.open_element(markup, "is too deep"),
            TokenKind::Rule => Action::InsertVoid(ElementKind::Rule),
            TokenKind::Strong | TokenKind::Emphasis => {
                if Terminating::classify(markup.follow) != Terminating::AlnumPunct {
                    return self.degrade(markup, "is not followed by text");
                }
                if at_document {
                    return Action::ImplyParagraph;
                }
                self.open_element(markup, "opens nothing")
            }
            TokenKind::LineBreak if at_document => Action::ImplyParagraph,
            TokenKind::LineBreak => Action::InsertVoid(ElementKind::LineBreak),
            TokenKind::LineEnd => self.text_action("\n"),
            TokenKind::ParagraphBreak => Action::Ignore,
        }
    }

    /// Open the element the markup stands for, or keep it as text if there is
    /// none (a heading deeper than `h5`).
    fn open_element(&mut self, markup: &Markup, reason: &str) -> Action {
        match markup.kind.element_kind() {
            Some(kind) => Action::DescendInto(ElementData::new(kind, &markup.lexeme)),
            None => self.degrade(markup, reason),
        }
    }

    /// Literal text lands in the current element, except at document level
    /// where it needs a paragraph (or is dropped if it is only whitespace).
    fn text_action(&self, text: &str) -> Action {
        if self.current_kind() != ElementKind::Document {
            return Action::AppendText(text.to_string());
        }
        if text.chars().all(char::is_whitespace) {
            Action::Ignore
        } else {
            Action::ImplyParagraph
        }
    }

    /// Treat markup as the text it was recognized from.
    fn degrade(&mut self, markup: &Markup, reason: &str) -> Action {
        let literal = markup.literal();
        // At document level the paragraph is implied first and the markup is
        // re-resolved inside it, where the issue gets recorded.
        if self.current_kind() == ElementKind::Document {
            return self.text_action(&literal);
        }
        let message = format!("{} {:?} {reason}; kept as text", markup.kind, markup.lexeme);
        log::debug!("{message}");
        self.issues.push(ParseIssue::new(
            IssueKind::MisplacedMarkup,
            message,
            markup.offset,
        ));
        Action::AppendText(literal)
    }

    fn ancestor_terminated_by(&self, lexeme: &str) -> bool {
        self.stack_of_open_elements
            .iter()
            .rev()
            .skip(1)
            .filter_map(|open| self.tree.as_element(open.id))
            .any(|data| data.terminator().is_satisfied_by(lexeme))
    }

    fn descend_into(&mut self, data: ElementData) {
        let parent = self.current_node();
        let kind = data.kind();
        let id = self.tree.alloc(NodeType::Element(data));
        self.tree.append_child(parent, id);
        log::debug!("appending <{kind}> to <{}>", self.current_kind());
        self.stack_of_open_elements.push(OpenElement { id, skip: 0 });
    }

    fn insert_void(&mut self, kind: ElementKind) {
        let parent = self.current_node();
        let id = self.tree.alloc(NodeType::Element(ElementData::new(kind, "")));
        self.tree.append_child(parent, id);
        self.tree.seal(id);
        log::debug!("appending <{kind}/> to <{}>", self.current_kind());
    }

    fn ascend(&mut self, propagation: Propagation) {
        debug_assert!(
            self.stack_of_open_elements.len() > 1,
            "the Document is never closed by content"
        );
        if self.stack_of_open_elements.len() <= 1 {
            return;
        }
        let Some(closed) = self.stack_of_open_elements.pop() else {
            return;
        };
        self.tree.seal(closed.id);
        if let Some(parent) = self.stack_of_open_elements.last_mut() {
            parent.skip = propagation.0;
        }
        log::debug!(
            "terminating <{}>, moving up to <{}>",
            self.tree.kind(closed.id).unwrap_or(ElementKind::Document),
            self.current_kind()
        );
    }

    /// Record an issue and print it once through the shared warning channel.
    fn parse_warning(&mut self, kind: IssueKind, message: String, offset: usize) {
        warn_once("Parser", &message);
        self.issues.push(ParseIssue::new(kind, message, offset));
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
