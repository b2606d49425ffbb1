//! Bounded lookahead between the character source and the tokenizer.
//!
//! Characters enter at the back and leave from the front. The window holds
//! `capacity + 1` characters so a full window still has one character of
//! lookahead past it. Until it has been filled once ("warm"), peeking yields
//! nothing, so the tokenizer never classifies a run without full context.

use std::collections::VecDeque;

/// Returned by [`LookaheadWindow::peek_front`] once the window has drained.
///
/// Trailing runs are therefore resolved as if the document ended with a line
/// break.
pub const END_OF_INPUT_SENTINEL: char = '\n';

/// Default number of characters held before scanning starts.
pub const DEFAULT_WINDOW_CAPACITY: usize = 6;

/// FIFO of the most recently scanned characters.
#[derive(Debug, Clone)]
pub struct LookaheadWindow {
    buffer: VecDeque<char>,
    capacity: usize,
    warm: bool,
    draining: bool,
}

impl LookaheadWindow {
    /// Create an empty, cold window.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(capacity + 1),
            capacity,
            warm: false,
            draining: false,
        }
    }

    /// Configured capacity, excluding the extra lookahead slot.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of characters currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// True when no characters are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Whether the window has reached its initial capacity.
    #[must_use]
    pub const fn is_warm(&self) -> bool {
        self.warm
    }

    /// Append `c`, returning the oldest character once more than
    /// `capacity + 1` are held.
    pub fn push(&mut self, c: char) -> Option<char> {
        debug_assert!(!self.draining, "push after end of input");
        self.buffer.push_back(c);
        if self.buffer.len() >= self.capacity {
            self.warm = true;
        }
        if self.buffer.len() > self.capacity + 1 {
            self.buffer.pop_front()
        } else {
            None
        }
    }

    /// The source is exhausted: whatever is held now is all the context there
    /// will ever be.
    pub const fn begin_drain(&mut self) {
        self.draining = true;
        self.warm = true;
    }

    /// Oldest retained character.
    ///
    /// `None` while the window is still warming up; the end-of-input sentinel
    /// once it is warm and empty.
    #[must_use]
    pub fn peek_front(&self) -> Option<char> {
        if !self.warm {
            return None;
        }
        Some(self.buffer.front().copied().unwrap_or(END_OF_INPUT_SENTINEL))
    }

    /// Remove the oldest character. Only valid while draining; popping an
    /// empty window earlier is a tokenizer contract violation.
    pub fn pop_front(&mut self) -> Option<char> {
        debug_assert!(
            self.draining || !self.buffer.is_empty(),
            "window underflow before end of input"
        );
        self.buffer.pop_front()
    }
}

impl Default for LookaheadWindow {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_CAPACITY)
    }
}
