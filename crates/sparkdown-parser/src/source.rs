//! Character sources feeding the parser one character at a time.
//!
//! The parser never asks a source for more input after it has reported end of
//! input, and drops the source as soon as that happens.

use std::convert::Infallible;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::iter::Peekable;
use std::str::Chars;

use crate::error::SparkdownError;

/// Supplies input characters, signalling end of input with `Ok(None)`.
pub trait CharacterSource {
    /// Error raised when the backing store fails mid-read.
    type Error;

    /// The next character, or `None` once the input is exhausted.
    ///
    /// # Errors
    ///
    /// Returns the source's error type if the backing store cannot be read.
    fn next_char(&mut self) -> Result<Option<char>, Self::Error>;
}

/// In-memory source over a string slice. `\r\n` is folded to `\n`.
#[derive(Debug, Clone)]
pub struct StrSource<'a> {
    chars: Peekable<Chars<'a>>,
}

impl<'a> StrSource<'a> {
    /// Read characters from `input`.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
        }
    }
}

impl CharacterSource for StrSource<'_> {
    type Error = Infallible;

    fn next_char(&mut self) -> Result<Option<char>, Infallible> {
        let c = self.chars.next();
        if c == Some('\r') && self.chars.peek() == Some(&'\n') {
            return Ok(self.chars.next());
        }
        Ok(c)
    }
}

/// Buffered source over any reader, one line at a time.
///
/// `\r\n` line endings are folded to `\n` so Windows files tokenize the same
/// way as Unix ones.
#[derive(Debug)]
pub struct ReaderSource<R> {
    reader: R,
    line: String,
    pos: usize,
    exhausted: bool,
}

impl<R: BufRead> ReaderSource<R> {
    /// Wrap an already buffered reader.
    pub const fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
            pos: 0,
            exhausted: false,
        }
    }

    fn refill(&mut self) -> Result<bool, SparkdownError> {
        self.line.clear();
        self.pos = 0;
        if self.reader.read_line(&mut self.line)? == 0 {
            self.exhausted = true;
            return Ok(false);
        }
        if self.line.ends_with("\r\n") {
            let _ = self.line.pop();
            let _ = self.line.pop();
            self.line.push('\n');
        }
        Ok(true)
    }
}

impl ReaderSource<BufReader<File>> {
    /// Open a file for reading.
    ///
    /// # Errors
    ///
    /// Returns [`SparkdownError::SourceUnavailable`] if the file cannot be
    /// opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SparkdownError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| SparkdownError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> CharacterSource for ReaderSource<R> {
    type Error = SparkdownError;

    fn next_char(&mut self) -> Result<Option<char>, SparkdownError> {
        if self.exhausted {
            return Ok(None);
        }
        loop {
            if let Some(c) = self.line[self.pos..].chars().next() {
                self.pos += c.len_utf8();
                return Ok(Some(c));
            }
            if !self.refill()? {
                return Ok(None);
            }
        }
    }
}
