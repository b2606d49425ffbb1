//! Errors surfaced to callers of the converter.
//!
//! Malformed markup is never an error; it is recovered and reported as a
//! [`ParseIssue`](crate::ParseIssue). These are the conditions that stop a
//! conversion from starting or finishing.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal converter errors.
#[derive(Debug, Error)]
pub enum SparkdownError {
    /// The input could not be opened, so no parse was started.
    #[error("cannot open input {}: {source}", .path.display())]
    SourceUnavailable {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// Reading from an open source failed part-way through.
    #[error("failed to read input: {0}")]
    Read(#[from] io::Error),

    /// The lookahead window cannot hold the longest run the grammar defines.
    #[error("window capacity {capacity} is smaller than the longest markup run ({required})")]
    WindowTooSmall {
        /// Requested capacity.
        capacity: usize,
        /// Longest run in the rule table.
        required: usize,
    },
}
