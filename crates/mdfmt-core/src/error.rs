//! Error type for formatting passes

use std::io;

/// Error type for parsing and rendering
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// The input was rejected before a tree could be built
    #[error("parse failure: {0}")]
    ParseFailure(String),

    /// No rule is registered for a node kind and the policy is strict
    #[error("unsupported node kind: {0}")]
    UnsupportedNodeKind(String),

    /// The output sink failed; the pass was aborted
    #[error("sink write failure: {0}")]
    SinkWriteFailure(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, FormatError>;
