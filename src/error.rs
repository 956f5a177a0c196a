//! Error types for OCR text extraction

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::core::namespace::Dialect;

/// The parsed tree is not the dialect an extractor expects.
///
/// Extractors hand this back as a value so the dispatcher can try the next dialect. It only becomes
/// an error when no dialect is left to try.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Not a {expected} tree (root element is <{found}>)")]
pub struct WrongDialect {
    pub expected: Dialect,
    /// Local name of the root element that was found instead
    pub found: String,
}

/// Errors that can occur while extracting text
#[derive(Error, Debug)]
pub enum ExtractError {
    /// I/O error while reading an input file
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The reading order uses a group structure that cannot be flattened
    #[error("Unsupported reading order: <{element}> is not supported here")]
    UnsupportedReadingOrder { element: String },

    /// Neither PAGE nor ALTO matched a well-formed XML document
    #[error(transparent)]
    WrongDialect(#[from] WrongDialect),

    /// Unknown extraction level
    #[error("Invalid level: {0:?} (expected region, line or word)")]
    InvalidLevel(String),
}

/// Result type for extraction operations
pub type Result<T> = std::result::Result<T, ExtractError>;
