//! Error types for the ctax-core library.
//!
//! The extraction engine itself never fails: malformed tokens simply leave a
//! field empty. Errors only arise when loading OCR documents or configuration.

use thiserror::Error;

/// Main error type for the ctax library.
#[derive(Error, Debug)]
pub enum CtaxError {
    /// OCR document loading error.
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to the OCR document handed to the engine.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The document could not be parsed.
    #[error("failed to parse OCR document: {0}")]
    Parse(String),

    /// A word polygon has fewer than three points.
    #[error("word {word} on page {page} has a degenerate polygon ({points} points)")]
    InvalidPolygon {
        page: usize,
        word: usize,
        points: usize,
    },
}

/// Result type for the ctax library.
pub type Result<T> = std::result::Result<T, CtaxError>;
