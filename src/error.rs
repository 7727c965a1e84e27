//! Error types for the pdf-mergician tooling library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the pdf-mergician tooling library
#[derive(Error, Debug)]
pub enum Error {
    /// PDF processing error
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// State serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A propagation target could not be read or written
    #[error("Cannot access {}: {source}", .path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The persisted version state is unreadable or breaks its invariants
    #[error("Corrupt version state in {}: {reason}", .path.display())]
    CorruptState { path: PathBuf, reason: String },

    /// Substitution pattern failed to compile
    #[error("Invalid substitution pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Configuration file could not be parsed
    #[error("Invalid configuration in {}: {reason}", .path.display())]
    Config { path: PathBuf, reason: String },

    /// Date component of a version is not YYYY.MM.DD
    #[error("Invalid date version: {0}")]
    InvalidDateVersion(String),

    /// No build number is left for the day
    #[error("Build number exhausted for {date}")]
    BuildOverflow { date: String },

    /// Invalid command-line usage
    #[error("{0}")]
    Usage(String),

    /// File not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Invalid PDF (no pages)
    #[error("PDF has no pages: {}", .0.display())]
    EmptyPdf(PathBuf),

    /// General error
    #[error("{0}")]
    General(String),
}
