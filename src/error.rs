//! Error types for dictionary loading, pattern compilation and batch I/O.
//!
//! Extraction and scoring themselves never fail; a missing field is a
//! [`FieldValue::Absent`](crate::record::FieldValue::Absent), not an error.

use std::path::PathBuf;

/// Result type alias for fallible crate operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building an extractor or driving a batch.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Dictionary file is not valid JSON
    #[error("Dictionary JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A dictionary-derived pattern failed to compile
    #[error("Pattern compilation failed: {0}")]
    Pattern(#[from] regex::Error),

    /// Dictionary content is structurally unusable
    #[error("Invalid dictionary: {0}")]
    InvalidDictionary(String),

    /// Batch input directory does not exist
    #[error("Folder not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    /// The external OCR collaborator failed on a file
    #[error("OCR failed for {}: {message}", path.display())]
    Ocr {
        /// File handed to the OCR engine
        path: PathBuf,
        /// Engine-provided failure description
        message: String,
    },
}
