//! Error types for sectrank.

use std::io;
use thiserror::Error;

/// Result type alias for sectrank operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting, ranking or writing collections.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF header carries a version we do not understand.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// Error extracting text content.
    #[error("Text extraction error: {0}")]
    TextExtract(String),

    /// Collection input does not match the expected schema.
    #[error("Schema error in {path}: {message}")]
    Schema {
        /// File that failed validation
        path: String,
        /// What was wrong with it
        message: String,
    },

    /// Invalid heuristic or pipeline configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Error serializing output.
    #[error("Rendering error: {0}")]
    Render(String),
}

impl Error {
    /// Build a schema error for the given file.
    pub fn schema(path: impl AsRef<std::path::Path>, message: impl Into<String>) -> Self {
        Error::Schema {
            path: path.as_ref().display().to_string(),
            message: message.into(),
        }
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}
