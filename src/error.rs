//! Error types for the pdfquest library.

use std::io;
use thiserror::Error;

/// Result type alias for pdfquest operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during question extraction.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading the document or writing output files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted and requires a password.
    #[error("Document is encrypted")]
    Encrypted,

    /// A page block does not have the expected shape.
    #[error("Malformed block: {0}")]
    MalformedBlock(String),

    /// Error serializing the question records.
    #[error("Rendering error: {0}")]
    Render(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        Error::PdfParse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Encrypted;
        assert_eq!(err.to_string(), "Document is encrypted");

        let err = Error::MalformedBlock("line without spans".to_string());
        assert_eq!(err.to_string(), "Malformed block: line without spans");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
