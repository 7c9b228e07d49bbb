//! Error types for magsplit library.

use std::io;
use thiserror::Error;

/// Result type alias for magsplit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while loading, segmenting or saving an issue.
///
/// Layout degradation, a missing table of contents and malformed TOC lines
/// are not errors: they are handled by fallbacks inside the pipeline.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file is not recognized as a PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// No page source is registered for the input.
    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),

    /// A title pattern in the publication profile failed to compile.
    #[error("Invalid pattern '{name}': {source}")]
    InvalidPattern {
        /// Name of the pattern in the profile
        name: String,
        /// Underlying regex error
        #[source]
        source: regex::Error,
    },

    /// The publication profile is inconsistent.
    #[error("Invalid publication profile: {0}")]
    Profile(String),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error while rendering or saving records.
    #[error("Rendering error: {0}")]
    Render(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnknownFormat;
        assert_eq!(err.to_string(), "Unknown file format: not a valid PDF");

        let err = Error::PageOutOfRange(10, 5);
        assert_eq!(
            err.to_string(),
            "Page 10 is out of range (document has 5 pages)"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_invalid_pattern_names_the_pattern() {
        let source = regex::Regex::new("(unclosed").unwrap_err();
        let err = Error::InvalidPattern {
            name: "quote_person".to_string(),
            source,
        };
        assert!(err.to_string().starts_with("Invalid pattern 'quote_person'"));
    }
}
