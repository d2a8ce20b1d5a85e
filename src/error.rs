//! Error types for trueno-widgets operations.

use std::io;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading data, building widgets, or encoding output.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error (file operations, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON dataset could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV dataset could not be parsed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    PngEncoding(#[from] png::EncodingError),

    /// Configuration parsing error with line number.
    #[error("configuration error at line {line}: {message}")]
    ConfigParse {
        /// Line number where the error occurred (1-indexed, 0 if unknown).
        line: usize,
        /// Error message describing the issue.
        message: String,
    },

    /// Invalid dimensions for framebuffer or widget.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// Empty data provided where non-empty is required.
    #[error("Empty data provided")]
    EmptyData,

    /// Scale domain error (e.g., zero-width domain).
    #[error("Scale domain error: {0}")]
    ScaleDomain(String),

    /// A graph link references a node id that does not exist.
    #[error("link {link} references unknown node '{id}'")]
    UnknownNode {
        /// Index of the offending link.
        link: usize,
        /// The unresolved node id.
        id: String,
    },

    /// Input data is structurally malformed (missing columns, wrong shape).
    #[error("Malformed data: {0}")]
    MalformedData(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidDimensions { width: 0, height: 100 };
        assert!(err.to_string().contains("Invalid dimensions"));
    }

    #[test]
    fn test_unknown_node_display() {
        let err = Error::UnknownNode { link: 3, id: "Valjean".to_string() };
        let msg = err.to_string();
        assert!(msg.contains("link 3"));
        assert!(msg.contains("Valjean"));
    }

    #[test]
    fn test_config_parse_display() {
        let err = Error::ConfigParse { line: 4, message: "bad value".to_string() };
        assert_eq!(err.to_string(), "configuration error at line 4: bad value");
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<Vec<u32>>("[1,").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
