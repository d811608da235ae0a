//! Error Handling Module
//!
//! Defines the error type shared by the dataset loader, the model config and
//! the reporters. Uses thiserror for ergonomic error definitions.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the ASL classifier
#[derive(Error, Debug)]
pub enum AslError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The container file could not be parsed
    #[error("Failed to read container '{0}': {1}")]
    Container(PathBuf, String),

    /// A required array key is absent from the container
    #[error("Array '{0}' not found in container")]
    MissingArray(String),

    /// The container extension is not understood (or its feature is disabled)
    #[error("Unsupported container format: {0}")]
    UnsupportedFormat(String),

    /// An array uses an element type we cannot convert
    #[error("Array '{key}' has unsupported element type {dtype}")]
    UnsupportedDtype { key: String, dtype: String },

    /// Arrays do not agree in shape
    #[error("Shape error: {0}")]
    Shape(String),

    /// A label falls outside the class enumeration
    #[error("Label {label} at index {index} is outside 0..{num_classes}")]
    InvalidLabel {
        index: usize,
        label: i64,
        num_classes: usize,
    },

    /// An unsigned value does not fit the signed 64-bit range labels are read into
    #[error("Value {value} at index {index} of '{key}' exceeds the i64 range")]
    ValueRange { key: String, index: usize, value: u64 },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Chart rendering error
    #[error("Chart error: {0}")]
    Chart(String),
}

/// Convenience Result type for the ASL classifier
pub type Result<T> = std::result::Result<T, AslError>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, msg: &str) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: std::error::Error> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, msg: &str) -> Result<T> {
        self.map_err(|e| AslError::Config(format!("{}: {}", msg, e)))
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| AslError::Config(format!("{}: {}", f(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AslError::MissingArray("x_train".to_string());
        assert_eq!(format!("{}", err), "Array 'x_train' not found in container");
    }

    #[test]
    fn test_invalid_label_display() {
        let err = AslError::InvalidLabel {
            index: 7,
            label: 31,
            num_classes: 29,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("31"));
        assert!(msg.contains("0..29"));
    }

    #[test]
    fn test_result_context() {
        let result: std::result::Result<i32, std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file not found",
        ));

        let with_context = result.context("Failed to read config");
        let err = with_context.unwrap_err();
        assert!(format!("{}", err).contains("Failed to read config"));
    }
}
