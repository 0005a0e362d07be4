//! Centralized error handling for microexp
//!
//! Library code returns [`MicroExpError`] through the [`Result`] alias. The binary works with
//! `anyhow` and attaches context through [`ResultExt`].
//!
//! Component operations (taps, timer delivery, snapshots) never fail; errors only come from
//! configuration, file I/O, runtime availability and out-of-range selections.

use thiserror::Error;

/// Errors that can occur in microexp
#[derive(Error, Debug)]
pub enum MicroExpError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Color strings that are neither a known name nor hex
    #[error("Invalid color '{0}': expected a named color or #RRGGBB[AA]")]
    InvalidColor(String),

    /// Selection outside the panel's items
    #[error("Item index {index} out of range (panel has {len} items)")]
    IndexOutOfRange { index: usize, len: usize },

    /// Timer scheduling needs a Tokio runtime
    #[error("No Tokio runtime available for scheduling timers")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for microexp operations
pub type Result<T> = std::result::Result<T, MicroExpError>;

/// Extension trait for adding context to errors at the application layer
pub trait ResultExt<T> {
    /// Add file operation context to an error
    fn with_file_context(self, path: &str) -> anyhow::Result<T>;
}

impl<T, E: std::error::Error + Send + Sync + 'static> ResultExt<T> for std::result::Result<T, E> {
    fn with_file_context(self, path: &str) -> anyhow::Result<T> {
        use anyhow::Context;
        self.map_err(|e| anyhow::anyhow!(e))
            .with_context(|| format!("File operation failed: {}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_error_message() {
        let err = MicroExpError::IndexOutOfRange { index: 7, len: 6 };
        assert_eq!(err.to_string(), "Item index 7 out of range (panel has 6 items)");
    }

    #[test]
    fn test_file_context_wraps_source() {
        let result: std::result::Result<(), MicroExpError> =
            Err(MicroExpError::Config("motion must be non-zero".to_string()));
        let err = result.with_file_context("config.json").unwrap_err();
        let chain = format!("{:#}", err);
        assert!(chain.contains("File operation failed: config.json"));
        assert!(chain.contains("motion must be non-zero"));
    }
}
