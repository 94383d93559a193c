//! Custom error types for the dvdlite attack-simulation engine.
//!
//! Provides a structured error hierarchy for better error handling
//! and more informative error messages.

use std::path::PathBuf;

/// The main error type for dvdlite operations.
#[derive(Debug, thiserror::Error)]
pub enum DvdError {
    /// Requested attack name is not present in any registry
    #[error("unknown attack '{name}' (available: {})", .available.join(", "))]
    UnknownAttack {
        name: String,
        available: Vec<String>,
    },

    /// I/O error (file read/write, permissions, etc.)
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: Option<PathBuf>,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file could not be loaded or parsed
    #[error("invalid configuration {path:?}: {message}")]
    Config { path: PathBuf, message: String },

    /// Generic error for external library errors
    #[error("{context}: {message}")]
    External { context: String, message: String },
}

/// Result type alias using DvdError
pub type DvdResult<T> = Result<T, DvdError>;

impl DvdError {
    /// Create an I/O error with path context
    pub fn io(source: std::io::Error, path: impl Into<Option<PathBuf>>) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a config error with path context
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an external error with context
    pub fn external(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::External {
            context: context.into(),
            message: message.into(),
        }
    }
}

/// Convert from raw I/O errors (without path context)
impl From<std::io::Error> for DvdError {
    fn from(source: std::io::Error) -> Self {
        Self::Io { path: None, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_attack_lists_available() {
        let err = DvdError::UnknownAttack {
            name: "does_not_exist".to_string(),
            available: vec!["gps_spoofing".to_string(), "wifi_deauth".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("does_not_exist"));
        assert!(msg.contains("gps_spoofing"));
        assert!(msg.contains("wifi_deauth"));
    }

    #[test]
    fn test_io_error_display() {
        let err = DvdError::io(
            std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
            Some(PathBuf::from("/test/path")),
        );
        assert!(err.to_string().contains("/test/path"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let dvd_err: DvdError = io_err.into();
        assert!(matches!(dvd_err, DvdError::Io { .. }));
    }
}
