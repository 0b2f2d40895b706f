//! Error types and handling infrastructure for ngp.
//!
//! This module provides a centralized error handling system using `thiserror` for
//! custom error types, mirroring the error-kind table in the design notes: startup
//! misconfiguration is fatal, per-file I/O failures are swallowed by the caller, and
//! subsearch regex failures abandon only the child search.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for ngp operations.
#[derive(Error, Debug)]
pub enum NgpError {
    /// File system related errors (file not found, permission denied, etc.)
    #[error("file operation failed: {message}")]
    FileError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Path exists but is not a directory or regular file as expected.
    #[error("path is not usable as a search root: {path}")]
    NotSearchable { path: PathBuf },

    /// Memory mapping related errors.
    #[error("memory mapping failed: {message}")]
    MemoryMappingError { message: String },

    /// Pattern compilation errors (regex syntax).
    #[error("invalid pattern: {message}")]
    PatternError { message: String },

    /// UI and terminal related errors.
    #[error("terminal UI operation failed: {message}")]
    UIError { message: String },

    /// Configuration file errors (`ngprc` missing or malformed).
    #[error("configuration error: {message}")]
    ConfigError { message: String },

    /// Invalid command line arguments.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Generic error for cases not covered by specific variants.
    #[error("operation failed: {message}")]
    Other { message: String },
}

/// Standard Result type for ngp operations.
pub type Result<T> = std::result::Result<T, NgpError>;

impl NgpError {
    pub fn file_error(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::FileError {
            message: message.into(),
            source,
        }
    }

    pub fn memory_mapping(message: impl Into<String>) -> Self {
        Self::MemoryMappingError {
            message: message.into(),
        }
    }

    pub fn pattern(message: impl Into<String>) -> Self {
        Self::PatternError {
            message: message.into(),
        }
    }

    pub fn ui(message: impl Into<String>) -> Self {
        Self::UIError {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for NgpError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::FileError {
                message: "file not found".to_string(),
                source: err,
            },
            std::io::ErrorKind::PermissionDenied => Self::FileError {
                message: "permission denied".to_string(),
                source: err,
            },
            _ => Self::FileError {
                message: "I/O operation failed".to_string(),
                source: err,
            },
        }
    }
}

impl From<regex::Error> for NgpError {
    fn from(err: regex::Error) -> Self {
        Self::PatternError {
            message: err.to_string(),
        }
    }
}
