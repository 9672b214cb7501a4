//! Error types for entrypoint discovery.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DiscoveryError>;

/// Errors that abort a crawl or a discovery run.
///
/// A dangling symlink and a directory cycle are not errors: the crawler
/// skips them and carries on.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Path does not exist (only raised for roots, never for link targets).
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Root path is not a directory.
    #[error("Root path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Source file could not be parsed into a clean syntax tree.
    #[error("Failed to parse {path} at {line}:{column}")]
    Parse {
        path: PathBuf,
        line: usize,
        column: usize,
    },

    /// Grammar could not be loaded into the parser.
    #[error("Failed to load {language} grammar: {message}")]
    Grammar { language: String, message: String },

    /// Include/exclude pattern failed to compile.
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    Config { message: String },
}

impl DiscoveryError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
