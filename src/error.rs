//! Error types for the content index

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while building or querying the content index
#[derive(Debug, Error)]
pub enum ContentError {
    /// The content directory is missing or cannot be read
    #[error("content store unavailable at {path:?}: {source}")]
    StoreUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A single article file could not be read or its front-matter is malformed
    #[error("failed to parse article {path:?}: {reason}")]
    ArticleParse { path: PathBuf, reason: String },

    /// No article exists for the requested key
    #[error("article not found: {0}")]
    NotFound(String),

    /// Two files in the store resolve to the same key
    #[error("duplicate article key '{key}': {first:?} and {second:?}")]
    DuplicateKey {
        key: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// The article body could not be rendered
    #[error("render error: {0}")]
    Render(String),

    /// The site configuration could not be loaded
    #[error("invalid configuration {path:?}: {reason}")]
    Config { path: PathBuf, reason: String },
}

impl ContentError {
    pub(crate) fn parse(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::ArticleParse {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn store(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::StoreUnavailable {
            path: path.into(),
            source,
        }
    }

    /// Whether this error only affects a single article
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::ArticleParse { .. })
    }
}

/// Result alias for content index operations
pub type Result<T> = std::result::Result<T, ContentError>;
