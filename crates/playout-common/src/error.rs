//! Common error types used throughout playout.
//!
//! This module provides a unified error type covering lookups, persistence,
//! content resolution, rendering, and artifact publication failures.

/// Common error type for playout.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested record was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A database operation failed.
    #[error("Database error: {0}")]
    Database(String),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input was provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A playlist refers back to one of its own ancestors.
    #[error("Playlist cycle detected at playlist {0}")]
    Cycle(i64),

    /// Resolution hit a depth or expansion cap.
    #[error("Limit exceeded: {0}")]
    LimitExceeded(String),

    /// Fetching an external playlist failed.
    #[error("External content error: {0}")]
    External(String),

    /// A template could not be rendered.
    #[error("Render error: {0}")]
    Render(String),

    /// Nothing was generated and there is nothing to fall back to.
    #[error("index generation failed and no previous index exists: {0}")]
    NoIndex(String),

    /// The player is in a status that cannot be served.
    #[error("Status error: {0}")]
    Status(String),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new NotFound error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new Database error.
    pub fn database<S: Into<String>>(msg: S) -> Self {
        Self::Database(msg.into())
    }

    /// Create a new InvalidInput error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new LimitExceeded error.
    pub fn limit_exceeded<S: Into<String>>(msg: S) -> Self {
        Self::LimitExceeded(msg.into())
    }

    /// Create a new External error.
    pub fn external<S: Into<String>>(msg: S) -> Self {
        Self::External(msg.into())
    }

    /// Create a new Render error.
    pub fn render<S: Into<String>>(msg: S) -> Self {
        Self::Render(msg.into())
    }

    /// Create a new Status error.
    pub fn status<S: Into<String>>(msg: S) -> Self {
        Self::Status(msg.into())
    }

    /// Create a new Internal error.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
