use std::path::PathBuf;

use thiserror::Error;

/// Rejected entry path. Local to the offending path; never aborts a listing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("invalid path {path:?}: empty segment")]
    InvalidPath { path: String },
}

/// Failure reported by an archive engine. Shown to the user as-is.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("failed to open {}: {source}", archive.display())]
    Unreadable {
        archive: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {reason}", archive.display())]
    Malformed { archive: PathBuf, reason: String },

    #[error("invalid password for {}", archive.display())]
    WrongPassword { archive: PathBuf },

    #[error("unsupported archive {}: {reason}", archive.display())]
    Unsupported { archive: PathBuf, reason: String },
}

/// Recency persistence failure. Never propagated as a failure of an open.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("recent files store unavailable: {0}")]
    Unavailable(String),

    #[error("cannot record non-UTF-8 path {}", .0.display())]
    NonUtf8Path(PathBuf),

    #[error("recent files store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("recent files store is corrupt: {0}")]
    Codec(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(String),
}

// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, Error>;
