//! Error types for the preference store

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing a preference file failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A value could not be serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Playlist names must not be blank
    #[error("invalid playlist name: {0:?}")]
    InvalidName(String),

    /// Playlist names are unique, ignoring case
    #[error("a playlist named {0:?} already exists")]
    DuplicateName(String),

    /// No playlist with this id
    #[error("playlist {0} not found")]
    NotFound(u64),
}

pub type Result<T> = std::result::Result<T, StoreError>;
