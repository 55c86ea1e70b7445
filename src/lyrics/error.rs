//! Error types for caption loading

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LyricsError {
    /// The caption file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file extension has no parser
    #[error("unsupported caption format: {0}")]
    Unsupported(PathBuf),
}

pub type Result<T> = std::result::Result<T, LyricsError>;
