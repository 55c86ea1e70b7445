//! Error types for playback

use std::path::PathBuf;

use thiserror::Error;

use super::types::PlaybackState;

#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The audio file could not be opened
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The audio file could not be decoded
    #[error("failed to decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    /// No source has been set on the decoder
    #[error("no source loaded")]
    NoSource,

    /// Seeking is only possible while playing or paused
    #[error("cannot seek while {0:?}")]
    NotSeekable(PlaybackState),

    /// The audio output device is unavailable
    #[error("audio output error: {0}")]
    Output(String),

    /// The player thread is gone
    #[error("player thread disconnected")]
    Disconnected,
}

pub type Result<T> = std::result::Result<T, PlaybackError>;
