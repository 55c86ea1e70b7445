//! Synchronized lyrics: finding a caption file for a track and parsing it.
//!
//! Resolution is fail-soft. Whatever goes wrong on disk, callers get an empty
//! line list and a log entry, never an error.

mod error;
mod locate;
mod lrc;
mod model;
mod resolver;
mod vtt;
mod worker;

pub use model::CaptionLine;
pub use resolver::{LyricsResolver, current_index, sample_sequence};
pub use worker::{LyricsUpdate, LyricsWorker};
