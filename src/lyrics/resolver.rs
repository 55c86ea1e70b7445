use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::LyricsSettings;
use crate::library::{MediaIndex, Track};

use super::error::{LyricsError, Result};
use super::locate::locate;
use super::model::{CaptionFormat, CaptionLine};

/// Finds and parses the caption file belonging to a track.
pub struct LyricsResolver {
    settings: LyricsSettings,
    index: Option<Arc<dyn MediaIndex>>,
}

impl LyricsResolver {
    pub fn new(settings: LyricsSettings, index: Option<Arc<dyn MediaIndex>>) -> Self {
        Self { settings, index }
    }

    /// Timed lines for `track`, or an empty list when nothing usable exists.
    ///
    /// Blocking. Never fails: read errors are logged and swallowed.
    pub fn resolve(&self, track: &Track) -> Vec<CaptionLine> {
        let Some(path) = self.locate(track) else {
            debug!(track = %track.title, "no caption file found");
            return Vec::new();
        };

        match load(&path) {
            Ok(lines) => {
                info!(path = %path.display(), lines = lines.len(), "lyrics loaded");
                lines
            }
            Err(e) => {
                warn!(error = %e, "lyrics unavailable");
                Vec::new()
            }
        }
    }

    /// Path of the best matching caption file, if any.
    pub fn locate(&self, track: &Track) -> Option<PathBuf> {
        locate(track, &self.settings, self.index.as_deref())
    }
}

/// Read and parse one caption file. Invalid UTF-8 is replaced, not rejected.
pub fn load(path: &Path) -> Result<Vec<CaptionLine>> {
    let format =
        CaptionFormat::from_path(path).ok_or_else(|| LyricsError::Unsupported(path.to_path_buf()))?;
    let bytes = fs::read(path).map_err(|source| LyricsError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let lines = format.parse(&String::from_utf8_lossy(&bytes));
    debug!(path = %path.display(), ?format, lines = lines.len(), "parsed caption file");
    Ok(lines)
}

/// Index of the last line at or before `elapsed_ms`; `None` before the first line.
pub fn current_index(lines: &[CaptionLine], elapsed_ms: u64) -> Option<usize> {
    lines
        .partition_point(|l| l.time_ms <= elapsed_ms)
        .checked_sub(1)
}

/// Placeholder lines shown when a track has no lyrics.
pub fn sample_sequence() -> Vec<CaptionLine> {
    [
        "No lyrics found",
        "Put a .lrc or .vtt file next to the audio file",
        "or in a Lyrics folder beside it",
        "The file name should contain the song title or artist",
        "e.g. Song.mp3 -> Song.lrc or Song.vtt",
        "Timed WebVTT captions are supported too",
        "Press y to hide this pane",
    ]
    .into_iter()
    .enumerate()
    .map(|(i, text)| CaptionLine::new(i as u64 * 5_000, text))
    .collect()
}
