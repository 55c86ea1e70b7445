use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const UNKNOWN_ARTIST: &str = "Unknown artist";

/// A playable audio file discovered by the scanner.
///
/// Tracks are never mutated after the scan. Equality only looks at `id`, so a
/// track persisted in a playlist still matches the freshly scanned copy even if
/// its tags changed in between.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: u64,
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration_ms: u64,
    pub path: PathBuf,
    /// Reference to embedded artwork, if the file carries any.
    pub artwork: Option<String>,
    #[serde(default)]
    pub display: String,
}

impl PartialEq for Track {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Track {}

impl Track {
    pub fn artist_or_unknown(&self) -> &str {
        self.artist.as_deref().unwrap_or(UNKNOWN_ARTIST)
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    /// File name without its extension, or an empty string for odd paths.
    pub fn base_name(&self) -> &str {
        self.path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
    }
}

/// Stable identifier for a track path (64-bit FNV-1a over the path bytes).
///
/// Ids must survive restarts because playlists and favorites store them.
pub fn track_id_for(path: &Path) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    path.to_string_lossy()
        .bytes()
        .fold(OFFSET, |hash, b| (hash ^ u64::from(b)).wrapping_mul(PRIME))
}
