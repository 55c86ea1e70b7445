use std::path::{Path, PathBuf};

use lofty::prelude::*;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::display::display_from_fields;
use super::model::{Track, track_id_for};

/// Everything a library walk found: playable tracks and caption files.
#[derive(Debug, Default)]
pub struct ScanResult {
    pub tracks: Vec<Track>,
    pub captions: Vec<PathBuf>,
}

struct Tags {
    title: Option<String>,
    artist: Option<String>,
    album: Option<String>,
    duration_ms: u64,
    has_picture: bool,
}

pub(crate) fn has_extension(path: &Path, exts: &[String]) -> bool {
    let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
        return false;
    };
    let ext = ext.to_ascii_lowercase();
    exts.iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .any(|e| !e.is_empty() && e == ext)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn non_blank(s: Option<std::borrow::Cow<'_, str>>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn read_tags(path: &Path) -> Option<Tags> {
    let tagged = match lofty::read_from_path(path) {
        Ok(t) => t,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "no readable tags");
            return None;
        }
    };

    let duration_ms = tagged.properties().duration().as_millis() as u64;
    let tag = tagged.primary_tag().or_else(|| tagged.first_tag());

    Some(Tags {
        title: tag.and_then(|t| non_blank(t.title())),
        artist: tag.and_then(|t| non_blank(t.artist())),
        album: tag.and_then(|t| non_blank(t.album())),
        duration_ms,
        has_picture: tag.map(|t| !t.pictures().is_empty()).unwrap_or(false),
    })
}

fn make_track(path: &Path, settings: &LibrarySettings) -> Track {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("UNKNOWN")
        .to_string();

    let tags = read_tags(path);
    let (title, artist, album, duration_ms, has_picture) = match tags {
        Some(t) => (
            t.title.unwrap_or(stem),
            t.artist,
            t.album,
            t.duration_ms,
            t.has_picture,
        ),
        None => (stem, None, None, 0, false),
    };

    let display = display_from_fields(
        path,
        &title,
        artist.as_deref(),
        album.as_deref(),
        &settings.display_fields,
        &settings.display_separator,
    );

    Track {
        id: track_id_for(path),
        title,
        artist,
        album,
        duration_ms,
        path: path.to_path_buf(),
        // The audio file itself is the artwork source; decoding is left to the viewer.
        artwork: has_picture.then(|| path.display().to_string()),
        display,
    }
}

/// Walk `dir` once, collecting audio files as tracks and caption files by extension.
pub fn scan(dir: &Path, settings: &LibrarySettings, caption_exts: &[String]) -> ScanResult {
    let mut result = ScanResult::default();

    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if !path.is_file() || (!settings.include_hidden && is_hidden(path)) {
            continue;
        }

        if has_extension(path, &settings.extensions) {
            result.tracks.push(make_track(path, settings));
        } else if has_extension(path, caption_exts) {
            result.captions.push(path.to_path_buf());
        }
    }

    result
        .tracks
        .sort_by(|a, b| a.display.to_lowercase().cmp(&b.display.to_lowercase()));
    result.captions.sort();

    info!(
        root = %dir.display(),
        tracks = result.tracks.len(),
        captions = result.captions.len(),
        "library scan finished"
    );
    result
}
