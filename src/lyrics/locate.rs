use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::config::LyricsSettings;
use crate::library::{MediaIndex, Track};

use super::model::CaptionFormat;

/// Name of the per-album lyrics folder checked in the track's directory.
pub(crate) const LYRICS_SUBDIR: &str = "Lyrics";

/// What a candidate name is compared against, already lower-cased.
pub(crate) struct MatchKey {
    base: String,
    title: String,
    artist: String,
}

impl MatchKey {
    pub(crate) fn for_track(track: &Track, suffixes: &[String]) -> Self {
        Self {
            base: strip_language_suffix(&track.base_name().to_lowercase(), suffixes),
            title: track.title.trim().to_lowercase(),
            artist: track
                .artist
                .as_deref()
                .map(|a| a.trim().to_lowercase())
                .unwrap_or_default(),
        }
    }

    /// Name fragments used to query the media index.
    pub(crate) fn patterns(&self) -> Vec<String> {
        [&self.base, &self.title, &self.artist]
            .into_iter()
            .filter(|s| !s.is_empty())
            .cloned()
            .collect()
    }

    pub(crate) fn score(&self, stem: &str, suffixes: &[String]) -> u32 {
        let name = strip_language_suffix(&stem.to_lowercase(), suffixes);
        if name.is_empty() {
            return 0;
        }

        let has_title = !self.title.is_empty() && name.contains(&self.title);
        let has_artist = !self.artist.is_empty() && name.contains(&self.artist);

        let mut score = 0;
        if name == self.base {
            score += 100;
        }
        if !self.base.is_empty() && (name.contains(&self.base) || self.base.contains(&name)) {
            score += 90;
        }
        if has_title {
            score += 80;
        }
        if has_artist {
            score += 60;
        }
        if has_title && has_artist {
            score += 40;
        }
        let prefix: String = self.base.chars().take(4).collect();
        if prefix.chars().count() == 4 && name.contains(&prefix) {
            score += 20;
        }
        score
    }
}

/// Drop one trailing `.xx` language marker, e.g. `song.en` -> `song`.
pub(crate) fn strip_language_suffix(name: &str, suffixes: &[String]) -> String {
    for suffix in suffixes {
        let suffix = suffix.trim().trim_start_matches('.').to_lowercase();
        if suffix.is_empty() {
            continue;
        }
        if let Some(stripped) = name.strip_suffix(&suffix) {
            if let Some(stripped) = stripped.strip_suffix('.') {
                return stripped.to_string();
            }
        }
    }
    name.to_string()
}

#[derive(Debug)]
struct Candidate {
    path: PathBuf,
    score: u32,
    format: CaptionFormat,
}

impl Candidate {
    // Higher score, then vtt over lrc, then the smaller path.
    fn rank(&self, other: &Self) -> Ordering {
        other
            .score
            .cmp(&self.score)
            .then(other.format.cmp(&self.format))
            .then_with(|| self.path.cmp(&other.path))
    }
}

fn accepted_format(path: &Path, extensions: &[String]) -> Option<CaptionFormat> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let listed = extensions
        .iter()
        .any(|e| e.trim().trim_start_matches('.').eq_ignore_ascii_case(&ext));
    if listed {
        CaptionFormat::from_path(path)
    } else {
        None
    }
}

/// Files directly inside `dir` (no recursion). Unreadable dirs yield nothing.
fn list_dir(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .collect()
}

fn best_of(
    paths: impl IntoIterator<Item = PathBuf>,
    key: &MatchKey,
    settings: &LyricsSettings,
) -> Option<PathBuf> {
    let mut candidates: Vec<Candidate> = paths
        .into_iter()
        .filter_map(|path| {
            let format = accepted_format(&path, &settings.extensions)?;
            let stem = path.file_stem()?.to_str()?;
            let score = key.score(stem, &settings.language_suffixes);
            debug!(path = %path.display(), score, "lyrics candidate");
            (score > 0).then_some(Candidate {
                path,
                score,
                format,
            })
        })
        .collect();

    candidates.sort_by(Candidate::rank);
    candidates.into_iter().next().map(|c| c.path)
}

/// Find the best caption file for `track`, walking the tiers in priority order.
///
/// 1. the track's own directory
/// 2. `<track dir>/Lyrics`, then each configured search directory
/// 3. caption files anywhere in the media index (when enabled)
pub(crate) fn locate(
    track: &Track,
    settings: &LyricsSettings,
    index: Option<&dyn MediaIndex>,
) -> Option<PathBuf> {
    let key = MatchKey::for_track(track, &settings.language_suffixes);
    let track_dir = track.path.parent();

    if let Some(dir) = track_dir {
        if let Some(found) = best_of(list_dir(dir), &key, settings) {
            return Some(found);
        }
    }

    let lyric_dirs = track_dir
        .map(|d| d.join(LYRICS_SUBDIR))
        .into_iter()
        .chain(settings.search_dirs.iter().cloned());
    let in_lyric_dirs: Vec<PathBuf> = lyric_dirs.flat_map(|d| list_dir(&d)).collect();
    if let Some(found) = best_of(in_lyric_dirs, &key, settings) {
        return Some(found);
    }

    if settings.use_index {
        if let Some(index) = index {
            return best_of(index.caption_files(&key.patterns()), &key, settings);
        }
    }

    None
}
