use std::path::{Path, PathBuf};

use crate::config::LibrarySettings;

use super::model::Track;
use super::scan::scan;

/// Read-only view over the scanned library.
///
/// The lyrics resolver only needs this trait, so tests can hand it a fixed
/// list of caption files without touching disk.
pub trait MediaIndex: Send + Sync {
    fn tracks(&self) -> &[Track];

    /// Caption files whose file name contains any of `patterns` (case-insensitive).
    fn caption_files(&self, patterns: &[String]) -> Vec<PathBuf>;
}

/// In-memory index built from one library scan.
#[derive(Debug, Default)]
pub struct LibraryIndex {
    root: PathBuf,
    tracks: Vec<Track>,
    captions: Vec<PathBuf>,
}

impl LibraryIndex {
    pub fn build(root: &Path, settings: &LibrarySettings, caption_exts: &[String]) -> Self {
        let result = scan(root, settings, caption_exts);
        Self::from_parts(root.to_path_buf(), result.tracks, result.captions)
    }

    pub fn from_parts(root: PathBuf, tracks: Vec<Track>, captions: Vec<PathBuf>) -> Self {
        Self {
            root,
            tracks,
            captions,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn find(&self, id: u64) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }
}

impl MediaIndex for LibraryIndex {
    fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    fn caption_files(&self, patterns: &[String]) -> Vec<PathBuf> {
        let patterns: Vec<String> = patterns
            .iter()
            .map(|p| p.trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();
        if patterns.is_empty() {
            return Vec::new();
        }

        self.captions
            .iter()
            .filter(|path| {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_lowercase())
                    .unwrap_or_default();
                patterns.iter().any(|p| name.contains(p.as_str()))
            })
            .cloned()
            .collect()
    }
}
