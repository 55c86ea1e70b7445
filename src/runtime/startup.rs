use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc::Receiver;

use tracing::{info, warn};

use crate::app::View;
use crate::config::LyricsSettings;
use crate::library::{LibraryIndex, MediaIndex, Track};
use crate::lyrics::{LyricsResolver, LyricsUpdate, LyricsWorker};
use crate::store::{self, Favorites, Playlists};

/// The user's saved lists.
pub struct Collections {
    pub playlists: Playlists,
    pub favorites: Favorites,
}

impl Collections {
    pub fn open(dir: &Path) -> store::Result<Self> {
        Ok(Self {
            playlists: Playlists::open(dir)?,
            favorites: Favorites::open(dir)?,
        })
    }

    pub fn playlist_ids(&self) -> Vec<u64> {
        self.playlists.all().iter().map(|p| p.id).collect()
    }
}

/// Open the saved lists under `dir`; without them the library still plays.
pub fn open_collections(dir: &Path) -> Option<Collections> {
    match Collections::open(dir) {
        Ok(c) => {
            info!(
                dir = %dir.display(),
                playlists = c.playlists.all().len(),
                favorites = c.favorites.list().len(),
                "collections loaded"
            );
            Some(c)
        }
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "collections unavailable");
            None
        }
    }
}

/// Resolver and background worker sharing the library's caption index.
pub fn lyrics_worker(
    settings: &LyricsSettings,
    index: Arc<LibraryIndex>,
) -> (LyricsWorker, Receiver<LyricsUpdate>) {
    let media: Arc<dyn MediaIndex> = index;
    let resolver = LyricsResolver::new(settings.clone(), Some(media));
    LyricsWorker::new(Arc::new(resolver))
}

/// Title and tracks of `view`. Saved tracks pick up fresh metadata from the
/// library when it still has them. A playlist that no longer exists falls
/// back to the library.
pub fn load_view(
    view: View,
    index: &LibraryIndex,
    collections: Option<&Collections>,
) -> (View, String, Vec<Track>) {
    let fresh = |saved: &[Track]| -> Vec<Track> {
        saved
            .iter()
            .map(|t| index.find(t.id).cloned().unwrap_or_else(|| t.clone()))
            .collect()
    };

    match (view, collections) {
        (View::Favorites, Some(c)) => (view, "favorites".to_string(), fresh(c.favorites.list())),
        (View::Favorites, None) => (view, "favorites".to_string(), Vec::new()),
        (View::Playlist(id), Some(c)) => match c.playlists.get(id) {
            Some(p) => (view, p.name.clone(), fresh(&p.tracks)),
            None => load_view(View::Library, index, collections),
        },
        _ => (View::Library, "library".to_string(), index.tracks().to_vec()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::track_id_for;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn track(name: &str, title: &str) -> Track {
        let path = PathBuf::from(format!("/music/{name}.mp3"));
        Track {
            id: track_id_for(&path),
            title: title.into(),
            artist: None,
            album: None,
            duration_ms: 0,
            path,
            artwork: None,
            display: title.into(),
        }
    }

    #[test]
    fn views_resolve_against_library() {
        let dir = tempdir().unwrap();
        let mut c = Collections::open(dir.path()).unwrap();

        let stale = track("a", "Old title");
        let gone = track("gone", "Gone");
        c.favorites.add(&stale).unwrap();
        let mix = c.playlists.create("Mix").unwrap();
        c.playlists.add_track(mix.id, &gone).unwrap();
        assert_eq!(c.playlist_ids(), vec![mix.id]);

        let index = LibraryIndex::from_parts(
            dir.path().to_path_buf(),
            vec![track("a", "New title"), track("b", "B")],
            Vec::new(),
        );

        let (view, title, tracks) = load_view(View::Library, &index, Some(&c));
        assert_eq!((view, title.as_str(), tracks.len()), (View::Library, "library", 2));

        let (_, title, tracks) = load_view(View::Favorites, &index, Some(&c));
        assert_eq!(title, "favorites");
        assert_eq!(tracks[0].title, "New title");

        let (view, title, tracks) = load_view(View::Playlist(mix.id), &index, Some(&c));
        assert_eq!((view, title.as_str()), (View::Playlist(mix.id), "Mix"));
        assert_eq!(tracks, vec![gone]);

        let (view, _, _) = load_view(View::Playlist(mix.id + 1), &index, Some(&c));
        assert_eq!(view, View::Library);

        let (_, _, tracks) = load_view(View::Favorites, &index, None);
        assert!(tracks.is_empty());
    }

    #[test]
    fn broken_favorites_file_keeps_playlists() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("favorites.json")).unwrap();

        let mut c = open_collections(dir.path()).unwrap();
        assert!(c.favorites.list().is_empty());
        let mix = c.playlists.create("Mix").unwrap();
        assert_eq!(c.playlist_ids(), vec![mix.id]);
    }

    #[test]
    fn unusable_data_dir_yields_no_collections() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("not-a-dir");
        std::fs::write(&file, "x").unwrap();
        assert!(open_collections(&file).is_none());
        assert!(open_collections(&dir.path().join("data")).is_some());
    }
}
