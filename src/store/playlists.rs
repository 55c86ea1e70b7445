use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::library::Track;

use super::error::{Result, StoreError};
use super::prefs::PrefStore;

const FILE: &str = "playlists";
const KEY: &str = "playlists";

/// A named, ordered list of tracks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    /// Creation time in milliseconds, unique per store.
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub tracks: Vec<Track>,
}

impl Playlist {
    pub fn contains(&self, track_id: u64) -> bool {
        self.tracks.iter().any(|t| t.id == track_id)
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn same_name(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// All user playlists, persisted on every change.
pub struct Playlists {
    store: PrefStore,
    items: Vec<Playlist>,
    last_id: u64,
}

impl Playlists {
    pub fn open(dir: &Path) -> Result<Self> {
        let mut playlists = Self {
            store: PrefStore::open(dir, FILE)?,
            items: Vec::new(),
            last_id: 0,
        };
        playlists.refresh();
        Ok(playlists)
    }

    /// Reload from disk, discarding in-memory state.
    pub fn refresh(&mut self) {
        self.store.reload();
        self.items = self.store.get_json(KEY).unwrap_or_default();
        self.last_id = self.items.iter().map(|p| p.id).max().unwrap_or(0);
        info!(count = self.items.len(), "playlists loaded");
    }

    /// Write `items` and adopt them only once they are on disk.
    fn commit(&mut self, items: Vec<Playlist>) -> Result<()> {
        self.store.put_json(KEY, &items)?;
        self.items = items;
        Ok(())
    }

    /// Copy of the current list with `f` applied to playlist `id`.
    fn edited<R>(
        &self,
        id: u64,
        f: impl FnOnce(&mut Playlist) -> R,
    ) -> Result<(Vec<Playlist>, R)> {
        let mut items = self.items.clone();
        let playlist = items
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StoreError::NotFound(id))?;
        let out = f(playlist);
        Ok((items, out))
    }

    fn next_id(&mut self) -> u64 {
        self.last_id = now_ms().max(self.last_id + 1);
        self.last_id
    }

    fn validate_name(&self, name: &str, exclude: Option<u64>) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        if !self.is_name_available(name, exclude) {
            return Err(StoreError::DuplicateName(name.to_string()));
        }
        Ok(name.to_string())
    }

    pub fn all(&self) -> &[Playlist] {
        &self.items
    }

    pub fn get(&self, id: u64) -> Option<&Playlist> {
        self.items.iter().find(|p| p.id == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Playlist> {
        self.items.iter().find(|p| same_name(&p.name, name))
    }

    /// Whether `name` is unused, ignoring case and the playlist `exclude`.
    pub fn is_name_available(&self, name: &str, exclude: Option<u64>) -> bool {
        !self
            .items
            .iter()
            .any(|p| Some(p.id) != exclude && same_name(&p.name, name))
    }

    pub fn track_count(&self, id: u64) -> usize {
        self.get(id).map_or(0, |p| p.tracks.len())
    }

    pub fn contains_track(&self, id: u64, track_id: u64) -> bool {
        self.get(id).is_some_and(|p| p.contains(track_id))
    }

    pub fn create(&mut self, name: &str) -> Result<Playlist> {
        let name = self.validate_name(name, None)?;
        let playlist = Playlist {
            id: self.next_id(),
            name,
            tracks: Vec::new(),
        };
        let mut items = self.items.clone();
        items.push(playlist.clone());
        self.commit(items)?;
        info!(id = playlist.id, name = %playlist.name, "playlist created");
        Ok(playlist)
    }

    pub fn rename(&mut self, id: u64, name: &str) -> Result<()> {
        let name = self.validate_name(name, Some(id))?;
        let (items, ()) = self.edited(id, |p| p.name = name)?;
        self.commit(items)
    }

    pub fn delete(&mut self, id: u64) -> Result<()> {
        if self.get(id).is_none() {
            return Err(StoreError::NotFound(id));
        }
        let items = self.items.iter().filter(|p| p.id != id).cloned().collect();
        self.commit(items)
    }

    /// Append `track`; `false` if it was already in the playlist.
    pub fn add_track(&mut self, id: u64, track: &Track) -> Result<bool> {
        let (items, added) = self.edited(id, |p| {
            let fresh = !p.contains(track.id);
            if fresh {
                p.tracks.push(track.clone());
            }
            fresh
        })?;
        if added {
            self.commit(items)?;
        }
        Ok(added)
    }

    pub fn remove_track(&mut self, id: u64, track_id: u64) -> Result<bool> {
        Ok(self.remove_tracks(id, &[track_id])? > 0)
    }

    /// Remove every listed track; returns how many were removed.
    pub fn remove_tracks(&mut self, id: u64, track_ids: &[u64]) -> Result<usize> {
        let (items, removed) = self.edited(id, |p| {
            let before = p.tracks.len();
            p.tracks.retain(|t| !track_ids.contains(&t.id));
            before - p.tracks.len()
        })?;
        if removed > 0 {
            self.commit(items)?;
        }
        Ok(removed)
    }
}
