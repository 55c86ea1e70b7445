use std::path::Path;

use tracing::info;

use crate::library::Track;

use super::error::Result;
use super::prefs::PrefStore;

const FILE: &str = "favorites";
const KEY: &str = "favorite_songs";

/// Favorite tracks, most recently added first.
pub struct Favorites {
    store: PrefStore,
    items: Vec<Track>,
}

impl Favorites {
    pub fn open(dir: &Path) -> Result<Self> {
        let mut favorites = Self {
            store: PrefStore::open(dir, FILE)?,
            items: Vec::new(),
        };
        favorites.refresh();
        Ok(favorites)
    }

    pub fn refresh(&mut self) {
        self.store.reload();
        self.items = self.store.get_json(KEY).unwrap_or_default();
        info!(count = self.items.len(), "favorites loaded");
    }

    /// Write `items` and adopt them only once they are on disk.
    fn commit(&mut self, items: Vec<Track>) -> Result<()> {
        self.store.put_json(KEY, &items)?;
        self.items = items;
        Ok(())
    }

    pub fn list(&self) -> &[Track] {
        &self.items
    }

    pub fn is_favorite(&self, track_id: u64) -> bool {
        self.items.iter().any(|t| t.id == track_id)
    }

    /// Insert at the front; `false` if already a favorite.
    pub fn add(&mut self, track: &Track) -> Result<bool> {
        if self.is_favorite(track.id) {
            return Ok(false);
        }
        let mut items = Vec::with_capacity(self.items.len() + 1);
        items.push(track.clone());
        items.extend_from_slice(&self.items);
        self.commit(items)?;
        Ok(true)
    }

    pub fn remove(&mut self, track_id: u64) -> Result<bool> {
        if !self.is_favorite(track_id) {
            return Ok(false);
        }
        let items = self.items.iter().filter(|t| t.id != track_id).cloned().collect();
        self.commit(items)?;
        Ok(true)
    }

    /// Flip favorite status; returns the new status.
    pub fn toggle(&mut self, track: &Track) -> Result<bool> {
        if self.is_favorite(track.id) {
            self.remove(track.id)?;
            Ok(false)
        } else {
            self.add(track)?;
            Ok(true)
        }
    }

    pub fn clear(&mut self) -> Result<()> {
        self.store.remove(KEY)?;
        self.items.clear();
        Ok(())
    }
}
