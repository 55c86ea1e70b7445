//! Ordered track list plus cursor, and the cursor arithmetic for
//! next/previous under the current shuffle and repeat modes.

use rand::Rng;

use crate::library::Track;

use super::types::RepeatMode;

#[derive(Debug, Default)]
pub struct PlayQueue {
    tracks: Vec<Track>,
    cursor: Option<usize>,
}

impl PlayQueue {
    /// Replace the whole queue; `start` is clamped into range.
    pub fn replace(&mut self, tracks: Vec<Track>, start: usize) -> Option<usize> {
        self.cursor = if tracks.is_empty() {
            None
        } else {
            Some(start.min(tracks.len() - 1))
        };
        self.tracks = tracks;
        self.cursor
    }

    #[cfg(test)]
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn current(&self) -> Option<&Track> {
        self.cursor.and_then(|i| self.tracks.get(i))
    }

    pub(crate) fn set_cursor(&mut self, index: usize) {
        if index < self.tracks.len() {
            self.cursor = Some(index);
        }
    }

    /// Whether a track follows the cursor without wrapping.
    pub fn has_next(&self) -> bool {
        self.cursor.is_some_and(|i| i + 1 < self.tracks.len())
    }

    /// Index `next()` should move to, or `None` for an empty queue.
    pub fn next_index(&self, shuffle: bool, repeat: RepeatMode, rng: &mut impl Rng) -> Option<usize> {
        let len = self.tracks.len();
        if len == 0 {
            return None;
        }
        if shuffle {
            return Some(rng.gen_range(0..len));
        }

        let cur = self.cursor.unwrap_or(0);
        Some(match repeat {
            RepeatMode::All => (cur + 1) % len,
            _ => (cur + 1).min(len - 1),
        })
    }

    /// Index `previous()` should move to, or `None` for an empty queue.
    pub fn previous_index(
        &self,
        shuffle: bool,
        repeat: RepeatMode,
        rng: &mut impl Rng,
    ) -> Option<usize> {
        let len = self.tracks.len();
        if len == 0 {
            return None;
        }
        if shuffle {
            return Some(rng.gen_range(0..len));
        }

        let cur = self.cursor.unwrap_or(0);
        Some(match (repeat, cur) {
            (RepeatMode::All, 0) => len - 1,
            _ => cur.saturating_sub(1),
        })
    }
}
