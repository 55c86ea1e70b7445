//! Push-on-change value holders shared between the player thread and the UI.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::library::Track;

use super::types::{PlaybackState, RepeatMode};

struct Slot<T> {
    value: T,
    subscribers: Vec<Sender<T>>,
}

/// A value that notifies subscribers when it changes.
///
/// Subscribers get the current value immediately, then one message per
/// change in subscription order. Dropped receivers are pruned on the next
/// notification.
pub struct Observable<T> {
    slot: Arc<Mutex<Slot<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
        }
    }
}

impl<T: Clone + PartialEq> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot {
                value,
                subscribers: Vec::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slot<T>> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn get(&self) -> T {
        self.lock().value.clone()
    }

    pub fn subscribe(&self) -> Receiver<T> {
        let (tx, rx) = mpsc::channel();
        let mut slot = self.lock();
        let _ = tx.send(slot.value.clone());
        slot.subscribers.push(tx);
        rx
    }

    /// Store `value`; returns whether it differed from the previous one.
    pub fn set(&self, value: T) -> bool {
        let mut slot = self.lock();
        if slot.value == value {
            return false;
        }
        slot.value = value;
        let Slot { value, subscribers } = &mut *slot;
        subscribers.retain(|tx| tx.send(value.clone()).is_ok());
        true
    }

    #[cfg(test)]
    pub(crate) fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }
}

/// Everything the controller publishes about the current playback session.
#[derive(Clone)]
pub struct Session {
    pub current_track: Observable<Option<Track>>,
    /// Queue position of `current_track`.
    pub cursor: Observable<Option<usize>>,
    pub is_playing: Observable<bool>,
    pub position_ms: Observable<u64>,
    pub shuffle: Observable<bool>,
    pub repeat: Observable<RepeatMode>,
    pub state: Observable<PlaybackState>,
}

impl Session {
    pub fn new(shuffle: bool, repeat: RepeatMode) -> Self {
        Self {
            current_track: Observable::new(None),
            cursor: Observable::new(None),
            is_playing: Observable::new(false),
            position_ms: Observable::new(0),
            shuffle: Observable::new(shuffle),
            repeat: Observable::new(repeat),
            state: Observable::new(PlaybackState::Idle),
        }
    }
}
