//! The playback state machine.
//!
//! `QueueController` owns the decoder and the queue. It is single-threaded:
//! the player thread calls `handle` for commands, `pump` for decoder events
//! and `tick` for position polling.

use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::library::Track;

use super::decoder::{Decoder, DecoderEvent};
use super::error::{PlaybackError, Result};
use super::observable::Session;
use super::queue::PlayQueue;
use super::types::{PlaybackState, PlayerCmd, RepeatMode};

pub struct QueueController<D: Decoder> {
    decoder: D,
    queue: PlayQueue,
    shuffle: bool,
    repeat: RepeatMode,
    state: PlaybackState,
    session: Session,
    rng: StdRng,
    poll_interval: Duration,
    next_poll: Option<Instant>,
}

impl<D: Decoder> QueueController<D> {
    pub fn new(decoder: D, session: Session, poll_interval: Duration) -> Self {
        Self {
            decoder,
            queue: PlayQueue::default(),
            shuffle: session.shuffle.get(),
            repeat: session.repeat.get(),
            state: PlaybackState::Idle,
            session,
            rng: StdRng::from_entropy(),
            poll_interval,
            next_poll: None,
        }
    }

    fn set_state(&mut self, state: PlaybackState) {
        self.state = state;
        self.session.state.set(state);
    }

    fn start_polling(&mut self) {
        self.next_poll = Some(Instant::now() + self.poll_interval);
    }

    fn stop_polling(&mut self) {
        self.next_poll = None;
    }

    pub fn handle(&mut self, cmd: PlayerCmd) {
        match cmd {
            PlayerCmd::SetQueue { tracks, start } => self.set_queue(tracks, start),
            PlayerCmd::Pause => self.pause(),
            PlayerCmd::Resume => self.resume(),
            PlayerCmd::TogglePause => self.toggle_pause(),
            PlayerCmd::Stop => self.stop(),
            PlayerCmd::Next => {
                self.next();
            }
            PlayerCmd::Previous => {
                self.previous();
            }
            PlayerCmd::SeekTo(ms) => {
                if let Err(e) = self.seek(ms) {
                    debug!(error = %e, "seek ignored");
                }
            }
            PlayerCmd::SeekBy(delta) => {
                if let Err(e) = self.seek_by(delta) {
                    debug!(error = %e, "seek ignored");
                }
            }
            PlayerCmd::ToggleShuffle => {
                self.toggle_shuffle();
            }
            PlayerCmd::ToggleRepeat => {
                self.toggle_repeat();
            }
            PlayerCmd::Quit => self.stop(),
        }
    }

    /// Replace the queue and prepare the track at `start` (clamped).
    ///
    /// An empty list stops playback and clears the cursor.
    pub fn set_queue(&mut self, tracks: Vec<Track>, start: usize) {
        match self.queue.replace(tracks, start) {
            Some(index) => self.play_index(index),
            None => {
                self.decoder.stop();
                self.stop_polling();
                self.session.current_track.set(None);
                self.session.cursor.set(None);
                self.session.is_playing.set(false);
                self.session.position_ms.set(0);
                self.set_state(PlaybackState::Idle);
            }
        }
    }

    /// Hand the track at `index` to the decoder and wait for it to be ready.
    ///
    /// Source errors are logged and leave the controller in `Preparing`.
    fn play_index(&mut self, index: usize) {
        self.queue.set_cursor(index);
        let Some(track) = self.queue.current().cloned() else {
            return;
        };

        self.stop_polling();
        self.session.is_playing.set(false);
        self.session.position_ms.set(0);
        self.session.cursor.set(Some(index));
        info!(index, title = %track.title, "preparing track");
        self.session.current_track.set(Some(track.clone()));
        self.set_state(PlaybackState::Preparing);

        let prepared = self
            .decoder
            .set_source(&track.path)
            .and_then(|()| self.decoder.prepare());
        if let Err(e) = prepared {
            warn!(path = %track.path.display(), error = %e, "cannot play track");
        }
    }

    pub fn pause(&mut self) {
        if self.state != PlaybackState::Playing {
            return;
        }
        self.decoder.pause();
        self.stop_polling();
        self.session.position_ms.set(self.decoder.position_ms());
        self.session.is_playing.set(false);
        self.set_state(PlaybackState::Paused);
    }

    pub fn resume(&mut self) {
        if self.state != PlaybackState::Paused {
            return;
        }
        self.decoder.start();
        self.start_polling();
        self.session.is_playing.set(true);
        self.set_state(PlaybackState::Playing);
    }

    /// Pause or resume. From `Idle` with a queue, replays the current track.
    pub fn toggle_pause(&mut self) {
        match self.state {
            PlaybackState::Playing => self.pause(),
            PlaybackState::Paused => self.resume(),
            PlaybackState::Idle => {
                if let Some(index) = self.queue.cursor() {
                    self.play_index(index);
                }
            }
            PlaybackState::Preparing | PlaybackState::Completed => {}
        }
    }

    pub fn stop(&mut self) {
        self.decoder.stop();
        self.stop_polling();
        self.session.is_playing.set(false);
        self.session.position_ms.set(0);
        self.set_state(PlaybackState::Idle);
    }

    /// Seek within the current track. Only valid while playing or paused.
    pub fn seek(&mut self, ms: u64) -> Result<()> {
        if !matches!(self.state, PlaybackState::Playing | PlaybackState::Paused) {
            return Err(PlaybackError::NotSeekable(self.state));
        }
        self.decoder.seek_to(ms)?;
        self.session.position_ms.set(ms);
        Ok(())
    }

    pub fn seek_by(&mut self, delta_ms: i64) -> Result<()> {
        let now = self.decoder.position_ms() as i64;
        self.seek(now.saturating_add(delta_ms).max(0) as u64)
    }

    /// Move to the next track. Returns the resulting cursor.
    pub fn next(&mut self) -> Option<usize> {
        let target = self
            .queue
            .next_index(self.shuffle, self.repeat, &mut self.rng)?;
        self.move_to(target)
    }

    /// Move to the previous track. Returns the resulting cursor.
    pub fn previous(&mut self) -> Option<usize> {
        let target = self
            .queue
            .previous_index(self.shuffle, self.repeat, &mut self.rng)?;
        self.move_to(target)
    }

    fn move_to(&mut self, target: usize) -> Option<usize> {
        // A clamped move that goes nowhere is a no-op; shuffle may replay the same index.
        if !self.shuffle && self.queue.cursor() == Some(target) {
            return Some(target);
        }
        self.play_index(target);
        self.queue.cursor()
    }

    /// Like `next()`, but always reloads, so a one-track queue replays itself.
    fn advance(&mut self) {
        if let Some(target) = self
            .queue
            .next_index(self.shuffle, self.repeat, &mut self.rng)
        {
            self.play_index(target);
        }
    }

    pub fn toggle_shuffle(&mut self) -> bool {
        self.shuffle = !self.shuffle;
        self.session.shuffle.set(self.shuffle);
        self.shuffle
    }

    pub fn toggle_repeat(&mut self) -> RepeatMode {
        self.repeat = self.repeat.cycle();
        self.session.repeat.set(self.repeat);
        self.repeat
    }

    /// Drain pending decoder events.
    pub fn pump(&mut self) {
        while let Some(event) = self.decoder.poll_event() {
            match event {
                DecoderEvent::Prepared => self.on_prepared(),
                DecoderEvent::Completed => self.on_completed(),
            }
        }
    }

    fn on_prepared(&mut self) {
        if self.state != PlaybackState::Preparing {
            return;
        }
        self.decoder.start();
        self.start_polling();
        self.session.is_playing.set(true);
        self.set_state(PlaybackState::Playing);
    }

    fn on_completed(&mut self) {
        if !matches!(self.state, PlaybackState::Playing | PlaybackState::Paused) {
            return;
        }
        self.set_state(PlaybackState::Completed);

        match self.repeat {
            RepeatMode::One => {
                if let Err(e) = self.decoder.seek_to(0) {
                    warn!(error = %e, "cannot rewind track");
                }
                self.decoder.start();
                self.session.position_ms.set(0);
                self.session.is_playing.set(true);
                self.start_polling();
                self.set_state(PlaybackState::Playing);
            }
            RepeatMode::All => self.advance(),
            RepeatMode::Off => {
                if self.queue.has_next() {
                    self.advance();
                } else {
                    info!("end of queue");
                    self.stop_polling();
                    self.session.is_playing.set(false);
                    self.set_state(PlaybackState::Idle);
                }
            }
        }
    }

    /// Publish the decoder position if a poll is due. Never changes state.
    pub fn tick(&mut self, now: Instant) {
        let Some(due) = self.next_poll else {
            return;
        };
        if now < due {
            return;
        }
        self.session.position_ms.set(self.decoder.position_ms());
        self.next_poll = Some(now + self.poll_interval);
    }
}

/// Inspection helpers for tests.
#[cfg(test)]
impl<D: Decoder> QueueController<D> {
    /// Replace the shuffle random source, e.g. with a seeded one.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn cursor(&self) -> Option<usize> {
        self.queue.cursor()
    }

    pub fn queue(&self) -> &[Track] {
        self.queue.tracks()
    }

    pub fn is_polling(&self) -> bool {
        self.next_poll.is_some()
    }
}
