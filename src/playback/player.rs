use std::sync::Mutex;
use std::sync::mpsc::{self, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::config::PlaybackSettings;

use super::decoder::Decoder;
use super::error::{PlaybackError, Result};
use super::observable::Session;
use super::thread::spawn_player_thread;
use super::types::{PlayerCmd, RepeatMode};

/// Initial playback mode and polling cadence.
#[derive(Debug, Clone, Copy)]
pub struct PlayerOptions {
    pub shuffle: bool,
    pub repeat: RepeatMode,
    pub poll_interval: Duration,
}

impl PlayerOptions {
    pub fn from_settings(settings: &PlaybackSettings) -> Self {
        Self {
            shuffle: settings.shuffle,
            repeat: settings.repeat.into(),
            poll_interval: Duration::from_millis(settings.poll_interval_ms.max(1)),
        }
    }
}

/// Handle to the player thread: a command channel in, a `Session` out.
pub struct Player {
    tx: Sender<PlayerCmd>,
    session: Session,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl Player {
    /// Start the player thread, building the decoder on it with `make_decoder`.
    pub fn spawn<D, F>(make_decoder: F, options: PlayerOptions) -> Result<Self>
    where
        D: Decoder + 'static,
        F: FnOnce() -> Result<D> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<PlayerCmd>();
        let (ready_tx, ready_rx) = mpsc::channel();
        let session = Session::new(options.shuffle, options.repeat);

        let handle = spawn_player_thread(
            make_decoder,
            rx,
            session.clone(),
            options.poll_interval,
            ready_tx,
        )
        .map_err(|e| PlaybackError::Output(e.to_string()))?;

        match ready_rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                let _ = handle.join();
                return Err(e);
            }
            Err(_) => {
                let _ = handle.join();
                return Err(PlaybackError::Disconnected);
            }
        }

        Ok(Self {
            tx,
            session,
            join: Mutex::new(Some(handle)),
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn send(&self, cmd: PlayerCmd) -> Result<()> {
        self.tx.send(cmd).map_err(|_| PlaybackError::Disconnected)
    }

    /// Stop playback and wait for the player thread to exit.
    pub fn quit(&self) {
        let _ = self.send(PlayerCmd::Quit);

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}
