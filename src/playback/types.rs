//! Small playback types: modes, controller states and player commands.

use crate::config::RepeatSetting;
use crate::library::Track;

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum RepeatMode {
    /// Stop after the last track of the queue.
    #[default]
    Off,
    /// Restart the current track when it ends.
    One,
    /// Wrap around to the start of the queue.
    All,
}

impl RepeatMode {
    /// `Off -> All -> One -> Off`
    pub fn cycle(self) -> Self {
        match self {
            Self::Off => Self::All,
            Self::All => Self::One,
            Self::One => Self::Off,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::One => "one",
            Self::All => "all",
        }
    }
}

impl From<RepeatSetting> for RepeatMode {
    fn from(setting: RepeatSetting) -> Self {
        match setting {
            RepeatSetting::Off => Self::Off,
            RepeatSetting::One => Self::One,
            RepeatSetting::All => Self::All,
        }
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Idle,
    /// Source handed to the decoder, waiting for it to report ready.
    Preparing,
    Playing,
    Paused,
    /// The decoder reached the end of the track.
    Completed,
}

#[derive(Debug)]
pub enum PlayerCmd {
    /// Replace the queue and start playing at `start` (clamped).
    SetQueue { tracks: Vec<Track>, start: usize },
    Pause,
    Resume,
    TogglePause,
    Stop,
    Next,
    Previous,
    /// Absolute seek in milliseconds.
    SeekTo(u64),
    /// Relative seek in milliseconds, positive or negative.
    SeekBy(i64),
    ToggleShuffle,
    ToggleRepeat,
    /// Stop playback and end the player thread.
    Quit,
}
