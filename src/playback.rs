//! Playback queue controller.
//!
//! A `QueueController` owns the queue, the shuffle/repeat modes and one
//! `Decoder`. It runs on a dedicated thread behind `Player`; callers send
//! `PlayerCmd`s and watch the published `Session`.

mod controller;
mod decoder;
mod error;
mod observable;
mod player;
mod queue;
mod thread;
mod types;

pub use decoder::RodioDecoder;
pub use observable::Session;
pub use player::{Player, PlayerOptions};
pub use types::{PlaybackState, PlayerCmd, RepeatMode};
