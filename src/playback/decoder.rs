//! The decoder capability driven by the queue controller, and its `rodio`
//! implementation.

use std::collections::VecDeque;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rodio::{OutputStream, OutputStreamBuilder, Sink, Source};
use tracing::debug;

use super::error::{PlaybackError, Result};

/// Asynchronous notifications from a decoder.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DecoderEvent {
    /// The prepared source is ready to start.
    Prepared,
    /// Playback reached the end of the source.
    Completed,
}

/// What the controller needs from an audio engine.
///
/// Events are pulled with `poll_event` on the controller's thread, so an
/// implementation never calls back into the controller.
pub trait Decoder {
    fn set_source(&mut self, path: &Path) -> Result<()>;
    fn prepare(&mut self) -> Result<()>;
    fn start(&mut self);
    fn pause(&mut self);
    fn stop(&mut self);
    fn seek_to(&mut self, ms: u64) -> Result<()>;
    fn position_ms(&self) -> u64;
    fn poll_event(&mut self) -> Option<DecoderEvent>;
}

/// `rodio` sink based decoder.
///
/// Seeking rebuilds the sink and skips into the file, which works for every
/// format `rodio` can decode. `offset` remembers where the current sink began.
pub struct RodioDecoder {
    stream: OutputStream,
    source: Option<PathBuf>,
    sink: Option<Sink>,
    offset: Duration,
    started: bool,
    events: VecDeque<DecoderEvent>,
}

impl RodioDecoder {
    /// Open the default output device. Must be called on the thread that owns the decoder.
    pub fn open_default() -> Result<Self> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| PlaybackError::Output(e.to_string()))?;
        // rodio logs to stderr when the stream is dropped, which garbles the TUI.
        stream.log_on_drop(false);

        Ok(Self {
            stream,
            source: None,
            sink: None,
            offset: Duration::ZERO,
            started: false,
            events: VecDeque::new(),
        })
    }

    /// Create a paused `Sink` for `path` that starts playback at `start_at`.
    fn sink_at(&self, path: &Path, start_at: Duration) -> Result<Sink> {
        let file = File::open(path).map_err(|source| PlaybackError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let source = rodio::Decoder::new(BufReader::new(file))
            .map_err(|e| PlaybackError::Decode {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?
            .skip_duration(start_at);

        let sink = Sink::connect_new(self.stream.mixer());
        sink.append(source);
        sink.pause();
        Ok(sink)
    }

    fn drop_sink(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.started = false;
        self.offset = Duration::ZERO;
    }
}

impl Decoder for RodioDecoder {
    fn set_source(&mut self, path: &Path) -> Result<()> {
        self.drop_sink();
        self.events.clear();
        if let Err(source) = File::open(path) {
            self.source = None;
            return Err(PlaybackError::Open {
                path: path.to_path_buf(),
                source,
            });
        }
        self.source = Some(path.to_path_buf());
        Ok(())
    }

    fn prepare(&mut self) -> Result<()> {
        let path = self.source.clone().ok_or(PlaybackError::NoSource)?;
        let sink = self.sink_at(&path, Duration::ZERO)?;
        self.sink = Some(sink);
        self.events.push_back(DecoderEvent::Prepared);
        Ok(())
    }

    fn start(&mut self) {
        if let Some(sink) = &self.sink {
            sink.play();
            self.started = true;
        }
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
    }

    fn stop(&mut self) {
        self.drop_sink();
        self.events.clear();
    }

    fn seek_to(&mut self, ms: u64) -> Result<()> {
        let path = self.source.clone().ok_or(PlaybackError::NoSource)?;
        let paused = self.sink.as_ref().is_none_or(|s| s.is_paused());
        let target = Duration::from_millis(ms);

        let sink = self.sink_at(&path, target)?;
        if let Some(old) = self.sink.replace(sink) {
            old.stop();
        }
        if !paused {
            if let Some(sink) = &self.sink {
                sink.play();
            }
        }
        self.offset = target;
        debug!(path = %path.display(), ms, "seeked");
        Ok(())
    }

    fn position_ms(&self) -> u64 {
        let played = self.sink.as_ref().map_or(Duration::ZERO, |s| s.get_pos());
        (self.offset + played).as_millis() as u64
    }

    fn poll_event(&mut self) -> Option<DecoderEvent> {
        if let Some(event) = self.events.pop_front() {
            return Some(event);
        }
        let finished = self.started && self.sink.as_ref().is_some_and(|s| s.empty());
        if finished {
            self.started = false;
            return Some(DecoderEvent::Completed);
        }
        None
    }
}
