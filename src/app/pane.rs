use crate::lyrics::{CaptionLine, LyricsUpdate, sample_sequence};

/// Lyrics shown next to the track list.
///
/// The pane waits for one track at a time; updates for any other track are
/// dropped so a slow lookup never overwrites a newer one.
#[derive(Debug, Default)]
pub struct LyricsPane {
    pub visible: bool,
    pub show_hint: bool,
    track_id: Option<u64>,
    lines: Vec<CaptionLine>,
    hint: bool,
    loading: bool,
}

impl LyricsPane {
    pub fn new(visible: bool, show_hint: bool) -> Self {
        Self {
            visible,
            show_hint,
            ..Self::default()
        }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    /// Drop the current lines and wait for those of `track_id`.
    pub fn await_track(&mut self, track_id: Option<u64>) {
        self.track_id = track_id;
        self.lines.clear();
        self.hint = false;
        self.loading = track_id.is_some();
    }

    /// Install `update` if it belongs to the awaited track.
    pub fn accept(&mut self, update: LyricsUpdate) -> bool {
        if self.track_id != Some(update.track_id) {
            return false;
        }
        self.loading = false;
        if update.lines.is_empty() && self.show_hint {
            self.lines = sample_sequence();
            self.hint = true;
        } else {
            self.lines = update.lines;
            self.hint = false;
        }
        true
    }

    pub fn lines(&self) -> &[CaptionLine] {
        &self.lines
    }

    /// True when the lines are the built-in "how to add lyrics" sequence.
    pub fn is_hint(&self) -> bool {
        self.hint
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}
