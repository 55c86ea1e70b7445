//! Application model: `App`.
//!
//! `App` holds the tracks of the active view, the selected row, the fuzzy
//! filter and prompt line, and the lyrics pane state used by the UI and the
//! runtime.

use crate::library::Track;

use super::pane::LyricsPane;
use super::view::{InputMode, PromptKind, View};

/// The main application model.
pub struct App {
    view: View,
    view_title: String,
    tracks: Vec<Track>,
    lower_titles: Vec<String>,

    /// Index into the active view's tracks.
    pub selected: usize,

    pub follow_playback: bool,
    pending_follow: Option<u64>,

    pub input: InputMode,
    pub filter_query: String,
    pub prompt: String,

    pub lyrics: LyricsPane,
    status: Option<String>,
    pub current_dir: Option<String>,
}

impl App {
    /// Create an `App` showing the library view over `tracks`.
    pub fn new(tracks: Vec<Track>) -> Self {
        let mut app = Self {
            view: View::Library,
            view_title: String::new(),
            tracks: Vec::new(),
            lower_titles: Vec::new(),
            selected: 0,
            follow_playback: true,
            pending_follow: None,
            input: InputMode::Normal,
            filter_query: String::new(),
            prompt: String::new(),
            lyrics: LyricsPane::default(),
            status: None,
            current_dir: None,
        };
        app.set_view(View::Library, "library", tracks);
        app
    }

    /// Show `tracks` under `view`.
    ///
    /// Reloading the same view keeps the selected track when it is still
    /// there; switching views resets the cursor and the filter.
    pub fn set_view(&mut self, view: View, title: impl Into<String>, tracks: Vec<Track>) {
        let keep = if view == self.view {
            self.selected_track().map(|t| t.id)
        } else {
            self.filter_query.clear();
            if self.input == InputMode::Filter {
                self.input = InputMode::Normal;
            }
            None
        };

        self.view = view;
        self.view_title = title.into();
        self.lower_titles = tracks.iter().map(|t| t.display.to_ascii_lowercase()).collect();
        self.tracks = tracks;
        self.selected = keep
            .and_then(|id| self.tracks.iter().position(|t| t.id == id))
            .unwrap_or(0);
        self.ensure_selected_visible();
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn view_title(&self) -> &str {
        &self.view_title
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Return true if the active view contains any tracks.
    pub fn has_tracks(&self) -> bool {
        !self.tracks.is_empty()
    }

    pub fn selected_track(&self) -> Option<&Track> {
        self.tracks.get(self.selected)
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status = Some(msg.into());
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Indices of the visible tracks, in list order, after filtering.
    pub fn display_indices(&self) -> Vec<usize> {
        let query = self.filter_query.trim().to_ascii_lowercase();
        (0..self.tracks.len())
            .filter(|&i| {
                query.is_empty()
                    || Self::fuzzy_match_positions_lower(&self.lower_titles[i], &query).is_some()
            })
            .collect()
    }

    /// Visible tracks plus the position of the selected one among them, the
    /// shape a queue replacement wants.
    pub fn queue_from_selection(&self) -> Option<(Vec<Track>, usize)> {
        let display = self.display_indices();
        let start = display.iter().position(|&i| i == self.selected)?;
        let tracks = display.iter().map(|&i| self.tracks[i].clone()).collect();
        Some((tracks, start))
    }

    /// Fuzzy-match `query` against the track at `track_index`.
    pub fn fuzzy_match_positions_for_track(
        &self,
        track_index: usize,
        query: &str,
    ) -> Option<Vec<usize>> {
        let title = self.lower_titles.get(track_index)?;
        Self::fuzzy_match_positions_lower(title, &query.to_ascii_lowercase())
    }

    /// Fuzzy/subsequence match: return the character positions in
    /// `title_lower` that match `query_lower`, or `None` if not matched.
    fn fuzzy_match_positions_lower(title_lower: &str, query_lower: &str) -> Option<Vec<usize>> {
        let mut positions: Vec<usize> = Vec::new();
        let mut title_iter = title_lower.chars().enumerate();

        for qc in query_lower.chars() {
            loop {
                match title_iter.next() {
                    Some((ti, tc)) if tc == qc => {
                        positions.push(ti);
                        break;
                    }
                    Some(_) => continue,
                    None => return None,
                }
            }
        }

        Some(positions)
    }

    /// Return the next visible index after `current`, wrapping to the first.
    pub fn next_in_view_from(&self, current: usize) -> Option<usize> {
        let display = self.display_indices();
        if display.is_empty() {
            return None;
        }
        match display.iter().position(|&i| i == current) {
            Some(p) => Some(display[(p + 1) % display.len()]),
            None => Some(display[0]),
        }
    }

    /// Return the previous visible index before `current`, wrapping to the last.
    pub fn prev_in_view_from(&self, current: usize) -> Option<usize> {
        let display = self.display_indices();
        let last = *display.last()?;
        match display.iter().position(|&i| i == current) {
            Some(0) | None => Some(last),
            Some(p) => Some(display[p - 1]),
        }
    }

    /// Move selection to the next visible track.
    pub fn next(&mut self) {
        if let Some(next) = self.next_in_view_from(self.selected) {
            self.selected = next;
        }
    }

    /// Move selection to the previous visible track.
    pub fn prev(&mut self) {
        if let Some(prev) = self.prev_in_view_from(self.selected) {
            self.selected = prev;
        }
    }

    pub fn select_first(&mut self) {
        if let Some(&first) = self.display_indices().first() {
            self.selected = first;
        }
    }

    pub fn select_last(&mut self) {
        if let Some(&last) = self.display_indices().last() {
            self.selected = last;
        }
    }

    /// Select the track with `id` if the current view shows it.
    pub fn select_track_id(&mut self, id: u64) -> bool {
        let display = self.display_indices();
        match display.iter().find(|&&i| self.tracks[i].id == id) {
            Some(&i) => {
                self.selected = i;
                true
            }
            None => false,
        }
    }

    /// Enable following playback (cursor follows the playing track).
    pub fn follow_playback_on(&mut self) {
        self.follow_playback = true;
    }

    /// Disable follow-playback and forget any pending follow target.
    pub fn follow_playback_off(&mut self) {
        self.follow_playback = false;
        self.pending_follow = None;
    }

    /// Only follow once the player reports `track_id`, so a stale
    /// notification for the previous track cannot yank the cursor back.
    pub fn set_pending_follow(&mut self, track_id: u64) {
        self.pending_follow = Some(track_id);
    }

    /// Move the cursor onto `playing` when following playback.
    pub fn follow(&mut self, playing: Option<&Track>) {
        if !self.follow_playback || self.input == InputMode::Filter {
            return;
        }
        let Some(track) = playing else {
            return;
        };
        match self.pending_follow {
            Some(pending) if pending != track.id => {}
            _ => {
                self.pending_follow = None;
                self.select_track_id(track.id);
            }
        }
    }

    /// Enter filter mode; the cursor stops following playback.
    pub fn enter_filter_mode(&mut self) {
        self.input = InputMode::Filter;
        self.follow_playback_off();
        self.ensure_selected_visible();
    }

    /// Leave filter mode but keep the query applied.
    pub fn exit_filter_mode(&mut self) {
        if self.input == InputMode::Filter {
            self.input = InputMode::Normal;
        }
    }

    /// Clear the active filter and restore selection visibility.
    pub fn clear_filter(&mut self) {
        self.filter_query.clear();
        self.exit_filter_mode();
        self.ensure_selected_visible();
    }

    pub fn push_filter_char(&mut self, c: char) {
        self.filter_query.push(c);
        self.ensure_selected_visible();
    }

    pub fn pop_filter_char(&mut self) {
        self.filter_query.pop();
        self.ensure_selected_visible();
    }

    /// Start collecting a name for `kind`, pre-filled with `initial`.
    pub fn begin_prompt(&mut self, kind: PromptKind, initial: &str) {
        self.input = InputMode::Prompt(kind);
        self.prompt = initial.to_string();
    }

    pub fn push_prompt_char(&mut self, c: char) {
        self.prompt.push(c);
    }

    pub fn pop_prompt_char(&mut self) {
        self.prompt.pop();
    }

    pub fn cancel_prompt(&mut self) {
        self.input = InputMode::Normal;
        self.prompt.clear();
    }

    /// Finish the prompt, returning what it was for and the typed text.
    pub fn take_prompt(&mut self) -> Option<(PromptKind, String)> {
        let InputMode::Prompt(kind) = self.input else {
            return None;
        };
        self.input = InputMode::Normal;
        Some((kind, std::mem::take(&mut self.prompt)))
    }

    /// Ensure that `selected` is part of the filtered view, otherwise move
    /// selection to the first visible track.
    fn ensure_selected_visible(&mut self) {
        let display = self.display_indices();
        match display.first() {
            None => self.selected = 0,
            Some(&first) if !display.contains(&self.selected) => self.selected = first,
            Some(_) => {}
        }
    }
}
