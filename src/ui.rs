//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::Line,
    widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock, time::Duration};

use crate::app::{App, InputMode};
use crate::config::{ControlsSettings, TimeField, UiSettings};
use crate::library::{Track, display_from_fields};
use crate::lyrics::current_index;
use crate::playback::{PlaybackState, RepeatMode, Session};

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    BTreeMap::from([
        ("j/k", "up/down"),
        ("gg/G", "top/bottom"),
        ("tab", "next view"),
        ("enter", "play from here"),
        ("space/p", "play/pause"),
        ("h/l", "prev/next song"),
        ("x", "stop"),
        ("0", "restart song"),
        // H/L is filled dynamically from config.
        ("/", "filter"),
        ("s", "shuffle"),
        ("r", "repeat"),
        ("f", "favorite"),
        ("C", "clear favorites"),
        ("a", "add to playlist"),
        ("N/R/D", "new/rename/delete playlist"),
        ("d", "remove from playlist"),
        ("y", "lyrics"),
        ("q", "quit"),
    ])
});

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(scrub_seconds: u64) -> String {
    // Keep the rendered order stable and human-friendly.
    let order = [
        "j/k", "h/l", "H/L", "enter", "space/p", "x", "0", "gg/G", "tab", "/", "s", "r", "f",
        "C", "a", "N/R/D", "d", "y", "q",
    ];
    order
        .iter()
        .filter_map(|k| {
            if *k == "H/L" {
                Some(format!("[H/L] scrub -/+{}s", scrub_seconds))
            } else {
                CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// A copy of the published session values, taken once per frame.
#[derive(Debug, Clone, Default)]
pub struct NowPlaying {
    pub track: Option<Track>,
    pub position_ms: u64,
    pub is_playing: bool,
    pub shuffle: bool,
    pub repeat: RepeatMode,
    pub state: PlaybackState,
}

impl NowPlaying {
    pub fn capture(session: &Session) -> Self {
        Self {
            track: session.current_track.get(),
            position_ms: session.position_ms.get(),
            is_playing: session.is_playing.get(),
            shuffle: session.shuffle.get(),
            repeat: session.repeat.get(),
            state: session.state.get(),
        }
    }
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Build the "now playing" track text according to `ui` settings.
fn now_playing_track_text(track: &Track, ui: &UiSettings) -> String {
    display_from_fields(
        &track.path,
        &track.title,
        track.artist.as_deref(),
        track.album.as_deref(),
        &ui.now_playing_track_fields,
        &ui.now_playing_track_separator,
    )
}

/// Build the now-playing time text (elapsed/total/remaining) per `UiSettings`.
/// A zero total means the length is unknown and is left out.
fn now_playing_time_text(elapsed: Duration, total: Duration, ui: &UiSettings) -> Option<String> {
    let known = !total.is_zero();
    let parts: Vec<String> = ui
        .now_playing_time_fields
        .iter()
        .filter_map(|f| match f {
            TimeField::Elapsed => Some(format_mmss(elapsed)),
            TimeField::Total if known => Some(format_mmss(total)),
            TimeField::Remaining if known => {
                Some(format!("-{}", format_mmss(total.saturating_sub(elapsed))))
            }
            _ => None,
        })
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(&ui.now_playing_time_separator))
    }
}

fn status_text(app: &App, now: &NowPlaying, ui: &UiSettings) -> String {
    let mut parts: Vec<String> = Vec::new();

    parts.push(format!(" VIEW: {}", app.view_title()));
    if app.follow_playback {
        parts.push("CURSOR: Follow".to_string());
    } else {
        parts.push("CURSOR: Free-roam".to_string());
    }
    parts.push(format!("REPEAT: {}", now.repeat.label()));
    parts.push(format!(
        "Shuffle: {}",
        if now.shuffle { "ON" } else { "OFF" }
    ));

    let q = app.filter_query.trim();
    if app.input == InputMode::Filter || !q.is_empty() {
        parts.push(format!("FILTER: {q}").trim_end().to_string());
    }

    match &now.track {
        Some(track) => {
            let song = now_playing_track_text(track, ui);
            let elapsed = Duration::from_millis(now.position_ms);
            match now_playing_time_text(elapsed, track.duration(), ui) {
                Some(time) => parts.push(format!("Song: {} [{}]", song, time)),
                None => parts.push(format!("Song: {}", song)),
            }
            let state = match now.state {
                PlaybackState::Preparing => "Loading",
                PlaybackState::Paused => "Paused",
                PlaybackState::Completed => "Finished",
                _ if now.is_playing => "Playing",
                _ => "Stopped",
            };
            parts.push(state.to_string());
        }
        None => parts.push("Stopped".to_string()),
    }

    if let Some(dir) = &app.current_dir {
        parts.push(format!("Dir: {}", dir));
    }
    if let Some(msg) = app.status() {
        parts.push(msg.to_string());
    }

    parts.join(" • ")
}

/// Pick which `height` rows of `total` to render so `selected` sits in the
/// middle when possible. Returns `(start, end)`.
fn centered_window(total: usize, height: usize, selected: usize) -> (usize, usize) {
    if total <= height || height == 0 {
        return (0, total);
    }
    let start = selected
        .saturating_sub(height / 2)
        .min(total - height);
    (start, start + height)
}

fn draw_tracks(frame: &mut Frame, area: Rect, app: &App, display: &[usize]) {
    let q = app.filter_query.trim();
    let tracks = app.tracks();

    // Only build ListItems for the visible window.
    let total = display.len();
    let sel_pos = display.iter().position(|&i| i == app.selected).unwrap_or(0);
    let (start, end) = centered_window(total, area.height.saturating_sub(2) as usize, sel_pos);

    let visible_items: Vec<ListItem> = display[start..end]
        .iter()
        .map(|&i| {
            let title = &tracks[i].display;
            let Some(positions) = (!q.is_empty())
                .then(|| app.fuzzy_match_positions_for_track(i, q))
                .flatten()
            else {
                return ListItem::new(title.as_str());
            };

            let mut rendered = String::new();
            let mut pos_iter = positions.into_iter();
            let mut next_pos = pos_iter.next();
            for (ci, ch) in title.chars().enumerate() {
                if next_pos == Some(ci) {
                    rendered.extend(ch.to_uppercase());
                    next_pos = pos_iter.next();
                } else {
                    rendered.push(ch);
                }
            }
            ListItem::new(rendered)
        })
        .collect();

    let title = format!(" {} ({}) ", app.view_title(), tracks.len());
    let list = List::new(visible_items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if total > 0 {
        state.select(Some(sel_pos - start));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_lyrics(frame: &mut Frame, area: Rect, app: &App, now: &NowPlaying) {
    let pane = &app.lyrics;
    let block = Block::default()
        .borders(Borders::ALL)
        .title(if pane.is_hint() { " lyrics (hint) " } else { " lyrics " })
        .title_alignment(Alignment::Center);

    let lines = pane.lines();
    if lines.is_empty() {
        let msg = if now.track.is_none() {
            "Nothing playing"
        } else if pane.is_loading() {
            "Looking for lyrics..."
        } else {
            "No lyrics"
        };
        let empty = Paragraph::new(msg)
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let current = current_index(lines, now.position_ms);
    let height = area.height.saturating_sub(2) as usize;
    let (start, end) = centered_window(lines.len(), height, current.unwrap_or(0));

    let rendered: Vec<Line> = lines[start..end]
        .iter()
        .enumerate()
        .map(|(offset, line)| {
            if Some(start + offset) == current {
                Line::from(line.text.as_str()).bold().reversed()
            } else {
                Line::from(line.text.as_str()).dim()
            }
        })
        .collect();

    let paragraph = Paragraph::new(rendered)
        .alignment(Alignment::Center)
        .block(block);
    frame.render_widget(paragraph, area);
}

fn input_line(app: &App) -> Option<String> {
    match app.input {
        InputMode::Normal => None,
        InputMode::Filter => Some(format!("/{}", app.filter_query)),
        InputMode::Prompt(kind) => Some(format!("{}: {}", kind.label(), app.prompt)),
    }
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    display: &[usize],
    now: &NowPlaying,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let input = input_line(app);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Min(1),
            Constraint::Length(if input.is_some() { 3 } else { 0 }),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" canto ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let status_par = Paragraph::new(status_text(app, now, ui_settings))
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" status "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, chunks[1]);

    if app.lyrics.visible {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(chunks[2]);
        draw_tracks(frame, columns[0], app, display);
        draw_lyrics(frame, columns[1], app, now);
    } else {
        draw_tracks(frame, chunks[2], app, display);
    }

    if let Some(text) = input {
        let input_par = Paragraph::new(text).block(Block::default().borders(Borders::ALL));
        frame.render_widget(input_par, chunks[3]);
    }

    let footer = Paragraph::new(controls_text(controls_settings.scrub_seconds))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);
}
