use std::sync::mpsc::Receiver;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, info, warn};

use crate::app::{App, InputMode, PromptKind, View};
use crate::config;
use crate::library::{LibraryIndex, Track};
use crate::lyrics::{LyricsUpdate, LyricsWorker};
use crate::playback::{Player, PlayerCmd};
use crate::runtime::startup::{Collections, load_view};
use crate::store;
use crate::ui::{self, NowPlaying};

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
    worker: LyricsWorker,
    lyrics_rx: Receiver<LyricsUpdate>,
    /// Current-track notifications from the player session.
    track_rx: Receiver<Option<Track>>,
    collections: Option<Collections>,
}

impl EventLoopState {
    pub fn new(
        worker: LyricsWorker,
        lyrics_rx: Receiver<LyricsUpdate>,
        track_rx: Receiver<Option<Track>>,
        collections: Option<Collections>,
    ) -> Self {
        Self {
            pending_gg: false,
            worker,
            lyrics_rx,
            track_rx,
            collections,
        }
    }
}

/// Main terminal event loop: handles input, UI drawing and sync with the
/// player thread and the lyrics worker. Returns `Ok(())` when shutdown is
/// requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    player: &Player,
    index: &LibraryIndex,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        while let Ok(track) = state.track_rx.try_recv() {
            on_track_change(app, state, track.as_ref());
        }

        while let Ok(update) = state.lyrics_rx.try_recv() {
            let track_id = update.track_id;
            if state.worker.pending() != Some(track_id) || !app.lyrics.accept(update) {
                debug!(track_id, "dropped stale lyrics");
            }
        }

        let now = NowPlaying::capture(player.session());
        let display = app.display_indices();
        terminal.draw(|f| ui::draw(f, app, &display, &now, &settings.ui, &settings.controls))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, player, index, state) {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn on_track_change(app: &mut App, state: &mut EventLoopState, track: Option<&Track>) {
    app.follow(track);
    app.lyrics.await_track(track.map(|t| t.id));
    match track {
        Some(t) => {
            info!(
                track_id = t.id,
                title = %t.title,
                artist = t.artist_or_unknown(),
                "now playing"
            );
            state.worker.request(t);
        }
        None => state.worker.cancel(),
    }
}

fn send(app: &mut App, player: &Player, cmd: PlayerCmd) {
    if let Err(e) = player.send(cmd) {
        warn!(error = %e, "player command dropped");
        app.set_status("player stopped");
    }
}

/// Replace the player's queue with the visible list, starting at the cursor.
fn play_selection(app: &mut App, player: &Player) {
    let Some((tracks, start)) = app.queue_from_selection() else {
        return;
    };
    app.follow_playback_on();
    app.set_pending_follow(tracks[start].id);
    send(app, player, PlayerCmd::SetQueue { tracks, start });
}

fn reload_view(app: &mut App, index: &LibraryIndex, collections: Option<&Collections>) {
    let (view, title, tracks) = load_view(app.view(), index, collections);
    app.set_view(view, title, tracks);
}

/// Run a change against the saved lists and report the outcome in the
/// status line. Views are reloaded on success.
fn store_action<F>(app: &mut App, index: &LibraryIndex, state: &mut EventLoopState, action: F)
where
    F: FnOnce(&mut Collections) -> store::Result<String>,
{
    let Some(collections) = state.collections.as_mut() else {
        app.set_status("playlists unavailable");
        return;
    };
    match action(collections) {
        Ok(msg) => {
            info!("{msg}");
            app.set_status(msg);
            reload_view(app, index, state.collections.as_ref());
        }
        Err(e) => {
            warn!(error = %e, "store update failed");
            app.set_status(e.to_string());
        }
    }
}

fn apply_prompt(
    kind: PromptKind,
    text: String,
    app: &mut App,
    index: &LibraryIndex,
    state: &mut EventLoopState,
) {
    let view = app.view();
    match kind {
        PromptKind::AddToPlaylist => {
            let Some(track) = app.selected_track().cloned() else {
                return;
            };
            store_action(app, index, state, |c| {
                let id = match c.playlists.find_by_name(&text) {
                    Some(p) => p.id,
                    None => c.playlists.create(&text)?.id,
                };
                let name = c.playlists.get(id).map(|p| p.name.clone()).unwrap_or(text);
                if c.playlists.contains_track(id, track.id) {
                    return Ok(format!("already in {name}"));
                }
                c.playlists.add_track(id, &track)?;
                Ok(format!(
                    "added to {name} ({} tracks)",
                    c.playlists.track_count(id)
                ))
            });
        }
        PromptKind::NewPlaylist => store_action(app, index, state, |c| {
            let p = c.playlists.create(&text)?;
            Ok(format!("created {}", p.name))
        }),
        PromptKind::RenamePlaylist => {
            let Some(id) = view.playlist_id() else {
                return;
            };
            store_action(app, index, state, |c| {
                c.playlists.rename(id, &text)?;
                Ok(format!("renamed to {}", text.trim()))
            });
        }
    }
}

fn handle_filter_key(key: KeyEvent, app: &mut App, player: &Player) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => app.clear_filter(),
        KeyCode::Backspace => app.pop_filter_char(),
        KeyCode::Char('j') | KeyCode::Char('n') if ctrl => {
            app.follow_playback_off();
            app.next();
        }
        KeyCode::Char('k') | KeyCode::Char('p') if ctrl => {
            app.follow_playback_off();
            app.prev();
        }
        KeyCode::Char(c) if !c.is_control() => app.push_filter_char(c),
        KeyCode::Enter => {
            if app.display_indices().is_empty() {
                return;
            }
            app.exit_filter_mode();
            play_selection(app, player);
        }
        _ => {}
    }
}

fn handle_prompt_key(
    key: KeyEvent,
    app: &mut App,
    index: &LibraryIndex,
    state: &mut EventLoopState,
) {
    match key.code {
        KeyCode::Esc => app.cancel_prompt(),
        KeyCode::Backspace => app.pop_prompt_char(),
        KeyCode::Char(c) if !c.is_control() => app.push_prompt_char(c),
        KeyCode::Enter => {
            if let Some((kind, text)) = app.take_prompt() {
                apply_prompt(kind, text, app, index, state);
            }
        }
        _ => {}
    }
}

/// Returns true when the user asked to quit.
fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    player: &Player,
    index: &LibraryIndex,
    state: &mut EventLoopState,
) -> bool {
    match app.input {
        InputMode::Filter => {
            state.pending_gg = false;
            handle_filter_key(key, app, player);
            return false;
        }
        InputMode::Prompt(_) => {
            handle_prompt_key(key, app, index, state);
            return false;
        }
        InputMode::Normal => {}
    }

    let was_gg = std::mem::take(&mut state.pending_gg);
    let scrub_ms = i64::try_from(settings.controls.scrub_seconds.saturating_mul(1000))
        .unwrap_or(i64::MAX);

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('/') => app.enter_filter_mode(),
        KeyCode::Esc => {
            app.clear_filter();
            app.clear_status();
        }
        KeyCode::Tab => {
            let ids = state
                .collections
                .as_ref()
                .map(Collections::playlist_ids)
                .unwrap_or_default();
            let (view, title, tracks) =
                load_view(app.view().next(&ids), index, state.collections.as_ref());
            app.set_view(view, title, tracks);
        }
        KeyCode::Char('g') => {
            if was_gg {
                app.follow_playback_off();
                app.select_first();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => {
            app.follow_playback_off();
            app.select_last();
        }
        KeyCode::Char('j') => {
            app.follow_playback_off();
            app.next();
        }
        KeyCode::Char('k') => {
            app.follow_playback_off();
            app.prev();
        }
        KeyCode::Enter => play_selection(app, player),
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            app.follow_playback_on();
            send(app, player, PlayerCmd::TogglePause);
        }
        KeyCode::Char('l') => {
            app.follow_playback_on();
            send(app, player, PlayerCmd::Next);
        }
        KeyCode::Char('h') => {
            app.follow_playback_on();
            send(app, player, PlayerCmd::Previous);
        }
        KeyCode::Char('x') => send(app, player, PlayerCmd::Stop),
        KeyCode::Char('0') => send(app, player, PlayerCmd::SeekTo(0)),
        KeyCode::Char('L') => send(app, player, PlayerCmd::SeekBy(scrub_ms)),
        KeyCode::Char('H') => send(app, player, PlayerCmd::SeekBy(-scrub_ms)),
        KeyCode::Char('s') => send(app, player, PlayerCmd::ToggleShuffle),
        KeyCode::Char('r') => send(app, player, PlayerCmd::ToggleRepeat),
        KeyCode::Char('y') => app.lyrics.toggle(),
        KeyCode::Char('f') => {
            if let Some(track) = app.selected_track().cloned() {
                store_action(app, index, state, |c| {
                    Ok(if c.favorites.toggle(&track)? {
                        format!("{} added to favorites", track.title)
                    } else {
                        format!("{} removed from favorites", track.title)
                    })
                });
            }
        }
        KeyCode::Char('C') => {
            if app.view() == View::Favorites {
                store_action(app, index, state, |c| {
                    c.favorites.clear()?;
                    Ok("favorites cleared".to_string())
                });
            }
        }
        KeyCode::Char('a') => {
            if app.has_tracks() {
                app.begin_prompt(PromptKind::AddToPlaylist, "");
            }
        }
        KeyCode::Char('N') => app.begin_prompt(PromptKind::NewPlaylist, ""),
        KeyCode::Char('R') => {
            if let View::Playlist(_) = app.view() {
                let current = app.view_title().to_string();
                app.begin_prompt(PromptKind::RenamePlaylist, &current);
            }
        }
        KeyCode::Char('d') => {
            let target = app.view().playlist_id().zip(app.selected_track().cloned());
            if let Some((id, track)) = target {
                store_action(app, index, state, |c| {
                    c.playlists.remove_track(id, track.id)?;
                    Ok(format!("{} removed", track.title))
                });
            }
        }
        KeyCode::Char('D') => {
            if let Some(id) = app.view().playlist_id() {
                let name = app.view_title().to_string();
                // A deleted playlist view falls back to the library on reload.
                store_action(app, index, state, |c| {
                    c.playlists.delete(id)?;
                    Ok(format!("deleted {name}"))
                });
            }
        }
        _ => {}
    }

    false
}
