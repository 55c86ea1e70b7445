use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::{App, LyricsPane};
use crate::library::{LibraryIndex, MediaIndex};
use crate::logging;
use crate::playback::{Player, PlayerOptions, RodioDecoder};

mod event_loop;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, settings_warning) = settings::load_settings();

    let log_file = settings.log_file();
    if logging::init(&log_file, &settings.log.level) {
        info!(path = %log_file.display(), "canto starting");
    }
    if let Some(msg) = settings_warning {
        warn!("{msg}");
    }

    let dir = env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("Music"));

    let index = Arc::new(LibraryIndex::build(
        &dir,
        &settings.library,
        &settings.lyrics.extensions,
    ));
    let (worker, lyrics_rx) = startup::lyrics_worker(&settings.lyrics, index.clone());
    let collections = startup::open_collections(&settings.data_dir());
    let player = Player::spawn(
        RodioDecoder::open_default,
        PlayerOptions::from_settings(&settings.playback),
    )?;

    let mut app = App::new(index.tracks().to_vec());
    app.follow_playback = settings.ui.follow_playback;
    app.lyrics = LyricsPane::new(settings.ui.show_lyrics, settings.lyrics.show_hint);
    app.current_dir = Some(index.root().display().to_string());
    if collections.is_none() {
        app.set_status("playlists unavailable, see log");
    }

    let mut state = event_loop::EventLoopState::new(
        worker,
        lyrics_rx,
        player.session().current_track.subscribe(),
        collections,
    );

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(
        &mut terminal,
        &settings,
        &mut app,
        &player,
        &index,
        &mut state,
    );

    player.quit();
    info!("canto stopped");

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}
