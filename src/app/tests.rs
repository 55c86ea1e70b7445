use super::*;
use crate::library::{Track, track_id_for};
use crate::lyrics::{CaptionLine, LyricsUpdate, sample_sequence};
use std::path::PathBuf;

fn t(title: &str) -> Track {
    let path = PathBuf::from(format!("/music/{title}.mp3"));
    Track {
        id: track_id_for(&path),
        title: title.into(),
        artist: None,
        album: None,
        duration_ms: 0,
        path,
        artwork: None,
        display: title.into(),
    }
}

#[test]
fn fuzzy_match_simple() {
    let app = App::new(vec![t("Hello World")]);
    assert!(app.fuzzy_match_positions_for_track(0, "hw").is_some());
    assert!(app.fuzzy_match_positions_for_track(0, "ello").is_some());
    assert!(app.fuzzy_match_positions_for_track(0, "xyz").is_none());
    assert_eq!(app.fuzzy_match_positions_for_track(0, "HW"), Some(vec![0, 6]));
    assert!(app.fuzzy_match_positions_for_track(1, "h").is_none());
}

#[test]
fn display_indices_respects_filter_query() {
    let mut app = App::new(vec![t("Alpha"), t("Beta"), t("Gamma")]);
    app.push_filter_char('e');
    assert_eq!(app.display_indices(), vec![1]);
    assert_eq!(app.selected, 1);
}

#[test]
fn display_indices_uses_fuzzy_not_substring_only() {
    let mut app = App::new(vec![t("Metallica - Blackened"), t("Black Sabbath - Paranoid")]);
    app.filter_query = "mtbk".into();
    assert_eq!(app.display_indices(), vec![0]);
}

#[test]
fn trimming_filter_query_affects_matching() {
    let mut app = App::new(vec![t("Black Sabbath - Paranoid")]);
    app.filter_query = "Black ".into();
    assert_eq!(app.display_indices(), vec![0]);

    app.filter_query = "   ".into();
    assert_eq!(app.display_indices(), vec![0]);
}

#[test]
fn next_prev_in_view_helpers_work() {
    let mut app = App::new(vec![t("Alpha"), t("Beta"), t("Gamma")]);
    app.filter_query = "et".into(); // only Beta is visible

    assert_eq!(app.next_in_view_from(0), Some(1));
    assert_eq!(app.prev_in_view_from(0), Some(1));
    assert_eq!(app.next_in_view_from(1), Some(1));
    assert_eq!(app.prev_in_view_from(1), Some(1));

    app.filter_query = "zzz".into();
    assert_eq!(app.next_in_view_from(0), None);
    assert_eq!(app.prev_in_view_from(0), None);
}

#[test]
fn next_and_prev_wrap_around() {
    let mut app = App::new(vec![t("A"), t("B"), t("C")]);
    app.prev();
    assert_eq!(app.selected, 2);
    app.next();
    assert_eq!(app.selected, 0);
    app.select_last();
    assert_eq!(app.selected, 2);
    app.select_first();
    assert_eq!(app.selected, 0);
}

#[test]
fn queue_from_selection_uses_visible_order() {
    let mut app = App::new(vec![t("Alpha"), t("Beta"), t("Gamma"), t("Delta")]);
    app.filter_query = "a".into();
    app.selected = 3;

    let (tracks, start) = app.queue_from_selection().unwrap();
    let names: Vec<&str> = tracks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(names, ["Alpha", "Beta", "Gamma", "Delta"]);
    assert_eq!(start, 3);

    app.filter_query = "ph".into();
    app.selected = 0;
    let (tracks, start) = app.queue_from_selection().unwrap();
    assert_eq!(tracks.len(), 1);
    assert_eq!(start, 0);

    app.filter_query = "zzz".into();
    assert!(app.queue_from_selection().is_none());
}

#[test]
fn set_view_keeps_selection_on_reload_and_resets_on_switch() {
    let (a, b, c) = (t("A"), t("B"), t("C"));
    let mut app = App::new(vec![a.clone(), b.clone(), c.clone()]);
    app.selected = 1;

    app.set_view(View::Library, "library", vec![c.clone(), b.clone()]);
    assert_eq!(app.selected_track().map(|t| t.id), Some(b.id));

    app.filter_query = "b".into();
    app.set_view(View::Favorites, "favorites", vec![a.clone(), c.clone()]);
    assert_eq!(app.view(), View::Favorites);
    assert_eq!(app.view_title(), "favorites");
    assert_eq!(app.selected, 0);
    assert!(app.filter_query.is_empty());

    app.set_view(View::Playlist(7), "empty", Vec::new());
    assert!(!app.has_tracks());
    assert!(app.selected_track().is_none());
}

#[test]
fn view_cycle_visits_favorites_and_each_playlist() {
    let ids = [10, 20];
    let mut view = View::Library;
    let mut seen = Vec::new();
    for _ in 0..5 {
        view = view.next(&ids);
        seen.push(view);
    }
    assert_eq!(
        seen,
        [
            View::Favorites,
            View::Playlist(10),
            View::Playlist(20),
            View::Library,
            View::Favorites,
        ]
    );

    assert_eq!(View::Favorites.next(&[]), View::Library);
    assert_eq!(View::Playlist(99).next(&ids), View::Library);
    assert_eq!(View::Playlist(20).playlist_id(), Some(20));
    assert_eq!(View::Library.playlist_id(), None);
}

#[test]
fn follow_moves_cursor_to_playing_track() {
    let (a, b) = (t("A"), t("B"));
    let mut app = App::new(vec![a.clone(), b.clone()]);

    app.follow(Some(&b));
    assert_eq!(app.selected, 1);

    app.follow_playback_off();
    app.follow(Some(&a));
    assert_eq!(app.selected, 1);
}

#[test]
fn pending_follow_ignores_other_tracks() {
    let (a, b, c) = (t("A"), t("B"), t("C"));
    let mut app = App::new(vec![a.clone(), b.clone(), c.clone()]);
    app.selected = 2;
    app.set_pending_follow(c.id);

    app.follow(Some(&a)); // stale notification for the old track
    assert_eq!(app.selected, 2);

    app.follow(Some(&c));
    app.follow(Some(&b));
    assert_eq!(app.selected, 1);
}

#[test]
fn filter_mode_suspends_following() {
    let (a, b) = (t("A"), t("B"));
    let mut app = App::new(vec![a.clone(), b.clone()]);
    app.enter_filter_mode();
    assert!(!app.follow_playback);
    app.follow_playback_on();
    app.follow(Some(&b));
    assert_eq!(app.selected, 0);

    app.push_filter_char('b');
    app.exit_filter_mode();
    assert_eq!(app.input, InputMode::Normal);
    assert_eq!(app.filter_query, "b");
    app.clear_filter();
    assert!(app.filter_query.is_empty());
}

#[test]
fn prompt_collects_text() {
    let mut app = App::new(vec![t("A")]);
    assert!(app.take_prompt().is_none());

    app.begin_prompt(PromptKind::RenamePlaylist, "Mix");
    assert_eq!(app.input, InputMode::Prompt(PromptKind::RenamePlaylist));
    app.push_prompt_char('!');
    app.pop_prompt_char();
    app.push_prompt_char('2');
    assert_eq!(
        app.take_prompt(),
        Some((PromptKind::RenamePlaylist, "Mix2".to_string()))
    );
    assert_eq!(app.input, InputMode::Normal);

    app.begin_prompt(PromptKind::NewPlaylist, "");
    app.push_prompt_char('x');
    app.cancel_prompt();
    assert!(app.prompt.is_empty());
    assert!(app.take_prompt().is_none());
}

#[test]
fn status_message_round_trip() {
    let mut app = App::new(Vec::new());
    assert_eq!(app.status(), None);
    app.set_status("saved");
    assert_eq!(app.status(), Some("saved"));
    app.clear_status();
    assert_eq!(app.status(), None);
}

#[test]
fn lyrics_pane_drops_updates_for_other_tracks() {
    let mut pane = LyricsPane::new(true, true);
    pane.await_track(Some(2));
    assert!(pane.is_loading());

    let stale = LyricsUpdate {
        track_id: 1,
        lines: vec![CaptionLine::new(0, "old")],
    };
    assert!(!pane.accept(stale));
    assert!(pane.lines().is_empty());

    let fresh = LyricsUpdate {
        track_id: 2,
        lines: vec![CaptionLine::new(0, "new")],
    };
    assert!(pane.accept(fresh));
    assert!(!pane.is_loading());
    assert!(!pane.is_hint());
    assert_eq!(pane.lines()[0].text, "new");

    pane.await_track(None);
    assert!(pane.lines().is_empty());
    assert!(!pane.is_loading());
    assert!(!pane.accept(LyricsUpdate {
        track_id: 2,
        lines: Vec::new(),
    }));
}

#[test]
fn lyrics_pane_shows_hint_when_nothing_found() {
    let mut pane = LyricsPane::new(true, true);
    pane.await_track(Some(5));
    pane.accept(LyricsUpdate {
        track_id: 5,
        lines: Vec::new(),
    });
    assert!(pane.is_hint());
    assert_eq!(pane.lines(), sample_sequence().as_slice());

    let mut quiet = LyricsPane::new(true, false);
    quiet.await_track(Some(5));
    quiet.accept(LyricsUpdate {
        track_id: 5,
        lines: Vec::new(),
    });
    assert!(!quiet.is_hint());
    assert!(quiet.lines().is_empty());

    quiet.toggle();
    assert!(!quiet.visible);
}
