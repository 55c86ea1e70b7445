use super::error::StoreError;
use super::playlists::Playlist;
use super::prefs::PrefStore;
use super::*;
use crate::library::{Track, track_id_for};
use proptest::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

fn track(name: &str) -> Track {
    let path = PathBuf::from(format!("/music/{name}.mp3"));
    Track {
        id: track_id_for(&path),
        title: name.to_string(),
        artist: Some("Artist".into()),
        album: None,
        duration_ms: 123_000,
        path,
        artwork: None,
        display: format!("Artist - {name}"),
    }
}

// ---- preference files ----

#[test]
fn prefs_persist_strings_across_reopen() {
    let dir = tempdir().unwrap();
    let mut prefs = PrefStore::open(dir.path(), "settings").unwrap();
    assert_eq!(prefs.get_string("k"), None);

    prefs.put_string("k", "v1").unwrap();
    prefs.put_string("k", "v2").unwrap();
    assert_eq!(prefs.get_string("k"), Some("v2"));
    assert!(dir.path().join("settings.json").exists());
    assert!(!dir.path().join("settings.json.tmp").exists());

    let reopened = PrefStore::open(dir.path(), "settings").unwrap();
    assert_eq!(reopened.get_string("k"), Some("v2"));
}

#[test]
fn prefs_remove_key() {
    let dir = tempdir().unwrap();
    let mut prefs = PrefStore::open(dir.path(), "p").unwrap();
    prefs.put_string("a", "1").unwrap();
    prefs.remove("a").unwrap();
    prefs.remove("never-there").unwrap();
    assert_eq!(PrefStore::open(dir.path(), "p").unwrap().get_string("a"), None);
}

#[test]
fn malformed_value_is_copied_aside_and_reads_as_absent() {
    let dir = tempdir().unwrap();
    let mut prefs = PrefStore::open(dir.path(), "playlists").unwrap();
    prefs.put_string("playlists", "[{\"id\": oops").unwrap();

    let value: Option<Vec<Playlist>> = prefs.get_json("playlists");
    assert!(value.is_none());
    assert_eq!(prefs.get_string("playlists.corrupt"), Some("[{\"id\": oops"));
}

#[test]
fn unparsable_file_is_set_aside() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("favorites.json"), "not json at all").unwrap();

    let favorites = Favorites::open(dir.path()).unwrap();
    assert!(favorites.list().is_empty());
    assert_eq!(
        fs::read_to_string(dir.path().join("favorites.json.corrupt")).unwrap(),
        "not json at all"
    );
}

#[test]
fn unreadable_file_starts_empty() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("settings.json")).unwrap();

    let mut prefs = PrefStore::open(dir.path(), "settings").unwrap();
    assert_eq!(prefs.get_string("k"), None);
    assert!(prefs.put_string("k", "v").is_err());
    assert_eq!(prefs.get_string("k"), None);
}

#[test]
fn failed_write_leaves_values_untouched() {
    let dir = tempdir().unwrap();
    let mut prefs = PrefStore::open(dir.path(), "p").unwrap();
    prefs.put_string("a", "1").unwrap();
    fs::create_dir(dir.path().join("p.json.tmp")).unwrap();

    assert!(matches!(prefs.put_string("a", "2"), Err(StoreError::Io { .. })));
    assert!(prefs.remove("a").is_err());
    assert_eq!(prefs.get_string("a"), Some("1"));
}

// ---- playlists ----

#[test]
fn create_validates_names() {
    let dir = tempdir().unwrap();
    let mut playlists = Playlists::open(dir.path()).unwrap();

    let road = playlists.create("  Road Trip ").unwrap();
    assert_eq!(road.name, "Road Trip");
    assert!(matches!(playlists.create("   "), Err(StoreError::InvalidName(_))));
    assert!(matches!(
        playlists.create("road trip"),
        Err(StoreError::DuplicateName(_))
    ));
    assert!(!playlists.is_name_available("ROAD TRIP", None));
    assert!(playlists.is_name_available("ROAD TRIP", Some(road.id)));
    assert_eq!(playlists.find_by_name("road trip").map(|p| p.id), Some(road.id));
}

#[test]
fn ids_are_strictly_increasing() {
    let dir = tempdir().unwrap();
    let mut playlists = Playlists::open(dir.path()).unwrap();
    let ids: Vec<u64> = (0..5)
        .map(|i| playlists.create(&format!("p{i}")).unwrap().id)
        .collect();
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn rename_and_delete() {
    let dir = tempdir().unwrap();
    let mut playlists = Playlists::open(dir.path()).unwrap();
    let a = playlists.create("A").unwrap();
    let b = playlists.create("B").unwrap();

    playlists.rename(a.id, "a").unwrap(); // case change of itself is fine
    assert!(matches!(
        playlists.rename(a.id, "b"),
        Err(StoreError::DuplicateName(_))
    ));
    assert!(matches!(
        playlists.rename(42, "new"),
        Err(StoreError::NotFound(42))
    ));

    playlists.delete(b.id).unwrap();
    assert!(matches!(playlists.delete(b.id), Err(StoreError::NotFound(_))));

    let reopened = Playlists::open(dir.path()).unwrap();
    assert_eq!(reopened.all().len(), 1);
    assert_eq!(reopened.get(a.id).map(|p| p.name.as_str()), Some("a"));
}

#[test]
fn tracks_are_unique_per_playlist() {
    let dir = tempdir().unwrap();
    let mut playlists = Playlists::open(dir.path()).unwrap();
    let p = playlists.create("Mix").unwrap();
    let (one, two, three) = (track("one"), track("two"), track("three"));

    assert!(playlists.add_track(p.id, &one).unwrap());
    assert!(!playlists.add_track(p.id, &one).unwrap());
    assert!(playlists.add_track(p.id, &two).unwrap());
    assert!(playlists.add_track(p.id, &three).unwrap());
    assert_eq!(playlists.track_count(p.id), 3);
    assert!(playlists.contains_track(p.id, two.id));
    assert!(matches!(
        playlists.add_track(7, &one),
        Err(StoreError::NotFound(7))
    ));

    assert!(playlists.remove_track(p.id, two.id).unwrap());
    assert!(!playlists.remove_track(p.id, two.id).unwrap());
    assert_eq!(playlists.remove_tracks(p.id, &[one.id, three.id, 99]).unwrap(), 2);
    assert_eq!(playlists.track_count(p.id), 0);
    assert_eq!(playlists.track_count(12345), 0);
}

#[test]
fn refresh_picks_up_external_changes() {
    let dir = tempdir().unwrap();
    let mut first = Playlists::open(dir.path()).unwrap();
    let mut second = Playlists::open(dir.path()).unwrap();

    first.create("Shared").unwrap();
    assert!(second.all().is_empty());
    second.refresh();
    assert_eq!(second.all().len(), 1);
}

#[test]
fn corrupt_playlists_start_empty_but_are_kept() {
    let dir = tempdir().unwrap();
    {
        let mut prefs = PrefStore::open(dir.path(), "playlists").unwrap();
        prefs.put_string("playlists", "{broken").unwrap();
    }

    let mut playlists = Playlists::open(dir.path()).unwrap();
    assert!(playlists.all().is_empty());
    playlists.create("Fresh").unwrap();

    let prefs = PrefStore::open(dir.path(), "playlists").unwrap();
    assert_eq!(prefs.get_string("playlists.corrupt"), Some("{broken"));
}

#[test]
fn failed_save_keeps_playlists_unchanged() {
    let dir = tempdir().unwrap();
    let mut playlists = Playlists::open(dir.path()).unwrap();
    let road = playlists.create("Road").unwrap();
    playlists.add_track(road.id, &track("one")).unwrap();
    let before = playlists.all().to_vec();

    let blocker = dir.path().join("playlists.json.tmp");
    fs::create_dir(&blocker).unwrap();

    assert!(matches!(playlists.create("Mix"), Err(StoreError::Io { .. })));
    assert!(playlists.is_name_available("Mix", None));
    assert!(playlists.rename(road.id, "Drive").is_err());
    assert!(playlists.add_track(road.id, &track("two")).is_err());
    assert!(playlists.remove_track(road.id, track("one").id).is_err());
    assert!(playlists.delete(road.id).is_err());
    assert_eq!(playlists.all(), before.as_slice());

    fs::remove_dir(&blocker).unwrap();
    playlists.create("Mix").unwrap();
    assert_eq!(Playlists::open(dir.path()).unwrap().all().len(), 2);
}

// ---- favorites ----

#[test]
fn favorites_add_to_front_and_toggle() {
    let dir = tempdir().unwrap();
    let mut favorites = Favorites::open(dir.path()).unwrap();
    let (a, b) = (track("a"), track("b"));

    assert!(favorites.add(&a).unwrap());
    assert!(!favorites.add(&a).unwrap());
    assert!(favorites.add(&b).unwrap());
    assert_eq!(favorites.list(), &[b.clone(), a.clone()]);
    assert_eq!(favorites.list().len(), 2);

    assert!(!favorites.toggle(&b).unwrap());
    assert!(!favorites.is_favorite(b.id));
    assert!(favorites.toggle(&b).unwrap());
    assert!(favorites.is_favorite(b.id));

    assert!(favorites.remove(a.id).unwrap());
    assert!(!favorites.remove(a.id).unwrap());

    let reopened = Favorites::open(dir.path()).unwrap();
    assert_eq!(reopened.list(), &[b.clone()]);
    assert_eq!(reopened.list()[0].display, "Artist - b");
}

#[test]
fn favorites_clear_persists() {
    let dir = tempdir().unwrap();
    let mut favorites = Favorites::open(dir.path()).unwrap();
    favorites.add(&track("x")).unwrap();
    favorites.clear().unwrap();
    assert!(favorites.list().is_empty());

    let mut reopened = Favorites::open(dir.path()).unwrap();
    assert!(reopened.list().is_empty());
    reopened.refresh();
    assert!(reopened.list().is_empty());
}

#[test]
fn failed_save_keeps_favorites_unchanged() {
    let dir = tempdir().unwrap();
    let mut favorites = Favorites::open(dir.path()).unwrap();
    let (a, b) = (track("a"), track("b"));
    favorites.add(&a).unwrap();

    fs::create_dir(dir.path().join("favorites.json.tmp")).unwrap();
    assert!(favorites.add(&b).is_err());
    assert!(favorites.toggle(&a).is_err());
    assert!(favorites.clear().is_err());
    assert_eq!(favorites.list(), &[a.clone()]);
}

#[test]
fn unreadable_favorites_read_as_empty() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("favorites.json")).unwrap();

    let favorites = Favorites::open(dir.path()).unwrap();
    assert!(favorites.list().is_empty());
    assert!(!favorites.is_favorite(track("a").id));
}

// ---- properties ----

fn arbitrary_track() -> impl Strategy<Value = Track> {
    (
        "[a-z0-9]{1,12}",
        "[A-Za-z ]{1,20}",
        proptest::option::of("[A-Za-z ]{1,20}"),
        proptest::option::of("[A-Za-z ]{1,20}"),
        0u64..3_600_000,
        any::<bool>(),
    )
        .prop_map(|(file, title, artist, album, duration_ms, art)| {
            let path = PathBuf::from(format!("/music/{file}.flac"));
            Track {
                id: track_id_for(&path),
                artwork: art.then(|| path.display().to_string()),
                title,
                artist,
                album,
                duration_ms,
                display: file,
                path,
            }
        })
}

fn arbitrary_playlist() -> impl Strategy<Value = Playlist> {
    (
        any::<u64>(),
        "\\PC{1,16}",
        prop::collection::vec(arbitrary_track(), 0..8),
    )
        .prop_map(|(id, name, tracks)| Playlist { id, name, tracks })
}

proptest! {
    /// Playlists survive a trip through the preference store unchanged.
    #[test]
    fn playlists_round_trip_through_store(
        playlists in prop::collection::vec(arbitrary_playlist(), 0..5)
    ) {
        let dir = tempdir().unwrap();
        let mut prefs = PrefStore::open(dir.path(), "playlists").unwrap();
        prefs.put_json("playlists", &playlists).unwrap();

        let mut reopened = PrefStore::open(dir.path(), "playlists").unwrap();
        let back: Vec<Playlist> = reopened.get_json("playlists").unwrap();
        prop_assert_eq!(back.len(), playlists.len());
        for (a, b) in back.iter().zip(&playlists) {
            prop_assert_eq!(a.id, b.id);
            prop_assert_eq!(&a.name, &b.name);
            prop_assert_eq!(a.tracks.len(), b.tracks.len());
            for (x, y) in a.tracks.iter().zip(&b.tracks) {
                prop_assert_eq!(x.id, y.id);
                prop_assert_eq!(&x.title, &y.title);
                prop_assert_eq!(&x.artist, &y.artist);
                prop_assert_eq!(&x.album, &y.album);
                prop_assert_eq!(x.duration_ms, y.duration_ms);
                prop_assert_eq!(&x.path, &y.path);
                prop_assert_eq!(&x.artwork, &y.artwork);
            }
        }
    }
}
