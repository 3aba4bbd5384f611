use courtplay_core::{
    share::SHARE_SCHEMA_TAG, store::PLAYS_KEY, BlobShareGateway, Config, Designer,
    DesignerError, FileBackend, KeyValuePlayStore, ManualClock, MemoryBackend, MemoryBlobStore,
    Play, PlayLibrary, PlayStore, Point, ShareConfig, ShareError, ShareGateway,
};

const NOW_MS: u64 = 1_718_300_000_000;

fn legacy_json() -> String {
    courtplay_test_fixtures::plays::json("legacy-collection").expect("legacy-collection fixture")
}

fn legacy_store() -> KeyValuePlayStore<MemoryBackend> {
    KeyValuePlayStore::new(MemoryBackend::with_entry(PLAYS_KEY, legacy_json()))
}

fn record(name: &str) -> serde_json::Value {
    courtplay_test_fixtures::plays::load(name).expect("share record fixture")
}

fn gateway(key: Option<&str>) -> BlobShareGateway<MemoryBlobStore, ManualClock> {
    BlobShareGateway::new(
        MemoryBlobStore::new(),
        ShareConfig {
            api_key: key.map(str::to_string),
        },
        ManualClock::new(NOW_MS),
    )
}

/// it should read collections saved by the web app
#[test]
fn legacy_collection_loads_in_order() {
    let lib = PlayLibrary::open(legacy_store(), ManualClock::new(NOW_MS));
    let listed: Vec<(&str, &str)> = lib
        .iter()
        .map(|p| (p.id.as_str(), p.name.as_str()))
        .collect();
    assert_eq!(
        listed,
        vec![
            ("1718217005120", "Cruce central"),
            ("1718217311904", "Pase al pivote"),
        ]
    );
    let first = lib.require("1718217005120").unwrap();
    assert_eq!(first.duration_ms(), 1200);
    assert_eq!(first.created_at.timestamp_millis(), 1_718_217_005_120);
}

/// it should keep plays deep-equal across a save/load cycle
#[test]
fn save_and_reload_is_lossless() {
    let mut store = legacy_store();
    let original = store.load();
    store.save(&original).unwrap();
    assert_eq!(store.load(), original);

    let raw: serde_json::Value = serde_json::from_str(
        &courtplay_core::KeyValueBackend::get(store.backend(), PLAYS_KEY)
            .unwrap()
            .unwrap(),
    )
    .unwrap();
    assert_eq!(raw[0]["frames"][0]["tokens"][0]["type"], "player");
    assert_eq!(raw[0]["frames"][0]["tokens"][0]["color"], "#3b82f6");
    assert_eq!(raw[0]["frames"][0]["timestamp"], 0);
}

/// it should keep decodable plays when a sibling entry is damaged, and not erase them on save
#[test]
fn undecodable_entry_does_not_cost_the_rest() {
    let mut entries: Vec<serde_json::Value> = serde_json::from_str(&legacy_json()).unwrap();
    entries[1].as_object_mut().unwrap().remove("date");
    let mut broken_color = entries[0].clone();
    broken_color["id"] = "42".into();
    broken_color["frames"][0]["tokens"][0]["color"] = "blue".into();
    entries.push(broken_color);
    let raw = serde_json::to_string(&entries).unwrap();

    let clock = ManualClock::new(NOW_MS);
    let mut lib = PlayLibrary::open(
        KeyValuePlayStore::new(MemoryBackend::with_entry(PLAYS_KEY, raw)),
        clock.clone(),
    );
    let ids: Vec<&str> = lib.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["1718217005120"]);

    let frames = lib.require("1718217005120").unwrap().frames.clone();
    lib.save("Nueva", &frames).unwrap();
    let stored: Vec<String> = lib.store().load().into_iter().map(|p| p.name).collect();
    assert_eq!(stored, vec!["Cruce central".to_string(), "Nueva".to_string()]);
}

/// it should start empty on missing or corrupt storage
#[test]
fn corrupt_storage_is_an_empty_library() {
    let missing = PlayLibrary::open(
        KeyValuePlayStore::new(MemoryBackend::new()),
        ManualClock::new(0),
    );
    assert!(missing.is_empty());

    let corrupt = PlayLibrary::open(
        KeyValuePlayStore::new(MemoryBackend::with_entry(PLAYS_KEY, "{not json")),
        ManualClock::new(0),
    );
    assert!(corrupt.is_empty());
}

/// it should save a recording, then load it back into the designer
#[test]
fn record_save_reload_play() {
    let clock = ManualClock::new(NOW_MS);
    let mut d = Designer::with_clock(Config::default(), clock.clone());
    let mut lib = PlayLibrary::open(legacy_store(), clock.clone());

    d.start_recording();
    clock.advance(250);
    d.move_token("A5", Point::new(400.0, 300.0));
    d.stop();

    let saved = lib.save("  Rosca  ", d.frames()).unwrap();
    assert_eq!(saved.name, "Rosca");
    assert_eq!(lib.len(), 3);
    // Newest ids sort after the legacy ones.
    assert_eq!(lib.iter().last().unwrap().id, saved.id);

    let reopened = PlayLibrary::open(lib.store().clone(), clock.clone());
    let loaded = reopened.require(&saved.id).unwrap().clone();
    assert_eq!(loaded, saved);

    d.reset_positions();
    assert!(d.load_play(&loaded));
    assert_eq!(d.frames(), loaded.frames.as_slice());
    assert_eq!(d.tokens(), loaded.frames[0].tokens.as_slice());
}

/// it should refuse to save without a name or frames
#[test]
fn save_validation() {
    let mut lib = PlayLibrary::open(legacy_store(), ManualClock::new(NOW_MS));
    let frames = lib.require("1718217005120").unwrap().frames.clone();
    assert_eq!(lib.save("", &frames), Err(DesignerError::EmptyName));
    assert_eq!(lib.save("Vacía", &[]), Err(DesignerError::NoFrames));
    assert_eq!(lib.len(), 2);
}

/// it should persist deletions through a file backend
#[test]
fn delete_survives_reopen_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let fixture = courtplay_test_fixtures::plays::path("legacy-collection").unwrap();
    std::fs::copy(fixture, dir.path().join(format!("{PLAYS_KEY}.json"))).unwrap();
    let store = KeyValuePlayStore::new(FileBackend::new(dir.path()));
    assert_eq!(store.load().len(), 2);

    let mut lib = PlayLibrary::open(store, ManualClock::new(NOW_MS));
    assert!(lib.delete("1718217005120").unwrap());

    let reopened = PlayLibrary::open(
        KeyValuePlayStore::new(FileBackend::new(dir.path())),
        ManualClock::new(NOW_MS),
    );
    let ids: Vec<String> = reopened.iter().map(|p| p.id.clone()).collect();
    assert_eq!(ids, vec!["1718217311904".to_string()]);
}

/// it should share a saved play and import it back under a fresh id
#[test]
fn share_round_trip_into_library() {
    let lib_clock = ManualClock::new(NOW_MS);
    let mut lib = PlayLibrary::open(legacy_store(), lib_clock.clone());
    let play: Play = lib.require("1718217311904").unwrap().clone();

    let mut gw = gateway(Some("key"));
    let share_id = gw.upload(&play).unwrap();
    let shared = gw.download(&share_id).unwrap();
    assert_eq!(shared.kind, SHARE_SCHEMA_TAG);
    assert_eq!(shared.name, play.name);
    assert_eq!(shared.frames, play.frames);
    assert_eq!(shared.shared_at.timestamp_millis(), NOW_MS as i64);

    lib_clock.advance(1);
    let imported = lib.import(shared.into_play(String::new())).unwrap();
    assert_ne!(imported.id, play.id);
    assert_eq!(imported.frames, play.frames);
    assert_eq!(lib.len(), 3);
}

/// it should decode records written by the web app and reject foreign ones
#[test]
fn fetched_records_are_checked() {
    let mut gw = gateway(Some("key"));
    gw.store_mut().insert_raw("ok", record("shared-record"));
    gw.store_mut().insert_raw("foreign", record("foreign-record"));

    let shared = gw.download("ok").unwrap();
    assert_eq!(shared.name, "Contraataque");
    assert_eq!(shared.frames.len(), 3);
    assert_eq!(
        shared.shared_at.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        "2024-06-13T09:05:42.318Z"
    );

    assert!(matches!(
        gw.download("foreign"),
        Err(ShareError::InvalidPayload { .. })
    ));
    assert_eq!(
        gw.download("gone"),
        Err(ShareError::NotFound { id: "gone".into() })
    );
}

/// it should refuse uploads when no key is configured
#[test]
fn upload_without_key_fails() {
    let play: Play = legacy_store().load().remove(0);
    let mut gw = gateway(None);
    assert_eq!(gw.upload(&play), Err(ShareError::MissingConfiguration));
    assert!(gw.store().is_empty());
}

/// it should carry the share id in a page link and strip it afterwards
#[test]
fn share_links() {
    let link = courtplay_core::share_url("https://coach.example.org/plays/index.html?v=3", "abc123")
        .unwrap();
    assert_eq!(link, "https://coach.example.org/plays/index.html?play=abc123");
    assert_eq!(courtplay_core::shared_play_id(&link).as_deref(), Some("abc123"));
    assert_eq!(
        courtplay_core::clear_shared_play_param(&link).unwrap(),
        "https://coach.example.org/plays/index.html"
    );
}
