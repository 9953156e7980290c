use jots_core::db::open_db_in_memory;
use jots_core::{
    Geometry, IdAssignment, JotRepository, MemorySlotStorage, NoteStore, PersistOnChange,
    Reminder, RepoError, SlotStorage, SqliteSlotStorage, StoreError, DEFAULT_STORAGE_KEY,
};
use std::rc::Rc;

fn populated_store() -> NoteStore {
    let mut store = NoteStore::new().with_color_seed(3);
    for _ in 0..4 {
        store.create_note().unwrap();
    }
    store.set_header("1", "Errands").unwrap();
    store.set_content("2", "# Title\nbody").unwrap();
    store.set_hidden("3", true).unwrap();
    store
        .set_geometry(
            "0",
            Geometry {
                top: 120.0,
                left: 64.5,
                height: 180.0,
                width: 220.0,
            },
        )
        .unwrap();
    store
        .set_reminder(
            "2",
            Reminder {
                time: Some(1_700_000_000_000),
                display: Some("call back".to_string()),
            },
        )
        .unwrap();
    store.bring_to_front("1").unwrap();
    store
}

#[test]
fn missing_and_empty_slots_load_as_empty_collection() {
    let missing = JotRepository::new(MemorySlotStorage::new());
    let loaded = missing.load().unwrap();
    assert!(loaded.notes.is_empty());
    assert_eq!(loaded.next_id, 0);

    let empty = JotRepository::new(MemorySlotStorage::with_item(DEFAULT_STORAGE_KEY, ""));
    assert!(empty.load().unwrap().notes.is_empty());
}

#[test]
fn malformed_slot_is_a_hard_error() {
    for raw in ["{not json", "   ", r#"{"id":"0"}"#, r#"[{"header":"only"}]"#] {
        let repo = JotRepository::new(MemorySlotStorage::with_item(DEFAULT_STORAGE_KEY, raw));
        let err = repo.load().unwrap_err();
        assert!(
            matches!(err, RepoError::Malformed(_)),
            "`{raw}` gave unexpected error: {err}"
        );
    }
}

#[test]
fn save_then_load_round_trips_durable_fields() {
    let store = populated_store();
    let repo = JotRepository::new(MemorySlotStorage::new());

    repo.save(store.notes()).unwrap();
    let loaded = repo.load().unwrap();

    assert_eq!(loaded.notes.len(), store.len());
    for (saved, restored) in store.notes().iter().zip(&loaded.notes) {
        assert_eq!(restored.header, saved.header);
        assert_eq!(restored.raw_content, saved.raw_content);
        assert_eq!(restored.geometry, saved.geometry);
        assert_eq!(restored.hidden, saved.hidden);
        assert_eq!(restored.color, saved.color);
        assert_eq!(restored.z_index, saved.z_index);
        assert_eq!(restored.reminder, Reminder::default());
    }
}

#[test]
fn positional_load_reassigns_ids_by_array_index() {
    let mut store = populated_store();
    store.remove_note("0").unwrap();
    store.remove_note("2").unwrap();
    let repo = JotRepository::new(MemorySlotStorage::new());
    repo.save(store.notes()).unwrap();

    let loaded = repo.load().unwrap();

    let ids = loaded
        .notes
        .iter()
        .map(|note| note.id.as_str())
        .collect::<Vec<_>>();
    assert_eq!(ids, vec!["0", "1"]);
    assert_eq!(loaded.notes[0].header, "Errands");
    assert_eq!(loaded.next_id, 2);
}

#[test]
fn preserve_load_keeps_stored_ids_and_skips_past_them() {
    let mut store = populated_store();
    store.remove_note("0").unwrap();
    let repo = JotRepository::with_options(
        MemorySlotStorage::new(),
        DEFAULT_STORAGE_KEY,
        IdAssignment::Preserve,
    );
    repo.save(store.notes()).unwrap();

    let loaded = repo.load().unwrap();
    let ids = loaded
        .notes
        .iter()
        .map(|note| note.id.as_str())
        .collect::<Vec<_>>();
    assert_eq!(ids, vec!["1", "2", "3"]);
    assert_eq!(loaded.next_id, 4);

    let mut reopened = NoteStore::from_loaded(loaded);
    reopened.create_note().unwrap();
    assert!(reopened.exists("4"));
}

#[test]
fn preserve_load_rejects_duplicate_ids() {
    let raw = serde_json::json!([
        {"id": "7", "header": "a", "rawContent": "", "geometry": {"top": 0, "left": 0, "height": 1, "width": 1}, "zIndex": 0, "hidden": false, "color": "#F1F1F1"},
        {"id": 7, "header": "b", "rawContent": "", "geometry": {"top": 0, "left": 0, "height": 1, "width": 1}, "zIndex": 1, "hidden": false, "color": "#F1F1F1"}
    ])
    .to_string();
    let repo = JotRepository::with_options(
        MemorySlotStorage::with_item(DEFAULT_STORAGE_KEY, raw),
        DEFAULT_STORAGE_KEY,
        IdAssignment::Preserve,
    );

    let err = repo.load().unwrap_err();
    assert!(matches!(err, RepoError::DuplicateId(id) if id == "7"));
}

#[test]
fn preserve_load_rejects_id_with_no_successor() {
    let raw = serde_json::json!([
        {"id": u64::MAX.to_string(), "header": "a", "rawContent": "", "geometry": {"top": 0, "left": 0, "height": 1, "width": 1}, "zIndex": 0, "hidden": false, "color": "#F1F1F1"}
    ])
    .to_string();
    let repo = JotRepository::with_options(
        MemorySlotStorage::with_item(DEFAULT_STORAGE_KEY, raw),
        DEFAULT_STORAGE_KEY,
        IdAssignment::Preserve,
    );

    let err = repo.load().unwrap_err();
    assert!(matches!(err, RepoError::IdSpaceExhausted(id) if id == u64::MAX.to_string()));
}

#[test]
fn create_at_end_of_id_range_fails_without_duplicating() {
    let raw = serde_json::json!([
        {"id": (u64::MAX - 1).to_string(), "header": "a", "rawContent": "", "geometry": {"top": 0, "left": 0, "height": 1, "width": 1}, "zIndex": 0, "hidden": false, "color": "#F1F1F1"}
    ])
    .to_string();
    let storage = Rc::new(MemorySlotStorage::with_item(DEFAULT_STORAGE_KEY, raw.clone()));
    let repo = JotRepository::with_options(
        Rc::clone(&storage),
        DEFAULT_STORAGE_KEY,
        IdAssignment::Preserve,
    );

    let loaded = repo.load().unwrap();
    assert_eq!(loaded.next_id, u64::MAX);

    let mut store = NoteStore::from_loaded(loaded);
    store.subscribe(PersistOnChange::new(repo));
    let err = store.create_note().unwrap_err();

    assert!(matches!(
        err,
        StoreError::IdSpaceExhausted {
            id_tracker: u64::MAX
        }
    ));
    assert_eq!(store.len(), 1);
    assert_eq!(store.id_tracker(), u64::MAX);
    assert_eq!(
        storage.get_item(DEFAULT_STORAGE_KEY).unwrap().as_deref(),
        Some(raw.as_str())
    );
}

#[test]
fn load_accepts_legacy_reminder_shapes_and_resets_them() {
    let raw = serde_json::json!([
        {
            "id": "legacy",
            "header": "old",
            "rawContent": "text",
            "geometry": {"top": 20, "left": 20, "height": 250, "width": 300},
            "zIndex": 0,
            "hidden": false,
            "color": "#EEFEFF",
            "reminder": {"time": "2020-01-01T10:00", "reminder": {"handle": 12}}
        }
    ])
    .to_string();
    let repo = JotRepository::new(MemorySlotStorage::with_item(DEFAULT_STORAGE_KEY, raw));

    let loaded = repo.load().unwrap();

    assert_eq!(loaded.notes[0].id, "0");
    assert_eq!(loaded.notes[0].reminder, Reminder::default());
    assert_eq!(loaded.notes[0].color, "#EEFEFF");
}

#[test]
fn saved_slot_uses_persisted_wire_layout() {
    let store = populated_store();
    let storage = Rc::new(MemorySlotStorage::new());
    JotRepository::new(Rc::clone(&storage))
        .save(store.notes())
        .unwrap();

    let raw = storage.get_item(DEFAULT_STORAGE_KEY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let first = &value[0];
    for field in [
        "id",
        "header",
        "rawContent",
        "geometry",
        "zIndex",
        "hidden",
        "color",
        "reminder",
    ] {
        assert!(first.get(field).is_some(), "missing field {field}");
    }
    assert_eq!(value[2]["reminder"]["display"], "call back");
}

#[test]
fn failed_storage_write_propagates_from_commit() {
    let storage = Rc::new(SqliteSlotStorage::new(open_db_in_memory().unwrap()));
    let mut store = NoteStore::new();
    store.subscribe(PersistOnChange::new(JotRepository::new(Rc::clone(&storage))));
    store.create_note().unwrap();

    storage
        .connection()
        .execute_batch("DROP TABLE storage_slots;")
        .unwrap();
    let err = store.create_note().unwrap_err();

    match err {
        StoreError::Listener { mutation, source } => {
            assert_eq!(mutation, "createJot");
            assert!(matches!(source, RepoError::Storage(_)));
        }
        other => panic!("expected listener failure, got {other}"),
    }
    assert_eq!(store.len(), 2);
}
