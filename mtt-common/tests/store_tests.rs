//! Integration tests for the document store
//!
//! Covers default-document initialization on first load, save/load
//! round-trip identity, raw passthrough, and backup semantics.

use mtt_common::model::{MouseId, SessionCount};
use mtt_common::store::{default_document, DocumentStore};
use tempfile::TempDir;

fn temp_store() -> (TempDir, DocumentStore) {
    let dir = TempDir::new().expect("create temp dir");
    let store = DocumentStore::new(dir.path().join("mouseTrainingData.json"));
    (dir, store)
}

#[test]
fn first_load_materializes_and_persists_the_default() {
    let (_dir, store) = temp_store();
    assert!(!store.path().exists());

    let doc = store.load().expect("load should initialize");
    assert_eq!(doc, default_document());

    // A direct file read shows the same default was persisted
    let on_disk: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
    assert_eq!(on_disk["mice"].as_array().unwrap().len(), 13);
    assert_eq!(on_disk["steps"].as_array().unwrap().len(), 8);
    assert_eq!(on_disk["steps"][0]["mice"].as_array().unwrap().len(), 13);
    assert_eq!(on_disk["mouseOrder"][0], "C003");
}

#[test]
fn save_then_load_round_trips() {
    let (_dir, store) = temp_store();

    let mut doc = default_document();
    doc.mice[0].sessions = SessionCount(4);
    let moved = doc.steps[0].mice.remove(0);
    doc.steps[3].mice.push(moved);

    store.save(&doc).expect("save");
    let loaded = store.load().expect("load");
    assert_eq!(loaded, doc);
}

#[test]
fn save_is_whole_document_replacement() {
    let (_dir, store) = temp_store();
    store.load().unwrap();

    let mut doc = default_document();
    doc.mice.clear();
    doc.mouse_order.clear();
    for step in &mut doc.steps {
        step.mice.clear();
    }
    store.save(&doc).unwrap();

    // Nothing of the previous roster survives
    let loaded = store.load().unwrap();
    assert!(loaded.mice.is_empty());
    assert!(loaded.mouse(&MouseId::unchecked("C003")).is_none());
}

#[test]
fn raw_passthrough_is_schema_agnostic() {
    let (_dir, store) = temp_store();

    let payload = serde_json::json!({ "anything": ["goes", 1, null] });
    store.save_raw(&payload).expect("save_raw");
    assert_eq!(store.load_raw().expect("load_raw"), payload);
}

#[test]
fn backup_returns_bytes_without_mutating() {
    let (_dir, store) = temp_store();

    let before = store.load().unwrap();
    let backup = store.backup().expect("backup");
    let after = store.load().unwrap();

    assert_eq!(before, after);
    assert!(backup.filename.starts_with("mouseTrainingData-backup-"));
    assert!(backup.filename.ends_with(".json"));
    assert!(!backup.filename.contains(':'));

    // Backup bytes are the persisted file verbatim
    assert_eq!(backup.bytes, std::fs::read(store.path()).unwrap());
}

#[test]
fn io_failure_surfaces_as_store_unavailable() {
    // Point the store at a path whose parent is a file, so initialization
    // cannot create the directory.
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"not a directory").unwrap();

    let store = DocumentStore::new(blocker.join("data.json"));
    let err = store.load().expect_err("load should fail");
    assert!(matches!(err, mtt_common::Error::Store(_)));
}
