#![forbid(unsafe_code)]

use cm_core::ops::add_column;
use cm_storage::{
    KeyValueStore, STORAGE_KEY, SqliteStore, StoreError, load_document, load_read_only_preference,
    save_document, save_read_only_preference, sha256_hex,
};
use std::path::PathBuf;

fn temp_dir(test_name: &str) -> PathBuf {
    let base = std::env::temp_dir();
    let pid = std::process::id();
    let nonce = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let dir = base.join(format!("cm_storage_{test_name}_{pid}_{nonce}"));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

#[test]
fn values_survive_reopen_with_digest() {
    let storage_dir = temp_dir("values_survive_reopen_with_digest");
    {
        let mut store = SqliteStore::open(&storage_dir).expect("open store");
        store.set("k", "first").expect("set");
        store.set("k", "second").expect("overwrite");
        store.set("gone", "x").expect("set");
        store.remove("gone").expect("remove");
    }

    let store = SqliteStore::open(&storage_dir).expect("reopen store");
    assert_eq!(store.get("k").expect("get").as_deref(), Some("second"));
    assert_eq!(store.get("gone").expect("get"), None);
    let row = store.row("k").expect("row").expect("row exists");
    assert_eq!(row.digest, sha256_hex(b"second"));
    assert!(row.updated_at_ms > 0);
    assert_eq!(store.storage_dir(), storage_dir.as_path());
    assert!(store.db_path().exists());
}

#[test]
fn tampered_value_is_reported_and_document_falls_back() {
    let storage_dir = temp_dir("tampered_value_is_reported_and_document_falls_back");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    let doc = cm_core::default_document().expect("default document");
    assert!(save_document(&mut store, &doc));
    assert_eq!(load_document(&store), Some(doc));

    let conn = rusqlite::Connection::open(store.db_path()).expect("raw connection");
    conn.execute(
        "UPDATE kv SET value='{}' WHERE key=?1",
        rusqlite::params![STORAGE_KEY],
    )
    .expect("tamper");

    match store.get(STORAGE_KEY) {
        Err(StoreError::InvalidInput(message)) => assert!(message.contains("digest")),
        other => panic!("expected digest error, got {other:?}"),
    }
    assert_eq!(load_document(&store), None);
}

#[test]
fn mutated_document_persists_across_reopen() {
    let storage_dir = temp_dir("mutated_document_persists_across_reopen");
    let doc = cm_core::default_document().expect("default document");
    let next = add_column(&doc, "検証").expect("add column");
    {
        let mut store = SqliteStore::open(&storage_dir).expect("open store");
        assert!(save_document(&mut store, &next));
        save_read_only_preference(&mut store, true);
    }
    let store = SqliteStore::open(&storage_dir).expect("reopen store");
    let loaded = load_document(&store).expect("stored document");
    assert_eq!(loaded.columns.len(), 4);
    assert_eq!(loaded, next);
    assert!(load_read_only_preference(&store));
}

#[test]
fn foreign_schema_requires_reset() {
    let storage_dir = temp_dir("foreign_schema_requires_reset");
    {
        let conn = rusqlite::Connection::open(storage_dir.join("check_matrix.db")).expect("raw db");
        conn.execute_batch("CREATE TABLE branches (name TEXT);")
            .expect("foreign table");
    }
    match SqliteStore::open(&storage_dir) {
        Err(StoreError::InvalidInput(message)) => assert!(message.starts_with("RESET_REQUIRED")),
        other => panic!("expected reset error, got {other:?}"),
    }
}
