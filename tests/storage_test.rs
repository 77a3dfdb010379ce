// ABOUTME: Integration tests for the key/value stores and the versioned value envelope
// ABOUTME: Exercises the file-backed store in a temporary directory alongside the in-memory store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::collections::BTreeSet;
use std::fs;

use nutriplan::errors::ErrorCode;
use nutriplan::storage::{FileStore, InMemoryStore, KeyValueStore, KeyValueStoreExt};
use tempfile::TempDir;

fn exercise_store(store: &dyn KeyValueStore) {
    assert!(store.get_json::<Vec<u32>>("progressEntries").unwrap().is_none());

    store.set_json("progressEntries", &vec![1_u32, 2, 3]).unwrap();
    store
        .set_json("consumed-2025-05-01", &BTreeSet::from(["meal-lunch"]))
        .unwrap();

    assert_eq!(
        store.get_json::<Vec<u32>>("progressEntries").unwrap(),
        Some(vec![1, 2, 3])
    );
    assert_eq!(
        store.keys().unwrap(),
        vec!["consumed-2025-05-01".to_owned(), "progressEntries".to_owned()]
    );

    assert!(store.remove("progressEntries").unwrap());
    assert!(!store.remove("progressEntries").unwrap());

    store.clear().unwrap();
    assert!(store.keys().unwrap().is_empty());
}

#[test]
fn test_in_memory_store_contract() {
    exercise_store(&InMemoryStore::new());
}

#[test]
fn test_file_store_contract() {
    let dir = TempDir::new().unwrap();
    exercise_store(&FileStore::open(dir.path().join("nested")).unwrap());
}

#[test]
fn test_file_store_reads_legacy_and_skips_newer_values() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::open(dir.path()).unwrap();

    fs::write(dir.path().join("legacy.json"), r#"["meal-dinner"]"#).unwrap();
    fs::write(
        dir.path().join("future.json"),
        r#"{"version":99,"data":["meal-dinner"]}"#,
    )
    .unwrap();
    fs::write(dir.path().join("broken.json"), "{not json").unwrap();

    assert_eq!(
        store.get_json::<Vec<String>>("legacy").unwrap(),
        Some(vec!["meal-dinner".to_owned()])
    );
    assert!(store.get_json::<Vec<String>>("future").unwrap().is_none());
    assert!(store.get_json::<Vec<String>>("broken").unwrap().is_none());
    assert!(store.get_json::<u32>("legacy").unwrap().is_none());
}

#[test]
fn test_legacy_arrays_of_any_length_load() {
    let store = InMemoryStore::new();
    store.set_raw("pair", "[1,2]").unwrap();
    store.set_raw("entries", r#"["meal-lunch","meal-dinner"]"#).unwrap();

    assert_eq!(store.get_json::<Vec<u32>>("pair").unwrap(), Some(vec![1, 2]));
    assert_eq!(
        store.get_json::<Vec<String>>("entries").unwrap(),
        Some(vec!["meal-lunch".to_owned(), "meal-dinner".to_owned()])
    );
}

#[test]
fn test_file_store_writes_envelope() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::open(dir.path()).unwrap();

    store.set_json("user", &"Budi").unwrap();

    let raw = fs::read_to_string(dir.path().join("user.json")).unwrap();
    assert_eq!(raw, r#"{"version":1,"data":"Budi"}"#);
    assert_eq!(store.dir(), dir.path());
}

#[test]
fn test_file_store_rejects_path_like_keys() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::open(dir.path()).unwrap();

    let error = store.set_raw("../escape", "1").unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidInput);
    assert!(store.get_raw("a/b").is_err());
}
