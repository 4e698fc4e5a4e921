use super::*;
use crate::backend::MemoryStorage;
use crate::error::{CodecError, StorageError};

/// Backend whose reads always throw, as a sandboxed iframe's storage does.
struct UnreadableStorage;

impl StorageBackend for UnreadableStorage {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Js("SecurityError".to_owned()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Ok(())
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Ok(())
    }
}

fn failing_encoder() -> Codec<i32> {
    Codec::new(
        |_: &i32| Err(CodecError::Encode("refused".to_owned())),
        |raw: &str| raw.parse().map_err(|_| CodecError::Decode(raw.to_owned())),
    )
}

// =============================================================
// No record
// =============================================================

#[test]
fn no_record_no_default_is_empty() {
    let storage = MemoryStorage::new();
    let loaded = load_initial::<i32>(&storage, "count", None, &Codec::json());
    assert_eq!(loaded, Loaded { value: None, origin: LoadOrigin::Empty });
    assert_eq!(storage.raw("count"), None);
    assert_eq!(storage.writes(), 0);
}

#[test]
fn no_record_persists_default() {
    let storage = MemoryStorage::new();
    let loaded = load_initial(&storage, "count", Some(&3), &Codec::json());
    assert_eq!(loaded, Loaded { value: Some(3), origin: LoadOrigin::Default });
    assert_eq!(storage.raw("count").as_deref(), Some("3"));
}

#[test]
fn blank_default_is_not_persisted() {
    let storage = MemoryStorage::new();
    let loaded = load_initial(&storage, "name", Some(&String::new()), &Codec::json());
    assert_eq!(loaded.origin, LoadOrigin::Empty);
    assert_eq!(loaded.value, None);
    assert_eq!(storage.raw("name"), None);
}

#[test]
fn unencodable_default_falls_back_to_none() {
    let storage = MemoryStorage::new();
    let loaded = load_initial(&storage, "count", Some(&1), &failing_encoder());
    assert_eq!(loaded, Loaded { value: None, origin: LoadOrigin::Empty });
    assert_eq!(storage.raw("count"), None);
}

#[test]
fn rejected_default_write_falls_back_to_none() {
    let storage = MemoryStorage::new();
    storage.set_reject_writes(true);
    let loaded = load_initial(&storage, "count", Some(&1), &Codec::json());
    assert_eq!(loaded.origin, LoadOrigin::Empty);
    assert_eq!(storage.raw("count"), None);
}

// =============================================================
// Existing record
// =============================================================

#[test]
fn stored_record_wins_over_default() {
    let storage = MemoryStorage::new();
    storage.insert_raw("count", "42");
    let loaded = load_initial(&storage, "count", Some(&3), &Codec::json());
    assert_eq!(loaded, Loaded { value: Some(42), origin: LoadOrigin::Stored });
    assert_eq!(storage.raw("count").as_deref(), Some("42"));
    assert_eq!(storage.writes(), 0);
}

#[test]
fn corrupt_record_is_replaced_by_default() {
    let storage = MemoryStorage::new();
    storage.insert_raw("count", "{oops");
    let loaded = load_initial(&storage, "count", Some(&7), &Codec::json());
    assert_eq!(loaded, Loaded { value: Some(7), origin: LoadOrigin::Default });
    assert_eq!(storage.raw("count").as_deref(), Some("7"));
}

#[test]
fn corrupt_record_without_default_is_removed() {
    let storage = MemoryStorage::new();
    storage.insert_raw("count", "\"not a number\"");
    let loaded = load_initial::<i32>(&storage, "count", None, &Codec::json());
    assert_eq!(loaded.origin, LoadOrigin::Empty);
    assert_eq!(storage.raw("count"), None);
}

#[test]
fn custom_codec_decodes_record() {
    let storage = MemoryStorage::new();
    storage.insert_raw("flag", "true");
    let loaded = load_initial(&storage, "flag", None, &Codec::plain());
    assert_eq!(loaded.value.as_deref(), Some("true"));
}

#[test]
fn unreadable_backend_is_treated_as_missing() {
    let loaded = load_initial(&UnreadableStorage, "count", Some(&2), &Codec::json());
    assert_eq!(loaded, Loaded { value: Some(2), origin: LoadOrigin::Default });
}
