use super::*;

// =============================================================
// MemoryStorage
// =============================================================

#[test]
fn memory_storage_set_get_remove() {
    let mut storage = MemoryStorage::new();
    assert_eq!(storage.get_item("user").unwrap(), None);

    storage.set_item("user", "{\"user_id\":1}").unwrap();
    assert_eq!(storage.get_item("user").unwrap().as_deref(), Some("{\"user_id\":1}"));

    storage.remove_item("user").unwrap();
    assert_eq!(storage.get_item("user").unwrap(), None);
}

#[test]
fn memory_storage_remove_missing_key_is_ok() {
    let mut storage = MemoryStorage::new();
    assert!(storage.remove_item("nothing").is_ok());
}

#[test]
fn unavailable_memory_storage_fails_every_operation() {
    let mut storage = MemoryStorage::unavailable();
    assert!(matches!(storage.get_item("user"), Err(StorageError::Unavailable(_))));
    assert!(matches!(storage.set_item("user", "{}"), Err(StorageError::Unavailable(_))));
    assert!(matches!(storage.remove_item("user"), Err(StorageError::Unavailable(_))));
}

// =============================================================
// FileStorage
// =============================================================

#[test]
fn file_storage_missing_key_is_none() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path());
    assert_eq!(storage.get_item("user").unwrap(), None);
}

#[test]
fn file_storage_writes_one_file_per_key() {
    let dir = tempfile::tempdir().unwrap();
    let mut storage = FileStorage::new(dir.path());
    storage.set_item("user", "{\"user_id\":2,\"role\":1}").unwrap();

    let on_disk = std::fs::read_to_string(dir.path().join("user.json")).unwrap();
    assert_eq!(on_disk, "{\"user_id\":2,\"role\":1}");
    assert!(!dir.path().join("user.json.tmp").exists());
    assert_eq!(storage.get_item("user").unwrap().as_deref(), Some(on_disk.as_str()));
}

#[test]
fn file_storage_creates_missing_state_dir() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("a").join("b");
    let mut storage = FileStorage::new(&nested);
    storage.set_item("user", "{}").unwrap();
    assert!(nested.join("user.json").exists());
}

#[test]
fn file_storage_overwrites_and_removes() {
    let dir = tempfile::tempdir().unwrap();
    let mut storage = FileStorage::new(dir.path());
    storage.set_item("user", "first").unwrap();
    storage.set_item("user", "second").unwrap();
    assert_eq!(storage.get_item("user").unwrap().as_deref(), Some("second"));

    storage.remove_item("user").unwrap();
    assert_eq!(storage.get_item("user").unwrap(), None);
    assert!(storage.remove_item("user").is_ok());
}

#[test]
fn file_storage_unreadable_entry_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("user.json")).unwrap();
    let storage = FileStorage::new(dir.path());
    assert!(matches!(storage.get_item("user"), Err(StorageError::Io { .. })));
}
