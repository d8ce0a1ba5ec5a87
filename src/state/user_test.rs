use super::*;
use crate::util::storage::{FileStorage, MemoryStorage};

fn sample_user() -> User {
    let mut user = User::new(1, 1);
    user.email = Some("admin@example.com".to_owned());
    user.name = Some("Harbor Admin".to_owned());
    user.profile.insert("department".to_owned(), serde_json::json!("fleet"));
    user
}

/// Drop the in-memory store and build a fresh one over the same storage.
fn reload<S: Storage>(store: UserStore<S>) -> (UserStore<S>, RestoreOutcome) {
    UserStore::restored(store.into_storage())
}

// =============================================================
// set / restore
// =============================================================

#[test]
fn new_store_has_no_user() {
    let store = UserStore::new(MemoryStorage::new());
    assert!(store.user().is_none());
    assert!(!store.is_admin());
}

#[test]
fn set_user_persists_under_user_key() {
    let mut store = UserStore::new(MemoryStorage::new());
    store.set_user(User::new(1, 1));
    let raw = store.storage().get_item(USER_STORAGE_KEY).unwrap().unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed, serde_json::json!({ "user_id": 1, "role": 1 }));
}

#[test]
fn set_then_restore_reproduces_equal_user() {
    let mut store = UserStore::new(MemoryStorage::new());
    store.set_user(sample_user());

    let (restored, outcome) = reload(store);
    assert_eq!(outcome, RestoreOutcome::Restored);
    assert_eq!(restored.user(), Some(&sample_user()));
    assert!(restored.is_admin());
}

#[test]
fn set_user_replaces_previous_user() {
    let mut store = UserStore::new(MemoryStorage::new());
    store.set_user(User::new(1, 1));
    store.set_user(User::new(2, 0));
    assert_eq!(store.user().map(|u| u.id), Some(2));
    assert!(!store.is_admin());

    let (restored, _) = reload(store);
    assert_eq!(restored.user().map(|u| u.id), Some(2));
}

#[test]
fn restore_from_file_storage_survives_process_restart() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = UserStore::new(FileStorage::new(dir.path()));
    store.set_user(sample_user());
    drop(store);

    let (restored, outcome) = UserStore::restored(FileStorage::new(dir.path()));
    assert_eq!(outcome, RestoreOutcome::Restored);
    assert_eq!(restored.user(), Some(&sample_user()));
}

// =============================================================
// clear
// =============================================================

#[test]
fn clear_user_removes_memory_and_storage() {
    let mut store = UserStore::new(MemoryStorage::new());
    store.set_user(sample_user());
    store.clear_user();

    assert!(store.user().is_none());
    assert_eq!(store.storage().get_item(USER_STORAGE_KEY).unwrap(), None);

    let (restored, outcome) = reload(store);
    assert_eq!(outcome, RestoreOutcome::Absent);
    assert!(restored.user().is_none());
}

#[test]
fn clear_user_without_user_is_harmless() {
    let mut store = UserStore::new(MemoryStorage::new());
    store.clear_user();
    assert!(store.user().is_none());
}

// =============================================================
// degraded storage
// =============================================================

#[test]
fn restore_with_nothing_stored_is_absent() {
    let (store, outcome) = UserStore::restored(MemoryStorage::new());
    assert_eq!(outcome, RestoreOutcome::Absent);
    assert!(store.user().is_none());
}

#[test]
fn malformed_persisted_data_restores_absent_user() {
    let mut storage = MemoryStorage::new();
    storage.set_item(USER_STORAGE_KEY, "{not json").unwrap();
    let (store, outcome) = UserStore::restored(storage);
    assert_eq!(outcome, RestoreOutcome::Corrupt);
    assert!(store.user().is_none());
}

#[test]
fn wrong_shape_persisted_data_is_corrupt() {
    let mut storage = MemoryStorage::new();
    storage.set_item(USER_STORAGE_KEY, "[1, 2, 3]").unwrap();
    let (store, outcome) = UserStore::restored(storage);
    assert_eq!(outcome, RestoreOutcome::Corrupt);
    assert!(store.user().is_none());
}

#[test]
fn loosely_typed_persisted_users_restore_as_non_admin() {
    for raw in [
        r#"{"user_id":5,"email":"a@b","name":null,"role":null}"#,
        r#"{"user_id":5,"role":"1"}"#,
        r#"{"id":5,"user_id":5,"role":0}"#,
    ] {
        let mut storage = MemoryStorage::new();
        storage.set_item(USER_STORAGE_KEY, raw).unwrap();
        let (store, outcome) = UserStore::restored(storage);
        assert_eq!(outcome, RestoreOutcome::Restored, "{raw}");
        assert_eq!(store.user().map(|u| u.id), Some(5));
        assert!(!store.is_admin());
    }
}

#[test]
fn persisted_null_is_absent() {
    let mut storage = MemoryStorage::new();
    storage.set_item(USER_STORAGE_KEY, "null").unwrap();
    let (_, outcome) = UserStore::restored(storage);
    assert_eq!(outcome, RestoreOutcome::Absent);
}

#[test]
fn restore_replaces_in_memory_user_with_corrupt_result() {
    let mut storage = MemoryStorage::new();
    storage.set_item(USER_STORAGE_KEY, "garbage").unwrap();
    let mut store = UserStore { user: Some(User::new(1, 1)), storage };

    assert_eq!(store.restore_from_storage(), RestoreOutcome::Corrupt);
    assert!(store.user().is_none());
}

#[test]
fn unavailable_storage_degrades_without_panicking() {
    let (mut store, outcome) = UserStore::restored(MemoryStorage::unavailable());
    assert_eq!(outcome, RestoreOutcome::Unavailable);
    assert!(store.user().is_none());

    store.set_user(User::new(3, 1));
    assert_eq!(store.user().map(|u| u.id), Some(3));
    assert!(store.is_admin());

    store.clear_user();
    assert!(store.user().is_none());
}
