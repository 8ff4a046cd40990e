use std::fs;

use newsdesk_engine::{
    write_atomically, Credential, CredentialStore, FileCredentialStore, PersistError,
};
use tempfile::tempdir;

#[test]
fn file_store_round_trips_through_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("credential.json");
    let store = FileCredentialStore::new(&path);
    assert!(!store.is_logged_in());

    store.store(&Credential::new("tok-123")).unwrap();

    let reopened = FileCredentialStore::new(&path);
    assert_eq!(reopened.load(), Some(Credential::new("tok-123")));
    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"token\""));
}

#[test]
fn store_replaces_previous_credential() {
    let dir = tempdir().unwrap();
    let store = FileCredentialStore::new(dir.path().join("credential.json"));

    store.store(&Credential::new("first")).unwrap();
    store.store(&Credential::new("second")).unwrap();

    assert_eq!(store.load(), Some(Credential::new("second")));
    let leftovers: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(leftovers.len(), 1, "temp files are renamed into place");
}

#[test]
fn clear_is_idempotent() {
    let dir = tempdir().unwrap();
    let store = FileCredentialStore::new(dir.path().join("credential.json"));
    store.store(&Credential::new("tok")).unwrap();

    store.clear().unwrap();
    store.clear().unwrap();

    assert!(!store.is_logged_in());
    assert!(!store.path().exists());
}

#[test]
fn malformed_or_blank_file_reads_as_logged_out() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("credential.json");
    let store = FileCredentialStore::new(&path);

    fs::write(&path, "not json at all").unwrap();
    assert_eq!(store.load(), None);

    fs::write(&path, r#"{"token":"   "}"#).unwrap();
    assert_eq!(store.load(), None);
}

#[test]
fn nested_directories_are_created_on_store() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state").join("auth").join("credential.json");
    let store = FileCredentialStore::new(&path);

    store.store(&Credential::new("tok")).unwrap();

    assert!(path.is_file());
    assert!(store.is_logged_in());
}

#[test]
fn file_in_place_of_directory_is_a_storage_error() {
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("state");
    fs::write(&blocker, "").unwrap();

    let err = write_atomically(&blocker.join("credential.json"), b"{}").unwrap_err();
    assert!(matches!(err, PersistError::StorageDir(_)), "{err}");
}
