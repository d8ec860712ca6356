//! Login flag persistence across storage backends.

use crate::mock_hw::MockStore;

use plantcare::adapters::storage::{FileStore, MemStore};
use plantcare::app::ports::{StorageError, StoragePort};
use plantcare::session::{self, LOGIN_KEY, Landing, SESSION_NAMESPACE};

#[test]
fn login_logout_roundtrip_in_memory() {
    let mut store = MemStore::new();
    assert_eq!(session::landing(&store), Landing::Welcome);

    session::login(&mut store).unwrap();
    assert!(session::is_logged_in(&store));
    assert_eq!(session::landing(&store), Landing::Dashboard);

    session::logout(&mut store).unwrap();
    assert!(!store.exists(SESSION_NAMESPACE, LOGIN_KEY));
    assert_eq!(session::landing(&store), Landing::Welcome);
}

#[test]
fn login_flag_is_stored_as_true() {
    let mut store = MockStore::default();
    session::login(&mut store).unwrap();

    let mut buf = [0u8; 16];
    let n = store.read(SESSION_NAMESPACE, LOGIN_KEY, &mut buf).unwrap();
    assert_eq!(&buf[..n], b"true");
}

#[test]
fn failed_write_surfaces_the_error() {
    let mut store = MockStore {
        fail_writes: true,
        ..MockStore::default()
    };
    assert!(matches!(session::login(&mut store), Err(StorageError::IoError)));
    assert!(!session::is_logged_in(&store));
}

#[test]
fn login_survives_a_restart_with_the_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plantcare.json");

    {
        let mut store = FileStore::open(&path).unwrap();
        session::login(&mut store).unwrap();
    }
    let mut store = FileStore::open(&path).unwrap();
    assert_eq!(session::landing(&store), Landing::Dashboard);

    session::logout(&mut store).unwrap();
    let store = FileStore::open(&path).unwrap();
    assert_eq!(session::landing(&store), Landing::Welcome);
}

#[test]
fn unwritable_file_store_does_not_report_a_login() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing_dir").join("plantcare.json");
    let mut store = FileStore::open(&path).unwrap();

    assert!(matches!(session::login(&mut store), Err(StorageError::IoError)));
    assert!(!session::is_logged_in(&store));
    assert_eq!(session::landing(&store), Landing::Welcome);
}
