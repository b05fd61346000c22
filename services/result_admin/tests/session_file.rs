use result_admin_core::domain::{SessionSnapshot, UserIdentity};
use result_admin_core::ports::SessionStore;
use result_admin_lib::adapters::FileSessionStore;

fn snapshot() -> SessionSnapshot {
    SessionSnapshot {
        token: "tok-1".to_string(),
        user: UserIdentity {
            id: "u1".to_string(),
            name: "Admin".to_string(),
            email: "admin@uni.edu".to_string(),
            role: Some("admin".to_string()),
        },
    }
}

#[tokio::test]
async fn missing_file_means_no_session() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileSessionStore::new(dir.path().join("session.json"));

    assert_eq!(store.load().await, Ok(None));
    assert_eq!(store.clear().await, Ok(()));
}

#[tokio::test]
async fn save_creates_parent_directories_and_reloads() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileSessionStore::new(dir.path().join("nested/state/session.json"));

    store.save(&snapshot()).await.expect("save");

    assert!(store.path().exists());
    assert_eq!(store.load().await, Ok(Some(snapshot())));
}

#[cfg(unix)]
#[tokio::test]
async fn saved_file_is_private_to_the_owner() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileSessionStore::new(dir.path().join("session.json"));
    store.save(&snapshot()).await.expect("save");

    let mode = std::fs::metadata(store.path()).expect("metadata").permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[tokio::test]
async fn clear_removes_the_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileSessionStore::new(dir.path().join("session.json"));
    store.save(&snapshot()).await.expect("save");

    store.clear().await.expect("clear");

    assert!(!store.path().exists());
    assert_eq!(store.load().await, Ok(None));
}

#[tokio::test]
async fn corrupt_file_reads_as_signed_out() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("session.json");
    std::fs::write(&path, b"{ not json").expect("write");
    let store = FileSessionStore::new(path);

    assert_eq!(store.load().await, Ok(None));
}
