// Filesystem artifact store tests

use captiond::cache::{fingerprint, FsArtifactStore};
use captiond::models::{CaptionColor, CaptionRequest};

fn key(name: &str) -> captiond::cache::Fingerprint {
    fingerprint(&CaptionRequest::new(name, "", "", CaptionColor::Black))
}

#[tokio::test]
async fn test_read_miss_on_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsArtifactStore::open(dir.path()).await.unwrap();

    assert!(store.read(&key("nothing")).await.is_none());
}

#[tokio::test]
async fn test_write_then_read_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsArtifactStore::open(dir.path()).await.unwrap();
    let key = key("an-image");

    store.write(&key, b"png bytes").await.unwrap();
    let read = store.read(&key).await.expect("hit after write");
    assert_eq!(read.as_ref(), b"png bytes");
}

#[tokio::test]
async fn test_overwrite_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsArtifactStore::open(dir.path()).await.unwrap();
    let key = key("an-image");

    store.write(&key, b"rendered").await.unwrap();
    store.write(&key, b"rendered").await.unwrap();
    assert_eq!(store.read(&key).await.unwrap().as_ref(), b"rendered");
}

#[tokio::test]
async fn test_distinct_keys_are_isolated() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsArtifactStore::open(dir.path()).await.unwrap();

    store.write(&key("a"), b"first").await.unwrap();
    store.write(&key("b"), b"second").await.unwrap();

    assert_eq!(store.read(&key("a")).await.unwrap().as_ref(), b"first");
    assert_eq!(store.read(&key("b")).await.unwrap().as_ref(), b"second");
}

#[tokio::test]
async fn test_open_creates_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("deeper").join("cache");

    let store = FsArtifactStore::open(&nested).await.unwrap();
    assert!(nested.is_dir());
    assert!(store.read(&key("x")).await.is_none());
}

#[tokio::test]
async fn test_open_fails_when_path_is_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let occupied = dir.path().join("occupied");
    std::fs::write(&occupied, b"not a dir").unwrap();

    assert!(FsArtifactStore::open(&occupied).await.is_err());
}

#[tokio::test]
async fn test_write_failure_is_an_error_not_a_panic() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("cache");
    let store = FsArtifactStore::open(&root).await.unwrap();

    // Yank the directory out from under the store; the write must fail
    // cleanly so the caller can log and keep serving.
    std::fs::remove_dir_all(&root).unwrap();
    assert!(store.write(&key("gone"), b"bytes").await.is_err());
}
