//! Unit tests for the download manager.

use std::sync::Arc;

use tempfile::TempDir;

use chatlens::database::Database;
use chatlens::managers::download_manager::{DownloadManager, DownloadManagerTrait};
use chatlens::types::download::DownloadStatus;
use chatlens::types::errors::DownloadError;

fn setup() -> DownloadManager {
    let db = Arc::new(Database::open_in_memory().unwrap());
    DownloadManager::new(db)
}

#[test]
fn test_start_download_creates_pending_record() {
    let mut mgr = setup();
    let id = mgr
        .start_download("blob:abc", "chatlens_1.jpg", true)
        .unwrap();

    let item = mgr.get_download(&id).expect("record exists");
    assert_eq!(item.url, "blob:abc");
    assert_eq!(item.filename, "chatlens_1.jpg");
    assert!(item.save_as);
    assert_eq!(item.status, DownloadStatus::Pending);
}

#[test]
fn test_blank_url_is_rejected() {
    let mut mgr = setup();
    let err = mgr.start_download("   ", "x.jpg", false).unwrap_err();
    assert!(matches!(err, DownloadError::InvalidUrl(_)));
    assert!(mgr.list_downloads().is_empty());
}

#[test]
fn test_newest_download_listed_first() {
    let mut mgr = setup();
    mgr.start_download("blob:first", "a.jpg", true).unwrap();
    mgr.start_download("blob:second", "b.jpg", true).unwrap();

    let list = mgr.list_downloads();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].url, "blob:second");
    assert_eq!(list[1].url, "blob:first");
}

#[test]
fn test_mark_completed_and_failed() {
    let mut mgr = setup();
    let a = mgr.start_download("blob:a", "a.jpg", true).unwrap();
    let b = mgr.start_download("blob:b", "b.jpg", true).unwrap();

    mgr.mark_completed(&a).unwrap();
    mgr.mark_failed(&b, "network error").unwrap();

    assert_eq!(mgr.get_download(&a).unwrap().status, DownloadStatus::Completed);
    assert_eq!(
        mgr.get_download(&b).unwrap().status,
        DownloadStatus::Failed("network error".to_string())
    );
}

#[test]
fn test_unknown_id_returns_not_found() {
    let mut mgr = setup();
    let err = mgr.mark_completed("no-such-id").unwrap_err();
    assert!(matches!(err, DownloadError::NotFound(_)));
}

#[test]
fn test_records_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("chatlens.db");

    let id = {
        let db = Arc::new(Database::open(&path).unwrap());
        let mut mgr = DownloadManager::new(db);
        let id = mgr.start_download("blob:persisted", "p.jpg", false).unwrap();
        mgr.mark_completed(&id).unwrap();
        id
    };

    let db = Arc::new(Database::open(&path).unwrap());
    let mgr = DownloadManager::new(db);
    let item = mgr.get_download(&id).expect("record reloaded");
    assert_eq!(item.url, "blob:persisted");
    assert!(!item.save_as);
    assert_eq!(item.status, DownloadStatus::Completed);
}
