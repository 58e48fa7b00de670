//! Download Manager for ChatLens.
//!
//! Records download requests triggered from the background worker, backed
//! by SQLite for persistence. ChatLens only tracks the records; the host
//! platform performs the actual transfer.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::params;
use uuid::Uuid;

use crate::database::connection::Database;
use crate::types::download::{DownloadItem, DownloadStatus};
use crate::types::errors::DownloadError;

/// Trait defining download record operations.
pub trait DownloadManagerTrait {
    fn start_download(&mut self, url: &str, filename: &str, save_as: bool)
        -> Result<String, DownloadError>;
    fn mark_completed(&mut self, id: &str) -> Result<(), DownloadError>;
    fn mark_failed(&mut self, id: &str, reason: &str) -> Result<(), DownloadError>;
    fn list_downloads(&self) -> Vec<&DownloadItem>;
    fn get_download(&self, id: &str) -> Option<&DownloadItem>;
}

fn status_to_str(s: &DownloadStatus) -> String {
    match s {
        DownloadStatus::Pending => "pending".to_string(),
        DownloadStatus::Completed => "completed".to_string(),
        DownloadStatus::Failed(msg) => format!("failed:{}", msg),
    }
}

fn str_to_status(s: &str) -> DownloadStatus {
    match s {
        "pending" => DownloadStatus::Pending,
        "completed" => DownloadStatus::Completed,
        other if other.starts_with("failed:") => DownloadStatus::Failed(other[7..].to_string()),
        _ => DownloadStatus::Pending,
    }
}

/// Download manager backed by SQLite with in-memory cache.
pub struct DownloadManager {
    db: Arc<Database>,
    downloads: Vec<DownloadItem>,
}

impl DownloadManager {
    pub fn new(db: Arc<Database>) -> Self {
        let mut mgr = Self {
            db,
            downloads: Vec::new(),
        };
        mgr.load_from_db();
        mgr
    }

    fn load_from_db(&mut self) {
        let conn = self.db.connection();
        let stmt = conn.prepare(
            "SELECT id, url, filename, save_as, status, requested_at FROM downloads ORDER BY requested_at DESC",
        );
        let mut stmt = match stmt {
            Ok(s) => s,
            Err(_) => return,
        };

        self.downloads = stmt
            .query_map([], |row| {
                let status_str: String = row.get(4)?;
                Ok(DownloadItem {
                    id: row.get(0)?,
                    url: row.get(1)?,
                    filename: row.get(2)?,
                    save_as: row.get::<_, i32>(3)? != 0,
                    status: str_to_status(&status_str),
                    requested_at: row.get(5)?,
                })
            })
            .map(|rows| rows.filter_map(|r| r.ok()).collect())
            .unwrap_or_default();
    }

    fn now_ts() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }

    fn find_index(&self, id: &str) -> Result<usize, DownloadError> {
        self.downloads
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| DownloadError::NotFound(id.to_string()))
    }

    fn persist(&self, item: &DownloadItem) -> Result<(), DownloadError> {
        self.db
            .connection()
            .execute(
                "INSERT OR REPLACE INTO downloads (id, url, filename, save_as, status, requested_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    item.id,
                    item.url,
                    item.filename,
                    item.save_as as i32,
                    status_to_str(&item.status),
                    item.requested_at
                ],
            )
            .map_err(|e| DownloadError::DatabaseError(e.to_string()))?;
        Ok(())
    }
}

impl DownloadManagerTrait for DownloadManager {
    fn start_download(
        &mut self,
        url: &str,
        filename: &str,
        save_as: bool,
    ) -> Result<String, DownloadError> {
        if url.trim().is_empty() {
            return Err(DownloadError::InvalidUrl(url.to_string()));
        }
        let id = Uuid::new_v4().to_string();
        let item = DownloadItem {
            id: id.clone(),
            url: url.to_string(),
            filename: filename.to_string(),
            save_as,
            status: DownloadStatus::Pending,
            requested_at: Self::now_ts(),
        };
        self.persist(&item)?;
        self.downloads.insert(0, item);
        Ok(id)
    }

    fn mark_completed(&mut self, id: &str) -> Result<(), DownloadError> {
        let idx = self.find_index(id)?;
        self.downloads[idx].status = DownloadStatus::Completed;
        self.persist(&self.downloads[idx].clone())?;
        Ok(())
    }

    fn mark_failed(&mut self, id: &str, reason: &str) -> Result<(), DownloadError> {
        let idx = self.find_index(id)?;
        self.downloads[idx].status = DownloadStatus::Failed(reason.to_string());
        self.persist(&self.downloads[idx].clone())?;
        Ok(())
    }

    fn list_downloads(&self) -> Vec<&DownloadItem> {
        self.downloads.iter().collect()
    }

    fn get_download(&self, id: &str) -> Option<&DownloadItem> {
        self.downloads.iter().find(|d| d.id == id)
    }
}
