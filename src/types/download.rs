use serde::{Deserialize, Serialize};

/// A download record created by the background worker.
///
/// ChatLens only records the request; the actual byte transfer is the host
/// platform's job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DownloadItem {
    pub id: String,
    pub url: String,
    pub filename: String,
    /// Whether the host should prompt with a save-as dialog.
    pub save_as: bool,
    pub status: DownloadStatus,
    pub requested_at: i64,
}

/// Lifecycle state of a download record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum DownloadStatus {
    Pending,
    Completed,
    Failed(String),
}
