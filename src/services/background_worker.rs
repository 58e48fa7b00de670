//! Background worker for ChatLens.
//!
//! Owns the extension lifecycle: writes defaults on first install, routes
//! cross-context messages it is responsible for (stats forwarding, download
//! requests), and keeps itself alive with a periodic no-op storage read so
//! the host platform never suspends it for inactivity.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::managers::download_manager::{DownloadManager, DownloadManagerTrait};
use crate::services::messenger::{Messenger, MessengerTrait};
use crate::services::storage_service::{StorageScope, StorageService, StorageServiceTrait};
use crate::types::message::{Context, Message, MessageResponse};
use crate::types::settings::ExtensionSettings;

/// Ticks between keep-alive heartbeats.
pub const KEEP_ALIVE_INTERVAL_TICKS: u64 = 20;

/// Local-scope key read by the heartbeat. Carries no semantic payload.
pub const KEEP_ALIVE_KEY: &str = "keepAlive";

/// Why the extension lifecycle hook fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallReason {
    Install,
    Update,
    BrowserUpdate,
}

/// Trait defining the background worker interface.
pub trait BackgroundWorkerTrait {
    /// Extension lifecycle hook. Defaults are written on `Install` only.
    fn on_installed(&mut self, reason: InstallReason);
    /// Cross-context message entry point. Always acknowledges.
    fn on_message(&mut self, messenger: &mut Messenger, message: &Message) -> MessageResponse;
    /// Advances one time unit; fires the keep-alive heartbeat on cadence.
    fn tick(&mut self);
}

/// Background worker implementation.
pub struct BackgroundWorker {
    storage: Arc<StorageService>,
    downloads: DownloadManager,
    ticks: u64,
    heartbeats: u64,
}

impl BackgroundWorker {
    pub fn new(storage: Arc<StorageService>, downloads: DownloadManager) -> Self {
        Self {
            storage,
            downloads,
            ticks: 0,
            heartbeats: 0,
        }
    }

    pub fn downloads(&self) -> &DownloadManager {
        &self.downloads
    }

    /// Heartbeats fired so far (for observability and tests).
    pub fn heartbeat_count(&self) -> u64 {
        self.heartbeats
    }

    fn timestamp() -> i64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }
}

impl BackgroundWorkerTrait for BackgroundWorker {
    fn on_installed(&mut self, reason: InstallReason) {
        info!(?reason, "extension installed");
        if reason != InstallReason::Install {
            return;
        }
        if let Err(e) = self.storage.set_settings(&ExtensionSettings::default()) {
            error!(error = %e, "failed to write default settings");
        }
        if let Err(e) = self.storage.reset_stats() {
            error!(error = %e, "failed to write default stats");
        }
        info!("default settings initialized");
    }

    fn on_message(&mut self, messenger: &mut Messenger, message: &Message) -> MessageResponse {
        match message {
            Message::UpdateStats => {
                // Forward the refresh hint so an open popup sees it.
                messenger.send(Context::Background, Message::UpdateStats);
            }
            Message::DownloadImage { image_url } => {
                let filename = format!("chatlens_{}.jpg", Self::timestamp());
                match self.downloads.start_download(image_url, &filename, true) {
                    Ok(id) => info!(id = %id, url = %image_url, "download recorded"),
                    Err(e) => error!(error = %e, "failed to record download"),
                }
            }
            other => {
                warn!(message = ?other, "unhandled action");
            }
        }
        MessageResponse::ok()
    }

    fn tick(&mut self) {
        self.ticks += 1;
        if self.ticks % KEEP_ALIVE_INTERVAL_TICKS == 0 {
            self.heartbeats += 1;
            if let Err(e) = self.storage.touch(StorageScope::Local, KEEP_ALIVE_KEY) {
                debug!(error = %e, "keep-alive read failed");
            }
        }
    }
}
