//! App Core for ChatLens.
//!
//! Central struct wiring the shared store, the messenger, and the three
//! extension contexts (background worker, content engine, popup
//! controller) over one document. Each context is single-threaded and
//! event-driven; `tick` advances all of them by one time unit and then
//! delivers any queued cross-context messages.

use std::sync::Arc;

use crate::database::connection::Database;
use crate::dom::Document;
use crate::engine::observer_engine::{ObserverEngine, ObserverEngineTrait};
use crate::managers::download_manager::DownloadManager;
use crate::router;
use crate::services::background_worker::{BackgroundWorker, BackgroundWorkerTrait, InstallReason};
use crate::services::messenger::{Messenger, MessengerTrait};
use crate::services::popup_controller::{PopupController, PopupControllerTrait};
use crate::services::storage_service::StorageService;
use crate::types::message::{Context, MessageResponse};

/// Central application struct holding the store and the three contexts.
pub struct App {
    pub db: Arc<Database>,
    pub storage: Arc<StorageService>,
    pub messenger: Messenger,
    pub background: BackgroundWorker,
    pub engine: ObserverEngine,
    pub popup: PopupController,
}

impl App {
    /// Creates a new App over a file-backed database.
    pub fn new(db_path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let db = Arc::new(Database::open(db_path)?);
        Ok(Self::build(db))
    }

    /// Creates a new App over an in-memory database (used by tests and
    /// the driver's default mode).
    pub fn open_in_memory() -> Result<Self, Box<dyn std::error::Error>> {
        let db = Arc::new(Database::open_in_memory()?);
        Ok(Self::build(db))
    }

    fn build(db: Arc<Database>) -> Self {
        let storage = Arc::new(StorageService::new(db.clone()));
        let downloads = DownloadManager::new(db.clone());
        let background = BackgroundWorker::new(storage.clone(), downloads);
        let engine = ObserverEngine::new(storage.clone());
        let popup = PopupController::new(storage.clone());
        Self {
            db,
            storage,
            messenger: Messenger::new(),
            background,
            engine,
            popup,
        }
    }

    /// First-install lifecycle hook: writes default settings and zeroed
    /// counters.
    pub fn install(&mut self) {
        self.background.on_installed(InstallReason::Install);
    }

    /// Content-context startup: load settings/stats, start polling for
    /// the host.
    pub fn startup(&mut self) {
        self.engine.init();
    }

    /// Advances every context by one time unit, then delivers queued
    /// messages.
    pub fn tick(&mut self, doc: &mut Document) -> Vec<(Context, MessageResponse)> {
        self.background.tick();
        self.engine.tick(doc, &mut self.messenger);
        self.popup.tick();
        self.pump_messages(doc)
    }

    /// Delivers every queued envelope; delivery may enqueue forwards, so
    /// draining repeats until the queue is quiet.
    pub fn pump_messages(&mut self, doc: &mut Document) -> Vec<(Context, MessageResponse)> {
        let mut responses = Vec::new();
        loop {
            let envelopes = self.messenger.drain();
            if envelopes.is_empty() {
                break;
            }
            for envelope in envelopes {
                responses.extend(router::deliver(self, doc, &envelope));
            }
        }
        responses
    }
}
