//! Observer/Counter Engine for ChatLens — the content-context core.
//!
//! Watches the live document for inserted nodes, classifies new images
//! against a fixed pattern list, tags processed elements so they are never
//! classified twice, and keeps the two usage counters accurate and
//! persisted. Counters are recomputed from a census of the current
//! document, not accumulated: the message census runs on every mutation
//! batch, the image census only when a new image is processed.

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::dom::{Document, NodeId, ObserverId, Selector};
use crate::services::messenger::{Messenger, MessengerTrait};
use crate::services::storage_service::{StorageService, StorageServiceTrait};
use crate::types::message::{Context, Message, MessageResponse};
use crate::types::settings::ExtensionSettings;
use crate::types::stats::UsageStats;

use super::badge;

/// Ticks spent polling for a host marker before giving up.
pub const HOST_TIMEOUT_TICKS: u32 = 30;

/// Attribute set on each classified element exactly once.
pub const PROCESSED_MARKER: &str = "data-chatlens-processed";

/// Class toggled on marked images by hover events.
pub const HIGHLIGHT_CLASS: &str = "chatlens-highlight";

/// Domain whose hosted images the classifier recognizes.
const HOST_DOMAIN: &str = "web.whatsapp.com";

/// Engine lifecycle. Linear, no branching back: a timed-out engine stays
/// timed out for the rest of the page load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePhase {
    Idle,
    WaitingForHost { ticks_waited: u32 },
    Active,
    TimedOut,
}

/// Trait defining the engine interface.
pub trait ObserverEngineTrait {
    /// Loads settings and stats from the store. Read failures are logged
    /// and leave the in-memory defaults in place; there is no retry.
    fn init(&mut self);
    /// Advances one time unit: polls for the host while waiting, processes
    /// pending mutations while active.
    fn tick(&mut self, doc: &mut Document, messenger: &mut Messenger);
    /// Drains pending mutation batches and re-runs classification/census.
    fn pump(&mut self, doc: &mut Document, messenger: &mut Messenger);
    /// Cross-context message entry point (`settingsUpdated` restarts
    /// features; everything else is acknowledged and ignored).
    fn on_message(
        &mut self,
        doc: &mut Document,
        messenger: &mut Messenger,
        message: &Message,
    ) -> MessageResponse;
    /// Hover enter/leave on a marked image. The image-preview setting is
    /// consulted at event time, not at mark time.
    fn handle_hover(&mut self, doc: &mut Document, node: NodeId, entering: bool);
    fn phase(&self) -> EnginePhase;
    fn settings(&self) -> &ExtensionSettings;
    fn stats(&self) -> UsageStats;
}

/// The content-context engine.
pub struct ObserverEngine {
    storage: Arc<StorageService>,
    settings: ExtensionSettings,
    stats: UsageStats,
    phase: EnginePhase,
    image_watch: Option<ObserverId>,
    message_watch: Option<ObserverId>,
    image_patterns: Vec<Selector>,
    message_pattern: Selector,
    host_markers: Vec<Selector>,
    marker_pattern: Selector,
}

impl ObserverEngine {
    pub fn new(storage: Arc<StorageService>) -> Self {
        Self {
            storage,
            settings: ExtensionSettings::default(),
            stats: UsageStats::default(),
            phase: EnginePhase::Idle,
            image_watch: None,
            message_watch: None,
            image_patterns: Self::image_patterns(),
            message_pattern: Selector::attr_equals(Some("div"), "data-testid", "msg-container"),
            host_markers: Self::host_markers(),
            marker_pattern: Selector::attr_equals(None, PROCESSED_MARKER, "true"),
        }
    }

    /// The ordered classifier pattern list. A node may match several
    /// patterns; the processed marker deduplicates.
    fn image_patterns() -> Vec<Selector> {
        vec![
            Selector::attr_contains(Some("img"), "src", "blob:"),
            Selector::attr_contains(Some("img"), "src", HOST_DOMAIN),
            Selector::attr_equals(Some("div"), "data-testid", "image-thumb"),
            Selector::class(Some("img"), "media-image"),
            Selector::class_contains(Some("img"), "message"),
        ]
    }

    /// Alternative markers indicating the host app finished its own
    /// startup rendering.
    fn host_markers() -> Vec<Selector> {
        vec![
            Selector::attr_equals(None, "data-testid", "conversation-panel-body"),
            Selector::id("main"),
            Selector::attr_equals(Some("div"), "role", "application"),
        ]
    }

    fn host_present(&self, doc: &Document) -> bool {
        self.host_markers
            .iter()
            .any(|m| doc.query_first(doc.body(), m).is_some())
    }

    /// Installs the badge and both mutation watches, then classifies
    /// images already present. Idempotent: existing watches are replaced.
    fn start_features(&mut self, doc: &mut Document, messenger: &mut Messenger) {
        if self.settings.stats_enabled {
            badge::render(doc, self.stats.total_images);
        }

        if let Some(w) = self.image_watch.take() {
            doc.unsubscribe(w);
        }
        if let Some(w) = self.message_watch.take() {
            doc.unsubscribe(w);
        }

        // Conversation container, falling back to the whole body.
        let container = doc
            .query_first(doc.body(), &Selector::id("main"))
            .unwrap_or_else(|| doc.body());
        self.image_watch = doc.subscribe(container).ok();
        self.message_watch = doc.subscribe(container).ok();

        let body = doc.body();
        self.process_images(doc, body, messenger);
    }

    /// Classifies `root` and its descendants against the pattern list,
    /// marking and counting each newly matched node at most once.
    fn process_images(&mut self, doc: &mut Document, root: NodeId, messenger: &mut Messenger) {
        let patterns = self.image_patterns.clone();
        for pattern in &patterns {
            for node in doc.query_all(root, pattern) {
                if doc.get_attr(node, PROCESSED_MARKER) == Some("true") {
                    continue;
                }
                if doc.set_attr(node, PROCESSED_MARKER, "true").is_err() {
                    continue;
                }
                let src = doc.get_attr(node, "src").unwrap_or("").to_string();
                debug!(node, src = %src, "image enhanced");
                self.update_image_count(doc, messenger);
            }
        }
    }

    /// Census of marked elements. On change: persist, re-render the badge
    /// (statistics display permitting), and broadcast `updateStats`.
    fn update_image_count(&mut self, doc: &mut Document, messenger: &mut Messenger) {
        let census = doc.query_all(doc.body(), &self.marker_pattern).len() as u64;
        if census == self.stats.total_images {
            return;
        }
        self.stats.total_images = census;
        if let Err(e) = self.storage.set_total_images(census) {
            error!(error = %e, "failed to persist image count");
        }
        if self.settings.stats_enabled {
            badge::render(doc, census);
        }
        messenger.send(Context::Content, Message::UpdateStats);
        info!(total_images = census, "image count updated");
    }

    /// Census of message containers. On change: persist only.
    fn update_message_count(&mut self, doc: &Document) {
        let census = doc.query_all(doc.body(), &self.message_pattern).len() as u64;
        if census == self.stats.total_messages {
            return;
        }
        self.stats.total_messages = census;
        if let Err(e) = self.storage.set_total_messages(census) {
            error!(error = %e, "failed to persist message count");
        }
        info!(total_messages = census, "message count updated");
    }
}

impl ObserverEngineTrait for ObserverEngine {
    fn init(&mut self) {
        match self.storage.get_settings() {
            Ok(settings) => self.settings = settings,
            Err(e) => error!(error = %e, "failed to load settings"),
        }
        match self.storage.get_stats() {
            Ok(stats) => self.stats = stats,
            Err(e) => error!(error = %e, "failed to load stats"),
        }
        self.phase = EnginePhase::WaitingForHost { ticks_waited: 0 };
        info!(settings = ?self.settings, stats = ?self.stats, "engine initialized");
    }

    fn tick(&mut self, doc: &mut Document, messenger: &mut Messenger) {
        match self.phase {
            EnginePhase::Idle | EnginePhase::TimedOut => {}
            EnginePhase::WaitingForHost { ticks_waited } => {
                if self.host_present(doc) {
                    info!("host detected, starting features");
                    self.phase = EnginePhase::Active;
                    self.start_features(doc, messenger);
                } else if ticks_waited + 1 >= HOST_TIMEOUT_TICKS {
                    info!("timed out waiting for host");
                    self.phase = EnginePhase::TimedOut;
                } else {
                    self.phase = EnginePhase::WaitingForHost {
                        ticks_waited: ticks_waited + 1,
                    };
                }
            }
            EnginePhase::Active => self.pump(doc, messenger),
        }
    }

    fn pump(&mut self, doc: &mut Document, messenger: &mut Messenger) {
        if self.phase != EnginePhase::Active {
            return;
        }

        if let Some(watch) = self.image_watch {
            let records = doc.take_records(watch).unwrap_or_default();
            for record in records {
                for added in record.added {
                    if doc.exists(added) {
                        self.process_images(doc, added, messenger);
                    }
                }
            }
        }

        if let Some(watch) = self.message_watch {
            let records = doc.take_records(watch).unwrap_or_default();
            for _record in records {
                self.update_message_count(doc);
            }
        }
    }

    fn on_message(
        &mut self,
        doc: &mut Document,
        messenger: &mut Messenger,
        message: &Message,
    ) -> MessageResponse {
        if let Message::SettingsUpdated { settings } = message {
            info!(settings = ?settings, "settings updated");
            self.settings = settings.clone();
            if self.phase == EnginePhase::Active {
                // Restart features under the new settings. Watches are
                // re-subscribed; a badge already on screen stays there
                // even when the statistics display is switched off.
                self.start_features(doc, messenger);
            }
        }
        MessageResponse::ok()
    }

    fn handle_hover(&mut self, doc: &mut Document, node: NodeId, entering: bool) {
        // Hover handlers only exist on processed elements.
        if doc.get_attr(node, PROCESSED_MARKER) != Some("true") {
            return;
        }
        if entering {
            if self.settings.image_preview_enabled {
                let _ = doc.add_class(node, HIGHLIGHT_CLASS);
            }
        } else {
            let _ = doc.remove_class(node, HIGHLIGHT_CLASS);
        }
    }

    fn phase(&self) -> EnginePhase {
        self.phase
    }

    fn settings(&self) -> &ExtensionSettings {
        &self.settings
    }

    fn stats(&self) -> UsageStats {
        self.stats
    }
}
