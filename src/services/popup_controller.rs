//! Popup controller for ChatLens.
//!
//! View-model for the popup panel: three setting toggles, the two stats
//! read-outs, and a transient success/error banner. Rendering is the host
//! UI's job; the controller owns the state and the store/messenger
//! round-trips.

use std::sync::Arc;

use tracing::{error, info};

use crate::services::messenger::{Messenger, MessengerTrait};
use crate::services::storage_service::{StorageService, StorageServiceTrait};
use crate::types::message::{Context, Message, MessageResponse};
use crate::types::settings::{ExtensionSettings, SettingToggle};
use crate::types::stats::UsageStats;

/// Ticks a banner stays visible.
pub const BANNER_TICKS: u8 = 2;

/// Banner flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
}

/// A transient confirmation banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub text: String,
    pub kind: BannerKind,
    ticks_left: u8,
}

/// Trait defining the popup controller interface.
pub trait PopupControllerTrait {
    /// Panel opened: load settings and stats into the view state. Read
    /// failures are logged; defaults are shown.
    fn open(&mut self);
    /// A toggle changed. Every change saves immediately.
    fn set_toggle(&mut self, messenger: &mut Messenger, toggle: SettingToggle, value: bool);
    /// Save button: persist the full settings record and notify the
    /// content context.
    fn save(&mut self, messenger: &mut Messenger);
    /// Reset button: zero both counters and refresh the display.
    fn reset_stats(&mut self);
    /// Advances one time unit; expires the banner.
    fn tick(&mut self);
    /// Cross-context message entry point. Always acknowledges.
    fn on_message(&mut self, message: &Message) -> MessageResponse;
    fn settings(&self) -> &ExtensionSettings;
    fn displayed_stats(&self) -> UsageStats;
    fn banner(&self) -> Option<&Banner>;
}

/// Popup controller implementation.
pub struct PopupController {
    storage: Arc<StorageService>,
    settings: ExtensionSettings,
    stats: UsageStats,
    banner: Option<Banner>,
}

impl PopupController {
    pub fn new(storage: Arc<StorageService>) -> Self {
        Self {
            storage,
            settings: ExtensionSettings::default(),
            stats: UsageStats::default(),
            banner: None,
        }
    }

    fn show_banner(&mut self, text: &str, kind: BannerKind) {
        self.banner = Some(Banner {
            text: text.to_string(),
            kind,
            ticks_left: BANNER_TICKS,
        });
    }

    fn reload_stats(&mut self) {
        match self.storage.get_stats() {
            Ok(stats) => self.stats = stats,
            Err(e) => error!(error = %e, "failed to load stats"),
        }
    }
}

impl PopupControllerTrait for PopupController {
    fn open(&mut self) {
        match self.storage.get_settings() {
            Ok(settings) => self.settings = settings,
            Err(e) => error!(error = %e, "failed to load settings"),
        }
        self.reload_stats();
    }

    fn set_toggle(&mut self, messenger: &mut Messenger, toggle: SettingToggle, value: bool) {
        match toggle {
            SettingToggle::Stats => self.settings.stats_enabled = value,
            SettingToggle::ImagePreview => self.settings.image_preview_enabled = value,
            SettingToggle::AutoSave => self.settings.auto_save_enabled = value,
        }
        self.save(messenger);
    }

    fn save(&mut self, messenger: &mut Messenger) {
        match self.storage.set_settings(&self.settings) {
            Ok(()) => {
                messenger.send(
                    Context::Popup,
                    Message::SettingsUpdated {
                        settings: self.settings.clone(),
                    },
                );
                self.show_banner("Settings saved", BannerKind::Success);
                info!(settings = ?self.settings, "settings saved");
            }
            Err(e) => {
                error!(error = %e, "failed to save settings");
                self.show_banner("Error: settings not saved", BannerKind::Error);
            }
        }
    }

    fn reset_stats(&mut self) {
        match self.storage.reset_stats() {
            Ok(()) => {
                self.reload_stats();
                self.show_banner("Statistics reset", BannerKind::Success);
                info!("statistics reset");
            }
            Err(e) => {
                error!(error = %e, "failed to reset stats");
                self.show_banner("Error: statistics not reset", BannerKind::Error);
            }
        }
    }

    fn tick(&mut self) {
        if let Some(banner) = &mut self.banner {
            banner.ticks_left = banner.ticks_left.saturating_sub(1);
            if banner.ticks_left == 0 {
                self.banner = None;
            }
        }
    }

    fn on_message(&mut self, message: &Message) -> MessageResponse {
        if matches!(message, Message::UpdateStats) {
            self.reload_stats();
        }
        MessageResponse::ok()
    }

    fn settings(&self) -> &ExtensionSettings {
        &self.settings
    }

    fn displayed_stats(&self) -> UsageStats {
        self.stats
    }

    fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }
}
