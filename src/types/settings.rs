use serde::{Deserialize, Serialize};

/// User-facing feature toggles, stored in the Sync scope.
///
/// Saved wholesale by the popup; never partially updated. Wire names match
/// the persisted key names (`statsEnabled`, `imagePreviewEnabled`,
/// `autoSaveEnabled`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionSettings {
    /// Show the floating statistics badge on the chat page.
    pub stats_enabled: bool,
    /// Highlight images on hover.
    pub image_preview_enabled: bool,
    /// Auto-save attachments (reserved; surfaced by the popup UI only).
    pub auto_save_enabled: bool,
}

impl Default for ExtensionSettings {
    fn default() -> Self {
        Self {
            stats_enabled: true,
            image_preview_enabled: true,
            auto_save_enabled: false,
        }
    }
}

/// Which popup toggle a change applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingToggle {
    Stats,
    ImagePreview,
    AutoSave,
}
