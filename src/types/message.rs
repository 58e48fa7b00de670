use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::MessengerError;
use super::settings::ExtensionSettings;

/// The three extension contexts connected by the messenger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Context {
    Background,
    Content,
    Popup,
}

impl Context {
    /// All contexts, in delivery order.
    pub const ALL: [Context; 3] = [Context::Background, Context::Content, Context::Popup];
}

/// Cross-context message, tagged by its `action` field on the wire.
///
/// - `{"action":"updateStats"}` — fire-and-forget refresh hint.
/// - `{"action":"downloadImage","imageUrl":...}` — background-side download.
/// - `{"action":"settingsUpdated","settings":{...}}` — push new settings
///   into the content context, causing a feature restart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Message {
    UpdateStats,
    #[serde(rename_all = "camelCase")]
    DownloadImage { image_url: String },
    SettingsUpdated { settings: ExtensionSettings },
}

/// Parse a raw JSON message, distinguishing unknown actions from malformed
/// payloads so the caller can log-and-acknowledge unknown actions per the
/// protocol contract.
pub fn parse_message(value: &Value) -> Result<Message, MessengerError> {
    match serde_json::from_value::<Message>(value.clone()) {
        Ok(msg) => Ok(msg),
        Err(e) => {
            let action = value
                .get("action")
                .and_then(|a| a.as_str())
                .unwrap_or("<missing>");
            match action {
                "updateStats" | "downloadImage" | "settingsUpdated" => {
                    Err(MessengerError::MalformedMessage(e.to_string()))
                }
                other => Err(MessengerError::UnknownAction(other.to_string())),
            }
        }
    }
}

/// Acknowledgement returned by every message handler.
///
/// Per the protocol, handlers answer `{"success":true}` regardless of
/// whether any work was actually performed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub success: bool,
}

impl MessageResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
