use serde::{Deserialize, Serialize};

/// Usage counters, stored in the Local scope.
///
/// Both counters are recomputed from a live census of the document, not
/// accumulated. Wire names match the persisted key names (`totalMessages`,
/// `totalImages`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UsageStats {
    /// Elements currently matching the message-container pattern.
    pub total_messages: u64,
    /// Elements bearing the processed marker as of the last image recount.
    pub total_images: u64,
}
