//! Property-based tests for settings and stats persistence.
//!
//! These tests verify that any combination of setting toggles and counter
//! values survives a write/read cycle through the store, and that the wire
//! encoding of cross-context messages round-trips.

use std::sync::Arc;

use proptest::prelude::*;

use chatlens::database::Database;
use chatlens::services::storage_service::{StorageService, StorageServiceTrait};
use chatlens::types::message::Message;
use chatlens::types::settings::ExtensionSettings;

/// Strategy for generating arbitrary settings records.
fn arb_settings() -> impl Strategy<Value = ExtensionSettings> {
    (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
        |(stats_enabled, image_preview_enabled, auto_save_enabled)| ExtensionSettings {
            stats_enabled,
            image_preview_enabled,
            auto_save_enabled,
        },
    )
}

/// Strategy for generating image URLs the download action might carry.
fn arb_image_url() -> impl Strategy<Value = String> {
    prop_oneof![
        "blob:[a-f0-9]{8}",
        "https://web\\.whatsapp\\.com/[a-z0-9]{4,12}\\.jpg",
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    // Any settings record written through the store reads back unchanged.
    #[test]
    fn settings_survive_store_roundtrip(settings in arb_settings()) {
        let db = Arc::new(Database::open_in_memory().expect("in-memory database"));
        let storage = StorageService::new(db);

        storage.set_settings(&settings).expect("set_settings");
        let loaded = storage.get_settings().expect("get_settings");
        prop_assert_eq!(loaded, settings);
    }

    // Counter writes are independent per key: writing one counter never
    // disturbs the other.
    #[test]
    fn counters_survive_independent_writes(
        messages in 0u64..1_000_000,
        images in 0u64..1_000_000,
    ) {
        let db = Arc::new(Database::open_in_memory().expect("in-memory database"));
        let storage = StorageService::new(db);

        storage.set_total_messages(messages).expect("set_total_messages");
        storage.set_total_images(images).expect("set_total_images");
        storage.set_total_messages(messages).expect("rewrite");

        let stats = storage.get_stats().expect("get_stats");
        prop_assert_eq!(stats.total_messages, messages);
        prop_assert_eq!(stats.total_images, images);
    }

    // The tagged message encoding round-trips for every variant.
    #[test]
    fn messages_roundtrip_through_json(
        settings in arb_settings(),
        url in arb_image_url(),
    ) {
        for message in [
            Message::UpdateStats,
            Message::DownloadImage { image_url: url },
            Message::SettingsUpdated { settings },
        ] {
            let json = serde_json::to_value(&message).expect("serialize");
            prop_assert!(json["action"].is_string());
            let back: Message = serde_json::from_value(json).expect("deserialize");
            prop_assert_eq!(back, message);
        }
    }
}
