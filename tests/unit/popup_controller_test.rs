//! Unit tests for the popup controller: view-state loading, auto-save
//! toggles, banners and their expiry, and stats reset.

use std::sync::Arc;

use chatlens::database::Database;
use chatlens::services::messenger::{Messenger, MessengerTrait};
use chatlens::services::popup_controller::{
    BannerKind, PopupController, PopupControllerTrait, BANNER_TICKS,
};
use chatlens::services::storage_service::{StorageService, StorageServiceTrait};
use chatlens::types::message::{Context, Message};
use chatlens::types::settings::{ExtensionSettings, SettingToggle};

fn setup() -> (PopupController, Arc<StorageService>, Arc<Database>, Messenger) {
    let db = Arc::new(Database::open_in_memory().unwrap());
    let storage = Arc::new(StorageService::new(db.clone()));
    let popup = PopupController::new(storage.clone());
    (popup, storage, db, Messenger::new())
}

#[test]
fn test_open_loads_persisted_state() {
    let (mut popup, storage, _db, _m) = setup();
    storage
        .set_settings(&ExtensionSettings {
            stats_enabled: false,
            image_preview_enabled: true,
            auto_save_enabled: true,
        })
        .unwrap();
    storage.set_total_messages(42).unwrap();
    storage.set_total_images(7).unwrap();

    popup.open();

    assert!(!popup.settings().stats_enabled);
    assert!(popup.settings().auto_save_enabled);
    assert_eq!(popup.displayed_stats().total_messages, 42);
    assert_eq!(popup.displayed_stats().total_images, 7);
}

#[test]
fn test_open_on_empty_store_shows_defaults() {
    let (mut popup, _storage, _db, _m) = setup();
    popup.open();
    assert_eq!(*popup.settings(), ExtensionSettings::default());
    assert_eq!(popup.displayed_stats().total_messages, 0);
}

#[test]
fn test_toggle_saves_immediately_and_notifies() {
    let (mut popup, storage, _db, mut m) = setup();
    popup.open();

    popup.set_toggle(&mut m, SettingToggle::ImagePreview, false);

    assert!(!storage.get_settings().unwrap().image_preview_enabled);
    let envelopes = m.drain();
    assert_eq!(envelopes.len(), 1);
    assert_eq!(envelopes[0].from, Context::Popup);
    match &envelopes[0].message {
        Message::SettingsUpdated { settings } => assert!(!settings.image_preview_enabled),
        other => panic!("expected settingsUpdated, got {:?}", other),
    }

    let banner = popup.banner().expect("banner after save");
    assert_eq!(banner.text, "Settings saved");
    assert_eq!(banner.kind, BannerKind::Success);
}

#[test]
fn test_each_toggle_maps_to_its_field() {
    let (mut popup, storage, _db, mut m) = setup();
    popup.open();

    popup.set_toggle(&mut m, SettingToggle::Stats, false);
    popup.set_toggle(&mut m, SettingToggle::AutoSave, true);

    let saved = storage.get_settings().unwrap();
    assert!(!saved.stats_enabled);
    assert!(saved.image_preview_enabled);
    assert!(saved.auto_save_enabled);
}

#[test]
fn test_banner_expires_after_its_ticks() {
    let (mut popup, _storage, _db, mut m) = setup();
    popup.open();
    popup.save(&mut m);
    assert!(popup.banner().is_some());

    for _ in 0..BANNER_TICKS {
        popup.tick();
    }
    assert!(popup.banner().is_none());
}

#[test]
fn test_newer_banner_replaces_older() {
    let (mut popup, _storage, _db, mut m) = setup();
    popup.open();
    popup.save(&mut m);
    popup.tick();
    popup.reset_stats();

    // The replacement gets a fresh lifetime.
    assert_eq!(popup.banner().unwrap().text, "Statistics reset");
    popup.tick();
    assert!(popup.banner().is_some());
    popup.tick();
    assert!(popup.banner().is_none());
}

#[test]
fn test_save_failure_shows_error_banner_and_skips_notify() {
    let (mut popup, _storage, db, mut m) = setup();
    popup.open();
    db.connection().execute("DROP TABLE sync_store", []).unwrap();

    popup.save(&mut m);

    let banner = popup.banner().expect("banner after failed save");
    assert_eq!(banner.kind, BannerKind::Error);
    assert_eq!(banner.text, "Error: settings not saved");
    assert_eq!(m.pending(), 0);
}

#[test]
fn test_reset_stats_zeroes_counters_and_display() {
    let (mut popup, storage, _db, _m) = setup();
    storage.set_total_messages(10).unwrap();
    storage.set_total_images(5).unwrap();
    popup.open();

    popup.reset_stats();

    assert_eq!(storage.get_stats().unwrap().total_messages, 0);
    assert_eq!(storage.get_stats().unwrap().total_images, 0);
    assert_eq!(popup.displayed_stats().total_messages, 0);
    assert_eq!(popup.banner().unwrap().text, "Statistics reset");
}

#[test]
fn test_reset_failure_shows_error_banner() {
    let (mut popup, _storage, db, _m) = setup();
    popup.open();
    db.connection().execute("DROP TABLE local_store", []).unwrap();

    popup.reset_stats();

    let banner = popup.banner().expect("banner after failed reset");
    assert_eq!(banner.kind, BannerKind::Error);
    assert_eq!(banner.text, "Error: statistics not reset");
}

#[test]
fn test_update_stats_message_refreshes_display() {
    let (mut popup, storage, _db, _m) = setup();
    popup.open();
    assert_eq!(popup.displayed_stats().total_images, 0);

    storage.set_total_images(3).unwrap();
    let response = popup.on_message(&Message::UpdateStats);

    assert!(response.success);
    assert_eq!(popup.displayed_stats().total_images, 3);
}

#[test]
fn test_unrelated_messages_leave_display_alone() {
    let (mut popup, storage, _db, _m) = setup();
    popup.open();
    storage.set_total_images(3).unwrap();

    let response = popup.on_message(&Message::DownloadImage {
        image_url: "blob:x".to_string(),
    });

    assert!(response.success);
    assert_eq!(popup.displayed_stats().total_images, 0);
}
