//! Delivery and end-to-end wiring tests: envelope fan-out, the
//! stats-refresh forwarding chain, and a full usage session.

use chatlens::app::App;
use chatlens::dom::{Document, Element};
use chatlens::engine::observer_engine::{EnginePhase, ObserverEngineTrait};
use chatlens::router;
use chatlens::services::messenger::{Envelope, MessengerTrait};
use chatlens::services::popup_controller::PopupControllerTrait;
use chatlens::services::storage_service::StorageServiceTrait;
use chatlens::types::message::{Context, Message};
use chatlens::types::settings::{ExtensionSettings, SettingToggle};

fn envelope(from: Context, message: Message) -> Envelope {
    Envelope {
        id: "test-envelope".to_string(),
        from,
        message,
    }
}

fn blob_image(n: u32) -> Element {
    Element::new("img").attr("src", &format!("blob:img-{}", n))
}

fn msg_container(n: u32) -> Element {
    Element::new("div")
        .attr("data-testid", "msg-container")
        .text(&format!("message {}", n))
}

#[test]
fn test_delivery_skips_the_sender() {
    let mut app = App::open_in_memory().unwrap();
    let mut doc = Document::new();

    let responses = router::deliver(
        &mut app,
        &mut doc,
        &envelope(Context::Content, Message::UpdateStats),
    );

    let targets: Vec<Context> = responses.iter().map(|(c, _)| *c).collect();
    assert_eq!(targets, vec![Context::Background, Context::Popup]);
    assert!(responses.iter().all(|(_, r)| r.success));
}

#[test]
fn test_forwarding_chain_terminates() {
    let mut app = App::open_in_memory().unwrap();
    let mut doc = Document::new();
    app.install();

    // Content announces a stats change; the background forwards it so an
    // open popup refreshes. The forward excludes its sender, so the chain
    // stops after one hop.
    app.messenger.send(Context::Content, Message::UpdateStats);
    let responses = app.pump_messages(&mut doc);

    // Original envelope: background + popup. Forward: content + popup.
    assert_eq!(responses.len(), 4);
    let popup_deliveries = responses
        .iter()
        .filter(|(c, _)| *c == Context::Popup)
        .count();
    assert_eq!(popup_deliveries, 2);
    assert_eq!(app.messenger.pending(), 0);
}

#[test]
fn test_settings_change_propagates_from_popup_to_engine() {
    let mut app = App::open_in_memory().unwrap();
    let mut doc = Document::new();
    app.install();
    doc.append_child(doc.body(), &Element::new("div").attr("id", "main"))
        .unwrap();
    app.startup();
    app.tick(&mut doc);
    assert_eq!(app.engine.phase(), EnginePhase::Active);

    app.popup.open();
    app.popup
        .set_toggle(&mut app.messenger, SettingToggle::ImagePreview, false);
    app.pump_messages(&mut doc);

    assert!(!app.engine.settings().image_preview_enabled);
}

#[test]
fn test_full_session() {
    let mut app = App::open_in_memory().unwrap();
    let mut doc = Document::new();

    // Fresh install writes defaults.
    app.install();
    assert_eq!(app.storage.get_settings().unwrap(), ExtensionSettings::default());

    // The host finishes rendering and the engine activates.
    let main = doc
        .append_child(doc.body(), &Element::new("div").attr("id", "main"))
        .unwrap();
    app.startup();
    app.tick(&mut doc);
    assert_eq!(app.engine.phase(), EnginePhase::Active);

    // Three chat messages arrive.
    for n in 0..3 {
        doc.append_child(main, &msg_container(n)).unwrap();
    }
    app.tick(&mut doc);
    assert_eq!(app.storage.get_stats().unwrap().total_messages, 3);

    // Two images arrive; the popup is open and sees the refresh.
    app.popup.open();
    doc.append_child(main, &blob_image(1)).unwrap();
    doc.append_child(main, &blob_image(2)).unwrap();
    app.tick(&mut doc);
    assert_eq!(app.storage.get_stats().unwrap().total_images, 2);
    assert_eq!(app.popup.displayed_stats().total_images, 2);

    // The user resets the statistics.
    app.popup.reset_stats();
    assert_eq!(app.storage.get_stats().unwrap().total_messages, 0);
    assert_eq!(app.storage.get_stats().unwrap().total_images, 0);
    assert_eq!(app.popup.displayed_stats().total_images, 0);
}
