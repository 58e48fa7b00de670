//! Property-based tests for image classification.
//!
//! These tests verify that for any mix of matching and non-matching
//! insertions, the image counter equals the number of matching elements,
//! each matching element is marked exactly once, and re-pumping never
//! inflates the count.

use std::sync::Arc;

use proptest::prelude::*;

use chatlens::database::Database;
use chatlens::dom::{Document, Element, Selector};
use chatlens::engine::observer_engine::{
    EnginePhase, ObserverEngine, ObserverEngineTrait, PROCESSED_MARKER,
};
use chatlens::services::messenger::Messenger;
use chatlens::services::storage_service::{StorageService, StorageServiceTrait};

/// Strategy for one inserted element: a matching image (by any of the
/// classifier's patterns) or an unrelated node.
fn arb_insertion() -> impl Strategy<Value = (Element, bool)> {
    prop_oneof![
        "[a-f0-9]{6}".prop_map(|s| (Element::new("img").attr("src", &format!("blob:{}", s)), true)),
        "[a-z0-9]{4,10}".prop_map(|s| {
            (
                Element::new("img")
                    .attr("src", &format!("https://web.whatsapp.com/{}.jpg", s)),
                true,
            )
        }),
        Just((Element::new("div").attr("data-testid", "image-thumb"), true)),
        Just((Element::new("img").class("media-image"), true)),
        Just((Element::new("img").class("message-media"), true)),
        "[a-z]{1,12}".prop_map(|s| (Element::new("span").text(&s), false)),
        Just((
            Element::new("img").attr("src", "https://elsewhere.example/x.png"),
            false,
        )),
    ]
}

fn activated() -> (ObserverEngine, Arc<StorageService>, Document, Messenger) {
    let db = Arc::new(Database::open_in_memory().expect("in-memory database"));
    let storage = Arc::new(StorageService::new(db));
    let mut engine = ObserverEngine::new(storage.clone());
    let mut doc = Document::new();
    let mut messenger = Messenger::new();
    doc.append_child(doc.body(), &Element::new("div").attr("id", "main"))
        .expect("insert host marker");
    engine.init();
    engine.tick(&mut doc, &mut messenger);
    assert_eq!(engine.phase(), EnginePhase::Active);
    (engine, storage, doc, messenger)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    // The counter equals the number of matching insertions, regardless of
    // how they interleave with unrelated nodes, and every matching element
    // carries the processed marker.
    #[test]
    fn counter_equals_matching_insertions(
        insertions in proptest::collection::vec(arb_insertion(), 0..15),
    ) {
        let (mut engine, storage, mut doc, mut messenger) = activated();
        let main = doc
            .query_first(doc.body(), &Selector::id("main"))
            .expect("host container");

        let expected = insertions.iter().filter(|(_, matches)| *matches).count() as u64;
        for (element, _) in &insertions {
            doc.append_child(main, element).expect("insert");
        }
        engine.pump(&mut doc, &mut messenger);

        prop_assert_eq!(engine.stats().total_images, expected);
        prop_assert_eq!(storage.get_stats().expect("get_stats").total_images, expected);

        let marked = doc.query_all(
            doc.body(),
            &Selector::attr_equals(None, PROCESSED_MARKER, "true"),
        );
        prop_assert_eq!(marked.len() as u64, expected);
    }

    // Pumping again with no new mutations never changes the counter.
    #[test]
    fn repeated_pumps_are_idempotent(
        insertions in proptest::collection::vec(arb_insertion(), 0..10),
    ) {
        let (mut engine, _storage, mut doc, mut messenger) = activated();
        let main = doc
            .query_first(doc.body(), &Selector::id("main"))
            .expect("host container");

        for (element, _) in &insertions {
            doc.append_child(main, element).expect("insert");
        }
        engine.pump(&mut doc, &mut messenger);
        let after_first = engine.stats().total_images;

        engine.pump(&mut doc, &mut messenger);
        engine.pump(&mut doc, &mut messenger);
        prop_assert_eq!(engine.stats().total_images, after_first);
    }
}
