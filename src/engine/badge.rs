//! Floating statistics badge shown on the chat page.

use crate::dom::{Document, Element, NodeId, Selector};

/// Class carried by the badge element.
pub const BADGE_CLASS: &str = "chatlens-stats-badge";

/// Finds the current badge element, if one is attached.
pub fn find(doc: &Document) -> Option<NodeId> {
    doc.query_first(doc.body(), &Selector::class(None, BADGE_CLASS))
}

/// Renders the badge with the given image count, replacing any existing
/// badge element.
pub fn render(doc: &mut Document, total_images: u64) -> Option<NodeId> {
    if let Some(existing) = find(doc) {
        let _ = doc.remove_node(existing);
    }
    let badge = Element::new("div")
        .class(BADGE_CLASS)
        .attr("title", "ChatLens statistics")
        .text(&format!("{} images", total_images));
    doc.append_child(doc.body(), &badge).ok()
}
