// ChatLens document model
// A simulated live element tree: blueprints, the arena-backed document with
// mutation subscriptions, and the minimal selector language.

pub mod document;
pub mod element;
pub mod selector;

pub use document::{Document, MutationRecord, NodeId, ObserverId};
pub use element::Element;
pub use selector::Selector;
