use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

/// A detached element blueprint: what a node looks like before it is
/// attached to a [`Document`](super::document::Document).
///
/// Serde-serializable so the driver binary can accept elements as JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Element {
    pub tag: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub attrs: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub classes: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Self::default()
        }
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn class(mut self, class: &str) -> Self {
        self.classes.insert(class.to_string());
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }
}

/// An element materialized inside a document arena.
#[derive(Debug, Clone)]
pub struct ElementData {
    pub tag: String,
    pub attrs: HashMap<String, String>,
    pub classes: BTreeSet<String>,
    pub text: String,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
}

impl ElementData {
    pub fn from_blueprint(el: &Element, parent: Option<usize>) -> Self {
        Self {
            tag: el.tag.clone(),
            attrs: el.attrs.clone(),
            classes: el.classes.clone(),
            text: el.text.clone(),
            parent,
            children: Vec::new(),
        }
    }
}
