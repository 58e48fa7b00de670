//! Minimal selector matching for ChatLens.
//!
//! Covers exactly the selector forms the classifier patterns and host
//! markers need: a tag name, `tag[attr="v"]`, `tag[attr*="v"]`,
//! `tag.class`, `tag[class*="v"]`, and `#id`. Matching is against a single
//! element; document-order queries live on `Document::query_all`.

use super::element::ElementData;

/// A single selector pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// `tag` — any element with this tag name.
    Tag(String),
    /// `tag[attr="value"]` — exact attribute match; `tag` optional.
    AttrEquals {
        tag: Option<String>,
        attr: String,
        value: String,
    },
    /// `tag[attr*="needle"]` — attribute value contains substring.
    AttrContains {
        tag: Option<String>,
        attr: String,
        needle: String,
    },
    /// `tag.class` — element carries the class.
    Class { tag: Option<String>, class: String },
    /// `tag[class*="needle"]` — any class name contains the substring.
    ClassContains { tag: Option<String>, needle: String },
    /// `#id` — element with `id` attribute equal to the value.
    Id(String),
}

impl Selector {
    pub fn tag(tag: &str) -> Self {
        Selector::Tag(tag.to_string())
    }

    pub fn attr_equals(tag: Option<&str>, attr: &str, value: &str) -> Self {
        Selector::AttrEquals {
            tag: tag.map(str::to_string),
            attr: attr.to_string(),
            value: value.to_string(),
        }
    }

    pub fn attr_contains(tag: Option<&str>, attr: &str, needle: &str) -> Self {
        Selector::AttrContains {
            tag: tag.map(str::to_string),
            attr: attr.to_string(),
            needle: needle.to_string(),
        }
    }

    pub fn class(tag: Option<&str>, class: &str) -> Self {
        Selector::Class {
            tag: tag.map(str::to_string),
            class: class.to_string(),
        }
    }

    pub fn class_contains(tag: Option<&str>, needle: &str) -> Self {
        Selector::ClassContains {
            tag: tag.map(str::to_string),
            needle: needle.to_string(),
        }
    }

    pub fn id(id: &str) -> Self {
        Selector::Id(id.to_string())
    }

    /// Whether the selector matches a single element.
    pub fn matches(&self, el: &ElementData) -> bool {
        fn tag_ok(tag: &Option<String>, el: &ElementData) -> bool {
            tag.as_deref().map_or(true, |t| el.tag == t)
        }

        match self {
            Selector::Tag(tag) => el.tag == *tag,
            Selector::AttrEquals { tag, attr, value } => {
                tag_ok(tag, el) && el.attrs.get(attr).map_or(false, |v| v == value)
            }
            Selector::AttrContains { tag, attr, needle } => {
                tag_ok(tag, el) && el.attrs.get(attr).map_or(false, |v| v.contains(needle))
            }
            Selector::Class { tag, class } => tag_ok(tag, el) && el.classes.contains(class),
            Selector::ClassContains { tag, needle } => {
                tag_ok(tag, el) && el.classes.iter().any(|c| c.contains(needle))
            }
            Selector::Id(id) => el.attrs.get("id").map_or(false, |v| v == id),
        }
    }
}
