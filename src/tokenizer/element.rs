//! Raw, untyped elements as produced by the tokenizer

use serde::{Deserialize, Serialize};

/// One element of the source file before any schema is applied.
///
/// Leaf children (elements holding only text) are folded into `fields` in
/// document order, so a repeated leaf such as `<event>` appears once per
/// occurrence. Children that carry their own fields or children stay in
/// `children`. Attributes are stored as fields as well.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawElement {
    pub tag: String,
    pub text: String,
    pub fields: Vec<(String, String)>,
    pub children: Vec<RawElement>,
}

impl RawElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Builder-style helper, mostly for tests
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn with_child(mut self, child: RawElement) -> Self {
        self.children.push(child);
        self
    }

    /// First value of a scalar field
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// All values of a repeated scalar field, in document order
    pub fn values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.fields
            .iter()
            .filter(move |(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|(n, _)| n == name) || self.child(name).is_some()
    }

    pub fn child(&self, name: &str) -> Option<&RawElement> {
        self.children.iter().find(|c| c.tag == name)
    }

    /// All nested children with the given tag, in document order
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a RawElement> + 'a {
        self.children.iter().filter(move |c| c.tag == name)
    }

    /// Names of all scalar fields and nested children, duplicates included
    pub fn member_names(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .map(|(n, _)| n.as_str())
            .chain(self.children.iter().map(|c| c.tag.as_str()))
    }

    /// True when the element holds nothing but (possibly empty) text
    pub fn is_leaf(&self) -> bool {
        self.fields.is_empty() && self.children.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_fields_keep_order() {
        let el = RawElement::new("historical_event_collection")
            .with_field("event", "4")
            .with_field("type", "war")
            .with_field("event", "2");
        assert_eq!(el.values("event").collect::<Vec<_>>(), vec!["4", "2"]);
        assert_eq!(el.field("event"), Some("4"));
        assert_eq!(el.field("name"), None);
    }

    #[test]
    fn test_children_lookup() {
        let el = RawElement::new("historical_figure")
            .with_child(RawElement::new("entity_link").with_field("entity_id", "1"))
            .with_child(RawElement::new("entity_link").with_field("entity_id", "2"));
        assert_eq!(el.children_named("entity_link").count(), 2);
        assert!(el.has_field("entity_link"));
        assert!(!el.is_leaf());
    }
}
