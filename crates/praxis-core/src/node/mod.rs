//! Node Model
//!
//! The plain tree every renderer consumes ([`CompiledNode`]), the blueprint
//! types archetype authors build it from, and the per-archetype container
//! ([`ArchetypeNode`]) that the build lifecycle fills in.

pub mod archetype;
pub mod blueprint;

pub use archetype::ArchetypeNode;
pub use blueprint::{Blueprint, Example, Guideline, Phase, Rule, Section};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Element names with special handling somewhere in the pipeline
pub mod element {
    pub const META: &str = "meta";
    pub const METADATA: &str = "metadata";
    pub const IRON_RULES: &str = "iron_rules";
    pub const RULE: &str = "rule";
    pub const WHY: &str = "why";
    pub const ON_VIOLATION: &str = "on_violation";
    pub const GUIDELINES: &str = "guidelines";
    pub const GUIDELINE: &str = "guideline";
    pub const TEXT: &str = "text";
    pub const EXAMPLE: &str = "example";
    pub const PHASE: &str = "phase";
    pub const PURPOSE: &str = "purpose";
    pub const MISSION: &str = "mission";
    pub const EXECUTE: &str = "execute";
    pub const PROVIDES: &str = "provides";
    pub const INPUT: &str = "input";
    pub const INSTRUCTIONS: &str = "instructions";
    pub const CONTEXT: &str = "context";
    pub const OUTPUT: &str = "output";

    /// Wrappers whose nested `guidelines` are re-emitted after them
    pub const GUIDELINE_HOSTS: [&str; 4] = [PURPOSE, EXECUTE, MISSION, PROVIDES];
}

/// Append-only text.
///
/// Every `push` adds a new line; nothing ever replaces what is already there.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextBuffer(Option<String>);

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, text: impl Into<String>) {
        let text = text.into();
        match &mut self.0 {
            Some(existing) => {
                existing.push('\n');
                existing.push_str(&text);
            }
            None => self.0 = Some(text),
        }
    }

    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }
}

impl From<Option<String>> for TextBuffer {
    fn from(text: Option<String>) -> Self {
        Self(text)
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// A node of the plain tree produced by the merger.
///
/// An empty `element` renders as nothing in every format.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CompiledNode {
    pub element: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "TextBuffer::is_empty")]
    text: TextBuffer,

    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub attributes: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<CompiledNode>,

    #[serde(default, rename = "single", skip_serializing_if = "is_false")]
    pub self_closing: bool,
}

impl CompiledNode {
    pub fn new(element: impl Into<String>) -> Self {
        Self {
            element: element.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.set_text(text);
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_attribute(key, value);
        self
    }

    pub fn with_child(mut self, child: CompiledNode) -> Self {
        self.add_child(child);
        self
    }

    /// Flag the node as self-closing when it ends up without content
    pub fn single(mut self) -> Self {
        self.self_closing = true;
        self
    }

    pub fn add_child(&mut self, child: CompiledNode) {
        self.children.push(child);
    }

    /// Append a line of text
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text.push(text);
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Set an attribute, overwriting any previous value under the same key
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.attributes.insert(key.into(), value.into());
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// String-valued attribute
    pub fn attribute_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }

    pub fn mark_self_closing_if_empty(&mut self) {
        if self.text.is_empty() && self.children.is_empty() {
            self.self_closing = true;
        }
    }

    pub fn has_content(&self) -> bool {
        !self.text.is_empty() || !self.children.is_empty()
    }

    /// Depth-first search for every node with the given element
    pub fn find_all<'a>(&'a self, element: &str) -> Vec<&'a CompiledNode> {
        let mut found = Vec::new();
        self.collect(element, &mut found);
        found
    }

    fn collect<'a>(&'a self, element: &str, found: &mut Vec<&'a CompiledNode>) {
        if self.element == element {
            found.push(self);
        }
        for child in &self.children {
            child.collect(element, found);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_is_append_only() {
        let mut node = CompiledNode::new("mission");
        node.set_text("A");
        node.set_text("B");
        assert_eq!(node.text(), Some("A\nB"));
    }

    #[test]
    fn test_attribute_overwrites_by_key() {
        let mut node = CompiledNode::new("meta");
        node.set_attribute("model", "haiku");
        node.set_attribute("color", "blue");
        node.set_attribute("model", "opus");
        assert_eq!(node.attribute_str("model"), Some("opus"));
        let keys: Vec<_> = node.attributes.keys().cloned().collect();
        assert_eq!(keys, vec!["model", "color"]);
    }

    #[test]
    fn test_mark_self_closing_if_empty() {
        let mut empty = CompiledNode::new("input");
        empty.mark_self_closing_if_empty();
        assert!(empty.self_closing);

        let mut filled = CompiledNode::new("input").with_text("x");
        filled.mark_self_closing_if_empty();
        assert!(!filled.self_closing);
    }

    #[test]
    fn test_serialization_skips_empty_fields() {
        let node = CompiledNode::new("rule")
            .with_id("r1")
            .with_text("Do it")
            .with_attribute("severity", "high");
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(
            value,
            json!({"element": "rule", "id": "r1", "text": "Do it", "attributes": {"severity": "high"}})
        );
    }

    #[test]
    fn test_find_all() {
        let tree = CompiledNode::new("system")
            .with_child(CompiledNode::new("rule").with_id("a"))
            .with_child(CompiledNode::new("iron_rules").with_child(CompiledNode::new("rule").with_id("b")));
        let ids: Vec<_> = tree.find_all("rule").iter().filter_map(|n| n.id.clone()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
