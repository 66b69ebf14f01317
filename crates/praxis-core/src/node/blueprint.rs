//! Blueprint types
//!
//! Blueprints are the content nodes archetype authors assemble: rules,
//! guidelines and the generic sections (mission, purpose, input, ...). Each one
//! lowers into a [`CompiledNode`] through the [`Blueprint`] trait.
//!
//! Every blueprint's `text` setter appends; calling it twice keeps both lines.
//!
//! # Examples
//!
//! ```
//! use praxis_core::node::{Blueprint, Rule};
//! use praxis_core::types::Severity;
//!
//! let rule = Rule::new("no-guessing")
//!     .text("Never invent file paths.")
//!     .text("Search first.")
//!     .severity(Severity::Critical)
//!     .why("Invented paths break the build.");
//!
//! let node = rule.into_node();
//! assert_eq!(node.text(), Some("Never invent file paths.\nSearch first."));
//! ```

use serde_json::Value;

use super::{element, CompiledNode, TextBuffer};
use crate::types::Severity;

/// Anything that lowers into a compiled node
pub trait Blueprint {
    fn element(&self) -> &str;

    fn id(&self) -> Option<&str>;

    fn into_node(self) -> CompiledNode;
}

impl Blueprint for CompiledNode {
    fn element(&self) -> &str {
        &self.element
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn into_node(self) -> CompiledNode {
        self
    }
}

/// A rule: id, severity, text and optional rationale
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    id: String,
    text: TextBuffer,
    severity: Severity,
    why: Option<String>,
    on_violation: Option<String>,
}

impl Rule {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: TextBuffer::new(),
            severity: Severity::default(),
            why: None,
            on_violation: None,
        }
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text.push(text);
        self
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn critical(self) -> Self {
        self.severity(Severity::Critical)
    }

    pub fn high(self) -> Self {
        self.severity(Severity::High)
    }

    pub fn medium(self) -> Self {
        self.severity(Severity::Medium)
    }

    pub fn low(self) -> Self {
        self.severity(Severity::Low)
    }

    pub fn why(mut self, why: impl Into<String>) -> Self {
        self.why = Some(why.into());
        self
    }

    pub fn on_violation(mut self, action: impl Into<String>) -> Self {
        self.on_violation = Some(action.into());
        self
    }

    pub fn severity_level(&self) -> Severity {
        self.severity
    }

    pub fn text_content(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

impl Blueprint for Rule {
    fn element(&self) -> &str {
        element::RULE
    }

    fn id(&self) -> Option<&str> {
        Some(&self.id)
    }

    fn into_node(self) -> CompiledNode {
        let mut node = CompiledNode::new(element::RULE).with_id(self.id);
        node.text = self.text;
        node.set_attribute("severity", self.severity);
        if let Some(why) = self.why {
            node.add_child(CompiledNode::new(element::WHY).with_text(why));
        }
        if let Some(action) = self.on_violation {
            node.add_child(CompiledNode::new(element::ON_VIOLATION).with_text(action));
        }
        node
    }
}

/// One ordered phase of a guideline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phase {
    pub text: String,
}

/// A guideline example, optionally labelled with a key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Example {
    pub key: Option<String>,
    pub value: String,
}

/// A guideline: goal, free text lines, ordered phases and examples
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Guideline {
    id: String,
    text: TextBuffer,
    goal: Option<String>,
    lines: Vec<String>,
    phases: Vec<Phase>,
    examples: Vec<Example>,
}

impl Guideline {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text.push(text);
        self
    }

    pub fn goal(mut self, goal: impl Into<String>) -> Self {
        self.goal = Some(goal.into());
        self
    }

    /// A bullet line
    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    pub fn phase(mut self, text: impl Into<String>) -> Self {
        self.phases.push(Phase { text: text.into() });
        self
    }

    pub fn example(mut self, value: impl Into<String>) -> Self {
        self.examples.push(Example {
            key: None,
            value: value.into(),
        });
        self
    }

    pub fn keyed_example(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.examples.push(Example {
            key: Some(key.into()),
            value: value.into(),
        });
        self
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    pub fn examples(&self) -> &[Example] {
        &self.examples
    }
}

impl Blueprint for Guideline {
    fn element(&self) -> &str {
        element::GUIDELINE
    }

    fn id(&self) -> Option<&str> {
        Some(&self.id)
    }

    fn into_node(self) -> CompiledNode {
        let mut node = CompiledNode::new(element::GUIDELINE).with_id(self.id);
        node.text = self.text;
        if let Some(goal) = self.goal {
            node.set_attribute("goal", goal);
        }
        for line in self.lines {
            node.add_child(CompiledNode::new(element::TEXT).with_text(line));
        }
        for (step, phase) in self.phases.into_iter().enumerate() {
            node.add_child(
                CompiledNode::new(element::PHASE)
                    .with_attribute("step", step + 1)
                    .with_text(phase.text),
            );
        }
        for example in self.examples {
            let mut child = CompiledNode::new(element::EXAMPLE).with_text(example.value);
            if let Some(key) = example.key {
                child.set_attribute("key", key);
            }
            node.add_child(child);
        }
        node
    }
}

/// Generic wrapper section: mission, purpose, input, execute, ...
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Section {
    node: CompiledNode,
}

impl Section {
    pub fn new(element: impl Into<String>) -> Self {
        Self {
            node: CompiledNode::new(element),
        }
    }

    pub fn mission() -> Self {
        Self::new(element::MISSION)
    }

    pub fn purpose() -> Self {
        Self::new(element::PURPOSE)
    }

    pub fn input() -> Self {
        Self::new(element::INPUT)
    }

    pub fn instructions() -> Self {
        Self::new(element::INSTRUCTIONS)
    }

    pub fn context() -> Self {
        Self::new(element::CONTEXT)
    }

    pub fn execute() -> Self {
        Self::new(element::EXECUTE)
    }

    pub fn provides() -> Self {
        Self::new(element::PROVIDES)
    }

    pub fn output() -> Self {
        Self::new(element::OUTPUT)
    }

    /// Collection of guideline blueprints
    pub fn guidelines() -> Self {
        Self::new(element::GUIDELINES)
    }

    /// Collection of critical rules rendered as one flat section
    pub fn iron_rules() -> Self {
        Self::new(element::IRON_RULES)
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.node.id = Some(id.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.node.set_text(text);
        self
    }

    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.node.set_attribute(key, value);
        self
    }

    pub fn child(mut self, child: impl Blueprint) -> Self {
        self.node.add_child(child.into_node());
        self
    }

    /// Render as `<element/>` when nothing ends up inside
    pub fn single(mut self) -> Self {
        self.node.self_closing = true;
        self
    }
}

impl Blueprint for Section {
    fn element(&self) -> &str {
        &self.node.element
    }

    fn id(&self) -> Option<&str> {
        self.node.id.as_deref()
    }

    fn into_node(self) -> CompiledNode {
        self.node
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_lowering() {
        let node = Rule::new("r1")
            .text("A")
            .text("B")
            .critical()
            .why("reason")
            .on_violation("stop")
            .into_node();

        assert_eq!(node.element, "rule");
        assert_eq!(node.id.as_deref(), Some("r1"));
        assert_eq!(node.text(), Some("A\nB"));
        assert_eq!(node.attribute_str("severity"), Some("critical"));
        assert_eq!(node.children[0].element, "why");
        assert_eq!(node.children[1].text(), Some("stop"));
    }

    #[test]
    fn test_rule_default_severity() {
        let rule = Rule::new("r");
        assert_eq!(rule.severity_level(), Severity::High);
        assert_eq!(rule.text_content(), None);

        let rule = rule.low().text("A").text("B");
        assert_eq!(rule.severity_level(), Severity::Low);
        assert_eq!(rule.text_content(), Some("A\nB"));
    }

    #[test]
    fn test_guideline_lowering_orders_children() {
        let node = Guideline::new("task-flow")
            .text("How tasks move")
            .goal("Keep status accurate")
            .line("Check first")
            .phase("Read")
            .phase("Write")
            .example("plain")
            .keyed_example("good", "mark completed")
            .into_node();

        let elements: Vec<_> = node.children.iter().map(|c| c.element.as_str()).collect();
        assert_eq!(elements, vec!["text", "phase", "phase", "example", "example"]);
        assert_eq!(node.attribute_str("goal"), Some("Keep status accurate"));
        assert_eq!(node.children[2].attribute("step"), Some(&Value::from(2)));
        assert_eq!(node.children[4].attribute_str("key"), Some("good"));
    }

    #[test]
    fn test_section_builder() {
        let node = Section::purpose()
            .id("main")
            .text("first")
            .text("second")
            .child(Section::guidelines().child(Guideline::new("g")))
            .into_node();
        assert_eq!(node.element, "purpose");
        assert_eq!(node.text(), Some("first\nsecond"));
        assert_eq!(node.children[0].children[0].element, "guideline");
    }
}
