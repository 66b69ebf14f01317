//! Build scope handed to lifecycle hooks

use serde_json::Value;
use std::rc::Rc;

use crate::config::Variables;
use crate::context::CompileContext;
use crate::error::Result;
use crate::node::{element, ArchetypeNode, Blueprint, CompiledNode};

/// Variable naming the agent runtime, used for model selection
pub const AGENT_VAR: &str = "AGENT";

/// Agent assumed when [`AGENT_VAR`] is unset
pub const DEFAULT_AGENT: &str = "claude";

/// Something an archetype can include: a class name or an already-built node
#[derive(Debug, Clone)]
pub enum IncludeTarget {
    Class(String),
    Node(Rc<ArchetypeNode>),
}

impl From<&str> for IncludeTarget {
    fn from(class: &str) -> Self {
        IncludeTarget::Class(class.to_string())
    }
}

impl From<String> for IncludeTarget {
    fn from(class: String) -> Self {
        IncludeTarget::Class(class)
    }
}

impl From<Rc<ArchetypeNode>> for IncludeTarget {
    fn from(node: Rc<ArchetypeNode>) -> Self {
        IncludeTarget::Node(node)
    }
}

/// The node under construction plus the document's compile context
#[derive(Debug)]
pub struct BuildScope<'a, 'r> {
    node: &'a mut ArchetypeNode,
    cx: &'a mut CompileContext<'r>,
}

impl<'a, 'r> BuildScope<'a, 'r> {
    pub(crate) fn new(node: &'a mut ArchetypeNode, cx: &'a mut CompileContext<'r>) -> Self {
        Self { node, cx }
    }

    pub fn node(&self) -> &ArchetypeNode {
        self.node
    }

    pub fn node_mut(&mut self) -> &mut ArchetypeNode {
        self.node
    }

    pub fn variables(&self) -> &'r Variables {
        self.cx.variables()
    }

    pub fn add(&mut self, child: impl Blueprint) -> &mut Self {
        self.node.add_child(child);
        self
    }

    pub fn set_meta(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.node.set_meta(key, value);
        self
    }

    /// Resolve a variable, with this archetype's metas as local fallback
    pub fn var(&self, name: &str, default: impl Into<Value>) -> Value {
        self.cx
            .variables()
            .var_with_metas(name, self.node.metas(), default)
    }

    /// String-valued variable; non-string values fall back to `default`
    pub fn var_str(&self, name: &str, default: &str) -> String {
        match self.var(name, default) {
            Value::String(s) => s,
            _ => default.to_string(),
        }
    }

    /// Model for this archetype under `category`
    pub fn select_model(&self, category: &str) -> String {
        let agent = self.var_str(AGENT_VAR, DEFAULT_AGENT);
        self.cx
            .variables()
            .select_model(self.node.class(), category, &agent)
    }

    /// Include another archetype. Including the archetype's own class does nothing.
    pub fn include(&mut self, target: impl Into<IncludeTarget>) -> Result<&mut Self> {
        let resolved = match target.into() {
            IncludeTarget::Class(class) => {
                if class == self.node.class() {
                    tracing::debug!("Ignoring self-include of {}", class);
                    return Ok(self);
                }
                self.cx.resolve(&class)?
            }
            IncludeTarget::Node(node) => node,
        };
        self.node.push_include(resolved);
        Ok(self)
    }

    /// Append a rule to the node's `iron_rules` section, creating it if needed
    pub fn add_iron_rule(&mut self, rule: impl Blueprint) -> &mut Self {
        let rule = rule.into_node();
        let children = self.node.children_mut();
        match children.iter_mut().find(|c| c.element == element::IRON_RULES) {
            Some(section) => section.add_child(rule),
            None => children.push(CompiledNode::new(element::IRON_RULES).with_child(rule)),
        }
        self
    }
}
