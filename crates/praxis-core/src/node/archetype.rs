//! Archetype node
//!
//! The container one archetype's lifecycle fills in: its own metas and
//! children, plus references to the archetypes it includes. Includes are shared,
//! already-finalized nodes and are never inlined as children here; the merger
//! expands them.

use serde_json::{Map, Value};
use std::rc::Rc;

use super::{Blueprint, CompiledNode};
use crate::error::{LifecycleError, Result};
use crate::types::LifecycleState;

#[derive(Debug, Clone, PartialEq)]
pub struct ArchetypeNode {
    class: String,
    element: String,
    metas: Map<String, Value>,
    children: Vec<CompiledNode>,
    includes: Vec<Rc<ArchetypeNode>>,
    state: LifecycleState,
}

impl ArchetypeNode {
    pub fn new(class: impl Into<String>, element: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            element: element.into(),
            metas: Map::new(),
            children: Vec::new(),
            includes: Vec::new(),
            state: LifecycleState::Unbuilt,
        }
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn element(&self) -> &str {
        &self.element
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn metas(&self) -> &Map<String, Value> {
        &self.metas
    }

    pub fn meta(&self, key: &str) -> Option<&Value> {
        self.metas.get(key)
    }

    pub fn children(&self) -> &[CompiledNode] {
        &self.children
    }

    pub fn includes(&self) -> &[Rc<ArchetypeNode>] {
        &self.includes
    }

    pub fn add_child(&mut self, child: impl Blueprint) {
        self.children.push(child.into_node());
    }

    /// Set a meta, overwriting any previous value under the same key
    pub fn set_meta(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.metas.insert(key.into(), value.into());
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<CompiledNode> {
        &mut self.children
    }

    /// Record a resolved include. Self-references are ignored.
    pub(crate) fn push_include(&mut self, include: Rc<ArchetypeNode>) {
        if include.class == self.class {
            return;
        }
        self.includes.push(include);
    }

    /// Move to the next lifecycle state
    pub(crate) fn advance(&mut self, next: LifecycleState) -> Result<()> {
        if self.state.is_terminal() {
            return Err(LifecycleError::AlreadyFinalized(self.class.clone()).into());
        }
        if !self.state.can_transition_to(next) {
            return Err(LifecycleError::InvalidTransition {
                from: self.state.to_string(),
                to: next.to_string(),
            }
            .into());
        }
        self.state = next;
        Ok(())
    }
}
