//! Compile context
//!
//! Everything that must not leak from one document into the next: the include
//! cache, the stack of archetypes currently being built, and the variables the
//! run resolves against. [`Compiler`](crate::compiler::Compiler) creates one per
//! document and drops it afterwards.

use std::collections::HashMap;
use std::rc::Rc;

use crate::archetype::{self, Archetype, ArchetypeRegistry};
use crate::config::Variables;
use crate::error::{IncludeError, Result};
use crate::node::ArchetypeNode;

#[derive(Debug)]
pub struct CompileContext<'r> {
    registry: &'r ArchetypeRegistry,
    variables: &'r Variables,
    cache: HashMap<String, Rc<ArchetypeNode>>,
    building: Vec<String>,
}

impl<'r> CompileContext<'r> {
    pub fn new(registry: &'r ArchetypeRegistry, variables: &'r Variables) -> Self {
        Self {
            registry,
            variables,
            cache: HashMap::new(),
            building: Vec::new(),
        }
    }

    pub fn variables(&self) -> &'r Variables {
        self.variables
    }

    pub fn registry(&self) -> &'r ArchetypeRegistry {
        self.registry
    }

    /// Resolve a class to its finalized singleton for this document.
    ///
    /// The first resolution builds the archetype; later ones return the cached
    /// node. A class that is still being built further up the stack is an
    /// include cycle.
    pub fn resolve(&mut self, class: &str) -> Result<Rc<ArchetypeNode>> {
        if let Some(node) = self.cache.get(class) {
            tracing::debug!("Include cache hit: {}", class);
            return Ok(Rc::clone(node));
        }

        if let Some(pos) = self.building.iter().position(|c| c == class) {
            let mut cycle = self.building[pos..].to_vec();
            cycle.push(class.to_string());
            return Err(IncludeError::Cycle(cycle).into());
        }

        let archetype = self
            .registry
            .create(class)
            .ok_or_else(|| IncludeError::MissingClass(class.to_string()))?;

        tracing::debug!("Include cache miss, building: {}", class);
        let node = Rc::new(self.build(archetype.as_ref())?);
        self.cache.insert(class.to_string(), Rc::clone(&node));
        Ok(node)
    }

    /// Build an archetype into a fresh node, bypassing the cache
    pub fn build(&mut self, archetype: &dyn Archetype) -> Result<ArchetypeNode> {
        let mut node = ArchetypeNode::new(archetype.class(), archetype.element());
        self.build_into(archetype, &mut node)?;
        Ok(node)
    }

    /// Run the lifecycle on an existing node; it must still be unbuilt
    pub fn build_into(&mut self, archetype: &dyn Archetype, node: &mut ArchetypeNode) -> Result<()> {
        self.building.push(node.class().to_string());
        let result = archetype::run(self, archetype, node);
        self.building.pop();
        result
    }

    pub fn is_cached(&self, class: &str) -> bool {
        self.cache.contains_key(class)
    }

    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }
}
