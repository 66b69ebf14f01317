//! Compiler facade
//!
//! Build → merge → render for one document. Each call gets a fresh
//! [`CompileContext`], so include singletons never leak between documents
//! compiled by the same `Compiler`.

use crate::archetype::ArchetypeRegistry;
use crate::config::Variables;
use crate::context::CompileContext;
use crate::error::{Result, ResultExt};
use crate::merge::merge;
use crate::node::CompiledNode;
use crate::render::{OutputFormat, RenderOptions, Renderer};

#[derive(Debug)]
pub struct Compiler {
    registry: ArchetypeRegistry,
    variables: Variables,
    options: RenderOptions,
}

impl Compiler {
    pub fn new(registry: ArchetypeRegistry) -> Self {
        Self {
            registry,
            variables: Variables::default(),
            options: RenderOptions::default(),
        }
    }

    pub fn with_variables(mut self, variables: Variables) -> Self {
        self.variables = variables;
        self
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn registry(&self) -> &ArchetypeRegistry {
        &self.registry
    }

    /// Build and merge `class` into a plain tree
    pub fn compile_tree(&self, class: &str) -> Result<CompiledNode> {
        let mut cx = CompileContext::new(&self.registry, &self.variables);
        let root = cx
            .resolve(class)
            .with_context(|| format!("Failed to compile '{}'", class))?;
        tracing::debug!("Built {} ({} archetypes resolved)", class, cx.cached_count());
        Ok(merge(&root))
    }

    /// Compile `class` into the requested format
    pub fn compile(&self, class: &str, format: OutputFormat) -> Result<String> {
        let tree = self.compile_tree(class)?;
        let output = Renderer::new(self.options).render(&tree, format)?;
        tracing::info!("Compiled {} as {} ({} bytes)", class, format, output.len());
        Ok(output)
    }
}
