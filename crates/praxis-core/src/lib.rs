//! Praxis Core - Compiles archetype trees into prompt documents for coding agents
//!
//! Archetypes are builder-style definitions of a prompt section: rules,
//! guidelines, mission statements, examples. Praxis builds one archetype (and
//! everything it includes), merges the result into a single tree and renders it
//! as a pseudo-xml prompt, JSON, YAML or TOML.
//!
//! # Architecture
//!
//! 1. **Node Model** (`node`): the plain tree and the blueprint types
//! 2. **Build Lifecycle** (`archetype`): extract attributes → init → handle → finalize
//! 3. **Include Resolver** (`context`): one cached singleton per class and document
//! 4. **Merger** (`merge`): splices includes into one tree
//! 5. **Renderer** (`render`): pseudo-xml, JSON, YAML, TOML
//! 6. **Pseudo-Syntax Generator** (`syntax`): `IF(...) → ...` style directives
//!
//! # Quick Start
//!
//! ```
//! use praxis_core::archetype::{Archetype, ArchetypeRegistry, BuildScope, Declarations};
//! use praxis_core::node::{Rule, Section};
//! use praxis_core::render::OutputFormat;
//! use praxis_core::Compiler;
//!
//! #[derive(Default)]
//! struct Brain;
//!
//! impl Archetype for Brain {
//!     fn class(&self) -> &str {
//!         "core.brain"
//!     }
//!
//!     fn declare(&self, d: &mut Declarations) {
//!         d.meta("id", "brain")
//!             .rule(Rule::new("no-guessing").critical().text("Search before editing."));
//!     }
//!
//!     fn handle(&self, scope: &mut BuildScope<'_, '_>) -> praxis_core::Result<()> {
//!         scope.add(Section::mission().text("Coordinate the agents."));
//!         Ok(())
//!     }
//! }
//!
//! let mut registry = ArchetypeRegistry::new();
//! registry.register::<Brain>();
//!
//! let prompt = Compiler::new(registry).compile("core.brain", OutputFormat::Xml).unwrap();
//! assert!(prompt.contains("## no-guessing (CRITICAL)"));
//! assert!(prompt.contains("<mission>Coordinate the agents.</mission>"));
//! ```

#![deny(unsafe_code)]
#![warn(rust_2018_idioms, missing_debug_implementations, clippy::all)]

pub mod archetype;
pub mod compiler;
pub mod config;
pub mod context;
pub mod error;
pub mod merge;
pub mod node;
pub mod render;
pub mod syntax;
pub mod text;
pub mod types;

// Re-export commonly used types for convenience
pub use archetype::{Archetype, ArchetypeRegistry, BuildScope, Declarations};
pub use compiler::Compiler;
pub use config::Variables;
pub use context::CompileContext;
pub use error::{PraxisError, Result};
pub use node::{ArchetypeNode, CompiledNode, Guideline, Rule, Section};
pub use render::{OutputFormat, RenderOptions, Renderer};
pub use types::{LifecycleState, Severity};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
