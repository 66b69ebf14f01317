//! Build Lifecycle
//!
//! An [`Archetype`] describes how to assemble the content tree for one logical
//! prompt section. Building one always runs the same steps, in order:
//!
//! 1. **extract attributes**: apply the [`Declarations`] registered in
//!    [`Archetype::declare`] (metas, purpose, rules, guidelines, includes)
//! 2. **init**: resolve the model for archetypes with a model category, then
//!    call [`Archetype::init`]
//! 3. **handle**: [`Archetype::handle`], where the author populates the tree
//! 4. **finalize**: [`Archetype::finalize`], then append every contiguous
//!    `<PREFIX>_RULE_<n>` configuration value as a critical rule
//!
//! Every hook defaults to a no-op. The resulting node is finalized and
//! read-only; building it again is an error.

pub mod registry;
pub mod scope;

mod lifecycle;

pub use registry::ArchetypeRegistry;
pub use scope::{BuildScope, IncludeTarget};

pub(crate) use lifecycle::run;

use serde_json::{Map, Value};

use crate::error::Result;
use crate::node::{Guideline, Rule, TextBuffer};
use crate::text::upper_snake;

/// Root element used when an archetype does not name one
pub const DEFAULT_ELEMENT: &str = "system";

/// A builder-style content definition for one prompt section
pub trait Archetype {
    /// Class identity; include references and the include cache key on it
    fn class(&self) -> &str;

    fn element(&self) -> &str {
        DEFAULT_ELEMENT
    }

    /// Register declarative metadata
    fn declare(&self, _declarations: &mut Declarations) {}

    /// Model category for archetypes that pick a model, e.g. `subagent`
    fn model_category(&self) -> Option<&str> {
        None
    }

    fn init(&self, _scope: &mut BuildScope<'_, '_>) -> Result<()> {
        Ok(())
    }

    fn handle(&self, _scope: &mut BuildScope<'_, '_>) -> Result<()> {
        Ok(())
    }

    fn finalize(&self, _scope: &mut BuildScope<'_, '_>) -> Result<()> {
        Ok(())
    }

    /// Namespace scanned for `<PREFIX>_RULE_<n>` overrides
    fn override_prefix(&self) -> String {
        upper_snake(self.class())
    }
}

/// Declarative metadata an archetype registers about itself
#[derive(Debug, Clone, Default)]
pub struct Declarations {
    pub(crate) metas: Map<String, Value>,
    pub(crate) purpose: TextBuffer,
    pub(crate) rules: Vec<Rule>,
    pub(crate) guidelines: Vec<Guideline>,
    pub(crate) includes: Vec<String>,
}

impl Declarations {
    pub fn meta(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.metas.insert(key.into(), value.into());
        self
    }

    pub fn purpose(&mut self, text: impl Into<String>) -> &mut Self {
        self.purpose.push(text);
        self
    }

    pub fn rule(&mut self, rule: Rule) -> &mut Self {
        self.rules.push(rule);
        self
    }

    pub fn guideline(&mut self, guideline: Guideline) -> &mut Self {
        self.guidelines.push(guideline);
        self
    }

    pub fn include(&mut self, class: impl Into<String>) -> &mut Self {
        self.includes.push(class.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.metas.is_empty()
            && self.purpose.is_empty()
            && self.rules.is_empty()
            && self.guidelines.is_empty()
            && self.includes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bare;

    impl Archetype for Bare {
        fn class(&self) -> &str {
            "agent.code-reviewer"
        }
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Bare.element(), "system");
        assert_eq!(Bare.override_prefix(), "AGENT_CODE_REVIEWER");
        assert!(Bare.model_category().is_none());

        let mut declarations = Declarations::default();
        Bare.declare(&mut declarations);
        assert!(declarations.is_empty());
    }

    #[test]
    fn test_declarations_chain() {
        let mut d = Declarations::default();
        d.meta("id", "brain")
            .purpose("Coordinate agents")
            .rule(Rule::new("r").critical())
            .include("core.quality");
        assert!(!d.is_empty());
        assert_eq!(d.includes, vec!["core.quality"]);
        assert_eq!(d.purpose.as_deref(), Some("Coordinate agents"));
    }
}
