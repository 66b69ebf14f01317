//! Archetype registry
//!
//! Maps class names to factories. The registry outlives individual compiles and
//! is never mutated during one; per-document state lives in
//! [`CompileContext`](crate::context::CompileContext).

use std::collections::BTreeMap;
use std::fmt;

use super::Archetype;

type Factory = Box<dyn Fn() -> Box<dyn Archetype>>;

#[derive(Default)]
pub struct ArchetypeRegistry {
    factories: BTreeMap<String, Factory>,
}

impl fmt::Debug for ArchetypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArchetypeRegistry")
            .field("classes", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ArchetypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a default-constructible archetype under its own class name
    pub fn register<A>(&mut self) -> &mut Self
    where
        A: Archetype + Default + 'static,
    {
        let class = A::default().class().to_string();
        self.register_with(class, || Box::new(A::default()))
    }

    pub fn register_with<F>(&mut self, class: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> Box<dyn Archetype> + 'static,
    {
        let class = class.into();
        if self.factories.insert(class.clone(), Box::new(factory)).is_some() {
            tracing::warn!("Archetype class '{}' registered twice, keeping the latest", class);
        }
        self
    }

    pub fn create(&self, class: &str) -> Option<Box<dyn Archetype>> {
        self.factories.get(class).map(|factory| factory())
    }

    pub fn contains(&self, class: &str) -> bool {
        self.factories.contains_key(class)
    }

    /// Registered class names, sorted
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}
