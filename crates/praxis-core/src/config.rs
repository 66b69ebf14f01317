//! Configuration resolution
//!
//! Archetypes read ambient configuration through [`Variables::var`]. Lookup
//! never fails: a name nobody defines resolves to the caller's default.
//!
//! Precedence, first hit wins:
//!
//! 1. explicit per-run overrides (`--variables=<json>`)
//! 2. environment snapshot, auto-typed from its string form
//! 3. the archetype's own metas
//! 4. computed fallbacks registered by name
//! 5. the caller's default

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::text::upper_snake;

/// Model used when no override applies
pub const DEFAULT_MODEL: &str = "sonnet";

type Computed = Rc<dyn Fn() -> Option<Value>>;

/// Variable resolver for one compile run
#[derive(Clone, Default)]
pub struct Variables {
    overrides: Map<String, Value>,
    environment: HashMap<String, String>,
    computed: HashMap<String, Computed>,
}

impl fmt::Debug for Variables {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut computed: Vec<_> = self.computed.keys().collect();
        computed.sort();
        f.debug_struct("Variables")
            .field("overrides", &self.overrides)
            .field("environment", &self.environment.len())
            .field("computed", &computed)
            .finish()
    }
}

impl Variables {
    /// Resolver with no sources at all
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver over a snapshot of the process environment
    pub fn from_env() -> Self {
        Self::new().with_environment(std::env::vars())
    }

    pub fn with_environment<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.environment = vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self
    }

    pub fn with_override(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.overrides.insert(name.into(), value.into());
        self
    }

    pub fn with_overrides(mut self, overrides: Map<String, Value>) -> Self {
        self.overrides.extend(overrides);
        self
    }

    pub fn with_computed<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn() -> Option<Value> + 'static,
    {
        self.computed.insert(name.into(), Rc::new(f));
        self
    }

    /// Resolve `name` without archetype metas
    pub fn var(&self, name: &str, default: impl Into<Value>) -> Value {
        self.resolve(name, None).unwrap_or_else(|| default.into())
    }

    /// Resolve `name`, consulting `metas` between the environment and computed fallbacks
    pub fn var_with_metas(
        &self,
        name: &str,
        metas: &Map<String, Value>,
        default: impl Into<Value>,
    ) -> Value {
        self.resolve(name, Some(metas))
            .unwrap_or_else(|| default.into())
    }

    /// Whether any source defines `name`
    pub fn is_defined(&self, name: &str) -> bool {
        self.resolve(name, None).is_some()
    }

    fn resolve(&self, name: &str, metas: Option<&Map<String, Value>>) -> Option<Value> {
        if let Some(value) = self.overrides.get(name) {
            return Some(value.clone());
        }
        if let Some(raw) = self.environment.get(name) {
            return Some(parse_env_value(raw));
        }
        if let Some(metas) = metas {
            let found = metas
                .get(name)
                .or_else(|| metas.get(&name.to_lowercase()));
            if let Some(value) = found {
                return Some(value.clone());
            }
        }
        self.computed.get(name).and_then(|f| f())
    }

    /// Pick a model name for an archetype.
    ///
    /// Tries `<CLASS>_MODEL`, `<CATEGORY>_MODEL`, `<AGENT>_<CATEGORY>_MODEL`,
    /// then falls back to [`DEFAULT_MODEL`]. Non-string and empty values are
    /// skipped.
    pub fn select_model(&self, class: &str, category: &str, agent: &str) -> String {
        self.model_override(class, category, agent)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string())
    }

    /// The configured model for an archetype, without the hard default
    pub fn model_override(&self, class: &str, category: &str, agent: &str) -> Option<String> {
        let candidates = [
            format!("{}_MODEL", upper_snake(class)),
            format!("{}_MODEL", upper_snake(category)),
            format!("{}_{}_MODEL", upper_snake(agent), upper_snake(category)),
        ];

        candidates
            .iter()
            .find_map(|key| match self.resolve(key, None) {
                Some(Value::String(model)) if !model.is_empty() => Some(model),
                _ => None,
            })
    }
}

/// Auto-type an environment string: booleans, `null`, numbers and JSON
/// arrays/objects are parsed; anything else stays a string.
pub fn parse_env_value(raw: &str) -> Value {
    let trimmed = raw.trim();

    if trimmed.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if trimmed == "null" {
        return Value::Null;
    }
    if let Ok(int) = trimmed.parse::<i64>() {
        return Value::from(int);
    }
    if trimmed.chars().any(|c| c.is_ascii_digit()) {
        if let Ok(float) = trimmed.parse::<f64>() {
            if let Some(number) = serde_json::Number::from_f64(float) {
                return Value::Number(number);
            }
        }
    }
    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
            return value;
        }
    }
    Value::String(raw.to_string())
}
