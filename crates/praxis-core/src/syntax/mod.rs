//! Pseudo-Syntax Generator
//!
//! Builds the control-flow-like directive strings that archetypes embed as node
//! text, e.g. `IF($STATUS == pending) → STOP` or a multi-line `FOREACH` block.
//! The output is generate-only: nothing parses it back.
//!
//! # Layout
//!
//! A directive renders inline (`KEYWORD(cond) → result`) when its body is a
//! single line, it has at most one alternate branch, and the whole line fits
//! within [`LayoutOptions::inline_threshold`] characters. Anything else renders
//! as a block:
//!
//! ```text
//! IF($TASK_ID) →
//!   load task
//!   check status
//! → END-IF
//! ```

pub mod operator;
pub mod store;

pub use operator::Operator;
pub use store::{Store, UNSERIALIZABLE};

use serde::{Deserialize, Serialize};

/// Default inline threshold, in characters
pub const DEFAULT_INLINE_THRESHOLD: usize = 60;

/// Layout configuration for the generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutOptions {
    /// Longest line, in characters, that may still render inline
    pub inline_threshold: usize,

    /// Spaces used to indent block bodies
    pub indent: usize,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            inline_threshold: DEFAULT_INLINE_THRESHOLD,
            indent: 2,
        }
    }
}

impl LayoutOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_inline_threshold(mut self, threshold: usize) -> Self {
        self.inline_threshold = threshold;
        self
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }
}

/// Body of a directive: one string, or an explicit list of lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Line(String),
    Lines(Vec<String>),
}

impl Body {
    /// The single-line content, if this body can be laid out inline
    pub fn as_inline(&self) -> Option<&str> {
        match self {
            Body::Line(line) if !line.contains('\n') => Some(line),
            _ => None,
        }
    }

    /// Every physical line of the body
    pub fn lines(&self) -> Vec<&str> {
        match self {
            Body::Line(line) => line.lines().collect(),
            Body::Lines(lines) => lines.iter().flat_map(|l| l.lines()).collect(),
        }
    }
}

impl From<&str> for Body {
    fn from(line: &str) -> Self {
        Body::Line(line.to_string())
    }
}

impl From<String> for Body {
    fn from(line: String) -> Self {
        Body::Line(line)
    }
}

impl From<&String> for Body {
    fn from(line: &String) -> Self {
        Body::Line(line.clone())
    }
}

impl From<Vec<String>> for Body {
    fn from(lines: Vec<String>) -> Self {
        Body::Lines(lines)
    }
}

impl From<Vec<&str>> for Body {
    fn from(lines: Vec<&str>) -> Self {
        Body::Lines(lines.into_iter().map(String::from).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Body {
    fn from(lines: [&str; N]) -> Self {
        Body::Lines(lines.iter().map(|l| l.to_string()).collect())
    }
}

/// `IF(cond) → then [→ ELSE → else]` with the default layout
pub fn if_stmt(condition: &str, then: impl Into<Body>, otherwise: Option<Body>) -> String {
    Operator::default().if_stmt(condition, then, otherwise)
}

/// `FOREACH(cond) → body` with the default layout
pub fn for_each(condition: &str, body: impl Into<Body>) -> String {
    Operator::default().for_each(condition, body)
}

/// `TASK → body` with the default layout
pub fn task<I, S>(steps: I) -> String
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Operator::default().task(steps)
}

/// `STORE-AS($NAME = values)`
pub fn store_as<I, T>(name: &str, values: I) -> String
where
    I: IntoIterator<Item = T>,
    T: Serialize,
{
    Store::store_as(name, values)
}
