//! Renderer
//!
//! Serializes a merged tree into one of the output formats. Every format reads
//! the same tree; the pseudo-xml dialect is the only one with formatting rules
//! of its own (rule deduplication, markdown headers for rules and guidelines,
//! guideline hoisting). JSON, YAML and TOML are direct serializations.
//!
//! Rendered documents are memoized by a structural hash of the tree. The memo
//! never changes output: rendering the same tree twice gives identical bytes.

pub mod data;
pub mod xml;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{PraxisError, Result};
use crate::node::CompiledNode;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pseudo-xml prompt dialect
    Xml,
    Json,
    Yaml,
    Toml,
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Xml
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Xml => write!(f, "xml"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Yaml => write!(f, "yaml"),
            OutputFormat::Toml => write!(f, "toml"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = PraxisError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xml" | "pseudo-xml" => Ok(OutputFormat::Xml),
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            "toml" => Ok(OutputFormat::Toml),
            other => Err(PraxisError::UnknownFormat(other.to_string())),
        }
    }
}

/// Render configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Drop every subtree rooted at `meta` or `metadata`
    pub omit_metadata: bool,
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_omit_metadata(mut self, omit: bool) -> Self {
        self.omit_metadata = omit;
        self
    }
}

/// Multi-format renderer with an output memo
#[derive(Debug, Default)]
pub struct Renderer {
    options: RenderOptions,
    memo: HashMap<(OutputFormat, [u8; 32]), String>,
}

impl Renderer {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            memo: HashMap::new(),
        }
    }

    pub fn options(&self) -> RenderOptions {
        self.options
    }

    pub fn render(&mut self, tree: &CompiledNode, format: OutputFormat) -> Result<String> {
        let key = (format, structural_hash(tree)?);
        if let Some(cached) = self.memo.get(&key) {
            tracing::debug!("Render memo hit for {} output", format);
            return Ok(cached.clone());
        }

        let output = match format {
            OutputFormat::Xml => xml::render(tree, &self.options),
            OutputFormat::Json => data::render_json(tree, &self.options)?,
            OutputFormat::Yaml => data::render_yaml(tree, &self.options)?,
            OutputFormat::Toml => data::render_toml(tree, &self.options)?,
        };
        self.memo.insert(key, output.clone());
        Ok(output)
    }
}

/// Render once, without keeping a memo around
pub fn render(tree: &CompiledNode, format: OutputFormat, options: RenderOptions) -> Result<String> {
    Renderer::new(options).render(tree, format)
}

fn structural_hash(tree: &CompiledNode) -> Result<[u8; 32]> {
    let bytes = serde_json::to_vec(tree)?;
    Ok(*blake3::hash(&bytes).as_bytes())
}
