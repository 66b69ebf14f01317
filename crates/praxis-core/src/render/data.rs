//! JSON, YAML and TOML output
//!
//! All three serialize the same data value: the merged tree with empty-element
//! nodes, null attributes and (optionally) metadata subtrees removed.

use serde_json::{Map, Value};

use super::RenderOptions;
use crate::error::Result;
use crate::node::{element, CompiledNode};

/// The data value every structured format serializes
pub fn to_data(tree: &CompiledNode, options: &RenderOptions) -> Result<Value> {
    match prune(tree, options) {
        Some(pruned) => Ok(serde_json::to_value(pruned)?),
        None => Ok(Value::Object(Map::new())),
    }
}

pub fn render_json(tree: &CompiledNode, options: &RenderOptions) -> Result<String> {
    Ok(serde_json::to_string_pretty(&to_data(tree, options)?)?)
}

pub fn render_yaml(tree: &CompiledNode, options: &RenderOptions) -> Result<String> {
    Ok(serde_yaml::to_string(&to_data(tree, options)?)?)
}

pub fn render_toml(tree: &CompiledNode, options: &RenderOptions) -> Result<String> {
    let data = strip_nulls(to_data(tree, options)?);
    Ok(toml::to_string(&data)?)
}

fn is_metadata(element: &str) -> bool {
    element == element::META || element == element::METADATA
}

fn prune(node: &CompiledNode, options: &RenderOptions) -> Option<CompiledNode> {
    if node.element.is_empty() || (options.omit_metadata && is_metadata(&node.element)) {
        return None;
    }

    let mut pruned = node.clone();
    pruned.attributes.retain(|_, value| !value.is_null());
    pruned.children = node
        .children
        .iter()
        .filter_map(|child| prune(child, options))
        .collect();
    Some(pruned)
}

/// TOML has no null; drop them wherever they still occur
fn strip_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, strip_nulls(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .filter(|v| !v.is_null())
                .map(strip_nulls)
                .collect(),
        ),
        other => other,
    }
}
