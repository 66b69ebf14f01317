//! Fixed-order lifecycle driver

use serde_json::Value;

use super::scope::{AGENT_VAR, DEFAULT_AGENT};
use super::{Archetype, BuildScope, Declarations};
use crate::config::DEFAULT_MODEL;
use crate::context::CompileContext;
use crate::error::{LifecycleError, Result};
use crate::node::{ArchetypeNode, Rule, Section};
use crate::types::LifecycleState;

/// Run every lifecycle step on `node`, which must be unbuilt
pub(crate) fn run(
    cx: &mut CompileContext<'_>,
    archetype: &dyn Archetype,
    node: &mut ArchetypeNode,
) -> Result<()> {
    match node.state() {
        LifecycleState::Unbuilt => {}
        LifecycleState::Finalized => {
            return Err(LifecycleError::AlreadyFinalized(node.class().to_string()).into())
        }
        other => {
            return Err(LifecycleError::InvalidTransition {
                from: other.to_string(),
                to: LifecycleState::AttributesExtracted.to_string(),
            }
            .into())
        }
    }

    let class = node.class().to_string();

    tracing::debug!("[{}] extracting attributes", class);
    extract_attributes(cx, archetype, node)?;
    node.advance(LifecycleState::AttributesExtracted)?;

    tracing::debug!("[{}] init", class);
    init(cx, archetype, node)?;
    node.advance(LifecycleState::Initialized)?;

    tracing::debug!("[{}] handle", class);
    archetype.handle(&mut BuildScope::new(node, cx))?;
    node.advance(LifecycleState::Handled)?;

    tracing::debug!("[{}] finalize", class);
    finalize(cx, archetype, node)?;
    node.advance(LifecycleState::Finalized)?;

    Ok(())
}

fn extract_attributes(
    cx: &mut CompileContext<'_>,
    archetype: &dyn Archetype,
    node: &mut ArchetypeNode,
) -> Result<()> {
    let mut declarations = Declarations::default();
    archetype.declare(&mut declarations);
    let Declarations {
        metas,
        purpose,
        rules,
        guidelines,
        includes,
    } = declarations;

    for (key, value) in metas {
        node.set_meta(key, value);
    }
    if let Some(text) = purpose.as_deref() {
        node.add_child(Section::purpose().text(text));
    }
    if !rules.is_empty() {
        let section = rules
            .into_iter()
            .fold(Section::iron_rules(), |section, rule| section.child(rule));
        node.add_child(section);
    }
    if !guidelines.is_empty() {
        let section = guidelines
            .into_iter()
            .fold(Section::guidelines(), |section, guideline| section.child(guideline));
        node.add_child(section);
    }

    let mut scope = BuildScope::new(node, cx);
    for class in includes {
        scope.include(class)?;
    }
    Ok(())
}

fn init(
    cx: &mut CompileContext<'_>,
    archetype: &dyn Archetype,
    node: &mut ArchetypeNode,
) -> Result<()> {
    let mut scope = BuildScope::new(node, cx);

    if let Some(category) = archetype.model_category() {
        let agent = scope.var_str(AGENT_VAR, DEFAULT_AGENT);
        let configured = scope
            .node()
            .meta("model")
            .and_then(Value::as_str)
            .map(String::from);
        let model = scope
            .variables()
            .model_override(scope.node().class(), category, &agent)
            .or(configured)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        tracing::debug!("[{}] model resolved to {}", scope.node().class(), model);
        scope.set_meta("model", model);
    }

    archetype.init(&mut scope)
}

fn finalize(
    cx: &mut CompileContext<'_>,
    archetype: &dyn Archetype,
    node: &mut ArchetypeNode,
) -> Result<()> {
    let mut scope = BuildScope::new(node, cx);
    archetype.finalize(&mut scope)?;

    let prefix = archetype.override_prefix();
    for index in 0.. {
        let key = format!("{}_RULE_{}", prefix, index);
        let text = match scope.var(&key, Value::Null) {
            Value::Null => break,
            Value::String(text) => text,
            other => other.to_string(),
        };
        tracing::info!("[{}] applying configured rule {}", scope.node().class(), key);
        scope.add_iron_rule(Rule::new(key.to_lowercase()).text(text).critical());
    }
    Ok(())
}
