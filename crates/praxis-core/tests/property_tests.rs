//! Property-based tests
//!
//! Properties of the node model, the layout engine and the renderer that must
//! hold for arbitrary input.

use praxis_core::config::parse_env_value;
use praxis_core::node::{Blueprint, CompiledNode};
use praxis_core::render::{render, OutputFormat, RenderOptions};
use praxis_core::syntax::{LayoutOptions, Operator};
use praxis_core::Rule;
use proptest::prelude::*;
use serde_json::Value;

fn rules_tree(rules: &[(String, String)]) -> CompiledNode {
    let section = rules.iter().fold(CompiledNode::new("iron_rules"), |section, (id, text)| {
        section.with_child(Rule::new(id.as_str()).text(text.as_str()).into_node())
    });
    CompiledNode::new("system")
        .with_child(CompiledNode::new("meta").with_attribute("id", "prop").single())
        .with_child(section)
}

// ============================================================================
// Node model
// ============================================================================

proptest! {
    /// Every write appends a line; earlier text is never replaced.
    #[test]
    fn prop_text_is_append_only(chunks in prop::collection::vec("[a-z ]{0,12}", 1..8)) {
        let mut node = CompiledNode::new("context");
        let mut previous = String::new();

        for (i, chunk) in chunks.iter().enumerate() {
            node.set_text(chunk.as_str());
            let current = node.text().unwrap_or_default().to_string();
            if i > 0 {
                prop_assert!(current.starts_with(&previous));
            }
            previous = current;
        }

        let joined = chunks.join("\n");
        prop_assert_eq!(node.text(), Some(joined.as_str()));
    }
}

// ============================================================================
// Layout
// ============================================================================

proptest! {
    /// A directive stays on one line exactly when it fits the threshold.
    #[test]
    fn prop_if_stmt_respects_threshold(
        condition in "[a-z]{1,10}",
        then in "[a-z ]{1,80}",
        threshold in 10usize..100
    ) {
        let operator = Operator::new(LayoutOptions::new().with_inline_threshold(threshold));
        let out = operator.if_stmt(&condition, then.as_str(), None);
        let inline = format!("IF({}) → {}", condition, then);

        if inline.chars().count() <= threshold {
            prop_assert_eq!(out, inline);
        } else {
            prop_assert!(out.contains('\n'));
            prop_assert!(out.ends_with("→ END-IF"));
        }
    }

    /// Block bodies are indented by the configured amount.
    #[test]
    fn prop_block_lines_are_indented(
        lines in prop::collection::vec("[a-z]{1,10}", 2..6),
        indent in 0usize..8
    ) {
        let operator = Operator::new(LayoutOptions::new().with_indent(indent));
        let out = operator.for_each("item", lines.clone());
        let pad = " ".repeat(indent);

        let body: Vec<&str> = out.lines().skip(1).take(lines.len()).collect();
        for (rendered, line) in body.iter().zip(&lines) {
            prop_assert_eq!(*rendered, format!("{}{}", pad, line));
        }
    }
}

// ============================================================================
// Rendering
// ============================================================================

proptest! {
    /// Rendering the same tree twice produces identical bytes.
    #[test]
    fn prop_render_is_deterministic(
        rules in prop::collection::vec(("[a-z]{1,6}", "[a-z ]{1,30}"), 0..10)
    ) {
        let tree = rules_tree(&rules);
        let options = RenderOptions::default();

        for format in [OutputFormat::Xml, OutputFormat::Json, OutputFormat::Yaml] {
            let first = render(&tree, format, options).unwrap();
            let second = render(&tree, format, options).unwrap();
            prop_assert_eq!(first, second);
        }
    }

    /// A rule id is rendered at most once, whatever the input order.
    #[test]
    fn prop_rule_ids_render_once(
        ids in prop::collection::vec(prop::sample::select(vec!["alpha", "beta", "gamma"]), 1..12)
    ) {
        let rules: Vec<(String, String)> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.to_string(), format!("variant {}", i)))
            .collect();
        let out = render(&rules_tree(&rules), OutputFormat::Xml, RenderOptions::default()).unwrap();

        for id in ["alpha", "beta", "gamma"] {
            let expected = usize::from(ids.contains(&id));
            prop_assert_eq!(out.matches(&format!("## {} (", id)).count(), expected);
        }
    }

    /// JSON and YAML output describe the same data.
    #[test]
    fn prop_json_yaml_equivalent(
        rules in prop::collection::vec(("[a-z]{1,6}", "[a-z ]{1,30}"), 0..6)
    ) {
        let tree = rules_tree(&rules);
        let options = RenderOptions::default();
        let json_out = render(&tree, OutputFormat::Json, options).unwrap();
        let yaml_out = render(&tree, OutputFormat::Yaml, options).unwrap();

        let from_json: Value = serde_json::from_str(&json_out).unwrap();
        let from_yaml: Value = serde_yaml::from_str(&yaml_out).unwrap();
        prop_assert_eq!(from_json, from_yaml);
    }
}

// ============================================================================
// Variables
// ============================================================================

proptest! {
    #[test]
    fn prop_env_integers_are_typed(n in any::<i64>()) {
        prop_assert_eq!(parse_env_value(&n.to_string()), Value::from(n));
    }

    #[test]
    fn prop_env_words_stay_strings(word in "[g-z]{2,12}") {
        prop_assume!(word != "null");
        prop_assert_eq!(parse_env_value(&word), Value::String(word.clone()));
    }
}
