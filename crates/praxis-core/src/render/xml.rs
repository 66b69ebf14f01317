//! Pseudo-xml renderer
//!
//! The canonical prompt dialect. It looks like XML but is prose for a model:
//! text is emitted verbatim, nothing is escaped, and several elements render
//! as markdown instead of tags.
//!
//! Element handling, in precedence order:
//!
//! - `iron_rules`: a `# Iron Rules` header (once per render pass), then its
//!   rules. Nested `iron_rules` flatten into the enclosing block.
//! - `guideline`: `# <id as words>`, its text, bullets for `text` children, a
//!   numbered list for phases and a flat bullet list of examples.
//! - `rule`: `## <id> (<SEVERITY>)`, its text, then `why` / `on_violation`
//!   as labelled bullets. A rule id renders once per pass; later duplicates
//!   are dropped.
//! - `purpose`, `execute`, `mission`, `provides`: direct `guidelines`
//!   children are moved out and rendered right after the wrapper.
//! - anything else: tag, text, children, closing tag. Children of the document
//!   root are separated by a blank line.
//!
//! Status words in rule and guideline text are wrapped in code markers (see
//! [`auto_code`]).

use serde_json::Value;
use std::collections::HashSet;

use super::RenderOptions;
use crate::node::{element, CompiledNode};
use crate::text::{auto_code, bold, bullet, header, humanize_id, labeled};
use crate::types::Severity;

/// Title of the iron rules section
pub const IRON_RULES_TITLE: &str = "Iron Rules";

/// Render a merged tree as pseudo-xml
pub fn render(tree: &CompiledNode, options: &RenderOptions) -> String {
    let mut pass = RenderPass::new(options);
    pass.node(tree, 0).unwrap_or_default()
}

/// State that lives for exactly one render call
struct RenderPass<'o> {
    options: &'o RenderOptions,
    seen_rules: HashSet<String>,
    iron_rules_header: bool,
    iron_rules_depth: usize,
}

impl<'o> RenderPass<'o> {
    fn new(options: &'o RenderOptions) -> Self {
        Self {
            options,
            seen_rules: HashSet::new(),
            iron_rules_header: false,
            iron_rules_depth: 0,
        }
    }

    fn node(&mut self, node: &CompiledNode, depth: usize) -> Option<String> {
        if node.element.is_empty() {
            return None;
        }
        if self.options.omit_metadata
            && (node.element == element::META || node.element == element::METADATA)
        {
            return None;
        }

        let consolidated;
        let node = match depth {
            0 => match consolidate_iron_rules(node) {
                Some(merged) => {
                    consolidated = merged;
                    &consolidated
                }
                None => node,
            },
            _ => node,
        };

        match node.element.as_str() {
            element::IRON_RULES => self.iron_rules(node, depth),
            element::GUIDELINE => self.guideline(node, depth),
            element::RULE => self.rule(node, depth),
            e if element::GUIDELINE_HOSTS.contains(&e) => self.guideline_host(node, depth),
            _ => {
                let children: Vec<&CompiledNode> = node.children.iter().collect();
                self.element(node, &children, depth)
            }
        }
    }

    fn iron_rules(&mut self, node: &CompiledNode, depth: usize) -> Option<String> {
        let nested = self.iron_rules_depth > 0;

        self.iron_rules_depth += 1;
        let parts: Vec<String> = node
            .children
            .iter()
            .filter_map(|child| self.node(child, depth + 1))
            .collect();
        self.iron_rules_depth -= 1;

        if parts.is_empty() {
            return None;
        }
        let body = parts.join("\n\n");
        if nested || self.iron_rules_header {
            return Some(body);
        }
        self.iron_rules_header = true;
        Some(format!("{}\n\n{}", header(1, IRON_RULES_TITLE), body))
    }

    fn rule(&mut self, node: &CompiledNode, depth: usize) -> Option<String> {
        if let Some(id) = &node.id {
            if !self.seen_rules.insert(id.clone()) {
                tracing::debug!("Dropping duplicate rule: {}", id);
                return None;
            }
        }

        let severity = node
            .attribute_str("severity")
            .and_then(|s| s.parse::<Severity>().ok())
            .unwrap_or_default();
        let id = node.id.as_deref().unwrap_or(element::RULE);

        let mut lines = vec![format!("{} ({})", header(2, id), severity.marker())];
        if let Some(text) = node.text() {
            lines.push(auto_code(text));
        }
        for child in &node.children {
            match child.element.as_str() {
                element::WHY | element::ON_VIOLATION => {
                    if let Some(text) = child.text() {
                        lines.push(bullet(&labeled(&child.element, &auto_code(text))));
                    }
                }
                _ => lines.extend(self.node(child, depth + 1)),
            }
        }
        Some(lines.join("\n"))
    }

    fn guideline(&mut self, node: &CompiledNode, depth: usize) -> Option<String> {
        let title = node
            .id
            .as_deref()
            .map(humanize_id)
            .unwrap_or_else(|| element::GUIDELINE.to_string());

        let mut lines = vec![header(1, &title)];
        if let Some(text) = node.text() {
            lines.push(auto_code(text));
        }
        if let Some(goal) = node.attribute_str("goal") {
            lines.push(format!("{}: {}", bold("Goal"), auto_code(goal)));
        }

        let mut examples = Vec::new();
        let mut phase_number = 0;
        for child in &node.children {
            match child.element.as_str() {
                element::TEXT => {
                    if let Some(text) = child.text() {
                        lines.push(bullet(&auto_code(text)));
                    }
                }
                element::PHASE => {
                    if let Some(text) = child.text() {
                        phase_number += 1;
                        let step = child
                            .attribute("step")
                            .and_then(Value::as_u64)
                            .unwrap_or(phase_number);
                        lines.push(format!("{}. {}", step, auto_code(text)));
                    }
                }
                element::EXAMPLE => {
                    if let Some(text) = child.text() {
                        let value = auto_code(text);
                        examples.push(match child.attribute_str("key") {
                            Some(key) => bullet(&format!("{}: {}", key, value)),
                            None => bullet(&value),
                        });
                    }
                }
                _ => lines.extend(self.node(child, depth + 1)),
            }
        }
        lines.extend(examples);
        Some(lines.join("\n"))
    }

    fn guideline_host(&mut self, node: &CompiledNode, depth: usize) -> Option<String> {
        let (hoisted, own): (Vec<&CompiledNode>, Vec<&CompiledNode>) = node
            .children
            .iter()
            .partition(|child| child.element == element::GUIDELINES);

        let mut parts: Vec<String> = self.element(node, &own, depth).into_iter().collect();
        for guidelines in hoisted {
            parts.extend(self.node(guidelines, depth));
        }

        if parts.is_empty() {
            return None;
        }
        Some(parts.join(sibling_separator(depth)))
    }

    /// Generic tag rendering with an explicit child list
    fn element(&mut self, node: &CompiledNode, children: &[&CompiledNode], depth: usize) -> Option<String> {
        let (attributes, listed) = classify_attributes(node);
        let tag = &node.element;

        let mut rendered: Vec<String> = Vec::new();
        for child in children.iter().copied().chain(listed.iter()) {
            rendered.extend(self.node(child, depth + 1));
        }

        if rendered.is_empty() {
            return Some(match node.text() {
                Some(text) => format!("<{}{}>{}</{}>", tag, attributes, text, tag),
                None if node.self_closing => format!("<{}{}/>", tag, attributes),
                None => format!("<{}{}></{}>", tag, attributes, tag),
            });
        }

        let mut lines = vec![format!("<{}{}>", tag, attributes)];
        if let Some(text) = node.text() {
            lines.push(text.to_string());
        }
        lines.push(rendered.join(sibling_separator(depth + 1)));
        lines.push(format!("</{}>", tag));
        Some(lines.join("\n"))
    }
}

/// Top-level siblings (directly under the root) get a blank line between them
/// Fold every top-level `iron_rules` block into the first one, keeping merge
/// order. Returns `None` when there is nothing to fold.
fn consolidate_iron_rules(root: &CompiledNode) -> Option<CompiledNode> {
    let blocks = root
        .children
        .iter()
        .filter(|child| child.element == element::IRON_RULES)
        .count();
    if blocks < 2 {
        return None;
    }

    let mut children: Vec<CompiledNode> = Vec::with_capacity(root.children.len() - blocks + 1);
    let mut first: Option<usize> = None;
    for child in &root.children {
        if child.element != element::IRON_RULES {
            children.push(child.clone());
            continue;
        }
        match first {
            Some(index) => children[index].children.extend(child.children.iter().cloned()),
            None => {
                first = Some(children.len());
                children.push(child.clone());
            }
        }
    }

    let mut merged = root.clone();
    merged.children = children;
    Some(merged)
}

fn sibling_separator(depth: usize) -> &'static str {
    if depth == 1 {
        "\n\n"
    } else {
        "\n"
    }
}

/// Split attributes into the serialized attribute string and child nodes for
/// array values. Nulls are dropped.
fn classify_attributes(node: &CompiledNode) -> (String, Vec<CompiledNode>) {
    let mut out = String::new();
    let mut listed = Vec::new();

    if let Some(id) = &node.id {
        out.push_str(&format!(" id=\"{}\"", id));
    }
    for (key, value) in &node.attributes {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                listed.extend(
                    items
                        .iter()
                        .filter(|item| !item.is_null())
                        .map(|item| CompiledNode::new(key.clone()).with_text(scalar_text(item))),
                );
            }
            other => out.push_str(&format!(" {}=\"{}\"", key, scalar_text(other))),
        }
    }
    (out, listed)
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Blueprint, Guideline, Rule, Section};
    use serde_json::json;

    fn render_default(tree: &CompiledNode) -> String {
        render(tree, &RenderOptions::default())
    }

    #[test]
    fn test_empty_element_renders_nothing() {
        let tree = CompiledNode::new("system")
            .with_child(CompiledNode::new(""))
            .with_child(CompiledNode::new("mission").with_text("Go"));
        assert_eq!(render_default(&tree), "<system>\n<mission>Go</mission>\n</system>");
    }

    #[test]
    fn test_inline_self_closing_and_empty() {
        assert_eq!(
            render_default(&CompiledNode::new("input").with_attribute("required", true).single()),
            "<input required=\"true\"/>"
        );
        assert_eq!(render_default(&CompiledNode::new("input")), "<input></input>");
        assert_eq!(
            render_default(&CompiledNode::new("mission").with_id("m").with_text("Ship")),
            "<mission id=\"m\">Ship</mission>"
        );
    }

    #[test]
    fn test_text_is_not_escaped() {
        let node = CompiledNode::new("context").with_text("use <b> & \"quotes\"");
        assert_eq!(render_default(&node), "<context>use <b> & \"quotes\"</context>");
    }

    #[test]
    fn test_attribute_classification() {
        let meta = CompiledNode::new("meta")
            .with_attribute("model", "opus")
            .with_attribute("max", 3)
            .with_attribute("color", Value::Null)
            .with_attribute("tools", json!(["Read", "Grep"]));
        let tree = CompiledNode::new("system").with_child(meta);
        assert_eq!(
            render_default(&tree),
            "<system>\n<meta model=\"opus\" max=\"3\">\n<tools>Read</tools>\n<tools>Grep</tools>\n</meta>\n</system>"
        );
    }

    #[test]
    fn test_blank_lines_only_between_root_children() {
        let tree = CompiledNode::new("system")
            .with_child(CompiledNode::new("a").with_text("1"))
            .with_child(
                CompiledNode::new("b")
                    .with_child(CompiledNode::new("c").with_text("2"))
                    .with_child(CompiledNode::new("d").with_text("3")),
            );
        assert_eq!(
            render_default(&tree),
            "<system>\n<a>1</a>\n\n<b>\n<c>2</c>\n<d>3</d>\n</b>\n</system>"
        );
    }

    #[test]
    fn test_omit_metadata() {
        let tree = CompiledNode::new("system")
            .with_child(CompiledNode::new("meta").with_attribute("model", "opus"))
            .with_child(CompiledNode::new("metadata").with_child(CompiledNode::new("x").with_text("y")))
            .with_child(CompiledNode::new("mission").with_text("Go"));
        let out = render(&tree, &RenderOptions::new().with_omit_metadata(true));
        assert_eq!(out, "<system>\n<mission>Go</mission>\n</system>");
    }

    #[test]
    fn test_rule_block() {
        let rule = Rule::new("no-guessing")
            .text("Task stays pending until tested")
            .critical()
            .why("Guesses break builds")
            .on_violation("Stop and search")
            .into_node();
        assert_eq!(
            render_default(&rule),
            "## no-guessing (CRITICAL)\nTask stays `pending` until `tested`\n- **why**: Guesses break builds\n- **on_violation**: Stop and search"
        );
    }

    #[test]
    fn test_duplicate_rules_first_wins() {
        let tree = CompiledNode::new("system")
            .with_child(Section::iron_rules().child(Rule::new("x").text("first")).into_node())
            .with_child(Section::iron_rules().child(Rule::new("x").text("second")).into_node());
        let out = render_default(&tree);
        assert_eq!(out.matches("## x").count(), 1);
        assert!(out.contains("first"));
        assert!(!out.contains("second"));
    }

    #[test]
    fn test_iron_rules_header_once_and_nested_flatten() {
        let nested = Section::iron_rules()
            .child(Rule::new("a").critical())
            .child(Section::iron_rules().child(Rule::new("b").critical()))
            .into_node();
        let out = render_default(&nested);
        assert_eq!(
            out,
            "# Iron Rules\n\n## a (CRITICAL)\n\n## b (CRITICAL)"
        );

        let tree = CompiledNode::new("system")
            .with_child(Section::iron_rules().child(Rule::new("a")).into_node())
            .with_child(Section::iron_rules().child(Rule::new("b")).into_node());
        assert_eq!(render_default(&tree).matches("# Iron Rules").count(), 1);
    }

    #[test]
    fn test_top_level_iron_rules_form_one_block() {
        let tree = CompiledNode::new("system")
            .with_child(Section::iron_rules().child(Rule::new("a")).into_node())
            .with_child(CompiledNode::new("mission").with_text("Go"))
            .with_child(
                Section::iron_rules()
                    .child(Rule::new("a").text("again"))
                    .child(Rule::new("b").critical())
                    .into_node(),
            )
            .with_child(CompiledNode::new("context").with_text("Repo"))
            .with_child(Section::iron_rules().child(Rule::new("c").low()).into_node());

        assert_eq!(
            render_default(&tree),
            "<system>\n# Iron Rules\n\n## a (HIGH)\n\n## b (CRITICAL)\n\n## c (LOW)\n\n\
             <mission>Go</mission>\n\n<context>Repo</context>\n</system>"
        );
    }

    #[test]
    fn test_guideline_block() {
        let node = Guideline::new("task_status-flow")
            .text("Track every task")
            .goal("Status is always accurate")
            .line("Mark in_progress before editing")
            .phase("Read the task")
            .phase("Set it completed")
            .example("\"pending\" stays quoted")
            .keyed_example("bad", "skip validated step")
            .into_node();
        assert_eq!(
            render_default(&node),
            "# task status flow\n\
             Track every task\n\
             **Goal**: Status is always accurate\n\
             - Mark `in_progress` before editing\n\
             1. Read the task\n\
             2. Set it `completed`\n\
             - \"pending\" stays quoted\n\
             - bad: skip `validated` step"
        );
    }

    #[test]
    fn test_guidelines_hoisted_after_host() {
        let tree = CompiledNode::new("system").with_child(
            Section::purpose()
                .text("Coordinate work")
                .child(Section::guidelines().child(Guideline::new("g1").line("one")))
                .into_node(),
        );
        let out = render_default(&tree);
        assert_eq!(
            out,
            "<system>\n<purpose>Coordinate work</purpose>\n\n<guidelines>\n# g1\n- one\n</guidelines>\n</system>"
        );
        let close = out.find("</purpose>").unwrap();
        assert!(out.find("<guidelines>").unwrap() > close);
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let tree = CompiledNode::new("system")
            .with_child(Section::iron_rules().child(Rule::new("x")).into_node())
            .with_child(Guideline::new("g").line("draft first").into_node());
        assert_eq!(render_default(&tree), render_default(&tree));
    }
}
