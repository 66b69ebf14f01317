//! Merger
//!
//! Expands an archetype's includes into one plain tree: the root's metas (as a
//! `meta` child), the root's own children, then the merged content of each
//! include in include-call order. Includes are spliced in recursively, so an
//! archetype reachable through two parents contributes its content twice.
//! Rules are deduplicated later by the pseudo-xml renderer; nothing else is.

use crate::node::{element, ArchetypeNode, CompiledNode};

/// Merge a finalized archetype and everything it includes
pub fn merge(root: &ArchetypeNode) -> CompiledNode {
    let mut tree = CompiledNode::new(root.element());

    if !root.metas().is_empty() {
        let mut meta = CompiledNode::new(element::META).single();
        meta.attributes = root.metas().clone();
        tree.add_child(meta);
    }

    append_content(root, &mut tree.children);
    tracing::debug!(
        "Merged {} into {} top-level nodes",
        root.class(),
        tree.children.len()
    );
    tree
}

fn append_content(node: &ArchetypeNode, out: &mut Vec<CompiledNode>) {
    out.extend(node.children().iter().cloned());
    for include in node.includes() {
        append_content(include, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Rule, Section};
    use std::rc::Rc;

    fn archetype(class: &str, rule: &str) -> ArchetypeNode {
        let mut node = ArchetypeNode::new(class, "system");
        node.add_child(Section::iron_rules().child(Rule::new(rule)));
        node
    }

    #[test]
    fn test_merge_order_root_then_includes() {
        let leaf = Rc::new(archetype("leaf", "leaf-rule"));
        let mut middle = archetype("middle", "middle-rule");
        middle.push_include(Rc::clone(&leaf));
        let middle = Rc::new(middle);

        let mut root = archetype("root", "root-rule");
        root.set_meta("id", "root");
        root.push_include(middle);
        root.push_include(leaf);

        let tree = merge(&root);
        assert_eq!(tree.element, "system");
        assert_eq!(tree.children[0].element, "meta");
        assert!(tree.children[0].self_closing);

        let ids: Vec<_> = tree
            .find_all("rule")
            .iter()
            .filter_map(|r| r.id.clone())
            .collect();
        assert_eq!(ids, vec!["root-rule", "middle-rule", "leaf-rule", "leaf-rule"]);
    }

    #[test]
    fn test_merge_without_metas_has_no_meta_node() {
        let root = archetype("root", "r");
        let tree = merge(&root);
        assert!(tree.find_all("meta").is_empty());
        assert_eq!(tree.children.len(), 1);
    }
}
