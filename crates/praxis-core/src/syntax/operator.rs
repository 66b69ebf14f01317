//! Control-flow directives: `IF`, `FOREACH`, `TASK`

use super::{Body, LayoutOptions};
use crate::text::ARROW;

/// Directive builder bound to one layout configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct Operator {
    layout: LayoutOptions,
}

impl Operator {
    pub fn new(layout: LayoutOptions) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> LayoutOptions {
        self.layout
    }

    pub fn if_stmt(&self, condition: &str, then: impl Into<Body>, otherwise: Option<Body>) -> String {
        let then = then.into();
        let head = format!("IF({})", condition);

        match otherwise {
            None => self.directive(&head, "END-IF", &[&then]),
            Some(otherwise) => {
                if let (Some(a), Some(b)) = (then.as_inline(), otherwise.as_inline()) {
                    let line = format!("{} {} {} {} ELSE {} {}", head, ARROW, a, ARROW, ARROW, b);
                    if self.fits(&line) {
                        return line;
                    }
                }
                let mut out = self.open(&head);
                self.push_body(&mut out, &then);
                out.push(format!("{} ELSE {}", ARROW, ARROW));
                self.push_body(&mut out, &otherwise);
                out.push(format!("{} END-IF", ARROW));
                out.join("\n")
            }
        }
    }

    pub fn for_each(&self, condition: &str, body: impl Into<Body>) -> String {
        let body = body.into();
        self.directive(&format!("FOREACH({})", condition), "END-FOREACH", &[&body])
    }

    /// Ordered steps of a task; a single short step stays on one line
    pub fn task<I, S>(&self, steps: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut steps: Vec<String> = steps.into_iter().map(Into::into).collect();
        let body = if steps.len() == 1 {
            Body::Line(steps.remove(0))
        } else {
            Body::Lines(steps)
        };
        self.directive("TASK", "END-TASK", &[&body])
    }

    fn directive(&self, head: &str, terminator: &str, bodies: &[&Body]) -> String {
        if let [body] = bodies {
            if let Some(line) = body.as_inline() {
                let inline = format!("{} {} {}", head, ARROW, line);
                if self.fits(&inline) {
                    return inline;
                }
            }
        }

        let mut out = self.open(head);
        for body in bodies {
            self.push_body(&mut out, body);
        }
        out.push(format!("{} {}", ARROW, terminator));
        out.join("\n")
    }

    fn fits(&self, line: &str) -> bool {
        line.chars().count() <= self.layout.inline_threshold
    }

    fn open(&self, head: &str) -> Vec<String> {
        vec![format!("{} {}", head, ARROW)]
    }

    fn push_body(&self, out: &mut Vec<String>, body: &Body) {
        let pad = " ".repeat(self.layout.indent);
        out.extend(body.lines().into_iter().map(|line| format!("{}{}", pad, line)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_if_inline() {
        let op = Operator::default();
        assert_eq!(op.if_stmt("a==b", "short", None), "IF(a==b) → short");
    }

    #[test]
    fn test_if_block_for_line_list() {
        let op = Operator::default();
        let out = op.if_stmt("a==b", ["line1", "line2"], None);
        assert_eq!(out, "IF(a==b) →\n  line1\n  line2\n→ END-IF");
    }

    #[test]
    fn test_if_inline_with_else() {
        let op = Operator::default();
        assert_eq!(
            op.if_stmt("ok", "go", Some("stop".into())),
            "IF(ok) → go → ELSE → stop"
        );
    }

    #[test]
    fn test_if_with_else_block_when_long() {
        let op = Operator::new(LayoutOptions::default().with_inline_threshold(10));
        let out = op.if_stmt("ok", "continue with work", Some("stop".into()));
        assert_eq!(out, "IF(ok) →\n  continue with work\n→ ELSE →\n  stop\n→ END-IF");
    }

    #[test]
    fn test_threshold_boundary() {
        let op = Operator::default();
        // "IF(c) → " is 8 characters; 52 more lands exactly on 60.
        let at_limit = "x".repeat(52);
        assert!(!op.if_stmt("c", at_limit.as_str(), None).contains('\n'));
        let over = "x".repeat(53);
        assert!(op.if_stmt("c", over.as_str(), None).ends_with("→ END-IF"));
    }

    #[test]
    fn test_for_each_and_task() {
        let op = Operator::default();
        assert_eq!(op.for_each("$FILES", "scan"), "FOREACH($FILES) → scan");
        assert_eq!(op.task(["read"]), "TASK → read");
        assert_eq!(
            op.task(["read", "write"]),
            "TASK →\n  read\n  write\n→ END-TASK"
        );
    }

    #[test]
    fn test_nested_blocks_indent_every_line() {
        let op = Operator::default();
        let inner = op.task(["a", "b"]);
        let outer = op.for_each("$ITEMS", inner);
        assert_eq!(
            outer,
            "FOREACH($ITEMS) →\n  TASK →\n    a\n    b\n  → END-TASK\n→ END-FOREACH"
        );
    }
}
