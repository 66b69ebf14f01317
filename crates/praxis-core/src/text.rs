//! Text primitives
//!
//! Small formatting helpers shared by the renderer and the pseudo-syntax
//! generator. Output is markdown-flavoured prose for LLM consumption, so nothing
//! here escapes its input.

use lazy_static::lazy_static;
use regex::Regex;

/// Arrow used between a directive and its result
pub const ARROW: &str = "→";

/// Horizontal separator
pub const SEPARATOR: &str = "---";

/// Status vocabulary wrapped in code markers by [`auto_code`]
pub const STATUS_TOKENS: [&str; 13] = [
    "pending",
    "in_progress",
    "completed",
    "tested",
    "validated",
    "stopped",
    "canceled",
    "draft",
    "active",
    "inactive",
    "archived",
    "success",
    "failure",
];

lazy_static! {
    static ref STATUS_PATTERN: Regex =
        Regex::new(&format!(r"\b(?:{})\b", STATUS_TOKENS.join("|"))).unwrap();
}

const QUOTES: [char; 3] = ['"', '\'', '`'];

pub fn bold(text: &str) -> String {
    format!("**{}**", text)
}

pub fn code(text: &str) -> String {
    format!("`{}`", text)
}

/// Markdown header; `level` is clamped to 1..=6
pub fn header(level: usize, text: &str) -> String {
    format!("{} {}", "#".repeat(level.clamp(1, 6)), text)
}

pub fn bullet(text: &str) -> String {
    format!("- {}", text)
}

/// Join two fragments with a spaced arrow
pub fn arrow(left: &str, right: &str) -> String {
    format!("{} {} {}", left, ARROW, right)
}

/// Bolded label followed by a value, e.g. `**why**: reason`
pub fn labeled(label: &str, value: &str) -> String {
    format!("{}: {}", bold(label), value)
}

/// Turn an identifier like `task_tracking-rules` into `task tracking rules`
pub fn humanize_id(id: &str) -> String {
    id.replace(['_', '-'], " ")
}

/// Upper snake case: `taskId`, `task id`, `agent.explore` all become `TASK_ID`-style names
pub fn upper_snake(name: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev: Option<char> = None;

    for ch in name.chars() {
        if !ch.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev = None;
            continue;
        }
        if ch.is_uppercase() {
            if let Some(p) = prev {
                if p.is_lowercase() || p.is_ascii_digit() {
                    words.push(std::mem::take(&mut current));
                }
            }
        }
        current.push(ch);
        prev = Some(ch);
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
        .iter()
        .map(|w| w.to_uppercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Wrap whole-word status tokens in code markers.
///
/// Matching is case-sensitive. A token already touching a quote or backtick is
/// left alone.
pub fn auto_code(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    let mut last = 0;

    for m in STATUS_PATTERN.find_iter(text) {
        let before = text[..m.start()].chars().next_back();
        let after = text[m.end()..].chars().next();
        let quoted = before.map_or(false, |c| QUOTES.contains(&c))
            || after.map_or(false, |c| QUOTES.contains(&c));

        out.push_str(&text[last..m.start()]);
        if quoted {
            out.push_str(m.as_str());
        } else {
            out.push_str(&code(m.as_str()));
        }
        last = m.end();
    }
    out.push_str(&text[last..]);
    out
}
