//! Terminal text shaping: markdown-lite rendering, previews and separators.

use colored::Colorize;
use regex::{Captures, Regex};
use serde_json::Value;
use std::sync::LazyLock;

use crate::constants::{ARG_PREVIEW_CHARS, RESULT_PREVIEW_CHARS, SEPARATOR_MAX_WIDTH};

static BOLD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("bold pattern is valid"));

static CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`]+)`").expect("inline code pattern is valid"));

/// Minimal markdown renderer for terminal output.
///
/// Not a full parser. Handles the common patterns in model output:
/// `**bold**`, `` `inline code` `` and fenced code blocks.
pub fn render_markdown_lite(text: &str) -> String {
    let mut lines = Vec::new();
    let mut in_code_block = false;

    for line in text.lines() {
        if let Some(lang) = line.strip_prefix("```") {
            in_code_block = !in_code_block;
            if in_code_block && !lang.trim().is_empty() {
                lines.push(format!("  {}", lang.trim().dimmed()));
            }
            continue;
        }
        if in_code_block {
            lines.push(format!("  {}", line.dimmed()));
        } else {
            lines.push(render_inline(line));
        }
    }
    lines.join("\n")
}

/// Handle `**bold**` and `` `inline code` `` within a single line.
fn render_inline(line: &str) -> String {
    let bold = BOLD_RE.replace_all(line, |caps: &Captures| caps[1].bold().to_string());
    CODE_RE
        .replace_all(&bold, |caps: &Captures| caps[1].dimmed().to_string())
        .into_owned()
}

/// First `max` characters of `s`.
fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Tool name with its first letter upper-cased, for action notices.
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Short preview of a tool invocation's first argument value.
pub fn arg_preview(input: &Value) -> String {
    let first = match input {
        Value::Object(map) => map.values().next(),
        _ => None,
    };
    let text = match first {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    };
    truncate_chars(&text, ARG_PREVIEW_CHARS)
}

/// One-line preview of a tool result: the first line, cut to width, plus a
/// count of the remaining lines.
pub fn result_preview(result: &str) -> String {
    let mut lines = result.split('\n');
    let first = lines.next().unwrap_or_default();
    let rest = lines.count();

    let mut preview = truncate_chars(first, RESULT_PREVIEW_CHARS);
    if rest > 0 {
        preview.push_str(&format!(" ... +{} lines", rest));
    } else if first.chars().count() > RESULT_PREVIEW_CHARS {
        preview.push_str("...");
    }
    preview
}

/// Horizontal rule sized to the terminal, at most 80 columns.
pub fn separator() -> String {
    let width = terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(SEPARATOR_MAX_WIDTH)
        .min(SEPARATOR_MAX_WIDTH);
    "─".repeat(width).dimmed().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("read_file"), "Read_file");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_arg_preview_uses_first_value() {
        assert_eq!(arg_preview(&json!({"path": "src/main.rs", "content": "x"})), "src/main.rs");
        assert_eq!(arg_preview(&json!({"n": 3})), "3");
        assert_eq!(arg_preview(&json!({})), "");
    }

    #[test]
    fn test_arg_preview_truncates() {
        let long = "x".repeat(80);
        assert_eq!(arg_preview(&json!({ "cmd": long })).chars().count(), 50);
    }

    #[test]
    fn test_result_preview_multiline() {
        assert_eq!(result_preview("first\nsecond\nthird"), "first ... +2 lines");
    }

    #[test]
    fn test_result_preview_long_single_line() {
        let line = "y".repeat(70);
        assert_eq!(result_preview(&line), format!("{}...", "y".repeat(60)));
        assert_eq!(result_preview("short"), "short");
    }

    #[test]
    fn test_markdown_lite_plain_passthrough() {
        colored::control::set_override(false);
        assert_eq!(render_markdown_lite("a **b** `c`\n```rust\nlet x;\n```"), "a b c\n  rust\n  let x;");
    }
}
