//! Formatting utilities used for CLI output.

use regex::Regex;
use std::sync::OnceLock;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

fn ansi_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\x1B\[[0-9;]*[mK]").expect("ansi regex is valid"))
}

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

/// Remove ANSI escape sequences.
pub fn strip_ansi(s: &str) -> String {
    ansi_re().replace_all(s, "").into_owned()
}

/// Terminal columns taken by `s`, ignoring ANSI escapes.
pub fn visible_len(s: &str) -> usize {
    UnicodeWidthStr::width(strip_ansi(s).as_str())
}

/// Cut `s` to `max` terminal columns (ending in `...`). Colours are
/// dropped when truncation happens.
pub fn truncate_visible(s: &str, max: usize) -> String {
    let plain = strip_ansi(s);
    if UnicodeWidthStr::width(plain.as_str()) <= max {
        return s.to_string();
    }

    let budget = max.saturating_sub(3);
    let mut used = 0;
    let mut out = String::new();
    for c in plain.chars() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_and_truncate() {
        let red = "\x1b[31mirregular\x1b[0m";
        assert_eq!(strip_ansi(red), "irregular");
        assert_eq!(visible_len(red), 9);
        assert_eq!(truncate_visible(red, 20), red);
        assert_eq!(truncate_visible("abcdefghij", 6), "abc...");
    }

    #[test]
    fn test_width_counts_terminal_columns() {
        assert_eq!(visible_len("Jose\u{301}"), 4);
        assert_eq!(visible_len("李明"), 4);
        assert_eq!(truncate_visible("李明李明李明", 7), "李明...");
    }
}
