//! Shared helpers for the engine's golden tests: fixture loading, name
//! filtering and readable line diffs.

pub mod fixtures;

#[cfg(feature = "engine")]
pub mod runner;

pub use fixtures::{Fixture, FixtureFilter, FixtureStatus, load_fixtures};

/// Escape control characters so a line can be shown in a failure message.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            ch if ch < ' ' => {
                use std::fmt::Write;
                let _ = write!(&mut out, "\\u{{{:02X}}}", ch as u32);
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Split text into lines for [`diff_lines`], keeping a trailing empty line
/// when the text doesn't end in a newline.
pub fn text_lines(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = text.split('\n').map(escape_text).collect();
    if text.ends_with('\n') {
        lines.pop();
    }
    lines
}

/// Describe the first differing line with two lines of context either side.
pub fn diff_lines(expected: &[String], actual: &[String]) -> String {
    use std::fmt::Write;
    const MISSING: &str = "<missing>";
    let max = expected.len().max(actual.len());
    let line = |lines: &[String], i: usize| lines.get(i).map_or(MISSING, String::as_str).to_string();
    let mut out = String::new();
    let mismatch = (0..max).find(|&i| line(expected, i) != line(actual, i));
    match mismatch {
        Some(i) => {
            let start = i.saturating_sub(2);
            let end = (i + 3).min(max);
            let _ = writeln!(out, "first mismatch at line {} (showing {}..={}):", i + 1, start + 1, end);
            for idx in start..end {
                let marker = if idx == i { ">" } else { " " };
                let _ = writeln!(out, "{marker} {:>4}  expected: {}", idx + 1, line(expected, idx));
                let _ = writeln!(out, "{marker} {:>4}    actual: {}", idx + 1, line(actual, idx));
            }
        }
        None if expected.len() != actual.len() => {
            let _ = writeln!(out, "prefix matched but lengths differ");
        }
        None => {}
    }
    let _ = writeln!(out, "expected {} lines, actual {} lines", expected.len(), actual.len());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diff_points_at_first_difference() {
        let expected = text_lines("a\nb\nc\n");
        let actual = text_lines("a\nx\nc\n");
        let diff = diff_lines(&expected, &actual);
        assert!(diff.contains("first mismatch at line 2"), "{diff}");
        assert!(diff.contains("expected: b"));
        assert!(diff.contains("actual: x"));
    }

    #[test]
    fn lines_keep_visible_escapes() {
        assert_eq!(text_lines("a\tb\r\n"), vec!["a\\tb\\r".to_string()]);
    }
}
