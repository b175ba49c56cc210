//! Small string helpers used across the engine.

use memchr::{memchr, memchr2};

/// Case-insensitive ASCII substring search.
pub fn contains_ignore_ascii_case(haystack: &str, needle: &[u8]) -> bool {
    find_ignore_ascii_case(haystack.as_bytes(), needle).is_some()
}

/// Position of the first case-insensitive ASCII match of `needle` in `hay`.
pub fn find_ignore_ascii_case(hay: &[u8], needle: &[u8]) -> Option<usize> {
    let n = needle.len();
    if n == 0 {
        return Some(0);
    }
    if hay.len() < n {
        return None;
    }
    let first = needle[0];
    let (a, b) = if first.is_ascii_alphabetic() {
        (first.to_ascii_lowercase(), first.to_ascii_uppercase())
    } else {
        (first, first)
    };
    let mut i = 0;
    while i + n <= hay.len() {
        let rel = if a == b {
            memchr(a, &hay[i..])
        } else {
            memchr2(a, b, &hay[i..])
        };
        let pos = i + rel?;
        if pos + n <= hay.len() && hay[pos..pos + n].eq_ignore_ascii_case(needle) {
            return Some(pos);
        }
        i = pos + 1;
    }
    None
}

pub fn starts_with_ignore_ascii_case(haystack: &str, prefix: &str) -> bool {
    haystack.len() >= prefix.len()
        && haystack.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

pub fn ends_with_ignore_ascii_case(haystack: &str, suffix: &str) -> bool {
    let (h, s) = (haystack.as_bytes(), suffix.as_bytes());
    h.len() >= s.len() && h[h.len() - s.len()..].eq_ignore_ascii_case(s)
}

/// HTML whitespace: space, tab, LF, FF, CR.
pub fn is_html_space(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\x0C' | '\r')
}

pub fn is_blank(text: &str) -> bool {
    text.chars().all(|ch| is_html_space(ch) || ch == '\u{A0}')
}

/// Collapse runs of HTML whitespace into a single space.
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for ch in text.chars() {
        if is_html_space(ch) {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(ch);
            in_space = false;
        }
    }
    out
}

pub fn word_count(text: &str) -> usize {
    text.split(is_html_space).filter(|w| !w.is_empty()).count()
}

/// Count of UTF-8 characters, used for heuristic length thresholds.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// 1-based line and column of byte `offset` within `text`.
pub fn line_col(text: &str, offset: usize) -> (u32, u32) {
    let offset = offset.min(text.len());
    let mut line = 1u32;
    let mut col = 1u32;
    for (index, ch) in text.char_indices() {
        if index >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    (line, col)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substring_search_is_case_insensitive() {
        assert!(contains_ignore_ascii_case("Text/HTML; charset=utf-8", b"text/html"));
        assert!(!contains_ignore_ascii_case("text/plain", b"html"));
        assert_eq!(find_ignore_ascii_case(b"aXbxc", b"XC"), Some(3));
    }

    #[test]
    fn collapse_keeps_single_spaces() {
        assert_eq!(collapse_whitespace(" a \n\t b  "), " a b ");
        assert_eq!(word_count("  one two\nthree "), 3);
    }

    #[test]
    fn line_col_counts_newlines() {
        let text = "ab\ncd\nef";
        assert_eq!(line_col(text, 0), (1, 1));
        assert_eq!(line_col(text, 4), (2, 2));
        assert_eq!(line_col(text, 100), (3, 3));
    }
}
