//! Line-oriented configuration files: `name: value` pairs, `//` and `#`
//! comments, and continuation lines that start with whitespace.

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigEntry {
    pub name: String,
    pub value: String,
    /// 1-based line the entry starts on.
    pub line: u32,
}

pub fn parse_config_text(text: &str) -> Vec<ConfigEntry> {
    let mut entries: Vec<ConfigEntry> = Vec::new();
    let mut continuing = false;
    for (index, raw) in text.lines().enumerate() {
        let line_no = index as u32 + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continuing = false;
            continue;
        }
        // Only a marker in the first column starts a comment.
        if raw.starts_with("//") || raw.starts_with('#') {
            continue;
        }
        let indented = raw.starts_with([' ', '\t']);
        if indented && continuing {
            if let Some(last) = entries.last_mut() {
                if !last.value.is_empty() {
                    last.value.push(' ');
                }
                last.value.push_str(trimmed);
            }
            continue;
        }
        let (name, value) = match trimmed.split_once(':') {
            Some((name, value)) => (name.trim(), value.trim()),
            None => (trimmed, ""),
        };
        entries.push(ConfigEntry {
            name: name.to_string(),
            value: value.to_string(),
            line: line_no,
        });
        continuing = true;
    }
    log::debug!(target: "html.config", "parsed {} configuration entries", entries.len());
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_comments_and_continuations() {
        let text = "// settings\nindent: auto\n# more\nnew-blocklevel-tags: card,\n  deck\n\nwrap:72\n";
        let entries = parse_config_text(text);
        let pairs: Vec<(&str, &str, u32)> = entries
            .iter()
            .map(|e| (e.name.as_str(), e.value.as_str(), e.line))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("indent", "auto", 2),
                ("new-blocklevel-tags", "card, deck", 4),
                ("wrap", "72", 7),
            ]
        );
    }

    #[test]
    fn indented_markers_continue_the_value() {
        let entries = parse_config_text("alt-text: see\n  # below\n");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].value, "see # below");
    }

    #[test]
    fn lines_without_a_colon_become_empty_values() {
        let entries = parse_config_text("bogus\n");
        assert_eq!(entries[0].name, "bogus");
        assert_eq!(entries[0].value, "");
    }
}
