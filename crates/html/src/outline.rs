//! Indented one-line-per-node view of a tree, for tests and debugging.

use crate::dom::{Dom, NodeId, NodeKind};
use crate::tags::TagTable;
use std::fmt::Write;

const INDENT_STEP: &str = "  ";
const PREVIEW_CHARS: usize = 40;

/// Render at most `cap` nodes below the root. Elements show their attributes
/// in source order; inferred elements are marked `(implicit)`. Text is shown
/// quoted with newlines escaped; whitespace-only text is skipped.
pub fn outline(dom: &Dom, tags: &TagTable, cap: usize) -> Vec<String> {
    struct IndentGuard<'a> {
        indent: &'a mut String,
    }

    impl Drop for IndentGuard<'_> {
        fn drop(&mut self) {
            let new_len = self.indent.len() - INDENT_STEP.len();
            self.indent.truncate(new_len);
        }
    }

    fn preview(out: &mut String, text: &str) {
        for (i, ch) in text.chars().enumerate() {
            if i == PREVIEW_CHARS {
                out.push('…');
                break;
            }
            match ch {
                '\n' => out.push_str("\\n"),
                '"' => out.push_str("\\\""),
                _ => out.push(ch),
            }
        }
    }

    fn walk(dom: &Dom, tags: &TagTable, node: NodeId, indent: &mut String, out: &mut Vec<String>, left: &mut usize) {
        if *left == 0 {
            return;
        }
        *left -= 1;
        let n = dom.node(node);
        let text = dom.text(node);
        let mut line = String::with_capacity(indent.len() + 64);
        line.push_str(indent);
        match n.kind {
            NodeKind::StartTag | NodeKind::StartEndTag => {
                line.push('<');
                line.push_str(n.tag.map_or(n.name.as_str(), |t| tags.name(t)));
                for attr in &n.attributes {
                    let _ = match &attr.value {
                        Some(value) => write!(line, " {}=\"{}\"", attr.name, value),
                        None => write!(line, " {}", attr.name),
                    };
                }
                line.push('>');
                if n.implicit {
                    line.push_str(" (implicit)");
                }
            }
            NodeKind::Text => {
                if tools::text::is_blank(text) {
                    return;
                }
                line.push('"');
                preview(&mut line, text);
                line.push('"');
            }
            NodeKind::Comment => {
                line.push_str("<!-- ");
                preview(&mut line, text);
                line.push_str(" -->");
            }
            NodeKind::DocType => {
                let _ = write!(line, "<!DOCTYPE {text}>");
            }
            kind => {
                let _ = write!(line, "#{kind:?} ");
                preview(&mut line, text);
            }
        }
        out.push(line);
        indent.push_str(INDENT_STEP);
        let mut guard = IndentGuard { indent };
        for child in dom.children(node) {
            walk(dom, tags, child, &mut *guard.indent, out, left);
        }
    }

    let mut out = Vec::new();
    let mut left = cap;
    let mut indent = String::new();
    for child in dom.children(dom.root()) {
        walk(dom, tags, child, &mut indent, &mut out, &mut left);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Report;
    use crate::tree_builder::{BuildOptions, build_tree};

    #[test]
    fn shows_inferred_structure() {
        let tags = TagTable::new();
        let mut report = Report::new();
        let dom = build_tree("<ul><p>x</p></ul>", BuildOptions::default(), &tags, &mut report);
        let lines = outline(&dom, &tags, usize::MAX);
        assert!(lines.iter().any(|l| l.trim() == "<li> (implicit)"), "{lines:#?}");
        assert!(lines.iter().any(|l| l.trim() == "\"x\""), "{lines:#?}");
    }

    #[test]
    fn cap_limits_nodes() {
        let tags = TagTable::new();
        let mut report = Report::new();
        let dom = build_tree("<p>a</p><p>b</p>", BuildOptions::default(), &tags, &mut report);
        assert_eq!(outline(&dom, &tags, 2).len(), 2);
    }
}
