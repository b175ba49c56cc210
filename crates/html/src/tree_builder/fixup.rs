//! Passes over the finished tree: the `html`/`head`/`body` skeleton and
//! `title`, empty-element pruning, and whitespace normalisation.

use crate::dom::{Dom, NodeId, NodeKind};
use crate::report::{MessageCode, Report};
use crate::tags::{ContentModel, ParserKind, TagId, TagTable};

/// Make sure `html`, `head`, `body` (unless framed) and `title` exist.
pub fn fix_structure(dom: &mut Dom, tags: &TagTable, report: &mut Report) {
    let root = dom.root();
    let html = match dom.find_child(root, TagId::HTML) {
        Some(html) => html,
        None => {
            let html = implicit(dom, tags, TagId::HTML);
            dom.append_child(root, html);
            html
        }
    };
    let head = match dom.find_child(html, TagId::HEAD) {
        Some(head) => head,
        None => {
            let head = implicit(dom, tags, TagId::HEAD);
            match dom.first_child(html) {
                Some(first) => dom.insert_before(first, head),
                None => dom.append_child(html, head),
            }
            head
        }
    };
    if dom.find_child(html, TagId::FRAMESET).is_none() && dom.find_child(html, TagId::BODY).is_none() {
        let body = implicit(dom, tags, TagId::BODY);
        dom.append_child(html, body);
    }
    if dom.find_child(head, TagId::TITLE).is_none() {
        let (line, column) = dom.position(head);
        report.emit(MessageCode::MissingTitleElement, line, column, &[]);
        let title = implicit(dom, tags, TagId::TITLE);
        dom.append_child(head, title);
    }
}

fn implicit(dom: &mut Dom, tags: &TagTable, tag: TagId) -> NodeId {
    let node = dom.create(NodeKind::StartTag, Some(tag), tags.name(tag));
    let n = dom.node_mut(node);
    n.implicit = true;
    n.closed = true;
    node
}

/// Whether an element without content carries no meaning and can go.
fn can_prune(dom: &Dom, tags: &TagTable, node: NodeId, drop_empty_paras: bool) -> bool {
    let n = dom.node(node);
    if !n.is_element() || n.content.is_some() {
        return false;
    }
    let Some(tag) = n.tag else {
        return false;
    };
    let def = tags.get(tag);
    if def.model.intersects(ContentModel::EMPTY | ContentModel::ROW | ContentModel::NEW) {
        return false;
    }
    if def.model.contains(ContentModel::BLOCK) && !n.attributes.is_empty() {
        return false;
    }
    if n.has_attr("id") || n.has_attr("name") {
        return false;
    }
    match tag {
        TagId::A | TagId::OPTION => n.attributes.is_empty(),
        TagId::P => drop_empty_paras,
        TagId::SCRIPT => !n.has_attr("src"),
        TagId::HTML
        | TagId::HEAD
        | TagId::BODY
        | TagId::TITLE
        | TagId::APPLET
        | TagId::OBJECT
        | TagId::IFRAME
        | TagId::TEXTAREA
        | TagId::CANVAS
        | TagId::PROGRESS
        | TagId::COLGROUP
        | TagId::DD
        | TagId::FRAMESET => false,
        _ => true,
    }
}

/// Remove empty elements bottom-up, so containers emptied by pruning go too.
/// Kept empty paragraphs get a non-breaking space so they survive a re-parse.
pub fn prune_empty(dom: &mut Dom, tags: &TagTable, report: &mut Report, drop_empty_elements: bool, drop_empty_paras: bool) {
    let order: Vec<NodeId> = dom.descendants(dom.root()).collect();
    if drop_empty_elements {
        for &node in order.iter().rev() {
            if dom.parent(node).is_none() || !can_prune(dom, tags, node, drop_empty_paras) {
                continue;
            }
            if !dom.node(node).implicit {
                let (line, column) = dom.position(node);
                let name = dom.node(node).name.clone();
                report.emit(MessageCode::TrimEmptyElement, line, column, &[&name]);
            }
            remove_keeping_words_apart(dom, tags, node);
        }
    }
    if !drop_empty_paras {
        for &node in &order {
            if dom.is(node, TagId::P) && dom.parent(node).is_some() && dom.first_child(node).is_none() {
                let nbsp = dom.create_text(NodeKind::Text, "\u{a0}");
                dom.append_child(node, nbsp);
            }
        }
    }
}

/// Unlink `node`; when it was a block between two runs of text, a space keeps
/// the words on either side separate.
fn remove_keeping_words_apart(dom: &mut Dom, tags: &TagTable, node: NodeId) {
    let breaks = dom
        .tag(node)
        .is_some_and(|t| tags.get(t).breaks_line());
    let prev = dom.prev_sibling(node);
    let next = dom.next_sibling(node);
    dom.remove(node);
    if let (true, Some(prev), Some(next)) = (breaks, prev, next) {
        if dom.node(prev).is_text() && dom.node(next).is_text() && !dom.text(prev).ends_with(' ') {
            dom.push_text(prev, " ");
        }
    }
}

/// Re-establish the whitespace invariants the tree builder keeps: no
/// adjacent text nodes, no space next to a block boundary, and no space
/// opening or closing an inline element. Passes that remove or rewrite
/// elements run this before printing.
pub fn normalize_whitespace(dom: &mut Dom, tags: &TagTable) {
    let root = dom.root();
    normalize_children(dom, tags, root, false);
}

fn keeps_whitespace(tags: &TagTable, tag: Option<TagId>) -> bool {
    let Some(tag) = tag else {
        return false;
    };
    tag == TagId::TEXTAREA || matches!(tags.get(tag).parser, ParserKind::Pre | ParserKind::Script)
}

fn normalize_children(dom: &mut Dom, tags: &TagTable, node: NodeId, verbatim: bool) {
    let verbatim = verbatim || keeps_whitespace(tags, dom.tag(node));
    let children: Vec<NodeId> = dom.children(node).collect();
    for &child in &children {
        if dom.node(child).is_element() {
            normalize_children(dom, tags, child, verbatim);
        }
    }
    if verbatim || !dom.node(node).is_element() {
        merge_text_runs(dom, node, verbatim);
        return;
    }
    merge_text_runs(dom, node, false);
    let inline = dom.tag(node).is_some_and(|t| tags.get(t).is_inline());
    let children: Vec<NodeId> = dom.children(node).collect();
    for child in children {
        if !dom.node(child).is_text() {
            continue;
        }
        let breaks = |dom: &Dom, n: Option<NodeId>| {
            n.is_some_and(|n| {
                dom.node(n).is_element() && dom.tag(n).is_some_and(|t| tags.get(t).breaks_line())
            })
        };
        let prev = dom.prev_sibling(child);
        let next = dom.next_sibling(child);
        let text = dom.text(child);
        let len = text.len();
        let (leading, trailing) = (text.starts_with(' '), text.ends_with(' '));
        let mut start = 0;
        let mut end = len;
        if leading && (prev.is_none() || breaks(dom, prev)) {
            start = 1;
        }
        if trailing && end > start && (next.is_none() || breaks(dom, next)) {
            end -= 1;
        }
        let lead_out = start == 1 && prev.is_none() && inline;
        let trail_out = end < len && next.is_none() && inline;
        if start >= end {
            dom.remove(child);
        } else if start > 0 || end < len {
            dom.narrow_text(child, start..end);
        }
        if lead_out {
            space_outside(dom, node, true);
        }
        if trail_out {
            space_outside(dom, node, false);
        }
    }
}

/// Put a single space right before (or after) `node`, merging with adjacent text.
fn space_outside(dom: &mut Dom, node: NodeId, before: bool) {
    if dom.parent(node).is_none() {
        return;
    }
    let sibling = if before { dom.prev_sibling(node) } else { dom.next_sibling(node) };
    match sibling {
        Some(s) if dom.node(s).is_text() => {
            let text = dom.text(s);
            if before && !text.ends_with(' ') {
                dom.push_text(s, " ");
            } else if !before && !text.starts_with(' ') {
                let joined = format!(" {text}");
                dom.set_text(s, &joined);
            }
        }
        _ => {
            let space = dom.create_text(NodeKind::Text, " ");
            if before {
                dom.insert_before(node, space);
            } else {
                dom.insert_after(node, space);
            }
        }
    }
}

fn merge_text_runs(dom: &mut Dom, node: NodeId, verbatim: bool) {
    let mut child = dom.first_child(node);
    while let Some(current) = child {
        let next = dom.next_sibling(current);
        if let Some(next) = next {
            if dom.node(current).is_text() && dom.node(next).is_text() {
                let mut more = dom.text(next).to_string();
                if !verbatim && dom.text(current).ends_with(' ') && more.starts_with(' ') {
                    more.remove(0);
                }
                dom.push_text(current, &more);
                dom.remove(next);
                continue;
            }
        }
        child = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(dom: &mut Dom, parent: NodeId, s: &str) -> NodeId {
        let t = dom.create_text(NodeKind::Text, s);
        dom.append_child(parent, t);
        t
    }

    fn element(dom: &mut Dom, parent: NodeId, tag: TagId, name: &str) -> NodeId {
        let e = dom.create(NodeKind::StartTag, Some(tag), name);
        dom.append_child(parent, e);
        e
    }

    #[test]
    fn skeleton_and_title_are_created() {
        let tags = TagTable::new();
        let mut dom = Dom::new();
        let mut report = Report::new();
        fix_structure(&mut dom, &tags, &mut report);
        let html = dom.find_child(dom.root(), TagId::HTML).unwrap();
        let head = dom.find_child(html, TagId::HEAD).unwrap();
        assert!(dom.find_child(html, TagId::BODY).is_some());
        assert!(dom.find_child(head, TagId::TITLE).is_some());
        assert!(report.has_code("missing-title-element"));
        dom.check_links().unwrap();
    }

    #[test]
    fn pruning_cascades_and_keeps_words_apart() {
        let tags = TagTable::new();
        let mut dom = Dom::new();
        let mut report = Report::new();
        let body = element(&mut dom, NodeId::ROOT, TagId::BODY, "body");
        let div = element(&mut dom, body, TagId::DIV, "div");
        text(&mut dom, div, "a");
        let p = element(&mut dom, div, TagId::P, "p");
        element(&mut dom, p, TagId::B, "b");
        text(&mut dom, div, "b");
        prune_empty(&mut dom, &tags, &mut report, true, true);
        normalize_whitespace(&mut dom, &tags);
        assert_eq!(report.count_code("trim-empty-element"), 2);
        assert_eq!(dom.child_count(div), 1);
        assert_eq!(dom.text_content(div), "a b");
    }

    #[test]
    fn empty_paragraph_kept_with_placeholder() {
        let tags = TagTable::new();
        let mut dom = Dom::new();
        let mut report = Report::new();
        let body = element(&mut dom, NodeId::ROOT, TagId::BODY, "body");
        let p = element(&mut dom, body, TagId::P, "p");
        prune_empty(&mut dom, &tags, &mut report, true, false);
        assert_eq!(dom.text_content(p), "\u{a0}");
        assert!(report.is_empty());
    }

    #[test]
    fn spaces_move_out_of_inline_edges() {
        let tags = TagTable::new();
        let mut dom = Dom::new();
        let p = element(&mut dom, NodeId::ROOT, TagId::P, "p");
        text(&mut dom, p, "x");
        let b = element(&mut dom, p, TagId::B, "b");
        text(&mut dom, b, " bold ");
        text(&mut dom, p, "y ");
        normalize_whitespace(&mut dom, &tags);
        let texts: Vec<String> = dom
            .children(p)
            .map(|n| if dom.node(n).is_text() { dom.text(n).to_string() } else { "<b>".to_string() })
            .collect();
        assert_eq!(texts, vec!["x ", "<b>", " y"]);
        assert_eq!(dom.text_content(b), "bold");
    }
}
