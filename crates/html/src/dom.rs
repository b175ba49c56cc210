//! Arena-backed document tree.
//!
//! Nodes are addressed by [`NodeId`]; `parent`, `prev` and `next` are plain
//! indices, so unlinking a node leaves it in the arena but unreachable from the
//! root. Character data lives in one shared text buffer and nodes refer to it
//! by byte span.

use crate::attrs::AttrId;
use crate::tags::TagId;
use std::ops::Range;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Root,
    DocType,
    Comment,
    ProcInstr,
    Text,
    StartTag,
    EndTag,
    StartEndTag,
    CData,
    XmlDecl,
    /// `<![if ...]>` style marked section.
    Section,
    Asp,
    Jste,
    Php,
}

impl NodeKind {
    pub fn is_element(self) -> bool {
        matches!(self, NodeKind::StartTag | NodeKind::StartEndTag)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Quote {
    None,
    Double,
    Single,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: Option<String>,
    pub attr: Option<AttrId>,
    pub quote: Quote,
    /// Produced by a templating directive (`<?php ?>`, `<% %>`); never validated.
    pub from_directive: bool,
    pub line: u32,
    pub column: u32,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: Option<String>) -> Self {
        let name = name.into();
        let attr = crate::attrs::lookup_attr(&name).map(|def| def.id);
        Self {
            name,
            value,
            attr,
            quote: Quote::Double,
            from_directive: false,
            line: 0,
            column: 0,
        }
    }

    pub fn value_str(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }
}

#[derive(Clone, Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub tag: Option<TagId>,
    /// Element name as written (lower-cased in HTML mode).
    pub name: String,
    pub attributes: Vec<Attribute>,
    text: Range<u32>,
    pub closed: bool,
    pub implicit: bool,
    pub line: u32,
    pub column: u32,
    pub parent: Option<NodeId>,
    pub prev: Option<NodeId>,
    pub next: Option<NodeId>,
    pub content: Option<NodeId>,
    pub last: Option<NodeId>,
}

impl Node {
    pub fn is_element(&self) -> bool {
        self.kind.is_element()
    }

    pub fn is_text(&self) -> bool {
        self.kind == NodeKind::Text
    }

    pub fn attr(&self, name: &str) -> Option<&Attribute> {
        self.attributes
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
    }

    pub fn attr_value(&self, name: &str) -> Option<&str> {
        self.attr(name).map(Attribute::value_str)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }
}

#[derive(Clone, Debug)]
pub struct Dom {
    nodes: Vec<Node>,
    text: String,
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom {
    pub fn new() -> Self {
        let root = Node {
            kind: NodeKind::Root,
            tag: None,
            name: String::new(),
            attributes: Vec::new(),
            text: 0..0,
            closed: true,
            implicit: false,
            line: 1,
            column: 1,
            parent: None,
            prev: None,
            next: None,
            content: None,
            last: None,
        };
        Self {
            nodes: vec![root],
            text: String::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Source line and column of `id`. Nodes made by repairs with no source
    /// position of their own report the start of the document.
    pub fn position(&self, id: NodeId) -> (u32, u32) {
        let n = &self.nodes[id.index()];
        if n.line == 0 {
            (1, 1)
        } else {
            (n.line, n.column.max(1))
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Create a detached node.
    pub fn create(&mut self, kind: NodeKind, tag: Option<TagId>, name: &str) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            tag,
            name: name.to_string(),
            attributes: Vec::new(),
            text: 0..0,
            closed: false,
            implicit: false,
            line: 0,
            column: 0,
            parent: None,
            prev: None,
            next: None,
            content: None,
            last: None,
        });
        id
    }

    /// Create a detached character-data node holding `text`.
    pub fn create_text(&mut self, kind: NodeKind, text: &str) -> NodeId {
        let id = self.create(kind, None, "");
        self.set_text(id, text);
        id
    }

    pub fn text(&self, id: NodeId) -> &str {
        let span = &self.nodes[id.index()].text;
        &self.text[span.start as usize..span.end as usize]
    }

    pub fn set_text(&mut self, id: NodeId, text: &str) {
        let start = self.text.len() as u32;
        self.text.push_str(text);
        let end = self.text.len() as u32;
        self.nodes[id.index()].text = start..end;
    }

    /// Append to a node's character data, reusing the span when it ends the buffer.
    pub fn push_text(&mut self, id: NodeId, more: &str) {
        let span = self.nodes[id.index()].text.clone();
        if span.end as usize == self.text.len() {
            self.text.push_str(more);
            self.nodes[id.index()].text.end = self.text.len() as u32;
            return;
        }
        let mut combined = String::with_capacity((span.end - span.start) as usize + more.len());
        combined.push_str(self.text(id));
        combined.push_str(more);
        self.set_text(id, &combined);
    }

    /// Shrink a node's text span to `range` (relative to its current text).
    pub fn narrow_text(&mut self, id: NodeId, range: Range<usize>) {
        let span = &mut self.nodes[id.index()].text;
        let start = span.start + range.start as u32;
        let end = span.start + range.end as u32;
        debug_assert!(end <= span.end && start <= end);
        *span = start..end;
    }

    pub fn tag(&self, id: NodeId) -> Option<TagId> {
        self.nodes[id.index()].tag
    }

    pub fn is(&self, id: NodeId, tag: TagId) -> bool {
        self.nodes[id.index()].tag == Some(tag)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].content
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].last
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].next
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].prev
    }

    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            dom: self,
            next: self.first_child(id),
        }
    }

    pub fn child_count(&self, id: NodeId) -> usize {
        self.children(id).count()
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(self.nodes[child.index()].parent.is_none());
        let last = self.nodes[parent.index()].last;
        {
            let node = &mut self.nodes[child.index()];
            node.parent = Some(parent);
            node.prev = last;
            node.next = None;
        }
        match last {
            Some(last) => self.nodes[last.index()].next = Some(child),
            None => self.nodes[parent.index()].content = Some(child),
        }
        self.nodes[parent.index()].last = Some(child);
    }

    pub fn insert_before(&mut self, sibling: NodeId, node: NodeId) {
        debug_assert!(self.nodes[node.index()].parent.is_none());
        let parent = self.nodes[sibling.index()].parent;
        let prev = self.nodes[sibling.index()].prev;
        {
            let n = &mut self.nodes[node.index()];
            n.parent = parent;
            n.prev = prev;
            n.next = Some(sibling);
        }
        self.nodes[sibling.index()].prev = Some(node);
        match prev {
            Some(prev) => self.nodes[prev.index()].next = Some(node),
            None => {
                if let Some(parent) = parent {
                    self.nodes[parent.index()].content = Some(node);
                }
            }
        }
    }

    pub fn insert_after(&mut self, sibling: NodeId, node: NodeId) {
        match self.nodes[sibling.index()].next {
            Some(next) => self.insert_before(next, node),
            None => match self.nodes[sibling.index()].parent {
                Some(parent) => self.append_child(parent, node),
                None => debug_assert!(false, "insert_after on a detached node"),
            },
        }
    }

    /// Unlink `id` from its parent; its subtree stays attached to it.
    pub fn remove(&mut self, id: NodeId) {
        let (parent, prev, next) = {
            let n = &self.nodes[id.index()];
            (n.parent, n.prev, n.next)
        };
        match prev {
            Some(prev) => self.nodes[prev.index()].next = next,
            None => {
                if let Some(parent) = parent {
                    self.nodes[parent.index()].content = next;
                }
            }
        }
        match next {
            Some(next) => self.nodes[next.index()].prev = prev,
            None => {
                if let Some(parent) = parent {
                    self.nodes[parent.index()].last = prev;
                }
            }
        }
        let n = &mut self.nodes[id.index()];
        n.parent = None;
        n.prev = None;
        n.next = None;
    }

    /// Replace `id` by its children, in place.
    pub fn unwrap(&mut self, id: NodeId) {
        while let Some(child) = self.first_child(id) {
            self.remove(child);
            self.insert_before(id, child);
        }
        self.remove(id);
    }

    /// Move every child of `from` to the end of `to`.
    pub fn move_children(&mut self, from: NodeId, to: NodeId) {
        while let Some(child) = self.first_child(from) {
            self.remove(child);
            self.append_child(to, child);
        }
    }

    /// Pre-order traversal of `id` and everything below it.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            dom: self,
            root: id,
            next: Some(id),
        }
    }

    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&n| self.parent(n))
    }

    pub fn find_tag(&self, from: NodeId, tag: TagId) -> Option<NodeId> {
        self.descendants(from).find(|&n| self.is(n, tag))
    }

    pub fn find_child(&self, parent: NodeId, tag: TagId) -> Option<NodeId> {
        self.children(parent).find(|&n| self.is(n, tag))
    }

    /// Concatenated text content below `id`.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for n in self.descendants(id) {
            if self.node(n).kind == NodeKind::Text {
                out.push_str(self.text(n));
            }
        }
        out
    }

    /// Verify parent/child/sibling links for every node reachable from the root.
    pub fn check_links(&self) -> Result<(), String> {
        for id in self.descendants(self.root()) {
            let node = self.node(id);
            let mut prev = None;
            let mut child = node.content;
            while let Some(c) = child {
                let cn = self.node(c);
                if cn.parent != Some(id) {
                    return Err(format!("node {} has wrong parent", c.0));
                }
                if cn.prev != prev {
                    return Err(format!("node {} has wrong prev link", c.0));
                }
                prev = Some(c);
                child = cn.next;
            }
            if node.last != prev {
                return Err(format!("node {} has wrong last link", id.0));
            }
        }
        Ok(())
    }
}

pub struct Children<'a> {
    dom: &'a Dom,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.dom.next_sibling(current);
        Some(current)
    }
}

pub struct Descendants<'a> {
    dom: &'a Dom,
    root: NodeId,
    next: Option<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = if let Some(child) = self.dom.first_child(current) {
            Some(child)
        } else {
            let mut node = current;
            loop {
                if node == self.root {
                    break None;
                }
                if let Some(next) = self.dom.next_sibling(node) {
                    break Some(next);
                }
                match self.dom.parent(node) {
                    Some(parent) => node = parent,
                    None => break None,
                }
            }
        };
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(dom: &mut Dom, tag: TagId, name: &str) -> NodeId {
        dom.create(NodeKind::StartTag, Some(tag), name)
    }

    #[test]
    fn append_insert_and_remove_keep_links_consistent() {
        let mut dom = Dom::new();
        let body = element(&mut dom, TagId::BODY, "body");
        dom.append_child(dom.root(), body);
        let a = dom.create_text(NodeKind::Text, "a");
        let b = element(&mut dom, TagId::B, "b");
        let c = dom.create_text(NodeKind::Text, "c");
        dom.append_child(body, a);
        dom.append_child(body, c);
        dom.insert_before(c, b);
        assert_eq!(dom.children(body).collect::<Vec<_>>(), vec![a, b, c]);
        dom.remove(a);
        assert_eq!(dom.first_child(body), Some(b));
        dom.remove(c);
        assert_eq!(dom.last_child(body), Some(b));
        dom.check_links().unwrap();
    }

    #[test]
    fn unwrap_hoists_children() {
        let mut dom = Dom::new();
        let div = element(&mut dom, TagId::DIV, "div");
        dom.append_child(dom.root(), div);
        let font = element(&mut dom, TagId::FONT, "font");
        dom.append_child(div, font);
        let t = dom.create_text(NodeKind::Text, "x");
        dom.append_child(font, t);
        dom.unwrap(font);
        assert_eq!(dom.children(div).collect::<Vec<_>>(), vec![t]);
        assert_eq!(dom.parent(font), None);
        dom.check_links().unwrap();
    }

    #[test]
    fn descendants_visits_in_document_order_without_escaping_the_subtree() {
        let mut dom = Dom::new();
        let ul = element(&mut dom, TagId::UL, "ul");
        let after = element(&mut dom, TagId::P, "p");
        dom.append_child(dom.root(), ul);
        dom.append_child(dom.root(), after);
        let li1 = element(&mut dom, TagId::LI, "li");
        let li2 = element(&mut dom, TagId::LI, "li");
        dom.append_child(ul, li1);
        dom.append_child(ul, li2);
        assert_eq!(dom.descendants(ul).collect::<Vec<_>>(), vec![ul, li1, li2]);
        assert_eq!(dom.descendants(dom.root()).count(), 5);
    }

    #[test]
    fn push_text_extends_and_copies() {
        let mut dom = Dom::new();
        let t = dom.create_text(NodeKind::Text, "ab");
        dom.push_text(t, "cd");
        assert_eq!(dom.text(t), "abcd");
        let u = dom.create_text(NodeKind::Text, "zz");
        dom.push_text(t, "!");
        assert_eq!(dom.text(t), "abcd!");
        assert_eq!(dom.text(u), "zz");
        dom.narrow_text(t, 1..3);
        assert_eq!(dom.text(t), "bc");
    }
}
