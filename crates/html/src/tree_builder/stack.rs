use crate::dom::{Attribute, NodeId};
use crate::lexer::LexMode;
use crate::tags::{ParserKind, TagId};

/// One entry of the open-element stack.
#[derive(Clone, Debug)]
pub(crate) struct OpenElement {
    pub node: NodeId,
    /// Tag that closes this entry (the obsolete tag for elements rewritten to `pre`).
    pub tag: Option<TagId>,
    pub name: String,
    pub kind: ParserKind,
    pub mode: LexMode,
    /// Implicit clone of an inline element interrupted by a block.
    pub reopened: bool,
    /// Drop the node from the tree once it closes.
    pub discard: bool,
}

/// An inline formatting element closed by a block start that is re-opened
/// inside following content until its own end tag arrives.
#[derive(Clone, Debug)]
pub(crate) struct PendingInline {
    pub tag: TagId,
    pub name: String,
    pub attributes: Vec<Attribute>,
    /// Stack depth the original element had; clones reopen outermost first.
    pub depth: usize,
    pub table_depth: usize,
    /// The clone currently open, if any.
    pub open_node: Option<NodeId>,
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Default)]
pub(crate) struct OpenStack {
    entries: Vec<OpenElement>,
}

impl OpenStack {
    pub fn push(&mut self, entry: OpenElement) {
        self.entries.push(entry);
    }

    pub fn pop(&mut self) -> Option<OpenElement> {
        // The document root never leaves the stack.
        if self.entries.len() <= 1 {
            return None;
        }
        self.entries.pop()
    }

    pub fn top(&self) -> &OpenElement {
        self.entries
            .last()
            .unwrap_or_else(|| unreachable!("root entry is never popped"))
    }

    pub fn top_mut(&mut self) -> Option<&mut OpenElement> {
        self.entries.last_mut()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, index: usize) -> Option<&OpenElement> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OpenElement> {
        self.entries.iter()
    }

    /// Index of the nearest entry whose closing tag is `tag`.
    pub fn find(&self, tag: TagId) -> Option<usize> {
        self.entries.iter().rposition(|e| e.tag == Some(tag))
    }

    pub fn table_depth(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.kind == ParserKind::Table)
            .count()
    }

    /// Index of the nearest open table, if any.
    pub fn table_index(&self) -> Option<usize> {
        self.entries.iter().rposition(|e| e.kind == ParserKind::Table)
    }
}
