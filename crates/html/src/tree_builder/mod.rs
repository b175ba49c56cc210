//! Error-correcting tree construction.
//!
//! The builder pulls tokens from the [`Lexer`] and keeps an explicit stack of
//! open elements. Each token is dispatched on the parser kind of the element on
//! top of the stack; a routine either consumes the token or changes the stack
//! (closing or inferring an element) and asks for the token to be dispatched
//! again. Every repair is reported and none of them abort the build.

mod block;
mod document;
mod fixup;
mod list;
mod select;
mod stack;
mod table;
mod xml;

pub use fixup::{fix_structure, normalize_whitespace, prune_empty};

use crate::dom::{Dom, NodeId, NodeKind};
use crate::lexer::{LexMode, Lexer, LexerConfig, Token};
use crate::report::{MessageCode, Report};
use crate::tags::{ParserKind, TagDef, TagId, TagTable};
use stack::{OpenElement, OpenStack, PendingInline};

#[derive(Clone, Copy, Debug)]
pub struct BuildOptions {
    /// Generic well-formed parsing with no HTML knowledge.
    pub xml: bool,
    pub coerce_endtags: bool,
    pub enclose_text: bool,
    pub enclose_block_text: bool,
    pub lexer: LexerConfig,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            xml: false,
            coerce_endtags: true,
            enclose_text: false,
            enclose_block_text: false,
            lexer: LexerConfig::default(),
        }
    }
}

/// Outcome of one dispatch: the token was consumed, or the stack changed and
/// the token must be dispatched again.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    Done,
    Retry,
}

/// Parse `input` into a fresh tree, reporting repairs into `report`.
pub fn build_tree(input: &str, options: BuildOptions, tags: &TagTable, report: &mut Report) -> Dom {
    TreeBuilder::new(input, options, tags, report).run()
}

pub(crate) struct TreeBuilder<'a> {
    lexer: Lexer<'a>,
    tags: &'a TagTable,
    report: &'a mut Report,
    options: BuildOptions,
    dom: Dom,
    stack: OpenStack,
    pending: Vec<PendingInline>,
    /// Table that elements are being moved in front of.
    hoist_before: Option<NodeId>,
    html: Option<NodeId>,
    head: Option<NodeId>,
    body: Option<NodeId>,
    frameset: Option<NodeId>,
    seen_elements: bool,
    seen_title: bool,
    seen_base: bool,
    body_ended: bool,
    reported_after_body: bool,
}

impl<'a> TreeBuilder<'a> {
    pub(crate) fn new(
        input: &'a str,
        options: BuildOptions,
        tags: &'a TagTable,
        report: &'a mut Report,
    ) -> Self {
        let mut lexer_config = options.lexer;
        lexer_config.xml = options.xml;
        let mut stack = OpenStack::default();
        stack.push(OpenElement {
            node: NodeId::ROOT,
            tag: None,
            name: String::new(),
            kind: if options.xml { ParserKind::Xml } else { ParserKind::Html },
            mode: LexMode::IgnoreWhitespace,
            reopened: false,
            discard: false,
        });
        Self {
            lexer: Lexer::new(input, lexer_config),
            tags,
            report,
            options,
            dom: Dom::new(),
            stack,
            pending: Vec::new(),
            hoist_before: None,
            html: None,
            head: None,
            body: None,
            frameset: None,
            seen_elements: false,
            seen_title: false,
            seen_base: false,
            body_ended: false,
            reported_after_body: false,
        }
    }

    pub(crate) fn run(mut self) -> Dom {
        while let Some(token) = self.next_token() {
            self.process(token);
        }
        self.finish();
        log::debug!(target: "html.tree_builder", "built tree with {} nodes", self.dom.len());
        self.dom
    }

    fn next_token(&mut self) -> Option<Token> {
        let mode = self.stack.top().mode;
        self.lexer.next_token(mode, self.report)
    }

    fn process(&mut self, token: Token) {
        match token.kind {
            NodeKind::Text => self.text(token),
            NodeKind::StartTag | NodeKind::StartEndTag => {
                if self.options.xml {
                    self.xml_start(token);
                } else {
                    self.start_tag(token);
                }
            }
            NodeKind::EndTag => {
                if self.options.xml {
                    self.xml_end(token);
                } else {
                    self.end_tag(token);
                }
            }
            NodeKind::DocType => self.doctype(token),
            NodeKind::XmlDecl => self.xml_decl(token),
            _ => {
                let parent = self.stack.top().node;
                let node = self.char_data(&token);
                self.dom.append_child(parent, node);
            }
        }
    }

    fn at_root(&self) -> bool {
        self.stack.top().node == NodeId::ROOT
    }

    fn emit(&mut self, code: MessageCode, token: &Token, args: &[&str]) {
        self.report.emit(code, token.line, token.column, args);
    }

    fn char_data(&mut self, token: &Token) -> NodeId {
        let node = self.dom.create_text(token.kind, &token.text);
        let n = self.dom.node_mut(node);
        n.line = token.line;
        n.column = token.column;
        n.closed = true;
        node
    }

    fn doctype(&mut self, token: Token) {
        if self.seen_elements {
            self.emit(MessageCode::DoctypeAfterTags, &token, &[]);
            return;
        }
        let root = self.dom.root();
        if self
            .dom
            .children(root)
            .any(|n| self.dom.node(n).kind == NodeKind::DocType)
        {
            self.emit(MessageCode::DiscardingUnexpected, &token, &["<!DOCTYPE>"]);
            return;
        }
        let node = self.char_data(&token);
        self.dom.append_child(root, node);
    }

    fn xml_decl(&mut self, token: Token) {
        let root = self.dom.root();
        if self.seen_elements || self.dom.first_child(root).is_some() {
            self.emit(MessageCode::DiscardingUnexpected, &token, &["<?xml?>"]);
            return;
        }
        let node = self.char_data(&token);
        self.dom.append_child(root, node);
    }

    /// First real content after `</body>` or `</html>` is reported once; the
    /// content itself stays in the body.
    fn note_content(&mut self, token: &Token) {
        if self.body_ended && !self.reported_after_body {
            self.reported_after_body = true;
            self.emit(MessageCode::ContentAfterBody, token, &[]);
        }
    }

    fn start_tag(&mut self, token: Token) {
        let tags = self.tags;
        let Some(tag) = tags.lookup(&token.name) else {
            self.emit(MessageCode::UnknownElement, &token, &[&token.describe()]);
            return;
        };
        let def = tags.get(tag);
        if def.is_proprietary() {
            self.emit(MessageCode::ProprietaryElement, &token, &[&token.describe()]);
        }
        self.note_content(&token);
        // An element restarted by hand is no longer carried over implicitly.
        self.pending
            .retain(|p| !(p.tag == tag && p.open_node.is_none()));
        if self.document_tag(&token, def) {
            return;
        }
        let limit = self.stack.len() * 2 + 16;
        for _ in 0..limit {
            if self.sibling_closes(tag) {
                self.close_before(&token);
                continue;
            }
            let step = if self.at_root() {
                self.infer_html(&token);
                Step::Retry
            } else {
                match self.stack.top().kind {
                    ParserKind::Html => self.start_in_html(&token, def),
                    ParserKind::Head => self.start_in_head(&token, def),
                    ParserKind::Body | ParserKind::Block | ParserKind::NoFrames => {
                        self.start_in_block(&token, def)
                    }
                    ParserKind::Inline => self.start_in_inline(&token, def),
                    ParserKind::Pre => self.start_in_pre(&token, def),
                    ParserKind::Title | ParserKind::Text => self.start_in_text(&token, def),
                    ParserKind::List | ParserKind::DefList => self.start_in_list(&token, def),
                    ParserKind::Table
                    | ParserKind::RowGroup
                    | ParserKind::Row
                    | ParserKind::ColGroup => self.start_in_table(&token, def),
                    ParserKind::Select | ParserKind::OptGroup => self.start_in_select(&token, def),
                    ParserKind::Frameset => self.start_in_frameset(&token, def),
                    ParserKind::Script => {
                        self.close_before(&token);
                        Step::Retry
                    }
                    ParserKind::Xml | ParserKind::Empty => {
                        self.insert(&token, def);
                        Step::Done
                    }
                }
            };
            if step == Step::Done {
                return;
            }
        }
        log::warn!(target: "html.tree_builder", "no stable position for {}; inserting in place", token.describe());
        self.insert(&token, def);
    }

    /// Elements whose end tag is implied by the start of a sibling.
    fn sibling_closes(&self, new: TagId) -> bool {
        let Some(top) = self.stack.top().tag else {
            return false;
        };
        let table_level = matches!(
            new,
            TagId::TR | TagId::THEAD | TagId::TBODY | TagId::TFOOT | TagId::CAPTION | TagId::COL | TagId::COLGROUP
        );
        match top {
            TagId::LI => new == TagId::LI,
            TagId::DT | TagId::DD => matches!(new, TagId::DT | TagId::DD),
            TagId::TD | TagId::TH => matches!(new, TagId::TD | TagId::TH) || table_level,
            TagId::TR => table_level,
            TagId::THEAD | TagId::TBODY | TagId::TFOOT => table_level && new != TagId::TR,
            TagId::OPTION => matches!(new, TagId::OPTION | TagId::OPTGROUP),
            TagId::OPTGROUP => new == TagId::OPTGROUP,
            _ => false,
        }
    }

    fn end_tag(&mut self, token: Token) {
        let tags = self.tags;
        let Some(tag) = tags.lookup(&token.name) else {
            // Unknown elements were dropped at their start tag.
            return;
        };
        match tag {
            TagId::BODY | TagId::HTML => {
                self.body_ended = true;
                return;
            }
            TagId::HEAD => {
                match self.stack.find(TagId::HEAD) {
                    Some(index) => self.close_to(index, &token),
                    None if self.head.is_some() => {}
                    None => self.emit(MessageCode::DiscardingUnexpected, &token, &[&token.describe()]),
                }
                return;
            }
            _ => {}
        }
        if tags.get(tag).is_empty() {
            self.emit(MessageCode::DiscardingUnexpected, &token, &[&token.describe()]);
            return;
        }
        let Some(index) = self.find_open(tag) else {
            if let Some(pos) = self.pending.iter().position(|p| p.tag == tag) {
                self.pending.remove(pos);
            } else {
                self.emit(MessageCode::DiscardingUnexpected, &token, &[&token.describe()]);
            }
            return;
        };
        self.close_to(index, &token);
    }

    /// Close every element above `index`, then the element at `index` itself.
    fn close_to(&mut self, index: usize, token: &Token) {
        while self.stack.len() > index + 1 {
            self.close_before(token);
        }
        let node = self.stack.top().node;
        self.pending.retain(|p| p.open_node != Some(node));
        self.pop();
    }

    /// Nearest open element closed by an end tag for `tag`. Table boundaries
    /// stop the search unless the tag is itself part of a table.
    fn find_open(&self, tag: TagId) -> Option<usize> {
        use crate::tags::ContentModel;
        let table_part = tag == TagId::TABLE
            || self
                .tags
                .get(tag)
                .model
                .intersects(ContentModel::TABLE | ContentModel::ROW | ContentModel::ROWGRP);
        for (index, entry) in self.stack.iter().enumerate().rev() {
            if entry.tag == Some(tag) {
                return Some(index);
            }
            if !table_part && entry.kind == ParserKind::Table {
                return None;
            }
        }
        None
    }

    /// Close the top element because `token` cannot go inside it. Required end
    /// tags are reported; implicit and re-opened elements close silently.
    fn close_before(&mut self, token: &Token) {
        let top = self.stack.top();
        if !self.closes_silently(top) {
            let name = top.name.clone();
            self.emit(MessageCode::MissingEndtagBefore, token, &[&name, &token.describe()]);
        }
        self.pop();
    }

    fn closes_silently(&self, entry: &OpenElement) -> bool {
        entry.reopened
            || self.dom.node(entry.node).implicit
            || entry
                .tag
                .is_some_and(|t| self.tags.get(t).end_optional())
    }

    fn pop(&mut self) {
        if let Some(entry) = self.stack.pop() {
            self.finish_element(entry);
        }
    }

    fn finish_element(&mut self, entry: OpenElement) {
        let node = entry.node;
        self.dom.node_mut(node).closed = true;
        if !self.options.xml && matches!(entry.mode, LexMode::MixedContent | LexMode::IgnoreWhitespace) {
            if self.is_inline_node(node) {
                self.move_trailing_space_out(node);
            } else {
                self.trim_trailing_space(node);
            }
        }
        if entry.reopened {
            for pending in &mut self.pending {
                if pending.open_node == Some(node) {
                    pending.open_node = None;
                }
            }
        }
        if entry.discard {
            self.dom.remove(node);
        }
        log::trace!(target: "html.tree_builder", "closed <{}>", entry.name);
    }

    fn finish(&mut self) {
        while self.stack.len() > 1 {
            let top = self.stack.top();
            let required = match top.tag {
                Some(tag) => !self.tags.get(tag).end_optional(),
                None => true,
            };
            if required && !top.reopened && !self.dom.node(top.node).implicit {
                let node = self.dom.node(top.node);
                let (line, column) = (node.line, node.column);
                let name = top.name.clone();
                self.report
                    .emit(MessageCode::MissingEndTagFor, line, column, &[&name]);
            }
            self.pop();
        }
        for pending in std::mem::take(&mut self.pending) {
            self.report.emit(
                MessageCode::MissingEndTagFor,
                pending.line,
                pending.column,
                &[&pending.name],
            );
        }
    }

    fn create_element(&mut self, token: &Token, tag: Option<TagId>, name: &str) -> NodeId {
        let node = self.dom.create(NodeKind::StartTag, tag, name);
        let n = self.dom.node_mut(node);
        n.attributes = token.attributes.clone();
        n.line = token.line;
        n.column = token.column;
        self.seen_elements = true;
        node
    }

    fn create_implicit(&mut self, tag: TagId, token: &Token) -> NodeId {
        let name = self.tags.name(tag).to_string();
        let node = self.dom.create(NodeKind::StartTag, Some(tag), &name);
        let n = self.dom.node_mut(node);
        n.implicit = true;
        n.line = token.line;
        n.column = token.column;
        self.seen_elements = true;
        node
    }

    /// Append `node` to the current element, trimming a trailing space that a
    /// block-level child makes insignificant.
    fn attach(&mut self, node: NodeId) {
        if let Some(table) = self.hoist_before {
            self.dom.insert_before(table, node);
            return;
        }
        let top = self.stack.top();
        let parent = top.node;
        if top.mode == LexMode::MixedContent && self.is_break_node(node) {
            self.trim_trailing_space(parent);
        }
        self.dom.append_child(parent, node);
    }

    fn open(&mut self, node: NodeId, tag: TagId, name: String, kind: ParserKind) {
        let mode = self.mode_for(tag, kind);
        self.stack.push(OpenElement {
            node,
            tag: Some(tag),
            name,
            kind,
            mode,
            reopened: false,
            discard: false,
        });
    }

    fn mode_for(&self, tag: TagId, kind: ParserKind) -> LexMode {
        let inherited = self.stack.top().mode;
        match kind {
            ParserKind::Script => LexMode::Raw(tag),
            ParserKind::Pre if self.tags.get(tag).model.contains(crate::tags::ContentModel::OBSOLETE) => {
                LexMode::Raw(tag)
            }
            ParserKind::Pre => LexMode::Preformatted,
            ParserKind::Text if tag == TagId::TEXTAREA => LexMode::Preformatted,
            ParserKind::Inline if inherited == LexMode::Preformatted => LexMode::Preformatted,
            ParserKind::Text
            | ParserKind::Title
            | ParserKind::Body
            | ParserKind::Block
            | ParserKind::Inline
            | ParserKind::NoFrames => LexMode::MixedContent,
            _ => LexMode::IgnoreWhitespace,
        }
    }

    /// Insert an element for `token` at the current position and open it
    /// unless it is empty.
    fn insert(&mut self, token: &Token, def: &TagDef) {
        use crate::tags::ContentModel;
        let obsolete = def.parser == ParserKind::Pre && def.model.contains(ContentModel::OBSOLETE);
        let (node_tag, node_name) = if obsolete {
            self.emit(MessageCode::ObsoleteElement, token, &[def.name.as_ref(), "pre"]);
            (TagId::PRE, "pre")
        } else {
            (def.id, def.name.as_ref())
        };
        let node = self.create_element(token, Some(node_tag), node_name);
        self.attach(node);
        if def.is_empty() {
            self.dom.node_mut(node).closed = true;
            return;
        }
        self.open(node, def.id, node_name.to_string(), def.parser);
    }

    fn is_inline_node(&self, node: NodeId) -> bool {
        self.dom
            .tag(node)
            .is_some_and(|t| self.tags.get(t).is_inline())
    }

    fn is_break_node(&self, node: NodeId) -> bool {
        self.dom.node(node).is_element()
            && self
                .dom
                .tag(node)
                .is_some_and(|t| self.tags.get(t).breaks_line())
    }

    fn trim_trailing_space(&mut self, parent: NodeId) {
        let Some(last) = self.dom.last_child(parent) else {
            return;
        };
        if !self.dom.node(last).is_text() {
            return;
        }
        let text = self.dom.text(last);
        let keep = text.trim_end_matches(' ').len();
        if keep == 0 {
            self.dom.remove(last);
        } else if keep < text.len() {
            self.dom.narrow_text(last, 0..keep);
        }
    }

    /// A space ending an inline element belongs after it.
    fn move_trailing_space_out(&mut self, node: NodeId) {
        let Some(last) = self.dom.last_child(node) else {
            return;
        };
        if !self.dom.node(last).is_text() || !self.dom.text(last).ends_with(' ') {
            return;
        }
        self.trim_trailing_space(node);
        match self.dom.next_sibling(node) {
            Some(next) if self.dom.node(next).is_text() => {
                if !self.dom.text(next).starts_with(' ') {
                    let text = format!(" {}", self.dom.text(next));
                    self.dom.set_text(next, &text);
                }
            }
            _ => {
                let space = self.dom.create_text(NodeKind::Text, " ");
                self.dom.insert_after(node, space);
            }
        }
    }

    /// Whether a leading space of text appended to `parent` is insignificant.
    /// A space opening an inline element is moved in front of it.
    fn drop_leading_space(&mut self, parent: NodeId) -> bool {
        match self.dom.last_child(parent) {
            Some(last) => {
                let node = self.dom.node(last);
                if node.is_text() {
                    self.dom.text(last).ends_with(' ')
                } else {
                    node.is_element() && self.is_break_node(last)
                }
            }
            None => {
                if self.is_inline_node(parent) {
                    self.space_before(parent);
                }
                true
            }
        }
    }

    fn space_before(&mut self, mut node: NodeId) {
        loop {
            match self.dom.prev_sibling(node) {
                Some(prev) => {
                    if self.dom.node(prev).is_text() {
                        if !self.dom.text(prev).ends_with(' ') {
                            self.dom.push_text(prev, " ");
                        }
                    } else if !self.is_break_node(prev) {
                        let space = self.dom.create_text(NodeKind::Text, " ");
                        self.dom.insert_before(node, space);
                    }
                    return;
                }
                None => match self.dom.parent(node) {
                    Some(parent) if self.is_inline_node(parent) => node = parent,
                    _ => return,
                },
            }
        }
    }

    /// Append character data to `parent`, merging with a preceding text node.
    fn add_text(&mut self, parent: NodeId, text: &str, token: &Token) {
        let verbatim = self.options.xml
            || matches!(self.stack.top().mode, LexMode::Preformatted | LexMode::Raw(_));
        let mut text = text;
        if !verbatim && text.starts_with(' ') && self.drop_leading_space(parent) {
            text = &text[1..];
        }
        if text.is_empty() {
            return;
        }
        if let Some(last) = self.dom.last_child(parent) {
            if self.dom.node(last).is_text() {
                self.dom.push_text(last, text);
                return;
            }
        }
        let node = self.dom.create_text(NodeKind::Text, text);
        let n = self.dom.node_mut(node);
        n.line = token.line;
        n.column = token.column;
        n.closed = true;
        self.dom.append_child(parent, node);
    }

    fn text(&mut self, token: Token) {
        if self.options.xml {
            self.xml_text(token);
            return;
        }
        let blank = token.text.chars().all(tools::text::is_html_space);
        if !blank {
            self.note_content(&token);
        }
        let limit = self.stack.len() * 2 + 16;
        for _ in 0..limit {
            let step = if self.at_root() {
                if blank {
                    return;
                }
                self.infer_html(&token);
                Step::Retry
            } else {
                match self.stack.top().kind {
                    ParserKind::Html => self.text_in_html(&token, blank),
                    ParserKind::Head => self.text_in_head(blank),
                    ParserKind::Body
                    | ParserKind::Block
                    | ParserKind::NoFrames
                    | ParserKind::Inline => self.text_in_flow(&token, blank),
                    ParserKind::Pre
                    | ParserKind::Title
                    | ParserKind::Text
                    | ParserKind::Script
                    | ParserKind::Xml
                    | ParserKind::Empty => self.text_verbatim(&token),
                    ParserKind::List | ParserKind::DefList => self.text_in_list(&token, blank),
                    ParserKind::Table
                    | ParserKind::RowGroup
                    | ParserKind::Row
                    | ParserKind::ColGroup => self.text_in_table(&token, blank),
                    ParserKind::Select | ParserKind::OptGroup | ParserKind::Frameset => {
                        if !blank {
                            self.emit(MessageCode::DiscardingUnexpected, &token, &["plain text"]);
                        }
                        Step::Done
                    }
                }
            };
            if step == Step::Done {
                return;
            }
        }
    }

    fn text_verbatim(&mut self, token: &Token) -> Step {
        let top = self.stack.top();
        let parent = top.node;
        let mut text = token.text.as_str();
        if top.kind == ParserKind::Pre && self.dom.first_child(parent).is_none() {
            // A newline right after `<pre>` is not content.
            text = text.strip_prefix('\n').unwrap_or(text);
        }
        self.add_text(parent, text, token);
        Step::Done
    }
}

#[cfg(test)]
mod tests;
