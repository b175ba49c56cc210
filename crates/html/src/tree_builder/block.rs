//! Flow content: block containers, inline elements, `pre` and the
//! character-data elements (`title`, `option`, `textarea`).

use super::stack::PendingInline;
use super::{Step, TreeBuilder};
use crate::lexer::Token;
use crate::report::MessageCode;
use crate::tags::{ContentModel, ParserKind, TagDef, TagId};

/// Inline elements carried into following blocks when a block interrupts them.
fn is_formatting(tag: TagId) -> bool {
    is_emphasis(tag) || matches!(tag, TagId::FONT | TagId::SPAN)
}

/// Inline elements whose repeated start tag is read as an end tag.
fn is_emphasis(tag: TagId) -> bool {
    matches!(
        tag,
        TagId::B
            | TagId::I
            | TagId::U
            | TagId::S
            | TagId::STRIKE
            | TagId::EM
            | TagId::STRONG
            | TagId::BIG
            | TagId::SMALL
            | TagId::TT
            | TagId::CODE
            | TagId::KBD
            | TagId::SAMP
            | TagId::VAR
            | TagId::CITE
            | TagId::DFN
            | TagId::SUB
            | TagId::SUP
    )
}

fn is_table_part(def: &TagDef) -> bool {
    def.model
        .intersects(ContentModel::TABLE | ContentModel::ROW | ContentModel::ROWGRP)
}

/// Only valid inside `select`.
fn is_field_only(def: &TagDef) -> bool {
    def.model.contains(ContentModel::FIELD) && !def.is_inline()
}

impl TreeBuilder<'_> {
    pub(super) fn start_in_block(&mut self, token: &Token, def: &TagDef) -> Step {
        if is_table_part(def) {
            if self.stack.table_index().is_some() {
                // Unwind to the enclosing table structure and try again there.
                self.close_before(token);
                return Step::Retry;
            }
            self.emit(MessageCode::DiscardingUnexpected, token, &[&token.describe()]);
            return Step::Done;
        }
        match def.id {
            TagId::LI => return self.infer_list(TagId::UL, token),
            TagId::DT | TagId::DD => return self.infer_list(TagId::DL, token),
            TagId::FRAME => {
                self.emit(MessageCode::DiscardingUnexpected, token, &[&token.describe()]);
                return Step::Done;
            }
            _ => {}
        }
        if is_field_only(def) {
            self.emit(MessageCode::DiscardingUnexpected, token, &[&token.describe()]);
            return Step::Done;
        }
        if def.is_inline() {
            self.reopen_inlines();
        }
        self.insert(token, def);
        Step::Done
    }

    fn infer_list(&mut self, list: TagId, token: &Token) -> Step {
        let name = self.tags.name(list).to_string();
        self.emit(MessageCode::InsertingTag, token, &[&name]);
        let node = self.create_implicit(list, token);
        self.attach(node);
        let kind = self.tags.get(list).parser;
        self.open(node, list, name, kind);
        Step::Retry
    }

    pub(super) fn start_in_inline(&mut self, token: &Token, def: &TagDef) -> Step {
        let top = self.stack.top();
        let top_tag = top.tag;
        let top_def = top_tag.map(|t| self.tags.get(t));
        let top_is_inline = top_def.is_some_and(|d| d.is_inline());

        if def.is_block() {
            if top_is_inline {
                self.close_inline_for_block(token);
                return Step::Retry;
            }
            if top_tag == Some(TagId::CAPTION) && !is_table_part(def) {
                self.insert(token, def);
                return Step::Done;
            }
            self.close_before(token);
            return Step::Retry;
        }
        if is_field_only(def) {
            self.emit(MessageCode::DiscardingUnexpected, token, &[&token.describe()]);
            return Step::Done;
        }

        if self.options.coerce_endtags
            && top_tag == Some(def.id)
            && is_emphasis(def.id)
            && token.attributes.is_empty()
        {
            self.emit(MessageCode::CoerceToEndtag, token, &[&token.name]);
            let node = self.stack.top().node;
            self.pending.retain(|p| p.open_node != Some(node));
            self.pop();
            return Step::Done;
        }

        if def.id == TagId::A {
            if let Some(index) = self.open_anchor() {
                self.emit(MessageCode::MissingEndtagBefore, token, &["a", "<a>"]);
                while self.stack.len() > index {
                    self.pop();
                }
            }
        }

        self.reopen_inlines();
        self.insert(token, def);
        Step::Done
    }

    /// Stack index of an `a` reachable without crossing a block.
    fn open_anchor(&self) -> Option<usize> {
        for (index, entry) in self.stack.iter().enumerate().rev() {
            let Some(tag) = entry.tag else {
                return None;
            };
            if tag == TagId::A {
                return Some(index);
            }
            if entry.kind != ParserKind::Inline || !self.tags.get(tag).is_inline() {
                return None;
            }
        }
        None
    }

    /// Close the inline element on top because a block starts, remembering
    /// formatting elements so they continue inside the following content.
    fn close_inline_for_block(&mut self, token: &Token) {
        let top = self.stack.top().clone();
        if !top.reopened && !self.dom.node(top.node).implicit {
            self.emit(MessageCode::MissingEndtagBefore, token, &[&top.name, &token.describe()]);
        }
        if let Some(tag) = top.tag.filter(|&t| is_formatting(t)) {
            match self.pending.iter_mut().find(|p| p.tag == tag) {
                Some(existing) => existing.open_node = None,
                None => {
                    let node = self.dom.node(top.node);
                    let pending = PendingInline {
                        tag,
                        name: top.name.clone(),
                        attributes: node.attributes.clone(),
                        depth: self.stack.len() - 1,
                        table_depth: self.stack.table_depth(),
                        open_node: None,
                        line: node.line,
                        column: node.column,
                    };
                    self.pending.push(pending);
                }
            }
        }
        self.pop();
    }

    /// Re-open carried formatting elements, outermost first, when content
    /// arrives at the table depth they were closed at.
    pub(super) fn reopen_inlines(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let table_depth = self.stack.table_depth();
        let mut order: Vec<usize> = (0..self.pending.len())
            .filter(|&i| {
                let p = &self.pending[i];
                p.open_node.is_none() && p.table_depth == table_depth
            })
            .collect();
        order.sort_by_key(|&i| self.pending[i].depth);
        for i in order {
            let (tag, name, attributes) = {
                let p = &self.pending[i];
                (p.tag, p.name.clone(), p.attributes.clone())
            };
            let node = self
                .dom
                .create(crate::dom::NodeKind::StartTag, Some(tag), &name);
            {
                let n = self.dom.node_mut(node);
                n.attributes = attributes;
                n.implicit = true;
            }
            self.attach(node);
            self.open(node, tag, name, ParserKind::Inline);
            if let Some(entry) = self.stack.top_mut() {
                entry.reopened = true;
            }
            self.pending[i].open_node = Some(node);
            log::trace!(target: "html.tree_builder", "re-opened <{}>", self.tags.name(tag));
        }
    }

    pub(super) fn start_in_pre(&mut self, token: &Token, def: &TagDef) -> Step {
        if def.is_block() {
            self.close_before(token);
            return Step::Retry;
        }
        self.insert(token, def);
        Step::Done
    }

    /// `title`, `option` and `textarea` hold character data only: inline tags
    /// are dropped, anything else ends the element.
    pub(super) fn start_in_text(&mut self, token: &Token, def: &TagDef) -> Step {
        if def.is_inline() {
            self.emit(MessageCode::DiscardingUnexpected, token, &[&token.describe()]);
            return Step::Done;
        }
        self.close_before(token);
        Step::Retry
    }

    pub(super) fn text_in_flow(&mut self, token: &Token, blank: bool) -> Step {
        if !blank {
            self.enclose_text(token);
            self.reopen_inlines();
        }
        let parent = self.stack.top().node;
        self.add_text(parent, &token.text, token);
        Step::Done
    }

    /// Wrap bare text of `body` (or of block containers) in an inferred `<p>`.
    fn enclose_text(&mut self, token: &Token) {
        let top = self.stack.top();
        let wrap = match top.kind {
            ParserKind::Body => self.options.enclose_text,
            ParserKind::Block => {
                self.options.enclose_block_text
                    && matches!(
                        top.tag,
                        Some(TagId::BLOCKQUOTE | TagId::DIV | TagId::CENTER | TagId::FORM | TagId::NOSCRIPT)
                    )
            }
            _ => false,
        };
        if !wrap {
            return;
        }
        self.emit(MessageCode::InsertingTag, token, &["p"]);
        let node = self.create_implicit(TagId::P, token);
        self.attach(node);
        self.open(node, TagId::P, "p".to_string(), ParserKind::Inline);
    }
}
