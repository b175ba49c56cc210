//! Table structure. Rows and cells are inferred where missing; content that
//! has no place in the table grid is moved in front of the table.

use super::{Step, TreeBuilder};
use crate::dom::NodeKind;
use crate::lexer::Token;
use crate::report::MessageCode;
use crate::tags::{ParserKind, TagDef, TagId};

impl TreeBuilder<'_> {
    pub(super) fn start_in_table(&mut self, token: &Token, def: &TagDef) -> Step {
        let kind = self.stack.top().kind;
        let id = def.id;
        if id == TagId::SCRIPT && kind != ParserKind::ColGroup {
            self.insert(token, def);
            return Step::Done;
        }
        match kind {
            ParserKind::Table => match id {
                TagId::CAPTION
                | TagId::COLGROUP
                | TagId::COL
                | TagId::THEAD
                | TagId::TBODY
                | TagId::TFOOT
                | TagId::TR => {
                    self.insert(token, def);
                    Step::Done
                }
                TagId::TD | TagId::TH => self.infer_table_part(TagId::TR, token),
                _ => self.hoist(token, def),
            },
            ParserKind::RowGroup => match id {
                TagId::TR => {
                    self.insert(token, def);
                    Step::Done
                }
                TagId::TD | TagId::TH => self.infer_table_part(TagId::TR, token),
                _ => self.hoist(token, def),
            },
            ParserKind::Row => match id {
                TagId::TD | TagId::TH => {
                    self.insert(token, def);
                    Step::Done
                }
                _ => self.infer_table_part(TagId::TD, token),
            },
            _ => {
                if id == TagId::COL {
                    self.insert(token, def);
                    Step::Done
                } else {
                    self.pop();
                    Step::Retry
                }
            }
        }
    }

    fn infer_table_part(&mut self, tag: TagId, token: &Token) -> Step {
        let name = self.tags.name(tag).to_string();
        self.emit(MessageCode::MissingStartTag, token, &[&name]);
        let node = self.create_implicit(tag, token);
        self.attach(node);
        let kind = self.tags.get(tag).parser;
        self.open(node, tag, name, kind);
        Step::Retry
    }

    /// Place an element that cannot live in the table grid right before the
    /// table, by the same rules as block content. It stays open, so its
    /// content follows it there.
    fn hoist(&mut self, token: &Token, def: &TagDef) -> Step {
        let Some(table) = self.stack.table_index().and_then(|i| self.stack.get(i)).map(|e| e.node) else {
            self.insert(token, def);
            return Step::Done;
        };
        let container = self.stack.top().name.clone();
        self.emit(MessageCode::TagNotAllowedIn, token, &[&token.describe(), &container]);
        self.hoist_before = Some(table);
        let step = self.start_in_block(token, def);
        self.hoist_before = None;
        step
    }

    pub(super) fn text_in_table(&mut self, token: &Token, blank: bool) -> Step {
        if blank {
            return Step::Done;
        }
        let top = self.stack.top();
        match top.kind {
            ParserKind::Row => self.infer_table_part(TagId::TD, token),
            ParserKind::ColGroup => {
                self.pop();
                Step::Retry
            }
            _ => {
                let container = top.name.clone();
                self.emit(MessageCode::TextNotAllowedIn, token, &[&container]);
                let Some(table) = self.stack.table_index().and_then(|i| self.stack.get(i)).map(|e| e.node) else {
                    return Step::Done;
                };
                match self.dom.prev_sibling(table) {
                    Some(prev) if self.dom.node(prev).is_text() => self.dom.push_text(prev, &token.text),
                    _ => {
                        let text = self.dom.create_text(NodeKind::Text, &token.text);
                        let n = self.dom.node_mut(text);
                        n.line = token.line;
                        n.column = token.column;
                        n.closed = true;
                        self.dom.insert_before(table, text);
                    }
                }
                Step::Done
            }
        }
    }
}
