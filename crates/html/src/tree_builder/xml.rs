//! Generic well-formed parsing for XML input: no implied elements, names
//! kept as written, `xml:space` honoured.

use super::TreeBuilder;
use super::stack::OpenElement;
use crate::dom::{NodeId, NodeKind};
use crate::lexer::{LexMode, Token};
use crate::report::MessageCode;
use crate::tags::ParserKind;

impl TreeBuilder<'_> {
    pub(super) fn xml_start(&mut self, token: Token) {
        let parent = self.stack.top().node;
        let node = self.create_element(&token, None, &token.name);
        self.dom.append_child(parent, node);
        if token.kind == NodeKind::StartEndTag {
            let n = self.dom.node_mut(node);
            n.kind = NodeKind::StartEndTag;
            n.closed = true;
            return;
        }
        let mode = match self.dom.node(node).attr_value("xml:space") {
            Some("preserve") => LexMode::Preformatted,
            Some("default") => LexMode::IgnoreWhitespace,
            _ => self.stack.top().mode,
        };
        self.stack.push(OpenElement {
            node,
            tag: None,
            name: token.name,
            kind: ParserKind::Xml,
            mode,
            reopened: false,
            discard: false,
        });
    }

    pub(super) fn xml_end(&mut self, token: Token) {
        let found = self
            .stack
            .iter()
            .enumerate()
            .skip(1)
            .rev()
            .find(|(_, e)| e.name == token.name)
            .map(|(i, _)| i);
        let Some(index) = found else {
            self.emit(MessageCode::DiscardingUnexpected, &token, &[&token.describe()]);
            return;
        };
        while self.stack.len() > index + 1 {
            let name = self.stack.top().name.clone();
            self.emit(MessageCode::MissingEndtagBefore, &token, &[&name, &token.describe()]);
            self.pop();
        }
        self.pop();
    }

    pub(super) fn xml_text(&mut self, token: Token) {
        let top = self.stack.top();
        let parent = top.node;
        if top.mode != LexMode::Preformatted && token.text.chars().all(tools::text::is_html_space) {
            return;
        }
        // Text outside any element is printed on lines of its own.
        if parent == NodeId::ROOT {
            let text = token.text.trim_matches(tools::text::is_html_space);
            self.add_text(parent, text, &token);
            return;
        }
        self.add_text(parent, &token.text, &token);
    }
}
