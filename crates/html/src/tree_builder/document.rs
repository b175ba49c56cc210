//! Document-level structure: `html`, `head`, `body`, `frameset` and the
//! elements that belong in the head wherever they appear.

use super::{Step, TreeBuilder};
use crate::dom::NodeId;
use crate::lexer::Token;
use crate::report::MessageCode;
use crate::tags::{ParserKind, TagDef, TagId};

impl TreeBuilder<'_> {
    /// Handle tags that shape the document skeleton. Returns `true` when the
    /// token was consumed.
    pub(super) fn document_tag(&mut self, token: &Token, def: &TagDef) -> bool {
        match def.id {
            TagId::HTML => {
                match self.html {
                    Some(html) => self.merge_or_discard(html, token),
                    None => {
                        let node = self.create_element(token, Some(TagId::HTML), "html");
                        self.dom.append_child(NodeId::ROOT, node);
                        self.open(node, TagId::HTML, "html".to_string(), ParserKind::Html);
                        self.html = Some(node);
                    }
                }
                true
            }
            TagId::HEAD => {
                match self.head {
                    Some(head) if self.stack.top().node == head => self.merge_or_discard(head, token),
                    Some(_) => self.emit(MessageCode::DiscardingUnexpected, token, &["<head>"]),
                    None if self.body.is_some() || self.frameset.is_some() => {
                        self.emit(MessageCode::DiscardingUnexpected, token, &["<head>"])
                    }
                    None => {
                        self.to_html_level(token);
                        let node = self.create_element(token, Some(TagId::HEAD), "head");
                        self.attach(node);
                        self.open(node, TagId::HEAD, "head".to_string(), ParserKind::Head);
                        self.head = Some(node);
                    }
                }
                true
            }
            TagId::BODY => {
                match (self.body, self.frameset) {
                    (Some(body), _) => self.merge_or_discard(body, token),
                    (None, Some(_)) => self.emit(MessageCode::DiscardingUnexpected, token, &["<body>"]),
                    (None, None) => {
                        self.to_html_level(token);
                        self.ensure_head(token);
                        let node = self.create_element(token, Some(TagId::BODY), "body");
                        self.attach(node);
                        self.open(node, TagId::BODY, "body".to_string(), ParserKind::Body);
                        self.body = Some(node);
                    }
                }
                true
            }
            TagId::FRAMESET => {
                if self.stack.top().kind == ParserKind::Frameset {
                    return false;
                }
                if self.body.is_some() || self.frameset.is_some() {
                    self.emit(MessageCode::DiscardingUnexpected, token, &["<frameset>"]);
                    return true;
                }
                self.to_html_level(token);
                self.ensure_head(token);
                let node = self.create_element(token, Some(TagId::FRAMESET), "frameset");
                self.attach(node);
                self.open(node, TagId::FRAMESET, "frameset".to_string(), ParserKind::Frameset);
                self.frameset = Some(node);
                true
            }
            _ if def.is_head_only() => self.head_element(token, def),
            _ => false,
        }
    }

    /// A repeated `html`, `head` or `body` tag lends its attributes to an
    /// implicit element; a second explicit one is dropped.
    fn merge_or_discard(&mut self, node: NodeId, token: &Token) {
        if !self.dom.node(node).implicit {
            self.emit(MessageCode::DiscardingUnexpected, token, &[&token.describe()]);
            return;
        }
        let n = self.dom.node_mut(node);
        n.implicit = false;
        for attr in &token.attributes {
            if !n.has_attr(&attr.name) {
                n.attributes.push(attr.clone());
            }
        }
    }

    /// Close everything above the `html` element, creating it when missing.
    fn to_html_level(&mut self, token: &Token) {
        if self.html.is_none() {
            self.infer_html(token);
            return;
        }
        while !self.at_root() && self.stack.top().kind != ParserKind::Html {
            self.close_before(token);
        }
    }

    pub(super) fn infer_html(&mut self, token: &Token) {
        let node = self.create_implicit(TagId::HTML, token);
        self.dom.append_child(NodeId::ROOT, node);
        self.open(node, TagId::HTML, "html".to_string(), ParserKind::Html);
        self.html = Some(node);
    }

    /// Make sure a head precedes the body; an inferred head is closed at once.
    fn ensure_head(&mut self, token: &Token) {
        if self.head.is_some() {
            return;
        }
        let node = self.create_implicit(TagId::HEAD, token);
        self.dom.node_mut(node).closed = true;
        self.attach(node);
        self.head = Some(node);
    }

    fn infer_body(&mut self, token: &Token) {
        self.ensure_head(token);
        let node = self.create_implicit(TagId::BODY, token);
        self.attach(node);
        self.open(node, TagId::BODY, "body".to_string(), ParserKind::Body);
        self.body = Some(node);
    }

    /// Elements that only belong in the head. Duplicates of `title` and `base`
    /// are dropped; once the body has started, the rest are moved to the head.
    fn head_element(&mut self, token: &Token, def: &TagDef) -> bool {
        let duplicate = match def.id {
            TagId::TITLE => std::mem::replace(&mut self.seen_title, true),
            TagId::BASE => std::mem::replace(&mut self.seen_base, true),
            _ => false,
        };
        if duplicate {
            self.emit(MessageCode::TooManyElements, token, &[def.name.as_ref(), "head"]);
            if !def.is_empty() {
                // Parse the content so it does not leak, then drop it.
                let node = self.create_element(token, Some(def.id), &def.name);
                self.open(node, def.id, def.name.to_string(), def.parser);
                if let Some(entry) = self.stack.top_mut() {
                    entry.discard = true;
                }
            }
            return true;
        }
        if self.body.is_none() && self.frameset.is_none() {
            return false;
        }
        self.emit(MessageCode::TagNotAllowedIn, token, &[&token.describe(), "body"]);
        let head = match self.head {
            Some(head) => head,
            None => return false,
        };
        let node = self.create_element(token, Some(def.id), &def.name);
        self.dom.append_child(head, node);
        if def.is_empty() {
            self.dom.node_mut(node).closed = true;
        } else {
            self.open(node, def.id, def.name.to_string(), def.parser);
        }
        true
    }

    pub(super) fn start_in_html(&mut self, token: &Token, def: &TagDef) -> Step {
        if self.head.is_none() && (def.is_head_only() || def.id == TagId::SCRIPT) {
            let node = self.create_implicit(TagId::HEAD, token);
            self.attach(node);
            self.open(node, TagId::HEAD, "head".to_string(), ParserKind::Head);
            self.head = Some(node);
            return Step::Retry;
        }
        if def.is_head_only() {
            if let Some(head) = self.head {
                let node = self.create_element(token, Some(def.id), &def.name);
                self.dom.append_child(head, node);
                if def.is_empty() {
                    self.dom.node_mut(node).closed = true;
                } else {
                    self.open(node, def.id, def.name.to_string(), def.parser);
                }
                return Step::Done;
            }
        }
        if self.frameset.is_some() {
            self.emit(MessageCode::DiscardingUnexpected, token, &[&token.describe()]);
            return Step::Done;
        }
        self.infer_body(token);
        Step::Retry
    }

    pub(super) fn start_in_head(&mut self, token: &Token, def: &TagDef) -> Step {
        if def.is_head_only() || def.id == TagId::SCRIPT {
            self.insert(token, def);
            return Step::Done;
        }
        self.pop();
        Step::Retry
    }

    pub(super) fn start_in_frameset(&mut self, token: &Token, def: &TagDef) -> Step {
        match def.id {
            TagId::FRAME | TagId::FRAMESET | TagId::NOFRAMES => self.insert(token, def),
            _ => self.emit(MessageCode::DiscardingUnexpected, token, &[&token.describe()]),
        }
        Step::Done
    }

    pub(super) fn text_in_html(&mut self, token: &Token, blank: bool) -> Step {
        if blank {
            return Step::Done;
        }
        if self.frameset.is_some() {
            self.emit(MessageCode::DiscardingUnexpected, token, &["plain text"]);
            return Step::Done;
        }
        self.infer_body(token);
        Step::Retry
    }

    pub(super) fn text_in_head(&mut self, blank: bool) -> Step {
        if blank {
            return Step::Done;
        }
        self.pop();
        Step::Retry
    }
}
