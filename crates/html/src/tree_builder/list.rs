use super::{Step, TreeBuilder};
use crate::lexer::Token;
use crate::report::MessageCode;
use crate::tags::{ParserKind, TagDef, TagId};

impl TreeBuilder<'_> {
    /// `ul`/`ol`/`dir`/`menu` take `li`; `dl` takes `dt` and `dd`. Other
    /// content gets an inferred item, or ends a list that was itself inferred.
    pub(super) fn start_in_list(&mut self, token: &Token, def: &TagDef) -> Step {
        let (accepts, item) = match self.stack.top().kind {
            ParserKind::DefList => (matches!(def.id, TagId::DT | TagId::DD), TagId::DD),
            _ => (def.id == TagId::LI, TagId::LI),
        };
        if accepts {
            self.insert(token, def);
            return Step::Done;
        }
        self.infer_item(item, token)
    }

    pub(super) fn text_in_list(&mut self, token: &Token, blank: bool) -> Step {
        if blank {
            return Step::Done;
        }
        let item = match self.stack.top().kind {
            ParserKind::DefList => TagId::DD,
            _ => TagId::LI,
        };
        self.infer_item(item, token)
    }

    fn infer_item(&mut self, item: TagId, token: &Token) -> Step {
        if self.dom.node(self.stack.top().node).implicit {
            self.pop();
            return Step::Retry;
        }
        let name = self.tags.name(item).to_string();
        self.emit(MessageCode::MissingStartTag, token, &[&name]);
        let node = self.create_implicit(item, token);
        self.attach(node);
        self.open(node, item, name, ParserKind::Block);
        Step::Retry
    }
}
