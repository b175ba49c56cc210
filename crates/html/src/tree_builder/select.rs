use super::{Step, TreeBuilder};
use crate::lexer::Token;
use crate::report::MessageCode;
use crate::tags::{TagDef, TagId};

impl TreeBuilder<'_> {
    /// `select`, `datalist` and `optgroup` keep their options and drop
    /// everything else.
    pub(super) fn start_in_select(&mut self, token: &Token, def: &TagDef) -> Step {
        match def.id {
            TagId::OPTION | TagId::OPTGROUP => self.insert(token, def),
            _ => self.emit(MessageCode::DiscardingUnexpected, token, &[&token.describe()]),
        }
        Step::Done
    }
}
