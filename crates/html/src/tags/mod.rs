//! Element knowledge base: identities, content models, markup versions and
//! the parse/check routines attached to every known tag.

mod table;

use bitflags::bitflags;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::OnceLock;

pub(crate) use table::{BUILTIN_LEN, BUILTIN_TAGS};

/// Handle to a tag definition. Ids `1..=BUILTIN_COUNT` are built-in; larger ids
/// are user-declared tags owned by a [`TagTable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagId(pub u16);

bitflags! {
    /// Content model bits: where an element may appear and what it contains.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ContentModel: u32 {
        const EMPTY = 1 << 0;
        const HTML = 1 << 1;
        const HEAD = 1 << 2;
        const BLOCK = 1 << 3;
        const INLINE = 1 << 4;
        const LIST = 1 << 5;
        const DEFLIST = 1 << 6;
        const TABLE = 1 << 7;
        const ROWGRP = 1 << 8;
        const ROW = 1 << 9;
        const FIELD = 1 << 10;
        const OBJECT = 1 << 11;
        const PARAM = 1 << 12;
        const FRAMES = 1 << 13;
        const HEADING = 1 << 14;
        /// End tag may be omitted.
        const OPT = 1 << 15;
        const IMG = 1 << 16;
        const MIXED = 1 << 17;
        const NO_INDENT = 1 << 18;
        const OBSOLETE = 1 << 19;
        /// Declared at run time.
        const NEW = 1 << 20;
        /// Start tag may be omitted.
        const OMITST = 1 << 21;
    }
}

bitflags! {
    /// Markup versions an element or attribute belongs to.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Versions: u32 {
        const HTML20 = 1 << 0;
        const HTML32 = 1 << 1;
        const HTML40_STRICT = 1 << 2;
        const HTML40_LOOSE = 1 << 3;
        const HTML40_FRAMESET = 1 << 4;
        const XHTML10_STRICT = 1 << 5;
        const XHTML10_LOOSE = 1 << 6;
        const XHTML10_FRAMESET = 1 << 7;
        const XHTML11 = 1 << 8;
        const HTML5 = 1 << 9;
        const NETSCAPE = 1 << 10;
        const MICROSOFT = 1 << 11;

        const PROPRIETARY = Self::NETSCAPE.bits() | Self::MICROSOFT.bits();
        const STRICT = Self::HTML40_STRICT.bits() | Self::XHTML10_STRICT.bits();
        const TRANSITIONAL = Self::HTML40_LOOSE.bits() | Self::XHTML10_LOOSE.bits();
        const FRAMESET = Self::HTML40_FRAMESET.bits() | Self::XHTML10_FRAMESET.bits();
        const HTML40 = Self::STRICT.bits()
            | Self::TRANSITIONAL.bits()
            | Self::FRAMESET.bits()
            | Self::XHTML11.bits();
        /// Transitional-only markup.
        const LOOSE = Self::HTML32.bits() | Self::TRANSITIONAL.bits() | Self::FRAMESET.bits();
        const IFRAME = Self::TRANSITIONAL.bits() | Self::FRAMESET.bits();
        const FROM32 = Self::HTML32.bits() | Self::HTML40.bits();
        const LEGACY = Self::HTML20.bits() | Self::FROM32.bits();
        const ALL = Self::LEGACY.bits() | Self::HTML5.bits();
        const XHTML = Self::XHTML10_STRICT.bits()
            | Self::XHTML10_LOOSE.bits()
            | Self::XHTML10_FRAMESET.bits()
            | Self::XHTML11.bits();
    }
}

impl Versions {
    /// Human-readable name of the most specific version in the set.
    pub fn describe(self) -> &'static str {
        const ORDER: &[(Versions, &str)] = &[
            (Versions::HTML20, "HTML 2.0"),
            (Versions::HTML32, "HTML 3.2"),
            (Versions::HTML40_STRICT, "HTML 4.01 Strict"),
            (Versions::HTML40_LOOSE, "HTML 4.01 Transitional"),
            (Versions::HTML40_FRAMESET, "HTML 4.01 Frameset"),
            (Versions::XHTML10_STRICT, "XHTML 1.0 Strict"),
            (Versions::XHTML10_LOOSE, "XHTML 1.0 Transitional"),
            (Versions::XHTML10_FRAMESET, "XHTML 1.0 Frameset"),
            (Versions::XHTML11, "XHTML 1.1"),
            (Versions::HTML5, "HTML5"),
        ];
        for (flag, name) in ORDER {
            if self.contains(*flag) {
                return name;
            }
        }
        "HTML Proprietary"
    }
}

/// The tree-builder routine that parses an element's content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParserKind {
    Html,
    Head,
    Title,
    /// Character data only (option, textarea).
    Text,
    /// Opaque raw content (script, style).
    Script,
    Body,
    Frameset,
    NoFrames,
    Block,
    Inline,
    List,
    DefList,
    Pre,
    Table,
    ColGroup,
    RowGroup,
    Row,
    Select,
    OptGroup,
    /// Generic well-formed content.
    Xml,
    /// No content.
    Empty,
}

/// Element-specific attribute check run by the validator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TagCheck {
    None,
    Anchor,
    Area,
    Caption,
    Form,
    Hr,
    Html,
    Img,
    Link,
    Map,
    Meta,
    Script,
    Style,
    Table,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagDef {
    pub id: TagId,
    pub name: Cow<'static, str>,
    pub versions: Versions,
    pub model: ContentModel,
    pub parser: ParserKind,
    pub check: TagCheck,
}

impl TagDef {
    pub fn is_inline(&self) -> bool {
        self.model.contains(ContentModel::INLINE)
    }

    pub fn is_block(&self) -> bool {
        !self.model.contains(ContentModel::INLINE)
            && self.model.intersects(
                ContentModel::BLOCK
                    | ContentModel::LIST
                    | ContentModel::DEFLIST
                    | ContentModel::TABLE
                    | ContentModel::ROW
                    | ContentModel::ROWGRP
                    | ContentModel::HTML
                    | ContentModel::FRAMES,
            )
    }

    /// Whether whitespace next to this element is insignificant: block-level
    /// elements and `<br>`.
    pub fn breaks_line(&self) -> bool {
        self.id == TagId::BR || !self.is_inline()
    }

    pub fn is_empty(&self) -> bool {
        self.model.contains(ContentModel::EMPTY)
    }

    pub fn end_optional(&self) -> bool {
        self.model.contains(ContentModel::OPT)
    }

    /// Elements that only belong in `<head>`.
    pub fn is_head_only(&self) -> bool {
        self.model.contains(ContentModel::HEAD)
            && !self
                .model
                .intersects(ContentModel::BLOCK | ContentModel::INLINE)
    }

    pub fn is_proprietary(&self) -> bool {
        !self.versions.is_empty() && (self.versions & !Versions::PROPRIETARY).is_empty()
    }
}

/// Kinds accepted by `declare_tag`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UserTagKind {
    Empty,
    Inline,
    Block,
    Pre,
}

impl UserTagKind {
    fn model(self) -> ContentModel {
        let base = ContentModel::NO_INDENT | ContentModel::NEW;
        match self {
            UserTagKind::Empty => base | ContentModel::EMPTY | ContentModel::INLINE,
            UserTagKind::Inline => base | ContentModel::INLINE,
            UserTagKind::Block | UserTagKind::Pre => base | ContentModel::BLOCK,
        }
    }

    fn parser(self) -> ParserKind {
        match self {
            UserTagKind::Empty => ParserKind::Empty,
            UserTagKind::Inline => ParserKind::Inline,
            UserTagKind::Block => ParserKind::Block,
            UserTagKind::Pre => ParserKind::Pre,
        }
    }
}

pub const BUILTIN_COUNT: u16 = BUILTIN_LEN;

fn builtin_index() -> &'static HashMap<&'static str, TagId> {
    static INDEX: OnceLock<HashMap<&'static str, TagId>> = OnceLock::new();
    INDEX.get_or_init(|| {
        BUILTIN_TAGS
            .iter()
            .map(|def: &'static TagDef| (def.name.as_ref(), def.id))
            .collect()
    })
}

fn lowercase_if_needed(name: &str) -> Cow<'_, str> {
    if name.bytes().any(|b| b.is_ascii_uppercase()) {
        Cow::Owned(name.to_ascii_lowercase())
    } else {
        Cow::Borrowed(name)
    }
}

/// Look up a built-in tag by name (case-insensitive).
pub fn lookup_tag(name: &str) -> Option<&'static TagDef> {
    let lower = lowercase_if_needed(name);
    let id = builtin_index().get(lower.as_ref())?;
    Some(builtin_def(*id))
}

/// Built-in definition for `id`; `None` for user-declared ids.
pub fn builtin(id: TagId) -> Option<&'static TagDef> {
    let index = usize::from(id.0).checked_sub(1)?;
    BUILTIN_TAGS.get(index)
}

fn builtin_def(id: TagId) -> &'static TagDef {
    debug_assert!(id.0 >= 1 && id.0 <= BUILTIN_COUNT);
    &BUILTIN_TAGS[usize::from(id.0 - 1)]
}

/// Per-document tag table: the immutable built-ins plus user declarations.
#[derive(Clone, Debug, Default)]
pub struct TagTable {
    user: Vec<TagDef>,
}

impl TagTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, name: &str) -> Option<TagId> {
        let lower = lowercase_if_needed(name);
        if let Some(id) = builtin_index().get(lower.as_ref()) {
            return Some(*id);
        }
        self.user
            .iter()
            .find(|def| def.name == lower.as_ref())
            .map(|def| def.id)
    }

    pub fn get(&self, id: TagId) -> &TagDef {
        if id.0 <= BUILTIN_COUNT {
            return builtin_def(id);
        }
        let index = usize::from(id.0 - BUILTIN_COUNT - 1);
        &self.user[index]
    }

    pub fn name(&self, id: TagId) -> &str {
        &self.get(id).name
    }

    /// Declare a user tag. Built-in names are never redefined.
    pub fn declare(&mut self, kind: UserTagKind, name: &str) -> TagId {
        if let Some(id) = self.lookup(name) {
            return id;
        }
        let id = TagId(BUILTIN_COUNT + 1 + self.user.len() as u16);
        log::debug!(target: "html.tags", "declared {kind:?} tag {name}");
        self.user.push(TagDef {
            id,
            name: Cow::Owned(name.to_ascii_lowercase()),
            versions: Versions::all(),
            model: kind.model(),
            parser: kind.parser(),
            check: TagCheck::None,
        });
        id
    }

    pub fn user_tags(&self) -> impl Iterator<Item = &TagDef> + '_ {
        self.user.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_ids_match_their_table_slot() {
        for (index, def) in BUILTIN_TAGS.iter().enumerate() {
            assert_eq!(usize::from(def.id.0), index + 1, "tag {} out of place", def.name);
        }
        assert_eq!(lookup_tag("TABLE").map(|d| d.id), Some(TagId::TABLE));
        assert_eq!(lookup_tag("blink").map(|d| d.is_proprietary()), Some(true));
        assert!(lookup_tag("nosuchtag").is_none());
    }

    #[test]
    fn declare_never_overrides_builtins() {
        let mut table = TagTable::new();
        assert_eq!(table.declare(UserTagKind::Empty, "p"), TagId::P);
        let custom = table.declare(UserTagKind::Block, "Widget");
        assert!(custom.0 > BUILTIN_COUNT);
        assert_eq!(table.lookup("widget"), Some(custom));
        assert_eq!(table.get(custom).parser, ParserKind::Block);
        assert_eq!(table.declare(UserTagKind::Inline, "widget"), custom);
    }

    #[test]
    fn content_model_helpers() {
        let title = lookup_tag("title").unwrap();
        assert!(title.is_head_only());
        let script = lookup_tag("script").unwrap();
        assert!(!script.is_head_only());
        assert!(lookup_tag("li").unwrap().is_block());
        assert!(lookup_tag("span").unwrap().is_inline());
        assert!(lookup_tag("p").unwrap().end_optional());
    }

    #[test]
    fn version_description_picks_first_member() {
        assert_eq!(Versions::STRICT.describe(), "HTML 4.01 Strict");
        assert_eq!(Versions::HTML5.describe(), "HTML5");
        assert_eq!(Versions::PROPRIETARY.describe(), "HTML Proprietary");
    }
}
