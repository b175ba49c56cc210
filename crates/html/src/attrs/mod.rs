//! Attribute knowledge base and the attribute validator.

mod check;
mod table;

pub use check::{AnchorTable, AttrPolicy, Validator, color_rgb, normalize_color};
pub(crate) use check::is_lang;

use crate::tags::Versions;
use std::collections::HashMap;
use std::sync::OnceLock;

pub(crate) use table::BUILTIN_ATTRS;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttrId(pub u16);

/// How an attribute value is checked and normalised.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttrType {
    Text,
    Url,
    Script,
    Id,
    Idref,
    Name,
    Class,
    Style,
    Color,
    Bool,
    Length,
    Number,
    Coords,
    Align,
    Valign,
    Clear,
    Shape,
    Scope,
    Dir,
    Method,
    Scrolling,
    Frameborder,
    Target,
    InputType,
    Lang,
    Charset,
    Media,
    LinkTypes,
    Tframe,
    Trules,
    ContentType,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttrDef {
    pub id: AttrId,
    pub name: &'static str,
    pub versions: Versions,
    pub kind: AttrType,
}

impl AttrDef {
    pub fn is_proprietary(&self) -> bool {
        (self.versions & !Versions::PROPRIETARY).is_empty()
    }
}

static DATA_ATTR: AttrDef = AttrDef {
    id: AttrId(0),
    name: "data-*",
    versions: Versions::HTML5,
    kind: AttrType::Text,
};

static ARIA_ATTR: AttrDef = AttrDef {
    id: AttrId(0),
    name: "aria-*",
    versions: Versions::HTML5,
    kind: AttrType::Text,
};

fn builtin_index() -> &'static HashMap<&'static str, &'static AttrDef> {
    static INDEX: OnceLock<HashMap<&'static str, &'static AttrDef>> = OnceLock::new();
    INDEX.get_or_init(|| BUILTIN_ATTRS.iter().map(|def| (def.name, def)).collect())
}

/// Look up an attribute by name (case-insensitive). `data-*` and `aria-*`
/// names resolve to generic HTML5 text attributes.
pub fn lookup_attr(name: &str) -> Option<&'static AttrDef> {
    let lower;
    let key = if name.bytes().any(|b| b.is_ascii_uppercase()) {
        lower = name.to_ascii_lowercase();
        lower.as_str()
    } else {
        name
    };
    if let Some(def) = builtin_index().get(key) {
        return Some(def);
    }
    if key.len() > 5 && key.starts_with("data-") {
        return Some(&DATA_ATTR);
    }
    if key.len() > 5 && key.starts_with("aria-") {
        return Some(&ARIA_ATTR);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let def = lookup_attr("HREF").unwrap();
        assert_eq!(def.id, AttrId::HREF);
        assert_eq!(def.kind, AttrType::Url);
    }

    #[test]
    fn vendor_and_generic_attributes() {
        assert!(lookup_attr("bordercolor").unwrap().is_proprietary());
        assert!(!lookup_attr("class").unwrap().is_proprietary());
        assert_eq!(lookup_attr("data-role").map(|d| d.kind), Some(AttrType::Text));
        assert!(lookup_attr("data-").is_none());
        assert!(lookup_attr("frobnicate").is_none());
    }

    #[test]
    fn ids_match_table_slots() {
        for (index, def) in BUILTIN_ATTRS.iter().enumerate() {
            assert_eq!(usize::from(def.id.0), index + 1, "attribute {}", def.name);
        }
    }
}
