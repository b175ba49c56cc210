//! Attribute validation: duplicate repair, per-type value checks, the
//! document-wide anchor namespace and element-specific requirements.

use super::{AttrDef, AttrType, lookup_attr};
use crate::config::RepeatedAttributes;
use crate::dom::{Attribute, Dom, NodeId};
use crate::report::{MessageCode, Report};
use crate::tags::{TagCheck, TagId, TagTable};
use std::collections::HashMap;
use tools::text::is_html_space;

/// Switches that change how values are repaired.
#[derive(Clone, Debug)]
pub struct AttrPolicy {
    pub fix_uri: bool,
    pub fix_backslash: bool,
    pub lower_literals: bool,
    pub replace_color: bool,
    pub join_classes: bool,
    pub join_styles: bool,
    pub repeated: RepeatedAttributes,
    /// Output is XHTML: `html` needs its namespace.
    pub xhtml: bool,
    /// Target is HTML 4: `script`/`style` need `type`, `form` needs `action`.
    pub html4: bool,
}

impl Default for AttrPolicy {
    fn default() -> Self {
        Self {
            fix_uri: true,
            fix_backslash: true,
            lower_literals: true,
            replace_color: false,
            join_classes: true,
            join_styles: true,
            repeated: RepeatedAttributes::KeepLast,
            xhtml: false,
            html4: false,
        }
    }
}

const XHTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Ids and anchor names defined so far. The first definition of a value wins.
#[derive(Clone, Debug, Default)]
pub struct AnchorTable {
    names: HashMap<String, NodeId>,
}

impl AnchorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `value` for `node`. Returns `false` when another node already
    /// owns the value.
    pub fn define(&mut self, value: &str, node: NodeId) -> bool {
        match self.names.get(value) {
            Some(owner) => *owner == node,
            None => {
                self.names.insert(value.to_string(), node);
                true
            }
        }
    }

    pub fn lookup(&self, value: &str) -> Option<NodeId> {
        self.names.get(value).copied()
    }

    pub fn contains(&self, value: &str) -> bool {
        self.names.contains_key(value)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Elements whose `name` attribute defines a link target.
fn names_anchor(tag: Option<TagId>) -> bool {
    matches!(
        tag,
        Some(
            TagId::A
                | TagId::APPLET
                | TagId::FORM
                | TagId::FRAME
                | TagId::IFRAME
                | TagId::IMG
                | TagId::MAP
        )
    )
}

pub struct Validator<'a> {
    tags: &'a TagTable,
    policy: AttrPolicy,
    anchors: AnchorTable,
}

impl<'a> Validator<'a> {
    pub fn new(tags: &'a TagTable, policy: AttrPolicy) -> Self {
        Self {
            tags,
            policy,
            anchors: AnchorTable::new(),
        }
    }

    pub fn anchors(&self) -> &AnchorTable {
        &self.anchors
    }

    /// Validate every element reachable from the root, in document order.
    pub fn run(&mut self, dom: &mut Dom, report: &mut Report) {
        let elements: Vec<NodeId> = dom
            .descendants(dom.root())
            .filter(|&n| dom.node(n).is_element())
            .collect();
        log::debug!(target: "html.attrs", "validating {} elements", elements.len());
        for node in elements {
            self.repair_duplicates(dom, node, report);
            let mut index = 0;
            while index < dom.node(node).attributes.len() {
                self.check(dom, node, index, report);
                index += 1;
            }
            self.check_element(dom, node, report);
        }
    }

    fn element_name(dom: &Dom, node: NodeId) -> String {
        dom.node(node).name.clone()
    }

    /// Apply the repeated-attribute policy; `class` and `style` values may be
    /// joined instead.
    pub fn repair_duplicates(&mut self, dom: &mut Dom, node: NodeId, report: &mut Report) {
        let element = Self::element_name(dom, node);
        let mut index = 1;
        while index < dom.node(node).attributes.len() {
            let attrs = &dom.node(node).attributes;
            let current = &attrs[index];
            let Some(first) = attrs[..index]
                .iter()
                .position(|a| a.name.eq_ignore_ascii_case(&current.name))
            else {
                index += 1;
                continue;
            };
            let name = current.name.to_ascii_lowercase();
            let later = current.clone();
            let (line, column) = (later.line, later.column);
            let joined = match name.as_str() {
                "class" if self.policy.join_classes => Some(" "),
                "style" if self.policy.join_styles => Some("; "),
                _ => None,
            };
            let attrs = &mut dom.node_mut(node).attributes;
            match joined {
                Some(separator) => {
                    let earlier = &mut attrs[first];
                    let mut value = earlier.value_str().trim_end().to_string();
                    if separator == "; " {
                        value = value.trim_end_matches(';').to_string();
                    }
                    let more = later.value_str().trim();
                    if !value.is_empty() && !more.is_empty() {
                        value.push_str(separator);
                    }
                    value.push_str(more);
                    earlier.value = Some(value);
                    attrs.remove(index);
                    report.emit(MessageCode::JoiningAttribute, line, column, &[&element, &name]);
                }
                None => {
                    let dropped = match self.policy.repeated {
                        RepeatedAttributes::KeepFirst => attrs.remove(index),
                        RepeatedAttributes::KeepLast => {
                            let kept = attrs.remove(index);
                            std::mem::replace(&mut attrs[first], kept)
                        }
                    };
                    report.emit(
                        MessageCode::RepeatedAttribute,
                        line,
                        column,
                        &[&element, &name, dropped.value_str()],
                    );
                }
            }
        }
    }

    /// Check the attribute at `index` on `node`, repairing its value where the
    /// policy allows.
    pub fn check(&mut self, dom: &mut Dom, node: NodeId, index: usize, report: &mut Report) {
        let attr = dom.node(node).attributes[index].clone();
        if attr.from_directive {
            return;
        }
        let element = Self::element_name(dom, node);
        let tag = dom.tag(node);
        let Some(def) = lookup_attr(&attr.name) else {
            if !attr.name.starts_with("xmlns") && !attr.name.contains(':') {
                report.emit(
                    MessageCode::UnknownAttribute,
                    attr.line,
                    attr.column,
                    &[&element, &attr.name],
                );
            }
            return;
        };
        if def.is_proprietary() {
            report.emit(
                MessageCode::ProprietaryAttribute,
                attr.line,
                attr.column,
                &[&element, &attr.name],
            );
        }
        let repaired = self.check_value(dom, node, tag, def, &attr, report);
        if let Some(value) = repaired {
            log::trace!(target: "html.attrs", "{element} {}: {:?} -> {value:?}", attr.name, attr.value);
            dom.node_mut(node).attributes[index].value = Some(value);
        }
    }

    /// Returns a replacement value when the original was repaired.
    fn check_value(
        &mut self,
        dom: &Dom,
        node: NodeId,
        tag: Option<TagId>,
        def: &AttrDef,
        attr: &Attribute,
        report: &mut Report,
    ) -> Option<String> {
        let element = dom.node(node).name.as_str();
        let value = attr.value.as_deref();
        let bad = |report: &mut Report| {
            report.emit(
                MessageCode::BadAttributeValue,
                attr.line,
                attr.column,
                &[element, &attr.name, attr.value_str()],
            );
        };
        match def.kind {
            AttrType::Bool => {
                if let Some(v) = value {
                    if !v.is_empty() && !v.eq_ignore_ascii_case(&attr.name) {
                        bad(report);
                    }
                }
                None
            }
            _ if value.is_none() => {
                if !matches!(def.kind, AttrType::Text | AttrType::Script) {
                    bad(report);
                }
                None
            }
            AttrType::Url => self.check_url(element, attr, report),
            AttrType::Color => {
                let repaired = normalize_color(attr.value_str(), self.policy.replace_color);
                match repaired {
                    Some(color) if color != attr.value_str() => Some(color),
                    Some(_) => None,
                    None => {
                        bad(report);
                        None
                    }
                }
            }
            AttrType::Length => {
                if !is_length(attr.value_str()) {
                    bad(report);
                }
                None
            }
            AttrType::Number => {
                let multi = matches!(tag, Some(TagId::FRAMESET | TagId::TEXTAREA | TagId::COLGROUP | TagId::COL));
                let ok = if multi {
                    attr.value_str().split(',').all(|part| is_length(part.trim()) || is_relative(part.trim()))
                } else {
                    is_number(attr.value_str())
                };
                if !ok {
                    bad(report);
                }
                None
            }
            AttrType::Coords => {
                let ok = attr
                    .value_str()
                    .split(',')
                    .all(|part| is_length(part.trim()));
                if !ok {
                    bad(report);
                }
                None
            }
            AttrType::Id | AttrType::Name => {
                self.check_anchor(dom, node, tag, def, attr, report);
                None
            }
            AttrType::Lang => {
                if !is_lang(attr.value_str()) {
                    bad(report);
                }
                None
            }
            AttrType::Charset => {
                let ok = attr.value_str().split([',', ' ']).filter(|s| !s.is_empty()).all(|s| {
                    s.bytes()
                        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b':'))
                });
                if !ok {
                    bad(report);
                }
                None
            }
            AttrType::Target => {
                let v = attr.value_str();
                if v.starts_with('_') {
                    self.pick(attr, &["_blank", "_self", "_parent", "_top"], element, report)
                } else {
                    if !v.starts_with(|c: char| c.is_ascii_alphabetic()) {
                        bad(report);
                    }
                    None
                }
            }
            kind => match picks_for(kind, tag) {
                Some(picks) => self.pick(attr, picks, element, report),
                None => None,
            },
        }
    }

    /// Enumerated values: matched case-insensitively, lower-cased on request.
    fn pick(&self, attr: &Attribute, picks: &[&str], element: &str, report: &mut Report) -> Option<String> {
        let value = attr.value_str().trim();
        match picks.iter().find(|p| p.eq_ignore_ascii_case(value)) {
            Some(p) if self.policy.lower_literals && *p != attr.value_str() => Some(p.to_string()),
            Some(_) => None,
            None => {
                report.emit(
                    MessageCode::BadAttributeValue,
                    attr.line,
                    attr.column,
                    &[element, &attr.name, attr.value_str()],
                );
                None
            }
        }
    }

    fn check_url(&self, element: &str, attr: &Attribute, report: &mut Report) -> Option<String> {
        let mut value = attr.value_str().to_string();
        let mut changed = false;
        if value.contains('\\') {
            if self.policy.fix_backslash {
                value = value.replace('\\', "/");
                changed = true;
                report.emit(MessageCode::FixedBackslash, attr.line, attr.column, &[element]);
            } else {
                report.emit(
                    MessageCode::BadAttributeValue,
                    attr.line,
                    attr.column,
                    &[element, &attr.name, attr.value_str()],
                );
            }
        }
        if value.chars().any(needs_escape) {
            if self.policy.fix_uri {
                value = escape_uri(&value);
                changed = true;
                report.emit(MessageCode::EscapedIllegalUri, attr.line, attr.column, &[element]);
            } else {
                report.emit(
                    MessageCode::BadAttributeValue,
                    attr.line,
                    attr.column,
                    &[element, &attr.name, attr.value_str()],
                );
            }
        }
        changed.then_some(value)
    }

    fn check_anchor(
        &mut self,
        dom: &Dom,
        node: NodeId,
        tag: Option<TagId>,
        def: &AttrDef,
        attr: &Attribute,
        report: &mut Report,
    ) {
        let element = dom.node(node).name.as_str();
        let value = attr.value_str();
        if def.kind == AttrType::Name && !names_anchor(tag) {
            return;
        }
        if value.is_empty() || value.chars().any(is_html_space) {
            report.emit(
                MessageCode::BadAttributeValue,
                attr.line,
                attr.column,
                &[element, &attr.name, value],
            );
            return;
        }
        if !self.anchors.define(value, node) {
            report.emit(MessageCode::AnchorNotUnique, attr.line, attr.column, &[element, value]);
        }
    }

    /// Requirements tied to a particular element.
    fn check_element(&mut self, dom: &mut Dom, node: NodeId, report: &mut Report) {
        let Some(tag) = dom.tag(node) else {
            return;
        };
        let check = self.tags.get(tag).check;
        let (line, column) = dom.position(node);
        let n = dom.node(node);
        let element = n.name.clone();
        let missing = |report: &mut Report, attr: &str| {
            report.emit(MessageCode::MissingAttribute, line, column, &[&element, attr]);
        };
        match check {
            TagCheck::None => {}
            TagCheck::Anchor => {
                if let (Some(id), Some(name)) = (n.attr_value("id"), n.attr_value("name")) {
                    if id != name {
                        report.emit(MessageCode::IdNameMismatch, line, column, &[&element]);
                    }
                }
            }
            TagCheck::Img => {
                if !n.has_attr("alt") {
                    missing(report, "alt");
                }
                if !n.has_attr("src") {
                    missing(report, "src");
                }
            }
            TagCheck::Area => {
                if !n.has_attr("alt") {
                    missing(report, "alt");
                }
                if !n.has_attr("href") && !n.has_attr("nohref") {
                    missing(report, "href");
                }
            }
            TagCheck::Map => {
                if !n.has_attr("name") && !n.has_attr("id") {
                    missing(report, "name");
                }
            }
            TagCheck::Script => {
                if self.policy.html4 && !n.has_attr("type") {
                    self.insert_attr(dom, node, "type", "text/javascript", report);
                }
            }
            TagCheck::Style => {
                if self.policy.html4 && !n.has_attr("type") {
                    self.insert_attr(dom, node, "type", "text/css", report);
                }
            }
            TagCheck::Link => {
                let stylesheet = n
                    .attr_value("rel")
                    .is_some_and(|rel| rel.eq_ignore_ascii_case("stylesheet"));
                if stylesheet && self.policy.html4 && !n.has_attr("type") {
                    self.insert_attr(dom, node, "type", "text/css", report);
                }
            }
            TagCheck::Form => {
                if self.policy.html4 && !n.has_attr("action") {
                    missing(report, "action");
                }
            }
            TagCheck::Html => {
                if self.policy.xhtml && !n.has_attr("xmlns") {
                    let attr = Attribute::new("xmlns", Some(XHTML_NAMESPACE.to_string()));
                    dom.node_mut(node).attributes.insert(0, attr);
                }
            }
            TagCheck::Table => {
                let border = dom.node(node).attributes.iter().position(|a| {
                    a.name.eq_ignore_ascii_case("border") && a.value.as_deref().is_none_or(str::is_empty)
                });
                if let Some(index) = border {
                    dom.node_mut(node).attributes[index].value = Some("1".to_string());
                }
            }
            TagCheck::Caption => {
                if let Some(attr) = n.attr("align") {
                    let ok = ["top", "bottom", "left", "right"]
                        .iter()
                        .any(|p| p.eq_ignore_ascii_case(attr.value_str()));
                    if !ok {
                        report.emit(
                            MessageCode::BadAttributeValue,
                            attr.line,
                            attr.column,
                            &[&element, "align", attr.value_str()],
                        );
                    }
                }
            }
            TagCheck::Hr => {
                if let Some(attr) = n.attr("src") {
                    report.emit(
                        MessageCode::ProprietaryAttribute,
                        attr.line,
                        attr.column,
                        &[&element, "src"],
                    );
                }
            }
            TagCheck::Meta => {
                if !n.has_attr("content") && !n.has_attr("charset") && !n.has_attr("itemprop") {
                    missing(report, "content");
                }
            }
        }
    }

    fn insert_attr(&self, dom: &mut Dom, node: NodeId, name: &str, value: &str, report: &mut Report) {
        let (line, column) = dom.position(node);
        let n = dom.node_mut(node);
        n.attributes.push(Attribute::new(name, Some(value.to_string())));
        let element = n.name.clone();
        report.emit(MessageCode::InsertingAttribute, line, column, &[&element, name]);
    }
}

/// Pick-list for enumerated attribute types; `align` depends on the element.
fn picks_for(kind: AttrType, tag: Option<TagId>) -> Option<&'static [&'static str]> {
    let picks: &'static [&'static str] = match kind {
        AttrType::Align => match tag {
            Some(TagId::CAPTION) => return None,
            Some(TagId::IMG | TagId::APPLET | TagId::OBJECT | TagId::IFRAME | TagId::INPUT | TagId::EMBED) => &[
                "left", "right", "top", "middle", "bottom", "center", "absmiddle", "absbottom", "baseline",
                "texttop",
            ],
            Some(TagId::LEGEND) => &["top", "bottom", "left", "right"],
            _ => &["left", "right", "center", "justify", "char"],
        },
        AttrType::Valign => &["top", "middle", "bottom", "baseline"],
        AttrType::Clear => &["none", "left", "right", "all"],
        AttrType::Shape => &["rect", "default", "circle", "poly"],
        AttrType::Scope => &["row", "col", "rowgroup", "colgroup"],
        AttrType::Dir => &["ltr", "rtl", "auto"],
        AttrType::Method => &["get", "post"],
        AttrType::Scrolling => &["yes", "no", "auto"],
        AttrType::Frameborder => &["0", "1", "yes", "no"],
        AttrType::Tframe => &["void", "above", "below", "hsides", "lhs", "rhs", "vsides", "box", "border"],
        AttrType::Trules => &["none", "groups", "rows", "cols", "all"],
        AttrType::InputType => match tag {
            Some(TagId::INPUT) => &[
                "text", "password", "checkbox", "radio", "submit", "reset", "file", "hidden", "image", "button",
                "color", "date", "datetime-local", "email", "month", "number", "range", "search", "tel", "time",
                "url", "week",
            ],
            _ => return None,
        },
        _ => return None,
    };
    Some(picks)
}

const NAMED_COLORS: &[(&str, &str)] = &[
    ("black", "#000000"),
    ("green", "#008000"),
    ("silver", "#C0C0C0"),
    ("lime", "#00FF00"),
    ("gray", "#808080"),
    ("olive", "#808000"),
    ("white", "#FFFFFF"),
    ("yellow", "#FFFF00"),
    ("maroon", "#800000"),
    ("navy", "#000080"),
    ("red", "#FF0000"),
    ("blue", "#0000FF"),
    ("purple", "#800080"),
    ("teal", "#008080"),
    ("fuchsia", "#FF00FF"),
    ("aqua", "#00FFFF"),
];

/// Canonical form of a color value, or `None` when it is not a color.
/// Hex values gain a `#` and upper-case digits.
pub fn normalize_color(value: &str, prefer_names: bool) -> Option<String> {
    let value = value.trim();
    if let Some((name, _)) = NAMED_COLORS.iter().find(|(n, _)| n.eq_ignore_ascii_case(value)) {
        return Some(name.to_string());
    }
    let digits = value.strip_prefix('#').unwrap_or(value);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let hex = format!("#{}", digits.to_ascii_uppercase());
    if prefer_names {
        if let Some((name, _)) = NAMED_COLORS.iter().find(|(_, h)| *h == hex) {
            return Some(name.to_string());
        }
    }
    Some(hex)
}

/// `#RRGGBB` or named color to RGB components.
pub fn color_rgb(value: &str) -> Option<(u8, u8, u8)> {
    let hex = normalize_color(value, false)?;
    let hex = match NAMED_COLORS.iter().find(|(n, _)| *n == hex) {
        Some((_, h)) => h.to_string(),
        None => hex,
    };
    let component = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some((component(1..3)?, component(3..5)?, component(5..7)?))
}

fn is_number(value: &str) -> bool {
    let digits = value.trim().trim_start_matches(['-', '+']);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn is_length(value: &str) -> bool {
    let value = value.trim();
    let body = value
        .strip_suffix('%')
        .or_else(|| value.strip_suffix("px"))
        .unwrap_or(value);
    let mut parts = body.splitn(2, '.');
    let whole = parts.next().unwrap_or("");
    let fraction = parts.next();
    !whole.is_empty()
        && whole.bytes().all(|b| b.is_ascii_digit())
        && fraction.is_none_or(|f| !f.is_empty() && f.bytes().all(|b| b.is_ascii_digit()))
}

/// `*` or `n*` multi-lengths in framesets and column groups.
fn is_relative(value: &str) -> bool {
    value
        .strip_suffix('*')
        .is_some_and(|n| n.bytes().all(|b| b.is_ascii_digit()))
}

pub(crate) fn is_lang(value: &str) -> bool {
    let mut parts = value.split('-');
    let primary = parts.next().unwrap_or("");
    let ok_part = |p: &str, letters_only: bool| {
        (1..=8).contains(&p.len())
            && p.bytes().all(|b| {
                if letters_only {
                    b.is_ascii_alphabetic()
                } else {
                    b.is_ascii_alphanumeric()
                }
            })
    };
    ok_part(primary, true) && parts.all(|p| ok_part(p, false))
}

fn needs_escape(c: char) -> bool {
    c == ' ' || !c.is_ascii() || c.is_ascii_control()
}

/// Percent-encode spaces, control characters and non-ASCII bytes.
fn escape_uri(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 8);
    let mut buf = [0u8; 4];
    for c in value.chars() {
        if needs_escape(c) {
            for byte in c.encode_utf8(&mut buf).bytes() {
                out.push_str(&format!("%{byte:02X}"));
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree_builder::{BuildOptions, build_tree};

    fn validate(input: &str, policy: AttrPolicy) -> (Dom, Report) {
        let tags = TagTable::new();
        let mut report = Report::new();
        let mut dom = build_tree(input, BuildOptions::default(), &tags, &mut report);
        report.clear();
        let mut validator = Validator::new(&tags, policy);
        validator.run(&mut dom, &mut report);
        (dom, report)
    }

    fn first(dom: &Dom, tag: TagId) -> &crate::dom::Node {
        let node = dom.find_tag(dom.root(), tag).expect("element");
        dom.node(node)
    }

    #[test]
    fn repeated_classes_are_joined() {
        let (dom, report) = validate(r#"<div class="a" class="b">x</div>"#, AttrPolicy::default());
        let div = first(&dom, TagId::DIV);
        assert_eq!(div.attributes.len(), 1);
        assert_eq!(div.attr_value("class"), Some("a b"));
        assert!(report.has_code("joining-attribute"));
    }

    #[test]
    fn repeated_styles_are_joined_with_semicolons() {
        let (dom, _) = validate(r#"<p style="color: red;" style="margin: 0">x"#, AttrPolicy::default());
        assert_eq!(first(&dom, TagId::P).attr_value("style"), Some("color: red; margin: 0"));
    }

    #[test]
    fn repeated_attribute_policy() {
        let keep_first = AttrPolicy {
            repeated: RepeatedAttributes::KeepFirst,
            ..AttrPolicy::default()
        };
        let (dom, report) = validate(r#"<div id="x" id="y">z</div>"#, keep_first);
        assert_eq!(first(&dom, TagId::DIV).attr_value("id"), Some("x"));
        assert_eq!(report.count_code("repeated-attribute"), 1);

        let (dom, _) = validate(r#"<div id="x" id="y">z</div>"#, AttrPolicy::default());
        let div = first(&dom, TagId::DIV);
        assert_eq!(div.attr_value("id"), Some("y"));
        assert_eq!(div.attributes.len(), 1);
    }

    #[test]
    fn urls_are_escaped_and_backslashes_fixed() {
        let (dom, report) = validate(r#"<a href="a\b c.html">x</a>"#, AttrPolicy::default());
        assert_eq!(first(&dom, TagId::A).attr_value("href"), Some("a/b%20c.html"));
        assert!(report.has_code("fixed-backslash"));
        assert!(report.has_code("escaped-illegal-uri"));

        let policy = AttrPolicy {
            fix_uri: false,
            fix_backslash: false,
            ..AttrPolicy::default()
        };
        let (dom, report) = validate(r#"<a href="a\b">x</a>"#, policy);
        assert_eq!(first(&dom, TagId::A).attr_value("href"), Some("a\\b"));
        assert!(report.has_code("bad-attribute-value"));
    }

    #[test]
    fn colors_are_normalised() {
        assert_eq!(normalize_color("ff0000", false).as_deref(), Some("#FF0000"));
        assert_eq!(normalize_color("#ff0000", true).as_deref(), Some("red"));
        assert_eq!(normalize_color("Navy", false).as_deref(), Some("navy"));
        assert_eq!(normalize_color("#12", false), None);
        assert_eq!(color_rgb("white"), Some((255, 255, 255)));

        let (dom, report) = validate(r##"<body bgcolor="#abcdef" text="oops">x"##, AttrPolicy::default());
        assert_eq!(first(&dom, TagId::BODY).attr_value("bgcolor"), Some("#ABCDEF"));
        assert_eq!(report.count_code("bad-attribute-value"), 1);
    }

    #[test]
    fn pick_lists_are_lower_cased() {
        let (dom, report) = validate(r#"<p align="CENTER">x</p><br clear="bogus">"#, AttrPolicy::default());
        assert_eq!(first(&dom, TagId::P).attr_value("align"), Some("center"));
        assert_eq!(report.count_code("bad-attribute-value"), 1);
    }

    #[test]
    fn duplicate_anchors_are_reported() {
        let (_, report) = validate(
            r#"<a name="top">x</a><p id="top">y</p><div id="d">z</div>"#,
            AttrPolicy::default(),
        );
        assert_eq!(report.count_code("anchor-not-unique"), 1);
    }

    #[test]
    fn same_element_may_repeat_its_anchor() {
        let tags = TagTable::new();
        let mut report = Report::new();
        let mut dom = build_tree(r#"<a id="x" name="x">y</a>"#, BuildOptions::default(), &tags, &mut report);
        let mut validator = Validator::new(&tags, AttrPolicy::default());
        validator.run(&mut dom, &mut report);
        assert!(!report.has_code("anchor-not-unique"));
        assert!(validator.anchors().contains("x"));
    }

    #[test]
    fn unknown_and_proprietary_attributes() {
        let (_, report) = validate(r#"<table bordercolor="red" frob="1"><tr><td>x</table>"#, AttrPolicy::default());
        assert!(report.has_code("proprietary-attribute"));
        assert_eq!(report.count_code("unknown-attribute"), 1);
        assert_eq!(report.errors(), 1);
    }

    #[test]
    fn element_requirements() {
        let (_, report) = validate(r##"<img src="a.png"><map><area href="#"></map>"##, AttrPolicy::default());
        assert_eq!(report.count_code("missing-attribute"), 3);

        let html4 = AttrPolicy {
            html4: true,
            ..AttrPolicy::default()
        };
        let (dom, report) = validate("<script>x()</script>", html4);
        assert_eq!(first(&dom, TagId::SCRIPT).attr_value("type"), Some("text/javascript"));
        assert!(report.has_code("inserting-attribute"));
    }

    #[test]
    fn xhtml_output_gets_the_namespace() {
        let policy = AttrPolicy {
            xhtml: true,
            ..AttrPolicy::default()
        };
        let (dom, _) = validate("<p>x", policy);
        assert_eq!(first(&dom, TagId::HTML).attr_value("xmlns"), Some(XHTML_NAMESPACE));
    }

    #[test]
    fn value_syntax_helpers() {
        assert!(is_length("50%"));
        assert!(is_length("1.5"));
        assert!(!is_length("wide"));
        assert!(is_number("-1"));
        assert!(!is_number(""));
        assert!(is_lang("en-US"));
        assert!(!is_lang("english language"));
        assert!(is_relative("2*"));
    }
}
