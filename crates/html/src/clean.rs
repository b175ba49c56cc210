//! Optional cleanup transformations applied to the repaired tree.
//!
//! Presentational markup is replaced by classes backed by a generated style
//! sheet, font elements can be dropped outright, physical emphasis can become
//! logical emphasis, and "smart" typography can be reduced to ASCII. Every
//! element replacement is reported.

use crate::attrs::lookup_attr;
use crate::dom::{Attribute, Dom, NodeId, NodeKind};
use crate::report::{MessageCode, Report};
use crate::tags::{ParserKind, TagId, TagTable};
use tools::text::collapse_whitespace;

#[derive(Clone, Debug, Default)]
pub struct CleanOptions {
    /// Replace presentational markup with style rules.
    pub clean: bool,
    pub drop_font_tags: bool,
    pub logical_emphasis: bool,
    pub bare: bool,
    pub merge_divs: bool,
    pub merge_spans: bool,
    pub hide_comments: bool,
    pub drop_proprietary_attributes: bool,
    /// Value given to `img` elements without `alt`; empty leaves them alone.
    pub alt_text: String,
    pub css_prefix: String,
}

impl CleanOptions {
    pub fn is_noop(&self) -> bool {
        !(self.clean
            || self.drop_font_tags
            || self.logical_emphasis
            || self.bare
            || self.hide_comments
            || self.drop_proprietary_attributes)
            && self.alt_text.is_empty()
    }
}

pub fn clean_document(dom: &mut Dom, tags: &TagTable, options: &CleanOptions, report: &mut Report) {
    if options.is_noop() {
        return;
    }
    log::debug!(target: "html.clean", "cleaning with {options:?}");
    if options.hide_comments {
        hide_comments(dom);
    }
    if options.drop_font_tags {
        drop_font_tags(dom, report);
    }
    if options.clean {
        let mut styles = StyleSheet::new(dom, &options.css_prefix);
        clean_body_colors(dom, &mut styles);
        for node in elements(dom) {
            if dom.parent(node).is_none() {
                continue;
            }
            presentation_to_style(dom, tags, node, &mut styles, report);
        }
        if options.merge_divs {
            merge_nested(dom, TagId::DIV);
        }
        if options.merge_spans {
            merge_nested(dom, TagId::SPAN);
        }
        styles.install(dom, tags);
    }
    if options.logical_emphasis {
        logical_emphasis(dom, tags, report);
    }
    if options.bare {
        bare_text(dom, tags);
    }
    if options.drop_proprietary_attributes {
        drop_proprietary_attributes(dom);
    }
    if !options.alt_text.is_empty() {
        supply_alt_text(dom, &options.alt_text, report);
    }
}

fn elements(dom: &Dom) -> Vec<NodeId> {
    dom.descendants(dom.root())
        .filter(|&n| dom.node(n).is_element())
        .collect()
}

fn hide_comments(dom: &mut Dom) {
    let comments: Vec<NodeId> = dom
        .descendants(dom.root())
        .filter(|&n| dom.node(n).kind == NodeKind::Comment)
        .collect();
    for node in comments {
        dom.remove(node);
    }
}

fn rename(dom: &mut Dom, tags: &TagTable, node: NodeId, tag: TagId) {
    let n = dom.node_mut(node);
    n.tag = Some(tag);
    n.name = tags.name(tag).to_string();
}

/// Unlink `node` and splice its children into its place. A space keeps text
/// on either side apart when the element broke the line.
fn unwrap_keeping_words_apart(dom: &mut Dom, node: NodeId, breaks: bool) {
    let before = dom.prev_sibling(node);
    let after = dom.next_sibling(node);
    let first = dom.first_child(node);
    let last = dom.last_child(node);
    dom.unwrap(node);
    if !breaks {
        return;
    }
    let pairs = [(before, first), (last, after)];
    for (left, right) in pairs {
        let (Some(left), Some(right)) = (left, right) else {
            continue;
        };
        if dom.node(left).is_text() && dom.node(right).is_text() {
            let joined = dom.text(left).ends_with(' ') || dom.text(right).starts_with(' ');
            if !joined {
                dom.push_text(left, " ");
            }
        }
    }
}

fn drop_font_tags(dom: &mut Dom, report: &mut Report) {
    for node in elements(dom) {
        let Some(tag) = dom.tag(node) else {
            continue;
        };
        if dom.parent(node).is_none() || !matches!(tag, TagId::FONT | TagId::BASEFONT | TagId::CENTER) {
            continue;
        }
        let (line, column) = dom.position(node);
        let name = dom.node(node).name.clone();
        report.emit(MessageCode::TrimmingElement, line, column, &[&name]);
        unwrap_keeping_words_apart(dom, node, tag == TagId::CENTER);
    }
}

/// Generated class rules, written into a `<style>` element in the head.
struct StyleSheet {
    prefix: String,
    next: usize,
    /// Selector and declarations, in creation order.
    rules: Vec<(String, String)>,
}

impl StyleSheet {
    /// Numbering continues past classes a previous run already generated.
    fn new(dom: &Dom, prefix: &str) -> Self {
        let prefix = if prefix.is_empty() { "c" } else { prefix };
        let mut next = 1;
        for node in dom.descendants(dom.root()) {
            let Some(classes) = dom.node(node).attr_value("class") else {
                continue;
            };
            for class in classes.split_whitespace() {
                if let Some(n) = class.strip_prefix(prefix).and_then(|n| n.parse::<usize>().ok()) {
                    next = next.max(n + 1);
                }
            }
        }
        Self {
            prefix: prefix.to_string(),
            next,
            rules: Vec::new(),
        }
    }

    /// Class name for `element` with `declarations`, reusing identical rules.
    fn class_for(&mut self, element: &str, declarations: &str) -> String {
        let found = self.rules.iter().find_map(|(selector, decl)| {
            let (tag, class) = selector.split_once('.')?;
            (tag == element && decl == declarations).then(|| class.to_string())
        });
        if let Some(class) = found {
            return class;
        }
        let class = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        self.rules
            .push((format!("{element}.{class}"), declarations.to_string()));
        class
    }

    fn add_rule(&mut self, selector: &str, declarations: String) {
        self.rules.push((selector.to_string(), declarations));
    }

    fn install(self, dom: &mut Dom, tags: &TagTable) {
        if self.rules.is_empty() {
            return;
        }
        let Some(head) = dom.find_tag(dom.root(), TagId::HEAD) else {
            return;
        };
        let mut css = String::from("\n");
        for (selector, declarations) in &self.rules {
            css.push_str(&format!("{selector} {{{declarations}}}\n"));
        }
        let style = dom.create(NodeKind::StartTag, Some(TagId::STYLE), tags.name(TagId::STYLE));
        let node = dom.node_mut(style);
        node.closed = true;
        node.attributes.push(Attribute::new("type", Some("text/css".to_string())));
        let text = dom.create_text(NodeKind::Text, &css);
        dom.append_child(style, text);
        dom.append_child(head, style);
        log::debug!(target: "html.clean", "generated {} style rules", self.rules.len());
    }
}

fn add_class(dom: &mut Dom, node: NodeId, class: &str) {
    let n = dom.node_mut(node);
    match n.attributes.iter_mut().find(|a| a.name.eq_ignore_ascii_case("class")) {
        Some(attr) => {
            let mut value = attr.value_str().trim().to_string();
            if !value.split_whitespace().any(|c| c == class) {
                if !value.is_empty() {
                    value.push(' ');
                }
                value.push_str(class);
            }
            attr.value = Some(value);
        }
        None => n.attributes.push(Attribute::new("class", Some(class.to_string()))),
    }
}

fn take_attr(dom: &mut Dom, node: NodeId, name: &str) -> Option<String> {
    let attrs = &mut dom.node_mut(node).attributes;
    let index = attrs.iter().position(|a| a.name.eq_ignore_ascii_case(name))?;
    Some(attrs.remove(index).value.unwrap_or_default())
}

/// Body color attributes become rules for `body` and the link pseudo-classes.
fn clean_body_colors(dom: &mut Dom, styles: &mut StyleSheet) {
    let Some(body) = dom.find_tag(dom.root(), TagId::BODY) else {
        return;
    };
    let mut body_rule = Vec::new();
    if let Some(url) = take_attr(dom, body, "background") {
        body_rule.push(format!("background-image: url({url})"));
    }
    if let Some(color) = take_attr(dom, body, "bgcolor") {
        body_rule.push(format!("background-color: {color}"));
    }
    if let Some(color) = take_attr(dom, body, "text") {
        body_rule.push(format!("color: {color}"));
    }
    if !body_rule.is_empty() {
        styles.add_rule("body", body_rule.join("; "));
    }
    for (attr, selector) in [("link", ":link"), ("vlink", ":visited"), ("alink", ":active")] {
        if let Some(color) = take_attr(dom, body, attr) {
            styles.add_rule(selector, format!("color: {color}"));
        }
    }
}

fn font_size(size: &str) -> Option<&'static str> {
    let size = size.trim();
    let named = match size {
        "1" => "x-small",
        "2" => "small",
        "3" => "medium",
        "4" => "large",
        "5" => "x-large",
        "6" | "7" => "xx-large",
        _ if size.starts_with('+') => "larger",
        _ if size.starts_with('-') => "smaller",
        _ => return None,
    };
    Some(named)
}

fn presentation_to_style(dom: &mut Dom, tags: &TagTable, node: NodeId, styles: &mut StyleSheet, report: &mut Report) {
    let Some(tag) = dom.tag(node) else {
        return;
    };
    let (line, column) = dom.position(node);
    let old_name = dom.node(node).name.clone();
    let replacement = match tag {
        TagId::CENTER => Some((TagId::DIV, "text-align: center".to_string())),
        TagId::U => Some((TagId::SPAN, "text-decoration: underline".to_string())),
        TagId::S | TagId::STRIKE => Some((TagId::SPAN, "text-decoration: line-through".to_string())),
        TagId::FONT => {
            let mut declarations = Vec::new();
            if let Some(face) = take_attr(dom, node, "face") {
                declarations.push(format!("font-family: {face}"));
            }
            if let Some(size) = take_attr(dom, node, "size") {
                if let Some(size) = font_size(&size) {
                    declarations.push(format!("font-size: {size}"));
                }
            }
            if let Some(color) = take_attr(dom, node, "color") {
                declarations.push(format!("color: {color}"));
            }
            if declarations.is_empty() {
                report.emit(MessageCode::TrimmingElement, line, column, &[&old_name]);
                dom.unwrap(node);
                return;
            }
            Some((TagId::SPAN, declarations.join("; ")))
        }
        TagId::P | TagId::DIV | TagId::H1 | TagId::H2 | TagId::H3 | TagId::H4 | TagId::H5 | TagId::H6 => {
            let Some(align) = take_attr(dom, node, "align") else {
                return;
            };
            let class = styles.class_for(&old_name, &format!("text-align: {}", align.to_ascii_lowercase()));
            add_class(dom, node, &class);
            return;
        }
        _ => None,
    };
    let Some((new_tag, declarations)) = replacement else {
        return;
    };
    let new_name = tags.name(new_tag).to_string();
    report.emit(MessageCode::ReplacingElement, line, column, &[&old_name, &new_name]);
    rename(dom, tags, node, new_tag);
    let class = styles.class_for(&new_name, &declarations);
    add_class(dom, node, &class);
}

/// Fold an element whose only child is the same kind of element into it.
fn merge_nested(dom: &mut Dom, tag: TagId) {
    for node in elements(dom) {
        if !dom.is(node, tag) || dom.parent(node).is_none() {
            continue;
        }
        loop {
            let mut children = dom.children(node).filter(|&c| {
                let n = dom.node(c);
                !(n.is_text() && dom.text(c).trim().is_empty())
            });
            let (Some(only), None) = (children.next(), children.next()) else {
                break;
            };
            if !dom.is(only, tag) || dom.node(node).has_attr("id") && dom.node(only).has_attr("id") {
                break;
            }
            let inner = std::mem::take(&mut dom.node_mut(only).attributes);
            for attr in inner {
                merge_attribute(dom, node, attr);
            }
            log::trace!(target: "html.clean", "merged nested {:?}", tag);
            dom.unwrap(only);
        }
    }
}

fn merge_attribute(dom: &mut Dom, node: NodeId, attr: Attribute) {
    let attrs = &mut dom.node_mut(node).attributes;
    let Some(existing) = attrs.iter_mut().find(|a| a.name.eq_ignore_ascii_case(&attr.name)) else {
        attrs.push(attr);
        return;
    };
    let separator = match attr.name.as_str() {
        "class" => " ",
        "style" => "; ",
        _ => {
            existing.value = attr.value;
            return;
        }
    };
    let mut value = existing.value_str().trim().trim_end_matches(';').to_string();
    let more = attr.value_str().trim();
    if !more.is_empty() {
        if !value.is_empty() {
            value.push_str(separator);
        }
        value.push_str(more);
    }
    existing.value = Some(value);
}

fn logical_emphasis(dom: &mut Dom, tags: &TagTable, report: &mut Report) {
    for node in elements(dom) {
        let target = match dom.tag(node) {
            Some(TagId::I) => TagId::EM,
            Some(TagId::B) => TagId::STRONG,
            _ => continue,
        };
        let (line, column) = dom.position(node);
        let old = dom.node(node).name.clone();
        report.emit(MessageCode::ReplacingElement, line, column, &[&old, tags.name(target)]);
        rename(dom, tags, node, target);
    }
}

/// ASCII stand-ins for typographic characters.
pub(crate) fn bare_char(c: char) -> Option<&'static str> {
    let s = match c {
        '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{2032}' => "'",
        '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{2033}' => "\"",
        '\u{2013}' | '\u{2014}' => "-",
        '\u{2026}' => "...",
        '\u{A0}' => " ",
        _ => return None,
    };
    Some(s)
}

fn verbatim(dom: &Dom, tags: &TagTable, node: NodeId) -> bool {
    dom.ancestors(node).any(|a| {
        dom.tag(a).is_some_and(|t| {
            t == TagId::TEXTAREA || matches!(tags.get(t).parser, ParserKind::Pre | ParserKind::Script)
        })
    })
}

fn bare_text(dom: &mut Dom, tags: &TagTable) {
    let texts: Vec<NodeId> = dom
        .descendants(dom.root())
        .filter(|&n| dom.node(n).is_text())
        .collect();
    for node in texts {
        let text = dom.text(node);
        if !text.chars().any(|c| bare_char(c).is_some()) {
            continue;
        }
        let mut out = String::with_capacity(text.len());
        for c in text.chars() {
            match bare_char(c) {
                Some(s) => out.push_str(s),
                None => out.push(c),
            }
        }
        if !verbatim(dom, tags, node) {
            out = collapse_whitespace(&out);
        }
        dom.set_text(node, &out);
    }
}

fn drop_proprietary_attributes(dom: &mut Dom) {
    for node in elements(dom) {
        dom.node_mut(node).attributes.retain(|attr| {
            attr.from_directive || !lookup_attr(&attr.name).is_some_and(|def| def.is_proprietary())
        });
    }
}

fn supply_alt_text(dom: &mut Dom, alt: &str, report: &mut Report) {
    for node in elements(dom) {
        if !dom.is(node, TagId::IMG) || dom.node(node).has_attr("alt") {
            continue;
        }
        let (line, column) = dom.position(node);
        dom.node_mut(node)
            .attributes
            .push(Attribute::new("alt", Some(alt.to_string())));
        report.emit(MessageCode::InsertingAttribute, line, column, &["img", "alt"]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree_builder::{BuildOptions, build_tree, fix_structure};

    fn cleaned(input: &str, options: CleanOptions) -> (Dom, Report) {
        let tags = TagTable::new();
        let mut report = Report::new();
        let mut dom = build_tree(input, BuildOptions::default(), &tags, &mut report);
        fix_structure(&mut dom, &tags, &mut report);
        report.clear();
        clean_document(&mut dom, &tags, &options, &mut report);
        dom.check_links().unwrap();
        (dom, report)
    }

    fn style_text(dom: &Dom) -> String {
        let style = dom.find_tag(dom.root(), TagId::STYLE).expect("style element");
        dom.text_content(style)
    }

    #[test]
    fn presentational_elements_become_classes() {
        let options = CleanOptions {
            clean: true,
            ..CleanOptions::default()
        };
        let (dom, report) = cleaned("<center>a</center><p><u>b</u> <font color=red>c</font></p>", options);
        let div = dom.find_tag(dom.root(), TagId::DIV).unwrap();
        assert_eq!(dom.node(div).attr_value("class"), Some("c1"));
        assert!(dom.find_tag(dom.root(), TagId::CENTER).is_none());
        assert!(dom.find_tag(dom.root(), TagId::FONT).is_none());
        assert_eq!(
            style_text(&dom),
            "\ndiv.c1 {text-align: center}\nspan.c2 {text-decoration: underline}\nspan.c3 {color: red}\n"
        );
        assert_eq!(report.count_code("replacing-element"), 3);
    }

    #[test]
    fn identical_rules_share_a_class_and_numbering_continues() {
        let options = CleanOptions {
            clean: true,
            css_prefix: "x".to_string(),
            ..CleanOptions::default()
        };
        let (dom, _) = cleaned(r#"<p class="x4">a <u>b</u> <u>c</u></p>"#, options);
        let spans: Vec<&str> = dom
            .descendants(dom.root())
            .filter(|&n| dom.is(n, TagId::SPAN))
            .filter_map(|n| dom.node(n).attr_value("class"))
            .collect();
        assert_eq!(spans, vec!["x5", "x5"]);
    }

    #[test]
    fn body_colors_move_to_the_style_sheet() {
        let options = CleanOptions {
            clean: true,
            ..CleanOptions::default()
        };
        let (dom, _) = cleaned(r#"<body bgcolor="white" link="blue">x</body>"#, options);
        let body = dom.find_tag(dom.root(), TagId::BODY).unwrap();
        assert!(dom.node(body).attributes.is_empty());
        assert_eq!(style_text(&dom), "\nbody {background-color: white}\n:link {color: blue}\n");
    }

    #[test]
    fn font_tags_can_be_dropped() {
        let options = CleanOptions {
            drop_font_tags: true,
            ..CleanOptions::default()
        };
        let (dom, report) = cleaned("<p>a<font size=2>b</font>c</p>", options);
        let p = dom.find_tag(dom.root(), TagId::P).unwrap();
        assert_eq!(dom.text_content(p), "abc");
        assert_eq!(report.count_code("trimming-element"), 1);
    }

    #[test]
    fn nested_divs_merge_their_attributes() {
        let options = CleanOptions {
            clean: true,
            merge_divs: true,
            ..CleanOptions::default()
        };
        let (dom, _) = cleaned(r#"<div class="a"><div class="b" title="t">x</div></div>"#, options);
        let divs: Vec<NodeId> = dom
            .descendants(dom.root())
            .filter(|&n| dom.is(n, TagId::DIV))
            .collect();
        assert_eq!(divs.len(), 1);
        let div = dom.node(divs[0]);
        assert_eq!(div.attr_value("class"), Some("a b"));
        assert_eq!(div.attr_value("title"), Some("t"));
    }

    #[test]
    fn logical_emphasis_and_bare_text() {
        let options = CleanOptions {
            logical_emphasis: true,
            bare: true,
            ..CleanOptions::default()
        };
        let (dom, report) = cleaned("<p><b>\u{201C}x\u{201D}</b> \u{2014} <i>y</i></p>", options);
        assert!(dom.find_tag(dom.root(), TagId::STRONG).is_some());
        assert!(dom.find_tag(dom.root(), TagId::EM).is_some());
        let p = dom.find_tag(dom.root(), TagId::P).unwrap();
        assert_eq!(dom.text_content(p), "\"x\" - y");
        assert_eq!(report.count_code("replacing-element"), 2);
    }

    #[test]
    fn comments_proprietary_attributes_and_alt_text() {
        let options = CleanOptions {
            hide_comments: true,
            drop_proprietary_attributes: true,
            alt_text: "image".to_string(),
            ..CleanOptions::default()
        };
        let (dom, report) = cleaned(
            r#"<!-- note --><table bordercolor="red"><tr><td><img src="a.png"></td></tr></table>"#,
            options,
        );
        assert!(dom.descendants(dom.root()).all(|n| dom.node(n).kind != NodeKind::Comment));
        let table = dom.find_tag(dom.root(), TagId::TABLE).unwrap();
        assert!(dom.node(table).attributes.is_empty());
        let img = dom.find_tag(dom.root(), TagId::IMG).unwrap();
        assert_eq!(dom.node(img).attr_value("alt"), Some("image"));
        assert!(report.has_code("inserting-attribute"));
    }
}
