//! Pretty printer: the repaired tree back to HTML, XHTML or XML text.
//!
//! Output is built one line at a time. A line remembers where it may break:
//! spaces inside flowing text and the gaps between attributes. Line breaks are
//! only ever introduced where whitespace is insignificant to a re-parse, so
//! printing the re-parsed output yields the same text again.

use crate::attrs::{AttrType, lookup_attr};
use crate::clean::bare_char;
use crate::config::{AutoBool, OptionId, Options};
use crate::dom::{Attribute, Dom, NodeId, NodeKind};
use crate::entities::{entity_name, starts_with_reference};
use crate::tags::{ParserKind, TagId, TagTable};
use std::borrow::Cow;
use std::fmt::Write as _;
use tools::encoding::{Encoding, can_encode};
use tools::text::char_len;

/// Everything the printer reads from the option registry.
#[derive(Clone, Debug)]
pub struct PrintOptions {
    pub indent: AutoBool,
    pub indent_spaces: usize,
    pub indent_attributes: bool,
    /// Wrap column; `None` disables wrapping.
    pub wrap: Option<usize>,
    pub wrap_attributes: bool,
    pub wrap_script_literals: bool,
    pub wrap_sections: bool,
    pub wrap_asp: bool,
    pub wrap_jste: bool,
    pub wrap_php: bool,
    pub uppercase_tags: bool,
    pub uppercase_attributes: bool,
    pub hide_endtags: bool,
    pub break_before_br: bool,
    pub vertical_space: AutoBool,
    pub show_body_only: AutoBool,
    /// The tree came from `input-xml` and carries no HTML knowledge.
    pub input_xml: bool,
    pub xml_out: bool,
    pub xhtml_out: bool,
    pub add_xml_decl: bool,
    pub add_xml_space: bool,
    pub escape_cdata: bool,
    pub encoding: Encoding,
    pub newline: &'static str,
    pub numeric_entities: bool,
    pub quote_marks: bool,
    pub quote_nbsp: bool,
    pub quote_ampersand: bool,
    pub preserve_entities: bool,
    pub ascii_chars: bool,
}

impl PrintOptions {
    pub fn from_options(options: &Options) -> Self {
        Self {
            indent: options.auto_bool(OptionId::Indent),
            indent_spaces: usize::try_from(options.int(OptionId::IndentSpaces)).unwrap_or(2),
            indent_attributes: options.bool(OptionId::IndentAttributes),
            wrap: options.wrap(),
            wrap_attributes: options.bool(OptionId::WrapAttributes),
            wrap_script_literals: options.bool(OptionId::WrapScriptLiterals),
            wrap_sections: options.bool(OptionId::WrapSections),
            wrap_asp: options.bool(OptionId::WrapAsp),
            wrap_jste: options.bool(OptionId::WrapJste),
            wrap_php: options.bool(OptionId::WrapPhp),
            uppercase_tags: options.bool(OptionId::UppercaseTags),
            uppercase_attributes: options.bool(OptionId::UppercaseAttributes),
            hide_endtags: options.bool(OptionId::HideEndtags),
            break_before_br: options.bool(OptionId::BreakBeforeBr),
            vertical_space: options.auto_bool(OptionId::VerticalSpace),
            show_body_only: options.auto_bool(OptionId::ShowBodyOnly),
            input_xml: options.bool(OptionId::InputXml),
            xml_out: options.xml_out(),
            xhtml_out: options.xhtml_out(),
            add_xml_decl: options.bool(OptionId::AddXmlDecl),
            add_xml_space: options.bool(OptionId::AddXmlSpace),
            escape_cdata: options.bool(OptionId::EscapeCdata),
            encoding: options.encoding(OptionId::OutputEncoding),
            newline: options.newline().as_str(),
            numeric_entities: options.bool(OptionId::NumericEntities),
            quote_marks: options.bool(OptionId::QuoteMarks),
            quote_nbsp: options.bool(OptionId::QuoteNbsp),
            quote_ampersand: options.bool(OptionId::QuoteAmpersand),
            preserve_entities: options.bool(OptionId::PreserveEntities),
            ascii_chars: options.bool(OptionId::AsciiChars),
        }
    }

    /// Plain XML, where HTML's named entities are undefined.
    fn bare_xml(&self) -> bool {
        self.xml_out && !self.xhtml_out
    }
}

impl Default for PrintOptions {
    fn default() -> Self {
        let mut options = Options::new();
        options.adjust();
        Self::from_options(&options)
    }
}

/// Serialize `dom` with `options`.
pub fn print(dom: &Dom, tags: &TagTable, options: &PrintOptions) -> String {
    let mut printer = Printer::new(dom, tags, options);
    printer.document();
    log::debug!(target: "html.printer", "printed {} bytes", printer.out.len());
    printer.out
}

#[derive(Debug, Default)]
struct Line {
    text: String,
    /// Width of `text` in characters.
    width: usize,
    indent: usize,
    started: bool,
    /// Byte offset of each breakable space in `text`, with the width before it.
    breaks: Vec<(usize, usize)>,
}

#[derive(Clone, Copy, Debug, Default)]
struct Layout {
    block: bool,
    indented: bool,
    inline: bool,
    literal: bool,
    cdata: Option<(&'static str, &'static str)>,
}

enum Frame {
    Open(NodeId),
    Close(NodeId, Layout),
}

struct Printer<'a> {
    dom: &'a Dom,
    tags: &'a TagTable,
    opts: &'a PrintOptions,
    out: String,
    line: Line,
    depth: usize,
    /// Open inline elements; nothing below them starts a new line.
    inline_depth: usize,
    /// Open elements whose whitespace is content.
    literal_depth: usize,
    blank_pending: bool,
}

impl<'a> Printer<'a> {
    fn new(dom: &'a Dom, tags: &'a TagTable, opts: &'a PrintOptions) -> Self {
        Self {
            dom,
            tags,
            opts,
            out: String::new(),
            line: Line::default(),
            depth: 0,
            inline_depth: 0,
            literal_depth: 0,
            blank_pending: false,
        }
    }

    fn document(&mut self) {
        let root = self.dom.root();
        if let Some(body) = self.body_only() {
            self.nodes(body);
            self.end_line();
            return;
        }
        let declared = self
            .dom
            .children(root)
            .any(|c| self.dom.node(c).kind == NodeKind::XmlDecl);
        if self.opts.xml_out && self.opts.add_xml_decl && !declared {
            let decl = format!(
                "<?xml version=\"1.0\" encoding=\"{}\"?>",
                self.opts.encoding.mime_name()
            );
            self.word(&decl);
            self.end_line();
        }
        self.nodes(root);
        self.end_line();
    }

    fn body_only(&self) -> Option<NodeId> {
        if self.opts.input_xml {
            return None;
        }
        let body = self.dom.find_tag(self.dom.root(), TagId::BODY)?;
        match self.opts.show_body_only {
            AutoBool::No => None,
            AutoBool::Yes => Some(body),
            AutoBool::Auto => self.dom.node(body).implicit.then_some(body),
        }
    }

    /// Print the children of `parent`.
    fn nodes(&mut self, parent: NodeId) {
        let mut frames: Vec<Frame> = Vec::new();
        push_children(self.dom, parent, &mut frames);
        while let Some(frame) = frames.pop() {
            match frame {
                Frame::Open(node) => {
                    if self.dom.node(node).is_element() {
                        if let Some(layout) = self.open_element(node) {
                            frames.push(Frame::Close(node, layout));
                            push_children(self.dom, node, &mut frames);
                        }
                    } else {
                        self.leaf(node);
                    }
                }
                Frame::Close(node, layout) => self.close_element(node, layout),
            }
        }
    }

    // Layout decisions.

    fn parser_kind(&self, node: NodeId) -> Option<ParserKind> {
        self.dom.tag(node).map(|t| self.tags.get(t).parser)
    }

    /// Whitespace directly inside `node` is dropped by the parser.
    fn ignores_whitespace(&self, node: NodeId) -> bool {
        if node == self.dom.root() {
            return true;
        }
        matches!(
            self.parser_kind(node),
            Some(
                ParserKind::Html
                    | ParserKind::Head
                    | ParserKind::Frameset
                    | ParserKind::Table
                    | ParserKind::RowGroup
                    | ParserKind::Row
                    | ParserKind::ColGroup
                    | ParserKind::List
                    | ParserKind::DefList
                    | ParserKind::Select
                    | ParserKind::OptGroup
            )
        )
    }

    fn breaks_line(&self, node: NodeId) -> bool {
        self.dom.node(node).is_element()
            && self
                .dom
                .tag(node)
                .is_some_and(|t| t != TagId::BR && self.tags.get(t).breaks_line())
    }

    /// Whether `node` goes on lines of its own.
    fn is_block(&self, node: NodeId) -> bool {
        if self.literal_depth > 0 || self.inline_depth > 0 {
            return false;
        }
        if self.opts.input_xml {
            return true;
        }
        let parent_ignores = self.dom.parent(node).is_none_or(|p| self.ignores_whitespace(p));
        parent_ignores || self.breaks_line(node)
    }

    /// Elements whose text is printed exactly as stored.
    fn is_literal(&self, node: NodeId) -> bool {
        let n = self.dom.node(node);
        if n.attr_value("xml:space") == Some("preserve") {
            return true;
        }
        if self.opts.input_xml {
            return self
                .dom
                .children(node)
                .any(|c| self.dom.node(c).is_text() && !tools::text::is_blank(self.dom.text(c)));
        }
        n.tag == Some(TagId::TEXTAREA)
            || matches!(self.parser_kind(node), Some(ParserKind::Pre | ParserKind::Script))
    }

    fn is_void(&self, node: NodeId) -> bool {
        let n = self.dom.node(node);
        match n.tag {
            Some(tag) => self.tags.get(tag).is_empty(),
            None => n.kind == NodeKind::StartEndTag,
        }
    }

    /// Whether the content of block `node` is indented on lines of its own.
    fn indents(&self, node: NodeId) -> bool {
        if self.dom.first_child(node).is_none() || self.dom.is(node, TagId::HTML) {
            return false;
        }
        if self.opts.input_xml {
            return self.opts.indent != AutoBool::No;
        }
        match self.opts.indent {
            AutoBool::No => false,
            AutoBool::Yes => !matches!(self.parser_kind(node), Some(ParserKind::Title | ParserKind::Text)),
            AutoBool::Auto => {
                self.ignores_whitespace(node) || self.dom.children(node).any(|c| self.breaks_line(c))
            }
        }
    }

    /// CDATA markers for script or style content in XHTML output.
    fn cdata_markers(&self, node: NodeId) -> Option<(&'static str, &'static str)> {
        if !self.opts.xhtml_out || self.parser_kind(node) != Some(ParserKind::Script) {
            return None;
        }
        let text = self.dom.text_content(node);
        if !text.contains(['<', '&']) {
            return None;
        }
        let trimmed = text.trim_start();
        if trimmed.starts_with("//<![CDATA[") || trimmed.starts_with("/*<![CDATA[*/") || trimmed.starts_with("<![CDATA[") {
            return None;
        }
        if self.dom.is(node, TagId::STYLE) {
            Some(("/*<![CDATA[*/", "/*]]>*/"))
        } else {
            Some(("//<![CDATA[", "//]]>"))
        }
    }

    fn vertical_gap(&mut self, node: NodeId) {
        if self.opts.vertical_space == AutoBool::No {
            return;
        }
        let parent = self.dom.parent(node).and_then(|p| self.dom.tag(p));
        if matches!(parent, Some(TagId::HTML | TagId::HEAD | TagId::BODY)) {
            self.blank_pending = true;
        }
    }

    // Elements.

    fn open_element(&mut self, node: NodeId) -> Option<Layout> {
        let block = self.is_block(node);
        let br = self.dom.is(node, TagId::BR);
        if block || (br && self.opts.break_before_br && self.literal_depth == 0) {
            self.end_line();
        }
        let void = self.is_void(node);
        self.start_tag(node, void);
        if void {
            if block || (br && self.literal_depth == 0) {
                self.end_line();
            }
            if block {
                self.vertical_gap(node);
            }
            return None;
        }
        let literal = self.is_literal(node);
        let layout = Layout {
            block,
            indented: block && !literal && self.indents(node),
            inline: !block && !self.opts.input_xml,
            literal,
            cdata: self.cdata_markers(node),
        };
        if self.parser_kind(node) == Some(ParserKind::Pre) {
            let first = self.dom.first_child(node);
            if first.is_some_and(|f| self.dom.node(f).is_text() && self.dom.text(f).starts_with('\n')) {
                self.raw("\n");
            }
        }
        if let Some((open, _)) = layout.cdata {
            self.raw(&format!("\n{open}\n"));
        }
        if layout.indented {
            self.end_line();
            self.depth += 1;
        }
        if layout.literal {
            self.literal_depth += 1;
        }
        if layout.inline {
            self.inline_depth += 1;
        }
        Some(layout)
    }

    fn close_element(&mut self, node: NodeId, layout: Layout) {
        if layout.indented {
            self.end_line();
            self.depth -= 1;
        }
        if let Some((_, close)) = layout.cdata {
            self.raw(&format!("\n{close}\n"));
        }
        if layout.literal {
            self.literal_depth -= 1;
        }
        if layout.inline {
            self.inline_depth -= 1;
        }
        if !self.hides_end_tag(node) {
            let name = self.element_name(node);
            self.word(&format!("</{name}>"));
        }
        if layout.block {
            self.end_line();
            self.vertical_gap(node);
        }
    }

    fn hides_end_tag(&self, node: NodeId) -> bool {
        self.opts.hide_endtags
            && !self.opts.xml_out
            && self
                .dom
                .tag(node)
                .is_some_and(|t| self.tags.get(t).end_optional())
    }

    fn element_name(&self, node: NodeId) -> Cow<'a, str> {
        let dom: &'a Dom = self.dom;
        let name: &'a str = match dom.tag(node) {
            Some(tag) => self.tags.name(tag),
            None => &dom.node(node).name,
        };
        if self.opts.uppercase_tags && !self.opts.xml_out {
            Cow::Owned(name.to_ascii_uppercase())
        } else {
            Cow::Borrowed(name)
        }
    }

    fn start_tag(&mut self, node: NodeId, void: bool) {
        let dom = self.dom;
        let n = dom.node(node);
        let name = self.element_name(node);
        self.word(&format!("<{name}"));
        let needs_space_attr = self.opts.xml_out
            && self.opts.add_xml_space
            && !n.has_attr("xml:space")
            && (n.tag == Some(TagId::TEXTAREA)
                || matches!(self.parser_kind(node), Some(ParserKind::Pre | ParserKind::Script)));
        for (index, attr) in n.attributes.iter().enumerate() {
            if self.opts.indent_attributes && index > 0 {
                self.continuation_line();
            } else {
                self.space();
            }
            self.attribute(attr);
        }
        if needs_space_attr {
            self.space();
            self.word("xml:space=\"preserve\"");
        }
        let close = match (void, self.opts.xhtml_out, self.opts.xml_out) {
            (true, true, _) => " />",
            (true, false, true) => "/>",
            _ => ">",
        };
        self.word(close);
    }

    fn attribute(&mut self, attr: &Attribute) {
        let name = if self.opts.uppercase_attributes && !self.opts.xml_out {
            Cow::Owned(attr.name.to_ascii_uppercase())
        } else {
            Cow::Borrowed(attr.name.as_str())
        };
        let kind = lookup_attr(&attr.name).map(|def| def.kind);
        let boolean = kind == Some(AttrType::Bool);
        let value = match attr.value.as_deref() {
            None if self.opts.xml_out => attr.name.as_str(),
            None => {
                self.word(&name);
                return;
            }
            Some(v) if boolean && !self.opts.xml_out && v.eq_ignore_ascii_case(&attr.name) => {
                self.word(&name);
                return;
            }
            Some(v) => v,
        };
        let escaped = if attr.from_directive {
            value.to_string()
        } else {
            let mut out = String::with_capacity(value.len());
            self.escape(value, true, &mut out);
            out
        };
        let breakable = self.opts.wrap_attributes
            && kind != Some(AttrType::Url)
            && (kind != Some(AttrType::Script) || self.opts.wrap_script_literals);
        let quoted = format!("{name}=\"{escaped}\"");
        if breakable && !quoted.contains('\n') {
            self.words(&quoted);
        } else {
            self.literal(&quoted);
        }
    }

    // Leaves.

    fn leaf(&mut self, node: NodeId) {
        let dom = self.dom;
        let n = dom.node(node);
        let text = dom.text(node);
        if n.kind == NodeKind::Text {
            self.text(node, text);
            return;
        }
        let block = self.is_block(node);
        if block {
            self.end_line();
        }
        match n.kind {
            NodeKind::Comment => self.literal(&format!("<!--{text}-->")),
            NodeKind::DocType => self.literal(&format!("<!DOCTYPE {text}>")),
            NodeKind::XmlDecl => self.literal(&format!("<?xml {text}?>")),
            NodeKind::ProcInstr => {
                if self.opts.xml_out && !text.ends_with('?') {
                    self.literal(&format!("<?{text}?>"));
                } else {
                    self.literal(&format!("<?{text}>"));
                }
            }
            NodeKind::CData if self.opts.escape_cdata => {
                let collapsed = tools::text::collapse_whitespace(text);
                self.flow_text(&collapsed);
            }
            NodeKind::CData => self.literal(&format!("<![CDATA[{text}]]>")),
            NodeKind::Section => self.directive(&format!("<![{text}]>"), self.opts.wrap_sections),
            NodeKind::Asp => self.directive(&format!("<%{text}%>"), self.opts.wrap_asp),
            NodeKind::Jste => self.directive(&format!("<#{text}#>"), self.opts.wrap_jste),
            NodeKind::Php => self.directive(&format!("<?php{text}?>"), self.opts.wrap_php),
            _ => {}
        }
        if block {
            self.end_line();
        }
    }

    fn text(&mut self, node: NodeId, text: &str) {
        let raw = self
            .dom
            .parent(node)
            .is_some_and(|p| self.parser_kind(p) == Some(ParserKind::Script));
        if raw {
            self.raw(text);
        } else if self.literal_depth > 0 {
            let mut out = String::with_capacity(text.len());
            self.escape(text, false, &mut out);
            self.raw(&out);
        } else {
            self.flow_text(text);
        }
    }

    fn flow_text(&mut self, text: &str) {
        let mut escaped = String::new();
        for (index, piece) in text.split(' ').enumerate() {
            if index > 0 {
                self.space();
            }
            escaped.clear();
            self.escape(piece, false, &mut escaped);
            self.word(&escaped);
        }
    }

    /// Templating blocks may wrap at their own spaces when allowed and not
    /// already laid out over several lines.
    fn directive(&mut self, text: &str, wrap: bool) {
        if wrap && !text.contains('\n') {
            self.words(text);
        } else {
            self.literal(text);
        }
    }

    fn escape(&self, text: &str, attribute: bool, out: &mut String) {
        for (index, ch) in text.char_indices() {
            match ch {
                '&' => {
                    if self.opts.preserve_entities && starts_with_reference(&text[index..]) {
                        out.push('&');
                    } else if self.opts.quote_ampersand || attribute {
                        out.push_str("&amp;");
                    } else {
                        out.push('&');
                    }
                }
                '<' => out.push_str("&lt;"),
                '>' => out.push_str("&gt;"),
                '"' if attribute || self.opts.quote_marks => out.push_str("&quot;"),
                '\'' if self.opts.quote_marks && !attribute => out.push_str("&#39;"),
                '\u{a0}' => {
                    if self.opts.quote_nbsp || !can_encode(ch, self.opts.encoding) {
                        self.reference(ch, out);
                    } else {
                        out.push(ch);
                    }
                }
                c if c.is_ascii() => out.push(c),
                c => {
                    if self.opts.ascii_chars {
                        if let Some(plain) = bare_char(c) {
                            out.push_str(plain);
                            continue;
                        }
                    }
                    if can_encode(c, self.opts.encoding) {
                        out.push(c);
                    } else {
                        self.reference(c, out);
                    }
                }
            }
        }
    }

    fn reference(&self, ch: char, out: &mut String) {
        let named = !self.opts.numeric_entities && !self.opts.bare_xml();
        match entity_name(ch).filter(|_| named) {
            Some(name) => {
                let _ = write!(out, "&{name};");
            }
            None => {
                let _ = write!(out, "&#{};", u32::from(ch));
            }
        }
    }

    // Line buffer.

    fn indent_width(&self) -> usize {
        self.depth * self.opts.indent_spaces
    }

    fn start_line(&mut self) {
        if self.line.started {
            return;
        }
        if self.blank_pending {
            self.out.push_str(self.opts.newline);
            self.blank_pending = false;
        }
        self.line.started = true;
        self.line.indent = self.indent_width();
    }

    /// Unbreakable text.
    fn word(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.start_line();
        let width = char_len(text);
        self.fit(width);
        self.line.text.push_str(text);
        self.line.width += width;
    }

    /// Text whose spaces may all become line breaks.
    fn words(&mut self, text: &str) {
        for (index, piece) in text.split(' ').enumerate() {
            if index > 0 {
                self.space();
            }
            self.word(piece);
        }
    }

    /// A breakable space.
    fn space(&mut self) {
        self.start_line();
        if self.opts.wrap.is_some() && self.literal_depth == 0 {
            self.line.breaks.push((self.line.text.len(), self.line.width));
        }
        self.line.text.push(' ');
        self.line.width += 1;
    }

    /// Unbreakable text that may span lines; continuation lines are not
    /// indented.
    fn literal(&mut self, text: &str) {
        if text.contains('\n') {
            self.raw(text);
        } else {
            self.word(text);
        }
    }

    /// Text copied as is, newlines included.
    fn raw(&mut self, text: &str) {
        for (index, piece) in text.split('\n').enumerate() {
            if index > 0 {
                self.line.started = true;
                self.flush_line();
                self.line.started = true;
                self.line.indent = 0;
            }
            self.word(piece);
        }
    }

    /// Break inside a tag and indent one level deeper.
    fn continuation_line(&mut self) {
        self.end_line();
        self.start_line();
        self.line.indent += self.opts.indent_spaces;
    }

    /// Break lines until `extra` more characters fit, if any break point allows.
    fn fit(&mut self, extra: usize) {
        let Some(limit) = self.opts.wrap else {
            return;
        };
        while self.line.indent + self.line.width + extra > limit && !self.line.breaks.is_empty() {
            let indent = self.line.indent;
            let pick = self
                .line
                .breaks
                .iter()
                .rposition(|&(_, before)| indent + before <= limit)
                .unwrap_or(0);
            self.break_at(pick);
        }
    }

    fn break_at(&mut self, index: usize) {
        let (byte, before) = self.line.breaks[index];
        let later: Vec<(usize, usize)> = self.line.breaks[index + 1..]
            .iter()
            .map(|&(b, w)| (b - byte - 1, w - before - 1))
            .collect();
        let rest = self.line.text[byte + 1..].to_string();
        let rest_width = self.line.width - before - 1;
        self.line.text.truncate(byte);
        self.flush_line();
        self.line = Line {
            text: rest,
            width: rest_width,
            indent: self.indent_width(),
            started: true,
            breaks: later,
        };
    }

    fn end_line(&mut self) {
        if self.line.started {
            self.flush_line();
        }
    }

    fn flush_line(&mut self) {
        let line = std::mem::take(&mut self.line);
        if !line.text.is_empty() {
            self.out.extend(std::iter::repeat_n(' ', line.indent));
            self.out.push_str(&line.text);
        }
        self.out.push_str(self.opts.newline);
    }
}

fn push_children(dom: &Dom, parent: NodeId, frames: &mut Vec<Frame>) {
    let start = frames.len();
    frames.extend(dom.children(parent).map(Frame::Open));
    frames[start..].reverse();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Report;
    use crate::tree_builder::{BuildOptions, build_tree, fix_structure};

    fn printed(input: &str, options: &PrintOptions) -> String {
        let tags = TagTable::new();
        let mut report = Report::new();
        let mut dom = build_tree(input, BuildOptions::default(), &tags, &mut report);
        fix_structure(&mut dom, &tags, &mut report);
        print(&dom, &tags, options)
    }

    fn body(output: &str) -> String {
        let start = output.find("<body>").map_or(0, |i| i + "<body>\n".len());
        let end = output.find("</body>").unwrap_or(output.len());
        output[start..end].to_string()
    }

    #[test]
    fn blocks_start_lines_and_inline_content_flows() {
        let out = printed("<p>hello <b>world</b><ul><li>one<li>two</ul>", &PrintOptions::default());
        assert_eq!(
            out,
            "<html>\n<head>\n<title></title>\n</head>\n<body>\n<p>hello <b>world</b></p>\n<ul>\n<li>one</li>\n<li>two</li>\n</ul>\n</body>\n</html>\n"
        );
    }

    #[test]
    fn auto_indent_nests_block_content() {
        let options = PrintOptions {
            indent: AutoBool::Auto,
            ..PrintOptions::default()
        };
        let out = printed("<div><p>a</p></div>", &options);
        assert_eq!(body(&out), "  <div>\n    <p>a</p>\n  </div>\n");
    }

    #[test]
    fn wraps_only_at_spaces() {
        let options = PrintOptions {
            wrap: Some(20),
            ..PrintOptions::default()
        };
        let out = printed("<p>alpha beta gamma delta epsilon</p>", &options);
        assert_eq!(body(&out), "<p>alpha beta gamma\ndelta epsilon</p>\n");
        for line in out.lines() {
            assert!(line.chars().count() <= 20 || !line.contains(' '), "{line}");
        }
    }

    #[test]
    fn preformatted_text_is_untouched() {
        let options = PrintOptions {
            wrap: Some(10),
            ..PrintOptions::default()
        };
        let out = printed("<pre>\n\n  a  b   c d e f g h</pre>", &options);
        assert!(out.contains("<pre>\n\n  a  b   c d e f g h</pre>"), "{out}");
    }

    #[test]
    fn escaping_and_entities() {
        let out = printed("<p>a &amp; b &lt; c\u{a0}d \u{263a}</p>", &PrintOptions::default());
        assert!(out.contains("<p>a &amp; b &lt; c&nbsp;d \u{263a}</p>"), "{out}");
        let ascii = PrintOptions {
            encoding: Encoding::Ascii,
            numeric_entities: true,
            ..PrintOptions::default()
        };
        let out = printed("<p>\u{e9}</p>", &ascii);
        assert!(out.contains("<p>&#233;</p>"), "{out}");
    }

    #[test]
    fn xhtml_empty_elements_and_boolean_attributes() {
        let options = PrintOptions {
            xml_out: true,
            xhtml_out: true,
            ..PrintOptions::default()
        };
        let out = printed("<p>a<br>b<input type=checkbox checked></p>", &options);
        assert!(out.contains("a<br />\nb<input type=\"checkbox\" checked=\"checked\" /></p>"), "{out}");
        let out = printed("<p><input type=checkbox checked=checked></p>", &PrintOptions::default());
        assert!(out.contains("<input type=\"checkbox\" checked>"), "{out}");
    }

    #[test]
    fn uppercase_and_hidden_end_tags() {
        let options = PrintOptions {
            uppercase_tags: true,
            hide_endtags: true,
            ..PrintOptions::default()
        };
        let out = printed("<p>a<p>b", &options);
        assert!(out.contains("<P>a\n<P>b\n"), "{out}");
        assert!(!out.contains("</P>"));
    }

    #[test]
    fn script_content_is_wrapped_in_cdata_for_xhtml() {
        let options = PrintOptions {
            xml_out: true,
            xhtml_out: true,
            ..PrintOptions::default()
        };
        let out = printed("<script>if (a < b) {}</script>", &options);
        assert!(out.contains("<script>\n//<![CDATA[\nif (a < b) {}\n//]]>\n</script>"), "{out}");
    }

    #[test]
    fn crlf_newlines() {
        let options = PrintOptions {
            newline: "\r\n",
            ..PrintOptions::default()
        };
        let out = printed("<p>x</p>", &options);
        assert!(out.ends_with("</html>\r\n"));
        assert!(!out.replace("\r\n", "").contains('\n'));
    }
}
