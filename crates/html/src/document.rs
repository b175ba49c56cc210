//! The document object: one repair operation from input to output.
//!
//! A `Document` owns the option values, the per-document tag table, the
//! decoded source, the repaired tree and the diagnostic report. Callers load
//! input, adjust options, call [`Document::run`] and then read the results.

use crate::access;
use crate::attrs::{AttrPolicy, Validator};
use crate::clean::{CleanOptions, clean_document};
use crate::config::{AutoBool, ConfigEntry, DoctypeMode, OptionId, Options, lookup_option, parse_config_text};
use crate::dom::{Dom, NodeKind};
use crate::entities::EntityOptions;
use crate::error::{ConfigError, FatalError};
use crate::lexer::LexerConfig;
use crate::printer::{PrintOptions, print};
use crate::report::{Diagnostic, MessageCode, Report, ReportFilter, Severity};
use crate::stream::{Sink, Source, decode_input, encode_output};
use crate::tags::{TagId, TagTable, UserTagKind, Versions};
use crate::tree_builder::{BuildOptions, build_tree, fix_structure, normalize_whitespace, prune_empty};
use crate::version;
use memchr::memchr;
use std::borrow::Cow;
use std::io::Read;
use std::path::Path;

const TAG_LISTS: &[(OptionId, UserTagKind)] = &[
    (OptionId::NewInlineTags, UserTagKind::Inline),
    (OptionId::NewBlocklevelTags, UserTagKind::Block),
    (OptionId::NewEmptyTags, UserTagKind::Empty),
    (OptionId::NewPreTags, UserTagKind::Pre),
];

#[derive(Debug)]
pub struct Document {
    options: Options,
    tags: TagTable,
    report: Report,
    /// Report length when the last run started; earlier entries came from
    /// loading and configuration.
    run_start: Option<usize>,
    source: String,
    dom: Dom,
    output: Option<String>,
    versions: Versions,
    xhtml_input: bool,
    xml_input: bool,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            options: Options::new(),
            tags: TagTable::new(),
            report: Report::new(),
            run_start: None,
            source: String::new(),
            dom: Dom::new(),
            output: None,
            versions: Versions::all(),
            xhtml_input: false,
            xml_input: false,
        }
    }

    /// A document over `text` with default options.
    pub fn from_text(text: &str) -> Self {
        let mut doc = Self::new();
        doc.source = normalize_newlines(text).into_owned();
        doc
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut Options {
        &mut self.options
    }

    fn input_limit(&self) -> usize {
        usize::try_from(self.options.int(OptionId::MaxInputSize)).unwrap_or(usize::MAX)
    }

    pub fn load_str(&mut self, text: &str) -> Result<(), FatalError> {
        let limit = self.input_limit();
        if text.len() > limit {
            return Err(FatalError::InputTooLarge { limit });
        }
        self.reset_results();
        self.source = normalize_newlines(text).into_owned();
        Ok(())
    }

    /// Decode `bytes` with the configured input encoding.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<(), FatalError> {
        self.load_source(Source::Memory(bytes))
    }

    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<(), FatalError> {
        self.load_source(Source::File(path.as_ref().to_path_buf()))
    }

    pub fn load_reader(&mut self, reader: impl Read) -> Result<(), FatalError> {
        self.load_source(Source::reader(reader))
    }

    pub fn load_source(&mut self, source: Source<'_>) -> Result<(), FatalError> {
        let bytes = source.read_all(self.input_limit())?;
        self.reset_results();
        let encoding = self.options.encoding(OptionId::InputEncoding);
        let text = decode_input(&bytes, encoding, &mut self.report);
        self.source = normalize_newlines(&text).into_owned();
        Ok(())
    }

    /// Forget the previous input's results; configuration diagnostics stay.
    fn reset_results(&mut self) {
        self.report.discard_from(0, |d| d.severity != Severity::Config);
        self.run_start = None;
        self.output = None;
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Set an option from its textual form. Rejected settings are reported
    /// and leave the previous value in place.
    pub fn set_option(&mut self, name: &str, value: &str) -> Result<OptionId, ConfigError> {
        let result = self.options.parse_named(name, value);
        if let Err(err) = &result {
            self.report_config_error(err, 1);
        }
        result
    }

    pub fn set_option_by_id(&mut self, id: OptionId, value: &str) -> Result<(), ConfigError> {
        let result = self.options.parse(id, value);
        if let Err(err) = &result {
            self.report_config_error(err, 1);
        }
        result
    }

    /// Current value of the named option in its textual form.
    pub fn option_value(&self, name: &str) -> Option<String> {
        lookup_option(name).map(|id| self.options.serialize(id))
    }

    /// Apply configuration text. Names the registry doesn't know are offered
    /// to `extension` first; unclaimed ones are reported. Returns the number
    /// of settings applied.
    pub fn load_config_text_with(
        &mut self,
        text: &str,
        extension: &mut dyn FnMut(&str, &str) -> bool,
    ) -> usize {
        let mut applied = 0;
        for ConfigEntry { name, value, line } in parse_config_text(text) {
            let Some(id) = lookup_option(&name) else {
                if !extension(&name, &value) {
                    self.report_config_error(&ConfigError::UnknownOption(name), line);
                }
                continue;
            };
            match self.options.parse(id, &value) {
                Ok(()) => applied += 1,
                Err(err) => self.report_config_error(&err, line),
            }
        }
        self.options.adjust();
        log::debug!(target: "html.config", "applied {applied} configuration settings");
        applied
    }

    pub fn load_config_text(&mut self, text: &str) -> usize {
        self.load_config_text_with(text, &mut |_, _| false)
    }

    pub fn load_config_file(&mut self, path: impl AsRef<Path>) -> Result<usize, FatalError> {
        let bytes = Source::File(path.as_ref().to_path_buf()).read_all(self.input_limit())?;
        let text = String::from_utf8_lossy(&bytes);
        Ok(self.load_config_text(&text))
    }

    /// `line` is the configuration line the setting came from; settings made
    /// through the API count as line 1.
    fn report_config_error(&mut self, err: &ConfigError, line: u32) {
        match err {
            ConfigError::UnknownOption(name) => {
                self.report.emit(MessageCode::UnknownOption, line, 1, &[name.as_str()]);
            }
            ConfigError::BadValue { option, value } => {
                self.report
                    .emit(MessageCode::BadOptionValue, line, 1, &[option.as_str(), value.as_str()]);
            }
        }
    }

    /// Declare a user tag for this document, and remember it in the matching
    /// `new-*-tags` option.
    pub fn declare_tag(&mut self, kind: UserTagKind, name: &str) -> Result<TagId, ConfigError> {
        let (option, _) = TAG_LISTS
            .iter()
            .find(|(_, k)| *k == kind)
            .copied()
            .unwrap_or((OptionId::NewBlocklevelTags, UserTagKind::Block));
        self.options.parse(option, name)?;
        Ok(self.tags.declare(kind, name))
    }

    pub fn tags(&self) -> &TagTable {
        &self.tags
    }

    /// Repair the loaded source and produce the output text.
    pub fn run(&mut self) -> i32 {
        if let Some(start) = self.run_start {
            self.report.discard_from(start, |d| d.severity != Severity::Config);
        }
        self.run_start = Some(self.report.len());
        self.options.adjust();
        // Declarations live in the options, so a reset forgets them.
        self.tags = TagTable::new();
        for &(option, kind) in TAG_LISTS {
            let names: Vec<String> = self.options.list(option).map(str::to_string).collect();
            for name in names {
                self.tags.declare(kind, &name);
            }
        }
        let opts = &self.options;
        let xml = opts.bool(OptionId::InputXml);
        log::debug!(target: "html.document", "repairing {} bytes (xml: {xml})", self.source.len());

        let mut dom = build_tree(&self.source, build_options(opts), &self.tags, &mut self.report);
        self.xml_input = xml
            || dom
                .children(dom.root())
                .any(|c| dom.node(c).kind == NodeKind::XmlDecl);
        self.xhtml_input = !xml && looks_like_xhtml(&dom);

        if !xml {
            fix_structure(&mut dom, &self.tags, &mut self.report);
            Validator::new(&self.tags, attr_policy(opts)).run(&mut dom, &mut self.report);
            clean_document(&mut dom, &self.tags, &clean_options(opts), &mut self.report);
            prune_empty(
                &mut dom,
                &self.tags,
                &mut self.report,
                opts.bool(OptionId::DropEmptyElements),
                opts.bool(OptionId::DropEmptyParas),
            );
            normalize_whitespace(&mut dom, &self.tags);
            self.versions = version::fix_doctype(
                &mut dom,
                &self.tags,
                &opts.doctype(),
                opts.xhtml_out(),
                &mut self.report,
            );
            if opts.bool(OptionId::TidyMark) {
                version::mark_generator(&mut dom, &self.tags);
            }
            let level = u8::try_from(opts.int(OptionId::AccessibilityCheck)).unwrap_or(0);
            for diagnostic in access::run(&dom, level) {
                self.report.push(diagnostic);
            }
        }
        debug_assert!(dom.check_links().is_ok());

        let blocked = self.report.errors() > 0 && !opts.bool(OptionId::ForceOutput);
        self.output = if opts.bool(OptionId::Markup) && !blocked {
            Some(print(&dom, &self.tags, &PrintOptions::from_options(opts)))
        } else {
            None
        };
        self.dom = dom;
        log::debug!(
            target: "html.document",
            "{} errors, {} warnings, {} accessibility warnings",
            self.errors(),
            self.warnings(),
            self.access_warnings()
        );
        self.exit_status()
    }

    /// Repaired markup, or `None` when errors blocked output or `markup` is off.
    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    /// Output encoded with `output-encoding`.
    pub fn output_bytes(&self) -> Option<Vec<u8>> {
        let encoding = self.options.encoding(OptionId::OutputEncoding);
        self.output.as_deref().map(|text| encode_output(text, encoding))
    }

    /// Write the encoded output, if any, to `sink`.
    pub fn save(&self, sink: &mut Sink<'_>) -> Result<bool, FatalError> {
        match self.output_bytes() {
            Some(bytes) => {
                sink.write(&bytes)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    pub fn report(&self) -> &Report {
        &self.report
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.report.as_slice()
    }

    /// Diagnostics the `show-*` and `mute` options leave visible.
    pub fn visible_diagnostics(&self) -> Vec<&Diagnostic> {
        self.report.visible(report_filter(&self.options)).collect()
    }

    pub fn errors(&self) -> usize {
        self.report.errors()
    }

    pub fn warnings(&self) -> usize {
        self.report.warnings()
    }

    pub fn access_warnings(&self) -> usize {
        self.report.access_warnings()
    }

    pub fn config_errors(&self) -> usize {
        self.report.config_errors()
    }

    /// Name of the markup version the repaired content conforms to.
    pub fn detected_version(&self) -> &'static str {
        version::describe(self.versions, self.is_xhtml())
    }

    pub fn is_xhtml(&self) -> bool {
        self.xhtml_input || self.options.xhtml_out()
    }

    pub fn is_xml(&self) -> bool {
        self.xml_input
    }

    /// 2 when errors were found, 1 for warnings only, 0 otherwise.
    pub fn exit_status(&self) -> i32 {
        if self.errors() > 0 {
            2
        } else if self.warnings() + self.access_warnings() > 0 {
            1
        } else {
            0
        }
    }
}

/// Fold CR LF and lone CR line ends into LF.
fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if memchr(b'\r', text.as_bytes()).is_none() {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
}

fn looks_like_xhtml(dom: &Dom) -> bool {
    let doctype = version::find_doctype(dom)
        .is_some_and(|n| tools::text::contains_ignore_ascii_case(dom.text(n), b"xhtml"));
    doctype
        || dom
            .find_tag(dom.root(), TagId::HTML)
            .is_some_and(|html| dom.node(html).has_attr("xmlns"))
}

fn build_options(opts: &Options) -> BuildOptions {
    let xml = opts.bool(OptionId::InputXml);
    BuildOptions {
        xml,
        coerce_endtags: opts.bool(OptionId::CoerceEndtags),
        enclose_text: opts.bool(OptionId::EncloseText),
        enclose_block_text: opts.bool(OptionId::EncloseBlockText),
        lexer: LexerConfig {
            xml,
            fix_bad_comments: opts.bool(OptionId::FixBadComments),
            literal_attributes: opts.bool(OptionId::LiteralAttributes),
            entities: EntityOptions {
                warn_apos: !opts.xml_out(),
                preserve: opts.bool(OptionId::PreserveEntities),
            },
            tab_size: usize::try_from(opts.int(OptionId::TabSize)).unwrap_or(8),
        },
    }
}

fn attr_policy(opts: &Options) -> AttrPolicy {
    AttrPolicy {
        fix_uri: opts.bool(OptionId::FixUri),
        fix_backslash: opts.bool(OptionId::FixBackslash),
        lower_literals: opts.bool(OptionId::LowerLiterals),
        replace_color: opts.bool(OptionId::ReplaceColor),
        join_classes: opts.bool(OptionId::JoinClasses),
        join_styles: opts.bool(OptionId::JoinStyles),
        repeated: opts.repeated_attributes(),
        xhtml: opts.xhtml_out(),
        html4: matches!(opts.doctype(), DoctypeMode::Strict | DoctypeMode::Transitional),
    }
}

fn clean_options(opts: &Options) -> CleanOptions {
    let clean = opts.bool(OptionId::Clean);
    CleanOptions {
        clean,
        drop_font_tags: opts.bool(OptionId::DropFontTags),
        logical_emphasis: opts.bool(OptionId::LogicalEmphasis),
        bare: opts.bool(OptionId::Bare),
        merge_divs: clean && opts.auto_bool(OptionId::MergeDivs) != AutoBool::No,
        merge_spans: clean && opts.auto_bool(OptionId::MergeSpans) != AutoBool::No,
        hide_comments: opts.bool(OptionId::HideComments),
        drop_proprietary_attributes: opts.bool(OptionId::DropProprietaryAttributes),
        alt_text: opts.string(OptionId::AltText).to_string(),
        css_prefix: opts.string(OptionId::CssPrefix).to_string(),
    }
}

pub fn report_filter(opts: &Options) -> ReportFilter {
    ReportFilter {
        show_info: opts.bool(OptionId::ShowInfo),
        show_warnings: opts.bool(OptionId::ShowWarnings),
        max_errors: usize::try_from(opts.int(OptionId::ShowErrors)).unwrap_or(usize::MAX),
        mute: opts.list(OptionId::Mute).map(str::to_string).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repaired(input: &str) -> Document {
        let mut doc = Document::from_text(input);
        doc.run();
        doc
    }

    #[test]
    fn unclosed_paragraph_is_a_warning() {
        let doc = repaired("<p>text");
        assert!(doc.warnings() >= 1);
        assert_eq!(doc.errors(), 0);
        assert_eq!(doc.exit_status(), 1);
        let out = doc.output().unwrap();
        assert!(out.starts_with("<!DOCTYPE html>\n<html>\n<head>\n"), "{out}");
        assert!(out.contains("<p>text</p>"), "{out}");
        assert!(out.contains("<meta name=\"generator\""), "{out}");
    }

    #[test]
    fn errors_block_output_unless_forced() {
        let mut doc = repaired("<p><blink2>x</blink2></p>");
        assert!(doc.errors() > 0);
        assert_eq!(doc.exit_status(), 2);
        assert!(doc.output().is_none());
        let errors = doc.errors();
        doc.set_option("force-output", "yes").unwrap();
        doc.run();
        assert!(doc.output().is_some());
        assert_eq!(doc.errors(), errors);
    }

    #[test]
    fn newlines_are_normalized() {
        assert_eq!(normalize_newlines("a\r\nb\rc"), "a\nb\nc");
        assert!(matches!(normalize_newlines("abc"), Cow::Borrowed(_)));
    }

    #[test]
    fn config_text_reports_unknown_names() {
        let mut doc = Document::new();
        let applied = doc.load_config_text("indent: auto\nbogus: 1\nwrap: many\n");
        assert_eq!(applied, 1);
        assert_eq!(doc.option_value("indent").as_deref(), Some("auto"));
        assert!(doc.report().has_code("unknown-option"));
        assert!(doc.report().has_code("bad-option-value"));
        assert_eq!(doc.config_errors(), 2);
    }

    #[test]
    fn extension_claims_unknown_names() {
        let mut doc = Document::new();
        let mut seen = Vec::new();
        doc.load_config_text_with("editor-theme: dark\n", &mut |name, value| {
            seen.push(format!("{name}={value}"));
            true
        });
        assert_eq!(seen, ["editor-theme=dark"]);
        assert_eq!(doc.config_errors(), 0);
    }

    #[test]
    fn input_size_is_bounded() {
        let mut doc = Document::new();
        doc.set_option("max-input-size", "4").unwrap();
        assert!(matches!(
            doc.load_bytes(b"<p>hello</p>"),
            Err(FatalError::InputTooLarge { limit: 4 })
        ));
    }

    #[test]
    fn declared_tags_are_known() {
        let mut doc = Document::new();
        doc.declare_tag(UserTagKind::Block, "card").unwrap();
        doc.load_str("<card><p>x</p></card>").unwrap();
        doc.run();
        assert!(!doc.report().has_code("unknown-element"));
        assert_eq!(doc.option_value("new-blocklevel-tags").as_deref(), Some("card"));
    }

    #[test]
    fn option_reset_forgets_declared_tags() {
        let mut doc = Document::new();
        doc.declare_tag(UserTagKind::Block, "card").unwrap();
        doc.load_str("<card>x</card>").unwrap();
        doc.run();
        assert!(!doc.report().has_code("unknown-element"));

        doc.options_mut().reset_all();
        doc.run();
        assert!(doc.report().has_code("unknown-element"));
        assert!(doc.tags().lookup("card").is_none());
    }

    #[test]
    fn xhtml_output_sets_flags() {
        let mut doc = Document::from_text("<p>a<br>b</p>");
        doc.set_option("output-xhtml", "yes").unwrap();
        doc.run();
        assert!(doc.is_xhtml());
        assert!(!doc.is_xml());
        assert!(doc.output().unwrap().contains("<br />"));
    }

    #[test]
    fn encoded_output_uses_the_output_encoding() {
        let mut doc = Document::from_text("<p>caf\u{e9}</p>");
        doc.set_option("output-encoding", "latin1").unwrap();
        doc.set_option("tidy-mark", "no").unwrap();
        doc.run();
        let bytes = doc.output_bytes().unwrap();
        assert!(bytes.windows(5).any(|w| w == b"caf\xe9<"));
    }
}
