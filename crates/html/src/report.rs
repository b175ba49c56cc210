//! Document-scoped diagnostic report.
//!
//! Every stage appends leveled, positioned messages here. The report is
//! append-only; counts are derived from the recorded severities.

use crate::access::AccessRule;
use serde::Serialize;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    Info,
    Warning,
    Config,
    Access,
    Error,
    BadDocument,
    Fatal,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Severity::Info => "Info",
            Severity::Warning => "Warning",
            Severity::Config => "Config",
            Severity::Access => "Access",
            Severity::Error => "Error",
            Severity::BadDocument => "Document",
            Severity::Fatal => "Panic",
        }
    }

    pub fn is_error(self) -> bool {
        matches!(self, Severity::Error | Severity::BadDocument | Severity::Fatal)
    }
}

macro_rules! message_codes {
    ($($variant:ident => $name:literal, $severity:ident, $template:literal;)*) => {
        /// Stable identifiers for every message the engine can emit.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
        pub enum MessageCode {
            $(
                #[serde(rename = $name)]
                $variant,
            )*
        }

        impl MessageCode {
            pub const ALL: &'static [MessageCode] = &[$(MessageCode::$variant,)*];

            pub fn name(self) -> &'static str {
                match self {
                    $(MessageCode::$variant => $name,)*
                }
            }

            pub fn severity(self) -> Severity {
                match self {
                    $(MessageCode::$variant => Severity::$severity,)*
                }
            }

            fn template(self) -> &'static str {
                match self {
                    $(MessageCode::$variant => $template,)*
                }
            }
        }
    };
}

message_codes! {
    // Character decoding and entities.
    InvalidUtf8 => "invalid-utf8", Warning, "replacing invalid UTF-8 bytes with U+FFFD";
    InvalidUtf16 => "invalid-utf16", Warning, "replacing invalid UTF-16 sequence with U+FFFD";
    VendorSpecificChars => "vendor-specific-chars", Warning, "replacing vendor-specific character code {0}";
    InvalidChar => "invalid-char", Warning, "replacing character byte {0} not representable in {1}";
    UnescapedAmpersand => "unescaped-ampersand", Warning, "unescaped & which should be written as &amp;";
    UnknownEntity => "unknown-entity", Warning, "unescaped & or unknown entity \"{0}\"";
    MissingSemicolon => "missing-semicolon", Warning, "entity \"{0}\" doesn't end in ';'";
    MissingSemicolonNcr => "missing-semicolon-ncr", Warning, "numeric character reference \"{0}\" doesn't end in ';'";
    InvalidNcr => "invalid-ncr", Warning, "numeric character reference \"{0}\" is invalid";
    AposUndefined => "apos-undefined", Warning, "named entity &apos; only defined in XML/XHTML";

    // Lexical structure.
    MalformedComment => "malformed-comment", Warning, "{0}";
    MalformedDoctype => "malformed-doctype", Warning, "expected \"html PUBLIC\" or \"html SYSTEM\" in <!DOCTYPE>";
    UnexpectedEndOfFile => "unexpected-end-of-file", Warning, "end of file while parsing {0}";
    UnexpectedQuoteMark => "unexpected-quote-mark", Warning, "<{0}> unexpected or duplicate quote mark";
    MissingQuoteMark => "missing-quote-mark", Warning, "<{0}> attribute with missing trailing quote mark";
    UnexpectedLtInTag => "unexpected-lt-in-tag", Warning, "<{0}> missing '>' for end of tag";

    // Document structure.
    MissingEndTagFor => "missing-end-tag-for", Warning, "missing </{0}>";
    MissingEndtagBefore => "missing-endtag-before", Warning, "missing </{0}> before {1}";
    MissingStartTag => "missing-start-tag", Warning, "missing <{0}>";
    InsertingTag => "inserting-tag", Warning, "inserting implicit <{0}>";
    DiscardingUnexpected => "discarding-unexpected", Warning, "discarding unexpected {0}";
    TagNotAllowedIn => "tag-not-allowed-in", Warning, "{0} isn't allowed in <{1}> elements";
    TextNotAllowedIn => "text-not-allowed-in", Warning, "plain text isn't allowed in <{0}> elements";
    CoerceToEndtag => "coerce-to-endtag", Warning, "<{0}> is probably intended as </{0}>";
    TrimEmptyElement => "trim-empty-element", Warning, "trimming empty <{0}>";
    MissingTitleElement => "missing-title-element", Warning, "inserting missing 'title' element";
    MissingDoctype => "missing-doctype", Warning, "missing <!DOCTYPE> declaration";
    DoctypeAfterTags => "doctype-after-tags", Warning, "<!DOCTYPE> isn't allowed after elements";
    TooManyElements => "too-many-elements", Warning, "too many <{0}> elements in <{1}>";
    ContentAfterBody => "content-after-body", Warning, "content occurs after end of body";
    UnknownElement => "unknown-element", Error, "{0} is not recognized!";
    ProprietaryElement => "proprietary-element", Warning, "{0} is not approved by W3C";
    ObsoleteElement => "obsolete-element", Warning, "replacing obsolete element <{0}> with <{1}>";
    InconsistentVersion => "inconsistent-version", Warning, "<!DOCTYPE> is inconsistent with the content, which looks like {0}";

    // Attributes.
    UnknownAttribute => "unknown-attribute", Error, "<{0}> attribute \"{1}\" is not recognized";
    ProprietaryAttribute => "proprietary-attribute", Warning, "<{0}> proprietary attribute \"{1}\"";
    RepeatedAttribute => "repeated-attribute", Warning, "<{0}> dropping value \"{2}\" for repeated attribute \"{1}\"";
    JoiningAttribute => "joining-attribute", Warning, "<{0}> joining values of repeated attribute \"{1}\"";
    BadAttributeValue => "bad-attribute-value", Warning, "<{0}> attribute \"{1}\" has invalid value \"{2}\"";
    MissingAttribute => "missing-attribute", Warning, "<{0}> lacks \"{1}\" attribute";
    InsertingAttribute => "inserting-attribute", Warning, "<{0}> inserting \"{1}\" attribute";
    AnchorNotUnique => "anchor-not-unique", Warning, "<{0}> anchor \"{1}\" already defined";
    IdNameMismatch => "id-name-mismatch", Warning, "<{0}> id and name attribute value mismatch";
    EscapedIllegalUri => "escaped-illegal-uri", Warning, "<{0}> escaping malformed URI reference";
    FixedBackslash => "fixed-backslash", Warning, "<{0}> converting backslash in URI to slash";

    // Cleanup.
    ReplacingElement => "replacing-element", Warning, "replacing <{0}> with <{1}>";
    TrimmingElement => "trimming-element", Warning, "trimming <{0}> and keeping its content";

    // Configuration.
    UnknownOption => "unknown-option", Config, "unknown option: {0}";
    BadOptionValue => "bad-option-value", Config, "\"{1}\" is not a valid value for option \"{0}\"";

    // Summaries.
    ApparentVersion => "apparent-version", Info, "Document content looks like {0}";
    Accessibility => "accessibility", Access, "{0}";
}

impl MessageCode {
    pub fn from_name(name: &str) -> Option<MessageCode> {
        MessageCode::ALL
            .iter()
            .copied()
            .find(|code| code.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for MessageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fill `{0}`, `{1}`, ... placeholders in a message template.
fn format_template(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len() + 16);
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let index = after
            .find('}')
            .and_then(|close| after[..close].parse::<usize>().ok().map(|i| (i, close)));
        match index {
            Some((i, close)) => {
                out.push_str(args.get(i).copied().unwrap_or(""));
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub line: u32,
    pub column: u32,
    pub code: MessageCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<AccessRule>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(code: MessageCode, line: u32, column: u32, args: &[&str]) -> Self {
        Self {
            severity: code.severity(),
            line,
            column,
            code,
            rule: None,
            message: format_template(code.template(), args),
        }
    }

    pub fn access(rule: AccessRule, line: u32, column: u32) -> Self {
        Self {
            severity: Severity::Access,
            line,
            column,
            code: MessageCode::Accessibility,
            rule: Some(rule),
            message: format!("[{}]: {}", rule.checkpoint(), rule.description()),
        }
    }

    /// Stable code: the accessibility rule name when present, else the message code.
    pub fn code_name(&self) -> &'static str {
        match self.rule {
            Some(rule) => rule.name(),
            None => self.code.name(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Configuration lines are not positions in the document.
        if self.severity != Severity::Config {
            write!(f, "line {} column {} - ", self.line, self.column)?;
        }
        write!(f, "{}: {}", self.severity.label(), self.message)
    }
}

/// Which recorded diagnostics are shown to the user.
#[derive(Clone, Debug)]
pub struct ReportFilter {
    pub show_info: bool,
    pub show_warnings: bool,
    pub max_errors: usize,
    pub mute: Vec<String>,
}

impl Default for ReportFilter {
    fn default() -> Self {
        Self {
            show_info: true,
            show_warnings: true,
            max_errors: usize::MAX,
            mute: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Report {
    diagnostics: Vec<Diagnostic>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        log::trace!(target: "html.report", "{diagnostic}");
        self.diagnostics.push(diagnostic);
    }

    pub fn emit(&mut self, code: MessageCode, line: u32, column: u32, args: &[&str]) {
        self.push(Diagnostic::new(code, line, column, args));
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> + '_ {
        self.diagnostics.iter()
    }

    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Drop the diagnostics at or after `start` that `stale` selects.
    pub fn discard_from(&mut self, start: usize, stale: impl Fn(&Diagnostic) -> bool) {
        let mut index = 0;
        self.diagnostics.retain(|d| {
            let keep = index < start || !stale(d);
            index += 1;
            keep
        });
    }

    pub fn clear(&mut self) {
        self.diagnostics.clear();
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    pub fn errors(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity.is_error())
            .count()
    }

    pub fn warnings(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn access_warnings(&self) -> usize {
        self.count(Severity::Access)
    }

    pub fn config_errors(&self) -> usize {
        self.count(Severity::Config)
    }

    pub fn has_code(&self, code: &str) -> bool {
        self.diagnostics.iter().any(|d| d.code_name() == code)
    }

    pub fn count_code(&self, code: &str) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.code_name() == code)
            .count()
    }

    /// Diagnostics passing `filter`, in report order.
    pub fn visible(&self, filter: ReportFilter) -> impl Iterator<Item = &Diagnostic> + '_ {
        let mut errors_left = filter.max_errors;
        self.diagnostics.iter().filter(move |d| {
            let code = d.code_name();
            if filter.mute.iter().any(|m| m.eq_ignore_ascii_case(code)) {
                return false;
            }
            match d.severity {
                Severity::Info => filter.show_info,
                Severity::Warning | Severity::Access => filter.show_warnings,
                Severity::Error | Severity::BadDocument => {
                    if errors_left == 0 {
                        return false;
                    }
                    errors_left -= 1;
                    true
                }
                Severity::Config | Severity::Fatal => true,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn templates_substitute_positional_arguments() {
        let d = Diagnostic::new(MessageCode::MissingEndtagBefore, 3, 7, &["b", "<div>"]);
        assert_eq!(d.message, "missing </b> before <div>");
        assert_eq!(d.to_string(), "line 3 column 7 - Warning: missing </b> before <div>");
    }

    #[test]
    fn configuration_messages_omit_the_position() {
        let d = Diagnostic::new(MessageCode::UnknownOption, 4, 1, &["bogus"]);
        assert!(!d.to_string().starts_with("line"), "{d}");
        let d = Diagnostic::new(MessageCode::MissingDoctype, 1, 1, &[]);
        assert_eq!(d.to_string(), "line 1 column 1 - Warning: missing <!DOCTYPE> declaration");
    }

    #[test]
    fn counts_follow_severity() {
        let mut report = Report::new();
        report.emit(MessageCode::UnknownElement, 1, 1, &["<foo>"]);
        report.emit(MessageCode::MissingEndTagFor, 1, 1, &["b"]);
        report.emit(MessageCode::UnknownOption, 1, 1, &["bogus"]);
        assert_eq!(report.errors(), 1);
        assert_eq!(report.warnings(), 1);
        assert_eq!(report.config_errors(), 1);
    }

    #[test]
    fn mute_and_error_limit_filter_visible_messages() {
        let mut report = Report::new();
        report.emit(MessageCode::MissingEndTagFor, 1, 1, &["b"]);
        report.emit(MessageCode::UnknownElement, 2, 1, &["<x>"]);
        report.emit(MessageCode::UnknownElement, 3, 1, &["<y>"]);
        let filter = ReportFilter {
            mute: vec!["missing-end-tag-for".to_string()],
            max_errors: 1,
            ..ReportFilter::default()
        };
        let shown: Vec<u32> = report.visible(filter).map(|d| d.line).collect();
        assert_eq!(shown, vec![2]);
    }

    #[test]
    fn code_names_are_unique_and_parse_back() {
        for code in MessageCode::ALL {
            assert_eq!(MessageCode::from_name(code.name()), Some(*code));
        }
    }
}
