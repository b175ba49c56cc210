//! Option registry: every tunable behavior, its typed parser and default.
//!
//! Values are stored per slot in a flat vector indexed by [`OptionId`]. A
//! second vector holds the snapshot taken by [`Options::snapshot`]; the two are
//! independent until [`Options::restore_snapshot`] copies one over the other.

mod file;
mod table;

pub use file::{ConfigEntry, parse_config_text};
pub use table::OptionId;

use crate::error::ConfigError;
use std::fmt;
use tools::encoding::Encoding;

pub(crate) use table::OPTION_DEFS;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OptionCategory {
    Markup,
    Diagnostics,
    PrettyPrint,
    Encoding,
    DocumentIo,
    Cleanup,
    Accessibility,
}

impl OptionCategory {
    pub fn label(self) -> &'static str {
        match self {
            OptionCategory::Markup => "Markup",
            OptionCategory::Diagnostics => "Diagnostics",
            OptionCategory::PrettyPrint => "Pretty Print",
            OptionCategory::Encoding => "Encoding",
            OptionCategory::DocumentIo => "Document I/O",
            OptionCategory::Cleanup => "Cleanup",
            OptionCategory::Accessibility => "Accessibility",
        }
    }
}

/// How an option's text form is parsed and printed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OptionType {
    Bool,
    /// `no`, `yes` or `auto`, stored as 0, 1, 2.
    AutoBool,
    Integer,
    String,
    TagList,
    Encoding,
    Doctype,
    Newline,
    Repeated,
    AccessLevel,
    MuteList,
}

const AUTO_BOOL_PICKS: &[&str] = &["no", "yes", "auto"];
const BOOL_PICKS: &[&str] = &["no", "yes"];
const NEWLINE_PICKS: &[&str] = &["LF", "CRLF", "CR"];
const REPEATED_PICKS: &[&str] = &["keep-first", "keep-last"];
const ACCESS_PICKS: &[&str] = &["0", "1", "2", "3"];
const DOCTYPE_PICKS: &[&str] = &["html5", "omit", "auto", "strict", "transitional", "user"];
const ENCODING_PICKS: &[&str] = &[
    "raw", "ascii", "latin0", "latin1", "utf8", "mac", "win1252", "ibm858", "utf16le", "utf16be",
    "utf16",
];

impl OptionType {
    /// Values accepted by pick-list types; empty for free-form types.
    pub fn picks(self) -> &'static [&'static str] {
        match self {
            OptionType::Bool => BOOL_PICKS,
            OptionType::AutoBool => AUTO_BOOL_PICKS,
            OptionType::Newline => NEWLINE_PICKS,
            OptionType::Repeated => REPEATED_PICKS,
            OptionType::AccessLevel => ACCESS_PICKS,
            OptionType::Doctype => DOCTYPE_PICKS,
            OptionType::Encoding => ENCODING_PICKS,
            OptionType::Integer
            | OptionType::String
            | OptionType::TagList
            | OptionType::MuteList => &[],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OptionType::Bool => "Boolean",
            OptionType::AutoBool => "AutoBool",
            OptionType::Integer => "Integer",
            OptionType::String => "String",
            OptionType::TagList => "Tag Names",
            OptionType::Encoding => "Encoding",
            OptionType::Doctype => "DocType",
            OptionType::Newline => "Enum",
            OptionType::Repeated => "Enum",
            OptionType::AccessLevel => "Enum",
            OptionType::MuteList => "Message Codes",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DefaultValue {
    Bool(bool),
    Int(u64),
    Str(&'static str),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OptionValue {
    Bool(bool),
    Integer(u64),
    String(String),
}

impl From<DefaultValue> for OptionValue {
    fn from(value: DefaultValue) -> Self {
        match value {
            DefaultValue::Bool(b) => OptionValue::Bool(b),
            DefaultValue::Int(n) => OptionValue::Integer(n),
            DefaultValue::Str(s) => OptionValue::String(s.to_string()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionDef {
    pub id: OptionId,
    pub name: &'static str,
    pub category: OptionCategory,
    pub kind: OptionType,
    pub default: DefaultValue,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AutoBool {
    No,
    Yes,
    Auto,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Newline {
    Lf,
    CrLf,
    Cr,
}

impl Newline {
    pub fn as_str(self) -> &'static str {
        match self {
            Newline::Lf => "\n",
            Newline::CrLf => "\r\n",
            Newline::Cr => "\r",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RepeatedAttributes {
    KeepFirst,
    KeepLast,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DoctypeMode {
    Html5,
    Omit,
    Auto,
    Strict,
    Transitional,
    /// Keep the document's own doctype, or use the given public identifier.
    User(Option<String>),
}

/// Stored for a `wrap` of zero.
pub const WRAP_UNBOUNDED: u64 = u64::MAX;

pub fn option_def(id: OptionId) -> Option<&'static OptionDef> {
    let index = (id as usize).checked_sub(1)?;
    OPTION_DEFS.get(index)
}

/// Find an option by its configuration name (case-insensitive).
pub fn lookup_option(name: &str) -> Option<OptionId> {
    let name = name.trim();
    OPTION_DEFS
        .iter()
        .find(|def| def.name.eq_ignore_ascii_case(name))
        .map(|def| def.id)
}

/// Current option values plus an independent snapshot.
#[derive(Clone, Debug)]
pub struct Options {
    values: Vec<OptionValue>,
    snapshot: Vec<OptionValue>,
}

impl Default for Options {
    fn default() -> Self {
        Self::new()
    }
}

impl Options {
    pub fn new() -> Self {
        let mut values = Vec::with_capacity(OPTION_DEFS.len() + 1);
        values.push(OptionValue::Bool(false));
        values.extend(OPTION_DEFS.iter().map(|def| OptionValue::from(def.default)));
        Self {
            snapshot: values.clone(),
            values,
        }
    }

    pub fn get(&self, id: OptionId) -> &OptionValue {
        &self.values[id as usize]
    }

    /// Store `value` after checking it fits the slot's type.
    pub fn set(&mut self, id: OptionId, value: OptionValue) -> Result<(), ConfigError> {
        let def = option_def(id).ok_or_else(|| ConfigError::UnknownOption(format!("{id:?}")))?;
        let fits = match (&value, def.kind) {
            (OptionValue::Bool(_), OptionType::Bool) => true,
            (OptionValue::Integer(n), OptionType::AutoBool) => *n <= 2,
            (OptionValue::Integer(_), OptionType::Integer) => true,
            (OptionValue::Integer(n), OptionType::Encoding) => (*n as usize) < ENCODING_PICKS.len(),
            (OptionValue::Integer(n), OptionType::Newline) => *n < 3,
            (OptionValue::Integer(n), OptionType::Repeated) => *n < 2,
            (OptionValue::Integer(n), OptionType::AccessLevel) => *n <= 3,
            (
                OptionValue::String(_),
                OptionType::String | OptionType::TagList | OptionType::MuteList | OptionType::Doctype,
            ) => true,
            _ => false,
        };
        if !fits {
            return Err(ConfigError::BadValue {
                option: def.name.to_string(),
                value: display_value(&value),
            });
        }
        self.store(id, value);
        Ok(())
    }

    pub fn set_bool(&mut self, id: OptionId, value: bool) {
        self.store(id, OptionValue::Bool(value));
    }

    pub fn set_int(&mut self, id: OptionId, value: u64) {
        self.store(id, OptionValue::Integer(value));
    }

    pub fn set_string(&mut self, id: OptionId, value: impl Into<String>) {
        self.store(id, OptionValue::String(value.into()));
    }

    fn store(&mut self, id: OptionId, value: OptionValue) {
        if id == OptionId::Unknown {
            return;
        }
        if id == OptionId::CharEncoding {
            self.values[OptionId::InputEncoding as usize] = value.clone();
            self.values[OptionId::OutputEncoding as usize] = value.clone();
        }
        log::trace!(target: "html.config", "{id:?} = {value:?}");
        self.values[id as usize] = value;
    }

    /// Parse `text` into the slot `id`. On error the previous value is kept.
    pub fn parse(&mut self, id: OptionId, text: &str) -> Result<(), ConfigError> {
        let def = option_def(id).ok_or_else(|| ConfigError::UnknownOption(text.to_string()))?;
        let text = text.trim();
        let bad = || ConfigError::BadValue {
            option: def.name.to_string(),
            value: text.to_string(),
        };
        let value = match def.kind {
            OptionType::Bool => OptionValue::Bool(parse_bool(text).ok_or_else(bad)?),
            OptionType::AutoBool => {
                let n = if text.eq_ignore_ascii_case("auto") {
                    2
                } else {
                    u64::from(parse_bool(text).ok_or_else(bad)?)
                };
                OptionValue::Integer(n)
            }
            OptionType::Integer => {
                let n: u64 = text.parse().map_err(|_| bad())?;
                if id == OptionId::Wrap && n == 0 {
                    OptionValue::Integer(WRAP_UNBOUNDED)
                } else {
                    OptionValue::Integer(n)
                }
            }
            OptionType::String => OptionValue::String(text.to_string()),
            OptionType::TagList => {
                let names = split_list(text);
                if names.iter().any(|n| !is_valid_tag_name(n)) {
                    return Err(bad());
                }
                OptionValue::String(merge_list(self.string(id), names))
            }
            OptionType::MuteList => {
                let names: Vec<String> = split_list(text)
                    .into_iter()
                    .map(|n| n.to_ascii_lowercase())
                    .collect();
                OptionValue::String(merge_list(self.string(id), names))
            }
            OptionType::Encoding => {
                let encoding = Encoding::from_name(text).ok_or_else(bad)?;
                OptionValue::Integer(encoding_index(encoding))
            }
            OptionType::Newline => OptionValue::Integer(pick_index(NEWLINE_PICKS, text).ok_or_else(bad)?),
            OptionType::Repeated => {
                OptionValue::Integer(pick_index(REPEATED_PICKS, text).ok_or_else(bad)?)
            }
            OptionType::AccessLevel => {
                let digits: String = text.chars().take_while(char::is_ascii_digit).collect();
                let level: u64 = digits.parse().map_err(|_| bad())?;
                if level > 3 {
                    return Err(bad());
                }
                OptionValue::Integer(level)
            }
            OptionType::Doctype => OptionValue::String(parse_doctype(text).ok_or_else(bad)?),
        };
        self.store(id, value);
        Ok(())
    }

    /// Parse by option name.
    pub fn parse_named(&mut self, name: &str, text: &str) -> Result<OptionId, ConfigError> {
        let id = lookup_option(name).ok_or_else(|| ConfigError::UnknownOption(name.to_string()))?;
        self.parse(id, text)?;
        Ok(id)
    }

    /// Text form accepted back by [`Options::parse`].
    pub fn serialize(&self, id: OptionId) -> String {
        let Some(def) = option_def(id) else {
            return String::new();
        };
        match (def.kind, self.get(id)) {
            (OptionType::Bool, OptionValue::Bool(b)) => BOOL_PICKS[usize::from(*b)].to_string(),
            (OptionType::Integer, OptionValue::Integer(n)) => {
                if id == OptionId::Wrap && *n == WRAP_UNBOUNDED {
                    "0".to_string()
                } else {
                    n.to_string()
                }
            }
            (kind, OptionValue::Integer(n)) => kind
                .picks()
                .get(*n as usize)
                .map(|s| s.to_string())
                .unwrap_or_else(|| n.to_string()),
            (_, value) => display_value(value),
        }
    }

    pub fn snapshot(&mut self) {
        self.snapshot.clone_from(&self.values);
    }

    pub fn restore_snapshot(&mut self) {
        self.values.clone_from(&self.snapshot);
    }

    pub fn reset_to_default(&mut self, id: OptionId) {
        if let Some(def) = option_def(id) {
            self.values[id as usize] = OptionValue::from(def.default);
        }
    }

    pub fn reset_all(&mut self) {
        for def in OPTION_DEFS {
            self.values[def.id as usize] = OptionValue::from(def.default);
        }
    }

    pub fn is_default(&self, id: OptionId) -> bool {
        option_def(id).is_some_and(|def| *self.get(id) == OptionValue::from(def.default))
    }

    /// Options whose value differs from the snapshot.
    pub fn changed_since_snapshot(&self) -> impl Iterator<Item = OptionId> + '_ {
        OPTION_DEFS
            .iter()
            .map(|def| def.id)
            .filter(|id| self.values[*id as usize] != self.snapshot[*id as usize])
    }

    /// Every option with its definition and current value, in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static OptionDef, &OptionValue)> + '_ {
        OPTION_DEFS
            .iter()
            .map(move |def| (def, &self.values[def.id as usize]))
    }

    /// Apply cross-option consistency rules.
    pub fn adjust(&mut self) {
        if self.int(OptionId::Wrap) == 0 {
            self.set_int(OptionId::Wrap, WRAP_UNBOUNDED);
        }
        if self.bool(OptionId::OutputXhtml) {
            self.set_bool(OptionId::OutputXml, true);
            self.set_bool(OptionId::OutputHtml, false);
            self.set_bool(OptionId::UppercaseTags, false);
            self.set_bool(OptionId::UppercaseAttributes, false);
        } else if self.bool(OptionId::OutputHtml) {
            self.set_bool(OptionId::OutputXml, false);
        }
        if self.bool(OptionId::InputXml) {
            self.set_bool(OptionId::OutputXml, true);
        }
        if self.bool(OptionId::OutputXml) {
            let out = self.encoding(OptionId::OutputEncoding);
            if out != Encoding::Ascii && !out.is_unicode() {
                self.set_bool(OptionId::AddXmlDecl, true);
            }
        }
    }

    pub fn bool(&self, id: OptionId) -> bool {
        match self.get(id) {
            OptionValue::Bool(b) => *b,
            OptionValue::Integer(n) => *n != 0,
            OptionValue::String(s) => !s.is_empty(),
        }
    }

    pub fn int(&self, id: OptionId) -> u64 {
        match self.get(id) {
            OptionValue::Integer(n) => *n,
            OptionValue::Bool(b) => u64::from(*b),
            OptionValue::String(_) => 0,
        }
    }

    pub fn string(&self, id: OptionId) -> &str {
        match self.get(id) {
            OptionValue::String(s) => s,
            _ => "",
        }
    }

    pub fn auto_bool(&self, id: OptionId) -> AutoBool {
        match self.int(id) {
            0 => AutoBool::No,
            1 => AutoBool::Yes,
            _ => AutoBool::Auto,
        }
    }

    pub fn encoding(&self, id: OptionId) -> Encoding {
        Encoding::ALL
            .get(self.int(id) as usize)
            .copied()
            .unwrap_or(Encoding::Utf8)
    }

    pub fn newline(&self) -> Newline {
        match self.int(OptionId::Newline) {
            1 => Newline::CrLf,
            2 => Newline::Cr,
            _ => Newline::Lf,
        }
    }

    pub fn repeated_attributes(&self) -> RepeatedAttributes {
        if self.int(OptionId::RepeatedAttributes) == 0 {
            RepeatedAttributes::KeepFirst
        } else {
            RepeatedAttributes::KeepLast
        }
    }

    pub fn doctype(&self) -> DoctypeMode {
        let value = self.string(OptionId::Doctype);
        match value {
            "html5" => DoctypeMode::Html5,
            "omit" => DoctypeMode::Omit,
            "strict" => DoctypeMode::Strict,
            "transitional" => DoctypeMode::Transitional,
            "user" => DoctypeMode::User(None),
            quoted if quoted.starts_with('"') => {
                DoctypeMode::User(Some(quoted.trim_matches('"').to_string()))
            }
            _ => DoctypeMode::Auto,
        }
    }

    /// Wrap column; `None` when wrapping is off.
    pub fn wrap(&self) -> Option<usize> {
        match self.int(OptionId::Wrap) {
            WRAP_UNBOUNDED | 0 => None,
            n => Some(usize::try_from(n).unwrap_or(usize::MAX)),
        }
    }

    pub fn list(&self, id: OptionId) -> impl Iterator<Item = &str> + '_ {
        self.string(id)
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
    }

    pub fn xml_out(&self) -> bool {
        self.bool(OptionId::OutputXml)
    }

    pub fn xhtml_out(&self) -> bool {
        self.bool(OptionId::OutputXhtml)
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&display_value(self))
    }
}

fn display_value(value: &OptionValue) -> String {
    match value {
        OptionValue::Bool(b) => BOOL_PICKS[usize::from(*b)].to_string(),
        OptionValue::Integer(n) => n.to_string(),
        OptionValue::String(s) => s.clone(),
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    match text.to_ascii_lowercase().as_str() {
        "yes" | "true" | "1" | "y" | "t" => Some(true),
        "no" | "false" | "0" | "n" | "f" => Some(false),
        _ => None,
    }
}

fn pick_index(picks: &[&str], text: &str) -> Option<u64> {
    picks
        .iter()
        .position(|p| p.eq_ignore_ascii_case(text))
        .map(|i| i as u64)
}

fn encoding_index(encoding: Encoding) -> u64 {
    Encoding::ALL
        .iter()
        .position(|e| *e == encoding)
        .map_or(4, |i| i as u64)
}

fn parse_doctype(text: &str) -> Option<String> {
    let lower = text.to_ascii_lowercase();
    let keyword = match lower.as_str() {
        "loose" => "transitional",
        other => other,
    };
    if DOCTYPE_PICKS.contains(&keyword) {
        return Some(keyword.to_string());
    }
    let inner = text.strip_prefix('"')?.strip_suffix('"')?;
    if inner.is_empty() || inner.contains('"') {
        return None;
    }
    Some(format!("\"{inner}\""))
}

fn split_list(text: &str) -> Vec<String> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn merge_list(existing: &str, added: Vec<String>) -> String {
    let mut names: Vec<String> = split_list(existing);
    for name in added {
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names.join(", ")
}

fn is_valid_tag_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_ids_are_dense() {
        for (index, def) in OPTION_DEFS.iter().enumerate() {
            assert_eq!(def.id as usize, index + 1, "option {} out of place", def.name);
            assert_eq!(lookup_option(def.name), Some(def.id));
        }
        assert!(option_def(OptionId::Unknown).is_none());
    }

    #[test]
    fn serialized_values_parse_back_unchanged() {
        let mut options = Options::new();
        for def in OPTION_DEFS {
            let mut samples: Vec<String> = def.kind.picks().iter().map(|s| s.to_string()).collect();
            match def.kind {
                OptionType::Integer => samples.extend(["0", "1", "80"].map(String::from)),
                OptionType::String => samples.push("value".to_string()),
                OptionType::TagList => samples.push("foo, bar".to_string()),
                OptionType::MuteList => samples.push("missing-doctype".to_string()),
                OptionType::Doctype => {
                    samples.push("\"-//W3C//DTD HTML 4.01//EN\"".to_string())
                }
                _ => {}
            }
            for sample in samples {
                options
                    .parse(def.id, &sample)
                    .unwrap_or_else(|e| panic!("{}: {sample}: {e}", def.name));
                let before = options.get(def.id).clone();
                let text = options.serialize(def.id);
                options.parse(def.id, &text).unwrap();
                assert_eq!(options.get(def.id), &before, "option {} via {text:?}", def.name);
            }
        }
    }

    #[test]
    fn bad_values_keep_the_previous_setting() {
        let mut options = Options::new();
        options.parse(OptionId::IndentSpaces, "4").unwrap();
        let err = options.parse(OptionId::IndentSpaces, "four").unwrap_err();
        assert!(matches!(err, ConfigError::BadValue { .. }), "got {err:?}");
        assert_eq!(options.int(OptionId::IndentSpaces), 4);
        assert!(options.parse_named("no-such-option", "1").is_err());
    }

    #[test]
    fn bool_spellings() {
        let mut options = Options::new();
        for (text, expected) in [("Yes", true), ("f", false), ("1", true), ("NO", false), ("t", true)] {
            options.parse(OptionId::Clean, text).unwrap();
            assert_eq!(options.bool(OptionId::Clean), expected, "{text}");
        }
        options.parse(OptionId::Indent, "auto").unwrap();
        assert_eq!(options.auto_bool(OptionId::Indent), AutoBool::Auto);
        assert!(options.parse(OptionId::Clean, "auto").is_err());
    }

    #[test]
    fn zero_wrap_means_unbounded() {
        let mut options = Options::new();
        assert_eq!(options.wrap(), Some(68));
        options.parse(OptionId::Wrap, "0").unwrap();
        assert_eq!(options.wrap(), None);
        assert_eq!(options.serialize(OptionId::Wrap), "0");
        options.set_int(OptionId::Wrap, 0);
        options.adjust();
        assert_eq!(options.int(OptionId::Wrap), WRAP_UNBOUNDED);
    }

    #[test]
    fn adjust_applies_xml_rules_and_is_idempotent() {
        let mut options = Options::new();
        options.set_bool(OptionId::OutputXhtml, true);
        options.set_bool(OptionId::UppercaseTags, true);
        options.parse(OptionId::OutputEncoding, "latin1").unwrap();
        options.adjust();
        assert!(options.bool(OptionId::OutputXml));
        assert!(!options.bool(OptionId::UppercaseTags));
        assert!(options.bool(OptionId::AddXmlDecl));
        let once = options.clone();
        options.adjust();
        assert_eq!(once.values, options.values);
    }

    #[test]
    fn output_html_turns_xml_output_off() {
        let mut options = Options::new();
        options.set_bool(OptionId::OutputXml, true);
        options.set_bool(OptionId::OutputHtml, true);
        options.adjust();
        assert!(!options.xml_out());
        options.set_bool(OptionId::OutputXhtml, true);
        options.adjust();
        assert!(options.xml_out());
        assert!(!options.bool(OptionId::OutputHtml));
    }

    #[test]
    fn char_encoding_sets_both_directions() {
        let mut options = Options::new();
        options.parse(OptionId::CharEncoding, "latin1").unwrap();
        assert_eq!(options.encoding(OptionId::InputEncoding), Encoding::Latin1);
        assert_eq!(options.encoding(OptionId::OutputEncoding), Encoding::Latin1);
        options.parse(OptionId::OutputEncoding, "ascii").unwrap();
        assert_eq!(options.encoding(OptionId::InputEncoding), Encoding::Latin1);
    }

    #[test]
    fn snapshot_restore_and_reset() {
        let mut options = Options::new();
        options.set_bool(OptionId::Clean, true);
        options.snapshot();
        options.set_bool(OptionId::Bare, true);
        assert_eq!(options.changed_since_snapshot().collect::<Vec<_>>(), vec![OptionId::Bare]);
        options.restore_snapshot();
        assert!(!options.bool(OptionId::Bare));
        assert!(options.bool(OptionId::Clean));
        options.reset_to_default(OptionId::Clean);
        assert!(options.is_default(OptionId::Clean));
    }

    #[test]
    fn doctype_forms() {
        let mut options = Options::new();
        assert_eq!(options.doctype(), DoctypeMode::Auto);
        options.parse(OptionId::Doctype, "Loose").unwrap();
        assert_eq!(options.doctype(), DoctypeMode::Transitional);
        options
            .parse(OptionId::Doctype, "\"-//ACME//DTD HTML 3.2//EN\"")
            .unwrap();
        assert_eq!(
            options.doctype(),
            DoctypeMode::User(Some("-//ACME//DTD HTML 3.2//EN".to_string()))
        );
        assert!(options.parse(OptionId::Doctype, "bogus").is_err());
    }

    #[test]
    fn tag_lists_accumulate() {
        let mut options = Options::new();
        options.parse(OptionId::NewBlocklevelTags, "card, deck").unwrap();
        options.parse(OptionId::NewBlocklevelTags, "deck panel").unwrap();
        assert_eq!(options.string(OptionId::NewBlocklevelTags), "card, deck, panel");
        assert!(options.parse(OptionId::NewInlineTags, "9lives").is_err());
    }
}
