//! Markup lexer.
//!
//! Turns decoded text into typed tokens with one token of pushback. The tree
//! builder picks the lexer mode per call, so whitespace handling and raw
//! content regions follow the element currently being parsed. Every repair the
//! lexer makes is reported; none of them stop lexing.

mod locate;
mod markup;

use crate::dom::{Attribute, NodeKind};
use crate::entities::{EntityIssue, EntityOptions, decode_entities};
use crate::report::{MessageCode, Report};
use crate::tags::TagId;
use locate::Locator;
use memchr::memchr;
use tools::text::is_html_space;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LexMode {
    /// Whitespace-only text is dropped.
    IgnoreWhitespace,
    /// Whitespace runs collapse to one space.
    MixedContent,
    /// Text is kept verbatim (tabs expanded).
    Preformatted,
    /// Everything up to the matching end tag is one text token.
    Raw(TagId),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: NodeKind,
    /// Element name (lower-cased outside XML mode); empty for character data.
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub text: String,
    pub line: u32,
    pub column: u32,
}

impl Token {
    fn new(kind: NodeKind, line: u32, column: u32) -> Self {
        Self {
            kind,
            name: String::new(),
            attributes: Vec::new(),
            text: String::new(),
            line,
            column,
        }
    }

    pub fn is_start(&self) -> bool {
        matches!(self.kind, NodeKind::StartTag | NodeKind::StartEndTag)
    }

    pub fn is_end(&self) -> bool {
        self.kind == NodeKind::EndTag
    }

    pub fn is_text(&self) -> bool {
        self.kind == NodeKind::Text
    }

    /// Display form used in diagnostics: `<name>`, `</name>` or `plain text`.
    pub fn describe(&self) -> String {
        match self.kind {
            NodeKind::StartTag | NodeKind::StartEndTag => format!("<{}>", self.name),
            NodeKind::EndTag => format!("</{}>", self.name),
            NodeKind::Text => "plain text".to_string(),
            NodeKind::Comment => "comment".to_string(),
            NodeKind::DocType => "<!DOCTYPE>".to_string(),
            _ => "markup".to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct LexerConfig {
    pub xml: bool,
    pub fix_bad_comments: bool,
    pub literal_attributes: bool,
    pub entities: EntityOptions,
    pub tab_size: usize,
}

impl Default for LexerConfig {
    fn default() -> Self {
        Self {
            xml: false,
            fix_bad_comments: true,
            literal_attributes: false,
            entities: EntityOptions::default(),
            tab_size: 8,
        }
    }
}

pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    config: LexerConfig,
    locator: Locator,
    pushed: Option<Token>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str, config: LexerConfig) -> Self {
        Self {
            input,
            pos: 0,
            config,
            locator: Locator::new(input),
            pushed: None,
        }
    }

    pub fn config(&self) -> &LexerConfig {
        &self.config
    }

    pub fn at_eof(&self) -> bool {
        self.pushed.is_none() && self.pos >= self.input.len()
    }

    /// Push a token back; the next call to [`Lexer::next_token`] returns it.
    pub fn unget(&mut self, token: Token) {
        debug_assert!(self.pushed.is_none(), "only one token of pushback");
        self.pushed = Some(token);
    }

    pub fn position(&mut self, offset: usize) -> (u32, u32) {
        self.locator.locate(self.input, offset)
    }

    pub fn next_token(&mut self, mode: LexMode, report: &mut Report) -> Option<Token> {
        if let Some(token) = self.pushed.take() {
            return Some(token);
        }
        if let LexMode::Raw(tag) = mode {
            if let Some(token) = self.raw_text(tag) {
                return Some(token);
            }
        }
        loop {
            if self.pos >= self.input.len() {
                return None;
            }
            let token = if self.starts_markup(self.pos) {
                self.markup(report)
            } else {
                self.text(mode, report)
            };
            if let Some(token) = token {
                log::trace!(target: "html.lexer", "{:?} {:?} at {}:{}", token.kind, token.name, token.line, token.column);
                return Some(token);
            }
        }
    }

    /// Whether `<` at `at` opens markup rather than being a literal character.
    fn starts_markup(&self, at: usize) -> bool {
        let bytes = self.input.as_bytes();
        if bytes[at] != b'<' {
            return false;
        }
        match bytes.get(at + 1) {
            Some(b) if b.is_ascii_alphabetic() => true,
            Some(b'/') => bytes.get(at + 2).is_some_and(u8::is_ascii_alphabetic),
            Some(b'!' | b'?' | b'%') => true,
            Some(b'#') => memchr(b'>', &bytes[at..]).is_some(),
            _ => false,
        }
    }

    fn text(&mut self, mode: LexMode, report: &mut Report) -> Option<Token> {
        let input = self.input;
        let start = self.pos;
        let bytes = input.as_bytes();
        let mut end = start;
        loop {
            match memchr(b'<', &bytes[end..]) {
                Some(rel) => {
                    let at = end + rel;
                    if at > start && self.starts_markup(at) {
                        end = at;
                        break;
                    }
                    end = at + 1;
                }
                None => {
                    end = bytes.len();
                    break;
                }
            }
        }
        self.pos = end;
        let raw = &input[start..end];
        if mode == LexMode::IgnoreWhitespace && raw.chars().all(is_html_space) {
            return None;
        }
        let (line, column) = self.position(start);
        let decoded = self.decode(raw, start, report);
        let text = match mode {
            LexMode::Preformatted => expand_tabs(&decoded, column as usize, self.config.tab_size),
            _ => tools::text::collapse_whitespace(&decoded),
        };
        let mut token = Token::new(NodeKind::Text, line, column);
        token.text = text;
        Some(token)
    }

    /// Text of a raw element up to (not including) its end tag.
    fn raw_text(&mut self, tag: TagId) -> Option<Token> {
        let start = self.pos;
        let bytes = self.input.as_bytes();
        let end = if tag == TagId::PLAINTEXT {
            bytes.len()
        } else {
            let name = crate::tags::builtin(tag).map_or("", |def| def.name.as_ref());
            find_end_tag(bytes, start, name.as_bytes()).unwrap_or(bytes.len())
        };
        if end == start {
            return None;
        }
        self.pos = end;
        let (line, column) = self.position(start);
        let raw = &self.input[start..end];
        let mut token = Token::new(NodeKind::Text, line, column);
        // Obsolete literal elements are printed as `pre`, which expands tabs.
        token.text = if matches!(tag, TagId::XMP | TagId::LISTING | TagId::PLAINTEXT) {
            expand_tabs(raw, column as usize, self.config.tab_size)
        } else {
            raw.to_string()
        };
        Some(token)
    }

    /// Decode character references, reporting each repair at its source position.
    fn decode(&mut self, raw: &str, base: usize, report: &mut Report) -> String {
        let mut issues = Vec::new();
        let decoded = decode_entities(raw, self.config.entities, &mut |offset, issue| {
            issues.push((offset, issue))
        })
        .into_owned();
        for (offset, issue) in issues {
            let (line, column) = self.position(base + offset);
            emit_entity_issue(report, line, column, &issue);
        }
        decoded
    }
}

fn emit_entity_issue(report: &mut Report, line: u32, column: u32, issue: &EntityIssue) {
    match issue {
        EntityIssue::UnescapedAmpersand => {
            report.emit(MessageCode::UnescapedAmpersand, line, column, &[])
        }
        EntityIssue::UnknownEntity(name) => {
            report.emit(MessageCode::UnknownEntity, line, column, &[name])
        }
        EntityIssue::MissingSemicolon(name) => {
            report.emit(MessageCode::MissingSemicolon, line, column, &[name])
        }
        EntityIssue::MissingSemicolonNcr(raw) => {
            report.emit(MessageCode::MissingSemicolonNcr, line, column, &[raw])
        }
        EntityIssue::InvalidNcr(raw) => report.emit(MessageCode::InvalidNcr, line, column, &[raw]),
        EntityIssue::AposUndefined => report.emit(MessageCode::AposUndefined, line, column, &[]),
    }
}

/// Offset of `</name` (case-insensitive, followed by space, `/` or `>`) at or after `from`.
fn find_end_tag(bytes: &[u8], from: usize, name: &[u8]) -> Option<usize> {
    let mut i = from;
    while let Some(rel) = memchr(b'<', &bytes[i..]) {
        let at = i + rel;
        let name_start = at + 2;
        let name_end = name_start + name.len();
        if bytes.get(at + 1) == Some(&b'/')
            && name_end <= bytes.len()
            && bytes[name_start..name_end].eq_ignore_ascii_case(name)
            && bytes
                .get(name_end)
                .is_none_or(|b| b.is_ascii_whitespace() || matches!(b, b'>' | b'/'))
        {
            return Some(at);
        }
        i = at + 1;
    }
    None
}

fn expand_tabs(text: &str, start_column: usize, tab_size: usize) -> String {
    if !text.contains('\t') || tab_size == 0 {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len() + 8);
    let mut column = start_column.saturating_sub(1);
    for ch in text.chars() {
        match ch {
            '\t' => {
                let pad = tab_size - column % tab_size;
                out.extend(std::iter::repeat_n(' ', pad));
                column += pad;
            }
            '\n' => {
                out.push('\n');
                column = 0;
            }
            _ => {
                out.push(ch);
                column += 1;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_all(input: &str, mode: LexMode) -> (Vec<Token>, Report) {
        let mut report = Report::new();
        let mut lexer = Lexer::new(input, LexerConfig::default());
        let mut tokens = Vec::new();
        while let Some(token) = lexer.next_token(mode, &mut report) {
            tokens.push(token);
        }
        (tokens, report)
    }

    fn kinds(tokens: &[Token]) -> Vec<NodeKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn tags_text_and_comments() {
        let (tokens, report) = lex_all("<P Class=x>Hi  there<!-- c --></p>", LexMode::MixedContent);
        assert_eq!(
            kinds(&tokens),
            vec![NodeKind::StartTag, NodeKind::Text, NodeKind::Comment, NodeKind::EndTag]
        );
        assert_eq!(tokens[0].name, "p");
        assert_eq!(tokens[0].attributes[0].name, "class");
        assert_eq!(tokens[0].attributes[0].value.as_deref(), Some("x"));
        assert_eq!(tokens[1].text, "Hi there");
        assert_eq!(tokens[2].text, " c ");
        assert!(report.is_empty(), "unexpected diagnostics: {:?}", report.as_slice());
    }

    #[test]
    fn literal_less_than_stays_text() {
        let (tokens, _) = lex_all("a < b <3", LexMode::MixedContent);
        assert_eq!(kinds(&tokens), vec![NodeKind::Text]);
        assert_eq!(tokens[0].text, "a < b <3");
    }

    #[test]
    fn whitespace_only_text_is_dropped_when_ignoring() {
        let (tokens, _) = lex_all("<ul>\n  <li>x</li>\n</ul>", LexMode::IgnoreWhitespace);
        assert!(tokens.iter().all(|t| !t.is_text() || t.text == "x"));
    }

    #[test]
    fn raw_mode_stops_at_matching_end_tag() {
        let mut report = Report::new();
        let mut lexer = Lexer::new("if (a < b) { x = '</p>'; }</SCRIPT>", LexerConfig::default());
        let body = lexer
            .next_token(LexMode::Raw(TagId::SCRIPT), &mut report)
            .unwrap();
        assert_eq!(body.text, "if (a < b) { x = '</p>'; }");
        let end = lexer
            .next_token(LexMode::Raw(TagId::SCRIPT), &mut report)
            .unwrap();
        assert!(end.is_end());
        assert_eq!(end.name, "script");
    }

    #[test]
    fn obsolete_literal_text_expands_tabs() {
        let mut report = Report::new();
        let mut lexer = Lexer::new("a\tb</xmp>", LexerConfig::default());
        let body = lexer.next_token(LexMode::Raw(TagId::XMP), &mut report).unwrap();
        assert_eq!(body.text, format!("a{}b", " ".repeat(7)));

        let mut lexer = Lexer::new("a\tb</script>", LexerConfig::default());
        let body = lexer.next_token(LexMode::Raw(TagId::SCRIPT), &mut report).unwrap();
        assert_eq!(body.text, "a\tb");
    }

    #[test]
    fn preformatted_text_keeps_spacing() {
        let (tokens, _) = lex_all("a\tb\n  c", LexMode::Preformatted);
        assert_eq!(tokens[0].text, format!("a{}b\n  c", " ".repeat(7)));
    }

    #[test]
    fn entity_diagnostics_carry_positions() {
        let (tokens, report) = lex_all("x\n a &bogus; &amp;", LexMode::MixedContent);
        assert_eq!(tokens[0].text, "x a &bogus; &");
        let d = &report.as_slice()[0];
        assert_eq!(d.code, MessageCode::UnknownEntity);
        assert_eq!((d.line, d.column), (2, 4));
    }

    #[test]
    fn pushback_returns_the_same_token() {
        let mut report = Report::new();
        let mut lexer = Lexer::new("<b>x", LexerConfig::default());
        let first = lexer.next_token(LexMode::MixedContent, &mut report).unwrap();
        lexer.unget(first.clone());
        assert_eq!(lexer.next_token(LexMode::MixedContent, &mut report), Some(first));
    }
}
