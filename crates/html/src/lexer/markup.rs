use super::{Lexer, Token};
use crate::dom::{Attribute, NodeKind, Quote};
use crate::report::{MessageCode, Report};
use memchr::{memchr, memmem};
use tools::text::starts_with_ignore_ascii_case;

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b':' | b'.')
}

fn find(haystack: &str, from: usize, needle: &str) -> Option<usize> {
    memmem::find(&haystack.as_bytes()[from..], needle.as_bytes()).map(|rel| from + rel)
}

impl<'a> Lexer<'a> {
    /// Lex the markup construct at the current position. `None` means the
    /// construct was discarded and lexing should continue.
    pub(super) fn markup(&mut self, report: &mut Report) -> Option<Token> {
        let input = self.input;
        let start = self.pos;
        let rest = &input[start..];
        let (line, column) = self.position(start);

        if rest.starts_with("<!--") {
            return Some(self.comment(start, line, column, report));
        }
        if starts_with_ignore_ascii_case(rest, "<!doctype") {
            let (text, _) = self.delimited(start + 9, ">", "<!DOCTYPE>", line, column, report);
            let text = tools::text::collapse_whitespace(text.trim());
            if !starts_with_ignore_ascii_case(&text, "html") {
                report.emit(MessageCode::MalformedDoctype, line, column, &[]);
            }
            return Some(self.token(NodeKind::DocType, text, line, column));
        }
        if rest.starts_with("<![CDATA[") {
            let (text, _) = self.delimited(start + 9, "]]>", "CDATA", line, column, report);
            return Some(self.token(NodeKind::CData, text.to_string(), line, column));
        }
        if rest.starts_with("<![") {
            let (text, _) = self.delimited(start + 3, "]>", "section", line, column, report);
            return Some(self.token(NodeKind::Section, text.to_string(), line, column));
        }
        if rest.starts_with("<!") {
            let (text, _) = self.delimited(start + 2, ">", "declaration", line, column, report);
            let shown = format!("<!{text}>");
            report.emit(MessageCode::DiscardingUnexpected, line, column, &[&shown]);
            return None;
        }
        if starts_with_ignore_ascii_case(rest, "<?xml")
            && rest.as_bytes().get(5).is_some_and(u8::is_ascii_whitespace)
        {
            let (text, _) = self.delimited(start + 5, "?>", "XML declaration", line, column, report);
            let text = text.trim().to_string();
            return Some(self.token(NodeKind::XmlDecl, text, line, column));
        }
        if starts_with_ignore_ascii_case(rest, "<?php") {
            let (text, _) = self.delimited(start + 5, "?>", "PHP", line, column, report);
            return Some(self.token(NodeKind::Php, text.to_string(), line, column));
        }
        if rest.starts_with("<?") {
            let terminator = if self.config.xml { "?>" } else { ">" };
            let (text, _) = self.delimited(
                start + 2,
                terminator,
                "processing instruction",
                line,
                column,
                report,
            );
            return Some(self.token(NodeKind::ProcInstr, text.to_string(), line, column));
        }
        if rest.starts_with("<%") {
            let (text, _) = self.delimited(start + 2, "%>", "ASP", line, column, report);
            return Some(self.token(NodeKind::Asp, text.to_string(), line, column));
        }
        if rest.starts_with("<#") {
            let (text, _) = self.delimited(start + 2, "#>", "JSTE", line, column, report);
            return Some(self.token(NodeKind::Jste, text.to_string(), line, column));
        }
        if rest.starts_with("</") {
            return Some(self.end_tag(start, line, column, report));
        }
        Some(self.start_tag(start, line, column, report))
    }

    fn token(&self, kind: NodeKind, text: String, line: u32, column: u32) -> Token {
        let mut token = Token::new(kind, line, column);
        token.text = text;
        token
    }

    /// Content from `from` up to `terminator`, consuming the terminator. At end
    /// of input the remainder is returned and the truncation reported.
    fn delimited(
        &mut self,
        from: usize,
        terminator: &str,
        what: &str,
        line: u32,
        column: u32,
        report: &mut Report,
    ) -> (&'a str, bool) {
        let input = self.input;
        let from = from.min(input.len());
        match find(input, from, terminator) {
            Some(end) => {
                self.pos = end + terminator.len();
                (&input[from..end], true)
            }
            None => {
                report.emit(MessageCode::UnexpectedEndOfFile, line, column, &[what]);
                self.pos = input.len();
                (&input[from..], false)
            }
        }
    }

    fn comment(&mut self, start: usize, line: u32, column: u32, report: &mut Report) -> Token {
        let fix = self.config.fix_bad_comments;
        let (inner, _) = self.delimited(start + 4, "-->", "comment", line, column, report);
        let mut text = inner.to_string();
        if text.contains("--") {
            report.emit(
                MessageCode::MalformedComment,
                line,
                column,
                &["adjacent hyphens within comment"],
            );
            if fix {
                text = text.replace("--", "==");
            }
        }
        self.token(NodeKind::Comment, text, line, column)
    }

    fn read_name(&mut self) -> String {
        let input = self.input;
        let bytes = input.as_bytes();
        let begin = self.pos;
        while self.pos < bytes.len() && is_name_byte(bytes[self.pos]) {
            self.pos += 1;
        }
        let name = &input[begin..self.pos];
        if self.config.xml {
            name.to_string()
        } else {
            name.to_ascii_lowercase()
        }
    }

    fn end_tag(&mut self, start: usize, line: u32, column: u32, report: &mut Report) -> Token {
        self.pos = start + 2;
        let mut token = Token::new(NodeKind::EndTag, line, column);
        token.name = self.read_name();
        let input = self.input;
        let bytes = input.as_bytes();
        let tail = &bytes[self.pos..];
        let gt = memchr(b'>', tail);
        let lt = memchr(b'<', tail);
        match (gt, lt) {
            (Some(g), Some(l)) if l < g => {
                report.emit(MessageCode::UnexpectedLtInTag, line, column, &[&token.name]);
                self.pos += l;
            }
            (Some(g), _) => self.pos += g + 1,
            (None, Some(l)) => {
                report.emit(MessageCode::UnexpectedLtInTag, line, column, &[&token.name]);
                self.pos += l;
            }
            (None, None) => {
                let what = format!("</{}>", token.name);
                report.emit(MessageCode::UnexpectedEndOfFile, line, column, &[&what]);
                self.pos = bytes.len();
            }
        }
        token
    }

    fn start_tag(&mut self, start: usize, line: u32, column: u32, report: &mut Report) -> Token {
        self.pos = start + 1;
        let mut token = Token::new(NodeKind::StartTag, line, column);
        token.name = self.read_name();
        let input = self.input;
        let bytes = input.as_bytes();
        let empty_element = !self.config.xml
            && crate::tags::lookup_tag(&token.name).is_some_and(|def| def.is_empty());
        loop {
            while self.pos < bytes.len() && bytes[self.pos].is_ascii_whitespace() {
                self.pos += 1;
            }
            let Some(&b) = bytes.get(self.pos) else {
                let what = format!("<{}>", token.name);
                report.emit(MessageCode::UnexpectedEndOfFile, line, column, &[&what]);
                break;
            };
            match b {
                b'>' => {
                    self.pos += 1;
                    break;
                }
                b'/' if bytes.get(self.pos + 1) == Some(&b'>') => {
                    self.pos += 2;
                    token.kind = NodeKind::StartEndTag;
                    break;
                }
                b'/' => self.pos += 1,
                b'<' => {
                    let rest = &input[self.pos..];
                    if rest.starts_with("<?") || rest.starts_with("<%") {
                        let attr = self.directive_attribute(report);
                        token.attributes.push(attr);
                    } else {
                        report.emit(MessageCode::UnexpectedLtInTag, line, column, &[&token.name]);
                        break;
                    }
                }
                b'"' | b'\'' => {
                    let (l, c) = self.position(self.pos);
                    report.emit(MessageCode::UnexpectedQuoteMark, l, c, &[&token.name]);
                    self.pos += 1;
                }
                _ => {
                    if let Some(attr) = self.attribute(&token.name, empty_element, report) {
                        token.attributes.push(attr);
                    }
                }
            }
        }
        token
    }

    fn directive_attribute(&mut self, report: &mut Report) -> Attribute {
        let input = self.input;
        let begin = self.pos;
        let (line, column) = self.position(begin);
        let terminator = if input[begin..].starts_with("<%") { "%>" } else { "?>" };
        let (_, _) = self.delimited(begin + 2, terminator, "directive", line, column, report);
        let mut attr = Attribute::new(&input[begin..self.pos], None);
        attr.attr = None;
        attr.quote = Quote::None;
        attr.from_directive = true;
        attr.line = line;
        attr.column = column;
        attr
    }

    fn attribute(&mut self, tag: &str, empty_element: bool, report: &mut Report) -> Option<Attribute> {
        let input = self.input;
        let bytes = input.as_bytes();
        let begin = self.pos;
        let (line, column) = self.position(begin);
        while self.pos < bytes.len() {
            let b = bytes[self.pos];
            if b.is_ascii_whitespace() || matches!(b, b'=' | b'>' | b'<' | b'"' | b'\'' | b'/') {
                break;
            }
            self.pos += 1;
        }
        if self.pos == begin {
            // Stray `=` or similar; skip it.
            self.pos += input[begin..].chars().next().map_or(1, char::len_utf8);
            return None;
        }
        let raw_name = &input[begin..self.pos];
        let name = if self.config.xml {
            raw_name.to_string()
        } else {
            raw_name.to_ascii_lowercase()
        };

        let mut look = self.pos;
        while look < bytes.len() && bytes[look].is_ascii_whitespace() {
            look += 1;
        }
        let mut quote = Quote::None;
        let value = if bytes.get(look) == Some(&b'=') {
            self.pos = look + 1;
            while self.pos < bytes.len() && bytes[self.pos].is_ascii_whitespace() {
                self.pos += 1;
            }
            let (raw, value_start) = match bytes.get(self.pos) {
                Some(&q @ (b'"' | b'\'')) => {
                    quote = if q == b'"' { Quote::Double } else { Quote::Single };
                    let value_start = self.pos + 1;
                    match memchr(q, &bytes[value_start..]) {
                        Some(rel) => {
                            self.pos = value_start + rel + 1;
                            (&input[value_start..value_start + rel], value_start)
                        }
                        None => {
                            report.emit(MessageCode::MissingQuoteMark, line, column, &[tag]);
                            let end = memchr(b'>', &bytes[value_start..])
                                .map_or(bytes.len(), |rel| value_start + rel);
                            self.pos = end;
                            (&input[value_start..end], value_start)
                        }
                    }
                }
                _ => {
                    let value_start = self.pos;
                    while self.pos < bytes.len() {
                        let b = bytes[self.pos];
                        if b.is_ascii_whitespace() || b == b'>' || b == b'<' {
                            break;
                        }
                        self.pos += 1;
                    }
                    let mut end = self.pos;
                    if end > value_start
                        && bytes[end - 1] == b'/'
                        && bytes.get(end) == Some(&b'>')
                        && (self.config.xml || empty_element)
                    {
                        end -= 1;
                        self.pos = end;
                    }
                    (&input[value_start..end], value_start)
                }
            };
            let decoded = self.decode(raw, value_start, report);
            Some(if self.config.literal_attributes {
                decoded
            } else {
                tools::text::collapse_whitespace(decoded.trim_matches(tools::text::is_html_space))
            })
        } else {
            None
        };

        let mut attr = Attribute::new(name, value);
        if self.config.xml && attr.name.contains(|c: char| c.is_ascii_uppercase()) {
            attr.attr = None;
        }
        attr.quote = quote;
        attr.line = line;
        attr.column = column;
        Some(attr)
    }
}
