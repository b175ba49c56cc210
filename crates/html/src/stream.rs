//! Byte sources and sinks around the engine.
//!
//! Input is drained into a size-limited buffer and decoded to text, with
//! every repaired byte reported at its line and column. Output text is
//! encoded to the target encoding and handed to a sink.

use crate::error::FatalError;
use crate::report::{MessageCode, Report};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tools::buffer::Buffer;
use tools::encoding::{DecodeIssue, Encoding, decode, encode};

/// Where input bytes come from.
pub enum Source<'a> {
    Memory(&'a [u8]),
    File(PathBuf),
    Reader(Box<dyn Read + 'a>),
    /// Called until it returns `None`.
    Callback(Box<dyn FnMut() -> Option<u8> + 'a>),
}

impl<'a> Source<'a> {
    pub fn reader(reader: impl Read + 'a) -> Self {
        Source::Reader(Box::new(reader))
    }

    pub fn callback(next: impl FnMut() -> Option<u8> + 'a) -> Self {
        Source::Callback(Box::new(next))
    }

    /// Read everything, failing once more than `limit` bytes arrive.
    pub fn read_all(self, limit: usize) -> Result<Vec<u8>, FatalError> {
        let mut buffer = Buffer::with_limit(limit);
        match self {
            Source::Memory(bytes) => buffer.push(bytes)?,
            Source::File(path) => {
                let file = open(&path)?;
                buffer.read_from(file)?;
            }
            Source::Reader(reader) => {
                buffer.read_from(reader)?;
            }
            Source::Callback(mut next) => {
                let mut chunk = Vec::with_capacity(4096);
                while let Some(byte) = next() {
                    chunk.push(byte);
                    if chunk.len() == chunk.capacity() {
                        buffer.push(&chunk)?;
                        chunk.clear();
                    }
                }
                buffer.push(&chunk)?;
            }
        }
        log::debug!(target: "html.document", "read {} input bytes", buffer.len());
        Ok(buffer.into_inner())
    }
}

fn open(path: &Path) -> Result<File, FatalError> {
    File::open(path).map_err(|source| FatalError::Open {
        path: path.to_path_buf(),
        source,
    })
}

/// Where encoded output goes.
pub enum Sink<'a> {
    Memory(&'a mut Vec<u8>),
    Writer(Box<dyn Write + 'a>),
    Callback(Box<dyn FnMut(u8) + 'a>),
}

impl<'a> Sink<'a> {
    pub fn writer(writer: impl Write + 'a) -> Self {
        Sink::Writer(Box::new(writer))
    }

    pub fn callback(put: impl FnMut(u8) + 'a) -> Self {
        Sink::Callback(Box::new(put))
    }

    pub fn write(&mut self, bytes: &[u8]) -> Result<(), FatalError> {
        match self {
            Sink::Memory(out) => out.extend_from_slice(bytes),
            Sink::Writer(writer) => {
                writer.write_all(bytes).map_err(FatalError::Write)?;
                writer.flush().map_err(FatalError::Write)?;
            }
            Sink::Callback(put) => bytes.iter().for_each(|&b| put(b)),
        }
        Ok(())
    }
}

/// Decode `bytes`, reporting each repaired position.
pub fn decode_input(bytes: &[u8], encoding: Encoding, report: &mut Report) -> String {
    let mut issues = Vec::new();
    let text = decode(bytes, encoding, &mut |issue| issues.push(issue));
    if issues.is_empty() {
        return text;
    }
    log::debug!(target: "html.document", "{} decoding issues", issues.len());
    let mut lines = LineIndex::new(&text);
    for issue in issues {
        let (line, column) = lines.position(issue.offset());
        match issue {
            DecodeIssue::InvalidUtf8 { .. } => report.emit(MessageCode::InvalidUtf8, line, column, &[]),
            DecodeIssue::InvalidUtf16 { .. } => report.emit(MessageCode::InvalidUtf16, line, column, &[]),
            DecodeIssue::VendorSpecific { code, .. } => {
                report.emit(MessageCode::VendorSpecificChars, line, column, &[&format!("{code}")]);
            }
            DecodeIssue::Unmappable { byte, .. } => {
                report.emit(
                    MessageCode::InvalidChar,
                    line,
                    column,
                    &[&format!("{byte:#04x}"), encoding.name()],
                );
            }
        }
    }
    text
}

/// Encode output text, unless the encoding keeps bytes as they are.
pub fn encode_output(text: &str, encoding: Encoding) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    encode(text, encoding, &mut out);
    out
}

/// Turns byte offsets into 1-based line and column numbers. Offsets must be
/// queried in increasing order.
struct LineIndex<'a> {
    text: &'a str,
    offset: usize,
    line: u32,
    line_start: usize,
}

impl<'a> LineIndex<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            offset: 0,
            line: 1,
            line_start: 0,
        }
    }

    fn position(&mut self, offset: usize) -> (u32, u32) {
        let offset = offset.min(self.text.len());
        if offset < self.offset {
            *self = Self::new(self.text);
        }
        let bytes = &self.text.as_bytes()[self.offset..offset];
        for index in memchr::memchr_iter(b'\n', bytes) {
            self.line += 1;
            self.line_start = self.offset + index + 1;
        }
        self.offset = offset;
        let column = self
            .text
            .get(self.line_start..offset)
            .map_or(0, |s| s.chars().count());
        (self.line, u32::try_from(column + 1).unwrap_or(u32::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_and_callback_sources() {
        let bytes = Source::Memory(b"<p>x").read_all(16).unwrap();
        assert_eq!(bytes, b"<p>x");
        let mut data = b"abc".iter().copied();
        let bytes = Source::callback(move || data.next()).read_all(16).unwrap();
        assert_eq!(bytes, b"abc");
    }

    #[test]
    fn limit_is_fatal() {
        let err = Source::reader(&[0u8; 64][..]).read_all(10).unwrap_err();
        assert!(matches!(err, FatalError::InputTooLarge { limit: 10 }));
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = Source::File(PathBuf::from("/nonexistent/input.html"))
            .read_all(10)
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/input.html"));
    }

    #[test]
    fn decoding_issues_are_positioned() {
        let mut report = Report::new();
        let text = decode_input(b"ab\ncd\xffe", Encoding::Utf8, &mut report);
        assert_eq!(text, "ab\ncd\u{fffd}e");
        let issue = &report.as_slice()[0];
        assert_eq!((issue.code, issue.line, issue.column), (MessageCode::InvalidUtf8, 2, 3));
    }

    #[test]
    fn sinks_collect_bytes() {
        let mut out = Vec::new();
        Sink::Memory(&mut out).write(b"abc").unwrap();
        let mut seen = Vec::new();
        Sink::callback(|b| seen.push(b)).write(b"xy").unwrap();
        assert_eq!(out, b"abc");
        assert_eq!(seen, b"xy");
    }
}
