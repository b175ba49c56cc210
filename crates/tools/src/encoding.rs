//! Character encodings understood by the engine and the legacy 8-bit code page
//! tables used to convert them to and from Unicode.

use crate::utf8::decode_utf8;

/// Supported input/output character encodings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// Bytes pass through unchanged (bytes above 127 map to U+0080..U+00FF).
    Raw,
    Ascii,
    /// ISO-8859-15.
    Latin0,
    /// ISO-8859-1.
    Latin1,
    Utf8,
    /// Mac OS Roman.
    Mac,
    Win1252,
    /// IBM code page 858 (code page 850 with the euro sign).
    Ibm858,
    Utf16Le,
    Utf16Be,
    /// UTF-16 with byte order mark; big endian when none is present.
    Utf16,
}

impl Encoding {
    pub const ALL: [Encoding; 11] = [
        Encoding::Raw,
        Encoding::Ascii,
        Encoding::Latin0,
        Encoding::Latin1,
        Encoding::Utf8,
        Encoding::Mac,
        Encoding::Win1252,
        Encoding::Ibm858,
        Encoding::Utf16Le,
        Encoding::Utf16Be,
        Encoding::Utf16,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Encoding::Raw => "raw",
            Encoding::Ascii => "ascii",
            Encoding::Latin0 => "latin0",
            Encoding::Latin1 => "latin1",
            Encoding::Utf8 => "utf8",
            Encoding::Mac => "mac",
            Encoding::Win1252 => "win1252",
            Encoding::Ibm858 => "ibm858",
            Encoding::Utf16Le => "utf16le",
            Encoding::Utf16Be => "utf16be",
            Encoding::Utf16 => "utf16",
        }
    }

    /// IANA charset name used in `<meta charset>` and XML declarations.
    pub fn mime_name(self) -> &'static str {
        match self {
            Encoding::Raw | Encoding::Ascii => "us-ascii",
            Encoding::Latin0 => "iso-8859-15",
            Encoding::Latin1 => "iso-8859-1",
            Encoding::Utf8 => "utf-8",
            Encoding::Mac => "macintosh",
            Encoding::Win1252 => "windows-1252",
            Encoding::Ibm858 => "ibm00858",
            Encoding::Utf16Le => "utf-16le",
            Encoding::Utf16Be => "utf-16be",
            Encoding::Utf16 => "utf-16",
        }
    }

    /// Parse either the short option name or a common charset alias.
    pub fn from_name(name: &str) -> Option<Encoding> {
        let lower = name.trim().to_ascii_lowercase();
        let found = match lower.as_str() {
            "raw" => Encoding::Raw,
            "ascii" | "us-ascii" => Encoding::Ascii,
            "latin0" | "iso-8859-15" | "iso8859-15" => Encoding::Latin0,
            "latin1" | "iso-8859-1" | "iso8859-1" => Encoding::Latin1,
            "utf8" | "utf-8" => Encoding::Utf8,
            "mac" | "macintosh" | "macroman" => Encoding::Mac,
            "win1252" | "windows-1252" | "cp1252" => Encoding::Win1252,
            "ibm858" | "ibm00858" | "cp858" => Encoding::Ibm858,
            "utf16le" | "utf-16le" => Encoding::Utf16Le,
            "utf16be" | "utf-16be" => Encoding::Utf16Be,
            "utf16" | "utf-16" => Encoding::Utf16,
            _ => return None,
        };
        Some(found)
    }

    pub fn is_utf16(self) -> bool {
        matches!(self, Encoding::Utf16 | Encoding::Utf16Le | Encoding::Utf16Be)
    }

    /// Encodings that can represent every Unicode scalar value.
    pub fn is_unicode(self) -> bool {
        self == Encoding::Utf8 || self.is_utf16()
    }
}

/// Problems found while decoding. Offsets are byte offsets into the decoded text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodeIssue {
    /// Malformed UTF-8 replaced with U+FFFD.
    InvalidUtf8 { offset: usize },
    /// Unpaired surrogate or odd trailing byte replaced with U+FFFD.
    InvalidUtf16 { offset: usize },
    /// A C1 control (0x80..=0x9F) reinterpreted through the Windows-1252 table.
    VendorSpecific { offset: usize, code: u32 },
    /// Byte outside the repertoire of the declared encoding (replaced with U+FFFD).
    Unmappable { offset: usize, byte: u8 },
}

impl DecodeIssue {
    pub fn offset(self) -> usize {
        match self {
            DecodeIssue::InvalidUtf8 { offset }
            | DecodeIssue::InvalidUtf16 { offset }
            | DecodeIssue::VendorSpecific { offset, .. }
            | DecodeIssue::Unmappable { offset, .. } => offset,
        }
    }
}

/// Detect a byte order mark. Returns the encoding it implies and its length.
pub fn sniff_bom(bytes: &[u8]) -> Option<(Encoding, usize)> {
    match bytes {
        [0xEF, 0xBB, 0xBF, ..] => Some((Encoding::Utf8, 3)),
        [0xFF, 0xFE, ..] => Some((Encoding::Utf16Le, 2)),
        [0xFE, 0xFF, ..] => Some((Encoding::Utf16Be, 2)),
        _ => None,
    }
}

/// Decode `bytes` from `encoding` into a `String`, reporting every repaired
/// position through `on_issue`. A leading byte order mark is honoured and
/// stripped regardless of the requested encoding family.
pub fn decode(bytes: &[u8], encoding: Encoding, on_issue: &mut dyn FnMut(DecodeIssue)) -> String {
    let (encoding, body) = match sniff_bom(bytes) {
        Some((bom_enc, len)) if bom_enc == Encoding::Utf8 => {
            if encoding.is_utf16() {
                (encoding, bytes)
            } else {
                (Encoding::Utf8, &bytes[len..])
            }
        }
        Some((bom_enc, len)) if encoding.is_utf16() || encoding == Encoding::Utf8 => {
            (bom_enc, &bytes[len..])
        }
        _ => (encoding, bytes),
    };

    match encoding {
        Encoding::Utf8 => {
            let mut text = decode_utf8(body, &mut |offset| {
                on_issue(DecodeIssue::InvalidUtf8 { offset });
            });
            if text.chars().any(|ch| ('\u{80}'..='\u{9F}').contains(&ch)) {
                text = remap_c1_controls(&text, on_issue);
            }
            text
        }
        Encoding::Utf16 | Encoding::Utf16Be => decode_utf16(body, true, on_issue),
        Encoding::Utf16Le => decode_utf16(body, false, on_issue),
        _ => decode_single_byte(body, encoding, on_issue),
    }
}

fn remap_c1_controls(text: &str, on_issue: &mut dyn FnMut(DecodeIssue)) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if ('\u{80}'..='\u{9F}').contains(&ch) {
            let mapped = win1252_high(ch as u8).unwrap_or('\u{FFFD}');
            on_issue(DecodeIssue::VendorSpecific {
                offset: out.len(),
                code: ch as u32,
            });
            out.push(mapped);
        } else {
            out.push(ch);
        }
    }
    out
}

fn decode_single_byte(
    bytes: &[u8],
    encoding: Encoding,
    on_issue: &mut dyn FnMut(DecodeIssue),
) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &byte in bytes {
        if byte < 0x80 {
            out.push(byte as char);
            continue;
        }
        let offset = out.len();
        let ch = match encoding {
            Encoding::Raw => Some(byte as char),
            Encoding::Ascii => None,
            Encoding::Latin1 | Encoding::Latin0 if (0x80..=0x9F).contains(&byte) => {
                let mapped = win1252_high(byte);
                if mapped.is_some() {
                    on_issue(DecodeIssue::VendorSpecific {
                        offset,
                        code: u32::from(byte),
                    });
                }
                mapped
            }
            Encoding::Latin1 => Some(byte as char),
            Encoding::Latin0 => Some(latin0_high(byte)),
            Encoding::Win1252 => {
                if (0x80..=0x9F).contains(&byte) {
                    win1252_high(byte)
                } else {
                    Some(byte as char)
                }
            }
            Encoding::Mac => Some(MAC_ROMAN_HIGH[usize::from(byte - 0x80)]),
            Encoding::Ibm858 => Some(IBM858_HIGH[usize::from(byte - 0x80)]),
            Encoding::Utf8 | Encoding::Utf16 | Encoding::Utf16Le | Encoding::Utf16Be => None,
        };
        match ch {
            Some(ch) => out.push(ch),
            None => {
                on_issue(DecodeIssue::Unmappable { offset, byte });
                out.push('\u{FFFD}');
            }
        }
    }
    out
}

fn decode_utf16(bytes: &[u8], big_endian: bool, on_issue: &mut dyn FnMut(DecodeIssue)) -> String {
    let units = bytes.chunks(2).map(|pair| match pair {
        [a, b] if big_endian => Some(u16::from_be_bytes([*a, *b])),
        [a, b] => Some(u16::from_le_bytes([*a, *b])),
        _ => None,
    });
    let mut out = String::with_capacity(bytes.len() / 2);
    let mut odd_tail = false;
    let words: Vec<u16> = units
        .filter_map(|unit| {
            if unit.is_none() {
                odd_tail = true;
            }
            unit
        })
        .collect();
    for decoded in char::decode_utf16(words.iter().copied()) {
        match decoded {
            Ok(ch) => out.push(ch),
            Err(_) => {
                on_issue(DecodeIssue::InvalidUtf16 { offset: out.len() });
                out.push('\u{FFFD}');
            }
        }
    }
    if odd_tail {
        on_issue(DecodeIssue::InvalidUtf16 { offset: out.len() });
        out.push('\u{FFFD}');
    }
    out
}

/// Whether `ch` can be written literally in `encoding`.
pub fn can_encode(ch: char, encoding: Encoding) -> bool {
    if (ch as u32) < 0x80 {
        return true;
    }
    match encoding {
        Encoding::Utf8 | Encoding::Utf16 | Encoding::Utf16Le | Encoding::Utf16Be => true,
        Encoding::Ascii => false,
        Encoding::Raw | Encoding::Latin1 => (ch as u32) <= 0xFF,
        _ => encode_legacy(ch, encoding).is_some(),
    }
}

/// Append the encoded form of `text` to `out`. Characters the encoding cannot
/// represent are written as `?`; the printer escapes them beforehand.
pub fn encode(text: &str, encoding: Encoding, out: &mut Vec<u8>) {
    match encoding {
        Encoding::Utf8 => out.extend_from_slice(text.as_bytes()),
        Encoding::Utf16 | Encoding::Utf16Be => {
            if encoding == Encoding::Utf16 && out.is_empty() {
                out.extend_from_slice(&[0xFE, 0xFF]);
            }
            for unit in text.encode_utf16() {
                out.extend_from_slice(&unit.to_be_bytes());
            }
        }
        Encoding::Utf16Le => {
            for unit in text.encode_utf16() {
                out.extend_from_slice(&unit.to_le_bytes());
            }
        }
        _ => {
            for ch in text.chars() {
                let code = ch as u32;
                let byte = if code < 0x80 {
                    Some(code as u8)
                } else {
                    match encoding {
                        Encoding::Raw | Encoding::Latin1 if code <= 0xFF => Some(code as u8),
                        Encoding::Raw | Encoding::Latin1 | Encoding::Ascii => None,
                        _ => encode_legacy(ch, encoding),
                    }
                };
                out.push(byte.unwrap_or(b'?'));
            }
        }
    }
}

fn encode_legacy(ch: char, encoding: Encoding) -> Option<u8> {
    let position = |table: &[char; 128]| {
        table
            .iter()
            .position(|&candidate| candidate == ch)
            .map(|index| 0x80 + index as u8)
    };
    match encoding {
        Encoding::Mac => position(&MAC_ROMAN_HIGH),
        Encoding::Ibm858 => position(&IBM858_HIGH),
        Encoding::Win1252 => {
            if let Some(index) = WIN1252_C1.iter().position(|&c| c == Some(ch)) {
                return Some(0x80 + index as u8);
            }
            let code = ch as u32;
            (0xA0..=0xFF).contains(&code).then_some(code as u8)
        }
        Encoding::Latin0 => (0xA0u8..=0xFF).find(|&byte| latin0_high(byte) == ch),
        _ => None,
    }
}

/// Map a Windows-1252 byte in 0x80..=0x9F to Unicode.
pub fn win1252_high(byte: u8) -> Option<char> {
    if !(0x80..=0x9F).contains(&byte) {
        return None;
    }
    WIN1252_C1[usize::from(byte - 0x80)]
}

fn latin0_high(byte: u8) -> char {
    match byte {
        0xA4 => '\u{20AC}',
        0xA6 => '\u{0160}',
        0xA8 => '\u{0161}',
        0xB4 => '\u{017D}',
        0xB8 => '\u{017E}',
        0xBC => '\u{0152}',
        0xBD => '\u{0153}',
        0xBE => '\u{0178}',
        other => other as char,
    }
}

const WIN1252_C1: [Option<char>; 32] = [
    Some('\u{20AC}'),
    None,
    Some('\u{201A}'),
    Some('\u{0192}'),
    Some('\u{201E}'),
    Some('\u{2026}'),
    Some('\u{2020}'),
    Some('\u{2021}'),
    Some('\u{02C6}'),
    Some('\u{2030}'),
    Some('\u{0160}'),
    Some('\u{2039}'),
    Some('\u{0152}'),
    None,
    Some('\u{017D}'),
    None,
    None,
    Some('\u{2018}'),
    Some('\u{2019}'),
    Some('\u{201C}'),
    Some('\u{201D}'),
    Some('\u{2022}'),
    Some('\u{2013}'),
    Some('\u{2014}'),
    Some('\u{02DC}'),
    Some('\u{2122}'),
    Some('\u{0161}'),
    Some('\u{203A}'),
    Some('\u{0153}'),
    None,
    Some('\u{017E}'),
    Some('\u{0178}'),
];

#[rustfmt::skip]
const MAC_ROMAN_HIGH: [char; 128] = [
    // 0x80
    '\u{00C4}', '\u{00C5}', '\u{00C7}', '\u{00C9}', '\u{00D1}', '\u{00D6}', '\u{00DC}', '\u{00E1}',
    '\u{00E0}', '\u{00E2}', '\u{00E4}', '\u{00E3}', '\u{00E5}', '\u{00E7}', '\u{00E9}', '\u{00E8}',
    // 0x90
    '\u{00EA}', '\u{00EB}', '\u{00ED}', '\u{00EC}', '\u{00EE}', '\u{00EF}', '\u{00F1}', '\u{00F3}',
    '\u{00F2}', '\u{00F4}', '\u{00F6}', '\u{00F5}', '\u{00FA}', '\u{00F9}', '\u{00FB}', '\u{00FC}',
    // 0xA0
    '\u{2020}', '\u{00B0}', '\u{00A2}', '\u{00A3}', '\u{00A7}', '\u{2022}', '\u{00B6}', '\u{00DF}',
    '\u{00AE}', '\u{00A9}', '\u{2122}', '\u{00B4}', '\u{00A8}', '\u{2260}', '\u{00C6}', '\u{00D8}',
    // 0xB0
    '\u{221E}', '\u{00B1}', '\u{2264}', '\u{2265}', '\u{00A5}', '\u{00B5}', '\u{2202}', '\u{2211}',
    '\u{220F}', '\u{03C0}', '\u{222B}', '\u{00AA}', '\u{00BA}', '\u{2126}', '\u{00E6}', '\u{00F8}',
    // 0xC0
    '\u{00BF}', '\u{00A1}', '\u{00AC}', '\u{221A}', '\u{0192}', '\u{2248}', '\u{2206}', '\u{00AB}',
    '\u{00BB}', '\u{2026}', '\u{00A0}', '\u{00C0}', '\u{00C3}', '\u{00D5}', '\u{0152}', '\u{0153}',
    // 0xD0
    '\u{2013}', '\u{2014}', '\u{201C}', '\u{201D}', '\u{2018}', '\u{2019}', '\u{00F7}', '\u{25CA}',
    '\u{00FF}', '\u{0178}', '\u{2044}', '\u{20AC}', '\u{2039}', '\u{203A}', '\u{FB01}', '\u{FB02}',
    // 0xE0
    '\u{2021}', '\u{00B7}', '\u{201A}', '\u{201E}', '\u{2030}', '\u{00C2}', '\u{00CA}', '\u{00C1}',
    '\u{00CB}', '\u{00C8}', '\u{00CD}', '\u{00CE}', '\u{00CF}', '\u{00CC}', '\u{00D3}', '\u{00D4}',
    // 0xF0
    '\u{F8FF}', '\u{00D2}', '\u{00DA}', '\u{00DB}', '\u{00D9}', '\u{0131}', '\u{02C6}', '\u{02DC}',
    '\u{00AF}', '\u{02D8}', '\u{02D9}', '\u{02DA}', '\u{00B8}', '\u{02DD}', '\u{02DB}', '\u{02C7}',
];

#[rustfmt::skip]
const IBM858_HIGH: [char; 128] = [
    // 0x80
    '\u{00C7}', '\u{00FC}', '\u{00E9}', '\u{00E2}', '\u{00E4}', '\u{00E0}', '\u{00E5}', '\u{00E7}',
    '\u{00EA}', '\u{00EB}', '\u{00E8}', '\u{00EF}', '\u{00EE}', '\u{00EC}', '\u{00C4}', '\u{00C5}',
    // 0x90
    '\u{00C9}', '\u{00E6}', '\u{00C6}', '\u{00F4}', '\u{00F6}', '\u{00F2}', '\u{00FB}', '\u{00F9}',
    '\u{00FF}', '\u{00D6}', '\u{00DC}', '\u{00F8}', '\u{00A3}', '\u{00D8}', '\u{00D7}', '\u{0192}',
    // 0xA0
    '\u{00E1}', '\u{00ED}', '\u{00F3}', '\u{00FA}', '\u{00F1}', '\u{00D1}', '\u{00AA}', '\u{00BA}',
    '\u{00BF}', '\u{00AE}', '\u{00AC}', '\u{00BD}', '\u{00BC}', '\u{00A1}', '\u{00AB}', '\u{00BB}',
    // 0xB0
    '\u{2591}', '\u{2592}', '\u{2593}', '\u{2502}', '\u{2524}', '\u{00C1}', '\u{00C2}', '\u{00C0}',
    '\u{00A9}', '\u{2563}', '\u{2551}', '\u{2557}', '\u{255D}', '\u{00A2}', '\u{00A5}', '\u{2510}',
    // 0xC0
    '\u{2514}', '\u{2534}', '\u{252C}', '\u{251C}', '\u{2500}', '\u{253C}', '\u{00E3}', '\u{00C3}',
    '\u{255A}', '\u{2554}', '\u{2569}', '\u{2566}', '\u{2560}', '\u{2550}', '\u{256C}', '\u{00A4}',
    // 0xD0
    '\u{00F0}', '\u{00D0}', '\u{00CA}', '\u{00CB}', '\u{00C8}', '\u{20AC}', '\u{00CD}', '\u{00CE}',
    '\u{00CF}', '\u{2518}', '\u{250C}', '\u{2588}', '\u{2584}', '\u{00A6}', '\u{00CC}', '\u{2580}',
    // 0xE0
    '\u{00D3}', '\u{00DF}', '\u{00D4}', '\u{00D2}', '\u{00F5}', '\u{00D5}', '\u{00B5}', '\u{00FE}',
    '\u{00DE}', '\u{00DA}', '\u{00DB}', '\u{00D9}', '\u{00FD}', '\u{00DD}', '\u{00AF}', '\u{00B4}',
    // 0xF0
    '\u{00AD}', '\u{00B1}', '\u{2017}', '\u{00BE}', '\u{00B6}', '\u{00A7}', '\u{00F7}', '\u{00B8}',
    '\u{00B0}', '\u{00A8}', '\u{00B7}', '\u{00B9}', '\u{00B3}', '\u{00B2}', '\u{25A0}', '\u{00A0}',
];

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_quiet(bytes: &[u8], encoding: Encoding) -> (String, Vec<DecodeIssue>) {
        let mut issues = Vec::new();
        let text = decode(bytes, encoding, &mut |issue| issues.push(issue));
        (text, issues)
    }

    #[test]
    fn latin1_c1_bytes_are_mapped_through_windows_1252() {
        let (text, issues) = decode_quiet(b"a\x93b\x94", Encoding::Latin1);
        assert_eq!(text, "a\u{201C}b\u{201D}");
        assert_eq!(issues.len(), 2);
        assert!(matches!(issues[0], DecodeIssue::VendorSpecific { code: 0x93, .. }));
    }

    #[test]
    fn mac_roman_round_trips_through_the_table() {
        let (text, issues) = decode_quiet(&[0x8E, 0xA5, 0xDB], Encoding::Mac);
        assert_eq!(text, "\u{E9}\u{2022}\u{20AC}");
        assert!(issues.is_empty());
        let mut out = Vec::new();
        encode(&text, Encoding::Mac, &mut out);
        assert_eq!(out, vec![0x8E, 0xA5, 0xDB]);
    }

    #[test]
    fn ibm858_has_the_euro_sign() {
        let (text, _) = decode_quiet(&[0xD5], Encoding::Ibm858);
        assert_eq!(text, "\u{20AC}");
        assert!(can_encode('\u{20AC}', Encoding::Ibm858));
        assert!(!can_encode('\u{20AC}', Encoding::Latin1));
    }

    #[test]
    fn utf16_bom_selects_byte_order() {
        let (text, issues) = decode_quiet(&[0xFF, 0xFE, b'h', 0, b'i', 0], Encoding::Utf16);
        assert_eq!(text, "hi");
        assert!(issues.is_empty());
    }

    #[test]
    fn unpaired_surrogate_is_replaced() {
        let (text, issues) = decode_quiet(&[0xD8, 0x00, 0x00, b'x'], Encoding::Utf16Be);
        assert_eq!(text, "\u{FFFD}x");
        assert_eq!(issues, vec![DecodeIssue::InvalidUtf16 { offset: 0 }]);
    }

    #[test]
    fn utf8_bom_is_stripped() {
        let (text, _) = decode_quiet(b"\xEF\xBB\xBFok", Encoding::Latin1);
        assert_eq!(text, "ok");
    }

    #[test]
    fn ascii_rejects_high_bytes() {
        let (text, issues) = decode_quiet(b"\xE9", Encoding::Ascii);
        assert_eq!(text, "\u{FFFD}");
        assert_eq!(issues, vec![DecodeIssue::Unmappable { offset: 0, byte: 0xE9 }]);
    }

    #[test]
    fn encoding_names_parse_back() {
        for encoding in Encoding::ALL {
            assert_eq!(Encoding::from_name(encoding.name()), Some(encoding));
        }
    }
}
