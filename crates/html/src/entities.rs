//! Character references: the HTML 4 named entity set (plus `&apos;`) and
//! numeric references, decoded with diagnostics for every repair.

use memchr::memchr;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::OnceLock;

#[rustfmt::skip]
static ENTITIES: &[(&str, u32)] = &[
    ("quot", 34), ("amp", 38), ("apos", 39), ("lt", 60), ("gt", 62),
    ("nbsp", 160), ("iexcl", 161), ("cent", 162), ("pound", 163), ("curren", 164),
    ("yen", 165), ("brvbar", 166), ("sect", 167), ("uml", 168), ("copy", 169),
    ("ordf", 170), ("laquo", 171), ("not", 172), ("shy", 173), ("reg", 174),
    ("macr", 175), ("deg", 176), ("plusmn", 177), ("sup2", 178), ("sup3", 179),
    ("acute", 180), ("micro", 181), ("para", 182), ("middot", 183), ("cedil", 184),
    ("sup1", 185), ("ordm", 186), ("raquo", 187), ("frac14", 188), ("frac12", 189),
    ("frac34", 190), ("iquest", 191), ("Agrave", 192), ("Aacute", 193), ("Acirc", 194),
    ("Atilde", 195), ("Auml", 196), ("Aring", 197), ("AElig", 198), ("Ccedil", 199),
    ("Egrave", 200), ("Eacute", 201), ("Ecirc", 202), ("Euml", 203), ("Igrave", 204),
    ("Iacute", 205), ("Icirc", 206), ("Iuml", 207), ("ETH", 208), ("Ntilde", 209),
    ("Ograve", 210), ("Oacute", 211), ("Ocirc", 212), ("Otilde", 213), ("Ouml", 214),
    ("times", 215), ("Oslash", 216), ("Ugrave", 217), ("Uacute", 218), ("Ucirc", 219),
    ("Uuml", 220), ("Yacute", 221), ("THORN", 222), ("szlig", 223), ("agrave", 224),
    ("aacute", 225), ("acirc", 226), ("atilde", 227), ("auml", 228), ("aring", 229),
    ("aelig", 230), ("ccedil", 231), ("egrave", 232), ("eacute", 233), ("ecirc", 234),
    ("euml", 235), ("igrave", 236), ("iacute", 237), ("icirc", 238), ("iuml", 239),
    ("eth", 240), ("ntilde", 241), ("ograve", 242), ("oacute", 243), ("ocirc", 244),
    ("otilde", 245), ("ouml", 246), ("divide", 247), ("oslash", 248), ("ugrave", 249),
    ("uacute", 250), ("ucirc", 251), ("uuml", 252), ("yacute", 253), ("thorn", 254),
    ("yuml", 255),
    ("OElig", 338), ("oelig", 339), ("Scaron", 352), ("scaron", 353), ("Yuml", 376),
    ("fnof", 402), ("circ", 710), ("tilde", 732),
    ("Alpha", 913), ("Beta", 914), ("Gamma", 915), ("Delta", 916), ("Epsilon", 917),
    ("Zeta", 918), ("Eta", 919), ("Theta", 920), ("Iota", 921), ("Kappa", 922),
    ("Lambda", 923), ("Mu", 924), ("Nu", 925), ("Xi", 926), ("Omicron", 927),
    ("Pi", 928), ("Rho", 929), ("Sigma", 931), ("Tau", 932), ("Upsilon", 933),
    ("Phi", 934), ("Chi", 935), ("Psi", 936), ("Omega", 937),
    ("alpha", 945), ("beta", 946), ("gamma", 947), ("delta", 948), ("epsilon", 949),
    ("zeta", 950), ("eta", 951), ("theta", 952), ("iota", 953), ("kappa", 954),
    ("lambda", 955), ("mu", 956), ("nu", 957), ("xi", 958), ("omicron", 959),
    ("pi", 960), ("rho", 961), ("sigmaf", 962), ("sigma", 963), ("tau", 964),
    ("upsilon", 965), ("phi", 966), ("chi", 967), ("psi", 968), ("omega", 969),
    ("thetasym", 977), ("upsih", 978), ("piv", 982),
    ("ensp", 8194), ("emsp", 8195), ("thinsp", 8201), ("zwnj", 8204), ("zwj", 8205),
    ("lrm", 8206), ("rlm", 8207), ("ndash", 8211), ("mdash", 8212), ("lsquo", 8216),
    ("rsquo", 8217), ("sbquo", 8218), ("ldquo", 8220), ("rdquo", 8221), ("bdquo", 8222),
    ("dagger", 8224), ("Dagger", 8225), ("bull", 8226), ("hellip", 8230), ("permil", 8240),
    ("prime", 8242), ("Prime", 8243), ("lsaquo", 8249), ("rsaquo", 8250), ("oline", 8254),
    ("frasl", 8260), ("euro", 8364), ("image", 8465), ("weierp", 8472), ("real", 8476),
    ("trade", 8482), ("alefsym", 8501),
    ("larr", 8592), ("uarr", 8593), ("rarr", 8594), ("darr", 8595), ("harr", 8596),
    ("crarr", 8629), ("lArr", 8656), ("uArr", 8657), ("rArr", 8658), ("dArr", 8659),
    ("hArr", 8660),
    ("forall", 8704), ("part", 8706), ("exist", 8707), ("empty", 8709), ("nabla", 8711),
    ("isin", 8712), ("notin", 8713), ("ni", 8715), ("prod", 8719), ("sum", 8721),
    ("minus", 8722), ("lowast", 8727), ("radic", 8730), ("prop", 8733), ("infin", 8734),
    ("ang", 8736), ("and", 8743), ("or", 8744), ("cap", 8745), ("cup", 8746),
    ("int", 8747), ("there4", 8756), ("sim", 8764), ("cong", 8773), ("asymp", 8776),
    ("ne", 8800), ("equiv", 8801), ("le", 8804), ("ge", 8805), ("sub", 8834),
    ("sup", 8835), ("nsub", 8836), ("sube", 8838), ("supe", 8839), ("oplus", 8853),
    ("otimes", 8855), ("perp", 8869), ("sdot", 8901), ("lceil", 8968), ("rceil", 8969),
    ("lfloor", 8970), ("rfloor", 8971), ("lang", 9001), ("rang", 9002), ("loz", 9674),
    ("spades", 9824), ("clubs", 9827), ("hearts", 9829), ("diams", 9830),
];

fn by_name() -> &'static HashMap<&'static str, char> {
    static MAP: OnceLock<HashMap<&'static str, char>> = OnceLock::new();
    MAP.get_or_init(|| {
        ENTITIES
            .iter()
            .filter_map(|&(name, code)| char::from_u32(code).map(|ch| (name, ch)))
            .collect()
    })
}

fn by_char() -> &'static HashMap<char, &'static str> {
    static MAP: OnceLock<HashMap<char, &'static str>> = OnceLock::new();
    MAP.get_or_init(|| {
        ENTITIES
            .iter()
            .filter(|&&(name, _)| name != "apos")
            .filter_map(|&(name, code)| char::from_u32(code).map(|ch| (ch, name)))
            .collect()
    })
}

pub fn lookup_entity(name: &str) -> Option<char> {
    by_name().get(name).copied()
}

/// HTML 4 entity name for `ch`, if it has one.
pub fn entity_name(ch: char) -> Option<&'static str> {
    by_char().get(&ch).copied()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntityIssue {
    UnescapedAmpersand,
    UnknownEntity(String),
    MissingSemicolon(String),
    MissingSemicolonNcr(String),
    InvalidNcr(String),
    AposUndefined,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct EntityOptions {
    /// Report `&apos;` (only defined in XML-family output).
    pub warn_apos: bool,
    /// Leave well-formed references undecoded.
    pub preserve: bool,
}

const MAX_NCR_DIGITS: usize = 8;

/// Decode character references in `text`. `on_issue` receives the byte offset
/// of the offending `&` within `text`.
pub fn decode_entities<'a>(
    text: &'a str,
    options: EntityOptions,
    on_issue: &mut dyn FnMut(usize, EntityIssue),
) -> Cow<'a, str> {
    let bytes = text.as_bytes();
    let Some(first) = memchr(b'&', bytes) else {
        return Cow::Borrowed(text);
    };
    let mut out = String::with_capacity(text.len());
    out.push_str(&text[..first]);
    let mut i = first;
    while i < bytes.len() {
        if bytes[i] != b'&' {
            let next = memchr(b'&', &bytes[i..]).map_or(bytes.len(), |rel| i + rel);
            out.push_str(&text[i..next]);
            i = next;
            continue;
        }
        i = decode_one(text, i, options, &mut out, on_issue);
    }
    Cow::Owned(out)
}

/// Decode the reference starting at `start` (an `&`); returns the index after it.
fn decode_one(
    text: &str,
    start: usize,
    options: EntityOptions,
    out: &mut String,
    on_issue: &mut dyn FnMut(usize, EntityIssue),
) -> usize {
    let bytes = text.as_bytes();
    let mut j = start + 1;
    if bytes.get(j) == Some(&b'#') {
        j += 1;
        let hex = matches!(bytes.get(j), Some(b'x' | b'X'));
        if hex {
            j += 1;
        }
        let digits_start = j;
        while j < bytes.len()
            && (if hex {
                bytes[j].is_ascii_hexdigit()
            } else {
                bytes[j].is_ascii_digit()
            })
        {
            j += 1;
        }
        if j == digits_start {
            on_issue(start, EntityIssue::UnescapedAmpersand);
            out.push('&');
            return start + 1;
        }
        let digits = &text[digits_start..j];
        let has_semicolon = bytes.get(j) == Some(&b';');
        let raw_end = if has_semicolon { j + 1 } else { j };
        let raw = &text[start..raw_end];
        if !has_semicolon {
            on_issue(start, EntityIssue::MissingSemicolonNcr(raw.to_string()));
        }
        let value = if digits.len() > MAX_NCR_DIGITS {
            None
        } else {
            u32::from_str_radix(digits, if hex { 16 } else { 10 }).ok()
        };
        let decoded = match value {
            Some(code @ 0x80..=0x9F) => {
                on_issue(start, EntityIssue::InvalidNcr(raw.to_string()));
                tools::encoding::win1252_high(code as u8).unwrap_or('\u{FFFD}')
            }
            Some(code) if code != 0 => match char::from_u32(code) {
                Some(ch) => {
                    if options.preserve && has_semicolon {
                        out.push_str(raw);
                        return raw_end;
                    }
                    ch
                }
                None => {
                    on_issue(start, EntityIssue::InvalidNcr(raw.to_string()));
                    '\u{FFFD}'
                }
            },
            _ => {
                on_issue(start, EntityIssue::InvalidNcr(raw.to_string()));
                '\u{FFFD}'
            }
        };
        out.push(decoded);
        return raw_end;
    }

    while j < bytes.len() && bytes[j].is_ascii_alphanumeric() {
        j += 1;
    }
    if j == start + 1 || !bytes[start + 1].is_ascii_alphabetic() {
        on_issue(start, EntityIssue::UnescapedAmpersand);
        out.push('&');
        return start + 1;
    }
    let name = &text[start + 1..j];
    let has_semicolon = bytes.get(j) == Some(&b';');
    match lookup_entity(name) {
        Some(ch) => {
            if name == "apos" && options.warn_apos {
                on_issue(start, EntityIssue::AposUndefined);
            }
            if has_semicolon {
                if options.preserve {
                    out.push_str(&text[start..=j]);
                } else {
                    out.push(ch);
                }
                j + 1
            } else {
                on_issue(start, EntityIssue::MissingSemicolon(name.to_string()));
                out.push(ch);
                j
            }
        }
        None => {
            on_issue(start, EntityIssue::UnknownEntity(format!("&{name}")));
            out.push('&');
            out.push_str(name);
            j
        }
    }
}

/// Whether `text` begins with a complete, known character reference.
pub fn starts_with_reference(text: &str) -> bool {
    let mut issues = 0usize;
    let mut sink = String::new();
    if !text.starts_with('&') {
        return false;
    }
    let end = decode_one(
        text,
        0,
        EntityOptions {
            warn_apos: false,
            preserve: true,
        },
        &mut sink,
        &mut |_, _| issues += 1,
    );
    issues == 0 && end > 1 && text.as_bytes()[end - 1] == b';'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(text: &str) -> (String, Vec<EntityIssue>) {
        let mut issues = Vec::new();
        let out = decode_entities(text, EntityOptions::default(), &mut |_, issue| {
            issues.push(issue)
        });
        (out.into_owned(), issues)
    }

    #[test]
    fn named_and_numeric_references_decode() {
        let (out, issues) = decode("a&amp;b &eacute; &#65;&#x42; &hellip;");
        assert_eq!(out, "a&b \u{e9} AB \u{2026}");
        assert!(issues.is_empty(), "unexpected issues: {issues:?}");
    }

    #[test]
    fn bare_ampersand_is_reported_and_kept() {
        let (out, issues) = decode("fish & chips");
        assert_eq!(out, "fish & chips");
        assert_eq!(issues, vec![EntityIssue::UnescapedAmpersand]);
    }

    #[test]
    fn unknown_entities_stay_literal() {
        let (out, issues) = decode("x&bogus;y");
        assert_eq!(out, "x&bogus;y");
        assert_eq!(issues, vec![EntityIssue::UnknownEntity("&bogus".to_string())]);
    }

    #[test]
    fn missing_semicolons_are_repaired() {
        let (out, issues) = decode("&copy 2024 &#169 ");
        assert_eq!(out, "\u{a9} 2024 \u{a9} ");
        assert_eq!(
            issues,
            vec![
                EntityIssue::MissingSemicolon("copy".to_string()),
                EntityIssue::MissingSemicolonNcr("&#169".to_string()),
            ]
        );
    }

    #[test]
    fn invalid_numeric_references_are_replaced() {
        let (out, issues) = decode("&#0;&#xD800;&#150;");
        assert_eq!(out, "\u{FFFD}\u{FFFD}\u{2013}");
        assert_eq!(issues.len(), 3);
        assert!(issues.iter().all(|i| matches!(i, EntityIssue::InvalidNcr(_))));
    }

    #[test]
    fn apos_is_flagged_for_html_output() {
        let mut issues = Vec::new();
        let out = decode_entities(
            "it&apos;s",
            EntityOptions {
                warn_apos: true,
                preserve: false,
            },
            &mut |_, issue| issues.push(issue),
        );
        assert_eq!(out, "it's");
        assert_eq!(issues, vec![EntityIssue::AposUndefined]);
    }

    #[test]
    fn preserve_keeps_well_formed_references() {
        let mut issues = Vec::new();
        let out = decode_entities(
            "&eacute;&#233;&amp",
            EntityOptions {
                warn_apos: false,
                preserve: true,
            },
            &mut |_, issue| issues.push(issue),
        );
        assert_eq!(out, "&eacute;&#233;&");
        assert_eq!(issues.len(), 1);
        assert!(starts_with_reference("&eacute; more"));
        assert!(!starts_with_reference("&bogus;"));
        assert!(!starts_with_reference("& x"));
    }

    #[test]
    fn reverse_lookup_skips_apos() {
        assert_eq!(entity_name('\u{a0}'), Some("nbsp"));
        assert_eq!(entity_name('\''), None);
        assert_eq!(ENTITIES.len(), 253);
    }
}
