//! Deprecated and presentational markup, plus the checks that look at the
//! page as a whole.

use super::structure::heading_level;
use super::{ASCII_ART_RUN, AccessRule, Checker, LANGUAGE_MIN_WORDS};
use crate::attrs::{color_rgb, is_lang};
use crate::dom::{NodeId, NodeKind};
use crate::tags::TagId;
use tools::text::{is_blank, word_count};

const PRESENTATION_ATTRIBUTES: &[&str] = &["bgcolor", "background", "text", "link", "vlink", "alink", "color", "face"];

/// Mouse handlers and the keyboard handler that must accompany each.
const MOUSE_HANDLERS: &[(&str, &str)] = &[
    ("onmousedown", "onkeydown"),
    ("onmouseup", "onkeyup"),
    ("onclick", "onkeypress"),
    ("onmouseover", "onfocus"),
    ("onmouseout", "onblur"),
];

const METADATA_NAMES: &[&str] = &["description", "keywords", "author"];

fn deprecated_rule(tag: TagId) -> Option<AccessRule> {
    Some(match tag {
        TagId::APPLET => AccessRule::ReplaceDeprecatedApplet,
        TagId::BASEFONT => AccessRule::ReplaceDeprecatedBasefont,
        TagId::CENTER => AccessRule::ReplaceDeprecatedCenter,
        TagId::DIR => AccessRule::ReplaceDeprecatedDir,
        TagId::FONT => AccessRule::ReplaceDeprecatedFont,
        TagId::ISINDEX => AccessRule::ReplaceDeprecatedIsindex,
        TagId::MENU => AccessRule::ReplaceDeprecatedMenu,
        TagId::S => AccessRule::ReplaceDeprecatedS,
        TagId::STRIKE => AccessRule::ReplaceDeprecatedStrike,
        TagId::U => AccessRule::ReplaceDeprecatedU,
        _ => return None,
    })
}

/// A run of one repeated punctuation character, the usual mark of
/// ASCII art.
fn has_ascii_art(text: &str) -> bool {
    let mut run = 0;
    let mut last = None;
    for ch in text.chars() {
        if ch.is_ascii_punctuation() && Some(ch) == last {
            run += 1;
        } else {
            run = usize::from(ch.is_ascii_punctuation());
        }
        if run >= ASCII_ART_RUN {
            return true;
        }
        last = Some(ch);
    }
    false
}

/// Foreground and background differ enough in brightness and in color.
fn readable(fg: (u8, u8, u8), bg: (u8, u8, u8)) -> bool {
    let brightness = |(r, g, b): (u8, u8, u8)| (u32::from(r) * 299 + u32::from(g) * 587 + u32::from(b) * 114) / 1000;
    let brightness_diff = brightness(fg).abs_diff(brightness(bg));
    let color_diff =
        u32::from(fg.0.abs_diff(bg.0)) + u32::from(fg.1.abs_diff(bg.1)) + u32::from(fg.2.abs_diff(bg.2));
    brightness_diff >= 125 && color_diff >= 500
}

impl Checker<'_> {
    pub(super) fn markup(&mut self, node: NodeId) {
        let Some(tag) = self.dom.tag(node) else {
            return;
        };
        if let Some(rule) = deprecated_rule(tag) {
            self.flag(rule, node);
        }
        if matches!(tag, TagId::BLINK | TagId::MARQUEE) {
            self.flag(AccessRule::RemoveBlinkMarquee, node);
        }
        let n = self.dom.node(node);
        if PRESENTATION_ATTRIBUTES.iter().any(|a| n.has_attr(a)) {
            self.flag(AccessRule::StyleSheetControlPresentation, node);
        }
        let mouse_only = MOUSE_HANDLERS
            .iter()
            .any(|(mouse, key)| n.has_attr(mouse) && !n.has_attr(key));
        if mouse_only {
            self.flag(AccessRule::ScriptNotKeyboardAccessible, node);
        }
        if tag == TagId::PRE && has_ascii_art(&self.dom.text_content(node)) && !self.skip_link_before(node) {
            self.flag(AccessRule::SkipOverAsciiArt, node);
        }
    }

    /// An in-page link right before `node`, directly or as the last element
    /// of the preceding block.
    fn skip_link_before(&self, node: NodeId) -> bool {
        let mut prev = self.dom.prev_sibling(node);
        while let Some(p) = prev {
            let n = self.dom.node(p);
            if n.is_element() {
                let link = self
                    .dom
                    .descendants(p)
                    .filter(|&d| self.dom.is(d, TagId::A))
                    .last();
                return link.is_some_and(|a| {
                    self.dom
                        .node(a)
                        .attr_value("href")
                        .is_some_and(|href| href.starts_with('#'))
                });
            }
            if !(n.is_text() && is_blank(self.dom.text(p))) {
                return false;
            }
            prev = self.dom.prev_sibling(p);
        }
        false
    }

    pub(super) fn page(&mut self) {
        let root = self.dom.root();
        let doctype = self
            .dom
            .children(root)
            .any(|c| self.dom.node(c).kind == NodeKind::DocType);
        let html = self.dom.find_tag(root, TagId::HTML).unwrap_or(root);
        if !doctype {
            self.flag(AccessRule::DoctypeMissing, html);
        }
        self.metadata(html);
        self.language(html);
        self.colors();
        self.headings();
        self.scripts();
    }

    fn metadata(&mut self, html: NodeId) {
        let head = self.dom.find_tag(html, TagId::HEAD).unwrap_or(html);
        let titled = self
            .dom
            .find_tag(head, TagId::TITLE)
            .is_some_and(|t| !is_blank(&self.dom.text_content(t)));
        if !titled {
            self.flag(AccessRule::MetadataMissingTitle, head);
        }
        let mut described = false;
        for node in self.dom.descendants(head) {
            let n = self.dom.node(node);
            match n.tag {
                Some(TagId::META) => {
                    let name = n.attr_value("name").unwrap_or("");
                    if METADATA_NAMES.iter().any(|m| name.eq_ignore_ascii_case(m)) {
                        described = true;
                    }
                    let refresh = n
                        .attr_value("http-equiv")
                        .is_some_and(|v| v.eq_ignore_ascii_case("refresh"));
                    if refresh {
                        let content = n.attr_value("content").unwrap_or("");
                        let rule = if tools::text::contains_ignore_ascii_case(content, b"url=") {
                            AccessRule::RemoveAutoRedirect
                        } else {
                            AccessRule::RemoveAutoRefresh
                        };
                        self.flag(rule, node);
                    }
                }
                Some(TagId::LINK) => described |= n.has_attr("rel"),
                _ => {}
            }
        }
        if !described {
            self.flag(AccessRule::MetadataMissing, head);
        }
    }

    fn language(&mut self, html: NodeId) {
        let n = self.dom.node(html);
        match n.attr_value("lang").or_else(|| n.attr_value("xml:lang")) {
            Some(lang) => {
                if !is_lang(lang.trim()) {
                    self.flag(AccessRule::LanguageInvalid, html);
                }
            }
            None => {
                let body = self.dom.find_tag(html, TagId::BODY).unwrap_or(html);
                if word_count(&self.body_text(body)) >= LANGUAGE_MIN_WORDS {
                    self.flag(AccessRule::LanguageNotIdentified, html);
                }
            }
        }
    }

    /// Text a reader sees, without script or style content.
    fn body_text(&self, body: NodeId) -> String {
        let mut text = String::new();
        for node in self.dom.descendants(body) {
            let hidden = self
                .dom
                .ancestors(node)
                .any(|a| matches!(self.dom.tag(a), Some(TagId::SCRIPT | TagId::STYLE)));
            if self.dom.node(node).is_text() && !hidden {
                text.push(' ');
                text.push_str(self.dom.text(node));
            }
        }
        text
    }

    fn colors(&mut self) {
        let Some(body) = self.dom.find_tag(self.dom.root(), TagId::BODY) else {
            return;
        };
        let n = self.dom.node(body);
        let background = n
            .attr_value("bgcolor")
            .and_then(color_rgb)
            .unwrap_or((0xff, 0xff, 0xff));
        let pairs = [
            ("text", AccessRule::ColorContrastText),
            ("link", AccessRule::ColorContrastLink),
            ("alink", AccessRule::ColorContrastActiveLink),
            ("vlink", AccessRule::ColorContrastVisitedLink),
        ];
        for (attr, rule) in pairs {
            if let Some(fg) = n.attr_value(attr).and_then(color_rgb) {
                if !readable(fg, background) {
                    self.flag(rule, body);
                }
            }
        }
    }

    /// The first heading is an `<h1>`; each later one goes at most one
    /// level deeper than the one before.
    fn headings(&mut self) {
        let mut previous: Option<u8> = None;
        for node in self.dom.descendants(self.dom.root()) {
            let Some(level) = self.dom.tag(node).and_then(heading_level) else {
                continue;
            };
            if previous.map_or(level != 1, |p| level > p + 1) {
                self.flag(AccessRule::HeadersImproperlyNested, node);
            }
            previous = Some(level);
        }
    }

    /// Every script needs a `<noscript>` somewhere after it.
    fn scripts(&mut self) {
        let mut pending = Vec::new();
        for node in self.dom.descendants(self.dom.root()) {
            match self.dom.tag(node) {
                Some(TagId::SCRIPT) => pending.push(node),
                Some(TagId::NOSCRIPT) => pending.clear(),
                _ => {}
            }
        }
        for script in pending {
            self.flag(AccessRule::NoscriptMissing, script);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_art_runs() {
        assert!(has_ascii_art("+-----+"));
        assert!(has_ascii_art("|  |\n=====\n"));
        assert!(!has_ascii_art("a -- b -- c"));
        assert!(!has_ascii_art("aaaaaaa"));
    }

    #[test]
    fn contrast() {
        assert!(readable((0, 0, 0), (0xff, 0xff, 0xff)));
        assert!(!readable((0xee, 0xee, 0xee), (0xff, 0xff, 0xff)));
        assert!(!readable((0x80, 0x80, 0x80), (0xff, 0xff, 0xff)));
    }
}
