//! Images, embedded media, links and form controls.

use super::{ALT_TEXT_MAX, AccessRule, Checker, LINK_TEXT_MAX};
use crate::dom::NodeId;
use crate::tags::TagId;
use tools::text::{char_len, collapse_whitespace, is_blank};

const IMAGE_EXTENSIONS: &[&str] = &[".gif", ".jpg", ".jpeg", ".png", ".bmp", ".svg", ".webp", ".tif", ".tiff"];
const AUDIO_EXTENSIONS: &[&str] = &[".wav", ".mp3", ".aif", ".aiff", ".au", ".snd", ".ogg", ".ra"];
const VIDEO_EXTENSIONS: &[&str] = &[".avi", ".mpg", ".mpeg", ".mov", ".mp4", ".webm", ".rm", ".wmv"];
const PLACEHOLDER_ALT: &[&str] = &[
    "image", "picture", "photo", "graphic", "img", "spacer", "alt", "nbsp", "placeholder", "blank",
];
const MEANINGLESS_LINK_TEXT: &[&str] = &[
    "click here", "click", "here", "more", "read more", "link", "this", "this link", "go", "more info",
];

/// Whether the path part of `value` ends with one of `extensions`.
pub(super) fn has_extension(value: &str, extensions: &[&str]) -> bool {
    let path = value.split(['?', '#']).next().unwrap_or("");
    extensions
        .iter()
        .any(|ext| tools::text::ends_with_ignore_ascii_case(path, ext))
}

fn looks_like_file_size(text: &str) -> bool {
    let lower = text.to_ascii_lowercase();
    let number = ["bytes", "kb", "mb", "k"]
        .iter()
        .find_map(|unit| lower.strip_suffix(unit))
        .map(str::trim);
    number.is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit() || b == b'.'))
}

impl Checker<'_> {
    pub(super) fn content(&mut self, node: NodeId) {
        match self.dom.tag(node) {
            Some(TagId::IMG) => self.image(node),
            Some(TagId::INPUT) => self.input(node),
            Some(TagId::AREA) => {
                if !self.dom.node(node).has_attr("alt") {
                    self.flag(AccessRule::AreaMissingAlt, node);
                }
            }
            Some(TagId::MAP) => self.image_map(node),
            Some(TagId::APPLET) => {
                if !self.dom.node(node).has_attr("alt") && self.has_no_content(node) {
                    self.flag(AccessRule::AppletMissingAlt, node);
                }
            }
            Some(TagId::OBJECT) => {
                if self.has_no_content(node) {
                    self.flag(AccessRule::ObjectMissingAlt, node);
                }
            }
            Some(TagId::EMBED) => {
                let next = self.next_element(node);
                if !next.is_some_and(|n| self.dom.is(n, TagId::NOEMBED)) {
                    self.flag(AccessRule::EmbedMissingNoembed, node);
                }
            }
            Some(TagId::A) => self.link(node),
            Some(TagId::LABEL) => {
                let target = self.dom.node(node).attr_value("for");
                if target.is_some_and(|t| !self.control_ids.contains(t)) {
                    self.flag(AccessRule::LabelForInvalid, node);
                }
            }
            Some(TagId::SELECT) => self.control_label(node),
            Some(TagId::TEXTAREA) => {
                self.control_label(node);
                if is_blank(&self.dom.text_content(node)) {
                    self.flag(AccessRule::ControlRequiresDefaultText, node);
                }
            }
            _ => {}
        }
    }

    /// No text and no child elements other than `param`.
    fn has_no_content(&self, node: NodeId) -> bool {
        is_blank(&self.dom.text_content(node))
            && self
                .dom
                .descendants(node)
                .skip(1)
                .all(|n| !self.dom.node(n).is_element() || self.dom.is(n, TagId::PARAM))
    }

    /// Next sibling element, skipping whitespace text.
    pub(super) fn next_element(&self, node: NodeId) -> Option<NodeId> {
        let mut next = self.dom.next_sibling(node);
        while let Some(n) = next {
            let sibling = self.dom.node(n);
            if sibling.is_element() {
                return Some(n);
            }
            if !(sibling.is_text() && is_blank(self.dom.text(n))) {
                return None;
            }
            next = self.dom.next_sibling(n);
        }
        None
    }

    fn image(&mut self, node: NodeId) {
        let n = self.dom.node(node);
        let src = n.attr_value("src").unwrap_or("");
        match n.attr_value("alt") {
            None => self.flag(AccessRule::ImgMissingAlt, node),
            Some(alt) => {
                let alt = alt.trim();
                let lower = alt.to_ascii_lowercase();
                let file_name = src.rsplit('/').next().unwrap_or(src);
                if has_extension(alt, IMAGE_EXTENSIONS) || (!file_name.is_empty() && alt == file_name) {
                    self.flag(AccessRule::ImgAltSuspiciousFilename, node);
                } else if looks_like_file_size(alt) {
                    self.flag(AccessRule::ImgAltSuspiciousFileSize, node);
                } else if PLACEHOLDER_ALT.contains(&lower.as_str()) {
                    self.flag(AccessRule::ImgAltSuspiciousPlaceholder, node);
                }
                if char_len(alt) > ALT_TEXT_MAX {
                    self.flag(AccessRule::ImgAltSuspiciousTooLong, node);
                    if !n.has_attr("longdesc") {
                        self.flag(AccessRule::ImgMissingLongdesc, node);
                    }
                }
            }
        }
        if n.has_attr("ismap") {
            self.flag(AccessRule::ImgMapServerRequiresTextLinks, node);
        }
        if has_extension(src, &[".gif"]) {
            self.flag(AccessRule::ImgMayCauseFlicker, node);
        }
    }

    fn input(&mut self, node: NodeId) {
        let n = self.dom.node(node);
        let kind = n.attr_value("type").unwrap_or("text").to_ascii_lowercase();
        match kind.as_str() {
            "image" => {
                if !n.has_attr("alt") {
                    self.flag(AccessRule::ImageButtonMissingAlt, node);
                }
            }
            "text" | "password" | "checkbox" | "radio" | "file" | "email" | "search" | "tel" | "url" | "number" => {
                self.control_label(node);
                if kind == "text" && n.attr_value("value").is_none_or(is_blank) {
                    self.flag(AccessRule::ControlRequiresDefaultText, node);
                }
            }
            _ => {}
        }
    }

    /// A control is labelled when it sits inside a `<label>` or a label
    /// names its id.
    fn control_label(&mut self, node: NodeId) {
        let inside_label = self.dom.ancestors(node).any(|a| self.dom.is(a, TagId::LABEL));
        let named = self
            .dom
            .node(node)
            .attr_value("id")
            .is_some_and(|id| self.label_targets.contains(id));
        if !inside_label && !named {
            self.flag(AccessRule::ControlMissingLabel, node);
        }
    }

    fn image_map(&mut self, node: NodeId) {
        let unlinked = self.dom.descendants(node).any(|n| {
            self.dom.is(n, TagId::AREA)
                && self
                    .dom
                    .node(n)
                    .attr_value("href")
                    .is_some_and(|href| !self.link_targets.contains(href))
        });
        if unlinked {
            self.flag(AccessRule::MapMissingTextLinks, node);
        }
    }

    /// Text a link presents: its text plus the `alt` of images inside it.
    fn link_text(&self, node: NodeId) -> String {
        let mut text = String::new();
        for n in self.dom.descendants(node) {
            let child = self.dom.node(n);
            if child.is_text() {
                text.push_str(self.dom.text(n));
            } else if self.dom.is(n, TagId::IMG) {
                text.push(' ');
                text.push_str(child.attr_value("alt").unwrap_or(""));
            }
        }
        collapse_whitespace(&text).trim().to_string()
    }

    fn link(&mut self, node: NodeId) {
        let n = self.dom.node(node);
        let Some(href) = n.attr_value("href") else {
            return;
        };
        let text = self.link_text(node);
        if text.is_empty() {
            self.flag(AccessRule::LinkTextMissing, node);
        } else if MEANINGLESS_LINK_TEXT.contains(&text.to_ascii_lowercase().as_str()) {
            self.flag(AccessRule::LinkTextNotMeaningful, node);
        }
        if char_len(&text) > LINK_TEXT_MAX {
            self.flag(AccessRule::LinkTextTooLong, node);
        }
        if has_extension(href, AUDIO_EXTENSIONS) {
            self.flag(AccessRule::AudioMissingTranscript, node);
        }
        if has_extension(href, VIDEO_EXTENSIONS) {
            self.flag(AccessRule::VideoMissingCaptions, node);
        }
        let target = n.attr_value("target").unwrap_or("");
        if target.eq_ignore_ascii_case("_blank") || target.eq_ignore_ascii_case("_new") {
            self.flag(AccessRule::NewWindowsRequireWarning, node);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions_ignore_queries_and_case() {
        assert!(has_extension("clip.MP3?x=1", AUDIO_EXTENSIONS));
        assert!(!has_extension("page.html#a.gif", IMAGE_EXTENSIONS));
    }

    #[test]
    fn file_size_alt_text() {
        assert!(looks_like_file_size("12 KB"));
        assert!(looks_like_file_size("3000bytes"));
        assert!(!looks_like_file_size("kb"));
        assert!(!looks_like_file_size("a bank"));
    }
}
