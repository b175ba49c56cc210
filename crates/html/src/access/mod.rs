//! Accessibility checks over the finished tree.
//!
//! Every rule has a stable kebab-case name, a WCAG checkpoint and a priority;
//! a rule fires only when its priority is within the configured level. The
//! checker only reads the tree.

mod content;
mod page;
mod structure;

use crate::dom::{Dom, NodeId};
use crate::report::Diagnostic;
use crate::tags::TagId;
use serde::Serialize;
use std::collections::HashSet;

macro_rules! access_rules {
    ($($variant:ident => $name:literal, $checkpoint:literal, $priority:literal, $text:literal;)*) => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
        pub enum AccessRule {
            $(
                #[serde(rename = $name)]
                $variant,
            )*
        }

        impl AccessRule {
            pub const ALL: &'static [AccessRule] = &[$(AccessRule::$variant,)*];

            pub fn name(self) -> &'static str {
                match self {
                    $(AccessRule::$variant => $name,)*
                }
            }

            pub fn checkpoint(self) -> &'static str {
                match self {
                    $(AccessRule::$variant => $checkpoint,)*
                }
            }

            pub fn priority(self) -> u8 {
                match self {
                    $(AccessRule::$variant => $priority,)*
                }
            }

            pub fn description(self) -> &'static str {
                match self {
                    $(AccessRule::$variant => $text,)*
                }
            }
        }
    };
}

access_rules! {
    // Images and image maps.
    ImgMissingAlt => "img-missing-alt", "1.1.1.1", 1, "<img> missing 'alt' text.";
    ImgAltSuspiciousFilename => "img-alt-suspicious-filename", "1.1.1.2", 1, "suspicious 'alt' text (filename).";
    ImgAltSuspiciousFileSize => "img-alt-suspicious-file-size", "1.1.1.3", 1, "suspicious 'alt' text (file size).";
    ImgAltSuspiciousPlaceholder => "img-alt-suspicious-placeholder", "1.1.1.4", 1, "suspicious 'alt' text (placeholder).";
    ImgAltSuspiciousTooLong => "img-alt-suspicious-too-long", "1.1.1.10", 1, "suspicious 'alt' text (too long).";
    ImgMissingLongdesc => "img-missing-longdesc", "1.1.2.1", 1, "<img> missing 'longdesc' for a long description.";
    ImgMapServerRequiresTextLinks => "img-map-server-requires-text-links", "1.2.1.1", 1, "server-side image map requires text links.";
    ImgMayCauseFlicker => "img-may-cause-flicker", "7.1.1.5", 1, "animated GIF may cause screen flicker.";
    ImageButtonMissingAlt => "image-button-missing-alt", "1.1.3.1", 1, "<input type=\"image\"> missing 'alt' text.";
    AreaMissingAlt => "area-missing-alt", "1.1.9.1", 1, "<area> missing 'alt' text.";
    MapMissingTextLinks => "map-missing-text-links", "1.5.1.1", 3, "client-side image map needs redundant text links.";
    AppletMissingAlt => "applet-missing-alt", "1.1.4.1", 1, "<applet> missing alternative content.";
    ObjectMissingAlt => "object-missing-alt", "1.1.5.1", 1, "<object> missing alternative content.";
    EmbedMissingNoembed => "embed-missing-noembed", "1.1.6.1", 1, "<embed> missing <noembed> alternative.";
    AudioMissingTranscript => "audio-missing-transcript", "1.1.6.2", 1, "link to audio requires a text transcript.";
    VideoMissingCaptions => "video-missing-captions", "1.4.1.1", 1, "link to multimedia requires captions.";

    // Frames.
    FrameMissingTitle => "frame-missing-title", "12.1.1.1", 1, "<frame> missing 'title'.";
    FrameTitleInvalid => "frame-title-invalid", "12.1.1.2", 1, "<frame> 'title' is empty or whitespace.";
    FrameMissingLongdesc => "frame-missing-longdesc", "12.2.1.1", 2, "<frame> may require 'longdesc'.";
    FrameSrcInvalid => "frame-src-invalid", "6.2.1.1", 1, "<frame> source is an image.";
    IframeMissingTitle => "iframe-missing-title", "12.1.1.3", 1, "<iframe> missing 'title'.";
    NoframesMissing => "noframes-missing", "6.5.1.1", 1, "<frameset> missing <noframes> section.";
    NoframesInvalidContent => "noframes-invalid-content", "6.5.1.2", 1, "<noframes> section has no content.";

    // Tables.
    TableMissingSummary => "table-missing-summary", "5.5.1.1", 3, "<table> missing 'summary'.";
    TableSummaryInvalid => "table-summary-invalid", "5.5.1.2", 3, "<table> 'summary' is empty or whitespace.";
    TableSummaryPlaceholder => "table-summary-placeholder", "5.5.1.3", 3, "<table> 'summary' is placeholder text.";
    TableMissingCaption => "table-missing-caption", "5.5.2.1", 3, "data <table> missing <caption>.";
    DataTableMissingHeaders => "data-table-missing-headers", "5.1.1.1", 1, "data <table> missing row or column headers.";
    LayoutTableInvalidMarkup => "layout-table-invalid-markup", "5.4.1.1", 2, "layout <table> should not use <th>.";
    TableMayRequireHeaderAbbr => "table-may-require-header-abbr", "5.6.1.1", 3, "<th> text is long and may require 'abbr'.";

    // Forms.
    LabelForInvalid => "label-for-invalid", "12.4.1.1", 2, "<label> 'for' does not match a control id.";
    ControlMissingLabel => "control-missing-label", "12.4.1.2", 2, "form control is not associated with a <label>.";
    ControlRequiresDefaultText => "control-requires-default-text", "10.4.1.1", 3, "form control needs default placeholder text.";

    // Links.
    LinkTextNotMeaningful => "link-text-not-meaningful", "13.1.1.1", 2, "link text is not meaningful.";
    LinkTextTooLong => "link-text-too-long", "13.1.1.2", 2, "link text is too long.";
    LinkTextMissing => "link-text-missing", "13.1.1.3", 2, "link text is missing.";
    NewWindowsRequireWarning => "new-windows-require-warning", "10.1.1.1", 2, "link opens a new window without warning.";

    // Deprecated markup.
    ReplaceDeprecatedApplet => "replace-deprecated-html-applet", "11.2.1.1", 2, "replace deprecated <applet> with <object>.";
    ReplaceDeprecatedBasefont => "replace-deprecated-html-basefont", "11.2.1.2", 2, "replace deprecated <basefont> with style sheets.";
    ReplaceDeprecatedCenter => "replace-deprecated-html-center", "11.2.1.3", 2, "replace deprecated <center> with style sheets.";
    ReplaceDeprecatedDir => "replace-deprecated-html-dir", "11.2.1.4", 2, "replace deprecated <dir> with <ul>.";
    ReplaceDeprecatedFont => "replace-deprecated-html-font", "11.2.1.5", 2, "replace deprecated <font> with style sheets.";
    ReplaceDeprecatedIsindex => "replace-deprecated-html-isindex", "11.2.1.6", 2, "replace deprecated <isindex> with a form.";
    ReplaceDeprecatedMenu => "replace-deprecated-html-menu", "11.2.1.7", 2, "replace deprecated <menu> with <ul>.";
    ReplaceDeprecatedS => "replace-deprecated-html-s", "11.2.1.8", 2, "replace deprecated <s> with <del> or style sheets.";
    ReplaceDeprecatedStrike => "replace-deprecated-html-strike", "11.2.1.9", 2, "replace deprecated <strike> with <del> or style sheets.";
    ReplaceDeprecatedU => "replace-deprecated-html-u", "11.2.1.10", 2, "replace deprecated <u> with style sheets.";

    // Color.
    ColorContrastText => "color-contrast-text", "2.2.1.1", 3, "poor color contrast between text and background.";
    ColorContrastLink => "color-contrast-link", "2.2.1.2", 3, "poor color contrast between links and background.";
    ColorContrastActiveLink => "color-contrast-active-link", "2.2.1.3", 3, "poor color contrast between active links and background.";
    ColorContrastVisitedLink => "color-contrast-visited-link", "2.2.1.4", 3, "poor color contrast between visited links and background.";

    // Document.
    DoctypeMissing => "doctype-missing", "3.2.1.1", 2, "<!DOCTYPE> is missing.";
    MetadataMissingTitle => "metadata-missing-title", "13.2.1.1", 2, "document <title> is missing or empty.";
    MetadataMissing => "metadata-missing", "13.2.1.2", 2, "metadata describing the document is missing.";
    RemoveAutoRefresh => "remove-auto-refresh", "7.4.1.1", 2, "remove automatic page refresh.";
    RemoveAutoRedirect => "remove-auto-redirect", "7.5.1.1", 2, "remove automatic redirect.";
    LanguageNotIdentified => "language-not-identified", "4.3.1.1", 3, "document language is not identified.";
    LanguageInvalid => "language-invalid", "4.3.1.2", 3, "document language is not a valid language code.";

    // Structure.
    HeadersImproperlyNested => "headers-improperly-nested", "3.5.1.1", 2, "headings are not properly nested.";
    PotentialHeaderBold => "potential-header-bold", "3.5.2.1", 2, "bold paragraph may be intended as a heading.";
    HeaderUsedFormatText => "header-used-format-text", "3.5.2.2", 2, "heading text is too long to be a heading.";
    ListUsageInvalidUl => "list-usage-invalid-ul", "3.6.1.1", 2, "<ul> used for formatting.";
    ListUsageInvalidOl => "list-usage-invalid-ol", "3.6.1.2", 2, "<ol> used for formatting.";
    ListUsageInvalidLi => "list-usage-invalid-li", "3.6.1.3", 2, "<li> used outside a list.";

    // Scripts and dynamic content.
    NoscriptMissing => "noscript-missing", "6.3.1.1", 1, "<script> missing <noscript> section.";
    ScriptNotKeyboardAccessible => "script-not-keyboard-accessible", "9.3.1.1", 2, "mouse event handler has no keyboard equivalent.";
    RemoveBlinkMarquee => "remove-blink-marquee", "7.2.1.1", 2, "remove <blink> and <marquee>.";
    StyleSheetControlPresentation => "style-sheet-control-presentation", "3.3.1.1", 2, "use style sheets to control presentation.";
    SkipOverAsciiArt => "skip-over-ascii-art", "13.10.1.1", 3, "ASCII art requires a link to skip over it.";
}

/// Heuristic limits.
pub(crate) const ALT_TEXT_MAX: usize = 150;
pub(crate) const LINK_TEXT_MAX: usize = 60;
pub(crate) const HEADER_ABBR_MIN: usize = 15;
pub(crate) const HEADING_MAX_WORDS: usize = 20;
pub(crate) const ASCII_ART_RUN: usize = 5;
pub(crate) const LANGUAGE_MIN_WORDS: usize = 20;

pub(crate) struct Checker<'a> {
    dom: &'a Dom,
    level: u8,
    found: Vec<Diagnostic>,
    /// Values of every `<label for>`.
    label_targets: HashSet<&'a str>,
    /// Ids of form controls.
    control_ids: HashSet<&'a str>,
    /// Every `<a href>` value.
    link_targets: HashSet<&'a str>,
}

impl<'a> Checker<'a> {
    fn new(dom: &'a Dom, level: u8) -> Self {
        let mut checker = Self {
            dom,
            level,
            found: Vec::new(),
            label_targets: HashSet::new(),
            control_ids: HashSet::new(),
            link_targets: HashSet::new(),
        };
        for node in dom.descendants(dom.root()) {
            let n = dom.node(node);
            match n.tag {
                Some(TagId::LABEL) => checker.label_targets.extend(n.attr_value("for")),
                Some(TagId::A) => checker.link_targets.extend(n.attr_value("href")),
                Some(TagId::INPUT | TagId::SELECT | TagId::TEXTAREA | TagId::BUTTON) => {
                    checker.control_ids.extend(n.attr_value("id"))
                }
                _ => {}
            }
        }
        checker
    }

    pub(crate) fn wants(&self, rule: AccessRule) -> bool {
        rule.priority() <= self.level
    }

    pub(crate) fn flag(&mut self, rule: AccessRule, node: NodeId) {
        if !self.wants(rule) {
            return;
        }
        let (line, column) = self.dom.position(node);
        log::trace!(target: "html.access", "{} at {line}:{column}", rule.name());
        self.found.push(Diagnostic::access(rule, line, column));
    }
}

/// Run every rule within `level` (0 disables the checker).
pub fn run(dom: &Dom, level: u8) -> Vec<Diagnostic> {
    if level == 0 {
        return Vec::new();
    }
    let mut checker = Checker::new(dom, level);
    let root = dom.root();
    for node in dom.descendants(root) {
        if dom.node(node).is_element() {
            checker.element(node);
        }
    }
    checker.page();
    log::debug!(target: "html.access", "level {level}: {} findings", checker.found.len());
    checker.found.sort_by_key(|d| (d.line, d.column));
    checker.found
}

impl Checker<'_> {
    fn element(&mut self, node: NodeId) {
        self.content(node);
        self.structure(node);
        self.markup(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Report;
    use crate::tags::TagTable;
    use crate::tree_builder::{BuildOptions, build_tree, fix_structure};
    use std::collections::HashSet;

    fn check(input: &str, level: u8) -> Vec<&'static str> {
        let tags = TagTable::new();
        let mut report = Report::new();
        let mut dom = build_tree(input, BuildOptions::default(), &tags, &mut report);
        fix_structure(&mut dom, &tags, &mut report);
        run(&dom, level).iter().map(|d| d.code_name()).collect()
    }

    #[test]
    fn rule_names_are_unique_and_leveled() {
        let mut seen = HashSet::new();
        for rule in AccessRule::ALL {
            assert!(seen.insert(rule.name()), "duplicate rule {}", rule.name());
            assert!((1..=3).contains(&rule.priority()));
        }
    }

    #[test]
    fn level_zero_reports_nothing() {
        assert!(check("<img src=a.png>", 0).is_empty());
    }

    #[test]
    fn image_without_alt_at_level_one() {
        assert_eq!(check("<img src=a.png>", 1), vec!["img-missing-alt"]);
    }

    #[test]
    fn suspicious_alt_text() {
        let found = check(r#"<img src="a.png" alt="a.png"><img src="b.png" alt="12 KB"><img src="c.png" alt="image">"#, 1);
        assert_eq!(
            found,
            vec![
                "img-alt-suspicious-filename",
                "img-alt-suspicious-file-size",
                "img-alt-suspicious-placeholder"
            ]
        );
        let long = "word ".repeat(40);
        let found = check(&format!(r#"<img src="a.png" alt="{long}">"#), 1);
        assert!(found.contains(&"img-alt-suspicious-too-long"));
        assert!(found.contains(&"img-missing-longdesc"));
    }

    #[test]
    fn frames_and_noframes() {
        let found = check(r#"<frameset><frame src="a.html"><frame src="b.gif" title=" "></frameset>"#, 1);
        assert_eq!(found, vec!["noframes-missing", "frame-missing-title", "frame-title-invalid", "frame-src-invalid"]);
    }

    #[test]
    fn data_tables_need_headers() {
        let found = check("<table><tr><td>a<td>b<tr><td>c<td>d</table>", 1);
        assert_eq!(found, vec!["data-table-missing-headers"]);
        let found = check("<table><tr><th>a<th>b<tr><td>c<td>d</table>", 1);
        assert!(found.is_empty(), "{found:?}");
        let found = check(r#"<table summary="t"><caption>c</caption><tr><th>a<th>b<tr><td>c<td>d</table>"#, 3);
        assert!(!found.iter().any(|f| f.starts_with("table-")), "{found:?}");
    }

    #[test]
    fn link_text_rules() {
        let found = check(r#"<p><a href="x.html">click here</a> <a href="y.html" target="_blank">Documentation</a></p>"#, 2);
        assert!(found.contains(&"link-text-not-meaningful"));
        assert!(found.contains(&"new-windows-require-warning"));
        assert!(check(r#"<a href="song.mp3">song</a>"#, 1).contains(&"audio-missing-transcript"));
    }

    #[test]
    fn form_labels() {
        let found = check(r#"<form><label for="n">Name</label><input id="n" value="x"><input id="m" value="y"></form>"#, 2);
        assert_eq!(found.iter().filter(|f| **f == "control-missing-label").count(), 1);
        let found = check(r#"<form><label for="zz">Name</label><label>Mail <input value="a"></label></form>"#, 2);
        assert_eq!(found.iter().filter(|f| **f == "label-for-invalid").count(), 1);
        assert!(!found.contains(&"control-missing-label"));
    }

    #[test]
    fn deprecated_markup_and_headings() {
        let found = check("<h2>a</h2><h4>b</h4><center><font>x</font></center>", 2);
        assert!(found.contains(&"headers-improperly-nested"));
        assert!(found.contains(&"replace-deprecated-html-center"));
        assert!(found.contains(&"replace-deprecated-html-font"));
    }

    #[test]
    fn poor_contrast_is_reported() {
        let found = check(r##"<body bgcolor="#FFFFFF" text="#EEEEEE" link="#000000">x</body>"##, 3);
        assert!(found.contains(&"color-contrast-text"));
        assert!(!found.contains(&"color-contrast-link"));
    }

    #[test]
    fn ascii_art_needs_a_skip_link() {
        assert!(check("<pre>=====\n|  |</pre>", 3).contains(&"skip-over-ascii-art"));
        assert!(!check("<a href=\"#after\">skip</a><pre>=====</pre>", 3).contains(&"skip-over-ascii-art"));
    }

    #[test]
    fn scripts_need_noscript() {
        let found = check("<script>x()</script><p onmousedown=\"f()\">y</p>", 2);
        assert!(found.contains(&"noscript-missing"));
        assert!(found.contains(&"script-not-keyboard-accessible"));
        assert!(!check("<script>x()</script><noscript>y</noscript>", 1).contains(&"noscript-missing"));
    }
}
