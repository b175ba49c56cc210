//! Frames, tables, headings and lists.

use super::content::has_extension;
use super::{AccessRule, Checker, HEADER_ABBR_MIN, HEADING_MAX_WORDS};
use crate::dom::NodeId;
use crate::tags::TagId;
use tools::text::{char_len, is_blank, word_count};

const FRAME_IMAGE_EXTENSIONS: &[&str] = &[".gif", ".jpg", ".jpeg", ".png", ".bmp"];
const PLACEHOLDER_SUMMARY: &[&str] = &["table", "summary", "layout", "layout table", "data table", "nbsp"];

/// Rows and cells owned by one table, nested tables excluded.
struct TableShape {
    rows: usize,
    columns: usize,
    header_cells: usize,
    /// Every cell of the first row is a `<th>`.
    column_headers: bool,
    /// Every row starts with a `<th>`.
    row_headers: bool,
    /// Some cell names its headers with `scope` or `headers`.
    explicit_headers: bool,
}

impl TableShape {
    fn has_headers(&self) -> bool {
        self.column_headers || self.row_headers || self.explicit_headers
    }
}

pub(super) fn heading_level(tag: TagId) -> Option<u8> {
    match tag {
        TagId::H1 => Some(1),
        TagId::H2 => Some(2),
        TagId::H3 => Some(3),
        TagId::H4 => Some(4),
        TagId::H5 => Some(5),
        TagId::H6 => Some(6),
        _ => None,
    }
}

impl Checker<'_> {
    pub(super) fn structure(&mut self, node: NodeId) {
        let Some(tag) = self.dom.tag(node) else {
            return;
        };
        match tag {
            TagId::FRAMESET => {
                let nested = self.dom.ancestors(node).any(|a| self.dom.is(a, TagId::FRAMESET));
                if !nested && self.dom.find_tag(node, TagId::NOFRAMES).is_none() {
                    self.flag(AccessRule::NoframesMissing, node);
                }
            }
            TagId::FRAME => self.frame(node),
            TagId::IFRAME => {
                if self.dom.node(node).attr_value("title").is_none_or(is_blank) {
                    self.flag(AccessRule::IframeMissingTitle, node);
                }
            }
            TagId::NOFRAMES => {
                if is_blank(&self.dom.text_content(node)) {
                    self.flag(AccessRule::NoframesInvalidContent, node);
                }
            }
            TagId::TABLE => self.table(node),
            TagId::TH => {
                let n = self.dom.node(node);
                if !n.has_attr("abbr") && char_len(self.dom.text_content(node).trim()) > HEADER_ABBR_MIN {
                    self.flag(AccessRule::TableMayRequireHeaderAbbr, node);
                }
            }
            TagId::P => self.bold_paragraph(node),
            TagId::UL | TagId::OL => {
                let n = self.dom.node(node);
                let has_items = self.dom.children(node).any(|c| self.dom.is(c, TagId::LI));
                if n.implicit || !has_items {
                    let rule = if tag == TagId::UL {
                        AccessRule::ListUsageInvalidUl
                    } else {
                        AccessRule::ListUsageInvalidOl
                    };
                    self.flag(rule, node);
                }
            }
            TagId::LI => {
                let listed = self.dom.parent(node).is_some_and(|p| {
                    !self.dom.node(p).implicit
                        && matches!(
                            self.dom.tag(p),
                            Some(TagId::UL | TagId::OL | TagId::MENU | TagId::DIR)
                        )
                });
                if !listed {
                    self.flag(AccessRule::ListUsageInvalidLi, node);
                }
            }
            _ => {
                if heading_level(tag).is_some() && word_count(&self.dom.text_content(node)) > HEADING_MAX_WORDS {
                    self.flag(AccessRule::HeaderUsedFormatText, node);
                }
            }
        }
    }

    fn frame(&mut self, node: NodeId) {
        let n = self.dom.node(node);
        match n.attr_value("title") {
            None => self.flag(AccessRule::FrameMissingTitle, node),
            Some(title) if is_blank(title) => self.flag(AccessRule::FrameTitleInvalid, node),
            Some(_) => {}
        }
        if !n.has_attr("longdesc") {
            self.flag(AccessRule::FrameMissingLongdesc, node);
        }
        if n.attr_value("src").is_some_and(|src| has_extension(src, FRAME_IMAGE_EXTENSIONS)) {
            self.flag(AccessRule::FrameSrcInvalid, node);
        }
    }

    /// Sections of `table` that hold its rows.
    fn row_groups(&self, table: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::once(table).chain(self.dom.children(table).filter(move |&c| {
            matches!(self.dom.tag(c), Some(TagId::THEAD | TagId::TBODY | TagId::TFOOT))
        }))
    }

    fn table_shape(&self, table: NodeId) -> TableShape {
        let mut shape = TableShape {
            rows: 0,
            columns: 0,
            header_cells: 0,
            column_headers: false,
            row_headers: true,
            explicit_headers: false,
        };
        for group in self.row_groups(table) {
            for row in self.dom.children(group).filter(|&r| self.dom.is(r, TagId::TR)) {
                let mut cells = 0;
                let mut headers = 0;
                for cell in self.dom.children(row) {
                    let Some(tag @ (TagId::TD | TagId::TH)) = self.dom.tag(cell) else {
                        continue;
                    };
                    let n = self.dom.node(cell);
                    shape.explicit_headers |= n.has_attr("scope") || n.has_attr("headers");
                    if tag == TagId::TH {
                        headers += 1;
                    } else if cells == 0 {
                        shape.row_headers = false;
                    }
                    cells += 1;
                }
                if shape.rows == 0 {
                    shape.column_headers = cells > 0 && headers == cells;
                }
                shape.rows += 1;
                shape.header_cells += headers;
                shape.columns = shape.columns.max(cells);
            }
        }
        shape.row_headers &= shape.rows > 0;
        shape
    }

    /// Tables used for page layout: marked presentational or nested in or
    /// around another table.
    fn is_layout_table(&self, table: NodeId) -> bool {
        let role = self.dom.node(table).attr_value("role");
        role.is_some_and(|r| r.eq_ignore_ascii_case("presentation"))
            || self.dom.ancestors(table).any(|a| self.dom.is(a, TagId::TABLE))
            || self.dom.descendants(table).skip(1).any(|d| self.dom.is(d, TagId::TABLE))
    }

    fn table(&mut self, node: NodeId) {
        let shape = self.table_shape(node);
        if self.is_layout_table(node) {
            if shape.header_cells > 0 {
                self.flag(AccessRule::LayoutTableInvalidMarkup, node);
            }
            return;
        }
        match self.dom.node(node).attr_value("summary") {
            None => self.flag(AccessRule::TableMissingSummary, node),
            Some(summary) if is_blank(summary) => self.flag(AccessRule::TableSummaryInvalid, node),
            Some(summary) => {
                if PLACEHOLDER_SUMMARY.contains(&summary.trim().to_ascii_lowercase().as_str()) {
                    self.flag(AccessRule::TableSummaryPlaceholder, node);
                }
            }
        }
        if shape.rows >= 2 && shape.columns >= 2 {
            if !shape.has_headers() {
                self.flag(AccessRule::DataTableMissingHeaders, node);
            }
            if self.dom.find_child(node, TagId::CAPTION).is_none() {
                self.flag(AccessRule::TableMissingCaption, node);
            }
        }
    }

    /// A paragraph whose whole text sits in one `<b>` or `<strong>`.
    fn bold_paragraph(&mut self, node: NodeId) {
        let mut bold = None;
        for child in self.dom.children(node) {
            let c = self.dom.node(child);
            if c.is_text() && is_blank(self.dom.text(child)) {
                continue;
            }
            if bold.is_none() && matches!(c.tag, Some(TagId::B | TagId::STRONG)) {
                bold = Some(child);
            } else {
                return;
            }
        }
        if bold.is_some_and(|b| !is_blank(&self.dom.text_content(b))) {
            self.flag(AccessRule::PotentialHeaderBold, node);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_levels() {
        assert_eq!(heading_level(TagId::H1), Some(1));
        assert_eq!(heading_level(TagId::H6), Some(6));
        assert_eq!(heading_level(TagId::P), None);
    }
}
