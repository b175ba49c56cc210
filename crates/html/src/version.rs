//! Markup version detection, doctype repair and the generator mark.

use crate::attrs::lookup_attr;
use crate::config::DoctypeMode;
use crate::dom::{Attribute, Dom, NodeId, NodeKind};
use crate::report::{MessageCode, Report};
use crate::tags::{TagId, TagTable, Versions};

struct KnownDoctype {
    fpi: &'static str,
    system: &'static str,
    versions: Versions,
}

const KNOWN_DOCTYPES: &[KnownDoctype] = &[
    KnownDoctype {
        fpi: "-//IETF//DTD HTML 2.0//EN",
        system: "",
        versions: Versions::HTML20,
    },
    KnownDoctype {
        fpi: "-//IETF//DTD HTML//EN",
        system: "",
        versions: Versions::HTML20,
    },
    KnownDoctype {
        fpi: "-//W3C//DTD HTML 3.2 Final//EN",
        system: "",
        versions: Versions::HTML32,
    },
    KnownDoctype {
        fpi: "-//W3C//DTD HTML 3.2//EN",
        system: "",
        versions: Versions::HTML32,
    },
    KnownDoctype {
        fpi: "-//W3C//DTD HTML 4.01//EN",
        system: "http://www.w3.org/TR/html4/strict.dtd",
        versions: Versions::HTML40_STRICT,
    },
    KnownDoctype {
        fpi: "-//W3C//DTD HTML 4.01 Transitional//EN",
        system: "http://www.w3.org/TR/html4/loose.dtd",
        versions: Versions::HTML40_LOOSE,
    },
    KnownDoctype {
        fpi: "-//W3C//DTD HTML 4.01 Frameset//EN",
        system: "http://www.w3.org/TR/html4/frameset.dtd",
        versions: Versions::HTML40_FRAMESET,
    },
    KnownDoctype {
        fpi: "-//W3C//DTD HTML 4.0//EN",
        system: "",
        versions: Versions::HTML40_STRICT,
    },
    KnownDoctype {
        fpi: "-//W3C//DTD HTML 4.0 Transitional//EN",
        system: "",
        versions: Versions::HTML40_LOOSE,
    },
    KnownDoctype {
        fpi: "-//W3C//DTD XHTML 1.0 Strict//EN",
        system: "http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd",
        versions: Versions::XHTML10_STRICT,
    },
    KnownDoctype {
        fpi: "-//W3C//DTD XHTML 1.0 Transitional//EN",
        system: "http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd",
        versions: Versions::XHTML10_LOOSE,
    },
    KnownDoctype {
        fpi: "-//W3C//DTD XHTML 1.0 Frameset//EN",
        system: "http://www.w3.org/TR/xhtml1/DTD/xhtml1-frameset.dtd",
        versions: Versions::XHTML10_FRAMESET,
    },
    KnownDoctype {
        fpi: "-//W3C//DTD XHTML 1.1//EN",
        system: "http://www.w3.org/TR/xhtml11/DTD/xhtml11.dtd",
        versions: Versions::XHTML11,
    },
];

fn known(versions: Versions) -> Option<&'static KnownDoctype> {
    KNOWN_DOCTYPES
        .iter()
        .find(|d| d.versions == versions && !d.system.is_empty())
}

/// Public identifier of a doctype's text (`html PUBLIC "fpi" ...`).
pub fn public_id(doctype: &str) -> Option<&str> {
    let rest = doctype.get(4..)?.trim_start();
    if !tools::text::starts_with_ignore_ascii_case(rest, "public") {
        return None;
    }
    let rest = rest[6..].trim_start();
    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let inner = &rest[1..];
    let end = inner.find(quote)?;
    Some(&inner[..end])
}

/// Versions a doctype declares; `None` for identifiers this table doesn't know.
pub fn declared_versions(doctype: &str) -> Option<Versions> {
    let trimmed = doctype.trim();
    if trimmed.eq_ignore_ascii_case("html") {
        return Some(Versions::HTML5);
    }
    let fpi = public_id(trimmed)?;
    KNOWN_DOCTYPES
        .iter()
        .find(|d| d.fpi.eq_ignore_ascii_case(fpi))
        .map(|d| d.versions)
}

/// Intersection of the versions of every element and attribute in the tree.
pub fn apparent_versions(dom: &Dom, tags: &TagTable) -> Versions {
    let mut versions = Versions::all();
    for node in dom.descendants(dom.root()) {
        let n = dom.node(node);
        if !n.is_element() {
            continue;
        }
        if let Some(tag) = n.tag {
            if !n.implicit {
                versions &= tags.get(tag).versions;
            }
        }
        for attr in &n.attributes {
            if let Some(def) = lookup_attr(&attr.name) {
                versions &= def.versions;
            }
        }
    }
    versions
}

/// Name of the most modern version in `versions`.
pub fn describe(versions: Versions, xhtml: bool) -> &'static str {
    let preference: &[(Versions, &str)] = if xhtml {
        &[
            (Versions::HTML5, "HTML5"),
            (Versions::XHTML10_STRICT, "XHTML 1.0 Strict"),
            (Versions::XHTML10_LOOSE, "XHTML 1.0 Transitional"),
            (Versions::XHTML10_FRAMESET, "XHTML 1.0 Frameset"),
            (Versions::XHTML11, "XHTML 1.1"),
        ]
    } else {
        &[
            (Versions::HTML5, "HTML5"),
            (Versions::HTML40_STRICT, "HTML 4.01 Strict"),
            (Versions::HTML40_LOOSE, "HTML 4.01 Transitional"),
            (Versions::HTML40_FRAMESET, "HTML 4.01 Frameset"),
            (Versions::HTML32, "HTML 3.2"),
            (Versions::HTML20, "HTML 2.0"),
        ]
    };
    preference
        .iter()
        .find(|(flag, _)| versions.contains(*flag))
        .map(|(_, name)| *name)
        .unwrap_or_else(|| versions.describe())
}

pub fn find_doctype(dom: &Dom) -> Option<NodeId> {
    dom.children(dom.root())
        .find(|&n| dom.node(n).kind == NodeKind::DocType)
}

fn doctype_text(known: &KnownDoctype) -> String {
    if known.system.is_empty() {
        format!("html PUBLIC \"{}\"", known.fpi)
    } else {
        format!("html PUBLIC \"{}\" \"{}\"", known.fpi, known.system)
    }
}

fn set_doctype(dom: &mut Dom, text: &str) {
    if let Some(node) = find_doctype(dom) {
        dom.set_text(node, text);
        return;
    }
    let node = dom.create_text(NodeKind::DocType, text);
    let root = dom.root();
    let after_decl = dom
        .first_child(root)
        .filter(|&n| dom.node(n).kind == NodeKind::XmlDecl);
    match after_decl {
        Some(decl) => dom.insert_after(decl, node),
        None => match dom.first_child(root) {
            Some(first) => dom.insert_before(first, node),
            None => dom.append_child(root, node),
        },
    }
}

/// Settle the doctype according to `mode` and report the apparent version.
/// Returns the versions the content is compatible with.
pub fn fix_doctype(dom: &mut Dom, tags: &TagTable, mode: &DoctypeMode, xhtml: bool, report: &mut Report) -> Versions {
    let apparent = apparent_versions(dom, tags);
    let framed = dom.find_tag(dom.root(), TagId::FRAMESET).is_some();
    let existing = find_doctype(dom).map(|n| dom.text(n).to_string());
    let (line, column) = find_doctype(dom).map_or((1, 1), |n| dom.position(n));
    log::debug!(target: "html.document", "apparent versions {apparent:?}, doctype {existing:?}");
    let strict = if xhtml { Versions::XHTML10_STRICT } else { Versions::HTML40_STRICT };
    let loose = match (xhtml, framed) {
        (false, false) => Versions::HTML40_LOOSE,
        (false, true) => Versions::HTML40_FRAMESET,
        (true, false) => Versions::XHTML10_LOOSE,
        (true, true) => Versions::XHTML10_FRAMESET,
    };
    match mode {
        DoctypeMode::Omit => {
            if let Some(node) = find_doctype(dom) {
                dom.remove(node);
            }
        }
        DoctypeMode::Html5 => set_doctype(dom, "html"),
        DoctypeMode::Strict => {
            if let Some(k) = known(strict) {
                set_doctype(dom, &doctype_text(k));
            }
        }
        DoctypeMode::Transitional => {
            if let Some(k) = known(loose) {
                set_doctype(dom, &doctype_text(k));
            }
        }
        DoctypeMode::User(Some(fpi)) => set_doctype(dom, &format!("html PUBLIC \"{fpi}\"")),
        DoctypeMode::User(None) | DoctypeMode::Auto => match existing.as_deref() {
            None => {
                report.emit(MessageCode::MissingDoctype, 1, 1, &[]);
                if *mode == DoctypeMode::Auto {
                    set_doctype(dom, "html");
                }
            }
            Some(text) => {
                let declared = declared_versions(text);
                if let Some(declared) = declared {
                    if !declared.intersects(apparent) {
                        report.emit(MessageCode::InconsistentVersion, line, column, &[describe(apparent, xhtml)]);
                    }
                    if xhtml && *mode == DoctypeMode::Auto {
                        let counterpart = if declared.intersects(Versions::STRICT) {
                            known(Versions::XHTML10_STRICT)
                        } else if declared.intersects(Versions::FRAMESET) {
                            known(Versions::XHTML10_FRAMESET)
                        } else if declared.intersects(Versions::TRANSITIONAL) {
                            known(Versions::XHTML10_LOOSE)
                        } else {
                            None
                        };
                        if let Some(k) = counterpart {
                            set_doctype(dom, &doctype_text(k));
                        }
                    }
                }
            }
        },
    }
    report.emit(MessageCode::ApparentVersion, line, column, &[describe(apparent, xhtml)]);
    apparent
}

const GENERATOR_PREFIX: &str = "retidy";

/// Add or refresh `<meta name="generator">` in the head.
pub fn mark_generator(dom: &mut Dom, tags: &TagTable) {
    let Some(head) = dom.find_tag(dom.root(), TagId::HEAD) else {
        return;
    };
    let content = format!("{GENERATOR_PREFIX} {}", env!("CARGO_PKG_VERSION"));
    let existing = dom.children(head).find(|&n| {
        let node = dom.node(n);
        dom.is(n, TagId::META)
            && node
                .attr_value("name")
                .is_some_and(|v| v.eq_ignore_ascii_case("generator"))
    });
    if let Some(meta) = existing {
        let node = dom.node_mut(meta);
        if let Some(attr) = node.attributes.iter_mut().find(|a| a.name.eq_ignore_ascii_case("content")) {
            if attr.value_str().starts_with(GENERATOR_PREFIX) {
                attr.value = Some(content);
            }
            return;
        }
    }
    if existing.is_some() {
        return;
    }
    let meta = dom.create(NodeKind::StartTag, Some(TagId::META), tags.name(TagId::META));
    let node = dom.node_mut(meta);
    node.closed = true;
    node.attributes.push(Attribute::new("name", Some("generator".to_string())));
    node.attributes.push(Attribute::new("content", Some(content)));
    dom.append_child(head, meta);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree_builder::{BuildOptions, build_tree, fix_structure};

    fn tree(input: &str) -> (Dom, TagTable) {
        let tags = TagTable::new();
        let mut report = Report::new();
        let mut dom = build_tree(input, BuildOptions::default(), &tags, &mut report);
        fix_structure(&mut dom, &tags, &mut report);
        (dom, tags)
    }

    fn doctype(dom: &Dom) -> Option<String> {
        find_doctype(dom).map(|n| dom.text(n).to_string())
    }

    #[test]
    fn public_identifiers_are_recognised() {
        let text = r#"html PUBLIC "-//W3C//DTD HTML 4.01 Transitional//EN" "http://www.w3.org/TR/html4/loose.dtd""#;
        assert_eq!(public_id(text), Some("-//W3C//DTD HTML 4.01 Transitional//EN"));
        assert_eq!(declared_versions(text), Some(Versions::HTML40_LOOSE));
        assert_eq!(declared_versions("html"), Some(Versions::HTML5));
        assert_eq!(declared_versions(r#"html PUBLIC "-//ACME//DTD X//EN""#), None);
    }

    #[test]
    fn missing_doctype_is_reported_and_added() {
        let (mut dom, tags) = tree("<p>x</p>");
        let mut report = Report::new();
        let apparent = fix_doctype(&mut dom, &tags, &DoctypeMode::Auto, false, &mut report);
        assert!(apparent.contains(Versions::HTML5));
        assert_eq!(doctype(&dom).as_deref(), Some("html"));
        assert!(report.has_code("missing-doctype"));
        assert!(report.has_code("apparent-version"));
    }

    #[test]
    fn strict_doctype_with_presentational_markup_is_inconsistent() {
        let (mut dom, tags) = tree(r#"<!DOCTYPE html PUBLIC "-//W3C//DTD HTML 4.01//EN"><center>x</center>"#);
        let mut report = Report::new();
        fix_doctype(&mut dom, &tags, &DoctypeMode::Auto, false, &mut report);
        assert!(report.has_code("inconsistent-version"));
        assert!(!report.has_code("missing-doctype"));
    }

    #[test]
    fn explicit_modes_rewrite_the_doctype() {
        let (mut dom, tags) = tree("<!DOCTYPE html><p>x</p>");
        let mut report = Report::new();
        fix_doctype(&mut dom, &tags, &DoctypeMode::Strict, true, &mut report);
        assert_eq!(
            doctype(&dom).as_deref(),
            Some(r#"html PUBLIC "-//W3C//DTD XHTML 1.0 Strict//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd""#)
        );
        fix_doctype(&mut dom, &tags, &DoctypeMode::Omit, false, &mut report);
        assert_eq!(doctype(&dom), None);
        fix_doctype(&mut dom, &tags, &DoctypeMode::User(Some("-//ACME//DTD X//EN".into())), false, &mut report);
        assert_eq!(doctype(&dom).as_deref(), Some(r#"html PUBLIC "-//ACME//DTD X//EN""#));
        assert_eq!(dom.first_child(dom.root()), find_doctype(&dom));
    }

    #[test]
    fn version_names_prefer_modern_markup() {
        assert_eq!(describe(Versions::ALL, false), "HTML5");
        assert_eq!(describe(Versions::LOOSE, false), "HTML 4.01 Transitional");
        assert_eq!(describe(Versions::LOOSE, true), "XHTML 1.0 Transitional");
        assert_eq!(describe(Versions::PROPRIETARY, false), "HTML Proprietary");
    }

    #[test]
    fn generator_meta_is_added_once() {
        let (mut dom, tags) = tree("<p>x</p>");
        mark_generator(&mut dom, &tags);
        mark_generator(&mut dom, &tags);
        let head = dom.find_tag(dom.root(), TagId::HEAD).unwrap();
        let metas = dom.children(head).filter(|&n| dom.is(n, TagId::META)).count();
        assert_eq!(metas, 1);
        let meta = dom.find_tag(head, TagId::META).unwrap();
        assert!(dom.node(meta).attr_value("content").unwrap().starts_with("retidy "));
    }
}
