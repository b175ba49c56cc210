use super::*;
use crate::dom::Dom;

fn build_with(input: &str, options: BuildOptions) -> (Dom, Report) {
    let tags = TagTable::new();
    let mut report = Report::new();
    let dom = build_tree(input, options, &tags, &mut report);
    dom.check_links().expect("tree links");
    (dom, report)
}

fn build(input: &str) -> (Dom, Report) {
    build_with(input, BuildOptions::default())
}

fn outline(dom: &Dom, node: NodeId) -> String {
    let n = dom.node(node);
    match n.kind {
        NodeKind::Text => format!("{:?}", dom.text(node)),
        NodeKind::Comment => format!("<!--{}-->", dom.text(node)),
        NodeKind::DocType => "!doctype".to_string(),
        _ if n.is_element() => {
            let children: Vec<String> = dom.children(node).map(|c| outline(dom, c)).collect();
            if children.is_empty() {
                n.name.clone()
            } else {
                format!("{}({})", n.name, children.join(" "))
            }
        }
        _ => format!("{:?}", n.kind),
    }
}

fn children_outline(dom: &Dom, node: NodeId) -> String {
    dom.children(node)
        .map(|c| outline(dom, c))
        .collect::<Vec<_>>()
        .join(" ")
}

fn body(dom: &Dom) -> String {
    let body = dom.find_tag(dom.root(), TagId::BODY).expect("body");
    children_outline(dom, body)
}

fn head(dom: &Dom) -> String {
    let head = dom.find_tag(dom.root(), TagId::HEAD).expect("head");
    children_outline(dom, head)
}

#[test]
fn bare_text_gets_the_document_skeleton() {
    let (dom, report) = build("hello");
    assert_eq!(children_outline(&dom, dom.root()), r#"html(head body("hello"))"#);
    let html = dom.find_child(dom.root(), TagId::HTML).unwrap();
    assert!(dom.node(html).implicit);
    assert!(report.is_empty());
}

#[test]
fn optional_end_tags_close_silently() {
    let (dom, report) = build("<p>a<p>b<ul><li>one<li>two</ul>");
    assert_eq!(body(&dom), r#"p("a") p("b") ul(li("one") li("two"))"#);
    assert!(report.is_empty(), "{:?}", report.as_slice());
}

#[test]
fn block_start_closes_inline_and_reopens_it_inside() {
    let (dom, report) = build("<b>x<div>y</div>");
    assert_eq!(body(&dom), r#"b("x") div(b("y"))"#);
    assert!(report.has_code("missing-endtag-before"));
    assert!(report.has_code("missing-end-tag-for"));
}

#[test]
fn reopened_inline_ends_at_its_own_end_tag() {
    let (dom, report) = build("<i>a<p>b</i>c</p>");
    assert_eq!(body(&dom), r#"i("a") p(i("b") "c")"#);
    assert_eq!(report.count_code("missing-endtag-before"), 1);
    assert!(!report.has_code("missing-end-tag-for"));
}

#[test]
fn list_items_outside_lists_infer_the_list() {
    let (dom, report) = build("<li>x</li><dd>y");
    assert_eq!(body(&dom), r#"ul(li("x")) dl(dd("y"))"#);
    assert_eq!(report.count_code("inserting-tag"), 2);
}

#[test]
fn non_items_in_a_list_infer_an_item() {
    let (dom, report) = build("<ul><p>x</p></ul>");
    assert_eq!(body(&dom), r#"ul(li(p("x")))"#);
    assert!(report.has_code("missing-start-tag"));
}

#[test]
fn table_rows_and_cells_are_inferred() {
    let (dom, report) = build("<table><td>x</td></table>");
    assert_eq!(body(&dom), r#"table(tr(td("x")))"#);
    assert!(report.has_code("missing-start-tag"));
}

#[test]
fn stray_table_content_moves_before_the_table() {
    let (dom, report) = build("<table><tr><td>a</td></tr>text<p>x</p></table>");
    assert_eq!(body(&dom), r#""text" p("x") table(tr(td("a")))"#);
    assert!(report.has_code("text-not-allowed-in"));
    assert!(report.has_code("tag-not-allowed-in"));
}

#[test]
fn obsolete_elements_moved_out_of_a_table_become_pre() {
    let (dom, report) = build("<table><xmp><b>x</b></xmp></table>");
    assert_eq!(body(&dom), r#"pre("<b>x</b>") table"#);
    assert!(report.has_code("obsolete-element"));
}

#[test]
fn list_items_moved_out_of_a_table_get_a_list() {
    let (dom, report) = build("<table><dt>x</table>");
    assert_eq!(body(&dom), r#"dl(dt("x")) table"#);
    assert!(report.has_code("inserting-tag"));

    let (dom, _) = build("<table><li>a<li>b</table>");
    assert_eq!(body(&dom), r#"ul(li("a") li("b")) table"#);
}

#[test]
fn cells_close_each_other() {
    let (dom, report) = build("<table><tr><td>a<td>b<tr><td>c</table>");
    assert_eq!(body(&dom), r#"table(tr(td("a") td("b")) tr(td("c")))"#);
    assert!(report.is_empty(), "{:?}", report.as_slice());
}

#[test]
fn table_parts_outside_a_table_are_dropped() {
    let (dom, report) = build("<td>x");
    assert_eq!(body(&dom), r#""x""#);
    assert!(report.has_code("discarding-unexpected"));
}

#[test]
fn head_elements_in_the_body_move_to_the_head() {
    let (dom, report) = build("<body><p>x</p><title>T</title></body>");
    assert_eq!(head(&dom), r#"title("T")"#);
    assert_eq!(body(&dom), r#"p("x")"#);
    assert!(report.has_code("tag-not-allowed-in"));
}

#[test]
fn a_second_title_is_dropped() {
    let (dom, report) = build("<title>a</title><title>b</title><p>x");
    assert_eq!(head(&dom), r#"title("a")"#);
    assert!(report.has_code("too-many-elements"));
}

#[test]
fn unknown_elements_keep_their_content() {
    let (dom, report) = build("<p><foo>x</foo></p>");
    assert_eq!(body(&dom), r#"p("x")"#);
    assert_eq!(report.errors(), 1);
    assert!(report.has_code("unknown-element"));
}

#[test]
fn repeated_emphasis_start_tag_reads_as_end_tag() {
    let (dom, report) = build("<b>x<b>y");
    assert_eq!(body(&dom), r#"b("x") "y""#);
    assert!(report.has_code("coerce-to-endtag"));

    let options = BuildOptions {
        coerce_endtags: false,
        ..BuildOptions::default()
    };
    let (dom, _) = build_with("<b>x<b>y", options);
    assert_eq!(body(&dom), r#"b("x" b("y"))"#);
}

#[test]
fn nested_anchor_closes_the_open_one() {
    let (dom, report) = build("<a href=1>x<a href=2>y</a>");
    assert_eq!(body(&dom), r#"a("x") a("y")"#);
    assert!(report.has_code("missing-endtag-before"));
}

#[test]
fn whitespace_collapses_and_moves_out_of_inline_edges() {
    let (dom, _) = build("<p>  a <b> b </b>\n c </p>");
    assert_eq!(body(&dom), r#"p("a " b("b") " c")"#);
}

#[test]
fn preformatted_text_is_kept_without_the_first_newline() {
    let (dom, _) = build("<pre>\n  x\n</pre>");
    assert_eq!(body(&dom), r#"pre("  x\n")"#);
}

#[test]
fn obsolete_literal_elements_become_pre() {
    let (dom, report) = build("<xmp><b></xmp>");
    assert_eq!(body(&dom), r#"pre("<b>")"#);
    assert!(report.has_code("obsolete-element"));
}

#[test]
fn unclosed_required_end_tag_is_reported() {
    let (dom, report) = build("<div>x");
    assert_eq!(body(&dom), r#"div("x")"#);
    assert_eq!(report.count_code("missing-end-tag-for"), 1);
}

#[test]
fn content_after_body_stays_in_the_body() {
    let (dom, report) = build("<body>x</body>y");
    assert_eq!(body(&dom), r#""xy""#);
    assert!(report.has_code("content-after-body"));
}

#[test]
fn select_keeps_only_options() {
    let (dom, report) = build("<select><option>a<option>b<p>c</select>");
    assert_eq!(body(&dom), r#"select(option("a") option("b"))"#);
    assert!(report.has_code("discarding-unexpected"));
}

#[test]
fn framesets_replace_the_body() {
    let (dom, report) = build("<frameset><frame src=a><noframes><p>x</p></noframes></frameset>");
    let html = dom.find_child(dom.root(), TagId::HTML).unwrap();
    assert_eq!(
        children_outline(&dom, html),
        r#"head frameset(frame noframes(p("x")))"#
    );
    assert!(dom.find_tag(dom.root(), TagId::BODY).is_none());
    assert!(report.is_empty(), "{:?}", report.as_slice());
}

#[test]
fn doctype_after_elements_is_dropped() {
    let (dom, report) = build("<p>x</p><!DOCTYPE html>");
    assert!(report.has_code("doctype-after-tags"));
    assert!(
        dom.children(dom.root())
            .all(|n| dom.node(n).kind != NodeKind::DocType)
    );
}

#[test]
fn xml_mode_builds_generic_elements() {
    let options = BuildOptions {
        xml: true,
        ..BuildOptions::default()
    };
    let (dom, report) = build_with("<a>\n  <b>x</b>\n  <c/>\n</a>", options);
    assert_eq!(children_outline(&dom, dom.root()), r#"a(b("x") c)"#);
    assert!(report.is_empty());

    let (_, report) = build_with("<a><b></a>", options);
    assert!(report.has_code("missing-endtag-before"));

    let (dom, _) = build_with("hello\n<e/>", options);
    assert_eq!(children_outline(&dom, dom.root()), r#""hello" e"#);
}

#[test]
fn enclose_text_wraps_bare_body_text() {
    let options = BuildOptions {
        enclose_text: true,
        ..BuildOptions::default()
    };
    let (dom, report) = build_with("<body>x<div>y</div></body>", options);
    assert_eq!(body(&dom), r#"p("x") div("y")"#);
    assert!(report.has_code("inserting-tag"));
}
