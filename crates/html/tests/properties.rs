use html::{Document, Options};

const CORPUS: &[&str] = &[
    "<p>one<p>two",
    "<title>t</title><div><p>a <b>b</b> c</p></div>",
    "<ul><li>a<li>b</ul><ol><li>c</ol>",
    "<table><td>x<td>y<tr><td>z</table>",
    "<dl><dt>term<dd>definition</dl>",
    "<pre>  keep\n    this</pre>",
    "<p>a &amp; b &lt; c &copy; d</p>",
    "<h1>head</h1><p>text <em>em</em> <a href=\"x.html\">link</a></p>",
];

fn repair(input: &str, options: &[(&str, &str)]) -> Document {
    let mut doc = Document::from_text(input);
    for (name, value) in options {
        doc.set_option(name, value).unwrap();
    }
    doc.run();
    doc
}

fn codes(doc: &Document) -> Vec<&'static str> {
    doc.diagnostics().iter().map(|d| d.code_name()).collect()
}

/// Seeded xorshift, so a failing case can be replayed.
struct Rng(u64);

impl Rng {
    fn next(&mut self) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next() % n as u64) as usize
    }
}

const WORDS: &[&str] = &["alpha", "beta", "x", "a &amp; b", "&copy; 2024", "one two"];

fn phrase(rng: &mut Rng, depth: usize, out: &mut String) {
    let count = 1 + rng.below(3);
    for i in 0..count {
        if i > 0 && rng.below(2) == 0 {
            out.push(' ');
        }
        match if depth == 0 { 0 } else { rng.below(5) } {
            1 => {
                let tag = ["b", "em", "span", "code"][rng.below(4)];
                out.push_str(&format!("<{tag}>"));
                phrase(rng, depth - 1, out);
                out.push_str(&format!("</{tag}>"));
            }
            2 => out.push_str("<a href=\"x.html\">link</a>"),
            _ => out.push_str(WORDS[rng.below(WORDS.len())]),
        }
    }
}

/// Content that cannot stay inside a table grid.
fn stray(rng: &mut Rng, out: &mut String) {
    match rng.below(5) {
        0 => out.push_str("<p>moved</p>"),
        1 => out.push_str("<dt>term"),
        2 => out.push_str("<li>item"),
        3 => out.push_str("<xmp>a\tb <i>c</i></xmp>"),
        _ => out.push_str("<listing>x\ty</listing>"),
    }
}

fn flow(rng: &mut Rng, depth: usize, out: &mut String) {
    let count = 1 + rng.below(3);
    for _ in 0..count {
        match if depth == 0 { 0 } else { rng.below(9) } {
            1 => {
                out.push_str("<div>");
                flow(rng, depth - 1, out);
                out.push_str("</div>");
            }
            2 => {
                out.push_str("<ul><li>");
                flow(rng, depth - 1, out);
                out.push_str("<li>");
                phrase(rng, depth - 1, out);
                out.push_str("</ul>");
            }
            3 => {
                out.push_str("<dl><dt>");
                phrase(rng, depth - 1, out);
                out.push_str("<dd>");
                flow(rng, depth - 1, out);
                out.push_str("</dl>");
            }
            4 => {
                out.push_str("<table><tr><td>");
                flow(rng, depth - 1, out);
                out.push_str("</td></tr></table>");
            }
            5 => {
                out.push_str("<table>");
                stray(rng, out);
                out.push_str("<tr><td>cell</td></tr></table>");
            }
            6 => out.push_str("<pre>keep  this\n\tindent</pre>"),
            7 => out.push_str("<xmp>x\t<b>y</b></xmp>"),
            _ => {
                out.push_str("<p>");
                phrase(rng, depth, out);
                out.push_str("</p>");
            }
        }
    }
}

fn xml_element(rng: &mut Rng, depth: usize, out: &mut String) {
    let name = ["item", "note", "e"][rng.below(3)];
    match if depth == 0 { rng.below(2) } else { rng.below(4) } {
        0 => out.push_str(&format!("<{name}/>")),
        1 => out.push_str(&format!("<{name}>text</{name}>")),
        _ => {
            out.push_str(&format!("<{name}>"));
            for _ in 0..1 + rng.below(3) {
                if rng.below(3) == 0 {
                    out.push_str("word");
                }
                xml_element(rng, depth - 1, out);
            }
            out.push_str(&format!("</{name}>"));
        }
    }
}

#[test]
fn second_pass_is_stable_and_quiet() {
    for input in CORPUS {
        let first = repair(input, &[]);
        let once = first.output().unwrap_or_else(|| panic!("no output for {input:?}"));
        let second = repair(once, &[]);
        assert_eq!(second.output(), Some(once), "output changed on second pass of {input:?}");
        assert_eq!(second.errors(), 0, "{input:?}: {:?}", codes(&second));
        assert_eq!(second.warnings(), 0, "{input:?}: {:?}", codes(&second));
    }
}

#[test]
fn generated_fragments_repair_to_a_fixed_point() {
    const OPTION_SETS: &[&[(&str, &str)]] = &[
        &[],
        &[("indent", "auto")],
        &[("output-xhtml", "yes")],
        &[("wrap", "40"), ("uppercase-tags", "yes")],
    ];
    let mut rng = Rng(0x9E37_79B9_7F4A_7C15);
    for round in 0..400 {
        let mut input = String::new();
        flow(&mut rng, 3, &mut input);
        let options: Vec<(&str, &str)> = [("force-output", "yes")]
            .into_iter()
            .chain(OPTION_SETS[round % OPTION_SETS.len()].iter().copied())
            .collect();
        let first = repair(&input, &options);
        let once = first.output().unwrap_or_else(|| panic!("no output for {input:?}"));
        let second = repair(once, &options);
        assert_eq!(second.output(), Some(once), "round {round}, options {options:?}, input {input:?}");
    }
}

#[test]
fn generated_xml_repairs_to_a_fixed_point() {
    let mut rng = Rng(0xD1B5_4A32_D192_ED03);
    for round in 0..200 {
        let mut input = String::new();
        if rng.below(2) == 0 {
            input.push_str("hello\n");
        }
        xml_element(&mut rng, 3, &mut input);
        let options = [("input-xml", "yes")];
        let first = repair(&input, &options);
        let once = first.output().unwrap_or_else(|| panic!("no output for {input:?}"));
        let second = repair(once, &options);
        assert_eq!(second.output(), Some(once), "round {round}, input {input:?}");
    }
}

#[test]
fn every_diagnostic_has_a_position() {
    let mut rng = Rng(0x2545_F491_4F6C_DD1D);
    let mut inputs: Vec<String> = CORPUS.iter().map(|s| s.to_string()).collect();
    inputs.push("<p>x</p>".to_string());
    inputs.push("<!DOCTYPE html PUBLIC \"-//W3C//DTD HTML 3.2 Final//EN\"><p><font>x</font>".to_string());
    for _ in 0..100 {
        let mut input = String::new();
        flow(&mut rng, 2, &mut input);
        inputs.push(input);
    }
    for input in &inputs {
        let mut doc = Document::from_text(input);
        doc.set_option("accessibility-check", "3").unwrap();
        doc.set_option("no-such-option", "1").unwrap_err();
        doc.run();
        for d in doc.diagnostics() {
            assert!(d.line >= 1 && d.column >= 1, "{} at {}:{} for {input:?}", d.code_name(), d.line, d.column);
        }
    }
}

#[test]
fn odd_bytes_never_abort_a_run() {
    const PIECES: &[&[u8]] = &[
        b"<", b">", b"</", b"/>", b"<p", b"<table", b"<td", b"<li", b"<b", b"</b", b"<!--", b"-->",
        b"<!DOCTYPE", b"<![CDATA[", b"]]>", b"<?", b"?>", b"&", b"&amp", b";", b"=", b"\"", b"'",
        b" ", b"\n", b"x", b"<script>", b"</script>", b"<pre>", b"\xff", b"\xc3", b"\x00", b"<%", b"%>",
    ];
    let mut state: u64 = 0x2545_F491_4F6C_DD1D;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state
    };
    for _ in 0..300 {
        let len = (next() % 64) as usize;
        let mut bytes = Vec::new();
        for _ in 0..len {
            bytes.extend_from_slice(PIECES[(next() % PIECES.len() as u64) as usize]);
        }
        let mut doc = Document::new();
        doc.set_option("force-output", "yes").unwrap();
        doc.load_bytes(&bytes).unwrap();
        let status = doc.run();
        assert!((0..=2).contains(&status));
        assert!(doc.dom().check_links().is_ok(), "broken tree for {bytes:?}");
        assert!(doc.output().is_some(), "forced output missing for {bytes:?}");
    }
}

#[test]
fn every_option_value_reads_back() {
    let mut doc = Document::new();
    for (def, _) in Options::new().iter() {
        let value = doc.option_value(def.name).unwrap();
        doc.set_option(def.name, &value)
            .unwrap_or_else(|err| panic!("{}={value:?}: {err}", def.name));
        assert_eq!(doc.option_value(def.name).as_deref(), Some(value.as_str()), "{}", def.name);
    }
    assert_eq!(doc.config_errors(), 0);
}

#[test]
fn repeated_class_values_are_joined() {
    let doc = repair("<div class=\"a\" class=\"b\">x</div>", &[("show-body-only", "yes")]);
    assert_eq!(doc.output(), Some("<div class=\"a b\">x</div>\n"));
    assert!(codes(&doc).contains(&"joining-attribute"));
}

#[test]
fn keep_first_drops_the_later_id() {
    let doc = repair(
        "<div id=\"x\" id=\"y\">x</div>",
        &[("show-body-only", "yes"), ("repeated-attributes", "keep-first")],
    );
    assert_eq!(doc.output(), Some("<div id=\"x\">x</div>\n"));
    assert_eq!(codes(&doc).iter().filter(|c| **c == "repeated-attribute").count(), 1);
}

#[test]
fn inferred_tags_are_reported() {
    let doc = repair("<ul><p>x</p></ul>", &[]);
    assert!(codes(&doc).contains(&"missing-start-tag"));
    let doc = repair("<p>a <b>bold", &[]);
    assert!(codes(&doc).contains(&"missing-end-tag-for"));
}

#[test]
fn accessibility_checks_follow_the_level() {
    let doc = repair("<p><img src=\"a.png\"></p>", &[]);
    assert_eq!(doc.access_warnings(), 0);
    let doc = repair("<p><img src=\"a.png\"></p>", &[("accessibility-check", "1")]);
    assert_eq!(codes(&doc).iter().filter(|c| **c == "img-missing-alt").count(), 1);
}

#[test]
fn exit_status_reflects_the_worst_finding() {
    assert_eq!(repair("<p>text", &[]).exit_status(), 1);
    assert_eq!(repair("<p><blink2>x</blink2>", &[]).exit_status(), 2);
    let clean = repair(repair("<p>text", &[]).output().unwrap(), &[]);
    assert_eq!(clean.exit_status(), 0);
}
