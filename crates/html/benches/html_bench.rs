use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use html::report::Report;
use html::tree_builder::{BuildOptions, build_tree, fix_structure};
use html::{Document, PrintOptions, TagTable, print};

const SMALL_BLOCKS: usize = 64;
const LARGE_BLOCKS: usize = 20_000;

/// Well-formed repeated blocks.
fn make_blocks(blocks: usize) -> String {
    let mut out = String::with_capacity(blocks * 64);
    for i in 0..blocks {
        out.push_str("<div class=box><span>hello</span> <img src=x alt=\"\"> item ");
        out.push_str(&i.to_string());
        out.push_str("</div>\n");
    }
    out
}

/// Blocks with the usual damage: unclosed paragraphs and list items,
/// misnested inline elements and stray end tags.
fn make_broken_blocks(blocks: usize) -> String {
    let mut out = String::with_capacity(blocks * 64);
    for i in 0..blocks {
        out.push_str("<p>para <b>bold <i>both</b> italic</i><ul><li>one<li>two</ul></span>");
        out.push_str(&i.to_string());
    }
    out
}

fn make_script_adversarial(bytes: usize) -> String {
    let mut body = String::with_capacity(bytes + 32);
    body.push_str("<script>");
    while body.len() < bytes {
        body.push_str("</scri<pt");
    }
    body.push_str("</script>");
    body
}

fn bench_build_small(c: &mut Criterion) {
    let input = make_blocks(SMALL_BLOCKS);
    let tags = TagTable::new();
    c.bench_function("bench_build_small", |b| {
        b.iter(|| {
            let mut report = Report::new();
            let dom = build_tree(black_box(&input), BuildOptions::default(), &tags, &mut report);
            black_box(dom.len());
        });
    });
}

fn bench_build_large(c: &mut Criterion) {
    let input = make_blocks(LARGE_BLOCKS);
    let tags = TagTable::new();
    c.bench_function("bench_build_large", |b| {
        b.iter(|| {
            let mut report = Report::new();
            let dom = build_tree(black_box(&input), BuildOptions::default(), &tags, &mut report);
            black_box(dom.len());
        });
    });
}

fn bench_print_large(c: &mut Criterion) {
    let input = make_blocks(LARGE_BLOCKS);
    let tags = TagTable::new();
    let mut report = Report::new();
    let mut dom = build_tree(&input, BuildOptions::default(), &tags, &mut report);
    fix_structure(&mut dom, &tags, &mut report);
    let options = PrintOptions::default();
    c.bench_function("bench_print_large", |b| {
        b.iter(|| black_box(print(black_box(&dom), &tags, &options).len()));
    });
}

fn bench_repair_broken_end_to_end(c: &mut Criterion) {
    let input = make_broken_blocks(LARGE_BLOCKS / 4);
    c.bench_function("bench_repair_broken_end_to_end", |b| {
        b.iter_batched(
            || Document::from_text(&input),
            |mut doc| {
                doc.run();
                black_box(doc.output().map(str::len));
            },
            BatchSize::LargeInput,
        );
    });
}

fn bench_script_adversarial(c: &mut Criterion) {
    let input = make_script_adversarial(512 * 1024);
    let tags = TagTable::new();
    c.bench_function("bench_script_adversarial", |b| {
        b.iter(|| {
            let mut report = Report::new();
            let dom = build_tree(black_box(&input), BuildOptions::default(), &tags, &mut report);
            black_box(dom.len());
        });
    });
}

criterion_group!(
    benches,
    bench_build_small,
    bench_build_large,
    bench_print_large,
    bench_repair_broken_end_to_end,
    bench_script_adversarial
);
criterion_main!(benches);
