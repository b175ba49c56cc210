use html_test_support::runner::{check_fixture, run_fixture};
use html_test_support::{FixtureFilter, FixtureStatus, load_fixtures};
use std::path::PathBuf;

fn fixture_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

#[test]
fn golden_repairs() {
    let fixtures = load_fixtures(&fixture_root());
    let filter = FixtureFilter::from_env();
    let mut ran = 0usize;
    let mut failures = Vec::new();
    for fixture in &fixtures {
        if !filter.matches(&fixture.name) {
            continue;
        }
        ran += 1;
        let outcome = run_fixture(fixture).and_then(|run| check_fixture(fixture, &run));
        match (fixture.status, outcome) {
            (FixtureStatus::Active, Ok(())) => {}
            (FixtureStatus::Active, Err(err)) => failures.push(err),
            (FixtureStatus::Xfail, Ok(())) => failures.push(format!(
                "fixture '{}' passed but is marked xfail; reason: {}",
                fixture.name,
                fixture.reason.as_deref().unwrap_or("<missing reason>")
            )),
            (FixtureStatus::Xfail, Err(_)) => {}
        }
    }
    assert!(ran > 0, "no fixtures matched filter");
    assert!(failures.is_empty(), "{} fixture(s) failed:\n\n{}", failures.len(), failures.join("\n\n"));
}
