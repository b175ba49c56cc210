//! Runs fixtures through the engine and compares the results.

use crate::{Fixture, diff_lines, text_lines};
use html::Document;
use html::outline::outline;

#[derive(Debug)]
pub struct FixtureRun {
    pub output: Option<String>,
    pub outline: Vec<String>,
    pub codes: Vec<&'static str>,
    pub exit_status: i32,
}

pub fn run_fixture(fixture: &Fixture) -> Result<FixtureRun, String> {
    let mut doc = Document::from_text(&fixture.input);
    for (name, value) in &fixture.options {
        doc.set_option(name, value)
            .map_err(|err| format!("fixture '{}': {err}", fixture.name))?;
    }
    let exit_status = doc.run();
    Ok(FixtureRun {
        output: doc.output().map(str::to_string),
        outline: outline(doc.dom(), doc.tags(), usize::MAX),
        codes: doc.diagnostics().iter().map(|d| d.code_name()).collect(),
        exit_status,
    })
}

/// Every expectation of `fixture` that `run` misses, as one message.
pub fn check_fixture(fixture: &Fixture, run: &FixtureRun) -> Result<(), String> {
    let mut problems = Vec::new();
    if let Some(expected) = &fixture.output {
        match &run.output {
            Some(actual) if actual == expected => {}
            Some(actual) => problems.push(format!(
                "output differs\n{}",
                diff_lines(&text_lines(expected), &text_lines(actual))
            )),
            None => problems.push("no output produced".to_string()),
        }
    }
    if let Some(expected) = &fixture.outline {
        if *expected != run.outline {
            problems.push(format!("outline differs\n{}", diff_lines(expected, &run.outline)));
        }
    }
    for code in &fixture.codes {
        if !run.codes.contains(&code.as_str()) {
            problems.push(format!("missing diagnostic '{code}' (got {:?})", run.codes));
        }
    }
    for code in &fixture.absent {
        if run.codes.contains(&code.as_str()) {
            problems.push(format!("unexpected diagnostic '{code}'"));
        }
    }
    if let Some(status) = fixture.exit_status {
        if status != run.exit_status {
            problems.push(format!("exit status {} instead of {status}", run.exit_status));
        }
    }
    if problems.is_empty() {
        Ok(())
    } else {
        Err(format!("fixture '{}' ({}):\n{}", fixture.name, fixture.file, problems.join("\n")))
    }
}
