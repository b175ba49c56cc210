//! Command-line driver: turns tidy-style arguments into option settings,
//! repairs each input and routes markup and diagnostics to their streams.
//!
//! Settings are layered as defaults, then the `-config` file, then flags,
//! then `--name value` overrides.

mod args;
mod help;

pub use args::{Flags, Invocation, parse_args};

use html::{Diagnostic, Document, FatalError, OptionId, Options, Severity};
use std::fmt::Write as _;
use std::fs;
use std::io::{Read, Write};
use std::path::Path;

/// The streams a run reads from and writes to.
pub struct Stdio<'a> {
    pub stdin: &'a mut dyn Read,
    pub stdout: &'a mut dyn Write,
    pub stderr: &'a mut dyn Write,
}

/// Install `env_logger`, filtering at `warn` unless `RUST_LOG` says otherwise.
pub fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("warn");
    let _ = env_logger::Builder::from_env(env).try_init();
}

/// Run the command line `args` (program name first) and return the exit
/// status: 0 clean, 1 warnings, 2 errors or a fatal condition.
pub fn run<I>(args: I, io: &mut Stdio<'_>) -> i32
where
    I: IntoIterator<Item = String>,
{
    let invocation = match parse_args(args) {
        Ok(invocation) => invocation,
        Err(err) => {
            let _ = write!(io.stderr, "{err}");
            return 2;
        }
    };
    let flags = &invocation.flags;
    if flags.help {
        let _ = io.stdout.write_all(help::usage().as_bytes());
        return 0;
    }
    if flags.version {
        let _ = writeln!(io.stdout, "retidy version {}", env!("CARGO_PKG_VERSION"));
        return 0;
    }
    if flags.help_config {
        let _ = io.stdout.write_all(help::option_table().as_bytes());
        return 0;
    }
    let settings = match configure(&invocation) {
        Ok(settings) => settings,
        Err(err) => {
            let _ = writeln!(io.stderr, "retidy: {err}");
            return 2;
        }
    };
    let options = settings.options();
    if flags.show_config {
        let _ = io.stdout.write_all(help::current_config(options).as_bytes());
        return 0;
    }

    let mut messages = String::new();
    describe(&settings, None, flags.json, &mut messages);
    let mut status = 0;
    if flags.inputs.is_empty() {
        status = repair_one(None, options, flags.json, false, io, &mut messages);
    } else {
        for (index, input) in flags.inputs.iter().enumerate() {
            let append = index > 0;
            status = status.max(repair_one(Some(input), options, flags.json, append, io, &mut messages));
        }
    }
    if let Err(err) = emit_messages(options, &messages, io) {
        let _ = writeln!(io.stderr, "retidy: {err}");
        return 2;
    }
    status
}

fn configure(invocation: &Invocation) -> Result<Document, FatalError> {
    let mut doc = Document::new();
    if let Some(path) = &invocation.flags.config {
        doc.load_config_file(path)?;
    }
    // Rejected settings are recorded on the document and listed with the
    // other diagnostics.
    for (id, value) in invocation.flags.settings() {
        let _ = doc.set_option_by_id(id, &value);
    }
    for (name, value) in &invocation.overrides {
        let _ = doc.set_option(name, value);
    }
    doc.options_mut().adjust();
    let changed = doc.options().iter().filter(|(def, _)| !doc.options().is_default(def.id)).count();
    log::debug!(target: "cli", "{changed} option(s) differ from the defaults");
    Ok(doc)
}

fn repair_one(
    input: Option<&Path>,
    options: &Options,
    json: bool,
    append: bool,
    io: &mut Stdio<'_>,
    messages: &mut String,
) -> i32 {
    match try_repair(input, options, json, append, io, messages) {
        Ok(status) => status,
        Err(err) => {
            let _ = writeln!(messages, "retidy: {err}");
            2
        }
    }
}

/// Repair one input. With several inputs, `append` is set after the first
/// so they share the output file instead of overwriting it.
fn try_repair(
    input: Option<&Path>,
    options: &Options,
    json: bool,
    append: bool,
    io: &mut Stdio<'_>,
    messages: &mut String,
) -> Result<i32, FatalError> {
    let mut doc = Document::new();
    *doc.options_mut() = options.clone();
    match input {
        Some(path) => doc.load_file(path)?,
        None => doc.load_reader(&mut *io.stdin)?,
    }
    let status = doc.run();
    describe(&doc, input, json, messages);
    if !json && !options.bool(OptionId::Quiet) {
        summarize(&doc, messages);
    }
    let Some(bytes) = doc.output_bytes() else {
        return Ok(status);
    };
    let output_file = options.string(OptionId::OutputFile);
    match input {
        Some(path) if options.bool(OptionId::WriteBack) => {
            fs::write(path, &bytes).map_err(FatalError::Write)?;
        }
        _ if !output_file.is_empty() => {
            let mut file = fs::OpenOptions::new()
                .create(true)
                .write(true)
                .append(append)
                .truncate(!append)
                .open(output_file)
                .map_err(FatalError::Write)?;
            file.write_all(&bytes).map_err(FatalError::Write)?;
        }
        _ => io.stdout.write_all(&bytes).map_err(FatalError::Write)?,
    }
    Ok(status)
}

/// Append the visible diagnostics of `doc` as text or JSON lines.
fn describe(doc: &Document, input: Option<&Path>, json: bool, out: &mut String) {
    let emacs = doc.options().bool(OptionId::GnuEmacs);
    for diagnostic in doc.visible_diagnostics() {
        if json {
            match serde_json::to_string(diagnostic) {
                Ok(line) => {
                    let _ = writeln!(out, "{line}");
                }
                Err(err) => log::warn!(target: "cli", "cannot serialize diagnostic: {err}"),
            }
        } else {
            let _ = writeln!(out, "{}", format_diagnostic(diagnostic, input, emacs));
        }
    }
}

fn format_diagnostic(diagnostic: &Diagnostic, input: Option<&Path>, emacs: bool) -> String {
    match input {
        Some(path) if emacs && diagnostic.severity != Severity::Config => format!(
            "{}:{}:{}: {}: {}",
            path.display(),
            diagnostic.line,
            diagnostic.column,
            diagnostic.severity.label(),
            diagnostic.message
        ),
        _ => diagnostic.to_string(),
    }
}

fn summarize(doc: &Document, out: &mut String) {
    let (warnings, access, errors) = (doc.warnings(), doc.access_warnings(), doc.errors());
    if warnings + access + errors == 0 {
        let _ = writeln!(out, "No warnings or errors were found.");
        return;
    }
    let plural = |n: usize, word: &str| if n == 1 { format!("{n} {word}") } else { format!("{n} {word}s") };
    let mut line = plural(warnings, "warning");
    if access > 0 {
        let _ = write!(line, ", {}", plural(access, "accessibility warning"));
    }
    let _ = writeln!(out, "{line}, {} were found!", plural(errors, "error"));
    if doc.output().is_none() && errors > 0 {
        let _ = writeln!(
            out,
            "This document has errors that must be fixed before retidy can generate a repaired version."
        );
    }
}

fn emit_messages(options: &Options, messages: &str, io: &mut Stdio<'_>) -> Result<(), FatalError> {
    let error_file = options.string(OptionId::ErrorFile);
    if error_file.is_empty() {
        io.stderr.write_all(messages.as_bytes()).map_err(FatalError::Write)
    } else {
        fs::write(error_file, messages).map_err(FatalError::Write)
    }
}
