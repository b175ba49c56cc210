//! Argument parsing. Single-dash long flags (`-indent`, `-wrap 72`) are
//! rewritten to their double-dash form before clap sees them, encoding
//! selectors become `char-encoding` settings, and `--<option> <value>` for a
//! registry option is split off as an override.

use clap::Parser;
use clap::error::ErrorKind;
use html::OptionId;
use html::config::lookup_option;
use std::path::PathBuf;

/// Flags that take the single-dash long form.
const LONG_FLAGS: &[&str] = &[
    "indent",
    "omit",
    "wrap",
    "upper",
    "clean",
    "bare",
    "numeric",
    "xml",
    "asxml",
    "asxhtml",
    "ashtml",
    "modify",
    "quiet",
    "errors",
    "config",
    "file",
    "output",
    "access",
    "version",
    "help",
    "help-config",
    "show-config",
    "json",
];

const ENCODINGS: &[&str] = &[
    "raw", "ascii", "latin0", "latin1", "utf8", "mac", "win1252", "ibm858", "utf16le", "utf16be", "utf16",
];

#[derive(Debug, Default, Parser)]
#[command(name = "retidy", disable_help_flag = true, disable_version_flag = true)]
pub struct Flags {
    /// Indent element content
    #[arg(short = 'i', long)]
    pub indent: bool,
    /// Omit optional end tags
    #[arg(long)]
    pub omit: bool,
    /// Wrap text at column N (0 disables wrapping)
    #[arg(short = 'w', long, value_name = "N")]
    pub wrap: Option<u64>,
    /// Force tags to upper case
    #[arg(short = 'u', long)]
    pub upper: bool,
    /// Replace presentational markup with style rules
    #[arg(short = 'c', long)]
    pub clean: bool,
    /// Strip smart quotes, em dashes and vendor markup
    #[arg(short = 'b', long)]
    pub bare: bool,
    /// Output numeric rather than named entities
    #[arg(short = 'n', long)]
    pub numeric: bool,
    /// Input is well-formed XML
    #[arg(long)]
    pub xml: bool,
    /// Convert HTML to well-formed XHTML
    #[arg(long, visible_alias = "asxhtml")]
    pub asxml: bool,
    /// Force XHTML to well-formed HTML
    #[arg(long)]
    pub ashtml: bool,
    /// Write the repaired markup back to the input file
    #[arg(short = 'm', long)]
    pub modify: bool,
    /// Suppress nonessential output
    #[arg(short = 'q', long)]
    pub quiet: bool,
    /// Only report diagnostics, no markup
    #[arg(short = 'e', long)]
    pub errors: bool,
    /// Read options from a configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Write diagnostics to FILE
    #[arg(short = 'f', long, value_name = "FILE")]
    pub file: Option<PathBuf>,
    /// Write the markup to FILE
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,
    /// Accessibility check level (0-3)
    #[arg(long, value_name = "LEVEL")]
    pub access: Option<u8>,
    /// Print the version
    #[arg(short = 'v', long)]
    pub version: bool,
    /// Print usage
    #[arg(short = 'h', long)]
    pub help: bool,
    /// List every configuration option
    #[arg(long = "help-config")]
    pub help_config: bool,
    /// Print the effective configuration
    #[arg(long = "show-config")]
    pub show_config: bool,
    /// Print diagnostics as JSON lines
    #[arg(long)]
    pub json: bool,
    /// Input files; standard input when none are given
    pub inputs: Vec<PathBuf>,
}

impl Flags {
    /// Option settings implied by the flags, as `(option, value)` text.
    pub fn settings(&self) -> Vec<(OptionId, String)> {
        let switches = [
            (self.indent, OptionId::Indent, "auto"),
            (self.omit, OptionId::HideEndtags, "yes"),
            (self.upper, OptionId::UppercaseTags, "yes"),
            (self.clean, OptionId::Clean, "yes"),
            (self.bare, OptionId::Bare, "yes"),
            (self.numeric, OptionId::NumericEntities, "yes"),
            (self.xml, OptionId::InputXml, "yes"),
            (self.asxml, OptionId::OutputXhtml, "yes"),
            (self.ashtml, OptionId::OutputHtml, "yes"),
            (self.modify, OptionId::WriteBack, "yes"),
            (self.quiet, OptionId::Quiet, "yes"),
            (self.errors, OptionId::Markup, "no"),
        ];
        let mut settings: Vec<(OptionId, String)> = switches
            .into_iter()
            .filter(|(on, _, _)| *on)
            .map(|(_, id, value)| (id, value.to_string()))
            .collect();
        if let Some(wrap) = self.wrap {
            settings.push((OptionId::Wrap, wrap.to_string()));
        }
        if let Some(level) = self.access {
            settings.push((OptionId::AccessibilityCheck, level.to_string()));
        }
        if let Some(path) = &self.file {
            settings.push((OptionId::ErrorFile, path.display().to_string()));
        }
        if let Some(path) = &self.output {
            settings.push((OptionId::OutputFile, path.display().to_string()));
        }
        settings
    }
}

/// Parsed command line.
#[derive(Debug)]
pub struct Invocation {
    pub flags: Flags,
    /// Registry settings from encoding selectors and `--name value`, in
    /// command-line order.
    pub overrides: Vec<(String, String)>,
}

/// Parse `args`, program name first.
pub fn parse_args<I>(args: I) -> Result<Invocation, clap::Error>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut forwarded: Vec<String> = args.next().into_iter().collect();
    let mut overrides = Vec::new();
    while let Some(arg) = args.next() {
        if arg == "--" {
            forwarded.push(arg);
            forwarded.extend(args.by_ref());
            break;
        }
        if let Some(rest) = arg.strip_prefix("--") {
            let (name, inline) = match rest.split_once('=') {
                Some((name, value)) => (name, Some(value.to_string())),
                None => (rest, None),
            };
            if lookup_option(name).is_some() {
                let value = match inline {
                    Some(value) => value,
                    None => args.next().ok_or_else(|| {
                        clap::Error::raw(
                            ErrorKind::InvalidValue,
                            format!("missing value for option '--{name}'\n"),
                        )
                    })?,
                };
                overrides.push((name.to_string(), value));
                continue;
            }
            forwarded.push(arg);
            continue;
        }
        match arg.strip_prefix('-') {
            Some(name) if name.len() > 1 && ENCODINGS.contains(&name) => {
                overrides.push(("char-encoding".to_string(), name.to_string()));
            }
            Some(name) if name.len() > 1 && LONG_FLAGS.contains(&name) => {
                forwarded.push(format!("--{name}"));
            }
            _ => forwarded.push(arg),
        }
    }
    let flags = Flags::try_parse_from(forwarded)?;
    Ok(Invocation { flags, overrides })
}
