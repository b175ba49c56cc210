//! Usage text and option listings.

use html::Options;
use std::fmt::Write;

pub fn usage() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!(
        "retidy {version}: repair and reformat HTML, XHTML and XML

Usage: retidy [options...] [file...]

Processing directives:
  -indent, -i            indent element content
  -omit                  omit optional end tags
  -wrap <n>, -w <n>      wrap text at column <n> (0 disables wrapping)
  -upper, -u             force tags to upper case
  -clean, -c             replace font, nobr and center tags by CSS
  -bare, -b              strip out smart quotes and em dashes
  -numeric, -n           output numeric rather than named entities
  -errors, -e            show only errors and warnings
  -quiet, -q             suppress nonessential output
  -xml                   specify the input is well formed XML
  -asxml, -asxhtml       convert HTML to well formed XHTML
  -ashtml                force XHTML to well formed HTML
  -access <level>        do additional accessibility checks (0-3)

Character encodings:
  -raw -ascii -latin0 -latin1 -utf8 -mac -win1252 -ibm858
  -utf16le -utf16be -utf16

File manipulation:
  -config <file>         set configuration options from <file>
  -file <file>, -f       write errors and warnings to <file>
  -output <file>, -o     write output to <file>
  -modify, -m            modify the original input files

Miscellaneous:
  -json                  print diagnostics as JSON lines
  -version, -v           show the version
  -help, -h              list the command line options
  -help-config           list all configuration options
  -show-config           list the current configuration settings

Any configuration option can also be given as --<name> <value>.
"
    )
}

/// Every registry option with its type, category and default.
pub fn option_table() -> String {
    let defaults = Options::new();
    let mut out = String::new();
    let _ = writeln!(out, "{:<28} {:<12} {:<14} Default", "Name", "Type", "Category");
    for (def, _) in defaults.iter() {
        let _ = writeln!(
            out,
            "{:<28} {:<12} {:<14} {}",
            def.name,
            def.kind.label(),
            def.category.label(),
            defaults.serialize(def.id)
        );
    }
    out
}

/// Current values; changed settings are starred.
pub fn current_config(options: &Options) -> String {
    let mut out = String::new();
    for (def, _) in options.iter() {
        let mark = if options.is_default(def.id) { ' ' } else { '*' };
        let _ = writeln!(out, "{mark} {:<28} {}", def.name, options.serialize(def.id));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use html::OptionId;

    #[test]
    fn table_lists_defaults() {
        let table = option_table();
        let wrap = table.lines().find(|l| l.starts_with("wrap ")).unwrap();
        assert!(wrap.ends_with(" 68"), "{wrap}");
    }

    #[test]
    fn changed_values_are_marked() {
        let mut options = Options::new();
        options.parse(OptionId::Indent, "auto").unwrap();
        let config = current_config(&options);
        assert!(config.lines().any(|l| l.starts_with("* indent ") && l.ends_with("auto")), "{config}");
        assert!(config.lines().any(|l| l.starts_with("  wrap ")));
    }
}
