use cli::{Stdio, run};
use std::fs;

struct Outcome {
    status: i32,
    stdout: String,
    stderr: String,
}

fn run_with(args: &[&str], stdin: &str) -> Outcome {
    let mut input = stdin.as_bytes();
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let status = {
        let mut io = Stdio {
            stdin: &mut input,
            stdout: &mut stdout,
            stderr: &mut stderr,
        };
        let args = std::iter::once("retidy").chain(args.iter().copied()).map(str::to_string);
        run(args, &mut io)
    };
    Outcome {
        status,
        stdout: String::from_utf8(stdout).unwrap(),
        stderr: String::from_utf8(stderr).unwrap(),
    }
}

#[test]
fn repairs_standard_input() {
    let out = run_with(&["--show-body-only", "yes"], "<p>one<p>two");
    assert_eq!(out.status, 1);
    assert_eq!(out.stdout, "<p>one</p>\n<p>two</p>\n");
    assert!(out.stderr.contains("Warning: missing <!DOCTYPE> declaration"), "{}", out.stderr);
    assert!(out.stderr.contains("were found!"), "{}", out.stderr);
}

#[test]
fn quiet_drops_the_summary() {
    let out = run_with(&["-q", "--show-body-only", "yes"], "<p>x");
    assert!(!out.stderr.contains("were found"), "{}", out.stderr);
}

#[test]
fn errors_only_mode_prints_no_markup() {
    let out = run_with(&["-e"], "<p>x");
    assert_eq!(out.status, 1);
    assert!(out.stdout.is_empty());
    assert!(!out.stderr.is_empty());
}

#[test]
fn unknown_element_exit_status() {
    let out = run_with(&[], "<p><blink2>x</blink2></p>");
    assert_eq!(out.status, 2);
    assert!(out.stdout.is_empty());
    assert!(out.stderr.contains("must be fixed"), "{}", out.stderr);
}

#[test]
fn json_diagnostics() {
    let out = run_with(&["-json", "-q"], "<p>x");
    let lines: Vec<serde_json::Value> = out
        .stderr
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert!(lines.iter().any(|v| v["code"] == "missing-doctype"), "{}", out.stderr);
    assert!(lines.iter().all(|v| v["severity"].is_string() && v["line"].is_u64()));
}

#[test]
fn single_dash_flags_shape_output() {
    let out = run_with(&["-upper", "-omit", "--show-body-only", "yes"], "<p>a<p>b");
    assert_eq!(out.stdout, "<P>a\n<P>b\n");
}

#[test]
fn files_config_and_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("page.html");
    let config = dir.path().join("retidy.conf");
    let output = dir.path().join("out.html");
    let errors = dir.path().join("errors.txt");
    fs::write(&input, "<title>t</title><p>x").unwrap();
    fs::write(&config, "// settings\nshow-body-only: yes\nbogus-option: 1\n").unwrap();
    let out = run_with(
        &[
            "-config",
            config.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "-f",
            errors.to_str().unwrap(),
            input.to_str().unwrap(),
        ],
        "",
    );
    assert_eq!(out.status, 1);
    assert!(out.stdout.is_empty());
    assert_eq!(fs::read_to_string(&output).unwrap(), "<p>x</p>\n");
    let report = fs::read_to_string(&errors).unwrap();
    assert!(report.contains("bogus-option"), "{report}");
}

#[test]
fn several_inputs_share_the_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("one.html");
    let second = dir.path().join("two.html");
    let output = dir.path().join("out.html");
    fs::write(&first, "<p>one").unwrap();
    fs::write(&second, "<p>two").unwrap();
    fs::write(&output, "stale\n").unwrap();
    let out = run_with(
        &[
            "-q",
            "--show-body-only",
            "yes",
            "-o",
            output.to_str().unwrap(),
            first.to_str().unwrap(),
            second.to_str().unwrap(),
        ],
        "",
    );
    assert_eq!(out.status, 1);
    assert_eq!(fs::read_to_string(&output).unwrap(), "<p>one</p>\n<p>two</p>\n");
}

#[test]
fn modify_writes_back() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("page.html");
    fs::write(&input, "<p>x").unwrap();
    let out = run_with(&["-m", "-q", "--tidy-mark", "no", input.to_str().unwrap()], "");
    assert_eq!(out.status, 1);
    let written = fs::read_to_string(&input).unwrap();
    assert!(written.starts_with("<!DOCTYPE html>\n"), "{written}");
    assert!(written.contains("<p>x</p>"));
}

#[test]
fn missing_input_file_is_fatal() {
    let out = run_with(&["/nonexistent/retidy/input.html"], "");
    assert_eq!(out.status, 2);
    assert!(out.stderr.contains("cannot open"), "{}", out.stderr);
}

#[test]
fn help_and_version() {
    let out = run_with(&["-help"], "");
    assert_eq!(out.status, 0);
    assert!(out.stdout.contains("-asxhtml"));
    let out = run_with(&["-v"], "");
    assert!(out.stdout.starts_with("retidy version "));
    let out = run_with(&["-show-config", "--wrap", "40"], "");
    assert!(out.stdout.lines().any(|l| l.starts_with("* wrap ") && l.ends_with(" 40")), "{}", out.stdout);
}

#[test]
fn bad_arguments_exit_with_two() {
    let out = run_with(&["-wrap", "many"], "");
    assert_eq!(out.status, 2);
    assert!(!out.stderr.is_empty());
}
