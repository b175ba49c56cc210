//! Repair fixtures stored as TOML files.
//!
//! Each file holds one or more `[[case]]` tables:
//!
//! ```toml
//! [[case]]
//! name = "unclosed-paragraph"
//! input = "<p>text"
//! options = { tidy-mark = "no" }
//! codes = ["missing-doctype"]
//! output = """
//! ...
//! """
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FixtureStatus {
    #[default]
    Active,
    /// Known to fail; the run must still complete.
    Xfail,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Fixture {
    pub name: String,
    pub input: String,
    /// Option names and textual values applied before the run.
    #[serde(default)]
    pub options: BTreeMap<String, String>,
    /// Expected printed output, compared line by line.
    pub output: Option<String>,
    /// Expected tree outline after repair.
    pub outline: Option<Vec<String>>,
    /// Diagnostic codes that must be reported.
    #[serde(default)]
    pub codes: Vec<String>,
    /// Diagnostic codes that must not be reported.
    #[serde(default)]
    pub absent: Vec<String>,
    pub exit_status: Option<i32>,
    #[serde(default)]
    pub status: FixtureStatus,
    pub reason: Option<String>,
    /// Source file, filled in by the loader.
    #[serde(skip)]
    pub file: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FixtureFile {
    #[serde(default)]
    case: Vec<Fixture>,
}

/// Every fixture in the `*.toml` files of `dir`, ordered by file then case.
pub fn load_fixtures(dir: &Path) -> Vec<Fixture> {
    let entries = fs::read_dir(dir).unwrap_or_else(|err| panic!("failed to read fixture dir {dir:?}: {err}"));
    let mut paths: Vec<_> = entries
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    paths.sort();
    let mut fixtures = Vec::new();
    for path in paths {
        let text = fs::read_to_string(&path).unwrap_or_else(|err| panic!("failed to read {path:?}: {err}"));
        let file: FixtureFile = toml::from_str(&text).unwrap_or_else(|err| panic!("invalid fixture file {path:?}: {err}"));
        let label = path.file_name().map_or_else(String::new, |n| n.to_string_lossy().into_owned());
        for mut fixture in file.case {
            assert!(
                fixture.status == FixtureStatus::Active || fixture.reason.is_some(),
                "xfail fixture '{}' in {label} needs a reason",
                fixture.name
            );
            fixture.file.clone_from(&label);
            fixtures.push(fixture);
        }
    }
    let mut names: Vec<&str> = fixtures.iter().map(|f| f.name.as_str()).collect();
    names.sort_unstable();
    if let Some(pair) = names.windows(2).find(|w| w[0] == w[1]) {
        panic!("duplicate fixture name '{}'", pair[0]);
    }
    fixtures
}

/// Substring filter on fixture names, read from `RETIDY_FIXTURE`.
#[derive(Clone, Debug, Default)]
pub struct FixtureFilter {
    needle: Option<String>,
}

impl FixtureFilter {
    pub fn from_env() -> Self {
        Self {
            needle: env::var("RETIDY_FIXTURE").ok().filter(|s| !s.is_empty()),
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        self.needle.as_deref().is_none_or(|n| name.contains(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cases_with_defaults() {
        let text = r#"
[[case]]
name = "a"
input = "<p>x"
codes = ["missing-doctype"]

[[case]]
name = "b"
input = ""
options = { indent = "auto" }
status = "xfail"
reason = "not yet"
"#;
        let file: FixtureFile = toml::from_str(text).unwrap();
        assert_eq!(file.case.len(), 2);
        assert_eq!(file.case[0].status, FixtureStatus::Active);
        assert_eq!(file.case[1].options["indent"], "auto");
        assert_eq!(file.case[1].status, FixtureStatus::Xfail);
    }

    #[test]
    fn filter_matches_substrings() {
        let filter = FixtureFilter {
            needle: Some("table".into()),
        };
        assert!(filter.matches("table-inference"));
        assert!(!filter.matches("lists"));
        assert!(FixtureFilter::default().matches("anything"));
    }
}
