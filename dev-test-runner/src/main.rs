//! Runs the JSON oracle cases in `cases/` through `shape_guard::validate`.
//!
//! Usage: `dev-test-runner [NAME_REGEX]`. Each case file is
//! `{ "name": .., "definition": <json definition>, "cases": [{ "value": .., "expect": bool }] }`.
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use colored::Colorize;
use regex::Regex;
use serde::Deserialize;
use shape_guard::path_de;
use shape_guard::{validate, Definition, Value};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CaseFile {
    name: String,
    definition: Definition,
    cases: Vec<Case>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Case {
    value: serde_json::Value,
    expect: bool,
    #[serde(default)]
    note: Option<String>,
}

#[derive(Default)]
struct Tally {
    passed: usize,
    failed: usize,
}

fn main() -> ExitCode {
    let filter = match std::env::args().nth(1).map(|src| Regex::new(&src)).transpose() {
        Ok(filter) => filter,
        Err(error) => {
            eprintln!("invalid name filter: {error}");
            return ExitCode::FAILURE;
        }
    };
    let cases_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("cases");
    let files = match case_files(&cases_dir) {
        Ok(files) => files,
        Err(error) => {
            eprintln!("failed to list {}: {error}", cases_dir.display());
            return ExitCode::FAILURE;
        }
    };

    let mut tally = Tally::default();
    for path in files {
        let case_file = match load(&path) {
            Ok(x) => x,
            Err(error) => {
                eprintln!("❌ {}: {error}", path.display());
                tally.failed += 1;
                continue;
            }
        };
        if filter.as_ref().is_some_and(|re| !re.is_match(&case_file.name)) {
            continue;
        }
        run_file(&case_file, &mut tally);
    }

    let summary = format!("{} passed, {} failed", tally.passed, tally.failed);
    if tally.failed == 0 {
        eprintln!("{}", summary.as_str().green());
        ExitCode::SUCCESS
    } else {
        eprintln!("{}", summary.as_str().red());
        ExitCode::FAILURE
    }
}

fn case_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn load(path: &Path) -> Result<CaseFile, String> {
    let source = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    path_de::from_str_with_path::<CaseFile>(&source).map_err(|e| e.to_string())
}

fn run_file(case_file: &CaseFile, tally: &mut Tally) {
    eprintln!("—— {} ——", case_file.name);
    for (index, case) in case_file.cases.iter().enumerate() {
        let label = case.note.as_deref().map_or_else(|| format!("#{index}"), |note| format!("#{index} {note}"));
        let value = Value::from(case.value.clone());
        match validate(&value, &case_file.definition) {
            Ok(actual) if actual == case.expect => tally.passed += 1,
            Ok(actual) => {
                tally.failed += 1;
                eprintln!("❌ {label}: expected {}, got {actual} for {}", case.expect, case.value);
            }
            Err(error) => {
                tally.failed += 1;
                eprintln!("❌ {label}: {error}");
            }
        }
    }
}
