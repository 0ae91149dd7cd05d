//! Minimal CLI: check JSON/NDJSON documents against a schema file, or explain a type token.
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use shape_guard::{SchemaDocument, TypeToken, Value};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// check runtime values against a structural type definition
#[derive(Parser, Debug)]
#[command(name = "shape-guard", version)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// validate every input document against a schema file
    Check(CheckOut),
    /// show how a type token such as `string[]?` is read
    Token(TokenArgs),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JSON Pointer to select a subnode in each document (e.g. /data/items/0/payload)
    #[arg(long)]
    json_pointer: Option<String>,

    /// JQ pre-process filter for each document.
    #[arg(long)]
    jq_expr: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct CheckOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// schema file: a JSON definition, or `{ "definition": .., "options": .. }`
    #[arg(long, short)]
    schema: PathBuf,

    /// override the schema's definition depth ceiling
    #[arg(long)]
    max_depth: Option<usize>,

    /// report format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct TokenArgs {
    /// the token to parse, e.g. `number[]?`
    token: String,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Text,
    Json,
}

/// One document pulled from the inputs, labelled for reporting.
#[derive(Debug)]
struct Document {
    label: String,
    json: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct Outcome {
    document: String,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_documents(&self) -> Result<Vec<Document>> {
        let source_paths = resolve_file_path_patterns(&self.input)
            .context("failed to resolve input file paths")?;
        let mut out = Vec::new();
        for source_path in source_paths {
            let source_path_str = source_path.to_string_lossy().to_string();
            let source = std::fs::read_to_string(&source_path)
                .with_context(|| format!("failed to read source file ({source_path_str})"))?;
            debug!(path = %source_path_str, bytes = source.len(), "loaded input");

            let mut parsed = Vec::new();
            if self.ndjson {
                for (line_no, line) in source.lines().enumerate() {
                    if line.trim().is_empty() {
                        continue;
                    }
                    let json = serde_json::from_str::<serde_json::Value>(line).with_context(|| {
                        format!("failed to parse NDJSON line ({source_path_str}:{})", line_no + 1)
                    })?;
                    parsed.push((format!("{source_path_str}:{}", line_no + 1), json));
                }
            } else {
                let json = serde_json::from_str::<serde_json::Value>(&source)
                    .with_context(|| format!("failed to parse JSON source file ({source_path_str})"))?;
                parsed.push((source_path_str.clone(), json));
            }

            for (label, json) in parsed {
                self.select(label, json, &mut out)?;
            }
        }
        Ok(out)
    }

    /// Apply `--json-pointer` then `--jq-expr`; a jq filter may fan out.
    fn select(&self, label: String, json: serde_json::Value, out: &mut Vec<Document>) -> Result<()> {
        let json = match self.json_pointer.as_deref() {
            None => json,
            Some(pointer) => match json.pointer(pointer) {
                Some(node) => node.clone(),
                None => bail!("JSON pointer {pointer} selects nothing in {label}"),
            },
        };
        match self.jq_expr.as_deref() {
            None => out.push(Document { label, json }),
            Some(jq_expr) => {
                let results = crate::jq_exec::run_jaq(jq_expr, &json)
                    .with_context(|| format!("failed to apply jq expression to {label}"))?;
                for (index, json) in results.into_iter().enumerate() {
                    out.push(Document { label: format!("{label}#{index}"), json });
                }
            }
        }
        Ok(())
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<ExitCode> {
        match &self.cmd {
            Command::Check(target) => target.run(),
            Command::Token(target) => {
                println!("{}", explain_token(&target.token));
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

impl CheckOut {
    fn run(&self) -> Result<ExitCode> {
        // 1) schema
        let schema_src = std::fs::read_to_string(&self.schema)
            .with_context(|| format!("failed to read schema file ({})", self.schema.display()))?;
        let mut schema = SchemaDocument::parse(&schema_src)
            .with_context(|| format!("invalid schema file ({})", self.schema.display()))?;
        if self.max_depth.is_some() {
            schema.options.max_depth = self.max_depth;
        }
        let validator = schema.validator();

        // 2) documents
        let documents = self.input_settings.load_documents()?;
        info!(documents = documents.len(), schema = %self.schema.display(), "checking");

        // 3) check in parallel; the definition is shared read-only
        let outcomes: Vec<Outcome> = documents
            .into_par_iter()
            .map(|doc| {
                let value = Value::from(doc.json);
                match validator.validate(&value, &schema.definition) {
                    Ok(valid) => Outcome { document: doc.label, valid, error: None },
                    Err(error) => Outcome { document: doc.label, valid: false, error: Some(error.to_string()) },
                }
            })
            .collect();

        // 4) report
        let report = match self.format {
            Format::Text => render_text(&outcomes),
            Format::Json => serde_json::to_string_pretty(&outcomes)?,
        };
        if let Some(out) = self.out.as_ref() {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(out, &report)
                .with_context(|| format!("failed to write report ({})", out.display()))?;
        } else {
            println!("{report}");
        }

        let failed = outcomes.iter().filter(|o| !o.valid).count();
        info!(failed, total = outcomes.len(), "done");
        Ok(if failed == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE })
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn render_text(outcomes: &[Outcome]) -> String {
    let mut lines: Vec<String> = outcomes
        .iter()
        .map(|o| match (&o.error, o.valid) {
            (Some(error), _) => format!("{} {}: {}", "⚠".yellow(), o.document, error),
            (None, true) => format!("{} {}", "✅".green(), o.document),
            (None, false) => format!("{} {}", "❌".red(), o.document),
        })
        .collect();
    let passed = outcomes.iter().filter(|o| o.valid).count();
    let summary = format!("{passed}/{} documents conform", outcomes.len());
    lines.push(summary.as_str().bold().to_string());
    lines.join("\n")
}

fn explain_token(src: &str) -> String {
    let Some(token) = TypeToken::parse(src) else {
        return format!("{src:?} is not a type token; it matches no value");
    };
    let mut out = vec![
        format!("base:     {}", token.base),
        format!("array:    {}", token.array),
        format!("optional: {}", token.optional),
    ];
    if token.optional {
        out.push(format!("reads as: union(null, undefined, {:?})", token.without_optional().to_string()));
    } else if token.array {
        out.push(format!("reads as: arrayOf({:?})", token.element().to_string()));
    } else if token.is_wildcard() {
        out.push("reads as: any value".to_string());
    } else {
        out.push(format!("reads as: values whose runtime kind is `{}`", token.base));
    }
    out.join("\n")
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shape_guard::SchemaError;

    #[test]
    fn explains_tokens() {
        assert!(explain_token("string[]?").contains("union(null, undefined, \"string[]\")"));
        assert!(explain_token("number[]").contains("arrayOf(\"number\")"));
        assert!(explain_token("any").contains("any value"));
        assert!(explain_token("a b").contains("not a type token"));
    }

    #[test]
    fn literal_paths_pass_through() {
        let paths = resolve_file_path_patterns(["a.json", "dir/b.json"]).unwrap();
        assert_eq!(paths, vec![PathBuf::from("a.json"), PathBuf::from("dir/b.json")]);
        assert!(resolve_file_path_patterns(["/definitely/not/here/*.json"]).is_err());
    }

    #[test]
    fn pointer_and_jq_select_documents() {
        let settings = InputSettings {
            ndjson: false,
            json_pointer: Some("/data".into()),
            jq_expr: Some(".[]".into()),
            input: vec![],
        };
        let mut out = Vec::new();
        settings
            .select("doc".into(), serde_json::json!({"data": [1, 2]}), &mut out)
            .unwrap();
        let labels: Vec<&str> = out.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, ["doc#0", "doc#1"]);

        let mut out = Vec::new();
        let missing = InputSettings { jq_expr: None, ..settings };
        assert!(missing.select("doc".into(), serde_json::json!({}), &mut out).is_err());
    }

    #[test]
    fn text_report_counts_conforming_documents() {
        colored::control::set_override(false);
        let report = render_text(&[
            Outcome { document: "a".into(), valid: true, error: None },
            Outcome { document: "b".into(), valid: false, error: None },
            Outcome {
                document: "c".into(),
                valid: false,
                error: Some(SchemaError::DepthLimitExceeded { limit: 1 }.to_string()),
            },
        ]);
        assert_eq!(report.lines().last(), Some("1/3 documents conform"));
        assert!(report.contains("❌ b"));
        assert!(report.contains("⚠ c: definition nesting exceeds"));
    }
}
