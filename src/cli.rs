//! Minimal CLI: schema → (describe | check instances)
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;
use serde_json::Value;

use schematype::{Compiler, Registry, TypeDescriptor, Violation};

use crate::config::RegistryConfig;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// compile a JSON Schema into a type descriptor, then inspect it or validate documents against it
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    /// log compiler decisions to stderr (same as RUST_LOG=debug)
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// compile the schema and print the descriptor
    Describe(DescribeOut),
    /// validate JSON documents against the compiled schema
    Check(CheckIn),
}

#[derive(Args, Debug, Clone)]
struct SchemaSettings {
    /// JSON Schema file
    #[arg(long, short)]
    schema: PathBuf,

    /// JSON Pointer selecting the schema node inside the file (e.g. /definitions/Address)
    #[arg(long)]
    json_pointer: Option<String>,

    /// registry file with formats and custom types to load first
    #[arg(long)]
    registry: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct DescribeOut {
    #[command(flatten)]
    schema_settings: SchemaSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct CheckIn {
    #[command(flatten)]
    schema_settings: SchemaSettings,

    /// treat inputs as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

/// Outcome for one document.
struct Report {
    origin: String,
    result: Result<(), Vec<Violation>>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl SchemaSettings {
    fn registry(&self) -> Result<Registry> {
        match self.registry.as_ref() {
            None => Ok(Registry::new()),
            Some(path) => RegistryConfig::load(path)?.build(),
        }
    }

    fn compile(&self) -> Result<TypeDescriptor> {
        let document = read_json(&self.schema)?;
        let node = match self.json_pointer.as_deref() {
            None => &document,
            Some(pointer) => document.pointer(pointer).ok_or_else(|| {
                anyhow!("json pointer {pointer} not found in {}", self.schema.display())
            })?,
        };
        let registry = self.registry()?;
        let ty = Compiler::new(&registry)
            .compile(node)
            .with_context(|| format!("failed to compile {}", self.schema.display()))?;
        tracing::info!(descriptor = %ty, "compiled schema");
        Ok(ty)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    /// Returns `false` when any checked document was rejected.
    pub fn run(&self) -> Result<bool> {
        match &self.cmd {
            Command::Describe(target) => {
                let ty = target.schema_settings.compile()?;
                let out = serde_json::json!({
                    "name": ty.name(),
                    "descriptor": ty.describe(),
                });
                let src = serde_json::to_string_pretty(&out)?;
                match target.out.as_ref() {
                    Some(path) => {
                        if let Some(parent) = path.parent() {
                            std::fs::create_dir_all(parent)?;
                        }
                        std::fs::write(path, &src)?;
                    }
                    None => println!("{src}"),
                }
                Ok(true)
            }
            Command::Check(target) => {
                let ty = target.schema_settings.compile()?;
                let paths = resolve_file_path_patterns(&target.input)?;
                let reports = paths
                    .par_iter()
                    .map(|path| check_file(&ty, path, target.ndjson))
                    .collect::<Result<Vec<_>>>()?;

                let mut all_ok = true;
                for report in reports.iter().flatten() {
                    match &report.result {
                        Ok(()) => eprintln!("{} {}", "✅".green(), report.origin),
                        Err(violations) => {
                            all_ok = false;
                            eprintln!("{} {}", "❌".red(), report.origin.bold());
                            for violation in violations {
                                eprintln!("    {violation}");
                            }
                        }
                    }
                }
                Ok(all_ok)
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn read_json(path: &Path) -> Result<Value> {
    let source = std::fs::read(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_slice(&source)
        .with_context(|| format!("failed to parse JSON file {}", path.display()))
}

fn check_file(ty: &TypeDescriptor, path: &Path, ndjson: bool) -> Result<Vec<Report>> {
    let origin = path.display().to_string();
    if !ndjson {
        let value = read_json(path)?;
        return Ok(vec![Report { origin, result: ty.validate(&value) }]);
    }
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {origin}"))?;
    source
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            let value: Value = serde_json::from_str(line)
                .with_context(|| format!("failed to parse {origin}:{}", i + 1))?;
            Ok(Report { origin: format!("{origin}:{}", i + 1), result: ty.validate(&value) })
        })
        .collect()
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
        if !has_glob_chars(pattern) {
            out.push(PathBuf::from(pattern));
            continue;
        }
        let before = out.len();
        for entry in glob::glob(pattern)? {
            out.push(entry?);
        }
        if out.len() == before {
            return Err(anyhow!("glob pattern matched no files: {pattern}"));
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_paths_pass_through() {
        let paths = resolve_file_path_patterns(["a.json", "dir/b.json"]).unwrap();
        assert_eq!(paths, [PathBuf::from("a.json"), PathBuf::from("dir/b.json")]);
    }

    #[test]
    fn empty_glob_is_an_error() {
        assert!(resolve_file_path_patterns(["/nonexistent-dir-for-schematype/*.json"]).is_err());
    }

    #[test]
    fn ndjson_reports_per_line() {
        let dir = std::env::temp_dir().join(format!("schematype-cli-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let file = dir.join("docs.ndjson");
        std::fs::write(&file, "1\n\n\"x\"\n2\n").unwrap();

        let ty = schematype::compile(&serde_json::json!({"type": "number"})).unwrap();
        let reports = check_file(&ty, &file, true).unwrap();
        let verdicts: Vec<_> = reports.iter().map(|r| r.result.is_ok()).collect();
        assert_eq!(verdicts, [true, false, true]);
        assert!(reports[1].origin.ends_with(":3"));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
