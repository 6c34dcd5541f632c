//! Debug CLI: convert host type graphs → type model, check persisted types.
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use serde_json::Value;
use tracing::debug;

use crate::adt::Type;
use crate::converter::{Converter, ConverterOptions};
use crate::graph::{Location, TypeGraph};
use crate::host::TypeHost;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// convert checker type graphs into the portable type model, or check persisted type documents
#[derive(Parser, Debug)]
#[command(name = "typemodel")]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// convert every located type of each graph and print it next to the checker's rendering
    Convert(ConvertOut),
    /// decode persisted type documents, re-encode them and report whether nothing was lost
    Roundtrip(RoundtripOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Render {
    /// compact rendering, e.g. `{x: number; y?: string}`
    #[default]
    Text,
    /// pretty-printed JSON encoding
    Json,
    Both,
}

#[derive(clap::Parser, Debug)]
struct ConvertOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// project root; local declaration files are reported relative to it
    #[arg(long)]
    source_root: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Render::Text)]
    render: Render,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct RoundtripOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn source_paths(&self) -> anyhow::Result<Vec<PathBuf>> {
        resolve_file_path_patterns(&self.input).context("failed to resolve input file paths")
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    /// `Ok(false)` when some input did not pass.
    pub fn run(&self) -> anyhow::Result<bool> {
        match &self.cmd {
            Command::Convert(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(true)
                }
                target.run()
            }
            Command::Roundtrip(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(true)
                }
                target.run()
            }
        }
    }
}

impl ConvertOut {
    fn run(&self) -> anyhow::Result<bool> {
        let source_paths = self.input_settings.source_paths()?;
        if self.out.is_some() {
            colored::control::set_override(false);
        }
        let options = ConverterOptions {
            source_root: self.source_root.clone(),
            ..ConverterOptions::default()
        };

        // one converter per graph; graphs are independent
        let reports = source_paths
            .par_iter()
            .map(|path| convert_file(path, &options, self.render))
            .collect::<anyhow::Result<Vec<String>>>()?;

        let output = reports.join("\n");
        if let Some(out) = self.out.as_ref() {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(out, &output)
                .with_context(|| format!("failed to write {}", out.display()))?;
        } else {
            print!("{output}");
        }
        Ok(true)
    }
}

impl RoundtripOut {
    fn run(&self) -> anyhow::Result<bool> {
        let source_paths = self.input_settings.source_paths()?;
        let mut all_passed = true;
        for source_path in source_paths {
            let source = std::fs::read_to_string(&source_path)
                .with_context(|| format!("failed to read {}", source_path.display()))?;
            let document = serde_json::from_str::<Value>(&source)
                .with_context(|| format!("failed to parse JSON source file ({})", source_path.display()))?;
            let records = match document {
                Value::Array(records) => records,
                record => vec![record],
            };
            for (index, record) in records.into_iter().enumerate() {
                let label = format!("{}[{index}]", source_path.display());
                all_passed &= check_round_trip(&label, record);
            }
        }
        Ok(all_passed)
    }
}

fn check_round_trip(label: &str, record: Value) -> bool {
    let decoded = match crate::json::decode(record.clone()) {
        Ok(ty) => ty,
        Err(error) => {
            println!("{} {label}: {error}", "✗".red());
            return false;
        }
    };
    let encoded = crate::json::encode(&decoded);
    match crate::json::decode(encoded.clone()) {
        Ok(again) if again == decoded => {
            // e.g. `1.0` written back as `1`, or a missing list filled in
            let note = if encoded == record { "" } else { " (normalized)" };
            println!("{} {label}{note}: {decoded}", "✓".green());
            true
        }
        Ok(again) => {
            println!("{} {label}: {decoded} came back as {again}", "✗".red());
            false
        }
        Err(error) => {
            println!("{} {label}: re-encoded record no longer decodes: {error}", "✗".red());
            false
        }
    }
}

fn convert_file(path: &Path, options: &ConverterOptions, render: Render) -> anyhow::Result<String> {
    let graph = TypeGraph::load(path)?;
    debug!(path = %path.display(), types = graph.types.len(), "loaded type graph");
    let mut report = format!("{}\n", format!("// {}", path.display()).dimmed());
    for (location, ty) in convert_locations(&graph, options.clone()) {
        report.push_str(&format!(
            "{} @ {} : {} ➡\n{}\n\n",
            location.text.bold(),
            location.position,
            graph.type_to_string(location.ty).cyan(),
            indent(&render_type(&ty, render), "    "),
        ));
    }
    Ok(report)
}

/// Converts the type of each location, skipping host types already reported.
pub fn convert_locations(graph: &TypeGraph, options: ConverterOptions) -> Vec<(&Location, Type)> {
    let mut converter = Converter::new(graph, options);
    let mut seen = FxHashSet::default();
    let mut out = Vec::new();
    for location in &graph.locations {
        if seen.insert(location.ty) {
            out.push((location, converter.convert(location.ty)));
        }
    }
    out
}

pub fn render_type(ty: &Type, render: Render) -> String {
    let json = || serde_json::to_string_pretty(&crate::json::encode(ty)).unwrap_or_default();
    match render {
        Render::Text => ty.to_string(),
        Render::Json => json(),
        Render::Both => format!("{ty}\n{}", json()),
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn indent(text: &str, prefix: &str) -> String {
    text.lines()
        .map(|line| format!("{prefix}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn resolve_file_path_patterns<I>(patterns: I) -> anyhow::Result<Vec<PathBuf>>
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
                matched_any = true;
                out.push(entry?);
            }
            if !matched_any {
                // explicit glob that matched nothing is an error
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
    use crate::host::TypeFlags;

    #[test]
    fn parses_convert_command() {
        let cli = CommandLineInterface::try_parse_from([
            "typemodel", "convert", "-i", "a.json", "b/*.json", "--render", "both", "--source-root", "/p",
        ]).unwrap();
        match cli.cmd {
            Command::Convert(target) => {
                assert_eq!(target.input_settings.input, vec!["a.json", "b/*.json"]);
                assert_eq!(target.render, Render::Both);
                assert_eq!(target.source_root, Some(PathBuf::from("/p")));
                assert!(!target.no_op);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn input_is_required() {
        assert!(CommandLineInterface::try_parse_from(["typemodel", "roundtrip"]).is_err());
    }

    #[test]
    fn literal_paths_pass_through() {
        let paths = resolve_file_path_patterns(["x.json", "dir/y.json"]).unwrap();
        assert_eq!(paths, vec![PathBuf::from("x.json"), PathBuf::from("dir/y.json")]);
    }

    #[test]
    fn empty_glob_is_an_error() {
        let err = resolve_file_path_patterns(["/definitely/not/here/*.json"]).unwrap_err();
        assert!(err.to_string().contains("matched no files"));
    }

    #[test]
    fn locations_are_deduplicated_by_host_type() {
        let mut graph = TypeGraph::new();
        let s = graph.intrinsic(TypeFlags::STRING, "string");
        let n = graph.intrinsic(TypeFlags::NUMBER, "number");
        graph.add_location("a", 0, s);
        graph.add_location("b", 4, s);
        graph.add_location("c", 8, n);
        let converted = convert_locations(&graph, ConverterOptions::default());
        let texts: Vec<_> = converted.iter().map(|(loc, _)| loc.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "c"]);
        assert_eq!(converted[1].1, Type::NUMBER);
    }

    #[test]
    fn renders_text_and_json() {
        assert_eq!(render_type(&Type::STRING, Render::Text), "string");
        assert_eq!(render_type(&Type::STRING, Render::Json), "{\n  \"kind\": \"string\"\n}");
        assert_eq!(render_type(&Type::NULL, Render::Both), "null\n{\n  \"kind\": \"null\"\n}");
    }

    #[test]
    fn round_trip_check_rejects_malformed_records() {
        assert!(check_round_trip("t", serde_json::json!({ "kind": "literal", "value": 1.0 })));
        assert!(!check_round_trip("t", serde_json::json!({ "kind": "wat" })));
    }

    #[test]
    fn indents_every_line() {
        assert_eq!(indent("a\nb", "  "), "  a\n  b");
    }
}
