//! Golden fixture runner over `fixtures/*.json` (or the pattern given as the
//! first argument). See [`typemodel::fixture`] for the file format.
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, anyhow};
use colored::Colorize;
use typemodel::Fixture;

#[derive(Debug, Default)]
struct Tally {
    passed: usize,
    failed: usize,
}

fn main() -> ExitCode {
    typemodel::logging::init_tracing();
    match run() {
        Ok(tally) => {
            let summary = format!("{} passed, {} failed", tally.passed, tally.failed);
            if tally.failed == 0 {
                eprintln!("{}", summary.green());
                ExitCode::SUCCESS
            } else {
                eprintln!("{}", summary.red());
                ExitCode::FAILURE
            }
        }
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<Tally> {
    let pattern = std::env::args()
        .nth(1)
        .unwrap_or_else(|| concat!(env!("CARGO_MANIFEST_DIR"), "/../fixtures/*.json").to_string());
    let mut tally = Tally::default();
    for entry in glob::glob(&pattern).context("invalid fixture pattern")? {
        let path = entry?;
        run_fixture(&path, &mut tally)?;
    }
    if tally.passed + tally.failed == 0 {
        return Err(anyhow!("no fixtures matched {pattern}"));
    }
    Ok(tally)
}

fn run_fixture(path: &Path, tally: &mut Tally) -> anyhow::Result<()> {
    let fixture = Fixture::load(path)
        .with_context(|| format!("malformed fixture {}", path.display()))?;
    let name = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();

    for outcome in fixture.check() {
        let label = format!("{name} :: {}", outcome.expectation.text);
        if outcome.passed() {
            println!("{} {label}", "✓".green());
            tally.passed += 1;
        } else {
            println!("{} {label}", "✗".red());
            for problem in &outcome.problems {
                println!("    {problem}");
            }
            tally.failed += 1;
        }
    }
    Ok(())
}
