#![deny(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use constable_core::output::OutputFormat;

mod output;

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(
    name = "constable",
    about = "Lint a JavaScript file and write an auto-fixed copy",
    long_about = None,
)]
struct Cli {
    /// JavaScript file to lint and fix.
    #[arg(short, long)]
    file: PathBuf,

    /// Output format: pretty, text, or json.
    #[arg(long, default_value = "pretty")]
    format: String,
}

fn parse_format(s: &str) -> Result<OutputFormat> {
    match s {
        "pretty" => Ok(OutputFormat::Pretty),
        "text" => Ok(OutputFormat::Text),
        "json" => Ok(OutputFormat::Json),
        other => anyhow::bail!("unknown format: {other} (expected pretty, text, or json)"),
    }
}

/// Where the corrected source lands: `<stem>.linted.<ext>` in the current
/// directory, wherever the input came from.
fn output_file_name(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("output");
    match input.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => PathBuf::from(format!("{stem}.linted.{ext}")),
        None => PathBuf::from(format!("{stem}.linted")),
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    let format = parse_format(&cli.format)?;
    run(&cli.file, format)
}

/// Lint the file and write the corrected copy. Findings go to stderr and
/// the run summary to stdout, in the order things happen: findings first,
/// then the write, then the confirmation. A run that completes exits 0
/// whether or not anything was flagged.
fn run(file: &Path, format: OutputFormat) -> Result<()> {
    let report = constable_core::lint_file(file)?;
    let target = output_file_name(file);

    match format {
        OutputFormat::Pretty => {
            eprint!("{}", output::format_diagnostics(&report.diagnostics));
            write_fixed(&target, &report.fixed_source)?;
            println!("{}", output::format_summary(&report));
            println!("{}", output::format_saved(&target));
        }
        OutputFormat::Text => {
            colored::control::set_override(false);
            print!("{}", output::format_text(&report));
            write_fixed(&target, &report.fixed_source)?;
            println!("{}", output::format_saved(&target));
        }
        OutputFormat::Json => {
            write_fixed(&target, &report.fixed_source)?;
            println!("{}", output::format_json(&report));
        }
    }
    Ok(())
}

fn write_fixed(target: &Path, fixed_source: &str) -> Result<()> {
    fs::write(target, fixed_source).with_context(|| format!("cannot write {}", target.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_format_accepts_the_three_formats() {
        assert_eq!(parse_format("pretty").unwrap(), OutputFormat::Pretty);
        assert_eq!(parse_format("text").unwrap(), OutputFormat::Text);
        assert_eq!(parse_format("json").unwrap(), OutputFormat::Json);
    }

    #[test]
    fn parse_format_rejects_unknown_names() {
        assert!(parse_format("yaml").is_err());
    }

    #[test]
    fn output_name_keeps_the_input_extension() {
        assert_eq!(
            output_file_name(Path::new("src/app.js")),
            PathBuf::from("app.linted.js")
        );
        assert_eq!(
            output_file_name(Path::new("notes.mjs")),
            PathBuf::from("notes.linted.mjs")
        );
    }

    #[test]
    fn output_name_without_an_extension() {
        assert_eq!(
            output_file_name(Path::new("script")),
            PathBuf::from("script.linted")
        );
    }
}
