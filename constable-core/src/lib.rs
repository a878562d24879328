#![deny(dead_code)]

pub mod analyzer;
pub mod ast;
pub mod codegen;
pub mod diagnostics;
pub mod output;
pub mod parser;
pub mod report;

use std::path::Path;

use anyhow::{Context, Result};

use analyzer::Analyzer;
use report::LintReport;

/// Lint `source`, keying every diagnostic location to `file`.
///
/// Parses the source, runs the single analysis pass, and regenerates the
/// text with the fixes applied. The input is never written to; callers
/// decide where the corrected source goes.
pub fn lint_source(file: &str, source: &str) -> Result<LintReport> {
    let mut ast = parser::parse_source(source)?;
    let diagnostics = Analyzer::new(file).process(&mut ast);
    let fixed_source = codegen::generate(&ast, source);
    Ok(LintReport {
        file: file.to_owned(),
        lines_of_code: source.lines().count(),
        diagnostics,
        fixed_source,
    })
}

/// Lint the file at `path`. Diagnostics are keyed to the path as given.
pub fn lint_file(path: &Path) -> Result<LintReport> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    lint_source(&path.display().to_string(), &source)
}
