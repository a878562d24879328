use std::path::Path;

use colored::Colorize;

use constable_core::diagnostics::Diagnostic;
use constable_core::report::LintReport;

/// Render findings for a terminal: a red `Error:` line per finding, with
/// the location dimmed underneath.
pub fn format_diagnostics(diagnostics: &[Diagnostic]) -> String {
    let mut out = String::new();
    for diagnostic in diagnostics {
        out.push_str(&format!(
            "{} {}\n{}\n",
            "Error: ".red(),
            diagnostic.message,
            diagnostic.location.dimmed()
        ));
    }
    out
}

/// Closing summary: green when the file was clean, red with the finding
/// count otherwise.
pub fn format_summary(report: &LintReport) -> String {
    if report.has_errors() {
        let line = format!("Linting completed with {} errors.", report.error_count());
        format!("\n{}", line.red())
    } else {
        format!("\n{}", "Linting completed without errors.".green())
    }
}

/// Confirmation that the corrected source was written.
pub fn format_saved(output_path: &Path) -> String {
    let name = output_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| output_path.display().to_string());
    format!(
        "\n{} {} {}",
        "Code fixed and saved at".green(),
        format!("./{name}").yellow(),
        "successfully!".green()
    )
}

pub use constable_core::output::{format_json, format_text};
