use crate::report::LintReport;

/// Output format for CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Pretty,
    Text,
    Json,
}

/// Format a report as JSON.
pub fn format_json(report: &LintReport) -> String {
    serde_json::to_string_pretty(report).expect("report should be serializable")
}

/// Format a report as plain text (no colors): one line per finding, then
/// the closing summary.
pub fn format_text(report: &LintReport) -> String {
    let mut out = String::new();

    for diagnostic in &report.diagnostics {
        out.push_str(&format!(
            "Error: {}\n{}\n",
            diagnostic.message, diagnostic.location
        ));
    }

    if report.has_errors() {
        out.push_str(&format!(
            "\nLinting completed with {} errors.\n",
            report.error_count()
        ));
    } else {
        out.push_str("\nLinting completed without errors.\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lint_source;

    #[test]
    fn format_text_lists_findings_and_summary() {
        let report = lint_source("app.js", "var x = 1;\nx = 2;\n").expect("lint should run");
        let out = format_text(&report);
        assert!(out.contains("Error: use \"let\" instead of \"var\""));
        assert!(out.contains("app.js:1:1"));
        assert!(out.contains("Linting completed with 1 errors."));
    }

    #[test]
    fn format_text_reports_clean_files() {
        let report = lint_source("app.js", "const x = 1;\n").expect("lint should run");
        let out = format_text(&report);
        assert!(out.contains("Linting completed without errors."));
        assert!(!out.contains("Error:"));
    }

    #[test]
    fn format_json_carries_findings_and_fixed_source() {
        let report = lint_source("app.js", "let x = \"a\";\n").expect("lint should run");
        let json = format_json(&report);
        assert!(json.contains("\"file\""));
        assert!(json.contains("\"lines_of_code\": 1"));
        assert!(json.contains("\"diagnostics\""));
        assert!(json.contains("use single quotes instead of double quotes"));
        assert!(json.contains("\"fixed_source\""));
    }

    #[test]
    fn output_format_eq() {
        assert_eq!(OutputFormat::Pretty, OutputFormat::Pretty);
        assert_ne!(OutputFormat::Json, OutputFormat::Text);
    }
}
