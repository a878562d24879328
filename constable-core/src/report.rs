use serde::Serialize;

use crate::diagnostics::Diagnostic;

/// Everything one run produces: the findings, in source order, and the
/// corrected source text.
#[derive(Debug, Clone, Serialize)]
pub struct LintReport {
    /// Path the diagnostics are keyed to, as handed to the linter.
    pub file: String,
    pub lines_of_code: usize,
    pub diagnostics: Vec<Diagnostic>,
    /// Regenerated source with every fix applied.
    pub fixed_source: String,
}

impl LintReport {
    pub fn error_count(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_count_reflects_diagnostics() {
        let report = LintReport {
            file: "app.js".to_owned(),
            lines_of_code: 0,
            diagnostics: Vec::new(),
            fixed_source: String::new(),
        };
        assert_eq!(report.error_count(), 0);
        assert!(!report.has_errors());
    }
}
