use indexmap::IndexMap;
use serde::Serialize;

use crate::ast::Position;

/// A single finding, pinned to a source location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// `file:line:column`, column shown 1-based.
    pub location: String,
    pub message: String,
    #[serde(skip)]
    position: Position,
}

impl Diagnostic {
    /// Line the finding points at (1-based).
    pub fn line(&self) -> usize {
        self.position.line
    }

    /// Column the finding points at (0-based).
    pub fn column(&self) -> usize {
        self.position.column
    }
}

/// The message texts. Their wording is part of the tool's contract;
/// the test suite asserts on them verbatim.
pub mod messages {
    use crate::ast::DeclKind;

    pub const SINGLE_QUOTES: &str = "use single quotes instead of double quotes";

    pub fn use_const(instead_of: DeclKind) -> String {
        format!("use \"const\" instead of \"{instead_of}\"")
    }

    pub fn use_let(instead_of: DeclKind) -> String {
        format!("use \"let\" instead of \"{instead_of}\"")
    }
}

/// Location-keyed store of findings for one file. A later finding at an
/// already-seen location replaces the earlier message instead of piling up
/// next to it; a declaration rewritten twice (promoted, then demoted)
/// surfaces as one diagnostic carrying the final message.
#[derive(Debug)]
pub struct DiagnosticStore {
    file: String,
    entries: IndexMap<String, Diagnostic>,
}

impl DiagnosticStore {
    pub fn new(file: impl Into<String>) -> Self {
        DiagnosticStore {
            file: file.into(),
            entries: IndexMap::new(),
        }
    }

    /// Record a finding at `position`. The key renders the column 1-based.
    pub fn record(&mut self, message: String, position: Position) {
        let location = format!("{}:{}:{}", self.file, position.line, position.column + 1);
        self.entries.insert(
            location.clone(),
            Diagnostic {
                location,
                message,
                position,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drain the store sorted by line, then column. The sort is stable,
    /// so entries at one position keep their recording order.
    pub fn into_sorted(self) -> Vec<Diagnostic> {
        let mut all: Vec<Diagnostic> = self.entries.into_values().collect();
        all.sort_by_key(|diagnostic| (diagnostic.position.line, diagnostic.position.column));
        all
    }
}
