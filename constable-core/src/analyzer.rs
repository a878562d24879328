//! The lint pass.
//!
//! One walk over the tree does all the work. Each double-quoted string
//! literal is flagged where it is visited. Declarations register their
//! bound names in a flat per-file table, and each whole-statement
//! assignment looks its target up there to decide, from how the variable
//! is being changed and how it was declared, whether the declaration
//! keyword should be rewritten. After the walk, every tracked variable
//! that was never reassigned or mutated has its declaration settled to
//! `const`.
//!
//! Name tracking is deliberately scope-unaware: one table for the whole
//! file, later declarations of a name overwriting earlier ones. Keyword
//! rewrites happen in place through the arena, so the code generator sees
//! the final keyword for every declaration.

use indexmap::IndexMap;

use crate::ast::{Ast, DeclKind, NodeId, NodeKind};
use crate::diagnostics::{messages, Diagnostic, DiagnosticStore};

/// How far a tracked variable has moved through the pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    /// Declared; no reassignment or member mutation handled yet.
    JustDeclared,
    /// At least one reassignment or member mutation handled.
    ReassignedOrMutated,
}

#[derive(Debug)]
struct TrackedVariable {
    /// Keyword the declaration was written with, before any rewrite.
    original_kind: DeclKind,
    stage: Stage,
    /// The declaration statement that introduced the name. Names bound by
    /// one statement share it, so a rewrite through any of them is seen by
    /// all.
    declaration: NodeId,
}

/// Single-use analyzer for one file: create, [`process`](Analyzer::process)
/// a tree, collect the diagnostics.
pub struct Analyzer {
    variables: IndexMap<String, TrackedVariable>,
    diagnostics: DiagnosticStore,
}

impl Analyzer {
    /// `file` keys every diagnostic's location; use the path the source
    /// was read from.
    pub fn new(file: impl Into<String>) -> Self {
        Analyzer {
            variables: IndexMap::new(),
            diagnostics: DiagnosticStore::new(file),
        }
    }

    /// Run the pass over `ast`, rewriting declaration keywords in place.
    /// Returns the diagnostics sorted by source position.
    pub fn process(mut self, ast: &mut Ast) -> Vec<Diagnostic> {
        let root = ast.root();
        self.walk(ast, root);
        self.settle_untouched_declarations(ast);
        self.diagnostics.into_sorted()
    }

    fn walk(&mut self, ast: &mut Ast, id: NodeId) {
        match &ast[id].kind {
            NodeKind::StringLiteral { double_quoted } => {
                if *double_quoted {
                    let position = ast[id].start;
                    self.diagnostics
                        .record(messages::SINGLE_QUOTES.to_owned(), position);
                }
            }
            NodeKind::VariableDeclaration { .. } => self.track_declaration(ast, id),
            NodeKind::ExpressionStatement { expression } => {
                let expression = *expression;
                self.handle_expression_statement(ast, expression);
            }
            _ => {}
        }
        for child in ast[id].kind.children() {
            self.walk(ast, child);
        }
    }

    fn track_declaration(&mut self, ast: &Ast, id: NodeId) {
        let (original_kind, declarators) = match &ast[id].kind {
            NodeKind::VariableDeclaration {
                kind, declarators, ..
            } => (*kind, declarators.clone()),
            _ => return,
        };
        for declarator in declarators {
            if let NodeKind::VariableDeclarator { names, .. } = &ast[declarator].kind {
                for name in names {
                    self.variables.insert(
                        name.clone(),
                        TrackedVariable {
                            original_kind,
                            stage: Stage::JustDeclared,
                            declaration: id,
                        },
                    );
                }
            }
        }
    }

    /// The decision table for `name = …` and `name.member = …` statements.
    /// Only assignments that form a whole statement count; ones nested in
    /// larger expressions are left alone.
    fn handle_expression_statement(&mut self, ast: &mut Ast, expression: NodeId) {
        let left = match &ast[expression].kind {
            NodeKind::AssignmentExpression { left, .. } => *left,
            _ => return,
        };
        let is_member_target = matches!(ast[left].kind, NodeKind::MemberExpression { .. });
        let name = match assignment_target_name(ast, left) {
            Some(name) => name,
            None => return,
        };
        let (declaration, original_kind, stage) = match self.variables.get(&name) {
            Some(variable) => (variable.declaration, variable.original_kind, variable.stage),
            None => return,
        };

        // A member write on a freshly declared name never rebinds it, so
        // the declaration can tighten to `const`. Declarations already
        // written as `const` are fine as-is and stay untouched.
        if is_member_target && stage == Stage::JustDeclared {
            if original_kind == DeclKind::Const {
                return;
            }
            let position = ast[declaration].start;
            self.diagnostics
                .record(messages::use_const(original_kind), position);
            ast.set_decl_kind(declaration, DeclKind::Const);
            self.mark_reassigned(&name);
            return;
        }

        // Already `let`, now or originally: the rebinding is legitimate
        // and needs no rewrite.
        if ast.decl_kind(declaration) == Some(DeclKind::Let) || original_kind == DeclKind::Let {
            self.mark_reassigned(&name);
            return;
        }

        let position = ast[declaration].start;
        self.diagnostics
            .record(messages::use_let(original_kind), position);
        ast.set_decl_kind(declaration, DeclKind::Let);
        self.mark_reassigned(&name);
    }

    fn mark_reassigned(&mut self, name: &str) {
        if let Some(variable) = self.variables.get_mut(name) {
            variable.stage = Stage::ReassignedOrMutated;
        }
    }

    /// Variables that made it through the walk untouched never needed
    /// their declared mutability, so their declarations settle to `const`.
    /// The keyword is re-read per variable: names sharing one declaration
    /// settle it once, and declarations already at `const` are skipped.
    fn settle_untouched_declarations(&mut self, ast: &mut Ast) {
        let untouched: Vec<NodeId> = self
            .variables
            .values()
            .filter(|variable| variable.stage == Stage::JustDeclared)
            .map(|variable| variable.declaration)
            .collect();
        for declaration in untouched {
            let kind = match ast.decl_kind(declaration) {
                Some(kind) if kind != DeclKind::Const => kind,
                _ => continue,
            };
            let position = ast[declaration].start;
            self.diagnostics.record(messages::use_const(kind), position);
            ast.set_decl_kind(declaration, DeclKind::Const);
        }
    }
}

/// The name an assignment ultimately targets: the identifier itself, or
/// for a member/subscript chain the root object (`a` in `a.b[0].c = 1`).
/// Targets with no identifier root (calls, destructuring assignments) give
/// `None` and are ignored.
fn assignment_target_name(ast: &Ast, left: NodeId) -> Option<String> {
    match &ast[left].kind {
        NodeKind::Identifier { name } => Some(name.clone()),
        NodeKind::MemberExpression { object, .. } => assignment_target_name(ast, *object),
        _ => None,
    }
}
