use anyhow::{anyhow, Result};
use tree_sitter::Node as CstNode;

use crate::ast::{Ast, DeclKind, Node, NodeId, NodeKind, Position, Span};

/// Parse JavaScript source and lower it into an [`Ast`].
///
/// Only the node kinds the analyzer acts on keep full structure; anything
/// else lowers as [`NodeKind::Other`] with its named children intact, so
/// the walk still reaches declarations, assignments, and string literals
/// nested anywhere in the file. tree-sitter is error-tolerant: a file with
/// syntax errors still yields a tree, with the unparseable stretches
/// opaque.
pub fn parse_source(source: &str) -> Result<Ast> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&tree_sitter_javascript::LANGUAGE.into())
        .map_err(|e| anyhow!("tree-sitter language error: {e}"))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| anyhow!("failed to parse source"))?;

    let mut lowerer = Lowerer {
        source,
        nodes: Vec::new(),
    };
    let root = lowerer.lower(tree.root_node());
    Ok(Ast::new(lowerer.nodes, root))
}

struct Lowerer<'s> {
    source: &'s str,
    nodes: Vec<Node>,
}

impl Lowerer<'_> {
    fn lower(&mut self, node: CstNode) -> NodeId {
        let kind = match node.kind() {
            "program" => NodeKind::Program {
                body: self.lower_named_children(node),
            },
            // `var` statements and `let`/`const` statements are separate
            // kinds in the grammar; the keyword token tells them apart.
            "variable_declaration" | "lexical_declaration" => self.lower_declaration(node),
            "variable_declarator" => self.lower_declarator(node),
            "expression_statement" => self.lower_expression_statement(node),
            "assignment_expression" | "augmented_assignment_expression" => {
                self.lower_assignment(node)
            }
            "member_expression" | "subscript_expression" => self.lower_member(node),
            "identifier" => NodeKind::Identifier {
                name: self.text_of(node).to_owned(),
            },
            // Covers both quote styles; template strings are a different
            // kind and stay opaque.
            "string" => NodeKind::StringLiteral {
                double_quoted: self.source.as_bytes().get(node.start_byte()) == Some(&b'"'),
            },
            _ => NodeKind::Other {
                children: self.lower_named_children(node),
            },
        };
        self.push(node, kind)
    }

    fn lower_declaration(&mut self, node: CstNode) -> NodeKind {
        // The keyword is the first token of the statement. It carries no
        // field name, so reach it positionally.
        let keyword = node
            .child(0)
            .and_then(|token| DeclKind::from_keyword(token.kind()).map(|kind| (kind, token)));
        let (kind, token) = match keyword {
            Some(found) => found,
            None => {
                return NodeKind::Other {
                    children: self.lower_named_children(node),
                }
            }
        };

        let mut declarators = Vec::new();
        for child in named_children_of(node) {
            if child.kind() == "variable_declarator" {
                declarators.push(self.lower(child));
            }
        }
        NodeKind::VariableDeclaration {
            kind,
            keyword_span: Span {
                start: token.start_byte(),
                end: token.end_byte(),
            },
            declarators,
        }
    }

    fn lower_declarator(&mut self, node: CstNode) -> NodeKind {
        let name_node = node.child_by_field_name("name");
        let mut names = Vec::new();
        if let Some(pattern) = name_node {
            collect_bound_names(pattern, self.source, &mut names);
        }
        NodeKind::VariableDeclarator {
            names,
            pattern: name_node.map(|pattern| self.lower(pattern)),
            init: node
                .child_by_field_name("value")
                .map(|value| self.lower(value)),
        }
    }

    fn lower_expression_statement(&mut self, node: CstNode) -> NodeKind {
        let expression = named_children_of(node)
            .into_iter()
            .find(|child| child.kind() != "comment");
        match expression {
            Some(expression) => NodeKind::ExpressionStatement {
                expression: self.lower(expression),
            },
            None => NodeKind::Other {
                children: Vec::new(),
            },
        }
    }

    fn lower_assignment(&mut self, node: CstNode) -> NodeKind {
        match (
            node.child_by_field_name("left"),
            node.child_by_field_name("right"),
        ) {
            (Some(left), Some(right)) => NodeKind::AssignmentExpression {
                left: self.lower(left),
                right: self.lower(right),
            },
            _ => NodeKind::Other {
                children: self.lower_named_children(node),
            },
        }
    }

    fn lower_member(&mut self, node: CstNode) -> NodeKind {
        let object = match node.child_by_field_name("object") {
            Some(object) => object,
            None => {
                return NodeKind::Other {
                    children: self.lower_named_children(node),
                }
            }
        };
        // Dot access names its key `property`, bracket access `index`.
        let property = node
            .child_by_field_name("property")
            .or_else(|| node.child_by_field_name("index"));
        NodeKind::MemberExpression {
            object: self.lower(object),
            property: property.map(|property| self.lower(property)),
        }
    }

    fn lower_named_children(&mut self, node: CstNode) -> Vec<NodeId> {
        named_children_of(node)
            .into_iter()
            .map(|child| self.lower(child))
            .collect()
    }

    fn text_of(&self, node: CstNode) -> &str {
        node.utf8_text(self.source.as_bytes()).unwrap_or_default()
    }

    fn push(&mut self, node: CstNode, kind: NodeKind) -> NodeId {
        let point = node.start_position();
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(Node {
            kind,
            start: Position {
                line: point.row + 1,
                column: point.column,
            },
            span: Span {
                start: node.start_byte(),
                end: node.end_byte(),
            },
        });
        id
    }
}

fn named_children_of(node: CstNode) -> Vec<CstNode> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

/// Every identifier a binding pattern introduces, in source order: one for
/// a plain name, several for object/array destructuring.
fn collect_bound_names(node: CstNode, source: &str, names: &mut Vec<String>) {
    match node.kind() {
        "identifier" | "shorthand_property_identifier_pattern" => {
            if let Ok(text) = node.utf8_text(source.as_bytes()) {
                names.push(text.to_owned());
            }
        }
        // `{ key: binding }` binds the value side only.
        "pair_pattern" => {
            if let Some(value) = node.child_by_field_name("value") {
                collect_bound_names(value, source, names);
            }
        }
        // `x = default` binds the left side.
        "assignment_pattern" | "object_assignment_pattern" => {
            if let Some(left) = node.child_by_field_name("left") {
                collect_bound_names(left, source, names);
            }
        }
        "object_pattern" | "array_pattern" | "rest_pattern" => {
            for child in named_children_of(node) {
                collect_bound_names(child, source, names);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Ast {
        parse_source(source).expect("source should parse")
    }

    fn find_declaration(ast: &Ast, from: NodeId) -> Option<NodeId> {
        if matches!(ast[from].kind, NodeKind::VariableDeclaration { .. }) {
            return Some(from);
        }
        ast[from]
            .kind
            .children()
            .into_iter()
            .find_map(|child| find_declaration(ast, child))
    }

    fn declarator_names(ast: &Ast, declaration: NodeId) -> Vec<String> {
        let declarators = match &ast[declaration].kind {
            NodeKind::VariableDeclaration { declarators, .. } => declarators.clone(),
            _ => return Vec::new(),
        };
        declarators
            .into_iter()
            .flat_map(|declarator| match &ast[declarator].kind {
                NodeKind::VariableDeclarator { names, .. } => names.clone(),
                _ => Vec::new(),
            })
            .collect()
    }

    #[test]
    fn lowers_var_statement_with_keyword_span() {
        let source = "var x = 1;";
        let ast = parse(source);
        let declaration = find_declaration(&ast, ast.root()).expect("should find declaration");
        assert_eq!(ast.decl_kind(declaration), Some(DeclKind::Var));
        match &ast[declaration].kind {
            NodeKind::VariableDeclaration { keyword_span, .. } => {
                assert_eq!(&source[keyword_span.start..keyword_span.end], "var");
            }
            other => panic!("expected declaration, got {other:?}"),
        }
        assert_eq!(declarator_names(&ast, declaration), ["x"]);
    }

    #[test]
    fn lowers_lexical_declarations() {
        for (source, expected) in [
            ("let x = 1;", DeclKind::Let),
            ("const x = 1;", DeclKind::Const),
        ] {
            let ast = parse(source);
            let declaration = find_declaration(&ast, ast.root()).expect("should find declaration");
            assert_eq!(ast.decl_kind(declaration), Some(expected));
        }
    }

    #[test]
    fn collects_names_from_object_destructuring() {
        let ast = parse("const { a, b: c, d = 1, ...rest } = obj;");
        let declaration = find_declaration(&ast, ast.root()).expect("should find declaration");
        assert_eq!(declarator_names(&ast, declaration), ["a", "c", "d", "rest"]);
    }

    #[test]
    fn collects_names_from_array_destructuring() {
        let ast = parse("let [first, , third] = items;");
        let declaration = find_declaration(&ast, ast.root()).expect("should find declaration");
        assert_eq!(declarator_names(&ast, declaration), ["first", "third"]);
    }

    #[test]
    fn collects_names_from_comma_separated_declarators() {
        let ast = parse("var a = 1, b = 2;");
        let declaration = find_declaration(&ast, ast.root()).expect("should find declaration");
        assert_eq!(declarator_names(&ast, declaration), ["a", "b"]);
    }

    #[test]
    fn declaration_inside_for_loop_is_reachable() {
        let ast = parse("for (let i = 0; i < 3; i++) { work(i); }");
        let declaration = find_declaration(&ast, ast.root());
        assert!(declaration.is_some(), "loop init should lower as a declaration");
    }

    #[test]
    fn string_quoting_is_detected_from_the_delimiter() {
        fn first_string(ast: &Ast, from: NodeId) -> Option<bool> {
            if let NodeKind::StringLiteral { double_quoted } = ast[from].kind {
                return Some(double_quoted);
            }
            ast[from]
                .kind
                .children()
                .into_iter()
                .find_map(|child| first_string(ast, child))
        }

        let double = parse(r#"call("hi");"#);
        assert_eq!(first_string(&double, double.root()), Some(true));

        let single = parse("call('hi');");
        assert_eq!(first_string(&single, single.root()), Some(false));

        let template = parse("call(`hi`);");
        assert_eq!(first_string(&template, template.root()), None);
    }

    #[test]
    fn lowers_member_assignment_to_structured_nodes() {
        let ast = parse("a.b = 1;");
        let root = ast.root();
        let statement = ast[root].kind.children()[0];
        let expression = match &ast[statement].kind {
            NodeKind::ExpressionStatement { expression } => *expression,
            other => panic!("expected expression statement, got {other:?}"),
        };
        let left = match &ast[expression].kind {
            NodeKind::AssignmentExpression { left, .. } => *left,
            other => panic!("expected assignment, got {other:?}"),
        };
        let object = match &ast[left].kind {
            NodeKind::MemberExpression { object, .. } => *object,
            other => panic!("expected member expression, got {other:?}"),
        };
        match &ast[object].kind {
            NodeKind::Identifier { name } => assert_eq!(name, "a"),
            other => panic!("expected identifier, got {other:?}"),
        }
    }

    #[test]
    fn subscript_assignment_lowers_like_member_access() {
        let ast = parse("a[0] = 1;");
        let statement = ast[ast.root()].kind.children()[0];
        let expression = match &ast[statement].kind {
            NodeKind::ExpressionStatement { expression } => *expression,
            other => panic!("expected expression statement, got {other:?}"),
        };
        let left = match &ast[expression].kind {
            NodeKind::AssignmentExpression { left, .. } => *left,
            other => panic!("expected assignment, got {other:?}"),
        };
        assert!(matches!(
            ast[left].kind,
            NodeKind::MemberExpression { property: Some(_), .. }
        ));
    }

    #[test]
    fn positions_are_one_based_lines_and_zero_based_columns() {
        let ast = parse("let a = 1;\n  let b = 2;\n");
        let root = ast.root();
        let second = ast[root].kind.children()[1];
        assert_eq!(ast[second].start, Position { line: 2, column: 2 });
    }

    #[test]
    fn empty_source_still_yields_a_program() {
        let ast = parse("");
        assert!(matches!(ast[ast.root()].kind, NodeKind::Program { .. }));
        assert_eq!(ast.len(), 1);
    }
}
