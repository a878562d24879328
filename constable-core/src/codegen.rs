use crate::ast::{Ast, NodeId, NodeKind, Span};

/// Regenerate `source` with every fix recorded in `ast` applied:
/// declaration keywords re-emitted from the (possibly rewritten) tree, and
/// double-quoted string literals rewritten with single-quote delimiters.
/// Everything between the splices is copied through verbatim, so untouched
/// code keeps its exact formatting.
pub fn generate(ast: &Ast, source: &str) -> String {
    let mut splices: Vec<(Span, String)> = Vec::new();
    collect_splices(ast, ast.root(), source, &mut splices);
    splices.sort_by_key(|(span, _)| span.start);

    let mut output = String::with_capacity(source.len());
    let mut cursor = 0;
    for (span, text) in splices {
        if span.start < cursor {
            continue;
        }
        output.push_str(&source[cursor..span.start]);
        output.push_str(&text);
        cursor = span.end;
    }
    output.push_str(&source[cursor..]);
    output
}

fn collect_splices(ast: &Ast, id: NodeId, source: &str, splices: &mut Vec<(Span, String)>) {
    let node = &ast[id];
    match &node.kind {
        // Emitted unconditionally: splicing an unchanged keyword over
        // itself is the identity.
        NodeKind::VariableDeclaration {
            kind, keyword_span, ..
        } => {
            splices.push((*keyword_span, kind.as_str().to_owned()));
        }
        NodeKind::StringLiteral { double_quoted } => {
            if *double_quoted {
                let raw = &source[node.span.start..node.span.end];
                splices.push((node.span, requote(raw)));
            }
        }
        _ => {}
    }
    for child in node.kind.children() {
        collect_splices(ast, child, source, splices);
    }
}

/// Rewrite a double-quoted literal with single-quote delimiters: `\"` in
/// the body drops its backslash, a bare `'` gains one, and every other
/// escape passes through untouched.
fn requote(raw: &str) -> String {
    if raw.len() < 2 || !raw.starts_with('"') || !raw.ends_with('"') {
        return raw.to_owned();
    }
    let body = &raw[1..raw.len() - 1];

    let mut out = String::with_capacity(raw.len());
    out.push('\'');
    let mut chars = body.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some('"') => out.push('"'),
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push('\\'),
            },
            '\'' => out.push_str("\\'"),
            other => out.push(other),
        }
    }
    out.push('\'');
    out
}
