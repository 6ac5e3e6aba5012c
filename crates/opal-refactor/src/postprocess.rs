//! Cleanup passes over the assembled pipeline.
//!
//! Runs after the pipeline is built, in order: lambda-to-method-reference
//! simplification (opt-in), shortening `java.util.Optional` to `Optional`
//! (paired with an import), then a token-level reformat of the rendered
//! replacement.

use opal_syntax::ast::{AstNode, Expression, FieldAccessExpression, LambdaExpression};
use opal_syntax::edit::{replace_node, root_of};
use opal_syntax::{lex, parse_expression, SyntaxKind, SyntaxNode};

use crate::convert::ConvertOptions;

pub struct PostprocessResult {
    pub replacement: String,
    /// True when `java.util.Optional` was shortened and an import is needed.
    pub shortened: bool,
}

pub fn postprocess(replacement: SyntaxNode, options: &ConvertOptions) -> PostprocessResult {
    let mut node = replacement;
    if options.simplify_lambdas {
        node = simplify_lambdas(node);
    }
    let mut shortened = false;
    if options.shorten_names {
        let (short, changed) = shorten_optional(node);
        node = short;
        shortened = changed;
    }
    PostprocessResult {
        replacement: reformat(&node.text().to_string()),
        shortened,
    }
}

/// Rewrites `p -> Q.m(p)` into `Q::m` wherever the lambda parameter appears
/// exactly as the sole argument and nowhere in the receiver.
fn simplify_lambdas(mut node: SyntaxNode) -> SyntaxNode {
    while let Some((lambda, reference)) = node
        .descendants()
        .filter_map(LambdaExpression::cast)
        .find_map(|l| method_reference_for(&l).map(|r| (l, r)))
    {
        let parsed = parse_expression(&reference);
        let green = parsed
            .syntax()
            .first_child()
            .expect("method reference text parses to an expression")
            .green()
            .into();
        node = root_of(&replace_node(lambda.syntax(), green));
    }
    node
}

fn method_reference_for(lambda: &LambdaExpression) -> Option<String> {
    let param = lambda.sole_parameter_token()?;
    let body = match lambda.body_expression()? {
        Expression::MethodCallExpression(call) => call,
        _ => return None,
    };
    let receiver = body.receiver()?;
    let name = body.name_token()?;
    let args: Vec<_> = body.arguments()?.expressions().collect();
    let sole_arg = match args.as_slice() {
        [Expression::NameExpression(name)] => name.clone(),
        _ => return None,
    };
    if sole_arg.ident_token()?.text() != param.text() {
        return None;
    }
    let receiver_mentions_param = receiver
        .syntax()
        .descendants_with_tokens()
        .filter_map(|el| el.into_token())
        .any(|t| t.kind().is_identifier_like() && t.text() == param.text());
    if receiver_mentions_param {
        return None;
    }
    Some(format!(
        "{}::{}",
        receiver.syntax().text(),
        name.text()
    ))
}

/// Replaces `java.util.Optional` qualifiers with the simple name.
fn shorten_optional(mut node: SyntaxNode) -> (SyntaxNode, bool) {
    let mut changed = false;
    while let Some(qualifier) = node
        .descendants()
        .filter_map(FieldAccessExpression::cast)
        .find(|fa| fa.normalized_text() == "java.util.Optional")
    {
        let parsed = parse_expression("Optional");
        let green = parsed
            .syntax()
            .first_child()
            .expect("simple name parses to an expression")
            .green()
            .into();
        node = root_of(&replace_node(qualifier.syntax(), green));
        changed = true;
    }
    (node, changed)
}

/// Renders `text` with canonical single spacing: spaces around `->` and
/// binary operators, after commas, and between identifier-like tokens;
/// none inside call or access punctuation.
pub fn reformat(text: &str) -> String {
    let tokens: Vec<_> = lex(text)
        .into_iter()
        .filter(|t| !t.kind.is_trivia() && t.kind != SyntaxKind::Eof)
        .collect();
    let mut out = String::with_capacity(text.len());
    for (i, tok) in tokens.iter().enumerate() {
        if i > 0 && needs_space(tokens[i - 1].kind, tok.kind) {
            out.push(' ');
        }
        out.push_str(tok.text(text));
    }
    out
}

fn needs_space(prev: SyntaxKind, next: SyntaxKind) -> bool {
    use SyntaxKind::*;
    if matches!(prev, LParen | LBracket | Dot | DoubleColon | Bang | Tilde | At) {
        return false;
    }
    if matches!(next, RParen | RBracket | Comma | Semicolon | Dot | DoubleColon) {
        return false;
    }
    if next == LParen {
        // Call and grouping syntax hugs its callee.
        return !(prev.is_identifier_like() || matches!(prev, RParen | RBracket));
    }
    if next == LBracket {
        return false;
    }
    true
}
