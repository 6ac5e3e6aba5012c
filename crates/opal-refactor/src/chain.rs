//! Call chain discovery.
//!
//! A chain is a run of dependent calls rooted at a single base expression,
//! either qualifier-style (`a.getB().getC()`) or argument-style
//! (`Utils.f(a.getB())`), anchored at a caret position in the tree.

use opal_syntax::ast::{AstNode, Expression, MethodCallExpression};
use opal_syntax::{NodeOrToken, SyntaxElement, SyntaxKind, SyntaxNode};

/// A located chain: the base expression plus every dependent call above it,
/// innermost first.
#[derive(Debug, Clone)]
pub struct ChainContext {
    innermost: SyntaxNode,
    chain: Vec<MethodCallExpression>,
}

impl ChainContext {
    /// The base expression whose value feeds the first dependent call.
    pub fn innermost(&self) -> &SyntaxNode {
        &self.innermost
    }

    /// Dependent calls, innermost first. Never empty.
    pub fn chain(&self) -> &[MethodCallExpression] {
        &self.chain
    }

    /// The top of the chain: the node the rewrite replaces.
    pub fn outermost(&self) -> &MethodCallExpression {
        self.chain.last().expect("chain is never empty")
    }
}

/// Locates the call chain surrounding `anchor`, if any.
///
/// The anchor is interpreted case by case:
/// - a `.` token selects the expression ending right before it, drilled down
///   to the bottom of its receiver chain, as the base;
/// - a method call node selects itself as the base;
/// - an anchor inside the qualifier of a call selects that qualifier;
/// - any other anchor inside a call selects the enclosing call.
///
/// From the base, every enclosing expression (or argument list) that is a
/// method call becomes a chain link; the walk stops at the first non-
/// expression ancestor or at a lambda boundary. Chains that are already
/// `Optional` pipelines are rejected so the rewrite never stacks.
pub fn locate_chain(anchor: &SyntaxElement) -> Option<ChainContext> {
    let enclosing_call = strict_ancestors(anchor).find_map(MethodCallExpression::cast);
    let qualifier = enclosing_call
        .as_ref()
        .and_then(MethodCallExpression::receiver);

    let dot = match anchor {
        NodeOrToken::Token(tok) if tok.kind() == SyntaxKind::Dot => Some(tok),
        _ => None,
    };
    let innermost = if let Some(dot) = dot {
        chain_base(expression_before_dot(dot)?)
    } else if let Some(call) = anchor
        .as_node()
        .cloned()
        .and_then(MethodCallExpression::cast)
    {
        call.syntax().clone()
    } else if let Some(qualifier) = qualifier.filter(|q| contains_anchor(q.syntax(), anchor)) {
        qualifier.syntax().clone()
    } else if let Some(call) = enclosing_call {
        call.syntax().clone()
    } else {
        return None;
    };

    let mut chain = Vec::new();
    let mut element = innermost.clone();
    loop {
        let kind = element.kind();
        if !(kind.is_expression() || kind == SyntaxKind::ArgumentList) {
            break;
        }
        if kind == SyntaxKind::LambdaExpression && element != innermost {
            break;
        }
        if element != innermost {
            if let Some(call) = MethodCallExpression::cast(element.clone()) {
                chain.push(call);
            }
        }
        match element.parent() {
            Some(parent) => element = parent,
            None => break,
        }
    }

    if chain.is_empty() {
        return None;
    }
    // Every link must be expressible as a `map` step: zero-argument calls
    // chain through their receiver, argument-style calls through their first
    // argument.
    if chain
        .iter()
        .any(|call| !call.has_arguments() && call.receiver().is_none())
    {
        return None;
    }
    if within_optional_chain(&innermost, &chain) {
        return None;
    }

    tracing::debug!(links = chain.len(), "located call chain");
    Some(ChainContext { innermost, chain })
}

/// The expression node ending immediately before a `.` anchor: the previous
/// non-trivia sibling if it is an expression, otherwise the dot's parent.
fn expression_before_dot(dot: &opal_syntax::SyntaxToken) -> Option<SyntaxNode> {
    let mut prev = dot.prev_sibling_or_token();
    while let Some(NodeOrToken::Token(tok)) = &prev {
        if !tok.kind().is_trivia() {
            break;
        }
        prev = tok.prev_sibling_or_token();
    }
    let candidate = match prev {
        Some(NodeOrToken::Node(node)) => node,
        Some(NodeOrToken::Token(_)) => return None,
        None => dot.parent()?,
    };
    candidate.kind().is_expression().then_some(candidate)
}

/// Drills a dot-anchored expression down to the bottom of its receiver
/// chain, so any separator in `a.getB().getC()` roots the chain at `a`.
fn chain_base(mut node: SyntaxNode) -> SyntaxNode {
    while let Some(receiver) = MethodCallExpression::cast(node.clone())
        .as_ref()
        .and_then(MethodCallExpression::receiver)
    {
        node = receiver.syntax().clone();
    }
    node
}

fn strict_ancestors(anchor: &SyntaxElement) -> impl Iterator<Item = SyntaxNode> {
    let start = match anchor {
        NodeOrToken::Node(node) => node.parent(),
        NodeOrToken::Token(tok) => tok.parent(),
    };
    std::iter::successors(start, SyntaxNode::parent)
}

fn contains_anchor(node: &SyntaxNode, anchor: &SyntaxElement) -> bool {
    match anchor {
        NodeOrToken::Node(n) => n.ancestors().any(|a| &a == node),
        NodeOrToken::Token(t) => t
            .parent()
            .map_or(false, |p| p.ancestors().any(|a| &a == node)),
    }
}

/// True when the located chain is already an `Optional` pipeline: either a
/// link is an `Optional` factory call, the base bottoms out at one, or the
/// anchor sits inside a lambda fed to such a pipeline.
fn within_optional_chain(innermost: &SyntaxNode, chain: &[MethodCallExpression]) -> bool {
    if chain.iter().any(is_optional_factory) {
        return true;
    }
    if let Some(call) = MethodCallExpression::cast(innermost.clone()) {
        if receiver_chain_has_factory(&call) {
            return true;
        }
    }
    for ancestor in innermost.ancestors() {
        if ancestor.kind() == SyntaxKind::LambdaExpression {
            let combinator = ancestor
                .ancestors()
                .skip(1)
                .find_map(MethodCallExpression::cast);
            if let Some(call) = combinator {
                if receiver_chain_has_factory(&call) {
                    return true;
                }
            }
        }
    }
    false
}

fn receiver_chain_has_factory(call: &MethodCallExpression) -> bool {
    let mut current = call.clone();
    loop {
        if is_optional_factory(&current) {
            return true;
        }
        match current.receiver() {
            Some(Expression::MethodCallExpression(inner)) => current = inner,
            _ => return false,
        }
    }
}

fn is_optional_factory(call: &MethodCallExpression) -> bool {
    let name = match call.name_token() {
        Some(tok) => tok,
        None => return false,
    };
    if name.text() != "of" && name.text() != "ofNullable" {
        return false;
    }
    call.receiver().map_or(false, |recv| {
        let text = opal_syntax::ast::normalized_text(recv.syntax());
        text == "Optional" || text == "java.util.Optional"
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use opal_syntax::ast::AstNode;
    use opal_syntax::{parse_expression, parse_java, SyntaxKind};
    use pretty_assertions::assert_eq;

    fn parse_fixture(source: &str) -> opal_syntax::SyntaxNode {
        let parsed = parse_java(source);
        assert_eq!(parsed.errors, Vec::new(), "fixture failed to parse");
        parsed.syntax()
    }

    fn dot_anchor_after(root: &opal_syntax::SyntaxNode, ident: &str) -> SyntaxElement {
        let tok = root
            .descendants_with_tokens()
            .filter_map(|el| el.into_token())
            .filter(|t| t.kind() == SyntaxKind::Dot)
            .find(|t| {
                t.prev_token()
                    .map_or(false, |prev| prev.text() == ident)
            })
            .expect("fixture contains the requested dot");
        NodeOrToken::Token(tok)
    }

    fn chain_names(ctx: &ChainContext) -> Vec<String> {
        ctx.chain()
            .iter()
            .map(|c| c.name_token().unwrap().text().to_string())
            .collect()
    }

    #[test]
    fn qualifier_style_chain_from_dot_anchor() {
        let root = parse_fixture("class T { void m() { a.getB().getC(); } }");
        let ctx = locate_chain(&dot_anchor_after(&root, "a")).unwrap();
        assert_eq!(ctx.innermost().text().to_string(), "a");
        assert_eq!(chain_names(&ctx), vec!["getB", "getC"]);
        assert_eq!(ctx.outermost().syntax().text().to_string(), "a.getB().getC()");
    }

    #[test]
    fn dot_anchor_midway_drills_to_the_chain_base() {
        let root = parse_fixture("class T { void m() { a.getB().getC(); } }");
        // Anchoring between `getB()` and `getC` still roots the chain at `a`.
        let ctx = locate_chain(&dot_anchor_after(&root, ")")).unwrap();
        assert_eq!(ctx.innermost().text().to_string(), "a");
        assert_eq!(chain_names(&ctx), vec!["getB", "getC"]);
    }

    #[test]
    fn argument_style_chain_from_inner_call() {
        let root = parse_fixture("class T { void m() { Utils.f(a.getB()); } }");
        let inner = root
            .descendants()
            .filter_map(MethodCallExpression::cast)
            .find(|c| c.name_token().map_or(false, |t| t.text() == "getB"))
            .unwrap();
        let ctx = locate_chain(&NodeOrToken::Node(inner.syntax().clone())).unwrap();
        assert_eq!(ctx.innermost().text().to_string(), "a.getB()");
        assert_eq!(chain_names(&ctx), vec!["f"]);
    }

    #[test]
    fn lone_call_is_not_a_chain() {
        let root = parse_fixture("class T { void m() { foo(); } }");
        let call = root
            .descendants()
            .find_map(MethodCallExpression::cast)
            .unwrap();
        assert!(locate_chain(&NodeOrToken::Node(call.syntax().clone())).is_none());
    }

    #[test]
    fn anchor_outside_any_call_yields_nothing() {
        let root = parse_fixture("class T { void m() { int x = a; } }");
        let name = root
            .descendants()
            .find(|n| n.kind() == SyntaxKind::NameExpression)
            .unwrap();
        assert!(locate_chain(&NodeOrToken::Node(name)).is_none());
    }

    #[test]
    fn chain_stops_at_lambda_boundary() {
        let root = parse_fixture("class T { void m() { run(() -> a.getB().getC()); } }");
        let ctx = locate_chain(&dot_anchor_after(&root, "a")).unwrap();
        // The enclosing `run(...)` call is outside the lambda and must not
        // become a link.
        assert_eq!(chain_names(&ctx), vec!["getB", "getC"]);
    }

    #[test]
    fn optional_pipelines_are_rejected() {
        let source =
            "class T { void m() { Optional.ofNullable(a).map(obj -> obj.getB()).orElse(null); } }";
        let root = parse_fixture(source);
        for tok in root
            .descendants_with_tokens()
            .filter_map(|el| el.into_token())
            .filter(|t| t.kind() == SyntaxKind::Dot)
        {
            assert!(
                locate_chain(&NodeOrToken::Token(tok.clone())).is_none(),
                "dot at {:?} should not re-trigger",
                tok.text_range()
            );
        }
    }

    #[test]
    fn fully_qualified_factory_is_rejected_too() {
        let source = "class T { void m() { java.util.Optional.of(a).map(obj -> obj.getB()); } }";
        let root = parse_fixture(source);
        let ctx = locate_chain(&dot_anchor_after(&root, ")"));
        assert!(ctx.is_none());
    }

    #[test]
    fn detached_fragment_chains_are_locatable() {
        let parsed = parse_expression("a.getB().getC()");
        let ctx = locate_chain(&dot_anchor_after(&parsed.syntax(), "a")).unwrap();
        assert_eq!(ctx.innermost().text().to_string(), "a");
        assert_eq!(chain_names(&ctx), vec!["getB", "getC"]);
    }
}
