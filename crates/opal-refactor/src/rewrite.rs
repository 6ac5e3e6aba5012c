//! Builds the `Optional` pipeline that replaces a located chain.
//!
//! The pipeline is assembled from small parsed templates rather than string
//! concatenation: each template is parsed once, then the chained value is
//! spliced into it green-node by green-node. The result is a detached
//! expression tree; callers render it and splice it over the outermost call.

use opal_syntax::ast::{AstNode, MethodCallExpression};
use opal_syntax::edit::replace_node;
use opal_syntax::{parse_expression, SyntaxNode};

use crate::chain::ChainContext;
use crate::nullability::NullabilityOracle;

const SEED_NULLABLE: &str = "java.util.Optional.ofNullable(null)";
const SEED_NON_NULL: &str = "java.util.Optional.of(null)";
const MAP_STEP: &str = "opt.map(obj -> null)";
const OR_ELSE: &str = "opt.orElse(null)";

/// The lambda parameter introduced by every `map` step.
pub const LAMBDA_PARAM: &str = "obj";

/// A computed rewrite: the node to replace and its detached replacement.
#[derive(Debug, Clone)]
pub struct Rewrite {
    pub target: SyntaxNode,
    pub replacement: SyntaxNode,
}

impl Rewrite {
    /// Splices the replacement over the target and returns the spliced node
    /// in the resulting tree. The target's tree is left untouched.
    pub fn apply(&self) -> SyntaxNode {
        replace_node(&self.target, self.replacement.green().into())
    }
}

/// Turns a located chain into an `Optional` pipeline.
///
/// The base seeds the pipeline through `ofNullable`, or `of` when the
/// oracle knows the base is non-null. Each chain link becomes a `map` step
/// whose lambda body is the link with the chained value replaced by the
/// lambda parameter. The pipeline ends in `orElse(null)`.
pub fn rewrite_chain(ctx: &ChainContext, oracle: &dyn NullabilityOracle) -> Rewrite {
    let obj = template_expression(LAMBDA_PARAM);

    let seed_template = if oracle.is_known_non_null(ctx.innermost()) {
        SEED_NON_NULL
    } else {
        SEED_NULLABLE
    };
    let seed = parse_template_call(seed_template);
    let slot = seed.first_argument().expect("seed template takes one argument");
    let mut pipeline = swap_within_call(&seed, slot.syntax(), ctx.innermost());

    let mut previous = ctx.innermost().clone();
    for link in ctx.chain() {
        let body = body_with_value_replaced(link, &previous, &obj);
        let step = parse_template_call(MAP_STEP);
        let step = with_lambda_body(&step, &body);
        pipeline = with_receiver(&step, pipeline.syntax());
        previous = link.syntax().clone();
    }

    let or_else = parse_template_call(OR_ELSE);
    let finished = with_receiver(&or_else, pipeline.syntax());

    tracing::debug!(steps = ctx.chain().len(), "assembled optional pipeline");
    Rewrite {
        target: ctx.outermost().syntax().clone(),
        replacement: finished.syntax().clone(),
    }
}

fn parse_template_call(template: &str) -> MethodCallExpression {
    let parsed = parse_expression(template);
    debug_assert!(parsed.errors.is_empty(), "template must parse cleanly");
    let root = parsed.syntax();
    root.children()
        .find_map(MethodCallExpression::cast)
        .expect("template parses to a method call")
}

fn template_expression(text: &str) -> SyntaxNode {
    let parsed = parse_expression(text);
    let root = parsed.syntax();
    root.first_child().expect("template parses to an expression")
}

/// A copy of `link` with `previous` swapped for the lambda parameter.
fn body_with_value_replaced(
    link: &MethodCallExpression,
    previous: &SyntaxNode,
    obj: &SyntaxNode,
) -> SyntaxNode {
    let depth = previous
        .ancestors()
        .take_while(|a| a != link.syntax())
        .count();
    let swapped = replace_node(previous, obj.green().into());
    swapped
        .ancestors()
        .nth(depth)
        .expect("the link encloses the chained value")
}

fn with_lambda_body(step: &MethodCallExpression, body: &SyntaxNode) -> MethodCallExpression {
    let lambda = step
        .first_argument()
        .and_then(|arg| match arg {
            opal_syntax::ast::Expression::LambdaExpression(l) => Some(l),
            _ => None,
        })
        .expect("map template takes a lambda");
    let slot = lambda
        .body_expression()
        .expect("map template lambda has an expression body");
    swap_within_call(step, slot.syntax(), body)
}

fn with_receiver(step: &MethodCallExpression, receiver: &SyntaxNode) -> MethodCallExpression {
    let slot = step.receiver().expect("step template has a receiver");
    swap_within_call(step, slot.syntax(), receiver)
}

/// Replaces `slot` (a descendant of `call`) with `value` and returns the
/// resulting call in the new tree.
fn swap_within_call(
    call: &MethodCallExpression,
    slot: &SyntaxNode,
    value: &SyntaxNode,
) -> MethodCallExpression {
    let depth = slot
        .ancestors()
        .take_while(|a| a != call.syntax())
        .count();
    let swapped = replace_node(slot, value.green().into());
    let call = swapped
        .ancestors()
        .nth(depth)
        .expect("the call encloses its slot");
    MethodCallExpression::cast(call).expect("swapping a slot keeps the call shape")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::locate_chain;
    use crate::nullability::{AnnotationNullability, NoNullabilityInfo};
    use opal_syntax::{parse_java, NodeOrToken, SyntaxKind};
    use pretty_assertions::assert_eq;

    fn chain_at_first_dot(source: &str) -> ChainContext {
        let root = parse_java(source).syntax();
        let dot = root
            .descendants_with_tokens()
            .filter_map(|el| el.into_token())
            .find(|t| t.kind() == SyntaxKind::Dot)
            .expect("fixture contains a dot");
        locate_chain(&NodeOrToken::Token(dot)).expect("fixture contains a chain")
    }

    #[test]
    fn qualifier_chain_becomes_map_pipeline() {
        let ctx = chain_at_first_dot("class T { void m() { a.getB().getC(); } }");
        let rewrite = rewrite_chain(&ctx, &NoNullabilityInfo);
        assert_eq!(
            rewrite.replacement.text().to_string(),
            "java.util.Optional.ofNullable(a).map(obj -> obj.getB()).map(obj -> obj.getC()).orElse(null)"
        );
        assert_eq!(rewrite.target.text().to_string(), "a.getB().getC()");
    }

    #[test]
    fn argument_style_link_maps_through_the_argument() {
        let root = parse_java("class T { void m() { Utils.f(a.getB()); } }").syntax();
        let inner = root
            .descendants()
            .filter_map(MethodCallExpression::cast)
            .find(|c| c.name_token().map_or(false, |t| t.text() == "getB"))
            .unwrap();
        let ctx = locate_chain(&NodeOrToken::Node(inner.syntax().clone())).unwrap();
        let rewrite = rewrite_chain(&ctx, &NoNullabilityInfo);
        assert_eq!(
            rewrite.replacement.text().to_string(),
            "java.util.Optional.ofNullable(a.getB()).map(obj -> Utils.f(obj)).orElse(null)"
        );
    }

    #[test]
    fn non_null_base_seeds_with_of() {
        let source = "class T {\n  @NotNull B getB() { return b; }\n  void m() { a.getB().getC(); }\n}";
        let root = parse_java(source).syntax();
        let inner = root
            .descendants()
            .filter_map(MethodCallExpression::cast)
            .find(|c| c.name_token().map_or(false, |t| t.text() == "getB"))
            .unwrap();
        let ctx = locate_chain(&NodeOrToken::Node(inner.syntax().clone())).unwrap();
        let oracle = AnnotationNullability::new(root.clone());
        let rewrite = rewrite_chain(&ctx, &oracle);
        assert_eq!(
            rewrite.replacement.text().to_string(),
            "java.util.Optional.of(a.getB()).map(obj -> obj.getC()).orElse(null)"
        );
    }

    #[test]
    fn apply_splices_into_the_host_tree() {
        let source = "class T { void m() { a.getB(); } }";
        let ctx = chain_at_first_dot(source);
        let rewrite = rewrite_chain(&ctx, &NoNullabilityInfo);
        let spliced = rewrite.apply();
        let new_root = spliced.ancestors().last().unwrap();
        assert_eq!(
            new_root.text().to_string(),
            "class T { void m() { java.util.Optional.ofNullable(a).map(obj -> obj.getB()).orElse(null); } }"
        );
        // The original tree is persistent and unchanged.
        let old_root = rewrite.target.ancestors().last().unwrap();
        assert_eq!(old_root.text().to_string(), source);
    }

    #[test]
    fn value_nested_below_the_link_is_still_swapped() {
        // The chained value need not be a direct argument of the link.
        let ctx = chain_at_first_dot("class T { void m() { g(a.getB() + 1); } }");
        let rewrite = rewrite_chain(&ctx, &NoNullabilityInfo);
        assert_eq!(
            rewrite.replacement.text().to_string(),
            "java.util.Optional.ofNullable(a).map(obj -> obj.getB()).map(obj -> g(obj + 1)).orElse(null)"
        );
    }
}
