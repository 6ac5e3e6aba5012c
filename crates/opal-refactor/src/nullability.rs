//! Nullability lookup for chain bases.
//!
//! The seed of the rewritten pipeline is `Optional.ofNullable` unless the
//! base expression is known to never be null, in which case `Optional.of`
//! is used instead.

use opal_syntax::ast::{normalized_text, AstNode, Expression, MethodDeclaration};
use opal_syntax::SyntaxNode;

/// Answers whether an expression is known to produce a non-null value.
pub trait NullabilityOracle {
    fn is_known_non_null(&self, expr: &SyntaxNode) -> bool;
}

/// Oracle with no information: everything is potentially null.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoNullabilityInfo;

impl NullabilityOracle for NoNullabilityInfo {
    fn is_known_non_null(&self, _expr: &SyntaxNode) -> bool {
        false
    }
}

/// Oracle backed by nullability annotations in the same tree.
///
/// A call `x.getB()` is non-null when some method declaration named `getB`
/// in the file carries a `@NotNull`, `@Nonnull`, or `@NonNull` annotation.
/// Resolution is by name only; overloads are not distinguished.
#[derive(Debug, Clone)]
pub struct AnnotationNullability {
    root: SyntaxNode,
}

impl AnnotationNullability {
    pub fn new(root: SyntaxNode) -> Self {
        Self { root }
    }
}

const NON_NULL_ANNOTATIONS: &[&str] = &["NotNull", "Nonnull", "NonNull"];

impl NullabilityOracle for AnnotationNullability {
    fn is_known_non_null(&self, expr: &SyntaxNode) -> bool {
        let name = match Expression::cast(expr.clone()) {
            Some(Expression::MethodCallExpression(call)) => match call.name_token() {
                Some(tok) => tok.text().to_string(),
                None => return false,
            },
            _ => return false,
        };
        self.root
            .descendants()
            .filter_map(MethodDeclaration::cast)
            .filter(|m| m.name_token().map_or(false, |t| t.text() == name))
            .any(|m| declares_non_null(&m))
    }
}

fn declares_non_null(method: &MethodDeclaration) -> bool {
    let modifiers = match method.modifiers() {
        Some(m) => m,
        None => return false,
    };
    // Annotation names may carry trailing trivia in the tree, so compare the
    // trivia-stripped text.
    let annotated = modifiers.annotations().any(|anno| {
        anno.name().map_or(false, |name| {
            let text = normalized_text(name.syntax());
            let simple = text.rsplit('.').next().unwrap_or(&text);
            NON_NULL_ANNOTATIONS.contains(&simple)
        })
    });
    annotated
}

#[cfg(test)]
mod tests {
    use super::*;
    use opal_syntax::ast::MethodCallExpression;
    use opal_syntax::parse_java;

    fn first_call(root: &SyntaxNode, name: &str) -> SyntaxNode {
        root.descendants()
            .filter_map(MethodCallExpression::cast)
            .find(|c| c.name_token().map_or(false, |t| t.text() == name))
            .map(|c| c.syntax().clone())
            .expect("fixture contains the call")
    }

    #[test]
    fn no_info_oracle_is_always_nullable() {
        let root = parse_java("class T { void m() { a.getB(); } }").syntax();
        let call = first_call(&root, "getB");
        assert!(!NoNullabilityInfo.is_known_non_null(&call));
    }

    #[test]
    fn annotated_method_is_non_null() {
        let source = "class T {\n  @NotNull B getB() { return b; }\n  void m() { a.getB(); }\n}";
        let root = parse_java(source).syntax();
        let oracle = AnnotationNullability::new(root.clone());
        assert!(oracle.is_known_non_null(&first_call(&root, "getB")));
    }

    #[test]
    fn qualified_annotation_names_match_by_simple_name() {
        let source = "class T {\n  @org.jetbrains.annotations.NotNull B getB() { return b; }\n  void m() { a.getB(); }\n}";
        let root = parse_java(source).syntax();
        let oracle = AnnotationNullability::new(root.clone());
        assert!(oracle.is_known_non_null(&first_call(&root, "getB")));
    }

    #[test]
    fn annotation_name_ignores_surrounding_trivia() {
        let source =
            "class T {\n  @NotNull /* api */ B getB() { return b; }\n  void m() { a.getB(); }\n}";
        let root = parse_java(source).syntax();
        let oracle = AnnotationNullability::new(root.clone());
        assert!(oracle.is_known_non_null(&first_call(&root, "getB")));
    }

    #[test]
    fn unannotated_method_stays_nullable() {
        let source = "class T {\n  B getB() { return b; }\n  void m() { a.getB(); }\n}";
        let root = parse_java(source).syntax();
        let oracle = AnnotationNullability::new(root.clone());
        assert!(!oracle.is_known_non_null(&first_call(&root, "getB")));
    }

    #[test]
    fn plain_names_are_never_non_null() {
        let root = parse_java("class T { void m() { a.getB(); } }").syntax();
        let oracle = AnnotationNullability::new(root.clone());
        let name = first_call(&root, "getB");
        let receiver = MethodCallExpression::cast(name)
            .and_then(|c| c.receiver())
            .unwrap();
        assert!(!oracle.is_known_non_null(receiver.syntax()));
    }
}
