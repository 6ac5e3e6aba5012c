use pretty_assertions::assert_eq;

use crate::ast::{
    AstNode, CompilationUnit, Expression, FieldAccessExpression, LambdaExpression,
    MethodCallExpression, MethodDeclaration,
};
use crate::{parse_expression, parse_java, SyntaxKind};

fn expr(text: &str) -> crate::SyntaxNode {
    let parsed = parse_expression(text);
    assert_eq!(parsed.errors, Vec::new(), "fixture failed to parse: {text}");
    let root = parsed.syntax();
    assert_eq!(root.text().to_string(), text, "fragment must be lossless");
    root.children().next().expect("fragment has an expression")
}

#[test]
fn syntax_kind_raw_roundtrip_is_total_for_valid_range() {
    use rowan::Language;

    for raw in 0..(SyntaxKind::__Last as u16) {
        let kind = <crate::JavaLanguage as Language>::kind_from_raw(rowan::SyntaxKind(raw));
        assert_eq!(
            <crate::JavaLanguage as Language>::kind_to_raw(kind).0,
            raw,
            "failed roundtrip for raw={raw}"
        );
    }
}

#[test]
fn parses_compilation_unit_losslessly() {
    let source = "package demo;\n\nimport java.util.List;\n\npublic class A {\n    private B b;\n\n    B getB() {\n        return this.b;\n    }\n}\n";
    let parsed = parse_java(source);
    assert_eq!(parsed.errors, Vec::new());
    assert_eq!(parsed.syntax().text().to_string(), source);

    let unit = CompilationUnit::cast(parsed.syntax()).unwrap();
    assert!(unit.package().is_some());
    assert_eq!(unit.imports().count(), 1);
}

#[test]
fn name_expression_is_a_single_identifier() {
    // Qualified accesses nest as field accesses so that every qualifier is
    // an expression node of its own.
    let node = expr("a.b.c");
    let outer = FieldAccessExpression::cast(node).unwrap();
    assert_eq!(outer.name_token().unwrap().text(), "c");

    let mid = match outer.expression().unwrap() {
        Expression::FieldAccessExpression(it) => it,
        other => panic!("expected nested field access, got {:?}", other.syntax().kind()),
    };
    assert_eq!(mid.name_token().unwrap().text(), "b");
    assert_eq!(
        mid.expression().unwrap().syntax().kind(),
        SyntaxKind::NameExpression
    );
}

#[test]
fn call_chain_nests_through_callee_qualifiers() {
    let node = expr("a.getB().getC()");
    let outer = MethodCallExpression::cast(node).unwrap();
    assert_eq!(outer.name_token().unwrap().text(), "getC");

    let inner = match outer.receiver().unwrap() {
        Expression::MethodCallExpression(it) => it,
        other => panic!("expected call receiver, got {:?}", other.syntax().kind()),
    };
    assert_eq!(inner.name_token().unwrap().text(), "getB");
    assert_eq!(
        inner.receiver().unwrap().syntax().kind(),
        SyntaxKind::NameExpression
    );
    assert!(!inner.has_arguments());
}

#[test]
fn argument_style_call_shape() {
    let node = expr("Utils.f(a.getB(), x)");
    let call = MethodCallExpression::cast(node).unwrap();
    assert_eq!(call.name_token().unwrap().text(), "f");
    assert_eq!(
        call.receiver().unwrap().syntax().kind(),
        SyntaxKind::NameExpression
    );
    assert!(call.has_arguments());
    assert_eq!(
        call.first_argument().unwrap().syntax().kind(),
        SyntaxKind::MethodCallExpression
    );
    assert_eq!(call.arguments().unwrap().expressions().count(), 2);
}

#[test]
fn lambda_parameter_and_body() {
    let node = expr("obj -> obj.getB()");
    let lambda = LambdaExpression::cast(node).unwrap();
    assert_eq!(lambda.sole_parameter_token().unwrap().text(), "obj");
    assert_eq!(
        lambda.body_expression().unwrap().syntax().kind(),
        SyntaxKind::MethodCallExpression
    );
    assert!(lambda.body_block().is_none());

    let multi = expr("(a, b) -> a");
    let multi = LambdaExpression::cast(multi).unwrap();
    assert!(multi.sole_parameter_token().is_none());
}

#[test]
fn method_reference_shape() {
    let node = expr("Utils::f");
    assert_eq!(node.kind(), SyntaxKind::MethodReferenceExpression);
    let reference = crate::ast::MethodReferenceExpression::cast(node).unwrap();
    assert_eq!(reference.name_token().unwrap().text(), "f");
    assert_eq!(
        reference.expression().unwrap().syntax().kind(),
        SyntaxKind::NameExpression
    );
}

#[test]
fn control_flow_statements_parse() {
    let source = "class T {\n  void m() {\n    if (a != null) {\n      while (it.hasNext()) {\n        it.next();\n      }\n    } else {\n      throw new IllegalStateException(\"empty\");\n    }\n  }\n}\n";
    let parsed = parse_java(source);
    assert_eq!(parsed.errors, Vec::new());
    assert_eq!(parsed.syntax().text().to_string(), source);

    let kinds: Vec<_> = parsed.syntax().descendants().map(|n| n.kind()).collect();
    assert!(kinds.contains(&SyntaxKind::IfStatement));
    assert!(kinds.contains(&SyntaxKind::WhileStatement));
    assert!(kinds.contains(&SyntaxKind::ThrowStatement));
    assert!(kinds.contains(&SyntaxKind::NewExpression));
}

#[test]
fn cast_binds_tighter_than_binary_operators() {
    let node = expr("(int) x + 1");
    assert_eq!(node.kind(), SyntaxKind::BinaryExpression);
    let left = node.first_child().unwrap();
    assert_eq!(left.kind(), SyntaxKind::CastExpression);
    assert_eq!(left.text().to_string(), "(int) x");
}

#[test]
fn array_access_chains_through_postfix() {
    let node = expr("xs[i].getB()");
    let call = MethodCallExpression::cast(node).unwrap();
    assert_eq!(call.name_token().unwrap().text(), "getB");
    let access = match call.receiver().unwrap() {
        Expression::FieldAccessExpression(it) => it.expression().unwrap(),
        other => panic!("expected field access, got {:?}", other.syntax().kind()),
    };
    assert_eq!(
        access.syntax().kind(),
        SyntaxKind::ArrayAccessExpression
    );
}

#[test]
fn conditional_expression_shape() {
    let node = expr("a == null ? fallback : a.getB()");
    assert_eq!(node.kind(), SyntaxKind::ConditionalExpression);
    let children: Vec<_> = node.children().map(|n| n.kind()).collect();
    assert_eq!(
        children,
        vec![
            SyntaxKind::BinaryExpression,
            SyntaxKind::NameExpression,
            SyntaxKind::MethodCallExpression,
        ]
    );
}

#[test]
fn generic_types_and_wildcards_parse() {
    let source =
        "class T {\n  java.util.List<? extends Shape> shapes;\n  Map<String, List<Integer>> index;\n}\n";
    let parsed = parse_java(source);
    assert_eq!(parsed.errors, Vec::new());
    assert_eq!(parsed.syntax().text().to_string(), source);

    let arg_lists = parsed
        .syntax()
        .descendants()
        .filter(|n| n.kind() == SyntaxKind::TypeArguments)
        .count();
    assert_eq!(arg_lists, 3);
}

#[test]
fn generic_local_is_a_declaration_not_an_expression() {
    // `List<String> s` must not be misread as comparison expressions.
    let source = "class T { void m() { List<String> s = a.getB(); int[] ns = null; } }";
    let parsed = parse_java(source);
    assert_eq!(parsed.errors, Vec::new());

    let locals = parsed
        .syntax()
        .descendants()
        .filter(|n| n.kind() == SyntaxKind::LocalVariableDeclarationStatement)
        .count();
    assert_eq!(locals, 2);
}

#[test]
fn interface_with_abstract_method() {
    let source = "interface Shape {\n  double area();\n}\n";
    let parsed = parse_java(source);
    assert_eq!(parsed.errors, Vec::new());

    let kinds: Vec<_> = parsed.syntax().descendants().map(|n| n.kind()).collect();
    assert!(kinds.contains(&SyntaxKind::InterfaceDeclaration));
    assert!(kinds.contains(&SyntaxKind::InterfaceBody));
    assert!(kinds.contains(&SyntaxKind::MethodDeclaration));
}

#[test]
fn constructor_declaration_shape() {
    let source = "class Point {\n  int x;\n  Point(int x) {\n    this.x = x;\n  }\n}\n";
    let parsed = parse_java(source);
    assert_eq!(parsed.errors, Vec::new());

    let ctor = parsed
        .syntax()
        .descendants()
        .find(|n| n.kind() == SyntaxKind::ConstructorDeclaration)
        .unwrap();
    assert!(ctor
        .descendants()
        .any(|n| n.kind() == SyntaxKind::AssignmentExpression));
}

#[test]
fn fragment_reports_trailing_garbage() {
    let parsed = parse_expression("a.getB() extra");
    assert!(!parsed.errors.is_empty());
    // Still lossless.
    assert_eq!(parsed.syntax().text().to_string(), "a.getB() extra");
}

#[test]
fn annotated_method_is_navigable() {
    let source = "class A {\n    @NotNull\n    B getB() {\n        return b;\n    }\n}\n";
    let parsed = parse_java(source);
    assert_eq!(parsed.errors, Vec::new());

    let method = parsed
        .syntax()
        .descendants()
        .find_map(MethodDeclaration::cast)
        .unwrap();
    assert_eq!(method.name_token().unwrap().text(), "getB");
    let annotation = method
        .modifiers()
        .unwrap()
        .annotations()
        .next()
        .unwrap();
    assert_eq!(
        annotation.name().unwrap().syntax().text().to_string(),
        "NotNull"
    );
}

#[test]
fn token_at_offset_finds_the_dot() {
    let source = "class T { void m() { a.getB(); } }";
    let parsed = parse_java(source);
    let dot_offset = source.find('.').unwrap() as u32;
    let token = parsed
        .token_at_offset(dot_offset)
        .right_biased()
        .unwrap();
    assert_eq!(token.kind(), SyntaxKind::Dot);
}

#[test]
fn parse_tree_dump_smoke_test() {
    let node = expr("a.getB()");
    let dump = crate::parser::debug_dump(&node);
    assert!(dump.contains("MethodCallExpression"));
    assert!(dump.contains("FieldAccessExpression"));
    assert!(dump.contains("NameExpression"));
}
