//! Hand-written extensions on top of the typed wrappers.

use crate::ast::{support, AstNode, Expression, FieldAccessExpression, LambdaExpression,
    MethodCallExpression};
use crate::parser::{SyntaxNode, SyntaxToken};
use crate::syntax_kind::SyntaxKind;

impl MethodCallExpression {
    /// The called method's name token: the trailing identifier of the callee.
    pub fn name_token(&self) -> Option<SyntaxToken> {
        match self.callee()? {
            Expression::FieldAccessExpression(access) => access.name_token(),
            Expression::NameExpression(name) => name.ident_token(),
            _ => None,
        }
    }

    /// The receiver expression for qualified calls (`recv.m()`), if any.
    pub fn receiver(&self) -> Option<Expression> {
        match self.callee()? {
            Expression::FieldAccessExpression(access) => access.expression(),
            _ => None,
        }
    }

    pub fn has_arguments(&self) -> bool {
        self.arguments()
            .map_or(false, |args| args.expressions().next().is_some())
    }

    pub fn first_argument(&self) -> Option<Expression> {
        self.arguments()?.expressions().next()
    }
}

impl FieldAccessExpression {
    /// Dotted qualifier text with whitespace and comments removed, e.g.
    /// `java.util.Optional` regardless of interior formatting.
    pub fn normalized_text(&self) -> String {
        normalized_text(self.syntax())
    }
}

impl LambdaExpression {
    /// The sole parameter token of a single-parameter lambda. Returns `None`
    /// for parameter lists with any other shape.
    pub fn sole_parameter_token(&self) -> Option<SyntaxToken> {
        let arrow = support::token(self.syntax(), SyntaxKind::Arrow)?;
        let mut params = self
            .syntax()
            .children_with_tokens()
            .filter_map(|el| el.into_token())
            .take_while(|tok| tok.text_range().start() < arrow.text_range().start())
            .filter(|tok| tok.kind().is_identifier_like());
        let first = params.next()?;
        params.next().is_none().then_some(first)
    }

    /// The body when it is a bare expression rather than a block.
    pub fn body_expression(&self) -> Option<Expression> {
        support::child::<Expression>(self.syntax())
    }
}

/// The node's source text with all trivia stripped.
pub fn normalized_text(node: &SyntaxNode) -> String {
    node.descendants_with_tokens()
        .filter_map(|el| el.into_token())
        .filter(|tok| !tok.kind().is_trivia())
        .map(|tok| tok.text().to_string())
        .collect()
}
