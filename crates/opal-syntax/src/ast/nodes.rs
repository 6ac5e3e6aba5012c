//! Typed wrappers over the raw syntax tree.
//!
//! Each wrapper is a thin newtype around a [`SyntaxNode`] of the matching
//! kind; accessors navigate direct children only.

use crate::ast::{support, AstNode};
use crate::parser::{SyntaxNode, SyntaxToken};
use crate::syntax_kind::SyntaxKind;

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            syntax: SyntaxNode,
        }

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                kind == SyntaxKind::$kind
            }

            fn cast(syntax: SyntaxNode) -> Option<Self> {
                Self::can_cast(syntax.kind()).then_some(Self { syntax })
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.syntax
            }
        }
    };
}

ast_node!(CompilationUnit, CompilationUnit);
ast_node!(ExpressionFragment, ExpressionFragment);
ast_node!(PackageDeclaration, PackageDeclaration);
ast_node!(ImportDeclaration, ImportDeclaration);
ast_node!(Modifiers, Modifiers);
ast_node!(Annotation, Annotation);
ast_node!(Name, Name);
ast_node!(ClassDeclaration, ClassDeclaration);
ast_node!(InterfaceDeclaration, InterfaceDeclaration);
ast_node!(ClassBody, ClassBody);
ast_node!(InterfaceBody, InterfaceBody);
ast_node!(MethodDeclaration, MethodDeclaration);
ast_node!(FieldDeclaration, FieldDeclaration);
ast_node!(Block, Block);
ast_node!(ArgumentList, ArgumentList);

ast_node!(LiteralExpression, LiteralExpression);
ast_node!(NameExpression, NameExpression);
ast_node!(ThisExpression, ThisExpression);
ast_node!(SuperExpression, SuperExpression);
ast_node!(ParenthesizedExpression, ParenthesizedExpression);
ast_node!(NewExpression, NewExpression);
ast_node!(MethodCallExpression, MethodCallExpression);
ast_node!(FieldAccessExpression, FieldAccessExpression);
ast_node!(ArrayAccessExpression, ArrayAccessExpression);
ast_node!(MethodReferenceExpression, MethodReferenceExpression);
ast_node!(UnaryExpression, UnaryExpression);
ast_node!(BinaryExpression, BinaryExpression);
ast_node!(AssignmentExpression, AssignmentExpression);
ast_node!(ConditionalExpression, ConditionalExpression);
ast_node!(LambdaExpression, LambdaExpression);
ast_node!(CastExpression, CastExpression);

impl CompilationUnit {
    pub fn package(&self) -> Option<PackageDeclaration> {
        support::child::<PackageDeclaration>(&self.syntax)
    }

    pub fn imports(&self) -> impl Iterator<Item = ImportDeclaration> + '_ {
        support::children::<ImportDeclaration>(&self.syntax)
    }
}

impl ExpressionFragment {
    pub fn expression(&self) -> Option<Expression> {
        support::child::<Expression>(&self.syntax)
    }
}

impl PackageDeclaration {
    pub fn name(&self) -> Option<Name> {
        support::child::<Name>(&self.syntax)
    }
}

impl ImportDeclaration {
    pub fn name(&self) -> Option<Name> {
        support::child::<Name>(&self.syntax)
    }
}

impl Modifiers {
    pub fn annotations(&self) -> impl Iterator<Item = Annotation> + '_ {
        support::children::<Annotation>(&self.syntax)
    }
}

impl Annotation {
    pub fn name(&self) -> Option<Name> {
        support::child::<Name>(&self.syntax)
    }
}

impl ClassDeclaration {
    pub fn name_token(&self) -> Option<SyntaxToken> {
        support::ident_token(&self.syntax)
    }

    pub fn body(&self) -> Option<ClassBody> {
        support::child::<ClassBody>(&self.syntax)
    }
}

impl InterfaceDeclaration {
    pub fn name_token(&self) -> Option<SyntaxToken> {
        support::ident_token(&self.syntax)
    }

    pub fn body(&self) -> Option<InterfaceBody> {
        support::child::<InterfaceBody>(&self.syntax)
    }
}

impl MethodDeclaration {
    pub fn modifiers(&self) -> Option<Modifiers> {
        support::child::<Modifiers>(&self.syntax)
    }

    pub fn name_token(&self) -> Option<SyntaxToken> {
        support::ident_token(&self.syntax)
    }

    pub fn body(&self) -> Option<Block> {
        support::child::<Block>(&self.syntax)
    }
}

impl ArgumentList {
    pub fn expressions(&self) -> impl Iterator<Item = Expression> + '_ {
        support::children::<Expression>(&self.syntax)
    }
}

impl NameExpression {
    pub fn ident_token(&self) -> Option<SyntaxToken> {
        support::ident_token(&self.syntax)
    }
}

impl MethodCallExpression {
    pub fn callee(&self) -> Option<Expression> {
        support::child::<Expression>(&self.syntax)
    }

    pub fn arguments(&self) -> Option<ArgumentList> {
        support::child::<ArgumentList>(&self.syntax)
    }
}

impl FieldAccessExpression {
    pub fn expression(&self) -> Option<Expression> {
        support::child::<Expression>(&self.syntax)
    }

    pub fn name_token(&self) -> Option<SyntaxToken> {
        support::ident_token(&self.syntax)
    }
}

impl MethodReferenceExpression {
    pub fn expression(&self) -> Option<Expression> {
        support::child::<Expression>(&self.syntax)
    }

    pub fn name_token(&self) -> Option<SyntaxToken> {
        support::ident_token(&self.syntax)
    }
}

impl LambdaExpression {
    pub fn body_block(&self) -> Option<Block> {
        support::child::<Block>(&self.syntax)
    }
}

macro_rules! expression_enum {
    ($($variant:ident,)*) => {
        /// Any expression node, dispatched by kind.
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum Expression {
            $($variant($variant),)*
        }

        impl AstNode for Expression {
            fn can_cast(kind: SyntaxKind) -> bool {
                kind.is_expression()
            }

            fn cast(syntax: SyntaxNode) -> Option<Self> {
                match syntax.kind() {
                    $(SyntaxKind::$variant => Some(Self::$variant($variant { syntax })),)*
                    _ => None,
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                match self {
                    $(Self::$variant(it) => it.syntax(),)*
                }
            }
        }
    };
}

expression_enum! {
    LiteralExpression,
    NameExpression,
    ThisExpression,
    SuperExpression,
    ParenthesizedExpression,
    NewExpression,
    MethodCallExpression,
    FieldAccessExpression,
    ArrayAccessExpression,
    MethodReferenceExpression,
    UnaryExpression,
    BinaryExpression,
    AssignmentExpression,
    ConditionalExpression,
    LambdaExpression,
    CastExpression,
}
