//! Recursive-descent parser producing a lossless green tree.
//!
//! Lookahead never consumes input: [`Parser::peek`] and friends inspect the
//! token stream, and trivia is flushed into the tree only when a real token
//! is emitted. Speculative decisions (lambda vs. parenthesized expression,
//! cast vs. grouping, local declaration vs. expression statement) run on a
//! throwaway [`Lookahead`] cursor.

use rowan::{GreenNode, GreenNodeBuilder};
use text_size::TextSize;

use crate::lexer::{lex, Token};
use crate::syntax_kind::{JavaLanguage, SyntaxKind};
use crate::{ParseError, TextRange};

pub type SyntaxNode = rowan::SyntaxNode<JavaLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<JavaLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<JavaLanguage>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaParseResult {
    pub green: GreenNode,
    pub errors: Vec<ParseError>,
}

impl JavaParseResult {
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    pub fn token_at_offset(&self, offset: u32) -> rowan::TokenAtOffset<SyntaxToken> {
        self.syntax().token_at_offset(TextSize::from(offset))
    }
}

/// Parses a full compilation unit.
pub fn parse_java(input: &str) -> JavaParseResult {
    Parser::new(input).compilation_unit()
}

/// Parses a standalone expression under an `ExpressionFragment` root.
///
/// This is the entry point for detached expression templates: the resulting
/// tree is complete and lossless, and individual expression nodes can be
/// lifted out of it for splicing.
pub fn parse_expression(input: &str) -> JavaParseResult {
    Parser::new(input).fragment()
}

const UNARY_BP: u8 = 100;
const POSTFIX_BP: u8 = 121;

const TOP_LEVEL_RECOVERY: &[SyntaxKind] = &[
    SyntaxKind::PackageKw,
    SyntaxKind::ImportKw,
    SyntaxKind::ClassKw,
    SyntaxKind::InterfaceKw,
];

const MEMBER_RECOVERY: &[SyntaxKind] = &[
    SyntaxKind::Semicolon,
    SyntaxKind::RBrace,
    SyntaxKind::ClassKw,
    SyntaxKind::InterfaceKw,
    SyntaxKind::PublicKw,
    SyntaxKind::PrivateKw,
    SyntaxKind::ProtectedKw,
    SyntaxKind::StaticKw,
    SyntaxKind::FinalKw,
    SyntaxKind::AbstractKw,
    SyntaxKind::At,
];

struct Parser<'a> {
    text: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            tokens: lex(text),
            pos: 0,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
        }
    }

    fn compilation_unit(mut self) -> JavaParseResult {
        self.builder.start_node(SyntaxKind::CompilationUnit.into());
        self.flush_trivia();

        if self.at(SyntaxKind::PackageKw) {
            self.package_decl();
        }
        while self.at(SyntaxKind::ImportKw) {
            self.import_decl();
        }
        while !self.at(SyntaxKind::Eof) {
            if self.at_type_decl_start() {
                self.type_decl();
            } else {
                self.node(SyntaxKind::Error, |p| {
                    p.error("unexpected token at top level");
                    p.skip_until(TOP_LEVEL_RECOVERY);
                });
            }
        }
        self.advance(); // Eof

        self.builder.finish_node();
        JavaParseResult {
            green: self.builder.finish(),
            errors: self.errors,
        }
    }

    fn fragment(mut self) -> JavaParseResult {
        self.builder
            .start_node(SyntaxKind::ExpressionFragment.into());
        self.expr(0);
        if !self.at(SyntaxKind::Eof) {
            self.node(SyntaxKind::Error, |p| {
                p.error("unexpected trailing tokens after expression");
                p.skip_until(&[]);
            });
        }
        self.flush_trivia();

        self.builder.finish_node();
        JavaParseResult {
            green: self.builder.finish(),
            errors: self.errors,
        }
    }

    // --- declarations ---

    fn package_decl(&mut self) {
        self.node(SyntaxKind::PackageDeclaration, |p| {
            p.advance(); // package
            p.dotted_name();
            p.expect(SyntaxKind::Semicolon, "expected `;` after the package name");
        });
    }

    fn import_decl(&mut self) {
        self.node(SyntaxKind::ImportDeclaration, |p| {
            p.advance(); // import
            p.eat(SyntaxKind::StaticKw);
            p.dotted_name();
            if p.at(SyntaxKind::Dot) && p.peek_past(1) == SyntaxKind::Star {
                p.advance();
                p.advance();
            }
            p.expect(SyntaxKind::Semicolon, "expected `;` after the import");
        });
    }

    fn type_decl(&mut self) {
        let cp = self.checkpoint();
        self.modifier_list();
        self.type_decl_after_modifiers(cp);
    }

    fn type_decl_after_modifiers(&mut self, cp: rowan::Checkpoint) {
        match self.peek() {
            SyntaxKind::ClassKw => self.class_like(
                cp,
                SyntaxKind::ClassDeclaration,
                SyntaxKind::ClassBody,
            ),
            SyntaxKind::InterfaceKw => self.class_like(
                cp,
                SyntaxKind::InterfaceDeclaration,
                SyntaxKind::InterfaceBody,
            ),
            SyntaxKind::Semicolon => {
                self.node_at(cp, SyntaxKind::EmptyDeclaration, |p| p.advance())
            }
            _ => self.node_at(cp, SyntaxKind::Error, |p| {
                p.error("expected a class or interface declaration");
                p.skip_until(TOP_LEVEL_RECOVERY);
            }),
        }
    }

    fn class_like(&mut self, cp: rowan::Checkpoint, decl: SyntaxKind, body: SyntaxKind) {
        self.node_at(cp, decl, |p| {
            p.advance(); // class / interface
            p.expect_name("expected a type name");
            if p.eat(SyntaxKind::ExtendsKw) {
                p.ty();
            }
            if p.eat(SyntaxKind::ImplementsKw) {
                p.ty();
                while p.eat(SyntaxKind::Comma) {
                    p.ty();
                }
            }
            p.node(body, |p| {
                p.expect(SyntaxKind::LBrace, "expected `{`");
                while !matches!(p.peek(), SyntaxKind::RBrace | SyntaxKind::Eof) {
                    p.member();
                }
                p.expect(SyntaxKind::RBrace, "expected `}`");
            });
        });
    }

    fn member(&mut self) {
        let cp = self.checkpoint();
        self.modifier_list();

        match self.peek() {
            SyntaxKind::Semicolon => {
                return self.node_at(cp, SyntaxKind::EmptyDeclaration, |p| p.advance());
            }
            SyntaxKind::ClassKw | SyntaxKind::InterfaceKw => {
                return self.type_decl_after_modifiers(cp);
            }
            SyntaxKind::VoidKw => {
                return self.node_at(cp, SyntaxKind::MethodDeclaration, |p| {
                    p.advance();
                    p.expect_name("expected a method name");
                    p.method_rest();
                });
            }
            _ => {}
        }

        // A bare `Name (` opens a constructor.
        if self.peek().is_identifier_like() && self.peek_past(1) == SyntaxKind::LParen {
            return self.node_at(cp, SyntaxKind::ConstructorDeclaration, |p| {
                p.advance(); // constructor name
                p.param_list();
                p.throws_clause();
                p.block();
            });
        }

        if !self.at_type_start() {
            return self.node_at(cp, SyntaxKind::Error, |p| {
                p.error("unexpected token in class body");
                p.member_recovery();
            });
        }

        self.ty();
        if !self.peek().is_identifier_like() {
            return self.node_at(cp, SyntaxKind::Error, |p| {
                p.error("expected a member name");
                p.member_recovery();
            });
        }

        if self.peek_past(1) == SyntaxKind::LParen {
            self.node_at(cp, SyntaxKind::MethodDeclaration, |p| {
                p.advance(); // method name
                p.method_rest();
            });
        } else {
            self.node_at(cp, SyntaxKind::FieldDeclaration, |p| {
                p.declarator_list();
                p.expect(SyntaxKind::Semicolon, "expected `;` after the field");
            });
        }
    }

    fn method_rest(&mut self) {
        self.param_list();
        self.throws_clause();
        if self.at(SyntaxKind::LBrace) {
            self.block();
        } else {
            self.expect(SyntaxKind::Semicolon, "expected `;` or a method body");
        }
    }

    fn throws_clause(&mut self) {
        if self.eat(SyntaxKind::ThrowsKw) {
            self.ty();
            while self.eat(SyntaxKind::Comma) {
                self.ty();
            }
        }
    }

    fn modifier_list(&mut self) {
        self.node(SyntaxKind::Modifiers, |p| loop {
            match p.peek() {
                SyntaxKind::At => p.annotation(),
                SyntaxKind::PublicKw
                | SyntaxKind::PrivateKw
                | SyntaxKind::ProtectedKw
                | SyntaxKind::StaticKw
                | SyntaxKind::AbstractKw
                | SyntaxKind::FinalKw => p.advance(),
                _ => break,
            }
        });
    }

    fn annotation(&mut self) {
        self.node(SyntaxKind::Annotation, |p| {
            p.advance(); // @
            p.dotted_name();
            if p.at(SyntaxKind::LParen) {
                p.call_args();
            }
        });
    }

    fn dotted_name(&mut self) {
        self.node(SyntaxKind::Name, |p| {
            p.expect_name("expected a name");
            while p.at(SyntaxKind::Dot) && p.peek_past(1).is_identifier_like() {
                p.advance();
                p.advance();
            }
        });
    }

    fn param_list(&mut self) {
        self.node(SyntaxKind::ParameterList, |p| {
            p.expect(SyntaxKind::LParen, "expected `(`");
            while !matches!(p.peek(), SyntaxKind::RParen | SyntaxKind::Eof) {
                p.node(SyntaxKind::Parameter, |p| {
                    p.modifier_list();
                    if p.at_type_start() {
                        p.ty();
                    } else {
                        p.error("expected a parameter type");
                    }
                    p.expect_name("expected a parameter name");
                });
                if !p.eat(SyntaxKind::Comma) {
                    break;
                }
            }
            p.expect(SyntaxKind::RParen, "expected `)`");
        });
    }

    fn call_args(&mut self) {
        self.node(SyntaxKind::ArgumentList, |p| {
            p.expect(SyntaxKind::LParen, "expected `(`");
            while !matches!(p.peek(), SyntaxKind::RParen | SyntaxKind::Eof) {
                p.expr(0);
                if !p.eat(SyntaxKind::Comma) {
                    break;
                }
            }
            p.expect(SyntaxKind::RParen, "expected `)`");
        });
    }

    // --- statements ---

    fn block(&mut self) {
        self.node(SyntaxKind::Block, |p| {
            p.expect(SyntaxKind::LBrace, "expected `{`");
            while !matches!(p.peek(), SyntaxKind::RBrace | SyntaxKind::Eof) {
                p.statement();
            }
            p.expect(SyntaxKind::RBrace, "expected `}`");
        });
    }

    fn statement(&mut self) {
        let cp = self.checkpoint();
        match self.peek() {
            SyntaxKind::LBrace => self.block(),
            SyntaxKind::IfKw => self.node_at(cp, SyntaxKind::IfStatement, |p| {
                p.advance();
                p.expect(SyntaxKind::LParen, "expected `(` after `if`");
                p.expr(0);
                p.expect(SyntaxKind::RParen, "expected `)`");
                p.statement();
                if p.eat(SyntaxKind::ElseKw) {
                    p.statement();
                }
            }),
            SyntaxKind::WhileKw => self.node_at(cp, SyntaxKind::WhileStatement, |p| {
                p.advance();
                p.expect(SyntaxKind::LParen, "expected `(` after `while`");
                p.expr(0);
                p.expect(SyntaxKind::RParen, "expected `)`");
                p.statement();
            }),
            SyntaxKind::ReturnKw => self.node_at(cp, SyntaxKind::ReturnStatement, |p| {
                p.advance();
                if !p.at(SyntaxKind::Semicolon) {
                    p.expr(0);
                }
                p.expect(SyntaxKind::Semicolon, "expected `;` after `return`");
            }),
            SyntaxKind::ThrowKw => self.node_at(cp, SyntaxKind::ThrowStatement, |p| {
                p.advance();
                p.expr(0);
                p.expect(SyntaxKind::Semicolon, "expected `;` after `throw`");
            }),
            SyntaxKind::Semicolon => {
                self.node_at(cp, SyntaxKind::EmptyStatement, |p| p.advance())
            }
            _ if self.local_decl_ahead() => {
                self.node_at(cp, SyntaxKind::LocalVariableDeclarationStatement, |p| {
                    p.modifier_list();
                    p.ty();
                    p.declarator_list();
                    p.expect(SyntaxKind::Semicolon, "expected `;` after the declaration");
                })
            }
            _ => self.node_at(cp, SyntaxKind::ExpressionStatement, |p| {
                p.expr(0);
                p.expect(SyntaxKind::Semicolon, "expected `;` after the expression");
            }),
        }
    }

    fn declarator_list(&mut self) {
        self.node(SyntaxKind::VariableDeclaratorList, |p| {
            p.declarator();
            while p.eat(SyntaxKind::Comma) {
                p.declarator();
            }
        });
    }

    fn declarator(&mut self) {
        self.node(SyntaxKind::VariableDeclarator, |p| {
            p.expect_name("expected a variable name");
            if p.eat(SyntaxKind::Eq) {
                if matches!(p.peek(), SyntaxKind::Semicolon | SyntaxKind::Comma) {
                    p.error("expected an initializer");
                } else {
                    p.expr(0);
                }
            }
        });
    }

    // --- types ---

    fn ty(&mut self) {
        self.node(SyntaxKind::Type, |p| {
            if is_primitive_type(p.peek()) {
                p.node(SyntaxKind::PrimitiveType, |p| p.advance());
            } else {
                p.node(SyntaxKind::NamedType, |p| {
                    p.expect_name("expected a type name");
                    while p.at(SyntaxKind::Dot) && p.peek_past(1).is_identifier_like() {
                        p.advance();
                        p.advance();
                    }
                    if p.at(SyntaxKind::Less) {
                        p.type_args();
                    }
                });
            }
            while p.at(SyntaxKind::LBracket) && p.peek_past(1) == SyntaxKind::RBracket {
                p.advance();
                p.advance();
            }
        });
    }

    fn type_args(&mut self) {
        self.node(SyntaxKind::TypeArguments, |p| {
            p.expect(SyntaxKind::Less, "expected `<`");
            while !matches!(p.peek(), SyntaxKind::Greater | SyntaxKind::Eof) {
                p.node(SyntaxKind::TypeArgument, |p| {
                    if p.eat(SyntaxKind::Question) {
                        if p.at(SyntaxKind::ExtendsKw) || p.at(SyntaxKind::SuperKw) {
                            p.advance();
                            p.ty();
                        }
                    } else {
                        p.ty();
                    }
                });
                if !p.eat(SyntaxKind::Comma) {
                    break;
                }
            }
            p.expect(SyntaxKind::Greater, "expected `>`");
        });
    }

    // --- expressions ---

    fn expr(&mut self, min_bp: u8) {
        let cp = self.checkpoint();
        self.primary(cp);
        self.expr_tail(cp, min_bp);
    }

    fn primary(&mut self, cp: rowan::Checkpoint) {
        match self.peek() {
            k if is_literal(k) => {
                self.node_at(cp, SyntaxKind::LiteralExpression, |p| p.advance())
            }
            SyntaxKind::ThisKw => self.node_at(cp, SyntaxKind::ThisExpression, |p| p.advance()),
            SyntaxKind::SuperKw => {
                self.node_at(cp, SyntaxKind::SuperExpression, |p| p.advance())
            }
            SyntaxKind::NewKw => self.node_at(cp, SyntaxKind::NewExpression, |p| {
                p.advance();
                p.ty();
                if p.at(SyntaxKind::LParen) {
                    p.call_args();
                }
            }),
            k if is_prefix_op(k) => self.node_at(cp, SyntaxKind::UnaryExpression, |p| {
                p.advance();
                p.expr(UNARY_BP);
            }),
            k if k.is_identifier_like() => {
                if self.peek_past(1) == SyntaxKind::Arrow {
                    self.lambda(cp);
                } else {
                    // A name expression is a single identifier; qualified
                    // accesses nest as postfix field accesses so that every
                    // qualifier is itself an expression node.
                    self.node_at(cp, SyntaxKind::NameExpression, |p| p.advance());
                }
            }
            SyntaxKind::LParen => {
                if self.lambda_ahead() {
                    self.lambda(cp);
                } else if self.cast_ahead() {
                    self.node_at(cp, SyntaxKind::CastExpression, |p| {
                        p.advance();
                        p.ty();
                        p.expect(SyntaxKind::RParen, "expected `)` after the cast type");
                        p.expr(UNARY_BP);
                    });
                } else {
                    self.node_at(cp, SyntaxKind::ParenthesizedExpression, |p| {
                        p.advance();
                        p.expr(0);
                        p.expect(SyntaxKind::RParen, "expected `)`");
                    });
                }
            }
            _ => self.node_at(cp, SyntaxKind::Error, |p| {
                p.error("expected an expression");
                // Consume one token to guarantee progress.
                if !p.at(SyntaxKind::Eof) {
                    p.advance();
                }
            }),
        }
    }

    fn expr_tail(&mut self, cp: rowan::Checkpoint, min_bp: u8) {
        loop {
            let op = self.peek();

            if min_bp < POSTFIX_BP {
                match op {
                    SyntaxKind::LParen => {
                        self.node_at(cp, SyntaxKind::MethodCallExpression, |p| p.call_args());
                        continue;
                    }
                    SyntaxKind::Dot if self.peek_past(1).is_identifier_like() => {
                        self.node_at(cp, SyntaxKind::FieldAccessExpression, |p| {
                            p.advance();
                            p.advance();
                        });
                        continue;
                    }
                    SyntaxKind::DoubleColon
                        if self.peek_past(1).is_identifier_like()
                            || self.peek_past(1) == SyntaxKind::NewKw =>
                    {
                        self.node_at(cp, SyntaxKind::MethodReferenceExpression, |p| {
                            p.advance();
                            p.advance();
                        });
                        continue;
                    }
                    SyntaxKind::LBracket => {
                        self.node_at(cp, SyntaxKind::ArrayAccessExpression, |p| {
                            p.advance();
                            if !p.at(SyntaxKind::RBracket) {
                                p.expr(0);
                            }
                            p.expect(SyntaxKind::RBracket, "expected `]`");
                        });
                        continue;
                    }
                    _ => {}
                }
            }

            if let Some((l_bp, r_bp)) = binary_power(op) {
                if l_bp < min_bp {
                    break;
                }
                self.node_at(cp, SyntaxKind::BinaryExpression, |p| {
                    p.advance();
                    p.expr(r_bp);
                });
                continue;
            }

            // Assignment is right-associative and binds loosest of all.
            if is_assign_op(op) {
                if min_bp > 1 {
                    break;
                }
                self.node_at(cp, SyntaxKind::AssignmentExpression, |p| {
                    p.advance();
                    p.expr(0);
                });
                continue;
            }

            if op == SyntaxKind::Question {
                if min_bp > 2 {
                    break;
                }
                self.node_at(cp, SyntaxKind::ConditionalExpression, |p| {
                    p.advance(); // ?
                    p.expr(0);
                    p.expect(SyntaxKind::Colon, "expected `:` in the conditional");
                    p.expr(1);
                });
                continue;
            }

            break;
        }
    }

    fn lambda(&mut self, cp: rowan::Checkpoint) {
        self.node_at(cp, SyntaxKind::LambdaExpression, |p| {
            if p.at(SyntaxKind::LParen) {
                p.advance();
                while !matches!(p.peek(), SyntaxKind::RParen | SyntaxKind::Eof) {
                    p.advance();
                }
                p.expect(SyntaxKind::RParen, "expected `)` after lambda parameters");
            } else {
                p.expect_name("expected a lambda parameter");
            }
            p.expect(SyntaxKind::Arrow, "expected `->`");
            if p.at(SyntaxKind::LBrace) {
                p.block();
            } else {
                p.expr(0);
            }
        });
    }

    // --- speculation ---

    fn lambda_ahead(&self) -> bool {
        let mut la = Lookahead::new(self.rest());
        if la.peek() != SyntaxKind::LParen {
            return false;
        }
        la.balanced_parens();
        la.peek() == SyntaxKind::Arrow
    }

    fn cast_ahead(&self) -> bool {
        let mut la = Lookahead::new(self.rest());
        if !la.accept(SyntaxKind::LParen) {
            return false;
        }
        // `(Type) expr` vs. grouping: a comma rules a cast out, and the
        // closing paren must be followed by something an operand starts with.
        loop {
            match la.bump() {
                SyntaxKind::RParen => return can_start_expression(la.peek()),
                SyntaxKind::Comma | SyntaxKind::Eof => return false,
                _ => {}
            }
        }
    }

    fn local_decl_ahead(&self) -> bool {
        let mut la = Lookahead::new(self.rest());

        // Local modifiers: `final` and annotations.
        loop {
            if la.accept(SyntaxKind::FinalKw) {
                continue;
            }
            if la.accept(SyntaxKind::At) {
                la.qualified_name();
                if la.peek() == SyntaxKind::LParen {
                    la.balanced_parens();
                }
                continue;
            }
            break;
        }

        match la.peek() {
            SyntaxKind::VarKw => {
                la.bump();
                la.peek().is_identifier_like()
            }
            k if is_primitive_type(k) => {
                la.bump();
                la.array_dims();
                la.peek().is_identifier_like()
            }
            k if k.is_identifier_like() => {
                la.qualified_name();
                if la.peek() == SyntaxKind::Less {
                    la.angle_group();
                }
                la.array_dims();
                la.peek().is_identifier_like()
            }
            _ => false,
        }
    }

    // --- recovery ---

    fn skip_until(&mut self, stop: &[SyntaxKind]) {
        while !self.at(SyntaxKind::Eof) && !stop.contains(&self.peek()) {
            self.advance();
        }
    }

    fn member_recovery(&mut self) {
        self.skip_until(MEMBER_RECOVERY);
        // A stray `;` would re-dispatch forever.
        if self.at(SyntaxKind::Semicolon) {
            self.advance();
        }
    }

    fn at_type_decl_start(&self) -> bool {
        matches!(
            self.peek(),
            SyntaxKind::ClassKw
                | SyntaxKind::InterfaceKw
                | SyntaxKind::PublicKw
                | SyntaxKind::PrivateKw
                | SyntaxKind::ProtectedKw
                | SyntaxKind::StaticKw
                | SyntaxKind::FinalKw
                | SyntaxKind::AbstractKw
                | SyntaxKind::At
                | SyntaxKind::Semicolon
        )
    }

    fn at_type_start(&self) -> bool {
        is_primitive_type(self.peek()) || self.peek().is_identifier_like()
    }

    // --- cursor ---

    fn rest(&self) -> &[Token] {
        &self.tokens[self.pos..]
    }

    fn peek(&self) -> SyntaxKind {
        self.peek_past(0)
    }

    fn peek_past(&self, n: usize) -> SyntaxKind {
        self.rest()
            .iter()
            .map(|t| t.kind)
            .filter(|k| !k.is_trivia())
            .nth(n)
            .unwrap_or(SyntaxKind::Eof)
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.peek() == kind
    }

    fn flush_trivia(&mut self) {
        while let Some(&tok) = self.tokens.get(self.pos) {
            if !tok.kind.is_trivia() {
                break;
            }
            self.builder.token(tok.kind.into(), tok.text(self.text));
            self.pos += 1;
        }
    }

    fn advance(&mut self) {
        self.flush_trivia();
        if let Some(&tok) = self.tokens.get(self.pos) {
            self.builder.token(tok.kind.into(), tok.text(self.text));
            self.pos += 1;
        }
    }

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: SyntaxKind, message: &str) {
        if !self.eat(kind) {
            self.error(message);
        }
    }

    fn expect_name(&mut self, message: &str) {
        if self.peek().is_identifier_like() {
            self.advance();
        } else {
            self.error(message);
        }
    }

    fn error(&mut self, message: &str) {
        let range = self
            .rest()
            .iter()
            .find(|t| !t.kind.is_trivia())
            .map(|t| t.range)
            .unwrap_or_else(|| {
                let end = self.text.len() as u32;
                TextRange { start: end, end }
            });
        self.errors.push(ParseError {
            message: message.to_string(),
            range,
        });
    }

    // --- tree building ---

    /// Flushes pending trivia first, so retroactively wrapped nodes never
    /// start with whitespace that belongs to the enclosing node.
    fn checkpoint(&mut self) -> rowan::Checkpoint {
        self.flush_trivia();
        self.builder.checkpoint()
    }

    fn node(&mut self, kind: SyntaxKind, f: impl FnOnce(&mut Self)) {
        self.builder.start_node(kind.into());
        f(self);
        self.builder.finish_node();
    }

    fn node_at(&mut self, cp: rowan::Checkpoint, kind: SyntaxKind, f: impl FnOnce(&mut Self)) {
        self.builder.start_node_at(cp, kind.into());
        f(self);
        self.builder.finish_node();
    }
}

/// Read-only cursor for speculative lookahead over the unparsed tokens.
struct Lookahead<'t> {
    tokens: &'t [Token],
    pos: usize,
}

impl<'t> Lookahead<'t> {
    fn new(tokens: &'t [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> SyntaxKind {
        self.tokens[self.pos..]
            .iter()
            .map(|t| t.kind)
            .find(|k| !k.is_trivia())
            .unwrap_or(SyntaxKind::Eof)
    }

    fn bump(&mut self) -> SyntaxKind {
        while self
            .tokens
            .get(self.pos)
            .map_or(false, |t| t.kind.is_trivia())
        {
            self.pos += 1;
        }
        match self.tokens.get(self.pos) {
            Some(tok) => {
                self.pos += 1;
                tok.kind
            }
            None => SyntaxKind::Eof,
        }
    }

    fn accept(&mut self, kind: SyntaxKind) -> bool {
        if self.peek() == kind {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consumes `Name(.Name)*` if the cursor is on an identifier.
    fn qualified_name(&mut self) {
        if !self.peek().is_identifier_like() {
            return;
        }
        self.bump();
        loop {
            let mark = self.pos;
            if !self.accept(SyntaxKind::Dot) {
                break;
            }
            if !self.peek().is_identifier_like() {
                self.pos = mark;
                break;
            }
            self.bump();
        }
    }

    /// Consumes `[]` pairs.
    fn array_dims(&mut self) {
        loop {
            let mark = self.pos;
            if !self.accept(SyntaxKind::LBracket) {
                break;
            }
            if !self.accept(SyntaxKind::RBracket) {
                self.pos = mark;
                break;
            }
        }
    }

    /// Consumes a parenthesized group, starting at `(`.
    fn balanced_parens(&mut self) {
        let mut depth = 0usize;
        loop {
            match self.bump() {
                SyntaxKind::LParen => depth += 1,
                SyntaxKind::RParen => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        break;
                    }
                }
                SyntaxKind::Eof => break,
                _ => {}
            }
        }
    }

    /// Consumes a `<...>` group, starting at `<`. Shallow token matching;
    /// the lexer never merges `>>`, so closers are always single `>` tokens.
    fn angle_group(&mut self) {
        let mut depth = 0i32;
        loop {
            match self.bump() {
                SyntaxKind::Less => depth += 1,
                SyntaxKind::Greater => depth -= 1,
                SyntaxKind::Eof => break,
                _ => {}
            }
            if depth <= 0 {
                break;
            }
        }
    }
}

fn is_primitive_type(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::BooleanKw
            | SyntaxKind::ByteKw
            | SyntaxKind::ShortKw
            | SyntaxKind::IntKw
            | SyntaxKind::LongKw
            | SyntaxKind::CharKw
            | SyntaxKind::FloatKw
            | SyntaxKind::DoubleKw
    )
}

fn is_literal(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::IntLiteral
            | SyntaxKind::LongLiteral
            | SyntaxKind::FloatLiteral
            | SyntaxKind::DoubleLiteral
            | SyntaxKind::CharLiteral
            | SyntaxKind::StringLiteral
            | SyntaxKind::TrueKw
            | SyntaxKind::FalseKw
            | SyntaxKind::NullKw
    )
}

fn is_prefix_op(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::Plus
            | SyntaxKind::Minus
            | SyntaxKind::Bang
            | SyntaxKind::Tilde
            | SyntaxKind::PlusPlus
            | SyntaxKind::MinusMinus
    )
}

fn can_start_expression(kind: SyntaxKind) -> bool {
    kind.is_identifier_like()
        || is_literal(kind)
        || is_prefix_op(kind)
        || matches!(
            kind,
            SyntaxKind::ThisKw | SyntaxKind::SuperKw | SyntaxKind::NewKw | SyntaxKind::LParen
        )
}

fn binary_power(op: SyntaxKind) -> Option<(u8, u8)> {
    // Larger binds tighter; (l, l + 1) gives left associativity.
    Some(match op {
        SyntaxKind::Star | SyntaxKind::Slash | SyntaxKind::Percent => (70, 71),
        SyntaxKind::Plus | SyntaxKind::Minus => (60, 61),
        SyntaxKind::Less
        | SyntaxKind::LessEq
        | SyntaxKind::Greater
        | SyntaxKind::GreaterEq
        | SyntaxKind::InstanceofKw => (50, 51),
        SyntaxKind::EqEq | SyntaxKind::BangEq => (45, 46),
        SyntaxKind::Amp => (40, 41),
        SyntaxKind::Caret => (39, 40),
        SyntaxKind::Pipe => (38, 39),
        SyntaxKind::AmpAmp => (30, 31),
        SyntaxKind::PipePipe => (20, 21),
        _ => return None,
    })
}

fn is_assign_op(op: SyntaxKind) -> bool {
    matches!(
        op,
        SyntaxKind::Eq
            | SyntaxKind::PlusEq
            | SyntaxKind::MinusEq
            | SyntaxKind::StarEq
            | SyntaxKind::SlashEq
            | SyntaxKind::PercentEq
    )
}

#[cfg(test)]
pub fn debug_dump(node: &SyntaxNode) -> String {
    use rowan::{NodeOrToken, WalkEvent};
    use std::fmt::Write;

    let mut out = String::new();
    let mut depth = 0usize;
    for event in node.preorder_with_tokens() {
        match event {
            WalkEvent::Enter(element) => {
                let pad = "  ".repeat(depth);
                match element {
                    NodeOrToken::Node(n) => {
                        let _ = writeln!(out, "{pad}{:?}", n.kind());
                    }
                    NodeOrToken::Token(t) => {
                        let _ = writeln!(out, "{pad}{:?} {:?}", t.kind(), t.text());
                    }
                }
                depth += 1;
            }
            WalkEvent::Leave(_) => depth -= 1,
        }
    }
    out
}
