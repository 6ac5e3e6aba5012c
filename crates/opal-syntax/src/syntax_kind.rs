use rowan::Language;
use serde_repr::{Deserialize_repr, Serialize_repr};

/// Declares [`SyntaxKind`] from grouped kind lists, deriving the trivia
/// predicate and the keyword table from the same source.
macro_rules! define_syntax_kinds {
    (
        trivia: { $($trivia:ident,)* }
        keywords: { $($kw_text:literal => $kw:ident,)* }
        tokens: { $($token:ident,)* }
        nodes: { $($node:ident,)* }
    ) => {
        /// Unified syntax kind for both tokens and AST nodes.
        ///
        /// The set is scoped to the Java subset the refactoring engine
        /// operates on: declarations down to method bodies, and the full
        /// expression grammar. `ExpressionFragment` is the root kind used
        /// when parsing a standalone expression.
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            Serialize_repr,
            Deserialize_repr,
        )]
        #[repr(u16)]
        pub enum SyntaxKind {
            $($trivia,)*
            $($kw,)*
            $($token,)*
            $($node,)*
            #[doc(hidden)]
            __Last,
        }

        impl SyntaxKind {
            pub fn is_trivia(self) -> bool {
                matches!(self, $(SyntaxKind::$trivia)|*)
            }

            pub fn from_keyword(text: &str) -> Option<SyntaxKind> {
                Some(match text {
                    $($kw_text => SyntaxKind::$kw,)*
                    _ => return None,
                })
            }
        }
    };
}

define_syntax_kinds! {
    trivia: {
        Whitespace,
        LineComment,
        BlockComment,
        DocComment,
    }
    keywords: {
        "abstract" => AbstractKw,
        "boolean" => BooleanKw,
        "byte" => ByteKw,
        "char" => CharKw,
        "class" => ClassKw,
        "double" => DoubleKw,
        "else" => ElseKw,
        "extends" => ExtendsKw,
        "final" => FinalKw,
        "float" => FloatKw,
        "if" => IfKw,
        "implements" => ImplementsKw,
        "import" => ImportKw,
        "instanceof" => InstanceofKw,
        "int" => IntKw,
        "interface" => InterfaceKw,
        "long" => LongKw,
        "new" => NewKw,
        "package" => PackageKw,
        "private" => PrivateKw,
        "protected" => ProtectedKw,
        "public" => PublicKw,
        "return" => ReturnKw,
        "short" => ShortKw,
        "static" => StaticKw,
        "super" => SuperKw,
        "this" => ThisKw,
        "throw" => ThrowKw,
        "throws" => ThrowsKw,
        "void" => VoidKw,
        "while" => WhileKw,
        "true" => TrueKw,
        "false" => FalseKw,
        "null" => NullKw,
        // `var` is a restricted type name, not a reserved word.
        "var" => VarKw,
    }
    tokens: {
        Identifier,
        IntLiteral,
        LongLiteral,
        FloatLiteral,
        DoubleLiteral,
        CharLiteral,
        StringLiteral,

        LParen,
        RParen,
        LBrace,
        RBrace,
        LBracket,
        RBracket,
        Semicolon,
        Comma,
        Dot,
        At,
        Question,
        Colon,
        DoubleColon,
        Arrow,

        Plus,
        Minus,
        Star,
        Slash,
        Percent,
        Tilde,
        Bang,

        Eq,
        EqEq,
        BangEq,

        Less,
        LessEq,
        Greater,
        GreaterEq,

        Amp,
        AmpAmp,
        Pipe,
        PipePipe,
        Caret,

        PlusPlus,
        MinusMinus,

        PlusEq,
        MinusEq,
        StarEq,
        SlashEq,
        PercentEq,

        Error,
        Eof,
    }
    nodes: {
        CompilationUnit,
        ExpressionFragment,
        PackageDeclaration,
        ImportDeclaration,
        Modifiers,
        Annotation,
        Name,

        ClassDeclaration,
        InterfaceDeclaration,
        ClassBody,
        InterfaceBody,

        FieldDeclaration,
        MethodDeclaration,
        ConstructorDeclaration,
        EmptyDeclaration,
        ParameterList,
        Parameter,

        Block,
        IfStatement,
        WhileStatement,
        ReturnStatement,
        ThrowStatement,
        LocalVariableDeclarationStatement,
        ExpressionStatement,
        EmptyStatement,

        VariableDeclaratorList,
        VariableDeclarator,

        Type,
        PrimitiveType,
        NamedType,
        TypeArguments,
        TypeArgument,

        ArgumentList,

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
}

impl SyntaxKind {
    pub fn is_identifier_like(self) -> bool {
        self == SyntaxKind::Identifier || self == SyntaxKind::VarKw
    }

    /// Node kinds that form Java expressions.
    pub fn is_expression(self) -> bool {
        matches!(
            self,
            SyntaxKind::LiteralExpression
                | SyntaxKind::NameExpression
                | SyntaxKind::ThisExpression
                | SyntaxKind::SuperExpression
                | SyntaxKind::ParenthesizedExpression
                | SyntaxKind::NewExpression
                | SyntaxKind::MethodCallExpression
                | SyntaxKind::FieldAccessExpression
                | SyntaxKind::ArrayAccessExpression
                | SyntaxKind::MethodReferenceExpression
                | SyntaxKind::UnaryExpression
                | SyntaxKind::BinaryExpression
                | SyntaxKind::AssignmentExpression
                | SyntaxKind::ConditionalExpression
                | SyntaxKind::LambdaExpression
                | SyntaxKind::CastExpression
        )
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(value: SyntaxKind) -> Self {
        rowan::SyntaxKind(value as u16)
    }
}

/// Rowan language marker for Java.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum JavaLanguage {}

impl Language for JavaLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> SyntaxKind {
        if raw.0 < SyntaxKind::__Last as u16 {
            // SAFETY: the numeric value is within the enum's repr range.
            unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
        } else {
            SyntaxKind::Error
        }
    }

    fn kind_to_raw(kind: SyntaxKind) -> rowan::SyntaxKind {
        kind.into()
    }
}
