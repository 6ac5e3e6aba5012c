use crate::syntax_kind::SyntaxKind;
use crate::TextRange;

/// A lexed token. Carries only the kind and source range; the text is
/// recovered from the original input on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub range: TextRange,
}

impl Token {
    pub fn text<'a>(&self, input: &'a str) -> &'a str {
        &input[self.range.start as usize..self.range.end as usize]
    }
}

/// Tokenizes the entire input, including trivia. The returned vector always
/// ends with a zero-width `Eof` token.
pub fn lex(input: &str) -> Vec<Token> {
    let mut lexer = Lexer {
        input,
        bytes: input.as_bytes(),
        pos: 0,
        tokens: Vec::new(),
    };
    lexer.run();
    lexer.tokens
}

struct Lexer<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn run(&mut self) {
        while self.pos < self.bytes.len() {
            let start = self.pos;
            let kind = self.next_kind();
            self.push(kind, start);
        }
        let end = self.input.len() as u32;
        self.tokens.push(Token {
            kind: SyntaxKind::Eof,
            range: TextRange { start: end, end },
        });
    }

    fn push(&mut self, kind: SyntaxKind, start: usize) {
        self.tokens.push(Token {
            kind,
            range: TextRange {
                start: start as u32,
                end: self.pos as u32,
            },
        });
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, n: usize) -> Option<u8> {
        self.bytes.get(self.pos + n).copied()
    }

    fn bump(&mut self) -> u8 {
        let b = self.bytes[self.pos];
        self.pos += 1;
        b
    }

    fn bump_char(&mut self) {
        let ch = self.input[self.pos..]
            .chars()
            .next()
            .unwrap_or('\u{FFFD}');
        self.pos += ch.len_utf8();
    }

    fn next_kind(&mut self) -> SyntaxKind {
        let b = self.bytes[self.pos];

        if b.is_ascii_whitespace() {
            while self.peek().map_or(false, |b| b.is_ascii_whitespace()) {
                self.pos += 1;
            }
            return SyntaxKind::Whitespace;
        }

        if b == b'/' {
            match self.peek_at(1) {
                Some(b'/') => return self.line_comment(),
                Some(b'*') => return self.block_comment(),
                _ => {}
            }
        }

        if is_ident_start(b) || b >= 0x80 {
            return self.ident_or_keyword();
        }

        if b.is_ascii_digit() {
            return self.number();
        }

        match b {
            b'"' => self.string_literal(),
            b'\'' => self.char_literal(),
            _ => self.punct(),
        }
    }

    fn line_comment(&mut self) -> SyntaxKind {
        while self.peek().map_or(false, |b| b != b'\n') {
            self.pos += 1;
        }
        SyntaxKind::LineComment
    }

    fn block_comment(&mut self) -> SyntaxKind {
        let doc = self.peek_at(2) == Some(b'*') && self.peek_at(3) != Some(b'/');
        self.pos += 2;
        loop {
            match self.peek() {
                None => break,
                Some(b'*') if self.peek_at(1) == Some(b'/') => {
                    self.pos += 2;
                    break;
                }
                _ => self.pos += 1,
            }
        }
        if doc {
            SyntaxKind::DocComment
        } else {
            SyntaxKind::BlockComment
        }
    }

    fn ident_or_keyword(&mut self) -> SyntaxKind {
        let start = self.pos;
        while self
            .peek()
            .map_or(false, |b| is_ident_continue(b) || b >= 0x80)
        {
            if self.bytes[self.pos] >= 0x80 {
                self.bump_char();
            } else {
                self.pos += 1;
            }
        }
        let text = &self.input[start..self.pos];
        SyntaxKind::from_keyword(text).unwrap_or(SyntaxKind::Identifier)
    }

    fn number(&mut self) -> SyntaxKind {
        // Hex / binary / octal prefixes.
        if self.peek() == Some(b'0')
            && matches!(self.peek_at(1), Some(b'x') | Some(b'X') | Some(b'b') | Some(b'B'))
        {
            self.pos += 2;
            while self
                .peek()
                .map_or(false, |b| b.is_ascii_hexdigit() || b == b'_')
            {
                self.pos += 1;
            }
            if matches!(self.peek(), Some(b'l') | Some(b'L')) {
                self.pos += 1;
                return SyntaxKind::LongLiteral;
            }
            return SyntaxKind::IntLiteral;
        }

        let mut is_float = false;
        while self
            .peek()
            .map_or(false, |b| b.is_ascii_digit() || b == b'_')
        {
            self.pos += 1;
        }
        if self.peek() == Some(b'.') && self.peek_at(1).map_or(false, |b| b.is_ascii_digit()) {
            is_float = true;
            self.pos += 1;
            while self
                .peek()
                .map_or(false, |b| b.is_ascii_digit() || b == b'_')
            {
                self.pos += 1;
            }
        }
        if matches!(self.peek(), Some(b'e') | Some(b'E')) {
            is_float = true;
            self.pos += 1;
            if matches!(self.peek(), Some(b'+') | Some(b'-')) {
                self.pos += 1;
            }
            while self.peek().map_or(false, |b| b.is_ascii_digit()) {
                self.pos += 1;
            }
        }
        match self.peek() {
            Some(b'l') | Some(b'L') => {
                self.pos += 1;
                SyntaxKind::LongLiteral
            }
            Some(b'f') | Some(b'F') => {
                self.pos += 1;
                SyntaxKind::FloatLiteral
            }
            Some(b'd') | Some(b'D') => {
                self.pos += 1;
                SyntaxKind::DoubleLiteral
            }
            _ if is_float => SyntaxKind::DoubleLiteral,
            _ => SyntaxKind::IntLiteral,
        }
    }

    fn string_literal(&mut self) -> SyntaxKind {
        self.pos += 1;
        loop {
            match self.peek() {
                None | Some(b'\n') => return SyntaxKind::Error,
                Some(b'"') => {
                    self.pos += 1;
                    return SyntaxKind::StringLiteral;
                }
                Some(b'\\') => {
                    self.pos += 1;
                    if self.peek().is_some() {
                        self.bump_char();
                    }
                }
                _ => self.bump_char(),
            }
        }
    }

    fn char_literal(&mut self) -> SyntaxKind {
        self.pos += 1;
        loop {
            match self.peek() {
                None | Some(b'\n') => return SyntaxKind::Error,
                Some(b'\'') => {
                    self.pos += 1;
                    return SyntaxKind::CharLiteral;
                }
                Some(b'\\') => {
                    self.pos += 1;
                    if self.peek().is_some() {
                        self.bump_char();
                    }
                }
                _ => self.bump_char(),
            }
        }
    }

    fn punct(&mut self) -> SyntaxKind {
        let b = self.bump();
        match b {
            b'(' => SyntaxKind::LParen,
            b')' => SyntaxKind::RParen,
            b'{' => SyntaxKind::LBrace,
            b'}' => SyntaxKind::RBrace,
            b'[' => SyntaxKind::LBracket,
            b']' => SyntaxKind::RBracket,
            b';' => SyntaxKind::Semicolon,
            b',' => SyntaxKind::Comma,
            b'.' => SyntaxKind::Dot,
            b'@' => SyntaxKind::At,
            b'?' => SyntaxKind::Question,
            b':' => {
                if self.peek() == Some(b':') {
                    self.pos += 1;
                    SyntaxKind::DoubleColon
                } else {
                    SyntaxKind::Colon
                }
            }
            b'~' => SyntaxKind::Tilde,
            b'^' => SyntaxKind::Caret,
            b'+' => match self.peek() {
                Some(b'+') => {
                    self.pos += 1;
                    SyntaxKind::PlusPlus
                }
                Some(b'=') => {
                    self.pos += 1;
                    SyntaxKind::PlusEq
                }
                _ => SyntaxKind::Plus,
            },
            b'-' => match self.peek() {
                Some(b'-') => {
                    self.pos += 1;
                    SyntaxKind::MinusMinus
                }
                Some(b'=') => {
                    self.pos += 1;
                    SyntaxKind::MinusEq
                }
                Some(b'>') => {
                    self.pos += 1;
                    SyntaxKind::Arrow
                }
                _ => SyntaxKind::Minus,
            },
            b'*' => {
                if self.peek() == Some(b'=') {
                    self.pos += 1;
                    SyntaxKind::StarEq
                } else {
                    SyntaxKind::Star
                }
            }
            b'/' => {
                if self.peek() == Some(b'=') {
                    self.pos += 1;
                    SyntaxKind::SlashEq
                } else {
                    SyntaxKind::Slash
                }
            }
            b'%' => {
                if self.peek() == Some(b'=') {
                    self.pos += 1;
                    SyntaxKind::PercentEq
                } else {
                    SyntaxKind::Percent
                }
            }
            b'!' => {
                if self.peek() == Some(b'=') {
                    self.pos += 1;
                    SyntaxKind::BangEq
                } else {
                    SyntaxKind::Bang
                }
            }
            b'=' => {
                if self.peek() == Some(b'=') {
                    self.pos += 1;
                    SyntaxKind::EqEq
                } else {
                    SyntaxKind::Eq
                }
            }
            // `>>` is left unmerged: type argument closers are always single
            // `>` tokens and shift operators are outside the supported subset.
            b'<' => {
                if self.peek() == Some(b'=') {
                    self.pos += 1;
                    SyntaxKind::LessEq
                } else {
                    SyntaxKind::Less
                }
            }
            b'>' => {
                if self.peek() == Some(b'=') {
                    self.pos += 1;
                    SyntaxKind::GreaterEq
                } else {
                    SyntaxKind::Greater
                }
            }
            b'&' => {
                if self.peek() == Some(b'&') {
                    self.pos += 1;
                    SyntaxKind::AmpAmp
                } else {
                    SyntaxKind::Amp
                }
            }
            b'|' => {
                if self.peek() == Some(b'|') {
                    self.pos += 1;
                    SyntaxKind::PipePipe
                } else {
                    SyntaxKind::Pipe
                }
            }
            _ => SyntaxKind::Error,
        }
    }
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$'
}

fn is_ident_continue(b: u8) -> bool {
    is_ident_start(b) || b.is_ascii_digit()
}
