//! Syntax tree and parsing primitives for the Java subset used by the
//! refactoring engine.
//!
//! Two entry points:
//! - [`parse_java`]: parses a full compilation unit into a full-fidelity
//!   rowan-based syntax tree.
//! - [`parse_expression`]: parses a single Java expression snippet under an
//!   `ExpressionFragment` root. Rewrites assemble their output from such
//!   detached fragments before splicing it into the main tree.

pub mod ast;
pub mod edit;
mod lexer;
mod parser;
mod syntax_kind;

pub use lexer::{lex, Token};
pub use parser::{
    parse_expression, parse_java, JavaParseResult, SyntaxElement, SyntaxNode, SyntaxToken,
};
pub use rowan::{GreenNode, NodeOrToken, TokenAtOffset};
pub use syntax_kind::{JavaLanguage, SyntaxKind};

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

/// A half-open byte range within a source file (`start..end`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TextRange {
    pub start: u32,
    pub end: u32,
}

impl TextRange {
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self {
            start: start as u32,
            end: end as u32,
        }
    }

    #[inline]
    pub fn len(self) -> u32 {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    #[inline]
    pub fn contains(self, offset: u32) -> bool {
        self.start <= offset && offset < self.end
    }
}

/// A single edit to a UTF-8 source buffer.
///
/// The edit uses byte offsets and applies `replacement` over `range` (half-open).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEdit {
    pub range: TextRange,
    pub replacement: String,
}

impl TextEdit {
    pub fn new(range: TextRange, replacement: impl Into<String>) -> Self {
        Self {
            range,
            replacement: replacement.into(),
        }
    }

    pub fn insert(offset: u32, text: impl Into<String>) -> Self {
        Self::new(
            TextRange {
                start: offset,
                end: offset,
            },
            text,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseError {
    pub message: String,
    pub range: TextRange,
}

/// Converts a node's rowan range into this crate's serializable [`TextRange`].
pub fn syntax_text_range(node: &SyntaxNode) -> TextRange {
    let range = node.text_range();
    TextRange {
        start: u32::from(range.start()),
        end: u32::from(range.end()),
    }
}
