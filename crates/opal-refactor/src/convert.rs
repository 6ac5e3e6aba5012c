//! The user-facing operation: convert a call chain at an offset into an
//! `Optional` pipeline, expressed as text edits over the source file.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use opal_syntax::{
    parse_java, syntax_text_range, NodeOrToken, SyntaxElement, SyntaxToken, TextEdit,
    TokenAtOffset,
};

use crate::nullability::NullabilityOracle;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertOptions {
    /// Rewrite `obj -> Q.m(obj)` map steps into `Q::m` method references.
    pub simplify_lambdas: bool,
    /// Use the simple `Optional` name and add the import when missing.
    pub shorten_names: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            simplify_lambdas: false,
            shorten_names: true,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConvertError {
    #[error("failed to parse Java source")]
    Parse,
    #[error("no rewritable call chain at the given offset")]
    NoChain,
}

/// The edits that perform the conversion, plus the rendered pipeline for
/// previews.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertOutcome {
    pub edits: Vec<TextEdit>,
    pub replacement: String,
}

/// Cheap availability check for populating an action menu.
pub fn is_available_at(source: &str, offset: u32) -> bool {
    let parsed = parse_java(source);
    if !parsed.errors.is_empty() {
        return false;
    }
    anchor_at_offset(&parsed.syntax(), offset).map_or(false, |anchor| crate::is_available(&anchor))
}

/// Converts the call chain at `offset` into an `Optional` pipeline.
///
/// On success the outcome carries one edit replacing the outermost call and,
/// when names are shortened and the file lacks it, an edit inserting
/// `import java.util.Optional;`.
pub fn convert_call_chain(
    source: &str,
    offset: u32,
    options: &ConvertOptions,
    oracle: &dyn NullabilityOracle,
) -> Result<ConvertOutcome, ConvertError> {
    let parsed = parse_java(source);
    if !parsed.errors.is_empty() {
        return Err(ConvertError::Parse);
    }
    let root = parsed.syntax();
    let anchor = anchor_at_offset(&root, offset).ok_or(ConvertError::NoChain)?;
    let invocation = crate::invoke(&anchor, oracle, options).ok_or(ConvertError::NoChain)?;

    let mut edits = Vec::new();
    if invocation.needs_import && !has_optional_import(source) {
        edits.push(optional_import_edit(source));
    }
    edits.push(TextEdit::new(
        syntax_text_range(&invocation.target),
        invocation.replacement.clone(),
    ));

    tracing::info!(offset, edits = edits.len(), "converted call chain");
    Ok(ConvertOutcome {
        edits,
        replacement: invocation.replacement,
    })
}

/// Picks the token anchoring the conversion. Between two tokens the right
/// one wins unless it is trivia.
fn anchor_at_offset(root: &opal_syntax::SyntaxNode, offset: u32) -> Option<SyntaxElement> {
    let token = match root.token_at_offset(offset.into()) {
        TokenAtOffset::None => return None,
        TokenAtOffset::Single(tok) => tok,
        TokenAtOffset::Between(left, right) => pick_between(left, right),
    };
    Some(NodeOrToken::Token(token))
}

fn pick_between(left: SyntaxToken, right: SyntaxToken) -> SyntaxToken {
    if right.kind().is_trivia() && !left.kind().is_trivia() {
        left
    } else {
        right
    }
}

fn has_optional_import(source: &str) -> bool {
    source
        .lines()
        .any(|line| line.trim() == "import java.util.Optional;")
}

fn optional_import_edit(source: &str) -> TextEdit {
    let insert_at = import_insertion_offset(source);
    let mut text = String::from("import java.util.Optional;\n");
    if !source[insert_at as usize..].starts_with('\n') {
        text.push('\n');
    }
    TextEdit::insert(insert_at, text)
}

/// Offset just past the last `package` or `import` line, or the start of the
/// file when there is neither.
fn import_insertion_offset(source: &str) -> u32 {
    let mut offset = 0usize;
    let mut insert_at = 0usize;
    for line in source.split_inclusive('\n') {
        let trimmed = line.trim_start();
        if trimmed.starts_with("import ") || trimmed.starts_with("package ") {
            insert_at = offset + line.len();
        }
        offset += line.len();
    }
    insert_at as u32
}

/// Applies edits to `source`. Edits must not overlap.
pub fn apply_edits(source: &str, edits: &[TextEdit]) -> String {
    let mut edits: Vec<&TextEdit> = edits.iter().collect();
    edits.sort_by(|a, b| b.range.start.cmp(&a.range.start));
    let mut text = source.to_string();
    for edit in edits {
        text.replace_range(
            edit.range.start as usize..edit.range.end as usize,
            &edit.replacement,
        );
    }
    text
}
