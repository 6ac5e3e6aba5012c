//! Converts a Java member-access and call chain rooted at one base
//! expression, such as `a.getB().getC()` or `Utils.f(a.getB())`, into a
//! null-safe `Optional` pipeline:
//!
//! ```java
//! Optional.ofNullable(a).map(obj -> obj.getB()).map(obj -> obj.getC()).orElse(null)
//! ```
//!
//! The conversion is anchored at a byte offset, typically the caret. See
//! [`convert_call_chain`] for the full contract and [`ConvertOptions`] for
//! the cleanup knobs.

pub mod chain;
pub mod convert;
pub mod nullability;
pub mod postprocess;
pub mod rewrite;

use opal_syntax::{SyntaxElement, SyntaxNode};

pub use convert::{
    apply_edits, convert_call_chain, is_available_at, ConvertError, ConvertOptions,
    ConvertOutcome,
};
pub use nullability::{AnnotationNullability, NoNullabilityInfo, NullabilityOracle};

/// Whether a rewritable chain surrounds `anchor`. Pure; shares no state
/// with [`invoke`], which re-derives the chain from the current tree.
pub fn is_available(anchor: &SyntaxElement) -> bool {
    chain::locate_chain(anchor).is_some()
}

/// A completed conversion at the tree level: the node to replace and the
/// cleaned-up replacement text.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub target: SyntaxNode,
    pub replacement: String,
    /// True when the replacement uses the simple `Optional` name and the
    /// file needs `import java.util.Optional;`.
    pub needs_import: bool,
}

/// Runs the conversion at `anchor`. Returns `None` when no chain is there,
/// including when it vanished since an [`is_available`] check.
pub fn invoke(
    anchor: &SyntaxElement,
    oracle: &dyn NullabilityOracle,
    options: &ConvertOptions,
) -> Option<Invocation> {
    let ctx = chain::locate_chain(anchor)?;
    let rewrite = rewrite::rewrite_chain(&ctx, oracle);
    let result = postprocess::postprocess(rewrite.replacement, options);
    Some(Invocation {
        target: rewrite.target,
        replacement: result.replacement,
        needs_import: result.shortened,
    })
}
