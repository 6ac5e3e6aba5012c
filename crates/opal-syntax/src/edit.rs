//! Green-tree splicing.
//!
//! Syntax trees are persistent: an edit builds a new green tree that shares
//! all untouched subtrees with the old one. [`replace_node`] is the single
//! primitive all rewrites go through.

use rowan::GreenNode;

use crate::parser::SyntaxNode;

/// Replaces `target` with `replacement` and returns the corresponding node in
/// the new tree.
///
/// The caller's old tree is untouched; the returned node lives in a fresh
/// tree whose root mirrors `target`'s old root. Works on detached fragments
/// and full compilation units alike.
pub fn replace_node(target: &SyntaxNode, replacement: GreenNode) -> SyntaxNode {
    let Some(parent) = target.parent() else {
        return SyntaxNode::new_root(replacement);
    };

    // Record the child-index path from the root so the replacement can be
    // found again after re-rooting.
    let mut path = Vec::new();
    let mut cursor = target.clone();
    while let Some(parent) = cursor.parent() {
        path.push(cursor.index());
        cursor = parent;
    }
    path.reverse();

    // `replace_with` insists the new node keeps the old kind, so splice the
    // replacement into the parent's green children and swap the parent
    // instead. The replacement itself may be any expression kind.
    let idx = target.index();
    let spliced = parent
        .green()
        .splice_children(idx..idx + 1, std::iter::once(replacement.into()));
    let green = parent.replace_with(spliced);
    let mut node = SyntaxNode::new_root(green);
    for idx in path {
        node = node
            .children_with_tokens()
            .nth(idx)
            .and_then(|el| el.into_node())
            .expect("replacement node keeps its position in the new tree");
    }
    node
}

/// The root of the tree `node` belongs to.
pub fn root_of(node: &SyntaxNode) -> SyntaxNode {
    node.ancestors()
        .last()
        .expect("every node has a root ancestor")
}
