use crate::syntree::SynTree;

/// Label of the noun-phrase nonterminal
pub const NP: &str = "NP";

/// Every `label` subtree of `tree`, in pre-order, with no other `label`
/// subtree anywhere below it. Nested phrases can hide behind any number of
/// other constituents, so the whole subtree is searched, not only the children.
pub fn minimal_chunks<'t>(tree: &'t SynTree, label: &str) -> Vec<&'t SynTree> {
  tree
    .subtrees(|t| t.label() == Some(label))
    .filter(|t| {
      t.children()
        .iter()
        .all(|c| c.subtrees(|d| d.label() == Some(label)).next().is_none())
    })
    .collect()
}

/// Minimal noun phrases: `NP` subtrees containing no other `NP`
pub fn np_chunks(tree: &SynTree) -> Vec<&SynTree> {
  minimal_chunks(tree, NP)
}
