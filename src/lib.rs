#[macro_use]
extern crate lazy_static;

pub mod builtin;
pub mod chart;
pub mod chunk;
pub mod error;
pub mod forest;
pub mod grammar;
pub mod parse_grammar;
pub mod rules;
pub mod syntree;
pub mod tokenize;
pub mod utils;

use tracing::debug;

use crate::chart::{parse_chart, Chart};
use crate::forest::Forest;
pub use crate::chunk::{minimal_chunks, np_chunks, NP};
pub use crate::error::{GrammarDefinitionError, ParseError};
pub use crate::grammar::Grammar;
pub use crate::rules::{Production, Symbol};
pub use crate::syntree::SynTree;
pub use crate::tokenize::tokenize;
pub use crate::utils::Err;

/// Limits for a single parse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
  /// Parsing fails with `ParseError::AmbiguityOverflow` rather than build more trees than this
  pub max_trees: usize,
}

impl ParseOptions {
  pub const DEFAULT_MAX_TREES: usize = 10_000;

  pub fn with_max_trees(mut self, max_trees: usize) -> Self {
    self.max_trees = max_trees;
    self
  }
}

impl Default for ParseOptions {
  fn default() -> Self {
    Self {
      max_trees: Self::DEFAULT_MAX_TREES,
    }
  }
}

impl Grammar {
  pub fn parse_chart<S: AsRef<str>>(&self, input: &[S]) -> Result<Chart<'_>, ParseError> {
    parse_chart(self, input)
  }

  pub fn parse_forest<S: AsRef<str>>(&self, input: &[S]) -> Result<Forest<'_>, ParseError> {
    self.parse_chart(input).map(Forest::from)
  }

  /// Every tree rooted at the start symbol whose leaves are exactly `input`,
  /// with the default limits. No trees is not an error.
  pub fn parse<S: AsRef<str>>(&self, input: &[S]) -> Result<Vec<SynTree>, ParseError> {
    self.parse_with(input, &ParseOptions::default())
  }

  pub fn parse_with<S: AsRef<str>>(
    &self,
    input: &[S],
    options: &ParseOptions,
  ) -> Result<Vec<SynTree>, ParseError> {
    let trees = self.parse_forest(input)?.trees(options.max_trees)?;
    debug!(words = input.len(), trees = trees.len(), "parsed");
    Ok(trees)
  }
}

/// `grammar.parse(tokens)`
pub fn parse<S: AsRef<str>>(tokens: &[S], grammar: &Grammar) -> Result<Vec<SynTree>, ParseError> {
  grammar.parse(tokens)
}

#[cfg(test)]
mod tests {
  use std::collections::HashSet;

  use super::*;

  /// Every branch's children match the rhs of some production for its label
  fn conforms(g: &Grammar, tree: &SynTree) -> bool {
    let Some((cons, children)) = tree.get_branch() else {
      return true;
    };
    let rhs = children
      .iter()
      .map(|c| match c {
        SynTree::Leaf(w) => Symbol::terminal(w.value.clone()),
        SynTree::Branch(cons, _) => Symbol::nonterminal(cons.value.clone()),
      })
      .collect::<Vec<_>>();

    g.productions_for(&cons.value).any(|p| p.rhs == rhs) && children.iter().all(|c| conforms(g, c))
  }

  fn check_trees(g: &Grammar, tokens: &[&str], trees: &[SynTree]) {
    for t in trees {
      assert_eq!(t.leaves().collect::<Vec<_>>(), tokens);
      assert_eq!(t.label(), Some(g.start()));
      assert!(conforms(g, t), "nonconforming tree:\n{}", t);
    }
    let distinct = trees.iter().collect::<HashSet<_>>();
    assert_eq!(distinct.len(), trees.len());
  }

  fn attachment() -> Grammar {
    r#"
      S -> NP VP
      NP -> N | Det N | NP PP
      VP -> V | V NP | V NP PP
      PP -> P NP
      N -> "holmes" | "pipe" | "armchair"
      Det -> "his" | "the"
      V -> "lit"
      P -> "in"
    "#
    .parse()
    .unwrap()
  }

  #[test]
  fn test_single_tree() {
    let g: Grammar = r#"
      S -> NP VP
      NP -> N
      VP -> V
      N -> "holmes"
      V -> "arrived"
    "#
    .parse()
    .unwrap();

    let tokens = ["holmes", "arrived"];
    let trees = parse(&tokens, &g).unwrap();
    assert_eq!(trees.len(), 1);
    check_trees(&g, &tokens, &trees);

    let chunks = np_chunks(&trees[0]);
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].leaves().collect::<Vec<_>>(), ["holmes"]);
  }

  #[test]
  fn test_attachment_ambiguity() {
    let g = attachment();
    let tokens = ["holmes", "lit", "his", "pipe", "in", "the", "armchair"];
    let trees = g.parse(&tokens).unwrap();

    // (VP lit (NP his pipe) (PP in the armchair)) and
    // (VP lit (NP (NP his pipe) (PP in the armchair)))
    assert_eq!(trees.len(), 2);
    check_trees(&g, &tokens, &trees);

    let vp_children = trees
      .iter()
      .map(|t| t.children()[1].children().len())
      .collect::<Vec<_>>();
    assert_eq!(vp_children, [2, 3]);

    // the object NP isn't minimal in the second reading
    for t in trees.iter() {
      let chunks = np_chunks(t)
        .into_iter()
        .map(|c| c.leaves().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>();
      assert_eq!(chunks, ["holmes", "his pipe", "the armchair"]);
    }
  }

  #[test]
  fn test_deterministic() {
    let g = attachment();
    let tokens = ["holmes", "lit", "his", "pipe", "in", "the", "armchair"];
    assert_eq!(g.parse(&tokens).unwrap(), g.parse(&tokens).unwrap());
  }

  #[test]
  fn test_unknown_word() {
    let g = attachment();
    let err = g.parse(&["holmes", "lit", "his", "violin"]).unwrap_err();
    assert_eq!(
      err,
      ParseError::UnknownWord {
        word: "violin".into(),
        position: 3,
      }
    );
    assert_eq!(err.to_string(), "unknown word \"violin\" at position 3");

    // the grammar is unaffected by the failure
    assert_eq!(g.parse(&["holmes", "lit", "his", "pipe"]).unwrap().len(), 1);
  }

  #[test]
  fn test_empty_input() {
    let g = attachment();
    assert!(g.parse::<&str>(&[]).unwrap().is_empty());
  }

  #[test]
  fn test_no_parse_is_empty() {
    let g = attachment();
    assert!(g.parse(&["pipe", "the", "lit"]).unwrap().is_empty());
  }

  #[test]
  fn test_ambiguity_overflow() {
    let g: Grammar = r#"
      S -> S Conj S | NP VP
      NP -> N
      VP -> V
      N -> "holmes" | "we"
      V -> "smiled" | "sat"
      Conj -> "and"
    "#
    .parse()
    .unwrap();

    let tokens = "holmes smiled and we sat and holmes sat and we smiled"
      .split(' ')
      .collect::<Vec<_>>();

    // four conjoined clauses bracket five ways
    let trees = g.parse(&tokens).unwrap();
    assert_eq!(trees.len(), 5);
    check_trees(&g, &tokens, &trees);

    let options = ParseOptions::default().with_max_trees(4);
    assert_eq!(
      g.parse_with(&tokens, &options).unwrap_err(),
      ParseError::AmbiguityOverflow { limit: 4 }
    );
  }

  #[test]
  fn test_parallel_parses() {
    let g = builtin::grammar().unwrap();
    let sentences = [
      "Holmes sat.",
      "Holmes lit a pipe.",
      "We arrived the day before Thursday.",
      "Holmes sat in the red armchair and he chuckled.",
      "My companion smiled an enigmatical smile.",
      "Holmes chuckled to himself.",
      "She never said a word until we were at the door here.",
      "Holmes arrived here.",
      "The little red door came down.",
      "I had a little moist red paint in the palm of my hand.",
    ];

    let serial = sentences
      .iter()
      .map(|s| g.parse(&tokenize(s)))
      .collect::<Vec<_>>();

    let grammar = &g;
    let parallel = std::thread::scope(|scope| {
      let handles = sentences
        .iter()
        .map(|s| scope.spawn(move || grammar.parse(&tokenize(s))))
        .collect::<Vec<_>>();
      handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .collect::<Vec<_>>()
    });

    assert_eq!(serial, parallel);
    for (sentence, result) in sentences.iter().zip(serial.iter()) {
      let trees = result.as_ref().unwrap();
      assert!(!trees.is_empty(), "no parse for {}", sentence);
      let tokens = tokenize(sentence);
      let tokens = tokens.iter().map(String::as_str).collect::<Vec<_>>();
      check_trees(&g, &tokens, trees);
    }
  }
}
