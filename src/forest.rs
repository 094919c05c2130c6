use std::fmt;

use tracing::debug;

use crate::chart::{CellIdx, Chart, Derivation};
use crate::error::ParseError;
use crate::syntree::{Constituent, SynTree, Word};
use crate::utils::combinations;

/// A filled chart, seen as a packed forest of parse trees rooted at the start
/// symbol over the whole input
#[derive(Debug)]
pub struct Forest<'g> {
  chart: Chart<'g>,
}

impl<'g> From<Chart<'g>> for Forest<'g> {
  fn from(chart: Chart<'g>) -> Self {
    Self { chart }
  }
}

impl<'g> Forest<'g> {
  pub fn chart(&self) -> &Chart<'g> {
    &self.chart
  }

  pub fn is_empty(&self) -> bool {
    self.chart.root().is_none()
  }

  /// How many trees the forest holds, saturating at `u64::MAX`
  pub fn count(&self) -> u64 {
    match self.chart.root() {
      Some(root) => self.count_cell(root, &mut vec![None; self.chart.len()]),
      None => 0,
    }
  }

  fn count_cell(&self, idx: CellIdx, memo: &mut Vec<Option<u64>>) -> u64 {
    if let Some(n) = memo[idx.0 as usize] {
      return n;
    }

    let mut total: u64 = 0;
    for d in self.chart.get(idx).derivations.iter() {
      let mut ways: u64 = 1;
      for child in d.children.iter() {
        ways = ways.saturating_mul(self.count_cell(*child, memo));
      }
      total = total.saturating_add(ways);
    }

    memo[idx.0 as usize] = Some(total);
    total
  }

  /// Expands every tree in the forest, in derivation order. Trees are only
  /// built once the total is known to be at most `limit`.
  pub fn trees(&self, limit: usize) -> Result<Vec<SynTree>, ParseError> {
    let Some(root) = self.chart.root() else {
      return Ok(Vec::new());
    };

    let count = self.count();
    debug!(count, limit, "counted trees");
    if count > limit as u64 {
      return Err(ParseError::AmbiguityOverflow { limit });
    }

    Ok(self.make_trees(root, &mut vec![None; self.chart.len()]))
  }

  /// All trees for one cell. Every cell reachable from the root holds at most
  /// as many trees as the root, so the memo stays within the limit too.
  fn make_trees(&self, idx: CellIdx, memo: &mut Vec<Option<Vec<SynTree>>>) -> Vec<SynTree> {
    if let Some(trees) = &memo[idx.0 as usize] {
      return trees.clone();
    }

    let cell = self.chart.get(idx);
    let g = self.chart.grammar();
    let constituent = Constituent {
      value: g.symbol_name(cell.symbol).to_string(),
      span: cell.span,
    };

    let mut trees = Vec::new();
    for Derivation { production, children } in cell.derivations.iter() {
      if children.is_empty() {
        // lexical: the production's word covers the cell's single token
        let word = g.productions()[*production].word().unwrap_or_default();
        trees.push(SynTree::Branch(
          constituent.clone(),
          vec![SynTree::Leaf(Word {
            value: word.to_string(),
            span: cell.span,
          })],
        ));
      } else {
        let child_sets = children
          .iter()
          .map(|child| self.make_trees(*child, memo))
          .collect::<Vec<_>>();
        trees.extend(
          combinations(&child_sets)
            .into_iter()
            .map(|set| SynTree::Branch(constituent.clone(), set)),
        );
      }
    }

    memo[idx.0 as usize] = Some(trees.clone());
    trees
  }
}

impl fmt::Display for Forest<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.chart)
  }
}
