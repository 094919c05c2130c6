use std::fmt;

use tracing::{debug, trace};

use crate::error::ParseError;
use crate::grammar::Grammar;

/// Index of a cell in the chart arena
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct CellIdx(pub u32);

/// One way of building a cell: a production, and the cell covering each of
/// its rhs symbols. Lexical derivations have no child cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Derivation {
  pub production: usize,
  pub children: Vec<CellIdx>,
}

/// Every known way for one nonterminal to derive the tokens in `span`
#[derive(Debug, Clone)]
pub struct Cell {
  pub symbol: usize,
  pub span: (usize, usize),
  pub derivations: Vec<Derivation>,
}

/// Packed parse chart. Cells live in an arena and refer to each other by
/// index; a cell only ever points at cells of shorter spans, or of the same
/// span through a unit production.
#[derive(Debug)]
pub struct Chart<'g> {
  grammar: &'g Grammar,
  words: Vec<String>,
  cells: Vec<Cell>,
  /// (start, end, symbol) -> cell, see `slot`
  index: Vec<Option<CellIdx>>,
}

impl<'g> Chart<'g> {
  fn new(grammar: &'g Grammar, words: Vec<String>) -> Self {
    let n = words.len() + 1;
    Self {
      grammar,
      words,
      cells: Vec::new(),
      index: vec![None; n * n * grammar.symbol_count()],
    }
  }

  fn slot(&self, start: usize, end: usize, symbol: usize) -> usize {
    let n = self.words.len() + 1;
    (start * n + end) * self.grammar.symbol_count() + symbol
  }

  pub fn grammar(&self) -> &'g Grammar {
    self.grammar
  }

  pub fn words(&self) -> &[String] {
    &self.words
  }

  /// Number of cells
  pub fn len(&self) -> usize {
    self.cells.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn derivation_count(&self) -> usize {
    self.cells.iter().map(|c| c.derivations.len()).sum()
  }

  pub fn cell(&self, start: usize, end: usize, symbol: usize) -> Option<CellIdx> {
    self.index[self.slot(start, end, symbol)]
  }

  pub fn get(&self, idx: CellIdx) -> &Cell {
    &self.cells[idx.0 as usize]
  }

  /// The start symbol over the whole input, if the input parses
  pub fn root(&self) -> Option<CellIdx> {
    if self.words.is_empty() {
      return None;
    }
    let start = self.grammar.symbol_id(self.grammar.start())?;
    self.cell(0, self.words.len(), start)
  }

  fn add(&mut self, start: usize, end: usize, symbol: usize, derivation: Derivation) {
    let slot = self.slot(start, end, symbol);
    let idx = match self.index[slot] {
      Some(idx) => idx,
      None => {
        let idx = CellIdx(self.cells.len() as u32);
        self.cells.push(Cell {
          symbol,
          span: (start, end),
          derivations: Vec::new(),
        });
        self.index[slot] = Some(idx);
        trace!(start, end, symbol = self.grammar.symbol_name(symbol), "new cell");
        idx
      }
    };
    self.cells[idx.0 as usize].derivations.push(derivation);
  }

  fn has(&self, start: usize, end: usize, symbol: usize, derivation: &Derivation) -> bool {
    self
      .cell(start, end, symbol)
      .is_some_and(|idx| self.get(idx).derivations.contains(derivation))
  }

  /// Lexical productions for the word at `position`
  fn scan(&mut self, position: usize) {
    let g = self.grammar;
    for &p in g.lexical_for(&self.words[position]) {
      let (lhs, _) = g.compiled(p);
      self.add(
        position,
        position + 1,
        lhs,
        Derivation {
          production: p,
          children: Vec::new(),
        },
      );
    }
  }

  /// Productions with two or more rhs symbols, over every split of the span
  fn combine(&mut self, start: usize, end: usize) {
    let g = self.grammar;
    for p in 0..g.productions().len() {
      let (lhs, rhs) = g.compiled(p);
      if rhs.len() < 2 || rhs.len() > end - start {
        continue;
      }

      let mut found = Vec::new();
      self.splits(rhs, start, end, &mut Vec::with_capacity(rhs.len()), &mut found);
      for children in found {
        self.add(start, end, lhs, Derivation { production: p, children });
      }
    }
  }

  /// Collects into `out` every sequence of cells for `rhs` that exactly tiles
  /// `[start, end)`, by increasing left sub-span length
  fn splits(
    &self,
    rhs: &[usize],
    start: usize,
    end: usize,
    acc: &mut Vec<CellIdx>,
    out: &mut Vec<Vec<CellIdx>>,
  ) {
    let Some((&first, rest)) = rhs.split_first() else {
      if start == end {
        out.push(acc.clone());
      }
      return;
    };

    // leave at least one token for every remaining symbol
    for mid in start + 1..=end - rest.len() {
      if let Some(cell) = self.cell(start, mid, first) {
        acc.push(cell);
        self.splits(rest, mid, end, acc, out);
        acc.pop();
      }
    }
  }

  /// Applies `A -> B` productions within the span until nothing changes.
  /// Terminates because the grammar has no unit cycles.
  fn close_units(&mut self, start: usize, end: usize) {
    let g = self.grammar;
    loop {
      let mut changed = false;
      for p in 0..g.productions().len() {
        let (lhs, rhs) = g.compiled(p);
        let [child] = rhs else { continue };
        let Some(child) = self.cell(start, end, *child) else {
          continue;
        };

        let derivation = Derivation {
          production: p,
          children: vec![child],
        };
        if !self.has(start, end, lhs, &derivation) {
          self.add(start, end, lhs, derivation);
          changed = true;
        }
      }
      if !changed {
        break;
      }
    }

    // unit derivations may have been found after longer ones, restore
    // declaration order (the sort is stable, so splits stay ordered)
    for symbol in 0..g.symbol_count() {
      if let Some(idx) = self.cell(start, end, symbol) {
        self.cells[idx.0 as usize]
          .derivations
          .sort_by_key(|d| d.production);
      }
    }
  }
}

impl fmt::Display for Chart<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let g = self.grammar;
    for cell in self.cells.iter() {
      writeln!(f, "{}..{}: {}", cell.span.0, cell.span.1, g.symbol_name(cell.symbol))?;
      for d in cell.derivations.iter() {
        write!(f, "  {}", g.productions()[d.production])?;
        for child in d.children.iter() {
          let (s, e) = self.get(*child).span;
          write!(f, " [{}..{}]", s, e)?;
        }
        writeln!(f)?;
      }
    }
    Ok(())
  }
}

/// Fills the chart bottom-up, shortest spans first. Fails up front if a word
/// has no lexical production, since then no tree could ever cover the input.
pub fn parse_chart<'g, S: AsRef<str>>(g: &'g Grammar, input: &[S]) -> Result<Chart<'g>, ParseError> {
  for (position, word) in input.iter().enumerate() {
    let word = word.as_ref();
    if !g.knows_word(word) {
      return Err(ParseError::UnknownWord {
        word: word.to_string(),
        position,
      });
    }
  }

  let words = input.iter().map(|w| w.as_ref().to_string()).collect::<Vec<_>>();
  let n = words.len();
  let mut chart = Chart::new(g, words);

  for position in 0..n {
    chart.scan(position);
    chart.close_units(position, position + 1);
  }

  for len in 2..=n {
    for start in 0..=n - len {
      chart.combine(start, start + len);
      chart.close_units(start, start + len);
    }
  }

  debug!(
    words = n,
    cells = chart.len(),
    derivations = chart.derivation_count(),
    "filled chart"
  );

  Ok(chart)
}
