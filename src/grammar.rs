use std::collections::{HashMap, HashSet};
use std::fmt;

use tracing::{debug, warn};

use crate::error::GrammarDefinitionError;
use crate::rules::{Production, Symbol};

/// An immutable context-free grammar. Productions are kept in declaration
/// order, and indexed by their left-hand side and, for lexical productions,
/// by their word.
#[derive(Debug, Clone)]
pub struct Grammar {
  start: String,
  productions: Vec<Production>,
  /// Nonterminal names, indexed by id, in order of first definition
  nonterminals: Vec<String>,
  ids: HashMap<String, usize>,
  /// Nonterminal id -> indices into `productions`
  by_lhs: Vec<Vec<usize>>,
  /// Word -> indices of the lexical productions for it
  lexicon: HashMap<String, Vec<usize>>,
  /// Per production: lhs id and rhs ids (rhs empty for lexical productions)
  compiled: Vec<(usize, Vec<usize>)>,
}

impl fmt::Display for Grammar {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "// start: {}", self.start)?;
    for p in self.productions.iter() {
      writeln!(f, "{}", p)?;
    }
    Ok(())
  }
}

impl Grammar {
  /// Validates and indexes `productions`. Exact duplicates are dropped.
  pub fn new(start: impl Into<String>, productions: Vec<Production>) -> Result<Self, GrammarDefinitionError> {
    let start = start.into();
    if productions.is_empty() {
      return Err(GrammarDefinitionError::Empty);
    }

    let mut seen = HashSet::new();
    let mut deduped = Vec::with_capacity(productions.len());
    for p in productions {
      Self::check_shape(&p)?;
      if seen.contains(&p) {
        warn!(production = %p, "dropping duplicate production");
        continue;
      }
      seen.insert(p.clone());
      deduped.push(p);
    }
    let productions = deduped;

    let mut nonterminals = Vec::new();
    let mut ids = HashMap::new();
    for p in productions.iter() {
      if !ids.contains_key(&p.lhs) {
        ids.insert(p.lhs.clone(), nonterminals.len());
        nonterminals.push(p.lhs.clone());
      }
    }

    if !ids.contains_key(&start) {
      return Err(GrammarDefinitionError::UndefinedStart { start });
    }

    let mut by_lhs = vec![Vec::new(); nonterminals.len()];
    let mut lexicon: HashMap<String, Vec<usize>> = HashMap::new();
    let mut compiled = Vec::with_capacity(productions.len());
    for (idx, p) in productions.iter().enumerate() {
      let lhs = ids[&p.lhs];
      by_lhs[lhs].push(idx);

      let mut rhs = Vec::new();
      match p.word() {
        Some(word) => lexicon.entry(word.to_string()).or_default().push(idx),
        None => {
          for s in p.rhs.iter() {
            let name = s.symbol_str();
            match ids.get(name) {
              Some(id) => rhs.push(*id),
              None => {
                return Err(GrammarDefinitionError::UndefinedNonterminal {
                  name: name.to_string(),
                  production: p.to_string(),
                });
              }
            }
          }
        }
      }
      compiled.push((lhs, rhs));
    }

    let g = Self {
      start,
      productions,
      nonterminals,
      ids,
      by_lhs,
      lexicon,
      compiled,
    };

    g.check_unit_cycles()?;
    g.check_productive()?;
    g.warn_unreachable();

    debug!(
      start = %g.start,
      productions = g.productions.len(),
      nonterminals = g.nonterminals.len(),
      words = g.lexicon.len(),
      "built grammar"
    );

    Ok(g)
  }

  fn check_shape(p: &Production) -> Result<(), GrammarDefinitionError> {
    if p.is_empty() {
      return Err(GrammarDefinitionError::EmptyRhs { lhs: p.lhs.clone() });
    }
    if p.is_lexical() || p.is_syntactic() {
      Ok(())
    } else if p.rhs.iter().all(Symbol::is_terminal) {
      Err(GrammarDefinitionError::MultiWordLexical {
        production: p.to_string(),
      })
    } else {
      Err(GrammarDefinitionError::MixedRhs {
        production: p.to_string(),
      })
    }
  }

  /// Depth-first search over `A -> B` edges
  fn check_unit_cycles(&self) -> Result<(), GrammarDefinitionError> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
      New,
      Active,
      Done,
    }

    fn visit(g: &Grammar, nt: usize, marks: &mut [Mark]) -> Result<(), GrammarDefinitionError> {
      marks[nt] = Mark::Active;
      for &p in g.by_lhs[nt].iter() {
        let (_, rhs) = &g.compiled[p];
        if let [next] = rhs.as_slice() {
          match marks[*next] {
            Mark::Active => {
              return Err(GrammarDefinitionError::UnitCycle {
                symbol: g.nonterminals[*next].clone(),
              });
            }
            Mark::New => visit(g, *next, marks)?,
            Mark::Done => {}
          }
        }
      }
      marks[nt] = Mark::Done;
      Ok(())
    }

    let mut marks = vec![Mark::New; self.nonterminals.len()];
    for nt in 0..self.nonterminals.len() {
      if marks[nt] == Mark::New {
        visit(self, nt, &mut marks)?;
      }
    }
    Ok(())
  }

  /// Fixpoint: lexical lhs are productive, and so is the lhs of any
  /// syntactic production whose rhs is all productive
  fn check_productive(&self) -> Result<(), GrammarDefinitionError> {
    let mut productive = vec![false; self.nonterminals.len()];

    let mut changed = true;
    while changed {
      changed = false;
      for (lhs, rhs) in self.compiled.iter() {
        if productive[*lhs] {
          continue;
        }
        // lexical productions compile to an empty rhs
        if rhs.iter().all(|r| productive[*r]) {
          productive[*lhs] = true;
          changed = true;
        }
      }
    }

    match productive.iter().position(|p| !p) {
      Some(nt) => Err(GrammarDefinitionError::Unproductive {
        symbol: self.nonterminals[nt].clone(),
      }),
      None => Ok(()),
    }
  }

  fn warn_unreachable(&self) {
    let mut reachable = vec![false; self.nonterminals.len()];
    let mut stack = vec![self.ids[&self.start]];
    while let Some(nt) = stack.pop() {
      if reachable[nt] {
        continue;
      }
      reachable[nt] = true;
      for &p in self.by_lhs[nt].iter() {
        stack.extend(self.compiled[p].1.iter().filter(|r| !reachable[**r]));
      }
    }

    for (nt, name) in self.nonterminals.iter().enumerate() {
      if !reachable[nt] {
        warn!(symbol = %name, "nonterminal is unreachable from the start symbol");
      }
    }
  }

  pub fn start(&self) -> &str {
    &self.start
  }

  /// All productions, in declaration order
  pub fn productions(&self) -> &[Production] {
    &self.productions
  }

  /// Nonterminal names, in order of first definition
  pub fn nonterminals(&self) -> &[String] {
    &self.nonterminals
  }

  /// All productions with `lhs` as their left-hand side, in declaration order
  pub fn productions_for<'a>(&'a self, lhs: &str) -> impl Iterator<Item = &'a Production> + 'a {
    let indices: &[usize] = match self.ids.get(lhs) {
      Some(id) => self.by_lhs[*id].as_slice(),
      None => &[],
    };
    indices.iter().map(move |&idx| &self.productions[idx])
  }

  /// Whether `symbol` is a terminal that some lexical production produces
  pub fn is_terminal(&self, symbol: &Symbol) -> bool {
    match symbol {
      Symbol::Terminal(w) => self.knows_word(w),
      Symbol::Nonterminal(_) => false,
    }
  }

  pub fn knows_word(&self, word: &str) -> bool {
    self.lexicon.contains_key(word)
  }

  pub(crate) fn symbol_count(&self) -> usize {
    self.nonterminals.len()
  }

  pub(crate) fn symbol_id(&self, name: &str) -> Option<usize> {
    self.ids.get(name).copied()
  }

  pub(crate) fn symbol_name(&self, id: usize) -> &str {
    &self.nonterminals[id]
  }

  /// Indices of the lexical productions producing `word`
  pub(crate) fn lexical_for(&self, word: &str) -> &[usize] {
    self.lexicon.get(word).map(Vec::as_slice).unwrap_or(&[])
  }

  /// (lhs id, rhs ids) of production `idx`
  pub(crate) fn compiled(&self, idx: usize) -> (usize, &[usize]) {
    let (lhs, rhs) = &self.compiled[idx];
    (*lhs, rhs)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn holmes() -> Vec<Production> {
    vec![
      Production::syntactic("S", ["NP", "VP"]),
      Production::syntactic("NP", ["N"]),
      Production::syntactic("VP", ["V"]),
      Production::lexical("N", "holmes"),
      Production::lexical("V", "arrived"),
    ]
  }

  #[test]
  fn test_lookup() {
    let g = Grammar::new("S", holmes()).unwrap();

    assert_eq!(g.start(), "S");
    assert_eq!(g.nonterminals(), ["S", "NP", "VP", "N", "V"]);
    assert_eq!(
      g.productions_for("NP").collect::<Vec<_>>(),
      vec![&Production::syntactic("NP", ["N"])]
    );
    assert_eq!(g.productions_for("Adj").count(), 0);
    assert!(g.is_terminal(&Symbol::terminal("holmes")));
    assert!(!g.is_terminal(&Symbol::terminal("watson")));
    assert!(!g.is_terminal(&Symbol::nonterminal("N")));
  }

  #[test]
  fn test_declaration_order_kept() {
    let mut rules = holmes();
    rules.push(Production::syntactic("VP", ["V", "NP"]));
    rules.push(Production::syntactic("VP", ["VP", "VP"]));
    let g = Grammar::new("S", rules).unwrap();

    let vps = g.productions_for("VP").map(|p| p.to_string()).collect::<Vec<_>>();
    assert_eq!(vps, ["VP -> V", "VP -> V NP", "VP -> VP VP"]);
  }

  #[test]
  fn test_duplicates_dropped() {
    let mut rules = holmes();
    rules.push(Production::lexical("N", "holmes"));
    let g = Grammar::new("S", rules).unwrap();
    assert_eq!(g.productions().len(), 5);
  }

  #[test]
  fn test_rejects_malformed() {
    assert_eq!(Grammar::new("S", vec![]).unwrap_err(), GrammarDefinitionError::Empty);

    let err = Grammar::new("S", vec![Production::new("S", vec![])]).unwrap_err();
    assert_eq!(err, GrammarDefinitionError::EmptyRhs { lhs: "S".into() });

    let mixed = Production::new("S", vec![Symbol::nonterminal("N"), Symbol::terminal("arrived")]);
    let mut rules = holmes();
    rules.push(mixed);
    assert!(matches!(
      Grammar::new("S", rules).unwrap_err(),
      GrammarDefinitionError::MixedRhs { .. }
    ));

    let two_words = Production::new("N", vec![Symbol::terminal("sherlock"), Symbol::terminal("holmes")]);
    let mut rules = holmes();
    rules.push(two_words);
    assert!(matches!(
      Grammar::new("S", rules).unwrap_err(),
      GrammarDefinitionError::MultiWordLexical { .. }
    ));
  }

  #[test]
  fn test_rejects_undefined() {
    let mut rules = holmes();
    rules.push(Production::syntactic("VP", ["V", "PP"]));
    assert_eq!(
      Grammar::new("S", rules).unwrap_err(),
      GrammarDefinitionError::UndefinedNonterminal {
        name: "PP".into(),
        production: "VP -> V PP".into(),
      }
    );

    assert_eq!(
      Grammar::new("Sentence", holmes()).unwrap_err(),
      GrammarDefinitionError::UndefinedStart { start: "Sentence".into() }
    );
  }

  #[test]
  fn test_rejects_unit_cycle() {
    let mut rules = holmes();
    rules.push(Production::syntactic("N", ["NP"]));
    assert!(matches!(
      Grammar::new("S", rules).unwrap_err(),
      GrammarDefinitionError::UnitCycle { .. }
    ));
  }

  #[test]
  fn test_rejects_unproductive() {
    let mut rules = holmes();
    rules.push(Production::syntactic("VP", ["V", "X"]));
    rules.push(Production::syntactic("X", ["X", "N"]));
    assert_eq!(
      Grammar::new("S", rules).unwrap_err(),
      GrammarDefinitionError::Unproductive { symbol: "X".into() }
    );
  }

  #[test]
  fn test_unreachable_is_allowed() {
    let mut rules = holmes();
    rules.push(Production::lexical("Adv", "never"));
    assert!(Grammar::new("S", rules).is_ok());
  }

  #[test]
  fn test_grammar_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Grammar>();
  }
}
