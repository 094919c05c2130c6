use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Symbol {
  Terminal(String),
  Nonterminal(String),
}

impl Symbol {
  pub fn terminal(word: impl Into<String>) -> Self {
    Self::Terminal(word.into())
  }

  pub fn nonterminal(name: impl Into<String>) -> Self {
    Self::Nonterminal(name.into())
  }

  pub fn symbol_str(&self) -> &str {
    match self {
      Self::Terminal(s) => s,
      Self::Nonterminal(s) => s,
    }
  }

  pub fn is_terminal(&self) -> bool {
    matches!(self, Self::Terminal(_))
  }

  pub fn is_nonterminal(&self) -> bool {
    matches!(self, Self::Nonterminal(_))
  }
}

impl fmt::Display for Symbol {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Terminal(s) => write!(f, "\"{}\"", s),
      Self::Nonterminal(s) => write!(f, "{}", s),
    }
  }
}

/// A rewrite rule `lhs -> rhs`. Either syntactic (only nonterminals on the
/// right) or lexical (exactly one terminal); `Grammar::new` rejects the rest.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Production {
  pub lhs: String,
  pub rhs: Vec<Symbol>,
}

impl Production {
  pub fn new(lhs: impl Into<String>, rhs: Vec<Symbol>) -> Self {
    Self {
      lhs: lhs.into(),
      rhs,
    }
  }

  /// `lhs -> "word"`
  pub fn lexical(lhs: impl Into<String>, word: impl Into<String>) -> Self {
    Self::new(lhs, vec![Symbol::terminal(word)])
  }

  /// `lhs -> A B C`
  pub fn syntactic<I, S>(lhs: impl Into<String>, names: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self::new(lhs, names.into_iter().map(Symbol::nonterminal).collect())
  }

  pub fn len(&self) -> usize {
    self.rhs.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn is_lexical(&self) -> bool {
    self.rhs.len() == 1 && self.rhs[0].is_terminal()
  }

  pub fn is_syntactic(&self) -> bool {
    !self.rhs.is_empty() && self.rhs.iter().all(Symbol::is_nonterminal)
  }

  /// A syntactic production with a single nonterminal on the right, `A -> B`
  pub fn is_unit(&self) -> bool {
    self.rhs.len() == 1 && self.rhs[0].is_nonterminal()
  }

  /// The word of a lexical production
  pub fn word(&self) -> Option<&str> {
    match self.rhs.as_slice() {
      [Symbol::Terminal(w)] => Some(w),
      _ => None,
    }
  }
}

impl fmt::Display for Production {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} ->", self.lhs)?;
    for s in self.rhs.iter() {
      write!(f, " {}", s)?;
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_production_kinds() {
    let lex = Production::lexical("N", "holmes");
    assert!(lex.is_lexical());
    assert!(!lex.is_syntactic());
    assert_eq!(lex.word(), Some("holmes"));

    let unit = Production::syntactic("NP", ["N"]);
    assert!(unit.is_syntactic());
    assert!(unit.is_unit());
    assert_eq!(unit.word(), None);

    let mixed = Production::new("NP", vec![Symbol::nonterminal("Det"), Symbol::terminal("door")]);
    assert!(!mixed.is_lexical());
    assert!(!mixed.is_syntactic());
  }

  #[test]
  fn test_symbols_compare_by_kind_and_value() {
    assert_eq!(Symbol::terminal("n"), Symbol::terminal("n"));
    assert_ne!(Symbol::terminal("N"), Symbol::nonterminal("N"));
  }

  #[test]
  fn test_display() {
    let p = Production::syntactic("S", ["NP", "VP"]);
    assert_eq!(p.to_string(), "S -> NP VP");
    assert_eq!(Production::lexical("V", "arrived").to_string(), "V -> \"arrived\"");
  }
}
