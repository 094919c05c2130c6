//! Line-oriented parsing of grammar files:
//!
//! ```text
//! S -> NP VP | S Conj S      // syntactic alternatives: nonterminal names
//! N -> "holmes" | "pipe"     // lexical alternatives: one quoted word
//! ```

use regex::Regex;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::GrammarDefinitionError;
use crate::grammar::Grammar;
use crate::rules::{Production, Symbol};
use crate::Err;

type Infallible<'a, T> = (T, &'a str);
type ParseResult<'a, T> = Result<(T, &'a str), String>;

/// helper macro for initializing a regex with lazy_static!
macro_rules! regex_static {
  ($name:ident, $pattern:expr) => {
    lazy_static! {
      static ref $name: Regex = Regex::new($pattern).unwrap();
    }
  };
}

/// Try to consume a regex, returning None if it doesn't match
fn optional_re<'a>(re: &'static Regex, s: &'a str) -> Infallible<'a, Option<&'a str>> {
  if let Some(m) = re.find(s) {
    if m.start() > 0 {
      return (None, s);
    }
    let (_, rest) = s.split_at(m.end());
    (Some(m.as_str()), rest)
  } else {
    (None, s)
  }
}

/// Try to consume a regex, failing if it doesn't match
fn needed_re<'a>(re: &'static Regex, s: &'a str) -> ParseResult<'a, &'a str> {
  if let (Some(c), rest) = optional_re(re, s) {
    Ok((c, rest))
  } else {
    Err(format!("couldn't match {} at '{}'", re, s))
  }
}

/// Skips spaces and tabs. Rules never span lines
fn skip_whitespace(s: &str) -> &str {
  regex_static!(WHITESPACE, r"[ \t]+");
  optional_re(&*WHITESPACE, s).1
}

/// Tries to parse a name made of letters, numbers, - and _
fn parse_name(s: &str) -> ParseResult<'_, &str> {
  regex_static!(NAME, r"[a-zA-Z0-9\-_]+");
  needed_re(&*NAME, s).map_err(|err| format!("name: {}", err))
}

/// A double-quoted word, returned without its quotes
fn parse_literal(s: &str) -> ParseResult<'_, &str> {
  regex_static!(LITERAL, r#""[^"]*""#);
  let (lit, s) = needed_re(&*LITERAL, s).map_err(|err| format!("literal: {}", err))?;
  let word = &lit[1..lit.len() - 1];
  if word.is_empty() {
    Err("literal: empty word \"\"".to_string())
  } else {
    Ok((word, s))
  }
}

/// Symbols up to the next `|` or the end of the line. Whether they form a
/// well-shaped production is checked by `Grammar::new`.
fn parse_alternative(s: &str) -> ParseResult<'_, Vec<Symbol>> {
  let mut symbols = Vec::new();
  let mut rem = s;
  loop {
    rem = skip_whitespace(rem);
    if rem.is_empty() || rem.starts_with('|') {
      break;
    }
    if rem.starts_with('"') {
      let (word, s) = parse_literal(rem)?;
      symbols.push(Symbol::terminal(word));
      rem = s;
    } else {
      let (name, s) = parse_name(rem)?;
      symbols.push(Symbol::nonterminal(name));
      rem = s;
    }
  }

  if symbols.is_empty() {
    Err("empty alternative".to_string())
  } else {
    Ok((symbols, rem))
  }
}

/// `LHS -> alt | alt | ...` (comment already stripped)
fn parse_rule(s: &str) -> Result<Vec<Production>, String> {
  #![allow(clippy::trivial_regex)]
  regex_static!(ARROW, "->");

  let s = skip_whitespace(s);
  let (lhs, s) = parse_name(s).map_err(|e| format!("rule symbol: {}", e))?;
  let s = skip_whitespace(s);
  let (_, s) = needed_re(&*ARROW, s).map_err(|e| format!("rule arrow: {}", e))?;

  let mut productions = Vec::new();
  let mut rem = s;
  loop {
    let (rhs, s) = parse_alternative(rem).map_err(|e| format!("rule production: {}", e))?;
    productions.push(Production::new(lhs, rhs));
    match s.strip_prefix('|') {
      Some(s) => rem = s,
      None => return Ok(productions),
    }
  }
}

/// Parses every rule in `s`, in order. Blank lines and `//` comments are skipped.
pub fn parse_rules(s: &str) -> Result<Vec<Production>, GrammarDefinitionError> {
  regex_static!(COMMENT, r"//.*$");

  let mut productions = Vec::new();
  for (idx, line) in s.lines().enumerate() {
    let line = COMMENT.replace(line, "");
    if line.trim().is_empty() {
      continue;
    }
    let mut rules = parse_rule(&line).map_err(|message| GrammarDefinitionError::Syntax {
      line: idx + 1,
      message,
    })?;
    productions.append(&mut rules);
  }
  Ok(productions)
}

impl FromStr for Grammar {
  type Err = GrammarDefinitionError;

  /// Parses a grammar from a string. Assumes the first rule's symbol
  /// is the start symbol.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::from_blocks(&[s])
  }
}

impl Grammar {
  /// Merges several grammar sources, such as a block of syntactic rules and a
  /// lexicon, into one grammar. The first rule of the first non-empty block
  /// names the start symbol.
  pub fn from_blocks(blocks: &[&str]) -> Result<Self, GrammarDefinitionError> {
    let mut productions = Vec::new();
    for block in blocks {
      productions.append(&mut parse_rules(block)?);
    }

    let start = match productions.first() {
      Some(p) => p.lhs.clone(),
      None => return Err(GrammarDefinitionError::Empty),
    };
    Self::new(start, productions)
  }

  pub fn read_from_file<P: AsRef<Path>>(path: P) -> Result<Self, Err> {
    let src = fs::read_to_string(path)?;
    Ok(src.parse::<Self>()?)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_rules() {
    let rules = parse_rules(
      r#"
      // sentences
      S -> NP VP | S Conj S
      N -> "holmes" | "pipe"   // nouns
      N -> "day"
    "#,
    )
    .unwrap();

    let rendered = rules.iter().map(|p| p.to_string()).collect::<Vec<_>>();
    assert_eq!(
      rendered,
      [
        "S -> NP VP",
        "S -> S Conj S",
        "N -> \"holmes\"",
        "N -> \"pipe\"",
        "N -> \"day\"",
      ]
    );
  }

  #[test]
  fn test_syntax_errors_carry_line() {
    let err = parse_rules("S -> NP VP\nNP N\n").unwrap_err();
    assert!(matches!(err, GrammarDefinitionError::Syntax { line: 2, .. }));

    let err = parse_rules("S -> NP VP |\n").unwrap_err();
    assert!(matches!(err, GrammarDefinitionError::Syntax { line: 1, .. }));

    let err = parse_rules("N -> \"\"\n").unwrap_err();
    assert!(matches!(err, GrammarDefinitionError::Syntax { line: 1, .. }));
  }

  #[test]
  fn test_from_str_start_symbol() {
    let g: Grammar = r#"
      S -> NP VP
      NP -> N
      VP -> V
      N -> "holmes"
      V -> "arrived"
    "#
    .parse()
    .unwrap();

    assert_eq!(g.start(), "S");
    assert_eq!(g.productions().len(), 5);
  }

  #[test]
  fn test_from_blocks_merges_lexicon() {
    let syntax = "S -> NP VP\nNP -> N\nVP -> V\n";
    let lexicon = "N -> \"holmes\"\nV -> \"arrived\" | \"smiled\"\n";

    let g = Grammar::from_blocks(&[syntax, lexicon]).unwrap();
    assert_eq!(g.start(), "S");
    assert!(g.knows_word("smiled"));

    // the syntax block alone references undefined categories
    assert!(matches!(
      syntax.parse::<Grammar>().unwrap_err(),
      GrammarDefinitionError::UndefinedNonterminal { .. }
    ));
  }

  #[test]
  fn test_mixed_alternative_rejected() {
    let err = "S -> N \"arrived\"\nN -> \"holmes\"\n".parse::<Grammar>().unwrap_err();
    assert!(matches!(err, GrammarDefinitionError::MixedRhs { .. }));
  }

  #[test]
  fn test_empty_source() {
    assert_eq!(
      "// nothing here\n".parse::<Grammar>().unwrap_err(),
      GrammarDefinitionError::Empty
    );
  }
}
