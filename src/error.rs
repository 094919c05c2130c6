use std::error::Error;
use std::fmt;

/// A malformed or inconsistent grammar. Raised once, when the grammar is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarDefinitionError {
  /// No productions at all
  Empty,
  /// The grammar source couldn't be read as `LHS -> alt | alt` lines
  Syntax { line: usize, message: String },
  EmptyRhs { lhs: String },
  /// Terminals and nonterminals on the same right-hand side
  MixedRhs { production: String },
  /// More than one terminal on a right-hand side
  MultiWordLexical { production: String },
  UndefinedNonterminal { name: String, production: String },
  UndefinedStart { start: String },
  /// `A -> B`, `B -> A` and friends, which would yield infinitely many trees
  UnitCycle { symbol: String },
  /// A nonterminal that can never derive any word sequence
  Unproductive { symbol: String },
}

impl fmt::Display for GrammarDefinitionError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Empty => write!(f, "empty ruleset"),
      Self::Syntax { line, message } => write!(f, "grammar syntax error on line {}: {}", line, message),
      Self::EmptyRhs { lhs } => write!(f, "production for {} has an empty right-hand side", lhs),
      Self::MixedRhs { production } => {
        write!(f, "production mixes terminals and nonterminals: {}", production)
      }
      Self::MultiWordLexical { production } => {
        write!(f, "lexical production must have exactly one word: {}", production)
      }
      Self::UndefinedNonterminal { name, production } => {
        write!(f, "nonterminal {} is never defined (used in {})", name, production)
      }
      Self::UndefinedStart { start } => write!(f, "start symbol {} has no productions", start),
      Self::UnitCycle { symbol } => write!(f, "unit productions form a cycle through {}", symbol),
      Self::Unproductive { symbol } => write!(f, "nonterminal {} can never derive any words", symbol),
    }
  }
}

impl Error for GrammarDefinitionError {}

/// Failure of a single parse. The grammar is untouched, so later parses aren't affected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
  /// `word` at token index `position` has no lexical production anywhere in the grammar
  UnknownWord { word: String, position: usize },
  /// The sentence has more than `limit` parse trees
  AmbiguityOverflow { limit: usize },
}

impl fmt::Display for ParseError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::UnknownWord { word, position } => {
        write!(f, "unknown word \"{}\" at position {}", word, position)
      }
      Self::AmbiguityOverflow { limit } => {
        write!(f, "sentence has more than {} parse trees", limit)
      }
    }
  }
}

impl Error for ParseError {}
