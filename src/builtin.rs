//! The bundled sentence grammar: a small English syntax over a fixed
//! vocabulary of adjectives, adverbs, conjunctions, determiners, nouns,
//! prepositions and verbs.

use crate::error::GrammarDefinitionError;
use crate::grammar::Grammar;

/// Syntactic rules; `S` is the start symbol
pub const SENTENCES: &str = include_str!("../grammars/sentences.cfg");

/// Lexical rules
pub const LEXICON: &str = include_str!("../grammars/lexicon.cfg");

pub fn grammar() -> Result<Grammar, GrammarDefinitionError> {
  Grammar::from_blocks(&[SENTENCES, LEXICON])
}
