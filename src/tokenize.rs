use regex::Regex;

lazy_static! {
  /// Runs of word characters (keeping inner apostrophes and hyphens), or
  /// runs of punctuation
  static ref TOKEN: Regex = Regex::new(r"\w+(?:['’\-]\w+)*|[^\w\s]+").unwrap();
  static ref ALPHA: Regex = Regex::new(r"[a-z]").unwrap();
}

/// Lower-cases `sentence` and splits it into words, dropping every token
/// without at least one alphabetic character (punctuation, bare numbers)
pub fn tokenize(sentence: &str) -> Vec<String> {
  let sentence = sentence.to_lowercase();
  TOKEN
    .find_iter(&sentence)
    .map(|m| m.as_str())
    .filter(|t| ALPHA.is_match(t))
    .map(str::to_string)
    .collect()
}
