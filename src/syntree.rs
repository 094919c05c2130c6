use std::fmt;

/// The nonterminal label of a branch, and the token span `[start, end)` it covers
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct Constituent {
  pub value: String,
  pub span: (usize, usize),
}

impl fmt::Display for Constituent {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}..{}: {}", self.span.0, self.span.1, self.value)
  }
}

#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct Word {
  pub value: String,
  pub span: (usize, usize),
}

impl fmt::Display for Word {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}..{}: {}", self.span.0, self.span.1, self.value)
  }
}

/// An immutable parse tree. Branches always have at least one child.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum SynTree {
  Branch(Constituent, Vec<SynTree>),
  Leaf(Word),
}

impl SynTree {
  pub fn is_leaf(&self) -> bool {
    matches!(self, Self::Leaf(_))
  }

  pub fn is_branch(&self) -> bool {
    matches!(self, Self::Branch(_, _))
  }

  pub fn get_leaf(&self) -> Option<&Word> {
    match self {
      Self::Leaf(w) => Some(w),
      _ => None,
    }
  }

  pub fn get_branch(&self) -> Option<(&Constituent, &[SynTree])> {
    match self {
      Self::Branch(c, cs) => Some((c, cs.as_slice())),
      _ => None,
    }
  }

  /// The nonterminal label of a branch. Leaves have none.
  pub fn label(&self) -> Option<&str> {
    self.get_branch().map(|(c, _)| c.value.as_str())
  }

  /// The terminal word of a leaf
  pub fn word(&self) -> Option<&str> {
    self.get_leaf().map(|w| w.value.as_str())
  }

  /// Ordered children; empty for a leaf
  pub fn children(&self) -> &[SynTree] {
    match self {
      Self::Branch(_, cs) => cs.as_slice(),
      Self::Leaf(_) => &[],
    }
  }

  pub fn span(&self) -> (usize, usize) {
    match self {
      Self::Branch(c, _) => c.span,
      Self::Leaf(w) => w.span,
    }
  }

  /// The words under this node, left to right
  pub fn leaves(&self) -> Leaves<'_> {
    Leaves { stack: vec![self] }
  }

  /// Every node under (and including) this one for which `predicate` holds, in pre-order
  pub fn subtrees<P>(&self, predicate: P) -> Subtrees<'_, P>
  where
    P: FnMut(&SynTree) -> bool,
  {
    Subtrees {
      stack: vec![self],
      predicate,
    }
  }

  /// Depth of the tree; a leaf has height 1
  pub fn height(&self) -> usize {
    1 + self.children().iter().map(SynTree::height).max().unwrap_or(0)
  }
}

pub struct Leaves<'a> {
  stack: Vec<&'a SynTree>,
}

impl<'a> Iterator for Leaves<'a> {
  type Item = &'a str;

  fn next(&mut self) -> Option<Self::Item> {
    while let Some(node) = self.stack.pop() {
      match node {
        SynTree::Leaf(w) => return Some(w.value.as_str()),
        SynTree::Branch(_, cs) => self.stack.extend(cs.iter().rev()),
      }
    }
    None
  }
}

pub struct Subtrees<'a, P> {
  stack: Vec<&'a SynTree>,
  predicate: P,
}

impl<'a, P> Iterator for Subtrees<'a, P>
where
  P: FnMut(&SynTree) -> bool,
{
  type Item = &'a SynTree;

  fn next(&mut self) -> Option<Self::Item> {
    while let Some(node) = self.stack.pop() {
      // children go on reversed so the leftmost is visited first
      self.stack.extend(node.children().iter().rev());
      if (self.predicate)(node) {
        return Some(node);
      }
    }
    None
  }
}

/// Bracketed rendering. Subtrees that fit on one line stay on one line,
/// everything else is indented under its parent:
///
/// ```text
/// (S
///   (NP (N holmes))
///   (VP (V arrived)))
/// ```
impl fmt::Display for SynTree {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Leaf(w) => write!(f, "{}", w.value),
      Self::Branch(c, ts) => {
        write!(f, "({}", c.value)?;
        let rendered = ts.iter().map(|t| t.to_string()).collect::<Vec<_>>();
        if rendered.len() == 1 && !rendered[0].contains('\n') {
          write!(f, " {})", rendered[0])
        } else if ts.iter().all(SynTree::is_leaf) {
          write!(f, " {})", rendered.join(" "))
        } else {
          for child in rendered.iter() {
            for line in child.lines() {
              write!(f, "\n  {}", line)?;
            }
          }
          write!(f, ")")
        }
      }
    }
  }
}
