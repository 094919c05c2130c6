use std::error::Error;

/// Boxed static error type
pub type Err = Box<dyn Error + 'static>;

/// Takes a list where each element is a set of choices, and returns all the possible sets
/// generated, leftmost choice varying slowest. Will clone the elements.
///
/// ```
/// let v = vec![
///   vec![1],
///   vec![2, 3],
///   vec![4],
///   vec![5, 6, 7],
/// ];
///
/// assert_eq!(sentree::utils::combinations(&v), vec![
///   vec![1, 2, 4, 5],
///   vec![1, 2, 4, 6],
///   vec![1, 2, 4, 7],
///   vec![1, 3, 4, 5],
///   vec![1, 3, 4, 6],
///   vec![1, 3, 4, 7],
/// ]);
/// ```
pub fn combinations<T>(list: &[Vec<T>]) -> Vec<Vec<T>>
where
  T: Clone,
{
  if list.is_empty() {
    return Vec::new();
  }

  let mut seqs = vec![Vec::with_capacity(list.len())];
  for choices in list {
    seqs = seqs
      .into_iter()
      .flat_map(|prefix| {
        // append every choice to every prefix built so far
        choices.iter().map(move |v| {
          let mut seq = prefix.clone();
          seq.push(v.clone());
          seq
        })
      })
      .collect();
  }
  seqs
}
