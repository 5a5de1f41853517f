use crate::domain::dataset::Dataset;

/// Names closest to a query, borrowed from the searched dataset.
#[derive(Debug, PartialEq, Eq)]
pub struct MatchResult<'a> {
    /// Every name at `min_distance`, in dataset order.
    pub names: Vec<&'a str>,
    /// `None` when the dataset is empty.
    pub min_distance: Option<usize>,
}

/// Levenshtein distance counted in Unicode scalar values, so `Š` and `S`
/// differ by one substitution.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Returns all names with the minimal edit distance to `query`.
///
/// Ties are kept; nothing is ranked beyond the distance itself.
pub fn find_closest<'a>(query: &str, dataset: &'a Dataset) -> MatchResult<'a> {
    let mut names = Vec::new();
    let mut min_distance = None;

    for candidate in dataset.iter() {
        let distance = levenshtein(query, candidate);
        match min_distance {
            Some(min) if distance > min => continue,
            Some(min) if distance == min => {}
            _ => {
                names.clear();
                min_distance = Some(distance);
            }
        }
        names.push(candidate);
    }

    MatchResult {
        names,
        min_distance,
    }
}
