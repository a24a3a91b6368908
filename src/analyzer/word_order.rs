//! Word-order comparison between a learner transcript and the expected phrase.
//!
//! Both texts must already be normalized, as must the words.

/// Relative rank of each word by its first occurrence in `text`.
///
/// Words that do not occur get `None`. Returns the ranks alongside the number
/// of words that were found.
fn first_occurrence_ranks(text: &str, words: &[String]) -> (Vec<Option<usize>>, usize) {
    let mut positions: Vec<(usize, usize)> = words
        .iter()
        .enumerate()
        .filter_map(|(index, word)| text.find(word.as_str()).map(|pos| (index, pos)))
        .collect();

    // Stable, so words sharing a position keep list order
    positions.sort_by_key(|&(_, pos)| pos);

    let mut ranks = vec![None; words.len()];
    for (rank, &(index, _)) in positions.iter().enumerate() {
        ranks[index] = Some(rank);
    }

    (ranks, positions.len())
}

/// Count pairs of words whose relative order differs between `actual` and
/// `expected`.
///
/// Returns `None` when either side has fewer than two located words, in which
/// case the order cannot be judged. Only pairs located on both sides count.
pub fn count_inversions(actual: &str, expected: &str, words: &[String]) -> Option<usize> {
    let (actual_ranks, actual_found) = first_occurrence_ranks(actual, words);
    let (expected_ranks, expected_found) = first_occurrence_ranks(expected, words);

    if actual_found < 2 || expected_found < 2 {
        return None;
    }

    let mut inversions = 0;
    for i in 0..words.len() {
        for j in (i + 1)..words.len() {
            if let (Some(ai), Some(aj), Some(ei), Some(ej)) = (
                actual_ranks[i],
                actual_ranks[j],
                expected_ranks[i],
                expected_ranks[j],
            ) {
                if (ai < aj) != (ei < ej) {
                    inversions += 1;
                }
            }
        }
    }

    Some(inversions)
}
