//! Similarity ranking over the precomputed matrix
//!
//! A pure sort-and-slice: no state, no side effects.

/// Returns the `k` highest-scoring neighbors of `index`, descending by score,
/// ties broken by ascending column index. The query row itself is excluded by
/// index, so the result is correct even when self-similarity is not maximal.
///
/// When `k` exceeds the available candidates the whole remainder is returned.
/// `index` must be a valid row index into `matrix`.
pub fn rank(matrix: &[Vec<f64>], index: usize, k: usize) -> Vec<(usize, f64)> {
    let row = &matrix[index];
    let mut scored: Vec<(usize, f64)> = row
        .iter()
        .copied()
        .enumerate()
        .filter(|&(j, _)| j != index)
        .collect();

    // total_cmp keeps NaN scores at the bottom instead of breaking the sort
    scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    scored.truncate(k);
    scored
}
