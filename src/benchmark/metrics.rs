//! Quality metrics for match lists.
//!
//! - Recall: fraction of reference correspondences that were found
//! - Precision: fraction of found correspondences that are in the reference

use std::collections::HashSet;

use crate::cascade::IndexedMatch;

/// Compute recall: fraction of `reference` pairs present in `found`.
///
/// recall = |found ∩ reference| / |reference|
///
/// Returns 0.0 for an empty reference.
pub fn match_recall(reference: &[(usize, usize)], found: &[IndexedMatch]) -> f32 {
    if reference.is_empty() {
        return 0.0;
    }
    let found_set: HashSet<(usize, usize)> = found.iter().map(IndexedMatch::pair).collect();
    let hits = reference.iter().filter(|&p| found_set.contains(p)).count();
    hits as f32 / reference.len() as f32
}

/// Compute precision: fraction of `found` pairs present in `reference`.
///
/// precision = |found ∩ reference| / |found|
///
/// Returns 0.0 when nothing was found.
pub fn match_precision(reference: &[(usize, usize)], found: &[IndexedMatch]) -> f32 {
    if found.is_empty() {
        return 0.0;
    }
    let reference_set: HashSet<(usize, usize)> = reference.iter().copied().collect();
    let hits = found
        .iter()
        .filter(|m| reference_set.contains(&m.pair()))
        .count();
    hits as f32 / found.len() as f32
}
