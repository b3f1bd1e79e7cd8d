//! Exhaustive ratio-test matching, the exact counterpart of cascade matching.

use crate::cascade::hashing::check_dimensions;
use crate::cascade::{IndexedMatch, MatchOptions};
use crate::error::Result;
use crate::simd;

/// Match every query descriptor against every target descriptor.
///
/// Applies the same acceptance rule as cascade matching (`d1 < ratio² · d2`
/// on squared distances, at least two targets required) without any
/// candidate pruning. Cost is `O(|query| · |target| · d)`.
pub fn brute_force_matches<Q, T>(
    query: &[Q],
    target: &[T],
    lowes_ratio: f32,
) -> Result<Vec<IndexedMatch>>
where
    Q: AsRef<[f32]>,
    T: AsRef<[f32]>,
{
    MatchOptions::default()
        .with_lowes_ratio(lowes_ratio)
        .validate()?;

    let Some(dimension) = query
        .first()
        .map(|q| q.as_ref().len())
        .or_else(|| target.first().map(|t| t.as_ref().len()))
    else {
        return Ok(Vec::new());
    };
    check_dimensions(query, dimension)?;
    check_dimensions(target, dimension)?;
    if query.is_empty() || target.len() < 2 {
        return Ok(Vec::new());
    }

    let ratio_sq = lowes_ratio * lowes_ratio;
    let mut matches = Vec::new();
    for (i, q) in query.iter().enumerate() {
        let q = q.as_ref();
        let mut best = (f32::INFINITY, usize::MAX);
        let mut second = f32::INFINITY;
        for (j, t) in target.iter().enumerate() {
            let d = simd::l2_distance_squared(q, t.as_ref());
            if d < best.0 {
                second = best.0;
                best = (d, j);
            } else if d < second {
                second = d;
            }
        }
        if second.is_finite() && best.0 < ratio_sq * second {
            matches.push(IndexedMatch {
                query: i,
                target: best.1,
                distance: best.0.sqrt(),
            });
        }
    }
    Ok(matches)
}
