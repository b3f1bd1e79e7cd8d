//! Candidate generation, Hamming ranking and ratio-test confirmation.
//!
//! Per query descriptor:
//!
//! 1. Union of the target buckets the query falls in, one per group.
//! 2. Counting sort of those candidates by Hamming distance (129 bins, ties
//!    in ascending target index); the first `top_k` survive.
//! 3. Squared L2 distances to the survivors; accept the nearest if
//!    `d1 < ratio² · d2`, reporting `sqrt(d1)`.
//!
//! A small target (no more descriptors than `top_k`) can leave a query with
//! fewer than two bucket candidates even though the ratio test would cost at
//! most `top_k` exact distances. In that case, and only then, every target
//! descriptor becomes a candidate (see
//! [`MatchOptions::exhaustive_small_targets`]).

use log::{debug, warn};
use smallvec::SmallVec;
use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::hasher::CascadeHasher;
use super::hashing::HashedDescriptor;
use super::image::HashedImage;
use super::{DEFAULT_LOWES_RATIO, DEFAULT_TOP_K, HASH_CODE_BITS};
use crate::error::{CascadeError, Result};
use crate::simd;

/// Tuning knobs for matching.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchOptions {
    /// Lowe's ratio in `[0, 1]`. 0 accepts nothing; 1 accepts any strictly
    /// unambiguous nearest neighbor.
    pub lowes_ratio: f32,
    /// Candidates kept after Hamming ranking (at least 2).
    pub top_k: usize,
    /// When the bucket union yields fewer than two candidates and the target
    /// has at most `top_k` descriptors, use the whole target instead.
    pub exhaustive_small_targets: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            lowes_ratio: DEFAULT_LOWES_RATIO,
            top_k: DEFAULT_TOP_K,
            exhaustive_small_targets: true,
        }
    }
}

impl MatchOptions {
    /// Set Lowe's ratio.
    pub fn with_lowes_ratio(self, lowes_ratio: f32) -> Self {
        Self {
            lowes_ratio,
            ..self
        }
    }

    /// Set the Hamming-ranking cutoff.
    pub fn with_top_k(self, top_k: usize) -> Self {
        Self { top_k, ..self }
    }

    /// Enable or disable the small-target fallback.
    pub fn with_exhaustive_small_targets(self, enabled: bool) -> Self {
        Self {
            exhaustive_small_targets: enabled,
            ..self
        }
    }

    /// Check parameter ranges.
    pub fn validate(&self) -> Result<()> {
        if !self.lowes_ratio.is_finite() || !(0.0..=1.0).contains(&self.lowes_ratio) {
            return Err(CascadeError::InvalidParameter(format!(
                "lowes_ratio must be in [0, 1], got {}",
                self.lowes_ratio
            )));
        }
        if self.top_k < 2 {
            return Err(CascadeError::InvalidParameter(format!(
                "top_k must be >= 2 for the ratio test, got {}",
                self.top_k
            )));
        }
        Ok(())
    }
}

/// An accepted correspondence from a query descriptor to a target descriptor.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexedMatch {
    /// Index into the query image's descriptors.
    pub query: usize,
    /// Index into the target image's descriptors.
    pub target: usize,
    /// Euclidean distance between the two raw descriptors.
    pub distance: f32,
}

impl IndexedMatch {
    /// `(query, target)` index pair.
    pub fn pair(&self) -> (usize, usize) {
        (self.query, self.target)
    }
}

/// Counters collected over one matching call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchStats {
    /// Query descriptors processed.
    pub queries: usize,
    /// Queries with at least two candidates (eligible for the ratio test).
    pub ratio_tested: usize,
    /// Candidates summed over all queries, before Hamming ranking.
    pub candidates: usize,
    /// Exact squared distances computed.
    pub exact_distances: usize,
    /// Matches accepted.
    pub accepted: usize,
}

impl MatchStats {
    #[cfg(feature = "parallel")]
    fn merge(&mut self, other: &MatchStats) {
        self.queries += other.queries;
        self.ratio_tested += other.ratio_tested;
        self.candidates += other.candidates;
        self.exact_distances += other.exact_distances;
        self.accepted += other.accepted;
    }

    /// Mean candidate set size per query.
    pub fn mean_candidates(&self) -> f64 {
        if self.queries == 0 {
            return 0.0;
        }
        self.candidates as f64 / self.queries as f64
    }
}

/// Per-worker buffers, reused across queries.
struct Scratch {
    visited: Vec<bool>,
    candidates: Vec<usize>,
    bins: Vec<Vec<usize>>,
}

impl Scratch {
    fn new(target_len: usize) -> Self {
        Self {
            visited: vec![false; target_len],
            candidates: Vec::new(),
            bins: vec![Vec::new(); HASH_CODE_BITS + 1],
        }
    }
}

/// Read-only view of the target side shared by all queries.
struct Target<'a, T> {
    image: &'a HashedImage,
    raw: &'a [T],
    top_k: usize,
    ratio_sq: f32,
    small_target: bool,
}

impl<T: AsRef<[f32]>> Target<'_, T> {
    /// Best target index and its distance, if the ratio test accepts it.
    fn match_one(
        &self,
        query: &HashedDescriptor,
        query_raw: &[f32],
        scratch: &mut Scratch,
        stats: &mut MatchStats,
    ) -> Option<(usize, f32)> {
        stats.queries += 1;

        let candidates = &mut scratch.candidates;
        candidates.clear();
        for (group, &bucket_id) in query.bucket_ids().iter().enumerate() {
            for &j in self.image.buckets.bucket(group, bucket_id) {
                if !scratch.visited[j] {
                    scratch.visited[j] = true;
                    candidates.push(j);
                }
            }
        }
        for &j in candidates.iter() {
            scratch.visited[j] = false;
        }
        if candidates.len() < 2 && self.small_target {
            candidates.clear();
            candidates.extend(0..self.image.len());
        } else {
            candidates.sort_unstable();
        }

        stats.candidates += candidates.len();
        if candidates.len() < 2 {
            return None;
        }
        stats.ratio_tested += 1;

        let code = query.hash_code();
        for &j in candidates.iter() {
            let d = code.hamming_distance(self.image.descriptors[j].hash_code());
            scratch.bins[d as usize].push(j);
        }

        let mut top: SmallVec<[usize; 16]> = SmallVec::new();
        for bin in scratch.bins.iter_mut() {
            if top.len() < self.top_k && !bin.is_empty() {
                let take = (self.top_k - top.len()).min(bin.len());
                top.extend_from_slice(&bin[..take]);
            }
            bin.clear();
        }

        let mut best = (f32::INFINITY, usize::MAX);
        let mut second = f32::INFINITY;
        for &j in &top {
            let d = simd::l2_distance_squared(query_raw, self.raw[j].as_ref());
            if d < best.0 {
                second = best.0;
                best = (d, j);
            } else if d < second {
                second = d;
            }
        }
        stats.exact_distances += top.len();

        // A NaN distance never ranks, so `second` may still be unset.
        if second.is_finite() && best.0 < self.ratio_sq * second {
            stats.accepted += 1;
            Some((best.1, best.0.sqrt()))
        } else {
            None
        }
    }
}

impl CascadeHasher {
    /// Match `query` against `target` with Lowe's ratio `lowes_ratio` and
    /// default options otherwise.
    ///
    /// `query_desc` / `target_desc` are the raw descriptors the hashed images
    /// were built from, in the same order. The result holds at most one match
    /// per query descriptor, sorted by query index; several queries may match
    /// the same target.
    pub fn match_images<Q, T>(
        &self,
        query: &HashedImage,
        query_desc: &[Q],
        target: &HashedImage,
        target_desc: &[T],
        lowes_ratio: f32,
    ) -> Result<Vec<IndexedMatch>>
    where
        Q: AsRef<[f32]> + Sync,
        T: AsRef<[f32]> + Sync,
    {
        let options = MatchOptions::default().with_lowes_ratio(lowes_ratio);
        self.match_images_with(query, query_desc, target, target_desc, &options)
    }

    /// Match with explicit options.
    pub fn match_images_with<Q, T>(
        &self,
        query: &HashedImage,
        query_desc: &[Q],
        target: &HashedImage,
        target_desc: &[T],
        options: &MatchOptions,
    ) -> Result<Vec<IndexedMatch>>
    where
        Q: AsRef<[f32]> + Sync,
        T: AsRef<[f32]> + Sync,
    {
        self.match_images_with_stats(query, query_desc, target, target_desc, options)
            .map(|(matches, _)| matches)
    }

    /// Match with explicit options, also returning candidate statistics.
    pub fn match_images_with_stats<Q, T>(
        &self,
        query: &HashedImage,
        query_desc: &[Q],
        target: &HashedImage,
        target_desc: &[T],
        options: &MatchOptions,
    ) -> Result<(Vec<IndexedMatch>, MatchStats)>
    where
        Q: AsRef<[f32]> + Sync,
        T: AsRef<[f32]> + Sync,
    {
        options.validate()?;
        if query.len() != query_desc.len() {
            return Err(CascadeError::LengthMismatch {
                hashed: query.len(),
                raw: query_desc.len(),
            });
        }
        if target.len() != target_desc.len() {
            return Err(CascadeError::LengthMismatch {
                hashed: target.len(),
                raw: target_desc.len(),
            });
        }
        self.check_dimensions(query_desc)?;
        self.check_dimensions(target_desc)?;

        if options.lowes_ratio == 0.0 {
            warn!("CascadeHasher::match_images lowes_ratio=0 rejects every match");
        }
        if query.is_empty() || target.is_empty() {
            debug!(
                "CascadeHasher::match_images skipped: query={} target={}",
                query.len(),
                target.len()
            );
            return Ok((Vec::new(), MatchStats::default()));
        }

        let start = Instant::now();
        let view = Target {
            image: target,
            raw: target_desc,
            top_k: options.top_k,
            ratio_sq: options.lowes_ratio * options.lowes_ratio,
            small_target: options.exhaustive_small_targets && target.len() <= options.top_k,
        };

        let mut matches = Vec::new();
        let mut stats = MatchStats::default();

        #[cfg(feature = "parallel")]
        {
            let per_query: Vec<(Option<IndexedMatch>, MatchStats)> = (0..query.len())
                .into_par_iter()
                .map_init(
                    || Scratch::new(target.len()),
                    |scratch, i| {
                        let mut local = MatchStats::default();
                        let found = view
                            .match_one(
                                &query.descriptors[i],
                                query_desc[i].as_ref(),
                                scratch,
                                &mut local,
                            )
                            .map(|(j, distance)| IndexedMatch {
                                query: i,
                                target: j,
                                distance,
                            });
                        (found, local)
                    },
                )
                .collect();
            for (found, local) in per_query {
                stats.merge(&local);
                matches.extend(found);
            }
        }

        #[cfg(not(feature = "parallel"))]
        {
            let mut scratch = Scratch::new(target.len());
            for (i, (hashed, raw)) in query.descriptors.iter().zip(query_desc).enumerate() {
                if let Some((j, distance)) =
                    view.match_one(hashed, raw.as_ref(), &mut scratch, &mut stats)
                {
                    matches.push(IndexedMatch {
                        query: i,
                        target: j,
                        distance,
                    });
                }
            }
        }

        debug!(
            "CascadeHasher::match_images query={} target={} small_target={} mean_candidates={:.1} accepted={} elapsed_ms={:.3}",
            query.len(),
            target.len(),
            view.small_target,
            stats.mean_candidates(),
            stats.accepted,
            start.elapsed().as_secs_f64() * 1000.0
        );

        Ok((matches, stats))
    }

    /// Hash two descriptor sets and match the first against the second.
    pub fn match_descriptors<Q, T>(
        &self,
        query_desc: &[Q],
        target_desc: &[T],
        options: &MatchOptions,
    ) -> Result<Vec<IndexedMatch>>
    where
        Q: AsRef<[f32]> + Sync,
        T: AsRef<[f32]> + Sync,
    {
        let query = self.hash_image(query_desc)?;
        let target = self.hash_image(target_desc)?;
        self.match_images_with(&query, query_desc, &target, target_desc, options)
    }
}
