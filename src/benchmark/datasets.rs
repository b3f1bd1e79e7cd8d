//! Synthetic descriptor pairs with known correspondences.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};

/// Two images' descriptors plus the true query → target correspondences.
#[derive(Debug, Clone)]
pub struct DescriptorPair {
    /// Query image descriptors: noisy copies first, then distractors.
    pub query: Vec<Vec<f32>>,
    /// Target image descriptors.
    pub target: Vec<Vec<f32>>,
    /// `(query index, target index)` for every noisy copy.
    pub ground_truth: Vec<(usize, usize)>,
    /// Descriptor dimensionality.
    pub dimension: usize,
}

impl DescriptorPair {
    /// Number of query descriptors.
    pub fn n_query(&self) -> usize {
        self.query.len()
    }

    /// Number of target descriptors.
    pub fn n_target(&self) -> usize {
        self.target.len()
    }

    /// Total memory footprint of raw descriptors in bytes.
    pub fn memory_bytes(&self) -> usize {
        (self.query.len() + self.target.len()) * self.dimension * std::mem::size_of::<f32>()
    }
}

/// Generate a descriptor pair resembling two overlapping views.
///
/// Target descriptors are uniform in `[0, 1]^d`. The first `n_shared` query
/// descriptors are copies of distinct, randomly chosen target descriptors
/// with Gaussian noise of standard deviation `noise_std` added per
/// component; the remaining `n_distractors` are fresh uniform vectors with no
/// counterpart.
///
/// # Panics
///
/// Panics if `n_shared > n_target`.
pub fn create_descriptor_pair(
    n_target: usize,
    n_shared: usize,
    n_distractors: usize,
    dimension: usize,
    noise_std: f32,
    seed: u64,
) -> DescriptorPair {
    assert!(n_shared <= n_target, "cannot share more descriptors than the target has");
    let mut rng = StdRng::seed_from_u64(seed);

    let target: Vec<Vec<f32>> = (0..n_target)
        .map(|_| uniform_descriptor(&mut rng, dimension))
        .collect();

    let mut order: Vec<usize> = (0..n_target).collect();
    order.shuffle(&mut rng);

    let mut query = Vec::with_capacity(n_shared + n_distractors);
    let mut ground_truth = Vec::with_capacity(n_shared);
    for (q, &t) in order.iter().take(n_shared).enumerate() {
        let noisy = target[t]
            .iter()
            .map(|&v| {
                let z: f32 = StandardNormal.sample(&mut rng);
                v + z * noise_std
            })
            .collect();
        query.push(noisy);
        ground_truth.push((q, t));
    }
    query.extend((0..n_distractors).map(|_| uniform_descriptor(&mut rng, dimension)));

    DescriptorPair {
        query,
        target,
        ground_truth,
        dimension,
    }
}

/// `n` uniform random descriptors in `[0, 1]^d`.
pub fn random_descriptors(n: usize, dimension: usize, seed: u64) -> Vec<Vec<f32>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| uniform_descriptor(&mut rng, dimension))
        .collect()
}

fn uniform_descriptor(rng: &mut StdRng, dimension: usize) -> Vec<f32> {
    (0..dimension).map(|_| rng.random::<f32>()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_create_descriptor_pair() {
        let pair = create_descriptor_pair(100, 40, 10, 32, 0.01, 42);
        assert_eq!(pair.n_target(), 100);
        assert_eq!(pair.n_query(), 50);
        assert_eq!(pair.ground_truth.len(), 40);
        assert!(pair.query.iter().chain(&pair.target).all(|d| d.len() == 32));

        let targets: HashSet<usize> = pair.ground_truth.iter().map(|&(_, t)| t).collect();
        assert_eq!(targets.len(), 40, "shared targets must be distinct");
    }

    #[test]
    fn test_noisy_copies_stay_close() {
        let pair = create_descriptor_pair(50, 50, 0, 64, 0.01, 7);
        for &(q, t) in &pair.ground_truth {
            let d2 = crate::simd::l2_distance_squared(&pair.query[q], &pair.target[t]);
            // Expected 64 * 1e-4; allow a wide margin.
            assert!(d2 < 0.05, "pair ({q}, {t}) at {d2}");
        }
    }

    #[test]
    fn test_same_seed_same_pair() {
        let a = create_descriptor_pair(30, 10, 5, 16, 0.05, 3);
        let b = create_descriptor_pair(30, 10, 5, 16, 0.05, 3);
        assert_eq!(a.query, b.query);
        assert_eq!(a.target, b.target);
        assert_eq!(a.ground_truth, b.ground_truth);
    }

    #[test]
    fn test_memory_bytes() {
        let pair = create_descriptor_pair(100, 10, 0, 64, 0.0, 42);
        assert_eq!(pair.memory_bytes(), (100 + 10) * 64 * 4);
    }
}
