//! End-to-end matching scenarios.
//!
//! Hash two images, match them, and check the result against known
//! correspondences or an exhaustive reference.

use cascade_hash::benchmark::{
    brute_force_matches, create_descriptor_pair, match_precision, match_recall,
    random_descriptors,
};
use cascade_hash::{CascadeHasher, IndexedMatch, MatchOptions};
use std::collections::HashSet;

#[test]
fn identical_descriptor_beats_unrelated_one() {
    let hasher = CascadeHasher::with_seed(4, 1).expect("Failed to create");
    let image_a = vec![vec![1.0f32, 1.0, 1.0, 1.0]];
    let image_b = vec![vec![1.0f32, 1.0, 1.0, 1.0], vec![-5.0, -5.0, -5.0, -5.0]];

    let hashed_a = hasher.hash_image(&image_a).expect("Failed to hash");
    let hashed_b = hasher.hash_image(&image_b).expect("Failed to hash");
    let matches = hasher
        .match_images(&hashed_a, &image_a, &hashed_b, &image_b, 0.8)
        .expect("Match failed");

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].pair(), (0, 0));
    assert!(matches[0].distance.abs() < 1e-6);
}

#[test]
fn identical_descriptor_matches_for_many_seeds() {
    let image_a = vec![vec![1.0f32, 1.0, 1.0, 1.0]];
    let image_b = vec![vec![1.0f32, 1.0, 1.0, 1.0], vec![-5.0, -5.0, -5.0, -5.0]];

    for seed in 0..20 {
        let hasher = CascadeHasher::with_seed(4, seed).unwrap();
        let matches = hasher
            .match_descriptors(&image_a, &image_b, &MatchOptions::default())
            .unwrap();
        assert_eq!(matches.len(), 1, "seed {seed}");
        assert_eq!(matches[0].pair(), (0, 0), "seed {seed}");
    }
}

#[test]
fn empty_query_image_matches_nothing() {
    let hasher = CascadeHasher::with_seed(16, 3).unwrap();
    let empty: Vec<Vec<f32>> = Vec::new();
    let target = random_descriptors(40, 16, 4);

    let hashed_empty = hasher.hash_image(&empty).unwrap();
    let hashed_target = hasher.hash_image(&target).unwrap();

    let matches = hasher
        .match_images(&hashed_empty, &empty, &hashed_target, &target, 0.8)
        .unwrap();
    assert!(matches.is_empty());

    let matches = hasher
        .match_images(&hashed_target, &target, &hashed_empty, &empty, 0.8)
        .unwrap();
    assert!(matches.is_empty());
}

#[test]
fn scale_scenario_returns_valid_unique_pairs() {
    let dim = 128;
    let query = random_descriptors(500, dim, 11);
    let target = random_descriptors(600, dim, 12);
    let hasher = CascadeHasher::with_seed(dim, 13).unwrap();

    let hq = hasher.hash_image(&query).unwrap();
    let ht = hasher.hash_image(&target).unwrap();
    let (matches, stats) = hasher
        .match_images_with_stats(&hq, &query, &ht, &target, &MatchOptions::default())
        .unwrap();

    assert_eq!(stats.queries, 500);
    assert_eq!(stats.accepted, matches.len());

    let mut seen = HashSet::new();
    for m in &matches {
        assert!(m.query < 500, "query index {} out of range", m.query);
        assert!(m.target < 600, "target index {} out of range", m.target);
        assert!(seen.insert(m.pair()), "pair {:?} returned twice", m.pair());
        assert!(m.distance.is_finite() && m.distance >= 0.0);
    }
    assert!(matches.windows(2).all(|w| w[0].query < w[1].query));
}

#[test]
fn identical_descriptors_hash_identically_and_match_exactly() {
    // A reversed copy has the same mean, so every descriptor is centered
    // identically in both images.
    let dim = 64;
    let n = 300;
    let image_a = random_descriptors(n, dim, 21);
    let image_b: Vec<Vec<f32>> = image_a.iter().rev().cloned().collect();

    let hasher = CascadeHasher::with_seed(dim, 22).unwrap();
    let ha = hasher.hash_image(&image_a).unwrap();
    let hb = hasher.hash_image(&image_b).unwrap();
    assert_eq!(ha.mean_descriptor(), hb.mean_descriptor());

    let mut eligible = 0;
    for i in 0..n {
        let twin = n - 1 - i;
        let da = &ha.descriptors()[i];
        let db = &hb.descriptors()[twin];
        assert_eq!(da.hash_code(), db.hash_code());
        assert_eq!(da.bucket_ids(), db.bucket_ids());
        assert_eq!(da.hash_code().hamming_distance(db.hash_code()), 0);

        let candidates = hb.candidates_for(da);
        assert!(candidates.contains(&twin));
        if candidates.len() >= 2 {
            eligible += 1;
        }
    }

    let matches = hasher
        .match_images(&ha, &image_a, &hb, &image_b, 0.8)
        .unwrap();
    assert_eq!(matches.len(), eligible);
    for m in &matches {
        assert_eq!(m.target, n - 1 - m.query);
        assert_eq!(m.distance, 0.0);
    }
}

#[test]
fn independent_runs_are_bit_identical() {
    let pair = create_descriptor_pair(300, 100, 30, 64, 0.02, 5);

    let run = || -> Vec<IndexedMatch> {
        let hasher = CascadeHasher::with_seed(64, 99).unwrap();
        let hq = hasher.hash_image(&pair.query).unwrap();
        let ht = hasher.hash_image(&pair.target).unwrap();
        hasher
            .match_images(&hq, &pair.query, &ht, &pair.target, 0.8)
            .unwrap()
    };

    let first = run();
    let second = run();
    assert_eq!(first, second);
    assert!(!first.is_empty());
}

#[test]
fn recovers_noisy_copies() {
    let dim = 128;
    let pair = create_descriptor_pair(1000, 300, 100, dim, 0.02, 31);
    let hasher = CascadeHasher::with_seed(dim, 32).unwrap();

    let matches = hasher
        .match_descriptors(&pair.query, &pair.target, &MatchOptions::default())
        .unwrap();

    let recall = match_recall(&pair.ground_truth, &matches);
    let precision = match_precision(&pair.ground_truth, &matches);
    assert!(recall > 0.9, "recall = {recall}");
    assert!(precision > 0.9, "precision = {precision}");
}

#[test]
fn cascade_recall_against_exhaustive_matching() {
    let dim = 128;
    let pair = create_descriptor_pair(800, 250, 50, dim, 0.02, 41);
    let hasher = CascadeHasher::with_seed(dim, 42).unwrap();

    let cascade = hasher
        .match_descriptors(&pair.query, &pair.target, &MatchOptions::default())
        .unwrap();
    let exact = brute_force_matches(&pair.query, &pair.target, 0.8).unwrap();
    let exact_pairs: Vec<(usize, usize)> = exact.iter().map(IndexedMatch::pair).collect();

    let recall = match_recall(&exact_pairs, &cascade);
    assert!(recall > 0.9, "recall vs exhaustive = {recall}");

    // Whenever both accept a query they agree on the target.
    let exact_by_query: std::collections::HashMap<usize, usize> =
        exact_pairs.iter().copied().collect();
    for m in &cascade {
        if let Some(&t) = exact_by_query.get(&m.query) {
            if m.query < pair.ground_truth.len() {
                assert_eq!(m.target, t, "query {}", m.query);
            }
        }
    }
}

#[test]
fn shared_centering_across_different_images() {
    let dim = 32;
    let a = random_descriptors(200, dim, 51);
    let mut b = random_descriptors(150, dim, 52);
    for k in 0..20 {
        b[k * 7] = a[k * 9].clone();
    }

    let hasher = CascadeHasher::with_seed(dim, 53).unwrap();
    let all: Vec<Vec<f32>> = a.iter().chain(&b).cloned().collect();
    let mean = cascade_hash::mean_descriptor(&all).unwrap();

    let ha = hasher.hash_image_centered(&a, &mean).unwrap();
    let hb = hasher.hash_image_centered(&b, &mean).unwrap();

    let matches = hasher.match_images(&ha, &a, &hb, &b, 0.8).unwrap();
    for m in matches.iter().filter(|m| m.distance == 0.0) {
        assert_eq!(a[m.query], b[m.target]);
    }
    for k in 0..20 {
        let (qa, tb) = (k * 9, k * 7);
        assert_eq!(ha.descriptors()[qa], hb.descriptors()[tb]);
        if hb.candidates_for(&ha.descriptors()[qa]).len() >= 2 {
            assert!(matches.iter().any(|m| m.pair() == (qa, tb)), "pair {k}");
        }
    }
}
