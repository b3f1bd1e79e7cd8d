//! cascade-hash: approximate descriptor matching with cascade hashing.
//!
//! Matches local feature descriptors (SIFT and friends) of one image against
//! another without comparing every pair. The pipeline, leaf first:
//!
//! - [`ProjectionSet`]: Gaussian random projections, generated once per
//!   descriptor dimensionality from a caller-supplied RNG
//! - [`HashedDescriptor`]: 128-bit hash code + 6 bucket ids per descriptor
//! - [`BucketTable`]: inverted `(group, bucket) -> indices` index per image
//! - [`CascadeHasher::match_images`]: bucket candidates, Hamming ranking,
//!   ratio test on exact distances
//!
//! ```rust
//! use cascade_hash::{CascadeHasher, MatchOptions};
//! use cascade_hash::benchmark::create_descriptor_pair;
//!
//! let pair = create_descriptor_pair(500, 200, 50, 128, 0.02, 42);
//! let hasher = CascadeHasher::with_seed(128, 7).unwrap();
//!
//! let query = hasher.hash_image(&pair.query).unwrap();
//! let target = hasher.hash_image(&pair.target).unwrap();
//! let matches = hasher
//!     .match_images_with(&query, &pair.query, &target, &pair.target, &MatchOptions::default())
//!     .unwrap();
//!
//! assert!(matches.len() > 150);
//! ```
//!
//! # Critical Nuances
//!
//! ## Matching is one-directional
//!
//! Every query descriptor gets at most one target, but two queries can pick
//! the same target. Symmetric / mutual-nearest-neighbor filtering is left to
//! the caller: match both directions and intersect.
//!
//! ## Centering decides what "identical" means
//!
//! [`CascadeHasher::hash_image`] centers on the image's own mean, so the same
//! descriptor in two images with different content can land in different
//! buckets. Hash every image against one shared mean with
//! [`CascadeHasher::hash_image_centered`] when bit-identical codes across
//! images matter.
//!
//! ## Recall is not guaranteed
//!
//! A true neighbor is only found if it shares at least one bucket with the
//! query and survives the top-k Hamming cut. Use
//! [`benchmark::brute_force_matches`] to measure what the pruning costs on
//! your data.
//!
//! # Features
//!
//! - `parallel`: hash descriptors and match queries on the rayon pool
//! - `serde`: `Serialize`/`Deserialize` for options, matches and statistics

pub mod benchmark;
pub mod cascade;
pub mod error;
pub mod simd;

// Re-exports
pub use cascade::{
    mean_descriptor, Bucket, BucketTable, CascadeHasher, HashCode, HashedDescriptor, HashedImage,
    IndexedMatch, MatchOptions, MatchStats, ProjectionSet, DEFAULT_LOWES_RATIO, DEFAULT_TOP_K,
    HASH_CODE_BITS, NUM_BUCKETS_PER_GROUP, NUM_BUCKET_BITS, NUM_BUCKET_GROUPS,
};
pub use error::{CascadeError, Result};
