//! Cascade hashing for approximate descriptor matching.
//!
//! Exhaustive matching of two images with N and M descriptors costs N × M
//! exact distances in a 128-dimensional space. Cascade hashing replaces most
//! of that work with cheap bit operations, in three stages of increasing cost:
//!
//! 1. **Bucket lookup**: six independent 10-bit random projections assign
//!    every descriptor to one bucket per group. A query only considers target
//!    descriptors that share a bucket with it in *any* group.
//! 2. **Hamming ranking**: a 128-bit sign-of-projection code (SimHash-style)
//!    ranks the surviving candidates by XOR + popcount; only the top-k go on.
//! 3. **Exact confirmation**: squared Euclidean distances on the raw vectors,
//!    accepted with Lowe's ratio test.
//!
//! ## Why random projections work here
//!
//! For a random Gaussian direction r, the sign of r·x agrees with the sign of
//! r·y with probability 1 − θ(x, y)/π (Charikar 2002). Descriptors are
//! mean-centered first so that the hyperplanes split the data rather than
//! all landing on one side of it.
//!
//! ```rust
//! use cascade_hash::{CascadeHasher, MatchOptions};
//!
//! let hasher = CascadeHasher::with_seed(4, 7).unwrap();
//!
//! let image_a = vec![vec![1.0_f32, 1.0, 1.0, 1.0]];
//! let image_b = vec![vec![1.0_f32, 1.0, 1.0, 1.0], vec![-5.0, -5.0, -5.0, -5.0]];
//!
//! let hashed_a = hasher.hash_image(&image_a).unwrap();
//! let hashed_b = hasher.hash_image(&image_b).unwrap();
//!
//! let matches = hasher
//!     .match_images(&hashed_a, &image_a, &hashed_b, &image_b, 0.8)
//!     .unwrap();
//! assert_eq!(matches.len(), 1);
//! assert_eq!((matches[0].query, matches[0].target), (0, 0));
//! ```
//!
//! ## References
//!
//! - Cheng, Leng, Wu, Cui, Lu (2014). "Fast and Accurate Image Matching with
//!   Cascade Hashing for 3D Reconstruction." CVPR.
//! - Charikar (2002). "Similarity estimation techniques from rounding algorithms."
//! - Lowe (2004). "Distinctive Image Features from Scale-Invariant Keypoints."

mod buckets;
mod hasher;
pub(crate) mod hashing;
mod image;
mod matcher;
mod projection;

pub use buckets::{Bucket, BucketTable};
pub use hasher::CascadeHasher;
pub use hashing::{mean_descriptor, HashCode, HashedDescriptor};
pub use image::HashedImage;
pub use matcher::{IndexedMatch, MatchOptions, MatchStats};
pub use projection::ProjectionSet;

/// Width of the primary hash code in bits.
pub const HASH_CODE_BITS: usize = 128;
/// Number of bits per bucket id.
pub const NUM_BUCKET_BITS: usize = 10;
/// Number of independent bucket groups.
pub const NUM_BUCKET_GROUPS: usize = 6;
/// Number of buckets in each group.
pub const NUM_BUCKETS_PER_GROUP: usize = 1 << NUM_BUCKET_BITS;
/// Candidates kept after Hamming ranking.
pub const DEFAULT_TOP_K: usize = 10;
/// Lowe's ratio used when none is given.
pub const DEFAULT_LOWES_RATIO: f32 = 0.8;
