//! Benchmark utilities for match quality evaluation.
//!
//! Cascade hashing trades recall for speed, so its output is judged against
//! two references:
//!
//! - **Ground truth** from synthetic pairs with known correspondences
//!   ([`create_descriptor_pair`])
//! - **Exhaustive matching** with the same ratio test
//!   ([`brute_force_matches`]), which isolates the loss caused by bucket and
//!   Hamming pruning from the loss caused by the ratio test itself
//!
//! # Standard Descriptor Datasets
//!
//! | Dataset | Size | Dim | Distance | Use Case |
//! |---------|------|-----|----------|----------|
//! | SIFT-1M | 1M | 128 | L2 | Image descriptors |
//! | GIST-1M | 1M | 960 | L2 | High-dimensional |
//!
//! Reference: <https://ann-benchmarks.com/>

pub mod datasets;
pub mod metrics;
pub mod reference;

pub use datasets::{create_descriptor_pair, random_descriptors, DescriptorPair};
pub use metrics::{match_precision, match_recall};
pub use reference::brute_force_matches;
