//! Random projection matrices for the primary and secondary hash functions.

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use std::slice::ChunksExact;

use super::{HASH_CODE_BITS, NUM_BUCKET_BITS, NUM_BUCKET_GROUPS};
use crate::error::{CascadeError, Result};

/// Gaussian projections shared by every image of one descriptor dimensionality.
///
/// Matrices are stored row-major as flat `Vec<f32>`: the primary matrix is
/// `HASH_CODE_BITS × dimension`, each secondary matrix is
/// `NUM_BUCKET_BITS × dimension`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionSet {
    dimension: usize,
    primary: Vec<f32>,
    secondary: [Vec<f32>; NUM_BUCKET_GROUPS],
}

impl ProjectionSet {
    /// Sample all projections from `rng`.
    ///
    /// Entries are i.i.d. standard normal. The primary matrix is drawn first,
    /// then the secondary matrices in group order, so an identically seeded
    /// generator always reproduces the same set bit for bit.
    pub fn generate<R: Rng + ?Sized>(dimension: usize, rng: &mut R) -> Result<Self> {
        if dimension == 0 {
            return Err(CascadeError::InvalidDimension);
        }

        let primary = sample_matrix(HASH_CODE_BITS, dimension, rng);
        let secondary =
            std::array::from_fn(|_| sample_matrix(NUM_BUCKET_BITS, dimension, &mut *rng));

        Ok(Self {
            dimension,
            primary,
            secondary,
        })
    }

    /// Descriptor dimensionality (column count of every matrix).
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Rows of the primary projection, one per hash code bit.
    pub fn primary_rows(&self) -> ChunksExact<'_, f32> {
        self.primary.chunks_exact(self.dimension)
    }

    /// Rows of the secondary projection for `group`, one per bucket bit.
    ///
    /// # Panics
    ///
    /// Panics if `group >= NUM_BUCKET_GROUPS`.
    pub fn secondary_rows(&self, group: usize) -> ChunksExact<'_, f32> {
        self.secondary[group].chunks_exact(self.dimension)
    }
}

fn sample_matrix<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Vec<f32> {
    (0..rows * cols)
        .map(|_| -> f32 { StandardNormal.sample(&mut *rng) })
        .collect()
}
