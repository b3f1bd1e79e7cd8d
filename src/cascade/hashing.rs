//! Primary hash codes and secondary bucket ids for single descriptors.

use super::projection::ProjectionSet;
use super::{HASH_CODE_BITS, NUM_BUCKET_GROUPS};
use crate::error::{CascadeError, Result};
use crate::simd;

/// A 128-bit sign-of-projection code.
///
/// Bit `k` (counting from the least significant bit) is set when the
/// centered descriptor has a strictly positive projection on primary row `k`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HashCode(u128);

impl HashCode {
    /// Number of bits in a code.
    pub const BITS: usize = HASH_CODE_BITS;

    /// Wrap a raw 128-bit value.
    pub const fn from_raw(value: u128) -> Self {
        Self(value)
    }

    /// Get the raw code value.
    pub const fn raw(self) -> u128 {
        self.0
    }

    /// Value of bit `k`.
    ///
    /// # Panics
    ///
    /// Panics if `k >= 128`.
    pub fn bit(self, k: usize) -> bool {
        assert!(k < Self::BITS, "bit index {k} out of range");
        (self.0 >> k) & 1 == 1
    }

    /// Number of set bits.
    pub fn count_ones(self) -> u32 {
        self.0.count_ones()
    }

    /// Number of bit positions that differ.
    #[inline]
    pub fn hamming_distance(self, other: HashCode) -> u32 {
        (self.0 ^ other.0).count_ones()
    }
}

/// Hash code plus one bucket id per bucket group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HashedDescriptor {
    hash_code: HashCode,
    bucket_ids: [u16; NUM_BUCKET_GROUPS],
}

impl HashedDescriptor {
    /// Primary hash code.
    pub fn hash_code(&self) -> HashCode {
        self.hash_code
    }

    /// `bucket_ids()[g]` is the bucket this descriptor falls in for group `g`.
    pub fn bucket_ids(&self) -> &[u16; NUM_BUCKET_GROUPS] {
        &self.bucket_ids
    }

    /// Hash an already mean-centered descriptor.
    ///
    /// Bucket ids fold the secondary sign bits most-significant first: the
    /// sign of secondary row 0 ends up in bit 9 of the id.
    pub(crate) fn from_centered(projections: &ProjectionSet, centered: &[f32]) -> Self {
        debug_assert_eq!(centered.len(), projections.dimension());

        let mut code = 0u128;
        for (k, row) in projections.primary_rows().enumerate() {
            if simd::dot(row, centered) > 0.0 {
                code |= 1u128 << k;
            }
        }

        let bucket_ids = std::array::from_fn(|group| {
            projections
                .secondary_rows(group)
                .fold(0u16, |id, row| (id << 1) | u16::from(simd::dot(row, centered) > 0.0))
        });

        Self {
            hash_code: HashCode(code),
            bucket_ids,
        }
    }
}

/// Component-wise arithmetic mean of a descriptor set.
///
/// Returns `None` for an empty set: there is no meaningful mean to center on.
/// All descriptors are assumed to share the length of the first one.
pub fn mean_descriptor<D: AsRef<[f32]>>(descriptors: &[D]) -> Option<Vec<f32>> {
    let first = descriptors.first()?.as_ref();

    // Accumulate in f64: SIFT components are up to 512 and images carry
    // tens of thousands of descriptors.
    let mut sum = vec![0.0f64; first.len()];
    for d in descriptors {
        for (s, &v) in sum.iter_mut().zip(d.as_ref()) {
            *s += v as f64;
        }
    }

    let n = descriptors.len() as f64;
    Some(sum.into_iter().map(|s| (s / n) as f32).collect())
}

/// Fail on the first descriptor whose length is not `expected`.
pub(crate) fn check_dimensions<D: AsRef<[f32]>>(descriptors: &[D], expected: usize) -> Result<()> {
    match descriptors
        .iter()
        .position(|d| d.as_ref().len() != expected)
    {
        Some(index) => Err(CascadeError::DimensionMismatch {
            expected,
            actual: descriptors[index].as_ref().len(),
            index,
        }),
        None => Ok(()),
    }
}

/// Subtract `mean` from `descriptor` into `out`.
#[inline]
pub(crate) fn center_into(descriptor: &[f32], mean: &[f32], out: &mut Vec<f32>) {
    out.clear();
    out.extend(descriptor.iter().zip(mean).map(|(x, m)| x - m));
}
