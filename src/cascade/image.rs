//! The immutable hashed representation of one image.

use super::buckets::BucketTable;
use super::hashing::HashedDescriptor;

/// Hash codes, bucket ids and bucket tables for one image's descriptors.
///
/// Built by [`CascadeHasher::hash_image`](super::CascadeHasher::hash_image);
/// read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct HashedImage {
    pub(crate) mean: Option<Vec<f32>>,
    pub(crate) descriptors: Vec<HashedDescriptor>,
    pub(crate) buckets: BucketTable,
}

impl HashedImage {
    /// Vector the descriptors were centered on before projection.
    ///
    /// `None` for an image without descriptors.
    pub fn mean_descriptor(&self) -> Option<&[f32]> {
        self.mean.as_deref()
    }

    /// Hashed descriptors, index-aligned with the input descriptor list.
    pub fn descriptors(&self) -> &[HashedDescriptor] {
        &self.descriptors
    }

    /// Bucket tables of all groups.
    pub fn buckets(&self) -> &BucketTable {
        &self.buckets
    }

    /// Number of hashed descriptors.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Check if the image has no descriptors.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Indices of this image's descriptors sharing at least one bucket with
    /// `query`, ascending and without duplicates.
    pub fn candidates_for(&self, query: &HashedDescriptor) -> Vec<usize> {
        let mut out: Vec<usize> = query
            .bucket_ids()
            .iter()
            .enumerate()
            .flat_map(|(group, &id)| self.buckets.bucket(group, id).iter().copied())
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }
}
