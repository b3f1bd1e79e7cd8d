//! Inverted bucket index: `(group, bucket id) -> descriptor indices`.

use super::hashing::HashedDescriptor;
use super::{NUM_BUCKETS_PER_GROUP, NUM_BUCKET_GROUPS};

/// Descriptor indices sharing one bucket, in ascending order.
pub type Bucket = Vec<usize>;

/// Dense per-group bucket tables for one image.
///
/// Every group partitions the image's descriptor indices: each index is in
/// exactly one of that group's `NUM_BUCKETS_PER_GROUP` buckets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketTable {
    groups: Vec<Vec<Bucket>>,
}

impl BucketTable {
    /// Invert the per-descriptor bucket ids.
    ///
    /// Indices are appended in input order, so every bucket is sorted.
    pub fn build(descriptors: &[HashedDescriptor]) -> Self {
        let mut groups = vec![vec![Bucket::new(); NUM_BUCKETS_PER_GROUP]; NUM_BUCKET_GROUPS];

        for (index, descriptor) in descriptors.iter().enumerate() {
            for (group, &bucket_id) in descriptor.bucket_ids().iter().enumerate() {
                groups[group][bucket_id as usize].push(index);
            }
        }

        Self { groups }
    }

    /// Descriptor indices in bucket `bucket_id` of `group`.
    ///
    /// # Panics
    ///
    /// Panics if `group` or `bucket_id` is out of range.
    #[inline]
    pub fn bucket(&self, group: usize, bucket_id: u16) -> &[usize] {
        &self.groups[group][bucket_id as usize]
    }

    /// All buckets of `group`, indexed by bucket id.
    pub fn group(&self, group: usize) -> &[Bucket] {
        &self.groups[group]
    }

    /// Number of non-empty buckets in `group`.
    pub fn occupied_buckets(&self, group: usize) -> usize {
        self.groups[group].iter().filter(|b| !b.is_empty()).count()
    }
}

impl Default for BucketTable {
    fn default() -> Self {
        Self::build(&[])
    }
}
