//! Entry point: projection setup and per-image hashing.

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::buckets::BucketTable;
use super::hashing::{center_into, check_dimensions, mean_descriptor, HashedDescriptor};
use super::image::HashedImage;
use super::projection::ProjectionSet;
use crate::error::{CascadeError, Result};

/// Two-stage hasher for descriptors of one fixed dimensionality.
///
/// Create it once per dimensionality, hash every image with
/// [`hash_image`](Self::hash_image), then match image pairs with
/// [`match_images`](Self::match_images). The hasher is immutable after
/// construction and can be shared across threads.
#[derive(Debug, Clone)]
pub struct CascadeHasher {
    projections: ProjectionSet,
}

impl CascadeHasher {
    /// Create the hashing projections, drawing from `rng`.
    ///
    /// The generator is only borrowed for the duration of the call; seeding it
    /// identically reproduces identical hash codes for identical inputs.
    pub fn new<R: Rng + ?Sized>(dimension: usize, rng: &mut R) -> Result<Self> {
        let projections = ProjectionSet::generate(dimension, rng)?;
        debug!("CascadeHasher::new dimension={dimension}");
        Ok(Self { projections })
    }

    /// Create the hashing projections from a seeded `StdRng`.
    pub fn with_seed(dimension: usize, seed: u64) -> Result<Self> {
        Self::new(dimension, &mut StdRng::seed_from_u64(seed))
    }

    /// Wrap projections generated elsewhere.
    pub fn from_projections(projections: ProjectionSet) -> Self {
        Self { projections }
    }

    /// Descriptor dimensionality this hasher was built for.
    pub fn dimension(&self) -> usize {
        self.projections.dimension()
    }

    /// The underlying projection matrices.
    pub fn projections(&self) -> &ProjectionSet {
        &self.projections
    }

    /// Hash one image, centering on the mean of its own descriptors.
    ///
    /// An empty descriptor list is not an error: it yields an empty image with
    /// no mean, which matches nothing.
    pub fn hash_image<D>(&self, descriptors: &[D]) -> Result<HashedImage>
    where
        D: AsRef<[f32]> + Sync,
    {
        self.check_dimensions(descriptors)?;
        match mean_descriptor(descriptors) {
            Some(mean) => Ok(self.hash_with_mean(descriptors, mean)),
            None => {
                warn!("CascadeHasher::hash_image called with no descriptors");
                Ok(HashedImage::default())
            }
        }
    }

    /// Hash one image, centering on a caller-supplied vector.
    ///
    /// Hashing every image of a collection against one shared mean (for
    /// example the mean over all images) makes identical descriptors hash
    /// identically across images, regardless of what else each image holds.
    pub fn hash_image_centered<D>(&self, descriptors: &[D], mean: &[f32]) -> Result<HashedImage>
    where
        D: AsRef<[f32]> + Sync,
    {
        if mean.len() != self.dimension() {
            return Err(CascadeError::InvalidParameter(format!(
                "centering vector has {} dimensions, hasher expects {}",
                mean.len(),
                self.dimension()
            )));
        }
        self.check_dimensions(descriptors)?;
        if descriptors.is_empty() {
            warn!("CascadeHasher::hash_image_centered called with no descriptors");
            return Ok(HashedImage::default());
        }
        Ok(self.hash_with_mean(descriptors, mean.to_vec()))
    }

    pub(crate) fn check_dimensions<D: AsRef<[f32]>>(&self, descriptors: &[D]) -> Result<()> {
        check_dimensions(descriptors, self.dimension())
    }

    fn hash_with_mean<D>(&self, descriptors: &[D], mean: Vec<f32>) -> HashedImage
    where
        D: AsRef<[f32]> + Sync,
    {
        let start = Instant::now();
        let dim = self.dimension();

        #[cfg(feature = "parallel")]
        let hashed: Vec<HashedDescriptor> = descriptors
            .par_iter()
            .map_init(
                || Vec::with_capacity(dim),
                |centered, d| {
                    center_into(d.as_ref(), &mean, centered);
                    HashedDescriptor::from_centered(&self.projections, centered)
                },
            )
            .collect();

        #[cfg(not(feature = "parallel"))]
        let hashed: Vec<HashedDescriptor> = {
            let mut centered = Vec::with_capacity(dim);
            descriptors
                .iter()
                .map(|d| {
                    center_into(d.as_ref(), &mean, &mut centered);
                    HashedDescriptor::from_centered(&self.projections, &centered)
                })
                .collect()
        };

        let buckets = BucketTable::build(&hashed);

        debug!(
            "CascadeHasher::hash_image descriptors={} elapsed_ms={:.3}",
            hashed.len(),
            start.elapsed().as_secs_f64() * 1000.0
        );

        HashedImage {
            mean: Some(mean),
            descriptors: hashed,
            buckets,
        }
    }
}
