//! Error types for cascade hashing.

use thiserror::Error;

/// Errors that can occur while building projections, hashing, or matching.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CascadeError {
    /// Descriptor dimensionality of zero at initialization.
    #[error("invalid descriptor dimension: must be > 0")]
    InvalidDimension,

    /// A descriptor whose length differs from the hasher's dimensionality.
    #[error(
        "dimension mismatch: hasher expects {expected} dimensions, descriptor {index} has {actual}"
    )]
    DimensionMismatch {
        expected: usize,
        actual: usize,
        index: usize,
    },

    /// Hashed image and raw descriptor list are not index-aligned.
    #[error("length mismatch: hashed image has {hashed} descriptors, raw list has {raw}")]
    LengthMismatch { hashed: usize, raw: usize },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, CascadeError>;
