pub mod heap;
pub mod neighbors;
pub mod sptree;

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SpatialError {
    #[error("cannot build a spatial tree over an empty point set")]
    EmptyPointSet,
    #[error("point dimensionality mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
}
