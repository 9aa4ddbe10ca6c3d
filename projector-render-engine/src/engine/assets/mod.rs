pub mod projection_result;

pub use projection_result::{PayloadError, ProjectionBounds, ProjectionResult};
