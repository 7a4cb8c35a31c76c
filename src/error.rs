//! Debug-build shape validation errors.
//!
//! The narrow phase never fails: bad geometry silently produces bad overlap data. These errors
//! only surface from [`Polygon::validate`](crate::Polygon::validate) and the debug-only checks run
//! by the shape constructors.

use thiserror::Error;

/// What a malformed polygon got wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Violation {
    /// Fewer than three points.
    #[error("polygon has {0} points, need at least 3")]
    TooFewPoints(usize),
    /// A point with a NaN or infinite coordinate.
    #[error("point {index} is not finite")]
    NonFinite { index: usize },
    /// The turn at `index` goes the wrong way, or the winding is clockwise.
    #[error("polygon is not convex at point {index}")]
    NonConvex { index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("debug assertion failed: {0}")]
    DebugAssertionFailed(Violation),
}
