use thiserror::Error;

pub mod building;
pub mod point;
pub mod projection;
pub mod segment;

/// Geometric precision
pub(crate) const EPS: f64 = 1e-13;

/// Errors raised by degenerate input geometry.
///
/// These are data problems, not logic defects: callers skip the offending
/// building or edge and keep evaluating.
#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("footprint has fewer than 3 distinct vertices")]
    DegenerateFootprint,
    #[error("building height is negative: {0}")]
    NegativeHeight(f64),
    #[error("zero-length wall edge")]
    ZeroLengthEdge,
}
