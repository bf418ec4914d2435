//! Wall segment helpers.
//!
//! Perpendicular projections of a point onto wall segments, used by the
//! window probe to find view openings.

use crate::Point;
use crate::geom::{EPS, GeometryError};

/// Foot of the perpendicular from `pt` onto the infinite line through
/// `p1`-`p2`, together with the line parameter `t` (0 at `p1`, 1 at `p2`).
///
/// Fails on a zero-length segment, which defines no line.
pub fn perpendicular_foot(pt: Point, p1: Point, p2: Point) -> Result<(Point, f64), GeometryError> {
    let sx = p2.x - p1.x;
    let sy = p2.y - p1.y;
    let len_sq = sx * sx + sy * sy;
    if len_sq < EPS * EPS {
        return Err(GeometryError::ZeroLengthEdge);
    }
    let t = ((pt.x - p1.x) * sx + (pt.y - p1.y) * sy) / len_sq;
    Ok((Point::new(p1.x + t * sx, p1.y + t * sy), t))
}

/// Foot of the perpendicular from `pt`, restricted to the segment itself.
///
/// Returns `Ok(None)` when the foot falls outside the segment.
pub fn foot_on_segment(pt: Point, p1: Point, p2: Point) -> Result<Option<Point>, GeometryError> {
    let (foot, t) = perpendicular_foot(pt, p1, p2)?;
    Ok((-EPS..=1.0 + EPS).contains(&t).then_some(foot))
}
