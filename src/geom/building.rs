use crate::Point;
use crate::geom::{EPS, GeometryError};
use serde::Serialize;

/// A building footprint with a flat roof height.
///
/// The footprint is a closed polygon: the first point is repeated as the
/// last one, the way city building datasets deliver outlines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Building {
    pts: Vec<Point>,
    z: f64,
    center: Point,
}

impl Building {
    /// Creates a building from a closed footprint polygon and a roof height.
    ///
    /// The polygon must hold at least 4 points (a closed triangle) with at
    /// least 3 distinct vertices, and the height must be non-negative.
    pub fn new(pts: Vec<Point>, z: f64) -> Result<Self, GeometryError> {
        if z < 0.0 {
            return Err(GeometryError::NegativeHeight(z));
        }
        if pts.len() < 4 {
            return Err(GeometryError::DegenerateFootprint);
        }
        let vertices = &pts[..pts.len() - 1];
        let mut distinct: Vec<Point> = Vec::with_capacity(vertices.len());
        for p in vertices {
            if !distinct.iter().any(|q| q.is_close(p)) {
                distinct.push(*p);
            }
        }
        if distinct.len() < 3 {
            return Err(GeometryError::DegenerateFootprint);
        }
        let n = vertices.len() as f64;
        let center = Point::new(
            vertices.iter().map(|p| p.x).sum::<f64>() / n,
            vertices.iter().map(|p| p.y).sum::<f64>() / n,
        );
        Ok(Self { pts, z, center })
    }

    /// Roof height above street level.
    pub fn height(&self) -> f64 {
        self.z
    }

    /// The closed footprint polygon (first point repeated as last).
    pub fn footprint(&self) -> &[Point] {
        &self.pts
    }

    /// Footprint centroid (vertex mean).
    pub fn center(&self) -> Point {
        self.center
    }

    /// Consecutive wall segments of the closed footprint.
    pub fn walls(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.pts.windows(2).map(|w| (w[0], w[1]))
    }

    /// Ray-casting containment test for a point on the map.
    pub fn contains(&self, pt: Point) -> bool {
        let poly = &self.pts[..self.pts.len() - 1];
        let n = poly.len();
        let mut inside = false;
        let mut p1 = poly[0];
        for i in 1..=n {
            let p2 = poly[i % n];
            if pt.y > p1.y.min(p2.y)
                && pt.y <= p1.y.max(p2.y)
                && pt.x <= p1.x.max(p2.x)
                && (p1.y - p2.y).abs() > EPS
            {
                let x_cross = (pt.y - p1.y) * (p2.x - p1.x) / (p2.y - p1.y) + p1.x;
                if (p1.x - p2.x).abs() < EPS || pt.x <= x_cross {
                    inside = !inside;
                }
            }
            p1 = p2;
        }
        inside
    }

    /// Planar distance from the footprint centroid to a point.
    pub fn centroid_distance_to(&self, pt: Point) -> f64 {
        self.center.distance_to(&pt)
    }
}

/// Builds the building list from raw footprint/height pairs, skipping
/// degenerate entries instead of failing the whole load.
pub fn load_buildings(raw: impl IntoIterator<Item = (Vec<Point>, f64)>) -> Vec<Building> {
    raw.into_iter()
        .filter_map(|(pts, z)| match Building::new(pts, z) {
            Ok(building) => Some(building),
            Err(err) => {
                log::warn!("skipping building: {err}");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn square(x0: f64, y0: f64, x1: f64, y1: f64, z: f64) -> Result<Building> {
        let pts = vec![
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x0, y1),
            Point::new(x0, y0),
        ];
        Ok(Building::new(pts, z)?)
    }

    #[test]
    fn test_valid_square() -> Result<()> {
        let b = square(0.0, 0.0, 10.0, 10.0, 30.0)?;
        assert_eq!(b.height(), 30.0);
        assert!(b.center().is_close(&Point::new(5.0, 5.0)));
        assert_eq!(b.walls().count(), 4);
        Ok(())
    }

    #[test]
    fn test_too_few_points() {
        let pts = vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(0.0, 0.0)];
        assert_eq!(
            Building::new(pts, 10.0),
            Err(GeometryError::DegenerateFootprint)
        );
    }

    #[test]
    fn test_repeated_vertices_are_degenerate() {
        // Four points, but only two distinct vertices.
        let pts = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 0.0),
        ];
        assert_eq!(
            Building::new(pts, 10.0),
            Err(GeometryError::DegenerateFootprint)
        );
    }

    #[test]
    fn test_negative_height() {
        let pts = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 0.0),
        ];
        assert_eq!(
            Building::new(pts, -2.0),
            Err(GeometryError::NegativeHeight(-2.0))
        );
    }

    #[test]
    fn test_contains() -> Result<()> {
        let b = square(0.0, 0.0, 10.0, 10.0, 30.0)?;
        assert!(b.contains(Point::new(5.0, 5.0)));
        assert!(b.contains(Point::new(0.5, 9.5)));
        assert!(!b.contains(Point::new(-1.0, 5.0)));
        assert!(!b.contains(Point::new(5.0, 11.0)));
        Ok(())
    }

    #[test]
    fn test_centroid_distance() -> Result<()> {
        let b = square(0.0, 0.0, 10.0, 10.0, 30.0)?;
        assert!((b.centroid_distance_to(Point::new(5.0, 1.0)) - 4.0).abs() < EPS);
        Ok(())
    }

    #[test]
    fn test_load_buildings_skips_degenerate() {
        let good = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 0.0),
        ];
        let bad = vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)];
        let loaded = load_buildings(vec![(good, 12.0), (bad, 5.0)]);
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].height(), 12.0);
    }
}
