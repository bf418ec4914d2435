//! Projection of building footprints onto the observer's sky dome.
//!
//! Every footprint edge becomes an angular "roof": the azimuth interval it
//! spans as seen from the observer, at the mean elevation of its two
//! endpoints. Bearings are measured clockwise from south and wrap at due
//! north.

use crate::{Building, Point, Roof};
use std::f64::consts::PI;

/// Angular margin added around every projected roof, in radians.
///
/// Adjacent footprint edges meet at shared vertices; without a small
/// overlap the merged skyline shows hairline gaps at the seams.
pub const BLUR_EPSILON: f64 = 0.01;

/// Bearing of `(dx, dy)` relative to the observer, clockwise from south.
pub(crate) fn bearing(dx: f64, dy: f64) -> f64 {
    -f64::atan2(dx, -dy)
}

/// Projects a building into roof intervals as seen by an observer at
/// `origin`, `oz` meters above street level.
///
/// Edges whose endpoints straddle due north are split into two roofs, one
/// per end of the azimuth domain, so that every roof keeps `phi1 < phi2`.
pub fn project_building(building: &Building, origin: Point, oz: f64, blur: f64) -> Vec<Roof> {
    let dz = building.height() - oz;
    let rel: Vec<(f64, f64)> = building
        .footprint()
        .iter()
        .map(|p| (p.x - origin.x, p.y - origin.y))
        .collect();
    let phi: Vec<f64> = rel.iter().map(|&(dx, dy)| bearing(dx, dy)).collect();
    let theta: Vec<f64> = rel
        .iter()
        .map(|&(dx, dy)| (dz / (dx * dx + dy * dy).sqrt()).atan())
        .collect();

    let mut roofs = Vec::with_capacity(rel.len());
    for i in 0..rel.len() - 1 {
        let phi1 = phi[i].min(phi[i + 1]);
        let phi2 = phi[i].max(phi[i + 1]);
        let theta_edge = 0.5 * (theta[i] + theta[i + 1]);

        let (dx_a, dy_a) = rel[i];
        let (dx_b, dy_b) = rel[i + 1];
        if dy_a > 0.0 && dy_b > 0.0 && dx_a * dx_b < 0.0 {
            // The edge crosses due north: cover both ends of the domain
            // instead of one wraparound interval.
            roofs.push(Roof::new(-PI - blur, phi1 + blur, theta_edge));
            roofs.push(Roof::new(phi2 - blur, PI + blur, theta_edge));
        } else {
            roofs.push(Roof::new(phi1 - blur, phi2 + blur, theta_edge));
        }
    }
    roofs
}
