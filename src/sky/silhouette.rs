//! The merged skyline around an observer.
//!
//! A silhouette is the upper envelope of every roof inserted into it: a
//! piecewise-constant function giving, for each azimuth, the elevation an
//! object must clear to be visible. It is stored as an ordered list of
//! breakpoints ("cliffs") bounded by two zero-height sentinels just
//! outside the azimuth domain.

use crate::sky::roof::Roof;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use thiserror::Error;

/// Sentinel offset past the ends of the `(-pi, pi]` azimuth domain.
///
/// Any value larger than the projector's blur margin works; the sentinels
/// only have to sit strictly outside every insertable roof.
const SENTINEL_MARGIN: f64 = 1.0;

/// Structural defects of the cliff list.
///
/// These indicate a bug in the merge logic, not bad input data; they are
/// never expected in correct operation.
#[derive(Debug, Error, PartialEq)]
pub enum SilhouetteError {
    #[error("cliffs out of order at phi = {0}")]
    UnsortedCliffs(f64),
    #[error("elevation gap between adjacent cliffs at phi = {0}")]
    HeightGap(f64),
    #[error("sentinel cliffs missing or not flat")]
    BadSentinels,
}

/// A skyline breakpoint: the visible elevation immediately left and right
/// of azimuth `phi`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cliff {
    pub phi: f64,
    pub theta_l: f64,
    pub theta_r: f64,
}

/// The skyline: blocked elevation as a step function of azimuth.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Silhouette {
    cliffs: Vec<Cliff>,
}

impl Silhouette {
    /// An unobstructed skyline: only the two sentinels.
    pub fn new() -> Self {
        Self {
            cliffs: vec![
                Cliff {
                    phi: -PI - SENTINEL_MARGIN,
                    theta_l: 0.0,
                    theta_r: 0.0,
                },
                Cliff {
                    phi: PI + SENTINEL_MARGIN,
                    theta_l: 0.0,
                    theta_r: 0.0,
                },
            ],
        }
    }

    /// The ordered breakpoint list, sentinels included.
    pub fn cliffs(&self) -> &[Cliff] {
        &self.cliffs
    }

    /// Merges a roof into the skyline, keeping the pointwise maximum of
    /// the current skyline and the roof over `[phi1, phi2)`.
    ///
    /// A fresh cliff sequence is built in one forward pass and swapped in;
    /// nothing is inserted or deleted by index while scanning. The result
    /// stays canonical (a breakpoint exists only where the elevation
    /// jumps), so re-inserting a roof changes nothing and the final
    /// skyline does not depend on insertion order.
    pub fn insert(&mut self, roof: &Roof) {
        let (p1, p2, h) = (roof.phi1, roof.phi2, roof.theta);
        let last = self.cliffs.len() - 1;
        let mut merged: Vec<Cliff> = Vec::with_capacity(self.cliffs.len() + 2);

        // The roof covers [p1, p2): a breakpoint's right side is raised
        // when p1 <= phi < p2, its left side when p1 < phi <= p2.
        let mut height = 0.0; // old elevation left of the next old cliff
        let mut passed_p1 = false;
        let mut passed_p2 = false;

        for (i, c) in self.cliffs.iter().enumerate() {
            // Breakpoints of the roof itself, where no old cliff sits.
            if !passed_p1 && p1 <= c.phi {
                if p1 < c.phi && height < h {
                    merged.push(Cliff {
                        phi: p1,
                        theta_l: height,
                        theta_r: h,
                    });
                }
                passed_p1 = true;
            }
            if !passed_p2 && p2 <= c.phi {
                if p2 < c.phi && height < h {
                    merged.push(Cliff {
                        phi: p2,
                        theta_l: h,
                        theta_r: height,
                    });
                }
                passed_p2 = true;
            }

            let covers_left = p1 < c.phi && c.phi <= p2;
            let covers_right = p1 <= c.phi && c.phi < p2;
            let theta_l = if covers_left { c.theta_l.max(h) } else { c.theta_l };
            let theta_r = if covers_right { c.theta_r.max(h) } else { c.theta_r };

            // Drop breakpoints the roof has levelled out; keep sentinels.
            if i == 0 || i == last || theta_l != theta_r {
                merged.push(Cliff {
                    phi: c.phi,
                    theta_l,
                    theta_r,
                });
            }
            height = c.theta_r;
        }

        debug_assert!(passed_p1 && passed_p2, "roof must end inside the sentinels");
        self.cliffs = merged;
    }

    /// Elevation of the skyline segment covering `phi`.
    ///
    /// Right-continuous: at a cliff's exact azimuth this returns the
    /// elevation on its right side.
    pub fn height_at(&self, phi: f64) -> f64 {
        match self.cliffs.partition_point(|c| c.phi <= phi) {
            0 => 0.0, // outside the sentinels
            i => self.cliffs[i - 1].theta_r,
        }
    }

    /// Fraction of the sky hemisphere left visible by the skyline.
    ///
    /// Integrates `dphi * sin(theta)` over all segments and normalizes by
    /// the full circle.
    pub fn sky_visibility(&self) -> f64 {
        let covered: f64 = self
            .cliffs
            .windows(2)
            .map(|pair| (pair[1].phi - pair[0].phi) * pair[0].theta_r.sin())
            .sum();
        1.0 - covered / (2.0 * PI)
    }

    /// Checks the structural invariants of the cliff list.
    ///
    /// A failure signals a defect in the merge logic itself. Tests call
    /// this after every mutation so a violation aborts the case loudly.
    pub fn validate(&self) -> Result<(), SilhouetteError> {
        let first = match self.cliffs.first() {
            Some(c) => c,
            None => return Err(SilhouetteError::BadSentinels),
        };
        let last = match self.cliffs.last() {
            Some(c) => c,
            None => return Err(SilhouetteError::BadSentinels),
        };
        if self.cliffs.len() < 2
            || first.phi > -PI
            || last.phi < PI
            || first.theta_l != 0.0
            || first.theta_r != 0.0
            || last.theta_l != 0.0
            || last.theta_r != 0.0
        {
            return Err(SilhouetteError::BadSentinels);
        }
        for pair in self.cliffs.windows(2) {
            if pair[0].phi >= pair[1].phi {
                return Err(SilhouetteError::UnsortedCliffs(pair[1].phi));
            }
            if pair[0].theta_r != pair[1].theta_l {
                return Err(SilhouetteError::HeightGap(pair[1].phi));
            }
        }
        Ok(())
    }
}

impl Default for Silhouette {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checked_insert(sil: &mut Silhouette, roof: &Roof) {
        sil.insert(roof);
        sil.validate().unwrap();
    }

    #[test]
    fn test_empty_silhouette() {
        let sil = Silhouette::new();
        sil.validate().unwrap();
        assert_eq!(sil.cliffs().len(), 2);
        assert_eq!(sil.height_at(0.0), 0.0);
        assert!((sil.sky_visibility() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_roof_makes_four_cliffs() {
        let mut sil = Silhouette::new();
        checked_insert(&mut sil, &Roof::new(-0.2, 0.2, 0.5));

        assert_eq!(sil.cliffs().len(), 4);
        assert_eq!(sil.height_at(-0.3), 0.0);
        assert_eq!(sil.height_at(-0.2), 0.5);
        assert_eq!(sil.height_at(0.0), 0.5);
        assert_eq!(sil.height_at(0.19), 0.5);
        assert_eq!(sil.height_at(0.2), 0.0);
        assert_eq!(sil.height_at(1.0), 0.0);
    }

    #[test]
    fn test_single_roof_sky_visibility_formula() {
        let roof = Roof::new(-0.2, 0.2, 0.5);
        let mut sil = Silhouette::new();
        checked_insert(&mut sil, &roof);

        let expected = 1.0 - roof.width() * roof.theta.sin() / (2.0 * PI);
        assert!((sil.sky_visibility() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_reinserting_a_roof_changes_nothing() {
        let roof = Roof::new(-0.2, 0.2, 0.5);
        let mut once = Silhouette::new();
        checked_insert(&mut once, &roof);
        let mut twice = once.clone();
        checked_insert(&mut twice, &roof);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let a = Roof::new(-0.5, 0.1, 0.3);
        let b = Roof::new(-0.1, 0.6, 0.7);
        let c = Roof::new(0.4, 1.2, 0.2);

        let mut fwd = Silhouette::new();
        let mut rev = Silhouette::new();
        for roof in [&a, &b, &c] {
            checked_insert(&mut fwd, roof);
        }
        for roof in [&c, &b, &a] {
            checked_insert(&mut rev, roof);
        }

        assert_eq!(fwd, rev);
        for phi in [-0.6, -0.5, -0.3, -0.1, 0.0, 0.4, 0.5, 0.7, 1.2, 1.3] {
            assert_eq!(fwd.height_at(phi), rev.height_at(phi));
        }
    }

    #[test]
    fn test_taller_roof_fully_shadows_shorter() {
        let short = Roof::new(-0.1, 0.1, 0.3);
        let tall = Roof::new(-0.3, 0.3, 0.8);

        let mut sil = Silhouette::new();
        checked_insert(&mut sil, &short);
        checked_insert(&mut sil, &tall);

        // Only the taller roof survives: no trace of the 0.3 elevation.
        assert_eq!(sil.cliffs().len(), 4);
        assert_eq!(sil.height_at(0.0), 0.8);
        assert_eq!(sil.height_at(-0.25), 0.8);
        assert!(sil.cliffs().iter().all(|c| c.theta_l != 0.3 && c.theta_r != 0.3));
    }

    #[test]
    fn test_partial_overlap() {
        let a = Roof::new(-0.4, 0.1, 0.5);
        let b = Roof::new(0.0, 0.5, 0.2);

        let mut sil = Silhouette::new();
        checked_insert(&mut sil, &a);
        checked_insert(&mut sil, &b);

        assert_eq!(sil.height_at(-0.2), 0.5);
        assert_eq!(sil.height_at(0.05), 0.5);
        // Past the taller roof the shorter one takes over.
        assert_eq!(sil.height_at(0.2), 0.2);
        assert_eq!(sil.height_at(0.6), 0.0);
    }

    #[test]
    fn test_monotone_coverage() {
        let roofs = [
            Roof::new(-2.0, -1.0, 0.4),
            Roof::new(-1.5, 0.5, 0.1),
            Roof::new(0.0, 0.2, 1.2),
            Roof::new(-3.0, 3.0, 0.05),
        ];
        let mut sil = Silhouette::new();
        for roof in &roofs {
            checked_insert(&mut sil, roof);
        }

        let mut phi = -3.1;
        while phi < 3.1 {
            let height = sil.height_at(phi);
            assert!(height >= 0.0);
            for roof in &roofs {
                if roof.phi1 <= phi && phi < roof.phi2 {
                    assert!(height >= roof.theta);
                }
            }
            phi += 0.01;
        }
    }

    #[test]
    fn test_height_at_cliff_boundaries() {
        let mut sil = Silhouette::new();
        checked_insert(&mut sil, &Roof::new(-0.2, 0.2, 0.5));

        for pair in sil.cliffs().windows(2) {
            assert_eq!(sil.height_at(pair[0].phi), pair[0].theta_r);
            assert_eq!(sil.height_at(pair[0].phi), pair[1].theta_l);
        }
    }

    #[test]
    fn test_roof_level_with_silhouette_leaves_no_extra_cliffs() {
        let mut sil = Silhouette::new();
        checked_insert(&mut sil, &Roof::new(-0.5, 0.5, 0.3));
        // Same height, nested interval: the envelope is unchanged.
        let before = sil.clone();
        checked_insert(&mut sil, &Roof::new(-0.2, 0.2, 0.3));
        assert_eq!(sil, before);
    }

    #[test]
    fn test_validate_catches_defects() {
        let mut sil = Silhouette::new();
        sil.insert(&Roof::new(-0.2, 0.2, 0.5));
        // Corrupt the list on purpose.
        sil.cliffs[1].theta_r = 0.9;
        assert!(matches!(
            sil.validate(),
            Err(SilhouetteError::HeightGap(_))
        ));
    }
}
