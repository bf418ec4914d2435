use serde::{Deserialize, Serialize};

/// One angular contribution to the skyline: the azimuth interval
/// `[phi1, phi2)` blocked up to elevation `theta`.
///
/// Azimuths live in `(-pi, pi]`, clockwise from south. Intervals never
/// wrap: the projector splits north-crossing edges before they get here,
/// so `phi1 < phi2` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Roof {
    pub phi1: f64,
    pub phi2: f64,
    pub theta: f64,
}

impl Roof {
    pub fn new(phi1: f64, phi2: f64, theta: f64) -> Self {
        debug_assert!(phi1 < phi2, "roof interval must be ordered");
        Self { phi1, phi2, theta }
    }

    /// Angular width of the interval.
    pub fn width(&self) -> f64 {
        self.phi2 - self.phi1
    }
}
