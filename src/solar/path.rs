//! One day of the sun's track, and its visibility against a skyline.

use chrono::NaiveDate;

use crate::sky::silhouette::Silhouette;
use crate::solar::ephemeris::{SunPosition, sun_position, sun_vector};

/// Minutes in a full day.
const DAY_MINUTES: u32 = 1440;

/// The sun's sampled track across one day's sky.
///
/// Samples below the horizon are discarded; the rest are ordered by
/// azimuth, which for daylight samples matches the order of the day.
#[derive(Debug, Clone)]
pub struct SunPath {
    positions: Vec<SunPosition>,
    visible: Vec<bool>,
    stepsize: u32,
}

impl SunPath {
    /// Samples the sun across `date` every `stepsize` minutes.
    ///
    /// Samples the ephemeris rejects (bad latitude, sun at zenith) are
    /// omitted rather than failing the whole day.
    pub fn compute(lat: f64, lon: f64, date: NaiveDate, stepsize: u32) -> Self {
        let stepsize = stepsize.max(1);
        let u_sun = sun_vector(date);

        let mut positions = Vec::with_capacity((DAY_MINUTES / stepsize) as usize);
        let mut minute = 0;
        while minute < DAY_MINUTES {
            if let Ok(pos) = sun_position(u_sun, lat, lon, minute) {
                if pos.theta > 0.0 {
                    positions.push(pos);
                }
            }
            minute += stepsize;
        }
        positions.sort_by(|a, b| a.phi.total_cmp(&b.phi));

        Self {
            positions,
            visible: Vec::new(),
            stepsize,
        }
    }

    /// Marks every sample visible or blocked against a skyline.
    pub fn mark_visibility(&mut self, sil: &Silhouette) {
        self.visible = self
            .positions
            .iter()
            .map(|p| p.theta > sil.height_at(p.phi))
            .collect();
    }

    /// Above-horizon samples, ordered by azimuth.
    pub fn positions(&self) -> &[SunPosition] {
        &self.positions
    }

    /// Visibility flags parallel to [`positions`](Self::positions); empty
    /// until [`mark_visibility`](Self::mark_visibility) runs.
    pub fn visible(&self) -> &[bool] {
        &self.visible
    }

    /// Sampling step, minutes.
    pub fn stepsize(&self) -> u32 {
        self.stepsize
    }

    /// Daylight duration covered by the samples, minutes.
    pub fn daylight_minutes(&self) -> u32 {
        self.positions.len() as u32 * self.stepsize
    }

    /// Minutes during which the sun clears the skyline.
    pub fn sunlit_minutes(&self) -> u32 {
        self.visible.iter().filter(|v| **v).count() as u32 * self.stepsize
    }
}
