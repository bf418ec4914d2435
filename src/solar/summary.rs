//! Yearly sunlight summary and the 0-5 scores.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::sky::silhouette::Silhouette;
use crate::solar::path::SunPath;

/// Sunrise/sunset flags look at the first and last quarter hour of daylight.
const SUNRISE_SUNSET_MINUTES: u32 = 15;
/// Reference day length for the sunlight score, minutes.
const REFERENCE_DAY_MINUTES: f64 = 12.0 * 60.0;

/// One representative week of the yearly summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekRecord {
    /// The sampled date.
    pub date: NaiveDate,
    /// Length of the daylight window, minutes.
    pub daylight_minutes: u32,
    /// Minutes during which the sun clears the skyline.
    pub total_sunlit: u32,
    /// Sunlit minutes before solar noon.
    pub morning_sunlit: u32,
    /// Sunlit minutes after solar noon.
    pub afternoon_sunlit: u32,
    /// Any direct sun within the first quarter hour of daylight.
    pub sunrise: bool,
    /// Any direct sun within the last quarter hour of daylight.
    pub sunset: bool,
}

/// Yearly sunlight summary: one sampled day per calendar week.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SunSummary {
    weeks: Vec<WeekRecord>,
}

impl SunSummary {
    /// Runs the path + visibility pipeline for one date per week of
    /// `year` and reduces each day to a [`WeekRecord`].
    pub fn collect(sil: &Silhouette, lat: f64, lon: f64, year: i32, stepsize: u32) -> Self {
        let mut weeks = Vec::with_capacity(53);
        for date in weekly_dates(year) {
            let mut path = SunPath::compute(lat, lon, date, stepsize);
            path.mark_visibility(sil);
            weeks.push(reduce_day(date, &path));
        }
        Self { weeks }
    }

    pub fn weeks(&self) -> &[WeekRecord] {
        &self.weeks
    }

    /// Average sunlit minutes per sampled day.
    pub fn mean_sunlit_minutes(&self) -> f64 {
        if self.weeks.is_empty() {
            return 0.0;
        }
        let total: u32 = self.weeks.iter().map(|w| w.total_sunlit).sum();
        f64::from(total) / self.weeks.len() as f64
    }

    /// Sunlight score on the 0-5 scale: average daily sunlit minutes
    /// against a 12 hour reference, one decimal.
    pub fn sun_score(&self) -> f64 {
        round1((5.0 * self.mean_sunlit_minutes() / REFERENCE_DAY_MINUTES).clamp(0.0, 5.0))
    }
}

/// One date per week of `year`, starting at January 1st.
fn weekly_dates(year: i32) -> Vec<NaiveDate> {
    let mut dates = Vec::with_capacity(53);
    let mut d = NaiveDate::from_ymd_opt(year, 1, 1).expect("January 1st exists");
    while d.year() == year {
        dates.push(d);
        d = d + Days::new(7);
    }
    dates
}

/// Reduces one day's marked path to its weekly record.
fn reduce_day(date: NaiveDate, path: &SunPath) -> WeekRecord {
    let vis = path.visible();
    let step = path.stepsize();
    let half = vis.len() / 2;

    let morning = vis[..half].iter().filter(|v| **v).count() as u32 * step;
    let afternoon = vis[half..].iter().filter(|v| **v).count() as u32 * step;

    let edge = (SUNRISE_SUNSET_MINUTES / step) as usize;
    let sunrise = vis.iter().take(edge).any(|v| *v);
    let sunset = vis.iter().rev().take(edge).any(|v| *v);

    WeekRecord {
        date,
        daylight_minutes: path.daylight_minutes(),
        total_sunlit: morning + afternoon,
        morning_sunlit: morning,
        afternoon_sunlit: afternoon,
        sunrise,
        sunset,
    }
}

/// Sky-openness score on the 0-5 scale, one decimal.
pub fn sky_score(sil: &Silhouette) -> f64 {
    round1((5.0 * sil.sky_visibility()).clamp(0.0, 5.0))
}

/// Rounds a score to one decimal.
fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Snaps a 0-5 score to the nearest half step, for icon selection.
pub fn icon_step(score: f64) -> f64 {
    (2.0 * score).round() / 2.0
}
