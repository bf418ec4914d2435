//! One-shot exposure evaluation: buildings and an observer in, merged
//! skyline, yearly summary and scores out.
//!
//! Every call owns a fresh silhouette and summary; nothing is shared
//! between evaluations.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::geom::projection::{BLUR_EPSILON, project_building};
use crate::observer::{Observer, Window};
use crate::Building;
use crate::sky::silhouette::Silhouette;
use crate::solar::summary::{SunSummary, icon_step, sky_score};

/// Configuration of one exposure evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExposureConfig {
    /// Sun sampling step, minutes.
    pub stepsize_minutes: u32,
    /// Angular margin around projected roofs, radians.
    pub blur_epsilon: f64,
    /// Calendar year sampled by the weekly summary.
    pub year: i32,
}

impl ExposureConfig {
    pub fn new(year: i32) -> Self {
        Self {
            stepsize_minutes: 5,
            blur_epsilon: BLUR_EPSILON,
            year,
        }
    }
}

/// Everything a caller needs to render or score one evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct ExposureReport {
    /// The merged skyline, for rendering or inspection.
    pub silhouette: Silhouette,
    /// Weekly sunlight summary for the configured year.
    pub summary: SunSummary,
    /// The window the evaluation looked through, if the observer was
    /// inside a building.
    pub closest_window: Option<Window>,
    /// Sunlight score, 0-5, one decimal.
    pub sun_score: f64,
    /// Sky-openness score, 0-5, one decimal.
    pub sky_score: f64,
    /// Sunlight score snapped to half steps, for icon selection.
    pub sun_icon_step: f64,
    /// Sky score snapped to half steps, for icon selection.
    pub sky_icon_step: f64,
}

/// Runs the full pipeline for one observer against a materialized,
/// already spatially filtered set of buildings.
pub fn run_exposure(
    buildings: &[Building],
    observer: &Observer,
    config: &ExposureConfig,
) -> Result<ExposureReport> {
    let mut sil = Silhouette::new();

    let homes = observer.home_building_ids(buildings);
    let mut candidates = Vec::new();
    for &i in &homes {
        candidates.extend(observer.windows(&buildings[i]));
    }
    let closest_window = Window::closest(&candidates);

    // The wall blocks everything the window does not show; it goes in
    // first so building roofs merge over it.
    if let Some(window) = &closest_window {
        for roof in window.blocking_roofs() {
            sil.insert(&roof);
        }
    }

    // An indoor observer sees the street from the wall opening, not from
    // inside the room.
    let origin = match &closest_window {
        Some(window) => window.position,
        None => observer.position(),
    };

    let mut projected = 0usize;
    for (i, building) in buildings.iter().enumerate() {
        if building.height() <= observer.z || homes.contains(&i) {
            continue;
        }
        for roof in project_building(building, origin, observer.z, config.blur_epsilon) {
            sil.insert(&roof);
        }
        projected += 1;
    }
    sil.validate()?;
    log::debug!(
        "merged {projected} of {} buildings into {} cliffs",
        buildings.len(),
        sil.cliffs().len()
    );

    let summary = SunSummary::collect(
        &sil,
        observer.lat,
        observer.lon,
        config.year,
        config.stepsize_minutes,
    );
    let sun_score = summary.sun_score();
    let sky_score = sky_score(&sil);

    Ok(ExposureReport {
        summary,
        closest_window,
        sun_score,
        sky_score,
        sun_icon_step: icon_step(sun_score),
        sky_icon_step: icon_step(sky_score),
        silhouette: sil,
    })
}
