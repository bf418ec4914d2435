//! Low-precision solar ephemeris.
//!
//! First-order analytic approximation of the sun's position from mean
//! orbital elements: accurate to a fraction of a degree for decades
//! around the 2000 epoch, which is far below the angular size of a city
//! building as seen from the street.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;
use thiserror::Error;

/// Degrees of planet rotation per minute of the day.
const MINUTE_TO_DEG: f64 = 360.0 / 1440.0;

/// Errors scoped to a single time sample; the affected sample is dropped.
#[derive(Debug, Error, PartialEq)]
pub enum EphemerisError {
    #[error("latitude {0} outside +/-90 degrees")]
    LatitudeOutOfRange(f64),
    #[error("sun direction degenerate (at zenith) for this sample")]
    DegenerateProjection,
}

/// Sun position on the local sky dome, radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SunPosition {
    /// Azimuth, clockwise from south, wrapping at north.
    pub phi: f64,
    /// Elevation above the horizon (negative below it).
    pub theta: f64,
}

/// Reference epoch of the orbital elements.
fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).expect("fixed epoch date")
}

/// The sun's unit direction vector in equatorial coordinates for a date.
///
/// Mean longitude and mean anomaly advance linearly with the day count;
/// the ecliptic longitude adds two sine corrections in the anomaly, and
/// the obliquity drifts by a tiny linear term.
pub fn sun_vector(date: NaiveDate) -> [f64; 3] {
    let n = (date - epoch()).num_days() as f64;

    let l_deg = (280.460 + 0.9856474 * n).rem_euclid(360.0);
    let g = (357.528 + 0.9856003 * n).rem_euclid(360.0).to_radians();
    let lambda = (l_deg + 1.915 * g.sin() + 0.020 * (2.0 * g).sin()).to_radians();
    let eps = (23.439 - 0.0000004 * n).to_radians();

    [
        lambda.cos(),
        eps.cos() * lambda.sin(),
        eps.sin() * lambda.sin(),
    ]
}

/// Local radial, meridional and azimuthal unit vectors for a geographic
/// position at `minutes` after midnight UTC.
fn local_frame(lat: f64, lon: f64, minutes: f64) -> ([f64; 3], [f64; 3], [f64; 3]) {
    let colat = (90.0 - lat).to_radians();
    let hour = (minutes * MINUTE_TO_DEG + lon).to_radians();

    let u_r = [
        colat.sin() * hour.cos(),
        colat.sin() * hour.sin(),
        colat.cos(),
    ];
    let u_mer = [
        colat.cos() * hour.cos(),
        colat.cos() * hour.sin(),
        -colat.sin(),
    ];
    let u_az = [-hour.sin(), hour.cos(), 0.0];
    (u_r, u_mer, u_az)
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Sun azimuth and elevation for a day's sun vector, a geographic
/// position and a minute of the day (UTC).
///
/// The elevation may be negative; callers filter samples below the
/// horizon. The azimuth comes from the horizon projection of the sun
/// vector, which degenerates when the sun stands exactly at zenith.
pub fn sun_position(
    u_sun: [f64; 3],
    lat: f64,
    lon: f64,
    minute: u32,
) -> Result<SunPosition, EphemerisError> {
    if !(-90.0..=90.0).contains(&lat) {
        return Err(EphemerisError::LatitudeOutOfRange(lat));
    }
    let (u_r, u_mer, u_az) = local_frame(lat, lon, f64::from(minute));

    let radial = dot(u_r, u_sun);
    let theta = FRAC_PI_2 - radial.clamp(-1.0, 1.0).acos();

    let mut proj = [
        u_sun[0] - u_r[0] * radial,
        u_sun[1] - u_r[1] * radial,
        u_sun[2] - u_r[2] * radial,
    ];
    let len = dot(proj, proj).sqrt();
    if len < 1e-12 {
        return Err(EphemerisError::DegenerateProjection);
    }
    for c in proj.iter_mut() {
        *c /= len;
    }

    let mut phi = dot(proj, u_mer).clamp(-1.0, 1.0).acos();
    if dot(proj, u_az) > 0.0 {
        phi = -phi;
    }
    Ok(SunPosition { phi, theta })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_length(v: [f64; 3]) -> f64 {
        dot(v, v).sqrt()
    }

    #[test]
    fn test_sun_vector_is_unit() {
        for (y, m, d) in [(2000, 1, 1), (2016, 6, 21), (2026, 12, 22)] {
            let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
            assert!((unit_length(sun_vector(date)) - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_declination_at_equinox_and_solstice() {
        // Near the March equinox the sun sits in the equatorial plane.
        let equinox = NaiveDate::from_ymd_opt(2016, 3, 20).unwrap();
        assert!(sun_vector(equinox)[2].abs() < 0.02);

        // Near the June solstice it reaches the obliquity of the ecliptic.
        let solstice = NaiveDate::from_ymd_opt(2016, 6, 21).unwrap();
        let z = sun_vector(solstice)[2];
        assert!((z - 23.44_f64.to_radians().sin()).abs() < 0.01);
    }

    #[test]
    fn test_latitude_out_of_range() {
        let date = NaiveDate::from_ymd_opt(2016, 6, 21).unwrap();
        let result = sun_position(sun_vector(date), 97.0, 0.0, 720);
        assert_eq!(result, Err(EphemerisError::LatitudeOutOfRange(97.0)));
    }

    #[test]
    fn test_zenith_sample_is_degenerate() {
        // The local radial vector at the equator, midnight UTC, lon 0 is
        // (1, 0, 0); a sun standing exactly there has no horizon
        // projection to take the azimuth from.
        let result = sun_position([1.0, 0.0, 0.0], 0.0, 0.0, 0);
        assert_eq!(result, Err(EphemerisError::DegenerateProjection));
    }

    #[test]
    fn test_sun_culminates_due_south() {
        // New York, June solstice: at culmination the sun crosses the
        // meridian close to due south, 72-73 degrees up.
        let date = NaiveDate::from_ymd_opt(2016, 6, 21).unwrap();
        let u_sun = sun_vector(date);

        let mut highest = SunPosition {
            phi: 0.0,
            theta: f64::NEG_INFINITY,
        };
        for minute in 0..1440 {
            if let Ok(pos) = sun_position(u_sun, 40.7, -74.0, minute) {
                if pos.theta > highest.theta {
                    highest = pos;
                }
            }
        }
        assert!(highest.theta > 1.2, "midsummer culmination should be high");
        assert!(
            highest.phi.abs() < 0.05,
            "culminating sun should be close to due south"
        );
    }
}
