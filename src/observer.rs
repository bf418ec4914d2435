//! Observer state: where the viewer stands, in planar and geographic
//! coordinates, and the windows they can see the sky through.

use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};

use crate::geom::projection::bearing;
use crate::geom::segment::foot_on_segment;
use crate::sky::roof::Roof;
use crate::{Building, Point};

/// Mean planet radius used by the local map projection, meters.
const PLANET_RADIUS: f64 = 6_371_009.0;
/// Geographic origin of the default local frame (Manhattan).
const CITY_LAT: f64 = 40.771803;
const CITY_LON: f64 = -73.973351;
/// Approximate storey height, meters.
const FLOOR_HEIGHT: f64 = 3.0;

/// The local planar map frame: an equirectangular projection around a
/// reference point, good over a few kilometers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapFrame {
    /// Reference latitude, degrees.
    pub city_lat: f64,
    /// Reference longitude, degrees.
    pub city_lon: f64,
    /// Planet radius, meters.
    pub planet_radius: f64,
}

impl MapFrame {
    pub fn new() -> Self {
        Self {
            city_lat: CITY_LAT,
            city_lon: CITY_LON,
            planet_radius: PLANET_RADIUS,
        }
    }

    /// Projects geographic coordinates onto the planar map.
    pub fn to_planar(&self, lat: f64, lon: f64) -> Point {
        let cos_mean_lat = self.city_lat.to_radians().cos();
        Point::new(
            self.planet_radius * cos_mean_lat * (lon - self.city_lon).to_radians(),
            self.planet_radius * (lat - self.city_lat).to_radians(),
        )
    }

    /// Inverse of [`to_planar`](Self::to_planar): `(lat, lon)` in degrees.
    pub fn to_geographic(&self, pt: Point) -> (f64, f64) {
        let cos_mean_lat = self.city_lat.to_radians().cos();
        let lat = self.city_lat + (pt.y / self.planet_radius).to_degrees();
        let lon = self.city_lon + (pt.x / self.planet_radius / cos_mean_lat).to_degrees();
        (lat, lon)
    }
}

impl Default for MapFrame {
    fn default() -> Self {
        Self::new()
    }
}

/// A view opening: the point on a wall nearest the observer, with its
/// bearing (clockwise from south) and distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Window {
    pub position: Point,
    pub phi: f64,
    pub distance: f64,
}

impl Window {
    /// The minimum-distance candidate.
    pub fn closest(candidates: &[Window]) -> Option<Window> {
        candidates
            .iter()
            .copied()
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    /// Roofs blocking every azimuth outside the 180 degree cone centered
    /// on the window bearing.
    ///
    /// The blocked half circle `(phi + pi/2, phi + 3pi/2)` is normalized
    /// into the `(-pi, pi]` domain and split where it wraps: one roof when
    /// it fits, two when it spans the seam. Zero-width pieces are dropped.
    pub fn blocking_roofs(&self) -> Vec<Roof> {
        let a = wrap_angle(self.phi + FRAC_PI_2);
        let b = wrap_angle(self.phi - FRAC_PI_2);

        let mut roofs = Vec::with_capacity(2);
        if a < b {
            roofs.push(Roof::new(a, b, FRAC_PI_2));
        } else {
            if -PI < b {
                roofs.push(Roof::new(-PI, b, FRAC_PI_2));
            }
            if a < PI {
                roofs.push(Roof::new(a, PI, FRAC_PI_2));
            }
        }
        roofs
    }
}

/// Wraps an angle into `(-pi, pi]`.
fn wrap_angle(mut phi: f64) -> f64 {
    while phi <= -PI {
        phi += 2.0 * PI;
    }
    while phi > PI {
        phi -= 2.0 * PI;
    }
    phi
}

/// The viewer: planar position, height above street level and geographic
/// coordinates, kept consistent through a [`MapFrame`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observer {
    pub x: f64,
    pub y: f64,
    /// Height above street level, meters.
    pub z: f64,
    /// Latitude, degrees.
    pub lat: f64,
    /// Longitude, degrees.
    pub lon: f64,
}

impl Observer {
    /// Places the observer by geographic coordinates.
    pub fn new(lat: f64, lon: f64, z: f64, frame: &MapFrame) -> Self {
        let pt = frame.to_planar(lat, lon);
        Self {
            x: pt.x,
            y: pt.y,
            z,
            lat,
            lon,
        }
    }

    /// Places the observer by planar map coordinates.
    pub fn from_planar(x: f64, y: f64, z: f64, frame: &MapFrame) -> Self {
        let (lat, lon) = frame.to_geographic(Point::new(x, y));
        Self { x, y, z, lat, lon }
    }

    /// Planar position on the map.
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Sets the height from a storey number.
    pub fn set_floor(&mut self, floor: u32) {
        self.z = f64::from(floor) * FLOOR_HEIGHT;
    }

    /// Bearing of a map point as seen from the observer.
    pub fn bearing_to(&self, pt: Point) -> f64 {
        bearing(pt.x - self.x, pt.y - self.y)
    }

    /// Indices of the buildings whose footprint contains the observer.
    pub fn home_building_ids(&self, buildings: &[Building]) -> Vec<usize> {
        buildings
            .iter()
            .enumerate()
            .filter(|(_, b)| b.contains(self.position()))
            .map(|(i, _)| i)
            .collect()
    }

    /// All windows of a building reachable by a perpendicular from the
    /// observer. Degenerate wall edges are skipped.
    pub fn windows(&self, building: &Building) -> Vec<Window> {
        let mut found = Vec::new();
        for (a, b) in building.walls() {
            match foot_on_segment(self.position(), a, b) {
                Ok(Some(foot)) => found.push(Window {
                    position: foot,
                    phi: self.bearing_to(foot),
                    distance: self.position().distance_to(&foot),
                }),
                Ok(None) => {}
                Err(err) => log::warn!("skipping wall edge: {err}"),
            }
        }
        found
    }
}
