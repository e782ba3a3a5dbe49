use crate::constants::EARTH_RADIUS_MILES;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Result<Self, String> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(format!(
                "Invalid latitude: {} (must be between -90 and 90)",
                lat
            ));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(format!(
                "Invalid longitude: {} (must be between -180 and 180)",
                lon
            ));
        }
        Ok(Coordinates { lat, lon })
    }

    /// Calculate distance between two coordinates using Haversine formula
    /// Returns distance in miles
    pub fn distance_to(&self, other: &Coordinates) -> f64 {
        let lat1_rad = self.lat.to_radians();
        let lat2_rad = other.lat.to_radians();
        let delta_lat = (other.lat - self.lat).to_radians();
        let delta_lon = (other.lon - self.lon).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_MILES * c
    }

    /// Point a fraction `t` (0..=1) of the way towards `other`, interpolated
    /// in lat/lon space
    pub fn lerp(&self, other: &Coordinates, t: f64) -> Coordinates {
        Coordinates {
            lat: self.lat + (other.lat - self.lat) * t,
            lon: self.lon + (other.lon - self.lon) * t,
        }
    }

    /// Calculate perpendicular distance from this point to a line segment
    /// Returns (distance_miles, t) where t is the position along the segment [0,1]
    fn distance_to_segment(&self, p1: &Coordinates, p2: &Coordinates) -> (f64, f64) {
        let dx = p2.lon - p1.lon;
        let dy = p2.lat - p1.lat;
        let len_sq = dx * dx + dy * dy;

        if len_sq < 1e-18 {
            // Segment is essentially a point
            return (self.distance_to(p1), 0.0);
        }

        // Projection in lat/lon space, good enough for road-length segments.
        // Longitude is scaled by cos(lat) so east-west segments are not overweighted.
        let scale = self.lat.to_radians().cos().powi(2);
        let t = ((self.lon - p1.lon) * dx * scale + (self.lat - p1.lat) * dy)
            / (dx * dx * scale + dy * dy);
        let t_clamped = t.clamp(0.0, 1.0);

        let closest = p1.lerp(p2, t_clamped);
        (self.distance_to(&closest), t_clamped)
    }

    /// Find minimum distance from this point to a linestring (path)
    /// Returns (distance_miles, closest_segment_index, distance_along_path_miles)
    pub fn distance_to_linestring(&self, path: &[Coordinates]) -> Option<(f64, usize, f64)> {
        if path.len() < 2 {
            return None;
        }

        let mut min_distance = f64::INFINITY;
        let mut closest_segment = 0;
        let mut distance_to_closest_point = 0.0;

        let mut cumulative_distance = 0.0;

        for (i, window) in path.windows(2).enumerate() {
            let segment_start = &window[0];
            let segment_end = &window[1];
            let segment_length = segment_start.distance_to(segment_end);

            let (dist, t) = self.distance_to_segment(segment_start, segment_end);

            if dist < min_distance {
                min_distance = dist;
                closest_segment = i;
                distance_to_closest_point = cumulative_distance + (t * segment_length);
            }

            cumulative_distance += segment_length;
        }

        Some((min_distance, closest_segment, distance_to_closest_point))
    }
}

/// Total length of a polyline in miles
pub fn path_length_miles(path: &[Coordinates]) -> f64 {
    path.windows(2).map(|w| w[0].distance_to(&w[1])).sum()
}
