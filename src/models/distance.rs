use crate::constants::METERS_PER_MILE;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// Distance in statute miles
/// Prevents mixing up the provider's meters with the planner's miles
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct DistanceMiles(pub f64);

impl DistanceMiles {
    pub fn new(miles: f64) -> Result<Self, String> {
        if miles < 0.0 {
            return Err("Distance cannot be negative".to_string());
        }
        if !miles.is_finite() {
            return Err("Distance must be a finite number".to_string());
        }
        Ok(DistanceMiles(miles))
    }

    /// Convert to meters
    pub fn to_meters(self) -> DistanceMeters {
        DistanceMeters(self.0 * METERS_PER_MILE)
    }

    pub fn as_miles(self) -> f64 {
        self.0
    }
}

impl fmt::Display for DistanceMiles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}mi", self.0)
    }
}

impl From<DistanceMeters> for DistanceMiles {
    fn from(meters: DistanceMeters) -> Self {
        DistanceMiles(meters.0 / METERS_PER_MILE)
    }
}

impl Add for DistanceMiles {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        DistanceMiles(self.0 + other.0)
    }
}

impl Sub for DistanceMiles {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        DistanceMiles(self.0 - other.0)
    }
}

/// Distance in meters, as reported by routing providers
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct DistanceMeters(pub f64);

impl DistanceMeters {
    pub fn new(meters: f64) -> Result<Self, String> {
        if meters < 0.0 {
            return Err("Distance cannot be negative".to_string());
        }
        if !meters.is_finite() {
            return Err("Distance must be a finite number".to_string());
        }
        Ok(DistanceMeters(meters))
    }

    /// Convert to miles
    pub fn to_miles(self) -> DistanceMiles {
        DistanceMiles::from(self)
    }

    pub fn as_meters(self) -> f64 {
        self.0
    }
}

impl fmt::Display for DistanceMeters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}m", self.0)
    }
}

impl From<DistanceMiles> for DistanceMeters {
    fn from(miles: DistanceMiles) -> Self {
        miles.to_meters()
    }
}
