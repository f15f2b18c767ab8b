//! Equirectangular projection onto a flat world-map image.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn to_percent(&self) -> MapPosition {
        to_percent(Some(self.latitude), Some(self.longitude))
    }
}

/// Position on the map image, both axes in percent (0..=100).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapPosition {
    pub left: f64,
    pub top: f64,
}

impl MapPosition {
    /// CSS offsets, e.g. `("50.000%", "0.000%")`.
    pub fn css(&self) -> (String, String) {
        (format!("{:.3}%", self.left), format!("{:.3}%", self.top))
    }
}

/// Wrap a longitude into [-180, 180).
pub fn normalize_longitude(longitude: f64) -> f64 {
    (longitude + 540.0).rem_euclid(360.0) - 180.0
}

/// Horizontal offset. Missing or non-finite input maps to 0.
pub fn left_percent(longitude: Option<f64>) -> f64 {
    match longitude {
        Some(lon) if lon.is_finite() => (normalize_longitude(lon) + 180.0) / 360.0 * 100.0,
        _ => 0.0,
    }
}

/// Vertical offset, north at the top. Latitude is clamped to [-90, 90];
/// missing or NaN input maps to 0.
pub fn top_percent(latitude: Option<f64>) -> f64 {
    match latitude {
        Some(lat) if !lat.is_nan() => (90.0 - lat.clamp(-90.0, 90.0)) / 180.0 * 100.0,
        _ => 0.0,
    }
}

pub fn to_percent(latitude: Option<f64>, longitude: Option<f64>) -> MapPosition {
    MapPosition {
        left: left_percent(longitude),
        top: top_percent(latitude),
    }
}
