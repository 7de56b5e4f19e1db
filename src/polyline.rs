//! Polyline representation for route geometries.
//!
//! Stores decoded (latitude, longitude) points for internal processing.
//! Encoding to/from the compact wire format belongs at API boundaries
//! (receiving from the directions service, sending to a frontend), not here.

use serde::{Deserialize, Serialize};

use crate::haversine::haversine_km;

/// A route geometry as a decoded coordinate sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<(f64, f64)>,
}

impl Polyline {
    /// Creates a polyline from decoded (latitude, longitude) points.
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn into_points(self) -> Vec<(f64, f64)> {
        self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Great-circle length of the drawn line, in kilometers.
    pub fn length_km(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| haversine_km(pair[0].0, pair[0].1, pair[1].0, pair[1].1))
            .sum()
    }
}
