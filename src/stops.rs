//! Concrete stop record for callers without their own data model.

use serde::{Deserialize, Serialize};

use crate::traits::Stop;

/// A waste-collection stop as supplied by the surrounding application.
///
/// `fill_level_percent` defaults to 0 when the reading is missing;
/// `last_collected` is an ISO-8601 timestamp kept for display only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionStop {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub fill_level_percent: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_collected: Option<String>,
}

impl CollectionStop {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        latitude: f64,
        longitude: f64,
        fill_level_percent: u8,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            latitude,
            longitude,
            fill_level_percent,
            last_collected: None,
        }
    }

    pub fn last_collected(mut self, timestamp: impl Into<String>) -> Self {
        self.last_collected = Some(timestamp.into());
        self
    }
}

impl Stop for CollectionStop {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn location(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }

    fn fill_level(&self) -> u8 {
        self.fill_level_percent
    }

    fn last_serviced(&self) -> Option<&str> {
        self.last_collected.as_deref()
    }
}

/// Sorts stops by fill level, fullest first. Stable, so equally full stops
/// keep their input order.
pub fn sort_by_fill_priority<S: Stop>(stops: &mut [S]) {
    stops.sort_by(|a, b| b.fill_level().cmp(&a.fill_level()));
}
