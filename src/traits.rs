//! Core domain traits for the route optimizer.
//!
//! These are intentionally minimal and domain-agnostic. Concrete apps should
//! implement them for their own data models; [`crate::stops::CollectionStop`]
//! is the ready-made record for callers without one.

use crate::directions::{DirectionsError, DirectionsRoute};

/// A collection point with a fill-level reading.
pub trait Stop {
    /// Unique identifier within one optimization call's input set.
    fn id(&self) -> &str;

    /// Human-readable label, display-only.
    fn name(&self) -> &str;

    /// Location coordinates (lat, lng), decimal degrees WGS84.
    fn location(&self) -> (f64, f64);

    /// Fill level percentage 0-100. Stops without a reading report 0.
    fn fill_level(&self) -> u8;

    /// Last service timestamp (ISO-8601), display-only.
    fn last_serviced(&self) -> Option<&str> {
        None
    }
}

/// Provides road-network routing for an ordered waypoint sequence.
///
/// Implementations call out to an external directions service; failures are
/// surfaced to the caller, which decides whether to retry.
pub trait DirectionsProvider {
    fn route_for(&self, waypoints: &[(f64, f64)]) -> Result<DirectionsRoute, DirectionsError>;
}
