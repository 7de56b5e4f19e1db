//! HTTP adapter for the external directions service (delegated ordering).
//!
//! Sends an ordered waypoint sequence to an OSRM-compatible trip endpoint and
//! returns the service's ordering plus the drawn geometry. Failures are
//! returned to the caller as-is: the core performs no retry.

use std::fmt;

use serde::Deserialize;
use tracing::warn;

use crate::polyline::Polyline;
use crate::traits::{DirectionsProvider, Stop};

#[derive(Debug, Clone)]
pub struct DirectionsConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for DirectionsConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "car".to_string(),
            timeout_secs: 10,
        }
    }
}

/// A routed trip as returned by the directions service.
#[derive(Debug, Clone)]
pub struct DirectionsRoute {
    /// For each input waypoint, its position in the service's visiting order.
    pub waypoint_order: Vec<usize>,
    /// Decoded route geometry for map rendering.
    pub geometry: Polyline,
    /// Road-network distance, in kilometers.
    pub distance_km: f64,
    /// Road-network travel time, in seconds.
    pub duration_secs: u64,
}

#[derive(Debug)]
pub enum DirectionsError {
    Http(reqwest::Error),
    /// The service answered but produced no routable trip.
    NoRoute(String),
}

impl From<reqwest::Error> for DirectionsError {
    fn from(err: reqwest::Error) -> Self {
        DirectionsError::Http(err)
    }
}

impl fmt::Display for DirectionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectionsError::Http(err) => write!(f, "directions request failed: {}", err),
            DirectionsError::NoRoute(code) => write!(f, "directions service returned no route ({})", code),
        }
    }
}

impl std::error::Error for DirectionsError {}

#[derive(Debug, Clone)]
pub struct DirectionsClient {
    config: DirectionsConfig,
    client: reqwest::blocking::Client,
}

impl DirectionsClient {
    pub fn new(config: DirectionsConfig) -> Result<Self, DirectionsError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn trip_url(&self, waypoints: &[(f64, f64)]) -> String {
        let coords = waypoints
            .iter()
            .map(|(lat, lng)| format!("{:.6},{:.6}", lng, lat))
            .collect::<Vec<_>>()
            .join(";");

        format!(
            "{}/trip/v1/{}/{}?roundtrip=false&source=first&destination=last&geometries=geojson",
            self.config.base_url, self.config.profile, coords
        )
    }
}

impl DirectionsProvider for DirectionsClient {
    fn route_for(&self, waypoints: &[(f64, f64)]) -> Result<DirectionsRoute, DirectionsError> {
        let url = self.trip_url(waypoints);

        let body: TripResponse = self
            .client
            .get(url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json())
            .map_err(|err| {
                warn!(error = %err, "directions request failed");
                err
            })?;

        parse_trip(body)
    }
}

/// Routes `stops` through an external provider and reorders them to match
/// the provider's visiting order.
///
/// Returns the reordered stops together with the raw provider route, so the
/// caller keeps the geometry and road-network metrics for display. Provider
/// failures come back unchanged; the caller decides whether to retry.
pub fn delegate_route<S, P>(
    stops: &[S],
    provider: &P,
) -> Result<(Vec<S>, DirectionsRoute), DirectionsError>
where
    S: Stop + Clone,
    P: DirectionsProvider,
{
    let waypoints: Vec<(f64, f64)> = stops.iter().map(|stop| stop.location()).collect();
    let route = provider.route_for(&waypoints)?;

    if route.waypoint_order.len() != stops.len() {
        return Err(DirectionsError::NoRoute(format!(
            "waypoint count mismatch: sent {}, got {}",
            stops.len(),
            route.waypoint_order.len()
        )));
    }

    let mut slots: Vec<Option<S>> = vec![None; stops.len()];
    for (input_idx, stop) in stops.iter().enumerate() {
        let slot = route.waypoint_order[input_idx];
        if slot >= slots.len() || slots[slot].is_some() {
            return Err(DirectionsError::NoRoute(format!(
                "invalid waypoint order at index {}",
                input_idx
            )));
        }
        slots[slot] = Some(stop.clone());
    }

    let ordered = slots.into_iter().map(|slot| slot.expect("every slot filled")).collect();
    Ok((ordered, route))
}

fn parse_trip(body: TripResponse) -> Result<DirectionsRoute, DirectionsError> {
    if body.code != "Ok" {
        return Err(DirectionsError::NoRoute(body.code));
    }
    let Some(trip) = body.trips.into_iter().next() else {
        return Err(DirectionsError::NoRoute("empty trip list".to_string()));
    };

    let waypoint_order = body
        .waypoints
        .into_iter()
        .map(|waypoint| waypoint.waypoint_index)
        .collect();

    // GeoJSON coordinates arrive (lng, lat); the polyline stores (lat, lng).
    let points = trip
        .geometry
        .map(|geometry| {
            geometry
                .coordinates
                .into_iter()
                .map(|[lng, lat]| (lat, lng))
                .collect()
        })
        .unwrap_or_default();

    Ok(DirectionsRoute {
        waypoint_order,
        geometry: Polyline::new(points),
        distance_km: trip.distance / 1000.0,
        duration_secs: trip.duration.round() as u64,
    })
}

#[derive(Debug, Deserialize)]
struct TripResponse {
    code: String,
    #[serde(default)]
    trips: Vec<Trip>,
    #[serde(default)]
    waypoints: Vec<TripWaypoint>,
}

#[derive(Debug, Deserialize)]
struct Trip {
    /// Meters.
    distance: f64,
    /// Seconds.
    duration: f64,
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
struct TripWaypoint {
    waypoint_index: usize,
}
