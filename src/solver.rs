//! Route dispatcher: eligibility filtering, endpoint pinning, and strategy
//! selection.

use std::fmt;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{debug, warn};

use crate::annealing::{AnnealingSchedule, annealing_order};
use crate::genetic::{GeneticParams, genetic_order};
use crate::haversine::{DEFAULT_SPEED_KMH, drive_time_secs};
use crate::nearest_neighbor::{MAX_TWO_OPT_SWEEPS, nearest_neighbor_order, two_opt};
use crate::tour::{PinnedEnds, tour_length_km};
use crate::traits::Stop;

/// Tour-construction strategy, each variant carrying the parameters it needs.
///
/// `Delegated` performs no ordering of its own: the stops come back in
/// fill-priority order for an external directions service (see
/// [`crate::directions`]) to sequence.
#[derive(Debug, Clone)]
pub enum Strategy {
    NearestNeighbor,
    Genetic(GeneticParams),
    SimulatedAnnealing(AnnealingSchedule),
    Delegated,
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::NearestNeighbor
    }
}

/// Per-call configuration for [`optimize`]. Read-only during a call.
#[derive(Debug, Clone)]
pub struct OptimizeOptions {
    pub strategy: Strategy,
    /// Fill-level cutoff for eligibility, in percent.
    pub min_fill_percent: u8,
    /// When set, every stop is eligible regardless of fill level.
    pub include_all: bool,
    /// Id of a stop that must open the route. Ignored with a warning if the
    /// id is not in the eligible set.
    pub start_id: Option<String>,
    /// Id of a stop that must close the route. Ignored with a warning if the
    /// id is not in the eligible set or duplicates the start.
    pub end_id: Option<String>,
    /// Seed for the randomized strategies. Unset means a fresh entropy seed,
    /// so repeated calls may return different tours.
    pub seed: Option<u64>,
    /// Assumed average speed for the drive-time estimate.
    pub speed_kmh: f64,
}

impl Default for OptimizeOptions {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            min_fill_percent: 50,
            include_all: false,
            start_id: None,
            end_id: None,
            seed: None,
            speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

/// An ordered visiting sequence with its summary metrics.
///
/// A fresh value on every call; never mutated in place.
#[derive(Debug, Clone)]
pub struct RoutePlan<S> {
    pub stops: Vec<S>,
    pub total_km: f64,
    pub estimated_secs: u64,
}

#[derive(Debug)]
pub enum OptimizeError {
    /// Fewer than 2 stops met the eligibility threshold; a tour over fewer
    /// than 2 points is undefined.
    InsufficientStops { eligible: usize },
}

impl fmt::Display for OptimizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptimizeError::InsufficientStops { eligible } => write!(
                f,
                "not enough stops to optimize: {} eligible, at least 2 required",
                eligible
            ),
        }
    }
}

impl std::error::Error for OptimizeError {}

/// Stops meeting the configured fill-level threshold, in input order.
///
/// With `include_all` set, every stop qualifies.
pub fn eligible_stops<S: Stop + Clone>(stops: &[S], options: &OptimizeOptions) -> Vec<S> {
    if options.include_all {
        return stops.to_vec();
    }
    stops
        .iter()
        .filter(|stop| stop.fill_level() >= options.min_fill_percent)
        .cloned()
        .collect()
}

/// Filters `stops` by eligibility and orders the survivors with the
/// configured strategy.
///
/// Fixed start/end stops, when present in the eligible set, open and close
/// the returned route; stale references are dropped with a warning rather
/// than failing the call. Errors only when fewer than 2 stops are eligible.
pub fn optimize<S>(stops: &[S], options: &OptimizeOptions) -> Result<RoutePlan<S>, OptimizeError>
where
    S: Stop + Clone + Sync,
{
    let mut working = eligible_stops(stops, options);
    if working.len() < 2 {
        return Err(OptimizeError::InsufficientStops { eligible: working.len() });
    }

    let ends = pin_endpoints(&mut working, options);
    debug!(
        strategy = ?options.strategy,
        eligible = working.len(),
        start_pinned = ends.first,
        end_pinned = ends.last,
        "optimizing collection route"
    );

    let order = run_strategy(&working, ends, options);

    let routed: Vec<S> = order.into_iter().map(|idx| working[idx].clone()).collect();
    let total_km = tour_length_km(&routed);

    Ok(RoutePlan {
        stops: routed,
        total_km,
        estimated_secs: drive_time_secs(total_km, options.speed_kmh),
    })
}

fn run_strategy<S: Stop + Sync>(
    working: &[S],
    ends: PinnedEnds,
    options: &OptimizeOptions,
) -> Vec<usize> {
    let mut rng = match options.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };

    match &options.strategy {
        Strategy::NearestNeighbor => {
            let mut order = nearest_neighbor_order(working, ends);
            two_opt(working, &mut order, ends, MAX_TWO_OPT_SWEEPS);
            order
        }
        Strategy::Genetic(params) => genetic_order(working, ends, params, &mut rng),
        Strategy::SimulatedAnnealing(schedule) => {
            annealing_order(working, ends, schedule, &mut rng)
        }
        Strategy::Delegated => {
            // The external service does the sequencing; hand it the fullest
            // bins first, keeping any pinned ends in place.
            let mut order: Vec<usize> = (0..working.len()).collect();
            if let Some((lo, hi)) = ends.mutable_range(working.len()) {
                order[lo..=hi]
                    .sort_by(|&a, &b| working[b].fill_level().cmp(&working[a].fill_level()));
            }
            order
        }
    }
}

/// Moves a configured start stop to the front and end stop to the back of
/// `working`, reporting which ends are now fixed.
///
/// A reference to a stop outside the working set, or an end duplicating the
/// start, is ignored: the stale id most likely points at a bin that fell
/// under the fill threshold since the caller picked it.
fn pin_endpoints<S: Stop>(working: &mut Vec<S>, options: &OptimizeOptions) -> PinnedEnds {
    let mut ends = PinnedEnds::default();

    if let Some(start_id) = options.start_id.as_deref() {
        match working.iter().position(|stop| stop.id() == start_id) {
            Some(pos) => {
                let stop = working.remove(pos);
                working.insert(0, stop);
                ends.first = true;
            }
            None => warn!(stop_id = start_id, "start stop not in eligible set, ignoring"),
        }
    }

    if let Some(end_id) = options.end_id.as_deref() {
        if options.start_id.as_deref() == Some(end_id) {
            warn!(stop_id = end_id, "end stop duplicates start stop, ignoring");
        } else {
            match working.iter().position(|stop| stop.id() == end_id) {
                Some(pos) => {
                    let stop = working.remove(pos);
                    working.push(stop);
                    ends.last = true;
                }
                None => warn!(stop_id = end_id, "end stop not in eligible set, ignoring"),
            }
        }
    }

    ends
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stops::CollectionStop;

    fn stop(id: &str, lat: f64, lng: f64, fill: u8) -> CollectionStop {
        CollectionStop::new(id, id, lat, lng, fill)
    }

    #[test]
    fn filter_applies_threshold() {
        let stops = vec![
            stop("a", 22.30, 73.20, 90),
            stop("b", 22.31, 73.21, 20),
            stop("c", 22.32, 73.19, 85),
        ];
        let options = OptimizeOptions::default();
        let eligible = eligible_stops(&stops, &options);
        let ids: Vec<&str> = eligible.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn filter_include_all_keeps_everything() {
        let stops = vec![stop("a", 22.30, 73.20, 10), stop("b", 22.31, 73.21, 0)];
        let options = OptimizeOptions { include_all: true, ..OptimizeOptions::default() };
        assert_eq!(eligible_stops(&stops, &options).len(), 2);
    }

    #[test]
    fn threshold_is_inclusive() {
        let stops = vec![stop("edge", 22.30, 73.20, 50)];
        let options = OptimizeOptions::default();
        assert_eq!(eligible_stops(&stops, &options).len(), 1);
    }

    #[test]
    fn too_few_eligible_is_an_error() {
        let stops = vec![stop("a", 22.30, 73.20, 90)];
        let err = optimize(&stops, &OptimizeOptions::default()).unwrap_err();
        match &err {
            OptimizeError::InsufficientStops { eligible } => assert_eq!(*eligible, 1),
        }
        assert!(err.to_string().contains("not enough stops"));
    }

    #[test]
    fn pin_endpoints_moves_start_and_end() {
        let mut working = vec![
            stop("a", 22.30, 73.20, 90),
            stop("b", 22.31, 73.21, 80),
            stop("c", 22.32, 73.19, 85),
        ];
        let options = OptimizeOptions {
            start_id: Some("b".into()),
            end_id: Some("a".into()),
            ..OptimizeOptions::default()
        };
        let ends = pin_endpoints(&mut working, &options);
        assert!(ends.first && ends.last);
        assert_eq!(working[0].id, "b");
        assert_eq!(working[2].id, "a");
    }

    #[test]
    fn unknown_endpoint_reference_is_ignored() {
        let mut working = vec![stop("a", 22.30, 73.20, 90), stop("b", 22.31, 73.21, 80)];
        let options = OptimizeOptions {
            start_id: Some("missing".into()),
            ..OptimizeOptions::default()
        };
        let ends = pin_endpoints(&mut working, &options);
        assert_eq!(ends, PinnedEnds::default());
        assert_eq!(working[0].id, "a");
    }

    #[test]
    fn end_duplicating_start_is_ignored() {
        let mut working = vec![stop("a", 22.30, 73.20, 90), stop("b", 22.31, 73.21, 80)];
        let options = OptimizeOptions {
            start_id: Some("a".into()),
            end_id: Some("a".into()),
            ..OptimizeOptions::default()
        };
        let ends = pin_endpoints(&mut working, &options);
        assert!(ends.first);
        assert!(!ends.last);
    }

    #[test]
    fn delegated_orders_by_fill_priority() {
        let stops = vec![
            stop("low", 22.30, 73.20, 55),
            stop("high", 22.31, 73.21, 95),
            stop("mid", 22.32, 73.19, 70),
        ];
        let options = OptimizeOptions {
            strategy: Strategy::Delegated,
            ..OptimizeOptions::default()
        };
        let plan = optimize(&stops, &options).unwrap();
        let ids: Vec<&str> = plan.stops.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["high", "mid", "low"]);
    }
}
