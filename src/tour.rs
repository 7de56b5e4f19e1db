//! Tour cost evaluation and the shared fixed-endpoint convention.
//!
//! Every heuristic in this crate scores candidate tours with the functions
//! here; they run in the innermost loops of 2-opt and the genetic algorithm,
//! so they stay pure and allocation-free.

use crate::haversine::haversine_km;
use crate::traits::Stop;

/// Total length of a tour visiting `stops` in slice order, in kilometers.
///
/// Sum of consecutive-pair great-circle distances; 0 for fewer than 2 stops.
pub fn tour_length_km<S: Stop>(stops: &[S]) -> f64 {
    let mut total = 0.0;
    for pair in stops.windows(2) {
        total += step_km(&pair[0], &pair[1]);
    }
    total
}

/// Total length of the tour visiting `stops` in the order given by `order`.
pub fn order_length_km<S: Stop>(stops: &[S], order: &[usize]) -> f64 {
    let mut total = 0.0;
    for pair in order.windows(2) {
        total += step_km(&stops[pair[0]], &stops[pair[1]]);
    }
    total
}

pub(crate) fn step_km<S: Stop>(from: &S, to: &S) -> f64 {
    let (lat1, lon1) = from.location();
    let (lat2, lon2) = to.location();
    haversine_km(lat1, lon1, lat2, lon2)
}

/// Which ends of the working order are fixed in place.
///
/// Convention shared by every heuristic: a fixed start sits at index 0, a
/// fixed end at index N-1, and all shuffling, swapping, and segment reversal
/// stays inside the open interval between them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PinnedEnds {
    pub first: bool,
    pub last: bool,
}

impl PinnedEnds {
    /// Inclusive index bounds of the mutable portion of an order of length `n`.
    ///
    /// Returns `None` when fewer than 2 positions are free to move.
    pub fn mutable_range(&self, n: usize) -> Option<(usize, usize)> {
        let lo = self.first as usize;
        let hi = (n.saturating_sub(1)).saturating_sub(self.last as usize);
        if hi > lo { Some((lo, hi)) } else { None }
    }
}

/// Length of the tour `[start?] ++ middle ++ [end?]` without materializing it.
///
/// `middle` holds indices into `stops`; a pinned start contributes index 0 and
/// a pinned end index `stops.len() - 1`, per the shared endpoint convention.
pub(crate) fn pinned_length_km<S: Stop>(stops: &[S], middle: &[usize], ends: PinnedEnds) -> f64 {
    let mut total = 0.0;
    let mut prev: Option<usize> = if ends.first { Some(0) } else { None };

    for &idx in middle {
        if let Some(p) = prev {
            total += step_km(&stops[p], &stops[idx]);
        }
        prev = Some(idx);
    }

    if ends.last {
        let last = stops.len() - 1;
        if let Some(p) = prev {
            total += step_km(&stops[p], &stops[last]);
        }
    }

    total
}
