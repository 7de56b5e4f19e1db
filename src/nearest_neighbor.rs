//! Nearest-neighbor construction with 2-opt refinement.
//!
//! The greedy tour is deterministic: ties on distance go to the
//! first-encountered candidate, so the result depends only on input order.
//! 2-opt then removes path crossings by segment reversal until a full sweep
//! finds no strict improvement, or the sweep cap is hit.

use crate::tour::{PinnedEnds, step_km};
use crate::traits::Stop;

/// Upper bound on full 2-opt sweeps. Convergence at collection-zone sizes
/// takes a handful of sweeps; the cap keeps pathological inputs from looping.
pub const MAX_TWO_OPT_SWEEPS: usize = 64;

const IMPROVEMENT_EPS: f64 = 1e-10;

/// Builds a greedy tour over `stops`, returned as indices into the slice.
///
/// The tour is seeded at index 0 (the fixed start when one is configured,
/// otherwise the first stop). Each step appends the unvisited stop nearest to
/// the tour's current tail. A fixed end is held out of the greedy phase and
/// appended last.
///
/// Inputs of length 0 or 1 come back unchanged.
pub fn nearest_neighbor_order<S: Stop>(stops: &[S], ends: PinnedEnds) -> Vec<usize> {
    let n = stops.len();
    if n <= 1 {
        return (0..n).collect();
    }

    // Greedy selection never touches a pinned final stop.
    let greedy_limit = n - ends.last as usize;

    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);
    visited[0] = true;
    order.push(0);
    let mut current = 0;

    while order.len() < greedy_limit {
        let mut nearest: Option<(usize, f64)> = None;
        for candidate in 1..greedy_limit {
            if visited[candidate] {
                continue;
            }
            let km = step_km(&stops[current], &stops[candidate]);
            // Strict comparison: the first-encountered minimum wins.
            if nearest.map_or(true, |(_, best)| km < best) {
                nearest = Some((candidate, km));
            }
        }

        match nearest {
            Some((next, _)) => {
                visited[next] = true;
                order.push(next);
                current = next;
            }
            None => break,
        }
    }

    if ends.last {
        order.push(n - 1);
    }

    order
}

/// Refines `order` in place by 2-opt segment reversal.
///
/// Only reversals strictly reducing the tour length are kept, so the result
/// is never longer than the input. Reversals stay inside the mutable range
/// given by `ends`; sweeps stop at a local optimum or after `max_sweeps`.
pub fn two_opt<S: Stop>(stops: &[S], order: &mut [usize], ends: PinnedEnds, max_sweeps: usize) {
    let n = order.len();
    let Some((lo, hi)) = ends.mutable_range(n) else {
        return;
    };

    for _ in 0..max_sweeps {
        let mut improved = false;

        for i in lo..hi {
            for j in (i + 1)..=hi {
                if reversal_delta_km(stops, order, i, j) < -IMPROVEMENT_EPS {
                    order[i..=j].reverse();
                    improved = true;
                }
            }
        }

        if !improved {
            break;
        }
    }
}

/// Length change from reversing `order[i..=j]`.
///
/// Only the boundary edges move: (i-1, i) and (j, j+1) are replaced by
/// (i-1, j) and (i, j+1). A missing boundary (tour end) contributes nothing,
/// so reversing the whole tour is always a zero-delta no-op.
fn reversal_delta_km<S: Stop>(stops: &[S], order: &[usize], i: usize, j: usize) -> f64 {
    let n = order.len();
    let mut delta = 0.0;

    if i > 0 {
        let before = &stops[order[i - 1]];
        delta += step_km(before, &stops[order[j]]) - step_km(before, &stops[order[i]]);
    }
    if j + 1 < n {
        let after = &stops[order[j + 1]];
        delta += step_km(&stops[order[i]], after) - step_km(&stops[order[j]], after);
    }

    delta
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stops::CollectionStop;
    use crate::tour::order_length_km;

    fn stop(id: &str, lat: f64, lng: f64) -> CollectionStop {
        CollectionStop::new(id, id, lat, lng, 60)
    }

    #[test]
    fn greedy_follows_the_line() {
        let stops = vec![
            stop("a", 0.0, 0.0),
            stop("c", 0.0, 2.0),
            stop("b", 0.0, 1.0),
            stop("d", 0.0, 3.0),
        ];
        let order = nearest_neighbor_order(&stops, PinnedEnds::default());
        assert_eq!(order, vec![0, 2, 1, 3]);
    }

    #[test]
    fn tie_break_takes_first_encountered() {
        // b and c are equidistant from a; b comes first in the input.
        let stops = vec![
            stop("a", 0.0, 0.0),
            stop("b", 0.0, 1.0),
            stop("c", 0.0, -1.0),
        ];
        let order = nearest_neighbor_order(&stops, PinnedEnds::default());
        assert_eq!(order[1], 1);
    }

    #[test]
    fn pinned_end_is_appended_last() {
        let stops = vec![
            stop("start", 0.0, 0.0),
            stop("far", 0.0, 5.0),
            stop("near", 0.0, 1.0),
            stop("end", 0.0, 0.5),
        ];
        let ends = PinnedEnds { first: true, last: true };
        let order = nearest_neighbor_order(&stops, ends);
        assert_eq!(order[0], 0);
        assert_eq!(*order.last().unwrap(), 3);
        assert_eq!(order.len(), 4);
    }

    #[test]
    fn degenerate_inputs_unchanged() {
        let empty: Vec<CollectionStop> = Vec::new();
        assert!(nearest_neighbor_order(&empty, PinnedEnds::default()).is_empty());

        let one = vec![stop("only", 22.3, 73.2)];
        assert_eq!(nearest_neighbor_order(&one, PinnedEnds::default()), vec![0]);
    }

    #[test]
    fn two_opt_uncrosses_a_bad_tour() {
        // Square visited diagonally; 2-opt should recover the perimeter walk.
        let stops = vec![
            stop("sw", 0.0, 0.0),
            stop("ne", 1.0, 1.0),
            stop("nw", 1.0, 0.0),
            stop("se", 0.0, 1.0),
        ];
        let mut order = vec![0, 1, 2, 3];
        let before = order_length_km(&stops, &order);
        two_opt(&stops, &mut order, PinnedEnds::default(), MAX_TWO_OPT_SWEEPS);
        let after = order_length_km(&stops, &order);
        assert!(after < before);

        let mut seen = order.clone();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2, 3]);
    }

    #[test]
    fn two_opt_never_worsens() {
        let stops = vec![
            stop("a", 22.303, 73.197),
            stop("b", 22.309, 73.203),
            stop("c", 22.301, 73.205),
            stop("d", 22.307, 73.195),
            stop("e", 22.305, 73.201),
        ];
        let greedy = nearest_neighbor_order(&stops, PinnedEnds::default());
        let before = order_length_km(&stops, &greedy);
        let mut refined = greedy.clone();
        two_opt(&stops, &mut refined, PinnedEnds::default(), MAX_TWO_OPT_SWEEPS);
        assert!(order_length_km(&stops, &refined) <= before + 1e-12);
    }

    #[test]
    fn two_opt_respects_pins() {
        let stops = vec![
            stop("start", 0.0, 0.0),
            stop("m1", 1.0, 1.0),
            stop("m2", 1.0, 0.0),
            stop("m3", 0.0, 1.0),
            stop("end", 0.5, 0.5),
        ];
        let ends = PinnedEnds { first: true, last: true };
        let mut order = vec![0, 1, 2, 3, 4];
        two_opt(&stops, &mut order, ends, MAX_TWO_OPT_SWEEPS);
        assert_eq!(order[0], 0);
        assert_eq!(order[4], 4);
    }

    #[test]
    fn zero_sweep_cap_leaves_order_alone() {
        let stops = vec![
            stop("sw", 0.0, 0.0),
            stop("ne", 1.0, 1.0),
            stop("nw", 1.0, 0.0),
            stop("se", 0.0, 1.0),
        ];
        let mut order = vec![0, 1, 2, 3];
        two_opt(&stops, &mut order, PinnedEnds::default(), 0);
        assert_eq!(order, vec![0, 1, 2, 3]);
    }
}
