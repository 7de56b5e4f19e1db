//! Simulated-annealing tour optimizer.
//!
//! Single-trajectory search: propose a random swap, always accept
//! improvements, accept worsening moves with the Metropolis probability
//! `exp(-delta / temperature)`, and cool multiplicatively until the
//! temperature floor. The best tour seen along the way is returned.

use rand::Rng;
use tracing::debug;

use crate::tour::{PinnedEnds, pinned_length_km};
use crate::traits::Stop;

/// Cooling schedule for [`annealing_order`].
#[derive(Debug, Clone)]
pub struct AnnealingSchedule {
    pub initial_temperature: f64,
    /// Multiplicative factor applied each iteration.
    pub cooling_factor: f64,
    /// The walk stops once the temperature falls to this floor.
    pub floor_temperature: f64,
}

impl Default for AnnealingSchedule {
    fn default() -> Self {
        Self {
            initial_temperature: 100.0,
            cooling_factor: 0.995,
            floor_temperature: 0.1,
        }
    }
}

/// Anneals a tour over `stops`, returned as indices into the slice.
///
/// Swaps are confined to the mutable middle; pinned ends never move. Inputs
/// with fewer than 2 mutable stops come back unchanged.
pub fn annealing_order<S, R>(
    stops: &[S],
    ends: PinnedEnds,
    schedule: &AnnealingSchedule,
    rng: &mut R,
) -> Vec<usize>
where
    S: Stop,
    R: Rng,
{
    let n = stops.len();
    let Some((lo, hi)) = ends.mutable_range(n) else {
        return (0..n).collect();
    };

    let mut current: Vec<usize> = (lo..=hi).collect();
    let mut current_km = pinned_length_km(stops, &current, ends);
    let mut best = current.clone();
    let mut best_km = current_km;

    let mut temperature = schedule.initial_temperature;
    let mut iterations = 0u32;

    while temperature > schedule.floor_temperature {
        iterations += 1;

        let i = rng.gen_range(0..current.len());
        let j = rng.gen_range(0..current.len());
        current.swap(i, j);
        let neighbor_km = pinned_length_km(stops, &current, ends);
        let delta = neighbor_km - current_km;

        if delta < 0.0 || rng.gen_bool((-delta / temperature).exp().min(1.0)) {
            current_km = neighbor_km;
            if current_km < best_km {
                best.copy_from_slice(&current);
                best_km = current_km;
            }
        } else {
            // Rejected: undo the swap.
            current.swap(i, j);
        }

        temperature *= schedule.cooling_factor;
    }

    debug!(iterations, best_km, "annealing finished");

    assemble_order(&best, n, ends)
}

fn assemble_order(middle: &[usize], n: usize, ends: PinnedEnds) -> Vec<usize> {
    let mut order = Vec::with_capacity(n);
    if ends.first {
        order.push(0);
    }
    order.extend_from_slice(middle);
    if ends.last {
        order.push(n - 1);
    }
    order
}
