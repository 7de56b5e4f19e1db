//! Genetic-algorithm tour optimizer.
//!
//! Population search over permutations of the mutable stops: tournament
//! selection, order crossover (OX), and swap mutation. Fitness is
//! `1 / (length + 1)`, strictly positive and decreasing in tour length.
//!
//! The RNG is injected so a fixed seed reproduces the returned tour exactly;
//! only the fitness evaluation (pure, RNG-free) fans out across threads.

use rand::Rng;
use rand::seq::SliceRandom;
use rayon::prelude::*;
use tracing::debug;

use crate::tour::{PinnedEnds, pinned_length_km};
use crate::traits::Stop;

/// Search parameters for [`genetic_order`].
#[derive(Debug, Clone)]
pub struct GeneticParams {
    pub population_size: usize,
    pub generations: usize,
    /// Probability that an offspring receives one random swap.
    pub mutation_rate: f64,
    pub tournament_size: usize,
}

impl Default for GeneticParams {
    fn default() -> Self {
        Self {
            population_size: 50,
            generations: 100,
            mutation_rate: 0.02,
            tournament_size: 3,
        }
    }
}

/// Evolves a tour over `stops`, returned as indices into the slice.
///
/// Pinned ends stay at positions 0 and N-1 of every individual; only the
/// middle segment is ever permuted. Returns the shortest tour in the final
/// generation. Inputs with fewer than 2 mutable stops come back unchanged.
pub fn genetic_order<S, R>(
    stops: &[S],
    ends: PinnedEnds,
    params: &GeneticParams,
    rng: &mut R,
) -> Vec<usize>
where
    S: Stop + Sync,
    R: Rng,
{
    let n = stops.len();
    let Some((lo, hi)) = ends.mutable_range(n) else {
        return (0..n).collect();
    };

    let template: Vec<usize> = (lo..=hi).collect();

    let mut population: Vec<Vec<usize>> = (0..params.population_size)
        .map(|_| {
            let mut individual = template.clone();
            individual.shuffle(rng);
            individual
        })
        .collect();

    for generation in 0..params.generations {
        let lengths: Vec<f64> = population
            .par_iter()
            .map(|individual| pinned_length_km(stops, individual, ends))
            .collect();
        let fitness: Vec<f64> = lengths.iter().map(|len| 1.0 / (len + 1.0)).collect();

        if generation % 25 == 0 {
            let best = lengths.iter().cloned().fold(f64::INFINITY, f64::min);
            debug!(generation, best_km = best, "evolving population");
        }

        let mut next = Vec::with_capacity(params.population_size);
        for _ in 0..params.population_size {
            let parent1 = tournament(&fitness, params.tournament_size, rng);
            let parent2 = tournament(&fitness, params.tournament_size, rng);
            let mut child = order_crossover(&population[parent1], &population[parent2], n, rng);
            if rng.gen_bool(params.mutation_rate.clamp(0.0, 1.0)) {
                swap_mutation(&mut child, rng);
            }
            next.push(child);
        }
        population = next;
    }

    let final_lengths: Vec<f64> = population
        .par_iter()
        .map(|individual| pinned_length_km(stops, individual, ends))
        .collect();
    let best = final_lengths
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(idx, _)| idx)
        .expect("population is never empty");

    assemble_order(&population[best], n, ends)
}

/// Tournament selection: draw `size` contestants, keep the fittest.
fn tournament<R: Rng>(fitness: &[f64], size: usize, rng: &mut R) -> usize {
    let mut best = rng.gen_range(0..fitness.len());
    for _ in 1..size {
        let contender = rng.gen_range(0..fitness.len());
        if fitness[contender] > fitness[best] {
            best = contender;
        }
    }
    best
}

/// Order crossover (OX): copy a random segment from `parent1` verbatim, then
/// fill the gaps with `parent2`'s stops in `parent2` order. The child is
/// always a valid permutation of its parents' stops.
fn order_crossover<R: Rng>(
    parent1: &[usize],
    parent2: &[usize],
    stop_count: usize,
    rng: &mut R,
) -> Vec<usize> {
    let m = parent1.len();
    if m < 2 {
        return parent1.to_vec();
    }

    let a = rng.gen_range(0..m);
    let b = rng.gen_range(0..m);
    let (cut_start, cut_end) = if a <= b { (a, b) } else { (b, a) };

    let mut child: Vec<Option<usize>> = vec![None; m];
    let mut taken = vec![false; stop_count];
    for pos in cut_start..=cut_end {
        child[pos] = Some(parent1[pos]);
        taken[parent1[pos]] = true;
    }

    let mut fill = 0;
    for &stop in parent2 {
        if taken[stop] {
            continue;
        }
        while child[fill].is_some() {
            fill += 1;
        }
        child[fill] = Some(stop);
        taken[stop] = true;
    }

    child.into_iter().map(|slot| slot.expect("every position filled")).collect()
}

fn swap_mutation<R: Rng>(individual: &mut [usize], rng: &mut R) {
    if individual.len() < 2 {
        return;
    }
    let i = rng.gen_range(0..individual.len());
    let j = rng.gen_range(0..individual.len());
    individual.swap(i, j);
}

/// Reattaches pinned ends around a middle permutation.
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
