//! Non-dominated sorting and crowding distance.
//!
//! Both functions write their results into each solution's
//! [`NsgaFields`](crate::solution::NsgaFields) and are safe to call any
//! number of times: every sort starts with a full bookkeeping reset.
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic Algorithm: NSGA-II"
//! - IEEE Transactions on Evolutionary Computation, 6(2), 182-197

use crate::population::PopulationSet;
use crate::solution::{Objectives, Solution};

/// Fast non-dominated sorting under constrained dominance.
///
/// Assigns a front rank to every solution and stores the fronts in the
/// population. Front 0 holds the solutions dominated by nobody; front k
/// holds those dominated only by members of fronts 0..k.
///
/// # Algorithm (Deb et al., 2002)
///
/// 1. For every ordered pair, record who dominates whom
/// 2. Solutions with domination count 0 form front 0
/// 3. Peel: each member of the current front releases the solutions it
///    dominates; those reaching count 0 form the next front
///
/// # Complexity
///
/// O(n²) dominance checks.
pub fn fast_non_dominated_sort<S: Solution>(population: &mut PopulationSet<S>) {
    let solutions = population.solutions_mut();
    let n = solutions.len();

    for s in solutions.iter_mut() {
        s.nsga_mut().reset();
    }

    let mut dominated: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut counts = vec![0usize; n];
    let mut first = Vec::new();

    for i in 0..n {
        for j in 0..n {
            if i == j {
                continue;
            }
            if solutions[i].dominates(&solutions[j]) {
                dominated[i].push(j);
            } else if solutions[j].dominates(&solutions[i]) {
                counts[i] += 1;
            }
        }
        if counts[i] == 0 {
            first.push(i);
        }
    }

    for (i, s) in solutions.iter_mut().enumerate() {
        let fields = s.nsga_mut();
        fields.domination_count = counts[i];
        fields.dominated = std::mem::take(&mut dominated[i]);
    }

    let mut fronts: Vec<Vec<usize>> = Vec::new();
    let mut current = first;
    while !current.is_empty() {
        let rank = fronts.len();
        let mut next = Vec::new();
        for &i in &current {
            solutions[i].nsga_mut().rank = Some(rank);
            for k in 0..solutions[i].nsga().dominated.len() {
                let j = solutions[i].nsga().dominated[k];
                counts[j] -= 1;
                if counts[j] == 0 {
                    next.push(j);
                }
            }
        }
        fronts.push(current);
        current = next;
    }

    population.set_fronts(fronts);
}

/// Crowding distance assignment for one front.
///
/// For each objective the front is sorted ascending; the two extremes get
/// `f64::INFINITY` and every interior member accumulates the normalized gap
/// between its neighbours. Distances accumulate across objectives.
///
/// A front of fewer than two members is left untouched: its distance stays
/// at the value set by the last sort reset.
///
/// # Arguments
///
/// - `solutions`: the whole population
/// - `front`: indices into `solutions` forming one front
pub fn crowding_distance<S: Solution>(solutions: &mut [S], front: &[usize]) {
    let n = front.len();
    if n < 2 {
        return;
    }

    for &i in front {
        solutions[i].nsga_mut().crowding_distance = 0.0;
    }

    let mut order = front.to_vec();
    for obj in 0..Objectives::COUNT {
        let value = |i: usize| solutions[i].objectives().get(obj);
        order.sort_by(|&a, &b| value(a).total_cmp(&value(b)));

        let min = value(order[0]);
        let max = value(order[n - 1]);
        let range = if max - min == 0.0 { 1.0 } else { max - min };

        let gaps: Vec<f64> = (1..n - 1)
            .map(|k| (value(order[k + 1]) - value(order[k - 1])) / range)
            .collect();

        solutions[order[0]].nsga_mut().crowding_distance = f64::INFINITY;
        solutions[order[n - 1]].nsga_mut().crowding_distance = f64::INFINITY;
        for (k, gap) in gaps.into_iter().enumerate() {
            solutions[order[k + 1]].nsga_mut().crowding_distance += gap;
        }
    }
}

/// Computes crowding distance for every front of a sorted population.
pub fn crowd_all_fronts<S: Solution>(population: &mut PopulationSet<S>) {
    let fronts = population.fronts().to_vec();
    for front in &fronts {
        crowding_distance(population.solutions_mut(), front);
    }
}
