//! Parent selection.
//!
//! NSGA-II uses binary tournament under the crowded-comparison order:
//! lower front rank wins, and on equal rank the larger crowding distance
//! wins.
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective GA: NSGA-II"
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"

use crate::solution::Solution;
use rand::seq::index;
use rand::Rng;

/// Binary crowded tournament.
///
/// Samples two distinct solutions uniformly and returns the index of the
/// one with the strictly smaller rank; on a rank tie, the one with the
/// strictly larger crowding distance; on a full tie, the second sampled.
/// Unranked solutions lose to ranked ones.
///
/// # Panics
/// Panics if `solutions` has fewer than two members.
pub fn crowded_tournament<S: Solution, R: Rng>(solutions: &[S], rng: &mut R) -> usize {
    assert!(
        solutions.len() >= 2,
        "tournament needs at least two solutions"
    );

    let picks = index::sample(rng, solutions.len(), 2);
    let (a, b) = (picks.index(0), picks.index(1));
    let (fa, fb) = (solutions[a].nsga(), solutions[b].nsga());

    let rank_a = fa.rank.unwrap_or(usize::MAX);
    let rank_b = fb.rank.unwrap_or(usize::MAX);

    if rank_a < rank_b {
        a
    } else if rank_a == rank_b && fa.crowding_distance > fb.crowding_distance {
        a
    } else {
        b
    }
}

/// Selects two distinct parent indices with independent tournaments.
///
/// The second tournament is re-drawn until it differs from the first. With
/// exactly two solutions the second parent is simply the other one, since
/// a strictly better solution would win every redraw.
pub fn select_parents<S: Solution, R: Rng>(solutions: &[S], rng: &mut R) -> (usize, usize) {
    let first = crowded_tournament(solutions, rng);
    if solutions.len() == 2 {
        return (first, 1 - first);
    }
    let mut second = crowded_tournament(solutions, rng);
    while second == first {
        second = crowded_tournament(solutions, rng);
    }
    (first, second)
}
