//! Two-objective quality indicators.
//!
//! All indicators take fronts as slices of `[f0, f1]` points, both
//! objectives minimized. They are usually applied to normalized fronts
//! (see [`Normalizer`](super::Normalizer)).
//!
//! # References
//!
//! - Schott (1995), "Fault Tolerant Design Using Single and Multicriteria
//!   Genetic Algorithm Optimization" (spacing)
//! - Zitzler & Thiele (1999), "Multiobjective Evolutionary Algorithms: A
//!   Comparative Case Study" (hypervolume)
//! - Ishibuchi et al. (2015), "Modified Distance Calculation in
//!   Generational Distance and Inverted Generational Distance" (GD+, IGD+)

use super::Point;

fn by_first_objective(points: &[Point]) -> Vec<Point> {
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a[0].total_cmp(&b[0]).then(a[1].total_cmp(&b[1])));
    sorted
}

/// Spread uniformity of a front.
///
/// Sorts the front by the first objective and returns the population
/// standard deviation of the Euclidean distances between consecutive
/// points. Consecutive points in that order are nearest neighbours only on
/// a two-objective non-dominated front.
///
/// Returns 0.0 for fronts with fewer than two points.
pub fn spacing(front: &[Point]) -> f64 {
    if front.len() < 2 {
        return 0.0;
    }

    let sorted = by_first_objective(front);
    let gaps: Vec<f64> = sorted
        .windows(2)
        .map(|w| ((w[1][0] - w[0][0]).powi(2) + (w[1][1] - w[0][1]).powi(2)).sqrt())
        .collect();

    let n = gaps.len() as f64;
    let mean = gaps.iter().sum::<f64>() / n;
    let variance = gaps.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

/// Area dominated by `front` and bounded by `reference`.
///
/// Points beyond the reference point in either objective are ignored. The
/// remaining points are swept in order of the first objective, each adding
/// the rectangle between itself, the next point's first objective and the
/// reference point's second objective.
///
/// Returns 0.0 if no point lies within the reference box.
///
/// # Examples
///
/// ```
/// use u_placement::metrics::hypervolume;
///
/// let front = [[0.0, 1.0], [1.0, 0.0]];
/// let hv = hypervolume(&front, [2.0, 2.0]);
/// assert!((hv - 3.0).abs() < 1e-12);
/// ```
pub fn hypervolume(front: &[Point], reference: Point) -> f64 {
    let inside: Vec<Point> = front
        .iter()
        .copied()
        .filter(|p| p[0] <= reference[0] && p[1] <= reference[1])
        .collect();
    if inside.is_empty() {
        return 0.0;
    }

    let sorted = by_first_objective(&inside);
    let mut area = 0.0;
    let mut lowest = f64::INFINITY;
    for (i, p) in sorted.iter().enumerate() {
        lowest = lowest.min(p[1]);
        let next_x = sorted.get(i + 1).map_or(reference[0], |q| q[0]);
        area += (next_x - p[0]) * (reference[1] - lowest);
    }
    area
}

/// Dominance-compliant distance from `a` to `z`.
///
/// Only objectives where `a` is worse than `z` contribute:
/// `‖max(a − z, 0)‖₂`. Zero whenever `a` weakly dominates `z`.
#[inline]
pub fn distance_plus(a: Point, z: Point) -> f64 {
    let d0 = (a[0] - z[0]).max(0.0);
    let d1 = (a[1] - z[1]).max(0.0);
    (d0 * d0 + d1 * d1).sqrt()
}

fn nearest_plus(a: Point, others: &[Point]) -> f64 {
    others
        .iter()
        .map(|&z| distance_plus(a, z))
        .fold(f64::INFINITY, f64::min)
}

/// Generational distance plus: convergence of `front` toward `reference`.
///
/// Computed as `sqrt(Σ d⁺(a, Z)²) / |A|`, where `d⁺(a, Z)` is the smallest
/// [`distance_plus`] from front point `a` to any reference point. Note the
/// root is taken before dividing by the front size, which differs from the
/// mean-then-root form found in some texts.
///
/// Returns `f64::INFINITY` for an empty front or an empty reference.
pub fn gd_plus(front: &[Point], reference: &[Point]) -> f64 {
    if front.is_empty() || reference.is_empty() {
        return f64::INFINITY;
    }
    let sum: f64 = front
        .iter()
        .map(|&a| nearest_plus(a, reference).powi(2))
        .sum();
    sum.sqrt() / front.len() as f64
}

/// Inverted generational distance plus: convergence and coverage.
///
/// Mean over reference points `z` of the smallest [`distance_plus`] from
/// any front point to `z`.
///
/// Returns 0.0 for an empty reference and `f64::INFINITY` for an empty
/// front with a non-empty reference.
pub fn igd_plus(front: &[Point], reference: &[Point]) -> f64 {
    if reference.is_empty() {
        return 0.0;
    }
    if front.is_empty() {
        return f64::INFINITY;
    }
    let sum: f64 = reference
        .iter()
        .map(|&z| {
            front
                .iter()
                .map(|&a| distance_plus(a, z))
                .fold(f64::INFINITY, f64::min)
        })
        .sum();
    sum / reference.len() as f64
}
