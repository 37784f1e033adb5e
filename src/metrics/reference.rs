//! Reference fronts and normalization for comparing runs.
//!
//! Fronts from different runs and algorithms are compared against one
//! shared reference: the non-dominated union of everything found, plus
//! an optional exact set. All fronts are min/max-normalized with the bounds
//! of that union before the indicators are computed.

use super::indicators::{gd_plus, hypervolume, igd_plus, spacing};
use super::Point;

/// Hypervolume reference point for normalized fronts.
pub const HV_REFERENCE: Point = [1.1, 1.1];

fn dominates(a: &Point, b: &Point) -> bool {
    a[0] <= b[0] && a[1] <= b[1] && (a[0] < b[0] || a[1] < b[1])
}

/// Non-dominated subset of `points`, sorted by the first objective.
///
/// Duplicates of a non-dominated point are all kept.
pub fn non_dominated(points: &[Point]) -> Vec<Point> {
    let mut front: Vec<Point> = points
        .iter()
        .filter(|p| !points.iter().any(|q| dominates(q, p)))
        .copied()
        .collect();
    front.sort_by(|a, b| a[0].total_cmp(&b[0]).then(a[1].total_cmp(&b[1])));
    front
}

/// Per-objective min/max scaling into [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Normalizer {
    min: Point,
    max: Point,
}

impl Normalizer {
    /// Creates a normalizer from explicit bounds.
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Bounds of a point set; `None` when it is empty.
    pub fn fit(points: &[Point]) -> Option<Self> {
        let first = *points.first()?;
        let (min, max) = points.iter().fold((first, first), |(lo, hi), p| {
            ([lo[0].min(p[0]), lo[1].min(p[1])], [hi[0].max(p[0]), hi[1].max(p[1])])
        });
        Some(Self { min, max })
    }

    /// Lower bounds.
    pub fn min(&self) -> Point {
        self.min
    }

    /// Upper bounds.
    pub fn max(&self) -> Point {
        self.max
    }

    /// Scales one point. An objective with zero range is divided by 1.
    pub fn apply(&self, p: Point) -> Point {
        let scale = |k: usize| {
            let range = self.max[k] - self.min[k];
            let range = if range == 0.0 { 1.0 } else { range };
            (p[k] - self.min[k]) / range
        };
        [scale(0), scale(1)]
    }

    /// Scales every point of a front.
    pub fn apply_all(&self, points: &[Point]) -> Vec<Point> {
        points.iter().map(|&p| self.apply(p)).collect()
    }
}

/// Indicator values of one front against a [`ReferenceFront`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QualityReport {
    /// Spacing of the normalized front (lower is more uniform).
    pub spacing: f64,
    /// Hypervolume against [`HV_REFERENCE`] (higher is better).
    pub hypervolume: f64,
    /// GD+ to the normalized reference front (lower is better).
    pub gd_plus: f64,
    /// IGD+ to the normalized reference front (lower is better).
    pub igd_plus: f64,
}

/// Shared reference for a set of runs.
///
/// # Examples
///
/// ```
/// use u_placement::metrics::ReferenceFront;
///
/// let run_a = vec![[100.0, 8.0], [120.0, 4.0]];
/// let run_b = vec![[110.0, 5.0], [130.0, 6.0]];
/// let reference = ReferenceFront::build([run_a.as_slice(), run_b.as_slice()], None).unwrap();
///
/// // [130, 6] is dominated by [120, 4].
/// assert_eq!(reference.points().len(), 3);
///
/// let report = reference.evaluate(&run_a);
/// assert!(report.hypervolume > 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReferenceFront {
    points: Vec<Point>,
    normalizer: Normalizer,
}

impl ReferenceFront {
    /// Merges approximation fronts with an optional exact set.
    ///
    /// Normalization bounds span every supplied point, dominated or not.
    /// Returns `None` when no point was supplied.
    pub fn build<'a, I>(fronts: I, exact: Option<&[Point]>) -> Option<Self>
    where
        I: IntoIterator<Item = &'a [Point]>,
    {
        let mut all: Vec<Point> = fronts.into_iter().flatten().copied().collect();
        if let Some(exact) = exact {
            all.extend_from_slice(exact);
        }

        let normalizer = Normalizer::fit(&all)?;
        Some(Self {
            points: non_dominated(&all),
            normalizer,
        })
    }

    /// Reference points in raw objective units, sorted by the first objective.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Global normalization bounds.
    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Reference points after normalization.
    pub fn normalized(&self) -> Vec<Point> {
        self.normalizer.apply_all(&self.points)
    }

    /// Normalizes `front` and computes every indicator.
    pub fn evaluate(&self, front: &[Point]) -> QualityReport {
        let norm_front = self.normalizer.apply_all(front);
        let norm_ref = self.normalized();
        QualityReport {
            spacing: spacing(&norm_front),
            hypervolume: hypervolume(&norm_front, HV_REFERENCE),
            gd_plus: gd_plus(&norm_front, &norm_ref),
            igd_plus: igd_plus(&norm_front, &norm_ref),
        }
    }
}
