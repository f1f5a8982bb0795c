use std::fmt;

use crate::geometry::AxisCurve;
use crate::kernel::{GeometryAdapter, IntersectionResult};
use crate::math::Point3;
use crate::report::{round_to, Report};

use super::classify::IntersectionClassifier;
use super::project::ProjectParameter;

/// An accepted intersection between curves `curve_a` and `curve_b`
/// (indices into the analyzed curve list, `curve_a < curve_b`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    pub point: Point3,
    pub curve_a: usize,
    pub curve_b: usize,
}

/// Result of a pairwise intersection pass.
#[derive(Debug, Clone, Default)]
pub struct PairwiseIntersections {
    /// For each curve, the accepted points that lie strictly inside it,
    /// in discovery order.
    pub per_curve: Vec<Vec<Point3>>,
    /// Every accepted intersection, before the per-curve interior test.
    pub accepted: Vec<Intersection>,
    /// Number of unordered pairs queried.
    pub pairs_checked: usize,
    /// Number of pairs whose kernel query failed.
    pub pairs_failed: usize,
}

impl PairwiseIntersections {
    /// Total number of per-curve interior points.
    #[must_use]
    pub fn total_points(&self) -> usize {
        self.per_curve.iter().map(Vec::len).sum()
    }
}

/// Intersects every unordered pair of curves once and keeps the crossings
/// that pass the classifier.
///
/// An accepted point is then tested separately against each of its two
/// curves: it is recorded for a curve only if it projects strictly inside it.
pub struct PairwiseIntersect<'a, Id> {
    curves: &'a [AxisCurve],
    ids: &'a [Id],
    classifier: IntersectionClassifier,
    epsilon: f64,
}

impl<'a, Id: fmt::Debug> PairwiseIntersect<'a, Id> {
    /// Creates a new `PairwiseIntersect` query. `ids[i]` labels `curves[i]`
    /// in the report.
    #[must_use]
    pub fn new(
        curves: &'a [AxisCurve],
        ids: &'a [Id],
        classifier: IntersectionClassifier,
        epsilon: f64,
    ) -> Self {
        Self {
            curves,
            ids,
            classifier,
            epsilon,
        }
    }

    /// Executes the pass. Failures of single pairs or projections are
    /// reported and skipped.
    pub fn execute(
        &self,
        kernel: &impl GeometryAdapter,
        report: &mut Report,
    ) -> PairwiseIntersections {
        let n = self.curves.len();
        let mut result = PairwiseIntersections {
            per_curve: vec![Vec::new(); n],
            ..PairwiseIntersections::default()
        };

        for i in 0..n {
            for j in (i + 1)..n {
                result.pairs_checked += 1;
                self.check_pair(i, j, kernel, report, &mut result);
            }
        }

        result
    }

    fn label(&self, index: usize) -> String {
        self.ids
            .get(index)
            .map_or_else(|| format!("#{index}"), |id| format!("{id:?}"))
    }

    fn check_pair(
        &self,
        i: usize,
        j: usize,
        kernel: &impl GeometryAdapter,
        report: &mut Report,
        result: &mut PairwiseIntersections,
    ) {
        let (a, b) = (&self.curves[i], &self.curves[j]);
        let (label_a, label_b) = (self.label(i), self.label(j));

        if report.is_verbose() {
            for (label, curve) in [(&label_a, a), (&label_b, b)] {
                let (s, e) = (curve.start(), curve.end());
                report.detail(format!(
                    "  Member {label} curve: ({}, {}, {}) to ({}, {}, {})",
                    round_to(s.x, 1),
                    round_to(s.y, 1),
                    round_to(s.z, 1),
                    round_to(e.x, 1),
                    round_to(e.y, 1),
                    round_to(e.z, 1),
                ));
            }
        }

        let raw = match kernel.intersect(a, b) {
            Ok(raw) => raw,
            Err(err) => {
                result.pairs_failed += 1;
                report.warn(format!(
                    "Error checking Member {label_a} to {label_b}: {err}"
                ));
                return;
            }
        };
        match &raw {
            IntersectionResult::Empty => {
                report.detail(format!(
                    "Member {label_a} to {label_b}: No raw intersections found"
                ));
            }
            IntersectionResult::Single(_) => {
                report.detail(format!(
                    "Member {label_a} to {label_b}: Found 1 raw intersection point"
                ));
            }
            IntersectionResult::Many(points) => {
                report.detail(format!(
                    "Member {label_a} to {label_b}: Found {} raw intersection points",
                    points.len()
                ));
            }
        }

        let mut accepted_here = 0;
        for point in raw.into_points() {
            let classification = self.classifier.classify(&point, a, b);
            if report.is_verbose() {
                let d = classification.distances;
                report.detail(format!(
                    "  Point ({}, {}, {}): dist_to_curve1_start={}, dist_to_curve1_end={}, dist_to_curve2_start={}, dist_to_curve2_end={}",
                    round_to(point.x, 2),
                    round_to(point.y, 2),
                    round_to(point.z, 2),
                    round_to(d.a_start, 2),
                    round_to(d.a_end, 2),
                    round_to(d.b_start, 2),
                    round_to(d.b_end, 2),
                ));
                report.detail(format!(
                    "    Curve1 endpoint close: {}, Curve2 endpoint close: {}",
                    classification.a_endpoint_close, classification.b_endpoint_close
                ));
                if let Some(z_diff) = classification.z_diff {
                    report.detail(format!("    Z check: z_diff={}", round_to(z_diff, 2)));
                }
                report.detail(format!("    {:?}", classification.verdict));
            }
            if !classification.is_accepted() {
                continue;
            }

            accepted_here += 1;
            result.accepted.push(Intersection {
                point,
                curve_a: i,
                curve_b: j,
            });
            for index in [i, j] {
                self.record_if_interior(index, point, kernel, report, result);
            }
        }

        if accepted_here > 0 {
            report.detail(format!(
                "Member {label_a} to {label_b}: Found {accepted_here} valid intersections"
            ));
        }
    }

    fn record_if_interior(
        &self,
        index: usize,
        point: Point3,
        kernel: &impl GeometryAdapter,
        report: &mut Report,
        result: &mut PairwiseIntersections,
    ) {
        match ProjectParameter::new(&self.curves[index], point).interior(kernel, self.epsilon) {
            Ok(Some(_)) => result.per_curve[index].push(point),
            Ok(None) => {}
            Err(err) => report.warn(format!(
                "  Point ({}, {}, {}) dropped for Member {}: {err}",
                round_to(point.x, 1),
                round_to(point.y, 1),
                round_to(point.z, 1),
                self.label(index),
            )),
        }
    }
}
