use crate::geometry::AxisCurve;
use crate::math::distance_2d::planar_distance;
use crate::math::Point3;

/// Decision taken for one raw intersection point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The point is a crossing away from a shared joint.
    Accepted,
    /// The point is near an end of both curves: the members meet at a joint.
    RejectedJoint,
    /// The point is too far above or below the reference elevation.
    RejectedElevation,
}

/// Planar distances from a point to the four curve ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EndpointDistances {
    pub a_start: f64,
    pub a_end: f64,
    pub b_start: f64,
    pub b_end: f64,
}

/// Verdict for one point together with the measurements behind it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub verdict: Verdict,
    pub distances: EndpointDistances,
    /// Whether the point is within tolerance of an end of curve A.
    pub a_endpoint_close: bool,
    /// Whether the point is within tolerance of an end of curve B.
    pub b_endpoint_close: bool,
    /// Elevation difference from curve A's start, when the check ran.
    pub z_diff: Option<f64>,
}

impl Classification {
    /// Returns whether the point was accepted.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        self.verdict == Verdict::Accepted
    }
}

/// Separates mid-span crossings from joints and from members at other levels.
///
/// Endpoint proximity is measured in plan (XY) only. A point near an end of
/// both curves is a joint. Otherwise, when `z_tolerance > 0`, the point must
/// lie within `z_tolerance` of curve A's start elevation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionClassifier {
    tolerance: f64,
    z_tolerance: f64,
}

impl IntersectionClassifier {
    /// Creates a classifier. A `z_tolerance` of zero disables the elevation check.
    #[must_use]
    pub fn new(tolerance: f64, z_tolerance: f64) -> Self {
        Self {
            tolerance,
            z_tolerance,
        }
    }

    /// Classifies `point`, produced by intersecting curves `a` and `b`.
    #[must_use]
    pub fn classify(&self, point: &Point3, a: &AxisCurve, b: &AxisCurve) -> Classification {
        let a_start = a.start();
        let distances = EndpointDistances {
            a_start: planar_distance(point, &a_start),
            a_end: planar_distance(point, &a.end()),
            b_start: planar_distance(point, &b.start()),
            b_end: planar_distance(point, &b.end()),
        };
        let a_endpoint_close = distances.a_start.min(distances.a_end) < self.tolerance;
        let b_endpoint_close = distances.b_start.min(distances.b_end) < self.tolerance;

        let mut z_diff = None;
        let verdict = if a_endpoint_close && b_endpoint_close {
            Verdict::RejectedJoint
        } else if self.z_tolerance > 0.0 {
            let diff = (point.z - a_start.z).abs();
            z_diff = Some(diff);
            if diff <= self.z_tolerance {
                Verdict::Accepted
            } else {
                Verdict::RejectedElevation
            }
        } else {
            Verdict::Accepted
        };

        Classification {
            verdict,
            distances,
            a_endpoint_close,
            b_endpoint_close,
            z_diff,
        }
    }
}
