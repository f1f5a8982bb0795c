use crate::error::{GeometryError, Result};
use crate::geometry::{AxisCurve, CurveEnd};
use crate::math::intersect_3d::{plan_crossing, segment_closest_approach};
use crate::math::Point3;

use super::{GeometryAdapter, IntersectionResult};

/// How [`LinearKernel`] decides that two axes meet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IntersectionMode {
    /// The axes meet when their closest approach in 3D is within `gap`.
    Spatial { gap: f64 },
    /// The axes meet when their XY projections cross, whatever their elevations.
    Plan,
}

impl Default for IntersectionMode {
    fn default() -> Self {
        Self::Spatial { gap: 1e-6 }
    }
}

/// Analytic kernel for straight member axes.
///
/// An intersection is reported at the midpoint of the closest-approach pair,
/// so when the axes sit at different elevations the point lies between them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearKernel {
    mode: IntersectionMode,
}

impl LinearKernel {
    /// Creates a kernel with the given intersection mode.
    #[must_use]
    pub fn new(mode: IntersectionMode) -> Self {
        Self { mode }
    }

    /// The configured intersection mode.
    #[must_use]
    pub fn mode(&self) -> IntersectionMode {
        self.mode
    }
}

fn is_finite(point: &Point3) -> bool {
    point.coords.iter().all(|c| c.is_finite())
}

impl GeometryAdapter for LinearKernel {
    fn intersect(&self, a: &AxisCurve, b: &AxisCurve) -> Result<IntersectionResult> {
        let (a0, a1, b0, b1) = (a.start(), a.end(), b.start(), b.end());
        if ![a0, a1, b0, b1].iter().all(is_finite) {
            return Err(GeometryError::IntersectionQueryFailed(
                "axis endpoints are not finite".into(),
            )
            .into());
        }

        let hit = match self.mode {
            IntersectionMode::Spatial { gap } => segment_closest_approach(&a0, &a1, &b0, &b1)
                .filter(|approach| approach.distance() <= gap),
            IntersectionMode::Plan => plan_crossing(&a0, &a1, &b0, &b1),
        };

        Ok(hit.map_or(IntersectionResult::Empty, |approach| {
            IntersectionResult::Single(approach.midpoint())
        }))
    }

    fn project(&self, curve: &AxisCurve, point: &Point3) -> Result<f64> {
        if !is_finite(point) {
            return Err(GeometryError::ProjectionFailed(format!(
                "point ({}, {}, {}) is not finite",
                point.x, point.y, point.z
            ))
            .into());
        }
        let domain = curve.domain();
        Ok(curve
            .line()
            .parameter_of(point)
            .clamp(domain.t_min, domain.t_max))
    }

    fn end_parameter(&self, curve: &AxisCurve, end: CurveEnd) -> f64 {
        curve.end_parameter(end)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn axis(a: Point3, b: Point3) -> AxisCurve {
        AxisCurve::from_points(a, b).unwrap()
    }

    #[test]
    fn crossing_axes_give_single_point() {
        let kernel = LinearKernel::default();
        let a = axis(p(0.0, 0.0, 0.0), p(10.0, 0.0, 0.0));
        let b = axis(p(5.0, -5.0, 0.0), p(5.0, 5.0, 0.0));
        match kernel.intersect(&a, &b).unwrap() {
            IntersectionResult::Single(pt) => {
                assert_relative_eq!(pt.x, 5.0);
                assert_relative_eq!(pt.y, 0.0);
            }
            other => panic!("expected a single point, got {other:?}"),
        }
    }

    #[test]
    fn separated_levels_miss_in_spatial_mode() {
        let kernel = LinearKernel::default();
        let a = axis(p(0.0, 0.0, 0.0), p(10.0, 0.0, 0.0));
        let b = axis(p(5.0, -5.0, 2.0), p(5.0, 5.0, 2.0));
        assert!(kernel.intersect(&a, &b).unwrap().is_empty());
    }

    #[test]
    fn separated_levels_meet_in_plan_mode() {
        let kernel = LinearKernel::new(IntersectionMode::Plan);
        let a = axis(p(0.0, 0.0, 0.0), p(10.0, 0.0, 0.0));
        let b = axis(p(5.0, -5.0, 2.0), p(5.0, 5.0, 2.0));
        let points = kernel.intersect(&a, &b).unwrap().into_points();
        assert_eq!(points.len(), 1);
        assert_relative_eq!(points[0].z, 1.0);
    }

    #[test]
    fn collinear_overlap_is_not_a_point() {
        let kernel = LinearKernel::default();
        let a = axis(p(0.0, 0.0, 0.0), p(10.0, 0.0, 0.0));
        let b = axis(p(5.0, 0.0, 0.0), p(15.0, 0.0, 0.0));
        assert!(kernel.intersect(&a, &b).unwrap().is_empty());
    }

    #[test]
    fn projection_clamps_to_axis_range() {
        let kernel = LinearKernel::default();
        let a = axis(p(0.0, 0.0, 0.0), p(10.0, 0.0, 0.0));
        assert_relative_eq!(kernel.project(&a, &p(4.0, 3.0, 0.0)).unwrap(), 4.0);
        assert_relative_eq!(kernel.project(&a, &p(-4.0, 0.0, 0.0)).unwrap(), 0.0);
        assert_relative_eq!(kernel.project(&a, &p(14.0, 0.0, 0.0)).unwrap(), 10.0);
        assert_relative_eq!(kernel.end_parameter(&a, CurveEnd::End), 10.0);
    }

    #[test]
    fn projection_of_non_finite_point_fails() {
        let kernel = LinearKernel::default();
        let a = axis(p(0.0, 0.0, 0.0), p(10.0, 0.0, 0.0));
        assert!(kernel.project(&a, &p(f64::NAN, 0.0, 0.0)).is_err());
    }
}
