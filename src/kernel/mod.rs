//! Boundary to the geometry kernel that answers curve queries.
//!
//! The analysis never computes intersections or projections itself; it asks
//! a [`GeometryAdapter`]. [`LinearKernel`] answers these queries analytically
//! for straight member axes.

mod linear;

pub use linear::{IntersectionMode, LinearKernel};

use crate::error::Result;
use crate::geometry::{AxisCurve, CurveEnd};
use crate::math::Point3;

/// Outcome of a curve-curve intersection query.
///
/// Kernels report only point coincidences. Overlaps and other non-point
/// results are reported as [`Empty`](IntersectionResult::Empty).
#[derive(Debug, Clone, PartialEq)]
pub enum IntersectionResult {
    Empty,
    Single(Point3),
    Many(Vec<Point3>),
}

impl IntersectionResult {
    /// Flattens the result into a point list.
    #[must_use]
    pub fn into_points(self) -> Vec<Point3> {
        match self {
            Self::Empty => Vec::new(),
            Self::Single(point) => vec![point],
            Self::Many(points) => points,
        }
    }

    /// Number of points carried by the result.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Single(_) => 1,
            Self::Many(points) => points.len(),
        }
    }

    /// Returns whether the result carries no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Geometric queries the analysis needs from a kernel.
pub trait GeometryAdapter {
    /// Intersects two member axes.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::IntersectionQueryFailed`](crate::error::GeometryError::IntersectionQueryFailed)
    /// if the kernel cannot evaluate the pair.
    fn intersect(&self, a: &AxisCurve, b: &AxisCurve) -> Result<IntersectionResult>;

    /// Projects a point onto a member axis, returning the raw curve parameter
    /// of the foot point.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ProjectionFailed`](crate::error::GeometryError::ProjectionFailed)
    /// if the point has no well-defined foot point on the curve.
    fn project(&self, curve: &AxisCurve, point: &Point3) -> Result<f64>;

    /// Raw parameter at one end of a member axis.
    fn end_parameter(&self, curve: &AxisCurve, end: CurveEnd) -> f64;
}
