use crate::error::{GeometryError, Result};
use crate::geometry::{AxisCurve, CurveDomain, CurveEnd};
use crate::kernel::GeometryAdapter;
use crate::math::{is_interior_parameter, Point3, TOLERANCE};

/// Finds where a point falls along a curve, as a normalized parameter.
pub struct ProjectParameter<'a> {
    curve: &'a AxisCurve,
    point: Point3,
}

impl<'a> ProjectParameter<'a> {
    /// Creates a new `ProjectParameter` query.
    #[must_use]
    pub fn new(curve: &'a AxisCurve, point: Point3) -> Self {
        Self { curve, point }
    }

    /// Executes the query, returning `(t - t_start) / (t_end - t_start)` for
    /// the projected raw parameter `t`.
    ///
    /// # Errors
    ///
    /// Returns an error if the kernel cannot project the point, or the
    /// curve's domain is empty.
    pub fn execute(&self, kernel: &impl GeometryAdapter) -> Result<f64> {
        self.execute_with_raw(kernel).map(|(_, t)| t)
    }

    /// Like [`execute`](Self::execute), but also returns the raw parameter
    /// the kernel reported, as `(raw, normalized)`.
    ///
    /// # Errors
    ///
    /// Same as [`execute`](Self::execute).
    pub fn execute_with_raw(&self, kernel: &impl GeometryAdapter) -> Result<(f64, f64)> {
        let raw = kernel.project(self.curve, &self.point)?;
        let domain = CurveDomain::new(
            kernel.end_parameter(self.curve, CurveEnd::Start),
            kernel.end_parameter(self.curve, CurveEnd::End),
        );

        let span = domain.span();
        if !span.is_finite() || span.abs() < TOLERANCE {
            return Err(GeometryError::Degenerate(format!(
                "curve domain [{}, {}] is empty",
                domain.t_min, domain.t_max
            ))
            .into());
        }
        Ok((raw, domain.normalize(raw)))
    }

    /// Executes the query and keeps the parameter only if it lies strictly
    /// inside `(eps, 1 - eps)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the projection itself fails.
    pub fn interior(&self, kernel: &impl GeometryAdapter, eps: f64) -> Result<Option<f64>> {
        let t = self.execute(kernel)?;
        Ok(is_interior_parameter(t, eps).then_some(t))
    }
}
