use crate::error::{GeometryError, Result};
use crate::math::{Point3, TOLERANCE};

use super::{CurveDomain, Line};

/// Selects one end of a bounded curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveEnd {
    Start,
    End,
}

/// The straight axis of a structural member: a bounded piece of a [`Line`].
///
/// Sub-segments produced by splitting keep the parent's line, so their
/// domains are sub-ranges of the parent's domain.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisCurve {
    line: Line,
    t_start: f64,
    t_end: f64,
}

impl AxisCurve {
    /// Creates the axis running from `start` to `end`, parameterized by
    /// length over `[0, |end - start|]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the two points coincide.
    pub fn from_points(start: Point3, end: Point3) -> Result<Self> {
        let line = Line::new(start, end - start)?;
        let length = (end - start).norm();
        Self::on_line(line, 0.0, length)
    }

    /// Creates an axis over `[t_start, t_end]` of an existing line.
    ///
    /// # Errors
    ///
    /// Returns an error if the range is empty, reversed, or not finite.
    pub fn on_line(line: Line, t_start: f64, t_end: f64) -> Result<Self> {
        if !t_start.is_finite() || !t_end.is_finite() {
            return Err(GeometryError::Degenerate("axis range must be finite".into()).into());
        }
        if t_end - t_start < TOLERANCE {
            return Err(GeometryError::Degenerate(format!(
                "axis range [{t_start}, {t_end}] is empty"
            ))
            .into());
        }
        Ok(Self {
            line,
            t_start,
            t_end,
        })
    }

    /// The supporting line.
    #[must_use]
    pub fn line(&self) -> &Line {
        &self.line
    }

    /// Start point of the axis.
    #[must_use]
    pub fn start(&self) -> Point3 {
        self.point_at(self.t_start)
    }

    /// End point of the axis.
    #[must_use]
    pub fn end(&self) -> Point3 {
        self.point_at(self.t_end)
    }

    /// Point at the given end.
    #[must_use]
    pub fn end_point(&self, end: CurveEnd) -> Point3 {
        match end {
            CurveEnd::Start => self.start(),
            CurveEnd::End => self.end(),
        }
    }

    /// Raw parameter at the given end.
    #[must_use]
    pub fn end_parameter(&self, end: CurveEnd) -> f64 {
        match end {
            CurveEnd::Start => self.t_start,
            CurveEnd::End => self.t_end,
        }
    }

    /// Length of the axis.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.t_end - self.t_start
    }

    /// Splits the axis at a normalized parameter into the leading and the
    /// trailing piece.
    ///
    /// # Errors
    ///
    /// Returns an error if either piece would be empty.
    pub fn split_at(&self, normalized: f64) -> Result<(AxisCurve, AxisCurve)> {
        let t = self.domain().denormalize(normalized);
        let head = Self::on_line(self.line.clone(), self.t_start, t)?;
        let tail = Self::on_line(self.line.clone(), t, self.t_end)?;
        Ok((head, tail))
    }

    /// Parameter range of the axis.
    #[must_use]
    pub fn domain(&self) -> CurveDomain {
        CurveDomain::new(self.t_start, self.t_end)
    }

    fn point_at(&self, t: f64) -> Point3 {
        self.line.point_at(t)
    }
}
