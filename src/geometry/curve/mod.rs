mod axis;
mod line;

pub use axis::{AxisCurve, CurveEnd};
pub use line::Line;

/// Parameter domain for a curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveDomain {
    /// Start of the parameter range.
    pub t_min: f64,
    /// End of the parameter range.
    pub t_max: f64,
}

impl CurveDomain {
    /// Creates a new curve domain.
    #[must_use]
    pub fn new(t_min: f64, t_max: f64) -> Self {
        Self { t_min, t_max }
    }

    /// Width of the parameter range.
    #[must_use]
    pub fn span(&self) -> f64 {
        self.t_max - self.t_min
    }

    /// Rescales a raw parameter onto `[0, 1]` over this domain.
    ///
    /// Values outside the domain map outside `[0, 1]`; an empty domain
    /// yields a non-finite value.
    #[must_use]
    pub fn normalize(&self, t: f64) -> f64 {
        (t - self.t_min) / self.span()
    }

    /// Maps a normalized parameter back onto this domain.
    #[must_use]
    pub fn denormalize(&self, u: f64) -> f64 {
        self.t_min + u * self.span()
    }
}
