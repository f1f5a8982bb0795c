use crate::error::{OperationError, Result};
use crate::math::PARAMETER_EPSILON;

/// Order in which a member's split points are processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitOrder {
    /// Descending normalized parameter along the member's own axis.
    #[default]
    AlongAxis,
    /// Descending X coordinate, whatever the member's orientation.
    DescendingX,
}

/// Settings for one analysis run.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Planar distance under which a point counts as near a member end.
    pub tolerance: f64,
    /// Maximum elevation difference from the reference member; `0` disables the check.
    pub z_tolerance: f64,
    /// Whether members are split, or only intersections reported.
    pub split_enabled: bool,
    /// Margin kept between a split parameter and either member end.
    pub parameter_epsilon: f64,
    /// Decimal places of the grid near-duplicate split points are merged on.
    pub dedup_decimals: i32,
    /// Processing order of split points.
    pub split_order: SplitOrder,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            tolerance: 300.0,
            z_tolerance: 0.0,
            split_enabled: false,
            parameter_epsilon: PARAMETER_EPSILON,
            dedup_decimals: 2,
            split_order: SplitOrder::default(),
        }
    }
}

impl AnalysisConfig {
    /// Sets the endpoint-proximity tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the elevation tolerance.
    #[must_use]
    pub fn with_z_tolerance(mut self, z_tolerance: f64) -> Self {
        self.z_tolerance = z_tolerance;
        self
    }

    /// Enables or disables splitting.
    #[must_use]
    pub fn with_split(mut self, enabled: bool) -> Self {
        self.split_enabled = enabled;
        self
    }

    /// Sets the split point order.
    #[must_use]
    pub fn with_split_order(mut self, order: SplitOrder) -> Self {
        self.split_order = order;
        self
    }

    /// Checks that every setting is usable.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidInput`] naming the first bad setting.
    pub fn validate(&self) -> Result<()> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(OperationError::InvalidInput(format!(
                "tolerance must be finite and non-negative, got {}",
                self.tolerance
            ))
            .into());
        }
        if !self.z_tolerance.is_finite() || self.z_tolerance < 0.0 {
            return Err(OperationError::InvalidInput(format!(
                "z tolerance must be finite and non-negative, got {}",
                self.z_tolerance
            ))
            .into());
        }
        if !(self.parameter_epsilon > 0.0 && self.parameter_epsilon < 0.5) {
            return Err(OperationError::InvalidInput(format!(
                "parameter epsilon must lie in (0, 0.5), got {}",
                self.parameter_epsilon
            ))
            .into());
        }
        if !(0..=9).contains(&self.dedup_decimals) {
            return Err(OperationError::InvalidInput(format!(
                "dedup decimals must lie in 0..=9, got {}",
                self.dedup_decimals
            ))
            .into());
        }
        Ok(())
    }
}
