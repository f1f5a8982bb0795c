use std::collections::HashSet;

use crate::math::Point3;

/// Merges split points that coincide on a decimal grid.
///
/// Coordinates are rounded to `decimals` places; the first point of each
/// grid cell is kept, in input order.
pub struct DedupSplitPoints<'a> {
    points: &'a [Point3],
    decimals: i32,
}

impl<'a> DedupSplitPoints<'a> {
    /// Creates a new `DedupSplitPoints` operation.
    #[must_use]
    pub fn new(points: &'a [Point3], decimals: i32) -> Self {
        Self { points, decimals }
    }

    /// Executes the operation, returning the representative points.
    #[must_use]
    pub fn execute(&self) -> Vec<Point3> {
        let scale = 10f64.powi(self.decimals);
        let mut seen = HashSet::with_capacity(self.points.len());
        self.points
            .iter()
            .filter(|pt| seen.insert(grid_key(pt, scale)))
            .copied()
            .collect()
    }
}

#[allow(clippy::cast_possible_truncation)]
fn grid_key(point: &Point3, scale: f64) -> (i64, i64, i64) {
    (
        (point.x * scale).round() as i64,
        (point.y * scale).round() as i64,
        (point.z * scale).round() as i64,
    )
}
