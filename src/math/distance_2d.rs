use super::Point3;

/// Distance between two points measured in the XY plane, ignoring elevation.
#[must_use]
pub fn planar_distance(a: &Point3, b: &Point3) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}
