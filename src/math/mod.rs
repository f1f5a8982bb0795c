pub mod distance_2d;
pub mod intersect_3d;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Margin kept between a split parameter and either end of a member,
/// in normalized parameter space.
pub const PARAMETER_EPSILON: f64 = 1e-4;

/// Returns whether a normalized parameter lies strictly inside `(eps, 1 - eps)`.
#[must_use]
pub fn is_interior_parameter(t: f64, eps: f64) -> bool {
    eps < t && t < 1.0 - eps
}
