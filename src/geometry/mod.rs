pub mod curve;

pub use curve::{AxisCurve, CurveDomain, CurveEnd, Line};
