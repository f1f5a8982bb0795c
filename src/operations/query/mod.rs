mod classify;
mod intersect;
mod project;

pub use classify::{Classification, EndpointDistances, IntersectionClassifier, Verdict};
pub use intersect::{Intersection, PairwiseIntersect, PairwiseIntersections};
pub use project::ProjectParameter;
