//! Finds where structural members cross mid-span and splits them there.
//!
//! Member axes are intersected pairwise through a [`kernel::GeometryAdapter`].
//! Crossings near an end of both members are joints and are dropped. Each
//! remaining crossing is kept for every member it lies strictly inside,
//! deduplicated, and used to split that member through a
//! [`document::MemberDocument`].

pub mod config;
pub mod document;
pub mod error;
pub mod geometry;
pub mod kernel;
pub mod math;
pub mod operations;
pub mod report;

pub use config::{AnalysisConfig, SplitOrder};
pub use error::{FramesplitError, Result};
pub use operations::FramingAnalysis;
pub use report::Report;
