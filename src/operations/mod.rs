pub mod analysis;
pub mod modification;
pub mod query;

pub use analysis::{AnalysisOutput, AnalysisRun, DetectedMember, FramingAnalysis, SplitEntry};
