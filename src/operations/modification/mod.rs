mod dedup;
mod split;

pub use dedup::DedupSplitPoints;
pub use split::{LiveSegment, MemberSplit, PointOutcome, SplitCandidate, SplitMember, SplitState};
