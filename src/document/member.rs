use crate::geometry::AxisCurve;

slotmap::new_key_type! {
    /// Unique identifier for a member in the member store.
    pub struct MemberId;
}

/// Data associated with a structural member.
#[derive(Debug, Clone)]
pub struct MemberData {
    /// Label shared by a member and every piece split off it.
    pub mark: String,
    /// The member's axis, if it has one.
    pub curve: Option<AxisCurve>,
}

impl MemberData {
    /// Creates a member with the given axis.
    #[must_use]
    pub fn new(mark: impl Into<String>, curve: AxisCurve) -> Self {
        Self {
            mark: mark.into(),
            curve: Some(curve),
        }
    }

    /// Creates a member that has no usable axis.
    #[must_use]
    pub fn without_axis(mark: impl Into<String>) -> Self {
        Self {
            mark: mark.into(),
            curve: None,
        }
    }
}
