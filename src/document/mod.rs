//! The document that owns structural members.
//!
//! Analysis reads member axes through [`MemberDocument`] and mutates members
//! only through its `split` call, inside a [`TransactionScope`].

pub mod member;
mod transaction;

pub use member::{MemberData, MemberId};
pub use transaction::TransactionScope;

use std::fmt;
use std::hash::Hash;

use slotmap::SlotMap;

use crate::error::{DocumentError, Result};
use crate::geometry::AxisCurve;

/// Access to the members of a host document.
pub trait MemberDocument {
    /// Stable member identifier. Identifiers are never reused within a run.
    type Id: Copy + Eq + Hash + fmt::Debug;

    /// Returns the member's current axis curve.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::CurveUnavailable`] if the member has no usable
    /// axis, or [`DocumentError::MemberNotFound`] if it does not exist.
    fn axis_curve(&self, id: Self::Id) -> Result<AxisCurve>;

    /// Shortens the member at `parameter` (normalized over its current axis)
    /// and creates a new member for the remainder, returning the new id.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::SplitFailed`] if the split is rejected, or
    /// [`DocumentError::TransactionNotOpen`] outside a transaction.
    fn split(&mut self, id: Self::Id, parameter: f64) -> Result<Self::Id>;

    /// Opens the transaction that all splits of one run happen in.
    ///
    /// # Errors
    ///
    /// Returns an error if a transaction is already open.
    fn begin_transaction(&mut self) -> Result<()>;

    /// Commits the open transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if no transaction is open.
    fn commit_transaction(&mut self) -> Result<()>;
}

/// In-memory member document backed by a generational arena.
#[derive(Debug, Default)]
pub struct MemberStore {
    members: SlotMap<MemberId, MemberData>,
    transaction_open: bool,
    commits: usize,
}

impl MemberStore {
    /// Creates a new, empty member store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a member and returns its ID.
    pub fn add_member(&mut self, data: MemberData) -> MemberId {
        self.members.insert(data)
    }

    /// Returns a reference to the member data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the member is not found in the store.
    pub fn member(&self, id: MemberId) -> std::result::Result<&MemberData, DocumentError> {
        self.members
            .get(id)
            .ok_or_else(|| DocumentError::MemberNotFound(format!("{id:?}")))
    }

    /// Returns a mutable reference to the member data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the member is not found in the store.
    pub fn member_mut(
        &mut self,
        id: MemberId,
    ) -> std::result::Result<&mut MemberData, DocumentError> {
        self.members
            .get_mut(id)
            .ok_or_else(|| DocumentError::MemberNotFound(format!("{id:?}")))
    }

    /// IDs of all members, in insertion order.
    #[must_use]
    pub fn member_ids(&self) -> Vec<MemberId> {
        self.members.keys().collect()
    }

    /// Number of members in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns whether the store holds no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns whether a transaction is currently open.
    #[must_use]
    pub fn is_transaction_open(&self) -> bool {
        self.transaction_open
    }

    /// Number of transactions committed so far.
    #[must_use]
    pub fn commit_count(&self) -> usize {
        self.commits
    }
}

impl MemberDocument for MemberStore {
    type Id = MemberId;

    fn axis_curve(&self, id: MemberId) -> Result<AxisCurve> {
        let member = self.member(id)?;
        member
            .curve
            .clone()
            .ok_or_else(|| DocumentError::CurveUnavailable(format!("member {id:?}")).into())
    }

    fn split(&mut self, id: MemberId, parameter: f64) -> Result<MemberId> {
        if !self.transaction_open {
            return Err(DocumentError::TransactionNotOpen.into());
        }
        if !(parameter > 0.0 && parameter < 1.0) {
            return Err(DocumentError::SplitFailed(format!(
                "parameter {parameter} is not inside (0, 1)"
            ))
            .into());
        }

        let member = self.member_mut(id)?;
        let curve = member
            .curve
            .as_ref()
            .ok_or_else(|| DocumentError::CurveUnavailable(format!("member {id:?}")))?;
        let (head, tail) = curve
            .split_at(parameter)
            .map_err(|e| DocumentError::SplitFailed(e.to_string()))?;
        member.curve = Some(head);
        let remainder = MemberData::new(member.mark.clone(), tail);

        Ok(self.add_member(remainder))
    }

    fn begin_transaction(&mut self) -> Result<()> {
        if self.transaction_open {
            return Err(DocumentError::TransactionAlreadyOpen.into());
        }
        self.transaction_open = true;
        Ok(())
    }

    fn commit_transaction(&mut self) -> Result<()> {
        if !self.transaction_open {
            return Err(DocumentError::TransactionNotOpen.into());
        }
        self.transaction_open = false;
        self.commits += 1;
        Ok(())
    }
}
