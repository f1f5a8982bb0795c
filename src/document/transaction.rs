use std::ops::{Deref, DerefMut};

use crate::error::Result;

use super::MemberDocument;

/// Keeps a document transaction open for the lifetime of the scope.
///
/// [`finish`](Self::finish) commits and reports the outcome. A scope dropped
/// without `finish` (an early return, a panic unwinding) still commits, so
/// splits already issued stay committed.
pub struct TransactionScope<'a, D: MemberDocument> {
    doc: &'a mut D,
    open: bool,
}

impl<'a, D: MemberDocument> TransactionScope<'a, D> {
    /// Opens a transaction on `doc`.
    ///
    /// # Errors
    ///
    /// Returns an error if the document refuses to open a transaction.
    pub fn begin(doc: &'a mut D) -> Result<Self> {
        doc.begin_transaction()?;
        tracing::debug!("transaction opened");
        Ok(Self { doc, open: true })
    }

    /// Commits the transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails.
    pub fn finish(mut self) -> Result<()> {
        self.open = false;
        self.doc.commit_transaction()?;
        tracing::debug!("transaction committed");
        Ok(())
    }
}

impl<D: MemberDocument> Deref for TransactionScope<'_, D> {
    type Target = D;

    fn deref(&self) -> &D {
        self.doc
    }
}

impl<D: MemberDocument> DerefMut for TransactionScope<'_, D> {
    fn deref_mut(&mut self) -> &mut D {
        self.doc
    }
}

impl<D: MemberDocument> Drop for TransactionScope<'_, D> {
    fn drop(&mut self) {
        if self.open {
            self.open = false;
            if let Err(err) = self.doc.commit_transaction() {
                tracing::warn!(error = %err, "commit on scope exit failed");
            }
        }
    }
}
