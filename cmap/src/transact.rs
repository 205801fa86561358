//! Transactional edits.
//!
//! A transaction wraps a target and accumulates edits that are either applied
//! by [`commit`] or discarded by [`abort`]. Transactions that are dropped
//! without being committed are aborted.
//!
//! [`abort`]: crate::transact::Transact::abort
//! [`commit`]: crate::transact::Transact::commit

use std::fmt::Debug;

pub trait Transact<T = ()>: Sized {
    type Output;
    type Error: Debug;

    /// Applies the edits of the transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the edits leave the target in an inconsistent
    /// state. The target is restored before the error is returned.
    fn commit(self) -> Result<Self::Output, Self::Error>;

    /// Applies a function to the transaction and commits it if the function
    /// succeeds.
    ///
    /// If the function fails, then the transaction is aborted and the error is
    /// returned.
    fn commit_with<F, U, E>(mut self, f: F) -> Result<(Self::Output, U), Self::Error>
    where
        F: FnOnce(&mut Self) -> Result<U, E>,
        E: Into<Self::Error>,
    {
        match f(&mut self) {
            Ok(value) => self.commit().map(|output| (output, value)),
            Err(error) => {
                self.abort();
                Err(error.into())
            }
        }
    }

    /// Discards the edits of the transaction.
    fn abort(self) {}
}
