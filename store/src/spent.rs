//! Spent-fingerprint ledger trait.

use std::sync::Arc;

use crate::StoreError;
use hashcash_types::Fingerprint;

/// Replay ledger of stamps that have already been accepted.
///
/// `add` must behave as a linearizable insert-if-absent: when two callers
/// race on the same fingerprint, exactly one gets `Ok(())` and the other
/// gets [`StoreError::Duplicate`]. After a successful `add`, `spent` for the
/// same fingerprint must return `true`.
pub trait SpentStore {
    /// Record a fingerprint as spent.
    fn add(&self, fingerprint: &Fingerprint) -> Result<(), StoreError>;

    /// Whether a fingerprint has been recorded. No side effects.
    fn spent(&self, fingerprint: &Fingerprint) -> Result<bool, StoreError>;
}

impl<S: SpentStore + ?Sized> SpentStore for &S {
    fn add(&self, fingerprint: &Fingerprint) -> Result<(), StoreError> {
        (**self).add(fingerprint)
    }

    fn spent(&self, fingerprint: &Fingerprint) -> Result<bool, StoreError> {
        (**self).spent(fingerprint)
    }
}

impl<S: SpentStore + ?Sized> SpentStore for Arc<S> {
    fn add(&self, fingerprint: &Fingerprint) -> Result<(), StoreError> {
        (**self).add(fingerprint)
    }

    fn spent(&self, fingerprint: &Fingerprint) -> Result<bool, StoreError> {
        (**self).spent(fingerprint)
    }
}

impl<S: SpentStore + ?Sized> SpentStore for Box<S> {
    fn add(&self, fingerprint: &Fingerprint) -> Result<(), StoreError> {
        (**self).add(fingerprint)
    }

    fn spent(&self, fingerprint: &Fingerprint) -> Result<bool, StoreError> {
        (**self).spent(fingerprint)
    }
}
