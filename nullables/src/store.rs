//! Nullable store: a thread-safe in-memory spent ledger for testing.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use hashcash_store::{SpentStore, StoreError};
use hashcash_types::Fingerprint;

/// An in-memory spent ledger for testing.
///
/// Insert-if-absent happens under one lock, so concurrent verifiers racing
/// on the same stamp see exactly one successful `add`. Reads and writes can
/// be made to fail to exercise infrastructure-error paths.
pub struct NullSpentStore {
    spent: Mutex<HashSet<Fingerprint>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl NullSpentStore {
    pub fn new() -> Self {
        Self {
            spent: Mutex::new(HashSet::new()),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Pre-populate the ledger with already spent fingerprints.
    pub fn with_spent(fingerprints: impl IntoIterator<Item = Fingerprint>) -> Self {
        let store = Self::new();
        store.spent.lock().unwrap().extend(fingerprints);
        store
    }

    /// Make every subsequent `spent` lookup fail with a backend error.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `add` fail with a backend error.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of recorded fingerprints.
    pub fn len(&self) -> usize {
        self.spent.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for NullSpentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SpentStore for NullSpentStore {
    fn add(&self, fingerprint: &Fingerprint) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("null store: writes disabled".into()));
        }
        if self.spent.lock().unwrap().insert(*fingerprint) {
            Ok(())
        } else {
            Err(StoreError::Duplicate(fingerprint.to_string()))
        }
    }

    fn spent(&self, fingerprint: &Fingerprint) -> Result<bool, StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("null store: reads disabled".into()));
        }
        Ok(self.spent.lock().unwrap().contains(fingerprint))
    }
}
