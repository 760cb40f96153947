//! LMDB ledger integrity checks.
//!
//! Run on startup to detect corruption early, before stamps are verified
//! against a damaged ledger.

use hashcash_types::Fingerprint;

use crate::{LmdbEnvironment, LmdbError};

/// Summary of an integrity check run.
pub struct IntegrityReport {
    pub total_entries: u64,
    pub errors: Vec<String>,
}

impl IntegrityReport {
    /// Returns `true` if no errors were detected.
    pub fn is_healthy(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Walk the spent ledger and check every entry's shape.
///
/// Keys must be 20-byte fingerprints and values 8-byte timestamps.
/// Malformed entries are recorded in the report rather than causing a
/// hard error.
pub fn check_integrity(env: &LmdbEnvironment) -> Result<IntegrityReport, LmdbError> {
    let mut report = IntegrityReport {
        total_entries: 0,
        errors: Vec::new(),
    };

    let store = env.spent_store();
    let rtxn = env.env().read_txn()?;
    for entry in store.spent_db.iter(&rtxn)? {
        let (key, val) = entry?;
        report.total_entries += 1;
        if Fingerprint::from_slice(key).is_none() {
            report
                .errors
                .push(format!("spent key has length {}, expected 20", key.len()));
        }
        if val.len() != 8 {
            report
                .errors
                .push(format!("spent value has length {}, expected 8", val.len()));
        }
    }

    if report.is_healthy() {
        tracing::debug!(entries = report.total_entries, "spent ledger integrity ok");
    } else {
        tracing::warn!(
            entries = report.total_entries,
            errors = report.errors.len(),
            "spent ledger integrity check found problems"
        );
    }
    Ok(report)
}
