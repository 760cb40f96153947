//! LMDB implementation of SpentStore.
//!
//! Keys are the raw 20-byte fingerprints. Values are the big-endian Unix
//! second at which the stamp was accepted, used to prune entries whose
//! stamps have aged out of every verification window.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use heed::types::Bytes;
use heed::{Database, Env};

use hashcash_store::{SpentStore, StoreError};
use hashcash_types::Fingerprint;

use crate::LmdbError;

pub struct LmdbSpentStore {
    pub(crate) env: Arc<Env>,
    pub(crate) spent_db: Database<Bytes, Bytes>,
}

impl LmdbSpentStore {
    /// Insert-if-absent, recording `at` as the time of spending.
    ///
    /// The lookup and the insert share one write transaction; LMDB admits a
    /// single writer at a time, so racing callers are serialized.
    pub fn add_at(&self, fingerprint: &Fingerprint, at: DateTime<Utc>) -> Result<(), StoreError> {
        let key = fingerprint.as_bytes().as_slice();
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        if self
            .spent_db
            .get(&wtxn, key)
            .map_err(LmdbError::from)?
            .is_some()
        {
            return Err(StoreError::Duplicate(fingerprint.to_string()));
        }
        self.spent_db
            .put(&mut wtxn, key, &at.timestamp().to_be_bytes())
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    /// When a fingerprint was recorded, if it was.
    pub fn spent_at(&self, fingerprint: &Fingerprint) -> Result<Option<DateTime<Utc>>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        match self
            .spent_db
            .get(&rtxn, fingerprint.as_bytes().as_slice())
            .map_err(LmdbError::from)?
        {
            Some(bytes) => decode_time(bytes).map(Some),
            None => Ok(None),
        }
    }

    /// Delete every entry recorded before `cutoff`. Returns how many were removed.
    ///
    /// Safe once `cutoff` is older than the verification window: such
    /// stamps fail the timestamp check before the ledger is consulted.
    pub fn prune_before(&self, cutoff: DateTime<Utc>) -> Result<usize, StoreError> {
        let cutoff = cutoff.timestamp();
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;

        let mut stale = Vec::new();
        for entry in self.spent_db.iter(&wtxn).map_err(LmdbError::from)? {
            let (key, val) = entry.map_err(LmdbError::from)?;
            if decode_secs(val)? < cutoff {
                stale.push(key.to_vec());
            }
        }
        for key in &stale {
            self.spent_db
                .delete(&mut wtxn, key)
                .map_err(LmdbError::from)?;
        }
        wtxn.commit().map_err(LmdbError::from)?;

        tracing::info!(removed = stale.len(), "pruned spent ledger");
        Ok(stale.len())
    }

    /// Number of recorded fingerprints.
    pub fn len(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.spent_db.len(&rtxn).map_err(LmdbError::from)?)
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

fn decode_secs(bytes: &[u8]) -> Result<i64, LmdbError> {
    let buf: [u8; 8] = bytes
        .try_into()
        .map_err(|_| LmdbError::Serialization("invalid spent timestamp bytes length".into()))?;
    Ok(i64::from_be_bytes(buf))
}

fn decode_time(bytes: &[u8]) -> Result<DateTime<Utc>, StoreError> {
    let secs = decode_secs(bytes)?;
    DateTime::<Utc>::from_timestamp(secs, 0)
        .ok_or_else(|| StoreError::Corruption(format!("spent timestamp {secs} out of range")))
}

impl SpentStore for LmdbSpentStore {
    fn add(&self, fingerprint: &Fingerprint) -> Result<(), StoreError> {
        self.add_at(fingerprint, Utc::now())
    }

    fn spent(&self, fingerprint: &Fingerprint) -> Result<bool, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let found = self
            .spent_db
            .get(&rtxn, fingerprint.as_bytes().as_slice())
            .map_err(LmdbError::from)?;
        Ok(found.is_some())
    }
}
