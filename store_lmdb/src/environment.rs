//! LMDB environment setup.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use crate::{LmdbError, LmdbSpentStore};

/// Name of the spent-fingerprint database.
pub const SPENT_DB: &str = "spent";

/// Default map size: 1 GiB, roughly 20 million spent stamps.
pub const DEFAULT_MAP_SIZE: usize = 1 << 30;

const MAX_DBS: u32 = 4;

/// Wraps the LMDB environment and all database handles.
pub struct LmdbEnvironment {
    env: Arc<Env>,
    spent_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment in the directory `path`.
    ///
    /// The directory is created if missing.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;

        // SAFETY: the environment is opened once per process per path, and
        // the data files are not modified by anything other than LMDB.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(MAX_DBS)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let spent_db: Database<Bytes, Bytes> = env.create_database(&mut wtxn, Some(SPENT_DB))?;
        wtxn.commit()?;

        tracing::debug!(path = %path.display(), map_size, "opened LMDB environment");

        Ok(Self {
            env: Arc::new(env),
            spent_db,
        })
    }

    /// Handle to the spent-fingerprint ledger.
    pub fn spent_store(&self) -> LmdbSpentStore {
        LmdbSpentStore {
            env: Arc::clone(&self.env),
            spent_db: self.spent_db,
        }
    }

    pub fn env(&self) -> &Arc<Env> {
        &self.env
    }
}
