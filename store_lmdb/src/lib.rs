//! LMDB storage backend for hashcash verification.
//!
//! Implements [`hashcash_store::SpentStore`] using the `heed` LMDB bindings.
//! Spent fingerprints live in one named database, keyed by the raw 20-byte
//! digest, valued with the Unix second they were recorded.

pub mod environment;
pub mod error;
pub mod integrity;
pub mod spent;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use integrity::{check_integrity, IntegrityReport};
pub use spent::LmdbSpentStore;
