//! Abstract storage traits for hashcash verification.
//!
//! Every ledger backend (LMDB, in-memory for testing) implements
//! these traits. The verifier depends only on the traits.

pub mod error;
pub mod spent;

pub use error::StoreError;
pub use spent::SpentStore;
