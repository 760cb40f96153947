//! Nullable infrastructure for deterministic testing.
//!
//! The verifier's external dependencies (clock, spent ledger) are abstracted
//! behind traits. This crate provides test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically, including injected failures
//! - Never touch the filesystem
//!
//! Usage: swap real implementations for nullables in tests. Build a fresh
//! ledger per test so spent fingerprints never leak between cases.

pub mod clock;
pub mod store;

pub use clock::NullClock;
pub use store::NullSpentStore;
