//! Hashcash proof-of-work stamps.
//!
//! Not mining: a bounded, tunable computational cost a sender pays per
//! resource (typically a recipient address) so that bulk sending becomes
//! expensive while a single message stays cheap. A stamp proves the work by
//! having a SHA-1 digest with at least the required number of leading zero bits.
//!
//! Minting is driven by the caller one [`Minter::attempt`] at a time;
//! verification runs a fixed pipeline in [`Verifier::verify`] and records
//! accepted stamps in a [`hashcash_store::SpentStore`].

pub mod config;
pub mod difficulty;
pub mod error;
pub mod generator;
pub mod minter;
pub mod policy;
pub mod verifier;

pub use config::{HashcashConfig, TimeWindow};
pub use difficulty::{fingerprint_score, meets_difficulty, score};
pub use error::HashcashError;
pub use generator::StampGenerator;
pub use minter::Minter;
pub use policy::{ExactResource, ResourcePolicy};
pub use verifier::Verifier;
