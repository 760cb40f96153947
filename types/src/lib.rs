//! Fundamental types for hashcash stamps.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! the stamp and its text codec, stamp timestamps, the clock they are checked
//! against, and the digest fingerprint used as the replay-ledger key.

pub mod error;
pub mod fingerprint;
pub mod stamp;
pub mod time;

pub use error::StampError;
pub use fingerprint::Fingerprint;
pub use stamp::{Stamp, FIELD_DELIMITER, STAMP_VERSION};
pub use time::{Clock, Granularity, StampTime, SystemClock};
