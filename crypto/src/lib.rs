//! Digest and salt primitives for hashcash stamps.
//!
//! - **SHA-1** over the exact stamp text, for both difficulty scoring and
//!   the replay-ledger fingerprint
//! - Leading-zero-bit counting over a digest
//! - Random salts and counter text, base64 encoded so they never contain `:`

pub mod hash;
pub mod salt;

pub use hash::{fingerprint, leading_zero_bits, sha1_160, DIGEST_BITS};
pub use salt::{decode_counter, encode_counter, random_salt, SALT_LEN};
