//! Difficulty scoring: leading zero bits of a stamp's SHA-1 digest.
//!
//! The score is read from the most significant end of the digest, so
//! meeting `b` bits implies meeting every `b' <= b`.

use hashcash_crypto::{leading_zero_bits, sha1_160};
use hashcash_types::Fingerprint;

/// Leading zero bits of the digest of the exact stamp text.
pub fn score(stamp_text: &str) -> u32 {
    leading_zero_bits(&sha1_160(stamp_text.as_bytes()))
}

/// Score of an already computed fingerprint.
pub fn fingerprint_score(fingerprint: &Fingerprint) -> u32 {
    leading_zero_bits(fingerprint.as_bytes())
}

/// Whether the stamp text has at least `required_bits` leading zero bits.
pub fn meets_difficulty(stamp_text: &str, required_bits: u32) -> bool {
    score(stamp_text) >= required_bits
}
