//! SHA-1 hashing and zero-bit counting for stamps.

use hashcash_types::Fingerprint;
use sha1::{Digest, Sha1};

/// Number of bits in a stamp digest.
pub const DIGEST_BITS: u32 = 160;

/// Compute the 160-bit SHA-1 digest of arbitrary data.
pub fn sha1_160(data: &[u8]) -> [u8; 20] {
    let mut hasher = Sha1::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 20];
    output.copy_from_slice(&result);
    output
}

/// Fingerprint of the exact stamp text (its UTF-8 bytes, nothing trimmed).
pub fn fingerprint(stamp_text: &str) -> Fingerprint {
    Fingerprint::new(sha1_160(stamp_text.as_bytes()))
}

/// Count zero bits from the most significant bit of `digest` up to the first set bit.
///
/// Returns the full bit length for an all-zero digest.
pub fn leading_zero_bits(digest: &[u8]) -> u32 {
    let mut bits = 0;
    for &byte in digest {
        if byte != 0 {
            return bits + byte.leading_zeros();
        }
        bits += 8;
    }
    bits
}
