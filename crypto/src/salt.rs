//! Random salts and counter text for minting.
//!
//! Both are base64 (standard alphabet), which never produces the stamp
//! field delimiter.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use rand::rngs::OsRng;
use rand::RngCore;

/// Number of random bytes behind a salt (96 bits, 16 base64 chars, no padding).
pub const SALT_LEN: usize = 12;

/// Generate a fresh base64 salt from the OS RNG.
pub fn random_salt() -> String {
    let mut bytes = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut bytes);
    STANDARD.encode(bytes)
}

/// Counter text: base64 of the counter's decimal digits.
pub fn encode_counter(counter: u64) -> String {
    STANDARD.encode(counter.to_string())
}

/// Inverse of [`encode_counter`]. Counters minted elsewhere are opaque and
/// usually do not decode; that is not an error, just `None`.
pub fn decode_counter(text: &str) -> Option<u64> {
    let bytes = STANDARD.decode(text).ok()?;
    std::str::from_utf8(&bytes).ok()?.parse().ok()
}
