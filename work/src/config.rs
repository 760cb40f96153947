//! Minting and verification configuration with TOML file support.

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use hashcash_crypto::DIGEST_BITS;

use crate::HashcashError;

/// Longest accepted `max_age_secs` / `future_skew_secs` (100 years).
pub const MAX_WINDOW_SECS: u64 = 100 * 365 * 86_400;

/// Difficulty and time window shared by minters and verifiers.
///
/// The window is relative: it is anchored to the clock at each call, so a
/// single config serves verifications spread over any length of time.
///
/// Can be loaded from a TOML file via [`HashcashConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashcashConfig {
    /// Required leading zero bits of the stamp digest.
    #[serde(default = "default_bits")]
    pub bits: u32,

    /// How old a stamp may be. The expiry horizon is `now - max_age_secs`.
    #[serde(default = "default_max_age_secs")]
    pub max_age_secs: u64,

    /// How far ahead of the verifier's clock a stamp may be dated.
    #[serde(default = "default_future_skew_secs")]
    pub future_skew_secs: u64,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_bits() -> u32 {
    20
}

fn default_max_age_secs() -> u64 {
    30 * 86_400
}

fn default_future_skew_secs() -> u64 {
    2 * 86_400
}

// ── Impl ───────────────────────────────────────────────────────────────

impl HashcashConfig {
    pub fn new(bits: u32, max_age_secs: u64, future_skew_secs: u64) -> Self {
        Self {
            bits,
            max_age_secs,
            future_skew_secs,
        }
    }

    /// Check the construction-time contract.
    ///
    /// The expiry horizon must strictly precede the future bound, and the
    /// difficulty cannot exceed the digest length.
    pub fn validate(&self) -> Result<(), HashcashError> {
        if self.bits > DIGEST_BITS {
            return Err(HashcashError::InvalidConfig(format!(
                "bits {} exceeds the {DIGEST_BITS}-bit digest",
                self.bits
            )));
        }
        if self.max_age_secs > MAX_WINDOW_SECS || self.future_skew_secs > MAX_WINDOW_SECS {
            return Err(HashcashError::InvalidConfig(format!(
                "window bounds must not exceed {MAX_WINDOW_SECS} seconds"
            )));
        }
        if self.max_age_secs == 0 && self.future_skew_secs == 0 {
            return Err(HashcashError::InvalidConfig(
                "expiry horizon must precede the future tolerance bound".to_string(),
            ));
        }
        Ok(())
    }

    /// The accepted timestamp range as seen from `now`.
    pub fn window(&self, now: DateTime<Utc>) -> TimeWindow {
        let max_age = Duration::seconds(self.max_age_secs.min(MAX_WINDOW_SECS) as i64);
        let skew = Duration::seconds(self.future_skew_secs.min(MAX_WINDOW_SECS) as i64);
        TimeWindow {
            earliest: now.checked_sub_signed(max_age).unwrap_or(DateTime::<Utc>::MIN_UTC),
            latest: now.checked_add_signed(skew).unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    /// Ledger entries recorded before this instant can be dropped.
    ///
    /// A stamp recorded at `t` is dated no later than `t + future_skew`, so
    /// once `t + future_skew` falls behind `now - max_age` it can never
    /// pass the timestamp check again under this config.
    pub fn retention_cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let window = self.window(now);
        let skew = Duration::seconds(self.future_skew_secs.min(MAX_WINDOW_SECS) as i64);
        window
            .earliest
            .checked_sub_signed(skew)
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, HashcashError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| HashcashError::InvalidConfig(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, HashcashError> {
        let config: Self =
            toml::from_str(s).map_err(|e| HashcashError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).expect("HashcashConfig is always serializable to TOML")
    }
}

impl Default for HashcashConfig {
    fn default() -> Self {
        Self {
            bits: default_bits(),
            max_age_secs: default_max_age_secs(),
            future_skew_secs: default_future_skew_secs(),
        }
    }
}

/// Inclusive range of acceptable stamp instants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeWindow {
    pub earliest: DateTime<Utc>,
    pub latest: DateTime<Utc>,
}

impl TimeWindow {
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.earliest <= instant && instant <= self.latest
    }
}
