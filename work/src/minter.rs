//! Stamp minting, one attempt at a time.
//!
//! A [`Minter`] owns one candidate stamp. Every [`Minter::attempt`] hashes
//! the candidate once and either hands back the finished stamp or
//! [`HashcashError::SolutionFail`]. The caller's loop decides pacing,
//! budgets and cancellation; see [`crate::StampGenerator`] for a parallel
//! driver.

use chrono::{DateTime, Duration, Utc};

use hashcash_crypto::{encode_counter, random_salt};
use hashcash_types::{
    Clock, Granularity, Stamp, StampTime, SystemClock, FIELD_DELIMITER, STAMP_VERSION,
};

use crate::difficulty::meets_difficulty;
use crate::{HashcashConfig, HashcashError, TimeWindow};

/// Searches for a stamp over one resource.
///
/// The timestamp and random salt are fixed for the life of the minter;
/// only the counter changes between attempts. A caller that keeps going
/// past the configured future tolerance should start a new minter.
#[derive(Debug)]
pub struct Minter {
    bits: u32,
    resource: String,
    timestamp: StampTime,
    random: String,
    /// Everything up to and including the delimiter before the counter.
    prefix: String,
    counter: u64,
    attempts: u64,
}

impl Minter {
    /// Create a minter dated from the system clock.
    pub fn new(resource: impl Into<String>, config: &HashcashConfig) -> Result<Self, HashcashError> {
        Self::with_clock(resource, config, &SystemClock)
    }

    /// Create a minter dated from `clock`.
    ///
    /// Fails with [`HashcashError::InvalidConfig`] if the config is invalid
    /// or the resource contains the stamp field delimiter.
    pub fn with_clock(
        resource: impl Into<String>,
        config: &HashcashConfig,
        clock: &impl Clock,
    ) -> Result<Self, HashcashError> {
        config.validate()?;
        let resource = resource.into();
        if resource.contains(FIELD_DELIMITER) {
            return Err(HashcashError::InvalidConfig(format!(
                "resource {resource:?} contains the field delimiter {FIELD_DELIMITER:?}"
            )));
        }

        let now = clock.now();
        let timestamp = mint_timestamp(now, &config.window(now));
        let random = random_salt();
        let prefix = format!(
            "{STAMP_VERSION}:{}:{timestamp}:{resource}::{random}:",
            config.bits
        );

        tracing::trace!(
            resource = %resource,
            bits = config.bits,
            timestamp = %timestamp,
            "created minter"
        );

        Ok(Self {
            bits: config.bits,
            resource,
            timestamp,
            random,
            prefix,
            counter: 0,
            attempts: 0,
        })
    }

    /// Start the counter at `counter` instead of zero.
    pub fn starting_at(mut self, counter: u64) -> Self {
        self.counter = counter;
        self
    }

    /// Hash the current candidate once.
    ///
    /// Returns the stamp if it meets the difficulty, otherwise
    /// [`HashcashError::SolutionFail`]. The counter advances either way, so
    /// calling again after a success yields a different stamp.
    pub fn attempt(&mut self) -> Result<Stamp, HashcashError> {
        let counter = encode_counter(self.counter);
        let mut text = String::with_capacity(self.prefix.len() + counter.len());
        text.push_str(&self.prefix);
        text.push_str(&counter);

        self.counter = self.counter.wrapping_add(1);
        self.attempts += 1;

        if !meets_difficulty(&text, self.bits) {
            return Err(HashcashError::SolutionFail);
        }

        tracing::debug!(
            resource = %self.resource,
            bits = self.bits,
            attempts = self.attempts,
            "minted stamp"
        );
        Ok(Stamp {
            bits: self.bits.to_string(),
            timestamp: self.timestamp.to_string(),
            resource: self.resource.clone(),
            extension: String::new(),
            random: self.random.clone(),
            counter,
        })
    }

    /// Call [`Minter::attempt`] up to `max_attempts` times.
    ///
    /// Returns [`HashcashError::SolutionFail`] if the budget runs out; the
    /// minter can be resumed with another call.
    pub fn mint(&mut self, max_attempts: u64) -> Result<Stamp, HashcashError> {
        for _ in 0..max_attempts {
            match self.attempt() {
                Err(HashcashError::SolutionFail) => continue,
                result => return result,
            }
        }
        Err(HashcashError::SolutionFail)
    }

    /// Attempts made so far.
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    pub fn timestamp(&self) -> &StampTime {
        &self.timestamp
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }
}

/// Coarsest truncation of `now` that still falls inside the window.
///
/// With no past tolerance even the current second has started before
/// `now`; the stamp is then dated at the next whole second, which the
/// future tolerance covers.
fn mint_timestamp(now: DateTime<Utc>, window: &TimeWindow) -> StampTime {
    Granularity::COARSEST_FIRST
        .into_iter()
        .map(|granularity| StampTime::truncate(now, granularity))
        .find(|time| window.contains(time.instant()))
        .unwrap_or_else(|| first_second_from(window.earliest))
}

/// The first whole second at or after `instant`.
fn first_second_from(instant: DateTime<Utc>) -> StampTime {
    let floor = StampTime::truncate(instant, Granularity::Second);
    if floor.instant() >= instant {
        return floor;
    }
    let next = instant
        .checked_add_signed(Duration::seconds(1))
        .unwrap_or(instant);
    StampTime::truncate(next, Granularity::Second)
}
