//! Stamp verification pipeline.
//!
//! Checks run in a fixed order and the first failure wins:
//!
//! 1. header: the text parses as a version-1 stamp ([`HashcashError::InvalidHeader`])
//! 2. collision: the digest meets the *configured* difficulty; the
//!    stamp's own bits field is never trusted ([`HashcashError::NoCollision`])
//! 3. timestamp: inside `[now - max_age, now + future_skew]` ([`HashcashError::Timestamp`])
//! 4. replay: fingerprint not yet in the ledger ([`HashcashError::Spent`])
//! 5. resource: the optional policy accepts the resource ([`HashcashError::ResourceFail`])
//! 6. commit: the fingerprint is recorded; a stamp is only accepted once
//!    this write succeeds
//!
//! The replay lookup runs before the resource policy, so a spent stamp for
//! a foreign resource reports `Spent`.

use hashcash_crypto::fingerprint;
use hashcash_store::{SpentStore, StoreError};
use hashcash_types::{Clock, Stamp, StampTime, SystemClock};

use crate::difficulty::fingerprint_score;
use crate::{HashcashConfig, HashcashError, ResourcePolicy};

/// Verifies stamps against a config, a spent ledger and an optional
/// resource policy.
///
/// `Send + Sync` whenever the ledger and clock are, so one verifier can
/// serve many threads; concurrent verifications of the same stamp are
/// arbitrated by the ledger's insert-if-absent.
pub struct Verifier<S, C = SystemClock> {
    config: HashcashConfig,
    store: S,
    clock: C,
    policy: Option<Box<dyn ResourcePolicy>>,
}

impl<S: SpentStore> Verifier<S, SystemClock> {
    /// Build a verifier on the system clock that accepts any resource.
    ///
    /// Fails with [`HashcashError::InvalidConfig`] if the config is invalid.
    pub fn new(config: HashcashConfig, store: S) -> Result<Self, HashcashError> {
        config.validate()?;
        Ok(Self {
            config,
            store,
            clock: SystemClock,
            policy: None,
        })
    }
}

impl<S: SpentStore, C: Clock> Verifier<S, C> {
    /// Replace the clock the time window is anchored to.
    pub fn with_clock<C2: Clock>(self, clock: C2) -> Verifier<S, C2> {
        Verifier {
            config: self.config,
            store: self.store,
            clock,
            policy: self.policy,
        }
    }

    /// Only accept stamps whose resource satisfies `policy`.
    pub fn with_policy(mut self, policy: impl ResourcePolicy + 'static) -> Self {
        self.policy = Some(Box::new(policy));
        self
    }

    pub fn config(&self) -> &HashcashConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run the full pipeline over `text` and, on success, mark it spent.
    ///
    /// Returns the decoded stamp when accepted. `text` is hashed exactly as
    /// given; surrounding whitespace is part of the stamp.
    pub fn verify(&self, text: &str) -> Result<Stamp, HashcashError> {
        let stamp = Stamp::parse(text).map_err(|e| {
            tracing::debug!(error = %e, "rejected stamp: invalid header");
            HashcashError::from(e)
        })?;

        let fingerprint = fingerprint(text);
        let actual = fingerprint_score(&fingerprint);
        if actual < self.config.bits {
            tracing::debug!(
                %fingerprint,
                required = self.config.bits,
                actual,
                "rejected stamp: no collision"
            );
            return Err(HashcashError::NoCollision {
                required: self.config.bits,
                actual,
            });
        }
        if stamp.claimed_bits() != Some(self.config.bits) {
            tracing::debug!(
                %fingerprint,
                claimed = %stamp.bits,
                configured = self.config.bits,
                "stamp claims a different difficulty"
            );
        }

        let window = self.config.window(self.clock.now());
        let in_window = StampTime::parse(&stamp.timestamp)
            .map(|time| window.contains(time.instant()))
            .unwrap_or(false);
        if !in_window {
            tracing::debug!(
                %fingerprint,
                timestamp = %stamp.timestamp,
                earliest = %window.earliest,
                latest = %window.latest,
                "rejected stamp: outside time window"
            );
            return Err(HashcashError::Timestamp(stamp.timestamp));
        }

        if self.store.spent(&fingerprint)? {
            tracing::debug!(%fingerprint, "rejected stamp: already spent");
            return Err(HashcashError::Spent(fingerprint));
        }

        if let Some(policy) = &self.policy {
            if !policy.accept(&stamp.resource) {
                tracing::debug!(
                    %fingerprint,
                    resource = %stamp.resource,
                    "rejected stamp: resource policy"
                );
                return Err(HashcashError::ResourceFail(stamp.resource));
            }
        }

        match self.store.add(&fingerprint) {
            Ok(()) => {}
            Err(StoreError::Duplicate(_)) => {
                tracing::debug!(%fingerprint, "rejected stamp: spent concurrently");
                return Err(HashcashError::Spent(fingerprint));
            }
            Err(e) => {
                tracing::warn!(%fingerprint, error = %e, "failed to record spent stamp");
                return Err(e.into());
            }
        }

        tracing::info!(%fingerprint, resource = %stamp.resource, "accepted stamp");
        Ok(stamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ExactResource, Minter};
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use hashcash_nullables::{NullClock, NullSpentStore};
    use hashcash_types::{Fingerprint, Granularity};
    use std::sync::Arc;

    const EXPIRED: &str = "1:20:040806:foo::65f460d0726f420d:13a6b8";
    const NO_COLLISION: &str = "1:20:180311205026:someone@gmail.com::2M6FmM7eRvw=:MjU5ODg5";

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn verifier(config: HashcashConfig) -> Verifier<NullSpentStore, NullClock> {
        Verifier::new(config, NullSpentStore::new())
            .unwrap()
            .with_clock(NullClock::new(now()))
    }

    /// A bits-0 stamp dated `offset_secs` from `now()`, second granularity.
    fn dated(offset_secs: i64, resource: &str) -> String {
        let time = StampTime::truncate(now() + Duration::seconds(offset_secs), Granularity::Second);
        format!("1:0:{time}:{resource}::c2FsdA==:MA==")
    }

    fn mint(config: &HashcashConfig, resource: &str) -> String {
        let mut minter = Minter::with_clock(resource, config, &NullClock::new(now())).unwrap();
        minter.mint(u64::MAX).unwrap().to_string()
    }

    #[test]
    fn accepts_fresh_stamp() {
        let config = HashcashConfig::new(8, 30 * 86_400, 2 * 86_400);
        let v = verifier(config.clone());
        let text = mint(&config, "someone@gmail.com");
        let stamp = v.verify(&text).unwrap();
        assert_eq!(stamp.resource, "someone@gmail.com");
        assert!(v.store().spent(&fingerprint(&text)).unwrap());
    }

    #[test]
    fn invalid_header() {
        let v = verifier(HashcashConfig::new(0, 3600, 60));
        assert!(matches!(v.verify("blah"), Err(HashcashError::InvalidHeader(_))));
        assert!(matches!(
            v.verify("2:0:261019:foo::r:c"),
            Err(HashcashError::InvalidHeader(_))
        ));
        assert!(v.store().is_empty());
    }

    #[test]
    fn no_collision() {
        let v = verifier(HashcashConfig::new(20, 30 * 86_400, 2 * 86_400));
        assert!(matches!(
            v.verify(NO_COLLISION),
            Err(HashcashError::NoCollision { required: 20, actual: 1 })
        ));
    }

    #[test]
    fn self_reported_bits_are_not_trusted() {
        // The stamp claims 20 bits and has exactly 20; a 24-bit verifier refuses it.
        let v = verifier(HashcashConfig::new(24, 30 * 86_400, 2 * 86_400));
        assert!(matches!(
            v.verify(EXPIRED),
            Err(HashcashError::NoCollision { required: 24, actual: 20 })
        ));
    }

    #[test]
    fn odd_bits_field_does_not_affect_verdict() {
        let v = verifier(HashcashConfig::new(0, 86_400, 60));
        for bits in ["020", "4294967296", "", "x"] {
            let text = format!("1:{bits}:261019:foo::r:c");
            let stamp = v.verify(&text).unwrap();
            assert_eq!(stamp.bits, bits);
            assert_eq!(stamp.to_string(), text);
        }
    }

    #[test]
    fn expired_stamp() {
        let v = verifier(HashcashConfig::new(20, 30 * 86_400, 2 * 86_400));
        assert!(matches!(
            v.verify(EXPIRED),
            Err(HashcashError::Timestamp(ts)) if ts == "040806"
        ));
    }

    #[test]
    fn uninterpretable_timestamp_is_timestamp_error() {
        let v = verifier(HashcashConfig::new(0, 3600, 60));
        for ts in ["", "yesterday", "261332", "2610191200000"] {
            let text = format!("1:0:{ts}:foo::r:c");
            assert!(
                matches!(v.verify(&text), Err(HashcashError::Timestamp(_))),
                "{ts:?} should fail the window check"
            );
        }
    }

    #[test]
    fn window_edges_are_inclusive() {
        let v = verifier(HashcashConfig::new(0, 3600, 600));
        assert!(v.verify(&dated(-3600, "foo")).is_ok());
        assert!(matches!(
            v.verify(&dated(-3601, "foo")),
            Err(HashcashError::Timestamp(_))
        ));
        assert!(v.verify(&dated(600, "foo")).is_ok());
        assert!(matches!(
            v.verify(&dated(601, "foo")),
            Err(HashcashError::Timestamp(_))
        ));
    }

    #[test]
    fn window_is_evaluated_at_call_time() {
        let clock = Arc::new(NullClock::new(now()));
        let v = Verifier::new(HashcashConfig::new(0, 3600, 60), NullSpentStore::new())
            .unwrap()
            .with_clock(Arc::clone(&clock));
        let text = dated(0, "foo");

        clock.advance(3601);
        assert!(matches!(v.verify(&text), Err(HashcashError::Timestamp(_))));

        clock.advance(-3601);
        assert!(v.verify(&text).is_ok());
    }

    #[test]
    fn day_granularity_starts_at_midnight() {
        let v = verifier(HashcashConfig::new(0, 12 * 3600, 60));
        // now() is noon, so today's midnight is exactly at the horizon.
        assert!(v.verify("1:0:261019:foo::r:c").is_ok());
        assert!(matches!(
            v.verify("1:0:261018:foo::r:c"),
            Err(HashcashError::Timestamp(_))
        ));
    }

    #[test]
    fn spent_stamp() {
        let config = HashcashConfig::new(8, 30 * 86_400, 2 * 86_400);
        let v = verifier(config.clone());
        let text = mint(&config, "someone@gmail.com");
        v.verify(&text).unwrap();
        assert!(matches!(v.verify(&text), Err(HashcashError::Spent(fp)) if fp == fingerprint(&text)));
    }

    #[test]
    fn prepopulated_ledger_reports_spent() {
        let config = HashcashConfig::new(8, 30 * 86_400, 2 * 86_400);
        let text = mint(&config, "someone@gmail.com");
        let v = Verifier::new(config, NullSpentStore::with_spent([fingerprint(&text)]))
            .unwrap()
            .with_clock(NullClock::new(now()));
        assert!(matches!(v.verify(&text), Err(HashcashError::Spent(_))));
    }

    #[test]
    fn resource_policy_rejects() {
        let config = HashcashConfig::new(8, 30 * 86_400, 2 * 86_400);
        let v = verifier(config.clone()).with_policy(|_: &str| false);
        let text = mint(&config, "someone@gmail.com");
        assert!(matches!(
            v.verify(&text),
            Err(HashcashError::ResourceFail(r)) if r == "someone@gmail.com"
        ));
        // Rejected stamps are not committed.
        assert!(v.store().is_empty());
    }

    #[test]
    fn exact_resource_policy() {
        let config = HashcashConfig::new(0, 3600, 60);
        let v = verifier(config).with_policy(ExactResource::new("alice@example.com"));
        assert!(v.verify(&dated(0, "alice@example.com")).is_ok());
        assert!(matches!(
            v.verify(&dated(0, "mallory@example.com")),
            Err(HashcashError::ResourceFail(_))
        ));
    }

    #[test]
    fn replay_is_checked_before_resource() {
        let text = dated(0, "mallory@example.com");
        let v = Verifier::new(
            HashcashConfig::new(0, 3600, 60),
            NullSpentStore::with_spent([fingerprint(&text)]),
        )
        .unwrap()
        .with_clock(NullClock::new(now()))
        .with_policy(|_: &str| false);
        assert!(matches!(v.verify(&text), Err(HashcashError::Spent(_))));
    }

    #[test]
    fn collision_is_checked_before_timestamp() {
        // Expired and under-difficulty: the collision gate reports first.
        let v = verifier(HashcashConfig::new(21, 30 * 86_400, 2 * 86_400));
        assert!(matches!(v.verify(EXPIRED), Err(HashcashError::NoCollision { .. })));
    }

    #[test]
    fn ledger_read_failure_is_store_error() {
        let v = verifier(HashcashConfig::new(0, 3600, 60));
        v.store().fail_reads(true);
        let err = v.verify(&dated(0, "foo")).unwrap_err();
        assert!(matches!(err, HashcashError::Store(StoreError::Backend(_))));
        assert!(!err.is_rejection());
    }

    #[test]
    fn ledger_write_failure_is_not_acceptance() {
        let v = verifier(HashcashConfig::new(0, 3600, 60));
        let text = dated(0, "foo");
        v.store().fail_writes(true);
        assert!(matches!(v.verify(&text), Err(HashcashError::Store(_))));

        // Once the ledger recovers the same stamp can still be accepted once.
        v.store().fail_writes(false);
        assert!(v.verify(&text).is_ok());
        assert!(matches!(v.verify(&text), Err(HashcashError::Spent(_))));
    }

    /// A ledger that lost the race: lookup says unspent, insert says duplicate.
    struct RacingStore;

    impl SpentStore for RacingStore {
        fn add(&self, fingerprint: &Fingerprint) -> Result<(), StoreError> {
            Err(StoreError::Duplicate(fingerprint.to_string()))
        }

        fn spent(&self, _fingerprint: &Fingerprint) -> Result<bool, StoreError> {
            Ok(false)
        }
    }

    #[test]
    fn lost_commit_race_is_spent() {
        let v = Verifier::new(HashcashConfig::new(0, 3600, 60), RacingStore)
            .unwrap()
            .with_clock(NullClock::new(now()));
        assert!(matches!(v.verify(&dated(0, "foo")), Err(HashcashError::Spent(_))));
    }

    #[test]
    fn rejects_invalid_config() {
        assert!(matches!(
            Verifier::new(HashcashConfig::new(20, 0, 0), NullSpentStore::new()),
            Err(HashcashError::InvalidConfig(_))
        ));
    }

    #[test]
    fn whitespace_is_part_of_the_stamp() {
        let v = verifier(HashcashConfig::new(0, 3600, 60));
        let text = dated(0, "foo");
        // A trailing newline lands in the counter field and changes the digest.
        v.verify(&format!("{text}\n")).unwrap();
        assert!(v.verify(&text).is_ok());
    }
}
