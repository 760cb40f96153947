#![no_main]
use libfuzzer_sys::fuzz_target;

use chrono::{TimeZone, Utc};
use hashcash_nullables::{NullClock, NullSpentStore};
use hashcash_work::{HashcashConfig, Verifier};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let clock = NullClock::new(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
    let Ok(verifier) = Verifier::new(HashcashConfig::new(0, 30 * 86_400, 86_400), NullSpentStore::new())
    else {
        return;
    };
    let verifier = verifier.with_clock(clock);

    // Any input gets a verdict; a second pass over an accepted stamp is spent.
    if verifier.verify(text).is_ok() {
        assert!(verifier.verify(text).is_err());
    }
});
