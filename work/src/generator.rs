//! Parallel stamp generation (multi-threaded CPU).

use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;

use hashcash_types::{Clock, Stamp, SystemClock};

use crate::{HashcashConfig, HashcashError, Minter};

/// Mints stamps using all available CPU cores.
pub struct StampGenerator;

/// Attempts per worker before checking the stop flag.
const BATCH_SIZE: u64 = 4096;

impl StampGenerator {
    /// Mint a stamp for `resource`, dated from the system clock.
    pub fn generate(
        &self,
        resource: &str,
        config: &HashcashConfig,
        max_attempts_per_worker: u64,
    ) -> Result<Stamp, HashcashError> {
        self.generate_with_clock(resource, config, max_attempts_per_worker, &SystemClock)
    }

    /// Mint a stamp for `resource`, dated from `clock`.
    ///
    /// Runs one independent [`Minter`] (own salt, own counter) per rayon
    /// thread. The first worker to find a solution signals the others to
    /// stop. Returns [`HashcashError::SolutionFail`] when every worker has
    /// spent its budget without success.
    pub fn generate_with_clock(
        &self,
        resource: &str,
        config: &HashcashConfig,
        max_attempts_per_worker: u64,
        clock: &impl Clock,
    ) -> Result<Stamp, HashcashError> {
        let num_threads = rayon::current_num_threads().max(1);
        let minters = (0..num_threads)
            .map(|_| Minter::with_clock(resource, config, clock))
            .collect::<Result<Vec<_>, _>>()?;

        let found = AtomicBool::new(false);

        minters
            .into_par_iter()
            .find_map_any(|mut minter| {
                let mut remaining = max_attempts_per_worker;
                while remaining > 0 {
                    if found.load(Ordering::Relaxed) {
                        return None;
                    }
                    let batch = remaining.min(BATCH_SIZE);
                    if let Ok(stamp) = minter.mint(batch) {
                        found.store(true, Ordering::Relaxed);
                        return Some(stamp);
                    }
                    remaining -= batch;
                }
                None
            })
            .ok_or(HashcashError::SolutionFail)
    }
}
