//! hashcash: mint and verify proof-of-work stamps from the command line.

mod config;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use hashcash_crypto::{decode_counter, fingerprint};
use hashcash_store_lmdb::{check_integrity, LmdbEnvironment};
use hashcash_types::Stamp;
use hashcash_utils::{format_duration, format_rate, LogFormat};
use hashcash_work::{score, ExactResource, Minter, StampGenerator, Verifier};

use crate::config::{FileConfig, Overrides, Settings};

#[derive(Parser)]
#[command(name = "hashcash", version, about = "Mint and verify hashcash stamps")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, global = true, env = "HASHCASH_CONFIG")]
    config: Option<PathBuf>,

    /// Directory of the spent-stamp ledger.
    #[arg(long, global = true, env = "HASHCASH_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Required leading zero bits.
    #[arg(long, global = true, env = "HASHCASH_BITS")]
    bits: Option<u32>,

    /// Oldest accepted stamp age, in seconds.
    #[arg(long, global = true, env = "HASHCASH_MAX_AGE_SECS")]
    max_age_secs: Option<u64>,

    /// How far in the future a stamp may be dated, in seconds.
    #[arg(long, global = true, env = "HASHCASH_FUTURE_SKEW_SECS")]
    future_skew_secs: Option<u64>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, global = true, default_value = "warn", env = "HASHCASH_LOG_LEVEL")]
    log_level: String,

    /// Log output format: "human" or "json".
    #[arg(long, global = true, default_value_t = LogFormat::Human, env = "HASHCASH_LOG_FORMAT")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Mint a stamp for a resource and print it.
    Mint {
        /// Resource to stamp, e.g. an email address.
        #[arg(long)]
        resource: String,

        /// Give up after this many attempts (per worker with --parallel).
        #[arg(long, default_value_t = u64::MAX)]
        max_attempts: u64,

        /// Search on all CPU cores.
        #[arg(long)]
        parallel: bool,
    },

    /// Verify a stamp and record it as spent.
    Verify {
        stamp: String,

        /// Only accept stamps for exactly this resource.
        #[arg(long)]
        resource: Option<String>,
    },

    /// Print a stamp's leading zero bits and fingerprint.
    Score { stamp: String },

    /// Drop ledger entries that can no longer pass the timestamp check.
    Prune,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    hashcash_utils::init_logging(cli.log_format, &cli.log_level);

    let file_config = match cli.config {
        Some(ref path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let settings = Settings::merge(
        file_config,
        Overrides {
            bits: cli.bits,
            max_age_secs: cli.max_age_secs,
            future_skew_secs: cli.future_skew_secs,
            data_dir: cli.data_dir,
        },
    )?;

    match cli.command {
        Command::Mint {
            resource,
            max_attempts,
            parallel,
        } => mint(&settings, &resource, max_attempts, parallel),
        Command::Verify { stamp, resource } => verify(&settings, &stamp, resource),
        Command::Score { stamp } => {
            println!("bits: {}", score(&stamp));
            println!("fingerprint: {}", fingerprint(&stamp));
            if let Ok(parsed) = Stamp::parse(&stamp) {
                println!("claimed: {}", parsed.bits);
                if let Some(counter) = decode_counter(&parsed.counter) {
                    println!("counter: {counter}");
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Prune => prune(&settings),
    }
}

fn mint(
    settings: &Settings,
    resource: &str,
    max_attempts: u64,
    parallel: bool,
) -> anyhow::Result<ExitCode> {
    let started = Instant::now();
    let result = if parallel {
        StampGenerator.generate(resource, &settings.hashcash, max_attempts)
    } else {
        let mut minter = Minter::new(resource, &settings.hashcash)?;
        let result = minter.mint(max_attempts);
        tracing::info!(
            attempts = minter.attempts(),
            rate = %format_rate(minter.attempts(), started.elapsed()),
            "search finished"
        );
        result
    };

    match result {
        Ok(stamp) => {
            tracing::info!(
                bits = settings.hashcash.bits,
                elapsed = %format_duration(started.elapsed()),
                "minted stamp"
            );
            println!("{stamp}");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("mint failed: {e}");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn verify(settings: &Settings, stamp: &str, resource: Option<String>) -> anyhow::Result<ExitCode> {
    let env = LmdbEnvironment::open(&settings.data_dir, settings.map_size)?;
    let mut verifier = Verifier::new(settings.hashcash.clone(), env.spent_store())?;
    if let Some(resource) = resource {
        verifier = verifier.with_policy(ExactResource::new(resource));
    }

    match verifier.verify(stamp) {
        Ok(accepted) => {
            println!("accepted: {} ({})", accepted.resource, fingerprint(stamp));
            Ok(ExitCode::SUCCESS)
        }
        Err(e) if e.is_rejection() => {
            eprintln!("rejected: {e}");
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e.into()),
    }
}

fn prune(settings: &Settings) -> anyhow::Result<ExitCode> {
    let env = LmdbEnvironment::open(&settings.data_dir, settings.map_size)?;

    let report = check_integrity(&env)?;
    if !report.is_healthy() {
        for error in &report.errors {
            eprintln!("integrity: {error}");
        }
        anyhow::bail!(
            "ledger at {} failed its integrity check, not pruning",
            settings.data_dir.display()
        );
    }

    let cutoff = settings.hashcash.retention_cutoff(chrono::Utc::now());
    let store = env.spent_store();
    let removed = store.prune_before(cutoff)?;
    println!("pruned {removed} of {} entries", report.total_entries);
    Ok(ExitCode::SUCCESS)
}
