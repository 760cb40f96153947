//! Settings file for the `hashcash` binary.
//!
//! The file holds the [`HashcashConfig`] keys at the top level plus the
//! ledger location. Command line flags and `HASHCASH_*` variables override
//! whatever the file says.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use hashcash_store_lmdb::environment::DEFAULT_MAP_SIZE;
use hashcash_work::HashcashConfig;

#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    #[serde(flatten)]
    pub hashcash: HashcashConfig,

    /// Directory of the LMDB spent ledger.
    pub data_dir: Option<PathBuf>,

    /// LMDB map size in bytes.
    pub map_size: Option<usize>,
}

impl FileConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        tracing::info!("loaded config from {}", path.display());
        Ok(config)
    }
}

/// Effective settings after merging file values with flag overrides.
#[derive(Debug)]
pub struct Settings {
    pub hashcash: HashcashConfig,
    pub data_dir: PathBuf,
    pub map_size: usize,
}

/// Overrides taken from the command line.
#[derive(Debug, Default)]
pub struct Overrides {
    pub bits: Option<u32>,
    pub max_age_secs: Option<u64>,
    pub future_skew_secs: Option<u64>,
    pub data_dir: Option<PathBuf>,
}

pub const DEFAULT_DATA_DIR: &str = "./hashcash_data";

impl Settings {
    pub fn merge(file: FileConfig, cli: Overrides) -> anyhow::Result<Self> {
        let hashcash = HashcashConfig {
            bits: cli.bits.unwrap_or(file.hashcash.bits),
            max_age_secs: cli.max_age_secs.unwrap_or(file.hashcash.max_age_secs),
            future_skew_secs: cli
                .future_skew_secs
                .unwrap_or(file.hashcash.future_skew_secs),
        };
        hashcash.validate()?;

        Ok(Self {
            hashcash,
            data_dir: cli
                .data_dir
                .or(file.data_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            map_size: file.map_size.unwrap_or(DEFAULT_MAP_SIZE),
        })
    }
}
