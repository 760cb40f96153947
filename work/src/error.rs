use hashcash_store::StoreError;
use hashcash_types::{Fingerprint, StampError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HashcashError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid stamp header: {0}")]
    InvalidHeader(#[from] StampError),

    #[error("stamp digest has {actual} leading zero bits, {required} required")]
    NoCollision { required: u32, actual: u32 },

    #[error("stamp timestamp {0:?} is outside the accepted window")]
    Timestamp(String),

    #[error("resource {0:?} rejected by policy")]
    ResourceFail(String),

    #[error("stamp {0} has already been spent")]
    Spent(Fingerprint),

    #[error("attempt did not meet the required difficulty")]
    SolutionFail,

    #[error("spent ledger failure: {0}")]
    Store(#[from] StoreError),
}

impl HashcashError {
    /// Whether this is a verdict about the stamp, as opposed to a
    /// configuration or infrastructure failure.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            HashcashError::InvalidHeader(_)
                | HashcashError::NoCollision { .. }
                | HashcashError::Timestamp(_)
                | HashcashError::ResourceFail(_)
                | HashcashError::Spent(_)
        )
    }
}
