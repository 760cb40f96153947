//! Errors raised while decoding stamp text.

use thiserror::Error;

/// Why a piece of text is not a well-formed stamp (or stamp timestamp).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StampError {
    #[error("expected 7 colon-separated fields, found {0}")]
    FieldCount(usize),

    #[error("unsupported stamp version {0:?}")]
    UnsupportedVersion(String),

    #[error("timestamp {0:?} is not a valid YYMMDD[hhmm[ss]] UTC time")]
    InvalidTimestamp(String),
}
