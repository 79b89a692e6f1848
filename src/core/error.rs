//! Error taxonomy for the cookie store.
//!
//! Every failure propagates to the immediate caller; the store never
//! retries, never logs, and never panics on a domain error.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed container: {0}")]
    Codec(String),

    #[error("encryption failed: {0}")]
    Encryption(String),

    #[error("decryption failed: {0}")]
    Decryption(String),

    #[error("cookie not found: {0}")]
    NotFound(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
