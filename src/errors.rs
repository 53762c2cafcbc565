//! Error types for the Argus verification client.
//!
//! Construction and input errors are raised synchronously; transport,
//! protocol, and signature errors reject the asynchronous verification call.

use thiserror::Error;

use crate::client::responses::ResponseCode;

/// Errors produced by the verification client.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// Configuration rejected at construction time. Never retried.
    #[error("invalid configuration: {field}: {message}")]
    Configuration {
        /// Name of the offending configuration field.
        field: &'static str,
        message: String,
    },

    /// The license key argument is unusable. Caller must fix the input.
    #[error("invalid license key: {0}")]
    InvalidKey(String),

    /// The hardware ID argument is unusable. Caller must fix the input.
    #[error("invalid hardware id: {0}")]
    InvalidHwid(String),

    /// Auto-generation is disabled and no custom hardware ID was provided.
    #[error("hardware id not set: auto-generation is disabled and no override was provided")]
    HwidNotSet,

    /// Network-level failure reaching the authority. Retryable.
    #[error("transport error: {0}")]
    Transport(String),

    /// The authority answered with a 5xx status. Retryable.
    #[error("server error: authority returned HTTP {status}")]
    Server { status: u16 },

    /// The response signature did not verify. The response is untrusted
    /// and has been discarded.
    #[error("response signature verification failed: {0}")]
    SignatureVerification(String),

    /// The response body was missing expected fields or unparseable.
    #[error("malformed authority response: {0}")]
    Protocol(String),

    /// A well-formed response reported an unsuccessful code.
    /// Produced only by `verify_strict`.
    #[error("verification failed: {code}: {message}")]
    Unsuccessful {
        code: ResponseCode,
        message: String,
    },
}

impl From<reqwest::Error> for VerifyError {
    fn from(err: reqwest::Error) -> Self {
        VerifyError::Transport(err.to_string())
    }
}

/// Result type for verification operations.
pub type VerifyResult<T> = Result<T, VerifyError>;
