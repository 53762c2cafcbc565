//! Argus - a challenge/response license verification client.
//!
//! Given a license key and three shared secrets, Argus proves request
//! authenticity to a remote verification authority and validates that the
//! authority's reply was not tampered with in transit:
//!
//! - every request carries a fresh 32-byte nonce, an epoch-millisecond
//!   timestamp, and a SHA-256 client signature interleaving the shared
//!   secrets with the request material;
//! - every reply must carry a SHA-256 signature over the request's own
//!   nonce, which binds it to that request and defeats replay;
//! - requests are bound to the machine through a stable hardware
//!   fingerprint, derived automatically or supplied explicitly.
//!
//! # Example
//!
//! ```rust,ignore
//! use argus::{Verifier, VerifierConfig};
//!
//! let config = VerifierConfig::new("MyApp", secret1, secret2, secret3);
//! let verifier = Verifier::new(config)?;
//!
//! let outcome = verifier.verify("XXXX-YYYY-ZZZZ").await?;
//! if outcome.success {
//!     println!("licensed until {:?}", outcome.expires_at());
//! }
//! ```

// Core modules
pub mod config;
pub mod errors;
pub mod hardware;
pub mod signature;

// Client-related modules
pub mod client {
    pub mod cache;
    pub mod responses;
    pub mod transport;
    pub mod verifier;
}

pub use client::responses::{AppData, KeyData, ResponseCode, ResponseData, VerificationOutcome};
pub use client::transport::{HttpTransport, Transport, TransportReply, VerificationRequest};
pub use client::verifier::Verifier;
pub use config::VerifierConfig;
pub use errors::{VerifyError, VerifyResult};
