//! Verification client.
//!
//! Orchestrates one verification call: validate input, resolve the hardware
//! fingerprint, sign the request, delegate transmission, authenticate the
//! reply, classify it, and retain the latest successful outcome.

use chrono::Utc;
use rand::rngs::OsRng;
use rand::TryRngCore;
use tracing::{debug, warn};

use crate::client::cache::LastVerification;
use crate::client::responses::{VerificationOutcome, WireResponse};
use crate::client::transport::{HttpTransport, Transport, VerificationRequest};
use crate::config::VerifierConfig;
use crate::errors::{VerifyError, VerifyResult};
use crate::hardware::HwidGenerator;
use crate::signature::{client_signature, verify_server_signature};

/// Size of the request nonce in bytes (64 hex characters on the wire).
const NONCE_LEN: usize = 32;

/// License verification client.
///
/// Generic over the [`Transport`] collaborator; production code uses the
/// [`HttpTransport`] default, tests substitute an in-process authority.
/// Concurrent `verify` calls on one instance are safe: each call owns its
/// nonce, timestamp, and signature, and the result cache follows a
/// last-success-completes-wins policy.
pub struct Verifier<T: Transport = HttpTransport> {
    config: VerifierConfig,
    hwid: HwidGenerator,
    transport: T,
    last: LastVerification,
}

impl Verifier<HttpTransport> {
    /// Build a client over HTTP.
    ///
    /// Validates the configuration (failing with the offending field named)
    /// and constructs the reqwest transport honoring `strict_ssl`.
    pub fn new(config: VerifierConfig) -> VerifyResult<Self> {
        config.validate()?;
        let transport = HttpTransport::new(&config.api_url, config.strict_ssl)?;
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> Verifier<T> {
    /// Build a client with an explicit transport collaborator.
    pub fn with_transport(config: VerifierConfig, transport: T) -> VerifyResult<Self> {
        config.validate()?;

        let hwid = HwidGenerator::new(config.auto_hwid);
        if let Some(custom) = &config.custom_hwid {
            hwid.set_hwid(custom)?;
        }

        Ok(Self {
            config,
            hwid,
            transport,
            last: LastVerification::new(),
        })
    }

    /// Verify a license key against the authority.
    ///
    /// Returns the normalized outcome; authority-reported failure codes are
    /// a `success = false` outcome, not an error. Errors cover bad input,
    /// fingerprint resolution, transport failure, 5xx statuses, unparseable
    /// bodies, and response-signature rejection. A response whose signature
    /// does not verify is discarded without classification, whatever status
    /// code it claims. Only a successful outcome replaces the cached result.
    pub async fn verify(&self, key: &str) -> VerifyResult<VerificationOutcome> {
        if key.trim().is_empty() {
            return Err(VerifyError::InvalidKey(
                "must be a non-empty string".to_string(),
            ));
        }

        let hwid = self.hwid.hwid()?;

        // Fresh per call; a nonce is never reused.
        let nonce = generate_nonce();
        let timestamp = Utc::now().timestamp_millis().to_string();

        let signature = client_signature(
            &nonce,
            &self.config.secret1,
            key,
            &self.config.secret2,
            &timestamp,
            &self.config.secret3,
            &hwid,
        );

        let request = VerificationRequest {
            key: key.to_string(),
            app_name: self.config.app_name.clone(),
            nonce: nonce.clone(),
            timestamp,
            client_signature: signature,
            hwid,
        };

        debug!(app = %request.app_name, "sending verification request");
        let reply = self.transport.send(&request).await?;

        if reply.status >= 500 {
            return Err(VerifyError::Server {
                status: reply.status,
            });
        }

        let wire: WireResponse = serde_json::from_str(&reply.body)
            .map_err(|e| VerifyError::Protocol(format!("failed to parse response body: {e}")))?;

        // The signature covers the raw wire code and the nonce this client
        // generated for this request, so a replayed or tampered response
        // fails here before any classification happens.
        match &wire.signature {
            Some(signature) => {
                if !verify_server_signature(signature, &nonce, &self.config.secret3, &wire.code) {
                    warn!(code = %wire.code, "response signature mismatch, response discarded");
                    return Err(VerifyError::SignatureVerification(
                        "response signature does not match the expected value".to_string(),
                    ));
                }
            }
            None if !self.config.allow_unsigned => {
                warn!(code = %wire.code, "unsigned response rejected");
                return Err(VerifyError::SignatureVerification(
                    "response carries no signature".to_string(),
                ));
            }
            None => {}
        }

        let outcome = VerificationOutcome::classify(wire);
        debug!(code = %outcome.code, success = outcome.success, "response classified");

        if outcome.success {
            self.last.store(outcome.clone());
        }

        Ok(outcome)
    }

    /// Verify a key, failing on any unsuccessful outcome.
    ///
    /// Delegates to [`verify`](Verifier::verify) and maps a well-formed
    /// unsuccessful result to [`VerifyError::Unsuccessful`] carrying the
    /// authority's code and message. Signature checking is not repeated.
    pub async fn verify_strict(&self, key: &str) -> VerifyResult<VerificationOutcome> {
        let outcome = self.verify(key).await?;
        if !outcome.success {
            return Err(VerifyError::Unsuccessful {
                code: outcome.code,
                message: outcome.message,
            });
        }
        Ok(outcome)
    }

    /// Resolve the hardware fingerprint for this client.
    ///
    /// A custom fingerprint always wins; otherwise one is derived and cached
    /// when auto-generation is enabled.
    pub fn hwid(&self) -> VerifyResult<String> {
        self.hwid.hwid()
    }

    /// Override the hardware fingerprint for subsequent calls.
    pub fn set_hwid(&self, value: &str) -> VerifyResult<()> {
        self.hwid.set_hwid(value)
    }

    /// Derive (or return the memoized) machine fingerprint.
    pub fn generate_hwid(&self) -> String {
        self.hwid.generate()
    }

    /// The most recent successful verification outcome, if any.
    pub fn last_verification(&self) -> Option<VerificationOutcome> {
        self.last.last()
    }

    /// True iff a successful verification outcome is cached.
    pub fn is_authenticated(&self) -> bool {
        self.last.is_authenticated()
    }

    /// Drop the cached verification outcome.
    pub fn clear_cache(&self) {
        self.last.clear()
    }
}

/// Generate a fresh request nonce: 32 random bytes, hex encoded.
fn generate_nonce() -> String {
    let mut bytes = [0u8; NONCE_LEN];
    let mut rng = OsRng;

    // If OsRng fails here, the platform RNG is broken → hard panic is acceptable.
    rng.try_fill_bytes(&mut bytes)
        .expect("OsRng failed to generate nonce");

    hex::encode(bytes)
}
