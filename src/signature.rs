//! Dual-signature protocol primitives.
//!
//! Pure functions, no I/O. The client signs outgoing requests over a fixed
//! concatenation that interleaves the shared secrets with request material;
//! the authority signs its response over the client's nonce, which binds the
//! reply to the request that produced it and defeats replay of a stale
//! response.

use ring::constant_time::verify_slices_are_equal;
use ring::digest::{digest, SHA256};

/// SHA-256 of `data`, hex encoded.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(digest(&SHA256, data))
}

/// Compute the client signature for an outgoing verification request.
///
/// `SHA256(nonce || secret1 || key || secret2 || timestamp || secret3 || hwid)`
///
/// The concatenation order is fixed and part of the wire contract.
pub fn client_signature(
    nonce: &str,
    secret1: &str,
    key: &str,
    secret2: &str,
    timestamp: &str,
    secret3: &str,
    hwid: &str,
) -> String {
    let material = format!("{nonce}{secret1}{key}{secret2}{timestamp}{secret3}{hwid}");
    sha256_hex(material.as_bytes())
}

/// Compute the signature the authority is expected to have produced for a
/// response carrying `code`, bound to the `nonce` the client generated for
/// that request.
///
/// `SHA256(nonce || secret3 || code)`
pub fn expected_server_signature(nonce: &str, secret3: &str, code: &str) -> String {
    let material = format!("{nonce}{secret3}{code}");
    sha256_hex(material.as_bytes())
}

/// Check a response signature against the expected value.
///
/// The comparison is constant-time so the check leaks no information about
/// how many leading characters matched.
pub fn verify_server_signature(signature: &str, nonce: &str, secret3: &str, code: &str) -> bool {
    let expected = expected_server_signature(nonce, secret3, code);
    verify_slices_are_equal(signature.as_bytes(), expected.as_bytes()).is_ok()
}
