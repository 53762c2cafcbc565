//! Response types for the verification protocol.
//!
//! These types model the authority's JSON reply and the normalized outcome
//! handed to the embedding application.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status codes returned by the verification authority.
///
/// Unrecognized codes deserialize to [`ResponseCode::Unknown`] so newer
/// authority versions cannot break older clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseCode {
    /// Key exists and is valid.
    KeyValid,
    /// Key is valid and was activated by this request.
    KeyActivated,
    /// Key does not exist.
    KeyNotFound,
    /// Key has expired.
    KeyExpired,
    /// Key was revoked.
    KeyRevoked,
    /// Key is administratively disabled.
    KeyDisabled,
    /// Key is bound to different hardware.
    HwidMismatch,
    /// The key's owner is banned.
    UserBanned,
    /// Key belongs to a different application.
    ProjectMismatch,
    /// The authority rejected the client signature.
    SignatureInvalid,
    /// The request timestamp fell outside the accepted window.
    TimestampExpired,
    /// The authority failed internally.
    ServerError,
    /// Unrecognized code (forward compatibility).
    #[serde(other)]
    Unknown,
}

impl ResponseCode {
    /// Parse a wire code string. Unrecognized input maps to `Unknown`.
    pub fn from_wire(code: &str) -> Self {
        match code {
            "KEY_VALID" => ResponseCode::KeyValid,
            "KEY_ACTIVATED" => ResponseCode::KeyActivated,
            "KEY_NOT_FOUND" => ResponseCode::KeyNotFound,
            "KEY_EXPIRED" => ResponseCode::KeyExpired,
            "KEY_REVOKED" => ResponseCode::KeyRevoked,
            "KEY_DISABLED" => ResponseCode::KeyDisabled,
            "HWID_MISMATCH" => ResponseCode::HwidMismatch,
            "USER_BANNED" => ResponseCode::UserBanned,
            "PROJECT_MISMATCH" => ResponseCode::ProjectMismatch,
            "SIGNATURE_INVALID" => ResponseCode::SignatureInvalid,
            "TIMESTAMP_EXPIRED" => ResponseCode::TimestampExpired,
            "SERVER_ERROR" => ResponseCode::ServerError,
            _ => ResponseCode::Unknown,
        }
    }

    /// The wire representation of this code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseCode::KeyValid => "KEY_VALID",
            ResponseCode::KeyActivated => "KEY_ACTIVATED",
            ResponseCode::KeyNotFound => "KEY_NOT_FOUND",
            ResponseCode::KeyExpired => "KEY_EXPIRED",
            ResponseCode::KeyRevoked => "KEY_REVOKED",
            ResponseCode::KeyDisabled => "KEY_DISABLED",
            ResponseCode::HwidMismatch => "HWID_MISMATCH",
            ResponseCode::UserBanned => "USER_BANNED",
            ResponseCode::ProjectMismatch => "PROJECT_MISMATCH",
            ResponseCode::SignatureInvalid => "SIGNATURE_INVALID",
            ResponseCode::TimestampExpired => "TIMESTAMP_EXPIRED",
            ResponseCode::ServerError => "SERVER_ERROR",
            ResponseCode::Unknown => "UNKNOWN",
        }
    }

    /// Returns true for the codes that map to a successful verification.
    pub fn is_success(&self) -> bool {
        matches!(self, ResponseCode::KeyValid | ResponseCode::KeyActivated)
    }

    /// Returns a default human-readable message for this code.
    pub fn default_message(&self) -> &'static str {
        match self {
            ResponseCode::KeyValid => "Key is valid",
            ResponseCode::KeyActivated => "Key activated",
            ResponseCode::KeyNotFound => "Key not found",
            ResponseCode::KeyExpired => "Key has expired",
            ResponseCode::KeyRevoked => "Key has been revoked",
            ResponseCode::KeyDisabled => "Key is disabled",
            ResponseCode::HwidMismatch => "Hardware ID does not match",
            ResponseCode::UserBanned => "User is banned",
            ResponseCode::ProjectMismatch => "Key belongs to a different application",
            ResponseCode::SignatureInvalid => "Request signature rejected",
            ResponseCode::TimestampExpired => "Request timestamp expired",
            ResponseCode::ServerError => "Authority internal error",
            ResponseCode::Unknown => "Unknown response code",
        }
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// License details attached to a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyData {
    /// Key expiration time (ISO 8601).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,

    /// When the key was activated (ISO 8601).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activated_at: Option<String>,

    /// Free-form note attached to the key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Application details attached to a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppData {
    /// Latest application version known to the authority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Optional structured payload of a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<KeyData>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app: Option<AppData>,
}

/// Raw authority response, as received on the wire.
///
/// The code is kept as a string here: the response signature covers the
/// literal wire bytes, so verification must run against the raw value
/// before any enum mapping.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WireResponse {
    pub code: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub data: Option<ResponseData>,
}

/// Normalized verification outcome.
///
/// Produced by [`Verifier::verify`](crate::client::verifier::Verifier::verify)
/// after response validation; the most recent successful outcome is also
/// retained by the owning client instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationOutcome {
    /// Whether the key verified successfully.
    pub success: bool,
    /// Authority status code.
    pub code: ResponseCode,
    /// Authority message, or a default for the code.
    pub message: String,
    /// Response signature, when the authority sent one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    /// True iff the key was activated by this request.
    pub is_activated: bool,
    /// True for `KEY_VALID` and `KEY_ACTIVATED`.
    pub is_valid: bool,
    /// Client-side capture time (RFC 3339).
    pub timestamp: String,
    /// Structured response payload, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ResponseData>,
}

impl VerificationOutcome {
    /// Classify a wire response into a normalized outcome.
    ///
    /// Runs only after signature validation has accepted the response.
    pub(crate) fn classify(wire: WireResponse) -> Self {
        let code = ResponseCode::from_wire(&wire.code);
        let is_activated = code == ResponseCode::KeyActivated;
        let is_valid = code.is_success();

        let message = if wire.message.is_empty() {
            code.default_message().to_string()
        } else {
            wire.message
        };

        Self {
            success: is_valid,
            code,
            message,
            signature: wire.signature,
            is_activated,
            is_valid,
            timestamp: Utc::now().to_rfc3339(),
            data: wire.data,
        }
    }

    /// Key expiration time, when the authority reported one.
    pub fn expires_at(&self) -> Option<&str> {
        self.data
            .as_ref()
            .and_then(|d| d.key.as_ref())
            .and_then(|k| k.expires_at.as_deref())
    }

    /// Latest application version, when the authority reported one.
    pub fn app_version(&self) -> Option<&str> {
        self.data
            .as_ref()
            .and_then(|d| d.app.as_ref())
            .and_then(|a| a.version.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_wire_response() {
        let json = r#"{
            "code": "KEY_VALID",
            "message": "License key is valid",
            "signature": "deadbeef",
            "data": {
                "key": {
                    "expiresAt": "2026-12-31T23:59:59Z",
                    "activatedAt": "2026-01-01T00:00:00Z",
                    "note": "internal build"
                },
                "app": {
                    "version": "2.4.0"
                }
            }
        }"#;

        let wire: WireResponse = serde_json::from_str(json).unwrap();
        assert_eq!(wire.code, "KEY_VALID");
        assert_eq!(wire.signature.as_deref(), Some("deadbeef"));

        let data = wire.data.as_ref().unwrap();
        let key = data.key.as_ref().unwrap();
        assert_eq!(key.expires_at.as_deref(), Some("2026-12-31T23:59:59Z"));
        assert_eq!(key.note.as_deref(), Some("internal build"));
        assert_eq!(
            data.app.as_ref().unwrap().version.as_deref(),
            Some("2.4.0")
        );
    }

    #[test]
    fn parse_minimal_wire_response() {
        let json = r#"{"code": "KEY_EXPIRED"}"#;

        let wire: WireResponse = serde_json::from_str(json).unwrap();
        assert_eq!(wire.code, "KEY_EXPIRED");
        assert!(wire.message.is_empty());
        assert!(wire.signature.is_none());
        assert!(wire.data.is_none());
    }

    #[test]
    fn unknown_code_maps_to_unknown() {
        assert_eq!(
            ResponseCode::from_wire("SOME_FUTURE_CODE"),
            ResponseCode::Unknown
        );

        let parsed: ResponseCode = serde_json::from_str(r#""SOME_FUTURE_CODE""#).unwrap();
        assert_eq!(parsed, ResponseCode::Unknown);
    }

    #[test]
    fn code_round_trips_through_wire_form() {
        for code in [
            ResponseCode::KeyValid,
            ResponseCode::KeyActivated,
            ResponseCode::KeyNotFound,
            ResponseCode::HwidMismatch,
            ResponseCode::TimestampExpired,
        ] {
            assert_eq!(ResponseCode::from_wire(code.as_str()), code);
        }
    }

    #[test]
    fn success_predicate_covers_exactly_two_codes() {
        assert!(ResponseCode::KeyValid.is_success());
        assert!(ResponseCode::KeyActivated.is_success());

        for code in [
            ResponseCode::KeyNotFound,
            ResponseCode::KeyExpired,
            ResponseCode::KeyRevoked,
            ResponseCode::KeyDisabled,
            ResponseCode::HwidMismatch,
            ResponseCode::UserBanned,
            ResponseCode::ProjectMismatch,
            ResponseCode::SignatureInvalid,
            ResponseCode::TimestampExpired,
            ResponseCode::ServerError,
            ResponseCode::Unknown,
        ] {
            assert!(!code.is_success(), "{code} must not map to success");
        }
    }

    #[test]
    fn classify_key_valid() {
        let wire: WireResponse =
            serde_json::from_str(r#"{"code": "KEY_VALID", "message": "ok"}"#).unwrap();
        let outcome = VerificationOutcome::classify(wire);

        assert!(outcome.success);
        assert!(outcome.is_valid);
        assert!(!outcome.is_activated);
        assert_eq!(outcome.code, ResponseCode::KeyValid);
        assert_eq!(outcome.message, "ok");
    }

    #[test]
    fn classify_key_activated() {
        let wire: WireResponse =
            serde_json::from_str(r#"{"code": "KEY_ACTIVATED"}"#).unwrap();
        let outcome = VerificationOutcome::classify(wire);

        assert!(outcome.success);
        assert!(outcome.is_valid);
        assert!(outcome.is_activated);
        // Empty wire message falls back to the code's default.
        assert_eq!(outcome.message, "Key activated");
    }

    #[test]
    fn classify_failure_code() {
        let wire: WireResponse =
            serde_json::from_str(r#"{"code": "USER_BANNED", "message": "Account banned"}"#)
                .unwrap();
        let outcome = VerificationOutcome::classify(wire);

        assert!(!outcome.success);
        assert!(!outcome.is_valid);
        assert!(!outcome.is_activated);
        assert_eq!(outcome.code, ResponseCode::UserBanned);
        assert_eq!(outcome.message, "Account banned");
    }

    #[test]
    fn outcome_data_accessors() {
        let wire: WireResponse = serde_json::from_str(
            r#"{
                "code": "KEY_VALID",
                "data": {
                    "key": {"expiresAt": "2026-06-01T00:00:00Z"},
                    "app": {"version": "1.9.2"}
                }
            }"#,
        )
        .unwrap();
        let outcome = VerificationOutcome::classify(wire);

        assert_eq!(outcome.expires_at(), Some("2026-06-01T00:00:00Z"));
        assert_eq!(outcome.app_version(), Some("1.9.2"));
    }
}
