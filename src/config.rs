//! Configuration for the Argus verification client.
//!
//! The configuration is supplied programmatically by the embedding
//! application and validated once, at client construction. Validation
//! failures name the offending field; a constructed client never revisits
//! its configuration.

use crate::errors::{VerifyError, VerifyResult};

/// Default production verification endpoint.
pub const DEFAULT_API_URL: &str = "https://api.argusguard.io";

/// Required length of each shared secret, in characters.
pub const SECRET_LEN: usize = 64;

/// Client configuration.
///
/// Build with [`VerifierConfig::new`] and the `with_*` methods, then hand it
/// to [`Verifier::new`](crate::client::verifier::Verifier::new), which runs
/// [`validate`](VerifierConfig::validate).
#[derive(Debug, Clone)]
pub struct VerifierConfig {
    /// Application name registered with the authority.
    pub app_name: String,
    /// First shared secret (exactly 64 characters).
    pub secret1: String,
    /// Second shared secret (exactly 64 characters).
    pub secret2: String,
    /// Third shared secret (exactly 64 characters). Also signs responses.
    pub secret3: String,
    /// Base URL of the verification authority.
    pub api_url: String,
    /// Derive a hardware fingerprint automatically when none is set.
    pub auto_hwid: bool,
    /// Explicit hardware fingerprint override.
    pub custom_hwid: Option<String>,
    /// Verify the authority's TLS certificate.
    pub strict_ssl: bool,
    /// Accept responses that carry no signature field.
    ///
    /// Off by default: an unsigned response cannot be authenticated and is
    /// rejected. Enable only for authorities that genuinely do not sign.
    pub allow_unsigned: bool,
}

impl VerifierConfig {
    /// Create a configuration with the required fields and default options.
    pub fn new(
        app_name: impl Into<String>,
        secret1: impl Into<String>,
        secret2: impl Into<String>,
        secret3: impl Into<String>,
    ) -> Self {
        Self {
            app_name: app_name.into(),
            secret1: secret1.into(),
            secret2: secret2.into(),
            secret3: secret3.into(),
            api_url: DEFAULT_API_URL.to_string(),
            auto_hwid: true,
            custom_hwid: None,
            strict_ssl: true,
            allow_unsigned: false,
        }
    }

    /// Override the authority base URL. A trailing slash is trimmed.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.api_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Enable or disable automatic hardware fingerprint derivation.
    pub fn with_auto_hwid(mut self, auto: bool) -> Self {
        self.auto_hwid = auto;
        self
    }

    /// Set an explicit hardware fingerprint override.
    pub fn with_custom_hwid(mut self, hwid: impl Into<String>) -> Self {
        self.custom_hwid = Some(hwid.into());
        self
    }

    /// Enable or disable TLS certificate verification.
    pub fn with_strict_ssl(mut self, strict: bool) -> Self {
        self.strict_ssl = strict;
        self
    }

    /// Accept responses without a signature field.
    pub fn with_allow_unsigned(mut self, allow: bool) -> Self {
        self.allow_unsigned = allow;
        self
    }

    /// Validate the configuration.
    ///
    /// Fails with [`VerifyError::Configuration`] naming the offending field
    /// when `app_name` is empty, any secret is missing, or any secret is not
    /// exactly 64 characters long. Character class is not restricted.
    pub fn validate(&self) -> VerifyResult<()> {
        if self.app_name.trim().is_empty() {
            return Err(VerifyError::Configuration {
                field: "app_name",
                message: "must be a non-empty string".to_string(),
            });
        }

        Self::check_secret("secret1", &self.secret1)?;
        Self::check_secret("secret2", &self.secret2)?;
        Self::check_secret("secret3", &self.secret3)?;

        if self.api_url.is_empty() {
            return Err(VerifyError::Configuration {
                field: "api_url",
                message: "must be a non-empty base URL".to_string(),
            });
        }

        Ok(())
    }

    fn check_secret(field: &'static str, value: &str) -> VerifyResult<()> {
        if value.is_empty() {
            return Err(VerifyError::Configuration {
                field,
                message: "is missing or empty".to_string(),
            });
        }

        // Counted as characters, not bytes: any character class is allowed.
        let len = value.chars().count();
        if len != SECRET_LEN {
            return Err(VerifyError::Configuration {
                field,
                message: format!("must be exactly {SECRET_LEN} characters, got {len}"),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(c: char) -> String {
        std::iter::repeat(c).take(SECRET_LEN).collect()
    }

    fn valid_config() -> VerifierConfig {
        VerifierConfig::new("Test", secret('a'), secret('b'), secret('c'))
    }

    #[test]
    fn defaults_applied() {
        let config = valid_config();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert!(config.auto_hwid);
        assert!(config.strict_ssl);
        assert!(!config.allow_unsigned);
        assert!(config.custom_hwid.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_app_name_rejected() {
        let config = VerifierConfig::new("", secret('a'), secret('b'), secret('c'));
        match config.validate() {
            Err(VerifyError::Configuration { field, .. }) => assert_eq!(field, "app_name"),
            other => panic!("expected configuration error, got {other:?}"),
        }
    }

    #[test]
    fn missing_secret_names_field() {
        let config = VerifierConfig::new("Test", secret('a'), "", secret('c'));
        match config.validate() {
            Err(VerifyError::Configuration { field, .. }) => assert_eq!(field, "secret2"),
            other => panic!("expected configuration error, got {other:?}"),
        }
    }

    #[test]
    fn secret_length_off_by_one_rejected() {
        let short: String = std::iter::repeat('x').take(63).collect();
        let long: String = std::iter::repeat('x').take(65).collect();

        let config = VerifierConfig::new("Test", short, secret('b'), secret('c'));
        match config.validate() {
            Err(VerifyError::Configuration { field, .. }) => assert_eq!(field, "secret1"),
            other => panic!("expected configuration error, got {other:?}"),
        }

        let config = VerifierConfig::new("Test", secret('a'), secret('b'), long);
        match config.validate() {
            Err(VerifyError::Configuration { field, .. }) => assert_eq!(field, "secret3"),
            other => panic!("expected configuration error, got {other:?}"),
        }
    }

    #[test]
    fn mixed_symbol_secret_accepted() {
        // 64 characters drawn from several character classes.
        let mixed = "aB3!x9@Z$%^&*()_+-=[]{}|;:,.<>?/~`qwErtyUIop4567890AbCdEfGhIjKlM";
        assert_eq!(mixed.chars().count(), SECRET_LEN);

        let config = VerifierConfig::new("Test", mixed, secret('b'), secret('c'));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn secret_length_counts_characters_not_bytes() {
        // 64 two-byte characters: valid by character count.
        let wide: String = std::iter::repeat('ß').take(SECRET_LEN).collect();
        assert_eq!(wide.len(), SECRET_LEN * 2);

        let config = VerifierConfig::new("Test", wide, secret('b'), secret('c'));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn api_url_trailing_slash_trimmed() {
        let config = valid_config().with_api_url("https://auth.example.com/");
        assert_eq!(config.api_url, "https://auth.example.com");
    }
}
