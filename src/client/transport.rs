//! Transport collaborator for the verification protocol.
//!
//! The client owns the protocol; the transport only moves bytes. The trait
//! exists so tests can substitute an in-process authority, and so embedding
//! applications with their own HTTP stack can plug it in.

use crate::errors::VerifyResult;

/// Path of the verification endpoint, relative to the API base URL.
pub const VERIFY_PATH: &str = "api/v1/client/verify";

/// One outgoing verification request. Built fresh per call; the nonce is
/// never reused.
#[derive(Debug, Clone)]
pub struct VerificationRequest {
    /// License key under verification.
    pub key: String,
    /// Application name registered with the authority.
    pub app_name: String,
    /// 32 random bytes, hex encoded.
    pub nonce: String,
    /// Epoch milliseconds, decimal string.
    pub timestamp: String,
    /// Client signature over the request material.
    pub client_signature: String,
    /// Hardware fingerprint.
    pub hwid: String,
}

/// Raw reply from the transport, before any protocol interpretation.
#[derive(Debug, Clone)]
pub struct TransportReply {
    pub status: u16,
    pub body: String,
}

/// Moves a verification request to the authority and returns the raw reply.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send(&self, request: &VerificationRequest) -> VerifyResult<TransportReply>;
}

/// HTTP transport over reqwest.
///
/// Sends `GET <base>/api/v1/client/verify` with the key and application name
/// as query parameters and the protocol material as headers.
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Build a transport for the given base URL.
    ///
    /// With `strict_ssl` disabled the client accepts invalid TLS
    /// certificates; that weakens transport security and is intended for
    /// development authorities only.
    pub fn new(base_url: &str, strict_ssl: bool) -> VerifyResult<Self> {
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(!strict_ssl)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: &VerificationRequest) -> VerifyResult<TransportReply> {
        let url = format!("{}/{}", self.base_url, VERIFY_PATH);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("key", request.key.as_str()),
                ("app_name", request.app_name.as_str()),
            ])
            .header("clienttime", request.timestamp.as_str())
            .header("externalsignature", request.client_signature.as_str())
            .header("clientnonce", request.nonce.as_str())
            .header("clienthwid", request.hwid.as_str())
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(TransportReply { status, body })
    }
}
