//! HTTP seam between the identity client and IdentityIQ

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::error::IdentityError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// An outbound request to IdentityIQ
///
/// `authorization` is the complete header value (`Basic ...` or `Bearer ...`)
/// and is redacted from `Debug`.
#[derive(Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub authorization: String,
    pub content_type: &'static str,
    pub body: String,
}

impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scheme = self.authorization.split(' ').next().unwrap_or_default();
        f.debug_struct("HttpRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("authorization", &format_args!("{scheme} <redacted>"))
            .field("content_type", &self.content_type)
            .field("body_len", &self.body.len())
            .finish()
    }
}

/// Status and body of an IdentityIQ response
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Sends identity requests over the wire
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send one request; any HTTP status is a successful send
    ///
    /// # Errors
    ///
    /// Only transport-level failures (DNS, connect, TLS, body read).
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, IdentityError>;
}

/// `reqwest`-backed transport used in production
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a transport with the same connect timeout the LLM clients use
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::Client` if the TLS backend cannot initialize.
    pub fn new() -> Result<Self, IdentityError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| IdentityError::Client(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, IdentityError> {
        let builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };

        let response = builder
            .header(reqwest::header::AUTHORIZATION, request.authorization)
            .header(reqwest::header::CONTENT_TYPE, request.content_type)
            .body(request.body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }
}
