//! Credentialed IdentityIQ client
//!
//! `SailPointApi` is the only place that holds the OAuth2 client credentials
//! and the bearer token. Authentication is private to this module: callers get
//! the identity operations, which authenticate lazily and retry once on 401.

use std::fmt;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::Url;
use serde_json::Value;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, warn};

use super::error::IdentityError;
use super::transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use super::types::{IdentityCredentials, OperationResult, RefreshAck};

const TOKEN_PATH: &str = "/identityiq/oauth2/token";
const REFRESH_PATH: &str = "/identityiq/plugin/rest/RefreshIdentity/refreshIdentitySingleUser";

pub const PLACEHOLDER_MESSAGE: &str = "This is a placeholder - API endpoint not yet configured";
const REQUEST_STATUS_NOTE: &str =
    "check_request_status is a dummy tool - no SailPoint API URL available";
const IDENTITY_NOTE: &str = "get_identity_info is a dummy tool - no SailPoint API URL available";

/// Bearer token issued by the IdentityIQ token endpoint
#[derive(Clone, PartialEq, Eq)]
struct AccessToken(String);

impl AccessToken {
    fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// IdentityIQ API client with OAuth 2.0 client-credentials authentication
pub struct SailPointApi {
    base_url: String,
    credentials: IdentityCredentials,
    transport: Arc<dyn HttpTransport>,
    token: RwLock<Option<AccessToken>>,
    /// Serializes token acquisition so concurrent 401s share one re-auth
    auth_lock: Mutex<()>,
}

impl SailPointApi {
    /// Build the client and perform the initial authentication.
    ///
    /// A failed authentication is logged, not returned: the client comes back
    /// without a token and authenticates again on first use.
    pub async fn connect(credentials: IdentityCredentials, transport: Arc<dyn HttpTransport>) -> Self {
        let api = Self {
            base_url: credentials.base_url.trim_end_matches('/').to_string(),
            credentials,
            transport,
            token: RwLock::new(None),
            auth_lock: Mutex::new(()),
        };

        let client_id_prefix: String = api.credentials.client_id.chars().take(10).collect();
        info!(
            base_url = %api.base_url,
            client_id = %format!("{client_id_prefix}..."),
            "initializing SailPoint API client"
        );

        api.authenticate().await;
        api
    }

    /// IdentityIQ base URL (no trailing slash)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether a bearer token is currently held
    pub async fn is_authenticated(&self) -> bool {
        self.token.read().await.is_some()
    }

    /// Trigger an identity refresh for a single user.
    ///
    /// Never fails: transport errors and error statuses come back as a
    /// failure `OperationResult`. A 401 is answered with exactly one
    /// re-authentication and one retry.
    pub async fn trigger_refresh(&self, user_id: &str) -> OperationResult {
        info!(user_id, "triggering identity refresh");

        let url = match self.refresh_url(user_id) {
            Ok(url) => url,
            Err(e) => {
                error!(user_id, error = %e, "cannot build refresh URL");
                return OperationResult::failure(e.to_string())
                    .with_user_id(user_id)
                    .stamped();
            }
        };

        let token = match self.current_token().await {
            Some(token) => token,
            None => {
                info!("no access token held, authenticating");
                match self.authenticate_replacing(None).await {
                    Some(token) => token,
                    None => {
                        return OperationResult::failure(
                            "Authentication failed: no access token available",
                        )
                        .with_user_id(user_id)
                        .stamped();
                    }
                }
            }
        };

        info!(user_id, endpoint = %url, "calling SailPoint identity refresh");
        let response = match self.get(&url, &token).await {
            Ok(response) => response,
            Err(e) => return transport_failure(user_id, e),
        };
        info!(user_id, status = response.status, "SailPoint refresh responded");

        match response.status {
            200 => refresh_succeeded(user_id, &url, &response.body),
            401 => {
                warn!(user_id, "401 Unauthorized - refreshing token and retrying");
                let Some(fresh) = self.authenticate_replacing(Some(&token)).await else {
                    return OperationResult::failure(format!(
                        "Authentication failed: {}",
                        response.status
                    ))
                    .with_user_id(user_id)
                    .with_error_details(response.body)
                    .stamped();
                };

                match self.get(&url, &fresh).await {
                    Ok(retry) if retry.status == 200 => {
                        debug!(user_id, "refresh succeeded on retry");
                        refresh_succeeded(user_id, &url, &retry.body)
                    }
                    Ok(retry) => {
                        error!(user_id, status = retry.status, body = %retry.body, "refresh retry failed");
                        OperationResult::failure(format!("Authentication failed: {}", retry.status))
                            .with_user_id(user_id)
                            .with_error_details(retry.body)
                            .stamped()
                    }
                    Err(e) => transport_failure(user_id, e),
                }
            }
            status => {
                error!(user_id, status, body = %response.body, "SailPoint API error");
                OperationResult::failure(format!("API error: {status}"))
                    .with_user_id(user_id)
                    .with_error_details(response.body)
                    .stamped()
            }
        }
    }

    /// Check an access request's status (no backing endpoint yet)
    pub async fn get_request_status(&self, request_id: &str) -> OperationResult {
        info!(request_id, "get_request_status (placeholder)");
        OperationResult::failure(PLACEHOLDER_MESSAGE)
            .with_request_id(request_id)
            .with_note(REQUEST_STATUS_NOTE)
    }

    /// Look up identity details (no backing endpoint yet)
    pub async fn get_identity(&self, user_id: &str) -> OperationResult {
        info!(user_id, "get_identity (placeholder)");
        OperationResult::failure(PLACEHOLDER_MESSAGE)
            .with_user_id(user_id)
            .with_note(IDENTITY_NOTE)
    }

    fn token_url(&self) -> String {
        format!("{}{}?grant_type=client_credentials", self.base_url, TOKEN_PATH)
    }

    fn refresh_url(&self, user_id: &str) -> Result<String, IdentityError> {
        let endpoint = format!("{}{}", self.base_url, REFRESH_PATH);
        Url::parse_with_params(&endpoint, &[("userId", user_id)])
            .map(String::from)
            .map_err(|e| IdentityError::InvalidUrl(format!("{endpoint}: {e}")))
    }

    async fn current_token(&self) -> Option<AccessToken> {
        self.token.read().await.clone()
    }

    /// Unconditionally fetch a new token
    async fn authenticate(&self) -> Option<AccessToken> {
        let _guard = self.auth_lock.lock().await;
        self.fetch_and_store_token().await
    }

    /// Fetch a new token unless someone else already replaced `stale`.
    ///
    /// With `stale = None` any held token is reused.
    async fn authenticate_replacing(&self, stale: Option<&AccessToken>) -> Option<AccessToken> {
        let _guard = self.auth_lock.lock().await;
        if let Some(current) = self.current_token().await {
            if Some(&current) != stale {
                debug!("token already replaced by a concurrent request");
                return Some(current);
            }
        }
        self.fetch_and_store_token().await
    }

    /// Caller must hold `auth_lock`
    async fn fetch_and_store_token(&self) -> Option<AccessToken> {
        info!("requesting OAuth token");
        let token = match self.request_token().await {
            Ok(token) => {
                info!("OAuth token obtained");
                Some(token)
            }
            Err(reason) => {
                error!(%reason, "OAuth token request failed");
                None
            }
        };
        *self.token.write().await = token.clone();
        token
    }

    async fn request_token(&self) -> Result<AccessToken, String> {
        let credentials = format!(
            "{}:{}",
            self.credentials.client_id,
            self.credentials.client_secret.expose()
        );
        let request = HttpRequest {
            method: HttpMethod::Post,
            url: self.token_url(),
            authorization: format!("Basic {}", BASE64.encode(credentials)),
            content_type: "application/x-www-form-urlencoded",
            body: String::new(),
        };

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| e.to_string())?;
        if response.status != 200 {
            return Err(format!("token endpoint returned {}", response.status));
        }

        let body: Value = serde_json::from_str(&response.body)
            .map_err(|e| format!("unreadable token response: {e}"))?;
        body.get("access_token")
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .map(|token| AccessToken(token.to_string()))
            .ok_or_else(|| "token response has no access_token".to_string())
    }

    async fn get(&self, url: &str, token: &AccessToken) -> Result<HttpResponse, IdentityError> {
        self.transport
            .send(HttpRequest {
                method: HttpMethod::Get,
                url: url.to_string(),
                authorization: token.bearer(),
                content_type: "application/json",
                body: String::new(),
            })
            .await
    }
}

impl fmt::Debug for SailPointApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SailPointApi")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Map a 200 refresh body into a result
fn refresh_succeeded(user_id: &str, url: &str, body: &str) -> OperationResult {
    let payload = match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(payload)) => payload,
        Ok(other) => {
            error!(user_id, %other, "refresh response is not a JSON object");
            return OperationResult::failure("Unexpected SailPoint response: expected a JSON object")
                .with_user_id(user_id)
                .with_error_details(body)
                .stamped();
        }
        Err(e) => {
            error!(user_id, error = %e, "refresh response is not JSON");
            return OperationResult::failure(e.to_string())
                .with_user_id(user_id)
                .with_error_details(body)
                .stamped();
        }
    };
    debug!(user_id, payload = %serde_json::Value::Object(payload.clone()), "SailPoint returned data");

    let ack = RefreshAck::from_payload(&payload);
    OperationResult {
        success: ack.is_success(),
        user_id: Some(ack.user_id.unwrap_or_else(|| user_id.to_string())),
        message: ack
            .message
            .unwrap_or_else(|| format!("Identity refresh triggered for {user_id}")),
        task_status: Some(ack.task_status.unwrap_or_else(|| "Unknown".to_string())),
        sailpoint_response: Some(payload),
        api_endpoint: Some(url.to_string()),
        ..OperationResult::default()
    }
    .stamped()
}

fn transport_failure(user_id: &str, err: IdentityError) -> OperationResult {
    error!(user_id, error = %err, "exception calling SailPoint");
    OperationResult::failure(err.to_string())
        .with_user_id(user_id)
        .stamped()
}
