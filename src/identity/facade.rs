//! Tool-facing view of the identity client
//!
//! Tool handlers receive an `Arc<dyn IdentityOperations>`. The concrete
//! `ToolClient` wraps the credentialed `SailPointApi` and forwards only the
//! three identity operations, so nothing on the tool side can reach the
//! credentials, the token, or authentication itself.
//!
//! The wrapped client is private:
//!
//! ```compile_fail
//! # async fn probe(client: support_bot::identity::ToolClient) {
//! let _api = client.api;
//! # }
//! ```
//!
//! and authentication is not part of the facade:
//!
//! ```compile_fail
//! # async fn probe(client: support_bot::identity::ToolClient) {
//! client.authenticate().await;
//! # }
//! ```

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use super::client::SailPointApi;
use super::types::OperationResult;

/// The identity operations tools are allowed to perform
#[async_trait]
pub trait IdentityOperations: Send + Sync {
    /// Base URL of the identity system, for display
    fn base_url(&self) -> &str;

    async fn trigger_refresh(&self, user_id: &str) -> OperationResult;

    async fn get_request_status(&self, request_id: &str) -> OperationResult;

    async fn get_identity(&self, user_id: &str) -> OperationResult;
}

/// Capability-restricted wrapper around `SailPointApi`
#[derive(Clone)]
pub struct ToolClient {
    api: Arc<SailPointApi>,
}

impl ToolClient {
    pub fn new(api: Arc<SailPointApi>) -> Self {
        Self { api }
    }
}

impl fmt::Debug for ToolClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolClient")
            .field("base_url", &self.api.base_url())
            .finish()
    }
}

#[async_trait]
impl IdentityOperations for ToolClient {
    fn base_url(&self) -> &str {
        self.api.base_url()
    }

    async fn trigger_refresh(&self, user_id: &str) -> OperationResult {
        self.api.trigger_refresh(user_id).await
    }

    async fn get_request_status(&self, request_id: &str) -> OperationResult {
        self.api.get_request_status(request_id).await
    }

    async fn get_identity(&self, user_id: &str) -> OperationResult {
        self.api.get_identity(user_id).await
    }
}

/// Stand-in used when no IdentityIQ credentials are configured
///
/// Every operation fails with a fixed message and no network call.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredIdentity;

pub const NOT_CONFIGURED_MESSAGE: &str = "SailPoint API not configured";

#[async_trait]
impl IdentityOperations for UnconfiguredIdentity {
    fn base_url(&self) -> &str {
        ""
    }

    async fn trigger_refresh(&self, user_id: &str) -> OperationResult {
        OperationResult::failure(NOT_CONFIGURED_MESSAGE)
            .with_user_id(user_id)
            .stamped()
    }

    async fn get_request_status(&self, request_id: &str) -> OperationResult {
        OperationResult::failure(NOT_CONFIGURED_MESSAGE).with_request_id(request_id)
    }

    async fn get_identity(&self, user_id: &str) -> OperationResult {
        OperationResult::failure(NOT_CONFIGURED_MESSAGE).with_user_id(user_id)
    }
}
