//! Shared test doubles for the HTTP-level tests

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use support_bot::dispatch::{build_registry, Dispatcher};
use support_bot::identity::{
    ClientSecret, HttpRequest, HttpResponse, HttpTransport, IdentityCredentials, IdentityError,
    SailPointApi, ToolClient,
};
use support_bot::llm::{Decision, GenerateRequest, GenerationConfig, LlmError, LlmProvider};
use support_bot::state::AppState;

pub const TOKEN_PATH: &str = "/identityiq/oauth2/token";
pub const REFRESH_PATH: &str = "refreshIdentitySingleUser";

/// IdentityIQ stand-in: token and refresh calls are answered from scripts
#[derive(Default)]
pub struct ScriptedIdentityServer {
    tokens: Mutex<VecDeque<HttpResponse>>,
    refreshes: Mutex<VecDeque<HttpResponse>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedIdentityServer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn issue_token(&self, token: &str) -> &Self {
        self.tokens.lock().unwrap().push_back(HttpResponse::new(
            200,
            format!(r#"{{"access_token":"{token}","token_type":"bearer","expires_in":3600}}"#),
        ));
        self
    }

    pub fn answer_refresh(&self, status: u16, body: &str) -> &Self {
        self.refreshes
            .lock()
            .unwrap()
            .push_back(HttpResponse::new(status, body));
        self
    }

    pub fn calls_to(&self, path: &str) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.url.contains(path))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl HttpTransport for ScriptedIdentityServer {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, IdentityError> {
        let queue = if request.url.contains(TOKEN_PATH) {
            &self.tokens
        } else {
            &self.refreshes
        };
        self.requests.lock().unwrap().push(request);
        queue
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| IdentityError::Transport("connection refused".to_string()))
    }
}

/// LLM stand-in that answers every turn with the same decision
pub struct FixedProvider {
    answer: Result<Decision, String>,
    pub requests: Arc<Mutex<Vec<GenerateRequest>>>,
}

impl FixedProvider {
    pub fn deciding(decision: Decision) -> Self {
        Self {
            answer: Ok(decision),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(body: &str) -> Self {
        Self {
            answer: Err(body.to_string()),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl LlmProvider for FixedProvider {
    async fn decide(&self, request: GenerateRequest) -> Result<Decision, LlmError> {
        self.requests.lock().unwrap().push(request);
        match &self.answer {
            Ok(decision) => Ok(decision.clone()),
            Err(body) => Err(LlmError::HttpError {
                status: 500,
                body: body.clone(),
            }),
        }
    }
}

/// Wire a real identity client over `server` to a dispatcher driven by `provider`
pub async fn app_state(
    server: &Arc<ScriptedIdentityServer>,
    provider: Option<FixedProvider>,
) -> Arc<AppState> {
    let api = SailPointApi::connect(
        IdentityCredentials::new(
            "https://iiq.example.com",
            "support-bot",
            ClientSecret::new("client-secret"),
        ),
        server.clone(),
    )
    .await;
    let registry = build_registry(Arc::new(ToolClient::new(Arc::new(api)))).unwrap();
    let tools = registry.names().into_iter().map(str::to_string).collect();

    let dispatcher = provider.map(|provider| {
        Dispatcher::new(Box::new(provider), Box::new(registry), GenerationConfig::default())
    });
    AppState::new(dispatcher, true, tools)
}
