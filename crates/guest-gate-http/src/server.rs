// crates/guest-gate-http/src/server.rs
// ============================================================================
// Module: Decision Server
// Description: HTTP decision endpoint, health probe, and server loop.
// Purpose: Expose tenant membership decisions over JSON for out-of-process hosts.
// Dependencies: guest-gate-core, guest-gate-config, axum, tokio
// ============================================================================

//! ## Overview
//! `POST /v1/authorize` evaluates a claims list (or a raw token payload)
//! against a named policy and returns the decision. `GET /healthz` answers
//! `ok`. The caller is trusted to have validated the token already.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use axum::routing::post;
use guest_gate_config::GuestGateConfig;
use guest_gate_core::AuthorizationError;
use guest_gate_core::AuthorizationService;
use guest_gate_core::ClaimSet;
use guest_gate_core::Principal;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tokio::net::TcpListener;

// ============================================================================
// SECTION: Wire Types
// ============================================================================

/// Decision request body.
///
/// Exactly one of `claims` or `token_payload` must be present.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthorizeRequest {
    /// Policy to evaluate.
    pub policy: String,
    /// Ordered claims of the principal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claims: Option<ClaimSet>,
    /// Decoded token payload (JSON object of claims).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_payload: Option<Value>,
}

impl AuthorizeRequest {
    /// Resolves the principal carried by the request.
    fn principal(self) -> Result<Principal, String> {
        match (self.claims, self.token_payload) {
            (Some(claims), None) => Ok(Principal::new(claims)),
            (None, Some(payload)) => ClaimSet::from_token_payload(&payload)
                .map(Principal::new)
                .map_err(|err| err.to_string()),
            (Some(_), Some(_)) => {
                Err("provide either claims or token_payload, not both".to_string())
            }
            (None, None) => Err("claims or token_payload is required".to_string()),
        }
    }
}

/// JSON error body shared by the endpoint and the middleware.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Stable error label.
    pub error: String,
    /// Human-readable reason.
    pub reason: String,
}

impl ErrorBody {
    /// Creates an error body.
    #[must_use]
    pub fn new(error: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            reason: reason.into(),
        }
    }
}

// ============================================================================
// SECTION: Router
// ============================================================================

/// Shared state for decision handlers.
#[derive(Clone)]
struct ServerState {
    /// Authorization service used for every decision.
    service: Arc<AuthorizationService>,
    /// Maximum allowed request body size.
    max_body_bytes: usize,
}

/// Builds the decision API router.
pub fn router(service: Arc<AuthorizationService>, max_body_bytes: usize) -> Router {
    let state = Arc::new(ServerState {
        service,
        max_body_bytes,
    });
    Router::new()
        .route("/healthz", get(healthz))
        .route("/v1/authorize", post(handle_authorize))
        .with_state(state)
}

/// Liveness probe.
async fn healthz() -> &'static str {
    "ok"
}

/// Handles `POST /v1/authorize`.
async fn handle_authorize(State(state): State<Arc<ServerState>>, bytes: Bytes) -> Response {
    if bytes.len() > state.max_body_bytes {
        return error_response(
            StatusCode::PAYLOAD_TOO_LARGE,
            "payload_too_large",
            "request body too large",
        );
    }
    let request: AuthorizeRequest = match serde_json::from_slice(&bytes) {
        Ok(request) => request,
        Err(err) => return error_response(StatusCode::BAD_REQUEST, "bad_request", err.to_string()),
    };
    let policy = request.policy.clone();
    let principal = match request.principal() {
        Ok(principal) => principal,
        Err(reason) => return error_response(StatusCode::BAD_REQUEST, "bad_request", reason),
    };
    match state.service.authorize(&policy, Some(&principal)) {
        Ok(decision) => (StatusCode::OK, Json(decision)).into_response(),
        Err(AuthorizationError::UnknownPolicy(name)) => error_response(
            StatusCode::NOT_FOUND,
            "unknown_policy",
            format!("unknown policy: {name}"),
        ),
        Err(err) => error_response(StatusCode::BAD_REQUEST, "bad_request", err.to_string()),
    }
}

/// Builds a JSON error response.
fn error_response(status: StatusCode, error: &'static str, reason: impl Into<String>) -> Response {
    (status, Json(ErrorBody::new(error, reason))).into_response()
}

// ============================================================================
// SECTION: Server
// ============================================================================

/// Bound decision server.
pub struct HttpServer {
    /// Listening socket.
    listener: TcpListener,
    /// Application router.
    app: Router,
}

impl HttpServer {
    /// Validates `config`, builds the service, and binds the listener.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] when the config is invalid or the bind fails.
    pub async fn bind(config: &GuestGateConfig) -> Result<Self, HttpError> {
        let service = config
            .build_authorization_service()
            .map_err(|err| HttpError::Config(err.to_string()))?;
        let addr = config.server.bind_addr().map_err(|err| HttpError::Config(err.to_string()))?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|err| HttpError::Transport(format!("http bind failed: {err}")))?;
        Ok(Self {
            listener,
            app: router(Arc::new(service), config.server.max_body_bytes),
        })
    }

    /// Returns the bound socket address.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Transport`] when the address cannot be read.
    pub fn local_addr(&self) -> Result<SocketAddr, HttpError> {
        self.listener.local_addr().map_err(|err| HttpError::Transport(err.to_string()))
    }

    /// Serves requests until the process stops.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Transport`] when the server loop fails.
    pub async fn run(self) -> Result<(), HttpError> {
        axum::serve(self.listener, self.app)
            .await
            .map_err(|err| HttpError::Transport(format!("http server failed: {err}")))
    }
}

/// Binds the configured address and serves the decision API.
///
/// # Errors
///
/// Returns [`HttpError`] when startup or the server loop fails.
pub async fn serve(config: &GuestGateConfig) -> Result<(), HttpError> {
    HttpServer::bind(config).await?.run().await
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Configuration errors.
    #[error("config error: {0}")]
    Config(String),
    /// Transport errors.
    #[error("transport error: {0}")]
    Transport(String),
}
