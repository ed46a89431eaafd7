// crates/guest-gate-http/src/middleware.rs
// ============================================================================
// Module: Policy Middleware
// Description: axum middleware enforcing a named authorization policy.
// Purpose: Turn authorization decisions into 401/403/500 responses.
// Dependencies: guest-gate-core, axum
// ============================================================================

//! ## Overview
//! [`require_policy`] layers [`enforce_policy`] onto a router. The middleware
//! reads the [`Principal`] inserted by the upstream authentication layer and
//! asks the shared [`AuthorizationService`] for a decision before the inner
//! handler runs.
//!
//! ## Invariants
//! - A request without a principal never reaches the inner handler.
//! - An unknown policy is a host misconfiguration and fails closed with `500`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::Request;
use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::middleware::from_fn_with_state;
use axum::response::IntoResponse;
use axum::response::Response;
use guest_gate_core::AuthorizationError;
use guest_gate_core::AuthorizationService;
use guest_gate_core::Principal;

use crate::server::ErrorBody;

// ============================================================================
// SECTION: Guard
// ============================================================================

/// Middleware state: the shared service and the policy to enforce.
#[derive(Clone)]
pub struct PolicyGuard {
    /// Shared authorization service.
    service: Arc<AuthorizationService>,
    /// Policy evaluated for every request.
    policy: String,
}

impl PolicyGuard {
    /// Creates a guard for `policy`.
    #[must_use]
    pub fn new(service: Arc<AuthorizationService>, policy: impl Into<String>) -> Self {
        Self {
            service,
            policy: policy.into(),
        }
    }

    /// Returns the enforced policy name.
    #[must_use]
    pub fn policy(&self) -> &str {
        &self.policy
    }
}

/// Wraps every route of `router` with a check of `policy`.
///
/// Routes added after this call are not guarded.
pub fn require_policy<S>(
    router: Router<S>,
    service: Arc<AuthorizationService>,
    policy: impl Into<String>,
) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.route_layer(from_fn_with_state(PolicyGuard::new(service, policy), enforce_policy))
}

/// Authorizes the request principal before calling the next handler.
pub async fn enforce_policy(
    State(guard): State<PolicyGuard>,
    request: Request,
    next: Next,
) -> Response {
    let Some(principal) = request.extensions().get::<Principal>() else {
        return reject(StatusCode::UNAUTHORIZED, "unauthenticated", "missing principal");
    };
    match guard.service.authorize(&guard.policy, Some(principal)) {
        Ok(decision) if decision.allowed => next.run(request).await,
        Ok(decision) => reject(StatusCode::FORBIDDEN, "forbidden", decision.reason),
        Err(AuthorizationError::UnknownPolicy(name)) => reject(
            StatusCode::INTERNAL_SERVER_ERROR,
            "policy_misconfigured",
            format!("unknown policy: {name}"),
        ),
        Err(err) => {
            reject(StatusCode::INTERNAL_SERVER_ERROR, "policy_misconfigured", err.to_string())
        }
    }
}

/// Builds a JSON rejection response.
fn reject(status: StatusCode, error: &'static str, reason: impl Into<String>) -> Response {
    (status, Json(ErrorBody::new(error, reason))).into_response()
}
