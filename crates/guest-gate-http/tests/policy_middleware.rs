// crates/guest-gate-http/tests/policy_middleware.rs
// ============================================================================
// Module: Policy Middleware Tests
// Description: Exercise require_policy around a protected route.
// Purpose: Ensure guests and unauthenticated callers never reach the handler.
// ============================================================================

//! Policy middleware tests.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions use unwrap for clarity."
)]

mod support;

use axum::Router;
use axum::body::Body;
use axum::http::Request;
use axum::http::StatusCode;
use axum::routing::get;
use guest_gate_core::Principal;
use guest_gate_http::require_policy;

fn protected(policy: &str) -> Router {
    let routes = Router::new().route("/reports", get(|| async { "secret" }));
    require_policy(routes, support::service(), policy)
}

fn request(principal: Option<Principal>) -> Request<Body> {
    let mut request = Request::builder().uri("/reports").body(Body::empty()).unwrap();
    if let Some(principal) = principal {
        request.extensions_mut().insert(principal);
    }
    request
}

#[tokio::test]
async fn member_reaches_handler() {
    let (status, body) =
        support::send(protected(support::POLICY), request(Some(support::member()))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"secret");
}

#[tokio::test]
async fn guest_is_forbidden() {
    let (status, error) =
        support::send_json(protected(support::POLICY), request(Some(support::guest()))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error["error"], "forbidden");
    assert_eq!(error["reason"], "deny_guests: federated_identity_provider");
}

#[tokio::test]
async fn missing_principal_is_unauthorized() {
    let (status, error) = support::send_json(protected(support::POLICY), request(None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error["error"], "unauthenticated");
}

#[tokio::test]
async fn principal_without_claims_is_forbidden() {
    let (status, _) =
        support::send_json(protected(support::POLICY), request(Some(Principal::anonymous())))
            .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn unknown_policy_fails_closed() {
    let (status, error) =
        support::send_json(protected("missing_policy"), request(Some(support::member()))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error["error"], "policy_misconfigured");
}
