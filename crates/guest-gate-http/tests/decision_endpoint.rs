// crates/guest-gate-http/tests/decision_endpoint.rs
// ============================================================================
// Module: Decision Endpoint Tests
// Description: Exercise /v1/authorize and /healthz in-process.
// Purpose: Pin status codes and JSON bodies of the decision API.
// ============================================================================

//! Decision endpoint tests.

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
use guest_gate_http::router;
use serde_json::Value;
use serde_json::json;
use support::POLICY;

fn app() -> Router {
    router(support::service(), 1024)
}

fn authorize(body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/v1/authorize")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn healthz_returns_ok() {
    let request = Request::builder().uri("/healthz").body(Body::empty()).unwrap();
    let (status, body) = support::send(app(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"ok");
}

#[tokio::test]
async fn member_claims_are_allowed() {
    let body = json!({
        "policy": POLICY,
        "claims": [
            { "type": "iss", "value": "https://sts.windows.net/T/" },
            { "type": "idp", "value": "https://sts.windows.net/T/" }
        ]
    });
    let (status, decision) = support::send_json(app(), authorize(&body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decision["allowed"], true);
    assert_eq!(decision["policy"], POLICY);
    assert_eq!(decision["unmet_requirements"], json!([]));
}

#[tokio::test]
async fn guest_token_payload_is_denied() {
    let body = json!({
        "policy": POLICY,
        "token_payload": {
            "iss": "https://login.microsoftonline.com/T/v2.0",
            "idp": "https://sts.windows.net/OTHER/"
        }
    });
    let (status, decision) = support::send_json(app(), authorize(&body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decision["allowed"], false);
    assert_eq!(decision["reason"], "deny_guests: federated_identity_provider");
    assert_eq!(decision["unmet_requirements"], json!(["deny_guests"]));
}

#[tokio::test]
async fn unknown_policy_is_not_found() {
    let body = json!({ "policy": "other", "claims": [] });
    let (status, error) = support::send_json(app(), authorize(&body)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["error"], "unknown_policy");
}

#[tokio::test]
async fn both_claim_sources_are_rejected() {
    let body = json!({ "policy": POLICY, "claims": [], "token_payload": {} });
    let (status, error) = support::send_json(app(), authorize(&body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"], "bad_request");
}

#[tokio::test]
async fn missing_claim_source_is_rejected() {
    let (status, _) = support::send_json(app(), authorize(&json!({ "policy": POLICY }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn non_object_token_payload_is_rejected() {
    let body = json!({ "policy": POLICY, "token_payload": ["iss"] });
    let (status, _) = support::send_json(app(), authorize(&body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_json_is_rejected() {
    let request = Request::builder()
        .method("POST")
        .uri("/v1/authorize")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, _) = support::send_json(app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let padding = "x".repeat(2048);
    let body = json!({ "policy": POLICY, "claims": [{ "type": "pad", "value": padding }] });
    let (status, error) = support::send_json(app(), authorize(&body)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(error["error"], "payload_too_large");
}
