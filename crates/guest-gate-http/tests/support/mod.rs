// crates/guest-gate-http/tests/support/mod.rs
// ============================================================================
// Module: HTTP Test Support
// Description: Shared service fixtures and request helpers for HTTP tests.
// ============================================================================
//! ## Overview
//! Builds a deny-guests service and drives routers in-process with
//! `tower::ServiceExt::oneshot`.

#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Shared test helpers may be unused in some test binaries."
)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::Request;
use axum::http::StatusCode;
use guest_gate_core::AuthorizationService;
use guest_gate_core::ClaimSet;
use guest_gate_core::HandlerRegistry;
use guest_gate_core::PolicyBuilder;
use guest_gate_core::Principal;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

/// Policy registered by [`service`].
pub const POLICY: &str = "tenant_members";

/// Deny-guests service without auditing.
pub fn service() -> Arc<AuthorizationService> {
    let mut registry = HandlerRegistry::new();
    registry.add_deny_guests_authorization();
    let service = AuthorizationService::without_audit(registry)
        .with_policy(PolicyBuilder::new(POLICY).deny_guests().build().unwrap())
        .unwrap();
    Arc::new(service)
}

/// Principal of a tenant member.
pub fn member() -> Principal {
    Principal::new(ClaimSet::new().with("iss", "https://sts.windows.net/T/").with("oid", "m"))
}

/// Principal of a guest from another tenant.
pub fn guest() -> Principal {
    Principal::new(
        ClaimSet::new()
            .with("iss", "https://login.microsoftonline.com/T/v2.0")
            .with("idp", "https://sts.windows.net/OTHER/"),
    )
}

/// Sends a request and returns the status and raw body.
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

/// Sends a request and parses the body as JSON.
pub async fn send_json(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}
