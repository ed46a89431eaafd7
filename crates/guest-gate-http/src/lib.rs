// crates/guest-gate-http/src/lib.rs
// ============================================================================
// Module: Guest Gate HTTP Library
// Description: axum integration for tenant membership policies.
// Purpose: Guard routes with named policies and expose a decision endpoint.
// Dependencies: guest-gate-core, guest-gate-config, axum, tokio
// ============================================================================

//! ## Overview
//! Hosts authenticate callers upstream and insert a
//! [`guest_gate_core::Principal`] into request extensions. This crate then
//! offers two integration points: [`require_policy`] wraps existing routes
//! with a default-deny check, and [`router`] serves a standalone decision API.
//!
//! Security posture: request bodies and claims are untrusted input.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod middleware;
pub mod server;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use middleware::PolicyGuard;
pub use middleware::enforce_policy;
pub use middleware::require_policy;
pub use server::AuthorizeRequest;
pub use server::ErrorBody;
pub use server::HttpError;
pub use server::HttpServer;
pub use server::router;
pub use server::serve;
