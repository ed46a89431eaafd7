// crates/guest-gate-core/src/lib.rs
// ============================================================================
// Module: Guest Gate Core Library
// Description: Public API surface for the Guest Gate core.
// Purpose: Expose claims, the tenant membership evaluator, and policy plumbing.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Guest Gate decides whether an authenticated caller is a member of the
//! expected tenant or a guest federated from another organization. The core
//! rule is a pure predicate over identity claims; around it sit a handler
//! registry, a fluent policy builder, and a default-deny authorization
//! service that hosts call from their request pipeline.
//!
//! Token validation is out of scope: claims must come from an identity layer
//! that has already verified the token.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use interfaces::AuthorizationAuditSink;
pub use interfaces::AuthorizationHandler;
pub use interfaces::HandlerOutcome;
pub use runtime::AuthorizationAuditEvent;
pub use runtime::AuthorizationDecision;
pub use runtime::AuthorizationError;
pub use runtime::AuthorizationPolicy;
pub use runtime::AuthorizationService;
pub use runtime::DENY_GUESTS_REQUIREMENT;
pub use runtime::DenyGuestsHandler;
pub use runtime::FileAuditSink;
pub use runtime::HandlerRegistry;
pub use runtime::NoopAuditSink;
pub use runtime::PolicyBuilder;
pub use runtime::PolicyError;
pub use runtime::StderrAuditSink;
pub use runtime::TenantMembershipEvaluator;
