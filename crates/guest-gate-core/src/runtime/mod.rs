// crates/guest-gate-core/src/runtime/mod.rs
// ============================================================================
// Module: Guest Gate Runtime
// Description: Evaluator, handlers, policies, registry, and the authorization service.
// Purpose: Execute tenant membership checks behind a default-deny aggregator.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Runtime components evaluate claims and aggregate verdicts. The evaluator is
//! pure; the authorization service is the only component that produces a
//! denial or touches an audit sink.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod audit;
pub mod evaluator;
pub mod handler;
pub mod policy;
pub mod registry;
pub mod service;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::AUTHZ_AUDIT_EVENT;
pub use audit::AuthorizationAuditEvent;
pub use audit::FileAuditSink;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use evaluator::ACCOUNT_TYPE_CLAIM;
pub use evaluator::IDENTITY_PROVIDER_CLAIM;
pub use evaluator::IDP_CLAIM;
pub use evaluator::ISSUER_CLAIM;
pub use evaluator::TENANT_MEMBER_ACCOUNT;
pub use evaluator::TenantMembershipEvaluator;
pub use handler::DENY_GUESTS_HANDLER_ID;
pub use handler::DENY_GUESTS_REQUIREMENT;
pub use handler::DenyGuestsHandler;
pub use handler::deny_guests_requirement;
pub use policy::AuthorizationPolicy;
pub use policy::PolicyBuilder;
pub use policy::PolicyError;
pub use registry::HandlerRegistry;
pub use service::AuthorizationDecision;
pub use service::AuthorizationError;
pub use service::AuthorizationService;
