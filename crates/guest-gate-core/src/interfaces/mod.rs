// crates/guest-gate-core/src/interfaces/mod.rs
// ============================================================================
// Module: Guest Gate Interfaces
// Description: Integration seams for authorization handlers and audit sinks.
// Purpose: Let hosts plug rules and log pipelines in without redesign.
// Dependencies: crate::core, serde
// ============================================================================

//! ## Overview
//! Interfaces define the contracts between Guest Gate and its host: a handler
//! evaluates one requirement for a principal, and an audit sink receives one
//! structured event per authorization decision.
//!
//! ## Invariants
//! - Handlers are pure with respect to the principal; they must not mutate
//!   shared state or perform I/O.
//! - Handlers only ever grant. A handler that cannot grant abstains with
//!   [`Verdict::NoDecision`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

use crate::core::Principal;
use crate::core::RequirementId;
use crate::core::Verdict;
use crate::runtime::AuthorizationAuditEvent;

// ============================================================================
// SECTION: Authorization Handler
// ============================================================================

/// Result of running one handler against a principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandlerOutcome {
    /// Handler verdict.
    pub verdict: Verdict,
    /// Reason label for audit logs.
    pub reason: String,
}

impl HandlerOutcome {
    /// Builds an outcome from a verdict and reason label.
    #[must_use]
    pub fn new(verdict: Verdict, reason: impl Into<String>) -> Self {
        Self {
            verdict,
            reason: reason.into(),
        }
    }
}

/// Rule that can satisfy a single authorization requirement.
pub trait AuthorizationHandler: Send + Sync {
    /// Stable identity used to de-duplicate registrations.
    fn handler_id(&self) -> &str;

    /// Requirement this handler can satisfy.
    fn requirement(&self) -> &RequirementId;

    /// Evaluates the requirement for the principal.
    fn handle(&self, principal: &Principal) -> HandlerOutcome;
}

// ============================================================================
// SECTION: Audit Sink
// ============================================================================

/// Destination for authorization audit events.
pub trait AuthorizationAuditSink: Send + Sync {
    /// Records an authorization audit event.
    fn record(&self, event: &AuthorizationAuditEvent);
}
