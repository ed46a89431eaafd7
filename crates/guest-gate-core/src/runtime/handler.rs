// crates/guest-gate-core/src/runtime/handler.rs
// ============================================================================
// Module: Deny Guests Handler
// Description: Authorization handler backed by the tenant membership evaluator.
// Purpose: Satisfy the `deny_guests` requirement for tenant members only.
// Dependencies: crate::{core, interfaces, runtime::evaluator}
// ============================================================================

//! ## Overview
//! [`DenyGuestsHandler`] adapts [`TenantMembershipEvaluator`] to the
//! [`AuthorizationHandler`] seam. It grants `deny_guests` for tenant members
//! and abstains for everyone else; the authorization service denies on
//! abstention.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::Principal;
use crate::core::RequirementId;
use crate::interfaces::AuthorizationHandler;
use crate::interfaces::HandlerOutcome;
use crate::runtime::evaluator::TenantMembershipEvaluator;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Requirement identifier for the deny-guests rule.
pub const DENY_GUESTS_REQUIREMENT: &str = "deny_guests";
/// Registration identity of the built-in deny-guests handler.
pub const DENY_GUESTS_HANDLER_ID: &str = "guest_gate.deny_guests";

// ============================================================================
// SECTION: Requirement Helpers
// ============================================================================

/// Returns the `deny_guests` requirement identifier.
#[must_use]
pub fn deny_guests_requirement() -> RequirementId {
    RequirementId::from_static(DENY_GUESTS_REQUIREMENT)
}

// ============================================================================
// SECTION: Handler
// ============================================================================

/// Handler that satisfies `deny_guests` for tenant members.
#[derive(Debug, Clone)]
pub struct DenyGuestsHandler {
    /// Requirement satisfied by this handler.
    requirement: RequirementId,
    /// Membership rule.
    evaluator: TenantMembershipEvaluator,
}

impl DenyGuestsHandler {
    /// Creates the handler.
    #[must_use]
    pub fn new() -> Self {
        Self {
            requirement: deny_guests_requirement(),
            evaluator: TenantMembershipEvaluator::new(),
        }
    }
}

impl Default for DenyGuestsHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthorizationHandler for DenyGuestsHandler {
    fn handler_id(&self) -> &str {
        DENY_GUESTS_HANDLER_ID
    }

    fn requirement(&self) -> &RequirementId {
        &self.requirement
    }

    fn handle(&self, principal: &Principal) -> HandlerOutcome {
        let assessment = self.evaluator.assess(Some(principal.claims()));
        HandlerOutcome::new(assessment.verdict, assessment.basis.label())
    }
}
