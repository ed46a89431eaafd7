// crates/guest-gate-core/src/runtime/service.rs
// ============================================================================
// Module: Authorization Service
// Description: Default-deny aggregation of handler verdicts per policy.
// Purpose: Turn "no handler granted" into an explicit, audited denial.
// Dependencies: crate::{core, interfaces, runtime}, serde, thiserror
// ============================================================================

//! ## Overview
//! The authorization service owns the handler registry, the named policies,
//! and the audit sink. A requirement is met when any handler registered for
//! it returns [`Verdict::Succeed`]; a policy allows a request only when every
//! requirement is met.
//!
//! ## Invariants
//! - Default deny: abstention, a missing handler, or a missing principal all
//!   leave a requirement unmet.
//! - Decisions are deterministic for identical inputs.
//! - Exactly one audit event is recorded per `authorize` call that reaches a
//!   known policy.
//!
//! Security posture: this is the integration boundary where abstention
//! becomes denial; it must fail closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::core::PolicyName;
use crate::core::Principal;
use crate::core::RequirementId;
use crate::core::Verdict;
use crate::interfaces::AuthorizationAuditSink;
use crate::runtime::audit::AuthorizationAuditEvent;
use crate::runtime::audit::NoopAuditSink;
use crate::runtime::policy::AuthorizationPolicy;
use crate::runtime::registry::HandlerRegistry;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Reason label when every requirement was met.
const REASON_ALLOWED: &str = "requirements_met";
/// Reason label when a requirement has no registered handler.
const REASON_NO_HANDLER: &str = "no_handler_registered";
/// Reason label used when a handler abstained without a reason.
const REASON_NO_DECISION: &str = "no_decision";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Authorization service errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorizationError {
    /// Invalid argument at configuration time.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Policy name is not registered.
    #[error("unknown policy: {0}")]
    UnknownPolicy(String),
}

// ============================================================================
// SECTION: Decision
// ============================================================================

/// Outcome of authorizing a principal against a policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizationDecision {
    /// Whether access is allowed.
    pub allowed: bool,
    /// Policy that was evaluated.
    pub policy: PolicyName,
    /// Reason label for audit and diagnostics.
    pub reason: String,
    /// Requirements that were not met (empty when allowed).
    pub unmet_requirements: Vec<RequirementId>,
}

// ============================================================================
// SECTION: Service
// ============================================================================

/// Default-deny policy evaluator.
pub struct AuthorizationService {
    /// Registered handlers.
    registry: HandlerRegistry,
    /// Policies by name.
    policies: BTreeMap<PolicyName, AuthorizationPolicy>,
    /// Audit sink receiving one event per decision.
    audit: Arc<dyn AuthorizationAuditSink>,
}

impl AuthorizationService {
    /// Creates a service with no policies.
    #[must_use]
    pub fn new(registry: HandlerRegistry, audit: Arc<dyn AuthorizationAuditSink>) -> Self {
        Self {
            registry,
            policies: BTreeMap::new(),
            audit,
        }
    }

    /// Creates a service that discards audit events.
    #[must_use]
    pub fn without_audit(registry: HandlerRegistry) -> Self {
        Self::new(registry, Arc::new(NoopAuditSink))
    }

    /// Adds a policy.
    ///
    /// # Errors
    ///
    /// Returns [`AuthorizationError::InvalidArgument`] when a policy with the
    /// same name already exists.
    pub fn add_policy(&mut self, policy: AuthorizationPolicy) -> Result<(), AuthorizationError> {
        if self.policies.contains_key(policy.name()) {
            return Err(AuthorizationError::InvalidArgument(format!(
                "policy {} already registered",
                policy.name()
            )));
        }
        self.policies.insert(policy.name().clone(), policy);
        Ok(())
    }

    /// Adds a policy and returns the service.
    ///
    /// # Errors
    ///
    /// Returns [`AuthorizationError::InvalidArgument`] on duplicate names.
    pub fn with_policy(mut self, policy: AuthorizationPolicy) -> Result<Self, AuthorizationError> {
        self.add_policy(policy)?;
        Ok(self)
    }

    /// Returns a registered policy by name.
    #[must_use]
    pub fn policy(&self, name: &str) -> Option<&AuthorizationPolicy> {
        self.policies.get(name)
    }

    /// Iterates registered policies in name order.
    pub fn policies(&self) -> impl Iterator<Item = &AuthorizationPolicy> {
        self.policies.values()
    }

    /// Returns the handler registry.
    #[must_use]
    pub const fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Authorizes a principal against a named policy.
    ///
    /// An absent principal is evaluated as one with no claims.
    ///
    /// # Errors
    ///
    /// Returns [`AuthorizationError::UnknownPolicy`] when `policy_name` is not
    /// registered.
    pub fn authorize(
        &self,
        policy_name: &str,
        principal: Option<&Principal>,
    ) -> Result<AuthorizationDecision, AuthorizationError> {
        let policy = self
            .policies
            .get(policy_name)
            .ok_or_else(|| AuthorizationError::UnknownPolicy(policy_name.to_string()))?;
        let anonymous = Principal::anonymous();
        let subject = principal.unwrap_or(&anonymous);

        let mut unmet = Vec::new();
        let mut first_reason: Option<String> = None;
        for requirement in policy.requirements() {
            if let Err(reason) = self.evaluate_requirement(requirement, subject) {
                if first_reason.is_none() {
                    first_reason = Some(format!("{requirement}: {reason}"));
                }
                unmet.push(requirement.clone());
            }
        }

        let allowed = unmet.is_empty();
        let reason = first_reason.unwrap_or_else(|| REASON_ALLOWED.to_string());
        self.audit.record(&AuthorizationAuditEvent::new(
            policy.name().clone(),
            allowed,
            reason.clone(),
            unmet.clone(),
            principal,
        ));
        Ok(AuthorizationDecision {
            allowed,
            policy: policy.name().clone(),
            reason,
            unmet_requirements: unmet,
        })
    }

    /// Runs every handler for a requirement; `Ok` when any of them granted.
    fn evaluate_requirement(
        &self,
        requirement: &RequirementId,
        principal: &Principal,
    ) -> Result<(), String> {
        let mut last_reason = None;
        for handler in self.registry.handlers_for(requirement) {
            let outcome = handler.handle(principal);
            if outcome.verdict == Verdict::Succeed {
                return Ok(());
            }
            last_reason = Some(outcome.reason);
        }
        Err(last_reason
            .filter(|reason| !reason.is_empty())
            .unwrap_or_else(|| {
                if self.registry.handlers_for(requirement).next().is_none() {
                    REASON_NO_HANDLER.to_string()
                } else {
                    REASON_NO_DECISION.to_string()
                }
            }))
    }
}

impl std::fmt::Debug for AuthorizationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizationService")
            .field("registry", &self.registry)
            .field("policies", &self.policies.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
