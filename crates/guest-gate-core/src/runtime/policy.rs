// crates/guest-gate-core/src/runtime/policy.rs
// ============================================================================
// Module: Authorization Policies
// Description: Named policies and their fluent builder.
// Purpose: Attach requirements such as `deny_guests` to named policies.
// Dependencies: crate::core, serde, thiserror
// ============================================================================

//! ## Overview
//! A policy is a name plus the requirements a caller must satisfy. Policies
//! are assembled with [`PolicyBuilder`], which validates every argument at
//! build time so misconfiguration fails during startup rather than at request
//! time.
//!
//! ## Invariants
//! - A built policy has a valid name and at least one requirement.
//! - Requirements are unique and keep their insertion order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use thiserror::Error;

use crate::core::PolicyName;
use crate::core::RequirementId;
use crate::runtime::handler::DENY_GUESTS_REQUIREMENT;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Policy construction errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// A builder argument was invalid.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

// ============================================================================
// SECTION: Policy
// ============================================================================

/// Named set of requirements guarding one or more endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizationPolicy {
    /// Policy name.
    name: PolicyName,
    /// Requirements that must all be met.
    requirements: Vec<RequirementId>,
}

impl AuthorizationPolicy {
    /// Returns the policy name.
    #[must_use]
    pub const fn name(&self) -> &PolicyName {
        &self.name
    }

    /// Returns the requirements in declaration order.
    #[must_use]
    pub fn requirements(&self) -> &[RequirementId] {
        &self.requirements
    }

    /// Returns true when the policy carries the requirement.
    #[must_use]
    pub fn requires(&self, requirement: &str) -> bool {
        self.requirements.iter().any(|item| item.as_str() == requirement)
    }
}

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Fluent builder for [`AuthorizationPolicy`].
#[derive(Debug, Clone)]
pub struct PolicyBuilder {
    /// Raw policy name (validated in `build`).
    name: String,
    /// Raw requirement identifiers (validated in `build`).
    requirements: Vec<String>,
}

impl PolicyBuilder {
    /// Starts a policy with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            requirements: Vec::new(),
        }
    }

    /// Adds a requirement by identifier.
    #[must_use]
    pub fn require(mut self, requirement: impl Into<String>) -> Self {
        self.requirements.push(requirement.into());
        self
    }

    /// Requires the caller to be a member of the tenant.
    #[must_use]
    pub fn deny_guests(self) -> Self {
        self.require(DENY_GUESTS_REQUIREMENT)
    }

    /// Validates arguments and builds the policy.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::InvalidArgument`] when the name or a requirement
    /// identifier is invalid, or when no requirement was added.
    pub fn build(self) -> Result<AuthorizationPolicy, PolicyError> {
        let name = PolicyName::parse(self.name)
            .map_err(|err| PolicyError::InvalidArgument(format!("policy name: {err}")))?;
        if self.requirements.is_empty() {
            return Err(PolicyError::InvalidArgument(format!(
                "policy {name} must declare at least one requirement"
            )));
        }
        let mut requirements: Vec<RequirementId> = Vec::with_capacity(self.requirements.len());
        for (idx, raw) in self.requirements.into_iter().enumerate() {
            let requirement = RequirementId::parse(raw).map_err(|err| {
                PolicyError::InvalidArgument(format!("policy {name} requirements[{idx}]: {err}"))
            })?;
            if !requirements.contains(&requirement) {
                requirements.push(requirement);
            }
        }
        Ok(AuthorizationPolicy {
            name,
            requirements,
        })
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test fixtures use explicit asserts and unwraps for clarity."
    )]

    use super::*;

    #[test]
    fn deny_guests_adds_requirement() {
        let policy = PolicyBuilder::new("tenant_members").deny_guests().build().unwrap();
        assert_eq!(policy.name().as_str(), "tenant_members");
        assert!(policy.requires(DENY_GUESTS_REQUIREMENT));
        assert_eq!(policy.requirements().len(), 1);
    }

    #[test]
    fn duplicate_requirements_collapse() {
        let policy = PolicyBuilder::new("p")
            .deny_guests()
            .require("mfa")
            .deny_guests()
            .build()
            .unwrap();
        let names: Vec<&str> = policy.requirements().iter().map(RequirementId::as_str).collect();
        assert_eq!(names, vec!["deny_guests", "mfa"]);
    }

    #[test]
    fn empty_policy_is_rejected() {
        let err = PolicyBuilder::new("p").build().unwrap_err();
        assert!(err.to_string().contains("at least one requirement"));
    }

    #[test]
    fn invalid_name_is_rejected() {
        let err = PolicyBuilder::new("").deny_guests().build().unwrap_err();
        assert!(matches!(err, PolicyError::InvalidArgument(_)));
    }

    #[test]
    fn invalid_requirement_is_rejected() {
        let err = PolicyBuilder::new("p").require("no spaces").build().unwrap_err();
        assert!(err.to_string().contains("requirements[0]"));
    }
}
