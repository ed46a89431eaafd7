// crates/guest-gate-core/src/runtime/evaluator.rs
// ============================================================================
// Module: Tenant Membership Evaluator
// Description: Classifies a claim set as tenant member or guest.
// Purpose: Centralize the account-type and issuer/identity-provider heuristic.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! The evaluator is a pure predicate over a claim set:
//!
//! 1. A non-empty `acct` claim is authoritative: `"0"` grants, anything else
//!    abstains.
//! 2. Otherwise a non-empty `iss` is required. The effective identity
//!    provider is the first present claim of the Microsoft identity provider
//!    type, then `idp`, then the issuer itself. Equality with the issuer
//!    grants; anything else abstains.
//!
//! ## Invariants
//! - Never denies; only [`Verdict::Succeed`] or [`Verdict::NoDecision`].
//! - Deterministic and side-effect free. No logging, no I/O.
//! - An absent claim set is evaluated as an empty one.
//! - Only absence of an identity provider claim falls through to the next
//!   candidate; a present but empty claim is compared as-is.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::ClaimSet;
use crate::core::MembershipAssessment;
use crate::core::MembershipBasis;
use crate::core::Principal;
use crate::core::Verdict;
use crate::core::find_first;

// ============================================================================
// SECTION: Claim Types
// ============================================================================

/// Optional account-type claim; `0` for tenant members, `1` for guests.
pub const ACCOUNT_TYPE_CLAIM: &str = "acct";
/// Token issuer claim.
pub const ISSUER_CLAIM: &str = "iss";
/// Short identity provider claim.
pub const IDP_CLAIM: &str = "idp";
/// Identity provider claim after inbound claim-type mapping.
pub const IDENTITY_PROVIDER_CLAIM: &str =
    "http://schemas.microsoft.com/identity/claims/identityprovider";
/// `acct` value identifying a tenant member.
pub const TENANT_MEMBER_ACCOUNT: &str = "0";

// ============================================================================
// SECTION: Evaluator
// ============================================================================

/// Stateless tenant membership rule.
///
/// # Invariants
/// - Zero-sized; carries no state and is safe to share across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct TenantMembershipEvaluator;

impl TenantMembershipEvaluator {
    /// Creates the evaluator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Evaluates a claim set.
    #[must_use]
    pub fn evaluate(&self, claims: &ClaimSet) -> Verdict {
        self.assess(Some(claims)).verdict
    }

    /// Evaluates an optional principal; `None` is treated as having no claims.
    #[must_use]
    pub fn evaluate_principal(&self, principal: Option<&Principal>) -> Verdict {
        self.assess(principal.map(Principal::claims)).verdict
    }

    /// Evaluates a claim set and reports which rule branch decided it.
    #[must_use]
    pub fn assess(&self, claims: Option<&ClaimSet>) -> MembershipAssessment {
        if let Some(account) = non_empty(find_first(claims, ACCOUNT_TYPE_CLAIM)) {
            return if account == TENANT_MEMBER_ACCOUNT {
                MembershipAssessment::member(MembershipBasis::AccountMember)
            } else {
                MembershipAssessment::abstain(MembershipBasis::AccountGuest)
            };
        }

        let Some(issuer) = non_empty(find_first(claims, ISSUER_CLAIM)) else {
            return MembershipAssessment::abstain(MembershipBasis::MissingIssuer);
        };

        match identity_provider(claims) {
            None => MembershipAssessment::member(MembershipBasis::IssuerSelfComparison),
            Some(provider) if provider == issuer => {
                MembershipAssessment::member(MembershipBasis::IssuerMatchesIdentityProvider)
            }
            Some(_) => MembershipAssessment::abstain(MembershipBasis::FederatedIdentityProvider),
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the first identity provider claim, mapped type first.
fn identity_provider(claims: Option<&ClaimSet>) -> Option<&str> {
    find_first(claims, IDENTITY_PROVIDER_CLAIM).or_else(|| find_first(claims, IDP_CLAIM))
}

/// Drops empty values.
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
