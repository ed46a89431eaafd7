// crates/guest-gate-core/src/core/verdict.rs
// ============================================================================
// Module: Verdicts
// Description: Rule verdicts and tenant membership assessments.
// Purpose: Encode "allow or nothing" rule outcomes without a deny signal.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A rule never denies. It either grants ([`Verdict::Succeed`]) or abstains
//! ([`Verdict::NoDecision`]); the policy aggregator turns abstention into a
//! denial. [`MembershipAssessment`] pairs a verdict with the branch of the
//! membership heuristic that produced it so audit logs can explain decisions.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Verdict
// ============================================================================

/// Outcome of a single authorization rule.
///
/// # Invariants
/// - There is no deny variant. Absence of a grant is the only negative outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The rule grants the requirement.
    Succeed,
    /// The rule abstains; the aggregator treats this as not granted.
    NoDecision,
}

impl Verdict {
    /// Returns true for [`Verdict::Succeed`].
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Succeed)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Succeed => "succeed",
            Self::NoDecision => "no_decision",
        })
    }
}

// ============================================================================
// SECTION: Membership Assessment
// ============================================================================

/// Which branch of the membership heuristic decided the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipBasis {
    /// `acct` claim marks a tenant member.
    AccountMember,
    /// `acct` claim is present with a non-member value.
    AccountGuest,
    /// No usable `acct` and no usable `iss`.
    MissingIssuer,
    /// Identity provider claim equals the issuer.
    IssuerMatchesIdentityProvider,
    /// No identity provider claim; the issuer is compared against itself.
    IssuerSelfComparison,
    /// Identity provider claim differs from the issuer.
    FederatedIdentityProvider,
}

impl MembershipBasis {
    /// Returns the stable snake-case label used in audit logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::AccountMember => "account_member",
            Self::AccountGuest => "account_guest",
            Self::MissingIssuer => "missing_issuer",
            Self::IssuerMatchesIdentityProvider => "issuer_matches_identity_provider",
            Self::IssuerSelfComparison => "issuer_self_comparison",
            Self::FederatedIdentityProvider => "federated_identity_provider",
        }
    }
}

impl fmt::Display for MembershipBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Verdict plus the reason it was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipAssessment {
    /// Verdict for the claim set.
    pub verdict: Verdict,
    /// Branch that produced the verdict.
    pub basis: MembershipBasis,
}

impl MembershipAssessment {
    /// Builds a granting assessment.
    #[must_use]
    pub const fn member(basis: MembershipBasis) -> Self {
        Self {
            verdict: Verdict::Succeed,
            basis,
        }
    }

    /// Builds an abstaining assessment.
    #[must_use]
    pub const fn abstain(basis: MembershipBasis) -> Self {
        Self {
            verdict: Verdict::NoDecision,
            basis,
        }
    }
}
