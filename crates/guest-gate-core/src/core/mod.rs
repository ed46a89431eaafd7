// crates/guest-gate-core/src/core/mod.rs
// ============================================================================
// Module: Guest Gate Core Types
// Description: Claims, identifiers, and verdict types.
// Purpose: Provide stable, serializable types shared by every Guest Gate crate.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Core types describe the inputs (claims, principals) and outputs (verdicts,
//! assessments) of tenant membership evaluation, plus the identifiers used to
//! name requirements and policies.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod claims;
pub mod identifiers;
pub mod verdict;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use claims::Claim;
pub use claims::ClaimSet;
pub use claims::ClaimsError;
pub use claims::Principal;
pub use claims::find_first;
pub use identifiers::IdentifierError;
pub use identifiers::MAX_IDENTIFIER_LENGTH;
pub use identifiers::PolicyName;
pub use identifiers::RequirementId;
pub use verdict::MembershipAssessment;
pub use verdict::MembershipBasis;
pub use verdict::Verdict;
