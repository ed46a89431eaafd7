// crates/guest-gate-core/src/core/claims.rs
// ============================================================================
// Module: Identity Claims
// Description: Ordered claim sets and authenticated principals.
// Purpose: Model verified identity claims as immutable typed key/value pairs.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! A [`ClaimSet`] is an ordered sequence of `(type, value)` string pairs taken
//! from an already-authenticated principal. Claim types are not unique: a
//! token may carry several claims of the same type, and lookups always return
//! the first one in sequence order.
//!
//! ## Invariants
//! - Claim order is preserved exactly as supplied.
//! - Claim type matching is exact and case-sensitive.
//! - Token payload conversion performs no signature or expiry validation;
//!   payloads must come from an identity layer that already verified them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Object identifier claim carried by Entra ID tokens.
pub const OBJECT_ID_CLAIM: &str = "oid";
/// Standard subject claim.
pub const SUBJECT_CLAIM: &str = "sub";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while converting external payloads into claims.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimsError {
    /// Token payload was not a JSON object.
    #[error("token payload must be a json object")]
    PayloadNotObject,
}

// ============================================================================
// SECTION: Claim
// ============================================================================

/// A single typed identity assertion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Claim {
    /// Claim type (for example `iss` or `acct`).
    #[serde(rename = "type")]
    pub claim_type: String,
    /// Claim value.
    pub value: String,
}

impl Claim {
    /// Creates a new claim.
    #[must_use]
    pub fn new(claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            claim_type: claim_type.into(),
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Claim Set
// ============================================================================

/// Ordered, read-only collection of identity claims.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimSet {
    /// Claims in insertion order.
    claims: Vec<Claim>,
}

impl ClaimSet {
    /// Creates an empty claim set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            claims: Vec::new(),
        }
    }

    /// Returns a copy of the set with one more claim appended.
    #[must_use]
    pub fn with(mut self, claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(Claim::new(claim_type, value));
        self
    }

    /// Appends a claim to the end of the set.
    pub fn push(&mut self, claim: Claim) {
        self.claims.push(claim);
    }

    /// Returns the number of claims.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.claims.len()
    }

    /// Returns true when the set holds no claims.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    /// Iterates claims in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Claim> {
        self.claims.iter()
    }

    /// Returns the value of the first claim of `claim_type`, if any.
    #[must_use]
    pub fn find_first(&self, claim_type: &str) -> Option<&str> {
        self.claims
            .iter()
            .find(|claim| claim.claim_type == claim_type)
            .map(|claim| claim.value.as_str())
    }

    /// Builds a claim set from a decoded, already-validated token payload.
    ///
    /// Each member of the payload object becomes one claim. Strings are used
    /// verbatim, numbers and booleans use their JSON text, and arrays yield
    /// one claim per scalar element. `null`, nested objects, and nested arrays
    /// are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ClaimsError::PayloadNotObject`] when `payload` is not an object.
    pub fn from_token_payload(payload: &Value) -> Result<Self, ClaimsError> {
        let Value::Object(members) = payload else {
            return Err(ClaimsError::PayloadNotObject);
        };
        let mut claims = Self::new();
        for (claim_type, value) in members {
            match value {
                Value::Array(items) => {
                    for item in items {
                        if let Some(text) = scalar_text(item) {
                            claims.push(Claim::new(claim_type.clone(), text));
                        }
                    }
                }
                other => {
                    if let Some(text) = scalar_text(other) {
                        claims.push(Claim::new(claim_type.clone(), text));
                    }
                }
            }
        }
        Ok(claims)
    }
}

impl FromIterator<Claim> for ClaimSet {
    fn from_iter<I: IntoIterator<Item = Claim>>(iter: I) -> Self {
        Self {
            claims: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<Claim>> for ClaimSet {
    fn from(claims: Vec<Claim>) -> Self {
        Self {
            claims,
        }
    }
}

impl<'a> IntoIterator for &'a ClaimSet {
    type IntoIter = std::slice::Iter<'a, Claim>;
    type Item = &'a Claim;

    fn into_iter(self) -> Self::IntoIter {
        self.claims.iter()
    }
}

/// Returns the value of the first claim of `claim_type`.
///
/// An absent claim set behaves like an empty one.
#[must_use]
pub fn find_first<'a>(claims: Option<&'a ClaimSet>, claim_type: &str) -> Option<&'a str> {
    claims.and_then(|claims| claims.find_first(claim_type))
}

// ============================================================================
// SECTION: Principal
// ============================================================================

/// An authenticated identity and its claims.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Claims attached by the identity layer.
    claims: ClaimSet,
}

impl Principal {
    /// Creates a principal carrying the given claims.
    #[must_use]
    pub const fn new(claims: ClaimSet) -> Self {
        Self {
            claims,
        }
    }

    /// Creates a principal with no claims.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self::new(ClaimSet::new())
    }

    /// Returns the principal's claims.
    #[must_use]
    pub const fn claims(&self) -> &ClaimSet {
        &self.claims
    }

    /// Returns a subject label for audit logs (`oid`, then `sub`).
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.claims.find_first(OBJECT_ID_CLAIM).or_else(|| self.claims.find_first(SUBJECT_CLAIM))
    }
}

impl From<ClaimSet> for Principal {
    fn from(claims: ClaimSet) -> Self {
        Self::new(claims)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Renders a scalar JSON value as claim text.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
