// crates/guest-gate-core/src/core/identifiers.rs
// ============================================================================
// Module: Guest Gate Identifiers
// Description: Validated identifiers for requirements and policies.
// Purpose: Provide strongly typed, serializable names with stable string forms.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Requirement identifiers and policy names are opaque strings that are
//! validated when constructed. Both serialize as plain strings and reject
//! invalid input on deserialization, so a parsed policy can never carry a
//! malformed name.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::borrow::Borrow;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum identifier length in bytes.
pub const MAX_IDENTIFIER_LENGTH: usize = 128;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Identifier validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// Identifier was empty or whitespace.
    #[error("identifier must be non-empty")]
    Empty,
    /// Identifier exceeded the maximum length.
    #[error("identifier exceeds {max} bytes")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// Identifier contained a disallowed character.
    #[error("identifier contains invalid character {0:?}")]
    InvalidCharacter(char),
}

// ============================================================================
// SECTION: Identifier Types
// ============================================================================

/// Identifier of an authorization requirement (for example `deny_guests`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RequirementId(String);

impl RequirementId {
    /// Parses and validates a requirement identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError`] when the value is empty, too long, or
    /// contains characters outside `[A-Za-z0-9_.:-]`.
    pub fn parse(value: impl Into<String>) -> Result<Self, IdentifierError> {
        let value = value.into();
        validate_identifier(&value)?;
        Ok(Self(value))
    }

    /// Wraps a crate-defined constant known to satisfy the grammar.
    pub(crate) fn from_static(value: &'static str) -> Self {
        debug_assert!(validate_identifier(value).is_ok(), "invalid built-in identifier");
        Self(value.to_string())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequirementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl TryFrom<String> for RequirementId {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<RequirementId> for String {
    fn from(value: RequirementId) -> Self {
        value.0
    }
}

/// Name of an authorization policy guarding one or more endpoints.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PolicyName(String);

impl PolicyName {
    /// Parses and validates a policy name.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError`] when the value is empty, too long, or
    /// contains characters outside `[A-Za-z0-9_.:-]`.
    pub fn parse(value: impl Into<String>) -> Result<Self, IdentifierError> {
        let value = value.into();
        validate_identifier(&value)?;
        Ok(Self(value))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PolicyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Borrow<str> for PolicyName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PolicyName {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<PolicyName> for String {
    fn from(value: PolicyName) -> Self {
        value.0
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Validates the shared identifier grammar.
fn validate_identifier(value: &str) -> Result<(), IdentifierError> {
    if value.trim().is_empty() {
        return Err(IdentifierError::Empty);
    }
    if value.len() > MAX_IDENTIFIER_LENGTH {
        return Err(IdentifierError::TooLong {
            max: MAX_IDENTIFIER_LENGTH,
        });
    }
    if let Some(invalid) = value
        .chars()
        .find(|ch| !(ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.' | ':')))
    {
        return Err(IdentifierError::InvalidCharacter(invalid));
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
