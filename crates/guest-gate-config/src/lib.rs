// crates/guest-gate-config/src/lib.rs
// ============================================================================
// Module: Guest Gate Config Library
// Description: Canonical config model and validation for guest-gate.toml.
// Purpose: Single source of truth for policy, server, and audit settings.
// Dependencies: guest-gate-core, serde, toml
// ============================================================================

//! ## Overview
//! `guest-gate-config` loads `guest-gate.toml`, validates it fail-closed, and
//! builds the [`guest_gate_core::AuthorizationService`] the HTTP server and
//! CLI share.
//!
//! Security posture: config inputs are untrusted.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
