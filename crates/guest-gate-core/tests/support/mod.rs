// crates/guest-gate-core/tests/support/mod.rs
// ============================================================================
// Module: Test Support
// Description: Shared result helpers and token fixtures for core tests.
// ============================================================================
//! ## Overview
//! Shared test helpers for consistent Result-based assertions plus the issuer
//! constants used by member and guest token fixtures.

#![allow(
    dead_code,
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Shared test helpers may be unused in some test binaries."
)]

use std::error::Error;
use std::fmt;
use std::sync::Mutex;

use guest_gate_core::AuthorizationAuditEvent;
use guest_gate_core::AuthorizationAuditSink;

// ========================================================================
// Token Fixtures
// ========================================================================

/// v1 token issuer for the fixture tenant.
pub const V1_ISSUER: &str = "https://sts.windows.net/dcaaf043-1d54-42a3-ad69-b302ecca3d29/";
/// v2 token issuer for the fixture tenant.
pub const AAD_ISSUER: &str =
    "https://login.microsoftonline.com/dcaaf043-1d54-42a3-ad69-b302ecca3d29/v2.0";
/// Identity provider of a foreign tenant.
pub const GUEST_IDENTITY_PROVIDER: &str =
    "https://sts.windows.net/fbcdbb10-816a-4443-953e-d556d2ba0df7/";

// ========================================================================
// Test Result Helpers
// ========================================================================

/// Standard result type used across core integration tests.
pub type TestResult<T = ()> = Result<T, Box<dyn Error>>;

/// Lightweight error type for test assertions.
#[derive(Debug)]
struct TestError {
    /// Human-readable failure message.
    message: String,
}

impl fmt::Display for TestError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.message)
    }
}

impl Error for TestError {}

/// Returns an error when a test condition fails.
///
/// # Errors
/// Returns a `TestError` when the condition is false.
pub fn ensure(condition: bool, message: impl Into<String>) -> TestResult {
    if condition {
        Ok(())
    } else {
        Err(Box::new(TestError {
            message: message.into(),
        }))
    }
}

// ========================================================================
// Audit Capture
// ========================================================================

/// Audit sink that keeps events in memory.
#[derive(Default)]
pub struct RecordingAuditSink {
    /// Captured events in order.
    events: Mutex<Vec<AuthorizationAuditEvent>>,
}

impl RecordingAuditSink {
    /// Returns a snapshot of captured events.
    pub fn events(&self) -> Vec<AuthorizationAuditEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl AuthorizationAuditSink for RecordingAuditSink {
    fn record(&self, event: &AuthorizationAuditEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
