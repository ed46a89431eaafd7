// crates/guest-gate-core/src/runtime/audit.rs
// ============================================================================
// Module: Authorization Audit Logging
// Description: Structured audit events and sinks for authorization decisions.
// Purpose: Emit one JSON line per decision without a logging framework.
// Dependencies: crate::{core, interfaces}, serde, serde_json
// ============================================================================

//! ## Overview
//! Every call to [`crate::runtime::AuthorizationService::authorize`] produces
//! one [`AuthorizationAuditEvent`]. Sinks serialize events as JSON lines so
//! deployments can route them to whatever pipeline they already run.
//!
//! ## Invariants
//! - Events carry a subject label and a claim count, never raw claim values.
//! - Sink failures are swallowed; auditing never changes a decision.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::core::PolicyName;
use crate::core::Principal;
use crate::core::RequirementId;
use crate::interfaces::AuthorizationAuditSink;

// ============================================================================
// SECTION: Event
// ============================================================================

/// Event identifier for authorization decisions.
pub const AUTHZ_AUDIT_EVENT: &str = "guest_gate_authz";

/// Authorization audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Policy that was evaluated.
    pub policy: PolicyName,
    /// Decision label (`allow` or `deny`).
    pub decision: &'static str,
    /// Reason label.
    pub reason: String,
    /// Requirements that were not met.
    pub unmet_requirements: Vec<RequirementId>,
    /// Subject label (`oid` or `sub`) when present.
    pub subject: Option<String>,
    /// Number of claims on the principal.
    pub claim_count: usize,
}

impl AuthorizationAuditEvent {
    /// Builds an event for a decision about `principal`.
    #[must_use]
    pub fn new(
        policy: PolicyName,
        allowed: bool,
        reason: impl Into<String>,
        unmet_requirements: Vec<RequirementId>,
        principal: Option<&Principal>,
    ) -> Self {
        Self {
            event: AUTHZ_AUDIT_EVENT,
            timestamp_ms: now_millis(),
            policy,
            decision: if allowed { "allow" } else { "deny" },
            reason: reason.into(),
            unmet_requirements,
            subject: principal.and_then(Principal::subject).map(str::to_string),
            claim_count: principal.map_or(0, |principal| principal.claims().len()),
        }
    }
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink that writes JSON lines to stderr.
pub struct StderrAuditSink;

impl AuthorizationAuditSink for StderrAuditSink {
    fn record(&self, event: &AuthorizationAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let mut stderr = io::stderr().lock();
            let _ = writeln!(stderr, "{payload}");
        }
    }
}

/// Audit sink that appends JSON lines to a file.
pub struct FileAuditSink {
    /// Append-mode file handle.
    file: Mutex<File>,
}

impl FileAuditSink {
    /// Opens (or creates) the audit log in append mode.
    ///
    /// # Errors
    ///
    /// Returns [`io::Error`] when the file cannot be opened.
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl AuthorizationAuditSink for FileAuditSink {
    fn record(&self, event: &AuthorizationAuditEvent) {
        let Ok(payload) = serde_json::to_string(event) else {
            return;
        };
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(file, "{payload}");
        }
    }
}

/// No-op audit sink for tests and embedded use.
pub struct NoopAuditSink;

impl AuthorizationAuditSink for NoopAuditSink {
    fn record(&self, _event: &AuthorizationAuditEvent) {}
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the current time in milliseconds since the Unix epoch.
fn now_millis() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |duration| duration.as_millis())
}
