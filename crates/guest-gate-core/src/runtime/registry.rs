// crates/guest-gate-core/src/runtime/registry.rs
// ============================================================================
// Module: Handler Registry
// Description: Registration surface for authorization handlers.
// Purpose: Collect handlers once at startup with idempotent registration.
// Dependencies: crate::{core, interfaces, runtime::handler}
// ============================================================================

//! ## Overview
//! The registry is populated during startup and then frozen inside an
//! [`crate::runtime::AuthorizationService`]. Registering the same handler
//! (same `handler_id` for the same requirement) twice is a no-op, so library
//! setup helpers can be called from several places safely.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use crate::core::RequirementId;
use crate::interfaces::AuthorizationHandler;
use crate::runtime::handler::DenyGuestsHandler;

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Ordered collection of authorization handlers.
#[derive(Default, Clone)]
pub struct HandlerRegistry {
    /// Registered handlers in insertion order.
    handlers: Vec<Arc<dyn AuthorizationHandler>>,
}

impl HandlerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Registers a handler unless an identical registration exists.
    ///
    /// Returns `true` when the handler was added.
    pub fn register(&mut self, handler: Arc<dyn AuthorizationHandler>) -> bool {
        let duplicate = self.handlers.iter().any(|existing| {
            existing.handler_id() == handler.handler_id()
                && existing.requirement() == handler.requirement()
        });
        if duplicate {
            return false;
        }
        self.handlers.push(handler);
        true
    }

    /// Registers the built-in deny-guests handler.
    pub fn add_deny_guests_authorization(&mut self) -> &mut Self {
        self.register(Arc::new(DenyGuestsHandler::new()));
        self
    }

    /// Returns handlers able to satisfy the requirement, in insertion order.
    pub fn handlers_for<'a>(
        &'a self,
        requirement: &'a RequirementId,
    ) -> impl Iterator<Item = &'a Arc<dyn AuthorizationHandler>> + 'a {
        self.handlers.iter().filter(move |handler| handler.requirement() == requirement)
    }

    /// Returns the number of registrations.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns true when nothing is registered.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.handlers.iter().map(|handler| handler.handler_id())).finish()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
