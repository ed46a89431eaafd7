// crates/guest-gate-config/tests/common/mod.rs
// =============================================================================
// Module: Config Test Helpers
// Description: Shared helpers for config validation tests.
// Purpose: Reduce duplication across integration tests for guest-gate-config.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use guest_gate_config::ConfigError;
use guest_gate_config::GuestGateConfig;

/// Smallest valid configuration: defaults plus one deny-guests policy.
pub const MINIMAL_TOML: &str = r#"
[[policies]]
name = "tenant_members"
deny_guests = true
"#;

/// Standard result type for config tests.
pub type TestResult = Result<(), String>;

/// Parses a TOML string into a `GuestGateConfig` without validating it.
pub fn config_from_toml(toml_str: &str) -> Result<GuestGateConfig, toml::de::Error> {
    toml::from_str(toml_str)
}

/// Returns a minimal config with all defaults applied.
pub fn minimal_config() -> Result<GuestGateConfig, String> {
    config_from_toml(MINIMAL_TOML).map_err(|err| err.to_string())
}

/// Assert that a result is an error containing a specific substring.
pub fn assert_invalid<T>(result: Result<T, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error '{message}' did not contain '{needle}'"))
            }
        }
        Ok(_) => Err("expected invalid config".to_string()),
    }
}
