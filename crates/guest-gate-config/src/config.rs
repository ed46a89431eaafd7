// crates/guest-gate-config/src/config.rs
// ============================================================================
// Module: Guest Gate Configuration
// Description: Configuration loading and validation for Guest Gate.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: guest-gate-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Missing or invalid configuration fails closed: a server never starts with
//! a policy set it could not fully validate.
//! Security posture: config inputs are untrusted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use guest_gate_core::AuthorizationAuditSink;
use guest_gate_core::AuthorizationService;
use guest_gate_core::FileAuditSink;
use guest_gate_core::HandlerRegistry;
use guest_gate_core::NoopAuditSink;
use guest_gate_core::PolicyBuilder;
use guest_gate_core::PolicyName;
use guest_gate_core::StderrAuditSink;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "guest-gate.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "GUEST_GATE_CONFIG";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Upper bound for `server.max_body_bytes`.
pub const MAX_BODY_BYTES_LIMIT: usize = 1024 * 1024;
/// Default bind address.
const DEFAULT_BIND: &str = "127.0.0.1:8080";

// ============================================================================
// SECTION: Config Model
// ============================================================================

/// Guest Gate configuration root.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GuestGateConfig {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Decision audit configuration.
    #[serde(default)]
    pub audit: AuditConfig,
    /// Named authorization policies.
    #[serde(default)]
    pub policies: Vec<PolicyConfig>,
}

impl GuestGateConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// Resolution order: explicit `path`, then [`CONFIG_ENV_VAR`], then
    /// `./guest-gate.toml`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved)
            .map_err(|err| ConfigError::Io(format!("{}: {err}", resolved.display())))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.audit.validate()?;
        if self.policies.is_empty() {
            return Err(ConfigError::Invalid("at least one policy must be configured".to_string()));
        }
        let mut seen = BTreeSet::new();
        for (idx, policy) in self.policies.iter().enumerate() {
            let name = policy.validate(idx)?;
            if !seen.insert(name) {
                return Err(ConfigError::Invalid(format!(
                    "policies[{idx}].name duplicates {}",
                    policy.name
                )));
            }
        }
        Ok(())
    }

    /// Builds the authorization service described by this configuration.
    ///
    /// The deny-guests handler is always registered; each configured policy
    /// is built through [`PolicyBuilder`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when validation fails or the audit sink cannot
    /// be opened.
    pub fn build_authorization_service(&self) -> Result<AuthorizationService, ConfigError> {
        self.validate()?;
        let mut registry = HandlerRegistry::new();
        registry.add_deny_guests_authorization();
        let mut service = AuthorizationService::new(registry, self.audit.open_sink()?);
        for policy in &self.policies {
            let built = policy
                .builder()
                .build()
                .map_err(|err| ConfigError::Invalid(err.to_string()))?;
            service.add_policy(built).map_err(|err| ConfigError::Invalid(err.to_string()))?;
        }
        Ok(service)
    }
}

// ============================================================================
// SECTION: Server
// ============================================================================

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Socket address to bind.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Maximum request body size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    /// Explicit opt-in for binding beyond loopback.
    #[serde(default)]
    pub allow_non_loopback: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_body_bytes: default_max_body_bytes(),
            allow_non_loopback: false,
        }
    }
}

impl ServerConfig {
    /// Returns the parsed bind address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when `bind` is not a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("invalid bind address: {}", self.bind)))
    }

    /// Validates server settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_body_bytes == 0 {
            return Err(ConfigError::Invalid(
                "server.max_body_bytes must be greater than zero".to_string(),
            ));
        }
        if self.max_body_bytes > MAX_BODY_BYTES_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "server.max_body_bytes exceeds {MAX_BODY_BYTES_LIMIT}"
            )));
        }
        let addr = self.bind_addr()?;
        if !addr.ip().is_loopback() && !self.allow_non_loopback {
            return Err(ConfigError::Invalid(
                "non-loopback bind disallowed without server.allow_non_loopback".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Audit
// ============================================================================

/// Destination for decision audit events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to `audit.path`.
    File,
    /// Discard events.
    None,
}

/// Audit logging configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuditConfig {
    /// Sink selection.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Audit log path for the file sink.
    #[serde(default)]
    pub path: Option<String>,
}

impl AuditConfig {
    /// Validates audit settings.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (AuditSinkKind::File, Some(path)) => validate_path_string("audit.path", path),
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("audit.path is required for the file sink".to_string()))
            }
            (_, Some(_)) => {
                Err(ConfigError::Invalid("audit.path is only valid for the file sink".to_string()))
            }
            (_, None) => Ok(()),
        }
    }

    /// Opens the configured sink.
    fn open_sink(&self) -> Result<Arc<dyn AuthorizationAuditSink>, ConfigError> {
        match (self.sink, &self.path) {
            (AuditSinkKind::Stderr, _) => Ok(Arc::new(StderrAuditSink)),
            (AuditSinkKind::None, _) => Ok(Arc::new(NoopAuditSink)),
            (AuditSinkKind::File, Some(path)) => {
                let sink = FileAuditSink::open(Path::new(path.trim()))
                    .map_err(|err| ConfigError::Io(format!("audit.path {path}: {err}")))?;
                Ok(Arc::new(sink))
            }
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("audit.path is required for the file sink".to_string()))
            }
        }
    }
}

// ============================================================================
// SECTION: Policies
// ============================================================================

/// Named policy declaration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PolicyConfig {
    /// Policy name referenced by routes and requests.
    pub name: String,
    /// Require tenant membership.
    #[serde(default)]
    pub deny_guests: bool,
}

impl PolicyConfig {
    /// Validates one policy entry and returns its parsed name.
    fn validate(&self, idx: usize) -> Result<PolicyName, ConfigError> {
        let name = PolicyName::parse(self.name.as_str())
            .map_err(|err| ConfigError::Invalid(format!("policies[{idx}].name: {err}")))?;
        if !self.deny_guests {
            return Err(ConfigError::Invalid(format!(
                "policies[{idx}] ({}) must enable at least one requirement",
                self.name
            )));
        }
        Ok(name)
    }

    /// Returns a builder carrying the declared requirements.
    fn builder(&self) -> PolicyBuilder {
        PolicyBuilder::new(self.name.as_str()).deny_guests()
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    if path.as_os_str().len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    check_components("config path", path)
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    check_components(&format!("{field} path"), Path::new(trimmed))
}

/// Rejects any component of `path` longer than [`MAX_PATH_COMPONENT_LENGTH`].
fn check_components(label: &str, path: &Path) -> Result<(), ConfigError> {
    match path.components().find(|part| part.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH) {
        Some(_) => Err(ConfigError::Invalid(format!("{label} component too long"))),
        None => Ok(()),
    }
}

/// Default bind address.
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

/// Default maximum request body size in bytes.
const fn default_max_body_bytes() -> usize {
    64 * 1024
}
