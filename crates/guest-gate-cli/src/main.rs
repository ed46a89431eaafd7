// crates/guest-gate-cli/src/main.rs
// ============================================================================
// Module: Guest Gate CLI Entry Point
// Description: Command dispatcher for claim checks, serving, and config tasks.
// Purpose: Provide a safe CLI around the tenant membership evaluator.
// Dependencies: clap, guest-gate-core, guest-gate-config, guest-gate-http, tokio.
// ============================================================================

//! ## Overview
//! `guest-gate check` classifies a claims file (optionally against a named
//! policy), `guest-gate serve` runs the HTTP decision server, and
//! `guest-gate config validate` checks a config file. Exit codes: `0` when
//! allowed, `2` when denied, `1` on errors.
//!
//! Security posture: input files are untrusted and size-limited.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use guest_gate_config::GuestGateConfig;
use guest_gate_core::ClaimSet;
use guest_gate_core::Principal;
use guest_gate_core::TenantMembershipEvaluator;
use guest_gate_http::HttpServer;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum size of a claims or token payload input file.
const MAX_CLAIMS_BYTES: usize = 1024 * 1024;
/// Exit code reported when a check denies access.
const EXIT_DENIED: u8 = 2;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "guest-gate", version, about = "Tenant membership authorization gate")]
struct Cli {
    /// Selected command.
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify a claims file, optionally against a configured policy.
    Check(CheckCommand),
    /// Start the HTTP decision server.
    Serve(ServeCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Arguments for `check`.
#[derive(Args, Debug)]
struct CheckCommand {
    /// Path to a JSON claims array (or a token payload object).
    #[arg(long, value_name = "PATH")]
    claims: PathBuf,
    /// Treat the input as a decoded token payload object.
    #[arg(long)]
    token_payload: bool,
    /// Policy to evaluate; omit to run the bare membership evaluator.
    #[arg(long, value_name = "NAME")]
    policy: Option<String>,
    /// Optional config file path (defaults to guest-gate.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for `serve`.
#[derive(Args, Debug)]
struct ServeCommand {
    /// Optional config file path (defaults to guest-gate.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Load and validate a config file.
    Validate(ConfigValidateCommand),
}

/// Arguments for config validation.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Optional config file path (defaults to guest-gate.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper carrying a user-facing message.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Check(command) => command_check(&command),
        Commands::Serve(command) => command_serve(command).await,
        Commands::Config {
            command,
        } => command_config(command),
    }
}

// ============================================================================
// SECTION: Check Command
// ============================================================================

/// Executes the `check` command.
fn command_check(command: &CheckCommand) -> CliResult<ExitCode> {
    let claims = read_claims(&command.claims, command.token_payload)?;
    let Some(policy) = command.policy.as_deref() else {
        let assessment = TenantMembershipEvaluator::new().assess(Some(&claims));
        write_json(&assessment)?;
        return Ok(exit_for(assessment.verdict.is_success()));
    };
    let config = GuestGateConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(format!("config load failed: {err}")))?;
    let service = config
        .build_authorization_service()
        .map_err(|err| CliError::new(format!("service init failed: {err}")))?;
    let principal = Principal::from(claims);
    let decision = service
        .authorize(policy, Some(&principal))
        .map_err(|err| CliError::new(format!("check failed: {err}")))?;
    write_json(&decision)?;
    Ok(exit_for(decision.allowed))
}

/// Maps an allow/deny outcome to the process exit code.
fn exit_for(allowed: bool) -> ExitCode {
    if allowed { ExitCode::SUCCESS } else { ExitCode::from(EXIT_DENIED) }
}

/// Reads and parses a claims input file.
fn read_claims(path: &Path, token_payload: bool) -> CliResult<ClaimSet> {
    let bytes = read_bytes_with_limit(path, MAX_CLAIMS_BYTES).map_err(|err| match err {
        ReadLimitError::Io(err) => {
            CliError::new(format!("failed to read {}: {err}", path.display()))
        }
        ReadLimitError::TooLarge {
            size,
            limit,
        } => CliError::new(format!(
            "{} exceeds size limit ({size} > {limit} bytes)",
            path.display()
        )),
    })?;
    parse_claims(&bytes, token_payload)
        .map_err(|err| CliError::new(format!("invalid claims in {}: {err}", path.display())))
}

/// Parses claims from JSON bytes.
fn parse_claims(bytes: &[u8], token_payload: bool) -> Result<ClaimSet, String> {
    if token_payload {
        let payload: Value = serde_json::from_slice(bytes).map_err(|err| err.to_string())?;
        ClaimSet::from_token_payload(&payload).map_err(|err| err.to_string())
    } else {
        serde_json::from_slice(bytes).map_err(|err| err.to_string())
    }
}

// ============================================================================
// SECTION: Serve Command
// ============================================================================

/// Executes the `serve` command.
async fn command_serve(command: ServeCommand) -> CliResult<ExitCode> {
    let config = GuestGateConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(format!("config load failed: {err}")))?;
    let server = HttpServer::bind(&config)
        .await
        .map_err(|err| CliError::new(format!("serve init failed: {err}")))?;
    let addr = server.local_addr().map_err(|err| CliError::new(err.to_string()))?;
    write_stderr_line(&format!("guest-gate listening on http://{addr}"))
        .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    server.run().await.map_err(|err| CliError::new(format!("serve failed: {err}")))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(command) => command_config_validate(&command),
    }
}

/// Executes the config validation command.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    let config = GuestGateConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(format!("config load failed: {err}")))?;
    write_stdout_line(&format!("Config valid ({} policies)", config.policies.len()))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Input Helpers
// ============================================================================

/// Errors from bounded file reads.
#[derive(Debug)]
enum ReadLimitError {
    /// Underlying I/O failure.
    Io(std::io::Error),
    /// File size exceeds the configured limit.
    TooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Allowed limit in bytes.
        limit: usize,
    },
}

/// Reads a file from disk while enforcing a hard size limit.
fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ReadLimitError> {
    let file = File::open(path).map_err(ReadLimitError::Io)?;
    let size = file.metadata().map_err(ReadLimitError::Io)?.len();
    let limit = u64::try_from(max_bytes).map_err(|_| ReadLimitError::TooLarge {
        size,
        limit: max_bytes,
    })?;
    if size > limit {
        return Err(ReadLimitError::TooLarge {
            size,
            limit: max_bytes,
        });
    }
    let mut bytes = Vec::new();
    file.take(limit.saturating_add(1)).read_to_end(&mut bytes).map_err(ReadLimitError::Io)?;
    if bytes.len() > max_bytes {
        return Err(ReadLimitError::TooLarge {
            size: u64::try_from(bytes.len()).unwrap_or(u64::MAX),
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Serializes a value as one JSON line on stdout.
fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let payload = serde_json::to_string(value)
        .map_err(|err| CliError::new(format!("json serialization failed: {err}")))?;
    write_stdout_line(&payload).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
