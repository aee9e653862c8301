//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `CityError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use smartcity_config::ConfigError;
use smartcity_core::presentation::SearchMapper;
use smartcity_core::{CityError, CityId, CoreError};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the city dataset at {url}")]
    #[diagnostic(
        code(smartcity::connection_failed),
        help(
            "Check your network connection or point --base-url at a reachable mirror.\n\
             Cause: {reason}"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {timeout_ms}ms")]
    #[diagnostic(
        code(smartcity::timeout),
        help("Increase the timeout with --timeout-ms or check the dataset host.")
    )]
    Timeout { timeout_ms: u64 },

    // ── Remote ───────────────────────────────────────────────────────
    #[error("City source error: {message}")]
    #[diagnostic(code(smartcity::api_error))]
    Api { message: String },

    #[error("The city dataset could not be decoded: {message}")]
    #[diagnostic(
        code(smartcity::invalid_payload),
        help("The host answered, but not with a city list. Check api.cities_path.")
    )]
    InvalidPayload { message: String },

    // ── Lookup ───────────────────────────────────────────────────────
    #[error("City {id} not found")]
    #[diagnostic(
        code(smartcity::city_not_found),
        help(
            "Run: smartcity search <name> to find city ids.\n\
             `show` only looks at cities already fetched; pass --fetch or set \
             repository.lookup_fetches_on_miss = true."
        )
    )]
    CityNotFound { id: CityId },

    /// A use case failure carried as its user-facing message.
    #[error("{message}")]
    #[diagnostic(code(smartcity::city_error))]
    City { kind: CityError, message: String },

    // ── Local storage ────────────────────────────────────────────────
    #[error("Could not access local data at {path}")]
    #[diagnostic(
        code(smartcity::storage),
        help("{reason}\nMove the file aside or pass --favorites-file to use another one.")
    )]
    Storage { path: String, reason: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(smartcity::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(smartcity::config),
        help("Run: smartcity config path to locate the config file.")
    )]
    Config(#[from] ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(smartcity::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Internal ────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    #[diagnostic(code(smartcity::internal))]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::CityNotFound { .. } => exit_code::NOT_FOUND,
            Self::City { kind, .. } => match kind {
                CityError::ConnectionError => exit_code::CONNECTION,
                CityError::CityNotFound | CityError::NotFound => exit_code::NOT_FOUND,
                CityError::Unknown => exit_code::GENERAL,
            },
            Self::Validation { .. }
            | Self::Config(ConfigError::Validation { .. })
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },
            CoreError::Timeout { timeout_ms } => CliError::Timeout { timeout_ms },
            CoreError::Api { message, status: _ } => CliError::Api { message },
            CoreError::Deserialization { message } => CliError::InvalidPayload { message },
            CoreError::CityNotFound { id } => CliError::CityNotFound { id },
            CoreError::Storage { path, reason } => CliError::Storage { path, reason },
            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

// ── CityError → CliError mapping ─────────────────────────────────────

impl From<CityError> for CliError {
    fn from(kind: CityError) -> Self {
        CliError::City {
            kind,
            message: SearchMapper::resolve_error(kind).message,
        }
    }
}
