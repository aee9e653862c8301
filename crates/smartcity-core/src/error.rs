// ── Core error types ──
//
// `CoreError` is what the stores and the repository raise; it keeps enough
// of the underlying failure to classify it later. `CityError` is the
// four-way taxonomy the use cases hand to presentation code.

use strum::IntoStaticStr;
use thiserror::Error;

use crate::model::CityId;

/// Unified error type for repository and store operations.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach city source at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("City source timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    // ── Remote errors ────────────────────────────────────────────────
    #[error("City source error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    #[error("Malformed city payload: {message}")]
    Deserialization { message: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("City not found: {id}")]
    CityNotFound { id: CityId },

    // ── Storage errors ───────────────────────────────────────────────
    #[error("Storage error at {path}: {reason}")]
    Storage { path: String, reason: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub(crate) fn storage(path: &std::path::Path, reason: impl std::fmt::Display) -> Self {
        Self::Storage {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<smartcity_api::Error> for CoreError {
    fn from(err: smartcity_api::Error) -> Self {
        match err {
            smartcity_api::Error::Transport(ref e) => {
                // The client reports its own timeouts as `Error::Timeout`
                // with the configured budget.
                if e.is_timeout() || e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            smartcity_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            smartcity_api::Error::Timeout { timeout_ms } => CoreError::Timeout { timeout_ms },
            smartcity_api::Error::HttpClient(reason) => CoreError::Config {
                message: format!("HTTP client setup failed: {reason}"),
            },
            smartcity_api::Error::Http { status, url } => CoreError::Api {
                message: format!("HTTP {status} from {url}"),
                status: Some(status),
            },
            smartcity_api::Error::Deserialization { message, body: _ } => {
                CoreError::Deserialization { message }
            }
        }
    }
}

// ── Domain error taxonomy ────────────────────────────────────────────

/// Error kinds surfaced by the use cases.
///
/// `IntoStaticStr` yields the stable variant name (`"ConnectionError"`),
/// which the map view shows verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, IntoStaticStr)]
pub enum CityError {
    /// Catch-all, including a store operation that reported `false`.
    #[error("unknown error")]
    Unknown,
    /// Reserved; no call site produces it yet.
    #[error("not found")]
    NotFound,
    #[error("city not found")]
    CityNotFound,
    /// Host unreachable, DNS failure or timeout.
    #[error("connection error")]
    ConnectionError,
}

impl CityError {
    pub fn name(self) -> &'static str {
        self.into()
    }
}

impl From<&CoreError> for CityError {
    fn from(err: &CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { .. } | CoreError::Timeout { .. } => {
                CityError::ConnectionError
            }
            CoreError::CityNotFound { .. } => CityError::CityNotFound,
            _ => CityError::Unknown,
        }
    }
}

impl From<CoreError> for CityError {
    fn from(err: CoreError) -> Self {
        CityError::from(&err)
    }
}
