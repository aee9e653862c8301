// Shared transport configuration for building reqwest::Client instances.
//
// Timeout and user agent live here so every client built by the crate
// applies the same connect and request limits.

use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};

use crate::error::Error;

/// Default timeout applied to connecting and to the whole request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(20_000);

const USER_AGENT: &str = concat!("smartcity/", env!("CARGO_PKG_VERSION"));

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: USER_AGENT.into(),
        }
    }
}

impl TransportConfig {
    /// Config with the given timeout and the default user agent.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }

    /// Timeout in whole milliseconds, as reported in [`Error::Timeout`].
    pub fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }

    /// Build a `reqwest::Client` from this config.
    ///
    /// Every request asks for JSON; the city endpoint serves a raw file and
    /// does not negotiate, so the header is informational.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        reqwest::Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.timeout)
            .user_agent(self.user_agent.as_str())
            .default_headers(headers)
            .build()
            .map_err(|e| Error::HttpClient(e.to_string()))
    }
}
