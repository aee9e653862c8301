// City dataset HTTP client
//
// Wraps `reqwest::Client` with URL construction, status checking and
// body decoding for the single city list endpoint.

use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::CityPayload;
use crate::transport::TransportConfig;

/// Host serving the published dataset.
pub const DEFAULT_BASE_URL: &str = "https://gist.githubusercontent.com/";

/// Path of the dataset file, relative to [`DEFAULT_BASE_URL`].
pub const DEFAULT_CITIES_PATH: &str = "hernan-uala/dce8843a8edbe0b0018b32e137bc2b3a/raw/0996accf70cb0ca0e16f9a99e0ee185fafca7af1/cities.json";

/// Raw HTTP client for the city dataset.
///
/// One GET, no pagination, no query parameters and no authentication.
/// The whole list is returned in a single response body.
#[derive(Debug, Clone)]
pub struct CityApiClient {
    http: reqwest::Client,
    cities_url: Url,
    timeout_ms: u64,
}

impl CityApiClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is treated as a directory: a missing trailing slash is
    /// added before `cities_path` is joined onto it.
    pub fn new(base_url: &Url, cities_path: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            cities_url: cities_url(base_url, cities_path)?,
            timeout_ms: transport.timeout_ms(),
        })
    }

    /// Fetch the complete city list.
    pub async fn list_cities(&self) -> Result<Vec<CityPayload>, Error> {
        let url = self.cities_url.clone();
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                url: resp.url().to_string(),
            });
        }

        let body = resp.text().await.map_err(|e| self.transport_error(e))?;
        let cities: Vec<CityPayload> =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body: body.chars().take(512).collect(),
            })?;

        debug!(count = cities.len(), "decoded city list");
        Ok(cities)
    }

    /// Timeouts can surface while sending or while reading the body.
    fn transport_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout {
                timeout_ms: self.timeout_ms,
            }
        } else {
            Error::Transport(e)
        }
    }
}

fn cities_url(base_url: &Url, cities_path: &str) -> Result<Url, Error> {
    let mut base = base_url.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base.join(cities_path.trim_start_matches('/'))?)
}
