//! Jikan request transport.

use super::params::{PathSegment, QueryParameters};
use super::url_builder::build_url;
use crate::error::{JikanError, Result};
use crate::settings::SettingsProvider;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::config::JikanConfig;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Header identifying this client to the official MyAnimeList API
pub const MAL_CLIENT_ID_HEADER: &str = "x-mal-client-id";

/// Fully resolved request: target URL plus origin-specific headers
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub url: Url,
    pub headers: HeaderMap,
}

/// Single-shot GET transport over the Jikan API.
///
/// Requests go to the base URL from the settings provider, or to the
/// official MyAnimeList API when the alternate origin is requested.
#[derive(Debug, Clone)]
pub struct Request {
    /// HTTP client
    client: Client,
    /// Primary base URL source, read on every call
    settings: Arc<dyn SettingsProvider>,
    /// Base URL for alternate-origin requests
    alternate_origin: String,
    /// Value of the X-MAL-CLIENT-ID header
    mal_client_id: String,
}

impl Request {
    /// Create a transport with default client settings
    pub fn new(settings: Arc<dyn SettingsProvider>) -> Result<Self> {
        Self::from_config(&JikanConfig::default(), settings)
    }

    /// Create a transport from the `[jikan]` config section
    pub fn from_config(config: &JikanConfig, settings: Arc<dyn SettingsProvider>) -> Result<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.as_str());
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            settings,
            alternate_origin: config.mal_base_url.clone(),
            mal_client_id: config.mal_client_id.clone(),
        })
    }

    /// Override the alternate origin (defaults to the official MAL API)
    pub fn with_alternate_origin(mut self, origin: impl Into<String>) -> Self {
        self.alternate_origin = origin.into();
        self
    }

    /// Override the client identifier sent to the alternate origin
    pub fn with_mal_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.mal_client_id = client_id.into();
        self
    }

    pub fn settings(&self) -> &Arc<dyn SettingsProvider> {
        &self.settings
    }

    /// Resolve origin and headers and build the target URL, without any I/O
    pub fn prepare(
        &self,
        segments: &[PathSegment],
        params: Option<&QueryParameters>,
        use_alternate_origin: bool,
    ) -> Result<PreparedRequest> {
        let mut headers = HeaderMap::new();

        let origin = if use_alternate_origin {
            let client_id = HeaderValue::from_str(&self.mal_client_id).map_err(|e| {
                JikanError::InvalidInput(format!("Invalid MAL client id: {}", e))
            })?;
            headers.insert(HeaderName::from_static(MAL_CLIENT_ID_HEADER), client_id);
            self.alternate_origin.clone()
        } else {
            self.settings.base_url()
        };

        let url = build_url(&origin, segments, params)?;
        Ok(PreparedRequest { url, headers })
    }

    /// Send a GET request and return the parsed JSON body.
    ///
    /// The body is buffered and parsed before the status is looked at, so a
    /// non-JSON body is a decode error whatever the status. Any status other
    /// than 200 becomes [`JikanError::Api`] carrying the body's `error` field.
    pub async fn send(
        &self,
        segments: &[PathSegment],
        params: Option<&QueryParameters>,
        use_alternate_origin: bool,
    ) -> Result<Value> {
        let PreparedRequest { url, headers } =
            self.prepare(segments, params, use_alternate_origin)?;

        debug!(url = %url, alternate_origin = use_alternate_origin, "Making API request");

        let response = self
            .client
            .get(url.clone())
            .headers(headers)
            .send()
            .await
            .map_err(|e| {
                warn!(url = %url, error = %e, "Request error");
                JikanError::Transport(e)
            })?;

        let status = response.status();
        let body = response.bytes().await?;

        let payload: Value = serde_json::from_slice(&body).map_err(|e| {
            warn!(url = %url, status = %status, error = %e, "Failed to parse response");
            JikanError::Decode(e)
        })?;

        if status != StatusCode::OK {
            let error = JikanError::from_error_body(status, &payload);
            warn!(url = %url, status = %status, error = %error, "Request failed");
            return Err(error);
        }

        debug!(url = %url, bytes = body.len(), "Request successful");
        Ok(payload)
    }

    /// [`send`](Self::send), then map the payload onto `T`
    pub async fn send_as<T: DeserializeOwned>(
        &self,
        segments: &[PathSegment],
        params: Option<&QueryParameters>,
        use_alternate_origin: bool,
    ) -> Result<T> {
        let payload = self.send(segments, params, use_alternate_origin).await?;
        Ok(serde_json::from_value(payload)?)
    }
}
