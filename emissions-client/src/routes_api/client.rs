//! Routes API HTTP client.
//!
//! Provides the async client for the emissions-calculation endpoint and
//! its configuration.

use async_trait::async_trait;

use crate::domain::{RouteQuery, RouteResult};

use super::RouteService;
use super::error::RoutesApiError;
use super::types::{CalculateEmissionsRequest, CalculateEmissionsResponse};

/// Default base URL for the emissions service.
const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Path of the route-calculation endpoint.
const CALCULATE_PATH: &str = "/api/v1/calculate-emissions";

/// Configuration for the routes client.
#[derive(Debug, Clone)]
pub struct RoutesApiConfig {
    /// Base URL for the service (defaults to a local backend)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl RoutesApiConfig {
    /// Create a new config with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: 30,
        }
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for RoutesApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// HTTP client for the emissions-calculation service.
///
/// One request per submission; a failed request is resubmitted only by an
/// explicit user action, never retried here.
#[derive(Debug, Clone)]
pub struct RoutesApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl RoutesApiClient {
    /// Create a new client with the given configuration.
    pub fn new(config: RoutesApiConfig) -> Result<Self, RoutesApiError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// Request a computed route and its emissions.
    ///
    /// Maps a 2xx `{distance, duration, emissions, polyline}` body into a
    /// [`RouteResult`], with the transport mode carried from the query.
    /// Any other status, a transport failure, or an undecodable body is an
    /// error.
    pub async fn calculate(&self, query: &RouteQuery) -> Result<RouteResult, RoutesApiError> {
        let url = format!("{}{}", self.base_url, CALCULATE_PATH);

        let response = self
            .http
            .post(&url)
            .json(&CalculateEmissionsRequest::from_query(query))
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RoutesApiError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let payload: CalculateEmissionsResponse =
            serde_json::from_str(&body).map_err(|e| RoutesApiError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            })?;

        Ok(payload.into_result(query.mode()))
    }
}

#[async_trait]
impl RouteService for RoutesApiClient {
    async fn submit(&self, query: &RouteQuery) -> Result<RouteResult, RoutesApiError> {
        self.calculate(query).await
    }
}
