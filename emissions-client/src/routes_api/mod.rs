//! Client for the remote route/emissions service.
//!
//! This module provides an HTTP client for the emissions-calculation API,
//! which computes a route between two places, its travel time, and its
//! estimated CO2 emissions.
//!
//! Key characteristics of the service:
//! - One endpoint: `POST /api/v1/calculate-emissions`
//! - The transport mode is echoed nowhere in the response; the caller
//!   carries it through from the query
//! - Any non-success status or transport failure is a single error class
//!   to the user; there are no automatic retries

mod client;
mod error;
mod mock;
mod types;

use async_trait::async_trait;

use crate::domain::{RouteQuery, RouteResult};

pub use client::{RoutesApiClient, RoutesApiConfig};
pub use error::RoutesApiError;
pub use mock::MockRouteService;
pub use types::{CalculateEmissionsRequest, CalculateEmissionsResponse};

/// The seam between the orchestration layer and a route transport.
///
/// Implemented by the real HTTP client, the caching wrapper, and the mock.
/// The controller depends only on this trait, so any implementation can be
/// substituted in tests.
#[async_trait]
pub trait RouteService: Send + Sync {
    /// Request a route and its emissions for the given query.
    async fn submit(&self, query: &RouteQuery) -> Result<RouteResult, RoutesApiError>;
}
