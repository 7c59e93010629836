//! Wire types for the routes API.

use serde::{Deserialize, Serialize};

use crate::domain::{RouteQuery, RouteResult, TravelMode};

/// Request body for `POST /api/v1/calculate-emissions`.
#[derive(Debug, Serialize)]
pub struct CalculateEmissionsRequest<'a> {
    /// Origin address or place name
    pub origin: &'a str,

    /// Destination address or place name
    pub destination: &'a str,

    /// Transport mode (uppercase wire name)
    pub mode: TravelMode,
}

impl<'a> CalculateEmissionsRequest<'a> {
    /// Build the request body from a validated query.
    pub fn from_query(query: &'a RouteQuery) -> Self {
        Self {
            origin: query.origin(),
            destination: query.destination(),
            mode: query.mode(),
        }
    }
}

/// Successful response body from the emissions service.
#[derive(Debug, Deserialize)]
pub struct CalculateEmissionsResponse {
    /// Route length in meters
    pub distance: f64,

    /// Travel time in seconds
    pub duration: f64,

    /// Estimated emissions in kg CO2
    pub emissions: f64,

    /// Encoded polyline of the route geometry
    pub polyline: String,
}

impl CalculateEmissionsResponse {
    /// Convert into the domain result, carrying the mode from the query.
    pub fn into_result(self, mode: TravelMode) -> RouteResult {
        RouteResult {
            distance_meters: self.distance,
            duration_seconds: self.duration,
            emissions_kg: self.emissions,
            encoded_path: self.polyline,
            mode,
        }
    }
}
