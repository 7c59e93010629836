//! Computed route result type.

use super::TravelMode;

/// A computed route with its estimated emissions.
///
/// Produced by the route service from a successful response; immutable once
/// created. All numeric fields are non-negative as delivered by the service.
/// `encoded_path` is the route geometry in standard polyline encoding and
/// may be empty when the service returned no geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteResult {
    /// Route length in meters.
    pub distance_meters: f64,

    /// Estimated travel time in seconds.
    pub duration_seconds: f64,

    /// Estimated emissions in kilograms of CO2.
    pub emissions_kg: f64,

    /// Encoded polyline of the route geometry.
    pub encoded_path: String,

    /// Transport mode the route was computed for (carried from the query,
    /// not the response).
    pub mode: TravelMode,
}
