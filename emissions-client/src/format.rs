//! Display formatting for route results.
//!
//! Pure functions producing the strings shown next to the map. Numeric
//! rounding matches what users see elsewhere in the product: two decimals
//! for distance and emissions, whole hours and minutes for duration.

use crate::domain::{RouteResult, TravelMode};

/// Format a distance in meters as kilometers, e.g. `"100.00 km"`.
pub fn format_distance_km(meters: f64) -> String {
    format!("{:.2} km", meters / 1000.0)
}

/// Format a duration in seconds as `"{hours}h {minutes}m"`.
///
/// Hours and minutes are floored independently; there is no rounding of
/// minutes and no carry into hours, so 86399 seconds is `"23h 59m"`.
pub fn format_duration(seconds: f64) -> String {
    let hours = (seconds / 3600.0).floor();
    let minutes = ((seconds % 3600.0) / 60.0).floor();
    format!("{hours:.0}h {minutes:.0}m")
}

/// Format emissions in kilograms of CO2, e.g. `"20.00 kg CO2"`.
pub fn format_emissions(kg: f64) -> String {
    format!("{kg:.2} kg CO2")
}

/// Format a transport mode for display: the lowercase wire name.
pub fn format_mode(mode: TravelMode) -> String {
    mode.as_str().to_lowercase()
}

/// The four display lines for a route result, in presentation order:
/// distance, duration, emissions, mode.
pub fn format_result(result: &RouteResult) -> [String; 4] {
    [
        format_distance_km(result.distance_meters),
        format_duration(result.duration_seconds),
        format_emissions(result.emissions_kg),
        format_mode(result.mode),
    ]
}
