//! Route query type.

use super::TravelMode;

/// Error returned when constructing a query from invalid input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid route query: {reason}")]
pub struct InvalidQuery {
    reason: &'static str,
}

/// A validated request for a route between two places.
///
/// Origin and destination are guaranteed non-empty after trimming; no
/// request is dispatched for input that fails this check.
///
/// Derives `Eq` and `Hash` so identical queries can share a cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteQuery {
    origin: String,
    destination: String,
    mode: TravelMode,
}

impl RouteQuery {
    /// Construct a query, trimming both endpoints.
    ///
    /// # Errors
    ///
    /// Returns `Err` if origin or destination is empty after trimming.
    pub fn new(
        origin: impl Into<String>,
        destination: impl Into<String>,
        mode: TravelMode,
    ) -> Result<Self, InvalidQuery> {
        let origin = origin.into().trim().to_string();
        let destination = destination.into().trim().to_string();

        if origin.is_empty() {
            return Err(InvalidQuery {
                reason: "origin must not be empty",
            });
        }
        if destination.is_empty() {
            return Err(InvalidQuery {
                reason: "destination must not be empty",
            });
        }

        Ok(Self {
            origin,
            destination,
            mode,
        })
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn mode(&self) -> TravelMode {
        self.mode
    }
}
