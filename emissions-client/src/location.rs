//! User location resolution.
//!
//! The host environment may expose a geolocation capability; when it does
//! not, or when the user denies the request, the resolver falls back to a
//! fixed default point. The fallback is deliberate product behavior and is
//! never surfaced to the user.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::domain::GeoPoint;

/// Default location used when no position can be obtained (San Francisco).
pub const DEFAULT_LOCATION: GeoPoint = GeoPoint {
    latitude: 37.7749,
    longitude: -122.4194,
};

/// Errors from a geolocation capability.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GeolocationError {
    /// The user denied the position request
    #[error("position request denied")]
    Denied,

    /// The capability could not produce a position
    #[error("position unavailable: {0}")]
    Unavailable(String),
}

/// A host capability that can report the user's current position once.
#[async_trait]
pub trait GeolocationCapability: Send + Sync {
    /// Request the current position.
    async fn current_position(&self) -> Result<GeoPoint, GeolocationError>;
}

/// A capability that always reports a fixed position.
#[derive(Debug, Clone, Copy)]
pub struct StaticPosition(pub GeoPoint);

#[async_trait]
impl GeolocationCapability for StaticPosition {
    async fn current_position(&self) -> Result<GeoPoint, GeolocationError> {
        Ok(self.0)
    }
}

/// A capability that always denies the position request.
#[derive(Debug, Clone, Copy)]
pub struct Denied;

#[async_trait]
impl GeolocationCapability for Denied {
    async fn current_position(&self) -> Result<GeoPoint, GeolocationError> {
        Err(GeolocationError::Denied)
    }
}

/// Resolves the user's location once per session.
///
/// Never fails outward: denial, capability errors, and a missing capability
/// all resolve to [`DEFAULT_LOCATION`]. The underlying capability is asked
/// at most once; concurrent and repeated calls share the first outcome.
pub struct LocationResolver {
    capability: Option<Arc<dyn GeolocationCapability>>,
    resolved: OnceCell<GeoPoint>,
}

impl LocationResolver {
    /// Create a resolver backed by the given capability.
    pub fn new(capability: Arc<dyn GeolocationCapability>) -> Self {
        Self {
            capability: Some(capability),
            resolved: OnceCell::new(),
        }
    }

    /// Create a resolver for a host with no geolocation capability.
    pub fn without_capability() -> Self {
        Self {
            capability: None,
            resolved: OnceCell::new(),
        }
    }

    /// Resolve the user's location.
    pub async fn resolve(&self) -> GeoPoint {
        *self
            .resolved
            .get_or_init(|| async {
                match &self.capability {
                    Some(capability) => match capability.current_position().await {
                        Ok(position) => position,
                        Err(e) => {
                            debug!(error = %e, "falling back to default location");
                            DEFAULT_LOCATION
                        }
                    },
                    None => DEFAULT_LOCATION,
                }
            })
            .await
    }
}
