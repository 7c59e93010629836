//! Map capability and viewport synchronization.
//!
//! The concrete map widget is an external collaborator; this module defines
//! the narrow interface the rest of the crate depends on, plus the
//! synchronizer that keeps the viewport fitted to the current route
//! geometry.

use std::sync::{Arc, Mutex};

use tracing::info;

use crate::domain::{BoundingRegion, GeoPoint};
use crate::polyline;

/// Viewport padding used when none is configured, in pixels.
pub const DEFAULT_PADDING_PX: u32 = 50;

/// The map rendering capability.
///
/// Implementations own their viewport for the session; nothing else pans or
/// zooms the map. Commands are fire-and-forget.
pub trait MapSurface: Send + Sync {
    /// Draw the map centred on `center`, with `path` as a line overlay.
    /// An empty path means no overlay.
    fn render(&self, center: GeoPoint, path: &[GeoPoint]);

    /// Adjust pan/zoom so `region` is fully visible with `padding_px`
    /// pixels of padding on all sides. Idempotent for equal inputs.
    fn fit_to_region(&self, region: BoundingRegion, padding_px: u32);
}

/// Keeps the map viewport fitted to the current route geometry.
pub struct ViewportSynchronizer {
    map: Arc<dyn MapSurface>,
    padding_px: u32,
}

impl ViewportSynchronizer {
    /// Create a synchronizer with the default padding.
    pub fn new(map: Arc<dyn MapSurface>) -> Self {
        Self {
            map,
            padding_px: DEFAULT_PADDING_PX,
        }
    }

    /// Set the viewport padding in pixels.
    pub fn with_padding(mut self, padding_px: u32) -> Self {
        self.padding_px = padding_px;
        self
    }

    /// Fit the viewport to the bounding region of `points`.
    ///
    /// No-op for an empty path: a route without geometry leaves the
    /// viewport where it is.
    pub fn fit_to_path(&self, points: &[GeoPoint]) {
        if let Some(region) = polyline::bounding_region(points) {
            self.map.fit_to_region(region, self.padding_px);
        }
    }
}

/// Map surface that logs commands instead of drawing.
///
/// Stands in for the real widget in headless runs.
pub struct LoggingMapSurface;

impl MapSurface for LoggingMapSurface {
    fn render(&self, center: GeoPoint, path: &[GeoPoint]) {
        info!(
            lat = center.latitude,
            lng = center.longitude,
            path_points = path.len(),
            "map render"
        );
    }

    fn fit_to_region(&self, region: BoundingRegion, padding_px: u32) {
        info!(
            sw_lat = region.southwest.latitude,
            sw_lng = region.southwest.longitude,
            ne_lat = region.northeast.latitude,
            ne_lng = region.northeast.longitude,
            padding_px,
            "map fit to region"
        );
    }
}

/// A command received by a [`RecordingMapSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum MapCommand {
    Render {
        center: GeoPoint,
        path_points: usize,
    },
    FitToRegion {
        region: BoundingRegion,
        padding_px: u32,
    },
}

/// Map surface that records every command, for assertions in tests.
#[derive(Clone, Default)]
pub struct RecordingMapSurface {
    commands: Arc<Mutex<Vec<MapCommand>>>,
}

impl RecordingMapSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// All commands received so far, in order.
    pub fn commands(&self) -> Vec<MapCommand> {
        self.commands.lock().unwrap().clone()
    }

    /// The fit commands received so far, in order.
    pub fn fits(&self) -> Vec<(BoundingRegion, u32)> {
        self.commands()
            .into_iter()
            .filter_map(|c| match c {
                MapCommand::FitToRegion { region, padding_px } => Some((region, padding_px)),
                _ => None,
            })
            .collect()
    }
}

impl MapSurface for RecordingMapSurface {
    fn render(&self, center: GeoPoint, path: &[GeoPoint]) {
        self.commands.lock().unwrap().push(MapCommand::Render {
            center,
            path_points: path.len(),
        });
    }

    fn fit_to_region(&self, region: BoundingRegion, padding_px: u32) {
        self.commands
            .lock()
            .unwrap()
            .push(MapCommand::FitToRegion { region, padding_px });
    }
}
