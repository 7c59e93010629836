//! Geographic value types.

/// A geographic point in WGS84 latitude/longitude degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a point from latitude and longitude in degrees.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// The smallest axis-aligned latitude/longitude rectangle containing a set
/// of points.
///
/// # Invariants
///
/// - `southwest.latitude <= northeast.latitude`
/// - `southwest.longitude <= northeast.longitude`
///
/// No antimeridian handling: regions are built from decoded route paths,
/// which never wrap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingRegion {
    pub southwest: GeoPoint,
    pub northeast: GeoPoint,
}

impl BoundingRegion {
    /// Compute the bounding region of a non-empty point sequence.
    ///
    /// Returns `None` for an empty sequence.
    pub fn of(points: &[GeoPoint]) -> Option<Self> {
        let first = points.first()?;

        let mut south = first.latitude;
        let mut north = first.latitude;
        let mut west = first.longitude;
        let mut east = first.longitude;

        for p in &points[1..] {
            south = south.min(p.latitude);
            north = north.max(p.latitude);
            west = west.min(p.longitude);
            east = east.max(p.longitude);
        }

        Some(Self {
            southwest: GeoPoint::new(south, west),
            northeast: GeoPoint::new(north, east),
        })
    }

    /// The centre of the region.
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.southwest.latitude + self.northeast.latitude) / 2.0,
            (self.southwest.longitude + self.northeast.longitude) / 2.0,
        )
    }
}
