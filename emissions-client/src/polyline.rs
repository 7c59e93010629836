//! Encoded polyline codec.
//!
//! Routes arrive from the emissions service as compact polyline strings:
//! latitude/longitude deltas at 1e-5 degree precision, zig-zag signed,
//! packed into 5-bit groups offset into printable ASCII. This module decodes
//! them into point sequences for viewport fitting and rendering, and encodes
//! point sequences back for tests and tooling.
//!
//! Decoding never fails: an empty or malformed string yields an empty
//! sequence, which callers treat as "no route geometry", not as an error.

use crate::domain::{BoundingRegion, GeoPoint};

/// Coordinate scale factor: 1e-5 degree precision.
const SCALE: f64 = 1e5;

/// Lowest valid encoded byte (`?`, the base-64 offset).
const MIN_BYTE: u8 = 63;

/// Highest valid encoded byte (`~`).
const MAX_BYTE: u8 = 126;

/// Decode an encoded polyline into an ordered point sequence.
///
/// Returns an empty vector for empty input and for any malformed input
/// (bytes outside the printable range, a truncated group, or a dangling
/// latitude with no longitude). Partial prefixes of malformed input are
/// discarded rather than returned.
///
/// # Examples
///
/// ```
/// use emissions_client::polyline::decode;
///
/// let points = decode("_p~iF~ps|U");
/// assert_eq!(points.len(), 1);
/// assert!((points[0].latitude - 38.5).abs() < 1e-9);
/// assert!((points[0].longitude - -120.2).abs() < 1e-9);
///
/// assert!(decode("").is_empty());
/// ```
pub fn decode(encoded: &str) -> Vec<GeoPoint> {
    let bytes = encoded.as_bytes();
    let mut points = Vec::new();
    let mut idx = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;

    while idx < bytes.len() {
        let Some((dlat, rest)) = read_delta(bytes, idx) else {
            return Vec::new();
        };
        let Some((dlng, rest)) = read_delta(bytes, rest) else {
            return Vec::new();
        };
        idx = rest;

        lat += dlat;
        lng += dlng;
        points.push(GeoPoint::new(lat as f64 / SCALE, lng as f64 / SCALE));
    }

    points
}

/// Encode an ordered point sequence as a polyline string.
///
/// The inverse of [`decode`]: coordinates are rounded to 1e-5 degrees, so a
/// decode/encode round-trip reproduces coordinates within that precision.
pub fn encode(points: &[GeoPoint]) -> String {
    let mut out = String::new();
    let mut prev_lat: i64 = 0;
    let mut prev_lng: i64 = 0;

    for p in points {
        let lat = (p.latitude * SCALE).round() as i64;
        let lng = (p.longitude * SCALE).round() as i64;
        write_delta(lat - prev_lat, &mut out);
        write_delta(lng - prev_lng, &mut out);
        prev_lat = lat;
        prev_lng = lng;
    }

    out
}

/// Compute the bounding region of a decoded path.
///
/// Returns `None` for an empty path.
pub fn bounding_region(points: &[GeoPoint]) -> Option<BoundingRegion> {
    BoundingRegion::of(points)
}

/// Read one zig-zag-signed delta starting at `idx`.
///
/// Returns the delta and the index past its last byte, or `None` if the
/// group is truncated or contains an out-of-range byte.
fn read_delta(bytes: &[u8], mut idx: usize) -> Option<(i64, usize)> {
    let mut value: i64 = 0;
    let mut shift: u32 = 0;

    loop {
        let &b = bytes.get(idx)?;
        if !(MIN_BYTE..=MAX_BYTE).contains(&b) {
            return None;
        }
        idx += 1;

        let group = i64::from(b - MIN_BYTE);
        value |= (group & 0x1f) << shift;
        shift += 5;

        if group & 0x20 == 0 {
            break;
        }
        // A coordinate delta never needs more than 7 groups; anything
        // longer is garbage input.
        if shift > 35 {
            return None;
        }
    }

    // Undo zig-zag: even values are positive, odd are negative.
    let delta = if value & 1 != 0 {
        !(value >> 1)
    } else {
        value >> 1
    };

    Some((delta, idx))
}

/// Append one delta as zig-zag-signed 5-bit groups.
fn write_delta(delta: i64, out: &mut String) {
    let mut value = ((delta << 1) ^ (delta >> 63)) as u64;

    loop {
        let mut group = (value & 0x1f) as u8;
        value >>= 5;
        if value != 0 {
            group |= 0x20;
        }
        out.push(char::from(group + MIN_BYTE));
        if value == 0 {
            break;
        }
    }
}
