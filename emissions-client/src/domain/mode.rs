//! Transport mode type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid transport mode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid transport mode: {input}")]
pub struct InvalidMode {
    input: String,
}

/// A supported transport mode.
///
/// The wire representation (both towards the emissions service and from
/// user input) is the uppercase name, e.g. `"DRIVE"`. This type guarantees
/// that any `TravelMode` value is one of the four supported modes.
///
/// # Examples
///
/// ```
/// use emissions_client::domain::TravelMode;
///
/// let mode = TravelMode::parse("DRIVE").unwrap();
/// assert_eq!(mode.as_str(), "DRIVE");
///
/// // Unknown modes are rejected
/// assert!(TravelMode::parse("TELEPORT").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TravelMode {
    Drive,
    Transit,
    Walk,
    Bicycle,
}

impl TravelMode {
    /// Parse a mode from its uppercase wire name.
    pub fn parse(s: &str) -> Result<Self, InvalidMode> {
        match s {
            "DRIVE" => Ok(TravelMode::Drive),
            "TRANSIT" => Ok(TravelMode::Transit),
            "WALK" => Ok(TravelMode::Walk),
            "BICYCLE" => Ok(TravelMode::Bicycle),
            _ => Err(InvalidMode { input: s.into() }),
        }
    }

    /// Returns the uppercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::Drive => "DRIVE",
            TravelMode::Transit => "TRANSIT",
            TravelMode::Walk => "WALK",
            TravelMode::Bicycle => "BICYCLE",
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
