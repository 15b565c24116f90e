//! WGS84 bounding boxes and the probe text format they are parsed from.

use std::str::FromStr;

use geo::Rect;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rectangular geographic extent in WGS84 degrees.
///
/// Serialised field names follow the manifest wire format (`minLon` and
/// friends). The `min <= max` ordering on each axis is trusted from the
/// upstream extract and is not enforced here.
///
/// # Examples
/// ```
/// use skyline_core::Bbox;
///
/// let bbox: Bbox = "-8.65,49.86,1.76,60.86".parse()?;
/// assert_eq!(bbox.min_lon, -8.65);
/// assert_eq!(bbox.max_lat, 60.86);
/// # Ok::<(), skyline_core::BboxParseError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bbox {
    /// Western edge.
    #[serde(rename = "minLon")]
    pub min_lon: f64,
    /// Southern edge.
    #[serde(rename = "minLat")]
    pub min_lat: f64,
    /// Eastern edge.
    #[serde(rename = "maxLon")]
    pub max_lon: f64,
    /// Northern edge.
    #[serde(rename = "maxLat")]
    pub max_lat: f64,
}

/// Errors produced when parsing bounding-box text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BboxParseError {
    /// The text did not contain exactly four comma-separated fields.
    #[error("unexpected bbox format: '{text}'")]
    FieldCount {
        /// The offending input line.
        text: String,
    },
    /// A field was present but did not parse as a decimal number.
    #[error("failed to parse bbox numbers: '{text}'")]
    InvalidNumber {
        /// The offending input line.
        text: String,
    },
}

impl FromStr for Bbox {
    type Err = BboxParseError;

    /// Parse a single line of exactly four comma-separated decimal fields in
    /// `minLon, minLat, maxLon, maxLat` order. Fields may carry surrounding
    /// whitespace.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = text.split(',').collect();
        let [min_lon, min_lat, max_lon, max_lat] = fields.as_slice() else {
            return Err(BboxParseError::FieldCount {
                text: text.to_owned(),
            });
        };
        let parse = |field: &str| {
            field
                .trim()
                .parse::<f64>()
                .map_err(|_| BboxParseError::InvalidNumber {
                    text: text.to_owned(),
                })
        };
        Ok(Self {
            min_lon: parse(min_lon)?,
            min_lat: parse(min_lat)?,
            max_lon: parse(max_lon)?,
            max_lat: parse(max_lat)?,
        })
    }
}

impl From<Rect<f64>> for Bbox {
    /// Convert accumulated coordinate bounds into a manifest bounding box.
    /// Coordinates are WGS84 with `x = longitude`, `y = latitude`.
    fn from(rect: Rect<f64>) -> Self {
        Self {
            min_lon: rect.min().x,
            min_lat: rect.min().y,
            max_lon: rect.max().x,
            max_lat: rect.max().y,
        }
    }
}
