//! Skyline features extracted from OpenStreetMap data.

use geo::Coord;

/// Category of a rendered skyline feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureKind {
    /// A tall building anchored at its first way node.
    Building,
    /// A mountain peak (`natural=peak`).
    Peak,
    /// A mast (`man_made=mast`).
    Mast,
    /// A tower (`man_made=tower`).
    Tower,
}

impl FeatureKind {
    /// Label stored in the `type` column of the feature database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Building => "building",
            Self::Peak => "peak",
            Self::Mast => "mast",
            Self::Tower => "tower",
        }
    }
}

/// A single feature destined for a region database.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`. Names and
/// addresses mirror OSM tag values and may be empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// Display name, empty when untagged.
    pub name: String,
    /// Feature category.
    pub kind: FeatureKind,
    /// Height in metres, `0.0` when unknown.
    pub height: f64,
    /// Building levels, `0` for non-buildings.
    pub levels: i64,
    /// Joined street address, empty when untagged.
    pub address: String,
    /// Geospatial position.
    pub location: Coord<f64>,
}

/// Parse an OSM height tag value in metres.
///
/// Accepts bare numbers and unit-annotated values such as `"30 m"`: the
/// first whitespace-separated token is used with a trailing `m` stripped.
/// Absent or unparseable values yield `0.0`.
///
/// # Examples
/// ```
/// use skyline_core::parse_height;
///
/// assert_eq!(parse_height("30 m"), 30.0);
/// assert_eq!(parse_height("100m"), 100.0);
/// assert_eq!(parse_height(""), 0.0);
/// ```
#[must_use]
pub fn parse_height(raw: &str) -> f64 {
    let Some(token) = raw.split_whitespace().next() else {
        return 0.0;
    };
    token.trim_end_matches('m').parse().unwrap_or(0.0)
}
