//! Manifest documents describing region artefacts.
//!
//! Field declaration order is load-bearing: manifests are serialised with
//! keys in the order the structs declare them, and consumers rely on the
//! published layout.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Bbox;

/// Metadata for a single region's prepared artefacts.
///
/// # Examples
/// ```
/// use skyline_core::{Bbox, RegionManifest};
///
/// let bbox: Bbox = "-8.65,49.86,1.76,60.86".parse()?;
/// let manifest = RegionManifest::new("uk", bbox, 1000, "2026-08-06T12:00:00.000000");
/// assert_eq!(manifest.id, "uk-latest");
/// assert_eq!(manifest.db.object, "uk-latest.db");
/// # Ok::<(), skyline_core::BboxParseError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionManifest {
    /// Stable identifier, `<region>-latest`.
    pub id: String,
    /// Region slug, e.g. `uk`.
    pub region: String,
    /// Geographic extent of the source extract.
    pub bbox: Bbox,
    /// The database artefact built for this region.
    pub db: DbArtefact,
    /// Local generation time, ISO-8601, no timezone suffix.
    pub updated_at: String,
}

/// Logical name and size of a region's database artefact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbArtefact {
    /// Logical object name, `<region>-latest.db`.
    pub object: String,
    /// Exact byte length of the database file.
    pub size_bytes: u64,
}

impl RegionManifest {
    /// Assemble a manifest for `region`, deriving the artefact names from
    /// the slug.
    pub fn new(
        region: impl Into<String>,
        bbox: Bbox,
        size_bytes: u64,
        updated_at: impl Into<String>,
    ) -> Self {
        let region = region.into();
        Self {
            id: format!("{region}-latest"),
            db: DbArtefact {
                object: format!("{region}-latest.db"),
                size_bytes,
            },
            region,
            bbox,
            updated_at: updated_at.into(),
        }
    }
}

/// Aggregation of every per-region manifest into one document.
///
/// `regions` embeds the parsed input documents as-is; the combiner does not
/// validate their shape, so any JSON value is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedManifest {
    /// Freshness timestamp, UTC with a literal `Z` suffix unless overridden.
    pub updated_at: String,
    /// Per-region documents ordered by their source paths.
    pub regions: Vec<Value>,
}

/// Serialise a manifest document as its on-disk payload: two-space indented
/// JSON followed by a trailing newline.
pub fn to_json_payload<T: Serialize>(document: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(document).map(|mut payload| {
        payload.push('\n');
        payload
    })
}
