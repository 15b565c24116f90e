//! Core domain types for the Skyline offline tooling.
//!
//! These models carry the geographic and storage metadata shared by the
//! manifest and extraction pipelines: WGS84 bounding boxes, per-region
//! manifests, the combined manifest, and the skyline features persisted to
//! region databases. Parsing lives here so downstream crates agree on the
//! wire formats; filesystem and process concerns stay in `skyline-data`.

#![forbid(unsafe_code)]

pub mod bbox;
pub mod feature;
pub mod manifest;

pub use bbox::{Bbox, BboxParseError};
pub use feature::{Feature, FeatureKind, parse_height};
pub use manifest::{CombinedManifest, DbArtefact, RegionManifest, to_json_payload};
