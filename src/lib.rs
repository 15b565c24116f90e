//! Facade crate for the Skyline offline tooling.
//!
//! Re-exports the manifest domain types and the data-preparation pipelines:
//! bounding-box probing, region manifest generation, manifest combination,
//! and (behind the `extract` feature flag) PBF feature extraction with
//! SQLite persistence.

#![forbid(unsafe_code)]

pub use skyline_core::{
    Bbox, BboxParseError, CombinedManifest, DbArtefact, Feature, FeatureKind, RegionManifest,
    parse_height, to_json_payload,
};

pub use skyline_data::{
    CombineError, DEFAULT_OSMIUM_BIN, GenerateManifestError, HeaderProbe, ProbeError,
    build_region_manifest, combine_manifests, write_combined_manifest, write_region_manifest,
};

#[cfg(feature = "extract")]
pub use skyline_data::{
    ExtractError, ExtractReport, ExtractSummary, PersistFeaturesError, extract_features,
    persist_features_to_sqlite,
};
