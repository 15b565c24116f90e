//! Data pipelines for the Skyline offline tooling.
//!
//! Three independent, stateless pipelines share the domain types from
//! `skyline-core`:
//!
//! - [`probe`] reads a bounding box from a PBF header via the external
//!   `osmium` tool;
//! - [`manifest`] and [`combine`] produce and aggregate the region manifest
//!   documents published alongside the artefacts;
//! - [`extract`] (feature-gated) scans a PBF extract for skyline features
//!   and persists them into a region SQLite database.
//!
//! Each pipeline is a linear validate → gather → transform → serialise →
//! write flow with no shared runtime state.

#![forbid(unsafe_code)]

pub mod combine;
#[cfg(feature = "extract")]
pub mod extract;
pub mod manifest;
pub mod probe;

pub use combine::{CombineError, combine_manifests, write_combined_manifest};
#[cfg(feature = "extract")]
pub use extract::{
    ExtractError, ExtractReport, ExtractSummary, PersistFeaturesError, extract_features,
    persist_features_to_sqlite,
};
pub use manifest::{GenerateManifestError, build_region_manifest, write_region_manifest};
pub use probe::{DEFAULT_OSMIUM_BIN, HeaderProbe, ProbeError};
