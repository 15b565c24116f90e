//! Region manifest generation.
//!
//! A manifest records the bounding box of a region's source extract, the
//! logical name and byte size of its database artefact, and the local
//! generation time. Each run produces a fresh document; manifests are never
//! updated in place.

use camino::{Utf8Path, Utf8PathBuf};
use chrono::Local;
use skyline_core::{RegionManifest, to_json_payload};
use thiserror::Error;

use crate::probe::{HeaderProbe, ProbeError};

/// Errors produced while generating or writing a region manifest.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenerateManifestError {
    /// Probing the PBF header for its bounding box failed.
    #[error(transparent)]
    Probe(#[from] ProbeError),
    /// Reading the database artefact's byte size failed.
    #[error("failed to read size of db {path}: {source}")]
    DbSize {
        /// Path of the database artefact.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Serialising the manifest failed.
    #[error("failed to serialise manifest: {0}")]
    Serialise(#[source] serde_json::Error),
    /// Writing the manifest file failed.
    #[error("failed to write manifest to {path}: {source}")]
    Write {
        /// Destination path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Build the manifest for `region` from its database artefact and source
/// extract.
///
/// Probes the PBF header for the bounding box, reads the database's exact
/// byte size from filesystem metadata, and stamps the document with the
/// current local time (ISO-8601, microsecond precision, no timezone
/// suffix). Input existence is the caller's concern; missing files surface
/// here as probe or metadata failures.
pub fn build_region_manifest(
    region: &str,
    db: &Utf8Path,
    pbf: &Utf8Path,
    probe: &HeaderProbe,
) -> Result<RegionManifest, GenerateManifestError> {
    let bbox = probe.read_bounds(pbf)?;
    let size_bytes =
        skyline_fs::file_size(db).map_err(|source| GenerateManifestError::DbSize {
            path: db.to_path_buf(),
            source,
        })?;
    let updated_at = Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string();
    Ok(RegionManifest::new(region, bbox, size_bytes, updated_at))
}

/// Serialise `manifest` and write it to `output` with a trailing newline.
///
/// The output's parent directory must already exist; unlike the combiner,
/// the generator never creates directories.
pub fn write_region_manifest(
    manifest: &RegionManifest,
    output: &Utf8Path,
) -> Result<(), GenerateManifestError> {
    let payload = to_json_payload(manifest).map_err(GenerateManifestError::Serialise)?;
    skyline_fs::write_file(output, payload).map_err(|source| GenerateManifestError::Write {
        path: output.to_path_buf(),
        source,
    })
}
