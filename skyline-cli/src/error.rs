//! Error types emitted by the Skyline CLI.
//!
//! Every failure surfaces here so `main` can print a single
//! `error: <message>` line and exit non-zero.

use std::sync::Arc;

use camino::Utf8PathBuf;
use skyline_data::{CombineError, ExtractError, GenerateManifestError, PersistFeaturesError};
use thiserror::Error;

/// Errors emitted by the Skyline CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name of the missing option.
        field: &'static str,
        /// Environment variable that could also supply it.
        env: &'static str,
    },
    /// A referenced input path does not exist on disk or is not a file.
    #[error("{field} not found: {path}")]
    MissingSourceFile {
        /// Flag name of the offending option.
        field: &'static str,
        /// The missing path.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path}: {source}")]
    InspectSourcePath {
        /// Flag name of the offending option.
        field: &'static str,
        /// The uninspectable path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Generating or writing the region manifest failed.
    #[error(transparent)]
    GenerateManifest(#[from] GenerateManifestError),
    /// Combining or writing manifests failed.
    #[error(transparent)]
    Combine(#[from] CombineError),
    /// Scanning the PBF for features failed.
    #[error(transparent)]
    Extract(#[from] ExtractError),
    /// Persisting extracted features failed.
    #[error("failed to persist features to {path}: {source}")]
    PersistFeatures {
        /// Destination database path.
        path: Utf8PathBuf,
        /// Underlying persistence error.
        #[source]
        source: PersistFeaturesError,
    },
    /// Writing the extraction summary failed.
    #[error("failed to write extraction summary: {0}")]
    WriteExtractSummary(#[source] std::io::Error),
}
