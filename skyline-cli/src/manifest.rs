//! Manifest command implementation for the Skyline CLI.

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use skyline_data::{
    DEFAULT_OSMIUM_BIN, HeaderProbe, build_region_manifest, write_region_manifest,
};

use crate::{
    ARG_MANIFEST_DB, ARG_MANIFEST_OSMIUM_BIN, ARG_MANIFEST_OUTPUT, ARG_MANIFEST_PBF,
    ARG_MANIFEST_REGION_ID, CliError, ENV_MANIFEST_DB, ENV_MANIFEST_OUTPUT, ENV_MANIFEST_PBF,
    ENV_MANIFEST_REGION_ID, require_existing,
};

/// CLI arguments for the `manifest` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Generate the JSON manifest describing a prepared region: \
                 its bounding box (read from the PBF header via osmium), the \
                 database artefact's name and byte size, and the generation \
                 time. Options can come from CLI flags, configuration files, \
                 or environment variables.",
    about = "Generate the manifest for a region database"
)]
#[ortho_config(prefix = "SKYLINE")]
pub(crate) struct ManifestArgs {
    /// Region slug (e.g. uk).
    #[arg(long = ARG_MANIFEST_REGION_ID, value_name = "slug")]
    #[serde(default)]
    pub(crate) region_id: Option<String>,
    /// Path to the region SQLite database.
    #[arg(long = ARG_MANIFEST_DB, value_name = "path")]
    #[serde(default)]
    pub(crate) db: Option<Utf8PathBuf>,
    /// Path to the source .osm.pbf file.
    #[arg(long = ARG_MANIFEST_PBF, value_name = "path")]
    #[serde(default)]
    pub(crate) pbf: Option<Utf8PathBuf>,
    /// Where to write the manifest JSON file.
    #[arg(long = ARG_MANIFEST_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
    /// Header-inspection command used to read PBF bounds.
    #[arg(long = ARG_MANIFEST_OSMIUM_BIN, value_name = "command")]
    #[serde(default)]
    pub(crate) osmium_bin: Option<String>,
}

impl ManifestArgs {
    pub(crate) fn into_config(self) -> Result<ManifestConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ManifestConfig::try_from(merged)
    }
}

/// Resolved `manifest` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ManifestConfig {
    pub(crate) region_id: String,
    pub(crate) db: Utf8PathBuf,
    pub(crate) pbf: Utf8PathBuf,
    pub(crate) output: Utf8PathBuf,
    pub(crate) osmium_bin: String,
}

impl ManifestConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.db, ARG_MANIFEST_DB)?;
        require_existing(&self.pbf, ARG_MANIFEST_PBF)?;
        Ok(())
    }
}

impl TryFrom<ManifestArgs> for ManifestConfig {
    type Error = CliError;

    fn try_from(args: ManifestArgs) -> Result<Self, Self::Error> {
        let region_id = args.region_id.ok_or(CliError::MissingArgument {
            field: ARG_MANIFEST_REGION_ID,
            env: ENV_MANIFEST_REGION_ID,
        })?;
        let db = args.db.ok_or(CliError::MissingArgument {
            field: ARG_MANIFEST_DB,
            env: ENV_MANIFEST_DB,
        })?;
        let pbf = args.pbf.ok_or(CliError::MissingArgument {
            field: ARG_MANIFEST_PBF,
            env: ENV_MANIFEST_PBF,
        })?;
        let output = args.output.ok_or(CliError::MissingArgument {
            field: ARG_MANIFEST_OUTPUT,
            env: ENV_MANIFEST_OUTPUT,
        })?;
        let osmium_bin = args
            .osmium_bin
            .unwrap_or_else(|| DEFAULT_OSMIUM_BIN.to_owned());
        Ok(Self {
            region_id,
            db,
            pbf,
            output,
            osmium_bin,
        })
    }
}

pub(super) fn run_manifest(args: ManifestArgs) -> Result<(), CliError> {
    let config = args.into_config()?;
    run_with_config(&config)
}

pub(crate) fn run_with_config(config: &ManifestConfig) -> Result<(), CliError> {
    config.validate_sources()?;
    let probe = HeaderProbe::new(config.osmium_bin.clone());
    let manifest = build_region_manifest(&config.region_id, &config.db, &config.pbf, &probe)?;
    write_region_manifest(&manifest, &config.output)?;
    Ok(())
}
