//! Extract command implementation for the Skyline CLI.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use skyline_data::{extract_features, persist_features_to_sqlite};

use crate::{
    ARG_EXTRACT_OUTPUT, ARG_EXTRACT_PBF, CliError, ENV_EXTRACT_OUTPUT, ENV_EXTRACT_PBF,
    require_existing,
};

/// CLI arguments for the `extract` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Scan an OSM PBF extract for skyline features (tall \
                 buildings, peaks, masts, towers) and persist them into the \
                 region SQLite database the viewer consumes.",
    about = "Extract skyline features from an OSM PBF extract"
)]
#[ortho_config(prefix = "SKYLINE")]
pub(crate) struct ExtractArgs {
    /// Path to the source .osm.pbf file.
    #[arg(long = ARG_EXTRACT_PBF, value_name = "path")]
    #[serde(default)]
    pub(crate) pbf: Option<Utf8PathBuf>,
    /// Where to write the region SQLite database.
    #[arg(long = ARG_EXTRACT_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
}

impl ExtractArgs {
    pub(crate) fn into_config(self) -> Result<ExtractConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ExtractConfig::try_from(merged)
    }
}

/// Resolved `extract` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ExtractConfig {
    pub(crate) pbf: Utf8PathBuf,
    pub(crate) output: Utf8PathBuf,
}

impl ExtractConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.pbf, ARG_EXTRACT_PBF)
    }
}

impl TryFrom<ExtractArgs> for ExtractConfig {
    type Error = CliError;

    fn try_from(args: ExtractArgs) -> Result<Self, Self::Error> {
        let pbf = args.pbf.ok_or(CliError::MissingArgument {
            field: ARG_EXTRACT_PBF,
            env: ENV_EXTRACT_PBF,
        })?;
        let output = args.output.ok_or(CliError::MissingArgument {
            field: ARG_EXTRACT_OUTPUT,
            env: ENV_EXTRACT_OUTPUT,
        })?;
        Ok(Self { pbf, output })
    }
}

pub(super) fn run_extract_with(args: ExtractArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let report = extract_features(&config.pbf)?;
    persist_features_to_sqlite(&config.output, &report.features).map_err(|source| {
        CliError::PersistFeatures {
            path: config.output.clone(),
            source,
        }
    })?;
    writeln!(
        writer,
        "extracted {} features from {} nodes / {} ways into {}",
        report.features.len(),
        report.summary.nodes,
        report.summary.ways,
        config.output
    )
    .map_err(CliError::WriteExtractSummary)?;
    Ok(())
}
